use thiserror::Error;

use crate::algebra::{same_dimensions, scale_factor};
use crate::dimension::{resolve_to_dimension, ResolveError};
use crate::quantity::SiValue;
use crate::registry::DefinitionRegistry;
use crate::relation::Relation;
use crate::render::relation_to_string;

/// 단위 변환 시 발생 가능한 오류.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    /// 두 단위식의 차원이 다르다
    #[error("차원이 달라 변환할 수 없습니다: '{src}' -> '{dst}'")]
    IncompatibleDimensions { src: String, dst: String },
    /// 해석된 배율이 NaN, 무한대 또는 0이다 (음수 계수의 분수 거듭제곱, 오버플로 등)
    #[error("단위 배율을 유한한 값으로 계산할 수 없습니다: '{src}' -> '{dst}'")]
    NonFiniteScale { src: String, dst: String },
    /// 단위 정의 해석 실패
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// `src = 결과 × dst`를 만족하는 배율을 구한다.
///
/// 두 관계식을 기본 단위로 해석해 차원이 다르면 실패한다. 같으면 해석된
/// 관계식의 전체 배율(계수와 남은 접두어 기여)의 비 `src / dst`를 반환한다.
/// 배율이나 그 비가 유한한 0 아닌 값이 아니면 `NonFiniteScale`로 실패한다.
///
/// `convert(2 N, 1 kg·m·s^-2) == 2`
pub fn convert(
    registry: &DefinitionRegistry,
    src: &Relation,
    dst: &Relation,
) -> Result<f64, ConversionError> {
    let src_dim = resolve_to_dimension(registry, src)?;
    let dst_dim = resolve_to_dimension(registry, dst)?;

    if !same_dimensions(&src_dim, &dst_dim) {
        let err = ConversionError::IncompatibleDimensions {
            src: relation_to_string(src.units()),
            dst: relation_to_string(dst.units()),
        };
        tracing::warn!(%err, "conversion rejected");
        return Err(err);
    }

    let src_scale = scale_factor(&src_dim);
    let dst_scale = scale_factor(&dst_dim);
    let ratio = src_scale / dst_scale;
    if !is_usable_scale(src_scale) || !is_usable_scale(dst_scale) || !is_usable_scale(ratio) {
        let err = ConversionError::NonFiniteScale {
            src: relation_to_string(src.units()),
            dst: relation_to_string(dst.units()),
        };
        tracing::warn!(%err, src_scale, dst_scale, "conversion rejected");
        return Err(err);
    }
    tracing::debug!(
        src = %relation_to_string(src.units()),
        dst = %relation_to_string(dst.units()),
        ratio,
        "converted"
    );
    Ok(ratio)
}

fn is_usable_scale(scale: f64) -> bool {
    scale.is_finite() && scale != 0.0
}

/// `src` 단위로 표현된 값을 `dst` 단위로 환산한다.
pub fn convert_value(
    registry: &DefinitionRegistry,
    value: SiValue,
    src: &Relation,
    dst: &Relation,
) -> Result<SiValue, ConversionError> {
    let ratio = convert(registry, src, dst)?;
    Ok(SiValue::from_f64(value.to_f64() * ratio))
}

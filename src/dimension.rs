//! 관계식을 기본 단위만으로 이루어진 차원 표현으로 해석한다.

use thiserror::Error;

use crate::algebra::{multiply, same_dimensions, transform_relation};
use crate::registry::DefinitionRegistry;
use crate::relation::Relation;

/// 차원 해석 오류.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// 단위 정의가 자기 자신을 (간접적으로) 참조한다.
    #[error("순환 정의가 발견되었습니다: {}", .chain.join(" -> "))]
    CyclicDefinition { chain: Vec<String> },
}

/// 관계식을 기본 단위로 해석한다.
///
/// 누적값은 입력 관계식의 계수로 시작한다. 각 항은 원래 순서대로
/// - 레지스트리에 없거나 기본 단위로 해석되면 그 항 자체를 곱하고,
/// - 그렇지 않으면 정의를 재귀적으로 해석해 항의 접두어와 지수를 적용한 뒤 곱한다.
///
/// 결과 항은 기호마다 하나씩, 기호 순으로 정렬된다.
pub fn resolve_to_dimension(
    registry: &DefinitionRegistry,
    relation: &Relation,
) -> Result<Relation, ResolveError> {
    let mut path = Vec::new();
    resolve_inner(registry, relation, &mut path)
}

/// 두 관계식을 해석한 뒤 차원이 같은지 비교한다. 계수와 접두어는 무시한다.
pub fn have_same_dimensions(
    registry: &DefinitionRegistry,
    lhs: &Relation,
    rhs: &Relation,
) -> Result<bool, ResolveError> {
    let lhs = resolve_to_dimension(registry, lhs)?;
    let rhs = resolve_to_dimension(registry, rhs)?;
    Ok(same_dimensions(&lhs, &rhs))
}

/// `path`는 현재 해석 중인 기호들의 호출 스택이다.
fn resolve_inner(
    registry: &DefinitionRegistry,
    relation: &Relation,
    path: &mut Vec<String>,
) -> Result<Relation, ResolveError> {
    let mut acc = Relation::raw(relation.coefficient(), Vec::new());
    for term in relation.units() {
        let Some(definition) = registry.get_by_symbol(&term.symbol) else {
            tracing::trace!(symbol = %term.symbol, "unknown symbol kept as fundamental");
            acc = multiply(&acc, &Relation::raw(1.0, vec![term.clone()]));
            continue;
        };

        if path.iter().any(|s| s == &term.symbol) {
            let mut chain = path.clone();
            chain.push(term.symbol.clone());
            tracing::warn!(chain = ?chain, "cyclic unit definition");
            return Err(ResolveError::CyclicDefinition { chain });
        }

        path.push(term.symbol.clone());
        let resolved = resolve_inner(registry, &definition.theoretical_relation, path)?;
        path.pop();

        if resolved.is_dimensionless() {
            acc = multiply(&acc, &Relation::raw(1.0, vec![term.clone()]));
        } else {
            tracing::debug!(
                symbol = %term.symbol,
                depth = path.len(),
                "expanded composite unit"
            );
            let scaled = transform_relation(&resolved, term.log_prefix, term.exponent);
            acc = multiply(&acc, &scaled);
        }
    }
    Ok(acc)
}

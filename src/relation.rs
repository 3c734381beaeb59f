use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::registry::DefinitionRegistry;
use crate::units::prefix::{prefix_from_symbol, UNIT_PREFIX};

/// 관계식을 만들 때 발생 가능한 오류.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RelationError {
    /// 레지스트리에 없는 단위 기호
    #[error("알 수 없는 단위: '{0}'")]
    UnknownUnit(String),
    /// 접두어 테이블에 없는 접두어 기호
    #[error("알 수 없는 접두어: '{0}'")]
    UnknownPrefix(String),
    /// 0 또는 유한하지 않은 계수
    #[error("계수는 0이 아닌 유한한 값이어야 합니다: {0}")]
    InvalidCoefficient(f64),
}

/// 단위 곱의 한 인수. `cm^2`는 `{symbol: "m", log_prefix: -2, exponent: 2}`이다.
///
/// `log_prefix`는 지수 1당 접두어 지수이다. 항 하나의 배율 기여는
/// `10^(log_prefix × exponent)`이며 병합 후에는 정수가 아닐 수 있다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitTerm {
    pub symbol: String,
    pub log_prefix: f64,
    pub exponent: f64,
}

impl UnitTerm {
    pub fn new(symbol: impl Into<String>, log_prefix: f64, exponent: f64) -> Self {
        Self {
            symbol: symbol.into(),
            log_prefix,
            exponent,
        }
    }

    /// 이 항이 배율에 기여하는 10의 지수.
    pub fn prefix_contribution(&self) -> f64 {
        self.log_prefix * self.exponent
    }
}

/// `coefficient × Π units`를 나타내는 값 객체.
///
/// 계수는 항상 0이 아닌 유한한 값이다. 단위 목록은 정규화 전까지 같은 기호가
/// 여러 번 나올 수 있다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RelationParts")]
pub struct Relation {
    coefficient: f64,
    units: Vec<UnitTerm>,
}

/// 역직렬화 직후의 검증 전 형태. 계수 검사를 `from_parts`로 통과시킨다.
#[derive(Deserialize)]
struct RelationParts {
    coefficient: f64,
    #[serde(default)]
    units: Vec<UnitTerm>,
}

impl TryFrom<RelationParts> for Relation {
    type Error = RelationError;

    fn try_from(parts: RelationParts) -> Result<Self, Self::Error> {
        Relation::from_parts(parts.coefficient, parts.units)
    }
}

impl Default for Relation {
    fn default() -> Self {
        Self {
            coefficient: 1.0,
            units: Vec::new(),
        }
    }
}

impl Relation {
    /// 단위가 없는 관계식을 만든다. 계수 0, NaN, 무한대는 거부한다.
    pub fn new(coefficient: f64) -> Result<Self, RelationError> {
        Self::from_parts(coefficient, Vec::new())
    }

    pub fn from_parts(coefficient: f64, units: Vec<UnitTerm>) -> Result<Self, RelationError> {
        if coefficient == 0.0 || !coefficient.is_finite() {
            return Err(RelationError::InvalidCoefficient(coefficient));
        }
        Ok(Self { coefficient, units })
    }

    /// 검증 없이 항을 덧붙인다. 레지스트리에 없는 기호도 그대로 받는다.
    pub fn with_term(mut self, term: UnitTerm) -> Self {
        self.units.push(term);
        self
    }

    pub fn coefficient(&self) -> f64 {
        self.coefficient
    }

    pub fn units(&self) -> &[UnitTerm] {
        &self.units
    }

    pub fn is_dimensionless(&self) -> bool {
        self.units.is_empty()
    }

    /// 대수 연산 내부에서만 쓰는 생성자. 계수 검사는 호출하는 쪽 책임이다.
    pub(crate) fn raw(coefficient: f64, units: Vec<UnitTerm>) -> Self {
        Self { coefficient, units }
    }
}

/// 레지스트리를 참조하며 관계식을 조금씩 쌓는 빌더.
///
/// ```ignore
/// let newton = RelationBuilder::new(&registry, 1.0)?
///     .with_unit("g", "k", 1.0)?
///     .with_symbol("m")?
///     .with_unit("s", UNIT_PREFIX, -2.0)?
///     .to_relation();
/// ```
#[derive(Debug, Clone)]
pub struct RelationBuilder<'a> {
    registry: &'a DefinitionRegistry,
    relation: Relation,
}

impl<'a> RelationBuilder<'a> {
    pub fn new(registry: &'a DefinitionRegistry, coefficient: f64) -> Result<Self, RelationError> {
        Ok(Self {
            registry,
            relation: Relation::new(coefficient)?,
        })
    }

    /// 계수 1로 시작한다.
    pub fn unit(registry: &'a DefinitionRegistry) -> Self {
        Self {
            registry,
            relation: Relation::default(),
        }
    }

    /// 단위 항을 덧붙인다. 병합은 하지 않는다.
    pub fn with_unit(
        mut self,
        symbol: &str,
        prefix: &str,
        exponent: f64,
    ) -> Result<Self, RelationError> {
        if !self.registry.exists(symbol) {
            return Err(RelationError::UnknownUnit(symbol.to_string()));
        }
        let prefix = prefix_from_symbol(prefix)
            .ok_or_else(|| RelationError::UnknownPrefix(prefix.to_string()))?;
        self.relation
            .units
            .push(UnitTerm::new(symbol, f64::from(prefix.log10), exponent));
        Ok(self)
    }

    /// 접두어 없이 지수 1로 덧붙인다.
    pub fn with_symbol(self, symbol: &str) -> Result<Self, RelationError> {
        self.with_unit(symbol, UNIT_PREFIX, 1.0)
    }

    pub fn to_relation(&self) -> Relation {
        self.relation.clone()
    }

    pub fn into_relation(self) -> Relation {
        self.relation
    }
}

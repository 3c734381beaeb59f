//! 단위 정의 저장소.
//!
//! 기호 색인과 이름 색인은 하나의 카탈로그에 함께 들어 있고, 변경할 때마다
//! 카탈로그 전체를 교체한다(copy-on-write). 레지스트리를 `clone()`하면 그
//! 시점의 일관된 스냅샷을 얻는다.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::relation::{Relation, RelationBuilder, RelationError};
use crate::units::prefix::UNIT_PREFIX;

/// 레지스트리 CRUD 오류.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("이미 정의된 단위 기호입니다: '{0}'")]
    DuplicateSymbol(String),
    #[error("정의되지 않은 단위 기호입니다: '{0}'")]
    NotFound(String),
    #[error("단위 이름 '{name}'은(는) 이미 '{symbol}'에서 사용 중입니다")]
    DuplicateName { name: String, symbol: String },
    #[error("정의가 완전하지 않습니다: {0}")]
    IncompleteDefinition(&'static str),
}

/// 단위 하나의 이론적 정의와 설명.
///
/// `theoretical_relation`의 단위 목록이 비어 있으면 기본(fundamental) 단위이다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitDefinition {
    pub symbol: String,
    pub name: String,
    pub description: String,
    pub theoretical_relation: Relation,
}

impl UnitDefinition {
    pub fn is_fundamental(&self) -> bool {
        self.theoretical_relation.is_dimensionless()
    }
}

#[derive(Debug, Clone, Default)]
struct Catalog {
    by_symbol: BTreeMap<String, UnitDefinition>,
    /// name -> symbol
    by_name: HashMap<String, String>,
}

/// 기호를 키로 단위 정의를 보관한다.
#[derive(Debug, Clone, Default)]
pub struct DefinitionRegistry {
    catalog: Arc<Catalog>,
}

impl DefinitionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 새 단위를 정의한다. 같은 기호가 이미 있으면 실패한다.
    pub fn create(
        &mut self,
        symbol: &str,
        name: &str,
        relation: Relation,
        description: &str,
    ) -> Result<(), RegistryError> {
        validate_complete(symbol, name)?;
        if self.catalog.by_symbol.contains_key(symbol) {
            return Err(RegistryError::DuplicateSymbol(symbol.to_string()));
        }
        self.check_name_free(symbol, name)?;
        self.commit(UnitDefinition {
            symbol: symbol.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            theoretical_relation: relation,
        });
        tracing::info!(symbol, name, "unit defined");
        Ok(())
    }

    /// 기존 단위를 덮어쓴다. 기호가 없으면 실패한다.
    pub fn update(
        &mut self,
        symbol: &str,
        name: &str,
        relation: Relation,
        description: &str,
    ) -> Result<(), RegistryError> {
        validate_complete(symbol, name)?;
        if !self.catalog.by_symbol.contains_key(symbol) {
            return Err(RegistryError::NotFound(symbol.to_string()));
        }
        self.check_name_free(symbol, name)?;
        self.commit(UnitDefinition {
            symbol: symbol.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            theoretical_relation: relation,
        });
        tracing::info!(symbol, name, "unit redefined");
        Ok(())
    }

    pub fn get_by_symbol(&self, symbol: &str) -> Option<&UnitDefinition> {
        self.catalog.by_symbol.get(symbol)
    }

    pub fn get_by_name(&self, name: &str) -> Option<&UnitDefinition> {
        self.catalog
            .by_name
            .get(name)
            .and_then(|symbol| self.catalog.by_symbol.get(symbol))
    }

    /// 기호로 단위를 삭제한다. 없는 기호를 지워도 오류가 아니다.
    /// 실제로 지운 정의가 있었는지를 돌려준다.
    pub fn delete_by_symbol(&mut self, symbol: &str) -> bool {
        if !self.catalog.by_symbol.contains_key(symbol) {
            return false;
        }
        let catalog = Arc::make_mut(&mut self.catalog);
        if let Some(old) = catalog.by_symbol.remove(symbol) {
            catalog.by_name.remove(&old.name);
        }
        tracing::info!(symbol, "unit deleted");
        true
    }

    pub fn exists(&self, symbol: &str) -> bool {
        self.catalog.by_symbol.contains_key(symbol)
    }

    /// 등록되어 있고 이론적 관계식에 단위가 없는 경우에만 true.
    pub fn is_fundamental(&self, symbol: &str) -> bool {
        self.get_by_symbol(symbol)
            .is_some_and(UnitDefinition::is_fundamental)
    }

    /// 기호 순으로 정렬된 정의 목록.
    pub fn definitions(&self) -> impl Iterator<Item = &UnitDefinition> {
        self.catalog.by_symbol.values()
    }

    pub fn len(&self) -> usize {
        self.catalog.by_symbol.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.by_symbol.is_empty()
    }

    fn check_name_free(&self, symbol: &str, name: &str) -> Result<(), RegistryError> {
        match self.catalog.by_name.get(name) {
            Some(owner) if owner != symbol => Err(RegistryError::DuplicateName {
                name: name.to_string(),
                symbol: owner.clone(),
            }),
            _ => Ok(()),
        }
    }

    /// 검증이 끝난 정의를 두 색인에 함께 반영한다.
    fn commit(&mut self, definition: UnitDefinition) {
        let catalog = Arc::make_mut(&mut self.catalog);
        if let Some(old) = catalog.by_symbol.get(&definition.symbol) {
            catalog.by_name.remove(&old.name);
        }
        catalog
            .by_name
            .insert(definition.name.clone(), definition.symbol.clone());
        catalog
            .by_symbol
            .insert(definition.symbol.clone(), definition);
    }
}

fn validate_complete(symbol: &str, name: &str) -> Result<(), RegistryError> {
    if symbol.trim().is_empty() {
        return Err(RegistryError::IncompleteDefinition("기호가 비어 있습니다"));
    }
    if name.trim().is_empty() {
        return Err(RegistryError::IncompleteDefinition("이름이 비어 있습니다"));
    }
    Ok(())
}

/// 내장 단위를 등록할 때 발생 가능한 오류.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Relation(#[from] RelationError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// 기본 차원 단위. 질량은 접두어 처리를 위해 kg 대신 g을 기준으로 둔다.
const BASE_UNITS: &[(&str, &str, &str)] = &[
    ("g", "gram", "Measures Mass"),
    ("m", "meter", "Measures Length"),
    ("s", "second", "Measures Time"),
    ("A", "ampere", "Measures Electric Current"),
    ("K", "kelvin", "Measures Thermodynamic Temperature"),
    ("mol", "mole", "Measures Amount of Substance"),
    ("cd", "candela", "Measures Luminous Intensity"),
];

/// SI 기본 단위를 기본(fundamental) 단위로 등록한다. 이미 있는 기호는 건너뛴다.
pub fn seed_base_units(registry: &mut DefinitionRegistry) -> Result<(), SeedError> {
    for (symbol, name, description) in BASE_UNITS {
        if registry.exists(symbol) {
            continue;
        }
        registry.create(symbol, name, Relation::default(), description)?;
    }
    Ok(())
}

/// 유도 단위 정의가 참조하는 기본 단위.
const DERIVED_PREREQUISITES: &[&str] = &["g", "m", "s", "A"];

/// 자주 쓰는 유도 단위를 등록한다. 정의에 필요한 기본 단위가 없으면 함께 등록한다.
pub fn seed_derived_units(registry: &mut DefinitionRegistry) -> Result<(), SeedError> {
    for (symbol, name, description) in BASE_UNITS {
        if DERIVED_PREREQUISITES.contains(symbol) && !registry.exists(symbol) {
            registry.create(symbol, name, Relation::default(), description)?;
        }
    }

    let derived: Vec<(&str, &str, &str, Relation)> = vec![
        (
            "N",
            "newton",
            "Measures Force",
            RelationBuilder::unit(registry)
                .with_unit("g", "k", 1.0)?
                .with_symbol("m")?
                .with_unit("s", UNIT_PREFIX, -2.0)?
                .into_relation(),
        ),
        (
            "Hz",
            "hertz",
            "Measures Frequency",
            RelationBuilder::unit(registry)
                .with_unit("s", UNIT_PREFIX, -1.0)?
                .into_relation(),
        ),
        (
            "C",
            "coulomb",
            "Measures Electric Charge",
            RelationBuilder::unit(registry)
                .with_symbol("A")?
                .with_symbol("s")?
                .into_relation(),
        ),
        (
            "L",
            "litre",
            "Measures Volume",
            RelationBuilder::unit(registry)
                .with_unit("m", "d", 3.0)?
                .into_relation(),
        ),
        (
            "min",
            "minute",
            "Measures Time",
            RelationBuilder::new(registry, 60.0)?
                .with_symbol("s")?
                .into_relation(),
        ),
    ];
    create_missing(registry, derived)?;

    // 위에서 등록한 단위를 참조하는 단위들
    let dependent: Vec<(&str, &str, &str, Relation)> = vec![
        (
            "J",
            "joule",
            "Measures Energy",
            RelationBuilder::unit(registry)
                .with_symbol("N")?
                .with_symbol("m")?
                .into_relation(),
        ),
        (
            "Pa",
            "pascal",
            "Measures Pressure",
            RelationBuilder::unit(registry)
                .with_symbol("N")?
                .with_unit("m", UNIT_PREFIX, -2.0)?
                .into_relation(),
        ),
        (
            "h",
            "hour",
            "Measures Time",
            RelationBuilder::new(registry, 60.0)?
                .with_symbol("min")?
                .into_relation(),
        ),
    ];
    create_missing(registry, dependent)?;

    let power: Vec<(&str, &str, &str, Relation)> = vec![(
        "W",
        "watt",
        "Measures Power",
        RelationBuilder::unit(registry)
            .with_symbol("J")?
            .with_unit("s", UNIT_PREFIX, -1.0)?
            .into_relation(),
    )];
    create_missing(registry, power)?;

    let voltage: Vec<(&str, &str, &str, Relation)> = vec![(
        "V",
        "volt",
        "Measures Electric Potential",
        RelationBuilder::unit(registry)
            .with_symbol("W")?
            .with_unit("A", UNIT_PREFIX, -1.0)?
            .into_relation(),
    )];
    create_missing(registry, voltage)?;
    Ok(())
}

fn create_missing(
    registry: &mut DefinitionRegistry,
    entries: Vec<(&str, &str, &str, Relation)>,
) -> Result<(), RegistryError> {
    for (symbol, name, description, relation) in entries {
        if registry.exists(symbol) {
            continue;
        }
        registry.create(symbol, name, relation, description)?;
    }
    Ok(())
}

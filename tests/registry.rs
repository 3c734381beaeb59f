//! 단위 정의 레지스트리 CRUD 회귀 테스트.
use dimension_toolbox::registry::{seed_base_units, seed_derived_units};
use dimension_toolbox::relation::{Relation, RelationBuilder, RelationError};
use dimension_toolbox::units::UNIT_PREFIX;
use dimension_toolbox::{DefinitionRegistry, RegistryError};

const FUNDAMENTALS: &[(&str, &str, &str)] = &[
    ("g", "gram", "Measures Mass"),
    ("s", "second", "Measures Time"),
    ("m", "meter", "Measures Distance"),
];

fn fundamentals() -> DefinitionRegistry {
    let mut reg = DefinitionRegistry::new();
    for (symbol, name, description) in FUNDAMENTALS {
        reg.create(symbol, name, Relation::default(), description)
            .expect("create fundamental");
    }
    reg
}

#[test]
fn create_and_find_by_symbol_and_name() {
    let reg = fundamentals();
    for (symbol, name, description) in FUNDAMENTALS {
        let def = reg.get_by_symbol(symbol).expect("by symbol");
        assert_eq!(def.name, *name);
        assert_eq!(def.description, *description);
        assert!(def.is_fundamental());

        let by_name = reg.get_by_name(name).expect("by name");
        assert_eq!(by_name.symbol, *symbol);
    }
    assert_eq!(reg.len(), 3);
}

#[test]
fn duplicate_create_is_rejected() {
    let mut reg = fundamentals();
    let err = reg
        .create("g", "gramme", Relation::default(), "")
        .unwrap_err();
    assert_eq!(err, RegistryError::DuplicateSymbol("g".into()));
    // 실패한 호출은 아무것도 바꾸지 않는다
    assert_eq!(reg.get_by_symbol("g").unwrap().name, "gram");
    assert!(reg.get_by_name("gramme").is_none());
}

#[test]
fn update_overwrites_and_reindexes_name() {
    let mut reg = fundamentals();
    reg.update("g", "gramme", Relation::default(), "Measures Mass (updated)")
        .expect("update");
    assert_eq!(reg.get_by_symbol("g").unwrap().description, "Measures Mass (updated)");
    assert_eq!(reg.get_by_name("gramme").unwrap().symbol, "g");
    assert!(reg.get_by_name("gram").is_none());
}

#[test]
fn update_of_absent_symbol_fails() {
    let mut reg = fundamentals();
    let err = reg.update("x", "invalid", Relation::default(), "").unwrap_err();
    assert_eq!(err, RegistryError::NotFound("x".into()));
    assert!(!reg.exists("x"));
}

#[test]
fn names_must_stay_unique() {
    let mut reg = fundamentals();
    let err = reg.create("gr", "gram", Relation::default(), "").unwrap_err();
    assert_eq!(
        err,
        RegistryError::DuplicateName {
            name: "gram".into(),
            symbol: "g".into()
        }
    );
}

#[test]
fn incomplete_definitions_are_rejected() {
    let mut reg = DefinitionRegistry::new();
    assert!(matches!(
        reg.create("", "nothing", Relation::default(), ""),
        Err(RegistryError::IncompleteDefinition(_))
    ));
    assert!(matches!(
        reg.create("x", "  ", Relation::default(), ""),
        Err(RegistryError::IncompleteDefinition(_))
    ));
    assert!(reg.is_empty());
}

#[test]
fn delete_removes_both_indices_and_is_idempotent() {
    let mut reg = fundamentals();
    reg.create("x", "invalid", Relation::default(), "Measures Nothing")
        .unwrap();
    assert!(reg.delete_by_symbol("x"));
    assert!(reg.get_by_symbol("x").is_none());
    assert!(reg.get_by_name("invalid").is_none());
    assert!(!reg.delete_by_symbol("x"));
    assert!(!reg.delete_by_symbol("never-defined"));
    assert_eq!(reg.len(), 3);
}

#[test]
fn cloned_registry_is_a_stable_snapshot() {
    let mut reg = fundamentals();
    let snapshot = reg.clone();
    reg.delete_by_symbol("g");
    reg.create("K", "kelvin", Relation::default(), "").unwrap();
    assert!(snapshot.exists("g"));
    assert!(!snapshot.exists("K"));
    assert!(!reg.exists("g"));
}

#[test]
fn builder_validates_symbols_and_prefixes() {
    let reg = fundamentals();
    let err = RelationBuilder::unit(&reg).with_symbol("x").unwrap_err();
    assert_eq!(err, RelationError::UnknownUnit("x".into()));

    let err = RelationBuilder::unit(&reg)
        .with_unit("g", "kilo", 1.0)
        .unwrap_err();
    assert_eq!(err, RelationError::UnknownPrefix("kilo".into()));
}

#[test]
fn builder_appends_without_merging() {
    let reg = fundamentals();
    let rel = RelationBuilder::new(&reg, 2.0)
        .unwrap()
        .with_unit("g", "k", 1.0)
        .unwrap()
        .with_unit("g", "c", -2.0)
        .unwrap()
        .with_unit("s", UNIT_PREFIX, -1.0)
        .unwrap()
        .to_relation();
    assert_eq!(rel.coefficient(), 2.0);
    assert_eq!(rel.units().len(), 3);
    assert_eq!(rel.units()[0].log_prefix, 3.0);
    assert_eq!(rel.units()[1].log_prefix, -2.0);
    assert_eq!(rel.units()[1].exponent, -2.0);
}

#[test]
fn zero_or_non_finite_coefficient_is_rejected() {
    let reg = fundamentals();
    assert_eq!(
        RelationBuilder::new(&reg, 0.0).unwrap_err(),
        RelationError::InvalidCoefficient(0.0)
    );
    assert!(Relation::new(f64::INFINITY).is_err());
    assert!(Relation::new(f64::NAN).is_err());
    assert_eq!(Relation::default().coefficient(), 1.0);
}

#[test]
fn seeding_registers_base_and_derived_units() {
    let mut reg = DefinitionRegistry::new();
    seed_base_units(&mut reg).expect("base");
    seed_derived_units(&mut reg).expect("derived");
    for symbol in ["g", "m", "s", "A", "K", "mol", "cd"] {
        assert!(reg.is_fundamental(symbol), "{symbol} should be fundamental");
    }
    for symbol in ["N", "J", "W", "Pa", "Hz", "C", "V", "L", "min", "h"] {
        assert!(reg.exists(symbol), "{symbol} should be seeded");
        assert!(!reg.is_fundamental(symbol));
    }
    // 두 번 호출해도 실패하지 않는다
    seed_base_units(&mut reg).expect("base again");
    seed_derived_units(&mut reg).expect("derived again");
}

#[test]
fn deserialized_relations_are_validated() {
    let rel: Relation = toml::from_str(
        r#"
coefficient = 2.0
units = [{ symbol = "m", log_prefix = 3.0, exponent = 1.0 }]
"#,
    )
    .expect("valid relation");
    assert_eq!(rel.coefficient(), 2.0);
    assert_eq!(rel.units()[0].log_prefix, 3.0);

    let err = toml::from_str::<Relation>("coefficient = 0.0\nunits = []").unwrap_err();
    assert!(err.to_string().contains("계수"), "{err}");
}

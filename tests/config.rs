//! 설정 파일 로드와 레지스트리 구성 테스트.
use dimension_toolbox::config::{load_or_default, Config, ConfigError};
use dimension_toolbox::relation::RelationBuilder;
use dimension_toolbox::units::UNIT_PREFIX;
use dimension_toolbox::{convert, RegistryError, RelationError};

const CUSTOM: &str = r#"
seed_base_units = true
seed_derived_units = false
author = "lab"
history_limit = 5

[[definitions]]
symbol = "ft"
name = "foot"
description = "Measures Distance"
coefficient = 0.3048
units = [{ symbol = "m" }]

[[definitions]]
symbol = "ac"
name = "acre"
coefficient = 43560.0
units = [{ symbol = "ft", exponent = 2.0 }]
"#;

#[test]
fn missing_file_is_created_with_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let cfg = load_or_default(&path).expect("default config");
    assert_eq!(cfg, Config::default());
    assert!(path.exists());

    let reloaded = load_or_default(&path).expect("reload");
    assert_eq!(reloaded, cfg);
}

#[test]
fn custom_definitions_are_registered_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, CUSTOM).unwrap();

    let cfg = load_or_default(&path).unwrap();
    assert_eq!(cfg.author, "lab");
    assert_eq!(cfg.history_limit, 5);
    assert_eq!(cfg.definitions.len(), 2);
    assert_eq!(cfg.definitions[0].units[0].exponent, 1.0);
    assert_eq!(cfg.definitions[0].units[0].prefix, "");

    let reg = cfg.build_registry().unwrap();
    assert!(reg.exists("m"));
    assert!(!reg.exists("N"));
    assert_eq!(reg.get_by_name("acre").unwrap().symbol, "ac");

    let acre = RelationBuilder::unit(&reg).with_symbol("ac").unwrap().into_relation();
    let m2 = RelationBuilder::unit(&reg)
        .with_unit("m", UNIT_PREFIX, 2.0)
        .unwrap()
        .into_relation();
    let ratio = convert(&reg, &acre, &m2).unwrap();
    assert!((ratio - 4046.8564224).abs() < 1e-6, "acre -> m^2 got {ratio}");
}

#[test]
fn saved_config_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let cfg: Config = toml::from_str(CUSTOM).unwrap();
    cfg.save(&path).unwrap();
    assert_eq!(load_or_default(&path).unwrap(), cfg);
}

#[test]
fn unknown_term_symbol_is_reported_with_definition() {
    let cfg: Config = toml::from_str(
        r#"
[[definitions]]
symbol = "mph"
name = "mile per hour"
units = [{ symbol = "mi" }, { symbol = "h", exponent = -1.0 }]
"#,
    )
    .unwrap();
    match cfg.build_registry() {
        Err(ConfigError::Relation { symbol, source }) => {
            assert_eq!(symbol, "mph");
            assert_eq!(source, RelationError::UnknownUnit("mi".into()));
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn redefining_a_seeded_unit_fails() {
    let cfg: Config = toml::from_str(
        r#"
[[definitions]]
symbol = "N"
name = "other newton"
"#,
    )
    .unwrap();
    assert!(matches!(
        cfg.build_registry(),
        Err(ConfigError::Registry(RegistryError::DuplicateSymbol(_)))
    ));
}

#[test]
fn seeding_can_be_disabled() {
    let cfg = Config {
        seed_base_units: false,
        seed_derived_units: false,
        ..Config::default()
    };
    assert!(cfg.build_registry().unwrap().is_empty());
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "history_limit = \"many\"").unwrap();
    assert!(matches!(load_or_default(&path), Err(ConfigError::Serde(_))));
}

#[test]
fn derived_seeding_brings_its_own_base_units() {
    let cfg = Config {
        seed_base_units: false,
        ..Config::default()
    };
    let reg = cfg.build_registry().expect("derived units without base seeding");
    for symbol in ["g", "m", "s", "A"] {
        assert!(reg.is_fundamental(symbol), "{symbol} should be seeded");
    }
    // 유도 단위가 쓰지 않는 기본 단위는 등록하지 않는다
    for symbol in ["K", "mol", "cd"] {
        assert!(!reg.exists(symbol), "{symbol} should not be seeded");
    }
    assert!(reg.exists("N") && reg.exists("V") && reg.exists("h"));
}

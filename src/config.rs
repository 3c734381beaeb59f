use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::registry::{self, DefinitionRegistry, RegistryError, SeedError};
use crate::relation::{RelationBuilder, RelationError};
use crate::units::prefix::UNIT_PREFIX;

/// 사용자 정의 단위식의 한 항.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermConfig {
    pub symbol: String,
    #[serde(default)]
    pub prefix: String,
    #[serde(default = "default_exponent")]
    pub exponent: f64,
}

/// 시작 시 등록할 사용자 정의 단위.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefinitionConfig {
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_coefficient")]
    pub coefficient: f64,
    /// 비어 있으면 기본(fundamental) 단위가 된다.
    #[serde(default)]
    pub units: Vec<TermConfig>,
}

/// 애플리케이션 설정을 표현한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// g, m, s, A, K, mol, cd를 기본 단위로 등록
    pub seed_base_units: bool,
    /// N, J, W, Pa 등 유도 단위를 등록
    pub seed_derived_units: bool,
    /// 변환 기록에 남길 작성자
    pub author: String,
    /// 보관할 변환 기록 수. 0이면 제한 없음
    pub history_limit: usize,
    pub definitions: Vec<DefinitionConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed_base_units: true,
            seed_derived_units: true,
            author: String::new(),
            history_limit: 100,
            definitions: Vec::new(),
        }
    }
}

fn default_exponent() -> f64 {
    1.0
}

fn default_coefficient() -> f64 {
    1.0
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 파일 입출력 오류
    #[error("파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    /// TOML 역직렬화 오류
    #[error("설정 파싱 오류: {0}")]
    Serde(#[from] toml::de::Error),
    /// TOML 직렬화 오류
    #[error("설정 직렬화 오류: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// 사용자 정의 단위식 오류
    #[error("단위 정의 '{symbol}' 오류: {source}")]
    Relation {
        symbol: String,
        source: RelationError,
    },
    /// 레지스트리 등록 오류
    #[error("단위 정의 등록 오류: {0}")]
    Registry(#[from] RegistryError),
    /// 내장 단위 등록 오류
    #[error("내장 단위 등록 오류: {0}")]
    Seed(#[from] SeedError),
}

/// 설정 파일을 로드하거나 없으면 기본 설정을 생성한다.
pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        let content = fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(cfg)
    } else {
        let cfg = Config::default();
        cfg.save(path)?;
        tracing::info!(path = %path.display(), "default config written");
        Ok(cfg)
    }
}

impl Config {
    /// 설정을 파일에 저장한다.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// 설정에 따라 레지스트리를 만든다. 사용자 정의 단위는 파일 순서대로 등록한다.
    pub fn build_registry(&self) -> Result<DefinitionRegistry, ConfigError> {
        let mut registry = DefinitionRegistry::new();
        if self.seed_base_units {
            registry::seed_base_units(&mut registry)?;
        }
        if self.seed_derived_units {
            registry::seed_derived_units(&mut registry)?;
        }
        for def in &self.definitions {
            apply_definition(&mut registry, def)?;
        }
        Ok(registry)
    }
}

fn apply_definition(
    registry: &mut DefinitionRegistry,
    def: &DefinitionConfig,
) -> Result<(), ConfigError> {
    let wrap = |source| ConfigError::Relation {
        symbol: def.symbol.clone(),
        source,
    };
    let mut builder = RelationBuilder::new(registry, def.coefficient).map_err(wrap)?;
    for term in &def.units {
        let prefix = if term.prefix.is_empty() {
            UNIT_PREFIX
        } else {
            term.prefix.as_str()
        };
        builder = builder
            .with_unit(&term.symbol, prefix, term.exponent)
            .map_err(wrap)?;
    }
    let relation = builder.into_relation();
    registry.create(&def.symbol, &def.name, relation, &def.description)?;
    Ok(())
}

//! 차원 해석과 단위 변환 엔진. CLI 외의 화면에서도 쓸 수 있도록 라이브러리로 분리한다.

pub mod algebra;
pub mod app;
pub mod config;
pub mod conversion;
pub mod dimension;
pub mod history;
pub mod quantity;
pub mod registry;
pub mod relation;
pub mod render;
pub mod ui_cli;
pub mod units;

pub use conversion::{convert, convert_value, ConversionError};
pub use dimension::{have_same_dimensions, resolve_to_dimension, ResolveError};
pub use registry::{DefinitionRegistry, RegistryError, UnitDefinition};
pub use relation::{Relation, RelationBuilder, RelationError, UnitTerm};

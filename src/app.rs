use thiserror::Error;

use crate::config::{Config, ConfigError};
use crate::conversion::{self, ConversionError};
use crate::dimension::ResolveError;
use crate::history::ConversionHistory;
use crate::registry::{DefinitionRegistry, RegistryError};
use crate::relation::{Relation, RelationBuilder, RelationError};
use crate::ui_cli::{self, Command, MenuChoice};
use crate::units::prefix::{prefix_from_name, UNIT_PREFIX};

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 파일 입출력 오류
    #[error("입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    /// 설정 저장/로드 오류
    #[error("설정 오류: {0}")]
    Config(#[from] ConfigError),
    /// 단위식 구성 오류
    #[error("단위식 오류: {0}")]
    Relation(#[from] RelationError),
    /// 단위 정의 오류
    #[error("단위 정의 오류: {0}")]
    Registry(#[from] RegistryError),
    /// 차원 해석 오류
    #[error("차원 해석 오류: {0}")]
    Resolve(#[from] ResolveError),
    /// 단위 변환 오류
    #[error("단위 변환 오류: {0}")]
    Conversion(#[from] ConversionError),
    /// `기호[:접두어[:지수]]` 형식이 아닌 입력
    #[error("잘못된 단위 항: '{0}' (형식: 기호[:접두어[:지수]])")]
    InvalidTerm(String),
}

/// 한 번 실행하는 동안 유지되는 레지스트리와 변환 기록.
#[derive(Debug, Clone)]
pub struct Session {
    pub registry: DefinitionRegistry,
    pub history: ConversionHistory,
    pub author: String,
}

impl Session {
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let registry = config.build_registry()?;
        tracing::info!(units = registry.len(), "registry ready");
        Ok(Self {
            registry,
            history: ConversionHistory::new(config.history_limit),
            author: config.author.clone(),
        })
    }

    /// `기호[:접두어[:지수]]` 형식의 항들로 관계식을 만든다. 접두어는 이름(`kilo`)으로도 받는다.
    pub fn build_relation<S: AsRef<str>>(
        &self,
        coefficient: f64,
        terms: &[S],
    ) -> Result<Relation, AppError> {
        let mut builder = RelationBuilder::new(&self.registry, coefficient)?;
        for raw in terms {
            let (symbol, prefix, exponent) = parse_term(raw.as_ref())?;
            let prefix = prefix_from_name(prefix).map_or(prefix, |p| p.symbol);
            builder = builder.with_unit(symbol, prefix, exponent)?;
        }
        Ok(builder.into_relation())
    }
}

/// `g:k` -> (`g`, `k`, 1), `s::-2` -> (`s`, ``, -2), `m` -> (`m`, ``, 1)
pub fn parse_term(raw: &str) -> Result<(&str, &str, f64), AppError> {
    let invalid = || AppError::InvalidTerm(raw.to_string());
    let mut parts = raw.trim().split(':');
    let symbol = parts.next().filter(|s| !s.is_empty()).ok_or_else(invalid)?;
    let prefix = parts.next().unwrap_or(UNIT_PREFIX);
    let exponent = match parts.next() {
        None | Some("") => 1.0,
        Some(e) => e.parse::<f64>().map_err(|_| invalid())?,
    };
    if parts.next().is_some() || !exponent.is_finite() {
        return Err(invalid());
    }
    Ok((symbol, prefix, exponent))
}

/// 하위 명령이 있으면 한 번 실행하고, 없으면 대화형 메뉴를 돈다.
pub fn run(command: Option<Command>, config: &Config) -> Result<(), AppError> {
    let mut session = Session::from_config(config)?;
    match command {
        Some(cmd) => run_command(cmd, &mut session),
        None => run_interactive(&mut session),
    }
}

fn run_command(command: Command, session: &mut Session) -> Result<(), AppError> {
    match command {
        Command::Convert { value, from, to } => {
            let src = session.build_relation(1.0, &from)?;
            let dst = session.build_relation(1.0, &to)?;
            let ratio = conversion::convert(&session.registry, &src, &dst)?;
            ui_cli::print_conversion(value, &src, value * ratio, &dst);
        }
        Command::Dimension { coefficient, terms } => {
            let relation = session.build_relation(coefficient, &terms)?;
            ui_cli::print_dimension(&session.registry, &relation)?;
        }
        Command::List => ui_cli::print_definitions(&session.registry),
        Command::Prefixes => ui_cli::print_prefixes(),
    }
    Ok(())
}

/// CLI 애플리케이션의 메인 루프를 실행한다. 메뉴 안에서 난 오류는 출력만 하고 계속한다.
fn run_interactive(session: &mut Session) -> Result<(), AppError> {
    loop {
        let outcome = match ui_cli::main_menu()? {
            MenuChoice::Convert => ui_cli::handle_conversion(session),
            MenuChoice::Dimension => ui_cli::handle_dimension(session),
            MenuChoice::Define => ui_cli::handle_define(session),
            MenuChoice::Delete => ui_cli::handle_delete(session),
            MenuChoice::List => {
                ui_cli::print_definitions(&session.registry);
                Ok(())
            }
            MenuChoice::History => {
                ui_cli::print_history(&session.history);
                Ok(())
            }
            MenuChoice::ClearHistory => {
                session.history.clear();
                println!("변환 기록을 지웠습니다.");
                Ok(())
            }
            MenuChoice::Prefixes => {
                ui_cli::print_prefixes();
                Ok(())
            }
            MenuChoice::BrowsePrefixes => ui_cli::handle_prefix_browse(),
            MenuChoice::Exit => {
                println!("프로그램을 종료합니다.");
                break;
            }
        };
        match outcome {
            Ok(()) => {}
            Err(AppError::Io(e)) => return Err(AppError::Io(e)),
            Err(e) => println!("오류: {e}"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_term_defaults() {
        assert_eq!(parse_term("m").unwrap(), ("m", "", 1.0));
        assert_eq!(parse_term("g:k").unwrap(), ("g", "k", 1.0));
        assert_eq!(parse_term("s::-2").unwrap(), ("s", "", -2.0));
        assert_eq!(parse_term("m:c:0.5").unwrap(), ("m", "c", 0.5));
    }

    #[test]
    fn parse_term_rejects_garbage() {
        assert!(matches!(parse_term(""), Err(AppError::InvalidTerm(_))));
        assert!(matches!(parse_term(":k"), Err(AppError::InvalidTerm(_))));
        assert!(matches!(parse_term("m::x"), Err(AppError::InvalidTerm(_))));
        assert!(matches!(parse_term("m:k:1:2"), Err(AppError::InvalidTerm(_))));
    }

    #[test]
    fn session_builds_and_converts() {
        let session = Session::from_config(&Config::default()).unwrap();
        let src = session.build_relation(1.0, &["m:k", "h::-1"]).unwrap();
        let dst = session.build_relation(1.0, &["m", "s::-1"]).unwrap();
        let ratio = conversion::convert(&session.registry, &src, &dst).unwrap();
        assert!((ratio - 1000.0 / 3600.0).abs() < 1e-12);
    }

    #[test]
    fn prefix_names_are_accepted() {
        let session = Session::from_config(&Config::default()).unwrap();
        let by_name = session.build_relation(1.0, &["g:kilo"]).unwrap();
        let by_symbol = session.build_relation(1.0, &["g:k"]).unwrap();
        assert_eq!(by_name, by_symbol);
        assert!(matches!(
            session.build_relation(1.0, &["g:K"]),
            Err(AppError::Relation(RelationError::UnknownPrefix(_)))
        ));
    }
}

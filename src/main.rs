use clap::Parser;
use dimension_toolbox::app::{self, AppError};
use dimension_toolbox::config;
use dimension_toolbox::ui_cli::Cli;
use tracing_subscriber::EnvFilter;

/// 프로그램의 엔트리 포인트. 설정을 로드한 뒤 CLI 애플리케이션을 실행한다.
fn main() {
    // 로그는 stderr로 보내 결과 출력과 섞이지 않게 한다.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("dimension_toolbox=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = try_run() {
        eprintln!("오류: {err}");
        std::process::exit(1);
    }
}

fn try_run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let cfg = config::load_or_default(&cli.config)?;
    app::run(cli.command, &cfg)
}

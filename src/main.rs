use colored::*;
use std::process;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

const VERSION_INFO: &str = env!("STAGEHAND_BUILD_VERSION");

#[tokio::main]
async fn main() {
    let cli_args = stagehand::cli::parse_args();

    let default_level = match cli_args.verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .with_env_var("STAGEHAND_LOG")
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("stagehand {}", VERSION_INFO);

    if let Err(e) = stagehand::cli::run(cli_args).await {
        eprintln!("{}: {}", "Error".red().bold(), e);
        process::exit(1);
    }
}

mod build;
mod down;
pub mod error;
mod expose;
mod logs;
pub mod parser;
mod up;
mod versions;

use crate::executor::{ensure_tools_available, LocalCommandExecutor, Tool};
use crate::probe::{DeploymentProbe, SessionStore};
use crate::workflow::{TerminalPrompt, WorkflowEngine};
use clap::error::ErrorKind;
use clap::Parser;
use error::CliError;
use parser::{Cli, Commands};
use std::process;

/// Parses the process arguments. Help exits 0; any other parse failure
/// prints clap's message and exits 1.
pub fn parse_args() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = e.print();
            process::exit(code);
        }
    }
}

/// Maps the parsed command onto its workflow.
pub async fn run(cli: Cli) -> Result<(), CliError> {
    let command = cli.command.as_ref().ok_or(CliError::MissingCommand)?;
    ensure_tools_available(&Tool::REQUIRED)?;
    let ctx = cli.resolve_context()?;
    tracing::debug!(
        app = %ctx.application(),
        env = %ctx.environment(),
        version = ?ctx.version(),
        "Resolved context"
    );

    let sessions = SessionStore::new(
        cli.state_dir
            .clone()
            .unwrap_or_else(SessionStore::default_dir),
    );
    let mut executor = LocalCommandExecutor::new();
    let mut prompt = TerminalPrompt;
    let mut engine = WorkflowEngine::new(
        &mut executor,
        &mut prompt,
        DeploymentProbe::new(sessions),
    );

    match command {
        Commands::Up(cmd) => cmd.run(&mut engine, &ctx).await,
        Commands::Down(cmd) => cmd.run(&mut engine, &ctx).await,
        Commands::Build(cmd) => cmd.run(&mut engine, &ctx).await,
        Commands::Versions(cmd) => cmd.run(&mut engine, &ctx).await,
        Commands::Logs(cmd) => cmd.run(&mut engine, &ctx).await,
        Commands::Expose(cmd) => cmd.run(&mut engine, &ctx).await,
    }
}

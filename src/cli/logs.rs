use super::error::CliError;
use crate::context::ResolvedContext;
use crate::workflow::WorkflowEngine;
use clap::Args;

#[derive(Debug, Args)]
pub struct Logs {
    /// Keep streaming new log lines until interrupted
    #[arg(short = 'f', long = "follow")]
    pub follow: bool,
}

impl Logs {
    pub async fn run(
        &self,
        engine: &mut WorkflowEngine<'_>,
        ctx: &ResolvedContext,
    ) -> Result<(), CliError> {
        engine.logs(ctx, self.follow).await?;
        Ok(())
    }
}

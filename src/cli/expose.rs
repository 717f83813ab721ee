use super::error::CliError;
use crate::context::ResolvedContext;
use crate::workflow::WorkflowEngine;
use clap::Args;

#[derive(Debug, Args)]
pub struct Expose {
    /// Local port to forward to the version's service
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,
}

impl Expose {
    pub async fn run(
        &self,
        engine: &mut WorkflowEngine<'_>,
        ctx: &ResolvedContext,
    ) -> Result<(), CliError> {
        engine.expose(ctx, self.port).await?;
        Ok(())
    }
}

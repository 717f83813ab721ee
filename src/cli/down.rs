use super::error::CliError;
use crate::context::ResolvedContext;
use crate::workflow::WorkflowEngine;
use clap::Args;

#[derive(Debug, Args)]
pub struct Down {}

impl Down {
    pub async fn run(
        &self,
        engine: &mut WorkflowEngine<'_>,
        ctx: &ResolvedContext,
    ) -> Result<(), CliError> {
        engine.teardown(ctx).await?;
        Ok(())
    }
}

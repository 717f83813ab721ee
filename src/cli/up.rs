use super::error::CliError;
use crate::context::ResolvedContext;
use crate::workflow::WorkflowEngine;
use clap::Args;

#[derive(Debug, Args)]
pub struct Up {}

impl Up {
    pub async fn run(
        &self,
        engine: &mut WorkflowEngine<'_>,
        ctx: &ResolvedContext,
    ) -> Result<(), CliError> {
        engine.provision(ctx).await?;
        Ok(())
    }
}

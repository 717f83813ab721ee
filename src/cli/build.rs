use super::error::CliError;
use crate::context::ResolvedContext;
use crate::workflow::{BuildOptions, WorkflowEngine};
use clap::Args;

#[derive(Debug, Args)]
pub struct Build {
    /// Image tag (defaults to the abbreviated git revision)
    #[arg(short = 'v', long = "version", value_name = "TAG")]
    pub tag: Option<String>,

    /// Provision the built version right after a successful build
    #[arg(short = 'd', long = "deploy")]
    pub deploy: bool,
}

impl Build {
    pub async fn run(
        &self,
        engine: &mut WorkflowEngine<'_>,
        ctx: &ResolvedContext,
    ) -> Result<(), CliError> {
        let options = BuildOptions {
            tag: self.tag.clone(),
            deploy: self.deploy,
        };
        engine.build(ctx, &options).await?;
        Ok(())
    }
}

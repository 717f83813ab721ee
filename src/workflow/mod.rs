mod build;
pub mod error;
mod expose;
mod inspect;
mod prompt;
mod provision;

pub use build::BuildOptions;
pub use error::{WorkflowError, WorkflowResult};
pub use inspect::VersionStatus;
pub use prompt::{Prompt, TerminalPrompt};
pub use provision::parse_workspace_list;

use crate::context::{Release, ResolvedContext};
use crate::executor::{CommandExecutor, CommandResult, Invocation};
use crate::probe::DeploymentProbe;

/// Provisioner workspace that exists in every state and is never a version.
pub const SENTINEL_WORKSPACE: &str = "default";
/// Port the application's service listens on inside the cluster.
pub const SERVICE_PORT: u16 = 8080;
/// Label key selecting the application's pods.
pub const APP_LABEL: &str = "app";
pub const LOG_TAIL_LINES: u32 = 100;
pub const REVISION_LENGTH: usize = 7;

/// Sequences the external tools for every user-facing workflow.
///
/// Calls are strictly one after another; each external invocation blocks
/// until the child exits.
pub struct WorkflowEngine<'a> {
    executor: &'a mut dyn CommandExecutor,
    prompt: &'a mut dyn Prompt,
    probe: DeploymentProbe,
}

impl<'a> WorkflowEngine<'a> {
    pub fn new(
        executor: &'a mut dyn CommandExecutor,
        prompt: &'a mut dyn Prompt,
        probe: DeploymentProbe,
    ) -> Self {
        Self {
            executor,
            prompt,
            probe,
        }
    }

    /// Uses the context's version, or asks for one.
    fn require_release(&mut self, ctx: &ResolvedContext) -> WorkflowResult<Release> {
        if let Some(version) = ctx.version() {
            return Ok(ctx.release(version)?);
        }
        let answer = self.prompt.ask("Version").unwrap_or_default();
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(WorkflowError::UserInputRequired("version".into()));
        }
        Ok(ctx.release(answer)?)
    }

    async fn require_deployed(&mut self, release: &Release) -> WorkflowResult<()> {
        if self.probe.is_deployed(&mut *self.executor, release).await {
            Ok(())
        } else {
            Err(WorkflowError::NotDeployed {
                version: release.version().to_string(),
                namespace: release.namespace(),
            })
        }
    }

    /// Foreground run; a non-zero exit becomes `ExternalCommand`.
    async fn run_checked(&mut self, invocation: &Invocation) -> WorkflowResult<CommandResult> {
        let result = self.executor.run(invocation).await?;
        if result.is_success() {
            Ok(result)
        } else {
            Err(WorkflowError::ExternalCommand {
                command: invocation.to_string(),
                code: result.exit_code(),
            })
        }
    }

    /// Captured run. On failure the captured stderr is passed on to the user
    /// before the error is returned.
    async fn capture_checked(&mut self, invocation: &Invocation) -> WorkflowResult<CommandResult> {
        let result = self.executor.capture(invocation).await?;
        if result.is_success() {
            return Ok(result);
        }
        if let Ok(stderr) = result.output.to_stderr_string() {
            if !stderr.trim().is_empty() {
                eprintln!("{}", stderr.trim_end());
            }
        }
        Err(WorkflowError::ExternalCommand {
            command: invocation.to_string(),
            code: result.exit_code(),
        })
    }
}

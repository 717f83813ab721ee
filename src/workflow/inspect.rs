use super::{WorkflowEngine, WorkflowResult, APP_LABEL, LOG_TAIL_LINES, SENTINEL_WORKSPACE};
use crate::context::{Release, ResolvedContext};
use crate::executor::{Invocation, Tool, WorkdirGuard};
use crate::probe::DeploymentState;
use tracing::instrument;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionStatus {
    pub version: String,
    pub state: DeploymentState,
}

fn kubectl_logs(release: &Release, follow: bool) -> Invocation {
    let inv = Invocation::new(Tool::Kubectl).args([
        "logs".to_string(),
        "-n".to_string(),
        release.namespace(),
        "-l".to_string(),
        format!("{}={}", APP_LABEL, release.application()),
        "--all-containers=true".to_string(),
        "--prefix=true".to_string(),
    ]);
    if follow {
        inv.arg("-f")
    } else {
        inv.arg(format!("--tail={}", LOG_TAIL_LINES))
    }
}

impl WorkflowEngine<'_> {
    /// Every provisioner workspace except the sentinel, in listing order,
    /// with its live deployment state.
    #[instrument(name = "versions", skip_all, fields(app = %ctx.application(), env = %ctx.environment()))]
    pub async fn list_versions(&mut self, ctx: &ResolvedContext) -> WorkflowResult<Vec<VersionStatus>> {
        let infra = ctx.infrastructure_path()?;
        let workspaces = {
            let _workdir = WorkdirGuard::enter(&infra)?;
            self.workspaces().await?
        };

        let mut statuses: Vec<VersionStatus> = Vec::new();
        for name in workspaces {
            if name == SENTINEL_WORKSPACE || statuses.iter().any(|s| s.version == name) {
                continue;
            }
            let release = ctx.release(&name)?;
            let state = self.probe.state(&mut *self.executor, &release).await;
            tracing::debug!(version = %name, deployed = state.is_deployed, "Probed version");
            statuses.push(VersionStatus {
                version: name,
                state,
            });
        }
        Ok(statuses)
    }

    /// Blocks until interrupted when `follow` is set.
    #[instrument(name = "logs", skip_all, fields(app = %ctx.application(), follow = follow))]
    pub async fn logs(&mut self, ctx: &ResolvedContext, follow: bool) -> WorkflowResult<()> {
        let release = self.require_release(ctx)?;
        self.require_deployed(&release).await?;
        self.run_checked(&kubectl_logs(&release, follow)).await?;
        Ok(())
    }
}

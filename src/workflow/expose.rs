use super::{WorkflowEngine, WorkflowError, WorkflowResult, SERVICE_PORT};
use crate::context::{Release, ResolvedContext};
use crate::executor::{Invocation, Tool};
use crate::probe::ForwardSession;
use crate::ui;
use tracing::{info, instrument, warn};

fn kubectl_port_forward(release: &Release, local_port: u16) -> Invocation {
    Invocation::new(Tool::Kubectl).args([
        "port-forward".to_string(),
        "-n".to_string(),
        release.namespace(),
        format!("service/{}", release.application()),
        format!("{}:{}", local_port, SERVICE_PORT),
    ])
}

impl WorkflowEngine<'_> {
    /// Forward `port` to the version's service until the user interrupts.
    ///
    /// The session is recorded for the probe while the forward runs and
    /// removed once it ends, whichever way it ends short of a crash.
    #[instrument(name = "expose", skip_all, fields(app = %ctx.application(), port = ?port))]
    pub async fn expose(&mut self, ctx: &ResolvedContext, port: Option<u16>) -> WorkflowResult<()> {
        let port = port.ok_or_else(|| {
            WorkflowError::Argument("expose requires a local port (-p/--port <n>)".into())
        })?;
        let release = self.require_release(ctx)?;
        self.require_deployed(&release).await?;

        // Recorded so `versions` can show the URL while this runs
        let namespace = release.namespace();
        let sessions = self.probe.sessions().clone();
        if let Err(e) = sessions.record(&ForwardSession::current(&namespace, port)) {
            warn!("Could not record forward session: {}", e);
        }
        info!(
            "Forwarding {} to service/{}:{} in {} (Ctrl-C to stop)",
            ui::format_highlight(&format!("http://localhost:{}", port)),
            release.application(),
            SERVICE_PORT,
            namespace
        );

        // Ctrl-C drops the run future, which kills the child
        let inv = kubectl_port_forward(&release, port);
        let outcome = tokio::select! {
            result = self.executor.run(&inv) => Some(result),
            _ = tokio::signal::ctrl_c() => None,
        };

        if let Err(e) = sessions.remove(&namespace) {
            warn!("Could not remove forward session: {}", e);
        }

        // None means interrupted
        match outcome {
            None => {
                info!("Port-forward for {} stopped", namespace);
                Ok(())
            }
            Some(result) => {
                let result = result?;
                if result.is_success() {
                    Ok(())
                } else {
                    Err(WorkflowError::ExternalCommand {
                        command: inv.to_string(),
                        code: result.exit_code(),
                    })
                }
            }
        }
    }
}

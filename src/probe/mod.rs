pub mod process_table;
pub mod sessions;

use crate::context::Release;
use crate::executor::{CommandExecutor, Invocation, Tool};
pub use sessions::{ForwardSession, SessionError, SessionStore};
use url::Url;

/// Reconstructed on every query, never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentState {
    pub is_deployed: bool,
    pub forwarded_url: Option<Url>,
}

pub fn local_url(port: u16) -> Option<Url> {
    Url::parse(&format!("http://localhost:{}", port)).ok()
}

/// Answers "is this version deployed" and "is it forwarded locally" by
/// asking the orchestrator and the local machine.
#[derive(Debug, Clone)]
pub struct DeploymentProbe {
    sessions: SessionStore,
}

impl DeploymentProbe {
    pub fn new(sessions: SessionStore) -> Self {
        Self { sessions }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// A version counts as deployed when its namespace exists. Any failure to
    /// ask is reported the same as absence.
    pub async fn is_deployed(&self, executor: &mut dyn CommandExecutor, release: &Release) -> bool {
        let namespace = release.namespace();
        let inv = Invocation::new(Tool::Kubectl).args(["get", "namespace", namespace.as_str()]);
        match executor.capture(&inv).await {
            Ok(result) => {
                tracing::debug!(
                    "Namespace {} query exited with {}",
                    namespace,
                    result.exit_code()
                );
                result.is_success()
            }
            Err(e) => {
                tracing::debug!("Namespace {} query failed: {}", namespace, e);
                false
            }
        }
    }

    /// Best effort. Sessions recorded by `expose` are checked first; the
    /// process table is scanned as a fallback so forwards started by other
    /// means are still picked up.
    pub async fn find_active_port_forward(
        &self,
        executor: &mut dyn CommandExecutor,
        release: &Release,
    ) -> Option<Url> {
        let namespace = release.namespace();
        if let Some(session) = self.sessions.find_live(&namespace) {
            tracing::debug!(
                "Found recorded forward for {} on port {} (pid {})",
                namespace,
                session.local_port,
                session.pid
            );
            return local_url(session.local_port);
        }

        let inv = Invocation::program("ps").args(["-eo", "args="]);
        let lines = match executor.capture(&inv).await {
            Ok(result) if result.is_success() => result.output.stdout_lines().ok()?,
            Ok(result) => {
                tracing::debug!("ps exited with {}", result.exit_code());
                return None;
            }
            Err(e) => {
                tracing::debug!("Could not read process table: {}", e);
                return None;
            }
        };
        process_table::find_forwarded_port(lines.iter().map(String::as_str), &namespace)
            .and_then(local_url)
    }

    pub async fn state(&self, executor: &mut dyn CommandExecutor, release: &Release) -> DeploymentState {
        let is_deployed = self.is_deployed(executor, release).await;
        let forwarded_url = if is_deployed {
            self.find_active_port_forward(executor, release).await
        } else {
            None
        };
        DeploymentState {
            is_deployed,
            forwarded_url,
        }
    }
}

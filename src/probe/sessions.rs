use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session file I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Session file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A port-forward started by `expose`, as written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardSession {
    pub pid: u32,
    pub namespace: String,
    pub local_port: u16,
    /// Seconds since the Unix epoch.
    pub started_at: u64,
}

impl ForwardSession {
    /// A session owned by the current process.
    pub fn current(namespace: &str, local_port: u16) -> Self {
        let started_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        Self {
            pid: std::process::id(),
            namespace: namespace.to_string(),
            local_port,
            started_at,
        }
    }
}

/// One JSON file per namespace under `<dir>/sessions/`.
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `$XDG_STATE_HOME/stagehand` where the platform has one, otherwise the
    /// cache directory, otherwise the system temp directory.
    pub fn default_dir() -> PathBuf {
        dirs::state_dir()
            .or_else(dirs::cache_dir)
            .unwrap_or_else(std::env::temp_dir)
            .join("stagehand")
    }

    fn path_for(&self, namespace: &str) -> PathBuf {
        self.dir.join("sessions").join(format!("{}.json", namespace))
    }

    pub fn record(&self, session: &ForwardSession) -> Result<PathBuf, SessionError> {
        let path = self.path_for(&session.namespace);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, serde_json::to_vec_pretty(session)?)?;
        tracing::debug!("Recorded forward session at {}", path.display());
        Ok(path)
    }

    /// Removing a session that was never recorded is not an error.
    pub fn remove(&self, namespace: &str) -> Result<(), SessionError> {
        match fs::remove_file(self.path_for(namespace)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn load(&self, namespace: &str) -> Result<Option<ForwardSession>, SessionError> {
        let path = self.path_for(namespace);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    /// The recorded session for `namespace` if its owning process is still
    /// running. Stale or unreadable files are discarded.
    pub fn find_live(&self, namespace: &str) -> Option<ForwardSession> {
        match self.load(namespace) {
            Ok(Some(session)) if process_alive(session.pid) => Some(session),
            Ok(Some(session)) => {
                tracing::debug!(
                    "Discarding stale session for {} (pid {} gone)",
                    namespace,
                    session.pid
                );
                self.discard(namespace);
                None
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Ignoring unreadable session for {}: {}", namespace, e);
                self.discard(namespace);
                None
            }
        }
    }

    fn discard(&self, namespace: &str) {
        if let Err(e) = self.remove(namespace) {
            tracing::debug!("Could not remove session for {}: {}", namespace, e);
        }
    }
}

#[cfg(target_os = "linux")]
pub fn process_alive(pid: u32) -> bool {
    Path::new("/proc").join(pid.to_string()).exists()
}

#[cfg(not(target_os = "linux"))]
pub fn process_alive(pid: u32) -> bool {
    std::process::Command::new("ps")
        .args(["-p", &pid.to_string()])
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

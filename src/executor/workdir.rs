use super::ExecutorError;
use std::env;
use std::path::{Path, PathBuf};

/// Holds the process working directory inside `path` until dropped, then
/// switches back to the directory that was current on entry.
///
/// The working directory is process-wide, so only one guard should be alive
/// at a time.
#[derive(Debug)]
pub struct WorkdirGuard {
    previous: PathBuf,
}

impl WorkdirGuard {
    pub fn enter(path: &Path) -> Result<Self, ExecutorError> {
        let previous = env::current_dir().map_err(|e| ExecutorError::WorkingDirectory {
            path: PathBuf::from("."),
            message: e.to_string(),
        })?;
        env::set_current_dir(path).map_err(|e| ExecutorError::WorkingDirectory {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        tracing::debug!(
            "Entered {} (was {})",
            path.display(),
            previous.display()
        );
        Ok(Self { previous })
    }
}

impl Drop for WorkdirGuard {
    fn drop(&mut self) {
        match env::set_current_dir(&self.previous) {
            Ok(()) => tracing::debug!("Returned to {}", self.previous.display()),
            Err(e) => tracing::error!(
                "Failed to return to {}: {}",
                self.previous.display(),
                e
            ),
        }
    }
}

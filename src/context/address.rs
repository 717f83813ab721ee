//! Every derived address lives here and nowhere else. Workflows go through
//! [`ResolvedContext`](super::ResolvedContext) / [`Release`](super::Release),
//! which call these functions.

use super::ContextError;
use std::path::{Path, PathBuf};

pub const INFRASTRUCTURE_DIR: &str = "infrastructure";
pub const BUILD_DESCRIPTOR: &str = "Dockerfile";

/// `<root>/<application>/infrastructure/<environment>`
pub fn infrastructure_path(root: &Path, application: &str, environment: &str) -> PathBuf {
    root.join(application)
        .join(INFRASTRUCTURE_DIR)
        .join(environment)
}

/// `<application>-<version>`
pub fn namespace(application: &str, version: &str) -> String {
    format!("{}-{}", application, version)
}

/// `<application>:<tag>`
pub fn image_reference(application: &str, tag: &str) -> String {
    format!("{}:{}", application, tag)
}

/// The application directory doubles as the container build context.
pub fn build_context_path(root: &Path, application: &str) -> PathBuf {
    root.join(application)
}

pub fn build_descriptor_path(root: &Path, application: &str) -> PathBuf {
    build_context_path(root, application).join(BUILD_DESCRIPTOR)
}

pub fn require_existing(path: PathBuf) -> Result<PathBuf, ContextError> {
    if path.exists() {
        Ok(path)
    } else {
        Err(ContextError::PathNotFound(path))
    }
}

/// Like [`require_existing`], but a file at `path` does not count.
pub fn require_directory(path: PathBuf) -> Result<PathBuf, ContextError> {
    if path.is_dir() {
        Ok(path)
    } else {
        Err(ContextError::PathNotFound(path))
    }
}

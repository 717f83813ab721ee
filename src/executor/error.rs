use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum ExecutorError {
    #[error("Failed to start '{program}': {message}")]
    Spawn { program: String, message: String },

    #[error("Required tool(s) not found on PATH: {}", .0.join(", "))]
    ToolsMissing(Vec<String>),

    #[error("Cannot change working directory to {}: {message}", .path.display())]
    WorkingDirectory { path: PathBuf, message: String },
}

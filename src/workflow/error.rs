use crate::context::ContextError;
use crate::executor::{ExecutorError, OutputError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Empty identifiers and missing paths.
    #[error(transparent)]
    Context(#[from] ContextError),

    /// Spawn failures and missing tools.
    #[error(transparent)]
    Executor(#[from] ExecutorError),

    #[error("Unreadable command output: {0}")]
    Output(#[from] OutputError),

    #[error("Invalid arguments: {0}")]
    Argument(String),

    #[error("A {0} is required but none was entered")]
    UserInputRequired(String),

    #[error("Workspace '{0}' does not exist")]
    WorkspaceNotFound(String),

    #[error("Version '{version}' is not deployed (namespace '{namespace}' not found)")]
    NotDeployed { version: String, namespace: String },

    #[error("Command failed with exit code {code}: {command}")]
    ExternalCommand { command: String, code: i32 },

    #[error("Could not determine the current source revision: {0}")]
    RevisionUnavailable(String),
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;

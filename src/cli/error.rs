use crate::context::ContextError;
use crate::executor::ExecutorError;
use crate::workflow::WorkflowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("No command given. Run with --help to see the available commands.")]
    MissingCommand,

    #[error(transparent)]
    Workflow(#[from] WorkflowError),
}

impl From<ContextError> for CliError {
    fn from(err: ContextError) -> Self {
        CliError::Workflow(err.into())
    }
}

impl From<ExecutorError> for CliError {
    fn from(err: ExecutorError) -> Self {
        CliError::Workflow(err.into())
    }
}

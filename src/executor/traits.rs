use async_trait::async_trait;

use super::{CommandResult, ExecutorError, Invocation};

/// Uniform way of invoking the external control planes.
///
/// Both methods run the child in the current working directory of the
/// process and wait for it to exit. A non-zero exit is not an error at this
/// level: callers inspect [`CommandResult::is_success`] and decide.
#[async_trait]
pub trait CommandExecutor: Send {
    /// Run in the foreground with stdin/stdout/stderr inherited, so the
    /// tool's own output reaches the user verbatim. The returned result
    /// carries only the exit code.
    async fn run(&mut self, invocation: &Invocation) -> Result<CommandResult, ExecutorError>;

    /// Run with stdout and stderr captured for inspection.
    async fn capture(&mut self, invocation: &Invocation) -> Result<CommandResult, ExecutorError>;
}

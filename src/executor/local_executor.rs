use async_trait::async_trait;
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;

use super::error::ExecutorError;
use super::traits::CommandExecutor;
use super::types::{CommandOutput, CommandResult, Invocation};

/// Runs invocations as child processes of this one.
pub struct LocalCommandExecutor;

impl Default for LocalCommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalCommandExecutor {
    pub fn new() -> Self {
        Self
    }

    /// The child is killed if the future awaiting it is dropped, e.g. when
    /// a foreground run loses a `select!` against Ctrl-C.
    fn command(invocation: &Invocation) -> Command {
        let mut cmd = Command::new(invocation.program_name());
        cmd.args(invocation.arguments()).kill_on_drop(true);
        cmd
    }

    fn spawn_error(invocation: &Invocation, e: std::io::Error) -> ExecutorError {
        ExecutorError::Spawn {
            program: invocation.program_name().to_string(),
            message: e.to_string(),
        }
    }
}

#[async_trait]
impl CommandExecutor for LocalCommandExecutor {
    async fn run(&mut self, invocation: &Invocation) -> Result<CommandResult, ExecutorError> {
        tracing::debug!("Running: {}", invocation);
        let start_time = Instant::now();

        let status = Self::command(invocation)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| Self::spawn_error(invocation, e))?;

        let mut result = CommandResult::new(&invocation.to_string());
        result.output.exit_code = status.code().unwrap_or(-1);
        result.output.duration = start_time.elapsed();
        tracing::debug!(
            "'{}' exited with {} after {:?}",
            invocation,
            result.output.exit_code,
            result.output.duration
        );
        Ok(result)
    }

    async fn capture(&mut self, invocation: &Invocation) -> Result<CommandResult, ExecutorError> {
        tracing::debug!("Capturing: {}", invocation);
        let start_time = Instant::now();

        let output = Self::command(invocation)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| Self::spawn_error(invocation, e))?;

        let cmd_output = CommandOutput {
            stdout: output.stdout,
            stderr: output.stderr,
            exit_code: output.status.code().unwrap_or(-1),
            duration: start_time.elapsed(),
        };

        Ok(CommandResult {
            command: invocation.to_string(),
            output: cmd_output,
        })
    }
}

//! Scripted collaborators shared by unit tests.

use crate::executor::{CommandExecutor, CommandResult, ExecutorError, Invocation};
use crate::workflow::Prompt;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Run,
    Capture,
}

#[derive(Debug, Clone)]
pub struct Call {
    pub command: String,
    pub mode: Mode,
    pub cwd: PathBuf,
}

/// Answers invocations from a table keyed by the full command line and
/// records every call together with the working directory it ran in.
#[derive(Default)]
pub struct MockExecutor {
    responses: HashMap<String, Result<CommandResult, ExecutorError>>,
    calls: Vec<Call>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_response(&mut self, command: &str, result: Result<CommandResult, ExecutorError>) {
        self.responses.insert(command.to_string(), result);
    }

    pub fn add_success(&mut self, command: &str, stdout: &str) {
        let mut result = CommandResult::new(command);
        result.output.stdout = stdout.as_bytes().to_vec();
        self.add_response(command, Ok(result));
    }

    pub fn add_failure(&mut self, command: &str, exit_code: i32) {
        let mut result = CommandResult::new(command);
        result.output.exit_code = exit_code;
        self.add_response(command, Ok(result));
    }

    pub fn commands(&self) -> Vec<String> {
        self.calls.iter().map(|c| c.command.clone()).collect()
    }

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    pub fn ran(&self, command: &str) -> bool {
        self.calls.iter().any(|c| c.command == command)
    }

    fn respond(&mut self, invocation: &Invocation, mode: Mode) -> Result<CommandResult, ExecutorError> {
        let command = invocation.to_string();
        self.calls.push(Call {
            command: command.clone(),
            mode,
            cwd: std::env::current_dir().unwrap_or_default(),
        });
        self.responses.get(&command).cloned().unwrap_or_else(|| {
            Err(ExecutorError::Spawn {
                program: invocation.program_name().to_string(),
                message: format!("Mock response not found for command: {}", command),
            })
        })
    }
}

#[async_trait]
impl CommandExecutor for MockExecutor {
    async fn run(&mut self, invocation: &Invocation) -> Result<CommandResult, ExecutorError> {
        self.respond(invocation, Mode::Run)
    }

    async fn capture(&mut self, invocation: &Invocation) -> Result<CommandResult, ExecutorError> {
        self.respond(invocation, Mode::Capture)
    }
}

/// Hands out queued answers; `None` stands for end-of-input.
#[derive(Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<Option<String>>,
    pub asked: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answering(answer: &str) -> Self {
        let mut prompt = Self::new();
        prompt.answers.push_back(Some(answer.to_string()));
        prompt
    }
}

impl Prompt for ScriptedPrompt {
    fn ask(&mut self, label: &str) -> Option<String> {
        self.asked.push(label.to_string());
        self.answers.pop_front().flatten()
    }
}

/// A temp project root holding `demo-app/infrastructure/local` and
/// `demo-app/Dockerfile`, plus a context rooted there.
pub fn project_tree(version: Option<&str>) -> (tempfile::TempDir, crate::context::ResolvedContext) {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let app_dir = temp_dir.path().join("demo-app");
    std::fs::create_dir_all(app_dir.join("infrastructure/local")).unwrap();
    std::fs::write(app_dir.join("Dockerfile"), "FROM scratch\n").unwrap();
    let ctx =
        crate::context::ResolvedContext::resolve(None, None, version, temp_dir.path()).unwrap();
    (temp_dir, ctx)
}

pub fn probe_in(dir: &std::path::Path) -> crate::probe::DeploymentProbe {
    crate::probe::DeploymentProbe::new(crate::probe::SessionStore::new(dir.join("state")))
}

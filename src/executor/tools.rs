use super::ExecutorError;
use std::fmt;

/// External programs the workflows drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    /// Container builder.
    Docker,
    /// Infrastructure provisioner.
    Terraform,
    /// Cluster orchestrator.
    Kubectl,
    /// Source revision lookup for default build tags.
    Git,
}

impl Tool {
    pub const REQUIRED: [Tool; 4] = [Tool::Docker, Tool::Terraform, Tool::Kubectl, Tool::Git];

    pub fn binary(&self) -> &'static str {
        match self {
            Tool::Docker => "docker",
            Tool::Terraform => "terraform",
            Tool::Kubectl => "kubectl",
            Tool::Git => "git",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.binary())
    }
}

/// Returns every tool in `tools` that cannot be resolved on `PATH`.
pub fn missing_tools(tools: &[Tool]) -> Vec<Tool> {
    tools
        .iter()
        .copied()
        .filter(|tool| match which::which(tool.binary()) {
            Ok(path) => {
                tracing::trace!("Found {} at {}", tool, path.display());
                false
            }
            Err(e) => {
                tracing::debug!("{} not found: {}", tool, e);
                true
            }
        })
        .collect()
}

/// Fails with all missing tools listed, not just the first.
pub fn ensure_tools_available(tools: &[Tool]) -> Result<(), ExecutorError> {
    let missing = missing_tools(tools);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ExecutorError::ToolsMissing(
            missing.iter().map(|t| t.binary().to_string()).collect(),
        ))
    }
}

use super::{build, down, expose, logs, up, versions};
use crate::context::{ContextError, ResolvedContext};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Options before the command name set the context; everything after the
/// command name belongs to that command, so `build -v <tag>` is unrelated
/// to the scoped `-v <version>`.
#[derive(Parser, Debug)]
#[command(name = "stagehand")]
#[command(about = "Build, provision, inspect and tear down versioned deployments", long_about = None)]
#[command(disable_version_flag = true)]
pub struct Cli {
    /// Application name [default: demo-app]
    #[arg(short = 'a', long = "app", env = "STAGEHAND_APP")]
    pub app: Option<String>,

    /// Environment to deploy to [default: local]
    #[arg(short = 'e', long = "environment", env = "STAGEHAND_ENV")]
    pub environment: Option<String>,

    /// Version to operate on (prompted for when needed)
    #[arg(short = 'v', long = "version")]
    pub release_version: Option<String>,

    /// Project root that derived paths are resolved against
    #[arg(long = "root", env = "STAGEHAND_ROOT", hide = true)]
    pub root: Option<PathBuf>,

    /// Where port-forward sessions are recorded
    #[arg(long = "state-dir", env = "STAGEHAND_STATE_DIR", hide = true)]
    pub state_dir: Option<PathBuf>,

    /// Increase log verbosity (repeat for trace)
    #[arg(long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    pub fn resolve_context(&self) -> Result<ResolvedContext, ContextError> {
        ResolvedContext::resolve(
            self.app.as_deref(),
            self.environment.as_deref(),
            self.release_version.as_deref(),
            &self.root.clone().unwrap_or_default(),
        )
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Provision a version (creates its workspace if needed)
    Up(up::Up),

    /// Destroy a provisioned version
    Down(down::Down),

    /// Build the application image
    Build(build::Build),

    /// List provisioned versions and their status
    Versions(versions::Versions),

    /// Show logs of a deployed version
    Logs(logs::Logs),

    /// Forward a local port to a deployed version
    Expose(expose::Expose),
}

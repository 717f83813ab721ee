pub mod error;
pub mod local_executor;
pub mod tools;
pub mod traits;
pub mod types;
pub mod workdir;

pub use error::ExecutorError;
pub use local_executor::LocalCommandExecutor;
pub use tools::{ensure_tools_available, missing_tools, Tool};
pub use traits::CommandExecutor;
pub use types::{CommandOutput, CommandResult, Invocation, OutputError};
pub use workdir::WorkdirGuard;

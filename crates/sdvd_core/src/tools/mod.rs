//! External tool invocation.
//!
//! ```text
//! commands   stage command builders (Invocation)
//! invoker    native attempt, then at most one fallback attempt
//!   ├── runner     ProcessRunner trait, SystemRunner
//!   └── fallback   composed shell command, path translation
//! ```

pub mod commands;
mod errors;
mod fallback;
mod invocation;
mod invoker;
mod runner;
mod translate;

pub use commands::{check_tools, ToolCheck};
pub use errors::{ToolError, ToolResult};
pub use fallback::{native_command_line, ExecEnv, PathForm, ShellFallback};
pub use invocation::{Invocation, ToolArg};
pub use invoker::{StageResult, ToolInvoker};
pub use runner::{CommandLine, ProcessOutput, ProcessRunner, SystemRunner};
pub use translate::{shell_quote, PathTranslator};

//! Error handling for the monkd CLI.

use thiserror::Error;

/// Top-level error type for monkd's own `main`. Every pipeline phase has
/// its own error type (`MacroError`, `EvalError`, `CompileError`,
/// `VmError`); this just gives the binary crate one `Result` to wear.
#[derive(Error, Debug)]
pub enum MonkdError {
    #[error("could not read {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error(s):\n{0}")]
    Parse(String),

    #[error("macro expansion failed: {0}")]
    Macro(#[from] monk_macro::MacroError),

    #[error("evaluation failed: {0}")]
    Eval(#[from] monk_eval::EvalError),

    #[error("compilation failed: {0}")]
    Compile(#[from] monk_compiler::CompileError),

    #[error("vm error: {0}")]
    Vm(#[from] monk_vm::VmError),

    #[error("logging could not be initialized: {0}")]
    Logging(String),
}

pub type Result<T> = std::result::Result<T, MonkdError>;

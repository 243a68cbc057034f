//! monk-eval - the tree-walking evaluator, its built-in function table,
//! and the `quote`/`unquote` primitive the macro engine drives.

mod builtins;
mod error;
mod eval;
mod quote;

pub use builtins::{all as all_builtins, lookup as lookup_builtin};
pub use error::EvalError;
pub use eval::{apply_function, eval_block_statement, eval_program};

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum VmError {
    #[error("stack overflow")]
    StackOverflow,
    #[error("calling non-function and non-built-in")]
    NotCallable,
    #[error("wrong number of arguments: got {got}, want {want}")]
    WrongArity { got: usize, want: usize },
    #[error("{0}")]
    Runtime(String),
    #[error(transparent)]
    UnknownOpcode(#[from] monk_code::UnknownOpcode),
}

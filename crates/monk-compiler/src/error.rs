use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("undefined variable {0}")]
    UndefinedVariable(String),
    #[error("unknown operator {0}")]
    UnknownOperator(String),
    #[error("too many free variables for a closure")]
    TooManyFreeVariables,
}

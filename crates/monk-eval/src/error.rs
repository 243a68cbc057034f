use thiserror::Error;

/// Unrecoverable evaluation conditions. Distinct from [`monk_object::Object::Error`],
/// which is a first-class runtime value that propagates through `Eval` like
/// any other result - these abort interpretation outright, matching the
/// fatal-conditions list.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("cannot unquote value of type {0}")]
    UnsupportedUnquote(&'static str),
}

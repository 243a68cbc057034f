use thiserror::Error;

/// Fatal macro-expansion conditions. These abort expansion entirely,
/// matching the fatal-conditions list - a macro body is expected to
/// always produce a `Quote`, and anything it does besides that is a
/// programming error in the macro itself, not a recoverable runtime value.
#[derive(Debug, Error)]
pub enum MacroError {
    #[error("macro must return a quote")]
    NotAQuote,
    #[error(transparent)]
    Eval(#[from] monk_eval::EvalError),
}

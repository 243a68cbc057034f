//! Diagnostic accumulation.
//!
//! The parser never stops at the first error: it records a diagnostic and
//! keeps trying to produce statements so that a single run can surface every
//! problem in the input. `Handler` is the sink every phase reports into.

use std::fmt;

use crate::span::Span;

/// Severity of a [`Diagnostic`]. The pipeline only ever emits `Error`
/// today; `Warning` exists so a future lint pass has somewhere to go.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Error,
    Warning,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "error"),
            Level::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
    pub span: Span,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.level, self.message)
    }
}

/// Collects diagnostics emitted during lexing/parsing.
///
/// A single `Handler` is shared by a whole parse; `Parser::errors()` is
/// backed by [`Handler::messages`].
#[derive(Default, Debug)]
pub struct Handler {
    diagnostics: Vec<Diagnostic>,
}

impl Handler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, message: impl Into<String>, span: Span) {
        self.diagnostics.push(Diagnostic {
            level: Level::Error,
            message: message.into(),
            span,
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.level == Level::Error)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// The plain message text of every accumulated diagnostic, in the order
    /// they were reported - this is what `Parser::errors()` returns.
    pub fn messages(&self) -> Vec<String> {
        self.diagnostics.iter().map(|d| d.message.clone()).collect()
    }
}

//! monk-lexer - turns source bytes into a stream of [`Token`]s.

mod lexer;
mod token;

pub use lexer::Lexer;
pub use token::{lookup_ident, Token};

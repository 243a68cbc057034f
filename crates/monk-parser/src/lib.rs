//! monk-parser - AST types, a Pratt expression parser, and the bottom-up
//! `modify` rewriter the macro engine builds on.

mod ast;
mod modify;
mod parser;
mod precedence;
mod trace;

pub use ast::{
    ArrayLiteral, BlockStatement, BooleanLiteral, CallExpression, Expression, ExpressionStatement,
    FunctionLiteral, HashLiteral, Identifier, IfExpression, IndexExpression, InfixExpression,
    IntegerLiteral, LetStatement, MacroLiteral, PrefixExpression, Program, ReturnStatement,
    Statement, StringLiteral,
};
pub use modify::{modify, Node};
pub use parser::Parser;
pub use precedence::{precedence_of, Precedence};

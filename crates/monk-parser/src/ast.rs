//! AST node definitions.
//!
//! `Statement` and `Expression` are closed sums rather than an open trait
//! object hierarchy: every place that dispatches on a node kind (the
//! evaluator, the compiler, the macro expander) gets exhaustiveness
//! checking from the compiler instead of discovering a missing case at
//! runtime.

use std::fmt;

use monk_util::{Span, Symbol};

/// A parsed source file: an ordered sequence of top-level statements.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in &self.statements {
            write!(f, "{stmt}")?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    Let(LetStatement),
    Return(ReturnStatement),
    Expression(ExpressionStatement),
    Block(BlockStatement),
}

impl Statement {
    pub fn span(&self) -> Span {
        match self {
            Statement::Let(s) => s.span,
            Statement::Return(s) => s.span,
            Statement::Expression(s) => s.span,
            Statement::Block(s) => s.span,
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Let(s) => write!(f, "{s}"),
            Statement::Return(s) => write!(f, "{s}"),
            Statement::Expression(s) => write!(f, "{s}"),
            Statement::Block(s) => write!(f, "{s}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LetStatement {
    pub name: Identifier,
    pub value: Expression,
    pub span: Span,
}

impl fmt::Display for LetStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "let {} = {};", self.name, self.value)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReturnStatement {
    pub value: Expression,
    pub span: Span,
}

impl fmt::Display for ReturnStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "return {};", self.value)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExpressionStatement {
    pub expression: Expression,
    pub span: Span,
}

impl fmt::Display for ExpressionStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expression)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BlockStatement {
    pub statements: Vec<Statement>,
    pub span: Span,
}

impl fmt::Display for BlockStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in &self.statements {
            write!(f, "{stmt}")?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    Identifier(Identifier),
    IntegerLiteral(IntegerLiteral),
    Boolean(BooleanLiteral),
    StringLiteral(StringLiteral),
    ArrayLiteral(ArrayLiteral),
    HashLiteral(HashLiteral),
    Prefix(PrefixExpression),
    Infix(InfixExpression),
    If(IfExpression),
    FunctionLiteral(FunctionLiteral),
    Call(CallExpression),
    Index(IndexExpression),
    MacroLiteral(MacroLiteral),
}

impl Expression {
    pub fn span(&self) -> Span {
        match self {
            Expression::Identifier(e) => e.span,
            Expression::IntegerLiteral(e) => e.span,
            Expression::Boolean(e) => e.span,
            Expression::StringLiteral(e) => e.span,
            Expression::ArrayLiteral(e) => e.span,
            Expression::HashLiteral(e) => e.span,
            Expression::Prefix(e) => e.span,
            Expression::Infix(e) => e.span,
            Expression::If(e) => e.span,
            Expression::FunctionLiteral(e) => e.span,
            Expression::Call(e) => e.span,
            Expression::Index(e) => e.span,
            Expression::MacroLiteral(e) => e.span,
        }
    }

    /// The token literal this expression's leading token carries. The
    /// macro expander uses this (rather than full structural matching) to
    /// recognize `unquote(...)` calls, matching the reference's
    /// `TokenLiteral() == "unquote"` check.
    pub fn token_literal(&self) -> &str {
        match self {
            Expression::Identifier(e) => e.value.as_str(),
            _ => "",
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Identifier(e) => write!(f, "{e}"),
            Expression::IntegerLiteral(e) => write!(f, "{e}"),
            Expression::Boolean(e) => write!(f, "{e}"),
            Expression::StringLiteral(e) => write!(f, "{e}"),
            Expression::ArrayLiteral(e) => write!(f, "{e}"),
            Expression::HashLiteral(e) => write!(f, "{e}"),
            Expression::Prefix(e) => write!(f, "{e}"),
            Expression::Infix(e) => write!(f, "{e}"),
            Expression::If(e) => write!(f, "{e}"),
            Expression::FunctionLiteral(e) => write!(f, "{e}"),
            Expression::Call(e) => write!(f, "{e}"),
            Expression::Index(e) => write!(f, "{e}"),
            Expression::MacroLiteral(e) => write!(f, "{e}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Identifier {
    pub value: Symbol,
    pub span: Span,
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct IntegerLiteral {
    pub value: i64,
    pub span: Span,
}

impl fmt::Display for IntegerLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BooleanLiteral {
    pub value: bool,
    pub span: Span,
}

impl fmt::Display for BooleanLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StringLiteral {
    pub value: String,
    pub span: Span,
}

impl fmt::Display for StringLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ArrayLiteral {
    pub elements: Vec<Expression>,
    pub span: Span,
}

impl fmt::Display for ArrayLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items: Vec<String> = self.elements.iter().map(|e| e.to_string()).collect();
        write!(f, "[{}]", items.join(", "))
    }
}

/// `Pairs` is a `Vec` rather than a map: the spec doesn't require any
/// particular iteration order for evaluation, but the pretty-printer has to
/// produce *some* stable, parseable string, and a map with no defined
/// iteration order can't promise that.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HashLiteral {
    pub pairs: Vec<(Expression, Expression)>,
    pub span: Span,
}

impl fmt::Display for HashLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items: Vec<String> = self
            .pairs
            .iter()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect();
        write!(f, "{{{}}}", items.join(", "))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PrefixExpression {
    pub operator: String,
    pub right: Box<Expression>,
    pub span: Span,
}

impl fmt::Display for PrefixExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}{})", self.operator, self.right)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct InfixExpression {
    pub left: Box<Expression>,
    pub operator: String,
    pub right: Box<Expression>,
    pub span: Span,
}

impl fmt::Display for InfixExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {} {})", self.left, self.operator, self.right)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct IfExpression {
    pub condition: Box<Expression>,
    pub consequence: BlockStatement,
    pub alternative: Option<BlockStatement>,
    pub span: Span,
}

impl fmt::Display for IfExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "if{} {}", self.condition, self.consequence)?;
        if let Some(alt) = &self.alternative {
            write!(f, "else {alt}")?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionLiteral {
    pub parameters: Vec<Identifier>,
    pub body: BlockStatement,
    pub name: Option<Symbol>,
    pub span: Span,
}

impl fmt::Display for FunctionLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<String> = self.parameters.iter().map(|p| p.to_string()).collect();
        write!(f, "fn")?;
        if let Some(name) = self.name {
            write!(f, "<{name}>")?;
        }
        write!(f, "({}) {}", params.join(", "), self.body)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CallExpression {
    pub function: Box<Expression>,
    pub arguments: Vec<Expression>,
    pub span: Span,
}

impl fmt::Display for CallExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args: Vec<String> = self.arguments.iter().map(|a| a.to_string()).collect();
        write!(f, "{}({})", self.function, args.join(", "))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct IndexExpression {
    pub left: Box<Expression>,
    pub index: Box<Expression>,
    pub span: Span,
}

impl fmt::Display for IndexExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}[{}])", self.left, self.index)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MacroLiteral {
    pub parameters: Vec<Identifier>,
    pub body: BlockStatement,
    pub span: Span,
}

impl fmt::Display for MacroLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<String> = self.parameters.iter().map(|p| p.to_string()).collect();
        write!(f, "macro({}) {}", params.join(", "), self.body)
    }
}

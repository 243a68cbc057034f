//! `Modify`: a bottom-up AST rewriter used exclusively by the macro engine.
//!
//! Unlike the reference implementation, which mutates node fields in place,
//! this version rebuilds nodes as it goes - the macro engine only needs
//! structural equivalence, and rebuilding sidesteps any aliasing concerns
//! from a closed, owned AST.

use std::fmt;

use crate::ast::{
    ArrayLiteral, BlockStatement, Expression, FunctionLiteral, Identifier, IfExpression,
    IndexExpression, InfixExpression, LetStatement, PrefixExpression, Program, ReturnStatement,
    Statement,
};

/// Any AST node that `modify` can be called on.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Program(Program),
    Statement(Statement),
    Expression(Expression),
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Program(p) => write!(f, "{p}"),
            Node::Statement(s) => write!(f, "{s}"),
            Node::Expression(e) => write!(f, "{e}"),
        }
    }
}

impl Node {
    pub fn into_expression(self) -> Expression {
        match self {
            Node::Expression(e) => e,
            other => panic!("modify: expected an expression, got {other:?}"),
        }
    }

    pub fn into_statement(self) -> Statement {
        match self {
            Node::Statement(s) => s,
            other => panic!("modify: expected a statement, got {other:?}"),
        }
    }

    pub fn into_block(self) -> BlockStatement {
        match self.into_statement() {
            Statement::Block(b) => b,
            other => panic!("modify: expected a block statement, got {other:?}"),
        }
    }
}

/// Walks `node` bottom-up: every child slot listed in the recursion table
/// is replaced with `modify(child, f)` first, then `f(node)` is applied to
/// the (possibly rebuilt) node itself.
///
/// Recursion only visits the slots the macro engine actually needs to
/// rewrite - `Call` arguments and `HashLiteral` pairs are deliberately left
/// alone, matching the reference traversal.
pub fn modify(node: Node, f: &mut dyn FnMut(Node) -> Node) -> Node {
    match node {
        Node::Program(mut program) => {
            program.statements = program
                .statements
                .into_iter()
                .map(|s| modify(Node::Statement(s), f).into_statement())
                .collect();
            f(Node::Program(program))
        }
        Node::Statement(stmt) => {
            let stmt = modify_statement(stmt, f);
            f(Node::Statement(stmt))
        }
        Node::Expression(expr) => {
            let expr = modify_expression(expr, f);
            f(Node::Expression(expr))
        }
    }
}

fn modify_statement(stmt: Statement, f: &mut dyn FnMut(Node) -> Node) -> Statement {
    match stmt {
        Statement::Expression(mut es) => {
            es.expression = modify(Node::Expression(es.expression), f).into_expression();
            Statement::Expression(es)
        }
        Statement::Return(ReturnStatement { value, span }) => {
            let value = modify(Node::Expression(value), f).into_expression();
            Statement::Return(ReturnStatement { value, span })
        }
        Statement::Let(LetStatement { name, value, span }) => {
            let value = modify(Node::Expression(value), f).into_expression();
            Statement::Let(LetStatement { name, value, span })
        }
        Statement::Block(mut bs) => {
            bs.statements = bs
                .statements
                .into_iter()
                .map(|s| modify(Node::Statement(s), f).into_statement())
                .collect();
            Statement::Block(bs)
        }
    }
}

fn modify_expression(expr: Expression, f: &mut dyn FnMut(Node) -> Node) -> Expression {
    match expr {
        Expression::Infix(InfixExpression {
            left,
            operator,
            right,
            span,
        }) => {
            let left = Box::new(modify(Node::Expression(*left), f).into_expression());
            let right = Box::new(modify(Node::Expression(*right), f).into_expression());
            Expression::Infix(InfixExpression {
                left,
                operator,
                right,
                span,
            })
        }
        Expression::Prefix(PrefixExpression {
            operator,
            right,
            span,
        }) => {
            let right = Box::new(modify(Node::Expression(*right), f).into_expression());
            Expression::Prefix(PrefixExpression {
                operator,
                right,
                span,
            })
        }
        Expression::Index(IndexExpression { left, index, span }) => {
            let left = Box::new(modify(Node::Expression(*left), f).into_expression());
            let index = Box::new(modify(Node::Expression(*index), f).into_expression());
            Expression::Index(IndexExpression { left, index, span })
        }
        Expression::If(IfExpression {
            condition,
            consequence,
            alternative,
            span,
        }) => {
            let condition = Box::new(modify(Node::Expression(*condition), f).into_expression());
            let consequence = modify(Node::Statement(Statement::Block(consequence)), f).into_block();
            let alternative = alternative
                .map(|alt| modify(Node::Statement(Statement::Block(alt)), f).into_block());
            Expression::If(IfExpression {
                condition,
                consequence,
                alternative,
                span,
            })
        }
        Expression::FunctionLiteral(FunctionLiteral {
            parameters,
            body,
            name,
            span,
        }) => {
            let parameters = parameters
                .into_iter()
                .map(|p| match modify(Node::Expression(Expression::Identifier(p)), f).into_expression() {
                    Expression::Identifier(ident) => ident,
                    other => panic!("modify: function parameter rewritten to non-identifier {other:?}"),
                })
                .collect();
            let body = modify(Node::Statement(Statement::Block(body)), f).into_block();
            Expression::FunctionLiteral(FunctionLiteral {
                parameters,
                body,
                name,
                span,
            })
        }
        Expression::ArrayLiteral(ArrayLiteral { elements, span }) => {
            let elements = elements
                .into_iter()
                .map(|e| modify(Node::Expression(e), f).into_expression())
                .collect();
            Expression::ArrayLiteral(ArrayLiteral { elements, span })
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use monk_util::Span;

    fn int(value: i64) -> Expression {
        Expression::IntegerLiteral(crate::ast::IntegerLiteral {
            value,
            span: Span::DUMMY,
        })
    }

    fn turn_ones_into_twos(node: Node) -> Node {
        match node {
            Node::Expression(Expression::IntegerLiteral(lit)) if lit.value == 1 => {
                Node::Expression(int(2))
            }
            other => other,
        }
    }

    fn into_program(node: Node) -> Program {
        match node {
            Node::Program(p) => p,
            other => panic!("expected program, got {other:?}"),
        }
    }

    #[test]
    fn rewrites_every_integer_literal_in_a_program() {
        let program = Program {
            statements: vec![Statement::Expression(crate::ast::ExpressionStatement {
                expression: Expression::Infix(InfixExpression {
                    left: Box::new(int(1)),
                    operator: "+".into(),
                    right: Box::new(int(1)),
                    span: Span::DUMMY,
                }),
                span: Span::DUMMY,
            })],
        };

        let modified = modify(Node::Program(program), &mut turn_ones_into_twos);
        assert_eq!(into_program(modified).to_string(), "(2 + 2)");
    }

    #[test]
    fn identity_function_preserves_tree_shape() {
        let program = Program {
            statements: vec![Statement::Expression(crate::ast::ExpressionStatement {
                expression: Expression::ArrayLiteral(ArrayLiteral {
                    elements: vec![int(1), int(2), int(3)],
                    span: Span::DUMMY,
                }),
                span: Span::DUMMY,
            })],
        };

        let modified = modify(Node::Program(program.clone()), &mut |n| n);
        assert_eq!(into_program(modified), program);
    }
}

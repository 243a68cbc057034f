//! `quote`/`unquote`: the primitive the macro engine builds on.
//!
//! `quote(e)` is recognized directly in `Call` evaluation rather than
//! living in the builtins table - unlike a builtin, it must see its
//! argument unevaluated (as AST), not as a value.

use std::io::Write;

use monk_parser::{CallExpression, Expression, IntegerLiteral, Node};
use monk_util::Span;

use crate::error::EvalError;
use crate::eval::eval_expression;
use monk_object::{Environment, Object};

pub fn is_quote_call(call: &CallExpression) -> bool {
    matches!(&*call.function, Expression::Identifier(ident) if ident.value.as_str() == "quote")
        && call.arguments.len() == 1
}

pub fn eval_quote(
    call: &CallExpression,
    env: &Environment,
    out: &mut dyn Write,
) -> Result<Object, EvalError> {
    let node = Node::Expression(call.arguments[0].clone());
    let quoted = eval_unquote_calls(node, env, out)?;
    Ok(Object::Quote(std::rc::Rc::new(quoted)))
}

fn eval_unquote_calls(
    node: Node,
    env: &Environment,
    out: &mut dyn Write,
) -> Result<Node, EvalError> {
    let mut err = None;
    let result = monk_parser::modify(node, &mut |n| {
        if err.is_some() {
            return n;
        }
        match &n {
            Node::Expression(Expression::Call(call)) if is_unquote_call(call) => {
                let outcome = eval_expression(&call.arguments[0], env, out)
                    .and_then(object_to_node);
                match outcome {
                    Ok(replacement) => Node::Expression(replacement),
                    Err(e) => {
                        err = Some(e);
                        n
                    }
                }
            }
            _ => n,
        }
    });
    match err {
        Some(e) => Err(e),
        None => Ok(result),
    }
}

fn is_unquote_call(call: &CallExpression) -> bool {
    matches!(&*call.function, Expression::Identifier(ident) if ident.value.as_str() == "unquote")
        && call.arguments.len() == 1
}

/// Converts an evaluated runtime value back into the AST node that stands
/// for it after splicing. `Quote` values splice their wrapped node
/// directly, which is what makes `unquote(quote(x))` a no-op round-trip.
fn object_to_node(obj: Object) -> Result<Expression, EvalError> {
    match obj {
        Object::Integer(value) => Ok(Expression::IntegerLiteral(IntegerLiteral {
            value,
            span: Span::DUMMY,
        })),
        Object::Boolean(value) => Ok(Expression::Boolean(monk_parser::BooleanLiteral {
            value,
            span: Span::DUMMY,
        })),
        Object::Quote(node) => match node.as_ref() {
            Node::Expression(expr) => Ok(expr.clone()),
            other => Err(EvalError::UnsupportedUnquote(match other {
                Node::Program(_) => "PROGRAM",
                Node::Statement(_) => "STATEMENT",
                Node::Expression(_) => unreachable!(),
            })),
        },
        other => Err(EvalError::UnsupportedUnquote(other.type_name())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use monk_parser::Parser;

    fn quote_result(input: &str) -> Object {
        let mut parser = Parser::new(input);
        let program = parser.parse_program();
        assert!(parser.errors().is_empty(), "{:?}", parser.errors());
        let env = Environment::new();
        let mut sink = Vec::new();
        crate::eval::eval_program(&program, &env, &mut sink).unwrap()
    }

    #[test]
    fn quote_returns_the_unevaluated_expression() {
        let obj = quote_result("quote(5 + 5)");
        match obj {
            Object::Quote(node) => assert_eq!(node.to_string(), "(5 + 5)"),
            other => panic!("expected Quote, got {other:?}"),
        }
    }

    #[test]
    fn unquote_splices_an_evaluated_integer() {
        let obj = quote_result("quote(unquote(4 + 4) + 8)");
        match obj {
            Object::Quote(node) => assert_eq!(node.to_string(), "(8 + 8)"),
            other => panic!("expected Quote, got {other:?}"),
        }
    }

    #[test]
    fn unquote_of_a_quote_splices_the_wrapped_node() {
        let obj = quote_result("quote(unquote(quote(4 + 4)))");
        match obj {
            Object::Quote(node) => assert_eq!(node.to_string(), "(4 + 4)"),
            other => panic!("expected Quote, got {other:?}"),
        }
    }
}

//! monk-macro - the two-phase `quote`/`unquote` macro engine: extracting
//! `let`-bound macro definitions out of a program, then expanding every
//! call site that resolves to one of them.

mod error;

use std::rc::Rc;

use monk_object::{Environment, MacroObj, Object};
use monk_parser::{modify, CallExpression, Expression, Identifier, Node, Program, Statement};

pub use error::MacroError;

/// Walks top-level statements, binding every `let NAME = macro(...) {...}`
/// as a `Macro` object under `NAME` in `env` and removing the statement
/// from the program. Definitions are removed in reverse index order so
/// that removing one doesn't shift the index of the next one to remove.
pub fn define_macros(program: &mut Program, env: &Environment) {
    let macro_indices: Vec<usize> = program
        .statements
        .iter()
        .enumerate()
        .filter(|(_, stmt)| is_macro_definition(stmt))
        .map(|(i, _)| i)
        .collect();

    for &i in macro_indices.iter().rev() {
        if let Statement::Let(ls) = &program.statements[i] {
            if let Expression::MacroLiteral(ml) = &ls.value {
                let macro_obj = Object::Macro(Rc::new(MacroObj {
                    parameters: ml.parameters.clone(),
                    body: ml.body.clone(),
                    env: env.clone(),
                }));
                env.set(ls.name.value, macro_obj);
            }
        }
        program.statements.remove(i);
    }
}

fn is_macro_definition(stmt: &Statement) -> bool {
    matches!(stmt, Statement::Let(ls) if matches!(ls.value, Expression::MacroLiteral(_)))
}

/// Rewrites every macro call site in `program` with the AST its macro body
/// produces. Must run after [`define_macros`] so `env` already holds the
/// macro bindings.
pub fn expand_macros(program: Program, env: &Environment) -> Result<Program, MacroError> {
    let mut fatal = None;

    let node = modify(Node::Program(program), &mut |n| {
        if fatal.is_some() {
            return n;
        }
        let Node::Expression(Expression::Call(call)) = &n else {
            return n;
        };
        match quote_macro_call(call, env) {
            Ok(Some(replacement)) => Node::Expression(replacement),
            Ok(None) => n,
            Err(e) => {
                fatal = Some(e);
                n
            }
        }
    });

    match fatal {
        Some(e) => Err(e),
        None => Ok(into_program(node)),
    }
}

/// `Some(Ok(_))` if `call` resolves to a macro and expanded cleanly,
/// `Ok(None)` if it isn't a macro call at all (left untouched), `Err(_)`
/// if it is a macro call but its body misbehaved.
fn quote_macro_call(
    call: &CallExpression,
    env: &Environment,
) -> Result<Option<Expression>, MacroError> {
    let Expression::Identifier(Identifier { value: name, .. }) = call.function.as_ref() else {
        return Ok(None);
    };
    let Some(Object::Macro(macro_obj)) = env.get(*name) else {
        return Ok(None);
    };

    let extended_env = Environment::new_enclosed(&macro_obj.env);
    for (param, arg) in macro_obj.parameters.iter().zip(&call.arguments) {
        let quote = Object::Quote(Rc::new(Node::Expression(arg.clone())));
        extended_env.set(param.value, quote);
    }

    let mut sink = std::io::sink();
    let evaluated = monk_eval::eval_block_statement(&macro_obj.body, &extended_env, &mut sink)?;

    match evaluated {
        Object::Quote(node) => match node.as_ref() {
            Node::Expression(expr) => Ok(Some(expr.clone())),
            _ => Err(MacroError::NotAQuote),
        },
        _ => Err(MacroError::NotAQuote),
    }
}

fn into_program(node: Node) -> Program {
    match node {
        Node::Program(p) => p,
        other => panic!("expand_macros: modify changed the root node kind to {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use monk_parser::Parser;

    fn run(input: &str) -> Program {
        let mut parser = Parser::new(input);
        let mut program = parser.parse_program();
        assert!(parser.errors().is_empty(), "{:?}", parser.errors());
        let env = Environment::new();
        define_macros(&mut program, &env);
        expand_macros(program, &env).expect("macro expansion should not be fatal")
    }

    #[test]
    fn macro_definitions_are_removed_from_the_program() {
        let program = run(
            r#"
            let number = 1;
            let function = fn(x, y) { x + y };
            let myMacro = macro(x, y) { x + y; };
            "#,
        );
        assert_eq!(program.statements.len(), 2);
    }

    #[test]
    fn reverse_swaps_unquoted_arguments() {
        let program = run(
            r#"
            let reverse = macro(a, b) { quote(unquote(b) - unquote(a)); };
            reverse(2 + 2, 10 - 5);
            "#,
        );
        assert_eq!(program.to_string(), "((10 - 5) - (2 + 2))");
    }

    #[test]
    fn unless_macro_rewrites_to_an_if_expression() {
        let program = run(
            r#"
            let unless = macro(condition, consequence, alternative) {
                quote(if (!(unquote(condition))) {
                    unquote(consequence);
                } else {
                    unquote(alternative);
                });
            };
            unless(10 > 5, puts("not greater"), puts("greater"));
            "#,
        );
        assert!(program.to_string().starts_with("if(!(10 > 5))"));
    }

    #[test]
    fn non_macro_calls_are_left_untouched() {
        let program = run("let add = fn(a, b) { a + b }; add(1, 2);");
        assert_eq!(
            program.to_string(),
            "let add = fn<add>(a, b) (a + b);add(1, 2)"
        );
    }

    #[test]
    fn expand_macros_is_idempotent() {
        let mut parser = Parser::new(
            r#"
            let reverse = macro(a, b) { quote(unquote(b) - unquote(a)); };
            reverse(2 + 2, 10 - 5);
            "#,
        );
        let mut program = parser.parse_program();
        let env = Environment::new();
        define_macros(&mut program, &env);
        let once = expand_macros(program, &env).expect("first expansion should not be fatal");
        let twice =
            expand_macros(once.clone(), &env).expect("second expansion should not be fatal");
        assert_eq!(once, twice);
    }

    #[test]
    fn macro_body_not_returning_a_quote_is_fatal() {
        let mut parser = Parser::new(
            r#"
            let bad = macro() { 1 + 1; };
            bad();
            "#,
        );
        let mut program = parser.parse_program();
        let env = Environment::new();
        define_macros(&mut program, &env);
        let err = expand_macros(program, &env).unwrap_err();
        assert!(matches!(err, MacroError::NotAQuote));
    }
}

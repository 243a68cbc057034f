//! Tree-walking evaluator.
//!
//! Dispatch mirrors the AST shape directly: a `Program` is evaluated
//! statement by statement by [`eval_program`], a `Block` by
//! [`eval_block_statement`] - the two differ only in how they treat a
//! `ReturnValue`, which is exactly what lets `return` unwind past nested
//! `if` blocks but stop at a function boundary.
//!
//! Every function here returns `Result<Object, EvalError>`. This is not
//! the runtime error surface the language itself exposes - that's
//! `Object::Error`, a first-class value that propagates by ordinary
//! short-circuiting, exactly as spec'd. `EvalError` is reserved for the
//! handful of conditions the spec calls fatal (currently: `unquote` of an
//! unsupported value type), which abort the whole evaluation instead of
//! producing a value at all.

use std::io::Write;
use std::rc::Rc;

use monk_object::{Environment, FunctionObj, HashObj, Object};
use monk_parser::{BlockStatement, Expression, HashLiteral, Program, Statement};

use crate::builtins;
use crate::error::EvalError;
use crate::quote;

pub fn eval_program(
    program: &Program,
    env: &Environment,
    out: &mut dyn Write,
) -> Result<Object, EvalError> {
    let mut result = Object::Null;
    for stmt in &program.statements {
        result = eval_statement(stmt, env, out)?;
        match result {
            Object::ReturnValue(value) => return Ok(*value),
            Object::Error(_) => return Ok(result),
            _ => {}
        }
    }
    Ok(result)
}

pub fn eval_block_statement(
    block: &BlockStatement,
    env: &Environment,
    out: &mut dyn Write,
) -> Result<Object, EvalError> {
    let mut result = Object::Null;
    for stmt in &block.statements {
        result = eval_statement(stmt, env, out)?;
        if matches!(result, Object::ReturnValue(_) | Object::Error(_)) {
            return Ok(result);
        }
    }
    Ok(result)
}

fn eval_statement(
    stmt: &Statement,
    env: &Environment,
    out: &mut dyn Write,
) -> Result<Object, EvalError> {
    match stmt {
        Statement::Expression(es) => eval_expression(&es.expression, env, out),
        Statement::Return(rs) => {
            let value = eval_expression(&rs.value, env, out)?;
            if is_error(&value) {
                return Ok(value);
            }
            Ok(Object::ReturnValue(Box::new(value)))
        }
        Statement::Let(ls) => {
            let value = eval_expression(&ls.value, env, out)?;
            if is_error(&value) {
                return Ok(value);
            }
            env.set(ls.name.value, value);
            Ok(Object::Null)
        }
        Statement::Block(block) => eval_block_statement(block, env, out),
    }
}

pub(crate) fn eval_expression(
    expr: &Expression,
    env: &Environment,
    out: &mut dyn Write,
) -> Result<Object, EvalError> {
    match expr {
        Expression::IntegerLiteral(lit) => Ok(Object::Integer(lit.value)),
        Expression::Boolean(lit) => Ok(Object::Boolean(lit.value)),
        Expression::StringLiteral(lit) => Ok(Object::string(lit.value.clone())),
        Expression::Identifier(ident) => Ok(eval_identifier(ident.value, env)),
        Expression::Prefix(pe) => {
            let right = eval_expression(&pe.right, env, out)?;
            if is_error(&right) {
                return Ok(right);
            }
            Ok(eval_prefix_expression(&pe.operator, right))
        }
        Expression::Infix(ie) => {
            let left = eval_expression(&ie.left, env, out)?;
            if is_error(&left) {
                return Ok(left);
            }
            let right = eval_expression(&ie.right, env, out)?;
            if is_error(&right) {
                return Ok(right);
            }
            Ok(eval_infix_expression(&ie.operator, left, right))
        }
        Expression::If(if_expr) => {
            let condition = eval_expression(&if_expr.condition, env, out)?;
            if is_error(&condition) {
                return Ok(condition);
            }
            if condition.is_truthy() {
                eval_block_statement(&if_expr.consequence, env, out)
            } else if let Some(alt) = &if_expr.alternative {
                eval_block_statement(alt, env, out)
            } else {
                Ok(Object::Null)
            }
        }
        Expression::FunctionLiteral(fl) => Ok(Object::Function(Rc::new(FunctionObj {
            parameters: fl.parameters.clone(),
            body: fl.body.clone(),
            env: env.clone(),
        }))),
        Expression::Call(call) if quote::is_quote_call(call) => quote::eval_quote(call, env, out),
        Expression::Call(call) => {
            let function = eval_expression(&call.function, env, out)?;
            if is_error(&function) {
                return Ok(function);
            }
            let args = match eval_expressions(&call.arguments, env, out)? {
                Ok(args) => args,
                Err(err) => return Ok(err),
            };
            Ok(apply_function(function, args, out))
        }
        Expression::ArrayLiteral(arr) => {
            let elements = match eval_expressions(&arr.elements, env, out)? {
                Ok(elements) => elements,
                Err(err) => return Ok(err),
            };
            Ok(Object::Array(Rc::new(elements)))
        }
        Expression::HashLiteral(hash) => eval_hash_literal(hash, env, out),
        Expression::Index(idx) => {
            let left = eval_expression(&idx.left, env, out)?;
            if is_error(&left) {
                return Ok(left);
            }
            let index = eval_expression(&idx.index, env, out)?;
            if is_error(&index) {
                return Ok(index);
            }
            Ok(eval_index_expression(left, index))
        }
        Expression::MacroLiteral(_) => Ok(Object::error(
            "macro literal encountered outside macro expansion",
        )),
    }
}

fn eval_identifier(name: monk_util::Symbol, env: &Environment) -> Object {
    if let Some(value) = env.get(name) {
        return value;
    }
    if let Some(builtin) = builtins::lookup(name.as_str()) {
        return Object::Builtin(builtin);
    }
    Object::error(format!("identifier not found: {name}"))
}

/// `Ok(Ok(values))` on success, `Ok(Err(error_object))` if one of the
/// expressions evaluated to a first-class `Error`, `Err(_)` on a fatal
/// evaluation condition. The nested `Result` keeps those two very
/// different kinds of failure from being conflated into one `?`.
fn eval_expressions(
    exprs: &[Expression],
    env: &Environment,
    out: &mut dyn Write,
) -> Result<Result<Vec<Object>, Object>, EvalError> {
    let mut result = Vec::with_capacity(exprs.len());
    for expr in exprs {
        let value = eval_expression(expr, env, out)?;
        if is_error(&value) {
            return Ok(Err(value));
        }
        result.push(value);
    }
    Ok(Ok(result))
}

fn eval_prefix_expression(operator: &str, right: Object) -> Object {
    match operator {
        "!" => Object::Boolean(!right.is_truthy()),
        "-" => match right {
            Object::Integer(v) => Object::Integer(-v),
            other => Object::error(format!("unknown operator: -{}", other.type_name())),
        },
        other => Object::error(format!("unknown operator: {other}{}", right.type_name())),
    }
}

fn eval_infix_expression(operator: &str, left: Object, right: Object) -> Object {
    match (&left, &right) {
        (Object::Integer(l), Object::Integer(r)) => eval_integer_infix(operator, *l, *r),
        (Object::String(l), Object::String(r)) => eval_string_infix(operator, l, r),
        (Object::Boolean(l), Object::Boolean(r)) => match operator {
            "==" => Object::Boolean(l == r),
            "!=" => Object::Boolean(l != r),
            other => Object::error(format!("unknown operator: BOOLEAN {other} BOOLEAN")),
        },
        _ if left.type_name() != right.type_name() => Object::error(format!(
            "type mismatch: {} {operator} {}",
            left.type_name(),
            right.type_name()
        )),
        _ => Object::error(format!(
            "unknown operator: {} {operator} {}",
            left.type_name(),
            right.type_name()
        )),
    }
}

fn eval_integer_infix(operator: &str, left: i64, right: i64) -> Object {
    match operator {
        "+" => Object::Integer(left.wrapping_add(right)),
        "-" => Object::Integer(left.wrapping_sub(right)),
        "*" => Object::Integer(left.wrapping_mul(right)),
        "/" => {
            if right == 0 {
                Object::error("division by zero")
            } else {
                Object::Integer(left.wrapping_div(right))
            }
        }
        "<" => Object::Boolean(left < right),
        ">" => Object::Boolean(left > right),
        "==" => Object::Boolean(left == right),
        "!=" => Object::Boolean(left != right),
        other => Object::error(format!("unknown operator: INTEGER {other} INTEGER")),
    }
}

fn eval_string_infix(operator: &str, left: &str, right: &str) -> Object {
    match operator {
        "+" => Object::string(format!("{left}{right}")),
        other => Object::error(format!("unknown operator: STRING {other} STRING")),
    }
}

fn eval_index_expression(left: Object, index: Object) -> Object {
    match (&left, &index) {
        (Object::Array(elements), Object::Integer(i)) => {
            if *i < 0 || *i as usize >= elements.len() {
                Object::Null
            } else {
                elements[*i as usize].clone()
            }
        }
        (Object::Hash(hash), key) => match key.hash_key() {
            Some(hk) => hash
                .pairs
                .get(&hk)
                .map(|(_, v)| v.clone())
                .unwrap_or(Object::Null),
            None => Object::error(format!("unusable as hash key: {}", key.type_name())),
        },
        _ => Object::error(format!(
            "index operator not supported: {}",
            left.type_name()
        )),
    }
}

fn eval_hash_literal(
    hash: &HashLiteral,
    env: &Environment,
    out: &mut dyn Write,
) -> Result<Object, EvalError> {
    let mut pairs = std::collections::HashMap::new();
    for (key_expr, value_expr) in &hash.pairs {
        let key = eval_expression(key_expr, env, out)?;
        if is_error(&key) {
            return Ok(key);
        }
        let Some(hash_key) = key.hash_key() else {
            return Ok(Object::error(format!(
                "unusable as hash key: {}",
                key.type_name()
            )));
        };
        let value = eval_expression(value_expr, env, out)?;
        if is_error(&value) {
            return Ok(value);
        }
        pairs.insert(hash_key, (key, value));
    }
    Ok(Object::Hash(Rc::new(HashObj { pairs })))
}

pub fn apply_function(func: Object, args: Vec<Object>, out: &mut dyn Write) -> Object {
    match func {
        Object::Function(f) => {
            if f.parameters.len() != args.len() {
                return Object::error(format!(
                    "wrong number of arguments: got {}, want {}",
                    args.len(),
                    f.parameters.len()
                ));
            }
            let extended_env = Environment::new_enclosed(&f.env);
            for (param, arg) in f.parameters.iter().zip(args) {
                extended_env.set(param.value, arg);
            }
            // A fatal `EvalError` inside a function body (only reachable
            // via a stray top-level `quote`/`unquote`) surfaces as a
            // runtime Error object here rather than aborting the whole
            // program - only macro expansion itself treats it as fatal.
            match eval_block_statement(&f.body, &extended_env, out) {
                Ok(Object::ReturnValue(value)) => *value,
                Ok(other) => other,
                Err(e) => Object::error(e.to_string()),
            }
        }
        Object::Builtin(builtin) => (builtin.func)(&args, out),
        other => Object::error(format!("not a function: {}", other.type_name())),
    }
}

fn is_error(obj: &Object) -> bool {
    matches!(obj, Object::Error(_))
}

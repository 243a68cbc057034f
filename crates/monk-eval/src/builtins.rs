//! Built-in functions available to every program without an explicit
//! `let`. Looked up by name only when an identifier isn't bound in the
//! environment, matching the reference's fallback order.

use std::io::Write;

use monk_object::{Builtin, Object};

pub fn lookup(name: &str) -> Option<Builtin> {
    BUILTINS.iter().find(|b| b.name == name).copied()
}

/// The full builtin table in its fixed, ascending order - the compiler's
/// symbol table assigns `BuiltinScope` indices by position in this slice,
/// and the VM's `OpGetBuiltin i` indexes into it the same way.
pub fn all() -> &'static [Builtin] {
    BUILTINS
}

static BUILTINS: &[Builtin] = &[
    Builtin {
        name: "len",
        func: builtin_len,
    },
    Builtin {
        name: "first",
        func: builtin_first,
    },
    Builtin {
        name: "last",
        func: builtin_last,
    },
    Builtin {
        name: "rest",
        func: builtin_rest,
    },
    Builtin {
        name: "push",
        func: builtin_push,
    },
    Builtin {
        name: "puts",
        func: builtin_puts,
    },
];

fn wrong_arity(got: usize, want: &str) -> Object {
    Object::error(format!("wrong number of arguments: got {got}, want {want}"))
}

fn builtin_len(args: &[Object], _out: &mut dyn Write) -> Object {
    if args.len() != 1 {
        return wrong_arity(args.len(), "1");
    }
    match &args[0] {
        Object::String(s) => Object::Integer(s.len() as i64),
        Object::Array(elements) => Object::Integer(elements.len() as i64),
        other => Object::error(format!(
            "argument to `len` not supported, got {}",
            other.type_name()
        )),
    }
}

fn builtin_first(args: &[Object], _out: &mut dyn Write) -> Object {
    if args.len() != 1 {
        return wrong_arity(args.len(), "1");
    }
    match &args[0] {
        Object::Array(elements) => elements.first().cloned().unwrap_or(Object::Null),
        other => Object::error(format!(
            "argument to `first` must be ARRAY, got {}",
            other.type_name()
        )),
    }
}

fn builtin_last(args: &[Object], _out: &mut dyn Write) -> Object {
    if args.len() != 1 {
        return wrong_arity(args.len(), "1");
    }
    match &args[0] {
        Object::Array(elements) => elements.last().cloned().unwrap_or(Object::Null),
        other => Object::error(format!(
            "argument to `last` must be ARRAY, got {}",
            other.type_name()
        )),
    }
}

fn builtin_rest(args: &[Object], _out: &mut dyn Write) -> Object {
    if args.len() != 1 {
        return wrong_arity(args.len(), "1");
    }
    match &args[0] {
        Object::Array(elements) => {
            if elements.is_empty() {
                Object::Null
            } else {
                Object::Array(std::rc::Rc::new(elements[1..].to_vec()))
            }
        }
        other => Object::error(format!(
            "argument to `rest` must be ARRAY, got {}",
            other.type_name()
        )),
    }
}

fn builtin_push(args: &[Object], _out: &mut dyn Write) -> Object {
    if args.len() != 2 {
        return wrong_arity(args.len(), "2");
    }
    match &args[0] {
        Object::Array(elements) => {
            let mut new_elements = elements.as_ref().clone();
            new_elements.push(args[1].clone());
            Object::Array(std::rc::Rc::new(new_elements))
        }
        other => Object::error(format!(
            "argument to `push` must be ARRAY, got {}",
            other.type_name()
        )),
    }
}

fn builtin_puts(args: &[Object], out: &mut dyn Write) -> Object {
    for arg in args {
        let _ = writeln!(out, "{arg}");
    }
    Object::Null
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn len_on_string_counts_bytes() {
        let mut sink = Vec::new();
        let result = (lookup("len").unwrap().func)(&[Object::string("four")], &mut sink);
        assert_eq!(result, Object::Integer(4));
    }

    #[test]
    fn len_rejects_unsupported_type() {
        let mut sink = Vec::new();
        let result = (lookup("len").unwrap().func)(&[Object::Integer(1)], &mut sink);
        assert_eq!(
            result,
            Object::error("argument to `len` not supported, got INTEGER")
        );
    }

    #[test]
    fn push_does_not_mutate_the_original_array() {
        let arr = Object::Array(std::rc::Rc::new(vec![Object::Integer(1)]));
        let mut sink = Vec::new();
        let result = (lookup("push").unwrap().func)(&[arr.clone(), Object::Integer(2)], &mut sink);
        assert_eq!(
            result,
            Object::Array(std::rc::Rc::new(vec![Object::Integer(1), Object::Integer(2)]))
        );
        assert_eq!(arr, Object::Array(std::rc::Rc::new(vec![Object::Integer(1)])));
    }

    #[test]
    fn puts_writes_each_argument_on_its_own_line() {
        let mut sink = Vec::new();
        (lookup("puts").unwrap().func)(&[Object::Integer(1), Object::Integer(2)], &mut sink);
        assert_eq!(String::from_utf8(sink).unwrap(), "1\n2\n");
    }
}

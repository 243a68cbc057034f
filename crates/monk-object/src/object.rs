//! Runtime value representation shared by the tree-walking evaluator and
//! the bytecode VM.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use monk_code::Instructions;
use monk_parser::{BlockStatement, Identifier, Node};
use monk_util::Symbol;

use crate::environment::Environment;
use crate::hashkey::HashKey;

/// A built-in function. Plain `fn` pointers (not closures) so `Object`
/// stays `Clone` without reference counting every builtin call; `puts`
/// gets its output sink passed in rather than reaching for `println!`
/// directly, so callers can capture it (tests, embedding).
pub type BuiltinFn = fn(&[Object], &mut dyn std::io::Write) -> Object;

#[derive(Clone, Debug, PartialEq)]
pub enum Object {
    Integer(i64),
    Boolean(bool),
    String(Rc<str>),
    Null,
    /// Sentinel wrapper produced by `return`; never observable by user code
    /// - `Eval`'s `Program` case unwraps it, `Block` propagates it intact.
    ReturnValue(Box<Object>),
    Error(Rc<str>),
    Function(Rc<FunctionObj>),
    Builtin(Builtin),
    Array(Rc<Vec<Object>>),
    Hash(Rc<HashObj>),
    Quote(Rc<Node>),
    Macro(Rc<MacroObj>),
    /// A compiled function body, held in the constant pool until `OpClosure`
    /// wraps it with its free variables.
    CompiledFunction(Rc<CompiledFunctionObj>),
    /// A compiled function together with the free variables it captured at
    /// the point `OpClosure` was executed.
    Closure(Rc<ClosureObj>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionObj {
    pub parameters: Vec<Identifier>,
    pub body: BlockStatement,
    pub env: Environment,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MacroObj {
    pub parameters: Vec<Identifier>,
    pub body: BlockStatement,
    pub env: Environment,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CompiledFunctionObj {
    pub instructions: Instructions,
    pub num_locals: usize,
    pub num_parameters: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClosureObj {
    pub func: Rc<CompiledFunctionObj>,
    pub free: Vec<Object>,
}

#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub func: BuiltinFn,
}

impl PartialEq for Builtin {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && std::ptr::eq(self.func as *const (), other.func as *const ())
    }
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Builtin({})", self.name)
    }
}

/// Insertion order is not semantically meaningful (the spec only requires
/// `Hash[key]` lookup), but an `IndexMap`-free `Vec` alongside the lookup
/// map would be wasted weight here. `puts`/`Inspect` iteration order is
/// whatever `HashMap` gives; nothing in the spec relies on it being stable.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct HashObj {
    pub pairs: HashMap<HashKey, (Object, Object)>,
}

impl Object {
    /// The stable type tag used throughout error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Object::Integer(_) => "INTEGER",
            Object::Boolean(_) => "BOOLEAN",
            Object::String(_) => "STRING",
            Object::Null => "NULL",
            Object::ReturnValue(_) => "RETURN_VALUE",
            Object::Error(_) => "ERROR",
            Object::Function(_) => "FUNCTION",
            Object::Builtin(_) => "BUILTIN",
            Object::Array(_) => "ARRAY",
            Object::Hash(_) => "HASH",
            Object::Quote(_) => "QUOTE",
            Object::Macro(_) => "MACRO",
            Object::CompiledFunction(_) => "COMPILED_FUNCTION",
            Object::Closure(_) => "CLOSURE",
        }
    }

    /// `NULL` and `FALSE` are falsy; everything else, including integer 0
    /// and empty strings/arrays, is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Object::Null | Object::Boolean(false))
    }

    pub fn hash_key(&self) -> Option<HashKey> {
        match self {
            Object::Integer(v) => Some(HashKey::integer(*v)),
            Object::Boolean(v) => Some(HashKey::boolean(*v)),
            Object::String(s) => Some(HashKey::string(s)),
            _ => None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Object::Error(message.into().into())
    }

    pub fn string(value: impl Into<String>) -> Self {
        Object::String(value.into().into())
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Object::Integer(v) => write!(f, "{v}"),
            Object::Boolean(v) => write!(f, "{v}"),
            Object::String(s) => write!(f, "{s}"),
            Object::Null => write!(f, "null"),
            Object::ReturnValue(v) => write!(f, "{v}"),
            Object::Error(msg) => write!(f, "ERROR: {msg}"),
            Object::Function(func) => {
                let params: Vec<String> =
                    func.parameters.iter().map(|p| p.to_string()).collect();
                write!(f, "fn({}) {{\n{}\n}}", params.join(", "), func.body)
            }
            Object::Builtin(b) => write!(f, "builtin function({})", b.name),
            Object::Array(elements) => {
                let items: Vec<String> = elements.iter().map(|e| e.to_string()).collect();
                write!(f, "[{}]", items.join(", "))
            }
            Object::Hash(hash) => {
                let items: Vec<String> = hash
                    .pairs
                    .values()
                    .map(|(k, v)| format!("{k}: {v}"))
                    .collect();
                write!(f, "{{{}}}", items.join(", "))
            }
            Object::Quote(node) => write!(f, "QUOTE({node})"),
            Object::Macro(m) => {
                let params: Vec<String> = m.parameters.iter().map(|p| p.to_string()).collect();
                write!(f, "macro({}) {{\n{}\n}}", params.join(", "), m.body)
            }
            Object::CompiledFunction(func) => write!(f, "CompiledFunction[{:p}]", Rc::as_ptr(func)),
            Object::Closure(closure) => write!(f, "Closure[{:p}]", Rc::as_ptr(closure)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness_rules() {
        assert!(Object::Integer(0).is_truthy());
        assert!(Object::string("").is_truthy());
        assert!(!Object::Null.is_truthy());
        assert!(!Object::Boolean(false).is_truthy());
        assert!(Object::Boolean(true).is_truthy());
    }

    #[test]
    fn type_names_match_spec_vocabulary() {
        assert_eq!(Object::Integer(1).type_name(), "INTEGER");
        assert_eq!(Object::string("x").type_name(), "STRING");
        assert_eq!(Object::error("boom").type_name(), "ERROR");
    }

    #[test]
    fn only_integers_booleans_and_strings_are_hashable() {
        assert!(Object::Integer(1).hash_key().is_some());
        assert!(Object::Boolean(true).hash_key().is_some());
        assert!(Object::string("x").hash_key().is_some());
        assert!(Object::Null.hash_key().is_none());
        assert!(Object::Array(Rc::new(vec![])).hash_key().is_none());
    }

    #[test]
    fn array_display_matches_source_syntax() {
        let arr = Object::Array(Rc::new(vec![Object::Integer(1), Object::Integer(2)]));
        assert_eq!(arr.to_string(), "[1, 2]");
    }

    #[test]
    fn compiled_function_and_closure_are_not_hashable() {
        let func = Rc::new(CompiledFunctionObj {
            instructions: Instructions::new(),
            num_locals: 0,
            num_parameters: 0,
        });
        assert_eq!(Object::CompiledFunction(func.clone()).type_name(), "COMPILED_FUNCTION");
        let closure = Object::Closure(Rc::new(ClosureObj { func, free: vec![] }));
        assert_eq!(closure.type_name(), "CLOSURE");
        assert!(closure.hash_key().is_none());
    }
}

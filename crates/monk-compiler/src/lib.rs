//! monk-compiler - compiles a macro-expanded AST to the bytecode
//! `monk-vm` executes: a flat `monk_code::Instructions` stream plus a
//! constant pool of `monk_object::Object` values.

mod compiler;
mod error;
mod symbol_table;

pub use compiler::{Bytecode, Compiler};
pub use error::CompileError;
pub use symbol_table::{Scope, SymbolEntry, SymbolTable};

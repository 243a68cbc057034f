//! monk-object - the runtime value representation (`Object`) and the
//! lexical `Environment` both the tree-walking evaluator and (for
//! constant-pool values) the bytecode VM operate on.

mod environment;
mod hashkey;
mod object;

pub use environment::Environment;
pub use hashkey::{HashKey, HashKeyKind};
pub use object::{
    Builtin, BuiltinFn, ClosureObj, CompiledFunctionObj, FunctionObj, HashObj, MacroObj, Object,
};

//! monk-vm - the stack machine that executes bytecode produced by
//! `monk-compiler`.

mod error;
mod frame;
mod vm;

pub use error::VmError;
pub use vm::VM;

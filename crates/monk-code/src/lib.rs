//! monk-code - opcode definitions and the flat instruction encoding the
//! compiler emits and the VM executes.

mod instructions;
mod opcode;

pub use instructions::{make, read_operands, read_u16, read_u8, Instructions};
pub use opcode::{Definition, Opcode, UnknownOpcode};

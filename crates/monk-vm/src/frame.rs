use std::rc::Rc;

use monk_code::Instructions;
use monk_object::ClosureObj;

/// One call's activation record: the closure it's executing, where it is
/// in that closure's instruction stream, and where its locals begin on
/// the shared value stack.
pub struct Frame {
    pub closure: Rc<ClosureObj>,
    pub ip: usize,
    pub base_pointer: usize,
}

impl Frame {
    pub fn new(closure: Rc<ClosureObj>, base_pointer: usize) -> Self {
        Self {
            closure,
            ip: 0,
            base_pointer,
        }
    }

    pub fn instructions(&self) -> &Instructions {
        &self.closure.func.instructions
    }

    /// Same stream as `instructions()`, coerced to a plain byte slice so
    /// callers can index/slice it directly (`Instructions` only derives
    /// `Deref`, not `Index`).
    pub fn bytes(&self) -> &[u8] {
        &self.closure.func.instructions
    }
}

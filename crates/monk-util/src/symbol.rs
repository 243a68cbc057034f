//! String interning for identifiers.
//!
//! Identifiers are looked up and compared constantly during parsing,
//! evaluation, and symbol resolution. Interning them once turns every later
//! comparison into an integer comparison instead of a byte-for-byte `str`
//! comparison.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, OnceLock};

/// A handle to an interned string.
///
/// `Symbol` is `Copy` and cheap to pass around; the actual bytes live in the
/// global interner and are reachable for the lifetime of the process.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u32);

struct Interner {
    names: Vec<&'static str>,
    ids: HashMap<&'static str, u32>,
}

impl Interner {
    fn new() -> Self {
        Self {
            names: Vec::new(),
            ids: HashMap::new(),
        }
    }

    fn intern(&mut self, s: &str) -> Symbol {
        if let Some(&id) = self.ids.get(s) {
            return Symbol(id);
        }
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        let id = self.names.len() as u32;
        self.names.push(leaked);
        self.ids.insert(leaked, id);
        Symbol(id)
    }

    fn resolve(&self, sym: Symbol) -> &'static str {
        self.names[sym.0 as usize]
    }
}

fn interner() -> &'static Mutex<Interner> {
    static INTERNER: OnceLock<Mutex<Interner>> = OnceLock::new();
    INTERNER.get_or_init(|| Mutex::new(Interner::new()))
}

impl Symbol {
    /// Interns `s`, returning the symbol for it. Interning the same string
    /// twice returns the same `Symbol`.
    pub fn intern(s: &str) -> Self {
        interner().lock().unwrap().intern(s)
    }

    /// Returns the interned string this symbol refers to.
    pub fn as_str(self) -> &'static str {
        interner().lock().unwrap().resolve(self)
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({:?})", self.as_str())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_same_string_yields_same_symbol() {
        let a = Symbol::intern("foobar");
        let b = Symbol::intern("foobar");
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_strings_yield_distinct_symbols() {
        let a = Symbol::intern("foo");
        let b = Symbol::intern("bar");
        assert_ne!(a, b);
    }

    #[test]
    fn round_trips_through_as_str() {
        let sym = Symbol::intern("identifier?");
        assert_eq!(sym.as_str(), "identifier?");
    }
}

//! Parser tracing, gated behind the `PARSER_TRACE` environment variable.
//!
//! Mirrors the reference parser's global trace level / `incIdent` /
//! `decIdent` pair, but ties the decrement to [`Trace`]'s `Drop` impl so the
//! indent is released on every exit path - including the early returns
//! `parse_expression` and friends take on a parse error - rather than
//! relying on a matching call at the end of every traced function.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;

static LEVEL: AtomicU32 = AtomicU32::new(0);
static ENABLED: OnceLock<bool> = OnceLock::new();

fn enabled() -> bool {
    *ENABLED.get_or_init(|| {
        std::env::var("PARSER_TRACE")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    })
}

fn ident(level: u32) -> String {
    "\t".repeat(level as usize)
}

pub struct Trace {
    name: &'static str,
    active: bool,
}

impl Trace {
    pub fn enter(name: &'static str) -> Self {
        let active = enabled();
        if active {
            let level = LEVEL.fetch_add(1, Ordering::SeqCst) + 1;
            println!("{}BEGIN {}", ident(level - 1), name);
        }
        Trace { name, active }
    }
}

impl Drop for Trace {
    fn drop(&mut self) {
        if self.active {
            let level = LEVEL.load(Ordering::SeqCst);
            println!("{}END {}", ident(level - 1), self.name);
            LEVEL.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_traces_release_indent_on_drop() {
        std::env::remove_var("PARSER_TRACE");
        let _outer = Trace::enter("outer");
        {
            let _inner = Trace::enter("inner");
            assert_eq!(LEVEL.load(Ordering::SeqCst), 0);
        }
        assert_eq!(LEVEL.load(Ordering::SeqCst), 0);
    }
}

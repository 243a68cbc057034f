//! Deterministic keys for the runtime `Hash` object.
//!
//! Only `Integer`, `Boolean`, and `String` values are `Hashable`. Two
//! hashable objects are the same hash-table key iff their `HashKey`s are
//! equal, which is why `HashKey` rather than `Object` itself is what
//! `monk_object::Hash`'s map is keyed on - `Object` doesn't (and shouldn't)
//! implement `Eq`/`Hash` itself, since e.g. `Function` values have no
//! sensible notion of equality.

use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HashKeyKind {
    Integer,
    Boolean,
    String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HashKey {
    pub kind: HashKeyKind,
    pub value: u64,
}

impl HashKey {
    pub fn integer(value: i64) -> Self {
        HashKey {
            kind: HashKeyKind::Integer,
            value: value as u64,
        }
    }

    pub fn boolean(value: bool) -> Self {
        HashKey {
            kind: HashKeyKind::Boolean,
            value: if value { 1 } else { 0 },
        }
    }

    pub fn string(value: &str) -> Self {
        let mut hasher = FxHasher::default();
        value.hash(&mut hasher);
        HashKey {
            kind: HashKeyKind::String,
            value: hasher.finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn same_string_yields_same_key() {
        assert_eq!(HashKey::string("hello"), HashKey::string("hello"));
    }

    #[test]
    fn different_strings_yield_different_keys() {
        assert_ne!(HashKey::string("hello"), HashKey::string("world"));
    }

    #[test]
    fn booleans_collapse_to_one_or_zero() {
        assert_eq!(HashKey::boolean(true).value, 1);
        assert_eq!(HashKey::boolean(false).value, 0);
    }

    #[quickcheck]
    fn equal_integers_hash_the_same(value: i64) -> bool {
        HashKey::integer(value) == HashKey::integer(value)
    }

    #[quickcheck]
    fn equal_strings_hash_the_same(value: String) -> bool {
        HashKey::string(&value) == HashKey::string(&value)
    }

    #[quickcheck]
    fn distinct_integers_never_collide_with_a_boolean(value: i64) -> bool {
        HashKey::integer(value) != HashKey::boolean(true)
            && HashKey::integer(value) != HashKey::boolean(false)
    }
}

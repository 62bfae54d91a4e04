//! Global string interner.
//!
//! Identifiers, keywords, and operator method names recur constantly
//! during compilation. Interning stores one copy of each distinct string
//! and hands out a 4-byte [`Name`] handle, making comparisons and
//! hashing O(1) integer operations.
//!
//! The table is process-wide, initialized on first use, and never drops
//! entries: interned strings are leaked to obtain `'static` references,
//! which is bounded by the number of distinct identifiers seen by the
//! process. Concurrent interning is lock-free on the lookup path via
//! `DashMap`; the reverse index takes a short `RwLock` only on insert.

use std::fmt;
use std::sync::{LazyLock, RwLock};

use ahash::RandomState;
use dashmap::DashMap;

/// Global name table instance, initialized on first use.
static NAME_TABLE: LazyLock<NameTable> = LazyLock::new(NameTable::new);

/// An interned string.
///
/// Two `Name`s compare equal exactly when the strings they intern are
/// equal. `Name` is `Copy` and 4 bytes; prefer it over `String` anywhere
/// a name is stored or compared.
///
/// # Examples
///
/// ```
/// use brandyc_util::Name;
///
/// let a = Name::intern("x");
/// let b = Name::intern("x");
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "x");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Name {
    index: u32,
}

impl Name {
    /// Intern a string, returning its name handle.
    ///
    /// Thread-safe; repeated calls with equal strings return the same
    /// handle.
    pub fn intern(string: &str) -> Self {
        NAME_TABLE.intern(string)
    }

    /// The interned string.
    pub fn as_str(self) -> &'static str {
        NAME_TABLE.get(self)
    }

    /// Raw index value, for debugging or serialization.
    pub fn as_u32(self) -> u32 {
        self.index
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({:?})", self.as_str())
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backing store for interned strings.
struct NameTable {
    /// Forward lookup: string contents to handle index.
    map: DashMap<&'static str, u32, RandomState>,

    /// Reverse lookup: handle index to string contents.
    strings: RwLock<Vec<&'static str>>,
}

impl NameTable {
    fn new() -> Self {
        Self {
            map: DashMap::with_capacity_and_hasher(256, RandomState::new()),
            strings: RwLock::new(Vec::with_capacity(256)),
        }
    }

    fn intern(&self, string: &str) -> Name {
        if let Some(entry) = self.map.get(string) {
            return Name { index: *entry };
        }

        // Leak to obtain 'static: entries live as long as the process.
        let interned: &'static str = Box::leak(string.to_string().into_boxed_str());

        let mut strings = self.strings.write().expect("name table poisoned");
        // Re-check under the write lock so a racing intern of the same
        // string cannot allocate two indices.
        if let Some(entry) = self.map.get(string) {
            return Name { index: *entry };
        }

        let index = strings.len() as u32;
        strings.push(interned);
        self.map.insert(interned, index);

        Name { index }
    }

    fn get(&self, name: Name) -> &'static str {
        let strings = self.strings.read().expect("name table poisoned");
        strings[name.index as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_intern_same_string() {
        let a = Name::intern("hello");
        let b = Name::intern("hello");
        assert_eq!(a, b);
    }

    #[test]
    fn test_intern_different_strings() {
        let a = Name::intern("hello");
        let b = Name::intern("world");
        assert_ne!(a, b);
    }

    #[test]
    fn test_as_str_round_trip() {
        let name = Name::intern("round_trip_check");
        assert_eq!(name.as_str(), "round_trip_check");
    }

    #[test]
    fn test_empty_string() {
        let name = Name::intern("");
        assert_eq!(name.as_str(), "");
    }

    #[test]
    fn test_concurrent_intern_same_string() {
        let handles: Vec<_> = (0..8)
            .map(|_| thread::spawn(|| Name::intern("concurrent_same")))
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for name in &results[1..] {
            assert_eq!(results[0], *name);
        }
    }

    #[test]
    fn test_concurrent_intern_distinct_strings() {
        let handles: Vec<_> = (0..8)
            .map(|i| thread::spawn(move || Name::intern(&format!("distinct_{}", i))))
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for i in 0..results.len() {
            for j in (i + 1)..results.len() {
                assert_ne!(results[i], results[j]);
            }
        }
    }

    #[test]
    fn test_display_shows_contents() {
        let name = Name::intern("shown");
        assert_eq!(format!("{}", name), "shown");
    }
}

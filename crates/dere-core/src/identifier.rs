//! Interned names for schema types and slots.
//!
//! Type and slot names are compared far more often than they are printed, so
//! they are stored once in a process-wide interner and handled as [`Id`]s.

use std::{
    fmt,
    sync::{Mutex, MutexGuard, OnceLock, PoisonError},
};

use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for type and slot names.
///
/// # Thread Safety
///
/// Access goes through a `Mutex`; documents read in parallel share it.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> MutexGuard<'static, DefaultStringInterner> {
    INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// An interned name.
///
/// # Examples
///
/// ```
/// use dere_core::identifier::Id;
///
/// let protein = Id::new("Protein");
/// assert_eq!(protein, Id::new("Protein"));
/// assert_eq!(protein, "Protein");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Interns `name` and returns its identifier.
    pub fn new(name: &str) -> Self {
        Self(interner().get_or_intern(name))
    }

    /// Returns the identifier for `name` only if it has been interned before.
    ///
    /// Lookups of names taken from annotation files go through here so that
    /// unknown type names do not grow the interner.
    ///
    /// ```
    /// use dere_core::identifier::Id;
    ///
    /// let known = Id::new("Gene_expression");
    /// assert_eq!(Id::lookup("Gene_expression"), Some(known));
    /// assert_eq!(Id::lookup("never-interned-name"), None);
    /// ```
    pub fn lookup(name: &str) -> Option<Self> {
        interner().get(name).map(Self)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interner = interner();
        f.write_str(interner.resolve(self.0).unwrap_or_default())
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        interner().resolve(self.0) == Some(other)
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_stable() {
        let a = Id::new("Phosphorylation");
        let b = Id::new("Phosphorylation");
        let c = Id::new("Binding");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_lookup_does_not_intern() {
        assert!(Id::lookup("identifier-test-unseen").is_none());
        assert!(Id::lookup("identifier-test-unseen").is_none());

        let id = Id::new("identifier-test-seen");
        assert_eq!(Id::lookup("identifier-test-seen"), Some(id));
    }

    #[test]
    fn test_display() {
        let id = Id::new("Theme");
        assert_eq!(id.to_string(), "Theme");
        assert_eq!(format!("{id}"), "Theme");
    }

    #[test]
    fn test_partial_eq_str() {
        let id = Id::new("Cause");

        assert!(id == "Cause");
        assert!(id != "Theme");

        let name = String::from("Cause");
        assert!(id == name.as_str());
    }

    #[test]
    fn test_hash_and_eq() {
        use std::collections::HashMap;

        let mut map = HashMap::new();
        map.insert(Id::new("Theme"), 1);
        map.insert(Id::new("Cause"), 2);

        assert_eq!(map.get(&Id::new("Theme")), Some(&1));
        assert_eq!(map.len(), 2);
    }
}

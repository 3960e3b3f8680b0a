//! Symbol ids for interned identifiers.
//!
//! A [`Symbol`] is a 32-bit id handed out by the
//! [`StringInterner`](crate::interner::StringInterner). Equal text always
//! maps to the same id within one interner, so identifier comparison is an
//! integer comparison.
//!
//! # Examples
//!
//! ```
//! use ferrule_mem::Symbol;
//!
//! assert_eq!(Symbol::new(7), Symbol::from(7));
//! assert!(Symbol::THIS.is_reserved());
//! assert!(!Symbol::new(100).is_reserved());
//! ```

use std::fmt;

/// Identifiers every interner pre-interns, in id order.
///
/// The AST relies on some of them by id: an implicit method receiver is a
/// parameter named `this`.
pub const RESERVED_IDENTIFIERS: &[&str] = &[
    "this",
    "super",
    "constructor",
    "destructor",
    "subscript",
    "metatype",
];

/// A handle for an interned identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u32);

impl Symbol {
    /// `this`
    pub const THIS: Symbol = Symbol(0);
    /// `super`
    pub const SUPER: Symbol = Symbol(1);
    /// `constructor`
    pub const CONSTRUCTOR: Symbol = Symbol(2);
    /// `destructor`
    pub const DESTRUCTOR: Symbol = Symbol(3);
    /// `subscript`
    pub const SUBSCRIPT: Symbol = Symbol(4);
    /// `metatype`
    pub const METATYPE: Symbol = Symbol(5);

    /// Creates a symbol from a raw id.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw id.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Returns the raw id as an index.
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// Returns `true` for the pre-interned identifiers.
    #[must_use]
    pub const fn is_reserved(self) -> bool {
        (self.0 as usize) < RESERVED_IDENTIFIERS.len()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.0)
    }
}

impl From<u32> for Symbol {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

//! Identifier interning into an arena.
//!
//! The interner copies each distinct string once into a caller-provided
//! [`LocalArena`] and assigns it a [`Symbol`]. Resolved strings borrow the
//! arena, not the interner, so they stay usable after the interner is
//! dropped and for as long as the arena lives.
//!
//! # Examples
//!
//! ```
//! use ferrule_mem::{LocalArena, StringInterner, Symbol};
//!
//! let arena = LocalArena::default();
//! let mut interner = StringInterner::new(&arena);
//!
//! let a = interner.intern("count");
//! let b = interner.intern("count");
//! assert_eq!(a, b);
//! assert_eq!(interner.resolve(a), Some("count"));
//!
//! // Reserved identifiers have fixed ids.
//! assert_eq!(interner.intern("this"), Symbol::THIS);
//! ```

use hashbrown::HashMap;

use crate::arena::LocalArena;
use crate::symbol::{RESERVED_IDENTIFIERS, Symbol};

/// Bidirectional string/[`Symbol`] table backed by an arena.
pub struct StringInterner<'arena> {
    arena: &'arena LocalArena,
    /// Symbol id to text.
    strings: Vec<&'arena str>,
    /// Text to symbol id.
    symbols: HashMap<&'arena str, Symbol>,
}

impl<'arena> StringInterner<'arena> {
    /// Creates an interner with the reserved identifiers pre-interned.
    #[must_use]
    pub fn new(arena: &'arena LocalArena) -> Self {
        let mut interner = Self {
            arena,
            strings: Vec::with_capacity(RESERVED_IDENTIFIERS.len()),
            symbols: HashMap::with_capacity(RESERVED_IDENTIFIERS.len()),
        };

        for name in RESERVED_IDENTIFIERS {
            interner.intern(name);
        }

        interner
    }

    /// Interns `s`, returning its symbol and the arena copy of the text.
    pub fn intern_with_text(&mut self, s: &str) -> (Symbol, &'arena str) {
        if let Some((&text, &sym)) = self.symbols.get_key_value(s) {
            return (sym, text);
        }

        let id = u32::try_from(self.strings.len())
            .unwrap_or_else(|_| panic!("more than u32::MAX identifiers interned"));
        let sym = Symbol::new(id);
        let text: &'arena str = self.arena.alloc_str(s);

        self.strings.push(text);
        self.symbols.insert(text, sym);
        (sym, text)
    }

    /// Interns `s` and returns its symbol.
    pub fn intern(&mut self, s: &str) -> Symbol {
        self.intern_with_text(s).0
    }

    /// Returns the symbol for `s` if it was interned before.
    #[must_use]
    pub fn get(&self, s: &str) -> Option<Symbol> {
        self.symbols.get(s).copied()
    }

    /// Returns the text of `sym`, or `None` for ids this interner never issued.
    #[must_use]
    pub fn resolve(&self, sym: Symbol) -> Option<&'arena str> {
        self.strings.get(sym.as_usize()).copied()
    }

    /// Number of interned strings, reserved ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Always `false`: reserved identifiers are interned on creation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_ids() {
        let arena = LocalArena::default();
        let mut interner = StringInterner::new(&arena);

        assert_eq!(interner.len(), RESERVED_IDENTIFIERS.len());
        assert_eq!(interner.intern("this"), Symbol::THIS);
        assert_eq!(interner.intern("subscript"), Symbol::SUBSCRIPT);
        assert_eq!(interner.len(), RESERVED_IDENTIFIERS.len());
    }

    #[test]
    fn test_uniquing() {
        let arena = LocalArena::default();
        let mut interner = StringInterner::new(&arena);

        let (a, text_a) = interner.intern_with_text("x");
        let (b, text_b) = interner.intern_with_text("x");
        let c = interner.intern("y");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(std::ptr::eq(text_a, text_b));
        assert_eq!(interner.get("y"), Some(c));
        assert_eq!(interner.get("z"), None);
    }

    #[test]
    fn test_resolve_outlives_interner() {
        let arena = LocalArena::default();
        let text = {
            let mut interner = StringInterner::new(&arena);
            let sym = interner.intern("persistent");
            interner.resolve(sym)
        };
        assert_eq!(text, Some("persistent"));
    }

    #[test]
    fn test_resolve_unknown() {
        let arena = LocalArena::default();
        let interner = StringInterner::new(&arena);
        assert_eq!(interner.resolve(Symbol::new(9999)), None);
    }
}

//! Source locations and ranges.
//!
//! A [`SourceLoc`] is a byte offset into the compilation unit's buffer, or
//! the [`SourceLoc::INVALID`] sentinel for nodes that the compiler
//! synthesized. Every location field in the AST is one of those two states;
//! there is no null.
//!
//! # Examples
//!
//! ```
//! use ferrule_ast::span::{SourceLoc, SourceRange};
//!
//! let range = SourceRange::new(SourceLoc::new(4), SourceLoc::new(9));
//! assert!(range.is_valid());
//! assert!(range.contains(SourceLoc::new(6)));
//!
//! // A range with one usable end collapses onto it.
//! let half = SourceRange::covering(SourceLoc::INVALID, SourceLoc::new(9));
//! assert_eq!(half, SourceRange::point(SourceLoc::new(9)));
//! ```

use std::fmt;

/// A position in the source buffer, or the invalid sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceLoc(u32);

impl SourceLoc {
    /// Location of synthesized nodes.
    pub const INVALID: SourceLoc = SourceLoc(u32::MAX);

    /// Creates a location at a byte offset.
    ///
    /// `u32::MAX` is reserved for [`SourceLoc::INVALID`].
    #[must_use]
    pub const fn new(offset: u32) -> Self {
        debug_assert!(offset != u32::MAX, "offset collides with the invalid sentinel");
        SourceLoc(offset)
    }

    /// Returns `true` unless this is the invalid sentinel.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }

    /// Returns `true` for the invalid sentinel.
    #[must_use]
    pub const fn is_invalid(self) -> bool {
        !self.is_valid()
    }

    /// Returns the byte offset of a valid location.
    #[must_use]
    pub const fn offset(self) -> Option<u32> {
        if self.is_valid() { Some(self.0) } else { None }
    }

    /// Returns `self` if valid, otherwise `other`.
    #[must_use]
    pub const fn or(self, other: SourceLoc) -> SourceLoc {
        if self.is_valid() { self } else { other }
    }
}

impl Default for SourceLoc {
    fn default() -> Self {
        SourceLoc::INVALID
    }
}

impl fmt::Display for SourceLoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.offset() {
            Some(offset) => write!(f, "@{offset}"),
            None => write!(f, "<invalid loc>"),
        }
    }
}

/// An inclusive pair of locations: the first and the last token of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourceRange {
    /// Location of the first token
    pub start: SourceLoc,
    /// Location of the last token
    pub end: SourceLoc,
}

impl SourceRange {
    /// The range of nodes with no source text at all.
    pub const INVALID: SourceRange = SourceRange {
        start: SourceLoc::INVALID,
        end: SourceLoc::INVALID,
    };

    /// Creates a range from its two ends, as given.
    #[must_use]
    pub const fn new(start: SourceLoc, end: SourceLoc) -> Self {
        Self { start, end }
    }

    /// Creates a range covering a single token.
    #[must_use]
    pub const fn point(loc: SourceLoc) -> Self {
        Self {
            start: loc,
            end: loc,
        }
    }

    /// Creates a range from two ends, substituting one for the other when
    /// only one is valid.
    ///
    /// The result is valid whenever either input is.
    #[must_use]
    pub const fn covering(start: SourceLoc, end: SourceLoc) -> Self {
        Self {
            start: start.or(end),
            end: end.or(start),
        }
    }

    /// Spans from the start of `left` to the end of `right`, falling back
    /// to whichever ends are valid.
    #[must_use]
    pub const fn merge(left: SourceRange, right: SourceRange) -> Self {
        Self::covering(left.start.or(left.end), right.end.or(right.start))
    }

    /// Returns `true` when both ends are valid.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.start.is_valid() && self.end.is_valid()
    }

    /// Returns `true` when either end is the invalid sentinel.
    #[must_use]
    pub const fn is_invalid(&self) -> bool {
        !self.is_valid()
    }

    /// Returns `true` if `loc` is valid and lies between the two ends.
    #[must_use]
    pub fn contains(&self, loc: SourceLoc) -> bool {
        self.is_valid() && loc.is_valid() && self.start <= loc && loc <= self.end
    }
}

impl fmt::Display for SourceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// Anything with a source range.
///
/// Implemented by expressions, statements and patterns.
pub trait Spanned {
    /// Returns the range from the first to the last token of this item.
    fn source_range(&self) -> SourceRange;

    /// Location of the first token.
    fn start_loc(&self) -> SourceLoc {
        self.source_range().start
    }

    /// Location of the last token.
    fn end_loc(&self) -> SourceLoc {
        self.source_range().end
    }
}

impl Spanned for SourceRange {
    fn source_range(&self) -> SourceRange {
        *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(n: u32) -> SourceLoc {
        SourceLoc::new(n)
    }

    #[test]
    fn test_invalid_sentinel() {
        assert!(SourceLoc::INVALID.is_invalid());
        assert!(loc(0).is_valid());
        assert_eq!(SourceLoc::default(), SourceLoc::INVALID);
        assert_eq!(SourceLoc::INVALID.offset(), None);
        assert_eq!(loc(3).offset(), Some(3));
    }

    #[test]
    fn test_covering() {
        assert_eq!(
            SourceRange::covering(loc(1), loc(5)),
            SourceRange::new(loc(1), loc(5))
        );
        assert_eq!(
            SourceRange::covering(loc(1), SourceLoc::INVALID),
            SourceRange::point(loc(1))
        );
        assert!(SourceRange::covering(SourceLoc::INVALID, SourceLoc::INVALID).is_invalid());
    }

    #[test]
    fn test_merge() {
        let left = SourceRange::new(loc(0), loc(3));
        let right = SourceRange::new(loc(7), loc(10));
        assert_eq!(SourceRange::merge(left, right), SourceRange::new(loc(0), loc(10)));
        assert_eq!(
            SourceRange::merge(SourceRange::INVALID, right),
            SourceRange::new(loc(10), loc(10))
        );
    }

    #[test]
    fn test_contains() {
        let range = SourceRange::new(loc(2), loc(8));
        assert!(range.contains(loc(2)));
        assert!(range.contains(loc(8)));
        assert!(!range.contains(loc(9)));
        assert!(!range.contains(SourceLoc::INVALID));
        assert!(!SourceRange::INVALID.contains(loc(2)));
    }

    #[test]
    fn test_display() {
        assert_eq!(loc(12).to_string(), "@12");
        assert_eq!(SourceLoc::INVALID.to_string(), "<invalid loc>");
        assert_eq!(SourceRange::point(loc(1)).to_string(), "[@1, @1]");
    }
}

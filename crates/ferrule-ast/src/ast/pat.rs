//! Parameter patterns.
//!
//! Functions and closures bind their parameters through patterns. Only the
//! forms that parameter clauses use are modelled.

use crate::span::{SourceLoc, SourceRange, Spanned};

use super::decl::ValueDecl;
use super::ty::TypeLoc;

/// A parameter pattern.
#[derive(Debug)]
pub enum Pattern<'a> {
    /// `_`
    Any {
        /// Location of the underscore
        loc: SourceLoc,
    },

    /// A name binding a variable; located at the declaration's name.
    Named {
        /// Bound variable
        decl: &'a ValueDecl<'a>,
    },

    /// `pattern : Type`
    Typed {
        /// Pattern being annotated
        sub: &'a Pattern<'a>,
        /// The annotation
        type_loc: TypeLoc<'a>,
    },

    /// `(a, b)`
    Tuple {
        /// `(` location
        lparen: SourceLoc,
        /// Element patterns
        elements: &'a [&'a Pattern<'a>],
        /// `)` location
        rparen: SourceLoc,
    },

    /// `(a)`
    Paren {
        /// `(` location
        lparen: SourceLoc,
        /// Inner pattern
        sub: &'a Pattern<'a>,
        /// `)` location
        rparen: SourceLoc,
    },
}

impl<'a> Pattern<'a> {
    /// The variable bound by a named pattern.
    #[must_use]
    pub fn bound_decl(&self) -> Option<&'a ValueDecl<'a>> {
        match self {
            Pattern::Named { decl } => Some(*decl),
            _ => None,
        }
    }

    /// Strips a type annotation.
    #[must_use]
    pub fn typed_sub_pattern(&self) -> Option<&'a Pattern<'a>> {
        match self {
            Pattern::Typed { sub, .. } => Some(*sub),
            _ => None,
        }
    }
}

impl Spanned for Pattern<'_> {
    fn source_range(&self) -> SourceRange {
        match self {
            Pattern::Any { loc } => SourceRange::point(*loc),
            Pattern::Named { decl } => SourceRange::point(decl.loc()),
            Pattern::Typed { sub, type_loc } => {
                SourceRange::merge(sub.source_range(), type_loc.range)
            }
            Pattern::Tuple { lparen, rparen, .. } | Pattern::Paren { lparen, rparen, .. } => {
                SourceRange::covering(*lparen, *rparen)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use ferrule_mem::LocalArena;

    use super::*;
    use crate::ast::decl::DeclKind;
    use crate::ast::ty::TypeLoc;
    use crate::context::AstContext;

    #[test]
    fn test_typed_pattern_range() {
        let arena = LocalArena::default();
        let ctx = AstContext::new(&arena);
        let int = ctx.builtin_integer_type(32).unwrap();

        let decl = ctx.value_decl(DeclKind::Var, "n", SourceLoc::new(4), None);
        let named = ctx.named_pattern(decl);
        let typed = ctx.typed_pattern(
            named,
            TypeLoc::new(
                Some(int),
                SourceRange::new(SourceLoc::new(7), SourceLoc::new(11)),
            ),
        );

        assert_eq!(
            typed.source_range(),
            SourceRange::new(SourceLoc::new(4), SourceLoc::new(11))
        );
        assert!(std::ptr::eq(typed.typed_sub_pattern().unwrap(), named));
        assert!(std::ptr::eq(named.bound_decl().unwrap(), decl));
    }

    #[test]
    fn test_tuple_pattern_range() {
        let arena = LocalArena::default();
        let ctx = AstContext::new(&arena);

        let empty = ctx.tuple_pattern(SourceLoc::new(2), &[], SourceLoc::new(3));
        assert_eq!(
            empty.source_range(),
            SourceRange::new(SourceLoc::new(2), SourceLoc::new(3))
        );
        assert!(ctx.any_pattern(SourceLoc::INVALID).source_range().is_invalid());
    }
}

//! Statements that appear in closure bodies.

use std::cell::Cell;

use crate::span::{SourceLoc, SourceRange, Spanned};

use super::decl::ValueDecl;
use super::expr::Expr;

/// One element of a brace statement.
#[derive(Debug, Clone, Copy)]
pub enum BraceElement<'a> {
    /// An expression evaluated for effect
    Expr(&'a Expr<'a>),
    /// A nested statement
    Stmt(&'a Stmt<'a>),
    /// A local declaration
    Decl(&'a ValueDecl<'a>),
}

impl Spanned for BraceElement<'_> {
    fn source_range(&self) -> SourceRange {
        match self {
            BraceElement::Expr(expr) => expr.source_range(),
            BraceElement::Stmt(stmt) => stmt.source_range(),
            BraceElement::Decl(decl) => SourceRange::point(decl.loc()),
        }
    }
}

/// `{ elements }`
#[derive(Debug)]
pub struct BraceStmt<'a> {
    /// `{` location
    pub lbrace: SourceLoc,
    /// Elements in source order
    pub elements: &'a [BraceElement<'a>],
    /// `}` location
    pub rbrace: SourceLoc,
}

impl Spanned for BraceStmt<'_> {
    fn source_range(&self) -> SourceRange {
        let start = match self.elements.first() {
            Some(first) => self.lbrace.or(first.start_loc()),
            None => self.lbrace,
        };
        let end = match self.elements.last() {
            Some(last) => self.rbrace.or(last.end_loc()),
            None => self.rbrace,
        };
        SourceRange::covering(start, end)
    }
}

/// `return expr`
#[derive(Debug)]
pub struct ReturnStmt<'a> {
    /// `return` keyword location
    pub return_loc: SourceLoc,
    result: Cell<Option<&'a Expr<'a>>>,
}

impl<'a> ReturnStmt<'a> {
    pub(crate) fn new(return_loc: SourceLoc, result: Option<&'a Expr<'a>>) -> Self {
        Self {
            return_loc,
            result: Cell::new(result),
        }
    }

    /// The returned value, if any.
    #[must_use]
    pub fn result(&self) -> Option<&'a Expr<'a>> {
        self.result.get()
    }

    /// Replaces the returned value.
    pub fn set_result(&self, result: &'a Expr<'a>) {
        self.result.set(Some(result));
    }
}

/// A statement.
#[derive(Debug)]
pub enum Stmt<'a> {
    /// A nested brace statement
    Brace(&'a BraceStmt<'a>),
    /// A return statement
    Return(ReturnStmt<'a>),
}

impl<'a> Stmt<'a> {
    /// Returns the return statement if this is one.
    #[must_use]
    pub fn as_return(&self) -> Option<&ReturnStmt<'a>> {
        match self {
            Stmt::Return(ret) => Some(ret),
            Stmt::Brace(_) => None,
        }
    }
}

impl Spanned for Stmt<'_> {
    fn source_range(&self) -> SourceRange {
        match self {
            Stmt::Brace(brace) => brace.source_range(),
            Stmt::Return(ret) => {
                let end = ret.result().map_or(ret.return_loc, |e| e.end_loc());
                SourceRange::covering(ret.return_loc, end)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use ferrule_mem::LocalArena;

    use super::*;
    use crate::context::AstContext;

    #[test]
    fn test_brace_range() {
        let arena = LocalArena::default();
        let ctx = AstContext::new(&arena);

        let lit = ctx.integer_literal("1", SourceLoc::new(9));
        let ret = ctx.return_stmt(SourceLoc::new(2), Some(lit));
        let brace = ctx.brace_stmt(
            SourceLoc::new(0),
            &[BraceElement::Stmt(ret)],
            SourceLoc::new(11),
        );

        assert_eq!(
            ret.source_range(),
            SourceRange::new(SourceLoc::new(2), SourceLoc::new(9))
        );
        assert_eq!(
            brace.source_range(),
            SourceRange::new(SourceLoc::new(0), SourceLoc::new(11))
        );
    }

    #[test]
    fn test_implicit_brace_takes_element_range() {
        let arena = LocalArena::default();
        let ctx = AstContext::new(&arena);

        let lit = ctx.integer_literal("7", SourceLoc::new(5));
        let brace = ctx.brace_stmt(
            SourceLoc::INVALID,
            &[BraceElement::Expr(lit)],
            SourceLoc::INVALID,
        );
        assert_eq!(brace.source_range(), SourceRange::point(SourceLoc::new(5)));
    }

    #[test]
    fn test_set_result() {
        let arena = LocalArena::default();
        let ctx = AstContext::new(&arena);

        let a = ctx.integer_literal("1", SourceLoc::new(1));
        let b = ctx.integer_literal("2", SourceLoc::new(1));
        let ret = ctx.return_stmt(SourceLoc::new(0), Some(a));
        let ret = ret.as_return().unwrap();
        ret.set_result(b);
        assert!(std::ptr::eq(ret.result().unwrap(), b));
    }
}

//! Function application.

use std::cell::Cell;

use crate::ast::decl::ValueDecl;
use crate::span::SourceLoc;

use super::{Expr, ExprKind};

/// Which call-like kind an application is.
///
/// `DotSyntaxCall` is built separately since it also records a `.` location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApplyKind {
    /// `f(x)`
    Call,
    /// `-x`
    PrefixUnary,
    /// `x++`
    PostfixUnary,
    /// `a + b`, with a two-element tuple argument
    Binary,
    /// `T(args)` applied to a constructor reference
    ConstructorRefCall,
}

/// A function applied to an argument.
#[derive(Debug)]
pub struct ApplyExpr<'a> {
    func: Cell<&'a Expr<'a>>,
    arg: Cell<Option<&'a Expr<'a>>>,
    is_super: Cell<bool>,
}

impl<'a> ApplyExpr<'a> {
    pub(crate) fn new(func: &'a Expr<'a>, arg: Option<&'a Expr<'a>>) -> Self {
        Self {
            func: Cell::new(func),
            arg: Cell::new(arg),
            is_super: Cell::new(false),
        }
    }

    /// The function.
    #[must_use]
    pub fn func(&self) -> &'a Expr<'a> {
        self.func.get()
    }

    /// Replaces the function.
    pub fn set_func(&self, func: &'a Expr<'a>) {
        self.func.set(func);
    }

    /// The argument, normally a tuple or paren.
    #[must_use]
    pub fn arg(&self) -> Option<&'a Expr<'a>> {
        self.arg.get()
    }

    /// Replaces the argument.
    pub fn set_arg(&self, arg: &'a Expr<'a>) {
        self.arg.set(Some(arg));
    }

    /// Returns `true` for a call through `super`.
    #[must_use]
    pub fn is_super(&self) -> bool {
        self.is_super.get()
    }

    /// Marks the call as going through `super`.
    pub fn set_super(&self, is_super: bool) {
        self.is_super.set(is_super);
    }

    /// The declaration being called, seeing through parentheses.
    ///
    /// `None` when the function is not a direct reference to a declaration.
    #[must_use]
    pub fn called_value(&self) -> Option<&'a ValueDecl<'a>> {
        let mut expr = self.func();
        loop {
            if let ExprKind::DeclRef(decl_ref) = expr.kind() {
                return Some(decl_ref.decl);
            }
            let inner = expr.value_providing_expr();
            if std::ptr::eq(inner, expr) {
                return None;
            }
            expr = inner;
        }
    }
}

/// `base.method` applied to `base`.
#[derive(Debug)]
pub struct DotSyntaxCallExpr<'a> {
    /// Function is the method reference, argument is the base
    pub apply: ApplyExpr<'a>,
    /// `.` location
    pub dot_loc: SourceLoc,
}

/// `lhs.rhs` where `lhs` is evaluated only for its type.
#[derive(Debug)]
pub struct DotSyntaxBaseIgnoredExpr<'a> {
    lhs: Cell<&'a Expr<'a>>,
    /// `.` location
    pub dot_loc: SourceLoc,
    rhs: Cell<&'a Expr<'a>>,
}

impl<'a> DotSyntaxBaseIgnoredExpr<'a> {
    pub(crate) fn new(lhs: &'a Expr<'a>, dot_loc: SourceLoc, rhs: &'a Expr<'a>) -> Self {
        Self {
            lhs: Cell::new(lhs),
            dot_loc,
            rhs: Cell::new(rhs),
        }
    }

    /// The ignored base.
    #[must_use]
    pub fn lhs(&self) -> &'a Expr<'a> {
        self.lhs.get()
    }

    /// Replaces the base.
    pub fn set_lhs(&self, lhs: &'a Expr<'a>) {
        self.lhs.set(lhs);
    }

    /// The member.
    #[must_use]
    pub fn rhs(&self) -> &'a Expr<'a> {
        self.rhs.get()
    }

    /// Replaces the member.
    pub fn set_rhs(&self, rhs: &'a Expr<'a>) {
        self.rhs.set(rhs);
    }
}

#[cfg(test)]
mod tests {
    use ferrule_mem::LocalArena;

    use super::*;
    use crate::ast::decl::DeclKind;
    use crate::context::AstContext;

    #[test]
    fn test_called_value_through_parens() {
        let arena = LocalArena::default();
        let ctx = AstContext::new(&arena);

        let f = ctx.value_decl(DeclKind::Func { is_static: false }, "f", SourceLoc::new(1), None);
        let f_ref = ctx.decl_ref(f, SourceLoc::new(1));
        let paren = ctx.paren(SourceLoc::new(0), f_ref, SourceLoc::new(2), false);
        let outer = ctx.paren(SourceLoc::INVALID, paren, SourceLoc::INVALID, false);
        let arg = ctx.tuple(SourceLoc::new(3), &[], SourceLoc::new(4), false);
        let call = ctx.apply(ApplyKind::Call, outer, Some(arg));

        let called = call.as_apply().unwrap().called_value();
        assert!(std::ptr::eq(called.unwrap(), f));
    }

    #[test]
    fn test_called_value_absent() {
        let arena = LocalArena::default();
        let ctx = AstContext::new(&arena);

        let callee = ctx.unresolved_decl_ref("g", SourceLoc::new(0));
        let call = ctx.apply(ApplyKind::Call, callee, None);
        assert!(call.as_apply().unwrap().called_value().is_none());
    }

    #[test]
    fn test_replace_children() {
        let arena = LocalArena::default();
        let ctx = AstContext::new(&arena);

        let f = ctx.unresolved_decl_ref("f", SourceLoc::new(0));
        let g = ctx.unresolved_decl_ref("g", SourceLoc::new(0));
        let x = ctx.integer_literal("1", SourceLoc::new(2));
        let call = ctx.apply(ApplyKind::Call, f, None);
        let apply = call.as_apply().unwrap();

        apply.set_func(g);
        apply.set_arg(x);
        apply.set_super(true);
        assert!(std::ptr::eq(apply.func(), g));
        assert!(std::ptr::eq(apply.arg().unwrap(), x));
        assert!(apply.is_super());
    }
}

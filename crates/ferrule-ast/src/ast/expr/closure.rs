//! Expressions that capture variables from their enclosing scope.

use std::cell::Cell;

use ferrule_log::trace;

use crate::ast::decl::ValueDecl;
use crate::ast::pat::Pattern;
use crate::ast::stmt::{BraceElement, BraceStmt, ReturnStmt};
use crate::ast::ty::{Type, TypeLoc};
use crate::error::{AstError, AstResult};
use crate::span::SourceLoc;

use super::{Expr, ExprKind};

/// Captured variables, set once capture analysis has run.
#[derive(Debug)]
struct Captures<'a>(Cell<&'a [&'a ValueDecl<'a>]>);

impl<'a> Captures<'a> {
    fn new() -> Self {
        let none: &'a [&'a ValueDecl<'a>] = &[];
        Self(Cell::new(none))
    }
}

/// `func (args) -> T { body }`
///
/// Each parameter clause is stored twice: once as the caller sees it and once
/// as the body binds it. Curried functions have one clause per level.
#[derive(Debug)]
pub struct FuncExpr<'a> {
    /// `func` keyword location; invalid for synthesized functions
    pub func_loc: SourceLoc,
    params: &'a [&'a Pattern<'a>],
    /// Declared result type
    pub ret_type: TypeLoc<'a>,
    body: Option<&'a BraceStmt<'a>>,
    captures: Captures<'a>,
}

impl<'a> FuncExpr<'a> {
    /// `params` holds the argument clauses followed by the same number of
    /// body clauses.
    pub(crate) fn new(
        func_loc: SourceLoc,
        params: &'a [&'a Pattern<'a>],
        ret_type: TypeLoc<'a>,
        body: Option<&'a BraceStmt<'a>>,
    ) -> Self {
        debug_assert!(params.len() % 2 == 0);
        Self {
            func_loc,
            params,
            ret_type,
            body,
            captures: Captures::new(),
        }
    }

    /// Number of parameter clauses.
    #[must_use]
    pub fn num_param_patterns(&self) -> usize {
        self.params.len() / 2
    }

    /// Parameter clauses as seen by callers.
    #[must_use]
    pub fn arg_param_patterns(&self) -> &'a [&'a Pattern<'a>] {
        &self.params[..self.num_param_patterns()]
    }

    /// Parameter clauses as bound inside the body.
    #[must_use]
    pub fn body_param_patterns(&self) -> &'a [&'a Pattern<'a>] {
        &self.params[self.num_param_patterns()..]
    }

    /// The body; absent for a declaration without a definition.
    #[must_use]
    pub fn body(&self) -> Option<&'a BraceStmt<'a>> {
        self.body
    }

    /// Captured variables.
    #[must_use]
    pub fn captures(&self) -> &'a [&'a ValueDecl<'a>] {
        self.captures.0.get()
    }

    /// Records the captured variables.
    pub fn set_captures(&self, captures: &'a [&'a ValueDecl<'a>]) {
        self.captures.0.set(captures);
    }

    /// The implicit `this` parameter of a method.
    ///
    /// Present when the first argument clause is a typed pattern around a
    /// named pattern binding `this` with no source location.
    #[must_use]
    pub fn implicit_this_decl(&self) -> Option<&'a ValueDecl<'a>> {
        let first = self.arg_param_patterns().first()?;
        let decl = first.typed_sub_pattern()?.bound_decl()?;
        (decl.name().is_this() && decl.loc().is_invalid()).then_some(decl)
    }

    pub(crate) fn result_type(&self, ty: Option<Type<'a>>) -> AstResult<Type<'a>> {
        let mut result = resolved(ty, "Func")?;
        if result.is_error() {
            return Ok(result);
        }
        for _ in 0..self.num_param_patterns() {
            let inner = function_result(result, "Func")?;
            result = inner;
        }
        Ok(result)
    }
}

/// `{ |params| body }`
#[derive(Debug)]
pub struct PipeClosureExpr<'a> {
    /// Parameter pattern
    pub params: &'a Pattern<'a>,
    /// Body
    pub body: &'a BraceStmt<'a>,
    single_expression: bool,
    captures: Captures<'a>,
}

impl<'a> PipeClosureExpr<'a> {
    pub(crate) fn new(
        params: &'a Pattern<'a>,
        body: &'a BraceStmt<'a>,
        single_expression: bool,
    ) -> Self {
        Self {
            params,
            body,
            single_expression,
            captures: Captures::new(),
        }
    }

    /// Returns `true` if the body was written as a bare expression.
    #[must_use]
    pub fn has_single_expression_body(&self) -> bool {
        self.single_expression
    }

    /// The bare expression of a single-expression body.
    ///
    /// # Errors
    ///
    /// Returns [`AstError::NotSingleExpressionBody`] otherwise.
    pub fn single_expression_body(&self) -> AstResult<&'a Expr<'a>> {
        self.body_return()?
            .result()
            .ok_or(AstError::NotSingleExpressionBody)
    }

    /// Replaces the bare expression of a single-expression body.
    ///
    /// # Errors
    ///
    /// Returns [`AstError::NotSingleExpressionBody`] if the body is not one.
    pub fn set_single_expression_body(&self, body: &'a Expr<'a>) -> AstResult<()> {
        let ret = self.body_return()?;
        trace!("closure body replaced by {}", body.tag().name());
        ret.set_result(body);
        Ok(())
    }

    fn body_return(&self) -> AstResult<&'a ReturnStmt<'a>> {
        if !self.single_expression {
            return Err(AstError::NotSingleExpressionBody);
        }
        single_return(self.body).ok_or(AstError::NotSingleExpressionBody)
    }

    pub(crate) fn result_type(&self, ty: Option<Type<'a>>) -> AstResult<Type<'a>> {
        let ty = resolved(ty, "PipeClosure")?;
        if ty.is_error() {
            return Ok(ty);
        }
        function_result(ty, "PipeClosure")
    }

    /// Captured variables.
    #[must_use]
    pub fn captures(&self) -> &'a [&'a ValueDecl<'a>] {
        self.captures.0.get()
    }

    /// Records the captured variables.
    pub fn set_captures(&self, captures: &'a [&'a ValueDecl<'a>]) {
        self.captures.0.set(captures);
    }
}

fn resolved<'a>(ty: Option<Type<'a>>, kind: &'static str) -> AstResult<Type<'a>> {
    match ty {
        Some(ty) if !ty.is_unresolved() => Ok(ty),
        _ => Err(AstError::UnresolvedType { kind }),
    }
}

fn function_result<'a>(ty: Type<'a>, kind: &'static str) -> AstResult<Type<'a>> {
    ty.function_result().ok_or_else(|| AstError::NotAFunctionType {
        kind,
        found: ty.to_string(),
    })
}

/// The return statement of a body made of a lone `return`.
pub(crate) fn single_return<'a>(body: &'a BraceStmt<'a>) -> Option<&'a ReturnStmt<'a>> {
    match body.elements {
        [BraceElement::Stmt(stmt)] => stmt.as_return(),
        _ => None,
    }
}

/// Wraps an argument so that it is evaluated lazily by the callee.
#[derive(Debug)]
pub struct ImplicitClosureExpr<'a> {
    body: Cell<&'a Expr<'a>>,
    params: &'a [&'a Pattern<'a>],
    captures: Captures<'a>,
}

impl<'a> ImplicitClosureExpr<'a> {
    pub(crate) fn new(body: &'a Expr<'a>, params: &'a [&'a Pattern<'a>]) -> Self {
        Self {
            body: Cell::new(body),
            params,
            captures: Captures::new(),
        }
    }

    /// The wrapped expression.
    #[must_use]
    pub fn body(&self) -> &'a Expr<'a> {
        self.body.get()
    }

    /// Replaces the wrapped expression.
    pub fn set_body(&self, body: &'a Expr<'a>) {
        self.body.set(body);
    }

    /// The parameter pattern, if the closure has one.
    #[must_use]
    pub fn params(&self) -> Option<&'a Pattern<'a>> {
        self.params.first().copied()
    }

    /// Captured variables.
    #[must_use]
    pub fn captures(&self) -> &'a [&'a ValueDecl<'a>] {
        self.captures.0.get()
    }

    /// Records the captured variables.
    pub fn set_captures(&self, captures: &'a [&'a ValueDecl<'a>]) {
        self.captures.0.set(captures);
    }
}

impl<'a> Expr<'a> {
    /// Captured variables of a capturing expression; `None` for other kinds.
    #[must_use]
    pub fn captures(&self) -> Option<&'a [&'a ValueDecl<'a>]> {
        match self.kind() {
            ExprKind::Func(func) => Some(func.captures()),
            ExprKind::PipeClosure(closure) => Some(closure.captures()),
            ExprKind::ImplicitClosure(closure) => Some(closure.captures()),
            _ => None,
        }
    }

    /// Result type of a function after applying every parameter clause.
    ///
    /// An error type is returned unchanged.
    ///
    /// # Errors
    ///
    /// - [`AstError::KindMismatch`] if this is not a function
    /// - [`AstError::UnresolvedType`] before type checking
    /// - [`AstError::NotAFunctionType`] if a clause does not peel to a
    ///   function result
    pub fn func_result_type(&self) -> AstResult<Type<'a>> {
        match self.kind() {
            ExprKind::Func(func) => func.result_type(self.ty()),
            _ => Err(self.kind_mismatch("Func")),
        }
    }

    /// Result type of a closure; errors as for [`Expr::func_result_type`].
    ///
    /// # Errors
    ///
    /// See [`Expr::func_result_type`].
    pub fn closure_result_type(&self) -> AstResult<Type<'a>> {
        match self.kind() {
            ExprKind::PipeClosure(closure) => closure.result_type(self.ty()),
            _ => Err(self.kind_mismatch("PipeClosure")),
        }
    }

    /// Parameter patterns of a capturing expression: the argument clauses of
    /// a function, or the one pattern of a closure.
    #[must_use]
    pub fn param_patterns(&self) -> Option<&[&'a Pattern<'a>]> {
        match self.kind() {
            ExprKind::Func(func) => Some(func.arg_param_patterns()),
            ExprKind::PipeClosure(closure) => Some(std::slice::from_ref(&closure.params)),
            ExprKind::ImplicitClosure(closure) => Some(closure.params),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use ferrule_mem::LocalArena;

    use super::*;
    use crate::ast::decl::DeclKind;
    use crate::context::AstContext;

    fn this_pattern<'a>(ctx: &AstContext<'a>, loc: SourceLoc) -> &'a Pattern<'a> {
        let this = ctx.value_decl(DeclKind::Var, "this", loc, None);
        let named = ctx.named_pattern(this);
        ctx.typed_pattern(named, TypeLoc::default())
    }

    #[test]
    fn test_param_clauses_split() {
        let arena = LocalArena::default();
        let ctx = AstContext::new(&arena);

        let arg = ctx.any_pattern(SourceLoc::new(5));
        let body = ctx.any_pattern(SourceLoc::INVALID);
        let func = ctx
            .func(SourceLoc::new(0), &[arg], &[body], TypeLoc::default(), None)
            .unwrap();
        let payload = func.as_func().unwrap();

        assert_eq!(payload.num_param_patterns(), 1);
        assert!(std::ptr::eq(payload.arg_param_patterns()[0], arg));
        assert!(std::ptr::eq(payload.body_param_patterns()[0], body));
        assert_eq!(func.param_patterns().unwrap().len(), 1);
    }

    #[test]
    fn test_param_clause_mismatch() {
        let arena = LocalArena::default();
        let ctx = AstContext::new(&arena);

        let arg = ctx.any_pattern(SourceLoc::new(5));
        let err = ctx
            .func(SourceLoc::new(0), &[arg], &[], TypeLoc::default(), None)
            .unwrap_err();
        assert_eq!(err, AstError::ParamClauseMismatch { args: 1, body: 0 });
    }

    #[test]
    fn test_implicit_this_decl() {
        let arena = LocalArena::default();
        let ctx = AstContext::new(&arena);

        let implicit = this_pattern(&ctx, SourceLoc::INVALID);
        let method = ctx
            .func(SourceLoc::new(0), &[implicit], &[implicit], TypeLoc::default(), None)
            .unwrap();
        let this = method.as_func().unwrap().implicit_this_decl().unwrap();
        assert_eq!(this.name().as_str(), "this");

        let written = this_pattern(&ctx, SourceLoc::new(3));
        let free = ctx
            .func(SourceLoc::new(0), &[written], &[written], TypeLoc::default(), None)
            .unwrap();
        assert!(free.as_func().unwrap().implicit_this_decl().is_none());

        let nullary = ctx
            .func(SourceLoc::new(0), &[], &[], TypeLoc::default(), None)
            .unwrap();
        assert!(nullary.as_func().unwrap().implicit_this_decl().is_none());
    }

    #[test]
    fn test_func_result_type() {
        let arena = LocalArena::default();
        let ctx = AstContext::new(&arena);
        let int = ctx.builtin_integer_type(32).unwrap();
        let unit = ctx.empty_tuple_type();
        let p = ctx.any_pattern(SourceLoc::INVALID);
        let curried_func = || {
            ctx.func(SourceLoc::new(0), &[p, p], &[p, p], TypeLoc::default(), None).unwrap()
        };

        let func = curried_func();
        assert!(matches!(
            func.func_result_type(),
            Err(AstError::UnresolvedType { kind: "Func" })
        ));
        func.set_type(ctx.function_type(unit, ctx.function_type(unit, int))).unwrap();
        assert_eq!(func.func_result_type(), Ok(int));

        let broken = curried_func();
        broken.set_type(ctx.error_type()).unwrap();
        assert_eq!(broken.func_result_type(), Ok(ctx.error_type()));

        let shallow = curried_func();
        shallow.set_type(ctx.function_type(unit, int)).unwrap();
        assert_eq!(
            shallow.func_result_type(),
            Err(AstError::NotAFunctionType {
                kind: "Func",
                found: "Builtin.Int32".to_string(),
            })
        );

        let lit = ctx.integer_literal("1", SourceLoc::new(0));
        assert!(matches!(
            lit.func_result_type(),
            Err(AstError::KindMismatch { .. })
        ));
    }

    #[test]
    fn test_closure_result_type() {
        let arena = LocalArena::default();
        let ctx = AstContext::new(&arena);
        let int = ctx.builtin_integer_type(32).unwrap();
        let unit = ctx.empty_tuple_type();

        let value = ctx.integer_literal("1", SourceLoc::new(3));
        let inner = ctx.brace_stmt(
            SourceLoc::new(3),
            &[BraceElement::Expr(value)],
            SourceLoc::new(4),
        );
        let body = ctx.brace_stmt(
            SourceLoc::new(2),
            &[BraceElement::Stmt(ctx.nested_brace_stmt(inner))],
            SourceLoc::new(5),
        );
        let closure = ctx
            .pipe_closure(ctx.any_pattern(SourceLoc::new(1)), body, false)
            .unwrap();

        assert!(closure.closure_result_type().is_err());
        closure.set_type(ctx.function_type(unit, int)).unwrap();
        assert_eq!(closure.closure_result_type(), Ok(int));

        let mistyped = ctx
            .pipe_closure(ctx.any_pattern(SourceLoc::new(1)), body, false)
            .unwrap();
        mistyped.set_type(int).unwrap();
        assert!(matches!(
            mistyped.closure_result_type(),
            Err(AstError::NotAFunctionType { kind: "PipeClosure", .. })
        ));
    }

    #[test]
    fn test_single_expression_body() {
        let arena = LocalArena::default();
        let ctx = AstContext::new(&arena);

        let x = ctx.integer_literal("1", SourceLoc::new(4));
        let y = ctx.integer_literal("2", SourceLoc::new(4));
        let ret = ctx.return_stmt(SourceLoc::INVALID, Some(x));
        let body = ctx.brace_stmt(SourceLoc::new(0), &[BraceElement::Stmt(ret)], SourceLoc::new(6));
        let params = ctx.any_pattern(SourceLoc::new(2));
        let closure = ctx.pipe_closure(params, body, true).unwrap();
        let payload = closure.as_pipe_closure().unwrap();

        assert!(std::ptr::eq(payload.single_expression_body().unwrap(), x));
        payload.set_single_expression_body(y).unwrap();
        assert!(std::ptr::eq(payload.single_expression_body().unwrap(), y));

        let multi = ctx.pipe_closure(params, body, false).unwrap();
        assert_eq!(
            multi.as_pipe_closure().unwrap().single_expression_body().unwrap_err(),
            AstError::NotSingleExpressionBody
        );
    }

    #[test]
    fn test_captures_default_empty() {
        let arena = LocalArena::default();
        let ctx = AstContext::new(&arena);

        let x = ctx.value_decl(DeclKind::Var, "x", SourceLoc::new(0), None);
        let value = ctx.integer_literal("1", SourceLoc::new(4));
        let closure = ctx.implicit_closure(value, None);
        assert_eq!(closure.captures().unwrap().len(), 0);
        assert_eq!(closure.param_patterns().unwrap().len(), 0);

        let ExprKind::ImplicitClosure(payload) = closure.kind() else {
            panic!("expected implicit closure");
        };
        payload.set_captures(ctx.decl_list(&[x]));
        assert_eq!(closure.captures().unwrap()[0].name().as_str(), "x");
        assert!(value.captures().is_none());
    }
}

//! Grouping, collections, subscripts and the remaining composite forms.

use std::cell::Cell;

use crate::ast::decl::ValueDecl;
use crate::ast::ty::{Substitution, TypeLoc};
use crate::error::AstResult;
use crate::span::{SourceLoc, SourceRange};

use super::{Expr, set_slot};

/// `(sub)`
#[derive(Debug)]
pub struct ParenExpr<'a> {
    /// `(` location; invalid when synthesized
    pub lparen: SourceLoc,
    sub: Cell<&'a Expr<'a>>,
    /// `)` location
    pub rparen: SourceLoc,
    /// The operand is a trailing closure written after the parentheses
    pub has_trailing_closure: bool,
}

impl<'a> ParenExpr<'a> {
    pub(crate) fn new(
        lparen: SourceLoc,
        sub: &'a Expr<'a>,
        rparen: SourceLoc,
        has_trailing_closure: bool,
    ) -> Self {
        Self {
            lparen,
            sub: Cell::new(sub),
            rparen,
            has_trailing_closure,
        }
    }

    /// The parenthesized expression.
    #[must_use]
    pub fn sub_expr(&self) -> &'a Expr<'a> {
        self.sub.get()
    }

    /// Replaces the parenthesized expression.
    pub fn set_sub_expr(&self, sub: &'a Expr<'a>) {
        self.sub.set(sub);
    }
}

/// `(a, b, c)`
///
/// Element slots may be empty; type checking leaves a slot empty when the
/// element is filled from a default value.
#[derive(Debug)]
pub struct TupleExpr<'a> {
    /// `(` location; invalid when synthesized
    pub lparen: SourceLoc,
    elements: &'a [Cell<Option<&'a Expr<'a>>>],
    /// `)` location
    pub rparen: SourceLoc,
    /// The last element is a trailing closure
    pub has_trailing_closure: bool,
}

impl<'a> TupleExpr<'a> {
    pub(crate) fn new(
        lparen: SourceLoc,
        elements: &'a [Cell<Option<&'a Expr<'a>>>],
        rparen: SourceLoc,
        has_trailing_closure: bool,
    ) -> Self {
        Self {
            lparen,
            elements,
            rparen,
            has_trailing_closure,
        }
    }

    /// Number of element slots, including empty ones.
    #[must_use]
    pub fn num_elements(&self) -> usize {
        self.elements.len()
    }

    /// Element slots in order.
    pub fn elements(&self) -> impl ExactSizeIterator<Item = Option<&'a Expr<'a>>> + '_ {
        self.elements.iter().map(Cell::get)
    }

    /// Element `index`; `None` for an empty slot or an index out of range.
    #[must_use]
    pub fn element(&self, index: usize) -> Option<&'a Expr<'a>> {
        self.elements.get(index).and_then(Cell::get)
    }

    /// Fills or clears element `index`.
    ///
    /// # Errors
    ///
    /// Returns [`AstError::ElementIndexOutOfRange`](crate::error::AstError)
    /// past the last slot.
    pub fn set_element(&self, index: usize, element: Option<&'a Expr<'a>>) -> AstResult<()> {
        set_slot(self.elements, index, element)
    }
}

/// `[...]` literal; the contents are a tuple or paren.
#[derive(Debug)]
pub struct CollectionExpr<'a> {
    /// `[` location
    pub lbracket: SourceLoc,
    sub: Cell<&'a Expr<'a>>,
    /// `]` location
    pub rbracket: SourceLoc,
}

impl<'a> CollectionExpr<'a> {
    pub(crate) fn new(lbracket: SourceLoc, sub: &'a Expr<'a>, rbracket: SourceLoc) -> Self {
        Self {
            lbracket,
            sub: Cell::new(sub),
            rbracket,
        }
    }

    /// The elements.
    #[must_use]
    pub fn sub_expr(&self) -> &'a Expr<'a> {
        self.sub.get()
    }

    /// Replaces the elements.
    pub fn set_sub_expr(&self, sub: &'a Expr<'a>) {
        self.sub.set(sub);
    }
}

/// How a subscript's base was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubscriptKind {
    /// Concrete type
    Concrete,
    /// Protocol type
    Existential,
    /// Generic parameter
    Archetype,
    /// Bound generic type
    Generic,
}

/// `base[index]`
#[derive(Debug)]
pub struct SubscriptExpr<'a> {
    base: Cell<&'a Expr<'a>>,
    index: Cell<&'a Expr<'a>>,
    /// Resolved subscript declaration
    pub decl: Option<&'a ValueDecl<'a>>,
    substitutions: Cell<&'a [Substitution<'a>]>,
}

impl<'a> SubscriptExpr<'a> {
    pub(crate) fn new(
        base: &'a Expr<'a>,
        index: &'a Expr<'a>,
        decl: Option<&'a ValueDecl<'a>>,
    ) -> Self {
        let no_substitutions: &'a [Substitution<'a>] = &[];
        Self {
            base: Cell::new(base),
            index: Cell::new(index),
            decl,
            substitutions: Cell::new(no_substitutions),
        }
    }

    /// The subscripted value.
    #[must_use]
    pub fn base(&self) -> &'a Expr<'a> {
        self.base.get()
    }

    /// Replaces the subscripted value.
    pub fn set_base(&self, base: &'a Expr<'a>) {
        self.base.set(base);
    }

    /// The index, a tuple or paren.
    #[must_use]
    pub fn index(&self) -> &'a Expr<'a> {
        self.index.get()
    }

    /// Replaces the index.
    pub fn set_index(&self, index: &'a Expr<'a>) {
        self.index.set(index);
    }

    /// Generic argument bindings of a generic subscript.
    #[must_use]
    pub fn substitutions(&self) -> &'a [Substitution<'a>] {
        self.substitutions.get()
    }

    /// Attaches generic argument bindings.
    pub fn set_substitutions(&self, substitutions: &'a [Substitution<'a>]) {
        self.substitutions.set(substitutions);
    }
}

/// `&sub`
#[derive(Debug)]
pub struct AddressOfExpr<'a> {
    /// `&` location
    pub op_loc: SourceLoc,
    sub: Cell<&'a Expr<'a>>,
}

impl<'a> AddressOfExpr<'a> {
    pub(crate) fn new(op_loc: SourceLoc, sub: &'a Expr<'a>) -> Self {
        Self {
            op_loc,
            sub: Cell::new(sub),
        }
    }

    /// The operand.
    #[must_use]
    pub fn sub_expr(&self) -> &'a Expr<'a> {
        self.sub.get()
    }

    /// Replaces the operand.
    pub fn set_sub_expr(&self, sub: &'a Expr<'a>) {
        self.sub.set(sub);
    }
}

/// Operands and operators of an infix sequence, in source order.
#[derive(Debug)]
pub struct SequenceExpr<'a> {
    elements: &'a [Cell<&'a Expr<'a>>],
}

impl<'a> SequenceExpr<'a> {
    pub(crate) fn new(elements: &'a [Cell<&'a Expr<'a>>]) -> Self {
        Self { elements }
    }

    /// Number of elements.
    #[must_use]
    pub fn num_elements(&self) -> usize {
        self.elements.len()
    }

    /// Elements in order.
    pub fn elements(&self) -> impl ExactSizeIterator<Item = &'a Expr<'a>> + '_ {
        self.elements.iter().map(Cell::get)
    }

    /// Element `index`.
    #[must_use]
    pub fn element(&self, index: usize) -> Option<&'a Expr<'a>> {
        self.elements.get(index).map(Cell::get)
    }

    /// Replaces element `index`.
    ///
    /// # Errors
    ///
    /// Returns [`AstError::ElementIndexOutOfRange`](crate::error::AstError)
    /// past the last element.
    pub fn set_element(&self, index: usize, element: &'a Expr<'a>) -> AstResult<()> {
        set_slot(self.elements, index, element)
    }
}

/// One `[n]` of a `new` expression.
#[derive(Debug, Clone, Copy)]
pub struct ArrayBound<'a> {
    /// Bound value; only the first bound may be omitted
    pub value: Option<&'a Expr<'a>>,
    /// `[` to `]`
    pub brackets: SourceRange,
}

/// `new T[n][m]`
#[derive(Debug)]
pub struct NewArrayExpr<'a> {
    /// `new` location
    pub new_loc: SourceLoc,
    /// Element type as written
    pub element_type: TypeLoc<'a>,
    /// Bounds, outermost first; never empty
    pub bounds: &'a [ArrayBound<'a>],
    injection_function: Cell<Option<&'a Expr<'a>>>,
}

impl<'a> NewArrayExpr<'a> {
    pub(crate) fn new(
        new_loc: SourceLoc,
        element_type: TypeLoc<'a>,
        bounds: &'a [ArrayBound<'a>],
    ) -> Self {
        Self {
            new_loc,
            element_type,
            bounds,
            injection_function: Cell::new(None),
        }
    }

    /// Function that wraps the allocated storage into the array value.
    #[must_use]
    pub fn injection_function(&self) -> Option<&'a Expr<'a>> {
        self.injection_function.get()
    }

    /// Sets the injection function.
    pub fn set_injection_function(&self, func: &'a Expr<'a>) {
        self.injection_function.set(Some(func));
    }
}

/// `base.metatype`, or a bare `.metatype` on a type
#[derive(Debug)]
pub struct MetatypeExpr<'a> {
    base: Cell<Option<&'a Expr<'a>>>,
    /// `metatype` keyword location; invalid when synthesized
    pub metatype_loc: SourceLoc,
}

impl<'a> MetatypeExpr<'a> {
    pub(crate) fn new(base: Option<&'a Expr<'a>>, metatype_loc: SourceLoc) -> Self {
        Self {
            base: Cell::new(base),
            metatype_loc,
        }
    }

    /// The value whose metatype is taken.
    #[must_use]
    pub fn base(&self) -> Option<&'a Expr<'a>> {
        self.base.get()
    }

    /// Replaces the base.
    pub fn set_base(&self, base: &'a Expr<'a>) {
        self.base.set(Some(base));
    }
}

/// `cond ? then : else`
#[derive(Debug)]
pub struct IfExpr<'a> {
    cond: Cell<&'a Expr<'a>>,
    /// `?` location
    pub question_loc: SourceLoc,
    then_expr: Cell<&'a Expr<'a>>,
    /// `:` location
    pub colon_loc: SourceLoc,
    else_expr: Cell<Option<&'a Expr<'a>>>,
}

impl<'a> IfExpr<'a> {
    pub(crate) fn new(
        cond: &'a Expr<'a>,
        question_loc: SourceLoc,
        then_expr: &'a Expr<'a>,
        colon_loc: SourceLoc,
        else_expr: Option<&'a Expr<'a>>,
    ) -> Self {
        Self {
            cond: Cell::new(cond),
            question_loc,
            then_expr: Cell::new(then_expr),
            colon_loc,
            else_expr: Cell::new(else_expr),
        }
    }

    /// The condition.
    #[must_use]
    pub fn cond(&self) -> &'a Expr<'a> {
        self.cond.get()
    }

    /// Replaces the condition.
    pub fn set_cond(&self, cond: &'a Expr<'a>) {
        self.cond.set(cond);
    }

    /// The value when the condition holds.
    #[must_use]
    pub fn then_expr(&self) -> &'a Expr<'a> {
        self.then_expr.get()
    }

    /// Replaces the value when the condition holds.
    pub fn set_then_expr(&self, then_expr: &'a Expr<'a>) {
        self.then_expr.set(then_expr);
    }

    /// The value otherwise.
    #[must_use]
    pub fn else_expr(&self) -> Option<&'a Expr<'a>> {
        self.else_expr.get()
    }

    /// Replaces the value otherwise.
    pub fn set_else_expr(&self, else_expr: &'a Expr<'a>) {
        self.else_expr.set(Some(else_expr));
    }
}

/// A default argument value spliced into a call.
#[derive(Debug)]
pub struct DefaultValueExpr<'a> {
    sub: Cell<&'a Expr<'a>>,
}

impl<'a> DefaultValueExpr<'a> {
    pub(crate) fn new(sub: &'a Expr<'a>) -> Self {
        Self { sub: Cell::new(sub) }
    }

    /// The default value expression.
    #[must_use]
    pub fn sub_expr(&self) -> &'a Expr<'a> {
        self.sub.get()
    }

    /// Replaces the default value expression.
    pub fn set_sub_expr(&self, sub: &'a Expr<'a>) {
        self.sub.set(sub);
    }
}

/// Rebinds `this` to the result of delegating to another constructor.
#[derive(Debug)]
pub struct RebindThisInConstructorExpr<'a> {
    sub: Cell<&'a Expr<'a>>,
    /// The constructor's implicit `this`
    pub this_decl: &'a ValueDecl<'a>,
}

impl<'a> RebindThisInConstructorExpr<'a> {
    pub(crate) fn new(sub: &'a Expr<'a>, this_decl: &'a ValueDecl<'a>) -> Self {
        Self {
            sub: Cell::new(sub),
            this_decl,
        }
    }

    /// The delegating constructor call.
    #[must_use]
    pub fn sub_expr(&self) -> &'a Expr<'a> {
        self.sub.get()
    }

    /// Replaces the delegating call.
    pub fn set_sub_expr(&self, sub: &'a Expr<'a>) {
        self.sub.set(sub);
    }
}

#[cfg(test)]
mod tests {
    use ferrule_mem::LocalArena;

    use super::*;
    use crate::context::AstContext;
    use crate::error::AstError;

    #[test]
    fn test_tuple_slots() {
        let arena = LocalArena::default();
        let ctx = AstContext::new(&arena);

        let a = ctx.integer_literal("1", SourceLoc::new(1));
        let b = ctx.integer_literal("2", SourceLoc::new(4));
        let tuple = ctx.tuple(SourceLoc::new(0), &[Some(a), None], SourceLoc::new(5), false);
        let payload = tuple.as_tuple().unwrap();

        assert_eq!(payload.num_elements(), 2);
        assert!(payload.element(1).is_none());
        payload.set_element(1, Some(b)).unwrap();
        assert!(std::ptr::eq(payload.element(1).unwrap(), b));
        assert_eq!(
            payload.set_element(2, Some(b)),
            Err(AstError::ElementIndexOutOfRange { index: 2, len: 2 })
        );
        assert!(payload.element(7).is_none());
    }

    #[test]
    fn test_sequence_order() {
        let arena = LocalArena::default();
        let ctx = AstContext::new(&arena);

        let a = ctx.unresolved_decl_ref("a", SourceLoc::new(0));
        let op = ctx.unresolved_decl_ref("+", SourceLoc::new(2));
        let b = ctx.unresolved_decl_ref("b", SourceLoc::new(4));
        let seq = ctx.sequence(&[a, op, b]);
        let payload = seq.as_sequence().unwrap();

        let elements: Vec<_> = payload.elements().collect();
        assert_eq!(elements.len(), 3);
        assert!(std::ptr::eq(elements[0], a));
        assert!(std::ptr::eq(elements[2], b));
        payload.set_element(0, b).unwrap();
        assert!(std::ptr::eq(payload.element(0).unwrap(), b));
    }

    #[test]
    fn test_new_array_injection() {
        let arena = LocalArena::default();
        let ctx = AstContext::new(&arena);
        let int = ctx.builtin_integer_type(64).unwrap();

        let n = ctx.integer_literal("4", SourceLoc::new(8));
        let bound = ArrayBound {
            value: Some(n),
            brackets: SourceRange::new(SourceLoc::new(7), SourceLoc::new(9)),
        };
        let expr = ctx.new_array(
            SourceLoc::new(0),
            TypeLoc::new(Some(int), SourceRange::point(SourceLoc::new(4))),
            &[bound],
        );
        let payload = expr.as_new_array().unwrap();
        assert!(payload.injection_function().is_none());

        let inject = ctx.unresolved_decl_ref("inject", SourceLoc::INVALID);
        payload.set_injection_function(inject);
        assert!(std::ptr::eq(payload.injection_function().unwrap(), inject));
        assert_eq!(payload.bounds.len(), 1);
    }
}

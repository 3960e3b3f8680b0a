//! Implicit conversions inserted by type checking, and explicit casts.

use std::cell::Cell;

use ferrule_log::trace;

use crate::ast::ty::{Substitution, TypeLoc};
use crate::span::SourceLoc;

use super::Expr;

/// The payload every implicit conversion shares: the converted expression.
#[derive(Debug)]
pub struct ImplicitConversionExpr<'a> {
    sub: Cell<&'a Expr<'a>>,
}

impl<'a> ImplicitConversionExpr<'a> {
    pub(crate) fn new(sub: &'a Expr<'a>) -> Self {
        Self { sub: Cell::new(sub) }
    }

    /// The converted expression.
    #[must_use]
    pub fn sub_expr(&self) -> &'a Expr<'a> {
        self.sub.get()
    }

    /// Replaces the converted expression.
    pub fn set_sub_expr(&self, sub: &'a Expr<'a>) {
        trace!(
            "conversion operand {} replaced by {}",
            self.sub.get().tag().name(),
            sub.tag().name()
        );
        self.sub.set(sub);
    }
}

/// The implicit conversions that carry nothing beyond their operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversionKind {
    /// Between compatible function types
    FunctionConversion,
    /// Concrete value to protocol type
    Erasure,
    /// Lvalue to rvalue
    Load,
    /// Rvalue to temporary lvalue
    Materialize,
    /// Between lvalue qualifications
    Requalify,
    /// Between metatypes
    MetatypeConversion,
    /// Subclass to superclass
    DerivedToBase,
    /// Generic parameter to its class bound
    ArchetypeToSuper,
    /// Closure to a block
    BridgeToBlock,
}

/// Builds a tuple from the elements of another.
///
/// Entry `i` of the mapping names the source element for result element
/// `i`; negative entries mark elements filled some other way, such as from a
/// default value.
#[derive(Debug)]
pub struct TupleShuffleExpr<'a> {
    /// The converted tuple
    pub conversion: ImplicitConversionExpr<'a>,
    /// Source index per result element
    pub element_mapping: &'a [i32],
}

/// A generic value bound to concrete generic arguments.
#[derive(Debug)]
pub struct SpecializeExpr<'a> {
    /// The generic value
    pub conversion: ImplicitConversionExpr<'a>,
    /// Generic argument bindings
    pub substitutions: &'a [Substitution<'a>],
}

/// A scalar wrapped into a tuple with every other element defaulted.
#[derive(Debug)]
pub struct ScalarToTupleExpr<'a> {
    /// The scalar
    pub conversion: ImplicitConversionExpr<'a>,
    /// Index the scalar lands at
    pub scalar_field: u32,
}

/// Kinds of explicit cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastKind {
    /// `T(x)`
    Coerce,
    /// `x as T`, checked at runtime
    UncheckedDowncast,
    /// `x as T`, class bound to generic parameter
    UncheckedSuperToArchetype,
    /// `x is T`
    IsSubtype,
}

/// An explicit cast to a written type.
#[derive(Debug)]
pub struct ExplicitCastExpr<'a> {
    sub: Cell<&'a Expr<'a>>,
    /// `as` or `is` keyword location; invalid for a coercion or when
    /// synthesized
    pub op_loc: SourceLoc,
    /// Target type as written
    pub type_loc: TypeLoc<'a>,
}

impl<'a> ExplicitCastExpr<'a> {
    pub(crate) fn new(sub: &'a Expr<'a>, op_loc: SourceLoc, type_loc: TypeLoc<'a>) -> Self {
        Self {
            sub: Cell::new(sub),
            op_loc,
            type_loc,
        }
    }

    /// The value being cast.
    #[must_use]
    pub fn sub_expr(&self) -> &'a Expr<'a> {
        self.sub.get()
    }

    /// Replaces the value being cast.
    pub fn set_sub_expr(&self, sub: &'a Expr<'a>) {
        self.sub.set(sub);
    }
}

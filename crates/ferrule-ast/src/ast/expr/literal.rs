//! Leaf expressions: literals and placeholders.

use std::cell::Cell;

use crate::ast::ty::Type;
use crate::error::{AstError, AstResult};
use crate::literal::{self, ApFloat, ApInt};
use crate::span::{SourceLoc, SourceRange};

use super::{Expr, ExprKind, set_slot};

/// An expression that failed to parse or type check.
#[derive(Debug, Clone, Copy)]
pub struct ErrorExpr {
    /// Source covered by the erroneous expression
    pub range: SourceRange,
}

/// Integer literal, kept as source text until its width is known.
#[derive(Debug, Clone, Copy)]
pub struct IntegerLiteralExpr<'a> {
    /// Literal spelling, e.g. `0x1F`
    pub text: &'a str,
    /// Literal location
    pub loc: SourceLoc,
}

impl IntegerLiteralExpr<'_> {
    pub(crate) fn value(&self, ty: Option<Type<'_>>) -> AstResult<ApInt> {
        let ty = resolved(ty, "IntegerLiteral")?;
        let width = ty
            .builtin_integer_width()
            .ok_or_else(|| AstError::LiteralTypeMismatch {
                expected: "builtin integer",
                found: ty.to_string(),
            })?;
        literal::parse_integer(self.text, width)
    }
}

/// Floating-point literal, kept as source text until its precision is known.
#[derive(Debug, Clone, Copy)]
pub struct FloatLiteralExpr<'a> {
    /// Literal spelling
    pub text: &'a str,
    /// Literal location
    pub loc: SourceLoc,
}

impl FloatLiteralExpr<'_> {
    pub(crate) fn value(&self, ty: Option<Type<'_>>) -> AstResult<ApFloat> {
        let ty = resolved(ty, "FloatLiteral")?;
        let semantics = ty
            .builtin_float_semantics()
            .ok_or_else(|| AstError::LiteralTypeMismatch {
                expected: "builtin float",
                found: ty.to_string(),
            })?;
        literal::parse_float(self.text, semantics)
    }
}

fn resolved<'t>(ty: Option<Type<'t>>, kind: &'static str) -> AstResult<Type<'t>> {
    match ty {
        Some(ty) if !ty.is_unresolved() => Ok(ty),
        _ => Err(AstError::UnresolvedType { kind }),
    }
}

impl Expr<'_> {
    /// Value of an integer literal at the width of its resolved type.
    ///
    /// # Errors
    ///
    /// - [`AstError::KindMismatch`] if this is not an integer literal
    /// - [`AstError::UnresolvedType`] before type checking
    /// - [`AstError::LiteralTypeMismatch`] if the type is not a builtin integer
    /// - [`AstError::MalformedLiteral`] if the text does not parse
    pub fn integer_literal_value(&self) -> AstResult<ApInt> {
        match self.kind() {
            ExprKind::IntegerLiteral(lit) => lit.value(self.ty()),
            _ => Err(self.kind_mismatch("IntegerLiteral")),
        }
    }

    /// Value of a float literal, rounded once to the precision of its
    /// resolved type.
    ///
    /// # Errors
    ///
    /// Same as [`Expr::integer_literal_value`], with a builtin float type
    /// required.
    pub fn float_literal_value(&self) -> AstResult<ApFloat> {
        match self.kind() {
            ExprKind::FloatLiteral(lit) => lit.value(self.ty()),
            _ => Err(self.kind_mismatch("FloatLiteral")),
        }
    }
}

/// `'c'`
#[derive(Debug, Clone, Copy)]
pub struct CharacterLiteralExpr {
    /// The character
    pub value: char,
    /// Literal location
    pub loc: SourceLoc,
}

/// `"text"`, with escapes already processed.
#[derive(Debug, Clone, Copy)]
pub struct StringLiteralExpr<'a> {
    /// Literal contents
    pub value: &'a str,
    /// Literal location
    pub loc: SourceLoc,
}

/// A string literal with interpolated segments.
#[derive(Debug)]
pub struct InterpolatedStringLiteralExpr<'a> {
    /// Location of the opening quote
    pub loc: SourceLoc,
    segments: &'a [Cell<&'a Expr<'a>>],
}

impl<'a> InterpolatedStringLiteralExpr<'a> {
    pub(crate) fn new(loc: SourceLoc, segments: &'a [Cell<&'a Expr<'a>>]) -> Self {
        Self { loc, segments }
    }

    /// Segments in source order: string literals and interpolated expressions.
    pub fn segments(&self) -> impl ExactSizeIterator<Item = &'a Expr<'a>> + '_ {
        self.segments.iter().map(Cell::get)
    }

    /// Number of segments.
    #[must_use]
    pub fn num_segments(&self) -> usize {
        self.segments.len()
    }

    /// Replaces segment `index`.
    ///
    /// # Errors
    ///
    /// Returns [`AstError::ElementIndexOutOfRange`] past the last segment.
    pub fn set_segment(&self, index: usize, segment: &'a Expr<'a>) -> AstResult<()> {
        set_slot(self.segments, index, segment)
    }
}

/// A value provided by the surrounding construct rather than by source.
#[derive(Debug, Clone, Copy)]
pub struct OpaqueValueExpr {
    /// Location of the construct supplying the value
    pub loc: SourceLoc,
}

//! Expression nodes.
//!
//! An [`Expr`] is an immutable kind payload ([`ExprKind`]) plus a write-once
//! resolved type. Nodes live in the arena of an
//! [`AstContext`](crate::context::AstContext) and refer to their children as
//! `&'a Expr<'a>`.
//!
//! The kind never changes after construction. Semantic analysis mutates a
//! tree only through narrow setters: it resolves the type once, replaces
//! individual child references, and attaches substitutions or capture lists.
//! Variable-length payloads (tuple elements, sequence operands, array
//! bounds) are arena slices whose length is fixed when the node is built.
//!
//! # Examples
//!
//! ```
//! use ferrule_ast::ast::expr::{ExprKind, ExprTag};
//! use ferrule_ast::context::AstContext;
//! use ferrule_ast::span::SourceLoc;
//! use ferrule_mem::LocalArena;
//!
//! let arena = LocalArena::default();
//! let ctx = AstContext::new(&arena);
//!
//! let lit = ctx.integer_literal("42", SourceLoc::new(1));
//! let paren = ctx.paren(SourceLoc::new(0), lit, SourceLoc::new(3), false);
//!
//! assert_eq!(paren.tag(), ExprTag::Paren);
//! assert!(matches!(paren.kind(), ExprKind::Paren(_)));
//! assert!(std::ptr::eq(paren.semantics_providing_expr(), lit));
//! ```

use std::cell::{Cell, OnceCell};
use std::fmt;

use ferrule_log::trace;

use crate::error::{AstError, AstResult};

use super::ty::Type;

pub mod apply;
pub mod closure;
pub mod compound;
pub mod conversion;
pub mod kind;
pub mod literal;
pub mod range;
pub mod refs;
pub mod semantics;

pub use apply::{ApplyExpr, ApplyKind, DotSyntaxBaseIgnoredExpr, DotSyntaxCallExpr};
pub use closure::{FuncExpr, ImplicitClosureExpr, PipeClosureExpr};
pub use compound::{
    AddressOfExpr, ArrayBound, CollectionExpr, DefaultValueExpr, IfExpr, MetatypeExpr,
    NewArrayExpr, ParenExpr, RebindThisInConstructorExpr, SequenceExpr, SubscriptExpr,
    SubscriptKind, TupleExpr,
};
pub use conversion::{
    CastKind, ConversionKind, ExplicitCastExpr, ImplicitConversionExpr, ScalarToTupleExpr,
    SpecializeExpr, TupleShuffleExpr,
};
pub use kind::ExprTag;
pub use literal::{
    CharacterLiteralExpr, ErrorExpr, FloatLiteralExpr, IntegerLiteralExpr,
    InterpolatedStringLiteralExpr, OpaqueValueExpr, StringLiteralExpr,
};
pub use refs::{
    DeclRefExpr, MemberRefExpr, MemberRefKind, ModuleExpr, OverloadedDeclRefExpr,
    OverloadedMemberRefExpr, TupleElementExpr, UnresolvedConstructorExpr, UnresolvedDeclRefExpr,
    UnresolvedDotExpr, UnresolvedKeywordExpr, UnresolvedMemberExpr, UnresolvedSpecializeExpr,
};

/// An expression node.
pub struct Expr<'a> {
    kind: ExprKind<'a>,
    ty: OnceCell<Type<'a>>,
}

/// Variant payload of an [`Expr`], one variant per [`ExprTag`].
///
/// Variants that differ only in how type checking resolved them share a
/// payload struct: the four member references share [`MemberRefExpr`], the
/// four subscripts [`SubscriptExpr`], and so on.
#[derive(Debug)]
pub enum ExprKind<'a> {
    /// Placeholder for an expression that failed to parse or type check
    Error(ErrorExpr),

    // ===== Literals =====
    /// `42`, `0x2A`
    IntegerLiteral(IntegerLiteralExpr<'a>),
    /// `1.5`, `0x1.8p3`
    FloatLiteral(FloatLiteralExpr<'a>),
    /// `'a'`
    CharacterLiteral(CharacterLiteralExpr),
    /// `"text"`
    StringLiteral(StringLiteralExpr<'a>),
    /// `"a \(b) c"`
    InterpolatedStringLiteral(InterpolatedStringLiteralExpr<'a>),

    // ===== References =====
    /// A resolved reference to a value
    DeclRef(DeclRefExpr<'a>),
    /// `super`
    SuperRef(DeclRefExpr<'a>),
    /// A reference to another constructor of the same type, from a constructor
    OtherConstructorDeclRef(DeclRefExpr<'a>),
    /// `x.constructor` before resolution
    UnresolvedConstructor(UnresolvedConstructorExpr<'a>),
    /// A reference to an overload set
    OverloadedDeclRef(OverloadedDeclRefExpr<'a>),
    /// `base.member` where `member` names an overload set
    OverloadedMemberRef(OverloadedMemberRefExpr<'a>),
    /// A name not yet looked up
    UnresolvedDeclRef(UnresolvedDeclRefExpr<'a>),
    /// `if` inside a sequence, before folding
    UnresolvedIf(UnresolvedKeywordExpr),
    /// `else` inside a sequence, before folding
    UnresolvedElse(UnresolvedKeywordExpr),
    /// `f<T>` before resolution
    UnresolvedSpecialize(UnresolvedSpecializeExpr<'a>),

    // ===== Member access =====
    /// Member of a concrete type
    MemberRef(MemberRefExpr<'a>),
    /// Member of a protocol type
    ExistentialMemberRef(MemberRefExpr<'a>),
    /// Member of a generic parameter
    ArchetypeMemberRef(MemberRefExpr<'a>),
    /// Member of a bound generic type
    GenericMemberRef(MemberRefExpr<'a>),
    /// `.member` with an inferred base
    UnresolvedMember(UnresolvedMemberExpr<'a>),
    /// `base.name` before lookup
    UnresolvedDot(UnresolvedDotExpr<'a>),
    /// A reference to an imported module
    Module(ModuleExpr<'a>),
    /// `tuple.0`
    TupleElement(TupleElementExpr<'a>),

    // ===== Grouping and collections =====
    /// `(x)`
    Paren(ParenExpr<'a>),
    /// `(a, b)`
    Tuple(TupleExpr<'a>),
    /// `[a, b]`
    Array(CollectionExpr<'a>),
    /// `[k: v]`
    Dictionary(CollectionExpr<'a>),

    // ===== Subscripts =====
    /// `base[index]` on a concrete type
    Subscript(SubscriptExpr<'a>),
    /// `base[index]` on a protocol type
    ExistentialSubscript(SubscriptExpr<'a>),
    /// `base[index]` on a generic parameter
    ArchetypeSubscript(SubscriptExpr<'a>),
    /// `base[index]` on a bound generic type
    GenericSubscript(SubscriptExpr<'a>),

    // ===== Implicit conversions =====
    /// Reorders, drops or defaults tuple elements
    TupleShuffle(TupleShuffleExpr<'a>),
    /// Between compatible function types
    FunctionConversion(ImplicitConversionExpr<'a>),
    /// Concrete value to protocol type
    Erasure(ImplicitConversionExpr<'a>),
    /// Generic value bound to concrete arguments
    Specialize(SpecializeExpr<'a>),
    /// Lvalue to rvalue
    Load(ImplicitConversionExpr<'a>),
    /// Rvalue to temporary lvalue
    Materialize(ImplicitConversionExpr<'a>),
    /// Between lvalue qualifications
    Requalify(ImplicitConversionExpr<'a>),
    /// Between metatypes
    MetatypeConversion(ImplicitConversionExpr<'a>),
    /// Subclass to superclass
    DerivedToBase(ImplicitConversionExpr<'a>),
    /// Generic parameter to its class bound
    ArchetypeToSuper(ImplicitConversionExpr<'a>),
    /// Scalar to a one-element tuple
    ScalarToTuple(ScalarToTupleExpr<'a>),
    /// Closure to a block
    BridgeToBlock(ImplicitConversionExpr<'a>),

    /// `&x`
    AddressOf(AddressOfExpr<'a>),
    /// Unfolded operator sequence `a + b * c`
    Sequence(SequenceExpr<'a>),

    // ===== Capturing =====
    /// `func (params) -> T { body }`
    Func(FuncExpr<'a>),
    /// `{ |params| body }`
    PipeClosure(PipeClosureExpr<'a>),
    /// Autoclosure around an argument
    ImplicitClosure(ImplicitClosureExpr<'a>),

    /// `new T[n]`
    NewArray(NewArrayExpr<'a>),
    /// `T.metatype`, `x.metatype`
    Metatype(MetatypeExpr<'a>),
    /// Stands for a value supplied elsewhere
    OpaqueValue(OpaqueValueExpr),
    /// Zero-initialized value of the node's type
    ZeroValue,

    // ===== Application =====
    /// `f(x)`
    Call(ApplyExpr<'a>),
    /// `-x`
    PrefixUnary(ApplyExpr<'a>),
    /// `x++`
    PostfixUnary(ApplyExpr<'a>),
    /// `a + b`
    Binary(ApplyExpr<'a>),
    /// `x.method` applied to `x`
    DotSyntaxCall(DotSyntaxCallExpr<'a>),
    /// `T(args)` applied to the constructor reference
    ConstructorRefCall(ApplyExpr<'a>),
    /// `T.member` where `T` is evaluated for its type only
    DotSyntaxBaseIgnored(DotSyntaxBaseIgnoredExpr<'a>),

    // ===== Explicit casts =====
    /// `T(x)`
    Coerce(ExplicitCastExpr<'a>),
    /// `x as T`
    UncheckedDowncast(ExplicitCastExpr<'a>),
    /// `x as T` from a class bound to a generic parameter
    UncheckedSuperToArchetype(ExplicitCastExpr<'a>),
    /// `x is T`
    IsSubtype(ExplicitCastExpr<'a>),

    /// `this = sub` in a constructor
    RebindThisInConstructor(RebindThisInConstructorExpr<'a>),
    /// `cond ? a : b`
    If(IfExpr<'a>),
    /// A default argument value
    DefaultValue(DefaultValueExpr<'a>),
}

impl<'a> Expr<'a> {
    pub(crate) fn new(kind: ExprKind<'a>, ty: Option<Type<'a>>) -> Self {
        let ty = match ty {
            Some(ty) => OnceCell::from(ty),
            None => OnceCell::new(),
        };
        Self { kind, ty }
    }

    /// Variant payload.
    #[must_use]
    pub fn kind(&self) -> &ExprKind<'a> {
        &self.kind
    }

    /// Variant identity.
    #[must_use]
    pub fn tag(&self) -> ExprTag {
        self.kind.tag()
    }

    /// Registry name of a kind, e.g. `"IntegerLiteral"`.
    #[must_use]
    pub fn kind_name(tag: ExprTag) -> &'static str {
        tag.name()
    }

    /// Resolved type; `None` before type checking reaches this node.
    #[must_use]
    pub fn ty(&self) -> Option<Type<'a>> {
        self.ty.get().copied()
    }

    /// Resolves the type of this node.
    ///
    /// # Errors
    ///
    /// Returns [`AstError::TypeAlreadySet`] if the type was resolved before;
    /// the stored type is left unchanged.
    pub fn set_type(&self, ty: Type<'a>) -> AstResult<()> {
        self.ty.set(ty).map_err(|_| AstError::TypeAlreadySet {
            kind: self.tag().name(),
        })?;
        trace!("resolved {} to {}", self.tag().name(), ty);
        Ok(())
    }

    pub(crate) fn kind_mismatch(&self, expected: &'static str) -> AstError {
        AstError::KindMismatch {
            expected,
            found: self.tag().name(),
        }
    }

    // ===== Family accessors =====

    /// The application payload of any call-like kind.
    #[must_use]
    pub fn as_apply(&self) -> Option<&ApplyExpr<'a>> {
        match &self.kind {
            ExprKind::Call(apply)
            | ExprKind::PrefixUnary(apply)
            | ExprKind::PostfixUnary(apply)
            | ExprKind::Binary(apply)
            | ExprKind::ConstructorRefCall(apply) => Some(apply),
            ExprKind::DotSyntaxCall(call) => Some(&call.apply),
            _ => None,
        }
    }

    /// The conversion payload of any implicit conversion kind.
    #[must_use]
    pub fn as_implicit_conversion(&self) -> Option<&ImplicitConversionExpr<'a>> {
        match &self.kind {
            ExprKind::FunctionConversion(conv)
            | ExprKind::Erasure(conv)
            | ExprKind::Load(conv)
            | ExprKind::Materialize(conv)
            | ExprKind::Requalify(conv)
            | ExprKind::MetatypeConversion(conv)
            | ExprKind::DerivedToBase(conv)
            | ExprKind::ArchetypeToSuper(conv)
            | ExprKind::BridgeToBlock(conv) => Some(conv),
            ExprKind::TupleShuffle(shuffle) => Some(&shuffle.conversion),
            ExprKind::Specialize(spec) => Some(&spec.conversion),
            ExprKind::ScalarToTuple(scalar) => Some(&scalar.conversion),
            _ => None,
        }
    }

    /// The payload of any of the four member reference kinds.
    #[must_use]
    pub fn as_member_ref(&self) -> Option<&MemberRefExpr<'a>> {
        match &self.kind {
            ExprKind::MemberRef(member)
            | ExprKind::ExistentialMemberRef(member)
            | ExprKind::ArchetypeMemberRef(member)
            | ExprKind::GenericMemberRef(member) => Some(member),
            _ => None,
        }
    }

    /// The payload of any of the four subscript kinds.
    #[must_use]
    pub fn as_subscript(&self) -> Option<&SubscriptExpr<'a>> {
        match &self.kind {
            ExprKind::Subscript(sub)
            | ExprKind::ExistentialSubscript(sub)
            | ExprKind::ArchetypeSubscript(sub)
            | ExprKind::GenericSubscript(sub) => Some(sub),
            _ => None,
        }
    }

    /// The payload of any explicit cast kind.
    #[must_use]
    pub fn as_explicit_cast(&self) -> Option<&ExplicitCastExpr<'a>> {
        match &self.kind {
            ExprKind::Coerce(cast)
            | ExprKind::UncheckedDowncast(cast)
            | ExprKind::UncheckedSuperToArchetype(cast)
            | ExprKind::IsSubtype(cast) => Some(cast),
            _ => None,
        }
    }

    // ===== Printing =====

    /// Renders the tree rooted here.
    #[must_use]
    pub fn print_to_string(&self) -> String {
        self.to_string()
    }

    /// Writes the tree rooted here to stderr.
    pub fn dump(&self) {
        eprintln!("{self}");
    }
}

/// Generates `Expr::as_*` accessors for kinds with a payload of their own.
macro_rules! variant_accessors {
    ($( $name:ident => $variant:ident($payload:ident); )*) => {
        impl<'a> Expr<'a> {
            $(
                #[doc = concat!("`", stringify!($variant), "` payload.")]
                #[must_use]
                pub fn $name(&self) -> Option<&$payload<'a>> {
                    match &self.kind {
                        ExprKind::$variant(payload) => Some(payload),
                        _ => None,
                    }
                }
            )*
        }
    };
}

variant_accessors! {
    as_decl_ref => DeclRef(DeclRefExpr);
    as_paren => Paren(ParenExpr);
    as_tuple => Tuple(TupleExpr);
    as_sequence => Sequence(SequenceExpr);
    as_integer_literal => IntegerLiteral(IntegerLiteralExpr);
    as_float_literal => FloatLiteral(FloatLiteralExpr);
    as_func => Func(FuncExpr);
    as_pipe_closure => PipeClosure(PipeClosureExpr);
    as_new_array => NewArray(NewArrayExpr);
}

impl fmt::Debug for Expr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Expr")
            .field("kind", &self.kind)
            .field("ty", &self.ty())
            .finish()
    }
}

/// Replaces the element at `index` of a fixed-length slot slice.
pub(crate) fn set_slot<T: Copy>(slots: &[Cell<T>], index: usize, value: T) -> AstResult<()> {
    let slot = slots.get(index).ok_or(AstError::ElementIndexOutOfRange {
        index,
        len: slots.len(),
    })?;
    slot.set(value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use ferrule_mem::LocalArena;

    use super::*;
    use crate::context::AstContext;
    use crate::span::SourceLoc;

    #[test]
    fn test_set_type_is_write_once() {
        let arena = LocalArena::default();
        let ctx = AstContext::new(&arena);
        let i32_ty = ctx.builtin_integer_type(32).unwrap();
        let i64_ty = ctx.builtin_integer_type(64).unwrap();

        let lit = ctx.integer_literal("5", SourceLoc::new(0));
        assert!(lit.ty().is_none());
        lit.set_type(i32_ty).unwrap();
        assert_eq!(
            lit.set_type(i64_ty),
            Err(AstError::TypeAlreadySet {
                kind: "IntegerLiteral"
            })
        );
        assert_eq!(lit.ty(), Some(i32_ty));
    }

    #[test]
    fn test_typed_at_construction() {
        let arena = LocalArena::default();
        let ctx = AstContext::new(&arena);
        let i32_ty = ctx.builtin_integer_type(32).unwrap();

        let lit = ctx.integer_literal("5", SourceLoc::new(0));
        let load = ctx.implicit_conversion(ConversionKind::Load, lit, i32_ty);
        assert_eq!(load.ty(), Some(i32_ty));
        assert_eq!(
            load.set_type(i32_ty),
            Err(AstError::TypeAlreadySet { kind: "Load" })
        );
    }

    #[test]
    fn test_kind_name() {
        assert_eq!(Expr::kind_name(ExprTag::UnresolvedDot), "UnresolvedDot");
        assert_eq!(Expr::kind_name(ExprTag::BridgeToBlock), "BridgeToBlock");
    }

    #[test]
    fn test_family_accessors() {
        let arena = LocalArena::default();
        let ctx = AstContext::new(&arena);
        let int = ctx.builtin_integer_type(64).unwrap();

        let lit = ctx.integer_literal("1", SourceLoc::new(0));
        let load = ctx.implicit_conversion(ConversionKind::Load, lit, int);
        let shuffle = ctx.tuple_shuffle(lit, int, &[0]);

        assert!(lit.as_implicit_conversion().is_none());
        assert!(std::ptr::eq(load.as_implicit_conversion().unwrap().sub_expr(), lit));
        assert!(std::ptr::eq(shuffle.as_implicit_conversion().unwrap().sub_expr(), lit));
        assert!(lit.as_integer_literal().is_some());
        assert!(load.as_apply().is_none());
    }

    #[test]
    fn test_set_slot_bounds() {
        let slots = [Cell::new(1), Cell::new(2)];
        set_slot(&slots, 1, 5).unwrap();
        assert_eq!(slots[1].get(), 5);
        assert_eq!(
            set_slot(&slots, 2, 9),
            Err(AstError::ElementIndexOutOfRange { index: 2, len: 2 })
        );
    }
}

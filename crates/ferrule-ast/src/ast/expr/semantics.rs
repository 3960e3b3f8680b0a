//! Unwrapping of semantically transparent nodes, and detection of nodes
//! synthesized by the compiler.

use crate::span::Spanned;

use super::{Expr, ExprKind};

impl<'a> Expr<'a> {
    /// Strips parentheses and default-value wrappers.
    ///
    /// The result is never a `Paren` or `DefaultValue` node.
    #[must_use]
    pub fn semantics_providing_expr(&'a self) -> &'a Expr<'a> {
        let mut expr = self;
        loop {
            match expr.kind() {
                ExprKind::Paren(paren) => expr = paren.sub_expr(),
                ExprKind::DefaultValue(default) => expr = default.sub_expr(),
                _ => return expr,
            }
        }
    }

    /// The expression that provides the value of this one.
    ///
    /// Currently the same as [`Self::semantics_providing_expr`].
    #[must_use]
    pub fn value_providing_expr(&'a self) -> &'a Expr<'a> {
        self.semantics_providing_expr()
    }

    /// Returns `true` if the compiler synthesized this node rather than
    /// parsing it from source.
    #[must_use]
    pub fn is_implicit(&self) -> bool {
        match self.kind() {
            ExprKind::DeclRef(decl_ref) => decl_ref.loc.is_invalid(),

            ExprKind::TupleShuffle(_)
            | ExprKind::FunctionConversion(_)
            | ExprKind::Erasure(_)
            | ExprKind::Specialize(_)
            | ExprKind::Load(_)
            | ExprKind::Materialize(_)
            | ExprKind::Requalify(_)
            | ExprKind::MetatypeConversion(_)
            | ExprKind::DerivedToBase(_)
            | ExprKind::ArchetypeToSuper(_)
            | ExprKind::ScalarToTuple(_)
            | ExprKind::BridgeToBlock(_) => self
                .as_implicit_conversion()
                .is_some_and(|conv| conv.sub_expr().is_implicit()),

            ExprKind::MemberRef(member)
            | ExprKind::GenericMemberRef(member)
            | ExprKind::ArchetypeMemberRef(member) => member.name_loc.is_invalid(),

            ExprKind::Metatype(meta) => meta.metatype_loc.is_invalid(),

            ExprKind::Call(_)
            | ExprKind::PrefixUnary(_)
            | ExprKind::PostfixUnary(_)
            | ExprKind::Binary(_)
            | ExprKind::DotSyntaxCall(_)
            | ExprKind::ConstructorRefCall(_) => self
                .as_apply()
                .and_then(|apply| apply.arg())
                .is_some_and(Expr::is_implicit),

            ExprKind::Tuple(tuple) => {
                self.source_range().is_invalid()
                    && tuple.elements().flatten().all(Expr::is_implicit)
            }

            ExprKind::UncheckedDowncast(cast) => {
                cast.op_loc.is_invalid() && cast.sub_expr().is_implicit()
            }

            ExprKind::ZeroValue | ExprKind::DefaultValue(_) => true,

            ExprKind::Error(_)
            | ExprKind::IntegerLiteral(_)
            | ExprKind::FloatLiteral(_)
            | ExprKind::CharacterLiteral(_)
            | ExprKind::StringLiteral(_)
            | ExprKind::InterpolatedStringLiteral(_)
            | ExprKind::SuperRef(_)
            | ExprKind::OtherConstructorDeclRef(_)
            | ExprKind::UnresolvedConstructor(_)
            | ExprKind::OverloadedDeclRef(_)
            | ExprKind::OverloadedMemberRef(_)
            | ExprKind::UnresolvedDeclRef(_)
            | ExprKind::UnresolvedIf(_)
            | ExprKind::UnresolvedElse(_)
            | ExprKind::UnresolvedSpecialize(_)
            | ExprKind::ExistentialMemberRef(_)
            | ExprKind::UnresolvedMember(_)
            | ExprKind::UnresolvedDot(_)
            | ExprKind::Module(_)
            | ExprKind::TupleElement(_)
            | ExprKind::Paren(_)
            | ExprKind::Array(_)
            | ExprKind::Dictionary(_)
            | ExprKind::Subscript(_)
            | ExprKind::ExistentialSubscript(_)
            | ExprKind::ArchetypeSubscript(_)
            | ExprKind::GenericSubscript(_)
            | ExprKind::AddressOf(_)
            | ExprKind::Sequence(_)
            | ExprKind::Func(_)
            | ExprKind::PipeClosure(_)
            | ExprKind::ImplicitClosure(_)
            | ExprKind::NewArray(_)
            | ExprKind::OpaqueValue(_)
            | ExprKind::DotSyntaxBaseIgnored(_)
            | ExprKind::Coerce(_)
            | ExprKind::UncheckedSuperToArchetype(_)
            | ExprKind::IsSubtype(_)
            | ExprKind::RebindThisInConstructor(_)
            | ExprKind::If(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use ferrule_mem::LocalArena;

    use super::*;
    use crate::ast::decl::DeclKind;
    use crate::ast::expr::{ApplyKind, ConversionKind, MemberRefKind};
    use crate::context::AstContext;
    use crate::span::SourceLoc;

    #[test]
    fn test_semantics_strips_parens_and_defaults() {
        let arena = LocalArena::default();
        let ctx = AstContext::new(&arena);

        let x = ctx.integer_literal("1", SourceLoc::new(2));
        let inner = ctx.paren(SourceLoc::new(1), x, SourceLoc::new(3), false);
        let default = ctx.default_value(inner);
        let outer = ctx.paren(SourceLoc::new(0), default, SourceLoc::new(4), false);

        assert!(std::ptr::eq(outer.semantics_providing_expr(), x));
        assert!(std::ptr::eq(outer.value_providing_expr(), x));
        assert!(std::ptr::eq(x.semantics_providing_expr(), x));
    }

    #[test]
    fn test_decl_ref_implicit_iff_no_loc() {
        let arena = LocalArena::default();
        let ctx = AstContext::new(&arena);

        let decl = ctx.value_decl(DeclKind::Var, "x", SourceLoc::new(0), None);
        assert!(ctx.decl_ref(decl, SourceLoc::INVALID).is_implicit());
        assert!(!ctx.decl_ref(decl, SourceLoc::new(4)).is_implicit());
    }

    #[test]
    fn test_conversion_follows_operand() {
        let arena = LocalArena::default();
        let ctx = AstContext::new(&arena);
        let int = ctx.builtin_integer_type(64).unwrap();

        let decl = ctx.value_decl(DeclKind::Var, "x", SourceLoc::new(0), None);
        let hidden = ctx.decl_ref(decl, SourceLoc::INVALID);
        let written = ctx.decl_ref(decl, SourceLoc::new(3));

        assert!(ctx.implicit_conversion(ConversionKind::Load, hidden, int).is_implicit());
        assert!(!ctx.implicit_conversion(ConversionKind::Load, written, int).is_implicit());
    }

    #[test]
    fn test_existential_member_ref_never_implicit() {
        let arena = LocalArena::default();
        let ctx = AstContext::new(&arena);

        let decl = ctx.value_decl(DeclKind::Var, "x", SourceLoc::new(0), None);
        let base = ctx.decl_ref(decl, SourceLoc::new(0));
        let concrete = ctx.member_ref(
            MemberRefKind::Concrete,
            base,
            SourceLoc::INVALID,
            decl,
            SourceLoc::INVALID,
        );
        let existential = ctx.member_ref(
            MemberRefKind::Existential,
            base,
            SourceLoc::INVALID,
            decl,
            SourceLoc::INVALID,
        );

        assert!(concrete.is_implicit());
        assert!(!existential.is_implicit());
    }

    #[test]
    fn test_apply_needs_implicit_argument() {
        let arena = LocalArena::default();
        let ctx = AstContext::new(&arena);

        let f = ctx.unresolved_decl_ref("f", SourceLoc::new(0));
        let empty_args = ctx.tuple(SourceLoc::INVALID, &[], SourceLoc::INVALID, false);
        let written_args = ctx.tuple(SourceLoc::new(1), &[], SourceLoc::new(2), false);

        assert!(!ctx.apply(ApplyKind::Call, f, None).is_implicit());
        assert!(ctx.apply(ApplyKind::Call, f, Some(empty_args)).is_implicit());
        assert!(!ctx.apply(ApplyKind::Call, f, Some(written_args)).is_implicit());
    }

    #[test]
    fn test_tuple_with_default_slots() {
        let arena = LocalArena::default();
        let ctx = AstContext::new(&arena);
        let unit = ctx.empty_tuple_type();

        let zero = ctx.zero_value(unit);
        let lit = ctx.integer_literal("1", SourceLoc::INVALID);
        let implicit = ctx.tuple(
            SourceLoc::INVALID,
            &[Some(zero), None],
            SourceLoc::INVALID,
            false,
        );
        let explicit = ctx.tuple(
            SourceLoc::INVALID,
            &[Some(zero), Some(lit)],
            SourceLoc::INVALID,
            false,
        );

        assert!(implicit.is_implicit());
        assert!(!explicit.is_implicit());
    }
}

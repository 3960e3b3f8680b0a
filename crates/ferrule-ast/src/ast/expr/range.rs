//! Source range and caret location of every expression kind.
//!
//! Kinds with explicit delimiters report the delimiters. Everything else is
//! synthesized from its first and last constituents, so a node's range covers
//! all of its children. The caret ([`Expr::loc`]) is the start of the range
//! unless the kind names a more useful token, such as an operator or a member
//! name.

use crate::span::{SourceLoc, SourceRange, Spanned};

use super::{Expr, ExprKind};

impl Spanned for Expr<'_> {
    fn source_range(&self) -> SourceRange {
        match self.kind() {
            ExprKind::Error(err) => err.range,

            ExprKind::IntegerLiteral(lit) => SourceRange::point(lit.loc),
            ExprKind::FloatLiteral(lit) => SourceRange::point(lit.loc),
            ExprKind::CharacterLiteral(lit) => SourceRange::point(lit.loc),
            ExprKind::StringLiteral(lit) => SourceRange::point(lit.loc),
            ExprKind::InterpolatedStringLiteral(lit) => SourceRange::point(lit.loc),

            ExprKind::DeclRef(r) | ExprKind::SuperRef(r) | ExprKind::OtherConstructorDeclRef(r) => {
                SourceRange::point(r.loc)
            }
            ExprKind::UnresolvedConstructor(ctor) => {
                SourceRange::covering(ctor.sub_expr().start_loc(), ctor.constructor_loc)
            }
            ExprKind::OverloadedDeclRef(ovl) => SourceRange::point(ovl.loc),
            ExprKind::OverloadedMemberRef(ovl) => {
                SourceRange::covering(ovl.base().start_loc(), ovl.member_loc)
            }
            ExprKind::UnresolvedDeclRef(r) => SourceRange::point(r.loc),
            ExprKind::UnresolvedIf(kw) | ExprKind::UnresolvedElse(kw) => SourceRange::point(kw.loc),
            ExprKind::UnresolvedSpecialize(spec) => {
                SourceRange::covering(spec.sub_expr().start_loc(), spec.rangle)
            }

            ExprKind::MemberRef(member)
            | ExprKind::ExistentialMemberRef(member)
            | ExprKind::ArchetypeMemberRef(member)
            | ExprKind::GenericMemberRef(member) => {
                SourceRange::covering(member.base().start_loc(), member.name_loc)
            }
            ExprKind::UnresolvedMember(member) => {
                SourceRange::covering(member.dot_loc, member.name_loc)
            }
            ExprKind::UnresolvedDot(dot) => {
                let start = dot.base().map_or(dot.dot_loc, |base| base.start_loc());
                SourceRange::covering(start, dot.name_loc)
            }
            ExprKind::Module(module) => SourceRange::point(module.loc),
            ExprKind::TupleElement(elt) => SourceRange::covering(
                elt.base().start_loc(),
                elt.name_loc,
            ),

            ExprKind::Paren(paren) => {
                if paren.lparen.is_valid() && !paren.has_trailing_closure {
                    return SourceRange::covering(paren.lparen, paren.rparen);
                }
                let sub = paren.sub_expr();
                SourceRange::covering(paren.lparen.or(sub.start_loc()), sub.end_loc())
            }
            ExprKind::Tuple(tuple) => {
                if tuple.lparen.is_valid() && !tuple.has_trailing_closure {
                    return SourceRange::covering(tuple.lparen, tuple.rparen);
                }
                let mut present = tuple.elements().flatten();
                let Some(first) = present.next() else {
                    return SourceRange::INVALID;
                };
                let last = present.last().unwrap_or(first);
                SourceRange::covering(tuple.lparen.or(first.start_loc()), last.end_loc())
            }
            ExprKind::Array(coll) | ExprKind::Dictionary(coll) => {
                SourceRange::covering(coll.lbracket, coll.rbracket)
            }

            ExprKind::Subscript(sub)
            | ExprKind::ExistentialSubscript(sub)
            | ExprKind::ArchetypeSubscript(sub)
            | ExprKind::GenericSubscript(sub) => {
                SourceRange::covering(sub.base().start_loc(), sub.index().end_loc())
            }

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
                .map_or(SourceRange::INVALID, |conv| conv.sub_expr().source_range()),

            ExprKind::AddressOf(addr) => {
                SourceRange::covering(addr.op_loc, addr.sub_expr().end_loc())
            }
            ExprKind::Sequence(seq) => {
                let mut elements = seq.elements();
                let Some(first) = elements.next() else {
                    return SourceRange::INVALID;
                };
                let last = elements.last().unwrap_or(first);
                SourceRange::covering(first.start_loc(), last.end_loc())
            }

            ExprKind::Func(func) => {
                let end = match func.body() {
                    Some(body) => body.end_loc(),
                    None if func.ret_type.has_location() => func.ret_type.range.end,
                    None => func
                        .arg_param_patterns()
                        .last()
                        .map_or(SourceLoc::INVALID, |pat| pat.end_loc()),
                };
                SourceRange::covering(func.func_loc, end)
            }
            ExprKind::PipeClosure(closure) => closure.body.source_range(),
            ExprKind::ImplicitClosure(closure) => closure.body().source_range(),

            ExprKind::NewArray(new_array) => {
                let end = new_array
                    .bounds
                    .last()
                    .map_or(new_array.element_type.range.end, |bound| bound.brackets.end);
                SourceRange::covering(new_array.new_loc, end)
            }
            ExprKind::Metatype(meta) => {
                let start = meta.base().map_or(meta.metatype_loc, |base| base.start_loc());
                SourceRange::covering(start, meta.metatype_loc)
            }
            ExprKind::OpaqueValue(opaque) => SourceRange::point(opaque.loc),
            ExprKind::ZeroValue => SourceRange::INVALID,

            ExprKind::Call(apply) | ExprKind::PrefixUnary(apply) => {
                let end = apply.arg().map_or(apply.func().end_loc(), |arg| arg.end_loc());
                SourceRange::covering(apply.func().start_loc(), end)
            }
            ExprKind::PostfixUnary(apply) => {
                let start = apply.arg().map_or(apply.func().start_loc(), |arg| arg.start_loc());
                SourceRange::covering(start, apply.func().end_loc())
            }
            ExprKind::Binary(apply) => match apply.arg() {
                Some(arg) => arg.source_range(),
                None => apply.func().source_range(),
            },
            ExprKind::DotSyntaxCall(call) => {
                let apply = &call.apply;
                let start = apply.arg().map_or(call.dot_loc, |arg| arg.start_loc());
                SourceRange::covering(start, apply.func().end_loc())
            }
            ExprKind::ConstructorRefCall(apply) => apply.func().source_range(),
            ExprKind::DotSyntaxBaseIgnored(ignored) => {
                SourceRange::covering(ignored.lhs().start_loc(), ignored.rhs().end_loc())
            }

            ExprKind::Coerce(cast) => {
                SourceRange::covering(cast.type_loc.range.start, cast.sub_expr().end_loc())
            }
            ExprKind::UncheckedDowncast(cast)
            | ExprKind::UncheckedSuperToArchetype(cast)
            | ExprKind::IsSubtype(cast) => {
                SourceRange::covering(cast.sub_expr().start_loc(), cast.type_loc.range.end)
            }

            ExprKind::RebindThisInConstructor(rebind) => rebind.sub_expr().source_range(),
            ExprKind::If(if_expr) => {
                let end = if_expr
                    .else_expr()
                    .map_or(if_expr.then_expr().end_loc(), |e| e.end_loc());
                SourceRange::covering(if_expr.cond().start_loc(), end)
            }
            ExprKind::DefaultValue(default) => default.sub_expr().source_range(),
        }
    }
}

impl Expr<'_> {
    /// The caret location diagnostics point at.
    ///
    /// This is [`Self::caret_override`] when the kind has one and it is
    /// valid, otherwise the start of the source range.
    #[must_use]
    pub fn loc(&self) -> SourceLoc {
        match self.caret_override() {
            Some(loc) if loc.is_valid() => loc,
            _ => self.start_loc(),
        }
    }

    /// The kind's own caret location, for kinds that declare one.
    ///
    /// Returns `Some` exactly for the kinds whose
    /// [`ExprTag::overrides_loc`](super::ExprTag::overrides_loc) is set; the
    /// location itself may be invalid for synthesized nodes.
    #[must_use]
    pub fn caret_override(&self) -> Option<SourceLoc> {
        match self.kind() {
            ExprKind::UnresolvedConstructor(ctor) => Some(ctor.constructor_loc),
            ExprKind::OverloadedMemberRef(ovl) => Some(ovl.member_loc),
            ExprKind::UnresolvedSpecialize(spec) => Some(spec.sub_expr().loc()),

            ExprKind::MemberRef(member)
            | ExprKind::ExistentialMemberRef(member)
            | ExprKind::ArchetypeMemberRef(member)
            | ExprKind::GenericMemberRef(member) => Some(member.name_loc),
            ExprKind::UnresolvedMember(member) => Some(member.name_loc),
            ExprKind::UnresolvedDot(dot) => Some(dot.name_loc),
            ExprKind::TupleElement(elt) => Some(elt.name_loc),

            ExprKind::Subscript(sub)
            | ExprKind::ExistentialSubscript(sub)
            | ExprKind::ArchetypeSubscript(sub)
            | ExprKind::GenericSubscript(sub) => Some(sub.index().start_loc()),

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
                .map(|conv| conv.sub_expr().loc()),

            ExprKind::PipeClosure(closure) => Some(closure.body.start_loc()),
            ExprKind::Metatype(meta) => Some(meta.metatype_loc),

            ExprKind::PrefixUnary(apply)
            | ExprKind::PostfixUnary(apply)
            | ExprKind::Binary(apply) => Some(apply.func().loc()),
            ExprKind::DotSyntaxCall(call) => Some(call.apply.func().loc()),
            ExprKind::DotSyntaxBaseIgnored(ignored) => Some(ignored.dot_loc),

            ExprKind::UncheckedDowncast(cast)
            | ExprKind::UncheckedSuperToArchetype(cast)
            | ExprKind::IsSubtype(cast) => Some(cast.op_loc),

            ExprKind::RebindThisInConstructor(rebind) => Some(rebind.sub_expr().loc()),
            ExprKind::If(if_expr) => Some(if_expr.question_loc),

            ExprKind::Error(_)
            | ExprKind::IntegerLiteral(_)
            | ExprKind::FloatLiteral(_)
            | ExprKind::CharacterLiteral(_)
            | ExprKind::StringLiteral(_)
            | ExprKind::InterpolatedStringLiteral(_)
            | ExprKind::DeclRef(_)
            | ExprKind::SuperRef(_)
            | ExprKind::OtherConstructorDeclRef(_)
            | ExprKind::OverloadedDeclRef(_)
            | ExprKind::UnresolvedDeclRef(_)
            | ExprKind::UnresolvedIf(_)
            | ExprKind::UnresolvedElse(_)
            | ExprKind::Module(_)
            | ExprKind::Paren(_)
            | ExprKind::Tuple(_)
            | ExprKind::Array(_)
            | ExprKind::Dictionary(_)
            | ExprKind::AddressOf(_)
            | ExprKind::Sequence(_)
            | ExprKind::Func(_)
            | ExprKind::ImplicitClosure(_)
            | ExprKind::NewArray(_)
            | ExprKind::OpaqueValue(_)
            | ExprKind::ZeroValue
            | ExprKind::Call(_)
            | ExprKind::ConstructorRefCall(_)
            | ExprKind::Coerce(_)
            | ExprKind::DefaultValue(_) => None,
        }
    }
}

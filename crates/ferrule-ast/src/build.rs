//! Expression factories.
//!
//! Every expression is built through one of these methods, which allocate
//! the node and any variable-length payload in the context's arena. Nodes
//! come back untyped unless the kind's type is fixed by its construction
//! (conversions, subscripts with a declaration, placeholder values).

use std::cell::Cell;

use ferrule_log::trace;

use crate::ast::decl::ValueDecl;
use crate::ast::expr::closure::single_return;
use crate::ast::expr::{
    AddressOfExpr, ApplyExpr, ApplyKind, ArrayBound, CastKind, CharacterLiteralExpr,
    CollectionExpr, ConversionKind, DeclRefExpr, DefaultValueExpr, DotSyntaxBaseIgnoredExpr,
    DotSyntaxCallExpr, ErrorExpr, ExplicitCastExpr, Expr, ExprKind, FloatLiteralExpr, FuncExpr,
    IfExpr, ImplicitClosureExpr, ImplicitConversionExpr, IntegerLiteralExpr,
    InterpolatedStringLiteralExpr, MemberRefExpr, MemberRefKind, MetatypeExpr, ModuleExpr,
    NewArrayExpr, OpaqueValueExpr, OverloadedDeclRefExpr, OverloadedMemberRefExpr, ParenExpr,
    PipeClosureExpr, RebindThisInConstructorExpr, ScalarToTupleExpr, SequenceExpr,
    SpecializeExpr, StringLiteralExpr, SubscriptExpr, SubscriptKind, TupleElementExpr,
    TupleExpr, TupleShuffleExpr, UnresolvedConstructorExpr, UnresolvedDeclRefExpr,
    UnresolvedDotExpr, UnresolvedKeywordExpr, UnresolvedMemberExpr, UnresolvedSpecializeExpr,
};
use crate::ast::pat::Pattern;
use crate::ast::stmt::BraceStmt;
use crate::ast::ty::{Substitution, Type, TypeLoc};
use crate::context::AstContext;
use crate::error::{AstError, AstResult};
use crate::span::{SourceLoc, SourceRange};

impl<'a> AstContext<'a> {
    fn expr(&self, kind: ExprKind<'a>) -> &'a Expr<'a> {
        self.alloc_expr(Expr::new(kind, None))
    }

    fn typed_expr(&self, kind: ExprKind<'a>, ty: Option<Type<'a>>) -> &'a Expr<'a> {
        self.alloc_expr(Expr::new(kind, ty))
    }

    fn slots<T: Copy>(&self, items: &[T]) -> &'a [Cell<T>] {
        self.arena().alloc_slice_fill_iter(items.iter().map(|&item| Cell::new(item)))
    }

    // ===== Leaves =====

    /// Placeholder for source that failed to parse or type check.
    pub fn error_expr(&self, range: SourceRange) -> &'a Expr<'a> {
        self.expr(ExprKind::Error(ErrorExpr { range }))
    }

    /// An integer literal; `text` is copied into the arena.
    pub fn integer_literal(&self, text: &str, loc: SourceLoc) -> &'a Expr<'a> {
        let text = self.alloc_str(text);
        self.expr(ExprKind::IntegerLiteral(IntegerLiteralExpr { text, loc }))
    }

    /// A floating-point literal; `text` is copied into the arena.
    pub fn float_literal(&self, text: &str, loc: SourceLoc) -> &'a Expr<'a> {
        let text = self.alloc_str(text);
        self.expr(ExprKind::FloatLiteral(FloatLiteralExpr { text, loc }))
    }

    /// A character literal.
    pub fn character_literal(&self, value: char, loc: SourceLoc) -> &'a Expr<'a> {
        self.expr(ExprKind::CharacterLiteral(CharacterLiteralExpr { value, loc }))
    }

    /// A string literal.
    pub fn string_literal(&self, value: &str, loc: SourceLoc) -> &'a Expr<'a> {
        let value = self.alloc_str(value);
        self.expr(ExprKind::StringLiteral(StringLiteralExpr { value, loc }))
    }

    /// A string literal with interpolated segments.
    pub fn interpolated_string_literal(
        &self,
        loc: SourceLoc,
        segments: &[&'a Expr<'a>],
    ) -> &'a Expr<'a> {
        let segments = self.slots(segments);
        self.expr(ExprKind::InterpolatedStringLiteral(
            InterpolatedStringLiteralExpr::new(loc, segments),
        ))
    }

    // ===== References =====

    /// A resolved reference to `decl`.
    pub fn decl_ref(&self, decl: &'a ValueDecl<'a>, loc: SourceLoc) -> &'a Expr<'a> {
        self.expr(ExprKind::DeclRef(DeclRefExpr { decl, loc }))
    }

    /// `super`, referring to the enclosing method's `this`.
    pub fn super_ref(&self, this_decl: &'a ValueDecl<'a>, loc: SourceLoc) -> &'a Expr<'a> {
        self.expr(ExprKind::SuperRef(DeclRefExpr {
            decl: this_decl,
            loc,
        }))
    }

    /// A reference to a sibling constructor.
    pub fn other_constructor_decl_ref(
        &self,
        ctor: &'a ValueDecl<'a>,
        loc: SourceLoc,
    ) -> &'a Expr<'a> {
        self.expr(ExprKind::OtherConstructorDeclRef(DeclRefExpr { decl: ctor, loc }))
    }

    /// `sub.constructor`
    pub fn unresolved_constructor(
        &self,
        sub: &'a Expr<'a>,
        dot_loc: SourceLoc,
        constructor_loc: SourceLoc,
    ) -> &'a Expr<'a> {
        self.expr(ExprKind::UnresolvedConstructor(UnresolvedConstructorExpr::new(
            sub,
            dot_loc,
            constructor_loc,
        )))
    }

    /// A reference to an overload set.
    pub fn overloaded_decl_ref(
        &self,
        decls: &[&'a ValueDecl<'a>],
        loc: SourceLoc,
    ) -> &'a Expr<'a> {
        let decls = self.decl_list(decls);
        self.expr(ExprKind::OverloadedDeclRef(OverloadedDeclRefExpr { decls, loc }))
    }

    /// `base.member` naming an overload set.
    pub fn overloaded_member_ref(
        &self,
        base: &'a Expr<'a>,
        dot_loc: SourceLoc,
        decls: &[&'a ValueDecl<'a>],
        member_loc: SourceLoc,
    ) -> &'a Expr<'a> {
        let decls = self.decl_list(decls);
        self.expr(ExprKind::OverloadedMemberRef(OverloadedMemberRefExpr::new(
            base, dot_loc, decls, member_loc,
        )))
    }

    /// A name awaiting lookup.
    pub fn unresolved_decl_ref(&self, name: &str, loc: SourceLoc) -> &'a Expr<'a> {
        let name = self.identifier(name);
        self.expr(ExprKind::UnresolvedDeclRef(UnresolvedDeclRefExpr { name, loc }))
    }

    /// `if` in an unfolded sequence.
    pub fn unresolved_if(&self, loc: SourceLoc) -> &'a Expr<'a> {
        self.expr(ExprKind::UnresolvedIf(UnresolvedKeywordExpr { loc }))
    }

    /// `else` in an unfolded sequence.
    pub fn unresolved_else(&self, loc: SourceLoc) -> &'a Expr<'a> {
        self.expr(ExprKind::UnresolvedElse(UnresolvedKeywordExpr { loc }))
    }

    /// `sub<params>`
    pub fn unresolved_specialize(
        &self,
        sub: &'a Expr<'a>,
        langle: SourceLoc,
        params: &[TypeLoc<'a>],
        rangle: SourceLoc,
    ) -> &'a Expr<'a> {
        let params = self.alloc_slice(params);
        self.expr(ExprKind::UnresolvedSpecialize(UnresolvedSpecializeExpr::new(
            sub, langle, params, rangle,
        )))
    }

    // ===== Member access =====

    /// `base.decl`, resolved according to `kind`.
    pub fn member_ref(
        &self,
        kind: MemberRefKind,
        base: &'a Expr<'a>,
        dot_loc: SourceLoc,
        decl: &'a ValueDecl<'a>,
        name_loc: SourceLoc,
    ) -> &'a Expr<'a> {
        let member = MemberRefExpr::new(base, dot_loc, decl, name_loc);
        self.expr(match kind {
            MemberRefKind::Concrete => ExprKind::MemberRef(member),
            MemberRefKind::Existential => ExprKind::ExistentialMemberRef(member),
            MemberRefKind::Archetype => ExprKind::ArchetypeMemberRef(member),
            MemberRefKind::Generic => ExprKind::GenericMemberRef(member),
        })
    }

    /// `.name` with an inferred base.
    pub fn unresolved_member(
        &self,
        dot_loc: SourceLoc,
        name: &str,
        name_loc: SourceLoc,
    ) -> &'a Expr<'a> {
        let name = self.identifier(name);
        self.expr(ExprKind::UnresolvedMember(UnresolvedMemberExpr {
            dot_loc,
            name,
            name_loc,
        }))
    }

    /// `base.name` awaiting lookup.
    pub fn unresolved_dot(
        &self,
        base: Option<&'a Expr<'a>>,
        dot_loc: SourceLoc,
        name: &str,
        name_loc: SourceLoc,
    ) -> &'a Expr<'a> {
        let name = self.identifier(name);
        self.expr(ExprKind::UnresolvedDot(UnresolvedDotExpr::new(
            base, dot_loc, name, name_loc,
        )))
    }

    /// A reference to a module.
    pub fn module_expr(&self, module: &'a ValueDecl<'a>, loc: SourceLoc) -> &'a Expr<'a> {
        self.expr(ExprKind::Module(ModuleExpr { module, loc }))
    }

    /// `base.N`
    pub fn tuple_element(
        &self,
        base: &'a Expr<'a>,
        dot_loc: SourceLoc,
        field_no: u32,
        name_loc: SourceLoc,
    ) -> &'a Expr<'a> {
        self.expr(ExprKind::TupleElement(TupleElementExpr::new(
            base, dot_loc, field_no, name_loc,
        )))
    }

    // ===== Grouping and collections =====

    /// `(sub)`
    pub fn paren(
        &self,
        lparen: SourceLoc,
        sub: &'a Expr<'a>,
        rparen: SourceLoc,
        has_trailing_closure: bool,
    ) -> &'a Expr<'a> {
        self.expr(ExprKind::Paren(ParenExpr::new(
            lparen,
            sub,
            rparen,
            has_trailing_closure,
        )))
    }

    /// `(elements)`; `None` marks a slot filled from a default value.
    pub fn tuple(
        &self,
        lparen: SourceLoc,
        elements: &[Option<&'a Expr<'a>>],
        rparen: SourceLoc,
        has_trailing_closure: bool,
    ) -> &'a Expr<'a> {
        let elements = self.slots(elements);
        self.expr(ExprKind::Tuple(TupleExpr::new(
            lparen,
            elements,
            rparen,
            has_trailing_closure,
        )))
    }

    /// `[sub]`
    pub fn array(
        &self,
        lbracket: SourceLoc,
        sub: &'a Expr<'a>,
        rbracket: SourceLoc,
    ) -> &'a Expr<'a> {
        self.expr(ExprKind::Array(CollectionExpr::new(lbracket, sub, rbracket)))
    }

    /// `[key: value, ...]`
    pub fn dictionary(
        &self,
        lbracket: SourceLoc,
        sub: &'a Expr<'a>,
        rbracket: SourceLoc,
    ) -> &'a Expr<'a> {
        self.expr(ExprKind::Dictionary(CollectionExpr::new(lbracket, sub, rbracket)))
    }

    /// `base[index]`, typed by the subscript declaration when one is given.
    pub fn subscript(
        &self,
        kind: SubscriptKind,
        base: &'a Expr<'a>,
        index: &'a Expr<'a>,
        decl: Option<&'a ValueDecl<'a>>,
    ) -> &'a Expr<'a> {
        let ty = decl.and_then(|decl| decl.subscript_element_type());
        let sub = SubscriptExpr::new(base, index, decl);
        let kind = match kind {
            SubscriptKind::Concrete => ExprKind::Subscript(sub),
            SubscriptKind::Existential => ExprKind::ExistentialSubscript(sub),
            SubscriptKind::Archetype => ExprKind::ArchetypeSubscript(sub),
            SubscriptKind::Generic => ExprKind::GenericSubscript(sub),
        };
        self.typed_expr(kind, ty)
    }

    // ===== Implicit conversions =====

    /// Wraps `sub` in a conversion to `ty`.
    pub fn implicit_conversion(
        &self,
        kind: ConversionKind,
        sub: &'a Expr<'a>,
        ty: Type<'a>,
    ) -> &'a Expr<'a> {
        let conv = ImplicitConversionExpr::new(sub);
        let kind = match kind {
            ConversionKind::FunctionConversion => ExprKind::FunctionConversion(conv),
            ConversionKind::Erasure => ExprKind::Erasure(conv),
            ConversionKind::Load => ExprKind::Load(conv),
            ConversionKind::Materialize => ExprKind::Materialize(conv),
            ConversionKind::Requalify => ExprKind::Requalify(conv),
            ConversionKind::MetatypeConversion => ExprKind::MetatypeConversion(conv),
            ConversionKind::DerivedToBase => ExprKind::DerivedToBase(conv),
            ConversionKind::ArchetypeToSuper => ExprKind::ArchetypeToSuper(conv),
            ConversionKind::BridgeToBlock => ExprKind::BridgeToBlock(conv),
        };
        self.conversion(kind, sub, ty)
    }

    /// Rearranges the tuple `sub` into `ty` according to `element_mapping`.
    pub fn tuple_shuffle(
        &self,
        sub: &'a Expr<'a>,
        ty: Type<'a>,
        element_mapping: &[i32],
    ) -> &'a Expr<'a> {
        let element_mapping = self.alloc_slice(element_mapping);
        let kind = ExprKind::TupleShuffle(TupleShuffleExpr {
            conversion: ImplicitConversionExpr::new(sub),
            element_mapping,
        });
        self.conversion(kind, sub, ty)
    }

    /// Binds the generic value `sub` to `substitutions`.
    pub fn specialize(
        &self,
        sub: &'a Expr<'a>,
        ty: Type<'a>,
        substitutions: &[Substitution<'a>],
    ) -> &'a Expr<'a> {
        let substitutions = self.alloc_slice(substitutions);
        let kind = ExprKind::Specialize(SpecializeExpr {
            conversion: ImplicitConversionExpr::new(sub),
            substitutions,
        });
        self.conversion(kind, sub, ty)
    }

    /// Places the scalar `sub` at `scalar_field` of the tuple type `ty`.
    pub fn scalar_to_tuple(
        &self,
        sub: &'a Expr<'a>,
        ty: Type<'a>,
        scalar_field: u32,
    ) -> &'a Expr<'a> {
        let kind = ExprKind::ScalarToTuple(ScalarToTupleExpr {
            conversion: ImplicitConversionExpr::new(sub),
            scalar_field,
        });
        self.conversion(kind, sub, ty)
    }

    fn conversion(&self, kind: ExprKind<'a>, sub: &'a Expr<'a>, ty: Type<'a>) -> &'a Expr<'a> {
        trace!(
            "wrapping {} in {} to {}",
            sub.tag().name(),
            kind.tag().name(),
            ty
        );
        self.typed_expr(kind, Some(ty))
    }

    // ===== Other composites =====

    /// `&sub`
    pub fn address_of(&self, op_loc: SourceLoc, sub: &'a Expr<'a>) -> &'a Expr<'a> {
        self.expr(ExprKind::AddressOf(AddressOfExpr::new(op_loc, sub)))
    }

    /// An unfolded infix sequence.
    pub fn sequence(&self, elements: &[&'a Expr<'a>]) -> &'a Expr<'a> {
        let elements = self.slots(elements);
        self.expr(ExprKind::Sequence(SequenceExpr::new(elements)))
    }

    /// `func (args) -> ret_type { body }`
    ///
    /// # Errors
    ///
    /// Returns [`AstError::ParamClauseMismatch`] unless there are as many body
    /// parameter clauses as argument clauses.
    pub fn func(
        &self,
        func_loc: SourceLoc,
        arg_params: &[&'a Pattern<'a>],
        body_params: &[&'a Pattern<'a>],
        ret_type: TypeLoc<'a>,
        body: Option<&'a BraceStmt<'a>>,
    ) -> AstResult<&'a Expr<'a>> {
        if arg_params.len() != body_params.len() {
            return Err(AstError::ParamClauseMismatch {
                args: arg_params.len(),
                body: body_params.len(),
            });
        }

        let mut params = Vec::with_capacity(arg_params.len() * 2);
        params.extend_from_slice(arg_params);
        params.extend_from_slice(body_params);
        let params = self.alloc_slice(&params);

        Ok(self.expr(ExprKind::Func(FuncExpr::new(func_loc, params, ret_type, body))))
    }

    /// `{ |params| body }`
    ///
    /// # Errors
    ///
    /// Returns [`AstError::NotSingleExpressionBody`] if `single_expression` is
    /// set but `body` is not a lone `return` with a value.
    pub fn pipe_closure(
        &self,
        params: &'a Pattern<'a>,
        body: &'a BraceStmt<'a>,
        single_expression: bool,
    ) -> AstResult<&'a Expr<'a>> {
        if single_expression && single_return(body).and_then(|ret| ret.result()).is_none() {
            return Err(AstError::NotSingleExpressionBody);
        }
        Ok(self.expr(ExprKind::PipeClosure(PipeClosureExpr::new(
            params,
            body,
            single_expression,
        ))))
    }

    /// Wraps `body` for lazy evaluation.
    pub fn implicit_closure(
        &self,
        body: &'a Expr<'a>,
        params: Option<&'a Pattern<'a>>,
    ) -> &'a Expr<'a> {
        let params = match params {
            Some(pattern) => self.alloc_slice(&[pattern]),
            None => &[],
        };
        self.expr(ExprKind::ImplicitClosure(ImplicitClosureExpr::new(body, params)))
    }

    /// `new element_type[bounds]`
    pub fn new_array(
        &self,
        new_loc: SourceLoc,
        element_type: TypeLoc<'a>,
        bounds: &[ArrayBound<'a>],
    ) -> &'a Expr<'a> {
        debug_assert!(!bounds.is_empty(), "new array needs at least one bound");
        let bounds = self.alloc_slice(bounds);
        self.expr(ExprKind::NewArray(NewArrayExpr::new(new_loc, element_type, bounds)))
    }

    /// `base.metatype`
    pub fn metatype_expr(
        &self,
        base: Option<&'a Expr<'a>>,
        metatype_loc: SourceLoc,
    ) -> &'a Expr<'a> {
        self.expr(ExprKind::Metatype(MetatypeExpr::new(base, metatype_loc)))
    }

    /// A value of type `ty` supplied by the enclosing construct.
    pub fn opaque_value(&self, loc: SourceLoc, ty: Type<'a>) -> &'a Expr<'a> {
        self.typed_expr(ExprKind::OpaqueValue(OpaqueValueExpr { loc }), Some(ty))
    }

    /// The zero value of `ty`.
    pub fn zero_value(&self, ty: Type<'a>) -> &'a Expr<'a> {
        self.typed_expr(ExprKind::ZeroValue, Some(ty))
    }

    // ===== Application =====

    /// `func(arg)` in one of its call-like forms.
    pub fn apply(
        &self,
        kind: ApplyKind,
        func: &'a Expr<'a>,
        arg: Option<&'a Expr<'a>>,
    ) -> &'a Expr<'a> {
        let apply = ApplyExpr::new(func, arg);
        self.expr(match kind {
            ApplyKind::Call => ExprKind::Call(apply),
            ApplyKind::PrefixUnary => ExprKind::PrefixUnary(apply),
            ApplyKind::PostfixUnary => ExprKind::PostfixUnary(apply),
            ApplyKind::Binary => ExprKind::Binary(apply),
            ApplyKind::ConstructorRefCall => ExprKind::ConstructorRefCall(apply),
        })
    }

    /// `arg.func`, applying the method `func` to its base `arg`.
    pub fn dot_syntax_call(
        &self,
        func: &'a Expr<'a>,
        dot_loc: SourceLoc,
        arg: &'a Expr<'a>,
    ) -> &'a Expr<'a> {
        self.expr(ExprKind::DotSyntaxCall(DotSyntaxCallExpr {
            apply: ApplyExpr::new(func, Some(arg)),
            dot_loc,
        }))
    }

    /// `lhs.rhs` with `lhs` evaluated only for its type.
    pub fn dot_syntax_base_ignored(
        &self,
        lhs: &'a Expr<'a>,
        dot_loc: SourceLoc,
        rhs: &'a Expr<'a>,
    ) -> &'a Expr<'a> {
        self.expr(ExprKind::DotSyntaxBaseIgnored(DotSyntaxBaseIgnoredExpr::new(
            lhs, dot_loc, rhs,
        )))
    }

    // ===== Casts and the rest =====

    /// An explicit cast of `sub` to `type_loc`.
    pub fn explicit_cast(
        &self,
        kind: CastKind,
        sub: &'a Expr<'a>,
        op_loc: SourceLoc,
        type_loc: TypeLoc<'a>,
    ) -> &'a Expr<'a> {
        let cast = ExplicitCastExpr::new(sub, op_loc, type_loc);
        self.expr(match kind {
            CastKind::Coerce => ExprKind::Coerce(cast),
            CastKind::UncheckedDowncast => ExprKind::UncheckedDowncast(cast),
            CastKind::UncheckedSuperToArchetype => ExprKind::UncheckedSuperToArchetype(cast),
            CastKind::IsSubtype => ExprKind::IsSubtype(cast),
        })
    }

    /// `this = sub` inside a constructor; always of type `()`.
    pub fn rebind_this_in_constructor(
        &self,
        sub: &'a Expr<'a>,
        this_decl: &'a ValueDecl<'a>,
    ) -> &'a Expr<'a> {
        self.typed_expr(
            ExprKind::RebindThisInConstructor(RebindThisInConstructorExpr::new(sub, this_decl)),
            Some(self.empty_tuple_type()),
        )
    }

    /// `cond ? then_expr : else_expr`
    pub fn if_expr(
        &self,
        cond: &'a Expr<'a>,
        question_loc: SourceLoc,
        then_expr: &'a Expr<'a>,
        colon_loc: SourceLoc,
        else_expr: Option<&'a Expr<'a>>,
    ) -> &'a Expr<'a> {
        self.expr(ExprKind::If(IfExpr::new(
            cond,
            question_loc,
            then_expr,
            colon_loc,
            else_expr,
        )))
    }

    /// A default argument value.
    pub fn default_value(&self, sub: &'a Expr<'a>) -> &'a Expr<'a> {
        self.expr(ExprKind::DefaultValue(DefaultValueExpr::new(sub)))
    }
}

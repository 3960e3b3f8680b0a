//! References to declarations and members.

use std::cell::Cell;

use crate::ast::decl::ValueDecl;
use crate::ast::ty::{ArchetypeType, Substitution, Type, TypeLoc};
use crate::context::Identifier;
use crate::span::SourceLoc;

use super::{Expr, ExprKind};

/// A reference to a single resolved declaration.
///
/// Shared by `DeclRef`, `SuperRef` (where `decl` is the `this` parameter)
/// and `OtherConstructorDeclRef`.
#[derive(Debug, Clone, Copy)]
pub struct DeclRefExpr<'a> {
    /// Referenced declaration
    pub decl: &'a ValueDecl<'a>,
    /// Location of the name; invalid when synthesized
    pub loc: SourceLoc,
}

/// `sub.constructor` before overload resolution.
#[derive(Debug)]
pub struct UnresolvedConstructorExpr<'a> {
    sub: Cell<&'a Expr<'a>>,
    /// `.` location
    pub dot_loc: SourceLoc,
    /// `constructor` keyword location
    pub constructor_loc: SourceLoc,
}

impl<'a> UnresolvedConstructorExpr<'a> {
    pub(crate) fn new(sub: &'a Expr<'a>, dot_loc: SourceLoc, constructor_loc: SourceLoc) -> Self {
        Self {
            sub: Cell::new(sub),
            dot_loc,
            constructor_loc,
        }
    }

    /// The type expression being constructed.
    #[must_use]
    pub fn sub_expr(&self) -> &'a Expr<'a> {
        self.sub.get()
    }

    /// Replaces the type expression.
    pub fn set_sub_expr(&self, sub: &'a Expr<'a>) {
        self.sub.set(sub);
    }
}

/// A bare name that refers to several overloads.
#[derive(Debug, Clone, Copy)]
pub struct OverloadedDeclRefExpr<'a> {
    /// Candidate declarations
    pub decls: &'a [&'a ValueDecl<'a>],
    /// Name location
    pub loc: SourceLoc,
}

/// `base.name` where `name` refers to several overloads.
#[derive(Debug)]
pub struct OverloadedMemberRefExpr<'a> {
    base: Cell<&'a Expr<'a>>,
    /// `.` location
    pub dot_loc: SourceLoc,
    /// Candidate declarations
    pub decls: &'a [&'a ValueDecl<'a>],
    /// Member name location
    pub member_loc: SourceLoc,
}

impl<'a> OverloadedMemberRefExpr<'a> {
    pub(crate) fn new(
        base: &'a Expr<'a>,
        dot_loc: SourceLoc,
        decls: &'a [&'a ValueDecl<'a>],
        member_loc: SourceLoc,
    ) -> Self {
        Self {
            base: Cell::new(base),
            dot_loc,
            decls,
            member_loc,
        }
    }

    /// The object whose member is referenced.
    #[must_use]
    pub fn base(&self) -> &'a Expr<'a> {
        self.base.get()
    }

    /// Replaces the base.
    pub fn set_base(&self, base: &'a Expr<'a>) {
        self.base.set(base);
    }
}

/// A name before lookup.
#[derive(Debug, Clone, Copy)]
pub struct UnresolvedDeclRefExpr<'a> {
    /// The name
    pub name: Identifier<'a>,
    /// Name location
    pub loc: SourceLoc,
}

/// `if` or `else` in an operator sequence before folding.
#[derive(Debug, Clone, Copy)]
pub struct UnresolvedKeywordExpr {
    /// Keyword location
    pub loc: SourceLoc,
}

/// `sub<T, U>` before the generic arguments are applied.
#[derive(Debug)]
pub struct UnresolvedSpecializeExpr<'a> {
    sub: Cell<&'a Expr<'a>>,
    /// `<` location
    pub langle: SourceLoc,
    /// Generic arguments as written
    pub params: &'a [TypeLoc<'a>],
    /// `>` location
    pub rangle: SourceLoc,
}

impl<'a> UnresolvedSpecializeExpr<'a> {
    pub(crate) fn new(
        sub: &'a Expr<'a>,
        langle: SourceLoc,
        params: &'a [TypeLoc<'a>],
        rangle: SourceLoc,
    ) -> Self {
        Self {
            sub: Cell::new(sub),
            langle,
            params,
            rangle,
        }
    }

    /// The generic entity being specialized.
    #[must_use]
    pub fn sub_expr(&self) -> &'a Expr<'a> {
        self.sub.get()
    }

    /// Replaces the specialized entity.
    pub fn set_sub_expr(&self, sub: &'a Expr<'a>) {
        self.sub.set(sub);
    }
}

/// Which member reference a type-checked `base.member` became.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberRefKind {
    /// Concrete base type
    Concrete,
    /// Protocol base type
    Existential,
    /// Generic parameter base type
    Archetype,
    /// Bound generic base type
    Generic,
}

/// `base.member` resolved to a declaration.
///
/// Only the generic kind carries substitutions.
#[derive(Debug)]
pub struct MemberRefExpr<'a> {
    base: Cell<&'a Expr<'a>>,
    /// `.` location
    pub dot_loc: SourceLoc,
    /// The member
    pub decl: &'a ValueDecl<'a>,
    /// Member name location; invalid when synthesized
    pub name_loc: SourceLoc,
    substitutions: Cell<&'a [Substitution<'a>]>,
}

impl<'a> MemberRefExpr<'a> {
    pub(crate) fn new(
        base: &'a Expr<'a>,
        dot_loc: SourceLoc,
        decl: &'a ValueDecl<'a>,
        name_loc: SourceLoc,
    ) -> Self {
        let no_substitutions: &'a [Substitution<'a>] = &[];
        Self {
            base: Cell::new(base),
            dot_loc,
            decl,
            name_loc,
            substitutions: Cell::new(no_substitutions),
        }
    }

    /// The object whose member is referenced.
    #[must_use]
    pub fn base(&self) -> &'a Expr<'a> {
        self.base.get()
    }

    /// Replaces the base.
    pub fn set_base(&self, base: &'a Expr<'a>) {
        self.base.set(base);
    }

    /// Generic argument bindings; empty unless set by type checking.
    #[must_use]
    pub fn substitutions(&self) -> &'a [Substitution<'a>] {
        self.substitutions.get()
    }

    /// Attaches generic argument bindings.
    pub fn set_substitutions(&self, substitutions: &'a [Substitution<'a>]) {
        self.substitutions.set(substitutions);
    }

    /// The generic parameter the base is typed as, looking through one
    /// metatype.
    #[must_use]
    pub fn archetype(&self) -> Option<&'a ArchetypeType<'a>> {
        let base_ty = self.base().ty()?.rvalue_type();
        base_ty
            .metatype_instance()
            .unwrap_or(base_ty)
            .as_archetype()
    }
}

/// `.member` with the base left to inference.
#[derive(Debug, Clone, Copy)]
pub struct UnresolvedMemberExpr<'a> {
    /// `.` location
    pub dot_loc: SourceLoc,
    /// Member name
    pub name: Identifier<'a>,
    /// Member name location
    pub name_loc: SourceLoc,
}

/// `base.name` before lookup; the base may be absent.
#[derive(Debug)]
pub struct UnresolvedDotExpr<'a> {
    base: Cell<Option<&'a Expr<'a>>>,
    /// `.` location
    pub dot_loc: SourceLoc,
    /// Member name
    pub name: Identifier<'a>,
    /// Member name location
    pub name_loc: SourceLoc,
}

impl<'a> UnresolvedDotExpr<'a> {
    pub(crate) fn new(
        base: Option<&'a Expr<'a>>,
        dot_loc: SourceLoc,
        name: Identifier<'a>,
        name_loc: SourceLoc,
    ) -> Self {
        Self {
            base: Cell::new(base),
            dot_loc,
            name,
            name_loc,
        }
    }

    /// The object, if written.
    #[must_use]
    pub fn base(&self) -> Option<&'a Expr<'a>> {
        self.base.get()
    }

    /// Replaces the base.
    pub fn set_base(&self, base: &'a Expr<'a>) {
        self.base.set(Some(base));
    }
}

/// A reference to a module.
#[derive(Debug, Clone, Copy)]
pub struct ModuleExpr<'a> {
    /// The module declaration
    pub module: &'a ValueDecl<'a>,
    /// Name location
    pub loc: SourceLoc,
}

/// `base.N`
#[derive(Debug)]
pub struct TupleElementExpr<'a> {
    base: Cell<&'a Expr<'a>>,
    /// `.` location
    pub dot_loc: SourceLoc,
    /// Element index
    pub field_no: u32,
    /// Location of the index or label
    pub name_loc: SourceLoc,
}

impl<'a> TupleElementExpr<'a> {
    pub(crate) fn new(
        base: &'a Expr<'a>,
        dot_loc: SourceLoc,
        field_no: u32,
        name_loc: SourceLoc,
    ) -> Self {
        Self {
            base: Cell::new(base),
            dot_loc,
            field_no,
            name_loc,
        }
    }

    /// The tuple.
    #[must_use]
    pub fn base(&self) -> &'a Expr<'a> {
        self.base.get()
    }

    /// Replaces the tuple.
    pub fn set_base(&self, base: &'a Expr<'a>) {
        self.base.set(base);
    }
}

impl<'a> Expr<'a> {
    /// Candidates of an overloaded reference.
    #[must_use]
    pub fn overloaded_decls(&self) -> Option<&'a [&'a ValueDecl<'a>]> {
        match self.kind() {
            ExprKind::OverloadedDeclRef(r) => Some(r.decls),
            ExprKind::OverloadedMemberRef(r) => Some(r.decls),
            _ => None,
        }
    }

    /// Rvalue type of the base of an overloaded member reference.
    ///
    /// `None` for bare overloaded names and for anything else.
    #[must_use]
    pub fn overload_base_type(&self) -> Option<Type<'a>> {
        match self.kind() {
            ExprKind::OverloadedMemberRef(r) => r.base().ty().map(Type::rvalue_type),
            _ => None,
        }
    }

    /// Returns `true` if an overloaded reference is applied to an object
    /// rather than to a type.
    #[must_use]
    pub fn has_base_object(&self) -> bool {
        self.overload_base_type().is_some_and(|ty| !ty.is_metatype())
    }

    /// Returns `true` if the base of a member reference is evaluated only
    /// for its type.
    ///
    /// For a generic parameter base, that holds when the member is a type.
    /// For a bound generic base, it also holds when the base is a metatype
    /// or the member is a static function.
    #[must_use]
    pub fn is_base_ignored(&self) -> bool {
        match self.kind() {
            ExprKind::ArchetypeMemberRef(member) => member.decl.is_type_decl(),
            ExprKind::GenericMemberRef(member) => {
                let base_is_metatype = member
                    .base()
                    .ty()
                    .is_some_and(|ty| ty.rvalue_type().is_metatype());
                base_is_metatype || member.decl.is_type_decl() || member.decl.is_static_func()
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use ferrule_mem::LocalArena;

    use super::*;
    use crate::ast::decl::DeclKind;
    use crate::ast::ty::NominalKind;
    use crate::context::AstContext;

    #[test]
    fn test_overload_base_type() {
        let arena = LocalArena::default();
        let ctx = AstContext::new(&arena);
        let shape = ctx.nominal_type("Shape", NominalKind::Class);

        let f1 = ctx.value_decl(
            DeclKind::Func { is_static: false },
            "area",
            SourceLoc::INVALID,
            None,
        );
        let f2 = ctx.value_decl(
            DeclKind::Func { is_static: false },
            "area",
            SourceLoc::INVALID,
            None,
        );
        let decls = ctx.decl_list(&[f1, f2]);

        let bare = ctx.overloaded_decl_ref(decls, SourceLoc::new(0));
        assert_eq!(bare.overloaded_decls().map(<[_]>::len), Some(2));
        assert!(bare.overload_base_type().is_none());
        assert!(!bare.has_base_object());

        let var = ctx.value_decl(DeclKind::Var, "s", SourceLoc::new(0), Some(shape));
        let base = ctx.decl_ref(var, SourceLoc::new(0));
        base.set_type(ctx.lvalue_type(shape)).unwrap();
        let member = ctx.overloaded_member_ref(base, SourceLoc::new(1), decls, SourceLoc::new(2));
        assert_eq!(member.overload_base_type(), Some(shape));
        assert!(member.has_base_object());

        let meta_base = ctx.decl_ref(var, SourceLoc::new(0));
        meta_base.set_type(ctx.metatype(shape)).unwrap();
        let static_ref = ctx.overloaded_member_ref(
            meta_base,
            SourceLoc::new(1),
            decls,
            SourceLoc::new(2),
        );
        assert!(!static_ref.has_base_object());
    }

    #[test]
    fn test_archetype_member() {
        let arena = LocalArena::default();
        let ctx = AstContext::new(&arena);
        let t = ctx.archetype("T", None);

        let param = ctx.value_decl(DeclKind::Var, "x", SourceLoc::new(0), Some(t));
        let base = ctx.decl_ref(param, SourceLoc::new(0));
        base.set_type(ctx.metatype(t)).unwrap();

        let assoc = ctx.value_decl(DeclKind::Type, "Element", SourceLoc::INVALID, None);
        let member = ctx.member_ref(
            MemberRefKind::Archetype,
            base,
            SourceLoc::new(1),
            assoc,
            SourceLoc::new(2),
        );

        let payload = member.as_member_ref().unwrap();
        assert_eq!(payload.archetype().map(|a| a.name.as_str()), Some("T"));
        assert!(member.is_base_ignored());
    }

    #[test]
    fn test_generic_member_base_ignored() {
        let arena = LocalArena::default();
        let ctx = AstContext::new(&arena);
        let vec_ty = ctx.bound_generic_type("Vector", &[ctx.builtin_integer_type(64).unwrap()]);

        let var = ctx.value_decl(DeclKind::Var, "v", SourceLoc::new(0), Some(vec_ty));
        let base = ctx.decl_ref(var, SourceLoc::new(0));
        base.set_type(vec_ty).unwrap();

        let method = ctx.value_decl(
            DeclKind::Func { is_static: false },
            "push",
            SourceLoc::INVALID,
            None,
        );
        let make = ctx.value_decl(
            DeclKind::Func { is_static: true },
            "make",
            SourceLoc::INVALID,
            None,
        );

        let instance = ctx.member_ref(
            MemberRefKind::Generic,
            base,
            SourceLoc::new(1),
            method,
            SourceLoc::new(2),
        );
        let static_call = ctx.member_ref(
            MemberRefKind::Generic,
            base,
            SourceLoc::new(1),
            make,
            SourceLoc::new(2),
        );
        assert!(!instance.is_base_ignored());
        assert!(static_call.is_base_ignored());

        let concrete = ctx.member_ref(
            MemberRefKind::Concrete,
            base,
            SourceLoc::new(1),
            make,
            SourceLoc::new(2),
        );
        assert!(!concrete.is_base_ignored());
    }

    #[test]
    fn test_substitutions() {
        let arena = LocalArena::default();
        let ctx = AstContext::new(&arena);
        let t = ctx.archetype("T", None);
        let int = ctx.builtin_integer_type(64).unwrap();

        let var = ctx.value_decl(DeclKind::Var, "v", SourceLoc::new(0), None);
        let base = ctx.decl_ref(var, SourceLoc::new(0));
        let member = ctx.member_ref(
            MemberRefKind::Generic,
            base,
            SourceLoc::new(1),
            var,
            SourceLoc::new(2),
        );
        let payload = member.as_member_ref().unwrap();
        assert!(payload.substitutions().is_empty());

        let subs = ctx.alloc_slice(&[Substitution {
            archetype: t.as_archetype().unwrap(),
            replacement: int,
        }]);
        payload.set_substitutions(subs);
        assert_eq!(payload.substitutions().len(), 1);
    }
}

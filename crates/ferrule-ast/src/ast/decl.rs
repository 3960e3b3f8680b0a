//! Value declarations referenced by expressions.
//!
//! Declarations are owned by name resolution; expressions only point at them.
//! A [`ValueDecl`] carries what the expression layer reads: a kind, a name, a
//! location and a write-once type.

use std::cell::OnceCell;

use ferrule_log::trace;

use crate::context::Identifier;
use crate::error::{AstError, AstResult};
use crate::span::SourceLoc;

use super::ty::Type;

/// What a [`ValueDecl`] declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclKind {
    /// `var x`
    Var,
    /// `func f`
    Func {
        /// `static func`
        is_static: bool,
    },
    /// `constructor`
    Constructor,
    /// `subscript`; its type is `index -> element`
    Subscript,
    /// A type declaration (struct, class, protocol, typealias)
    Type,
    /// An imported module
    Module,
}

/// A named value an expression can refer to.
#[derive(Debug)]
pub struct ValueDecl<'a> {
    kind: DeclKind,
    name: Identifier<'a>,
    loc: SourceLoc,
    ty: OnceCell<Type<'a>>,
}

impl<'a> ValueDecl<'a> {
    pub(crate) fn new(
        kind: DeclKind,
        name: Identifier<'a>,
        loc: SourceLoc,
        ty: Option<Type<'a>>,
    ) -> Self {
        let cell = OnceCell::new();
        if let Some(ty) = ty {
            let _ = cell.set(ty);
        }
        Self {
            kind,
            name,
            loc,
            ty: cell,
        }
    }

    /// Declaration kind.
    #[must_use]
    pub fn kind(&self) -> DeclKind {
        self.kind
    }

    /// Declared name.
    #[must_use]
    pub fn name(&self) -> Identifier<'a> {
        self.name
    }

    /// Location of the name; invalid for synthesized declarations.
    #[must_use]
    pub fn loc(&self) -> SourceLoc {
        self.loc
    }

    /// Declared type, once resolved.
    #[must_use]
    pub fn ty(&self) -> Option<Type<'a>> {
        self.ty.get().copied()
    }

    /// Resolves the declared type.
    ///
    /// # Errors
    ///
    /// Returns [`AstError::TypeAlreadySet`] if the type was resolved before.
    pub fn set_type(&self, ty: Type<'a>) -> AstResult<()> {
        self.ty.set(ty).map_err(|_| AstError::TypeAlreadySet {
            kind: self.printer_name(),
        })?;
        trace!("resolved type of {} '{}' to {}", self.printer_name(), self.name, ty);
        Ok(())
    }

    /// Type that a reference to this declaration has.
    #[must_use]
    pub fn type_of_reference(&self) -> Option<Type<'a>> {
        self.ty()
    }

    /// Returns `true` for type declarations.
    #[must_use]
    pub fn is_type_decl(&self) -> bool {
        self.kind == DeclKind::Type
    }

    /// Returns `true` for `static func` declarations.
    #[must_use]
    pub fn is_static_func(&self) -> bool {
        self.kind == DeclKind::Func { is_static: true }
    }

    /// Element type of a subscript declaration.
    #[must_use]
    pub fn subscript_element_type(&self) -> Option<Type<'a>> {
        match self.kind {
            DeclKind::Subscript => self.ty().and_then(Type::function_result),
            _ => None,
        }
    }

    /// Name used when this declaration is printed in a tree dump.
    #[must_use]
    pub fn printer_name(&self) -> &'static str {
        match self.kind {
            DeclKind::Var => "var_decl",
            DeclKind::Func { .. } => "func_decl",
            DeclKind::Constructor => "constructor_decl",
            DeclKind::Subscript => "subscript_decl",
            DeclKind::Type => "type_decl",
            DeclKind::Module => "module_decl",
        }
    }
}

//! The AST context: the one place AST memory comes from.
//!
//! An [`AstContext`] borrows a [`LocalArena`] for the duration of a
//! compilation unit. Every node, type, declaration, identifier and payload
//! slice it hands out is allocated in that arena and carries its lifetime,
//! so no handle can outlive the arena.
//!
//! # Examples
//!
//! ```
//! use ferrule_ast::context::AstContext;
//! use ferrule_ast::span::SourceLoc;
//! use ferrule_mem::LocalArena;
//!
//! let arena = LocalArena::default();
//! let ctx = AstContext::new(&arena);
//!
//! let one = ctx.integer_literal("1", SourceLoc::new(0));
//! one.set_type(ctx.builtin_integer_type(64).unwrap()).unwrap();
//! assert_eq!(one.print_to_string(), "(integer_literal_expr type='Builtin.Int64' value=1)");
//! ```

use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};

use ferrule_mem::{ArenaStats, LocalArena, StringInterner, Symbol};
use hashbrown::HashMap;

use crate::ast::decl::{DeclKind, ValueDecl};
use crate::ast::expr::Expr;
use crate::ast::pat::Pattern;
use crate::ast::stmt::{BraceElement, BraceStmt, ReturnStmt, Stmt};
use crate::ast::ty::{ArchetypeType, NominalKind, TupleTypeElt, Type, TypeBase, TypeLoc};
use crate::error::{AstError, AstResult};
use crate::literal::FloatSemantics;
use crate::span::SourceLoc;

/// An interned identifier with its text.
///
/// Equality and hashing use the symbol only.
#[derive(Clone, Copy)]
pub struct Identifier<'a> {
    sym: Symbol,
    text: &'a str,
}

impl<'a> Identifier<'a> {
    /// Interned symbol.
    #[must_use]
    pub fn symbol(self) -> Symbol {
        self.sym
    }

    /// Identifier text.
    #[must_use]
    pub fn as_str(self) -> &'a str {
        self.text
    }

    /// Returns `true` for `this`.
    #[must_use]
    pub fn is_this(self) -> bool {
        self.sym == Symbol::THIS
    }
}

impl PartialEq for Identifier<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.sym == other.sym
    }
}

impl Eq for Identifier<'_> {}

impl Hash for Identifier<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sym.hash(state);
    }
}

impl fmt::Debug for Identifier<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identifier({:?})", self.text)
    }
}

impl fmt::Display for Identifier<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text)
    }
}

/// Allocation context for one compilation unit's AST.
pub struct AstContext<'a> {
    arena: &'a LocalArena,
    interner: RefCell<StringInterner<'a>>,
    int_types: RefCell<HashMap<u32, Type<'a>>>,
    error_type: Type<'a>,
    unresolved_type: Type<'a>,
    empty_tuple_type: Type<'a>,
    float32_type: Type<'a>,
    float64_type: Type<'a>,
}

impl<'a> AstContext<'a> {
    /// Creates a context allocating from `arena`.
    #[must_use]
    pub fn new(arena: &'a LocalArena) -> Self {
        let singleton = move |base: TypeBase<'a>| Type::new(arena.alloc(base));

        Self {
            arena,
            interner: RefCell::new(StringInterner::new(arena)),
            int_types: RefCell::new(HashMap::new()),
            error_type: singleton(TypeBase::Error),
            unresolved_type: singleton(TypeBase::Unresolved),
            empty_tuple_type: singleton(TypeBase::Tuple { elements: &[] }),
            float32_type: singleton(TypeBase::BuiltinFloat {
                semantics: FloatSemantics::IeeeSingle,
            }),
            float64_type: singleton(TypeBase::BuiltinFloat {
                semantics: FloatSemantics::IeeeDouble,
            }),
        }
    }

    /// The arena backing this context.
    #[must_use]
    pub fn arena(&self) -> &'a LocalArena {
        self.arena
    }

    /// Arena statistics.
    #[must_use]
    pub fn stats(&self) -> ArenaStats {
        self.arena.stats()
    }

    /// Moves a value into the arena.
    pub fn alloc<T>(&self, value: T) -> &'a T {
        self.arena.alloc(value)
    }

    /// Copies a slice into the arena.
    pub fn alloc_slice<T: Copy>(&self, items: &[T]) -> &'a [T] {
        self.arena.alloc_slice_copy(items)
    }

    /// Copies a string into the arena.
    pub fn alloc_str(&self, s: &str) -> &'a str {
        self.arena.alloc_str(s)
    }

    /// Interns an identifier.
    pub fn identifier(&self, name: &str) -> Identifier<'a> {
        let (sym, text) = self.interner.borrow_mut().intern_with_text(name);
        Identifier { sym, text }
    }

    /// Copies a list of declarations into the arena, e.g. a capture list.
    pub fn decl_list(&self, decls: &[&'a ValueDecl<'a>]) -> &'a [&'a ValueDecl<'a>] {
        self.arena.alloc_slice_copy(decls)
    }

    pub(crate) fn alloc_expr(&self, expr: Expr<'a>) -> &'a Expr<'a> {
        self.arena.alloc(expr)
    }

    // ===== Types =====

    /// The error type.
    #[must_use]
    pub fn error_type(&self) -> Type<'a> {
        self.error_type
    }

    /// The not-yet-inferred placeholder type.
    #[must_use]
    pub fn unresolved_type(&self) -> Type<'a> {
        self.unresolved_type
    }

    /// `()`
    #[must_use]
    pub fn empty_tuple_type(&self) -> Type<'a> {
        self.empty_tuple_type
    }

    /// `Builtin.IntN`, uniqued per width.
    ///
    /// # Errors
    ///
    /// Returns [`AstError::InvalidBitWidth`] for a width of zero.
    pub fn builtin_integer_type(&self, width: u32) -> AstResult<Type<'a>> {
        if width == 0 {
            return Err(AstError::InvalidBitWidth(width));
        }

        let arena = self.arena;
        let ty = *self
            .int_types
            .borrow_mut()
            .entry(width)
            .or_insert_with(|| Type::new(arena.alloc(TypeBase::BuiltinInteger { width })));
        Ok(ty)
    }

    /// `Builtin.FPIEEE32` or `Builtin.FPIEEE64`.
    #[must_use]
    pub fn builtin_float_type(&self, semantics: FloatSemantics) -> Type<'a> {
        match semantics {
            FloatSemantics::IeeeSingle => self.float32_type,
            FloatSemantics::IeeeDouble => self.float64_type,
        }
    }

    /// An unlabelled tuple type.
    pub fn tuple_type(&self, elements: &[Type<'a>]) -> Type<'a> {
        if elements.is_empty() {
            return self.empty_tuple_type;
        }
        let elements = self
            .arena
            .alloc_slice_fill_iter(elements.iter().map(|&ty| TupleTypeElt { name: None, ty }));
        self.alloc_type(TypeBase::Tuple { elements })
    }

    /// A tuple type with optional labels.
    pub fn labelled_tuple_type(&self, elements: &[TupleTypeElt<'a>]) -> Type<'a> {
        if elements.is_empty() {
            return self.empty_tuple_type;
        }
        let elements = self.arena.alloc_slice_copy(elements);
        self.alloc_type(TypeBase::Tuple { elements })
    }

    /// `input -> result`
    pub fn function_type(&self, input: Type<'a>, result: Type<'a>) -> Type<'a> {
        self.alloc_type(TypeBase::Function { input, result })
    }

    /// `instance.metatype`
    pub fn metatype(&self, instance: Type<'a>) -> Type<'a> {
        self.alloc_type(TypeBase::Metatype { instance })
    }

    /// A generic parameter.
    pub fn archetype(&self, name: &str, superclass: Option<Type<'a>>) -> Type<'a> {
        let name = self.identifier(name);
        self.alloc_type(TypeBase::Archetype(ArchetypeType { name, superclass }))
    }

    /// `@lvalue object`
    pub fn lvalue_type(&self, object: Type<'a>) -> Type<'a> {
        self.alloc_type(TypeBase::LValue { object })
    }

    /// A named nominal type.
    pub fn nominal_type(&self, name: &str, kind: NominalKind) -> Type<'a> {
        let name = self.identifier(name);
        self.alloc_type(TypeBase::Nominal { name, kind })
    }

    /// `Name<args>`
    pub fn bound_generic_type(&self, name: &str, args: &[Type<'a>]) -> Type<'a> {
        let name = self.identifier(name);
        let args = self.arena.alloc_slice_copy(args);
        self.alloc_type(TypeBase::BoundGeneric { name, args })
    }

    /// Composite types are allocated per call and compare structurally.
    fn alloc_type(&self, base: TypeBase<'a>) -> Type<'a> {
        Type::new(self.arena.alloc(base))
    }

    // ===== Declarations, patterns, statements =====

    /// Creates a value declaration.
    pub fn value_decl(
        &self,
        kind: DeclKind,
        name: &str,
        loc: SourceLoc,
        ty: Option<Type<'a>>,
    ) -> &'a ValueDecl<'a> {
        let name = self.identifier(name);
        self.arena.alloc(ValueDecl::new(kind, name, loc, ty))
    }

    /// `_`
    pub fn any_pattern(&self, loc: SourceLoc) -> &'a Pattern<'a> {
        self.arena.alloc(Pattern::Any { loc })
    }

    /// A pattern binding `decl`.
    pub fn named_pattern(&self, decl: &'a ValueDecl<'a>) -> &'a Pattern<'a> {
        self.arena.alloc(Pattern::Named { decl })
    }

    /// `sub : Type`
    pub fn typed_pattern(&self, sub: &'a Pattern<'a>, type_loc: TypeLoc<'a>) -> &'a Pattern<'a> {
        self.arena.alloc(Pattern::Typed { sub, type_loc })
    }

    /// `(elements)`
    pub fn tuple_pattern(
        &self,
        lparen: SourceLoc,
        elements: &[&'a Pattern<'a>],
        rparen: SourceLoc,
    ) -> &'a Pattern<'a> {
        let elements = self.arena.alloc_slice_copy(elements);
        self.arena.alloc(Pattern::Tuple {
            lparen,
            elements,
            rparen,
        })
    }

    /// `(sub)`
    pub fn paren_pattern(
        &self,
        lparen: SourceLoc,
        sub: &'a Pattern<'a>,
        rparen: SourceLoc,
    ) -> &'a Pattern<'a> {
        self.arena.alloc(Pattern::Paren { lparen, sub, rparen })
    }

    /// `{ elements }`
    pub fn brace_stmt(
        &self,
        lbrace: SourceLoc,
        elements: &[BraceElement<'a>],
        rbrace: SourceLoc,
    ) -> &'a BraceStmt<'a> {
        let elements = self.arena.alloc_slice_copy(elements);
        self.arena.alloc(BraceStmt {
            lbrace,
            elements,
            rbrace,
        })
    }

    /// Wraps a brace statement so it can nest inside another.
    pub fn nested_brace_stmt(&self, brace: &'a BraceStmt<'a>) -> &'a Stmt<'a> {
        self.arena.alloc(Stmt::Brace(brace))
    }

    /// `return result`
    pub fn return_stmt(&self, return_loc: SourceLoc, result: Option<&'a Expr<'a>>) -> &'a Stmt<'a> {
        self.arena.alloc(Stmt::Return(ReturnStmt::new(return_loc, result)))
    }
}

impl fmt::Debug for AstContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AstContext")
            .field("identifiers", &self.interner.borrow().len())
            .field("arena", &self.arena.stats())
            .finish_non_exhaustive()
    }
}

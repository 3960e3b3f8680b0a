//! Resolved type handles.
//!
//! The expression layer treats types as opaque handles it can print, compare
//! and ask a handful of questions about. The algebra behind them belongs to
//! the type checker; this module only models the shapes expressions inspect.
//!
//! Types are allocated through the [`AstContext`](crate::context::AstContext)
//! and compared structurally, so two separately built `(Int32, Int32)` tuple
//! types are equal.

use std::fmt;

use crate::context::Identifier;
use crate::literal::FloatSemantics;
use crate::span::SourceRange;

/// A handle to an arena-allocated type.
#[derive(Clone, Copy)]
pub struct Type<'a>(&'a TypeBase<'a>);

/// The shapes a [`Type`] can take.
#[derive(Debug, PartialEq, Eq)]
pub enum TypeBase<'a> {
    /// Produced by type checking after a diagnostic
    Error,
    /// Placeholder for a type not yet inferred
    Unresolved,
    /// `Builtin.IntN`
    BuiltinInteger {
        /// Bit width, at least 1
        width: u32,
    },
    /// `Builtin.FPIEEE32` or `Builtin.FPIEEE64`
    BuiltinFloat {
        /// Precision
        semantics: FloatSemantics,
    },
    /// `(A, b: B)`
    Tuple {
        /// Elements in order
        elements: &'a [TupleTypeElt<'a>],
    },
    /// `A -> B`
    Function {
        /// Parameter type
        input: Type<'a>,
        /// Result type
        result: Type<'a>,
    },
    /// `T.metatype`
    Metatype {
        /// The type whose metatype this is
        instance: Type<'a>,
    },
    /// A generic parameter
    Archetype(ArchetypeType<'a>),
    /// `@lvalue T`
    LValue {
        /// The stored type
        object: Type<'a>,
    },
    /// A named struct, class, protocol or enum
    Nominal {
        /// Type name
        name: Identifier<'a>,
        /// Which kind of nominal type
        kind: NominalKind,
    },
    /// `Name<A, B>`
    BoundGeneric {
        /// Generic type name
        name: Identifier<'a>,
        /// Generic arguments
        args: &'a [Type<'a>],
    },
}

/// One element of a tuple type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TupleTypeElt<'a> {
    /// Element label, if any
    pub name: Option<Identifier<'a>>,
    /// Element type
    pub ty: Type<'a>,
}

/// Kinds of nominal type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NominalKind {
    /// `struct`
    Struct,
    /// `class`
    Class,
    /// `protocol`; values of protocol type are existentials
    Protocol,
    /// `enum`
    Enum,
}

/// A generic parameter type.
#[derive(Debug, PartialEq, Eq)]
pub struct ArchetypeType<'a> {
    /// Full name as printed in substitutions
    pub name: Identifier<'a>,
    /// Class bound, if any
    pub superclass: Option<Type<'a>>,
}

impl<'a> Type<'a> {
    pub(crate) fn new(base: &'a TypeBase<'a>) -> Self {
        Type(base)
    }

    /// Returns the shape of this type.
    #[must_use]
    pub fn base(self) -> &'a TypeBase<'a> {
        self.0
    }

    /// Returns `true` for the error type.
    #[must_use]
    pub fn is_error(self) -> bool {
        matches!(self.0, TypeBase::Error)
    }

    /// Returns `true` for the not-yet-inferred placeholder.
    #[must_use]
    pub fn is_unresolved(self) -> bool {
        matches!(self.0, TypeBase::Unresolved)
    }

    /// Returns `true` for protocol types.
    #[must_use]
    pub fn is_existential(self) -> bool {
        matches!(
            self.0,
            TypeBase::Nominal {
                kind: NominalKind::Protocol,
                ..
            }
        )
    }

    /// Returns `true` for metatypes.
    #[must_use]
    pub fn is_metatype(self) -> bool {
        matches!(self.0, TypeBase::Metatype { .. })
    }

    /// Strips one `@lvalue` qualifier.
    #[must_use]
    pub fn rvalue_type(self) -> Type<'a> {
        match self.0 {
            TypeBase::LValue { object } => *object,
            _ => self,
        }
    }

    /// Instance type of a metatype.
    #[must_use]
    pub fn metatype_instance(self) -> Option<Type<'a>> {
        match self.0 {
            TypeBase::Metatype { instance } => Some(*instance),
            _ => None,
        }
    }

    /// Returns the archetype if this is a generic parameter.
    #[must_use]
    pub fn as_archetype(self) -> Option<&'a ArchetypeType<'a>> {
        match self.0 {
            TypeBase::Archetype(archetype) => Some(archetype),
            _ => None,
        }
    }

    /// Result type of a function type.
    #[must_use]
    pub fn function_result(self) -> Option<Type<'a>> {
        match self.0 {
            TypeBase::Function { result, .. } => Some(*result),
            _ => None,
        }
    }

    /// Bit width of a builtin integer type.
    #[must_use]
    pub fn builtin_integer_width(self) -> Option<u32> {
        match self.0 {
            TypeBase::BuiltinInteger { width } => Some(*width),
            _ => None,
        }
    }

    /// Precision of a builtin float type.
    #[must_use]
    pub fn builtin_float_semantics(self) -> Option<FloatSemantics> {
        match self.0 {
            TypeBase::BuiltinFloat { semantics } => Some(*semantics),
            _ => None,
        }
    }

    /// Returns `true` for a bound generic type.
    #[must_use]
    pub fn is_bound_generic(self) -> bool {
        matches!(self.0, TypeBase::BoundGeneric { .. })
    }
}

impl PartialEq for Type<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.0, other.0) || self.0 == other.0
    }
}

impl Eq for Type<'_> {}

impl fmt::Debug for Type<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Type({self})")
    }
}

impl fmt::Display for Type<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.0, f)
    }
}

impl fmt::Display for TypeBase<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeBase::Error => write!(f, "<<error type>>"),
            TypeBase::Unresolved => write!(f, "<<unresolved type>>"),
            TypeBase::BuiltinInteger { width } => write!(f, "Builtin.Int{width}"),
            TypeBase::BuiltinFloat { semantics } => write!(f, "Builtin.{}", semantics.name()),
            TypeBase::Tuple { elements } => {
                write!(f, "(")?;
                for (i, elt) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    if let Some(name) = elt.name {
                        write!(f, "{name}: ")?;
                    }
                    write!(f, "{}", elt.ty)?;
                }
                write!(f, ")")
            }
            TypeBase::Function { input, result } => write!(f, "{input} -> {result}"),
            TypeBase::Metatype { instance } => write!(f, "{instance}.metatype"),
            TypeBase::Archetype(archetype) => write!(f, "{}", archetype.name),
            TypeBase::LValue { object } => write!(f, "@lvalue {object}"),
            TypeBase::Nominal { name, .. } => write!(f, "{name}"),
            TypeBase::BoundGeneric { name, args } => {
                write!(f, "{name}<")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ">")
            }
        }
    }
}

/// A type as written in source: the resolved type, if any, and where it was
/// spelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TypeLoc<'a> {
    /// Resolved type
    pub ty: Option<Type<'a>>,
    /// Source range of the type annotation
    pub range: SourceRange,
}

impl<'a> TypeLoc<'a> {
    /// Creates a type location.
    #[must_use]
    pub const fn new(ty: Option<Type<'a>>, range: SourceRange) -> Self {
        Self { ty, range }
    }

    /// A type with no source spelling.
    #[must_use]
    pub const fn without_loc(ty: Type<'a>) -> Self {
        Self {
            ty: Some(ty),
            range: SourceRange::INVALID,
        }
    }

    /// Returns `true` if the type was spelled in source.
    #[must_use]
    pub fn has_location(&self) -> bool {
        self.range.is_valid()
    }
}

/// One generic argument binding, `archetype = replacement`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Substitution<'a> {
    /// The generic parameter
    pub archetype: &'a ArchetypeType<'a>,
    /// What it is bound to
    pub replacement: Type<'a>,
}

#[cfg(test)]
mod tests {
    use crate::context::AstContext;
    use crate::literal::FloatSemantics;
    use ferrule_mem::LocalArena;

    use super::*;

    #[test]
    fn test_display() {
        let arena = LocalArena::default();
        let ctx = AstContext::new(&arena);

        let i32_ty = ctx.builtin_integer_type(32).unwrap();
        let f64_ty = ctx.builtin_float_type(FloatSemantics::IeeeDouble);
        let pair = ctx.tuple_type(&[i32_ty, f64_ty]);
        let func = ctx.function_type(pair, i32_ty);

        assert_eq!(i32_ty.to_string(), "Builtin.Int32");
        assert_eq!(f64_ty.to_string(), "Builtin.FPIEEE64");
        assert_eq!(pair.to_string(), "(Builtin.Int32, Builtin.FPIEEE64)");
        assert_eq!(func.to_string(), "(Builtin.Int32, Builtin.FPIEEE64) -> Builtin.Int32");
        assert_eq!(ctx.empty_tuple_type().to_string(), "()");
        assert_eq!(ctx.lvalue_type(i32_ty).to_string(), "@lvalue Builtin.Int32");
        assert_eq!(ctx.metatype(i32_ty).to_string(), "Builtin.Int32.metatype");
    }

    #[test]
    fn test_structural_equality() {
        let arena = LocalArena::default();
        let ctx = AstContext::new(&arena);

        let i8_ty = ctx.builtin_integer_type(8).unwrap();
        let a = ctx.tuple_type(&[i8_ty, i8_ty]);
        let b = ctx.tuple_type(&[i8_ty, i8_ty]);
        assert_eq!(a, b);
        assert_ne!(a, ctx.tuple_type(&[i8_ty]));
    }

    #[test]
    fn test_queries() {
        let arena = LocalArena::default();
        let ctx = AstContext::new(&arena);

        let proto = ctx.nominal_type("Printable", NominalKind::Protocol);
        let class = ctx.nominal_type("Shape", NominalKind::Class);
        assert!(proto.is_existential());
        assert!(!class.is_existential());

        let lvalue = ctx.lvalue_type(class);
        assert_eq!(lvalue.rvalue_type(), class);
        assert_eq!(class.rvalue_type(), class);

        let meta = ctx.metatype(class);
        assert_eq!(meta.metatype_instance(), Some(class));
        assert!(class.metatype_instance().is_none());

        let t = ctx.archetype("T", None);
        assert_eq!(t.as_archetype().map(|a| a.name.as_str()), Some("T"));
        assert!(ctx.error_type().is_error());
        assert!(ctx.unresolved_type().is_unresolved());
    }
}

//! The expression variant registry.
//!
//! [`ExprTag`] enumerates every concrete expression kind in declaration
//! order. Each entry records its registry name, the name the tree printer
//! uses, and whether the kind has its own caret location instead of the
//! start of its source range.
//!
//! The registry also generates [`ExprKind::tag`]; because that match names
//! every tag, an [`ExprKind`] variant missing from the registry does not
//! compile.

use super::ExprKind;

macro_rules! expr_registry {
    (@caret caret) => {
        true
    };
    (@caret) => {
        false
    };
    ($( $tag:ident => $printer:literal $(, $caret:ident)? ; )*) => {
        /// Identity of a concrete expression kind.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum ExprTag {
            $(
                #[doc = concat!("`", $printer, "`")]
                $tag,
            )*
        }

        impl ExprTag {
            /// Every tag, in declaration order.
            pub const ALL: &'static [ExprTag] = &[$(ExprTag::$tag),*];

            /// Registry name, e.g. `"IntegerLiteral"`.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(ExprTag::$tag => stringify!($tag),)*
                }
            }

            /// Name used by the tree printer, e.g. `"integer_literal_expr"`.
            #[must_use]
            pub const fn printer_name(self) -> &'static str {
                match self {
                    $(ExprTag::$tag => $printer,)*
                }
            }

            /// Returns `true` if the kind has its own caret location.
            #[must_use]
            pub const fn overrides_loc(self) -> bool {
                match self {
                    $(ExprTag::$tag => expr_registry!(@caret $($caret)?),)*
                }
            }
        }

        impl ExprKind<'_> {
            /// Tag of this variant.
            #[must_use]
            pub fn tag(&self) -> ExprTag {
                match self {
                    $(ExprKind::$tag { .. } => ExprTag::$tag,)*
                }
            }
        }
    };
}

expr_registry! {
    Error => "error_expr";

    IntegerLiteral => "integer_literal_expr";
    FloatLiteral => "float_literal_expr";
    CharacterLiteral => "character_literal_expr";
    StringLiteral => "string_literal_expr";
    InterpolatedStringLiteral => "interpolated_string_literal_expr";

    DeclRef => "declref_expr";
    SuperRef => "super_ref_expr";
    OtherConstructorDeclRef => "other_constructor_ref_expr";
    UnresolvedConstructor => "unresolved_constructor", caret;
    OverloadedDeclRef => "overloaded_decl_ref_expr";
    OverloadedMemberRef => "overloaded_member_ref_expr", caret;
    UnresolvedDeclRef => "unresolved_decl_ref_expr";
    UnresolvedIf => "unresolved_if_expr";
    UnresolvedElse => "unresolved_else_expr";
    UnresolvedSpecialize => "unresolved_specialize_expr", caret;

    MemberRef => "member_ref_expr", caret;
    ExistentialMemberRef => "existential_member_ref_expr", caret;
    ArchetypeMemberRef => "archetype_member_ref_expr", caret;
    GenericMemberRef => "generic_member_ref_expr", caret;
    UnresolvedMember => "unresolved_member_expr", caret;
    UnresolvedDot => "unresolved_dot_expr", caret;
    Module => "module_expr";
    TupleElement => "tuple_element_expr", caret;

    Paren => "paren_expr";
    Tuple => "tuple_expr";
    Array => "array_expr";
    Dictionary => "dictionary_expr";

    Subscript => "subscript_expr", caret;
    ExistentialSubscript => "existential_subscript_expr", caret;
    ArchetypeSubscript => "archetype_subscript_expr", caret;
    GenericSubscript => "generic_subscript_expr", caret;

    TupleShuffle => "tuple_shuffle_expr", caret;
    FunctionConversion => "function_conversion_expr", caret;
    Erasure => "erasure_expr", caret;
    Specialize => "specialize_expr", caret;
    Load => "load_expr", caret;
    Materialize => "materialize_expr", caret;
    Requalify => "requalify_expr", caret;
    MetatypeConversion => "metatype_conversion_expr", caret;
    DerivedToBase => "derived_to_base_expr", caret;
    ArchetypeToSuper => "archetype_to_super_expr", caret;
    ScalarToTuple => "scalar_to_tuple_expr", caret;
    BridgeToBlock => "bridge_to_block", caret;

    AddressOf => "address_of_expr";
    Sequence => "sequence_expr";

    Func => "func_expr";
    PipeClosure => "closure_expr", caret;
    ImplicitClosure => "implicit_closure_expr";

    NewArray => "new_array_expr";
    Metatype => "metatype_expr", caret;
    OpaqueValue => "opaque_value_expr";
    ZeroValue => "zero_value_expr";

    Call => "call_expr";
    PrefixUnary => "prefix_unary_expr", caret;
    PostfixUnary => "postfix_unary_expr", caret;
    Binary => "binary_expr", caret;
    DotSyntaxCall => "dot_syntax_call_expr", caret;
    ConstructorRefCall => "constructor_ref_call_expr";
    DotSyntaxBaseIgnored => "dot_syntax_base_ignored", caret;

    Coerce => "coerce_expr";
    UncheckedDowncast => "unchecked_downcast_expr", caret;
    UncheckedSuperToArchetype => "unchecked_super_to_archetype_expr", caret;
    IsSubtype => "is_subtype_expr", caret;

    RebindThisInConstructor => "rebind_this_in_constructor_expr", caret;
    If => "if_expr", caret;
    DefaultValue => "default_value_expr";
}

impl ExprTag {
    /// Returns `true` for the implicit conversion kinds.
    #[must_use]
    pub const fn is_implicit_conversion(self) -> bool {
        matches!(
            self,
            ExprTag::TupleShuffle
                | ExprTag::FunctionConversion
                | ExprTag::Erasure
                | ExprTag::Specialize
                | ExprTag::Load
                | ExprTag::Materialize
                | ExprTag::Requalify
                | ExprTag::MetatypeConversion
                | ExprTag::DerivedToBase
                | ExprTag::ArchetypeToSuper
                | ExprTag::ScalarToTuple
                | ExprTag::BridgeToBlock
        )
    }

    /// Returns `true` for the function application kinds.
    #[must_use]
    pub const fn is_apply(self) -> bool {
        matches!(
            self,
            ExprTag::Call
                | ExprTag::PrefixUnary
                | ExprTag::PostfixUnary
                | ExprTag::Binary
                | ExprTag::DotSyntaxCall
                | ExprTag::ConstructorRefCall
        )
    }
}

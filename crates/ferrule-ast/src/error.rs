//! Errors raised by the AST layer.
//!
//! None of these are user diagnostics. Each one means an earlier compiler
//! stage broke its contract with the AST: it resolved a type twice, asked
//! for a literal's value before type checking, or let malformed literal text
//! through the lexer.

use std::fmt;

/// An AST contract violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AstError {
    /// A write-once type slot was written a second time.
    ///
    /// ```text
    /// set_type(Int32) on (declref_expr type='Builtin.Int64' ...)
    /// ```
    TypeAlreadySet {
        /// Registry name of the node kind or declaration
        kind: &'static str,
    },

    /// A value that depends on the resolved type was requested before type
    /// checking assigned one.
    UnresolvedType {
        /// Registry name of the node kind
        kind: &'static str,
    },

    /// A kind-specific query was made on a node of another kind.
    KindMismatch {
        /// Registry name of the kind the query applies to
        expected: &'static str,
        /// Registry name of the node's kind
        found: &'static str,
    },

    /// A function-valued node was resolved to a type that is not a function.
    NotAFunctionType {
        /// Registry name of the node kind
        kind: &'static str,
        /// The type it actually has
        found: String,
    },

    /// A literal was given a type it cannot be evaluated at.
    LiteralTypeMismatch {
        /// What the literal needs, e.g. "builtin integer"
        expected: &'static str,
        /// The type it actually has
        found: String,
    },

    /// Literal text that the lexer should have rejected.
    MalformedLiteral {
        /// The offending text
        text: String,
        /// Why it failed to parse
        reason: &'static str,
    },

    /// An integer width of zero bits.
    InvalidBitWidth(u32),

    /// A function was built with different numbers of argument and body
    /// parameter clauses.
    ParamClauseMismatch {
        /// Argument clause count
        args: usize,
        /// Body clause count
        body: usize,
    },

    /// A closure body is not a lone `return <expr>`.
    NotSingleExpressionBody,

    /// A trailing-payload slot index past the fixed element count.
    ElementIndexOutOfRange {
        /// Requested slot
        index: usize,
        /// Element count fixed at construction
        len: usize,
    },
}

impl fmt::Display for AstError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeAlreadySet { kind } => {
                write!(f, "type of {kind} was already resolved")
            }
            Self::UnresolvedType { kind } => {
                write!(f, "{kind} has no type yet: semantic analysis has not completed")
            }
            Self::KindMismatch { expected, found } => {
                write!(f, "{expected} query made on a {found} node")
            }
            Self::NotAFunctionType { kind, found } => {
                write!(f, "{kind} resolved to non-function type '{found}'")
            }
            Self::LiteralTypeMismatch { expected, found } => {
                write!(f, "literal needs a {expected} type, found '{found}'")
            }
            Self::MalformedLiteral { text, reason } => {
                write!(f, "invalid literal '{text}' formed: {reason}")
            }
            Self::InvalidBitWidth(width) => write!(f, "invalid integer bit width {width}"),
            Self::ParamClauseMismatch { args, body } => write!(
                f,
                "function has {args} argument clauses but {body} body clauses"
            ),
            Self::NotSingleExpressionBody => {
                write!(f, "closure does not have a single-expression body")
            }
            Self::ElementIndexOutOfRange { index, len } => {
                write!(f, "element index {index} out of range for {len} elements")
            }
        }
    }
}

impl std::error::Error for AstError {}

/// Result alias for AST operations.
pub type AstResult<T> = Result<T, AstError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = AstError::UnresolvedType {
            kind: "IntegerLiteral",
        };
        assert_eq!(
            err.to_string(),
            "IntegerLiteral has no type yet: semantic analysis has not completed"
        );

        let err = AstError::MalformedLiteral {
            text: "0xZZ".to_string(),
            reason: "invalid digit",
        };
        assert_eq!(err.to_string(), "invalid literal '0xZZ' formed: invalid digit");

        let err = AstError::ElementIndexOutOfRange { index: 3, len: 2 };
        assert_eq!(err.to_string(), "element index 3 out of range for 2 elements");

        let err = AstError::KindMismatch {
            expected: "IntegerLiteral",
            found: "FloatLiteral",
        };
        assert_eq!(err.to_string(), "IntegerLiteral query made on a FloatLiteral node");
    }
}

//! Abstract syntax tree for Ferrule expressions.
//!
//! # Modules
//!
//! - [`expr`] - Expression nodes and their dispatch operations
//! - [`ty`] - Semantic types and type annotations
//! - [`decl`] - Value declarations referenced by expressions
//! - [`pat`] - Parameter patterns
//! - [`stmt`] - Statements found in closure bodies

pub mod decl;
pub mod expr;
pub mod pat;
pub mod stmt;
pub mod ty;

// Re-exports for convenience
pub use decl::{DeclKind, ValueDecl};
pub use expr::{Expr, ExprKind, ExprTag};
pub use pat::Pattern;
pub use stmt::{BraceElement, BraceStmt, ReturnStmt, Stmt};
pub use ty::{Substitution, Type, TypeBase, TypeLoc};

//! Ferrule expression AST
//!
//! This crate provides the expression layer of the Ferrule compiler's syntax
//! tree:
//! - A closed registry of expression kinds ([`ExprTag`])
//! - Arena-allocated expression nodes built through [`AstContext`]
//! - Kind dispatch: source ranges, caret locations, implicit-node detection
//!   and semantics-providing unwrap
//! - A diagnostic tree printer
//!
//! # Modules
//!
//! - [`span`] - Source locations and ranges
//! - [`context`] - Allocation context and type constructors
//! - [`ast`] - Expression, type, declaration, pattern and statement nodes
//! - [`literal`] - Literal value extraction
//! - [`printer`] - Tree dumps
//! - [`error`] - AST contract errors
//!
//! # Examples
//!
//! ```
//! use ferrule_ast::ast::expr::ApplyKind;
//! use ferrule_ast::span::{SourceLoc, Spanned};
//! use ferrule_ast::AstContext;
//! use ferrule_mem::LocalArena;
//!
//! let arena = LocalArena::default();
//! let ctx = AstContext::new(&arena);
//!
//! // -x
//! let minus = ctx.unresolved_decl_ref("-", SourceLoc::new(0));
//! let x = ctx.unresolved_decl_ref("x", SourceLoc::new(1));
//! let negate = ctx.apply(ApplyKind::PrefixUnary, minus, Some(x));
//!
//! assert_eq!(negate.start_loc(), SourceLoc::new(0));
//! assert_eq!(negate.end_loc(), SourceLoc::new(1));
//! assert!(!negate.is_implicit());
//! ```

#![warn(missing_docs)]

pub mod ast;
mod build;
pub mod context;
pub mod error;
pub mod literal;
pub mod printer;
pub mod span;

pub use ast::{Expr, ExprKind, ExprTag};
pub use context::{AstContext, Identifier};
pub use error::{AstError, AstResult};
pub use printer::{ExprPrinter, PrinterConfig, print_expr};
pub use span::{SourceLoc, SourceRange, Spanned};

//! S-expression dump of expression trees, for compiler debugging.
//!
//! Every node renders as `(<name> type='<type>' <attributes>`, its children
//! one per line at the next indentation level, then `)`. The format is a
//! debugging aid rather than a stable interface; tests compare it verbatim
//! only for small trees.
//!
//! ```
//! use ferrule_ast::context::AstContext;
//! use ferrule_ast::printer::print_expr;
//! use ferrule_ast::span::SourceLoc;
//! use ferrule_mem::LocalArena;
//!
//! let arena = LocalArena::default();
//! let ctx = AstContext::new(&arena);
//! let x = ctx.unresolved_decl_ref("x", SourceLoc::new(1));
//! let paren = ctx.paren(SourceLoc::new(0), x, SourceLoc::new(2), false);
//!
//! let mut out = String::new();
//! print_expr(paren, &mut out, 0).unwrap();
//! assert_eq!(out, "(paren_expr type=''\n  (unresolved_decl_ref_expr type='' name=x))");
//! ```

use std::fmt::{self, Write};

use crate::ast::decl::ValueDecl;
use crate::ast::expr::{ApplyExpr, Expr, ExprKind};
use crate::ast::stmt::{BraceElement, BraceStmt, Stmt};
use crate::ast::ty::{Substitution, Type};

/// Printer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrinterConfig {
    /// Spaces added per nesting level
    pub indent_step: usize,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self { indent_step: 2 }
    }
}

/// Writes expression trees to a [`fmt::Write`] sink.
pub struct ExprPrinter<'w, W: Write + ?Sized> {
    out: &'w mut W,
    config: PrinterConfig,
    indent: usize,
}

impl<'w, W: Write + ?Sized> ExprPrinter<'w, W> {
    /// Creates a printer with the default configuration.
    pub fn new(out: &'w mut W) -> Self {
        Self::with_config(out, PrinterConfig::default())
    }

    /// Creates a printer with an explicit configuration.
    pub fn with_config(out: &'w mut W, config: PrinterConfig) -> Self {
        Self {
            out,
            config,
            indent: 0,
        }
    }

    /// Starts printing at `indent` spaces instead of zero.
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Prints the tree rooted at `expr`.
    ///
    /// # Errors
    ///
    /// Propagates errors from the sink.
    pub fn print(&mut self, expr: &Expr<'_>) -> fmt::Result {
        self.visit(expr)
    }

    fn pad(&mut self, extra: usize) -> fmt::Result {
        write!(self.out, "{:width$}", "", width = self.indent + extra)
    }

    fn nested<F>(&mut self, f: F) -> fmt::Result
    where
        F: FnOnce(&mut Self) -> fmt::Result,
    {
        self.indent += self.config.indent_step;
        let result = f(self);
        self.indent -= self.config.indent_step;
        result
    }

    fn print_rec(&mut self, expr: Option<&Expr<'_>>) -> fmt::Result {
        self.nested(|p| match expr {
            Some(expr) => p.visit(expr),
            None => {
                p.pad(0)?;
                p.out.write_str("(**NULL EXPRESSION**)")
            }
        })
    }

    fn child(&mut self, expr: &Expr<'_>) -> fmt::Result {
        self.out.write_char('\n')?;
        self.print_rec(Some(expr))
    }

    fn common(&mut self, expr: &Expr<'_>) -> fmt::Result {
        self.pad(0)?;
        write!(self.out, "({} type='", expr.tag().printer_name())?;
        if let Some(ty) = expr.ty() {
            write!(self.out, "{ty}")?;
        }
        self.out.write_char('\'')
    }

    fn substitutions(&mut self, substitutions: &[Substitution<'_>]) -> fmt::Result {
        let step = self.config.indent_step;
        for sub in substitutions {
            self.pad(step)?;
            writeln!(self.out, "(with {} = {})", sub.archetype.name, sub.replacement)?;
        }
        Ok(())
    }

    fn captures(&mut self, captures: &[&ValueDecl<'_>]) -> fmt::Result {
        let Some((first, rest)) = captures.split_first() else {
            return Ok(());
        };
        write!(self.out, " captures=({}", first.name())?;
        for capture in rest {
            write!(self.out, ", {}", capture.name())?;
        }
        self.out.write_char(')')
    }

    fn overloads(&mut self, decls: &[&ValueDecl<'_>]) -> fmt::Result {
        if let Some(first) = decls.first() {
            write!(self.out, " name={}", first.name())?;
        }
        write!(self.out, " #decls={}", decls.len())
    }

    fn overload_lines(&mut self, decls: &[&ValueDecl<'_>]) -> fmt::Result {
        let step = self.config.indent_step;
        for decl in decls {
            self.out.write_char('\n')?;
            self.pad(step)?;
            write!(self.out, "decl={} type=", decl.name())?;
            write_type(self.out, decl.type_of_reference())?;
        }
        Ok(())
    }

    fn apply(&mut self, apply: &ApplyExpr<'_>) -> fmt::Result {
        if apply.is_super() {
            self.out.write_str(" super")?;
        }
        self.child(apply.func())?;
        self.out.write_char('\n')?;
        self.print_rec(apply.arg())
    }

    fn visit(&mut self, expr: &Expr<'_>) -> fmt::Result {
        self.common(expr)?;

        match expr.kind() {
            ExprKind::Error(_)
            | ExprKind::SuperRef(_)
            | ExprKind::OtherConstructorDeclRef(_)
            | ExprKind::UnresolvedIf(_)
            | ExprKind::UnresolvedElse(_)
            | ExprKind::Module(_)
            | ExprKind::OpaqueValue(_)
            | ExprKind::ZeroValue => {}

            ExprKind::IntegerLiteral(lit) => {
                self.out.write_str(" value=")?;
                match expr.integer_literal_value() {
                    Ok(value) => write!(self.out, "{value}")?,
                    Err(_) => self.out.write_str(lit.text)?,
                }
            }
            ExprKind::FloatLiteral(lit) => write!(self.out, " value={}", lit.text)?,
            ExprKind::CharacterLiteral(lit) => write!(self.out, " value={}", u32::from(lit.value))?,
            ExprKind::StringLiteral(lit) => write!(self.out, " value={}", lit.value)?,
            ExprKind::InterpolatedStringLiteral(lit) => {
                for segment in lit.segments() {
                    self.child(segment)?;
                }
            }

            ExprKind::DeclRef(r) => write!(self.out, " decl={}", r.decl.name())?,
            ExprKind::UnresolvedConstructor(ctor) => self.child(ctor.sub_expr())?,
            ExprKind::OverloadedDeclRef(ovl) => {
                self.overloads(ovl.decls)?;
                self.overload_lines(ovl.decls)?;
            }
            ExprKind::OverloadedMemberRef(ovl) => {
                self.overloads(ovl.decls)?;
                self.child(ovl.base())?;
                self.overload_lines(ovl.decls)?;
            }
            ExprKind::UnresolvedDeclRef(r) => write!(self.out, " name={}", r.name)?,
            ExprKind::UnresolvedSpecialize(spec) => {
                self.child(spec.sub_expr())?;
                let step = self.config.indent_step;
                for param in spec.params {
                    self.out.write_char('\n')?;
                    self.pad(step)?;
                    write_type(self.out, param.ty)?;
                }
            }

            ExprKind::MemberRef(member)
            | ExprKind::ExistentialMemberRef(member)
            | ExprKind::ArchetypeMemberRef(member)
            | ExprKind::GenericMemberRef(member) => {
                writeln!(self.out, " decl={}", member.decl.name())?;
                self.substitutions(member.substitutions())?;
                self.print_rec(Some(member.base()))?;
            }
            ExprKind::UnresolvedMember(member) => write!(self.out, " name='{}'", member.name)?,
            ExprKind::UnresolvedDot(dot) => {
                write!(self.out, " field '{}'", dot.name)?;
                if let Some(base) = dot.base() {
                    self.child(base)?;
                }
            }
            ExprKind::TupleElement(elt) => {
                write!(self.out, " field #{}", elt.field_no)?;
                self.child(elt.base())?;
            }

            ExprKind::Paren(paren) => {
                if paren.has_trailing_closure {
                    self.out.write_str(" trailing-closure")?;
                }
                self.child(paren.sub_expr())?;
            }
            ExprKind::Tuple(tuple) => {
                if tuple.has_trailing_closure {
                    self.out.write_str(" trailing-closure")?;
                }
                let step = self.config.indent_step;
                for element in tuple.elements() {
                    match element {
                        Some(element) => self.child(element)?,
                        None => {
                            self.out.write_char('\n')?;
                            self.pad(step)?;
                            self.out.write_str("<<tuple element default value>>")?;
                        }
                    }
                }
            }
            ExprKind::Array(coll) | ExprKind::Dictionary(coll) => self.child(coll.sub_expr())?,

            ExprKind::Subscript(sub)
            | ExprKind::ExistentialSubscript(sub)
            | ExprKind::ArchetypeSubscript(sub)
            | ExprKind::GenericSubscript(sub) => {
                self.out.write_char('\n')?;
                self.substitutions(sub.substitutions())?;
                self.print_rec(Some(sub.base()))?;
                self.child(sub.index())?;
            }

            ExprKind::TupleShuffle(shuffle) => {
                self.out.write_str(" elements=[")?;
                for (i, index) in shuffle.element_mapping.iter().enumerate() {
                    if i > 0 {
                        self.out.write_str(", ")?;
                    }
                    write!(self.out, "{index}")?;
                }
                self.out.write_char(']')?;
                self.child(shuffle.conversion.sub_expr())?;
            }
            ExprKind::Specialize(spec) => {
                self.out.write_char('\n')?;
                self.substitutions(spec.substitutions)?;
                self.print_rec(Some(spec.conversion.sub_expr()))?;
            }
            ExprKind::ScalarToTuple(scalar) => {
                write!(self.out, " field={}", scalar.scalar_field)?;
                self.child(scalar.conversion.sub_expr())?;
            }
            ExprKind::FunctionConversion(conv)
            | ExprKind::Erasure(conv)
            | ExprKind::Load(conv)
            | ExprKind::Materialize(conv)
            | ExprKind::Requalify(conv)
            | ExprKind::MetatypeConversion(conv)
            | ExprKind::DerivedToBase(conv)
            | ExprKind::ArchetypeToSuper(conv)
            | ExprKind::BridgeToBlock(conv) => self.child(conv.sub_expr())?,

            ExprKind::AddressOf(addr) => self.child(addr.sub_expr())?,
            ExprKind::Sequence(seq) => {
                for element in seq.elements() {
                    self.child(element)?;
                }
            }

            ExprKind::Func(func) => {
                self.captures(func.captures())?;
                if let Some(body) = func.body() {
                    self.out.write_char('\n')?;
                    self.nested(|p| p.brace(body))?;
                }
            }
            ExprKind::PipeClosure(closure) => {
                self.captures(closure.captures())?;
                match closure.single_expression_body() {
                    Ok(body) => {
                        self.out.write_str(" single-expression")?;
                        self.child(body)?;
                    }
                    Err(_) => {
                        self.out.write_char('\n')?;
                        self.nested(|p| p.brace(closure.body))?;
                    }
                }
            }
            ExprKind::ImplicitClosure(closure) => {
                self.captures(closure.captures())?;
                self.child(closure.body())?;
            }

            ExprKind::NewArray(new_array) => {
                self.out.write_str(" elementType='")?;
                write_type(self.out, new_array.element_type.ty)?;
                self.out.write_char('\'')?;
                if let Some(inject) = new_array.injection_function() {
                    self.child(inject)?;
                }
                let step = self.config.indent_step;
                for bound in new_array.bounds {
                    match bound.value {
                        Some(value) => self.child(value)?,
                        None => {
                            self.out.write_char('\n')?;
                            self.pad(step)?;
                            self.out.write_str("(empty bound)")?;
                        }
                    }
                }
            }
            ExprKind::Metatype(meta) => match meta.base() {
                Some(base) => self.child(base)?,
                None => self.out.write_str(" baseless")?,
            },

            ExprKind::Call(apply)
            | ExprKind::PrefixUnary(apply)
            | ExprKind::PostfixUnary(apply)
            | ExprKind::Binary(apply)
            | ExprKind::ConstructorRefCall(apply) => self.apply(apply)?,
            ExprKind::DotSyntaxCall(call) => self.apply(&call.apply)?,
            ExprKind::DotSyntaxBaseIgnored(ignored) => {
                self.child(ignored.lhs())?;
                self.child(ignored.rhs())?;
            }

            ExprKind::Coerce(cast)
            | ExprKind::UncheckedDowncast(cast)
            | ExprKind::UncheckedSuperToArchetype(cast)
            | ExprKind::IsSubtype(cast) => {
                self.out.write_char(' ')?;
                write_type(self.out, cast.type_loc.ty)?;
                self.child(cast.sub_expr())?;
            }

            ExprKind::RebindThisInConstructor(rebind) => self.child(rebind.sub_expr())?,
            ExprKind::If(if_expr) => {
                self.child(if_expr.cond())?;
                self.child(if_expr.then_expr())?;
                self.out.write_char('\n')?;
                self.print_rec(if_expr.else_expr())?;
            }
            ExprKind::DefaultValue(default) => self.child(default.sub_expr())?,
        }

        self.out.write_char(')')
    }

    fn brace(&mut self, brace: &BraceStmt<'_>) -> fmt::Result {
        self.pad(0)?;
        self.out.write_str("(brace_stmt")?;
        for element in brace.elements {
            self.out.write_char('\n')?;
            match element {
                BraceElement::Expr(expr) => self.print_rec(Some(*expr))?,
                BraceElement::Stmt(stmt) => self.nested(|p| p.stmt(stmt))?,
                BraceElement::Decl(decl) => self.nested(|p| p.decl(decl))?,
            }
        }
        self.out.write_char(')')
    }

    fn stmt(&mut self, stmt: &Stmt<'_>) -> fmt::Result {
        match stmt {
            Stmt::Brace(brace) => self.brace(brace),
            Stmt::Return(ret) => {
                self.pad(0)?;
                self.out.write_str("(return_stmt")?;
                if let Some(result) = ret.result() {
                    self.child(result)?;
                }
                self.out.write_char(')')
            }
        }
    }

    fn decl(&mut self, decl: &ValueDecl<'_>) -> fmt::Result {
        self.pad(0)?;
        write!(self.out, "({} '{}' type='", decl.printer_name(), decl.name())?;
        write_type(self.out, decl.ty())?;
        self.out.write_str("')")
    }
}

fn write_type<W: Write + ?Sized>(out: &mut W, ty: Option<Type<'_>>) -> fmt::Result {
    match ty {
        Some(ty) => write!(out, "{ty}"),
        None => Ok(()),
    }
}

/// Prints the tree rooted at `expr` into `out`, starting at `indent` spaces.
///
/// # Errors
///
/// Propagates errors from the sink.
pub fn print_expr<W: Write + ?Sized>(expr: &Expr<'_>, out: &mut W, indent: usize) -> fmt::Result {
    ExprPrinter::new(out).with_indent(indent).print(expr)
}

impl fmt::Display for Expr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ExprPrinter::new(f).print(self)
    }
}

//! Tree printer golden outputs.
//!
//! Each test builds a small tree and compares its dump line for line.

use ferrule_ast::ast::decl::DeclKind;
use ferrule_ast::ast::expr::{ApplyKind, ArrayBound, MemberRefKind};
use ferrule_ast::ast::stmt::BraceElement;
use ferrule_ast::ast::ty::{Substitution, TypeLoc};
use ferrule_ast::{AstContext, ExprPrinter, PrinterConfig, SourceLoc, SourceRange, print_expr};
use ferrule_mem::LocalArena;

fn l(offset: u32) -> SourceLoc {
    SourceLoc::new(offset)
}

/// Asserts line by line so a mismatch names the first differing line.
fn assert_dump(actual: &str, expected: &[&str]) {
    let actual: Vec<_> = actual.lines().collect();
    for (i, (got, want)) in actual.iter().zip(expected).enumerate() {
        assert_eq!(got, want, "line {i} differs");
    }
    assert_eq!(actual.len(), expected.len(), "line count differs: {actual:#?}");
}

#[test]
fn test_typed_tuple() {
    let arena = LocalArena::default();
    let ctx = AstContext::new(&arena);
    let int = ctx.builtin_integer_type(32).unwrap();

    let one = ctx.integer_literal("1", l(1));
    let two = ctx.integer_literal("2", l(4));
    one.set_type(int).unwrap();
    two.set_type(int).unwrap();

    let tuple = ctx.tuple(l(0), &[Some(one), Some(two)], l(5), false);
    tuple.set_type(ctx.tuple_type(&[int, int])).unwrap();

    assert_dump(
        &tuple.print_to_string(),
        &[
            "(tuple_expr type='(Builtin.Int32, Builtin.Int32)'",
            "  (integer_literal_expr type='Builtin.Int32' value=1)",
            "  (integer_literal_expr type='Builtin.Int32' value=2))",
        ],
    );
}

#[test]
fn test_defaulted_tuple_slot() {
    let arena = LocalArena::default();
    let ctx = AstContext::new(&arena);

    let a = ctx.unresolved_decl_ref("a", l(0));
    let tuple = ctx.tuple(SourceLoc::INVALID, &[Some(a), None], SourceLoc::INVALID, true);

    assert_dump(
        &tuple.print_to_string(),
        &[
            "(tuple_expr type='' trailing-closure",
            "  (unresolved_decl_ref_expr type='' name=a)",
            "  <<tuple element default value>>)",
        ],
    );
}

#[test]
fn test_missing_children() {
    let arena = LocalArena::default();
    let ctx = AstContext::new(&arena);

    let f = ctx.unresolved_decl_ref("f", l(0));
    let call = ctx.apply(ApplyKind::Call, f, None);
    assert_dump(
        &call.print_to_string(),
        &[
            "(call_expr type=''",
            "  (unresolved_decl_ref_expr type='' name=f)",
            "  (**NULL EXPRESSION**))",
        ],
    );

    let c = ctx.unresolved_decl_ref("c", l(0));
    let t = ctx.unresolved_decl_ref("t", l(4));
    let if_expr = ctx.if_expr(c, l(2), t, SourceLoc::INVALID, None);
    assert_dump(
        &if_expr.print_to_string(),
        &[
            "(if_expr type=''",
            "  (unresolved_decl_ref_expr type='' name=c)",
            "  (unresolved_decl_ref_expr type='' name=t)",
            "  (**NULL EXPRESSION**))",
        ],
    );
}

#[test]
fn test_substitutions() {
    let arena = LocalArena::default();
    let ctx = AstContext::new(&arena);
    let int = ctx.builtin_integer_type(32).unwrap();
    let archetype = ctx.archetype("T", None).as_archetype().unwrap();
    let substitutions = [Substitution {
        archetype,
        replacement: int,
    }];

    let x = ctx.value_decl(DeclKind::Var, "x", l(0), None);
    let spec = ctx.specialize(ctx.decl_ref(x, l(0)), int, &substitutions);
    assert_dump(
        &spec.print_to_string(),
        &[
            "(specialize_expr type='Builtin.Int32'",
            "  (with T = Builtin.Int32)",
            "  (declref_expr type='' decl=x))",
        ],
    );

    let member = ctx.member_ref(MemberRefKind::Generic, ctx.decl_ref(x, l(0)), l(1), x, l(2));
    member
        .as_member_ref()
        .unwrap()
        .set_substitutions(ctx.alloc_slice(&substitutions));
    assert_dump(
        &member.print_to_string(),
        &[
            "(generic_member_ref_expr type='' decl=x",
            "  (with T = Builtin.Int32)",
            "  (declref_expr type='' decl=x))",
        ],
    );
}

#[test]
fn test_overload_sets() {
    let arena = LocalArena::default();
    let ctx = AstContext::new(&arena);
    let int = ctx.builtin_integer_type(32).unwrap();
    let fn_ty = ctx.function_type(ctx.empty_tuple_type(), int);

    let f1 = ctx.value_decl(DeclKind::Func { is_static: false }, "f", l(0), Some(fn_ty));
    let f2 = ctx.value_decl(DeclKind::Func { is_static: false }, "f", l(9), Some(int));

    let ovl = ctx.overloaded_decl_ref(&[f1, f2], l(20));
    assert_dump(
        &ovl.print_to_string(),
        &[
            "(overloaded_decl_ref_expr type='' name=f #decls=2",
            "  decl=f type=() -> Builtin.Int32",
            "  decl=f type=Builtin.Int32)",
        ],
    );

    let empty = ctx.overloaded_decl_ref(&[], l(20));
    assert_eq!(empty.print_to_string(), "(overloaded_decl_ref_expr type='' #decls=0)");
}

#[test]
fn test_closures() {
    let arena = LocalArena::default();
    let ctx = AstContext::new(&arena);

    let x = ctx.value_decl(DeclKind::Var, "x", l(0), None);
    let y = ctx.value_decl(DeclKind::Var, "y", l(0), None);

    let ret = ctx.return_stmt(SourceLoc::INVALID, Some(ctx.decl_ref(x, l(3))));
    let body = ctx.brace_stmt(l(2), &[BraceElement::Stmt(ret)], l(5));

    let single = ctx.pipe_closure(ctx.any_pattern(l(1)), body, true).unwrap();
    single
        .as_pipe_closure()
        .unwrap()
        .set_captures(ctx.decl_list(&[x, y]));
    assert_dump(
        &single.print_to_string(),
        &[
            "(closure_expr type='' captures=(x, y) single-expression",
            "  (declref_expr type='' decl=x))",
        ],
    );

    let full = ctx.pipe_closure(ctx.any_pattern(l(1)), body, false).unwrap();
    assert_dump(
        &full.print_to_string(),
        &[
            "(closure_expr type=''",
            "  (brace_stmt",
            "    (return_stmt",
            "      (declref_expr type='' decl=x))))",
        ],
    );

    let inner = ctx.brace_stmt(l(3), &[BraceElement::Expr(ctx.decl_ref(x, l(3)))], l(4));
    let outer = ctx.brace_stmt(l(2), &[BraceElement::Stmt(ctx.nested_brace_stmt(inner))], l(5));
    let nested = ctx.pipe_closure(ctx.any_pattern(l(1)), outer, false).unwrap();
    assert_dump(
        &nested.print_to_string(),
        &[
            "(closure_expr type=''",
            "  (brace_stmt",
            "    (brace_stmt",
            "      (declref_expr type='' decl=x))))",
        ],
    );

    let func_body = ctx.brace_stmt(
        l(6),
        &[BraceElement::Decl(y), BraceElement::Expr(ctx.decl_ref(x, l(7)))],
        l(8),
    );
    let func = ctx
        .func(
            l(0),
            &[ctx.any_pattern(l(4))],
            &[ctx.any_pattern(SourceLoc::INVALID)],
            TypeLoc::default(),
            Some(func_body),
        )
        .unwrap();
    assert_dump(
        &func.print_to_string(),
        &[
            "(func_expr type=''",
            "  (brace_stmt",
            "    (var_decl 'y' type='')",
            "    (declref_expr type='' decl=x)))",
        ],
    );
}

#[test]
fn test_placeholders() {
    let arena = LocalArena::default();
    let ctx = AstContext::new(&arena);
    let int = ctx.builtin_integer_type(32).unwrap();

    let meta = ctx.metatype_expr(None, l(0));
    assert_eq!(meta.print_to_string(), "(metatype_expr type='' baseless)");

    let zero = ctx.zero_value(int);
    assert_eq!(zero.print_to_string(), "(zero_value_expr type='Builtin.Int32')");

    let new_array = ctx.new_array(
        l(0),
        TypeLoc::new(Some(int), SourceRange::point(l(4))),
        &[
            ArrayBound {
                value: Some(ctx.unresolved_decl_ref("n", l(6))),
                brackets: SourceRange::new(l(5), l(7)),
            },
            ArrayBound {
                value: None,
                brackets: SourceRange::new(l(8), l(9)),
            },
        ],
    );
    assert_dump(
        &new_array.print_to_string(),
        &[
            "(new_array_expr type='' elementType='Builtin.Int32'",
            "  (unresolved_decl_ref_expr type='' name=n)",
            "  (empty bound))",
        ],
    );

    let x = ctx.unresolved_decl_ref("x", l(0));
    let default = ctx.default_value(x);
    assert_dump(
        &default.print_to_string(),
        &[
            "(default_value_expr type=''",
            "  (unresolved_decl_ref_expr type='' name=x))",
        ],
    );
}

#[test]
fn test_collections_close() {
    let arena = LocalArena::default();
    let ctx = AstContext::new(&arena);

    let a = ctx.unresolved_decl_ref("a", l(1));
    let array = ctx.array(l(0), ctx.paren(SourceLoc::INVALID, a, SourceLoc::INVALID, false), l(2));
    assert_dump(
        &array.print_to_string(),
        &[
            "(array_expr type=''",
            "  (paren_expr type=''",
            "    (unresolved_decl_ref_expr type='' name=a)))",
        ],
    );
}

#[test]
fn test_display_and_sinks_agree() {
    let arena = LocalArena::default();
    let ctx = AstContext::new(&arena);

    let a = ctx.unresolved_decl_ref("a", l(0));
    let neg = ctx.apply(ApplyKind::PrefixUnary, ctx.unresolved_decl_ref("-", l(0)), Some(a));

    let dump = neg.print_to_string();
    assert_eq!(format!("{neg}"), dump);

    let mut indented = String::new();
    print_expr(neg, &mut indented, 2).unwrap();
    let expected: Vec<_> = dump.lines().map(|line| format!("  {line}")).collect();
    assert_eq!(indented, expected.join("\n"));

    let mut wide = String::new();
    ExprPrinter::with_config(&mut wide, PrinterConfig { indent_step: 4 })
        .print(neg)
        .unwrap();
    assert_dump(
        &wide,
        &[
            "(prefix_unary_expr type=''",
            "    (unresolved_decl_ref_expr type='' name=-)",
            "    (unresolved_decl_ref_expr type='' name=a))",
        ],
    );
}

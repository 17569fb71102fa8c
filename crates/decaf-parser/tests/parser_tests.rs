//! Parser integration tests: assert on the AST shape produced for a range
//! of Decaf programs, rather than snapshotting a CST (there is none --
//! the parser builds the closed tagged-union AST directly).

use decaf_parser::ast::{BinOp, Decl, ExprKind, Member, Stmt, TypeKind};
use decaf_parser::parse;

fn parse_ok(source: &str) -> decaf_parser::ast::Program {
    let (program, errors) = parse(source);
    assert!(errors.is_empty(), "unexpected parse errors: {errors:?}");
    program
}

#[test]
fn top_level_var_decl() {
    let program = parse_ok("int x;");
    assert_eq!(program.decls.len(), 1);
    let Decl::Var(v) = &program.decls[0] else { panic!("expected var decl") };
    assert_eq!(v.name, "x");
    assert!(matches!(v.ty.kind, TypeKind::Int));
}

#[test]
fn array_type_nesting() {
    let program = parse_ok("int[][] grid;");
    let Decl::Var(v) = &program.decls[0] else { panic!() };
    let TypeKind::Array(inner) = &v.ty.kind else { panic!("expected array type") };
    assert!(matches!(inner.kind, TypeKind::Array(_)));
}

#[test]
fn function_decl_with_formals_and_body() {
    let program = parse_ok("int add(int a, int b) { return a + b; }");
    let Decl::Fn(f) = &program.decls[0] else { panic!("expected fn decl") };
    assert_eq!(f.name, "add");
    assert_eq!(f.formals.len(), 2);
    assert!(matches!(f.return_type.kind, TypeKind::Int));
    let body = f.body.as_ref().expect("function has a body");
    assert_eq!(body.stmts.len(), 1);
    let Stmt::Return(r) = &body.stmts[0] else { panic!("expected return") };
    let expr = r.expr.as_ref().expect("return has a value");
    let ExprKind::Compound { op, left, right } = &expr.kind else {
        panic!("expected compound expr")
    };
    assert_eq!(*op, BinOp::Add);
    assert!(left.is_some());
    assert!(matches!(right.kind, ExprKind::Ident(_)));
}

#[test]
fn function_prototype_has_no_body() {
    let (program, errors) = parse("interface Greeter { void greet(); }");
    assert!(errors.is_empty(), "{errors:?}");
    let Decl::Interface(i) = &program.decls[0] else { panic!("expected interface") };
    assert_eq!(i.members.len(), 1);
    assert!(i.members[0].body.is_none());
}

#[test]
fn class_with_extends_and_implements() {
    let program = parse_ok("class Dog extends Animal implements Pet, Named { int age; }");
    let Decl::Class(c) = &program.decls[0] else { panic!("expected class") };
    assert_eq!(c.name, "Dog");
    assert_eq!(c.extends.as_ref().unwrap().name, "Animal");
    assert_eq!(c.implements.len(), 2);
    assert_eq!(c.implements[0].name, "Pet");
    assert_eq!(c.implements[1].name, "Named");
    assert_eq!(c.members.len(), 1);
    assert!(matches!(&c.members[0], Member::Var(v) if v.name == "age"));
}

#[test]
fn block_declarations_precede_statements() {
    let program = parse_ok("void f() { int x; int y; x = y; Print(x); }");
    let Decl::Fn(f) = &program.decls[0] else { panic!() };
    let body = f.body.as_ref().unwrap();
    assert_eq!(body.decls.len(), 2);
    assert_eq!(body.stmts.len(), 2);
    assert!(matches!(body.stmts[0], Stmt::Expr(_)));
    assert!(matches!(body.stmts[1], Stmt::Print(_)));
}

#[test]
fn if_else_chain() {
    let program = parse_ok("void f() { if (true) { } else if (false) { } else { } }");
    let Decl::Fn(f) = &program.decls[0] else { panic!() };
    let Stmt::If(outer) = &f.body.as_ref().unwrap().stmts[0] else { panic!("expected if") };
    assert!(matches!(outer.test.kind, ExprKind::BoolLit(true)));
    let else_branch = outer.else_body.as_ref().expect("has else");
    assert!(matches!(else_branch.as_ref(), Stmt::If(_)));
}

#[test]
fn for_loop_with_optional_init_and_step() {
    let program = parse_ok("void f() { for (; true;) { break; } }");
    let Decl::Fn(f) = &program.decls[0] else { panic!() };
    let Stmt::For(for_stmt) = &f.body.as_ref().unwrap().stmts[0] else { panic!("expected for") };
    assert!(for_stmt.init.is_none());
    assert!(for_stmt.step.is_none());
    assert!(matches!(*for_stmt.body, Stmt::Block(_)));
}

#[test]
fn method_call_with_and_without_base() {
    let program = parse_ok("void f() { this.bark(); wag(); }");
    let Decl::Fn(f) = &program.decls[0] else { panic!() };
    let body = f.body.as_ref().unwrap();

    let Stmt::Expr(e1) = &body.stmts[0] else { panic!() };
    let ExprKind::Call { base, method, .. } = &e1.kind else { panic!("expected call") };
    assert!(base.is_some());
    assert_eq!(method, "bark");

    let Stmt::Expr(e2) = &body.stmts[1] else { panic!() };
    let ExprKind::Call { base, method, .. } = &e2.kind else { panic!("expected call") };
    assert!(base.is_none());
    assert_eq!(method, "wag");
}

#[test]
fn field_access_without_call_is_field_expr() {
    let program = parse_ok("void f() { this.age; }");
    let Decl::Fn(fd) = &program.decls[0] else { panic!() };
    let Stmt::Expr(e) = &fd.body.as_ref().unwrap().stmts[0] else { panic!() };
    assert!(matches!(e.kind, ExprKind::Field { .. }));
}

#[test]
fn new_and_new_array() {
    let program = parse_ok("void f() { Dog d; d = new Dog; int[] a; a = NewArray(10, int); }");
    let Decl::Fn(fd) = &program.decls[0] else { panic!() };
    let body = fd.body.as_ref().unwrap();

    let Stmt::Expr(e0) = &body.stmts[0] else { panic!() };
    let ExprKind::Assign { rhs, .. } = &e0.kind else { panic!() };
    assert!(matches!(rhs.kind, ExprKind::New(ref n) if n == "Dog"));

    let Stmt::Expr(e1) = &body.stmts[1] else { panic!() };
    let ExprKind::Assign { rhs, .. } = &e1.kind else { panic!() };
    assert!(matches!(rhs.kind, ExprKind::NewArray { .. }));
}

#[test]
fn unary_and_binary_precedence() {
    let program = parse_ok("void f() { x = -a * b + !c; }");
    let Decl::Fn(fd) = &program.decls[0] else { panic!() };
    let Stmt::Expr(e) = &fd.body.as_ref().unwrap().stmts[0] else { panic!() };
    let ExprKind::Assign { rhs, .. } = &e.kind else { panic!() };
    // Top-level op should be '+' (lowest precedence among those present).
    let ExprKind::Compound { op, left, right } = &rhs.kind else { panic!("expected compound") };
    assert_eq!(*op, BinOp::Add);
    let left = left.as_ref().unwrap();
    assert!(matches!(left.kind, ExprKind::Compound { op: BinOp::Mul, .. }));
    assert!(matches!(right.kind, ExprKind::Compound { op: BinOp::Not, left: None, .. }));
}

#[test]
fn switch_statement_cases_and_default() {
    let program = parse_ok(
        "void f() { switch (1) { case 1: break; case 2: break; default: break; } }",
    );
    let Decl::Fn(fd) = &program.decls[0] else { panic!() };
    let Stmt::Switch(s) = &fd.body.as_ref().unwrap().stmts[0] else { panic!("expected switch") };
    assert_eq!(s.cases.len(), 2);
    assert_eq!(s.default.len(), 1);
}

#[test]
fn array_access_and_nested_index() {
    let program = parse_ok("void f() { x = a[i][j]; }");
    let Decl::Fn(fd) = &program.decls[0] else { panic!() };
    let Stmt::Expr(e) = &fd.body.as_ref().unwrap().stmts[0] else { panic!() };
    let ExprKind::Assign { rhs, .. } = &e.kind else { panic!() };
    let ExprKind::ArrayAccess { array, .. } = &rhs.kind else { panic!("expected array access") };
    assert!(matches!(array.kind, ExprKind::ArrayAccess { .. }));
}

#[test]
fn malformed_declaration_reports_parse_error_without_looping() {
    let (_program, errors) = parse("int ;");
    assert!(!errors.is_empty());
}

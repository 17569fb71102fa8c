//! End-to-end coverage: source text in, diagnostics out, through the whole
//! pipeline (`decaf_parser::parse` -> `decaf_semantic::analyze`).

use decaf_semantic::{analyze, DiagnosticKind};

fn diagnose(src: &str) -> Vec<decaf_semantic::Diagnostic> {
    let (program, parse_errors) = decaf_parser::parse(src);
    assert!(parse_errors.is_empty(), "parse errors: {parse_errors:?}");
    let (_, _, diags) = analyze(&program).expect("no internal error");
    diags
}

fn kinds(diags: &[decaf_semantic::Diagnostic]) -> Vec<DiagnosticKind> {
    diags.iter().map(|d| d.kind).collect()
}

#[test]
fn cyclic_inheritance_is_reported_exactly_once() {
    let diags = diagnose(
        "class A { } \
         class B extends A { } \
         class C extends B { } \
         class D extends A { } \
         class Q extends Q { } \
         class R extends Q { }",
    );
    let cycles: Vec<_> = diags
        .iter()
        .filter(|d| d.kind == DiagnosticKind::IllegalClassInheritanceCycle)
        .collect();
    assert_eq!(cycles.len(), 1, "{diags:?}");
    assert!(cycles[0].message.contains('Q'));
}

#[test]
fn redeclared_local_variable_is_a_conflicting_decl() {
    let diags = diagnose("void f() { int x; int x; }");
    assert_eq!(kinds(&diags), vec![DiagnosticKind::ConflictingDecl]);
}

#[test]
fn boolean_returned_where_int_expected_is_incompatible_return() {
    let diags = diagnose("int f() { return true; }");
    assert_eq!(kinds(&diags), vec![DiagnosticKind::IncompatibleReturn]);
}

#[test]
fn non_boolean_if_test_is_invalid_test() {
    let diags = diagnose("void g() { if (1) { } }");
    assert_eq!(kinds(&diags), vec![DiagnosticKind::InvalidTest]);
}

#[test]
fn interface_signature_mismatch_reports_both_diagnostics() {
    let diags = diagnose(
        "interface Greeter { string greet(); } \
         class Rude implements Greeter { void greet() { } }",
    );
    assert!(diags
        .iter()
        .any(|d| d.kind == DiagnosticKind::TypeSignature));
    assert!(diags
        .iter()
        .any(|d| d.kind == DiagnosticKind::UnimplementedInterface));
}

#[test]
fn break_outside_any_loop_is_flagged() {
    let diags = diagnose("void h() { break; }");
    assert_eq!(kinds(&diags), vec![DiagnosticKind::BreakOutsideLoop]);
}

#[test]
fn break_inside_nested_loop_and_conditional_is_fine() {
    let diags = diagnose(
        "void h() { for (;true;) { if (true) { break; } else { break; } } }",
    );
    assert!(diags.is_empty(), "{diags:?}");
}

#[test]
fn well_formed_class_hierarchy_with_fields_and_methods_is_clean() {
    let diags = diagnose(
        "class Shape { int sides; int getSides() { return sides; } } \
         class Square extends Shape { \
             void init() { sides = 4; } \
         } \
         void main() { \
             Square s; \
             s = new Square(); \
             s.init(); \
             Print(s.getSides()); \
         }",
    );
    assert!(diags.is_empty(), "{diags:?}");
}

#[test]
fn undeclared_base_class_is_flagged() {
    let diags = diagnose("class Derived extends Missing { }");
    assert_eq!(kinds(&diags), vec![DiagnosticKind::UndeclaredType]);
}

#[test]
fn argument_count_mismatch_is_a_type_error() {
    let diags = diagnose("int add(int a, int b) { return a + b; } void g() { add(1); }");
    assert_eq!(kinds(&diags), vec![DiagnosticKind::TypeError]);
}

#[test]
fn int_argument_widens_to_double_formal() {
    let diags = diagnose("double half(double x) { return x / 2.0; } void g() { half(4); }");
    assert!(diags.is_empty(), "{diags:?}");
}

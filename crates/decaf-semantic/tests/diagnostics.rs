//! Snapshot tests for Decaf diagnostic rendering.
//!
//! Each test triggers a specific diagnostic and snapshots its `Display`
//! output, which must match spec §6's bit-exact
//! `*** Error line N.` / `<longString>` / `<message>` format.

use decaf_semantic::{analyze, DiagnosticKind};

fn diagnostics_of(src: &str) -> Vec<decaf_semantic::Diagnostic> {
    let (program, parse_errors) = decaf_parser::parse(src);
    assert!(parse_errors.is_empty(), "parse errors: {parse_errors:?}");
    let (_, _, diags) = analyze(&program).expect("no internal error");
    assert!(!diags.is_empty(), "expected at least one diagnostic for: {src:?}");
    diags
}

fn first_diagnostic(src: &str) -> decaf_semantic::Diagnostic {
    diagnostics_of(src).into_iter().next().unwrap()
}

fn diagnostic_of_kind(src: &str, kind: DiagnosticKind) -> decaf_semantic::Diagnostic {
    diagnostics_of(src)
        .into_iter()
        .find(|d| d.kind == kind)
        .unwrap_or_else(|| panic!("no {kind:?} diagnostic for: {src:?}"))
}

fn render_first(src: &str) -> String {
    first_diagnostic(src).to_string()
}

#[test]
fn conflicting_decl_snapshot() {
    insta::assert_snapshot!(render_first("void f() {\n  int x;\n  int x;\n}"));
}

#[test]
fn incompatible_return_snapshot() {
    insta::assert_snapshot!(render_first("int f() {\n  return true;\n}"));
}

#[test]
fn invalid_test_snapshot() {
    insta::assert_snapshot!(render_first("void f() {\n  if (1) { }\n}"));
}

#[test]
fn break_outside_loop_snapshot() {
    insta::assert_snapshot!(render_first("void f() {\n  break;\n}"));
}

#[test]
fn undeclared_type_snapshot() {
    insta::assert_snapshot!(render_first("class C extends Missing { }"));
}

#[test]
fn cyclic_inheritance_snapshot() {
    // The self-extend edge is rejected by the scope tree's own cycle guard
    // before the class checker's name-chain walk ever runs, so a genuine
    // two-class cycle is needed to reach `IllegalClassInheritanceCycle`.
    let diag = diagnostic_of_kind(
        "class A extends B { } class B extends A { }",
        DiagnosticKind::IllegalClassInheritanceCycle,
    );
    insta::assert_snapshot!(diag.to_string());
}

#[test]
fn self_extend_is_reported_without_hanging_the_scope_tree() {
    let diag = diagnostic_of_kind(
        "class Q extends Q { }",
        DiagnosticKind::IllegalSelfReparent,
    );
    insta::assert_snapshot!(diag.to_string());
}

#[test]
fn diagnostic_round_trips_through_json() {
    let diag = first_diagnostic("void f() {\n  break;\n}");
    let encoded = serde_json::to_string(&diag).expect("diagnostic should serialize");
    let parsed: serde_json::Value =
        serde_json::from_str(&encoded).expect("encoded diagnostic should parse as JSON");
    assert_eq!(parsed["kind"], "BreakOutsideLoop");
    assert_eq!(parsed["message"], diag.message);
    assert_eq!(parsed["pos"]["line"], diag.pos.line);
}

//! End-to-end integration tests for the Decaf semantic checker.
//!
//! Each test writes a `.decaf` source file, invokes the `decafc` binary
//! against it, and asserts on its exit status, stdout, and stderr.

use std::io::Write;
use std::process::Command;

fn run_decafc(source: &str) -> std::process::Output {
    let mut f = tempfile::NamedTempFile::new().expect("failed to create temp file");
    f.write_all(source.as_bytes()).expect("failed to write source");

    Command::new(env!("CARGO_BIN_EXE_decafc"))
        .arg(f.path())
        .output()
        .expect("failed to invoke decafc")
}

#[test]
fn clean_program_exits_zero_with_no_stderr() {
    let output = run_decafc("void main() { Print(\"hello\"); }");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(output.stderr.is_empty());
}

#[test]
fn clean_program_prints_the_scope_tree_to_stdout() {
    let output = run_decafc("int x;");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Root:"));
    assert!(stdout.contains("x ==> int"));
}

#[test]
fn incompatible_return_exits_nonzero_and_reports_on_stderr() {
    let output = run_decafc("int f() { return true; }");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("*** Error line 1."));
    assert!(stderr.contains("Incompatible return"));
}

#[test]
fn cyclic_inheritance_is_reported() {
    let output = run_decafc("class A extends A { }");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Illegal cyclic class inheritance"));
}

#[test]
fn syntax_error_is_reported_without_a_panic() {
    let output = run_decafc("int f( { }");
    assert!(!output.status.success());
    assert!(!String::from_utf8_lossy(&output.stderr).is_empty());
}

#[test]
fn missing_source_file_is_a_clear_error() {
    let output = Command::new(env!("CARGO_BIN_EXE_decafc"))
        .arg("/nonexistent/path/does/not/exist.decaf")
        .output()
        .expect("failed to invoke decafc");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to read"));
}

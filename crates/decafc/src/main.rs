//! The Decaf semantic checker CLI.
//!
//! Provides the `decafc` command: read a single Decaf source file, run it
//! through the parser and the semantic analysis pipeline, print every
//! diagnostic to stderr, and print the resulting scope tree to stdout.

use std::path::PathBuf;
use std::process;

use clap::Parser;

#[derive(Parser)]
#[command(name = "decafc", version, about = "The Decaf semantic checker")]
struct Cli {
    /// Path to a Decaf source file
    source: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    match run(&cli.source) {
        Ok(clean) => {
            if !clean {
                process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Read `path`, parse it, and run semantic analysis. Returns `Ok(true)` if
/// no diagnostics were produced, `Ok(false)` if diagnostics were printed
/// (but the pipeline itself ran to completion), `Err` only for I/O failure
/// or an internal invariant violation (spec §4.7).
fn run(path: &std::path::Path) -> Result<bool, String> {
    let source = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read '{}': {e}", path.display()))?;

    let (program, parse_errors) = decaf_parser::parse(&source);
    let mut clean = parse_errors.is_empty();
    for err in &parse_errors {
        print_positioned(err.pos.line, &err.pos.long_string, &err.message);
    }

    let (arena, root, diags) = decaf_semantic::analyze(&program)
        .map_err(|e| format!("internal error at line {}: {}", e.pos.line, e.message))?;
    clean = clean && diags.is_empty();
    for diag in &diags {
        eprintln!("{diag}");
    }

    println!("{}", arena.pretty_print(root));

    Ok(clean)
}

fn print_positioned(line: u32, long_string: &str, message: &str) {
    eprintln!("*** Error line {line}.");
    if !long_string.is_empty() {
        eprintln!("{long_string}");
    }
    eprintln!("{message}");
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_source(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().expect("tempfile");
        f.write_all(contents.as_bytes()).expect("write");
        f
    }

    #[test]
    fn clean_program_yields_no_diagnostics() {
        let f = write_source("void main() { Print(\"hi\"); }");
        assert!(run(f.path()).expect("run succeeds"));
    }

    #[test]
    fn semantic_error_is_reported_and_not_clean() {
        let f = write_source("int f() { return true; }");
        assert!(!run(f.path()).expect("run succeeds"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = run(std::path::Path::new("/nonexistent/path/does/not/exist.decaf"));
        assert!(result.is_err());
    }
}

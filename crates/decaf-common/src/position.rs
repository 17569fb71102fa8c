use serde::Serialize;

use crate::span::{LineIndex, Span};

/// Source location carried by every AST node: a 1-based line/column plus a
/// ready-to-print excerpt of the source line with a caret under the column.
///
/// `long_string` is computed once, at parse time, rather than lazily from a
/// `Span` — later passes (C5–C8) need to print it verbatim into diagnostics
/// without holding onto the original source text or a `LineIndex`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
    pub long_string: String,
}

impl Position {
    /// Build a `Position` from a byte span, the source text, and a
    /// pre-built `LineIndex`. Consecutive blank lines in the excerpt are
    /// collapsed to a single blank line, per the diagnostic-formatting rule.
    pub fn from_span(span: Span, source: &str, index: &LineIndex) -> Self {
        let (line, column) = index.line_col(span.start);
        let text = index.line_text(source, span.start);
        let long_string = render_long_string(text, column);
        Position {
            line,
            column,
            long_string,
        }
    }

    /// A synthetic position for diagnostics with no real source location
    /// (used only for internal-invariant aborts, never for user diagnostics).
    pub fn synthetic() -> Self {
        Position {
            line: 0,
            column: 0,
            long_string: String::new(),
        }
    }
}

/// Render a source line followed by a caret line pointing at `column`
/// (1-based). Collapses runs of blank lines in `line` to nothing extra,
/// since a blank source line carries no useful caret position.
fn render_long_string(line: &str, column: u32) -> String {
    if line.trim().is_empty() {
        return String::new();
    }
    let caret_col = column.saturating_sub(1) as usize;
    let mut caret = " ".repeat(caret_col);
    caret.push('^');
    format!("{line}\n{caret}")
}

use decaf_common::Span;

/// A lexical error, tagged with the span where it occurred.
///
/// Matches the accumulate-don't-throw posture the rest of the front end
/// uses: the lexer keeps producing tokens after an error (an unterminated
/// string/comment resolves by taking the rest of the line and resuming),
/// and the caller collects every `LexError` alongside the token stream.
#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LexErrorKind {
    UnterminatedString,
    UnterminatedComment,
    InvalidDouble(String),
    UnrecognizedChar(char),
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            LexErrorKind::UnterminatedString => write!(f, "unterminated string constant"),
            LexErrorKind::UnterminatedComment => write!(f, "unterminated comment"),
            LexErrorKind::InvalidDouble(text) => write!(f, "invalid double constant: {text}"),
            LexErrorKind::UnrecognizedChar(c) => write!(f, "unrecognized character '{c}'"),
        }
    }
}

impl std::error::Error for LexError {}

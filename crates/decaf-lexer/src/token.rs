use decaf_common::Span;
use serde::Serialize;

/// A single lexical token: its kind, its span, and (for literals and
/// identifiers) the slice of source text it covers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span, text: impl Into<String>) -> Self {
        Token { kind, span, text: text.into() }
    }
}

/// Every token kind the Decaf lexer produces.
///
/// Identifiers are truncated to 31 bytes before this point (§1: "lexing
/// ... truncates identifiers to 31 characters" is the lexer's job, not the
/// parser's or the semantic core's).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TokenKind {
    // Literals
    IntConst(i64),
    DoubleConst(f64),
    BoolConst(bool),
    StringConst(String),
    Identifier,

    // Keywords
    Void,
    Int,
    Double,
    Bool,
    String,
    Null,
    Class,
    Extends,
    This,
    Interface,
    Implements,
    While,
    For,
    If,
    Else,
    Return,
    Break,
    New,
    NewArray,
    Print,
    ReadInteger,
    ReadLine,
    Switch,
    Case,
    Default,

    // Punctuation / operators
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semicolon,
    Colon,
    Comma,
    Dot,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Assign,
    Lt,
    Le,
    Gt,
    Ge,
    EqEq,
    NotEq,
    AndAnd,
    OrOr,
    Not,

    Eof,
}

/// Map a lexed identifier-shaped word to a keyword token, if it is one.
pub fn keyword_from_str(word: &str) -> Option<TokenKind> {
    Some(match word {
        "void" => TokenKind::Void,
        "int" => TokenKind::Int,
        "double" => TokenKind::Double,
        "bool" => TokenKind::Bool,
        "string" => TokenKind::String,
        "null" => TokenKind::Null,
        "class" => TokenKind::Class,
        "extends" => TokenKind::Extends,
        "this" => TokenKind::This,
        "interface" => TokenKind::Interface,
        "implements" => TokenKind::Implements,
        "while" => TokenKind::While,
        "for" => TokenKind::For,
        "if" => TokenKind::If,
        "else" => TokenKind::Else,
        "return" => TokenKind::Return,
        "break" => TokenKind::Break,
        "new" => TokenKind::New,
        "NewArray" => TokenKind::NewArray,
        "Print" => TokenKind::Print,
        "ReadInteger" => TokenKind::ReadInteger,
        "ReadLine" => TokenKind::ReadLine,
        "switch" => TokenKind::Switch,
        "case" => TokenKind::Case,
        "default" => TokenKind::Default,
        "true" => TokenKind::BoolConst(true),
        "false" => TokenKind::BoolConst(false),
        _ => return None,
    })
}

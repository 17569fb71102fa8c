//! Tokenizer for Decaf: identifiers, keywords, int/hex/double/string/bool
//! literals, operators, and line/block comments.
//!
//! The lexer is a thin tokenizer, per spec: it has no knowledge of scopes,
//! declarations, or types. It accumulates [`LexError`]s rather than
//! aborting on the first malformed construct, so the driver can still
//! report every lexical problem in a file in one pass.

mod cursor;
pub mod error;
pub mod token;

use cursor::Cursor;
use decaf_common::Span;

pub use error::{LexError, LexErrorKind};
pub use token::{keyword_from_str, Token, TokenKind};

/// Maximum identifier length, in bytes, per spec §1: "Identifiers are
/// truncated to 31 characters."
pub const MAX_IDENTIFIER_LEN: usize = 31;

pub struct Lexer<'src> {
    cursor: Cursor<'src>,
    errors: Vec<LexError>,
    emitted_eof: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            cursor: Cursor::new(source),
            errors: Vec::new(),
            emitted_eof: false,
        }
    }

    /// Tokenize the whole source, returning the token stream (always ending
    /// in `Eof`) and any lexical errors accumulated along the way.
    pub fn tokenize(source: &str) -> (Vec<Token>, Vec<LexError>) {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.by_ref().collect();
        (tokens, lexer.errors)
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.cursor.peek() {
                Some(c) if c.is_whitespace() => {
                    self.cursor.advance();
                }
                Some('/') if self.cursor.peek_next() == Some('/') => {
                    self.cursor.eat_while(|c| c != '\n');
                }
                Some('/') if self.cursor.peek_next() == Some('*') => {
                    let start = self.cursor.pos();
                    self.cursor.advance();
                    self.cursor.advance();
                    let mut closed = false;
                    while let Some(c) = self.cursor.peek() {
                        if c == '*' && self.cursor.peek_next() == Some('/') {
                            self.cursor.advance();
                            self.cursor.advance();
                            closed = true;
                            break;
                        }
                        self.cursor.advance();
                    }
                    if !closed {
                        self.errors.push(LexError {
                            kind: LexErrorKind::UnterminatedComment,
                            span: Span::new(start, self.cursor.pos()),
                        });
                    }
                }
                _ => break,
            }
        }
    }

    fn lex_identifier_or_keyword(&mut self, start: u32) -> Token {
        self.cursor.eat_while(|c| c.is_alphanumeric() || c == '_');
        let end = self.cursor.pos();
        let full = self.cursor.slice(start, end);
        if let Some(kind) = keyword_from_str(full) {
            return Token::new(kind, Span::new(start, end), full);
        }
        let truncated_len = floor_char_boundary(full, MAX_IDENTIFIER_LEN.min(full.len()));
        let text = &full[..truncated_len];
        Token::new(TokenKind::Identifier, Span::new(start, end), text)
    }

    fn lex_number(&mut self, start: u32) -> Token {
        if self.cursor.peek() == Some('0')
            && matches!(self.cursor.peek_next(), Some('x') | Some('X'))
        {
            self.cursor.advance();
            self.cursor.advance();
            self.cursor.eat_while(|c| c.is_ascii_hexdigit());
            let end = self.cursor.pos();
            let text = self.cursor.slice(start, end);
            let value = i64::from_str_radix(&text[2..], 16).unwrap_or(0);
            return Token::new(TokenKind::IntConst(value), Span::new(start, end), text);
        }

        self.cursor.eat_while(|c| c.is_ascii_digit());
        let mut is_double = false;

        if self.cursor.peek() == Some('.') {
            is_double = true;
            self.cursor.advance();
            self.cursor.eat_while(|c| c.is_ascii_digit());
        }

        if matches!(self.cursor.peek(), Some('e') | Some('E')) {
            let mut lookahead = self.cursor.clone();
            lookahead.advance();
            if matches!(lookahead.peek(), Some('+') | Some('-')) {
                lookahead.advance();
            }
            if matches!(lookahead.peek(), Some(c) if c.is_ascii_digit()) {
                is_double = true;
                self.cursor.advance();
                if matches!(self.cursor.peek(), Some('+') | Some('-')) {
                    self.cursor.advance();
                }
                self.cursor.eat_while(|c| c.is_ascii_digit());
            }
        }

        let end = self.cursor.pos();
        let text = self.cursor.slice(start, end);
        if is_double {
            match text.parse::<f64>() {
                Ok(value) => Token::new(TokenKind::DoubleConst(value), Span::new(start, end), text),
                Err(_) => {
                    self.errors.push(LexError {
                        kind: LexErrorKind::InvalidDouble(text.to_string()),
                        span: Span::new(start, end),
                    });
                    Token::new(TokenKind::DoubleConst(0.0), Span::new(start, end), text)
                }
            }
        } else {
            let value = text.parse::<i64>().unwrap_or(0);
            Token::new(TokenKind::IntConst(value), Span::new(start, end), text)
        }
    }

    fn lex_string(&mut self, start: u32, quote: char) -> Token {
        self.cursor.advance(); // opening quote
        let content_start = self.cursor.pos();
        loop {
            match self.cursor.peek() {
                None => {
                    let end = self.cursor.pos();
                    self.errors.push(LexError {
                        kind: LexErrorKind::UnterminatedString,
                        span: Span::new(start, end),
                    });
                    let text = self.cursor.slice(content_start, end);
                    return Token::new(TokenKind::StringConst(text.to_string()), Span::new(start, end), text);
                }
                Some('\n') => {
                    let end = self.cursor.pos();
                    self.errors.push(LexError {
                        kind: LexErrorKind::UnterminatedString,
                        span: Span::new(start, end),
                    });
                    let text = self.cursor.slice(content_start, end);
                    return Token::new(TokenKind::StringConst(text.to_string()), Span::new(start, end), text);
                }
                Some(c) if c == quote => {
                    let content_end = self.cursor.pos();
                    self.cursor.advance(); // closing quote
                    let end = self.cursor.pos();
                    let content = self.cursor.slice(content_start, content_end);
                    return Token::new(
                        TokenKind::StringConst(content.to_string()),
                        Span::new(start, end),
                        self.cursor.slice(start, end),
                    );
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
    }

    fn single(&mut self, kind: TokenKind, start: u32) -> Token {
        let text = self.cursor.slice(start, start + 1);
        self.cursor.advance();
        Token::new(kind, Span::new(start, start + 1), text)
    }

    fn produce(&mut self) -> Token {
        self.skip_whitespace_and_comments();
        let start = self.cursor.pos();
        let Some(c) = self.cursor.peek() else {
            return Token::new(TokenKind::Eof, Span::new(start, start), "");
        };

        match c {
            '0'..='9' => self.lex_number(start),
            c if c.is_alphabetic() || c == '_' => self.lex_identifier_or_keyword(start),
            '\'' | '"' => self.lex_string(start, c),

            '(' => self.single(TokenKind::LParen, start),
            ')' => self.single(TokenKind::RParen, start),
            '{' => self.single(TokenKind::LBrace, start),
            '}' => self.single(TokenKind::RBrace, start),
            '[' => self.single(TokenKind::LBracket, start),
            ']' => self.single(TokenKind::RBracket, start),
            ';' => self.single(TokenKind::Semicolon, start),
            ':' => self.single(TokenKind::Colon, start),
            ',' => self.single(TokenKind::Comma, start),
            '.' => self.single(TokenKind::Dot, start),
            '+' => self.single(TokenKind::Plus, start),
            '-' => self.single(TokenKind::Minus, start),
            '*' => self.single(TokenKind::Star, start),
            '/' => self.single(TokenKind::Slash, start),
            '%' => self.single(TokenKind::Percent, start),

            '=' => {
                if self.cursor.peek_next() == Some('=') {
                    self.cursor.advance();
                    self.cursor.advance();
                    Token::new(TokenKind::EqEq, Span::new(start, start + 2), "==")
                } else {
                    self.single(TokenKind::Assign, start)
                }
            }
            '!' => {
                if self.cursor.peek_next() == Some('=') {
                    self.cursor.advance();
                    self.cursor.advance();
                    Token::new(TokenKind::NotEq, Span::new(start, start + 2), "!=")
                } else {
                    self.single(TokenKind::Not, start)
                }
            }
            '<' => {
                if self.cursor.peek_next() == Some('=') {
                    self.cursor.advance();
                    self.cursor.advance();
                    Token::new(TokenKind::Le, Span::new(start, start + 2), "<=")
                } else {
                    self.single(TokenKind::Lt, start)
                }
            }
            '>' => {
                if self.cursor.peek_next() == Some('=') {
                    self.cursor.advance();
                    self.cursor.advance();
                    Token::new(TokenKind::Ge, Span::new(start, start + 2), ">=")
                } else {
                    self.single(TokenKind::Gt, start)
                }
            }
            '&' if self.cursor.peek_next() == Some('&') => {
                self.cursor.advance();
                self.cursor.advance();
                Token::new(TokenKind::AndAnd, Span::new(start, start + 2), "&&")
            }
            '|' if self.cursor.peek_next() == Some('|') => {
                self.cursor.advance();
                self.cursor.advance();
                Token::new(TokenKind::OrOr, Span::new(start, start + 2), "||")
            }
            other => {
                self.cursor.advance();
                self.errors.push(LexError {
                    kind: LexErrorKind::UnrecognizedChar(other),
                    span: Span::new(start, self.cursor.pos()),
                });
                self.produce()
            }
        }
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.emitted_eof {
            return None;
        }
        let token = self.produce();
        if token.kind == TokenKind::Eof {
            self.emitted_eof = true;
        }
        Some(token)
    }
}

/// Round a byte index down to the nearest char boundary in `s`, so a
/// truncated identifier never splits a multi-byte UTF-8 sequence.
fn floor_char_boundary(s: &str, mut idx: usize) -> usize {
    if idx >= s.len() {
        return s.len();
    }
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

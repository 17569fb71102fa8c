//! Recursive-descent parser for Decaf.
//!
//! The parser consumes the token stream from `decaf-lexer` and builds the
//! closed tagged-union AST in [`crate::ast`] directly -- no intermediate
//! CST, per spec §9's design note. Declaration/statement parsing lives in
//! [`items`]; expression parsing (precedence climbing) lives in
//! [`expressions`].

pub(crate) mod expressions;
pub(crate) mod items;

use decaf_common::{LineIndex, NodeId, NodeIdGen, Position, Span};
use decaf_lexer::{LexError, Lexer, Token, TokenKind};

use crate::ast::Program;
use crate::error::ParseError;

pub struct Parser<'src> {
    source: &'src str,
    tokens: Vec<Token>,
    pos: usize,
    line_index: LineIndex,
    ids: NodeIdGen,
    errors: Vec<ParseError>,
}

/// Parse a complete Decaf source file, returning the AST plus every
/// lexical and syntactic diagnostic collected along the way.
pub fn parse(source: &str) -> (Program, Vec<ParseError>) {
    let (tokens, lex_errors) = Lexer::tokenize(source);
    let line_index = LineIndex::new(source);
    let errors = lex_errors
        .iter()
        .map(|e| lex_error_to_parse_error(e, source, &line_index))
        .collect();
    let mut parser = Parser {
        source,
        tokens,
        pos: 0,
        line_index,
        ids: NodeIdGen::new(),
        errors,
    };
    let program = parser.parse_program();
    (program, parser.errors)
}

fn lex_error_to_parse_error(err: &LexError, source: &str, index: &LineIndex) -> ParseError {
    ParseError::new(err.to_string(), Position::from_span(err.span, source, index))
}

impl<'src> Parser<'src> {
    pub(crate) fn next_id(&mut self) -> NodeId {
        self.ids.next_id()
    }

    pub(crate) fn pos_at(&self, span: Span) -> Position {
        Position::from_span(span, self.source, &self.line_index)
    }

    pub(crate) fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    pub(crate) fn current_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    pub(crate) fn current_pos(&self) -> Position {
        self.pos_at(self.current().span)
    }

    pub(crate) fn is_eof(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    pub(crate) fn at(&self, kind: &TokenKind) -> bool {
        same_kind(self.current_kind(), kind)
    }

    pub(crate) fn peek_token(&self, offset: usize) -> &Token {
        let idx = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[idx]
    }

    pub(crate) fn bump(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    /// Consume the current token if it matches `kind` and report whether it
    /// did; used for optional clauses (`extends`, trailing `,` in a list).
    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(&kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consume the current token if it matches `kind`; otherwise record a
    /// `ParseError` and do not advance (panic-mode recovery happens at the
    /// call sites that know how to resynchronize, e.g. skipping to `;`).
    pub(crate) fn expect(&mut self, kind: TokenKind, what: &str) -> Token {
        if self.at(&kind) {
            self.bump()
        } else {
            let pos = self.current_pos();
            self.error(format!("expected {what}"), pos);
            self.current().clone()
        }
    }

    pub(crate) fn expect_identifier(&mut self) -> (String, Position) {
        if matches!(self.current_kind(), TokenKind::Identifier) {
            let tok = self.bump();
            (tok.text, self.pos_at(tok.span))
        } else {
            let pos = self.current_pos();
            self.error("expected identifier".to_string(), pos.clone());
            (String::new(), pos)
        }
    }

    pub(crate) fn error(&mut self, message: String, pos: Position) {
        self.errors.push(ParseError::new(message, pos));
    }

    /// Skip tokens until a synchronization point (`;`, `}`, or EOF) so one
    /// malformed declaration/statement does not cascade into unrelated
    /// errors for everything after it.
    pub(crate) fn synchronize(&mut self) {
        loop {
            match self.current_kind() {
                TokenKind::Eof => return,
                TokenKind::Semicolon => {
                    self.bump();
                    return;
                }
                TokenKind::RBrace => return,
                _ => {
                    self.bump();
                }
            }
        }
    }
}

/// Compare token kinds ignoring literal payloads (so `at(&IntConst(0))`
/// matches any int literal, `at(&Identifier)` matches any identifier, etc).
fn same_kind(a: &TokenKind, b: &TokenKind) -> bool {
    std::mem::discriminant(a) == std::mem::discriminant(b)
}

//! Expression parsing: precedence climbing over Decaf's operator grammar.
//!
//! From lowest to highest precedence:
//!
//! ```text
//! assign  -> or ('=' assign)?                (right-assoc)
//! or      -> and ('||' and)*
//! and     -> equality ('&&' equality)*
//! equality   -> relational (('==' | '!=') relational)*
//! relational -> additive (('<' | '<=' | '>' | '>=') additive)*
//! additive   -> multiplicative (('+' | '-') multiplicative)*
//! multiplicative -> unary (('*' | '/' | '%') unary)*
//! unary   -> ('-' | '!') unary | postfix
//! postfix -> primary ('.' ident ('(' args ')')? | '[' expr ']')*
//! ```
//!
//! A bare `.` access on an identifier (`a.b`) becomes `Field`; a `.` access
//! immediately followed by `(` (`a.b(...)`) becomes a `Call` with `base =
//! Some(a)`. A call with no base (`b(...)`) is a `Call` with `base = None`.

use decaf_common::Position;
use decaf_lexer::TokenKind;

use crate::ast::{BinOp, Expr, ExprKind};

use super::Parser;

impl<'src> Parser<'src> {
    pub(crate) fn parse_expr(&mut self) -> Expr {
        self.parse_assign()
    }

    fn parse_assign(&mut self) -> Expr {
        let pos = self.current_pos();
        let left = self.parse_or();
        if self.at(&TokenKind::Assign) {
            self.bump();
            let right = self.parse_assign();
            Expr {
                id: self.next_id(),
                pos,
                kind: ExprKind::Assign {
                    lhs: Box::new(left),
                    rhs: Box::new(right),
                },
            }
        } else {
            left
        }
    }

    fn parse_or(&mut self) -> Expr {
        let pos = self.current_pos();
        let mut left = self.parse_and();
        while self.at(&TokenKind::OrOr) {
            self.bump();
            let right = self.parse_and();
            left = binop(self.next_id(), pos.clone(), BinOp::Or, Some(left), right);
        }
        left
    }

    fn parse_and(&mut self) -> Expr {
        let pos = self.current_pos();
        let mut left = self.parse_equality();
        while self.at(&TokenKind::AndAnd) {
            self.bump();
            let right = self.parse_equality();
            left = binop(self.next_id(), pos.clone(), BinOp::And, Some(left), right);
        }
        left
    }

    fn parse_equality(&mut self) -> Expr {
        let pos = self.current_pos();
        let mut left = self.parse_relational();
        loop {
            let op = if self.at(&TokenKind::EqEq) {
                BinOp::Eq
            } else if self.at(&TokenKind::NotEq) {
                BinOp::Ne
            } else {
                break;
            };
            self.bump();
            let right = self.parse_relational();
            left = binop(self.next_id(), pos.clone(), op, Some(left), right);
        }
        left
    }

    fn parse_relational(&mut self) -> Expr {
        let pos = self.current_pos();
        let mut left = self.parse_additive();
        loop {
            let op = match self.current_kind() {
                TokenKind::Lt => BinOp::Lt,
                TokenKind::Le => BinOp::Le,
                TokenKind::Gt => BinOp::Gt,
                TokenKind::Ge => BinOp::Ge,
                _ => break,
            };
            self.bump();
            let right = self.parse_additive();
            left = binop(self.next_id(), pos.clone(), op, Some(left), right);
        }
        left
    }

    fn parse_additive(&mut self) -> Expr {
        let pos = self.current_pos();
        let mut left = self.parse_multiplicative();
        loop {
            let op = match self.current_kind() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.bump();
            let right = self.parse_multiplicative();
            left = binop(self.next_id(), pos.clone(), op, Some(left), right);
        }
        left
    }

    fn parse_multiplicative(&mut self) -> Expr {
        let pos = self.current_pos();
        let mut left = self.parse_unary();
        loop {
            let op = match self.current_kind() {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                TokenKind::Percent => BinOp::Mod,
                _ => break,
            };
            self.bump();
            let right = self.parse_unary();
            left = binop(self.next_id(), pos.clone(), op, Some(left), right);
        }
        left
    }

    fn parse_unary(&mut self) -> Expr {
        let pos = self.current_pos();
        match self.current_kind() {
            TokenKind::Minus => {
                self.bump();
                let operand = self.parse_unary();
                binop(self.next_id(), pos, BinOp::Neg, None, operand)
            }
            TokenKind::Not => {
                self.bump();
                let operand = self.parse_unary();
                binop(self.next_id(), pos, BinOp::Not, None, operand)
            }
            _ => self.parse_postfix(),
        }
    }

    fn parse_postfix(&mut self) -> Expr {
        let mut expr = self.parse_primary();
        loop {
            match self.current_kind() {
                TokenKind::Dot => {
                    self.bump();
                    let (name, name_pos) = self.expect_identifier();
                    if self.at(&TokenKind::LParen) {
                        let args = self.parse_call_args();
                        expr = Expr {
                            id: self.next_id(),
                            pos: expr.pos.clone(),
                            kind: ExprKind::Call {
                                base: Some(Box::new(expr)),
                                method: name,
                                method_pos: name_pos,
                                args,
                            },
                        };
                    } else {
                        expr = Expr {
                            id: self.next_id(),
                            pos: expr.pos.clone(),
                            kind: ExprKind::Field {
                                base: Box::new(expr),
                                field: name,
                                field_pos: name_pos,
                            },
                        };
                    }
                }
                TokenKind::LBracket => {
                    self.bump();
                    let index = self.parse_expr();
                    self.expect(TokenKind::RBracket, "']' to close array index");
                    expr = Expr {
                        id: self.next_id(),
                        pos: expr.pos.clone(),
                        kind: ExprKind::ArrayAccess {
                            array: Box::new(expr),
                            index: Box::new(index),
                        },
                    };
                }
                _ => break,
            }
        }
        expr
    }

    fn parse_call_args(&mut self) -> Vec<Expr> {
        self.expect(TokenKind::LParen, "'('");
        let mut args = Vec::new();
        if !self.at(&TokenKind::RParen) {
            args.push(self.parse_expr());
            while self.eat(TokenKind::Comma) {
                args.push(self.parse_expr());
            }
        }
        self.expect(TokenKind::RParen, "')'");
        args
    }

    fn parse_primary(&mut self) -> Expr {
        let pos = self.current_pos();
        match self.current_kind().clone() {
            TokenKind::IntConst(v) => {
                self.bump();
                Expr { id: self.next_id(), pos, kind: ExprKind::IntLit(v) }
            }
            TokenKind::DoubleConst(v) => {
                self.bump();
                Expr { id: self.next_id(), pos, kind: ExprKind::DoubleLit(v) }
            }
            TokenKind::BoolConst(v) => {
                self.bump();
                Expr { id: self.next_id(), pos, kind: ExprKind::BoolLit(v) }
            }
            TokenKind::StringConst(v) => {
                self.bump();
                Expr { id: self.next_id(), pos, kind: ExprKind::StringLit(v) }
            }
            TokenKind::Null => {
                self.bump();
                Expr { id: self.next_id(), pos, kind: ExprKind::NullLit }
            }
            TokenKind::This => {
                self.bump();
                Expr { id: self.next_id(), pos, kind: ExprKind::This }
            }
            TokenKind::ReadInteger => {
                self.bump();
                self.expect(TokenKind::LParen, "'(' after ReadInteger");
                self.expect(TokenKind::RParen, "')' after ReadInteger(");
                Expr { id: self.next_id(), pos, kind: ExprKind::ReadInteger }
            }
            TokenKind::ReadLine => {
                self.bump();
                self.expect(TokenKind::LParen, "'(' after ReadLine");
                self.expect(TokenKind::RParen, "')' after ReadLine(");
                Expr { id: self.next_id(), pos, kind: ExprKind::ReadLine }
            }
            TokenKind::New => {
                self.bump();
                let (name, _) = self.expect_identifier();
                Expr { id: self.next_id(), pos, kind: ExprKind::New(name) }
            }
            TokenKind::NewArray => {
                self.bump();
                self.expect(TokenKind::LParen, "'(' after NewArray");
                let size = self.parse_expr();
                self.expect(TokenKind::Comma, "',' between NewArray size and type");
                let elem_type = self.parse_type();
                self.expect(TokenKind::RParen, "')' after NewArray type");
                Expr {
                    id: self.next_id(),
                    pos,
                    kind: ExprKind::NewArray {
                        size: Box::new(size),
                        elem_type: Box::new(elem_type),
                    },
                }
            }
            TokenKind::LParen => {
                self.bump();
                let inner = self.parse_expr();
                self.expect(TokenKind::RParen, "')' to close parenthesized expression");
                inner
            }
            TokenKind::Identifier => {
                let tok = self.bump();
                if self.at(&TokenKind::LParen) {
                    let args = self.parse_call_args();
                    Expr {
                        id: self.next_id(),
                        pos: pos.clone(),
                        kind: ExprKind::Call {
                            base: None,
                            method: tok.text,
                            method_pos: pos,
                            args,
                        },
                    }
                } else {
                    Expr { id: self.next_id(), pos, kind: ExprKind::Ident(tok.text) }
                }
            }
            _ => {
                self.error("expected an expression".to_string(), pos.clone());
                // Do not consume; let the caller's synchronization point
                // (a `;` or `}`) recover. Produce a placeholder node so the
                // rest of the tree still has something to decorate/check.
                Expr { id: self.next_id(), pos, kind: ExprKind::NullLit }
            }
        }
    }
}

fn binop(id: decaf_common::NodeId, pos: Position, op: BinOp, left: Option<Expr>, right: Expr) -> Expr {
    Expr {
        id,
        pos,
        kind: ExprKind::Compound {
            op,
            left: left.map(Box::new),
            right: Box::new(right),
        },
    }
}

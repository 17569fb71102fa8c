//! Declaration, type, and statement parsers for Decaf.
//!
//! Grammar (informally, matching spec §3's node shapes):
//!
//! ```text
//! Program    -> Decl*
//! Decl       -> VariableDecl | FunctionDecl | ClassDecl | InterfaceDecl
//! ClassDecl  -> class ident (extends ident)? (implements ident+,)? { Field* }
//! Field      -> VariableDecl | FunctionDecl
//! Interface  -> interface ident { Prototype* }
//! Prototype  -> Type ident ( Formals ) ;
//! FunctionDecl -> Type ident ( Formals ) StmtBlock
//! StmtBlock  -> { VariableDecl* Stmt* }
//! ```
//!
//! A variable declaration and an expression statement both can start with an
//! identifier (`Foo x;` vs `foo();`), so [`looks_like_var_decl`] peeks one
//! token ahead to disambiguate, the same trick the formals/body parsers use
//! to decide where declarations end and statements begin inside a block.

use decaf_lexer::TokenKind;

use crate::ast::{
    BreakStmt, CaseStmt, ClassDecl, Decl, FnDecl, ForStmt, IfStmt, InterfaceDecl, Member,
    NamedTypeRef, PrintStmt, Program, ReturnStmt, Stmt, StmtBlock, SwitchStmt, TypeKind, TypeNode,
    VarDecl, WhileStmt,
};

use super::Parser;

impl<'src> Parser<'src> {
    pub(crate) fn parse_program(&mut self) -> Program {
        let mut decls = Vec::new();
        while !self.is_eof() {
            let before = self.pos;
            decls.push(self.parse_top_level_decl());
            if self.pos == before {
                // No progress was made (malformed input); force advancement
                // so a single bad token cannot loop forever.
                self.bump();
            }
        }
        Program { decls }
    }

    fn parse_top_level_decl(&mut self) -> Decl {
        match self.current_kind() {
            TokenKind::Class => Decl::Class(self.parse_class_decl()),
            TokenKind::Interface => Decl::Interface(self.parse_interface_decl()),
            _ => self.parse_var_or_fn_decl(),
        }
    }

    /// `Type ident ;` or `Type ident ( Formals ) StmtBlock`.
    fn parse_var_or_fn_decl(&mut self) -> Decl {
        let ty = self.parse_type();
        let (name, name_pos) = self.expect_identifier();
        if self.at(&TokenKind::LParen) {
            let formals = self.parse_formals();
            let body = if self.at(&TokenKind::LBrace) {
                Some(self.parse_stmt_block())
            } else {
                self.expect(TokenKind::Semicolon, "';' after function prototype");
                None
            };
            Decl::Fn(FnDecl {
                id: self.next_id(),
                pos: name_pos.clone(),
                name,
                name_pos,
                return_type: ty,
                formals,
                body,
            })
        } else {
            self.expect(TokenKind::Semicolon, "';' after variable declaration");
            Decl::Var(VarDecl {
                id: self.next_id(),
                pos: name_pos.clone(),
                name,
                name_pos,
                ty,
            })
        }
    }

    fn parse_var_decl_unterminated(&mut self) -> VarDecl {
        let ty = self.parse_type();
        let (name, name_pos) = self.expect_identifier();
        VarDecl {
            id: self.next_id(),
            pos: name_pos.clone(),
            name,
            name_pos,
            ty,
        }
    }

    fn parse_formals(&mut self) -> Vec<VarDecl> {
        self.expect(TokenKind::LParen, "'('");
        let mut formals = Vec::new();
        if !self.at(&TokenKind::RParen) {
            formals.push(self.parse_var_decl_unterminated());
            while self.eat(TokenKind::Comma) {
                formals.push(self.parse_var_decl_unterminated());
            }
        }
        self.expect(TokenKind::RParen, "')'");
        formals
    }

    fn parse_class_decl(&mut self) -> ClassDecl {
        self.bump(); // 'class'
        let (name, name_pos) = self.expect_identifier();

        let extends = if self.eat(TokenKind::Extends) {
            let (base, base_pos) = self.expect_identifier();
            Some(NamedTypeRef { name: base, pos: base_pos })
        } else {
            None
        };

        let mut implements = Vec::new();
        if self.eat(TokenKind::Implements) {
            let (iface, iface_pos) = self.expect_identifier();
            implements.push(NamedTypeRef { name: iface, pos: iface_pos });
            while self.eat(TokenKind::Comma) {
                let (iface, iface_pos) = self.expect_identifier();
                implements.push(NamedTypeRef { name: iface, pos: iface_pos });
            }
        }

        self.expect(TokenKind::LBrace, "'{' to open class body");
        let mut members = Vec::new();
        while !self.at(&TokenKind::RBrace) && !self.is_eof() {
            let before = self.pos;
            members.push(self.parse_member());
            if self.pos == before {
                self.bump();
            }
        }
        self.expect(TokenKind::RBrace, "'}' to close class body");

        ClassDecl {
            id: self.next_id(),
            pos: name_pos.clone(),
            name,
            name_pos,
            extends,
            implements,
            members,
        }
    }

    fn parse_member(&mut self) -> Member {
        let ty = self.parse_type();
        let (name, name_pos) = self.expect_identifier();
        if self.at(&TokenKind::LParen) {
            let formals = self.parse_formals();
            let body = if self.at(&TokenKind::LBrace) {
                Some(self.parse_stmt_block())
            } else {
                self.expect(TokenKind::Semicolon, "';' after method prototype");
                None
            };
            Member::Fn(FnDecl {
                id: self.next_id(),
                pos: name_pos.clone(),
                name,
                name_pos,
                return_type: ty,
                formals,
                body,
            })
        } else {
            self.expect(TokenKind::Semicolon, "';' after field declaration");
            Member::Var(VarDecl {
                id: self.next_id(),
                pos: name_pos.clone(),
                name,
                name_pos,
                ty,
            })
        }
    }

    fn parse_interface_decl(&mut self) -> InterfaceDecl {
        self.bump(); // 'interface'
        let (name, name_pos) = self.expect_identifier();
        self.expect(TokenKind::LBrace, "'{' to open interface body");

        let mut members = Vec::new();
        while !self.at(&TokenKind::RBrace) && !self.is_eof() {
            let before = self.pos;
            let ty = self.parse_type();
            let (m_name, m_name_pos) = self.expect_identifier();
            let formals = self.parse_formals();
            self.expect(TokenKind::Semicolon, "';' after interface method prototype");
            members.push(FnDecl {
                id: self.next_id(),
                pos: m_name_pos.clone(),
                name: m_name,
                name_pos: m_name_pos,
                return_type: ty,
                formals,
                body: None,
            });
            if self.pos == before {
                self.bump();
            }
        }
        self.expect(TokenKind::RBrace, "'}' to close interface body");

        InterfaceDecl {
            id: self.next_id(),
            pos: name_pos.clone(),
            name,
            name_pos,
            members,
        }
    }

    // ── Types ────────────────────────────────────────────────────────────

    pub(crate) fn parse_type(&mut self) -> TypeNode {
        let pos = self.current_pos();
        let kind = match self.current_kind() {
            TokenKind::Void => {
                self.bump();
                TypeKind::Void
            }
            TokenKind::Int => {
                self.bump();
                TypeKind::Int
            }
            TokenKind::Double => {
                self.bump();
                TypeKind::Double
            }
            TokenKind::Bool => {
                self.bump();
                TypeKind::Bool
            }
            TokenKind::String => {
                self.bump();
                TypeKind::String
            }
            TokenKind::Identifier => {
                let tok = self.bump();
                TypeKind::Named(tok.text)
            }
            _ => {
                self.error("expected a type".to_string(), pos.clone());
                TypeKind::Named(String::new())
            }
        };
        let mut node = TypeNode {
            id: self.next_id(),
            pos: pos.clone(),
            kind,
        };
        while self.at(&TokenKind::LBracket) {
            self.bump();
            self.expect(TokenKind::RBracket, "']' to close array type");
            node = TypeNode {
                id: self.next_id(),
                pos: pos.clone(),
                kind: TypeKind::Array(Box::new(node)),
            };
        }
        node
    }

    // ── Statements ───────────────────────────────────────────────────────

    fn looks_like_var_decl(&self) -> bool {
        match self.current_kind() {
            TokenKind::Void
            | TokenKind::Int
            | TokenKind::Double
            | TokenKind::Bool
            | TokenKind::String => true,
            TokenKind::Identifier => {
                matches!(self.peek_token(1).kind, TokenKind::Identifier)
            }
            _ => false,
        }
    }

    pub(crate) fn parse_stmt_block(&mut self) -> StmtBlock {
        let pos = self.current_pos();
        self.expect(TokenKind::LBrace, "'{' to open block");

        let mut decls = Vec::new();
        while self.looks_like_var_decl() {
            let before = self.pos;
            let v = self.parse_var_decl_unterminated();
            self.expect(TokenKind::Semicolon, "';' after variable declaration");
            decls.push(v);
            if self.pos == before {
                self.bump();
                break;
            }
        }

        let mut stmts = Vec::new();
        while !self.at(&TokenKind::RBrace) && !self.is_eof() {
            let before = self.pos;
            if let Some(s) = self.parse_stmt() {
                stmts.push(s);
            }
            if self.pos == before {
                self.bump();
            }
        }
        self.expect(TokenKind::RBrace, "'}' to close block");

        StmtBlock {
            id: self.next_id(),
            pos,
            decls,
            stmts,
        }
    }

    /// Returns `None` for a bare `;` (an empty statement carries no useful
    /// AST shape to check or scope-decorate).
    fn parse_stmt(&mut self) -> Option<Stmt> {
        match self.current_kind() {
            TokenKind::Semicolon => {
                self.bump();
                None
            }
            TokenKind::LBrace => Some(Stmt::Block(self.parse_stmt_block())),
            TokenKind::If => Some(Stmt::If(self.parse_if_stmt())),
            TokenKind::For => Some(Stmt::For(self.parse_for_stmt())),
            TokenKind::While => Some(Stmt::While(self.parse_while_stmt())),
            TokenKind::Return => Some(Stmt::Return(self.parse_return_stmt())),
            TokenKind::Break => {
                let pos = self.current_pos();
                self.bump();
                self.expect(TokenKind::Semicolon, "';' after break");
                Some(Stmt::Break(BreakStmt {
                    id: self.next_id(),
                    pos,
                }))
            }
            TokenKind::Print => Some(Stmt::Print(self.parse_print_stmt())),
            TokenKind::Switch => Some(Stmt::Switch(self.parse_switch_stmt())),
            _ => {
                let expr = self.parse_expr();
                self.expect(TokenKind::Semicolon, "';' after expression");
                Some(Stmt::Expr(expr))
            }
        }
    }

    /// A `Stmt` used as a loop/if body: a brace-delimited block, or any
    /// other single statement (no bare `;`, per Decaf's grammar a body is a
    /// `Stmt`, not `Stmt?`).
    fn parse_body_stmt(&mut self) -> Box<Stmt> {
        match self.parse_stmt() {
            Some(s) => Box::new(s),
            // A bare `;` was consumed as the body; synthesize an empty
            // block so callers always get a concrete node to decorate.
            None => Box::new(Stmt::Block(StmtBlock {
                id: self.next_id(),
                pos: self.current_pos(),
                decls: Vec::new(),
                stmts: Vec::new(),
            })),
        }
    }

    fn parse_if_stmt(&mut self) -> IfStmt {
        let pos = self.current_pos();
        self.bump(); // 'if'
        self.expect(TokenKind::LParen, "'(' after if");
        let test = self.parse_expr();
        self.expect(TokenKind::RParen, "')' after if test");
        let then_body = self.parse_body_stmt();
        let else_body = if self.eat(TokenKind::Else) {
            Some(self.parse_body_stmt())
        } else {
            None
        };
        IfStmt {
            id: self.next_id(),
            pos,
            test,
            then_body,
            else_body,
        }
    }

    fn parse_for_stmt(&mut self) -> ForStmt {
        let pos = self.current_pos();
        self.bump(); // 'for'
        self.expect(TokenKind::LParen, "'(' after for");
        let init = if self.at(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr())
        };
        self.expect(TokenKind::Semicolon, "';' after for-init");
        let test = self.parse_expr();
        self.expect(TokenKind::Semicolon, "';' after for-test");
        let step = if self.at(&TokenKind::RParen) {
            None
        } else {
            Some(self.parse_expr())
        };
        self.expect(TokenKind::RParen, "')' after for-step");
        let body = self.parse_body_stmt();
        ForStmt {
            id: self.next_id(),
            pos,
            init,
            test,
            step,
            body,
        }
    }

    fn parse_while_stmt(&mut self) -> WhileStmt {
        let pos = self.current_pos();
        self.bump(); // 'while'
        self.expect(TokenKind::LParen, "'(' after while");
        let test = self.parse_expr();
        self.expect(TokenKind::RParen, "')' after while test");
        let body = self.parse_body_stmt();
        WhileStmt {
            id: self.next_id(),
            pos,
            test,
            body,
        }
    }

    fn parse_return_stmt(&mut self) -> ReturnStmt {
        let pos = self.current_pos();
        self.bump(); // 'return'
        let expr = if self.at(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr())
        };
        self.expect(TokenKind::Semicolon, "';' after return");
        ReturnStmt {
            id: self.next_id(),
            pos,
            expr,
        }
    }

    fn parse_print_stmt(&mut self) -> PrintStmt {
        let pos = self.current_pos();
        self.bump(); // 'Print'
        self.expect(TokenKind::LParen, "'(' after Print");
        let mut args = Vec::new();
        if !self.at(&TokenKind::RParen) {
            args.push(self.parse_expr());
            while self.eat(TokenKind::Comma) {
                args.push(self.parse_expr());
            }
        }
        self.expect(TokenKind::RParen, "')' after Print arguments");
        self.expect(TokenKind::Semicolon, "';' after Print");
        PrintStmt {
            id: self.next_id(),
            pos,
            args,
        }
    }

    fn parse_switch_stmt(&mut self) -> SwitchStmt {
        let pos = self.current_pos();
        self.bump(); // 'switch'
        self.expect(TokenKind::LParen, "'(' after switch");
        let scrutinee = self.parse_expr();
        self.expect(TokenKind::RParen, "')' after switch scrutinee");
        self.expect(TokenKind::LBrace, "'{' to open switch body");

        let mut cases = Vec::new();
        let mut default = Vec::new();
        while !self.at(&TokenKind::RBrace) && !self.is_eof() {
            let before = self.pos;
            if self.at(&TokenKind::Case) {
                let case_pos = self.current_pos();
                self.bump();
                let value = self.parse_expr();
                self.expect(TokenKind::Colon, "':' after case value");
                let mut body = Vec::new();
                while !self.at(&TokenKind::Case)
                    && !self.at(&TokenKind::Default)
                    && !self.at(&TokenKind::RBrace)
                    && !self.is_eof()
                {
                    if let Some(s) = self.parse_stmt() {
                        body.push(s);
                    }
                }
                cases.push(CaseStmt {
                    id: self.next_id(),
                    pos: case_pos,
                    value,
                    body,
                });
            } else if self.at(&TokenKind::Default) {
                self.bump();
                self.expect(TokenKind::Colon, "':' after default");
                while !self.at(&TokenKind::RBrace) && !self.is_eof() {
                    if let Some(s) = self.parse_stmt() {
                        default.push(s);
                    }
                }
            } else {
                self.error("expected 'case' or 'default'".to_string(), self.current_pos());
            }
            if self.pos == before {
                self.bump();
            }
        }
        self.expect(TokenKind::RBrace, "'}' to close switch body");

        SwitchStmt {
            id: self.next_id(),
            pos,
            scrutinee,
            cases,
            default,
        }
    }
}

//! The Decaf AST: a closed set of tagged-union node types, per spec §3 and
//! §9's design note ("model as closed tagged unions with exhaustive match;
//! avoid open class hierarchies"). There is no intermediate CST — the
//! parser builds these nodes directly.
//!
//! Every node carries a [`NodeId`] (its identity for the `NodeId -> ScopeId`
//! side-table built by `decaf-semantic`'s scope decorator) and a
//! [`Position`] (its source location for diagnostics). The AST itself is
//! immutable: it does not hold a `scope` back-reference, per §9's
//! "alternative" of a side-table over a mutable field — see
//! `decaf-common::NodeId` for the rationale.

use decaf_common::{NodeId, Position};

#[derive(Debug, Clone)]
pub struct Program {
    pub decls: Vec<Decl>,
}

#[derive(Debug, Clone)]
pub enum Decl {
    Var(VarDecl),
    Fn(FnDecl),
    Class(ClassDecl),
    Interface(InterfaceDecl),
}

impl Decl {
    pub fn id(&self) -> NodeId {
        match self {
            Decl::Var(d) => d.id,
            Decl::Fn(d) => d.id,
            Decl::Class(d) => d.id,
            Decl::Interface(d) => d.id,
        }
    }

    pub fn pos(&self) -> &Position {
        match self {
            Decl::Var(d) => &d.pos,
            Decl::Fn(d) => &d.pos,
            Decl::Class(d) => &d.pos,
            Decl::Interface(d) => &d.pos,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Decl::Var(d) => &d.name,
            Decl::Fn(d) => &d.name,
            Decl::Class(d) => &d.name,
            Decl::Interface(d) => &d.name,
        }
    }
}

#[derive(Debug, Clone)]
pub struct VarDecl {
    pub id: NodeId,
    pub pos: Position,
    pub name: String,
    pub name_pos: Position,
    pub ty: TypeNode,
}

/// A function declaration. `body` is `None` for an abstract/interface
/// method (spec §3: "absent body = abstract/interface method").
#[derive(Debug, Clone)]
pub struct FnDecl {
    pub id: NodeId,
    pub pos: Position,
    pub name: String,
    pub name_pos: Position,
    pub return_type: TypeNode,
    pub formals: Vec<VarDecl>,
    pub body: Option<StmtBlock>,
}

#[derive(Debug, Clone)]
pub struct ClassDecl {
    pub id: NodeId,
    pub pos: Position,
    pub name: String,
    pub name_pos: Position,
    pub extends: Option<NamedTypeRef>,
    pub implements: Vec<NamedTypeRef>,
    pub members: Vec<Member>,
}

#[derive(Debug, Clone)]
pub enum Member {
    Var(VarDecl),
    Fn(FnDecl),
}

#[derive(Debug, Clone)]
pub struct InterfaceDecl {
    pub id: NodeId,
    pub pos: Position,
    pub name: String,
    pub name_pos: Position,
    pub members: Vec<FnDecl>,
}

/// A reference to a named type in an `extends`/`implements` clause.
#[derive(Debug, Clone)]
pub struct NamedTypeRef {
    pub name: String,
    pub pos: Position,
}

#[derive(Debug, Clone)]
pub struct TypeNode {
    pub id: NodeId,
    pub pos: Position,
    pub kind: TypeKind,
}

#[derive(Debug, Clone)]
pub enum TypeKind {
    Void,
    Int,
    Double,
    Bool,
    String,
    Named(String),
    Array(Box<TypeNode>),
}

// ── Statements ───────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct StmtBlock {
    pub id: NodeId,
    pub pos: Position,
    pub decls: Vec<VarDecl>,
    pub stmts: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Block(StmtBlock),
    If(IfStmt),
    For(ForStmt),
    While(WhileStmt),
    Return(ReturnStmt),
    Break(BreakStmt),
    Print(PrintStmt),
    Switch(SwitchStmt),
    Expr(Expr),
}

impl Stmt {
    pub fn id(&self) -> NodeId {
        match self {
            Stmt::Block(s) => s.id,
            Stmt::If(s) => s.id,
            Stmt::For(s) => s.id,
            Stmt::While(s) => s.id,
            Stmt::Return(s) => s.id,
            Stmt::Break(s) => s.id,
            Stmt::Print(s) => s.id,
            Stmt::Switch(s) => s.id,
            Stmt::Expr(e) => e.id,
        }
    }

    pub fn pos(&self) -> &Position {
        match self {
            Stmt::Block(s) => &s.pos,
            Stmt::If(s) => &s.pos,
            Stmt::For(s) => &s.pos,
            Stmt::While(s) => &s.pos,
            Stmt::Return(s) => &s.pos,
            Stmt::Break(s) => &s.pos,
            Stmt::Print(s) => &s.pos,
            Stmt::Switch(s) => &s.pos,
            Stmt::Expr(e) => &e.pos,
        }
    }
}

#[derive(Debug, Clone)]
pub struct IfStmt {
    pub id: NodeId,
    pub pos: Position,
    pub test: Expr,
    pub then_body: Box<Stmt>,
    pub else_body: Option<Box<Stmt>>,
}

#[derive(Debug, Clone)]
pub struct ForStmt {
    pub id: NodeId,
    pub pos: Position,
    pub init: Option<Expr>,
    pub test: Expr,
    pub step: Option<Expr>,
    pub body: Box<Stmt>,
}

#[derive(Debug, Clone)]
pub struct WhileStmt {
    pub id: NodeId,
    pub pos: Position,
    pub test: Expr,
    pub body: Box<Stmt>,
}

#[derive(Debug, Clone)]
pub struct ReturnStmt {
    pub id: NodeId,
    pub pos: Position,
    pub expr: Option<Expr>,
}

#[derive(Debug, Clone)]
pub struct BreakStmt {
    pub id: NodeId,
    pub pos: Position,
}

#[derive(Debug, Clone)]
pub struct PrintStmt {
    pub id: NodeId,
    pub pos: Position,
    pub args: Vec<Expr>,
}

/// Parsed and traversed per §9 Open Question 3 ("SwitchStmt/CaseStmt are
/// parsed but their semantic checks are incomplete in the source"); the
/// scrutinee is type-checked like any bare expression, case bodies are
/// walked like statement lists, and no exhaustiveness/case-type check is
/// performed.
#[derive(Debug, Clone)]
pub struct SwitchStmt {
    pub id: NodeId,
    pub pos: Position,
    pub scrutinee: Expr,
    pub cases: Vec<CaseStmt>,
    pub default: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub struct CaseStmt {
    pub id: NodeId,
    pub pos: Position,
    pub value: Expr,
    pub body: Vec<Stmt>,
}

// ── Expressions ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Expr {
    pub id: NodeId,
    pub pos: Position,
    pub kind: ExprKind,
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    IntLit(i64),
    DoubleLit(f64),
    BoolLit(bool),
    StringLit(String),
    NullLit,
    This,
    ReadInteger,
    ReadLine,
    /// A bare name: either a local/field variable lookup or, if it resolves
    /// to a zero-arg method, an implicit `this.name()` call is *not*
    /// performed here -- method calls always go through `Call`.
    Ident(String),
    Field {
        base: Box<Expr>,
        field: String,
        field_pos: Position,
    },
    Call {
        base: Option<Box<Expr>>,
        method: String,
        method_pos: Position,
        args: Vec<Expr>,
    },
    New(String),
    NewArray {
        size: Box<Expr>,
        elem_type: Box<TypeNode>,
    },
    ArrayAccess {
        array: Box<Expr>,
        index: Box<Expr>,
    },
    Assign {
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// Arithmetic/relational/logical expression. `left` is `None` for the
    /// unary forms (`-x`, `!x`), per §9 Open Question 4.
    Compound {
        op: BinOp,
        left: Option<Box<Expr>>,
        right: Box<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    And,
    Or,
    Neg,
    Not,
}

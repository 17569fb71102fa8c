//! Internal invariant violations (spec §4.7/§4.8): impossible parser
//! output or a missing scope assignment at a pass that requires one.
//! These are never accumulated alongside user diagnostics -- they abort
//! the pipeline and are routed to the driver, per spec §6/§7.

use std::fmt;

use decaf_common::Position;

#[derive(Debug, Clone, PartialEq)]
pub struct InternalError {
    pub message: String,
    pub pos: Position,
}

impl InternalError {
    pub fn new(message: impl Into<String>, pos: Position) -> Self {
        InternalError {
            message: message.into(),
            pos,
        }
    }

    /// §4.3: "it is a hard error (abort with 'extremely bad') if `this`
    /// is already present" in a freshly-forked class scope.
    pub fn this_already_present(class_name: &str, pos: Position) -> Self {
        InternalError::new(
            format!("extremely bad: 'this' already bound in class '{class_name}'"),
            pos,
        )
    }

    /// §4.6: `ReturnStmt` with no enclosing `FnDecl` found by
    /// `findReturnType`.
    pub fn no_enclosing_function(pos: Position) -> Self {
        InternalError::new("return statement outside of any function", pos)
    }

    /// §8 invariant 1: every AST node must have a scope after C4.
    pub fn missing_scope(pos: Position) -> Self {
        InternalError::new("internal: AST node has no assigned scope", pos)
    }
}

impl fmt::Display for InternalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "internal error at line {}: {}", self.pos.line, self.message)
    }
}

impl std::error::Error for InternalError {}

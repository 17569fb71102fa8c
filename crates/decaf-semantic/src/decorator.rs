//! C4: the scope decorator. First pass over the AST -- assigns every node
//! a scope (recorded in the `ScopeArena`'s `NodeId -> ScopeId` side-table)
//! and creates the child scopes spec §4.2's table calls for. No symbol is
//! inserted into any table here; that's C5's job.

use decaf_parser::ast::{
    ClassDecl, Decl, Expr, ExprKind, FnDecl, ForStmt, IfStmt, InterfaceDecl, Member, Program,
    Stmt, StmtBlock, TypeKind, TypeNode, VarDecl, WhileStmt,
};

use crate::scope::{ScopeArena, ScopeId};

pub fn decorate(program: &Program, arena: &mut ScopeArena, root: ScopeId) {
    for decl in &program.decls {
        decorate_decl(decl, root, arena);
    }
}

fn decorate_decl(decl: &Decl, scope: ScopeId, arena: &mut ScopeArena) {
    match decl {
        Decl::Var(v) => decorate_var_decl(v, scope, arena),
        Decl::Fn(f) => decorate_fn_decl(f, scope, arena),
        Decl::Class(c) => decorate_class_decl(c, scope, arena),
        Decl::Interface(i) => decorate_interface_decl(i, scope, arena),
    }
}

fn decorate_var_decl(v: &VarDecl, scope: ScopeId, arena: &mut ScopeArena) {
    arena.assign_node(v.id, scope);
    decorate_type(&v.ty, scope, arena);
}

fn decorate_fn_decl(f: &FnDecl, scope: ScopeId, arena: &mut ScopeArena) {
    arena.assign_node(f.id, scope);
    decorate_type(&f.return_type, scope, arena);

    let formals_scope = arena.child(scope, format!("FnDecl (formals) {}", f.name));
    for formal in &f.formals {
        decorate_var_decl(formal, formals_scope, arena);
    }

    if let Some(body) = &f.body {
        let body_scope = arena.child(formals_scope, format!("FnDecl (body) {}", f.name));
        arena.assign_node(body.id, body_scope);
        decorate_block_contents(body, body_scope, arena);
    }
}

fn decorate_class_decl(c: &ClassDecl, scope: ScopeId, arena: &mut ScopeArena) {
    let class_scope = arena.child(scope, format!("Class Declaration of {}", c.name));
    // The class declaration's own scope *is* its freshly-forked class
    // scope (spec §4.3: "Insert ... into `c.scope.table`" refers to this
    // new scope, not the enclosing one), so C5/C6/C7 can recover it via
    // `arena.scope_of(c.id)`.
    arena.assign_node(c.id, class_scope);
    for member in &c.members {
        match member {
            Member::Var(v) => decorate_var_decl(v, class_scope, arena),
            Member::Fn(f) => decorate_fn_decl(f, class_scope, arena),
        }
    }
}

fn decorate_interface_decl(i: &InterfaceDecl, scope: ScopeId, arena: &mut ScopeArena) {
    let iface_scope = arena.child(scope, format!("Interface Declaration of {}", i.name));
    arena.assign_node(i.id, iface_scope);
    for m in &i.members {
        decorate_fn_decl(m, iface_scope, arena);
    }
}

fn decorate_type(t: &TypeNode, scope: ScopeId, arena: &mut ScopeArena) {
    arena.assign_node(t.id, scope);
    if let TypeKind::Array(inner) = &t.kind {
        decorate_type(inner, scope, arena);
    }
}

/// Decorate a `StmtBlock`'s own declarations and statements directly into
/// `scope` -- used both for a block that already owns its scope (a
/// function body, a `Subblock`, a `Test body`, a `Loop body`) and, by
/// extension, for the `Program` root.
fn decorate_block_contents(block: &StmtBlock, scope: ScopeId, arena: &mut ScopeArena) {
    for decl in &block.decls {
        decorate_var_decl(decl, scope, arena);
    }
    for stmt in &block.stmts {
        decorate_stmt(stmt, scope, arena);
    }
}

fn decorate_stmt(stmt: &Stmt, scope: ScopeId, arena: &mut ScopeArena) {
    match stmt {
        Stmt::Block(b) => {
            let sub = arena.child(scope, "Subblock");
            arena.assign_node(b.id, sub);
            decorate_block_contents(b, sub, arena);
        }
        Stmt::If(s) => decorate_if_stmt(s, scope, arena),
        Stmt::For(s) => decorate_for_stmt(s, scope, arena),
        Stmt::While(s) => decorate_while_stmt(s, scope, arena),
        Stmt::Return(s) => {
            arena.assign_node(s.id, scope);
            if let Some(e) = &s.expr {
                decorate_expr(e, scope, arena);
            }
        }
        Stmt::Break(s) => arena.assign_node(s.id, scope),
        Stmt::Print(s) => {
            arena.assign_node(s.id, scope);
            for arg in &s.args {
                decorate_expr(arg, scope, arena);
            }
        }
        Stmt::Switch(s) => {
            arena.assign_node(s.id, scope);
            decorate_expr(&s.scrutinee, scope, arena);
            for case in &s.cases {
                arena.assign_node(case.id, scope);
                decorate_expr(&case.value, scope, arena);
                for st in &case.body {
                    decorate_stmt(st, scope, arena);
                }
            }
            for st in &s.default {
                decorate_stmt(st, scope, arena);
            }
        }
        Stmt::Expr(e) => decorate_expr(e, scope, arena),
    }
}

fn decorate_if_stmt(s: &IfStmt, scope: ScopeId, arena: &mut ScopeArena) {
    arena.assign_node(s.id, scope);
    // The test expression belongs to the enclosing scope, not the body's.
    decorate_expr(&s.test, scope, arena);

    let then_scope = arena.child(scope, "Test body");
    decorate_body_in_scope(&s.then_body, then_scope, arena);

    if let Some(else_body) = &s.else_body {
        if matches!(else_body.as_ref(), Stmt::Block(_)) {
            let else_scope = arena.child(scope, "Subblock");
            decorate_body_in_scope(else_body, else_scope, arena);
        } else {
            // `else if ...` (or a bare non-block else statement) inherits
            // the enclosing scope directly -- no wrapper scope.
            decorate_stmt(else_body, scope, arena);
        }
    }
}

fn decorate_for_stmt(s: &ForStmt, scope: ScopeId, arena: &mut ScopeArena) {
    arena.assign_node(s.id, scope);
    if let Some(init) = &s.init {
        decorate_expr(init, scope, arena);
    }
    decorate_expr(&s.test, scope, arena);
    if let Some(step) = &s.step {
        decorate_expr(step, scope, arena);
    }
    let body_scope = arena.child(scope, "Loop body");
    decorate_body_in_scope(&s.body, body_scope, arena);
}

fn decorate_while_stmt(s: &WhileStmt, scope: ScopeId, arena: &mut ScopeArena) {
    arena.assign_node(s.id, scope);
    decorate_expr(&s.test, scope, arena);
    let body_scope = arena.child(scope, "Loop body");
    decorate_body_in_scope(&s.body, body_scope, arena);
}

/// Decorate a body slot (`if`'s then-body, `for`/`while`'s body) that has
/// already been given its own scope. If the body is itself a `StmtBlock`,
/// its declarations/statements are decorated directly into that scope
/// rather than spawning a further nested `Subblock` scope for it.
fn decorate_body_in_scope(stmt: &Stmt, body_scope: ScopeId, arena: &mut ScopeArena) {
    arena.assign_node(stmt.id(), body_scope);
    match stmt {
        Stmt::Block(b) => decorate_block_contents(b, body_scope, arena),
        other => decorate_stmt(other, body_scope, arena),
    }
}

fn decorate_expr(expr: &Expr, scope: ScopeId, arena: &mut ScopeArena) {
    arena.assign_node(expr.id, scope);
    match &expr.kind {
        ExprKind::IntLit(_)
        | ExprKind::DoubleLit(_)
        | ExprKind::BoolLit(_)
        | ExprKind::StringLit(_)
        | ExprKind::NullLit
        | ExprKind::This
        | ExprKind::ReadInteger
        | ExprKind::ReadLine
        | ExprKind::Ident(_)
        | ExprKind::New(_) => {}
        ExprKind::Field { base, .. } => decorate_expr(base, scope, arena),
        ExprKind::Call { base, args, .. } => {
            if let Some(base) = base {
                decorate_expr(base, scope, arena);
            }
            for arg in args {
                decorate_expr(arg, scope, arena);
            }
        }
        ExprKind::NewArray { size, elem_type } => {
            decorate_expr(size, scope, arena);
            decorate_type(elem_type, scope, arena);
        }
        ExprKind::ArrayAccess { array, index } => {
            decorate_expr(array, scope, arena);
            decorate_expr(index, scope, arena);
        }
        ExprKind::Assign { lhs, rhs } => {
            decorate_expr(lhs, scope, arena);
            decorate_expr(rhs, scope, arena);
        }
        ExprKind::Compound { left, right, .. } => {
            // The unary forms (`-x`, `!x`) carry no left operand -- §9
            // Open Question 4.
            if let Some(left) = left {
                decorate_expr(left, scope, arena);
            }
            decorate_expr(right, scope, arena);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use decaf_parser::parse;

    fn decorated(src: &str) -> (decaf_parser::ast::Program, ScopeArena, ScopeId) {
        let (program, errors) = parse(src);
        assert!(errors.is_empty(), "parse errors: {errors:?}");
        let (mut arena, root) = ScopeArena::new();
        decorate(&program, &mut arena, root);
        (program, arena, root)
    }

    #[test]
    fn class_decl_gets_named_child_scope() {
        let (program, arena, root) = decorated("class Foo { }");
        let Decl::Class(c) = &program.decls[0] else {
            panic!("expected class decl")
        };
        let class_scope = arena.scope_of(c.id).unwrap();
        assert_eq!(arena.parent_of(class_scope), Some(root));
        assert_eq!(arena.bound_name(class_scope), "Class Declaration of Foo");
    }

    #[test]
    fn fn_decl_has_formals_and_body_scopes() {
        let (program, arena, _root) = decorated("int f(int x) { return x; }");
        let Decl::Fn(f) = &program.decls[0] else {
            panic!("expected fn decl")
        };
        let formal_scope = arena.scope_of(f.formals[0].id).unwrap();
        assert_eq!(arena.bound_name(formal_scope), "FnDecl (formals) f");
        let body_scope = arena.scope_of(f.body.as_ref().unwrap().id).unwrap();
        assert_eq!(arena.bound_name(body_scope), "FnDecl (body) f");
        assert_eq!(arena.parent_of(body_scope), Some(formal_scope));
    }

    #[test]
    fn if_test_uses_enclosing_scope_not_body_scope() {
        let (program, arena, root) = decorated("void g() { if (true) { } }");
        let Decl::Fn(f) = &program.decls[0] else {
            panic!()
        };
        let body_scope = arena.scope_of(f.body.as_ref().unwrap().id).unwrap();
        let Stmt::If(if_stmt) = &f.body.as_ref().unwrap().stmts[0] else {
            panic!()
        };
        assert_eq!(arena.scope_of(if_stmt.test.id), Some(body_scope));
        assert_ne!(arena.scope_of(if_stmt.test.id), arena.scope_of(if_stmt.then_body.id()));
        let _ = root;
    }

    #[test]
    fn loop_body_is_tagged_for_break_checking() {
        let (program, arena, _root) = decorated("void g() { while (true) { break; } }");
        let Decl::Fn(f) = &program.decls[0] else {
            panic!()
        };
        let Stmt::While(w) = &f.body.as_ref().unwrap().stmts[0] else {
            panic!()
        };
        let loop_scope = arena.scope_of(w.body.id()).unwrap();
        assert_eq!(arena.bound_name(loop_scope), "Loop body");
        assert!(arena.inside_loop(loop_scope));
    }
}

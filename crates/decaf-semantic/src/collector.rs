//! C5: the declaration collector. Second pass -- walks the already-
//! decorated tree once, inserting every declaration into the relevant
//! scope's table via `processDecl` (spec §4.3). Resolves §9 Open
//! Question 2: every declaration site is walked, not only `Program`'s
//! top level (class/interface members, formals, and arbitrarily nested
//! blocks inside `if`/`for`/`while`/`switch`).

use decaf_common::NodeId;
use decaf_parser::ast::{
    ClassDecl, Decl, FnDecl, InterfaceDecl, Member, Program, Stmt, StmtBlock, TypeKind, TypeNode,
    VarDecl,
};

use crate::diagnostics::Diagnostic;
use crate::error::InternalError;
use crate::scope::{ScopeArena, ScopeId};
use crate::types::{Type, TypeAnnotation};

pub fn collect(program: &Program, arena: &mut ScopeArena) -> Result<Vec<Diagnostic>, InternalError> {
    let mut diags = Vec::new();
    for decl in &program.decls {
        collect_decl(decl, arena, &mut diags)?;
    }
    Ok(diags)
}

fn scope_of(arena: &ScopeArena, node: NodeId, pos: &decaf_common::Position) -> Result<ScopeId, InternalError> {
    arena
        .scope_of(node)
        .ok_or_else(|| InternalError::missing_scope(pos.clone()))
}

fn collect_decl(decl: &Decl, arena: &mut ScopeArena, diags: &mut Vec<Diagnostic>) -> Result<(), InternalError> {
    match decl {
        Decl::Var(v) => collect_var_decl(v, arena, diags),
        Decl::Fn(f) => collect_fn_decl(f, arena, diags),
        Decl::Class(c) => collect_class_decl(c, arena, diags),
        Decl::Interface(i) => collect_interface_decl(i, arena, diags),
    }
}

fn collect_var_decl(v: &VarDecl, arena: &mut ScopeArena, diags: &mut Vec<Diagnostic>) -> Result<(), InternalError> {
    let scope = scope_of(arena, v.id, &v.pos)?;
    if let Some(prior) = arena.get_local(scope, &v.name) {
        diags.push(Diagnostic::conflicting_decl(&v.name, prior.pos().line, v.pos.clone()));
        return Ok(());
    }
    let ty = type_node_to_type(&v.ty);
    arena.put(
        scope,
        v.name.clone(),
        TypeAnnotation::Variable {
            name: v.name.clone(),
            ty,
            pos: v.pos.clone(),
        },
    );
    Ok(())
}

fn collect_fn_decl(f: &FnDecl, arena: &mut ScopeArena, diags: &mut Vec<Diagnostic>) -> Result<(), InternalError> {
    let scope = scope_of(arena, f.id, &f.pos)?;
    if let Some(prior) = arena.get_local(scope, &f.name) {
        diags.push(Diagnostic::conflicting_decl(&f.name, prior.pos().line, f.pos.clone()));
        // Per spec §4.3: a conflicting FnDecl does not have its body
        // processed.
        return Ok(());
    }
    let formal_tys = f.formals.iter().map(|p| type_node_to_type(&p.ty)).collect();
    arena.put(
        scope,
        f.name.clone(),
        TypeAnnotation::Method {
            name: f.name.clone(),
            return_ty: type_node_to_type(&f.return_type),
            formal_tys,
            pos: f.pos.clone(),
        },
    );
    for formal in &f.formals {
        collect_var_decl(formal, arena, diags)?;
    }
    if let Some(body) = &f.body {
        collect_stmt_block(body, arena, diags)?;
    }
    Ok(())
}

fn collect_class_decl(c: &ClassDecl, arena: &mut ScopeArena, diags: &mut Vec<Diagnostic>) -> Result<(), InternalError> {
    let class_scope = scope_of(arena, c.id, &c.pos)?;
    let parent_scope = arena
        .parent_of(class_scope)
        .ok_or_else(|| InternalError::new("class declaration has no parent scope", c.pos.clone()))?;

    if arena.contains_local(class_scope, "this") {
        return Err(InternalError::this_already_present(&c.name, c.pos.clone()));
    }
    arena.put(
        class_scope,
        "this".to_string(),
        TypeAnnotation::Variable {
            name: "this".to_string(),
            ty: Type::Named(c.name.clone()),
            pos: c.pos.clone(),
        },
    );

    for member in &c.members {
        match member {
            Member::Var(v) => collect_var_decl(v, arena, diags)?,
            Member::Fn(f) => collect_fn_decl(f, arena, diags)?,
        }
    }

    let annotation = TypeAnnotation::Class {
        name: c.name.clone(),
        extends: c.extends.as_ref().map(|e| e.name.clone()),
        implements: c.implements.iter().map(|i| i.name.clone()).collect(),
        class_scope,
        pos: c.pos.clone(),
    };
    if let Some(prior) = arena.get_local(parent_scope, &c.name) {
        diags.push(Diagnostic::conflicting_decl(&c.name, prior.pos().line, c.pos.clone()));
    } else {
        arena.put(parent_scope, c.name.clone(), annotation);
    }
    Ok(())
}

fn collect_interface_decl(i: &InterfaceDecl, arena: &mut ScopeArena, diags: &mut Vec<Diagnostic>) -> Result<(), InternalError> {
    let iface_scope = scope_of(arena, i.id, &i.pos)?;
    let parent_scope = arena
        .parent_of(iface_scope)
        .ok_or_else(|| InternalError::new("interface declaration has no parent scope", i.pos.clone()))?;

    for m in &i.members {
        collect_fn_decl(m, arena, diags)?;
    }

    let annotation = TypeAnnotation::Interface {
        name: i.name.clone(),
        interface_scope: iface_scope,
        pos: i.pos.clone(),
    };
    if let Some(prior) = arena.get_local(parent_scope, &i.name) {
        diags.push(Diagnostic::conflicting_decl(&i.name, prior.pos().line, i.pos.clone()));
    } else {
        arena.put(parent_scope, i.name.clone(), annotation);
    }
    Ok(())
}

fn collect_stmt_block(block: &StmtBlock, arena: &mut ScopeArena, diags: &mut Vec<Diagnostic>) -> Result<(), InternalError> {
    for decl in &block.decls {
        collect_var_decl(decl, arena, diags)?;
    }
    for stmt in &block.stmts {
        collect_stmt(stmt, arena, diags)?;
    }
    Ok(())
}

/// Recurse into every nested declaration site a statement may contain.
/// `Expr`/`Return`/`Break`/`Print` statements carry no declarations of
/// their own.
fn collect_stmt(stmt: &Stmt, arena: &mut ScopeArena, diags: &mut Vec<Diagnostic>) -> Result<(), InternalError> {
    match stmt {
        Stmt::Block(b) => collect_stmt_block(b, arena, diags),
        Stmt::If(s) => {
            collect_stmt(&s.then_body, arena, diags)?;
            if let Some(else_body) = &s.else_body {
                collect_stmt(else_body, arena, diags)?;
            }
            Ok(())
        }
        Stmt::For(s) => collect_stmt(&s.body, arena, diags),
        Stmt::While(s) => collect_stmt(&s.body, arena, diags),
        Stmt::Switch(s) => {
            for case in &s.cases {
                for st in &case.body {
                    collect_stmt(st, arena, diags)?;
                }
            }
            for st in &s.default {
                collect_stmt(st, arena, diags)?;
            }
            Ok(())
        }
        Stmt::Return(_) | Stmt::Break(_) | Stmt::Print(_) | Stmt::Expr(_) => Ok(()),
    }
}

fn type_node_to_type(t: &TypeNode) -> Type {
    match &t.kind {
        TypeKind::Void => Type::Void,
        TypeKind::Int => Type::Int,
        TypeKind::Double => Type::Double,
        TypeKind::Bool => Type::Bool,
        TypeKind::String => Type::String,
        TypeKind::Named(n) => Type::Named(n.clone()),
        TypeKind::Array(inner) => Type::Array(Box::new(type_node_to_type(inner))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decorator::decorate;
    use decaf_parser::parse;

    fn run(src: &str) -> (ScopeArena, ScopeId, Vec<Diagnostic>) {
        let (program, errors) = parse(src);
        assert!(errors.is_empty(), "parse errors: {errors:?}");
        let (mut arena, root) = ScopeArena::new();
        decorate(&program, &mut arena, root);
        let diags = collect(&program, &mut arena).expect("no internal error");
        (arena, root, diags)
    }

    #[test]
    fn duplicate_top_level_var_conflicts() {
        let (_, _, diags) = run("int x; int x;");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, crate::diagnostics::DiagnosticKind::ConflictingDecl);
    }

    #[test]
    fn class_scope_gets_this() {
        let (arena, root, diags) = run("class A { int f; }");
        assert!(diags.is_empty());
        let class_ann = arena.get_local(root, "A").unwrap();
        let class_scope = class_ann.as_class_scope().unwrap();
        let this_ann = arena.get_local(class_scope, "this").unwrap();
        assert_eq!(this_ann.name(), "this");
    }

    #[test]
    fn nested_block_declarations_are_collected() {
        let (arena, _root, diags) = run(
            "void g() { if (true) { int y; while (true) { int z; } } }",
        );
        assert!(diags.is_empty());
        // Just confirming no internal error/missing-scope panic occurred
        // while walking arbitrarily nested declaration sites.
        let _ = arena;
    }

    #[test]
    fn conflicting_method_does_not_process_body() {
        let (arena, root, diags) = run("int f() { return 0; } int f() { int y; y = true; }");
        assert_eq!(diags.len(), 1);
        let _ = (arena, root);
    }
}

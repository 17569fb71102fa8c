//! C8: the type checker. Final pass -- walks the whole tree computing and
//! checking expression types (spec §4.6), including `Expr::typeof`'s
//! contract. Because `Type`/`TypeAnnotation` (C3) live in this crate while
//! `Expr` (the AST) lives in `decaf-parser`, `typeof` is implemented here
//! as a free function, [`typeof_expr`], rather than as an inherent method
//! on the parser's `Expr` -- see `SPEC_FULL.md` §3 for the rationale.
//!
//! `findReturnType`'s parent-climbing (spec §4.6) is replaced by an
//! explicit `Option<Type>` (the enclosing function's declared return type)
//! threaded through the statement walk, rather than mutable `parent`
//! back-pointers on AST nodes -- same rationale as the scope side-table in
//! [`crate::scope`]. The externally-visible behavior (a fatal internal
//! error when a `return` has no enclosing function) is unchanged.

use decaf_common::{NodeId, Position};
use decaf_parser::ast::{
    BinOp, ClassDecl, Decl, Expr, ExprKind, FnDecl, ForStmt, IfStmt, InterfaceDecl, Member,
    Program, Stmt, StmtBlock, TypeKind, TypeNode, VarDecl, WhileStmt,
};

use crate::diagnostics::Diagnostic;
use crate::error::InternalError;
use crate::scope::{ScopeArena, ScopeId};
use crate::types::{Type, TypeAnnotation};

pub fn check(program: &Program, arena: &ScopeArena) -> Result<Vec<Diagnostic>, InternalError> {
    let mut diags = Vec::new();
    for decl in &program.decls {
        check_decl(decl, arena, &mut diags)?;
    }
    Ok(diags)
}

fn scope_of(arena: &ScopeArena, node: NodeId, pos: &Position) -> Result<ScopeId, InternalError> {
    arena
        .scope_of(node)
        .ok_or_else(|| InternalError::missing_scope(pos.clone()))
}

fn check_decl(decl: &Decl, arena: &ScopeArena, diags: &mut Vec<Diagnostic>) -> Result<(), InternalError> {
    match decl {
        Decl::Var(v) => check_var_decl(v, arena, diags),
        Decl::Fn(f) => check_fn_decl(f, arena, diags),
        Decl::Class(c) => check_class_decl(c, arena, diags),
        Decl::Interface(i) => check_interface_decl(i, arena, diags),
    }
}

fn check_var_decl(v: &VarDecl, arena: &ScopeArena, diags: &mut Vec<Diagnostic>) -> Result<(), InternalError> {
    let scope = scope_of(arena, v.id, &v.pos)?;
    let ty = type_node_to_type(&v.ty);
    diags.extend(check_type_exists(arena, scope, &v.ty.pos, &ty, "class"));
    Ok(())
}

fn check_fn_decl(f: &FnDecl, arena: &ScopeArena, diags: &mut Vec<Diagnostic>) -> Result<(), InternalError> {
    let scope = scope_of(arena, f.id, &f.pos)?;
    let return_ty = type_node_to_type(&f.return_type);
    diags.extend(check_type_exists(arena, scope, &f.return_type.pos, &return_ty, "class"));
    for formal in &f.formals {
        check_var_decl(formal, arena, diags)?;
    }
    if let Some(body) = &f.body {
        check_stmt_block(body, arena, Some(&return_ty), diags)?;
    }
    Ok(())
}

fn check_class_decl(c: &ClassDecl, arena: &ScopeArena, diags: &mut Vec<Diagnostic>) -> Result<(), InternalError> {
    for member in &c.members {
        match member {
            Member::Var(v) => check_var_decl(v, arena, diags)?,
            Member::Fn(f) => check_fn_decl(f, arena, diags)?,
        }
    }
    Ok(())
}

fn check_interface_decl(i: &InterfaceDecl, arena: &ScopeArena, diags: &mut Vec<Diagnostic>) -> Result<(), InternalError> {
    for m in &i.members {
        check_fn_decl(m, arena, diags)?;
    }
    Ok(())
}

fn check_stmt_block(
    block: &StmtBlock,
    arena: &ScopeArena,
    enclosing_return: Option<&Type>,
    diags: &mut Vec<Diagnostic>,
) -> Result<(), InternalError> {
    for decl in &block.decls {
        check_var_decl(decl, arena, diags)?;
    }
    for stmt in &block.stmts {
        check_stmt(stmt, arena, enclosing_return, diags)?;
    }
    Ok(())
}

fn check_stmt(
    stmt: &Stmt,
    arena: &ScopeArena,
    enclosing_return: Option<&Type>,
    diags: &mut Vec<Diagnostic>,
) -> Result<(), InternalError> {
    match stmt {
        Stmt::Block(b) => check_stmt_block(b, arena, enclosing_return, diags),
        Stmt::If(s) => check_if_stmt(s, arena, enclosing_return, diags),
        Stmt::For(s) => check_for_stmt(s, arena, enclosing_return, diags),
        Stmt::While(s) => check_while_stmt(s, arena, enclosing_return, diags),
        Stmt::Return(s) => {
            let scope = scope_of(arena, s.id, &s.pos)?;
            let expected = enclosing_return
                .ok_or_else(|| InternalError::no_enclosing_function(s.pos.clone()))?;
            match &s.expr {
                Some(e) => {
                    let got = typeof_expr(e, scope_of(arena, e.id, &e.pos)?, arena);
                    if let Type::Error(inner) = &got {
                        diags.extend(inner.clone());
                    } else if !expected.matches(&got) {
                        diags.push(Diagnostic::incompatible_return(&got, expected, s.pos.clone()));
                    }
                }
                None => {
                    if !matches!(expected, Type::Void) {
                        diags.push(Diagnostic::incompatible_return(&Type::Void, expected, s.pos.clone()));
                    }
                }
            }
            let _ = scope;
            Ok(())
        }
        Stmt::Break(s) => {
            let scope = scope_of(arena, s.id, &s.pos)?;
            if !arena.inside_loop(scope) {
                diags.push(Diagnostic::break_outside_loop(s.pos.clone()));
            }
            Ok(())
        }
        Stmt::Print(s) => {
            let scope = scope_of(arena, s.id, &s.pos)?;
            for (i, arg) in s.args.iter().enumerate() {
                let ty = typeof_expr(arg, scope, arena);
                if let Type::Error(inner) = &ty {
                    diags.extend(inner.clone());
                } else if !matches!(ty, Type::Int | Type::Bool | Type::String) {
                    diags.push(Diagnostic::incompatible_argument(i + 1, &ty, arg.pos.clone()));
                }
            }
            Ok(())
        }
        Stmt::Switch(s) => {
            let scope = scope_of(arena, s.id, &s.pos)?;
            let ty = typeof_expr(&s.scrutinee, scope, arena);
            if let Type::Error(inner) = ty {
                diags.extend(inner);
            }
            for case in &s.cases {
                let case_ty = typeof_expr(&case.value, scope, arena);
                if let Type::Error(inner) = case_ty {
                    diags.extend(inner);
                }
                for st in &case.body {
                    check_stmt(st, arena, enclosing_return, diags)?;
                }
            }
            for st in &s.default {
                check_stmt(st, arena, enclosing_return, diags)?;
            }
            Ok(())
        }
        Stmt::Expr(e) => {
            let scope = scope_of(arena, e.id, &e.pos)?;
            let ty = typeof_expr(e, scope, arena);
            if let Type::Error(inner) = ty {
                diags.extend(inner);
            }
            Ok(())
        }
    }
}

fn check_if_stmt(
    s: &IfStmt,
    arena: &ScopeArena,
    enclosing_return: Option<&Type>,
    diags: &mut Vec<Diagnostic>,
) -> Result<(), InternalError> {
    check_test_expr(&s.test, arena, diags)?;
    check_stmt(&s.then_body, arena, enclosing_return, diags)?;
    if let Some(else_body) = &s.else_body {
        check_stmt(else_body, arena, enclosing_return, diags)?;
    }
    Ok(())
}

fn check_for_stmt(
    s: &ForStmt,
    arena: &ScopeArena,
    enclosing_return: Option<&Type>,
    diags: &mut Vec<Diagnostic>,
) -> Result<(), InternalError> {
    if let Some(init) = &s.init {
        let scope = scope_of(arena, init.id, &init.pos)?;
        if let Type::Error(inner) = typeof_expr(init, scope, arena) {
            diags.extend(inner);
        }
    }
    check_test_expr(&s.test, arena, diags)?;
    if let Some(step) = &s.step {
        let scope = scope_of(arena, step.id, &step.pos)?;
        if let Type::Error(inner) = typeof_expr(step, scope, arena) {
            diags.extend(inner);
        }
    }
    check_stmt(&s.body, arena, enclosing_return, diags)
}

fn check_while_stmt(
    s: &WhileStmt,
    arena: &ScopeArena,
    enclosing_return: Option<&Type>,
    diags: &mut Vec<Diagnostic>,
) -> Result<(), InternalError> {
    check_test_expr(&s.test, arena, diags)?;
    check_stmt(&s.body, arena, enclosing_return, diags)
}

/// §4.6: `if`/`while`/`for` test expressions must type to `BoolType`;
/// `ErrorType` propagates (its inner diagnostics are unpacked once, not
/// re-reported as a second `InvalidTest`).
fn check_test_expr(test: &Expr, arena: &ScopeArena, diags: &mut Vec<Diagnostic>) -> Result<(), InternalError> {
    let scope = scope_of(arena, test.id, &test.pos)?;
    match typeof_expr(test, scope, arena) {
        Type::Error(inner) => diags.extend(inner),
        Type::Bool => {}
        _ => diags.push(Diagnostic::invalid_test(test.pos.clone())),
    }
    Ok(())
}

/// §4.6's `checkTypeExists(scope, pos, t, kind)`. `Type::Undeclared` and
/// `Type::Error` never arise from a real parsed `TypeNode` (see
/// `type_node_to_type` below, which is exhaustive over the parser's
/// `TypeKind`), so the spec's "SemanticException: Unexpected type" branch
/// for those variants is unreachable in practice rather than worth a panic
/// inside this otherwise-pure function.
pub fn check_type_exists(arena: &ScopeArena, scope: ScopeId, pos: &Position, ty: &Type, kind: &str) -> Vec<Diagnostic> {
    match ty {
        Type::Named(name) => {
            let resolved = matches!(
                arena.get(scope, name),
                Some(TypeAnnotation::Class { .. }) | Some(TypeAnnotation::Interface { .. })
            );
            if resolved {
                Vec::new()
            } else {
                vec![Diagnostic::undeclared_type(name, kind, pos.clone())]
            }
        }
        Type::Array(inner) => check_type_exists(arena, scope, pos, inner, kind),
        Type::Void | Type::Int | Type::Double | Type::Bool | Type::String | Type::Null => Vec::new(),
        Type::Undeclared | Type::Error(_) => Vec::new(),
    }
}

/// `Expr.typeof(scope)` (spec §3/§4.6). Pure and idempotent: never mutates
/// the scope arena, always returns the same `Type` for the same
/// `(expr, scope)` pair. Errors ride along in `Type::Error` rather than
/// being reported as a side effect, so a malformed subexpression's
/// diagnostics compose correctly through the rest of the expression instead
/// of being duplicated or dropped; callers unpack them into the top-level
/// diagnostic list exactly once (spec §7).
pub fn typeof_expr(expr: &Expr, scope: ScopeId, arena: &ScopeArena) -> Type {
    match &expr.kind {
        ExprKind::IntLit(_) => Type::Int,
        ExprKind::DoubleLit(_) => Type::Double,
        ExprKind::BoolLit(_) => Type::Bool,
        ExprKind::StringLit(_) => Type::String,
        ExprKind::NullLit => Type::Null,
        ExprKind::ReadInteger => Type::Int,
        ExprKind::ReadLine => Type::String,
        ExprKind::This => match arena.get(scope, "this") {
            Some(TypeAnnotation::Variable { ty, .. }) => ty.clone(),
            _ => err("'this' is not valid outside a class's scope".to_string(), &expr.pos),
        },
        ExprKind::Ident(name) => match arena.get(scope, name) {
            Some(TypeAnnotation::Variable { ty, .. }) => ty.clone(),
            Some(_) => err(format!("'{name}' is not a variable"), &expr.pos),
            None => err(format!("no declaration found for variable '{name}'"), &expr.pos),
        },
        ExprKind::New(name) => match arena.get(scope, name) {
            Some(TypeAnnotation::Class { .. }) => Type::Named(name.clone()),
            _ => err(format!("no declaration found for class '{name}'"), &expr.pos),
        },
        ExprKind::Field { base, field, field_pos } => typeof_field(base, field, field_pos, scope, arena),
        ExprKind::Call { base, method, method_pos, args } => {
            typeof_call(base.as_deref(), method, method_pos, args, scope, arena)
        }
        ExprKind::NewArray { size, elem_type } => typeof_new_array(size, elem_type, scope, arena),
        ExprKind::ArrayAccess { array, index } => typeof_array_access(array, index, scope, arena),
        ExprKind::Assign { lhs, rhs } => typeof_assign(lhs, rhs, &expr.pos, scope, arena),
        ExprKind::Compound { op, left, right } => {
            typeof_compound(*op, left.as_deref(), right, &expr.pos, scope, arena)
        }
    }
}

fn err(message: String, pos: &Position) -> Type {
    Type::Error(vec![Diagnostic::type_error(message, pos.clone())])
}

/// The scope whose local table holds a class/interface type's members --
/// `None` for any type without member access (arrays, primitives, etc.).
fn member_scope(ty: &Type, scope: ScopeId, arena: &ScopeArena) -> Option<ScopeId> {
    match ty {
        Type::Named(name) => match arena.get(scope, name) {
            Some(ann) => ann.as_class_scope().or_else(|| ann.as_interface_scope()),
            None => None,
        },
        _ => None,
    }
}

fn typeof_field(base: &Expr, field: &str, field_pos: &Position, scope: ScopeId, arena: &ScopeArena) -> Type {
    let base_ty = typeof_expr(base, scope, arena);
    if let Type::Error(d) = base_ty {
        return Type::Error(d);
    }
    match member_scope(&base_ty, scope, arena) {
        Some(target) => match arena.get(target, field) {
            Some(TypeAnnotation::Variable { ty, .. }) => ty.clone(),
            Some(_) => err(format!("'{field}' is not a field"), field_pos),
            None => err(
                format!("no declaration found for field '{field}' in class '{base_ty}'"),
                field_pos,
            ),
        },
        None => err(format!("'{base_ty}' does not have fields"), field_pos),
    }
}

fn typeof_call(
    base: Option<&Expr>,
    method: &str,
    method_pos: &Position,
    args: &[Expr],
    scope: ScopeId,
    arena: &ScopeArena,
) -> Type {
    let arg_tys: Vec<Type> = args.iter().map(|a| typeof_expr(a, scope, arena)).collect();
    if let Some(Type::Error(d)) = arg_tys.iter().find(|t| t.is_error()) {
        return Type::Error(d.clone());
    }

    let method_ann = match base {
        None => arena.get(scope, method).cloned(),
        Some(b) => {
            let base_ty = typeof_expr(b, scope, arena);
            if let Type::Error(d) = base_ty {
                return Type::Error(d);
            }
            match member_scope(&base_ty, scope, arena) {
                Some(target) => arena.get(target, method).cloned(),
                None => None,
            }
        }
    };

    match method_ann {
        Some(TypeAnnotation::Method { return_ty, formal_tys, .. }) => {
            if formal_tys.len() != arg_tys.len() {
                return err(
                    format!(
                        "function '{method}' expects {} argument(s) but {} given",
                        formal_tys.len(),
                        arg_tys.len()
                    ),
                    method_pos,
                );
            }
            for (i, (formal, given)) in formal_tys.iter().zip(arg_tys.iter()).enumerate() {
                if !formal.matches(given) {
                    return err(
                        format!("argument {}: {given} given, {formal} expected", i + 1),
                        method_pos,
                    );
                }
            }
            return_ty
        }
        _ => err(format!("no declaration found for function '{method}'"), method_pos),
    }
}

fn typeof_new_array(size: &Expr, elem_type: &TypeNode, scope: ScopeId, arena: &ScopeArena) -> Type {
    let mut diags = Vec::new();
    match typeof_expr(size, scope, arena) {
        Type::Error(inner) => diags.extend(inner),
        Type::Int => {}
        other => diags.push(Diagnostic::type_error(
            format!("size for NewArray must be an integer, given '{other}'"),
            size.pos.clone(),
        )),
    }
    let elem = type_node_to_type(elem_type);
    diags.extend(check_type_exists(arena, scope, &elem_type.pos, &elem, "class"));
    if diags.is_empty() {
        Type::Array(Box::new(elem))
    } else {
        Type::Error(diags)
    }
}

fn typeof_array_access(array: &Expr, index: &Expr, scope: ScopeId, arena: &ScopeArena) -> Type {
    let array_ty = typeof_expr(array, scope, arena);
    if let Type::Error(d) = array_ty {
        return Type::Error(d);
    }
    let mut diags = Vec::new();
    match typeof_expr(index, scope, arena) {
        Type::Error(inner) => diags.extend(inner),
        Type::Int => {}
        other => diags.push(Diagnostic::type_error(
            format!("array subscript must be an integer, given '{other}'"),
            index.pos.clone(),
        )),
    }
    let elem = match &array_ty {
        Type::Array(e) => Some((**e).clone()),
        other => {
            diags.push(Diagnostic::type_error(
                format!("[] can only be applied to arrays, not '{other}'"),
                array.pos.clone(),
            ));
            None
        }
    };
    match (diags.is_empty(), elem) {
        (true, Some(e)) => e,
        _ => Type::Error(diags),
    }
}

fn typeof_assign(lhs: &Expr, rhs: &Expr, pos: &Position, scope: ScopeId, arena: &ScopeArena) -> Type {
    let lhs_ty = typeof_expr(lhs, scope, arena);
    if let Type::Error(d) = lhs_ty {
        return Type::Error(d);
    }
    let rhs_ty = typeof_expr(rhs, scope, arena);
    if let Type::Error(d) = rhs_ty {
        return Type::Error(d);
    }
    if lhs_ty.matches(&rhs_ty) {
        lhs_ty
    } else {
        err(format!("incompatible operands: {lhs_ty} = {rhs_ty}"), pos)
    }
}

fn typeof_compound(
    op: BinOp,
    left: Option<&Expr>,
    right: &Expr,
    pos: &Position,
    scope: ScopeId,
    arena: &ScopeArena,
) -> Type {
    let right_ty = typeof_expr(right, scope, arena);
    match op {
        BinOp::Neg => match right_ty {
            Type::Error(d) => Type::Error(d),
            ref t if t.is_numeric() => right_ty.clone(),
            other => err(format!("incompatible operand: -{other}"), pos),
        },
        BinOp::Not => match right_ty {
            Type::Error(d) => Type::Error(d),
            Type::Bool => Type::Bool,
            other => err(format!("incompatible operand: !{other}"), pos),
        },
        _ => {
            // Every non-unary `Compound` carries a left operand -- see
            // `decaf-parser`'s `binop` helper, which only omits `left` for
            // `Neg`/`Not`.
            let left_expr = left.expect("binary operator missing left operand");
            let left_ty = typeof_expr(left_expr, scope, arena);
            if let Type::Error(d) = left_ty {
                return Type::Error(d);
            }
            if let Type::Error(d) = right_ty {
                return Type::Error(d);
            }
            typeof_binary(op, left_ty, right_ty, pos)
        }
    }
}

fn typeof_binary(op: BinOp, left_ty: Type, right_ty: Type, pos: &Position) -> Type {
    let sym = bin_op_symbol(op);
    match op {
        BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod => {
            if left_ty.is_numeric() && right_ty.is_numeric() {
                if matches!(left_ty, Type::Double) || matches!(right_ty, Type::Double) {
                    Type::Double
                } else {
                    Type::Int
                }
            } else {
                err(format!("incompatible operands: {left_ty} {sym} {right_ty}"), pos)
            }
        }
        BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => {
            if left_ty.is_numeric() && right_ty.is_numeric() {
                Type::Bool
            } else {
                err(format!("incompatible operands: {left_ty} {sym} {right_ty}"), pos)
            }
        }
        BinOp::Eq | BinOp::Ne => {
            if left_ty.matches(&right_ty) {
                Type::Bool
            } else {
                err(format!("incompatible operands: {left_ty} {sym} {right_ty}"), pos)
            }
        }
        BinOp::And | BinOp::Or => {
            if matches!(left_ty, Type::Bool) && matches!(right_ty, Type::Bool) {
                Type::Bool
            } else {
                err(format!("incompatible operands: {left_ty} {sym} {right_ty}"), pos)
            }
        }
        BinOp::Neg | BinOp::Not => unreachable!("unary ops handled in typeof_compound"),
    }
}

fn bin_op_symbol(op: BinOp) -> &'static str {
    match op {
        BinOp::Add => "+",
        BinOp::Sub => "-",
        BinOp::Mul => "*",
        BinOp::Div => "/",
        BinOp::Mod => "%",
        BinOp::Lt => "<",
        BinOp::Le => "<=",
        BinOp::Gt => ">",
        BinOp::Ge => ">=",
        BinOp::Eq => "==",
        BinOp::Ne => "!=",
        BinOp::And => "&&",
        BinOp::Or => "||",
        BinOp::Neg => "-",
        BinOp::Not => "!",
    }
}

pub(crate) fn type_node_to_type(t: &TypeNode) -> Type {
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

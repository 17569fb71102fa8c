//! C6: the inheritance linker. Third pass -- re-parents each class's scope
//! under its base class's scope so inherited members resolve through the
//! fork-table chain automatically (spec §4.4).

use decaf_parser::ast::{Decl, Program};

use crate::diagnostics::Diagnostic;
use crate::scope::ScopeArena;
use crate::scope::ScopeId;

pub fn link(program: &Program, arena: &mut ScopeArena) -> Vec<Diagnostic> {
    let mut diags = Vec::new();
    for decl in &program.decls {
        let Decl::Class(c) = decl else { continue };
        let Some(base) = &c.extends else { continue };
        let Some(c_scope) = arena.scope_of(c.id) else {
            continue;
        };

        // §4.4 step 1/2: `locateAnywhere` climbs to the root, then DFS's
        // for a scope whose *local* table binds the name to a class.
        if let Some(base_scope) = locate_class_scope(arena, c_scope, &base.name) {
            if let Err(diag) = arena.reparent(&c.name, c_scope, base_scope, c.pos.clone()) {
                diags.push(diag);
            }
        }
        // A base name that never resolves to a class scope is left
        // unlinked here; §4.5's `checkTypeExists` reports the missing
        // type separately.
    }
    diags
}

fn root_of(arena: &ScopeArena, mut scope: ScopeId) -> ScopeId {
    while let Some(parent) = arena.parent_of(scope) {
        scope = parent;
    }
    scope
}

fn locate_class_scope(arena: &ScopeArena, from: ScopeId, name: &str) -> Option<ScopeId> {
    let root = root_of(arena, from);
    locate_class_scope_dfs(arena, root, name)
}

fn locate_class_scope_dfs(arena: &ScopeArena, node: ScopeId, name: &str) -> Option<ScopeId> {
    if let Some(ann) = arena.get_local(node, name) {
        if let Some(class_scope) = ann.as_class_scope() {
            return Some(class_scope);
        }
    }
    for &child in arena.children_of(node) {
        if let Some(found) = locate_class_scope_dfs(arena, child, name) {
            return Some(found);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::collect;
    use crate::decorator::decorate;
    use decaf_parser::parse;

    fn run(src: &str) -> (ScopeArena, Vec<Diagnostic>) {
        let (program, errors) = parse(src);
        assert!(errors.is_empty(), "parse errors: {errors:?}");
        let (mut arena, root) = ScopeArena::new();
        decorate(&program, &mut arena, root);
        collect(&program, &mut arena).expect("no internal error");
        let diags = link(&program, &mut arena);
        (arena, diags)
    }

    #[test]
    fn derived_class_sees_base_member_after_linking() {
        let (arena, diags) = run("class A { int f; } class B extends A { }");
        assert!(diags.is_empty());
        let root = ScopeId(0);
        let b_ann = arena.get_local(root, "B").unwrap();
        let b_scope = b_ann.as_class_scope().unwrap();
        assert!(arena.chain_contains(b_scope, "f"));
    }

    #[test]
    fn self_extends_yields_self_reparent_diagnostic() {
        let (_, diags) = run("class Q extends Q { }");
        assert_eq!(diags.len(), 1);
        assert_eq!(
            diags[0].kind,
            crate::diagnostics::DiagnosticKind::IllegalSelfReparent
        );
    }
}

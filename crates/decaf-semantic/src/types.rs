//! The type model (C3): `Type`, `TypeAnnotation`, and their structural
//! `matches` relations, including the one implicit numeric widening rule
//! spec §4.8 allows (`int` -> `double`).

use std::fmt;

use decaf_common::Position;
use decaf_parser::ast::{TypeKind, TypeNode};

use crate::diagnostics::Diagnostic;
use crate::scope::ScopeId;

#[derive(Debug, Clone)]
pub enum Type {
    Void,
    Int,
    Double,
    Bool,
    String,
    Null,
    Named(String),
    Array(Box<Type>),
    Undeclared,
    /// Carries the diagnostics that produced it, so a malformed
    /// subexpression's errors ride along through further composition
    /// instead of being lost or re-reported. Consumers unpack these into
    /// the top-level diagnostic list exactly once (spec §7).
    Error(Vec<Diagnostic>),
}

impl Type {
    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Int | Type::Double)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Type::Error(_))
    }

    /// Structural equality/compatibility per spec §4.8: equal types match;
    /// `int` and `double` match each other in either position (the single
    /// implicit widening rule); an `ErrorType` matches anything so a
    /// already-reported mismatch does not cascade into a second diagnostic
    /// at every site that consults the erroneous value's type.
    pub fn matches(&self, other: &Type) -> bool {
        match (self, other) {
            (Type::Error(_), _) | (_, Type::Error(_)) => true,
            (Type::Int, Type::Double) | (Type::Double, Type::Int) => true,
            (Type::Void, Type::Void)
            | (Type::Int, Type::Int)
            | (Type::Double, Type::Double)
            | (Type::Bool, Type::Bool)
            | (Type::String, Type::String)
            | (Type::Null, Type::Null)
            | (Type::Undeclared, Type::Undeclared) => true,
            (Type::Named(a), Type::Named(b)) => a == b,
            (Type::Array(a), Type::Array(b)) => a.matches(b),
            // null is assignable to any reference type (spec §4.6, ReturnStmt rule).
            (Type::Null, Type::Named(_)) | (Type::Null, Type::Array(_)) => true,
            (Type::Named(_), Type::Null) | (Type::Array(_), Type::Null) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Void => write!(f, "void"),
            Type::Int => write!(f, "int"),
            Type::Double => write!(f, "double"),
            Type::Bool => write!(f, "bool"),
            Type::String => write!(f, "string"),
            Type::Null => write!(f, "null"),
            Type::Named(n) => write!(f, "{n}"),
            Type::Array(e) => write!(f, "{e}[]"),
            Type::Undeclared => write!(f, "Undeclared"),
            Type::Error(_) => write!(f, "error"),
        }
    }
}

/// Symbol-table value: what a name in a fork table is bound to.
#[derive(Debug, Clone)]
pub enum TypeAnnotation {
    Variable {
        name: String,
        ty: Type,
        pos: Position,
    },
    Method {
        name: String,
        return_ty: Type,
        formal_tys: Vec<Type>,
        pos: Position,
    },
    Class {
        name: String,
        extends: Option<String>,
        implements: Vec<String>,
        class_scope: ScopeId,
        pos: Position,
    },
    Interface {
        name: String,
        interface_scope: ScopeId,
        pos: Position,
    },
}

impl TypeAnnotation {
    pub fn name(&self) -> &str {
        match self {
            TypeAnnotation::Variable { name, .. } => name,
            TypeAnnotation::Method { name, .. } => name,
            TypeAnnotation::Class { name, .. } => name,
            TypeAnnotation::Interface { name, .. } => name,
        }
    }

    pub fn pos(&self) -> &Position {
        match self {
            TypeAnnotation::Variable { pos, .. } => pos,
            TypeAnnotation::Method { pos, .. } => pos,
            TypeAnnotation::Class { pos, .. } => pos,
            TypeAnnotation::Interface { pos, .. } => pos,
        }
    }

    /// Structural `matches` per spec §3: variables match iff their types
    /// match (with widening); methods match iff return types match and
    /// formal types pairwise match; class/interface annotations match iff
    /// their named type is equal.
    pub fn matches(&self, other: &TypeAnnotation) -> bool {
        match (self, other) {
            (
                TypeAnnotation::Variable { ty: a, .. },
                TypeAnnotation::Variable { ty: b, .. },
            ) => a.matches(b),
            (
                TypeAnnotation::Method {
                    return_ty: ra,
                    formal_tys: fa,
                    ..
                },
                TypeAnnotation::Method {
                    return_ty: rb,
                    formal_tys: fb,
                    ..
                },
            ) => {
                ra.matches(rb)
                    && fa.len() == fb.len()
                    && fa.iter().zip(fb.iter()).all(|(x, y)| x.matches(y))
            }
            (TypeAnnotation::Class { name: a, .. }, TypeAnnotation::Class { name: b, .. }) => {
                a == b
            }
            (
                TypeAnnotation::Interface { name: a, .. },
                TypeAnnotation::Interface { name: b, .. },
            ) => a == b,
            _ => false,
        }
    }

    pub fn as_class_scope(&self) -> Option<ScopeId> {
        match self {
            TypeAnnotation::Class { class_scope, .. } => Some(*class_scope),
            _ => None,
        }
    }

    pub fn as_interface_scope(&self) -> Option<ScopeId> {
        match self {
            TypeAnnotation::Interface {
                interface_scope, ..
            } => Some(*interface_scope),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_and_double_match_either_order() {
        assert!(Type::Int.matches(&Type::Double));
        assert!(Type::Double.matches(&Type::Int));
    }

    #[test]
    fn bool_and_int_do_not_match() {
        assert!(!Type::Bool.matches(&Type::Int));
    }

    #[test]
    fn named_types_match_only_same_name() {
        assert!(Type::Named("A".into()).matches(&Type::Named("A".into())));
        assert!(!Type::Named("A".into()).matches(&Type::Named("B".into())));
    }

    #[test]
    fn null_matches_any_reference_type() {
        assert!(Type::Null.matches(&Type::Named("A".into())));
        assert!(Type::Array(Box::new(Type::Int)).matches(&Type::Null));
    }

    #[test]
    fn error_type_matches_anything() {
        assert!(Type::Error(vec![]).matches(&Type::Bool));
        assert!(Type::Int.matches(&Type::Error(vec![])));
    }
}

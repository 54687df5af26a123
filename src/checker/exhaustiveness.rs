//! Exhaustiveness and reachability checking for match expressions.
//!
//! Coverage is decided per type: every constructor must be named by some
//! pattern, and the sub-patterns collected under a constructor's field must
//! in turn cover the field's type. Recursion only descends into sub-patterns
//! that were actually written, so recursive types terminate.

use super::patterns::Pat;
use super::registry::{CtorId, FieldType, Registry, TypeId};
use std::fmt;

/// A value shape not covered by any pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Witness {
    /// Any value of the type
    Any,
    Ctor {
        name: String,
        arg: Option<Box<Witness>>,
    },
}

impl fmt::Display for Witness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Witness::Any => write!(f, "_"),
            Witness::Ctor { name, arg: None } => write!(f, "{}", name),
            Witness::Ctor {
                name,
                arg: Some(arg),
            } => write!(f, "{}({})", name, arg),
        }
    }
}

/// Whether `patterns` cover every value of `ty`
pub fn is_exhaustive(registry: &Registry, ty: TypeId, patterns: &[&Pat]) -> bool {
    missing_patterns(registry, ty, patterns).is_empty()
}

/// Witnesses for every uncovered case, in constructor declaration order
pub fn missing_patterns(registry: &Registry, ty: TypeId, patterns: &[&Pat]) -> Vec<Witness> {
    if patterns.iter().any(|p| matches!(p, Pat::Wildcard)) {
        return Vec::new();
    }

    let mut missing = Vec::new();
    for &ctor in &registry.type_def(ty).ctors {
        let def = registry.ctor(ctor);
        let subs = sub_patterns(patterns, ctor);
        if subs.is_empty() && !patterns.iter().any(|p| names_ctor(p, ctor)) {
            missing.push(Witness::Ctor {
                name: def.name.clone(),
                arg: def.field.as_ref().map(|_| Box::new(Witness::Any)),
            });
            continue;
        }

        match &def.field {
            Some(FieldType::Resolved(field)) => {
                for witness in missing_patterns(registry, *field, &subs) {
                    missing.push(Witness::Ctor {
                        name: def.name.clone(),
                        arg: Some(Box::new(witness)),
                    });
                }
            }
            // Nullary constructors are covered by being named; a poisoned
            // field has no constructors to enumerate
            Some(FieldType::Poisoned(_)) | None => {}
        }
    }
    missing
}

/// Whether `pat` matches some value not matched by any of `previous`.
/// An arm for which this is false can never be reached.
pub fn is_pattern_useful(registry: &Registry, ty: TypeId, previous: &[&Pat], pat: &Pat) -> bool {
    if previous.iter().any(|p| matches!(p, Pat::Wildcard)) {
        return false;
    }

    match pat {
        Pat::Wildcard => !is_exhaustive(registry, ty, previous),
        Pat::Ctor { ctor, arg } => {
            if !previous.iter().any(|p| names_ctor(p, *ctor)) {
                return true;
            }
            match (&registry.ctor(*ctor).field, arg) {
                (Some(FieldType::Resolved(field)), Some(arg)) => {
                    is_pattern_useful(registry, *field, &sub_patterns(previous, *ctor), arg)
                }
                _ => false,
            }
        }
    }
}

fn names_ctor(pat: &Pat, ctor: CtorId) -> bool {
    matches!(pat, Pat::Ctor { ctor: c, .. } if *c == ctor)
}

/// Field sub-patterns of every pattern naming `ctor`
fn sub_patterns<'p>(patterns: &[&'p Pat], ctor: CtorId) -> Vec<&'p Pat> {
    patterns
        .iter()
        .copied()
        .filter_map(|p| match p {
            Pat::Ctor { ctor: c, arg } if *c == ctor => arg.as_deref(),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
#[path = "exhaustiveness_tests.rs"]
mod tests;

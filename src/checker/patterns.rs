//! Pattern checking against declared types.
//!
//! Resolves the scrutinee of a match to a type, then resolves every arm
//! pattern against the type expected at its nesting level. Arms that fail to
//! resolve are reported and left out of the coverage analysis.

use super::registry::{CtorId, FieldType, Registry, TypeId};
use crate::diagnostics::error_codes::types;
use crate::diagnostics::{Diagnostic, DiagnosticBag, Note, Span};
use crate::parser::ast::{Expr, MatchArm, MatchExpr, Pattern};
use std::fmt;

/// A pattern bound to registry entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pat {
    Wildcard,
    /// `arg` is present exactly when the constructor declares a field
    Ctor { ctor: CtorId, arg: Option<Box<Pat>> },
}

impl Pat {
    pub fn ctor(ctor: CtorId, arg: Option<Pat>) -> Self {
        Pat::Ctor {
            ctor,
            arg: arg.map(Box::new),
        }
    }

    /// Render the pattern with constructor names from the registry
    pub fn display<'r>(&'r self, registry: &'r Registry) -> PatDisplay<'r> {
        PatDisplay { pat: self, registry }
    }
}

pub struct PatDisplay<'r> {
    pat: &'r Pat,
    registry: &'r Registry,
}

impl fmt::Display for PatDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.pat {
            Pat::Wildcard => write!(f, "_"),
            Pat::Ctor { ctor, arg: None } => write!(f, "{}", self.registry.ctor(*ctor).name),
            Pat::Ctor {
                ctor,
                arg: Some(arg),
            } => write!(
                f,
                "{}({})",
                self.registry.ctor(*ctor).name,
                arg.display(self.registry)
            ),
        }
    }
}

/// An arm whose pattern resolved
#[derive(Debug, Clone)]
pub struct ResolvedArm<'a> {
    pub arm: &'a MatchArm,
    pub pat: Pat,
}

/// A match whose scrutinee resolved to a type
#[derive(Debug, Clone)]
pub struct CheckedMatch<'a> {
    pub expr: &'a MatchExpr,
    pub ty: TypeId,
    /// Resolved arms in source order; failed arms are absent
    pub arms: Vec<ResolvedArm<'a>>,
}

/// Check one match expression. Returns `None` when the scrutinee's type
/// cannot be determined, in which case the arms are not looked at.
pub fn check_match<'a>(
    expr: &'a MatchExpr,
    registry: &Registry,
) -> (Option<CheckedMatch<'a>>, DiagnosticBag) {
    let mut checker = PatternChecker {
        registry,
        diagnostics: DiagnosticBag::new(),
    };

    let checked = checker.resolve_scrutinee(&expr.scrutinee).map(|ty| {
        let arms = expr
            .arms
            .iter()
            .filter_map(|arm| {
                checker
                    .resolve_pattern(&arm.pattern, ty)
                    .map(|pat| ResolvedArm { arm, pat })
            })
            .collect();
        CheckedMatch { expr, ty, arms }
    });

    (checked, checker.diagnostics)
}

struct PatternChecker<'r> {
    registry: &'r Registry,
    diagnostics: DiagnosticBag,
}

impl PatternChecker<'_> {
    fn resolve_scrutinee(&mut self, expr: &Expr) -> Option<TypeId> {
        let candidates = self.registry.ctors_named(&expr.name.name);
        if candidates.is_empty() {
            self.diagnostics.push(
                Diagnostic::error(types::UNKNOWN_IDENTIFIER)
                    .message(format!("Unknown identifier `{}`", expr.name.name))
                    .span(expr.name.span.clone())
                    .build(),
            );
            return None;
        }

        let written = expr.args.len();
        let same_arity: Vec<CtorId> = candidates
            .iter()
            .copied()
            .filter(|&c| self.registry.ctor(c).arity() == written)
            .collect();
        let chosen = if same_arity.is_empty() {
            candidates.to_vec()
        } else {
            same_arity
        };

        let mut owners: Vec<TypeId> = chosen.iter().map(|&c| self.registry.ctor(c).owner).collect();
        owners.sort();
        owners.dedup();
        if owners.len() > 1 {
            let names: Vec<String> = owners
                .iter()
                .map(|&ty| format!("`{}`", self.registry.type_def(ty).name))
                .collect();
            let mut diag = Diagnostic::error(types::AMBIGUOUS_CONSTRUCTOR)
                .message(format!(
                    "Ambiguous constructor `{}`: declared in {}",
                    expr.name.name,
                    names.join(" and ")
                ))
                .span(expr.name.span.clone());
            for &ctor in &chosen {
                diag = diag.note(
                    Note::new(format!("declared in `{}`", self.registry.owner_name(ctor)))
                        .with_span(self.registry.ctor(ctor).span.clone()),
                );
            }
            self.diagnostics.push(diag.build());
            return None;
        }

        let ctor = chosen[0];
        self.check_expr_args(expr, ctor);
        Some(self.registry.ctor(ctor).owner)
    }

    /// Check a constructor expression against the type expected for it
    fn check_expr(&mut self, expr: &Expr, expected: TypeId) {
        match self.registry.ctor_of(expected, &expr.name.name) {
            Some(ctor) => self.check_expr_args(expr, ctor),
            None => self.report_unresolved(
                &expr.name.name,
                &expr.name.span,
                expected,
                types::UNKNOWN_IDENTIFIER,
                "identifier",
            ),
        }
    }

    fn check_expr_args(&mut self, expr: &Expr, ctor: CtorId) {
        let def = self.registry.ctor(ctor);
        if def.arity() != expr.args.len() {
            self.report_arity(&def.name, &expr.span, expr.args.len(), def.arity());
            return;
        }
        if let (Some(FieldType::Resolved(field)), Some(arg)) = (&def.field, expr.args.first()) {
            self.check_expr(arg, *field);
        }
    }

    fn resolve_pattern(&mut self, pattern: &Pattern, expected: TypeId) -> Option<Pat> {
        let (span, name, args) = match pattern {
            Pattern::Wildcard { .. } => return Some(Pat::Wildcard),
            Pattern::Constructor { span, name, args } => (span, name, args),
        };

        let Some(ctor) = self.registry.ctor_of(expected, &name.name) else {
            self.report_unresolved(
                &name.name,
                &name.span,
                expected,
                types::UNKNOWN_CONSTRUCTOR,
                "constructor",
            );
            return None;
        };

        let def = self.registry.ctor(ctor);
        if def.arity() != args.len() {
            self.report_arity(&def.name, span, args.len(), def.arity());
            return None;
        }

        let arg = match (&def.field, args.first()) {
            (Some(FieldType::Resolved(field)), Some(sub)) => {
                Some(self.resolve_pattern(sub, *field)?)
            }
            // Nothing to check against; the earlier unknown-type error covers it
            (Some(FieldType::Poisoned(_)), Some(_)) => Some(Pat::Wildcard),
            _ => None,
        };
        Some(Pat::ctor(ctor, arg))
    }

    /// `name` is not a constructor of `expected`: either it belongs to some
    /// other type or it does not exist at all
    fn report_unresolved(
        &mut self,
        name: &str,
        span: &Span,
        expected: TypeId,
        unknown_code: &str,
        what: &str,
    ) {
        let expected_name = &self.registry.type_def(expected).name;
        let diag = match self.registry.ctors_named(name).first() {
            Some(&other) => Diagnostic::error(types::WRONG_CONSTRUCTOR_TYPE)
                .message(format!(
                    "Mismatched types: `{}` is a constructor of `{}`, expected `{}`",
                    name,
                    self.registry.owner_name(other),
                    expected_name
                ))
                .span(span.clone())
                .note(
                    Note::new(format!("`{}` declared here", name))
                        .with_span(self.registry.ctor(other).span.clone()),
                ),
            None => Diagnostic::error(unknown_code)
                .message(format!("Unknown {} `{}`", what, name))
                .span(span.clone())
                .note(Note::new(format!(
                    "`{}` has no constructor named `{}`",
                    expected_name, name
                ))),
        };
        self.diagnostics.push(diag.build());
    }

    fn report_arity(&mut self, name: &str, span: &Span, given: usize, expected: usize) {
        self.diagnostics.push(
            Diagnostic::error(types::WRONG_ARGUMENT_COUNT)
                .message(format!(
                    "Wrong number of arguments for `{}` ({} → {})",
                    name, given, expected
                ))
                .span(span.clone())
                .note(Note::new(format!(
                    "`{}` takes {} argument{}",
                    name,
                    expected,
                    if expected == 1 { "" } else { "s" }
                )))
                .build(),
        );
    }
}

#[cfg(test)]
#[path = "patterns_tests.rs"]
mod tests;

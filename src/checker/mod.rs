//! Semantic checks for pmxc programs
//!
//! Runs the type registry pass over all declarations, then checks every
//! match expression: scrutinee resolution, arm patterns, reachability (when
//! enabled) and exhaustiveness.

pub mod exhaustiveness;
pub mod patterns;
pub mod registry;

pub use exhaustiveness::{is_exhaustive, is_pattern_useful, missing_patterns, Witness};
pub use patterns::{check_match, CheckedMatch, Pat, ResolvedArm};
pub use registry::{CtorId, FieldType, Registry, TypeId};

use crate::diagnostics::error_codes::{types, warnings};
use crate::diagnostics::{Diagnostic, DiagnosticBag, Edit, Note, Suggestion};
use crate::parser::ast::Program;
use serde::{Deserialize, Serialize};

/// How arms already covered by earlier arms are reported
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedundantArms {
    /// Not reported
    #[default]
    Allow,
    /// Reported as a warning
    Warn,
}

/// Options for the semantic checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOptions {
    pub redundant_arms: RedundantArms,
    /// Witnesses listed in a non-exhaustive match diagnostic
    pub max_witnesses: usize,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            redundant_arms: RedundantArms::Allow,
            max_witnesses: 3,
        }
    }
}

/// Check a parsed program. Declaration diagnostics come first in source
/// order, then the diagnostics of each match in source order.
pub fn check_program(program: &Program, options: &CheckOptions) -> DiagnosticBag {
    let (registry, mut diagnostics) = Registry::build(program);

    for expr in program.matches() {
        let (checked, mut match_diagnostics) = check_match(expr, &registry);
        let Some(checked) = checked else {
            tracing::trace!(line = expr.span.start_line, "skipping match with unresolved scrutinee");
            diagnostics.merge(match_diagnostics);
            continue;
        };

        if options.redundant_arms == RedundantArms::Warn {
            check_reachability(&registry, &checked, &mut match_diagnostics);
            match_diagnostics.sort_by_position();
        }
        diagnostics.merge(match_diagnostics);

        let pats: Vec<&Pat> = checked.arms.iter().map(|arm| &arm.pat).collect();
        let missing = missing_patterns(&registry, checked.ty, &pats);
        tracing::trace!(
            line = expr.span.start_line,
            ty = %registry.type_def(checked.ty).name,
            arms = pats.len(),
            missing = missing.len(),
            "checked match"
        );
        if !missing.is_empty() {
            diagnostics.push(non_exhaustive(&registry, &checked, &missing, options));
        }
    }

    tracing::debug!(
        matches = program.matches().count(),
        errors = diagnostics.error_count(),
        warnings = diagnostics.warning_count(),
        "checked program"
    );
    diagnostics
}

fn check_reachability(registry: &Registry, checked: &CheckedMatch, diagnostics: &mut DiagnosticBag) {
    let pats: Vec<&Pat> = checked.arms.iter().map(|arm| &arm.pat).collect();
    for (i, arm) in checked.arms.iter().enumerate() {
        if is_pattern_useful(registry, checked.ty, &pats[..i], &arm.pat) {
            continue;
        }
        diagnostics.push(
            Diagnostic::warning(warnings::UNREACHABLE_ARM)
                .message(format!(
                    "Unreachable pattern `{}`: already covered by earlier arms",
                    arm.pat.display(registry)
                ))
                .span(arm.arm.pattern.span().clone())
                .suggestion(
                    Suggestion::new("Remove this arm").with_edit(Edit::new(arm.arm.span.clone(), "")),
                )
                .build(),
        );
    }
}

fn non_exhaustive(
    registry: &Registry,
    checked: &CheckedMatch,
    missing: &[Witness],
    options: &CheckOptions,
) -> Diagnostic {
    let shown: Vec<String> = missing
        .iter()
        .take(options.max_witnesses)
        .map(|w| format!("`{}`", w))
        .collect();
    let hidden = missing.len() - shown.len();

    let message = if shown.is_empty() {
        format!("Non-exhaustive match: {} pattern(s) not covered", missing.len())
    } else if hidden > 0 {
        format!(
            "Non-exhaustive match: missing pattern(s) {} and {} more",
            shown.join(", "),
            hidden
        )
    } else {
        format!("Non-exhaustive match: missing pattern(s) {}", shown.join(", "))
    };

    let new_arms: String = missing.iter().map(|w| format!("    {} => {{}}\n", w)).collect();
    let expr = checked.expr;
    Diagnostic::error(types::NON_EXHAUSTIVE_MATCH)
        .message(message)
        .span(expr.keyword_span.clone())
        .note(
            Note::new(format!(
                "the matched value has type `{}`",
                registry.type_def(checked.ty).name
            ))
            .with_span(expr.scrutinee.span.clone()),
        )
        .suggestion(
            Suggestion::new("Add missing case(s)")
                .with_edit(Edit::new(expr.close_span.shrink_to_start(), new_arms)),
        )
        .build()
}

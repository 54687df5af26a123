//! pmxc: a pattern-matching exhaustiveness checker
//!
//! pmxc analyzes a small language of algebraic data types and `match`
//! expressions. It checks every arm pattern against the declared types and
//! reports matches that do not cover all values, with positioned diagnostics
//! suitable for editors and the command line.

pub mod cache;
pub mod checker;
pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod editor;
pub mod parser;

use checker::CheckOptions;
use diagnostics::DiagnosticBag;
use std::path::Path;

/// Parse and check a source text. Syntax diagnostics come first, followed by
/// the semantic diagnostics of everything that parsed.
pub fn validate_source(source: &str, path: &Path, options: &CheckOptions) -> DiagnosticBag {
    let (program, mut diagnostics) = parser::parse_source(source, path);
    diagnostics.merge(checker::check_program(&program, options));
    diagnostics
}

/// Re-export commonly used types
pub mod prelude {
    pub use crate::checker::{CheckOptions, RedundantArms};
    pub use crate::diagnostics::{Diagnostic, DiagnosticBag, Severity, Span};
    pub use crate::parser::ast::*;
    pub use crate::validate_source;
}

//! Handlers for the `pmxc explain` and `pmxc fix` subcommands.

use std::collections::HashSet;
use std::path::PathBuf;

use crate::diagnostics::{Diagnostic, Edit};

use super::{collect_source_files, load_config, read_source, CliError, Output};

pub(crate) fn run_fix(
    paths: &[PathBuf],
    only: Option<&str>,
    dry_run: bool,
    output: Output,
) -> Result<(), Box<dyn std::error::Error>> {
    // Parse --only filter into a set of codes
    let code_filter: Option<HashSet<&str>> = only.map(|codes| codes.split(',').map(str::trim).collect());

    let config = load_config(paths)?;
    let options = config.check_options();

    let mut total_fixes = 0;
    let mut files_fixed = 0;

    for file_path in collect_source_files(paths, &config)? {
        let source = read_source(&file_path)?;
        let diagnostics = crate::validate_source(&source, &file_path, &options);
        if diagnostics.diagnostics().iter().any(|d| d.code.starts_with("E0")) {
            // Spans of a file that did not parse are not trustworthy for edits
            tracing::debug!(file = %file_path.display(), "skipping file with syntax errors");
            continue;
        }

        let (fixed_source, fix_count) = apply_fixes(&source, diagnostics.diagnostics(), code_filter.as_ref());
        if fixed_source == source {
            continue;
        }
        total_fixes += fix_count;
        files_fixed += 1;

        if !dry_run {
            std::fs::write(&file_path, &fixed_source).map_err(|source| CliError::Write {
                path: file_path.clone(),
                source,
            })?;
        }

        if output.json {
            println!(
                "{}",
                serde_json::json!({
                    "file": file_path.display().to_string(),
                    "fixes": fix_count,
                    "applied": !dry_run,
                })
            );
        } else if !output.quiet {
            let verb = if dry_run { "Would fix" } else { "Fixed" };
            println!("{} {} issue(s) in {}", verb, fix_count, file_path.display());
        }
    }

    if output.json || output.quiet {
        return Ok(());
    }
    if dry_run {
        println!(
            "\nDry run: {} fix(es) would be applied across {} file(s)",
            total_fixes, files_fixed
        );
    } else if total_fixes > 0 {
        println!(
            "\nApplied {} fix(es) across {} file(s)",
            total_fixes, files_fixed
        );
    } else {
        println!("No auto-fixable issues found");
    }

    Ok(())
}

/// Apply the suggested edits of `diagnostics` to `source`. Returns the new
/// text and the number of edits applied.
pub(super) fn apply_fixes(
    source: &str,
    diagnostics: &[Diagnostic],
    code_filter: Option<&HashSet<&str>>,
) -> (String, usize) {
    let mut edits: Vec<&Edit> = diagnostics
        .iter()
        .filter(|d| code_filter.map_or(true, |filter| filter.contains(d.code.as_str())))
        .flat_map(|d| d.suggestions.iter().take(1))
        .flat_map(|s| s.edits.iter())
        .collect();

    // Apply from end to start so earlier offsets stay valid
    edits.sort_by(|a, b| b.span.start.cmp(&a.span.start).then(b.span.end.cmp(&a.span.end)));
    edits.dedup_by(|a, b| a.span.start == b.span.start && a.span.end == b.span.end);

    let mut fixed = source.to_string();
    let mut applied = 0;
    let mut limit = fixed.len();
    for edit in edits {
        // Skip edits overlapping one already applied
        if edit.span.end > limit || edit.span.start > edit.span.end {
            continue;
        }
        if !fixed.is_char_boundary(edit.span.start) || !fixed.is_char_boundary(edit.span.end) {
            continue;
        }
        fixed.replace_range(edit.span.start..edit.span.end, &edit.replacement);
        limit = edit.span.start;
        applied += 1;
    }
    (fixed, applied)
}

pub(crate) fn run_explain(code: &str) -> Result<(), Box<dyn std::error::Error>> {
    match get_error_explanation(code) {
        Some(text) => {
            println!("{}", text);
            Ok(())
        }
        None => {
            eprintln!("Valid codes:");
            eprintln!("  E0xxx  Syntax errors (E0001-E0012)");
            eprintln!("  E1xxx  Declaration and pattern errors (E1001-E1017)");
            eprintln!("  W0xxx  Warnings (W0003)");
            Err(CliError::UnknownCode(code.to_string()).into())
        }
    }
}

/// Get a detailed explanation for a diagnostic code.
pub(super) fn get_error_explanation(code: &str) -> Option<&'static str> {
    let explanation = match code {
        // Syntax errors
        "E0001" => {
            r#"E0001: Unexpected token

The parser found a token that does not fit the grammar at this point.
Parsing resumes at the next `enum` or `match`.

Example:
  match Unit {
    Unit {}        // expected `=>`, found `{`
  }

Fix: Add the missing punctuation or correct the syntax.
"#
        }
        "E0004" => {
            r#"E0004: Missing closing delimiter

A parenthesis or brace was opened but a different token was found where
it should close.

Example:
  match One {
    Two(True => {}  // expected `)`
  }

Fix: Add the matching `)` or `}`.
"#
        }
        "E0008" => {
            r#"E0008: Unexpected end of input

The file ended in the middle of a declaration, a match or an arm body.

Example:
  match Unit {
    Unit => {

Fix: Close every open block.
"#
        }
        "E0011" => {
            r#"E0011: Too many constructor fields

A constructor carries at most one field. Only the first one is kept.

Example:
  enum Pair { Both(Boolean, Boolean) }

Fix: Declare a separate type for the combination and use it as the
single field.
"#
        }
        "E0012" => {
            r#"E0012: Nesting too deep

A pattern or matched value nests constructor arguments more than 256
levels deep. The item is skipped and parsing resumes at the next `enum`
or `match`.

Example:
  match S(S(S(...(Z)...))) {}

Fix: Match on fewer levels at once and use `_` for the rest.
"#
        }

        // Declaration and pattern errors
        "E1001" => {
            r#"E1001: Constructor of the wrong type

A pattern names a constructor that belongs to a different type than the
value being matched at that position.

Example:
  enum Boolean { False, True }
  enum Digit { One, Two(Boolean) }
  match One {
    True => {}     // `True` is a Boolean, the value is a Digit
  }

Fix: Use a constructor of the matched type.
"#
        }
        "E1002" => {
            r#"E1002: Unknown identifier

The value being matched names a constructor that is not declared.

Example:
  match Nope {}

Fix: Declare the constructor or fix the spelling.
"#
        }
        "E1004" => {
            r#"E1004: Non-exhaustive match

The arms of a match do not cover every value of the matched type. The
message lists values that no arm matches. Nested constructor fields are
checked too: `Two(True)` alone does not cover `Two(False)`.

Example:
  enum Digit { One, Two(Boolean) }
  match One {
    One => {}
    Two(True) => {}
  }                // missing `Two(False)`

Fix: Add arms for the missing patterns or a `_` arm.

This error includes an auto-fix suggestion (`pmxc fix`).
"#
        }
        "E1005" => {
            r#"E1005: Duplicate constructor

A type declares the same constructor name twice. The second one is
ignored, apart from reporting an unknown field type (E1012).

Example:
  enum Boolean { True, False, True }

Fix: Remove or rename the duplicate.
"#
        }
        "E1007" => {
            r#"E1007: Wrong number of arguments

A constructor is used with a different number of arguments than it
declares. The message shows given -> expected. The arm is left out of
the exhaustiveness check.

Example:
  enum Digit { One, Two(Boolean) }
  match One {
    Two => {}          // (0 -> 1)
    One(True) => {}    // (1 -> 0)
  }

Fix: Pass exactly the declared field, or none for a constructor without
one.
"#
        }
        "E1011" => {
            r#"E1011: Duplicate type

Two enums share a name. The later declaration is ignored entirely,
though unknown field types in it are still reported (E1012).

Example:
  enum Unit { Unit }
  enum Unit { Other }

Fix: Rename one of the types.
"#
        }
        "E1012" => {
            r#"E1012: Unknown type

A constructor field names a type that is not declared. Types may be
declared in any order, so this is only reported when the name is not
declared anywhere in the file.

Example:
  enum Box { Full(Missing) }

Fix: Declare the type or fix the spelling.
"#
        }
        "E1016" => {
            r#"E1016: Unknown constructor

A pattern names a constructor that is not declared in any type.

Example:
  match True {
    Maybe => {}
  }

Fix: Use a declared constructor of the matched type.
"#
        }
        "E1017" => {
            r#"E1017: Ambiguous constructor

The value being matched names a constructor declared in several types,
so its type cannot be determined.

Example:
  enum Unit { Unit }
  enum Other { Unit }
  match Unit {}

Fix: Rename one of the constructors.
"#
        }

        // Warnings
        "W0003" => {
            r#"W0003: Unreachable arm

Every value this arm matches is already matched by earlier arms, so it
can never run. Only reported with `redundant_arms = "warn"` in the
`[check]` table of pmxc.toml.

Example:
  match True {
    True => {}
    False => {}
    _ => {}        // unreachable
  }

Fix: Remove the arm.

This warning includes an auto-fix suggestion (`pmxc fix`).
"#
        }
        _ => return None,
    };
    Some(explanation)
}

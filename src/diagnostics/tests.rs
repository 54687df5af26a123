use super::*;
use pretty_assertions::assert_eq;

fn span(start: usize, end: usize, line: usize, start_col: usize, end_col: usize) -> Span {
    Span::new(
        PathBuf::from("test.pmxc"),
        start,
        end,
        line,
        start_col,
        line,
        end_col,
    )
}

#[test]
fn test_diagnostic_json() {
    let diag = Diagnostic::error(types::NON_EXHAUSTIVE_MATCH)
        .message("Non-exhaustive match")
        .span(span(10, 20, 1, 11, 21))
        .build();

    let json = diag.to_json();
    assert!(json.contains("E1004"));
    assert!(json.contains("Non-exhaustive match"));
    assert!(json.contains("\"severity\":\"error\""));
}

#[test]
fn test_diagnostic_json_roundtrip() {
    let diag = Diagnostic::warning(warnings::UNREACHABLE_ARM)
        .message("Unreachable arm")
        .span(span(0, 4, 1, 1, 5))
        .note(Note::new("already covered"))
        .build();

    let parsed: Diagnostic = serde_json::from_str(&diag.to_json()).unwrap();
    assert_eq!(parsed, diag);
}

#[test]
fn test_span_merge() {
    let first = span(10, 20, 1, 11, 21);
    let second = Span::new(PathBuf::from("test.pmxc"), 15, 30, 1, 16, 2, 5);

    let merged = first.merge(&second);
    assert_eq!(merged.start, 10);
    assert_eq!(merged.end, 30);
    assert_eq!((merged.start_line, merged.start_col), (1, 11));
    assert_eq!((merged.end_line, merged.end_col), (2, 5));

    // Merging is symmetric
    assert_eq!(second.merge(&first), merged);
}

#[test]
fn test_span_shrink_to_start() {
    let s = Span::new(PathBuf::from("test.pmxc"), 4, 12, 1, 5, 2, 3).shrink_to_start();
    assert_eq!((s.start, s.end), (4, 4));
    assert_eq!((s.end_line, s.end_col), (1, 5));
}

#[test]
fn test_diagnostic_warning() {
    let diag = Diagnostic::warning(warnings::UNREACHABLE_ARM)
        .message("Unreachable arm")
        .build();
    assert!(!diag.is_error());
    assert_eq!(diag.severity, Severity::Warning);
}

#[test]
fn test_diagnostic_with_suggestion() {
    let diag = Diagnostic::error(types::NON_EXHAUSTIVE_MATCH)
        .message("Non-exhaustive match")
        .span(span(0, 5, 1, 1, 6))
        .suggestion(
            Suggestion::new("Add the missing arm")
                .with_edit(Edit::new(span(5, 5, 1, 6, 6), "False => {}")),
        )
        .build();

    let json = diag.to_json();
    assert!(json.contains("Add the missing arm"));
    assert!(json.contains("False => {}"));
}

#[test]
fn test_diagnostic_human_readable() {
    let diag = Diagnostic::error(types::UNKNOWN_CONSTRUCTOR)
        .message("Unknown constructor `Nope`")
        .span(span(6, 10, 1, 7, 11))
        .build();

    let output = diag.to_human_readable("match Nope {}");
    insta::assert_snapshot!(output, @r###"
    error[E1016]: Unknown constructor `Nope`
      --> test.pmxc:1:7
       |
      1 | match Nope {}
       |       ^^^^
    "###);
}

#[test]
fn test_human_readable_counts_utf16_columns() {
    // `あ` is one UTF-16 unit, so `X` starts at column 4.
    let diag = Diagnostic::error(types::UNKNOWN_TYPE)
        .message("Unknown type `X`")
        .span(Span::new(PathBuf::from("t.pmxc"), 5, 6, 1, 4, 1, 5))
        .build();

    let output = diag.to_human_readable("// X");
    assert!(output.ends_with("    ^\n"), "{output}");

    let output = diag.to_human_readable("(あ X");
    assert!(output.contains("|    ^"), "{output}");
}

#[test]
fn test_diagnostic_bag_operations() {
    let mut bag = DiagnosticBag::new();
    assert!(bag.is_empty());
    assert_eq!(bag.len(), 0);

    bag.push(Diagnostic::error(types::UNKNOWN_TYPE).message("error").build());
    bag.push(
        Diagnostic::warning(warnings::UNREACHABLE_ARM)
            .message("warning")
            .build(),
    );

    assert!(!bag.is_empty());
    assert_eq!(bag.len(), 2);
    assert!(bag.has_errors());
    assert!(bag.has_warnings());
    assert_eq!(bag.error_count(), 1);
    assert_eq!(bag.warning_count(), 1);
}

#[test]
fn test_diagnostic_bag_merge_keeps_order() {
    let mut bag1 = DiagnosticBag::new();
    bag1.push(Diagnostic::error(types::UNKNOWN_TYPE).message("err1").build());

    let mut bag2 = DiagnosticBag::new();
    bag2.push(
        Diagnostic::warning(warnings::UNREACHABLE_ARM)
            .message("warn1")
            .build(),
    );

    bag1.merge(bag2);
    let messages: Vec<_> = bag1.diagnostics().iter().map(|d| d.message.as_str()).collect();
    assert_eq!(messages, vec!["err1", "warn1"]);
}

#[test]
fn test_sort_by_position_is_stable() {
    let mut bag = DiagnosticBag::new();
    bag.push(Diagnostic::error("E1").message("late").span(span(9, 10, 1, 10, 11)).build());
    bag.push(Diagnostic::error("E2").message("a").span(span(2, 3, 1, 3, 4)).build());
    bag.push(Diagnostic::error("E3").message("b").span(span(2, 5, 1, 3, 6)).build());

    bag.sort_by_position();
    let messages: Vec<_> = bag.diagnostics().iter().map(|d| d.message.as_str()).collect();
    assert_eq!(messages, vec!["a", "b", "late"]);
}

#[test]
fn test_diagnostic_bag_json() {
    let mut bag = DiagnosticBag::new();
    bag.push(
        Diagnostic::error(syntax::UNEXPECTED_TOKEN)
            .message("test error")
            .build(),
    );

    let json = bag.to_json();
    assert!(json.starts_with('['));
    assert!(json.contains("E0001"));
    assert!(json.contains("test error"));
}

#[test]
fn test_diagnostic_info_severity() {
    let diag = Diagnostic::info("I0001").message("Info message").build();
    assert_eq!(diag.severity, Severity::Info);
    assert!(!diag.is_error());
}

#[test]
fn test_all_codes_are_unique() {
    let mut codes = ALL_CODES.to_vec();
    codes.sort_unstable();
    codes.dedup();
    assert_eq!(codes.len(), ALL_CODES.len());
}

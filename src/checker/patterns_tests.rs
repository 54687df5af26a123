use super::*;
use crate::parser::ast::Program;
use crate::parser::parse_source;
use pretty_assertions::assert_eq;
use std::path::PathBuf;

const PRELUDE: &str = r#"
enum Boolean { False, True }
enum Digit { One, Two(Boolean) }
enum Unit { Unit }
"#;

fn setup(body: &str) -> (Program, Registry) {
    let source = format!("{}{}", PRELUDE, body);
    let (program, errors) = parse_source(&source, &PathBuf::from("test.pmxc"));
    assert!(errors.is_empty(), "Parse errors: {:?}", errors);
    let (registry, decl_errors) = Registry::build(&program);
    assert!(decl_errors.is_empty(), "Declaration errors: {:?}", decl_errors);
    (program, registry)
}

/// Resolved arm patterns rendered as text, plus the diagnostic codes
fn check(body: &str) -> (Option<Vec<String>>, Vec<String>) {
    let (program, registry) = setup(body);
    let expr = program.matches().next().unwrap();
    let (checked, diagnostics) = check_match(expr, &registry);
    let arms = checked.map(|m| {
        m.arms
            .iter()
            .map(|a| a.pat.display(&registry).to_string())
            .collect()
    });
    let codes = diagnostics
        .diagnostics()
        .iter()
        .map(|d| d.code.clone())
        .collect();
    (arms, codes)
}

#[test]
fn test_resolves_valid_patterns() {
    let (arms, codes) = check(
        r#"match One {
    One => {}
    Two(True) => {}
    Two(_) => {}
    _ => {}
}"#,
    );
    assert!(codes.is_empty());
    assert_eq!(arms.unwrap(), vec!["One", "Two(True)", "Two(_)", "_"]);
}

#[test]
fn test_scrutinee_type_from_owner() {
    let (program, registry) = setup("match Two(False) { _ => {} }");
    let expr = program.matches().next().unwrap();
    let (checked, diagnostics) = check_match(expr, &registry);
    assert!(diagnostics.is_empty());
    assert_eq!(checked.unwrap().ty, registry.lookup_type("Digit").unwrap());
}

#[test]
fn test_unknown_scrutinee_skips_match() {
    let (arms, codes) = check("match Nope { Whatever => {} }");
    assert!(arms.is_none());
    assert_eq!(codes, vec![types::UNKNOWN_IDENTIFIER]);
}

#[test]
fn test_wrong_type_constructor() {
    let (arms, codes) = check(
        r#"match One {
    True => {}
    One => {}
}"#,
    );
    assert_eq!(codes, vec![types::WRONG_CONSTRUCTOR_TYPE]);
    assert_eq!(arms.unwrap(), vec!["One"]);
}

#[test]
fn test_wrong_type_message() {
    let (program, registry) = setup("match One { True => {} }");
    let (_, diagnostics) = check_match(program.matches().next().unwrap(), &registry);
    assert_eq!(
        diagnostics.diagnostics()[0].message,
        "Mismatched types: `True` is a constructor of `Boolean`, expected `Digit`"
    );
}

#[test]
fn test_unknown_constructor() {
    let (arms, codes) = check("match One { Three => {} }");
    assert_eq!(codes, vec![types::UNKNOWN_CONSTRUCTOR]);
    assert!(arms.unwrap().is_empty());
}

#[test]
fn test_arity_mismatches_are_excluded() {
    let (arms, codes) = check(
        r#"match One {
    Two => {}
    Two() => {}
    Two(True, True) => {}
    One(True) => {}
}"#,
    );
    assert_eq!(codes, vec![types::WRONG_ARGUMENT_COUNT; 4]);
    assert!(arms.unwrap().is_empty());
}

#[test]
fn test_arity_message_shows_given_and_expected() {
    let (program, registry) = setup("match One { Two(True, True) => {} }");
    let (_, diagnostics) = check_match(program.matches().next().unwrap(), &registry);
    assert_eq!(
        diagnostics.diagnostics()[0].message,
        "Wrong number of arguments for `Two` (2 → 1)"
    );
}

#[test]
fn test_nested_failure_excludes_arm() {
    let (arms, codes) = check(
        r#"match One {
    Two(One) => {}
    Two(Maybe) => {}
    Two(True) => {}
}"#,
    );
    assert_eq!(
        codes,
        vec![types::WRONG_CONSTRUCTOR_TYPE, types::UNKNOWN_CONSTRUCTOR]
    );
    assert_eq!(arms.unwrap(), vec!["Two(True)"]);
}

#[test]
fn test_scrutinee_argument_is_checked() {
    let (arms, codes) = check("match Two(Unit) { _ => {} }");
    assert_eq!(codes, vec![types::WRONG_CONSTRUCTOR_TYPE]);
    // The scrutinee's own type is still known
    assert_eq!(arms.unwrap(), vec!["_"]);
}

#[test]
fn test_scrutinee_arity_is_checked() {
    let (arms, codes) = check("match One(True) { One => {} }");
    assert_eq!(codes, vec![types::WRONG_ARGUMENT_COUNT]);
    assert_eq!(arms.unwrap(), vec!["One"]);
}

#[test]
fn test_ambiguous_scrutinee() {
    let (arms, codes) = check(
        r#"enum Other { Unit }
match Unit { _ => {} }"#,
    );
    assert!(arms.is_none());
    assert_eq!(codes, vec![types::AMBIGUOUS_CONSTRUCTOR]);
}

#[test]
fn test_written_arity_disambiguates_scrutinee() {
    let (program, registry) = setup(
        r#"enum Wrapped { One(Boolean) }
match One(True) { _ => {} }"#,
    );
    let (checked, diagnostics) = check_match(program.matches().next().unwrap(), &registry);
    assert!(diagnostics.is_empty());
    assert_eq!(checked.unwrap().ty, registry.lookup_type("Wrapped").unwrap());
}

#[test]
fn test_poisoned_field_accepts_any_subpattern() {
    let source = r#"enum Box { Full(Missing), Empty }
match Empty {
    Full(Anything) => {}
    Empty => {}
}"#;
    let (program, _) = parse_source(source, &PathBuf::from("test.pmxc"));
    let (registry, decl_errors) = Registry::build(&program);
    assert_eq!(decl_errors.len(), 1);

    let (checked, diagnostics) = check_match(program.matches().next().unwrap(), &registry);
    assert!(diagnostics.is_empty());
    let arms: Vec<_> = checked
        .unwrap()
        .arms
        .iter()
        .map(|a| a.pat.display(&registry).to_string())
        .collect();
    assert_eq!(arms, vec!["Full(_)", "Empty"]);
}

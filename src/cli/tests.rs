use super::check_cmd::{check_file, check_paths, CheckSummary};
use super::editor_cmd::tokenize_lines;
use super::explain_cmd::{apply_fixes, get_error_explanation};
use super::*;
use crate::cache::CheckCache;
use crate::checker::{CheckOptions, RedundantArms};
use crate::diagnostics::error_codes::ALL_CODES;
use clap::CommandFactory;
use pretty_assertions::assert_eq;
use std::collections::HashSet;
use tempfile::TempDir;

const QUIET: Output = Output {
    json: false,
    quiet: true,
};

#[test]
fn test_cli_definition_is_valid() {
    Cli::command().debug_assert();
}

#[test]
fn test_parse_check_flags() {
    let cli = Cli::try_parse_from(["pmxc", "-vv", "check", "src", "--strict", "--no-cache"]).unwrap();
    assert_eq!(cli.verbose, 2);
    match cli.command {
        Command::Check {
            paths,
            strict,
            no_cache,
            watch,
        } => {
            assert_eq!(paths, vec![PathBuf::from("src")]);
            assert!(strict);
            assert!(no_cache);
            assert!(!watch);
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn test_check_defaults_to_current_dir() {
    let cli = Cli::try_parse_from(["pmxc", "check", "--json"]).unwrap();
    assert!(cli.json);
    match cli.command {
        Command::Check { paths, .. } => assert_eq!(paths, vec![PathBuf::from(".")]),
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn test_explain_all_codes() {
    for code in ALL_CODES {
        let text = get_error_explanation(code)
            .unwrap_or_else(|| panic!("missing explanation for {}", code));
        assert!(text.starts_with(*code), "explanation of {} must start with its code", code);
    }
}

#[test]
fn test_explain_unknown_code() {
    assert!(get_error_explanation("E9999").is_none());
    let err = explain_cmd::run_explain("E9999").unwrap_err();
    assert_eq!(err.to_string(), "unknown diagnostic code `E9999`");
}

#[test]
fn test_collect_source_files_filters_directories() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    std::fs::create_dir_all(root.join("nested")).unwrap();
    std::fs::create_dir_all(root.join(".pmxc-cache")).unwrap();
    std::fs::write(root.join("b.pmxc"), "").unwrap();
    std::fs::write(root.join("a.pmxclang"), "").unwrap();
    std::fs::write(root.join("notes.txt"), "").unwrap();
    std::fs::write(root.join("nested").join("c.pmxc"), "").unwrap();
    std::fs::write(root.join(".pmxc-cache").join("d.pmxc"), "").unwrap();

    let files = collect_source_files(&[root.to_path_buf()], &Config::default()).unwrap();
    let names: Vec<_> = files
        .iter()
        .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
        .collect();
    assert_eq!(names, vec!["a.pmxclang", "b.pmxc", "nested/c.pmxc"]);
}

#[test]
fn test_collect_source_files_keeps_explicit_files() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("input.txt");
    std::fs::write(&file, "").unwrap();

    let files = collect_source_files(&[file.clone()], &Config::default()).unwrap();
    assert_eq!(files, vec![file]);
}

#[test]
fn test_collect_source_files_missing_path() {
    let tmp = TempDir::new().unwrap();
    let err = collect_source_files(&[tmp.path().join("nope.pmxc")], &Config::default()).unwrap_err();
    assert!(matches!(err, CliError::Read { .. }));
}

#[test]
fn test_check_file_uses_cache() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("main.pmxc");
    let source = "enum Unit { Unit }\nmatch Unit {}";
    std::fs::write(&path, source).unwrap();

    let options = CheckOptions::default();
    let mut cache = CheckCache::default();

    let first = check_file(&path, source, &options, 1, &mut cache, false);
    assert!(!first.cached);
    assert_eq!(first.errors, 1);

    let second = check_file(&path, source, &options, 1, &mut cache, false);
    assert!(second.cached);
    assert_eq!(second.diagnostics, first.diagnostics);

    // A different configuration must not reuse the result
    let third = check_file(&path, source, &options, 2, &mut cache, false);
    assert!(!third.cached);
}

#[test]
fn test_check_paths_summary() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    std::fs::write(root.join("ok.pmxc"), "enum Unit { Unit }\nmatch Unit { _ => {} }").unwrap();
    std::fs::write(
        root.join("bad.pmxc"),
        "enum Boolean { False, True }\nmatch True { True => {} False => {} _ => {} }\nmatch True {}",
    )
    .unwrap();

    let mut config = Config::default();
    config.check.redundant_arms = RedundantArms::Warn;
    let summary = check_paths(&[root.to_path_buf()], &config, true, QUIET).unwrap();
    assert_eq!(
        summary,
        CheckSummary {
            files: 2,
            cached: 0,
            errors: 1,
            warnings: 1,
        }
    );
    assert!(summary.has_issues(false));

    let clean = CheckSummary {
        files: 1,
        cached: 0,
        errors: 0,
        warnings: 1,
    };
    assert!(!clean.has_issues(false));
    assert!(clean.has_issues(true));
}

#[test]
fn test_apply_fixes_adds_missing_arms() {
    let source = "enum Boolean { False, True }\nmatch True {\n    True => {}\n}\n";
    let diagnostics = crate::validate_source(source, Path::new("main.pmxc"), &CheckOptions::default());

    let (fixed, count) = apply_fixes(source, diagnostics.diagnostics(), None);
    assert_eq!(count, 1);
    assert_eq!(
        fixed,
        "enum Boolean { False, True }\nmatch True {\n    True => {}\n    False => {}\n}\n"
    );

    let recheck = crate::validate_source(&fixed, Path::new("main.pmxc"), &CheckOptions::default());
    assert!(recheck.is_empty());
}

#[test]
fn test_apply_fixes_respects_code_filter() {
    let source = "enum Boolean { False, True }\nmatch True { True => {} }";
    let diagnostics = crate::validate_source(source, Path::new("main.pmxc"), &CheckOptions::default());

    let only: HashSet<&str> = ["W0003"].into_iter().collect();
    let (fixed, count) = apply_fixes(source, diagnostics.diagnostics(), Some(&only));
    assert_eq!(count, 0);
    assert_eq!(fixed, source);
}

#[test]
fn test_tokenize_lines() {
    let lines = tokenize_lines("enum Unit {\r\n    Unit\r\n}");
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[1].tokens.len(), 2);
    assert_eq!(lines[1].tokens[1].start_index, 4);
}

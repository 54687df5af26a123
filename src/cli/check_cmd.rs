//! Handler for the `pmxc check` subcommand.

use std::path::{Path, PathBuf};

use crate::cache::{self, CachedFileResult, CheckCache};
use crate::checker::CheckOptions;
use crate::config::Config;
use crate::diagnostics::{Diagnostic, Severity};

use super::{collect_source_files, load_config, read_source, CliError, Output};

/// Outcome of checking one file
#[derive(Debug)]
pub(super) struct FileReport {
    pub(super) errors: usize,
    pub(super) warnings: usize,
    pub(super) diagnostics: Vec<Diagnostic>,
    pub(super) cached: bool,
}

/// Totals over all checked files
#[derive(Debug, Default, PartialEq, Eq)]
pub(super) struct CheckSummary {
    pub(super) files: usize,
    pub(super) cached: usize,
    pub(super) errors: usize,
    pub(super) warnings: usize,
}

impl CheckSummary {
    pub(super) fn has_issues(&self, strict: bool) -> bool {
        self.errors > 0 || (strict && self.warnings > 0)
    }
}

pub(crate) fn run_check(
    paths: &[PathBuf],
    strict: bool,
    no_cache: bool,
    output: Output,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(paths)?;
    let summary = check_paths(paths, &config, no_cache, output)?;
    print_summary(&summary, strict, output);

    if summary.has_issues(strict) {
        return Err(CliError::IssuesFound {
            errors: summary.errors,
            warnings: summary.warnings,
        }
        .into());
    }
    Ok(())
}

/// Check every source file under `paths`, printing diagnostics as they are
/// found
pub(super) fn check_paths(
    paths: &[PathBuf],
    config: &Config,
    no_cache: bool,
    output: Output,
) -> Result<CheckSummary, CliError> {
    let project_root = cache::find_project_root(
        paths
            .first()
            .map(PathBuf::as_path)
            .unwrap_or_else(|| Path::new(".")),
    );
    let mut cache = if no_cache {
        CheckCache::default()
    } else {
        CheckCache::load(&project_root)
    };

    let options = config.check_options();
    let fingerprint = config.fingerprint();
    let mut summary = CheckSummary::default();

    for file_path in collect_source_files(paths, config)? {
        let source = read_source(&file_path)?;
        let report = check_file(&file_path, &source, &options, fingerprint, &mut cache, no_cache);
        print_diagnostics(&report.diagnostics, &source, output);

        summary.files += 1;
        summary.cached += usize::from(report.cached);
        summary.errors += report.errors;
        summary.warnings += report.warnings;
    }

    tracing::debug!(
        files = summary.files,
        cached = summary.cached,
        errors = summary.errors,
        warnings = summary.warnings,
        "check finished"
    );

    if !no_cache {
        cache.prune();
        if let Err(e) = cache.save(&project_root) {
            tracing::warn!(error = %e, "failed to save check cache");
        }
    }

    Ok(summary)
}

pub(super) fn check_file(
    path: &Path,
    source: &str,
    options: &CheckOptions,
    fingerprint: u64,
    cache: &mut CheckCache,
    no_cache: bool,
) -> FileReport {
    let content_hash = cache::hash_content(source);

    if !no_cache {
        if let Some(cached) = cache.lookup(path, content_hash, fingerprint) {
            tracing::trace!(file = %path.display(), "cache hit");
            return FileReport {
                errors: cached.errors,
                warnings: cached.warnings,
                diagnostics: cached.diagnostics.clone(),
                cached: true,
            };
        }
    }

    let diagnostics = crate::validate_source(source, path, options);
    let report = FileReport {
        errors: diagnostics.error_count(),
        warnings: diagnostics.warning_count(),
        diagnostics: diagnostics.take(),
        cached: false,
    };

    cache.store(
        path,
        CachedFileResult {
            content_hash,
            config_fingerprint: fingerprint,
            errors: report.errors,
            warnings: report.warnings,
            diagnostics: report.diagnostics.clone(),
        },
    );
    report
}

fn print_diagnostics(diagnostics: &[Diagnostic], source: &str, output: Output) {
    for d in diagnostics {
        if output.json {
            println!("{}", d.to_json());
        } else if !(output.quiet && d.severity != Severity::Error) {
            eprintln!("{}", d.to_human_readable(source));
        }
    }
}

fn print_summary(summary: &CheckSummary, strict: bool, output: Output) {
    let cache_note = if summary.cached > 0 {
        format!(" ({} cached)", summary.cached)
    } else {
        String::new()
    };

    if summary.has_issues(strict) {
        let mut parts = Vec::new();
        if summary.errors > 0 {
            parts.push(format!("{} error(s)", summary.errors));
        }
        if summary.warnings > 0 {
            if strict {
                parts.push(format!(
                    "{} warning(s) [treated as errors with --strict]",
                    summary.warnings
                ));
            } else {
                parts.push(format!("{} warning(s)", summary.warnings));
            }
        }
        eprintln!(
            "\nChecked {} file(s){}, found {}",
            summary.files,
            cache_note,
            parts.join(", ")
        );
    } else if output.quiet || output.json {
        // Nothing to add
    } else if summary.warnings > 0 {
        println!(
            "Checked {} file(s){}, no errors ({} warning(s))",
            summary.files, cache_note, summary.warnings
        );
    } else {
        println!(
            "Checked {} file(s){}, no errors found",
            summary.files, cache_note
        );
    }
}

/// Run `pmxc check` in watch mode -- re-check on file changes.
pub(crate) fn run_watch_check(
    paths: &[PathBuf],
    strict: bool,
    no_cache: bool,
    output: Output,
) -> Result<(), Box<dyn std::error::Error>> {
    use notify::{Config as WatchConfig, RecommendedWatcher, RecursiveMode, Watcher};
    use std::sync::mpsc;
    use std::time::Duration;

    println!("Watching for changes... (Ctrl+C to stop)\n");

    let recheck = || {
        // A failing check is reported and the watch goes on
        if let Err(e) = run_check(paths, strict, no_cache, output) {
            if !matches!(e.downcast_ref::<CliError>(), Some(CliError::IssuesFound { .. })) {
                eprintln!("Error: {}", e);
            }
        }
    };
    recheck();

    let (tx, rx) = mpsc::channel();

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| {
            if let Ok(event) = res {
                let only_cache = event
                    .paths
                    .iter()
                    .all(|p| p.components().any(|c| c.as_os_str() == ".pmxc-cache"));
                if !only_cache
                    && (event.kind.is_modify() || event.kind.is_create() || event.kind.is_remove())
                {
                    let _ = tx.send(());
                }
            }
        },
        WatchConfig::default().with_poll_interval(Duration::from_millis(100)),
    )
    .map_err(CliError::from)?;

    for path in paths {
        let watch_path = if path.is_file() {
            path.parent().unwrap_or(path).to_path_buf()
        } else {
            path.clone()
        };
        watcher
            .watch(&watch_path, RecursiveMode::Recursive)
            .map_err(CliError::from)?;
    }

    // Debounce: wait for the first event, then for a quiet period
    while rx.recv().is_ok() {
        while rx.recv_timeout(Duration::from_millis(200)).is_ok() {}

        print!("\x1B[2J\x1B[H"); // ANSI clear screen
        println!("File changed, re-checking...\n");
        recheck();
        println!("\nWatching for changes... (Ctrl+C to stop)");
    }

    Ok(())
}

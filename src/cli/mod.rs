//! Command-line interface for pmxc
//!
//! Provides commands: check, fix, tokens, validate, explain

mod check_cmd;
mod editor_cmd;
mod explain_cmd;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::{Config, ConfigError};

/// pmxc - pattern-match exhaustiveness checker
#[derive(Parser, Debug)]
#[command(name = "pmxc")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output diagnostics as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Log more details to stderr (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check source files for errors
    Check {
        /// Files or directories to check
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,

        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,

        /// Bypass the incremental cache (re-check all files)
        #[arg(long)]
        no_cache: bool,

        /// Watch for file changes and re-check automatically
        #[arg(long)]
        watch: bool,
    },

    /// Apply diagnostic fix suggestions (missing arms, unreachable arms)
    Fix {
        /// Files or directories to fix
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,

        /// Only apply fixes for specific codes (e.g., E1004,W0003)
        #[arg(long)]
        only: Option<String>,

        /// Show what would be fixed without modifying files
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the highlighting tokens of every line of a file
    Tokens {
        /// File to tokenize
        file: PathBuf,
    },

    /// Print the editor markers of a file as JSON
    Validate {
        /// File to validate
        file: PathBuf,
    },

    /// Explain an error or warning code in detail
    Explain {
        /// Code to explain (e.g., E1004, W0003)
        code: String,
    },
}

/// Failures of CLI commands. Problems in the checked sources are reported
/// as diagnostics; these are about everything around them.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("file watcher failed: {0}")]
    Watch(#[from] notify::Error),

    #[error("unknown diagnostic code `{0}`")]
    UnknownCode(String),

    /// The check itself worked and found problems. Already summarized on
    /// stderr.
    #[error("found {errors} error(s) and {warnings} warning(s)")]
    IssuesFound { errors: usize, warnings: usize },
}

/// Shared output settings
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Output {
    pub(crate) json: bool,
    pub(crate) quiet: bool,
}

impl Cli {
    /// Run the parsed command line
    pub fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let output = Output {
            json: self.json,
            quiet: self.quiet,
        };

        match self.command {
            Command::Check {
                paths,
                strict,
                no_cache,
                watch,
            } => {
                if watch {
                    check_cmd::run_watch_check(&paths, strict, no_cache, output)?;
                } else {
                    check_cmd::run_check(&paths, strict, no_cache, output)?;
                }
            }
            Command::Fix {
                paths,
                only,
                dry_run,
            } => {
                explain_cmd::run_fix(&paths, only.as_deref(), dry_run, output)?;
            }
            Command::Tokens { file } => {
                editor_cmd::run_tokens(&file, output)?;
            }
            Command::Validate { file } => {
                editor_cmd::run_validate(&file)?;
            }
            Command::Explain { code } => {
                explain_cmd::run_explain(&code)?;
            }
        }

        Ok(())
    }
}

/// Load the configuration that applies to the given paths
fn load_config(paths: &[PathBuf]) -> Result<Config, CliError> {
    let start = paths
        .first()
        .map(PathBuf::as_path)
        .unwrap_or_else(|| Path::new("."));
    let (config, _) = Config::discover(start)?;
    Ok(config)
}

fn read_source(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Source files named by `paths`. Files given explicitly are always
/// included; directories are searched for files with a configured extension.
fn collect_source_files(paths: &[PathBuf], config: &Config) -> Result<Vec<PathBuf>, CliError> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            for entry in walkdir(path)? {
                if config.is_source_file(&entry) {
                    files.push(entry);
                }
            }
        } else {
            return Err(CliError::Read {
                path: path.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file or directory"),
            });
        }
    }
    files.dedup();
    Ok(files)
}

/// Recursive directory walker. Hidden directories (such as the check cache)
/// are skipped and entries come back sorted.
fn walkdir(path: &Path) -> Result<Vec<PathBuf>, CliError> {
    let read_err = |source| CliError::Read {
        path: path.to_path_buf(),
        source,
    };

    let mut entries = std::fs::read_dir(path)
        .map_err(read_err)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(read_err)?;
    entries.sort();

    let mut results = Vec::new();
    for entry_path in entries {
        if entry_path.is_file() {
            results.push(entry_path);
        } else if entry_path.is_dir() {
            let hidden = entry_path
                .file_name()
                .is_some_and(|name| name.to_string_lossy().starts_with('.'));
            if !hidden {
                results.extend(walkdir(&entry_path)?);
            }
        }
    }
    Ok(results)
}

#[cfg(test)]
mod tests;

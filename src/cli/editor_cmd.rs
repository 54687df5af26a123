//! Handlers for `pmxc tokens` and `pmxc validate`, which print exactly what
//! the editor entry points return.

use std::path::Path;

use crate::editor::{self, LineTokens};
use crate::parser::span::split_lines;

use super::{load_config, read_source, Output};

pub(crate) fn run_tokens(file: &Path, output: Output) -> Result<(), Box<dyn std::error::Error>> {
    let source = read_source(file)?;
    let lines = tokenize_lines(&source);

    if output.json {
        println!("{}", serde_json::to_string_pretty(&lines)?);
        return Ok(());
    }

    for (number, (line, tokens)) in split_lines(&source).zip(&lines).enumerate() {
        println!("{:>4} | {}", number + 1, line);
        for token in &tokens.tokens {
            println!("     {:>4}  {}", token.start_index, token.scopes.as_str());
        }
    }
    Ok(())
}

/// Tokens of every line, as an editor would request them
pub(super) fn tokenize_lines(source: &str) -> Vec<LineTokens> {
    split_lines(source).map(editor::tokenize).collect()
}

pub(crate) fn run_validate(file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let source = read_source(file)?;
    let config = load_config(&[file.to_path_buf()])?;
    let markers = editor::validate_with(&source, &config.check_options());
    println!("{}", serde_json::to_string_pretty(&markers)?);
    Ok(())
}

//! Parser for the pmxc language
//!
//! This module provides:
//! - Lexer (tokenization, trivia included)
//! - Parser (AST construction with item-level error recovery)
//! - AST definitions
//! - Span tracking

pub mod ast;
pub mod lexer;
#[allow(clippy::module_inception)]
pub mod parser;
pub mod span;

pub use ast::*;
pub use lexer::Lexer;
pub use parser::{Parser, MAX_NESTING_DEPTH};
pub use span::SourceFile;

use crate::diagnostics::DiagnosticBag;
use std::path::Path;

/// Parse source code into an AST. Syntax diagnostics are returned together
/// with whatever could be parsed.
pub fn parse_source(source: &str, path: &Path) -> (Program, DiagnosticBag) {
    let source_file = SourceFile::new(path.to_path_buf(), source.to_string());
    parse_source_file(&source_file)
}

/// Parse an already loaded source file
pub fn parse_source_file(source_file: &SourceFile) -> (Program, DiagnosticBag) {
    let lexer = Lexer::new(source_file);
    let mut parser = Parser::new(lexer, source_file.clone());
    parser.parse_program()
}

//! Editor-facing entry points
//!
//! `tokenize` classifies one line for syntax highlighting and `validate`
//! returns the full diagnostic set of a document as editor markers. Both
//! serialize with the camelCase field names editors expect.

use crate::checker::CheckOptions;
use crate::diagnostics::{Diagnostic, Severity};
use crate::parser::lexer::{Lexer, TokenKind};
use crate::parser::SourceFile;
use serde::Serialize;
use std::path::PathBuf;

/// Path used for spans of text that did not come from a file
pub const INPUT_PATH: &str = "<input>";

/// Highlighting class of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Scope {
    #[serde(rename = "comment")]
    Comment,
    #[serde(rename = "keyword.control")]
    ControlKeyword,
    #[serde(rename = "keyword")]
    Keyword,
    #[serde(rename = "identifier")]
    Identifier,
    #[serde(rename = "delimiter")]
    Delimiter,
    #[serde(rename = "white")]
    White,
    #[serde(rename = "invalid")]
    Invalid,
}

impl Scope {
    fn of(kind: TokenKind) -> Scope {
        match kind {
            TokenKind::LineComment => Scope::Comment,
            kind if kind.is_control_keyword() => Scope::ControlKeyword,
            kind if kind.is_keyword() => Scope::Keyword,
            TokenKind::Ident => Scope::Identifier,
            kind if kind.is_punctuation() => Scope::Delimiter,
            TokenKind::Whitespace | TokenKind::Newline => Scope::White,
            _ => Scope::Invalid,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Scope::Comment => "comment",
            Scope::ControlKeyword => "keyword.control",
            Scope::Keyword => "keyword",
            Scope::Identifier => "identifier",
            Scope::Delimiter => "delimiter",
            Scope::White => "white",
            Scope::Invalid => "invalid",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorToken {
    /// Offset from the start of the line in UTF-16 code units
    pub start_index: usize,
    pub scopes: Scope,
}

/// State carried from one line to the next. Nothing spans lines, so there
/// is only one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LineState {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineTokens {
    pub tokens: Vec<EditorToken>,
    pub end_state: LineState,
}

/// Classify the tokens of one line
pub fn tokenize(line: &str) -> LineTokens {
    let source = SourceFile::new(PathBuf::from(INPUT_PATH), line.to_string());
    let tokens = Lexer::new(&source)
        .tokenize()
        .into_iter()
        .map(|token| EditorToken {
            start_index: line[..token.span.start].encode_utf16().count(),
            scopes: Scope::of(token.kind),
        })
        .collect();

    LineTokens {
        tokens,
        end_state: LineState::default(),
    }
}

/// A diagnostic positioned for an editor. Lines and columns are 1-based,
/// columns count UTF-16 code units and the end is exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
    pub severity: Severity,
    pub message: String,
    pub code: String,
}

impl From<&Diagnostic> for Marker {
    fn from(diag: &Diagnostic) -> Self {
        Marker {
            start_line: diag.span.start_line,
            start_column: diag.span.start_col,
            end_line: diag.span.end_line,
            end_column: diag.span.end_col,
            severity: diag.severity,
            message: diag.message.clone(),
            code: diag.code.clone(),
        }
    }
}

/// All diagnostics of a document, with default options
pub fn validate(source: &str) -> Vec<Marker> {
    validate_with(source, &CheckOptions::default())
}

pub fn validate_with(source: &str, options: &CheckOptions) -> Vec<Marker> {
    crate::validate_source(source, &PathBuf::from(INPUT_PATH), options)
        .diagnostics()
        .iter()
        .map(Marker::from)
        .collect()
}

//! Source file and span utilities

use crate::diagnostics::Span;
use std::path::PathBuf;

/// A source file with its content and line information
#[derive(Debug, Clone)]
pub struct SourceFile {
    path: PathBuf,
    content: String,
    line_starts: Vec<usize>,
}

impl SourceFile {
    /// Create a new source file
    pub fn new(path: PathBuf, content: String) -> Self {
        // Lines end at `\n`, `\r\n` or a lone `\r`, like newline tokens
        let bytes = content.as_bytes();
        let line_starts = std::iter::once(0)
            .chain(bytes.iter().enumerate().filter_map(|(i, &b)| match b {
                b'\n' => Some(i + 1),
                b'\r' if bytes.get(i + 1) != Some(&b'\n') => Some(i + 1),
                _ => None,
            }))
            .collect();

        Self {
            path,
            content,
            line_starts,
        }
    }

    /// Get the file path
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Get the file content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Create a span for a byte range
    pub fn span(&self, start: usize, end: usize) -> Span {
        let (start_line, start_col) = self.line_col(start);
        let (end_line, end_col) = self.line_col(end);

        Span {
            file: self.path.clone(),
            start,
            end,
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// Convert a byte offset to line and column (1-indexed).
    ///
    /// The column counts UTF-16 code units from the start of the line. Offsets
    /// past the end clamp to the end of the content; offsets inside a
    /// multi-byte character count the whole character.
    fn line_col(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.content.len());
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let line_start = self.line_starts.get(line).copied().unwrap_or(0);
        let col = self.content[line_start..]
            .char_indices()
            .take_while(|(i, _)| line_start + i < offset)
            .map(|(_, c)| c.len_utf16())
            .sum::<usize>()
            + 1;
        (line + 1, col)
    }

    /// Number of lines (a trailing newline starts a final empty line)
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Get a line by number (1-indexed), without its line terminator
    pub fn get_line(&self, line: usize) -> Option<&str> {
        if line == 0 || line > self.line_starts.len() {
            return None;
        }

        let start = self.line_starts[line - 1];
        let end = self
            .line_starts
            .get(line)
            .map(|&e| e.saturating_sub(1))
            .unwrap_or(self.content.len());

        Some(self.content[start..end].trim_end_matches('\r'))
    }
}

/// Lines of `text` without their terminators. Unlike [`str::lines`] a lone
/// `\r` ends a line too, and a trailing terminator yields a final empty line.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = Some(text);
    std::iter::from_fn(move || {
        let current = rest?;
        match current.find(['\r', '\n']) {
            Some(i) => {
                let len = if current[i..].starts_with("\r\n") { 2 } else { 1 };
                rest = Some(&current[i + len..]);
                Some(&current[..i])
            }
            None => {
                rest = None;
                Some(current)
            }
        }
    })
}

#[cfg(test)]
#[path = "span_tests.rs"]
mod tests;

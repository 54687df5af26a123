//! Lexer for the pmxc language
//!
//! The lexer is total: characters it does not recognize become
//! [`TokenKind::Unknown`] tokens instead of errors, so the same code serves
//! both the parser and editor highlighting of half-typed input.

use crate::diagnostics::Span;
use crate::parser::span::SourceFile;
use logos::Logos;

/// Token types for pmxc
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Keywords
    #[token("enum")]
    Enum,
    #[token("match")]
    Match,
    #[token("_", priority = 5)]
    Underscore,

    // Identifiers
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    // Punctuation
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token("=>")]
    FatArrow,

    // Trivia
    #[regex(r"//[^\r\n]*")]
    LineComment,
    #[regex(r"[ \t\x{3000}]+")]
    Whitespace,
    #[regex(r"\r\n|\n|\r")]
    Newline,

    /// A run of characters no other rule accepts
    Unknown,

    // End of file
    Eof,
}

impl TokenKind {
    /// Tokens the parser never sees
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::LineComment | TokenKind::Whitespace | TokenKind::Newline
        )
    }

    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::Enum | TokenKind::Match | TokenKind::Underscore
        )
    }

    /// Keywords that introduce control flow, highlighted separately
    pub fn is_control_keyword(self) -> bool {
        self == TokenKind::Match
    }

    pub fn is_punctuation(self) -> bool {
        matches!(
            self,
            TokenKind::LParen
                | TokenKind::RParen
                | TokenKind::LBrace
                | TokenKind::RBrace
                | TokenKind::Comma
                | TokenKind::FatArrow
        )
    }

    /// How the token is shown in "expected X, found Y" messages
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Enum => "`enum`",
            TokenKind::Match => "`match`",
            TokenKind::Underscore => "`_`",
            TokenKind::Ident => "identifier",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::LBrace => "`{`",
            TokenKind::RBrace => "`}`",
            TokenKind::Comma => "`,`",
            TokenKind::FatArrow => "`=>`",
            TokenKind::LineComment => "comment",
            TokenKind::Whitespace => "whitespace",
            TokenKind::Newline => "line break",
            TokenKind::Unknown => "unrecognized character",
            TokenKind::Eof => "end of input",
        }
    }
}

/// A token with its span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Lexer for pmxc source code
pub struct Lexer<'a> {
    source: &'a SourceFile,
    logos_lexer: logos::Lexer<'a, TokenKind>,
    pending: Option<Token>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source file
    pub fn new(source: &'a SourceFile) -> Self {
        Self {
            source,
            logos_lexer: TokenKind::lexer(source.content()),
            pending: None,
        }
    }

    /// Get the next token, trivia included. Returns `Eof` forever once the
    /// input is exhausted.
    pub fn next_token(&mut self) -> Token {
        if let Some(token) = self.pending.take() {
            return token;
        }

        match self.logos_lexer.next() {
            Some(Ok(kind)) => self.token_at(kind, self.logos_lexer.span()),
            Some(Err(())) => {
                // Coalesce adjacent rejects into a single Unknown token; this
                // also glues the bytes of a multi-byte character back together.
                let start = self.logos_lexer.span().start;
                let mut end = self.logos_lexer.span().end;
                loop {
                    match self.logos_lexer.next() {
                        Some(Err(())) if self.logos_lexer.span().start == end => {
                            end = self.logos_lexer.span().end;
                        }
                        Some(Err(())) => {
                            let span = self.logos_lexer.span();
                            self.pending = Some(self.token_at(TokenKind::Unknown, span));
                            break;
                        }
                        Some(Ok(kind)) => {
                            let span = self.logos_lexer.span();
                            self.pending = Some(self.token_at(kind, span));
                            break;
                        }
                        None => break,
                    }
                }
                self.token_at(TokenKind::Unknown, start..end)
            }
            None => {
                let len = self.source.content().len();
                self.token_at(TokenKind::Eof, len..len)
            }
        }
    }

    fn token_at(&self, kind: TokenKind, range: std::ops::Range<usize>) -> Token {
        Token::new(kind, self.source.span(range.start, range.end))
    }

    /// Lex the whole source, trivia included, without the trailing `Eof`
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            if token.kind == TokenKind::Eof {
                break;
            }
            tokens.push(token);
        }
        tokens
    }
}

#[cfg(test)]
#[path = "lexer_tests.rs"]
mod tests;

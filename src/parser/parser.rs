//! Recursive descent parser for pmxc
//!
//! Each top-level item parser returns `Result<_, Diagnostic>`. On error the
//! diagnostic is recorded and the parser resynchronizes at the next `enum` or
//! `match` keyword, so one malformed item never hides the others.
#![allow(clippy::result_large_err)]

use crate::diagnostics::error_codes::syntax;
use crate::diagnostics::{Diagnostic, DiagnosticBag, Note, Span};
use crate::parser::ast::*;
use crate::parser::lexer::{Lexer, Token, TokenKind};
use crate::parser::span::SourceFile;

/// Deepest nesting of constructor arguments accepted in a pattern or a
/// matched value. Everything after parsing recurses along the same nesting.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Parser for pmxc source code
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    source: SourceFile,
    errors: DiagnosticBag,
    peeked: Option<Token>,
    /// Span of the last consumed token
    prev_span: Option<Span>,
    /// Open argument lists of the pattern or expression being parsed
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser
    pub fn new(lexer: Lexer<'a>, source: SourceFile) -> Self {
        Self {
            lexer,
            source,
            errors: DiagnosticBag::new(),
            peeked: None,
            prev_span: None,
            depth: 0,
        }
    }

    /// Parse the whole input. Always yields a program; syntax problems come
    /// back alongside it.
    pub fn parse_program(&mut self) -> (Program, DiagnosticBag) {
        let mut items = Vec::new();
        while !self.is_eof() {
            match self.parse_item() {
                Ok(item) => items.push(item),
                Err(diag) => {
                    self.errors.push(diag);
                    self.depth = 0;
                    self.recover_to_next_item();
                }
            }
        }

        let errors = std::mem::take(&mut self.errors);
        tracing::debug!(
            file = %self.source.path().display(),
            items = items.len(),
            syntax_errors = errors.len(),
            "parsed program"
        );
        (Program { items }, errors)
    }

    fn parse_item(&mut self) -> Result<Item, Diagnostic> {
        match self.peek().kind {
            TokenKind::Enum => self.parse_enum_decl().map(Item::Enum),
            TokenKind::Match => self.parse_match_expr().map(Item::Match),
            _ => Err(self.error_unexpected("`enum` or `match`")),
        }
    }

    fn parse_enum_decl(&mut self) -> Result<EnumDecl, Diagnostic> {
        let start = self.expect(TokenKind::Enum)?.span;
        let name = self.expect_ident("type name")?;
        self.expect(TokenKind::LBrace)?;

        let mut ctors = Vec::new();
        while !self.check(TokenKind::RBrace) {
            ctors.push(self.parse_ctor_decl()?);

            if self.check(TokenKind::Comma) {
                self.advance();
            } else if !self.check(TokenKind::RBrace) && !self.at_line_start() {
                return Err(self.error_unexpected("`,` or `}`"));
            }
        }

        let end = self.expect(TokenKind::RBrace)?.span;
        Ok(EnumDecl {
            span: start.merge(&end),
            name,
            ctors,
        })
    }

    fn parse_ctor_decl(&mut self) -> Result<CtorDecl, Diagnostic> {
        let name = self.expect_ident("constructor name")?;
        let mut span = name.span.clone();

        let field = if self.check(TokenKind::LParen) {
            self.advance();
            let field = if self.check(TokenKind::RParen) {
                None
            } else {
                Some(self.expect_ident("field type")?)
            };

            let mut extra: Option<Span> = None;
            while self.check(TokenKind::Comma) {
                self.advance();
                if self.check(TokenKind::RParen) {
                    break;
                }
                let ty = self.expect_ident("field type")?;
                extra = Some(match extra {
                    Some(span) => span.merge(&ty.span),
                    None => ty.span,
                });
            }

            if let Some(extra) = extra {
                self.errors.push(
                    Diagnostic::error(syntax::TOO_MANY_FIELDS)
                        .message(format!(
                            "Constructor `{}` declares more than one field",
                            name.name
                        ))
                        .span(extra)
                        .note(Note::new("constructors carry at most one field"))
                        .build(),
                );
            }

            span = span.merge(&self.expect(TokenKind::RParen)?.span);
            field
        } else {
            None
        };

        Ok(CtorDecl { span, name, field })
    }

    fn parse_match_expr(&mut self) -> Result<MatchExpr, Diagnostic> {
        let keyword_span = self.expect(TokenKind::Match)?.span;
        let scrutinee = self.parse_expr()?;
        self.expect(TokenKind::LBrace)?;

        let mut arms = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.is_eof() {
            arms.push(self.parse_match_arm()?);
            if self.check(TokenKind::Comma) {
                self.advance();
            }
        }

        let close_span = self.expect(TokenKind::RBrace)?.span;
        Ok(MatchExpr {
            span: keyword_span.merge(&close_span),
            keyword_span,
            scrutinee,
            arms,
            close_span,
        })
    }

    fn parse_expr(&mut self) -> Result<Expr, Diagnostic> {
        let name = self.expect_ident("expression")?;
        let mut span = name.span.clone();

        let mut args = Vec::new();
        if self.check(TokenKind::LParen) {
            let open = self.advance().span;
            self.enter_nested(open)?;
            if !self.check(TokenKind::RParen) {
                args.push(self.parse_expr()?);
                while self.check(TokenKind::Comma) {
                    self.advance();
                    args.push(self.parse_expr()?);
                }
            }
            span = span.merge(&self.expect(TokenKind::RParen)?.span);
            self.depth -= 1;
        }

        Ok(Expr { span, name, args })
    }

    fn parse_match_arm(&mut self) -> Result<MatchArm, Diagnostic> {
        let pattern = self.parse_pattern()?;
        self.expect(TokenKind::FatArrow)?;
        let body_span = self.skip_block()?;

        Ok(MatchArm {
            span: pattern.span().merge(&body_span),
            pattern,
            body_span,
        })
    }

    fn parse_pattern(&mut self) -> Result<Pattern, Diagnostic> {
        let token = self.peek();
        match token.kind {
            TokenKind::Underscore => {
                self.advance();
                Ok(Pattern::Wildcard { span: token.span })
            }
            TokenKind::Ident => {
                let name = self.expect_ident("pattern")?;
                let mut span = name.span.clone();

                let mut args = Vec::new();
                if self.check(TokenKind::LParen) {
                    let open = self.advance().span;
                    self.enter_nested(open)?;
                    if !self.check(TokenKind::RParen) {
                        args.push(self.parse_pattern()?);
                        while self.check(TokenKind::Comma) {
                            self.advance();
                            args.push(self.parse_pattern()?);
                        }
                    }
                    span = span.merge(&self.expect(TokenKind::RParen)?.span);
                    self.depth -= 1;
                }

                Ok(Pattern::Constructor { span, name, args })
            }
            _ => Err(self.error_unexpected("pattern")),
        }
    }

    /// Skip a `{ ... }` block, matching nested braces. Returns its span.
    fn skip_block(&mut self) -> Result<Span, Diagnostic> {
        let open = self.expect(TokenKind::LBrace)?.span;
        let mut depth = 1usize;
        loop {
            let token = self.peek();
            match token.kind {
                TokenKind::Eof => {
                    return Err(Diagnostic::error(syntax::UNEXPECTED_EOF)
                        .message("Unexpected end of input: unclosed block")
                        .span(token.span)
                        .note(Note::new("block opened here").with_span(open))
                        .build());
                }
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => {
                    depth -= 1;
                    if depth == 0 {
                        self.advance();
                        return Ok(open.merge(&token.span));
                    }
                }
                _ => {}
            }
            self.advance();
        }
    }

    // Helper methods

    fn peek(&mut self) -> Token {
        if self.peeked.is_none() {
            let mut token = self.lexer.next_token();
            while token.kind.is_trivia() {
                token = self.lexer.next_token();
            }
            self.peeked = Some(token);
        }
        match &self.peeked {
            Some(token) => token.clone(),
            None => unreachable!("peeked token was just filled"),
        }
    }

    fn advance(&mut self) -> Token {
        let token = self.peek();
        if token.kind != TokenKind::Eof {
            self.peeked = None;
            self.prev_span = Some(token.span.clone());
        }
        token
    }

    fn is_eof(&mut self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn check(&mut self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    /// Whether a line break separates the next token from the previous one
    fn at_line_start(&mut self) -> bool {
        let next_line = self.peek().span.start_line;
        self.prev_span
            .as_ref()
            .is_some_and(|prev| prev.end_line < next_line)
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, Diagnostic> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error_unexpected(kind.describe()))
        }
    }

    fn expect_ident(&mut self, what: &str) -> Result<Ident, Diagnostic> {
        let token = self.peek();
        if token.kind == TokenKind::Ident {
            self.advance();
            let name = self.source.content()[token.span.start..token.span.end].to_string();
            Ok(Ident {
                name,
                span: token.span,
            })
        } else {
            Err(self.error_unexpected(what))
        }
    }

    fn error_unexpected(&mut self, expected: &str) -> Diagnostic {
        let token = self.peek();
        let code = match token.kind {
            TokenKind::Eof => syntax::UNEXPECTED_EOF,
            _ if expected == TokenKind::RBrace.describe()
                || expected == TokenKind::RParen.describe() =>
            {
                syntax::MISSING_DELIMITER
            }
            _ => syntax::UNEXPECTED_TOKEN,
        };
        let found = match token.kind {
            TokenKind::Ident | TokenKind::Unknown => format!(
                "`{}`",
                &self.source.content()[token.span.start..token.span.end]
            ),
            kind => kind.describe().to_string(),
        };

        Diagnostic::error(code)
            .message(format!("Expected {}, found {}", expected, found))
            .span(token.span)
            .build()
    }

    /// Open one more argument list. The caller closes it by decrementing
    /// `depth`; on error the whole item is abandoned and `depth` reset.
    fn enter_nested(&mut self, open: Span) -> Result<(), Diagnostic> {
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            return Err(Diagnostic::error(syntax::NESTING_TOO_DEEP)
                .message(format!(
                    "Constructor arguments nested more than {} levels deep",
                    MAX_NESTING_DEPTH
                ))
                .span(open)
                .note(Note::new("match on fewer levels at once and use `_` for the rest"))
                .build());
        }
        Ok(())
    }

    fn recover_to_next_item(&mut self) {
        while !self.is_eof() {
            match self.peek().kind {
                TokenKind::Enum | TokenKind::Match => return,
                _ => {
                    self.advance();
                }
            }
        }
    }
}

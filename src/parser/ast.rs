//! Abstract Syntax Tree definitions for pmxc
//!
//! Every node carries its source span. Names keep their own span so
//! diagnostics can point at the identifier rather than the whole item.

use crate::diagnostics::Span;
use serde::{Deserialize, Serialize};

/// A parsed source text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub items: Vec<Item>,
}

impl Program {
    /// Enum declarations in source order
    pub fn enums(&self) -> impl Iterator<Item = &EnumDecl> {
        self.items.iter().filter_map(|item| match item {
            Item::Enum(decl) => Some(decl),
            Item::Match(_) => None,
        })
    }

    /// Match expressions in source order
    pub fn matches(&self) -> impl Iterator<Item = &MatchExpr> {
        self.items.iter().filter_map(|item| match item {
            Item::Match(expr) => Some(expr),
            Item::Enum(_) => None,
        })
    }
}

/// Top-level items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Item {
    Enum(EnumDecl),
    Match(MatchExpr),
}

/// An identifier occurrence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

/// `enum Name { Ctor, Ctor(Field), ... }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDecl {
    pub span: Span,
    pub name: Ident,
    pub ctors: Vec<CtorDecl>,
}

/// A constructor declaration; `field` names the type of its single argument
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CtorDecl {
    pub span: Span,
    pub name: Ident,
    pub field: Option<Ident>,
}

/// `match scrutinee { arms }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchExpr {
    pub span: Span,
    /// Span of the `match` keyword
    pub keyword_span: Span,
    pub scrutinee: Expr,
    pub arms: Vec<MatchArm>,
    /// Span of the closing `}`
    pub close_span: Span,
}

/// A constructor-reference expression: `Name` or `Name(arg)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expr {
    pub span: Span,
    pub name: Ident,
    pub args: Vec<Expr>,
}

/// `pattern => { ... }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchArm {
    pub span: Span,
    pub pattern: Pattern,
    /// The body block, braces included. Its contents are not analyzed.
    pub body_span: Span,
}

/// Patterns as written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Pattern {
    /// `_`
    Wildcard { span: Span },
    /// `Name`, `Name()`, `Name(p)` or `Name(p, q, ...)`; the argument list is
    /// kept verbatim so arity problems can be reported
    Constructor {
        span: Span,
        name: Ident,
        args: Vec<Pattern>,
    },
}

impl Pattern {
    pub fn span(&self) -> &Span {
        match self {
            Pattern::Wildcard { span } | Pattern::Constructor { span, .. } => span,
        }
    }
}

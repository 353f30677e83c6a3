//! ksc-lex - Lexical analysis for the KS language.
//!
//! Transforms source text into a stream of [`Token`]s. The lexer is a
//! single pass over the input: whitespace and line comments are skipped,
//! newlines are emitted as tokens (the parser filters them), and the
//! stream always ends with a single EOF token.
//!
//! # Examples
//!
//! ```
//! use ksc_lex::{tokenize, TokenKind};
//!
//! let tokens = tokenize("let x = 42;").unwrap();
//! let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
//! assert_eq!(
//!     kinds,
//!     vec![
//!         TokenKind::Let,
//!         TokenKind::Identifier,
//!         TokenKind::Assign,
//!         TokenKind::Number,
//!         TokenKind::Semicolon,
//!         TokenKind::Eof,
//!     ]
//! );
//! ```

pub mod cursor;
mod lexer;
pub mod token;

mod edge_cases;

pub use lexer::Lexer;
pub use token::{keyword_from_ident, Token, TokenKind};

use ksc_util::Span;
use thiserror::Error;

/// Error raised on the first malformed construct.
///
/// The span points at the first character of the offending token.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct LexError {
    /// Human-readable description.
    pub message: String,
    /// Position of the offending character.
    pub span: Span,
}

impl LexError {
    /// Line of the offending character (1-based).
    pub fn line(&self) -> u32 {
        self.span.line
    }

    /// Column of the offending character (1-based).
    pub fn column(&self) -> u32 {
        self.span.column
    }
}

/// Tokenizes an entire source string.
///
/// Emits tokens in source order followed by a single EOF token, or the
/// first lexical error. Deterministic and O(source length).
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}

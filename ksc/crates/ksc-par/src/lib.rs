//! ksc-par - Recursive-descent parser for the KS language.
//!
//! Consumes the token stream produced by `ksc-lex` and builds a
//! [`Program`]. Trivia tokens (newlines; whitespace, were the lexer ever
//! to emit it) are filtered up front. The first grammar violation aborts
//! the parse; no partial tree escapes.
//!
//! # Examples
//!
//! ```
//! use ksc_lex::tokenize;
//! use ksc_par::parse;
//!
//! let program = parse(tokenize("let x = 1 + 2;").unwrap()).unwrap();
//! assert_eq!(program.statements.len(), 1);
//! ```

pub mod ast;
mod expr;
mod stmt;

mod edge_cases;

pub use ast::Program;

use ksc_lex::{Token, TokenKind};
use ksc_util::Span;
use thiserror::Error;

/// Error raised on the first grammar violation.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ParseError {
    /// Human-readable description.
    pub message: String,
    /// Line of the offending token (1-based; 0 when unknown).
    pub line: u32,
}

/// Parses a token stream into a program.
pub fn parse(tokens: Vec<Token>) -> Result<Program, ParseError> {
    Parser::new(tokens).parse()
}

/// Recursive-descent parser with single-token lookahead.
pub struct Parser {
    /// Token stream with trivia removed; always ends with EOF.
    tokens: Vec<Token>,

    /// Current position in the token stream.
    position: usize,
}

impl Parser {
    /// Creates a parser over `tokens`, dropping trivia up front.
    ///
    /// An EOF token is appended if the stream lacks one, so lookahead
    /// never runs off the end.
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut tokens: Vec<Token> = tokens
            .into_iter()
            .filter(|t| !t.kind.is_trivia())
            .collect();
        if tokens.last().map_or(true, |t| t.kind != TokenKind::Eof) {
            tokens.push(Token::new(TokenKind::Eof, "", Span::DUMMY));
        }
        Self {
            tokens,
            position: 0,
        }
    }

    /// Parses the whole stream into a [`Program`].
    ///
    /// On a grammar violation the parser first advances to the next
    /// statement boundary, so an interactive caller is left with clean
    /// state, then returns the error.
    pub fn parse(mut self) -> Result<Program, ParseError> {
        let mut statements = Vec::new();
        while !self.is_at_end() {
            match self.declaration() {
                Ok(stmt) => statements.push(stmt),
                Err(err) => {
                    self.synchronize();
                    return Err(err);
                },
            }
        }
        Ok(Program { statements })
    }

    /// Current token. The stream is never empty, so this cannot fail.
    fn peek(&self) -> &Token {
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    /// Most recently consumed token.
    fn previous(&self) -> &Token {
        &self.tokens[self.position.saturating_sub(1)]
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    /// Consumes the current token. Stops at EOF.
    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.position += 1;
        }
        self.previous()
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    /// Consumes the current token if it has the given kind.
    fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes a token of the given kind or fails with `message`.
    fn expect(&mut self, kind: TokenKind, message: &str) -> Result<&Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error_at_current(message))
        }
    }

    /// Builds an error pointing at the current token.
    fn error_at_current(&self, message: &str) -> ParseError {
        let token = self.peek();
        ParseError {
            message: format!("{}, found {}", message, token.kind),
            line: token.line(),
        }
    }

    /// Panic-mode recovery: skips tokens until a statement boundary.
    ///
    /// A boundary is a just-consumed `;` or an upcoming keyword that can
    /// start a declaration or statement.
    fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.previous().kind == TokenKind::Semicolon {
                return;
            }
            if self.peek().kind.starts_statement() {
                return;
            }
            self.advance();
        }
    }
}

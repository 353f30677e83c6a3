//! Core lexer: state, dispatch, and token construction.

use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};
use crate::LexError;
use ksc_util::Span;

/// Lexer for KS source text.
///
/// Produces one token per call to [`next_token`](Lexer::next_token).
/// Newlines come out as tokens so downstream consumers can decide what to
/// do with them; all other whitespace and `//` comments are skipped.
pub struct Lexer<'a> {
    /// Character cursor over the source.
    pub(crate) cursor: Cursor<'a>,

    /// Byte offset where the current token starts.
    pub(crate) token_start: usize,

    /// Line where the current token starts (1-based).
    token_start_line: u32,

    /// Column where the current token starts (1-based).
    token_start_column: u32,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer over `source`.
    pub fn new(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
            token_start: 0,
            token_start_line: 1,
            token_start_column: 1,
        }
    }

    /// Returns the next token, or the first lexical error.
    ///
    /// Returns [`TokenKind::Eof`] once the input is exhausted; calling
    /// again keeps returning EOF.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace_and_comments();

        self.token_start = self.cursor.position();
        self.token_start_line = self.cursor.line();
        self.token_start_column = self.cursor.column();

        if self.cursor.is_at_end() {
            return Ok(self.make(TokenKind::Eof, ""));
        }

        match self.cursor.current_char() {
            '\n' => {
                self.cursor.advance();
                Ok(self.make(TokenKind::Newline, "\n"))
            },
            '(' => Ok(self.single(TokenKind::LParen)),
            ')' => Ok(self.single(TokenKind::RParen)),
            '{' => Ok(self.single(TokenKind::LBrace)),
            '}' => Ok(self.single(TokenKind::RBrace)),
            ',' => Ok(self.single(TokenKind::Comma)),
            ';' => Ok(self.single(TokenKind::Semicolon)),
            '"' => Ok(self.lex_string()),
            c if c.is_ascii_digit() => Ok(self.lex_number()),
            c if super::identifier::is_ident_start(c) => Ok(self.lex_identifier()),
            '+' | '-' | '*' | '/' | '%' | '=' | '<' | '>' | '!' | '&' | '|' => {
                self.lex_operator()
            },
            c => {
                self.cursor.advance();
                Err(self.error(format!("unexpected character '{}'", c)))
            },
        }
    }

    /// Consumes one character and builds a token of the given kind.
    fn single(&mut self, kind: TokenKind) -> Token {
        let c = self.cursor.current_char();
        self.cursor.advance();
        self.make(kind, c.to_string())
    }

    /// Builds a token spanning from the recorded start to the cursor.
    pub(crate) fn make(&self, kind: TokenKind, lexeme: impl Into<String>) -> Token {
        Token::new(kind, lexeme, self.token_span())
    }

    /// The span of the token currently being lexed.
    pub(crate) fn token_span(&self) -> Span {
        Span::new(
            self.token_start,
            self.cursor.position(),
            self.token_start_line,
            self.token_start_column,
        )
    }

    /// Builds a lexical error at the current token position.
    pub(crate) fn error(&self, message: String) -> LexError {
        LexError {
            message,
            span: self.token_span(),
        }
    }
}

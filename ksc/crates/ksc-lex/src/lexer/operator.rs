//! Operator lexing with maximal munch.

use crate::token::{Token, TokenKind};
use crate::{LexError, Lexer};

impl Lexer<'_> {
    /// Lexes an operator, preferring two-character forms.
    ///
    /// `&` and `|` only exist doubled; a lone one is a lexical error, as
    /// is any character that reaches here without a mapping.
    pub(crate) fn lex_operator(&mut self) -> Result<Token, LexError> {
        let c = self.cursor.current_char();
        self.cursor.advance();

        let kind = match c {
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '=' => {
                if self.cursor.match_char('=') {
                    TokenKind::EqEq
                } else {
                    TokenKind::Assign
                }
            },
            '!' => {
                if self.cursor.match_char('=') {
                    TokenKind::NotEq
                } else {
                    TokenKind::Bang
                }
            },
            '<' => {
                if self.cursor.match_char('=') {
                    TokenKind::LtEq
                } else {
                    TokenKind::Lt
                }
            },
            '>' => {
                if self.cursor.match_char('=') {
                    TokenKind::GtEq
                } else {
                    TokenKind::Gt
                }
            },
            '&' => {
                if self.cursor.match_char('&') {
                    TokenKind::AndAnd
                } else {
                    return Err(self.error("unknown operator '&'".to_string()));
                }
            },
            '|' => {
                if self.cursor.match_char('|') {
                    TokenKind::OrOr
                } else {
                    return Err(self.error("unknown operator '|'".to_string()));
                }
            },
            other => {
                return Err(self.error(format!("unknown operator '{}'", other)));
            },
        };

        let text = self.cursor.slice_from(self.token_start);
        Ok(self.make(kind, text))
    }
}

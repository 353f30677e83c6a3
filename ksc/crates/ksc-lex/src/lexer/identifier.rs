//! Identifier and keyword lexing.

use crate::token::{keyword_from_ident, Token, TokenKind};
use crate::Lexer;

/// True for characters that may start an identifier.
pub(crate) fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// True for characters that may continue an identifier.
pub(crate) fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl Lexer<'_> {
    /// Lexes an identifier or keyword.
    ///
    /// Identifiers match `[A-Za-z_][A-Za-z0-9_]*`. Reserved words become
    /// keyword tokens; `true`/`false` become boolean literals.
    pub(crate) fn lex_identifier(&mut self) -> Token {
        while is_ident_continue(self.cursor.current_char()) {
            self.cursor.advance();
        }

        let text = self.cursor.slice_from(self.token_start);
        let kind = keyword_from_ident(text).unwrap_or(TokenKind::Identifier);
        self.make(kind, text)
    }
}

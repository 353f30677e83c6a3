//! Number literal lexing.

use crate::token::{Token, TokenKind};
use crate::Lexer;

impl Lexer<'_> {
    /// Lexes a number literal: `[0-9]+('.'[0-9]*)?`.
    ///
    /// The lexeme keeps the dot; the parser decides integer versus
    /// floating from it. A second dot ends the token, so `1.2.3` is a
    /// number followed by stray characters.
    pub(crate) fn lex_number(&mut self) -> Token {
        while self.cursor.current_char().is_ascii_digit() {
            self.cursor.advance();
        }

        if self.cursor.current_char() == '.' {
            self.cursor.advance();
            while self.cursor.current_char().is_ascii_digit() {
                self.cursor.advance();
            }
        }

        let text = self.cursor.slice_from(self.token_start);
        self.make(TokenKind::Number, text)
    }
}

//! String literal lexing.

use crate::token::{Token, TokenKind};
use crate::Lexer;

impl Lexer<'_> {
    /// Lexes a string literal, resolving escape sequences.
    ///
    /// `\n`, `\t`, `\r`, `\\`, and `\"` map to their characters; any other
    /// escaped character stands for itself with the backslash dropped.
    /// Strings may span lines. A string still open at end of input
    /// terminates silently with the content read so far.
    pub(crate) fn lex_string(&mut self) -> Token {
        self.cursor.advance(); // opening quote

        let mut content = String::new();
        loop {
            if self.cursor.is_at_end() {
                break;
            }

            let c = self.cursor.current_char();
            if c == '"' {
                self.cursor.advance();
                break;
            }

            if c == '\\' {
                self.cursor.advance();
                if self.cursor.is_at_end() {
                    break;
                }
                let escaped = self.cursor.current_char();
                content.push(match escaped {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    '\\' => '\\',
                    '"' => '"',
                    other => other,
                });
                self.cursor.advance();
            } else {
                content.push(c);
                self.cursor.advance();
            }
        }

        self.make(TokenKind::String, content)
    }
}

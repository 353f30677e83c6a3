//! Whitespace and comment skipping.

use crate::Lexer;

impl Lexer<'_> {
    /// Skips spaces, tabs, carriage returns, and `//` line comments.
    ///
    /// Newlines are never skipped here; they come out of the dispatch loop
    /// as tokens. A line comment runs to the newline, not past it.
    pub(crate) fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.cursor.current_char() {
                ' ' | '\t' | '\r' => self.cursor.advance(),
                '/' if self.cursor.peek_char(1) == '/' => self.skip_line_comment(),
                _ => return,
            }
        }
    }

    fn skip_line_comment(&mut self) {
        while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
            self.cursor.advance();
        }
    }
}

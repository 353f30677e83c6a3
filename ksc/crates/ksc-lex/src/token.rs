//! Token definitions for the KS language.

use ksc_util::Span;
use std::fmt;

/// The closed set of token kinds.
///
/// `Newline` and `Whitespace` are trivia: the parser filters them before
/// building the AST. The lexer emits `Newline` tokens but skips whitespace
/// outright, so `Whitespace` never reaches a token stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    // Literals
    Number,
    String,
    Boolean,
    Identifier,

    // Keywords
    Let,
    Func,
    If,
    Else,
    For,
    While,
    Return,
    Gorun,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Assign,
    EqEq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    AndAnd,
    OrOr,
    Bang,

    // Delimiters
    Semicolon,
    Comma,
    LParen,
    RParen,
    LBrace,
    RBrace,

    // Pseudo tokens
    Newline,
    Whitespace,
    Eof,
}

impl TokenKind {
    /// True for tokens the parser drops before parsing.
    pub fn is_trivia(self) -> bool {
        matches!(self, TokenKind::Newline | TokenKind::Whitespace)
    }

    /// True for keywords that can begin a declaration or statement.
    ///
    /// Used by the parser's panic-mode recovery to find a statement
    /// boundary.
    pub fn starts_statement(self) -> bool {
        matches!(
            self,
            TokenKind::Let
                | TokenKind::Func
                | TokenKind::If
                | TokenKind::For
                | TokenKind::While
                | TokenKind::Return
                | TokenKind::Gorun
        )
    }

    /// The display name used by token dumps and error messages.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Number => "NUMBER",
            TokenKind::String => "STRING",
            TokenKind::Boolean => "BOOLEAN",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Let => "LET",
            TokenKind::Func => "FUNC",
            TokenKind::If => "IF",
            TokenKind::Else => "ELSE",
            TokenKind::For => "FOR",
            TokenKind::While => "WHILE",
            TokenKind::Return => "RETURN",
            TokenKind::Gorun => "GORUN",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Star => "STAR",
            TokenKind::Slash => "SLASH",
            TokenKind::Percent => "PERCENT",
            TokenKind::Assign => "ASSIGN",
            TokenKind::EqEq => "EQUAL",
            TokenKind::NotEq => "NOT_EQUAL",
            TokenKind::Lt => "LESS",
            TokenKind::Gt => "GREATER",
            TokenKind::LtEq => "LESS_EQUAL",
            TokenKind::GtEq => "GREATER_EQUAL",
            TokenKind::AndAnd => "AND",
            TokenKind::OrOr => "OR",
            TokenKind::Bang => "NOT",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::Comma => "COMMA",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::LBrace => "LBRACE",
            TokenKind::RBrace => "RBRACE",
            TokenKind::Newline => "NEWLINE",
            TokenKind::Whitespace => "WHITESPACE",
            TokenKind::Eof => "EOF",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single lexical unit.
///
/// `lexeme` is the processed text: for strings, the content with escape
/// sequences resolved; for everything else, the source characters. The
/// span points at the token's first character.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub span: Span,
}

impl Token {
    /// Creates a token.
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span,
        }
    }

    /// Line of the first character (1-based).
    pub fn line(&self) -> u32 {
        self.span.line
    }

    /// Column of the first character (1-based).
    pub fn column(&self) -> u32 {
        self.span.column
    }
}

impl fmt::Display for Token {
    /// One aligned dump row: kind, escaped lexeme, position.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lexeme: String = self.lexeme.escape_debug().collect();
        write!(
            f,
            "{:<14} {:<20} line:{} col:{}",
            self.kind.name(),
            lexeme,
            self.line(),
            self.column()
        )
    }
}

/// Maps reserved words to their keyword kind.
///
/// `true` and `false` map to [`TokenKind::Boolean`], not to keyword kinds.
pub fn keyword_from_ident(text: &str) -> Option<TokenKind> {
    match text {
        "let" => Some(TokenKind::Let),
        "func" => Some(TokenKind::Func),
        "if" => Some(TokenKind::If),
        "else" => Some(TokenKind::Else),
        "for" => Some(TokenKind::For),
        "while" => Some(TokenKind::While),
        "return" => Some(TokenKind::Return),
        "gorun" => Some(TokenKind::Gorun),
        "true" | "false" => Some(TokenKind::Boolean),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_mapping() {
        assert_eq!(keyword_from_ident("let"), Some(TokenKind::Let));
        assert_eq!(keyword_from_ident("func"), Some(TokenKind::Func));
        assert_eq!(keyword_from_ident("gorun"), Some(TokenKind::Gorun));
        assert_eq!(keyword_from_ident("true"), Some(TokenKind::Boolean));
        assert_eq!(keyword_from_ident("false"), Some(TokenKind::Boolean));
        assert_eq!(keyword_from_ident("letx"), None);
        assert_eq!(keyword_from_ident(""), None);
    }

    #[test]
    fn test_trivia_kinds() {
        assert!(TokenKind::Newline.is_trivia());
        assert!(TokenKind::Whitespace.is_trivia());
        assert!(!TokenKind::Eof.is_trivia());
        assert!(!TokenKind::Semicolon.is_trivia());
    }

    #[test]
    fn test_statement_starters() {
        assert!(TokenKind::Let.starts_statement());
        assert!(TokenKind::Gorun.starts_statement());
        assert!(!TokenKind::Else.starts_statement());
        assert!(!TokenKind::Identifier.starts_statement());
    }

    #[test]
    fn test_display_escapes_lexeme() {
        let token = Token::new(TokenKind::Newline, "\n", Span::new(3, 4, 1, 4));
        let row = token.to_string();
        assert!(row.starts_with("NEWLINE"));
        assert!(row.contains("\\n"));
        assert!(row.ends_with("line:1 col:4"));
    }
}

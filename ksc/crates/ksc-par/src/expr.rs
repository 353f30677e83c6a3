//! Expression parsing with binding powers (precedence climbing).
//!
//! # Operator precedence (lowest to highest)
//!
//! | Level | Operators                          | Associativity |
//! |-------|------------------------------------|---------------|
//! | 1     | `=`                                | Right         |
//! | 2     | `\|\|`                             | Left          |
//! | 3     | `&&`                               | Left          |
//! | 4     | `==`, `!=`                         | Left          |
//! | 5     | `<`, `<=`, `>`, `>=`               | Left          |
//! | 6     | `+`, `-`                           | Left          |
//! | 7     | `*`, `/`, `%`                      | Left          |
//!
//! Unary `!`/`-` bind tighter than any binary operator, and calls bind
//! tighter still.

use crate::ast::*;
use crate::{ParseError, Parser};
use ksc_lex::{Token, TokenKind};

/// Binding powers for assignment. Right-associative, so the right-hand
/// side is parsed with a lower minimum than the operator's own power.
const ASSIGN_BP: (u8, u8) = (2, 1);

/// Returns the operator and its (left, right) binding powers for an infix
/// token. Left-associative operators use `right = left + 1`.
fn binary_operator(kind: TokenKind) -> Option<(BinOp, u8, u8)> {
    match kind {
        TokenKind::OrOr => Some((BinOp::Or, 3, 4)),
        TokenKind::AndAnd => Some((BinOp::And, 5, 6)),
        TokenKind::EqEq => Some((BinOp::Eq, 7, 8)),
        TokenKind::NotEq => Some((BinOp::Ne, 7, 8)),
        TokenKind::Lt => Some((BinOp::Lt, 9, 10)),
        TokenKind::Gt => Some((BinOp::Gt, 9, 10)),
        TokenKind::LtEq => Some((BinOp::Le, 9, 10)),
        TokenKind::GtEq => Some((BinOp::Ge, 9, 10)),
        TokenKind::Plus => Some((BinOp::Add, 11, 12)),
        TokenKind::Minus => Some((BinOp::Sub, 11, 12)),
        TokenKind::Star => Some((BinOp::Mul, 13, 14)),
        TokenKind::Slash => Some((BinOp::Div, 13, 14)),
        TokenKind::Percent => Some((BinOp::Rem, 13, 14)),
        _ => None,
    }
}

impl Parser {
    /// Parses a complete expression.
    pub(crate) fn expression(&mut self) -> Result<Expr, ParseError> {
        self.expression_bp(0)
    }

    /// Precedence-climbing core: parses an expression consuming only
    /// operators whose left binding power is at least `min_bp`.
    fn expression_bp(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let mut left = self.unary()?;

        loop {
            let kind = self.peek().kind;

            if kind == TokenKind::Assign {
                let (left_bp, right_bp) = ASSIGN_BP;
                if left_bp < min_bp {
                    break;
                }
                let line = self.peek().line();
                self.advance();
                let value = self.expression_bp(right_bp)?;
                let Expr::Ident(name) = left else {
                    return Err(ParseError {
                        message: "Invalid assignment target".to_string(),
                        line,
                    });
                };
                left = Expr::Assign(AssignExpr {
                    name,
                    value: Box::new(value),
                });
                continue;
            }

            let Some((op, left_bp, right_bp)) = binary_operator(kind) else {
                break;
            };
            if left_bp < min_bp {
                break;
            }

            self.advance();
            let right = self.expression_bp(right_bp)?;
            left = Expr::Binary(BinaryExpr {
                left: Box::new(left),
                op,
                right: Box::new(right),
            });
        }

        Ok(left)
    }

    /// Parses a unary expression: `!`/`-` chains, then calls.
    fn unary(&mut self) -> Result<Expr, ParseError> {
        let op = match self.peek().kind {
            TokenKind::Bang => Some(UnOp::Not),
            TokenKind::Minus => Some(UnOp::Neg),
            _ => None,
        };

        if let Some(op) = op {
            self.advance();
            let operand = self.unary()?;
            return Ok(Expr::Unary(UnaryExpr {
                op,
                operand: Box::new(operand),
            }));
        }

        self.call()
    }

    /// Parses a primary expression followed by any number of call suffixes.
    fn call(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.primary()?;
        while self.match_token(TokenKind::LParen) {
            expr = self.finish_call(expr)?;
        }
        Ok(expr)
    }

    /// Parses the argument list of a call; the `(` is already consumed.
    fn finish_call(&mut self, callee: Expr) -> Result<Expr, ParseError> {
        let mut args = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                args.push(self.expression()?);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "expected ')' after arguments")?;
        Ok(Expr::Call(CallExpr {
            callee: Box::new(callee),
            args,
        }))
    }

    /// Parses a literal, identifier, or parenthesized expression.
    fn primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Boolean => {
                self.advance();
                Ok(Expr::Literal(Literal::Bool(token.lexeme == "true")))
            },
            TokenKind::Number => {
                self.advance();
                self.number_literal(&token)
            },
            TokenKind::String => {
                self.advance();
                Ok(Expr::Literal(Literal::Str(token.lexeme)))
            },
            TokenKind::Identifier => {
                self.advance();
                Ok(Expr::Ident(token.lexeme))
            },
            TokenKind::LParen => {
                self.advance();
                let expr = self.expression()?;
                self.expect(TokenKind::RParen, "expected ')' after expression")?;
                Ok(expr)
            },
            _ => Err(self.error_at_current("expected expression")),
        }
    }

    /// Converts a number lexeme: a dot means floating, otherwise integer.
    /// Integers wider than `i64` fall back to floating.
    fn number_literal(&self, token: &Token) -> Result<Expr, ParseError> {
        let text = &token.lexeme;
        if text.contains('.') {
            match text.parse::<f64>() {
                Ok(value) => Ok(Expr::Literal(Literal::Float(value))),
                Err(_) => Err(self.number_error(token)),
            }
        } else {
            match text.parse::<i64>() {
                Ok(value) => Ok(Expr::Literal(Literal::Int(value))),
                Err(_) => match text.parse::<f64>() {
                    Ok(value) => Ok(Expr::Literal(Literal::Float(value))),
                    Err(_) => Err(self.number_error(token)),
                },
            }
        }
    }

    fn number_error(&self, token: &Token) -> ParseError {
        ParseError {
            message: format!("invalid number literal '{}'", token.lexeme),
            line: token.line(),
        }
    }
}

//! Statement parsing - let, func, if, for, while, return, gorun, blocks.

use crate::ast::*;
use crate::{ParseError, Parser};
use ksc_lex::TokenKind;

impl Parser {
    /// Parses a declaration: function, variable, or any statement.
    pub(crate) fn declaration(&mut self) -> Result<Stmt, ParseError> {
        if self.match_token(TokenKind::Func) {
            return self.func_declaration();
        }
        if self.match_token(TokenKind::Let) {
            return self.var_declaration();
        }
        self.statement()
    }

    /// Parses a function declaration; the `func` keyword is consumed.
    fn func_declaration(&mut self) -> Result<Stmt, ParseError> {
        let name = self
            .expect(TokenKind::Identifier, "expected function name")?
            .lexeme
            .clone();

        self.expect(TokenKind::LParen, "expected '(' after function name")?;
        let mut params = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                let param = self
                    .expect(TokenKind::Identifier, "expected parameter name")?
                    .lexeme
                    .clone();
                params.push(param);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "expected ')' after parameters")?;

        self.expect(TokenKind::LBrace, "expected '{' before function body")?;
        let body = self.block_body()?;

        Ok(Stmt::Func(FuncDecl { name, params, body }))
    }

    /// Parses a variable declaration; the `let` keyword is consumed.
    fn var_declaration(&mut self) -> Result<Stmt, ParseError> {
        let name = self
            .expect(TokenKind::Identifier, "expected variable name")?
            .lexeme
            .clone();

        let init = if self.match_token(TokenKind::Assign) {
            Some(self.expression()?)
        } else {
            None
        };

        self.expect(
            TokenKind::Semicolon,
            "expected ';' after variable declaration",
        )?;
        Ok(Stmt::Var(VarDecl { name, init }))
    }

    /// Parses a non-declaration statement.
    pub(crate) fn statement(&mut self) -> Result<Stmt, ParseError> {
        if self.match_token(TokenKind::Gorun) {
            return self.gorun_statement();
        }
        if self.match_token(TokenKind::Return) {
            return self.return_statement();
        }
        if self.match_token(TokenKind::If) {
            return self.if_statement();
        }
        if self.match_token(TokenKind::For) {
            return self.for_statement();
        }
        if self.match_token(TokenKind::While) {
            return self.while_statement();
        }
        if self.match_token(TokenKind::LBrace) {
            return Ok(Stmt::Block(self.block_body()?));
        }
        self.expression_statement()
    }

    fn gorun_statement(&mut self) -> Result<Stmt, ParseError> {
        self.expect(TokenKind::LParen, "expected '(' after 'gorun'")?;
        let expr = self.expression()?;
        self.expect(TokenKind::RParen, "expected ')' after gorun expression")?;
        self.expect(TokenKind::Semicolon, "expected ';' after gorun statement")?;
        Ok(Stmt::Gorun(expr))
    }

    fn return_statement(&mut self) -> Result<Stmt, ParseError> {
        let value = if !self.check(TokenKind::Semicolon) {
            Some(self.expression()?)
        } else {
            None
        };
        self.expect(TokenKind::Semicolon, "expected ';' after return statement")?;
        Ok(Stmt::Return(value))
    }

    fn if_statement(&mut self) -> Result<Stmt, ParseError> {
        self.expect(TokenKind::LParen, "expected '(' after 'if'")?;
        let cond = self.expression()?;
        self.expect(TokenKind::RParen, "expected ')' after if condition")?;

        let then_branch = Box::new(self.statement()?);
        let else_branch = if self.match_token(TokenKind::Else) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };

        Ok(Stmt::If(IfStmt {
            cond,
            then_branch,
            else_branch,
        }))
    }

    fn for_statement(&mut self) -> Result<Stmt, ParseError> {
        self.expect(TokenKind::LParen, "expected '(' after 'for'")?;

        let init = if self.match_token(TokenKind::Semicolon) {
            None
        } else if self.match_token(TokenKind::Let) {
            Some(Box::new(self.var_declaration()?))
        } else {
            Some(Box::new(self.expression_statement()?))
        };

        let cond = if !self.check(TokenKind::Semicolon) {
            Some(self.expression()?)
        } else {
            None
        };
        self.expect(TokenKind::Semicolon, "expected ';' after loop condition")?;

        let step = if !self.check(TokenKind::RParen) {
            Some(self.expression()?)
        } else {
            None
        };
        self.expect(TokenKind::RParen, "expected ')' after for clauses")?;

        let body = Box::new(self.statement()?);
        Ok(Stmt::For(ForStmt {
            init,
            cond,
            step,
            body,
        }))
    }

    fn while_statement(&mut self) -> Result<Stmt, ParseError> {
        self.expect(TokenKind::LParen, "expected '(' after 'while'")?;
        let cond = self.expression()?;
        self.expect(TokenKind::RParen, "expected ')' after while condition")?;
        let body = Box::new(self.statement()?);
        Ok(Stmt::While(WhileStmt { cond, body }))
    }

    /// Parses the statements of a block; the `{` is already consumed.
    fn block_body(&mut self) -> Result<Vec<Stmt>, ParseError> {
        let mut statements = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            statements.push(self.declaration()?);
        }
        self.expect(TokenKind::RBrace, "expected '}' after block")?;
        Ok(statements)
    }

    fn expression_statement(&mut self) -> Result<Stmt, ParseError> {
        let expr = self.expression()?;
        self.expect(TokenKind::Semicolon, "expected ';' after expression")?;
        Ok(Stmt::Expr(expr))
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::{parse, Program};

    fn parse_source(source: &str) -> Program {
        parse(ksc_lex::tokenize(source).expect("lexes")).expect("parses")
    }

    fn parse_one(source: &str) -> Stmt {
        let mut program = parse_source(source);
        assert_eq!(program.statements.len(), 1);
        program.statements.remove(0)
    }

    #[test]
    fn test_var_declaration() {
        let Stmt::Var(decl) = parse_one("let x = 5;") else {
            panic!("expected var declaration");
        };
        assert_eq!(decl.name, "x");
        assert!(decl.init.is_some());
    }

    #[test]
    fn test_var_declaration_without_init() {
        let Stmt::Var(decl) = parse_one("let x;") else {
            panic!("expected var declaration");
        };
        assert!(decl.init.is_none());
    }

    #[test]
    fn test_func_declaration() {
        let Stmt::Func(decl) = parse_one("func add(a, b) { return a + b; }") else {
            panic!("expected func declaration");
        };
        assert_eq!(decl.name, "add");
        assert_eq!(decl.params, vec!["a", "b"]);
        assert_eq!(decl.body.len(), 1);
        assert!(matches!(decl.body[0], Stmt::Return(Some(_))));
    }

    #[test]
    fn test_func_declaration_no_params() {
        let Stmt::Func(decl) = parse_one("func main() {}") else {
            panic!("expected func declaration");
        };
        assert!(decl.params.is_empty());
        assert!(decl.body.is_empty());
    }

    #[test]
    fn test_gorun_statement() {
        assert!(matches!(parse_one("gorun(1);"), Stmt::Gorun(_)));
    }

    #[test]
    fn test_bare_return() {
        assert!(matches!(parse_one("return;"), Stmt::Return(None)));
    }

    #[test]
    fn test_if_else() {
        let Stmt::If(stmt) = parse_one("if (x > 0) gorun(x); else gorun(0);") else {
            panic!("expected if statement");
        };
        assert!(stmt.else_branch.is_some());
    }

    #[test]
    fn test_if_without_else() {
        let Stmt::If(stmt) = parse_one("if (x) { x = 1; }") else {
            panic!("expected if statement");
        };
        assert!(stmt.else_branch.is_none());
        assert!(matches!(*stmt.then_branch, Stmt::Block(_)));
    }

    #[test]
    fn test_while_statement() {
        let Stmt::While(stmt) = parse_one("while (i < 10) i = i + 1;") else {
            panic!("expected while statement");
        };
        assert!(matches!(stmt.cond, Expr::Binary(_)));
    }

    #[test]
    fn test_for_full_clauses() {
        let Stmt::For(stmt) = parse_one("for (let i = 0; i < 5; i = i + 1) { s = s + i; }")
        else {
            panic!("expected for statement");
        };
        assert!(matches!(stmt.init.as_deref(), Some(Stmt::Var(_))));
        assert!(stmt.cond.is_some());
        assert!(stmt.step.is_some());
    }

    #[test]
    fn test_for_empty_clauses() {
        let Stmt::For(stmt) = parse_one("for (;;) {}") else {
            panic!("expected for statement");
        };
        assert!(stmt.init.is_none());
        assert!(stmt.cond.is_none());
        assert!(stmt.step.is_none());
    }

    #[test]
    fn test_for_expression_init() {
        let Stmt::For(stmt) = parse_one("for (i = 0; i < 5;) {}") else {
            panic!("expected for statement");
        };
        assert!(matches!(stmt.init.as_deref(), Some(Stmt::Expr(_))));
        assert!(stmt.step.is_none());
    }

    #[test]
    fn test_nested_blocks() {
        let Stmt::Block(outer) = parse_one("{ let x = 1; { gorun(x); } }") else {
            panic!("expected block");
        };
        assert_eq!(outer.len(), 2);
        assert!(matches!(outer[1], Stmt::Block(_)));
    }

    #[test]
    fn test_declarations_inside_block() {
        let Stmt::Block(stmts) = parse_one("{ func f() {} let y; }") else {
            panic!("expected block");
        };
        assert!(matches!(stmts[0], Stmt::Func(_)));
        assert!(matches!(stmts[1], Stmt::Var(_)));
    }

    #[test]
    fn test_program_keeps_statement_order() {
        let program = parse_source("let a = 1; gorun(a); a = 2;");
        assert_eq!(program.statements.len(), 3);
        assert!(matches!(program.statements[0], Stmt::Var(_)));
        assert!(matches!(program.statements[1], Stmt::Gorun(_)));
        assert!(matches!(program.statements[2], Stmt::Expr(Expr::Assign(_))));
    }
}

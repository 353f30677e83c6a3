//! ksc-eval - Tree-walking evaluator for the KS language.
//!
//! Walks the AST produced by `ksc-par` against a chain of lexical
//! environments. Dispatch is a single match on the node variant; `return`
//! is a non-local unwind carried on the executor's error channel and
//! caught at the function-call boundary.
//!
//! # Examples
//!
//! ```
//! use ksc_eval::Interpreter;
//!
//! let tokens = ksc_lex::tokenize("gorun(1 + 2);").unwrap();
//! let program = ksc_par::parse(tokens).unwrap();
//! Interpreter::new().interpret(&program).unwrap();
//! // prints: 3
//! ```

mod env;
mod error;
mod value;

pub use env::{EnvRef, Environment};
pub use error::RuntimeError;
pub use value::{Function, Value};

use ksc_par::ast::{BinaryExpr, CallExpr, Expr, ForStmt, Program, Stmt, UnOp};
use std::io::Write;

/// Non-local control raised while executing statements.
///
/// `Return` unwinds to the nearest enclosing function call; `Error`
/// aborts evaluation entirely. Both travel the same channel so the `?`
/// operator propagates them through blocks, loops, and conditionals
/// while environment restoration still runs.
enum Unwind {
    Return(Value),
    Error(RuntimeError),
}

impl From<RuntimeError> for Unwind {
    fn from(err: RuntimeError) -> Self {
        Unwind::Error(err)
    }
}

type Exec = Result<(), Unwind>;
type Eval = Result<Value, Unwind>;

/// Executes a program against a fresh global environment, printing
/// `gorun` output to stdout.
pub fn interpret(program: &Program) -> Result<(), RuntimeError> {
    Interpreter::new().interpret(program)
}

/// AST-walking interpreter.
///
/// Holds the current environment (innermost scope) and the sink `gorun`
/// writes to. One interpreter can run many programs in sequence against
/// the same globals, which is exactly what the interactive driver does.
pub struct Interpreter {
    env: EnvRef,
    output: Box<dyn Write>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// Creates an interpreter writing `gorun` output to stdout.
    pub fn new() -> Self {
        Self::with_output(Box::new(std::io::stdout()))
    }

    /// Creates an interpreter writing `gorun` output to the given sink.
    pub fn with_output(output: Box<dyn Write>) -> Self {
        Self {
            env: Environment::global(),
            output,
        }
    }

    /// Executes each top-level statement in order.
    ///
    /// The first runtime error aborts the run; bindings created by
    /// statements that already executed remain visible on later calls.
    pub fn interpret(&mut self, program: &Program) -> Result<(), RuntimeError> {
        for statement in &program.statements {
            match self.execute(statement) {
                Ok(()) => {},
                Err(Unwind::Return(_)) => return Err(RuntimeError::ReturnOutsideFunction),
                Err(Unwind::Error(err)) => return Err(err),
            }
        }
        Ok(())
    }

    fn execute(&mut self, statement: &Stmt) -> Exec {
        match statement {
            Stmt::Var(decl) => {
                let value = match &decl.init {
                    Some(init) => self.evaluate(init)?,
                    None => Value::Null,
                };
                self.env.borrow_mut().define(&decl.name, value);
                Ok(())
            },
            Stmt::Func(decl) => {
                let function = Value::function(decl.clone(), self.env.clone());
                self.env.borrow_mut().define(&decl.name, function);
                Ok(())
            },
            Stmt::Expr(expr) => {
                self.evaluate(expr)?;
                Ok(())
            },
            Stmt::Block(statements) => {
                let scope = Environment::with_parent(self.env.clone());
                self.execute_block(statements, scope)
            },
            Stmt::If(stmt) => {
                if self.evaluate(&stmt.cond)?.is_truthy() {
                    self.execute(&stmt.then_branch)
                } else if let Some(else_branch) = &stmt.else_branch {
                    self.execute(else_branch)
                } else {
                    Ok(())
                }
            },
            Stmt::While(stmt) => {
                while self.evaluate(&stmt.cond)?.is_truthy() {
                    self.execute(&stmt.body)?;
                }
                Ok(())
            },
            Stmt::For(stmt) => self.execute_for(stmt),
            Stmt::Return(value) => {
                let value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Null,
                };
                Err(Unwind::Return(value))
            },
            Stmt::Gorun(expr) => {
                let value = self.evaluate(expr)?;
                writeln!(self.output, "{}", value.stringify()).map_err(RuntimeError::Io)?;
                Ok(())
            },
        }
    }

    /// Runs statements in `scope`, restoring the previous environment
    /// afterwards even when an error or a return unwinds out.
    fn execute_block(&mut self, statements: &[Stmt], scope: EnvRef) -> Exec {
        let previous = std::mem::replace(&mut self.env, scope);
        let result = statements
            .iter()
            .try_for_each(|statement| self.execute(statement));
        self.env = previous;
        result
    }

    /// A `for` loop owns one fresh scope around init, condition, body,
    /// and step; an absent condition means true.
    fn execute_for(&mut self, stmt: &ForStmt) -> Exec {
        let scope = Environment::with_parent(self.env.clone());
        let previous = std::mem::replace(&mut self.env, scope);
        let result = self.run_for_clauses(stmt);
        self.env = previous;
        result
    }

    fn run_for_clauses(&mut self, stmt: &ForStmt) -> Exec {
        if let Some(init) = &stmt.init {
            self.execute(init)?;
        }
        loop {
            if let Some(cond) = &stmt.cond {
                if !self.evaluate(cond)?.is_truthy() {
                    return Ok(());
                }
            }
            self.execute(&stmt.body)?;
            if let Some(step) = &stmt.step {
                self.evaluate(step)?;
            }
        }
    }

    fn evaluate(&mut self, expr: &Expr) -> Eval {
        match expr {
            Expr::Literal(literal) => Ok(Value::from_literal(literal)),
            Expr::Ident(name) => self
                .env
                .borrow()
                .get(name)
                .ok_or_else(|| RuntimeError::UndefinedVariable(name.clone()).into()),
            Expr::Assign(assign) => {
                let value = self.evaluate(&assign.value)?;
                if self.env.borrow_mut().assign(&assign.name, value.clone()) {
                    Ok(value)
                } else {
                    Err(RuntimeError::UndefinedVariable(assign.name.clone()).into())
                }
            },
            Expr::Unary(unary) => {
                let operand = self.evaluate(&unary.operand)?;
                match unary.op {
                    UnOp::Not => Ok(Value::Bool(!operand.is_truthy())),
                    UnOp::Neg => match operand {
                        Value::Int(n) => Ok(n
                            .checked_neg()
                            .map(Value::Int)
                            .unwrap_or(Value::Float(-(n as f64)))),
                        Value::Float(x) => Ok(Value::Float(-x)),
                        _ => Err(RuntimeError::NumberOperand.into()),
                    },
                }
            },
            Expr::Binary(binary) => self.evaluate_binary(binary),
            Expr::Call(call) => self.evaluate_call(call),
        }
    }

    fn evaluate_binary(&mut self, binary: &BinaryExpr) -> Eval {
        use ksc_par::ast::BinOp;

        // Logical operators short-circuit and normalize to booleans; the
        // right operand must not be evaluated past a deciding left.
        match binary.op {
            BinOp::And => {
                let left = self.evaluate(&binary.left)?;
                if !left.is_truthy() {
                    return Ok(Value::Bool(false));
                }
                let right = self.evaluate(&binary.right)?;
                return Ok(Value::Bool(right.is_truthy()));
            },
            BinOp::Or => {
                let left = self.evaluate(&binary.left)?;
                if left.is_truthy() {
                    return Ok(Value::Bool(true));
                }
                let right = self.evaluate(&binary.right)?;
                return Ok(Value::Bool(right.is_truthy()));
            },
            _ => {},
        }

        let left = self.evaluate(&binary.left)?;
        let right = self.evaluate(&binary.right)?;
        value::apply_binary(binary.op, &left, &right).map_err(Unwind::Error)
    }

    /// Calls a function value: arguments evaluate left-to-right and fully
    /// materialize before the body runs.
    fn evaluate_call(&mut self, call: &CallExpr) -> Eval {
        let callee = self.evaluate(&call.callee)?;

        let mut args = Vec::with_capacity(call.args.len());
        for arg in &call.args {
            args.push(self.evaluate(arg)?);
        }

        let Value::Function(function) = callee else {
            return Err(RuntimeError::NotCallable.into());
        };

        if args.len() != function.declaration.params.len() {
            return Err(RuntimeError::Arity {
                expected: function.declaration.params.len(),
                found: args.len(),
            }
            .into());
        }

        // Parameters bind in a fresh child of the environment captured at
        // declaration, not of the caller's environment.
        let scope = Environment::with_parent(function.closure.clone());
        {
            let mut bindings = scope.borrow_mut();
            for (param, arg) in function.declaration.params.iter().zip(args) {
                bindings.define(param, arg);
            }
        }

        match self.execute_block(&function.declaration.body, scope) {
            Ok(()) => Ok(Value::Null),
            Err(Unwind::Return(value)) => Ok(value),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Shared byte sink so tests can read what `gorun` printed.
    #[derive(Clone, Default)]
    struct Sink(Rc<RefCell<Vec<u8>>>);

    impl Write for Sink {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn run(source: &str) -> Result<String, RuntimeError> {
        let sink = Sink::default();
        let mut interpreter = Interpreter::with_output(Box::new(sink.clone()));
        run_on(&mut interpreter, source)?;
        let bytes = sink.0.borrow().clone();
        Ok(String::from_utf8(bytes).expect("utf8 output"))
    }

    fn run_on(interpreter: &mut Interpreter, source: &str) -> Result<(), RuntimeError> {
        let tokens = ksc_lex::tokenize(source).expect("lexes");
        let program = ksc_par::parse(tokens).expect("parses");
        interpreter.interpret(&program)
    }

    fn output(source: &str) -> String {
        run(source).expect("runs")
    }

    #[test]
    fn test_gorun_prints_one_line_per_call() {
        assert_eq!(output("gorun(1); gorun(\"two\"); gorun(true);"), "1\ntwo\ntrue\n");
    }

    #[test]
    fn test_mixed_arithmetic_and_concat() {
        assert_eq!(
            output("gorun(1 + 2); gorun(\"x=\" + 3); gorun(7 / 2); gorun(7 % 2);"),
            "3\nx=3\n3.5\n1\n"
        );
    }

    #[test]
    fn test_short_circuit_and_truthiness() {
        // 0 is truthy, so && evaluates both sides; logical results are
        // normalized booleans, never the operand.
        assert_eq!(
            output("gorun(0 && \"unused\"); gorun(null && 1); gorun(null || \"fallback\"); gorun(!null);"),
            "true\nfalse\ntrue\ntrue\n"
        );
    }

    #[test]
    fn test_short_circuit_skips_right_side_effects() {
        let source = "
            let called = 0;
            func mark() { called = 1; return true; }
            let a = false && mark();
            gorun(called);
            let b = true || mark();
            gorun(called);
            let c = true && mark();
            gorun(called);
        ";
        assert_eq!(output(source), "0\n0\n1\n");
    }

    #[test]
    fn test_closure_counter() {
        let source = "
            func make() {
                let n = 0;
                func inc() {
                    n = n + 1;
                    return n;
                }
                return inc;
            }
            let f = make();
            gorun(f());
            gorun(f());
            gorun(f());
        ";
        assert_eq!(output(source), "1\n2\n3\n");
    }

    #[test]
    fn test_independent_closures() {
        let source = "
            func make() {
                let n = 0;
                func inc() { n = n + 1; return n; }
                return inc;
            }
            let a = make();
            let b = make();
            gorun(a());
            gorun(a());
            gorun(b());
        ";
        assert_eq!(output(source), "1\n2\n1\n");
    }

    #[test]
    fn test_closure_sees_later_mutation() {
        let source = "
            let x = 1;
            func show() { gorun(x); }
            x = 2;
            show();
        ";
        assert_eq!(output(source), "2\n");
    }

    #[test]
    fn test_for_loop_sum() {
        assert_eq!(
            output("let s = 0; for (let i = 0; i < 5; i = i + 1) { s = s + i; } gorun(s);"),
            "10\n"
        );
    }

    #[test]
    fn test_for_loop_variable_is_scoped() {
        let err = run("for (let i = 0; i < 1; i = i + 1) {} gorun(i);").unwrap_err();
        assert!(matches!(err, RuntimeError::UndefinedVariable(name) if name == "i"));
    }

    #[test]
    fn test_while_loop() {
        assert_eq!(
            output("let i = 0; while (i < 3) { gorun(i); i = i + 1; }"),
            "0\n1\n2\n"
        );
    }

    #[test]
    fn test_scope_shadowing() {
        assert_eq!(
            output("let x = 1; { let x = 2; gorun(x); } gorun(x);"),
            "2\n1\n"
        );
    }

    #[test]
    fn test_assignment_targets_outer_scope() {
        assert_eq!(output("let x = 1; { x = 2; } gorun(x);"), "2\n");
    }

    #[test]
    fn test_if_else_branches() {
        assert_eq!(
            output("if (1 < 2) gorun(\"yes\"); else gorun(\"no\"); if (null) gorun(1); else gorun(2);"),
            "yes\n2\n"
        );
    }

    #[test]
    fn test_recursion() {
        let source = "
            func fib(n) {
                if (n <= 1) { return n; }
                return fib(n - 1) + fib(n - 2);
            }
            gorun(fib(10));
        ";
        assert_eq!(output(source), "55\n");
    }

    #[test]
    fn test_return_unwinds_through_loops() {
        let source = "
            func first() {
                for (let i = 0; i < 10; i = i + 1) {
                    if (i == 3) { return i; }
                }
                return -1;
            }
            gorun(first());
        ";
        assert_eq!(output(source), "3\n");
    }

    #[test]
    fn test_function_without_return_yields_null() {
        assert_eq!(output("func f() {} gorun(f());"), "null\n");
    }

    #[test]
    fn test_bare_return_yields_null() {
        assert_eq!(output("func f() { return; gorun(\"dead\"); } gorun(f());"), "null\n");
    }

    #[test]
    fn test_arguments_evaluate_left_to_right() {
        let source = "
            func two(a, b) { return b; }
            let trace = \"\";
            func log(v) { trace = trace + v; return v; }
            two(log(1), log(2));
            gorun(trace);
        ";
        assert_eq!(output(source), "12\n");
    }

    #[test]
    fn test_division_by_zero() {
        assert!(matches!(run("gorun(1 / 0);"), Err(RuntimeError::DivisionByZero)));
    }

    #[test]
    fn test_undefined_variable() {
        let err = run("gorun(missing);").unwrap_err();
        assert_eq!(err.to_string(), "Undefined variable 'missing'");
    }

    #[test]
    fn test_assignment_to_undefined_is_error() {
        let err = run("ghost = 1;").unwrap_err();
        assert_eq!(err.to_string(), "Undefined variable 'ghost'");
    }

    #[test]
    fn test_calling_non_function() {
        let err = run("let x = 1; x();").unwrap_err();
        assert_eq!(err.to_string(), "Can only call functions");
    }

    #[test]
    fn test_arity_mismatch() {
        let err = run("func f(a, b) {} f(1);").unwrap_err();
        assert_eq!(err.to_string(), "Expected 2 arguments but got 1");
    }

    #[test]
    fn test_return_outside_function() {
        let err = run("return 1;").unwrap_err();
        assert!(matches!(err, RuntimeError::ReturnOutsideFunction));
    }

    #[test]
    fn test_unary_minus_type_error() {
        let err = run("gorun(-\"x\");").unwrap_err();
        assert_eq!(err.to_string(), "Operand must be a number");
    }

    #[test]
    fn test_environment_restored_after_error_in_block() {
        let sink = Sink::default();
        let mut interpreter = Interpreter::with_output(Box::new(sink.clone()));
        assert!(run_on(&mut interpreter, "let x = 1; { let x = 2; gorun(1/0); }").is_err());
        // The inner scope is gone; the outer binding is intact.
        run_on(&mut interpreter, "gorun(x);").expect("runs");
        let printed = String::from_utf8(sink.0.borrow().clone()).expect("utf8");
        assert_eq!(printed, "1\n");
    }

    #[test]
    fn test_globals_survive_across_interprets() {
        let sink = Sink::default();
        let mut interpreter = Interpreter::with_output(Box::new(sink.clone()));
        run_on(&mut interpreter, "let x = 40;").expect("runs");
        run_on(&mut interpreter, "x = x + 2;").expect("runs");
        run_on(&mut interpreter, "gorun(x);").expect("runs");
        let printed = String::from_utf8(sink.0.borrow().clone()).expect("utf8");
        assert_eq!(printed, "42\n");
    }

    #[test]
    fn test_determinism() {
        let source = "
            func make() {
                let n = 0;
                func inc() { n = n + 1; return n; }
                return inc;
            }
            let f = make();
            for (let i = 0; i < 3; i = i + 1) { gorun(f() * 10); }
        ";
        assert_eq!(output(source), output(source));
    }

    #[test]
    fn test_equality_round_trips() {
        assert_eq!(
            output("gorun(1 == 1.0); gorun(\"a\" == \"a\"); gorun(null == null); gorun(null == false);"),
            "true\ntrue\ntrue\nfalse\n"
        );
    }

    #[test]
    fn test_double_negation_normalizes() {
        assert_eq!(
            output("gorun(!!0); gorun(!!null); gorun(!!\"\"); gorun(!!false);"),
            "true\nfalse\ntrue\nfalse\n"
        );
    }

    #[test]
    fn test_function_stringifies_with_label() {
        assert_eq!(output("func f() {} gorun(f);"), "<func f>\n");
    }
}

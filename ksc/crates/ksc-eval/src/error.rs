//! Runtime error definitions.

use thiserror::Error;

/// Errors raised while evaluating a program.
///
/// These are not catchable from KS code; the first one aborts the current
/// `interpret` call. Bindings created by statements that already ran stay
/// visible, which interactive mode depends on.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Lookup or assignment of a name no scope defines.
    #[error("Undefined variable '{0}'")]
    UndefinedVariable(String),

    /// `/` or `%` with a zero right-hand side.
    #[error("Division by zero")]
    DivisionByZero,

    /// Call target that is not a function value.
    #[error("Can only call functions")]
    NotCallable,

    /// Call with the wrong number of arguments.
    #[error("Expected {expected} arguments but got {found}")]
    Arity { expected: usize, found: usize },

    /// Unary `-` applied to a non-number.
    #[error("Operand must be a number")]
    NumberOperand,

    /// Arithmetic on operands that are not numbers.
    #[error("Operands must be numbers")]
    NumberOperands,

    /// Ordering comparison between anything but two numbers or two
    /// strings.
    #[error("Operands must be two numbers or two strings")]
    ComparableOperands,

    /// `return` reached the top level without an enclosing function.
    #[error("Cannot return outside of a function")]
    ReturnOutsideFunction,

    /// The output sink failed while printing.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

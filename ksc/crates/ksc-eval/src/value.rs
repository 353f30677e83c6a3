//! Runtime values and the coercion rules between them.

use crate::env::EnvRef;
use crate::error::RuntimeError;
use ksc_par::ast::{BinOp, FuncDecl, Literal};
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

/// A runtime value.
///
/// Integers and floats are distinct at construction but interoperate in
/// arithmetic, comparison, and equality. Strings and functions sit behind
/// shared pointers so cloning a value is cheap.
#[derive(Clone, Debug)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Rc<str>),
    Function(Rc<Function>),
}

/// A user function bundled with the environment captured when its
/// declaration executed.
pub struct Function {
    pub declaration: FuncDecl,
    pub closure: EnvRef,
}

impl fmt::Debug for Function {
    // The closure chain can point back at the environment holding this
    // function, so never print it.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<func {}>", self.declaration.name)
    }
}

impl Value {
    /// Builds the function value for a declaration executed in `closure`.
    pub fn function(declaration: FuncDecl, closure: EnvRef) -> Self {
        Value::Function(Rc::new(Function {
            declaration,
            closure,
        }))
    }

    /// Converts a source literal into its runtime value.
    pub fn from_literal(literal: &Literal) -> Self {
        match literal {
            Literal::Int(n) => Value::Int(*n),
            Literal::Float(x) => Value::Float(*x),
            Literal::Str(s) => Value::Str(Rc::from(s.as_str())),
            Literal::Bool(b) => Value::Bool(*b),
        }
    }

    /// Only `null` and `false` are falsy. Zero and the empty string are
    /// truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            _ => true,
        }
    }

    /// Canonical display form used by `gorun` and string concatenation.
    ///
    /// Integral floats print without a fractional part, so `3.0` prints
    /// as `3`.
    pub fn stringify(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(true) => "true".to_string(),
            Value::Bool(false) => "false".to_string(),
            Value::Int(n) => n.to_string(),
            Value::Float(x) => x.to_string(),
            Value::Str(s) => s.to_string(),
            Value::Function(f) => format!("<func {}>", f.declaration.name),
        }
    }
}

impl PartialEq for Value {
    /// Structural equality; numbers compare across the integer/floating
    /// divide, functions compare by identity, and `null` equals only
    /// `null`.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
                *a as f64 == *b
            },
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Two numeric operands lifted to a common representation.
enum NumPair {
    Ints(i64, i64),
    Floats(f64, f64),
}

fn numeric_pair(left: &Value, right: &Value) -> Option<NumPair> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Some(NumPair::Ints(*a, *b)),
        (Value::Int(a), Value::Float(b)) => Some(NumPair::Floats(*a as f64, *b)),
        (Value::Float(a), Value::Int(b)) => Some(NumPair::Floats(*a, *b as f64)),
        (Value::Float(a), Value::Float(b)) => Some(NumPair::Floats(*a, *b)),
        _ => None,
    }
}

/// Applies a binary operator to two already-evaluated operands.
///
/// `&&` and `||` normally short-circuit in the evaluator and only reach
/// this function when both sides were evaluated anyway; the fallback here
/// produces the same normalized boolean.
pub(crate) fn apply_binary(
    op: BinOp,
    left: &Value,
    right: &Value,
) -> Result<Value, RuntimeError> {
    match op {
        BinOp::Add => add(left, right),
        BinOp::Sub => arithmetic(left, right, i64::checked_sub, |a, b| a - b),
        BinOp::Mul => arithmetic(left, right, i64::checked_mul, |a, b| a * b),
        BinOp::Div => divide(left, right),
        BinOp::Rem => modulo(left, right),
        BinOp::Eq => Ok(Value::Bool(left == right)),
        BinOp::Ne => Ok(Value::Bool(left != right)),
        BinOp::Lt => compare(left, right, Ordering::is_lt),
        BinOp::Le => compare(left, right, Ordering::is_le),
        BinOp::Gt => compare(left, right, Ordering::is_gt),
        BinOp::Ge => compare(left, right, Ordering::is_ge),
        BinOp::And => Ok(Value::Bool(left.is_truthy() && right.is_truthy())),
        BinOp::Or => Ok(Value::Bool(left.is_truthy() || right.is_truthy())),
    }
}

/// `+` concatenates when either side is a string, otherwise adds.
fn add(left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    if matches!(left, Value::Str(_)) || matches!(right, Value::Str(_)) {
        let mut text = left.stringify();
        text.push_str(&right.stringify());
        return Ok(Value::Str(Rc::from(text)));
    }
    arithmetic(left, right, i64::checked_add, |a, b| a + b)
}

/// Numeric arithmetic. Integer results that overflow `i64` promote to
/// floating point.
fn arithmetic(
    left: &Value,
    right: &Value,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> Result<Value, RuntimeError> {
    match numeric_pair(left, right) {
        Some(NumPair::Ints(a, b)) => Ok(int_op(a, b)
            .map(Value::Int)
            .unwrap_or_else(|| Value::Float(float_op(a as f64, b as f64)))),
        Some(NumPair::Floats(a, b)) => Ok(Value::Float(float_op(a, b))),
        None => Err(RuntimeError::NumberOperands),
    }
}

/// Division always produces a floating result; canonical stringification
/// folds integral quotients back to digit form.
fn divide(left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    let Some(pair) = numeric_pair(left, right) else {
        return Err(RuntimeError::NumberOperands);
    };
    let (a, b) = match pair {
        NumPair::Ints(a, b) => (a as f64, b as f64),
        NumPair::Floats(a, b) => (a, b),
    };
    if b == 0.0 {
        return Err(RuntimeError::DivisionByZero);
    }
    Ok(Value::Float(a / b))
}

/// Floored remainder: the result takes the sign of the divisor.
fn modulo(left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    match numeric_pair(left, right) {
        Some(NumPair::Ints(a, b)) => {
            if b == 0 {
                return Err(RuntimeError::DivisionByZero);
            }
            Ok(Value::Int(floored_rem_i64(a, b)))
        },
        Some(NumPair::Floats(a, b)) => {
            if b == 0.0 {
                return Err(RuntimeError::DivisionByZero);
            }
            Ok(Value::Float(floored_rem_f64(a, b)))
        },
        None => Err(RuntimeError::NumberOperands),
    }
}

fn floored_rem_i64(a: i64, b: i64) -> i64 {
    // wrapping_rem: i64::MIN % -1 is 0, not an overflow.
    let r = a.wrapping_rem(b);
    if r != 0 && (r < 0) != (b < 0) {
        r + b
    } else {
        r
    }
}

fn floored_rem_f64(a: f64, b: f64) -> f64 {
    let r = a % b;
    if r != 0.0 && (r < 0.0) != (b < 0.0) {
        r + b
    } else {
        r
    }
}

/// Ordering is defined between two numbers or two strings
/// (lexicographic). Incomparable floats (NaN) compare false.
fn compare(
    left: &Value,
    right: &Value,
    test: fn(Ordering) -> bool,
) -> Result<Value, RuntimeError> {
    let ordering = match (left, right) {
        (Value::Str(a), Value::Str(b)) => a.cmp(b),
        _ => match numeric_pair(left, right) {
            Some(NumPair::Ints(a, b)) => a.cmp(&b),
            Some(NumPair::Floats(a, b)) => match a.partial_cmp(&b) {
                Some(ordering) => ordering,
                None => return Ok(Value::Bool(false)),
            },
            None => return Err(RuntimeError::ComparableOperands),
        },
    };
    Ok(Value::Bool(test(ordering)))
}

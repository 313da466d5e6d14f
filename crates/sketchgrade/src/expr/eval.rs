//! Whitelist resolution and evaluation.

use std::f64::consts::{E, PI};
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::guard::invalid_ops_suppressed;
use super::parser::{formula, Ast, BinOp};
use super::ExprError;

/// Why a formula has no value at a particular `x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("division by zero")]
    DivisionByZero,
    /// Argument outside the function's real domain.
    #[error("math domain error in {0}")]
    Domain(&'static str),
    /// Overflow to infinity.
    #[error("result out of range")]
    NonFinite,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Func1 {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Asinh,
    Acosh,
    Atanh,
    Exp,
    Log,
    Sqrt,
    Abs,
    Sign,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Func2 {
    Atan2,
    LogBase,
}

fn unary_function(name: &str) -> Option<Func1> {
    Some(match name {
        "sin" => Func1::Sin,
        "cos" => Func1::Cos,
        "tan" => Func1::Tan,
        "asin" | "arcsin" => Func1::Asin,
        "acos" | "arccos" => Func1::Acos,
        "atan" | "arctan" => Func1::Atan,
        "sinh" => Func1::Sinh,
        "cosh" => Func1::Cosh,
        "tanh" => Func1::Tanh,
        "asinh" | "arcsinh" => Func1::Asinh,
        "acosh" | "arccosh" => Func1::Acosh,
        "atanh" | "arctanh" => Func1::Atanh,
        "exp" => Func1::Exp,
        "log" => Func1::Log,
        "sqrt" => Func1::Sqrt,
        "abs" => Func1::Abs,
        "sign" => Func1::Sign,
        _ => return None,
    })
}

fn binary_function(name: &str) -> Option<Func2> {
    match name {
        "atan2" | "arctan2" => Some(Func2::Atan2),
        "log" => Some(Func2::LogBase),
        _ => None,
    }
}

fn constant(name: &str) -> Option<f64> {
    match name {
        "pi" => Some(PI),
        "e" => Some(E),
        _ => None,
    }
}

/// `y` is accepted as an alias of the variable for xy-flipped graders.
fn is_variable(name: &str) -> bool {
    matches!(name, "x" | "y")
}

/// Resolved expression tree: only whitelisted operations remain.
#[derive(Clone, Debug, PartialEq)]
enum Node {
    Const(f64),
    Var,
    Neg(Box<Node>),
    Bin(BinOp, Box<Node>, Box<Node>),
    Call1(Func1, Box<Node>),
    Call2(Func2, Box<Node>, Box<Node>),
}

fn resolve(ast: &Ast) -> Result<Node, ExprError> {
    Ok(match ast {
        Ast::Number(v) => Node::Const(*v),
        Ast::Name(n) if is_variable(n) => Node::Var,
        Ast::Name(n) => match constant(n) {
            Some(v) => Node::Const(v),
            None if unary_function(n).is_some() || binary_function(n).is_some() => {
                return Err(ExprError::UnsupportedExpression(format!(
                    "function `{n}` used as a value"
                )))
            }
            None => return Err(ExprError::UnknownIdentifier(n.clone())),
        },
        Ast::Neg(inner) => Node::Neg(Box::new(resolve(inner)?)),
        Ast::Pos(inner) => resolve(inner)?,
        Ast::Binary(op, l, r) => Node::Bin(*op, Box::new(resolve(l)?), Box::new(resolve(r)?)),
        Ast::Call(name, args) => match args.as_slice() {
            [a] => match unary_function(name) {
                Some(f) => Node::Call1(f, Box::new(resolve(a)?)),
                None => return Err(not_callable(name, 1)),
            },
            [a, b] => match binary_function(name) {
                Some(f) => Node::Call2(f, Box::new(resolve(a)?), Box::new(resolve(b)?)),
                None => return Err(not_callable(name, 2)),
            },
            _ => return Err(not_callable(name, args.len())),
        },
        Ast::Unsupported(what, _) => return Err(ExprError::UnsupportedExpression(what.clone())),
    })
}

fn not_callable(name: &str, arity: usize) -> ExprError {
    let known = unary_function(name).is_some()
        || binary_function(name).is_some()
        || constant(name).is_some()
        || is_variable(name);
    if known {
        ExprError::UnsupportedExpression(format!("`{name}` called with {arity} argument(s)"))
    } else {
        ExprError::UnknownIdentifier(name.to_string())
    }
}

#[inline]
fn domain(ok: bool, name: &'static str, v: f64) -> Result<f64, EvalError> {
    if ok {
        Ok(v)
    } else {
        Err(EvalError::Domain(name))
    }
}

fn apply1(f: Func1, a: f64) -> Result<f64, EvalError> {
    match f {
        Func1::Sin => Ok(a.sin()),
        Func1::Cos => Ok(a.cos()),
        Func1::Tan => Ok(a.tan()),
        Func1::Asin => domain((-1.0..=1.0).contains(&a), "asin", a.asin()),
        Func1::Acos => domain((-1.0..=1.0).contains(&a), "acos", a.acos()),
        Func1::Atan => Ok(a.atan()),
        Func1::Sinh => Ok(a.sinh()),
        Func1::Cosh => Ok(a.cosh()),
        Func1::Tanh => Ok(a.tanh()),
        Func1::Asinh => Ok(a.asinh()),
        Func1::Acosh => domain(a >= 1.0, "acosh", a.acosh()),
        Func1::Atanh => domain(a > -1.0 && a < 1.0, "atanh", a.atanh()),
        Func1::Exp => Ok(a.exp()),
        Func1::Log => domain(a > 0.0, "log", a.ln()),
        Func1::Sqrt => domain(a >= 0.0, "sqrt", a.sqrt()),
        Func1::Abs => Ok(a.abs()),
        // |x| / x: undefined at zero.
        Func1::Sign if a == 0.0 => Err(EvalError::DivisionByZero),
        Func1::Sign => Ok(a.signum()),
    }
}

fn apply2(f: Func2, a: f64, b: f64) -> Result<f64, EvalError> {
    match f {
        Func2::Atan2 => Ok(a.atan2(b)),
        Func2::LogBase => {
            if a <= 0.0 || b <= 0.0 {
                return Err(EvalError::Domain("log"));
            }
            let lb = b.ln();
            if lb == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            Ok(a.ln() / lb)
        }
    }
}

fn checked(v: f64) -> Result<f64, EvalError> {
    if v.is_nan() {
        Err(EvalError::Domain("arithmetic"))
    } else if v.is_infinite() {
        Err(EvalError::NonFinite)
    } else {
        Ok(v)
    }
}

impl Node {
    fn eval(&self, x: f64) -> Result<f64, EvalError> {
        let v = match self {
            Node::Const(v) => *v,
            Node::Var => x,
            Node::Neg(a) => -a.eval(x)?,
            Node::Bin(op, l, r) => {
                let (a, b) = (l.eval(x)?, r.eval(x)?);
                match op {
                    BinOp::Add => a + b,
                    BinOp::Sub => a - b,
                    BinOp::Mul => a * b,
                    BinOp::Div => {
                        if b == 0.0 {
                            return Err(EvalError::DivisionByZero);
                        }
                        a / b
                    }
                    BinOp::Pow => {
                        if a == 0.0 && b < 0.0 {
                            return Err(EvalError::DivisionByZero);
                        }
                        if a < 0.0 && b.fract() != 0.0 {
                            return Err(EvalError::Domain("pow"));
                        }
                        a.powf(b)
                    }
                }
            }
            Node::Call1(f, a) => apply1(*f, a.eval(x)?)?,
            Node::Call2(f, a, b) => apply2(*f, a.eval(x)?, b.eval(x)?)?,
        };
        checked(v)
    }
}

/// A compiled formula, pure in `x`.
#[derive(Clone, Debug, PartialEq)]
pub struct Function {
    source: String,
    root: Node,
}

impl Function {
    pub fn parse(source: &str) -> Result<Self, ExprError> {
        let ast = formula::root(source).map_err(|e| ExprError::Syntax {
            offset: e.location.offset,
            expected: e.expected.to_string(),
        })?;
        Ok(Self {
            source: source.to_string(),
            root: resolve(&ast)?,
        })
    }

    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn try_eval(&self, x: f64) -> Result<f64, EvalError> {
        self.root.eval(x)
    }

    /// Value at `x`, or `None` where the formula is undefined.
    ///
    /// Domain errors and overflow are reported through `tracing` unless an
    /// `InvalidOpGuard` is active.
    pub fn eval(&self, x: f64) -> Option<f64> {
        match self.try_eval(x) {
            Ok(v) => Some(v),
            Err(err) => {
                if !matches!(err, EvalError::DivisionByZero) && !invalid_ops_suppressed() {
                    tracing::warn!(fun = %self.source, x, %err, "invalid operation");
                }
                None
            }
        }
    }
}

impl FromStr for Function {
    type Err = ExprError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Function::parse(s)
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

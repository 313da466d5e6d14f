//! Expression sandbox for instructor-supplied formulas in `x`.
//!
//! Purpose
//! - Parse a formula into an AST (`parser`), resolve it against a fixed whitelist of
//!   functions and constants (`eval`), and evaluate it as a pure function of `x`.
//! - Nothing outside the whitelist is reachable: there is no name lookup at
//!   evaluation time.
//!
//! Failure modes
//! - `ExprError::Syntax`: the text is not an expression at all.
//! - `ExprError::UnsupportedExpression`: it parses, but uses a construct outside the
//!   arithmetic subset (comparison, modulo, attribute access, ...).
//! - `ExprError::UnknownIdentifier`: a name that is neither `x`, a constant nor a
//!   whitelisted function.
//! - `EvalError`: evaluation at a particular `x` left the function's domain; callers
//!   treat the function as undefined there.
//!
//! Code cross-refs: `Function`, `InvalidOpGuard`

mod eval;
mod guard;
mod parser;

pub use eval::{EvalError, Function};
pub use guard::{invalid_ops_suppressed, InvalidOpGuard};
pub use parser::{Ast, BinOp};

use thiserror::Error;

/// Rejection of a formula at parse or resolution time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExprError {
    /// Not parseable as an expression.
    #[error("syntax error at offset {offset}: expected {expected}")]
    Syntax { offset: usize, expected: String },

    /// A construct outside the arithmetic whitelist.
    #[error("unsupported expression: {0}")]
    UnsupportedExpression(String),

    /// A name that is not `x`, `pi`, `e` or a whitelisted function.
    #[error("unsupported name: {0}")]
    UnknownIdentifier(String),
}

#[cfg(test)]
mod tests;

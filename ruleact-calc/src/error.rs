//! # Calculator diagnostics
//!
//! [`CalcError`] lists everything that can go wrong while lexing or
//! evaluating a calculator statement. None of these are fatal: the lexer and
//! the evaluator report them through their output and carry on with a value
//! of `0`. The `Display` text of each variant is the exact line printed to
//! the user.
//!
//! ```rust
//! # use ruleact_calc::CalcError;
//! let err = CalcError::UndefinedName("y".into());
//! assert_eq!(err.to_string(), "Undefined name 'y'");
//! ```
use smartstring::alias::String;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    /// A name was read before anything was assigned to it.
    #[error("Undefined name '{0}'")]
    UndefinedName(String),

    /// A character no lexer rule accepts; it is skipped.
    #[error("Illegal character '{0}'")]
    IllegalCharacter(char),

    /// An integer literal too long to convert; it evaluates to 0.
    #[error("Integer value too large {0}")]
    IntegerTooLarge(String),

    #[error("Division by zero")]
    DivisionByZero,

    /// A negative real raised to a fractional power.
    #[error("Complex result")]
    ComplexResult,

    #[error("Unknown operator '{0}'")]
    UnknownOperator(String),

    /// A handler received symbol values of the wrong shape.
    #[error("Malformed operands for {0}")]
    Operands(&'static str),
}

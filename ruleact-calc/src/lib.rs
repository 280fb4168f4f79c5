//! # ruleact-calc
//!
//! An arithmetic calculator built on **ruleact**. The grammar and its tables
//! are fixed; what each grammar rule *means* is supplied by the actions bound
//! to the runner, so the same [`Calc`] evaluates plainly with an
//! [`ExpressionEvaluator`] or also counts operations with [`CountOps`].
//!
//! ## Overview
//!
//! - [`lexer`]: converts a line of input into [`CalcToken`]s and queues
//!   lexical diagnostics.
//! - [`parser`]: the SLR tables of the grammar and the [`Calc`] runner that
//!   dispatches one reduction per applied rule.
//! - [`eval`]: [`ExpressionEvaluator`], the handlers for every rule tag, and
//!   the [`Report`] output trait.
//! - [`count`]: [`CountOps`], the operation-counting wrapper.
//! - [`names`], [`value`], [`token`], [`error`], [`tags`]: the variable
//!   store, symbol values, tokens, diagnostics and rule tags.
//!
//! ## Example
//!
//! ```rust
//! use ruleact_calc::{Calc, ExpressionEvaluator, Value};
//!
//! let mut calc = Calc::try_new(ExpressionEvaluator::with_output(Vec::new())).unwrap();
//! assert_eq!(calc.eval_line("a = 1 + 2 * 3").unwrap(), Some(Value::from(7)));
//! assert_eq!(calc.eval_line("a - 10").unwrap(), Some(Value::from(-3)));
//! assert_eq!(calc.actions().output(), b"result: -3\n");
//! ```
pub mod count;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod names;
pub mod parser;
pub mod tags;
pub mod token;
pub mod value;

pub use count::CountOps;
pub use error::CalcError;
pub use eval::{ExpressionEvaluator, Report};
pub use lexer::{CalcLexer, MAX_LITERAL_DIGITS};
pub use names::Names;
pub use parser::Calc;
pub use parser::parser_data::TokenID;
pub use token::CalcToken;
pub use value::{BinOp, MAX_POW_BITS, Number, Value};

//! # ruleact
//!
//! Pluggable semantic actions for shift/reduce parsers.
//!
//! The crate has two halves:
//!
//! - the **action layer**: [`ActionRegistry`] maps grammar rule tags to
//!   handlers and [`ReductionDispatcher`] runs the handler for each
//!   [`Reduction`] a parser performs. The same grammar can be reused with
//!   different [`RuleActions`] contexts.
//! - the **parser engine**: the [`Lexer`] and [`Parser`] traits with their
//!   shared [`LexerCtx`] / [`ParserCtx`] state. A concrete parser supplies the
//!   tables ([`ParserData`]), resolves ambiguous cells and turns each
//!   reduction into a dispatch.
//!
//! See the `ruleact-calc` crate for a complete calculator built on both.
mod action;
mod dispatch;
mod error;
mod lexer;
mod parser;

pub use crate::action::{ActionRegistry, DEFAULT_TAG, Handler, Resolved};
pub use crate::dispatch::{DispatchStats, Reduction, ReductionDispatcher, RuleActions};
pub use crate::error::{Position, Span, SyntaxError};
pub use crate::lexer::{Lexer, LexerCtx, LexerData, LexerRule, LexerStats, Token};
pub use crate::parser::{
    Action, Parser, ParserAction, ParserAmbigID, ParserCtx, ParserData, ParserProdID,
    ParserStateID, ParserStats, ParserTokenID, Production,
};

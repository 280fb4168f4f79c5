//! # Calculator Tokens
//!
//! [`CalcToken`] is both what the lexer produces and what the parser keeps on
//! its symbol stack: after a reduction, the left-hand side symbol is pushed
//! back as a `CalcToken` carrying the value the rule action returned.
use crate::{TokenID, Value};
use ruleact::{Span, Token};
use std::fmt;

/// A lexical token or a reduced grammar symbol.
///
/// ```rust
/// # use ruleact_calc::{CalcToken, TokenID, Value};
/// # use ruleact::{Token, span};
/// let tok = CalcToken {
///     token_id: TokenID::Number,
///     value: Value::from(99),
///     span: span!(0, 0, 0, 2),
/// };
///
/// assert_eq!(tok.token_id(), TokenID::Number);
/// assert_eq!(tok.to_string(), "99");
/// ```
#[derive(Debug, Clone)]
pub struct CalcToken {
    pub token_id: TokenID,
    /// Operator symbol, identifier, literal or computed result.
    pub value: Value,
    pub span: Option<Span>,
}

impl CalcToken {
    pub fn merge_span(&mut self, other_span: &Option<Span>) {
        self.span = Span::merge_opt(self.span, *other_span);
    }
}

impl Token for CalcToken {
    type TokenID = TokenID;

    fn token_id(&self) -> Self::TokenID {
        self.token_id
    }

    fn span(&self) -> Option<Span> {
        self.span
    }
}

/// The token's source text, as quoted in syntax errors.
impl fmt::Display for CalcToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value, f)
    }
}

//! # Calculator Lexer
//!
//! [`CalcLexer`] turns one line of calculator input into [`CalcToken`]s:
//! names, integer literals, the operators `+ - * / **`, `=`, and
//! parentheses. Blanks and tabs are skipped and newlines only advance the
//! line counter.
//!
//! Lexical problems never abort the line. An illegal character is skipped
//! and an integer literal longer than [`MAX_LITERAL_DIGITS`] becomes `0`;
//! both are queued as [`CalcError`] diagnostics for the caller to report
//! with [`take_diagnostics`](CalcLexer::take_diagnostics).
use crate::{CalcError, CalcToken, Number, TokenID, Value};
use anyhow::Result;
use num_bigint::BigInt;
use ruleact::{Lexer, LexerCtx, LexerData, LexerRule};
use std::mem;

/// Longest integer literal converted exactly.
pub const MAX_LITERAL_DIGITS: usize = 4300;

/// Lexer rules, in the same order as [`LexData::patterns`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Ignore,
    Newline,
    Exp,
    Times,
    Plus,
    Minus,
    Divide,
    Equals,
    LParen,
    RParen,
    Number,
    Name,
    Error,
    End,
}

impl LexerRule for Rule {
    const ERROR: Self = Rule::Error;
    const END: Self = Rule::End;
}

const RULES: [Rule; 12] = [
    Rule::Ignore,
    Rule::Newline,
    Rule::Exp,
    Rule::Times,
    Rule::Plus,
    Rule::Minus,
    Rule::Divide,
    Rule::Equals,
    Rule::LParen,
    Rule::RParen,
    Rule::Number,
    Rule::Name,
];

pub struct LexData;

impl LexerData for LexData {
    type LexerRule = Rule;

    fn patterns() -> &'static [&'static str] {
        // `**` must precede `*`
        &[
            r"[ \t]+",
            r"\n+",
            r"\*\*",
            r"\*",
            r"\+",
            r"-",
            r"/",
            r"=",
            r"\(",
            r"\)",
            r"[0-9]+",
            r"[a-zA-Z_][a-zA-Z0-9_]*",
        ]
    }

    fn lookup(pattern_id: usize) -> Rule {
        RULES.get(pattern_id).copied().unwrap_or(Rule::Error)
    }
}

pub struct CalcLexer {
    ctx: LexerCtx<LexData, CalcToken>,
    diagnostics: Vec<CalcError>,
}

impl CalcLexer {
    pub fn try_new() -> Result<Self> {
        Ok(Self {
            ctx: LexerCtx::try_new()?,
            diagnostics: Vec::new(),
        })
    }

    /// Drains the diagnostics raised since the last call.
    pub fn take_diagnostics(&mut self) -> Vec<CalcError> {
        mem::take(&mut self.diagnostics)
    }

    fn yield_lexeme(&mut self, token_id: TokenID, value: Value) {
        let span = self.ctx.span();
        self.ctx.yield_token(CalcToken {
            token_id,
            value,
            span,
        });
    }
}

impl Lexer for CalcLexer {
    type LexerData = LexData;
    type Token = CalcToken;

    fn ctx(&self) -> &LexerCtx<LexData, CalcToken> {
        &self.ctx
    }

    fn ctx_mut(&mut self) -> &mut LexerCtx<LexData, CalcToken> {
        &mut self.ctx
    }

    fn action(&mut self, rule: Rule) -> Result<()> {
        let token_id = match rule {
            Rule::Ignore => return Ok(()),
            Rule::Newline => {
                self.ctx.newlines();
                return Ok(());
            }
            Rule::Number => {
                let text = self.ctx.lexeme();
                let n = match text.parse::<BigInt>() {
                    Ok(n) if text.len() <= MAX_LITERAL_DIGITS => Number::Int(n),
                    _ => {
                        log::warn!("integer literal of {} digits rejected", text.len());
                        self.diagnostics.push(CalcError::IntegerTooLarge(text.into()));
                        Number::default()
                    }
                };
                self.yield_lexeme(TokenID::Number, Value::Number(n));
                return Ok(());
            }
            Rule::Error => {
                if let Some(c) = self.ctx.skip_char() {
                    self.diagnostics.push(CalcError::IllegalCharacter(c));
                }
                return Ok(());
            }
            Rule::End => {
                self.ctx.yield_token(CalcToken {
                    token_id: TokenID::End,
                    value: Value::None,
                    span: None,
                });
                return Ok(());
            }
            Rule::Exp => TokenID::Exp,
            Rule::Times => TokenID::Times,
            Rule::Plus => TokenID::Plus,
            Rule::Minus => TokenID::Minus,
            Rule::Divide => TokenID::Divide,
            Rule::Equals => TokenID::Equals,
            Rule::LParen => TokenID::LParen,
            Rule::RParen => TokenID::RParen,
            Rule::Name => TokenID::Name,
        };
        let value = Value::from(self.ctx.lexeme());
        self.yield_lexeme(token_id, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ruleact::span;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn lex(input: &str) -> (Vec<CalcToken>, Vec<CalcError>) {
        let mut lexer = CalcLexer::try_new().unwrap();
        lexer.ctx_mut().reset(input, 0);
        let mut toks = Vec::new();
        while let Some(t) = lexer.try_next().unwrap() {
            toks.push(t);
        }
        (toks, lexer.take_diagnostics())
    }

    fn ids(toks: &[CalcToken]) -> Vec<TokenID> {
        toks.iter().map(|t| t.token_id).collect()
    }

    #[test]
    fn operators_and_power() {
        init_logger();
        let (toks, diags) = lex("a**2*b - (c / 4) + -d = e");
        use TokenID::*;
        assert_eq!(
            ids(&toks),
            [
                Name, Exp, Number, Times, Name, Minus, LParen, Name, Divide, Number, RParen, Plus,
                Minus, Name, Equals, Name, End
            ]
        );
        assert!(diags.is_empty());
        assert_eq!(toks[1].value, Value::from("**"));
        assert_eq!(toks[2].value, Value::from(2));
    }

    #[test]
    fn spans_are_columns_on_the_line() {
        init_logger();
        let (toks, _) = lex("x = 10");
        assert_eq!(toks[0].span, span!(0, 0, 0, 1));
        assert_eq!(toks[1].span, span!(0, 2, 0, 3));
        assert_eq!(toks[2].span, span!(0, 4, 0, 6));
    }

    #[test]
    fn illegal_character_is_reported_and_skipped() {
        init_logger();
        let (toks, diags) = lex("1 $ 2");
        assert_eq!(ids(&toks), [TokenID::Number, TokenID::Number, TokenID::End]);
        assert_eq!(diags, [CalcError::IllegalCharacter('$')]);
    }

    #[test]
    fn wide_literal_is_exact() {
        init_logger();
        let (toks, diags) = lex("123456789012345678901234567890");
        assert_eq!(toks[0].to_string(), "123456789012345678901234567890");
        assert!(diags.is_empty());
    }

    #[test]
    fn oversized_literal_becomes_zero() {
        init_logger();
        let digits = "7".repeat(MAX_LITERAL_DIGITS + 1);
        let (toks, diags) = lex(&digits);
        assert_eq!(toks[0].value, Value::from(0));
        assert_eq!(diags, [CalcError::IntegerTooLarge(digits.as_str().into())]);

        let (toks, diags) = lex(&digits[1..]);
        assert_eq!(toks[0].to_string(), digits[1..]);
        assert!(diags.is_empty());
    }

    #[test]
    fn names_allow_underscores_and_digits() {
        init_logger();
        let (toks, _) = lex("_tmp1 x2y");
        assert_eq!(toks[0].value, Value::from("_tmp1"));
        assert_eq!(toks[1].value, Value::from("x2y"));
    }

    #[test]
    fn number_then_name_splits() {
        init_logger();
        let (toks, _) = lex("2x");
        assert_eq!(ids(&toks), [TokenID::Number, TokenID::Name, TokenID::End]);
    }
}

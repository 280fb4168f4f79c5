//! # Calculator Parser
//!
//! This module couples the SLR(1) tables of the calculator grammar with a
//! [`ReductionDispatcher`]. It exposes:
//!
//! - [`parser_data`]: the automaton, productions and IDs,
//! - [`Calc`]: the line runner. It pulls tokens from [`CalcLexer`], resolves
//!   precedence conflicts and turns every reduction into a dispatch.
//!
//! ```text
//! Start -> Stat
//! Stat  -> NAME = Expr | Expr
//! Expr  -> Expr op Expr | - Expr | ( Expr ) | NUMBER | NAME
//! ```
//!
//! ## Behavior highlights
//! - **Precedence**, low to high: `+ -`, `* /`, `**`, unary minus. All binary
//!   operators are left-associative, so `2 ** 3 ** 2` is `64`, and unary
//!   minus binds tighter than `**`, so `-2 ** 2` is `4`.
//! - **Semantics live elsewhere.** The parser never computes anything; each
//!   production carries a rule tag and the bound actions decide what the tag
//!   means. The same `Calc` runs with an [`ExpressionEvaluator`](crate::ExpressionEvaluator)
//!   or a [`CountOps`](crate::CountOps).
//! - **Errors never stop a run.** Syntax errors and lexer diagnostics are
//!   written to the actions' output and the next line is parsed as usual.

use crate::{CalcLexer, CalcToken, Report, Value};
use anyhow::Result;
use parser_data::{AmbigID, ParData, ProdID};
use ruleact::{
    Action, Lexer, Parser, ParserCtx, ParserData, Reduction, ReductionDispatcher, RuleActions,
    Span, SyntaxError,
};

/// SLR(1) tables of the calculator grammar.
///
/// The five binary operators share one production shape, so after any
/// operator the automaton moves to the same state. Shift/reduce conflicts on
/// an operator lookahead are left as [`ParserAction::Ambig`] cells and
/// settled by precedence at parse time.
pub mod parser_data {
    use crate::tags;
    use ruleact::{
        ParserAction, ParserAmbigID, ParserData, ParserProdID, ParserStateID, ParserTokenID,
        Production,
    };

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum TokenID {
        Name,
        Number,
        Plus,
        Minus,
        Times,
        Divide,
        Exp,
        Equals,
        LParen,
        RParen,
        End,
        Stat,
        Expr,
    }

    impl From<TokenID> for usize {
        fn from(id: TokenID) -> usize {
            id as usize
        }
    }

    impl ParserTokenID for TokenID {
        const COUNT_NONTERMINALS: usize = 2;
        const COUNT_TERMINALS: usize = 11;
        const COUNT: usize = 13;
        const END: Self = TokenID::End;
    }

    impl TokenID {
        /// Binding strength of a binary operator; `None` for anything else.
        pub fn precedence(self) -> Option<u8> {
            match self {
                TokenID::Plus | TokenID::Minus => Some(1),
                TokenID::Times | TokenID::Divide => Some(2),
                TokenID::Exp => Some(3),
                _ => None,
            }
        }
    }

    /// Binding strength of prefix minus.
    pub const UMINUS_PRECEDENCE: u8 = 4;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum StateID {
        S0,
        S1,
        S2,
        S3,
        S4,
        S5,
        S6,
        S7,
        S8,
        S9,
        S10,
        S11,
        S12,
        S13,
        S14,
    }

    impl From<StateID> for usize {
        fn from(id: StateID) -> usize {
            id as usize
        }
    }

    impl ParserStateID for StateID {
        const COUNT: usize = 15;
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum ProdID {
        Start,
        StatAssign,
        StatExpr,
        ExprBinop,
        ExprUminus,
        ExprGroup,
        ExprNumber,
        ExprName,
    }

    impl From<ProdID> for usize {
        fn from(id: ProdID) -> usize {
            id as usize
        }
    }

    impl ParserProdID for ProdID {
        const COUNT: usize = 8;
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum AmbigID {
        /// `- Expr` followed by an operator.
        Uminus,
        /// `Expr op Expr` followed by an operator.
        Binop,
    }

    impl From<AmbigID> for usize {
        fn from(id: AmbigID) -> usize {
            id as usize
        }
    }

    impl ParserAmbigID for AmbigID {
        const COUNT: usize = 2;
    }

    type Act = ParserAction<StateID, ProdID, AmbigID>;

    fn is_binop(token_id: TokenID) -> bool {
        token_id.precedence().is_some()
    }

    fn follows_expr(token_id: TokenID) -> bool {
        is_binop(token_id) || matches!(token_id, TokenID::RParen | TokenID::End)
    }

    /// Actions shared by every state that expects the start of an `Expr`.
    fn expr_start(token_id: TokenID, goto_expr: StateID, on_name: StateID) -> Act {
        use ParserAction::*;
        match token_id {
            TokenID::Number => Shift(StateID::S6),
            TokenID::Name => Shift(on_name),
            TokenID::Minus => Shift(StateID::S4),
            TokenID::LParen => Shift(StateID::S5),
            TokenID::Expr => Goto(goto_expr),
            _ => Error,
        }
    }

    fn reduce_on_follow(token_id: TokenID, prod_id: ProdID) -> Act {
        if follows_expr(token_id) {
            ParserAction::Reduce(prod_id)
        } else {
            ParserAction::Error
        }
    }

    pub struct ParData;

    impl ParserData for ParData {
        type StateID = StateID;
        type AmbigID = AmbigID;
        type TokenID = TokenID;
        type ProdID = ProdID;

        fn start_state() -> StateID {
            StateID::S0
        }

        fn lookup(state_id: StateID, token_id: TokenID) -> Act {
            use ParserAction::*;
            use StateID::*;
            match state_id {
                S0 => match token_id {
                    TokenID::Stat => Goto(S1),
                    _ => expr_start(token_id, S3, S2),
                },
                S1 => match token_id {
                    TokenID::End => Accept,
                    _ => Error,
                },
                // NAME . = Expr  |  NAME .
                S2 => match token_id {
                    TokenID::Equals => Shift(S7),
                    _ => reduce_on_follow(token_id, ProdID::ExprName),
                },
                S3 => match token_id {
                    t if is_binop(t) => Shift(S8),
                    TokenID::End => Reduce(ProdID::StatExpr),
                    _ => Error,
                },
                S4 => expr_start(token_id, S9, S10),
                S5 => expr_start(token_id, S11, S10),
                S6 => reduce_on_follow(token_id, ProdID::ExprNumber),
                S7 => expr_start(token_id, S12, S10),
                S8 => expr_start(token_id, S13, S10),
                S9 => match token_id {
                    t if is_binop(t) => Ambig(AmbigID::Uminus),
                    _ => reduce_on_follow(token_id, ProdID::ExprUminus),
                },
                S10 => reduce_on_follow(token_id, ProdID::ExprName),
                S11 => match token_id {
                    TokenID::RParen => Shift(S14),
                    t if is_binop(t) => Shift(S8),
                    _ => Error,
                },
                S12 => match token_id {
                    t if is_binop(t) => Shift(S8),
                    TokenID::End => Reduce(ProdID::StatAssign),
                    _ => Error,
                },
                S13 => match token_id {
                    t if is_binop(t) => Ambig(AmbigID::Binop),
                    _ => reduce_on_follow(token_id, ProdID::ExprBinop),
                },
                S14 => reduce_on_follow(token_id, ProdID::ExprGroup),
            }
        }

        fn lookup_ambig(ambig_id: AmbigID) -> [Act; 2] {
            match ambig_id {
                AmbigID::Uminus => [
                    ParserAction::Shift(StateID::S8),
                    ParserAction::Reduce(ProdID::ExprUminus),
                ],
                AmbigID::Binop => [
                    ParserAction::Shift(StateID::S8),
                    ParserAction::Reduce(ProdID::ExprBinop),
                ],
            }
        }

        fn production(prod_id: ProdID) -> Production<TokenID> {
            let (lhs, len, tag) = match prod_id {
                ProdID::Start => (TokenID::Stat, 1, ""),
                ProdID::StatAssign => (TokenID::Stat, 3, tags::STATEMENT_ASSIGN),
                ProdID::StatExpr => (TokenID::Stat, 1, tags::STATEMENT_EXPR),
                ProdID::ExprBinop => (TokenID::Expr, 3, tags::EXPRESSION_BINOP),
                ProdID::ExprUminus => (TokenID::Expr, 2, tags::EXPRESSION_UMINUS),
                ProdID::ExprGroup => (TokenID::Expr, 3, tags::EXPRESSION_GROUP),
                ProdID::ExprNumber => (TokenID::Expr, 1, tags::EXPRESSION_NUMBER),
                ProdID::ExprName => (TokenID::Expr, 1, tags::EXPRESSION_NAME),
            };
            Production { lhs, len, tag }
        }
    }
}

/// Line-oriented calculator over the actions `A`.
///
/// # Example
/// ```rust
/// # use ruleact_calc::{Calc, ExpressionEvaluator};
/// let mut calc = Calc::try_new(ExpressionEvaluator::with_output(Vec::new())).unwrap();
/// calc.run("x = 6\nx * 7\n").unwrap();
/// assert_eq!(calc.actions().output(), b"result: 42\n");
/// ```
pub struct Calc<A>
where
    A: RuleActions<Value = Value> + Report,
{
    ctx: ParserCtx<CalcLexer, ParData>,
    dispatcher: ReductionDispatcher<A>,
}

impl<A> Calc<A>
where
    A: RuleActions<Value = Value> + Report,
{
    pub fn try_new(actions: A) -> Result<Self> {
        let lexer = CalcLexer::try_new()?;
        Ok(Self {
            ctx: ParserCtx::new(lexer),
            dispatcher: ReductionDispatcher::new(actions),
        })
    }

    /// Evaluates every non-blank line of `text` as one statement.
    ///
    /// Syntax errors are reported through the actions and do not stop the
    /// run; only engine faults are returned.
    pub fn run(&mut self, text: &str) -> Result<()> {
        for (line_no, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            if let Err(e) = self.eval_at(line, line_no) {
                match e.downcast_ref::<SyntaxError>() {
                    Some(syntax) => {
                        log::debug!("line {}: {}", line_no + 1, syntax);
                        self.dispatcher.actions_mut().report(syntax);
                    }
                    None => return Err(e),
                }
            }
        }
        Ok(())
    }

    /// Evaluates one statement and returns its value. A blank line is a
    /// syntax error at EOF.
    ///
    /// On a syntax error the actions are told the statement was aborted
    /// before the error is returned; reporting it is left to the caller.
    pub fn eval_line(&mut self, line: &str) -> Result<Option<Value>> {
        self.eval_at(line, 0)
    }

    fn eval_at(&mut self, line: &str, line_no: usize) -> Result<Option<Value>> {
        self.ctx.lexer.ctx_mut().reset(line, line_no);
        match self.try_next() {
            Ok(stat) => Ok(stat.map(|stat| stat.value)),
            Err(e) => {
                if e.is::<SyntaxError>() {
                    self.dispatcher.actions_mut().statement_aborted();
                }
                Err(e)
            }
        }
    }

    pub fn actions(&self) -> &A {
        self.dispatcher.actions()
    }

    pub fn actions_mut(&mut self) -> &mut A {
        self.dispatcher.actions_mut()
    }

    /// Binds fresh actions and returns the previous ones.
    pub fn rebind(&mut self, actions: A) -> A {
        self.dispatcher.rebind(actions)
    }

    pub fn into_actions(self) -> A {
        self.dispatcher.into_actions()
    }

    pub fn dispatcher(&self) -> &ReductionDispatcher<A> {
        &self.dispatcher
    }
}

impl<A> Parser for Calc<A>
where
    A: RuleActions<Value = Value> + Report,
{
    type Lexer = CalcLexer;
    type ParserData = ParData;

    fn ctx(&self) -> &ParserCtx<CalcLexer, ParData> {
        &self.ctx
    }

    fn ctx_mut(&mut self) -> &mut ParserCtx<CalcLexer, ParData> {
        &mut self.ctx
    }

    fn next_token(&mut self) -> Result<Option<CalcToken>> {
        let token = self.ctx.lexer.try_next()?;
        for diag in self.ctx.lexer.take_diagnostics() {
            self.dispatcher.actions_mut().report(&diag);
        }
        Ok(token)
    }

    /// Shifts if the lookahead binds tighter than the rule on the stack,
    /// otherwise reduces. Equal precedence reduces, which makes every binary
    /// operator left-associative.
    fn resolve_ambiguity(&mut self, ambig: AmbigID, token: &CalcToken) -> Result<Action<Self>> {
        let [shift, reduce] = ParData::lookup_ambig(ambig);
        let Some(lookahead) = token.token_id.precedence() else {
            anyhow::bail!("ambiguity {:?} on non-operator {:?}", ambig, token.token_id);
        };
        let rule = match ambig {
            AmbigID::Uminus => parser_data::UMINUS_PRECEDENCE,
            // Expr op Expr: the operator sits just below the top
            AmbigID::Binop => self
                .ctx
                .tokens_peek(1)
                .and_then(|op| op.token_id.precedence())
                .ok_or_else(|| anyhow::anyhow!("no operator under {:?}", ambig))?,
        };
        Ok(if lookahead > rule { shift } else { reduce })
    }

    fn reduce(&mut self, prod_id: ProdID, _token: &CalcToken) -> Result<()> {
        let prod = ParData::production(prod_id);
        let rhs = self.ctx.tokens_split(prod.len)?;
        let mut span = None;
        let values = rhs
            .into_iter()
            .map(|t| {
                span = Span::merge_opt(span, t.span);
                t.value
            })
            .collect();

        let mut event = Reduction::new(prod.tag, values);
        let value = self.dispatcher.dispatch(&mut event);

        self.ctx.tokens.push(CalcToken {
            token_id: prod.lhs,
            value,
            span,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CountOps, ExpressionEvaluator, Number};
    use parser_data::{StateID, TokenID};
    use ruleact::{ParserAction, ParserAmbigID, ParserProdID, ParserStateID, ParserTokenID};

    const STATES: [StateID; 15] = {
        use StateID::*;
        [S0, S1, S2, S3, S4, S5, S6, S7, S8, S9, S10, S11, S12, S13, S14]
    };

    const TOKENS: [TokenID; 13] = {
        use TokenID::*;
        [
            Name, Number, Plus, Minus, Times, Divide, Exp, Equals, LParen, RParen, End, Stat, Expr,
        ]
    };

    const PRODS: [ProdID; 8] = {
        use ProdID::*;
        [Start, StatAssign, StatExpr, ExprBinop, ExprUminus, ExprGroup, ExprNumber, ExprName]
    };

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn calc() -> Calc<ExpressionEvaluator<Vec<u8>>> {
        Calc::try_new(ExpressionEvaluator::with_output(Vec::new())).unwrap()
    }

    fn output<W: AsRef<[u8]>>(bytes: W) -> String {
        String::from_utf8(bytes.as_ref().to_vec()).unwrap()
    }

    fn eval(src: &str) -> Value {
        calc().eval_line(src).unwrap().unwrap()
    }

    #[test]
    fn precedence_and_grouping() {
        init_logger();
        assert_eq!(eval("2+3*4"), Value::from(14));
        assert_eq!(eval("2*3+4"), Value::from(10));
        assert_eq!(eval("(2+3)*4"), Value::from(20));
        assert_eq!(eval("10-4-3"), Value::from(3));
        assert_eq!(eval("2*3**2"), Value::from(18));
    }

    #[test]
    fn unary_minus_binds_tightest() {
        init_logger();
        assert_eq!(eval("-2**2"), Value::from(4));
        assert_eq!(eval("-2*3"), Value::from(-6));
        assert_eq!(eval("--3"), Value::from(3));
        assert_eq!(eval("1 - -1"), Value::from(2));
    }

    #[test]
    fn power_is_left_associative() {
        init_logger();
        assert_eq!(eval("2**3**2"), Value::from(64));
    }

    #[test]
    fn division_is_real() {
        init_logger();
        assert_eq!(eval("6/3"), Value::Number(Number::Real(2.0)));
        assert_eq!(eval("5/2"), Value::Number(Number::Real(2.5)));
    }

    #[test]
    fn syntax_errors_are_reported_and_run_continues() {
        init_logger();
        let mut c = calc();
        c.run("2 + )\n3 +\n4\n").unwrap();
        assert_eq!(
            output(c.actions().output()),
            "Syntax error at ')'\nSyntax error at EOF\nresult: 4\n"
        );
    }

    #[test]
    fn eval_line_surfaces_syntax_error() {
        init_logger();
        let err = calc().eval_line("x = = 1").unwrap_err();
        assert_eq!(
            err.downcast_ref::<SyntaxError>(),
            Some(&SyntaxError::Token("=".into()))
        );
    }

    #[test]
    fn every_rule_is_dispatched() {
        init_logger();
        let mut c = calc();
        c.eval_line("a = -(1 + 2)").unwrap();
        let stats = c.dispatcher().stats();
        // number, number, binop, group, uminus, assign
        assert_eq!(stats.dispatched, 6);
        assert_eq!(stats.pass_through, 0);
        assert_eq!(c.stats().ambigs, 0);
    }

    #[test]
    fn ambiguities_are_counted() {
        init_logger();
        let mut c = calc();
        // `*` after `1 + 2` shifts, `-` after `2 * 3` and after `1 + 6` reduces
        assert_eq!(c.eval_line("1 + 2 * 3 - 4").unwrap(), Some(Value::from(3)));
        assert_eq!(c.stats().ambigs, 3);
    }

    #[test]
    fn table_shape() {
        assert_eq!(STATES.len(), StateID::COUNT);
        assert_eq!(TOKENS.len(), TokenID::COUNT);
        assert_eq!(PRODS.len(), ProdID::COUNT);
        assert_eq!(
            TokenID::COUNT,
            TokenID::COUNT_TERMINALS + TokenID::COUNT_NONTERMINALS
        );
        for (i, s) in STATES.iter().enumerate() {
            assert_eq!(usize::from(*s), i);
        }
        for (i, t) in TOKENS.iter().enumerate() {
            assert_eq!(usize::from(*t), i);
        }

        let mut ambigs = Vec::new();
        for state in STATES {
            for token in TOKENS {
                match ParData::lookup(state, token) {
                    ParserAction::Goto(_) => assert!(!token.is_terminal(), "{state:?} {token:?}"),
                    ParserAction::Error => {}
                    ParserAction::Ambig(a) => {
                        assert!(token.precedence().is_some(), "{state:?} {token:?}");
                        ambigs.push(a);
                    }
                    _ => assert!(token.is_terminal(), "{state:?} {token:?}"),
                }
            }
        }
        ambigs.sort_by_key(|a| usize::from(*a));
        ambigs.dedup();
        assert_eq!(ambigs.len(), AmbigID::COUNT);
        for a in ambigs {
            let [shift, reduce] = ParData::lookup_ambig(a);
            assert!(matches!(shift, ParserAction::Shift(_)));
            assert!(matches!(reduce, ParserAction::Reduce(_)));
        }

        for prod in PRODS {
            assert!(!ParData::production(prod).lhs.is_terminal());
        }
    }

    #[test]
    fn aborted_statement_does_not_leak_into_next_count() {
        init_logger();
        let mut c = Calc::try_new(CountOps::with_output(Vec::new())).unwrap();
        let err = c.eval_line("1 + 2 +").unwrap_err();
        assert_eq!(err.downcast_ref::<SyntaxError>(), Some(&SyntaxError::Eof));
        assert_eq!(c.actions().count(), 0);
        c.eval_line("3 * 4").unwrap();
        assert_eq!(
            output(c.into_actions().into_output()),
            "result: 12 (ops count: 1)\n"
        );
    }

    #[test]
    fn consecutive_syntax_errors_keep_counter_clean() {
        init_logger();
        let mut c = Calc::try_new(CountOps::with_output(Vec::new())).unwrap();
        for line in ["1 * 2 * 3 )", "4 + 5 +", "(6 - 7 - 8"] {
            assert!(c.eval_line(line).is_err());
            assert_eq!(c.actions().count(), 0, "after {line:?}");
        }
        assert_eq!(c.eval_line("9 - 1").unwrap(), Some(Value::from(8)));
        assert_eq!(
            output(c.into_actions().into_output()),
            "result: 8 (ops count: 1)\n"
        );
    }

    #[test]
    fn big_integers_are_exact() {
        init_logger();
        assert_eq!(eval("2**64 + 1").to_string(), "18446744073709551617");
        assert_eq!(eval("3**40").to_string(), "12157665459056928801");
        let digits = eval("10**400").to_string();
        assert_eq!(digits.len(), 401);
        assert_eq!(eval("99999999999999999999 + 1").to_string(), "100000000000000000000");
    }

    #[test]
    fn rebind_swaps_evaluators() {
        init_logger();
        let mut c = Calc::try_new(CountOps::with_output(Vec::new())).unwrap();
        c.run("1+2\n").unwrap();
        let old = c.rebind(CountOps::with_output(Vec::new()));
        c.run("3*4*5\n").unwrap();
        assert_eq!(output(old.into_output()), "result: 3 (ops count: 1)\n");
        assert_eq!(
            output(c.into_actions().into_output()),
            "result: 60 (ops count: 2)\n"
        );
    }
}

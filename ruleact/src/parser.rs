//! # Shift/reduce engine
//!
//! A table-driven LR driver. [`ParserData`] supplies the tables; a type
//! implementing [`Parser`] owns a [`ParserCtx`] and supplies two hooks:
//! [`resolve_ambiguity`](Parser::resolve_ambiguity) for cells the tables
//! leave open, and [`reduce`](Parser::reduce), which replaces the right-hand
//! side symbols on the token stack with the left-hand side symbol.
use crate::{Lexer, SyntaxError, Token};
use anyhow::{Result, anyhow, bail};
use std::fmt::{Debug, Write as _};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParserAction<US, UP, UA>
where
    US: ParserStateID,
    UP: ParserProdID,
    UA: ParserAmbigID,
{
    Error,
    Accept,
    Shift(US),
    Reduce(UP),
    Ambig(UA),
    Goto(US),
}

pub trait ParserStateID: Copy + Debug + Eq + Into<usize> {
    const COUNT: usize;
}

pub trait ParserAmbigID: Copy + Debug + Eq + Into<usize> {
    const COUNT: usize;
}

pub trait ParserProdID: Copy + Debug + Eq + Into<usize> {
    const COUNT: usize;
}

/// Terminals are numbered first, `0..COUNT_TERMINALS`, then non-terminals.
pub trait ParserTokenID: Copy + Debug + Eq + Into<usize> {
    const COUNT_NONTERMINALS: usize;
    const COUNT_TERMINALS: usize;
    const COUNT: usize;
    /// The terminal the lexer emits once input is exhausted.
    const END: Self;

    fn is_terminal(self) -> bool {
        Into::<usize>::into(self) < Self::COUNT_TERMINALS
    }
}

/// Static facts about one grammar production.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Production<T> {
    /// Left-hand side non-terminal.
    pub lhs: T,
    /// Number of right-hand side symbols.
    pub len: usize,
    /// Rule tag handed to the action registry on reduction.
    pub tag: &'static str,
}

pub type Action<P> = ParserAction<
    <<P as Parser>::ParserData as ParserData>::StateID,
    <<P as Parser>::ParserData as ParserData>::ProdID,
    <<P as Parser>::ParserData as ParserData>::AmbigID,
>;

type StateOf<P> = <<P as Parser>::ParserData as ParserData>::StateID;
type TokenOf<P> = <<P as Parser>::Lexer as Lexer>::Token;

pub trait ParserData {
    type StateID: ParserStateID;
    type AmbigID: ParserAmbigID;
    type TokenID: ParserTokenID;
    type ProdID: ParserProdID;

    fn start_state() -> Self::StateID;

    fn lookup(
        state_id: Self::StateID,
        token_id: Self::TokenID,
    ) -> ParserAction<Self::StateID, Self::ProdID, Self::AmbigID>;

    /// The two candidate actions of an ambiguous cell: `[shift, reduce]`.
    fn lookup_ambig(
        ambig_id: Self::AmbigID,
    ) -> [ParserAction<Self::StateID, Self::ProdID, Self::AmbigID>; 2];

    fn production(prod_id: Self::ProdID) -> Production<Self::TokenID>;
}

pub trait Parser {
    type Lexer: Lexer<Token: Token<TokenID = <Self::ParserData as ParserData>::TokenID>>;
    type ParserData: ParserData;

    fn ctx(&self) -> &ParserCtx<Self::Lexer, Self::ParserData>;
    fn ctx_mut(&mut self) -> &mut ParserCtx<Self::Lexer, Self::ParserData>;

    fn resolve_ambiguity(
        &mut self,
        ambig: <Self::ParserData as ParserData>::AmbigID,
        token: &TokenOf<Self>,
    ) -> Result<Action<Self>>;

    /// Replaces the right-hand side symbols of `prod_id` on top of the token
    /// stack with one left-hand side symbol. The engine has already popped the
    /// matching states.
    fn reduce(
        &mut self,
        prod_id: <Self::ParserData as ParserData>::ProdID,
        lookahead: &TokenOf<Self>,
    ) -> Result<()>;

    /// Pulls the next token from the lexer. Override to observe tokens as
    /// they arrive.
    fn next_token(&mut self) -> Result<Option<TokenOf<Self>>> {
        self.ctx_mut().lexer.try_next()
    }

    fn stats(&self) -> ParserStats {
        self.ctx().stats.clone()
    }

    /// Parses one sentence and returns the accepted start symbol, or `None`
    /// once the lexer is exhausted.
    fn try_next(&mut self) -> Result<Option<TokenOf<Self>>> {
        drive(self)
    }
}

fn drive<P: Parser + ?Sized>(parser: &mut P) -> Result<Option<TokenOf<P>>> {
    let ctx = parser.ctx_mut();
    ctx.states.clear();
    ctx.tokens.clear();
    let Some(mut lookahead) = pull(parser)? else {
        return Ok(None);
    };
    parser.ctx_mut().states.push(P::ParserData::start_state());

    loop {
        parser.ctx().trace_stacks(&lookahead);
        match decide(parser, &lookahead)? {
            ParserAction::Shift(next) => {
                log::trace!("Shift {:?}", next);
                let ctx = parser.ctx_mut();
                ctx.tokens.push(lookahead);
                ctx.states.push(next);
                ctx.stats.shifts += 1;
                lookahead = pull(parser)?.ok_or(SyntaxError::Eof)?;
            }
            ParserAction::Reduce(prod_id) => {
                let prod = P::ParserData::production(prod_id);
                log::trace!("Reduce {:?} {:?}", prod_id, prod.tag);
                parser.ctx_mut().states_pop(prod.len)?;
                parser.reduce(prod_id, &lookahead)?;
                let next = goto(parser)?;
                let ctx = parser.ctx_mut();
                ctx.states.push(next);
                ctx.stats.reductions += 1;
            }
            ParserAction::Accept => {
                log::trace!("Accept");
                let ctx = parser.ctx_mut();
                if ctx.tokens.len() != 1 {
                    bail!("accept with {} symbols on the stack", ctx.tokens.len());
                }
                return ctx.tokens_pop().map(Some);
            }
            ParserAction::Error => {
                log::trace!("Error on {:?}", lookahead);
                if lookahead.token_id() == <P::ParserData as ParserData>::TokenID::END {
                    bail!(SyntaxError::Eof)
                }
                bail!(SyntaxError::Token(lookahead.to_string().into()))
            }
            action @ (ParserAction::Ambig(_) | ParserAction::Goto(_)) => {
                bail!("unresolved {:?} on {:?}", action, lookahead.token_id())
            }
        }
    }
}

/// Next token from the parser's source, counted.
fn pull<P: Parser + ?Sized>(parser: &mut P) -> Result<Option<TokenOf<P>>> {
    let token = parser.next_token()?;
    if token.is_some() {
        parser.ctx_mut().stats.tokens += 1;
    }
    Ok(token)
}

/// Table action for the current state and `lookahead`, ambiguities settled.
fn decide<P: Parser + ?Sized>(parser: &mut P, lookahead: &TokenOf<P>) -> Result<Action<P>> {
    let state = parser.ctx().top_state()?;
    match P::ParserData::lookup(state, lookahead.token_id()) {
        ParserAction::Ambig(ambig) => {
            log::trace!("Ambig {:?}", ambig);
            let action = parser.resolve_ambiguity(ambig, lookahead)?;
            parser.ctx_mut().stats.ambigs += 1;
            Ok(action)
        }
        action => Ok(action),
    }
}

/// Goto target for the symbol `reduce` just pushed.
fn goto<P: Parser + ?Sized>(parser: &P) -> Result<StateOf<P>> {
    let ctx = parser.ctx();
    let state = ctx.top_state()?;
    let lhs = ctx
        .tokens
        .last()
        .ok_or_else(|| anyhow!("token stack underflow"))?
        .token_id();
    match P::ParserData::lookup(state, lhs) {
        ParserAction::Goto(next) => Ok(next),
        other => bail!("expected Goto for {:?} in {:?}, found {:?}", lhs, state, other),
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParserStats {
    pub tokens: usize,
    pub shifts: usize,
    pub reductions: usize,
    pub ambigs: usize,
}

pub struct ParserCtx<L, D>
where
    L: Lexer,
    D: ParserData,
{
    pub lexer: L,
    /// Symbols shifted or reduced so far, oldest first.
    pub tokens: Vec<L::Token>,
    /// One more entry than `tokens`: the start state sits at the bottom.
    pub states: Vec<D::StateID>,
    pub stats: ParserStats,
}

impl<L, D> ParserCtx<L, D>
where
    L: Lexer,
    D: ParserData,
{
    pub fn new(lexer: L) -> Self {
        Self {
            lexer,
            tokens: Vec::new(),
            states: Vec::new(),
            stats: ParserStats::default(),
        }
    }

    /// Returns the token counted from the end: 0 = last, 1 = second last, etc.
    pub fn tokens_peek(&self, index: usize) -> Option<&L::Token> {
        self.tokens.iter().rev().nth(index)
    }

    pub fn tokens_pop(&mut self) -> Result<L::Token> {
        self.tokens.pop().ok_or_else(|| anyhow!("stack underflow"))
    }

    /// Removes the top `n` tokens and returns them in stack order.
    pub fn tokens_split(&mut self, n: usize) -> Result<Vec<L::Token>> {
        let len = self.tokens.len();
        if n > len {
            bail!("stack underflow: need {} tokens, have {}", n, len);
        }
        Ok(self.tokens.split_off(len - n))
    }

    fn top_state(&self) -> Result<D::StateID> {
        self.states
            .last()
            .copied()
            .ok_or_else(|| anyhow!("state stack underflow"))
    }

    fn states_pop(&mut self, n: usize) -> Result<()> {
        let len = self.states.len();
        if n >= len {
            bail!("state stack underflow: pop {} of {}", n, len);
        }
        self.states.truncate(len - n);
        Ok(())
    }

    /// Logs both stacks interleaved, e.g. `S0 Expr S3 Plus S8 | Number`.
    fn trace_stacks(&self, lookahead: &L::Token) {
        if !log::log_enabled!(log::Level::Trace) {
            return;
        }
        let mut line = std::string::String::new();
        let mut states = self.states.iter();
        if let Some(bottom) = states.next() {
            let _ = write!(line, "{:?}", bottom);
        }
        for (token, state) in self.tokens.iter().zip(states) {
            let _ = write!(line, " {:?} {:?}", token.token_id(), state);
        }
        log::trace!("{} | {:?}", line, lookahead.token_id());
    }
}

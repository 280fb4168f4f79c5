use crate::{Position, Span};
use anyhow::Result;
use regex_automata::{Anchored, Input, meta::Regex};
use std::collections::VecDeque;
use std::fmt::{Debug, Display};

pub trait Token: Clone + Debug + Display {
    type TokenID: Copy + Debug + Eq;

    fn token_id(&self) -> Self::TokenID;
    fn span(&self) -> Option<Span>;
}

pub trait LexerRule: Copy + Debug {
    /// Fired when no pattern matches at the current offset.
    const ERROR: Self;
    /// Fired once, after the last byte of input.
    const END: Self;
}

pub trait LexerData {
    type LexerRule: LexerRule;

    /// Rule patterns in priority order; earlier patterns win ties.
    fn patterns() -> &'static [&'static str];

    fn lookup(pattern_id: usize) -> Self::LexerRule;
}

pub trait Lexer {
    type LexerData: LexerData;
    type Token: Token;

    fn ctx(&self) -> &LexerCtx<Self::LexerData, Self::Token>;
    fn ctx_mut(&mut self) -> &mut LexerCtx<Self::LexerData, Self::Token>;

    fn action(&mut self, rule: <Self::LexerData as LexerData>::LexerRule) -> Result<()>;

    fn stats(&self) -> LexerStats {
        self.ctx().stats.clone()
    }

    #[inline]
    fn try_next(&mut self) -> Result<Option<Self::Token>> {
        if let Some(t) = self.ctx_mut().tokens.pop_front() {
            return Ok(Some(t));
        }

        if self.ctx().end_flag {
            return Ok(None);
        }

        while !self.ctx().at_end() {
            let rule = match self.ctx_mut().try_match() {
                Some(pattern) => <Self as Lexer>::LexerData::lookup(pattern),
                None => <Self::LexerData as LexerData>::LexerRule::ERROR,
            };
            log::trace!(
                "MATCHED: LexerRule: {:?}, Lexeme: {:?}, Offset: {}",
                rule,
                self.ctx().lexeme(),
                self.ctx().offset(),
            );

            self.action(rule)?;

            if let Some(t) = self.ctx_mut().tokens.pop_front() {
                return Ok(Some(t));
            }
        }
        self.ctx_mut().end_flag = true;

        self.action(<Self::LexerData as LexerData>::LexerRule::END)?;

        Ok(self.ctx_mut().tokens.pop_front())
    }
}

#[derive(Debug, Clone, Default)]
pub struct LexerStats {
    pub chars: usize,
    pub matches: usize,
    pub errors: usize,
}

/// Lexer state shared by every concrete lexer: the compiled rule set, the
/// input being scanned, the last lexeme and a queue of pending tokens.
pub struct LexerCtx<D, T>
where
    D: LexerData,
{
    regex: Regex,

    input: std::string::String,
    pos: usize,
    lexeme: (usize, usize),

    pub end_flag: bool,
    tokens: VecDeque<T>,

    pub line_no: usize,
    line_start: usize,

    stats: LexerStats,

    _data: std::marker::PhantomData<D>,
}

impl<D, T> LexerCtx<D, T>
where
    D: LexerData,
    T: Token,
{
    /// Compiles the rule patterns of `D`. The context starts with empty input;
    /// call [`reset`](Self::reset) before lexing.
    pub fn try_new() -> Result<Self> {
        let regex = Regex::new_many(D::patterns())?;
        Ok(Self {
            regex,
            input: std::string::String::new(),
            pos: 0,
            lexeme: (0, 0),
            end_flag: false,
            tokens: VecDeque::new(),
            line_no: 0,
            line_start: 0,
            stats: LexerStats::default(),
            _data: std::marker::PhantomData,
        })
    }

    /// Replaces the input. Pending tokens are dropped; stats keep accumulating.
    pub fn reset(&mut self, input: &str, line_no: usize) {
        self.input.clear();
        self.input.push_str(input);
        self.pos = 0;
        self.lexeme = (0, 0);
        self.end_flag = false;
        self.tokens.clear();
        self.line_no = line_no;
        self.line_start = 0;
    }

    #[inline]
    pub fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Runs an anchored search at the current offset and, on a non-empty
    /// match, consumes it and returns its pattern index.
    fn try_match(&mut self) -> Option<usize> {
        self.stats.matches += 1;
        let input = Input::new(&self.input)
            .range(self.pos..)
            .anchored(Anchored::Yes);
        let m = self.regex.search(&input).filter(|m| m.end() > m.start())?;
        self.lexeme = (m.start(), m.end());
        self.stats.chars += m.end() - m.start();
        self.pos = m.end();
        Some(m.pattern().as_usize())
    }

    /// The text consumed by the last match or skip.
    pub fn lexeme(&self) -> &str {
        &self.input[self.lexeme.0..self.lexeme.1]
    }

    /// Span of the last lexeme on the current line.
    pub fn span(&self) -> Option<Span> {
        let (start, end) = self.lexeme;
        Some(Span::new(
            Position::new(self.line_no, start.saturating_sub(self.line_start)),
            Position::new(self.line_no, end.saturating_sub(self.line_start)),
        ))
    }

    /// Consumes one character that no rule accepted and returns it.
    pub fn skip_char(&mut self) -> Option<char> {
        let c = self.input[self.pos..].chars().next()?;
        self.stats.errors += 1;
        self.stats.chars += 1;
        self.lexeme = (self.pos, self.pos + c.len_utf8());
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Advances the line counter by the newlines in the last lexeme.
    pub fn newlines(&mut self) {
        let n = self.lexeme().matches('\n').count();
        if n > 0 {
            self.line_no += n;
            self.line_start = self.lexeme.1;
        }
    }

    pub fn yield_token(&mut self, token: T) {
        self.tokens.push_back(token);
    }
}

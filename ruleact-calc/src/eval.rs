//! # Expression evaluator
//!
//! [`ExpressionEvaluator`] gives the calculator's rule tags their arithmetic
//! meaning. It owns the variable store ([`Names`]) and an output sink that
//! receives statement results and diagnostics, one line each.
//!
//! No handler fails. Undefined names, division by zero and the like are
//! written to the output and the expression carries on with `0`.
use crate::{BinOp, CalcError, Names, Number, Value, tags};
use ruleact::{ActionRegistry, RuleActions};
use std::fmt;
use std::io::{self, Stdout, Write};

/// A sink for user-visible lines: results and diagnostics.
pub trait Report {
    fn report(&mut self, line: &dyn fmt::Display);

    /// Called when a statement is abandoned part way, e.g. on a syntax error.
    fn statement_aborted(&mut self) {}
}

pub struct ExpressionEvaluator<W = Stdout> {
    names: Names,
    out: W,
}

impl ExpressionEvaluator<Stdout> {
    pub fn new() -> Self {
        Self::with_output(io::stdout())
    }
}

impl Default for ExpressionEvaluator<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> ExpressionEvaluator<W> {
    pub fn with_output(out: W) -> Self {
        Self {
            names: Names::new(),
            out,
        }
    }

    pub fn names(&self) -> &Names {
        &self.names
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// `NAME = Expr`: binds the name and yields the value.
    pub fn set_name(&mut self, values: &[Value]) -> Value {
        let [name, _, value] = values else {
            return self.malformed(tags::STATEMENT_ASSIGN);
        };
        let (Some(name), Some(n)) = (name.as_text(), value.as_number()) else {
            return self.malformed(tags::STATEMENT_ASSIGN);
        };
        log::debug!("{name} = {n}");
        self.names.set(name, n.clone());
        value.clone()
    }

    /// A bare expression statement: prints `result: <value>`.
    pub fn print_result(&mut self, values: &[Value]) -> Value {
        let [value] = values else {
            return self.malformed(tags::STATEMENT_EXPR);
        };
        self.report(&format_args!("result: {value}"));
        value.clone()
    }

    pub fn calc_expr(&mut self, values: &[Value]) -> Value {
        let [lhs, op, rhs] = values else {
            return self.malformed(tags::EXPRESSION_BINOP);
        };
        let (Some(lhs), Some(op), Some(rhs)) = (lhs.as_number(), op.as_text(), rhs.as_number())
        else {
            return self.malformed(tags::EXPRESSION_BINOP);
        };
        match op.parse::<BinOp>().and_then(|op| lhs.binary(op, rhs)) {
            Ok(n) => Value::Number(n),
            Err(e) => self.fault(e),
        }
    }

    pub fn negate(&mut self, values: &[Value]) -> Value {
        match values {
            [_, Value::Number(n)] => Value::Number(-n.clone()),
            _ => self.malformed(tags::EXPRESSION_UMINUS),
        }
    }

    /// Looks a name up. An undefined name is reported and reads as `0`; the
    /// store is left untouched.
    pub fn exp_name(&mut self, values: &[Value]) -> Value {
        let Some(name) = values.first().and_then(Value::as_text) else {
            return self.malformed(tags::EXPRESSION_NAME);
        };
        match self.names.get(name) {
            Some(n) => Value::Number(n.clone()),
            None => self.fault(CalcError::UndefinedName(name.into())),
        }
    }

    fn fault(&mut self, err: CalcError) -> Value {
        log::warn!("{err}");
        self.report(&err);
        Value::Number(Number::default())
    }

    fn malformed(&mut self, tag: &'static str) -> Value {
        log::error!("{}", CalcError::Operands(tag));
        Value::Number(Number::default())
    }
}

impl<W: Write> Report for ExpressionEvaluator<W> {
    fn report(&mut self, line: &dyn fmt::Display) {
        if let Err(e) = writeln!(self.out, "{line}") {
            log::error!("failed to write output: {e}");
        }
    }
}

impl<W: Write + 'static> RuleActions for ExpressionEvaluator<W> {
    type Value = Value;

    fn actions() -> ActionRegistry<Self, Value> {
        ActionRegistry::new()
            .action(tags::STATEMENT_ASSIGN, Self::set_name)
            .action(tags::STATEMENT_EXPR, Self::print_result)
            .action(tags::EXPRESSION_BINOP, Self::calc_expr)
            .action(tags::EXPRESSION_UMINUS, Self::negate)
            .action(tags::EXPRESSION_GROUP, |_, values: &[Value]| {
                values.get(1).cloned().unwrap_or_default()
            })
            .action(tags::EXPRESSION_NUMBER, |_, values: &[Value]| {
                values.first().cloned().unwrap_or_default()
            })
            .action(tags::EXPRESSION_NAME, Self::exp_name)
    }
}

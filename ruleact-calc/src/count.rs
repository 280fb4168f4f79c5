//! # Operation counting
//!
//! [`CountOps`] wraps an [`ExpressionEvaluator`] and counts the binary
//! operations of each statement. It reuses the whole handler set of the
//! evaluator it owns through [`ActionRegistry::lift`] and overrides only the
//! binary-operation and statement handlers.
//!
//! ```rust
//! # use ruleact_calc::{Calc, CountOps};
//! let mut calc = Calc::try_new(CountOps::with_output(Vec::new())).unwrap();
//! calc.run("5*4*6").unwrap();
//! assert_eq!(calc.actions().evaluator().output(), b"result: 120 (ops count: 2)\n");
//! assert_eq!(calc.actions().count(), 0);
//! ```
use crate::{ExpressionEvaluator, Report, Value, tags};
use ruleact::{ActionRegistry, RuleActions};
use std::fmt;
use std::io::{Stdout, Write};

pub struct CountOps<W = Stdout> {
    calc: ExpressionEvaluator<W>,
    ops: usize,
}

impl CountOps<Stdout> {
    pub fn new() -> Self {
        Self::wrap(ExpressionEvaluator::new())
    }
}

impl Default for CountOps<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> CountOps<W> {
    pub fn with_output(out: W) -> Self {
        Self::wrap(ExpressionEvaluator::with_output(out))
    }

    pub fn wrap(calc: ExpressionEvaluator<W>) -> Self {
        Self { calc, ops: 0 }
    }

    /// Binary operations in the current statement so far.
    pub fn count(&self) -> usize {
        self.ops
    }

    pub fn evaluator(&self) -> &ExpressionEvaluator<W> {
        &self.calc
    }

    pub fn into_output(self) -> W {
        self.calc.into_output()
    }

    fn base(&mut self) -> &mut ExpressionEvaluator<W> {
        &mut self.calc
    }

    fn reset(&mut self) {
        log::debug!("ops count reset from {}", self.ops);
        self.ops = 0;
    }

    pub fn calc_expr(&mut self, values: &[Value]) -> Value {
        let value = self.calc.calc_expr(values);
        self.ops += 1;
        value
    }

    pub fn print_result(&mut self, values: &[Value]) -> Value {
        let value = values.first().cloned().unwrap_or_default();
        let ops = self.ops;
        self.report(&format_args!("result: {value} (ops count: {ops})"));
        self.reset();
        value
    }

    /// Assignments print nothing, but still end the statement.
    pub fn set_name(&mut self, values: &[Value]) -> Value {
        let value = self.calc.set_name(values);
        self.reset();
        value
    }
}

impl<W: Write> Report for CountOps<W> {
    fn report(&mut self, line: &dyn fmt::Display) {
        self.calc.report(line);
    }

    fn statement_aborted(&mut self) {
        self.reset();
    }
}

impl<W: Write + 'static> RuleActions for CountOps<W> {
    type Value = Value;

    fn actions() -> ActionRegistry<Self, Value> {
        ExpressionEvaluator::<W>::actions()
            .lift(Self::base)
            .action(tags::STATEMENT_ASSIGN, Self::set_name)
            .action(tags::STATEMENT_EXPR, Self::print_result)
            .action(tags::EXPRESSION_BINOP, Self::calc_expr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ruleact::{Reduction, ReductionDispatcher};

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn dispatch(d: &mut ReductionDispatcher<CountOps<Vec<u8>>>, tag: &str, values: Vec<Value>) -> Value {
        d.dispatch(&mut Reduction::new(tag, values))
    }

    fn mul(d: &mut ReductionDispatcher<CountOps<Vec<u8>>>, a: Value, b: Value) -> Value {
        dispatch(d, tags::EXPRESSION_BINOP, vec![a, Value::from("*"), b])
    }

    #[test]
    fn counts_binary_operations_per_statement() {
        init_logger();
        let mut d = ReductionDispatcher::new(CountOps::with_output(Vec::new()));
        let v = mul(&mut d, Value::from(5), Value::from(4));
        let v = mul(&mut d, v, Value::from(6));
        assert_eq!(v, Value::from(120));
        assert_eq!(d.actions().count(), 2);

        assert_eq!(dispatch(&mut d, tags::STATEMENT_EXPR, vec![v]), Value::from(120));
        assert_eq!(d.actions().count(), 0);
        assert_eq!(
            d.actions().evaluator().output(),
            b"result: 120 (ops count: 2)\n"
        );
    }

    #[test]
    fn inherited_handlers_reach_the_inner_evaluator() {
        init_logger();
        let mut d = ReductionDispatcher::new(CountOps::with_output(Vec::new()));
        dispatch(
            &mut d,
            tags::STATEMENT_ASSIGN,
            vec![Value::from("x"), Value::from("="), Value::from(3)],
        );
        assert_eq!(
            dispatch(&mut d, tags::EXPRESSION_NAME, vec![Value::from("x")]),
            Value::from(3)
        );
        assert_eq!(
            dispatch(&mut d, tags::EXPRESSION_UMINUS, vec![Value::from("-"), Value::from(3)]),
            Value::from(-3)
        );
        assert_eq!(d.actions().evaluator().names().get("x"), Some(&crate::Number::from(3)));
        assert_eq!(d.actions().count(), 0);
    }

    #[test]
    fn failed_operation_still_counts() {
        init_logger();
        let mut d = ReductionDispatcher::new(CountOps::with_output(Vec::new()));
        let v = dispatch(
            &mut d,
            tags::EXPRESSION_BINOP,
            vec![Value::from(1), Value::from("/"), Value::from(0)],
        );
        assert_eq!(v, Value::from(0));
        assert_eq!(d.actions().count(), 1);
    }

    #[test]
    fn assignment_and_abort_reset_the_counter() {
        init_logger();
        let mut ops = CountOps::with_output(Vec::new());
        ops.calc_expr(&[Value::from(1), Value::from("+"), Value::from(2)]);
        ops.set_name(&[Value::from("a"), Value::from("="), Value::from(3)]);
        assert_eq!(ops.count(), 0);
        ops.calc_expr(&[Value::from(1), Value::from("+"), Value::from(2)]);
        ops.statement_aborted();
        assert_eq!(ops.count(), 0);
    }

    #[test]
    fn overrides_keep_registration_order() {
        let registry = CountOps::<Vec<u8>>::actions();
        assert_eq!(registry.len(), 7);
        assert_eq!(registry.tags().next(), Some(tags::STATEMENT_ASSIGN));
    }
}

//! Batch front end for ruleact-calc.
//!
//! Reads every statement from standard input and evaluates the whole text
//! twice: once with the plain [`ExpressionEvaluator`], then with a fresh
//! [`CountOps`] that also reports the operation count of each statement.
//! Log output is controlled with `RUST_LOG`.

use anyhow::{Context, Result};
use ruleact_calc::{Calc, CountOps, ExpressionEvaluator};
use std::io::{self, Read};

fn main() -> Result<()> {
    env_logger::init();

    let mut text = String::new();
    io::stdin()
        .read_to_string(&mut text)
        .context("can't read standard input")?;

    let mut calc = Calc::try_new(ExpressionEvaluator::new()).context("can't create calculator")?;
    calc.run(&text)?;

    let mut counting = Calc::try_new(CountOps::new()).context("can't create calculator")?;
    counting.run(&text)?;

    Ok(())
}

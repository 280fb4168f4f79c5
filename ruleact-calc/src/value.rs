//! # Calculator values
//!
//! [`Value`] is what travels on the parser's symbol stack: identifiers and
//! operator symbols as [`Value::Text`], literals and computed results as
//! [`Value::Number`]. A [`Number`] is an exact, unbounded integer until an
//! operation needs a real: `/` always produces a real, and so does a power
//! with a negative or fractional exponent.
//!
//! ```rust
//! # use ruleact_calc::{BinOp, Number};
//! let n = Number::from(5).binary(BinOp::Div, &Number::from(2)).unwrap();
//! assert_eq!(n, Number::Real(2.5));
//! let big = Number::from(2).binary(BinOp::Pow, &Number::from(64)).unwrap();
//! assert_eq!(big.to_string(), "18446744073709551616");
//! ```
use crate::CalcError;
use num_bigint::BigInt;
use num_traits::{ToPrimitive, Zero};
use smartstring::alias::String;
use std::fmt;
use std::ops::Neg;
use std::str::FromStr;

/// Integer powers whose result would exceed this many bits are computed as
/// reals instead.
pub const MAX_POW_BITS: u64 = 1 << 20;

#[derive(Debug, Clone, PartialEq)]
pub enum Number {
    Int(BigInt),
    Real(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Pow => "**",
        }
    }
}

impl FromStr for BinOp {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(BinOp::Add),
            "-" => Ok(BinOp::Sub),
            "*" => Ok(BinOp::Mul),
            "/" => Ok(BinOp::Div),
            "**" => Ok(BinOp::Pow),
            _ => Err(CalcError::UnknownOperator(s.into())),
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl Number {
    /// Nearest real; integers beyond the `f64` range become infinite.
    pub fn to_f64(&self) -> f64 {
        match self {
            Number::Int(n) => n.to_f64().unwrap_or(f64::NAN),
            Number::Real(x) => *x,
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Number::Int(n) => n.is_zero(),
            Number::Real(x) => *x == 0.0,
        }
    }

    /// Applies `op` with `self` on the left.
    ///
    /// Fails on division by zero, on zero raised to a negative power, and on
    /// a negative base with a fractional exponent.
    pub fn binary(&self, op: BinOp, rhs: &Number) -> Result<Number, CalcError> {
        use Number::{Int, Real};
        let n = match (op, self, rhs) {
            (BinOp::Add, Int(a), Int(b)) => Int(a + b),
            (BinOp::Sub, Int(a), Int(b)) => Int(a - b),
            (BinOp::Mul, Int(a), Int(b)) => Int(a * b),
            (BinOp::Add, a, b) => Real(a.to_f64() + b.to_f64()),
            (BinOp::Sub, a, b) => Real(a.to_f64() - b.to_f64()),
            (BinOp::Mul, a, b) => Real(a.to_f64() * b.to_f64()),
            (BinOp::Div, a, b) => {
                if b.is_zero() {
                    return Err(CalcError::DivisionByZero);
                }
                Real(a.to_f64() / b.to_f64())
            }
            (BinOp::Pow, a, b) => return a.pow(b),
        };
        Ok(n)
    }

    fn pow(&self, exp: &Number) -> Result<Number, CalcError> {
        if let (Number::Int(base), Number::Int(e)) = (self, exp) {
            if let Some(e) = e.to_u32() {
                if base.bits().saturating_mul(u64::from(e)) <= MAX_POW_BITS {
                    return Ok(Number::Int(base.pow(e)));
                }
                log::debug!("{base} ** {e} exceeds {MAX_POW_BITS} bits, computing as real");
            }
        }
        let (base, e) = (self.to_f64(), exp.to_f64());
        if base == 0.0 && e < 0.0 {
            return Err(CalcError::DivisionByZero);
        }
        if base < 0.0 && e.fract() != 0.0 {
            return Err(CalcError::ComplexResult);
        }
        Ok(Number::Real(base.powf(e)))
    }
}

impl Neg for Number {
    type Output = Number;

    fn neg(self) -> Number {
        match self {
            Number::Int(n) => Number::Int(-n),
            Number::Real(x) => Number::Real(-x),
        }
    }
}

impl Default for Number {
    fn default() -> Self {
        Number::Int(BigInt::zero())
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Number::Int(BigInt::from(n))
    }
}

impl From<BigInt> for Number {
    fn from(n: BigInt) -> Self {
        Number::Int(n)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(n) => write!(f, "{n}"),
            // whole reals keep a fractional digit so `6/3` prints as `2.0`
            Number::Real(x) if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e16 => {
                write!(f, "{x:.1}")
            }
            Number::Real(x) => write!(f, "{x}"),
        }
    }
}

/// A symbol value handed to rule actions.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// No payload; the value of a reduction over no symbols.
    #[default]
    None,
    Number(Number),
    /// An identifier or an operator symbol.
    Text(String),
}

impl Value {
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(Number::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.into())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => Ok(()),
            Value::Number(n) => fmt::Display::fmt(n, f),
            Value::Text(s) => f.write_str(s),
        }
    }
}

//! Monetary values as signed integer cents.
//!
//! Amounts enter the system as decimal strings with at most two fractional
//! digits and are stored as `i64` cents. Parsing goes through `rust_decimal`
//! so no floating point is involved at any stage.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::fmt;
use std::ops::{Add, AddAssign, Neg};
use std::str::FromStr;
use thiserror::Error;

/// Error produced when an amount token cannot be converted to cents.
#[derive(Error, Debug)]
pub enum MoneyError {
    /// The token is not a decimal number.
    #[error("invalid amount: {0}")]
    Invalid(#[from] rust_decimal::Error),

    /// The amount does not fit in `i64` cents.
    #[error("amount out of range")]
    OutOfRange,
}

/// A signed amount of money in euro cents.
///
/// Decimal input is scaled by 100 and truncated toward zero, so `"33.339"`
/// parses to 3333 cents.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use expenses_engine::Cents;
///
/// let amount = Cents::from_str("10.50").unwrap();
/// assert_eq!(amount, Cents::new(1050));
/// assert_eq!(amount.to_string(), "10.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Cents(i64);

impl Cents {
    /// Zero value.
    pub const ZERO: Self = Cents(0);

    /// Creates an amount from raw cents.
    pub const fn new(cents: i64) -> Self {
        Cents(cents)
    }

    /// The raw cent count.
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Returns `true` if this amount is zero.
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// The magnitude of this amount.
    pub fn abs(self) -> Self {
        Cents(self.0.abs())
    }
}

impl FromStr for Cents {
    type Err = MoneyError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s.trim())?;
        let scaled = (decimal * Decimal::ONE_HUNDRED).trunc();
        scaled.to_i64().map(Cents).ok_or(MoneyError::OutOfRange)
    }
}

impl fmt::Display for Cents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let cents = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, cents / 100, cents % 100)
    }
}

impl Add for Cents {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Cents(self.0 + rhs.0)
    }
}

impl AddAssign for Cents {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Neg for Cents {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Cents(-self.0)
    }
}

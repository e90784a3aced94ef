//! Fixed-point currency amounts stored as whole cents.

use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
};

use serde::{Deserialize, Serialize};

const CENTS_PER_UNIT: i64 = 100;

/// A signed monetary amount in minor units (cents).
///
/// Serialises as a decimal number so JSON payloads stay human readable
/// (`2500.0`, `12.5`), while arithmetic inside the core is exact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Money {
    cents: i64,
}

impl Money {
    pub const ZERO: Money = Money { cents: 0 };

    pub const fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    /// Converts a floating point amount, rounding to the nearest cent.
    /// Non-finite input becomes zero.
    pub fn from_f64(value: f64) -> Self {
        if !value.is_finite() {
            return Self::ZERO;
        }
        Self {
            cents: (value * CENTS_PER_UNIT as f64).round() as i64,
        }
    }

    pub fn from_units(units: i64) -> Self {
        Self {
            cents: units.saturating_mul(CENTS_PER_UNIT),
        }
    }

    pub const fn cents(self) -> i64 {
        self.cents
    }

    pub fn to_f64(self) -> f64 {
        self.cents as f64 / CENTS_PER_UNIT as f64
    }

    pub fn abs(self) -> Self {
        Self {
            cents: self.cents.saturating_abs(),
        }
    }

    pub fn is_zero(self) -> bool {
        self.cents == 0
    }

    pub fn is_positive(self) -> bool {
        self.cents > 0
    }

    pub fn is_negative(self) -> bool {
        self.cents < 0
    }
}

impl From<f64> for Money {
    fn from(value: f64) -> Self {
        Money::from_f64(value)
    }
}

impl From<Money> for f64 {
    fn from(value: Money) -> Self {
        value.to_f64()
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money::from_cents(self.cents.saturating_add(rhs.cents))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        *self = *self + rhs;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money::from_cents(self.cents.saturating_sub(rhs.cents))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        *self = *self - rhs;
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money::from_cents(self.cents.saturating_neg())
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

/// Canonical plain rendering: `6000`, `6000.50`, `-12.30`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.cents < 0 { "-" } else { "" };
        let magnitude = self.cents.unsigned_abs();
        let units = magnitude / CENTS_PER_UNIT as u64;
        let fraction = magnitude % CENTS_PER_UNIT as u64;
        if fraction == 0 {
            write!(f, "{sign}{units}")
        } else {
            write!(f, "{sign}{units}.{fraction:02}")
        }
    }
}

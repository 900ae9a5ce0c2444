//! 18-decimal scaled-integer arithmetic.
//!
//! [`Fixed`] wraps a `u128` raw value where `10^18` represents `1.0`.
//! Multiplication and division route through a 256-bit intermediate, so
//! `amount * price` for any representable amount and price is exact and
//! fails with an explicit error only when the final result itself does
//! not fit in 128 bits.

use std::fmt;
use std::str::FromStr;

use primitive_types::U256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{FixedError, Result};

/// Number of raw units per whole unit (18 decimals).
pub const SCALE: u128 = 1_000_000_000_000_000_000;

/// An unsigned 18-decimal fixed-point number.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fixed(u128);

impl Fixed {
    /// The value `0`.
    pub const ZERO: Fixed = Fixed(0);

    /// The value `1.0`.
    pub const ONE: Fixed = Fixed(SCALE);

    /// Construct from a raw scaled value (`raw / 10^18` units).
    pub const fn from_raw(raw: u128) -> Self {
        Fixed(raw)
    }

    /// Construct from a whole number of units.
    pub const fn from_int(n: u64) -> Self {
        // u64::MAX * SCALE < u128::MAX, so this cannot overflow.
        Fixed(n as u128 * SCALE)
    }

    /// The raw scaled value.
    pub const fn raw(self) -> u128 {
        self.0
    }

    /// Whether the value is exactly zero.
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Checked addition.
    pub fn checked_add(self, other: Fixed) -> Result<Fixed> {
        self.0
            .checked_add(other.0)
            .map(Fixed)
            .ok_or(FixedError::Overflow)
    }

    /// Checked subtraction. Fails with [`FixedError::Underflow`] when
    /// `other > self`.
    pub fn checked_sub(self, other: Fixed) -> Result<Fixed> {
        self.0
            .checked_sub(other.0)
            .map(Fixed)
            .ok_or(FixedError::Underflow)
    }

    /// Checked multiplication: `(self * other) / SCALE`.
    ///
    /// The product is formed in 256 bits, so intermediate overflow is
    /// impossible; the operation fails only when the scaled result does
    /// not fit in 128 bits.
    pub fn checked_mul(self, other: Fixed) -> Result<Fixed> {
        let wide = U256::from(self.0) * U256::from(other.0) / U256::from(SCALE);
        narrow(wide).map(Fixed)
    }

    /// Checked division: `(self * SCALE) / other`.
    ///
    /// # Arguments
    ///
    /// * `other` - The divisor; zero fails with
    ///   [`FixedError::DivisionByZero`].
    pub fn checked_div(self, other: Fixed) -> Result<Fixed> {
        if other.0 == 0 {
            return Err(FixedError::DivisionByZero);
        }
        let wide = U256::from(self.0) * U256::from(SCALE) / U256::from(other.0);
        narrow(wide).map(Fixed)
    }

    /// Saturating addition, pinned to `u128::MAX` raw.
    pub fn saturating_add(self, other: Fixed) -> Fixed {
        Fixed(self.0.saturating_add(other.0))
    }

    /// Saturating multiplication, pinned to `u128::MAX` raw.
    ///
    /// Used on paths that clamp the result afterwards: a saturated
    /// product is already above any clamp bound, so pinning loses
    /// nothing.
    pub fn saturating_mul(self, other: Fixed) -> Fixed {
        let wide = U256::from(self.0) * U256::from(other.0) / U256::from(SCALE);
        match narrow(wide) {
            Ok(raw) => Fixed(raw),
            Err(_) => Fixed(u128::MAX),
        }
    }

    /// Absolute difference, `|self - other|`.
    pub const fn abs_diff(self, other: Fixed) -> Fixed {
        Fixed(self.0.abs_diff(other.0))
    }

    /// The smaller of `self` and `other`.
    pub fn min(self, other: Fixed) -> Fixed {
        Fixed(self.0.min(other.0))
    }

    /// The larger of `self` and `other`.
    pub fn max(self, other: Fixed) -> Fixed {
        Fixed(self.0.max(other.0))
    }
}

/// Narrow a 256-bit intermediate back to a raw `u128`.
fn narrow(wide: U256) -> Result<u128> {
    if wide > U256::from(u128::MAX) {
        return Err(FixedError::Overflow);
    }
    Ok(wide.low_u128())
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let int = self.0 / SCALE;
        let frac = self.0 % SCALE;
        if frac == 0 {
            return write!(f, "{int}");
        }
        let digits = format!("{frac:018}");
        write!(f, "{int}.{}", digits.trim_end_matches('0'))
    }
}

impl FromStr for Fixed {
    type Err = FixedError;

    /// Parse a decimal string such as `"1"`, `"0.5"` or `"2.125"`.
    ///
    /// At most 18 fractional digits are accepted; the integer part must
    /// be present (write `"0.5"`, not `".5"`).
    fn from_str(s: &str) -> Result<Fixed> {
        let bad = || FixedError::InvalidNumber(s.to_string());
        let (int_part, frac_part) = match s.split_once('.') {
            Some((_, "")) => return Err(bad()),
            Some((i, f)) => (i, f),
            None => (s, ""),
        };
        if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(bad());
        }
        if frac_part.len() > 18 || !frac_part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(bad());
        }
        let int: u128 = int_part.parse().map_err(|_| bad())?;
        let frac: u128 = if frac_part.is_empty() {
            0
        } else {
            let padded = format!("{frac_part:0<18}");
            padded.parse().map_err(|_| bad())?
        };
        let raw = int
            .checked_mul(SCALE)
            .and_then(|v| v.checked_add(frac))
            .ok_or(FixedError::Overflow)?;
        Ok(Fixed(raw))
    }
}

impl Serialize for Fixed {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Fixed {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

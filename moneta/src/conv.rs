// Copyright Materialize, Inc. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository, or online at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Conversions between [`ScaledDecimal`] and [`Rational`], and the rounding
//! primitive every lossy conversion funnels through.

use std::cmp::Ordering;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

use crate::context::{Context, PrecisionBudget, RoundingMode};
use crate::error::{DivisionError, PrecisionLossCode, PrecisionLossError};
use crate::rational::Rational;
use crate::scaled::ScaledDecimal;

/// The most significant digits [`max_precision_from_bits`] will try.
pub const MAX_BITS_PRECISION: u32 = 50;

/// Computes 10<sup>`n`</sup>.
pub(crate) fn pow10(n: u32) -> BigInt {
    num_traits::pow(BigInt::from(10), n as usize)
}

/// Counts the decimal digits in the magnitude of `n`. Zero has one digit.
pub(crate) fn digit_count(n: &BigInt) -> u32 {
    if n.is_zero() {
        1
    } else {
        n.magnitude().to_str_radix(10).len() as u32
    }
}

/// Divides `numerator` by `denominator`, resolving the remainder according to
/// `mode`.
///
/// This is the single rounding primitive of the crate: every place a ratio
/// must collapse to an integer goes through here. The quotient is first
/// computed by truncating division; the sign of the true quotient is
/// `numerator < 0 XOR denominator < 0`, and the directed modes use that sign
/// to decide whether moving "up" means moving towards or away from zero.
///
/// ```
/// use moneta::{round_ratio, RoundingMode};
/// use num_bigint::BigInt;
///
/// let r = |n: i64, d: i64, m| round_ratio(&BigInt::from(n), &BigInt::from(d), m).unwrap();
/// assert_eq!(r(5, 10, RoundingMode::HalfEven), BigInt::from(0));
/// assert_eq!(r(15, 10, RoundingMode::HalfEven), BigInt::from(2));
/// assert_eq!(r(-15, 10, RoundingMode::Ceil), BigInt::from(-1));
/// ```
pub fn round_ratio(
    numerator: &BigInt,
    denominator: &BigInt,
    mode: RoundingMode,
) -> Result<BigInt, DivisionError> {
    if denominator.is_zero() {
        return Err(DivisionError::by_zero());
    }
    Ok(round_div(numerator, denominator, mode))
}

/// Like [`round_ratio`], for callers that have already ruled out a zero
/// denominator.
pub(crate) fn round_div(numerator: &BigInt, denominator: &BigInt, mode: RoundingMode) -> BigInt {
    debug_assert!(!denominator.is_zero());
    let (quotient, remainder) = numerator.div_rem(denominator);
    if remainder.is_zero() {
        return quotient;
    }
    let negative = numerator.is_negative() != denominator.is_negative();
    let away = if negative {
        &quotient - 1u32
    } else {
        &quotient + 1u32
    };
    match mode {
        RoundingMode::Trunc => quotient,
        RoundingMode::Expand => away,
        RoundingMode::Ceil => {
            if negative {
                quotient
            } else {
                away
            }
        }
        RoundingMode::Floor => {
            if negative {
                away
            } else {
                quotient
            }
        }
        half => {
            let twice = remainder.abs() * 2u32;
            match twice.cmp(&denominator.abs()) {
                Ordering::Less => quotient,
                Ordering::Greater => away,
                Ordering::Equal => match half {
                    RoundingMode::HalfCeil if negative => quotient,
                    RoundingMode::HalfCeil => away,
                    RoundingMode::HalfFloor if negative => away,
                    RoundingMode::HalfFloor => quotient,
                    RoundingMode::HalfExpand => away,
                    RoundingMode::HalfTrunc => quotient,
                    RoundingMode::HalfEven if quotient.is_even() => quotient,
                    RoundingMode::HalfEven => away,
                    _ => unreachable!("directed modes handled above"),
                },
            }
        }
    }
}

/// Strips every factor of two and five from the magnitude of `n`.
///
/// Returns the residual along with the number of twos and fives removed. A
/// residual of one means `1/n` terminates in base 10.
pub(crate) fn strip_twos_and_fives(n: &BigInt) -> (BigInt, u32, u32) {
    let two = BigInt::from(2);
    let five = BigInt::from(5);
    let mut m = n.abs();
    let (mut twos, mut fives) = (0, 0);
    if m.is_zero() {
        return (m, 0, 0);
    }
    while m.is_even() {
        m /= &two;
        twos += 1;
    }
    while (&m % &five).is_zero() {
        m /= &five;
        fives += 1;
    }
    (m, twos, fives)
}

/// Computes floor(log<sub>10</sub>(|n/d|)) for a non-zero ratio, exactly.
fn decimal_exponent(n: &BigInt, d: &BigInt) -> i64 {
    let n = n.abs();
    let d = d.abs();
    let mut e = i64::from(digit_count(&n)) - i64::from(digit_count(&d));
    // Compare |n| against |d| * 10^e without leaving the integers.
    let (lhs, rhs) = if e >= 0 {
        (n, d * pow10(e as u32))
    } else {
        (n * pow10((-e) as u32), d)
    };
    if lhs < rhs {
        e -= 1;
    }
    e
}

/// Bit size of a candidate result: coefficient bits plus scale bits.
fn bit_size(d: &ScaledDecimal) -> u64 {
    let scale_bits = u64::from(32 - d.scale().leading_zeros());
    d.value().bits() + scale_bits
}

/// Finds the largest number of significant digits, up to
/// [`MAX_BITS_PRECISION`], at which `r` rounds to a decimal occupying no more
/// than `max_bits` bits.
///
/// Precisions are tried linearly from one upward. If not even a single
/// significant digit fits, one is returned.
pub fn max_precision_from_bits(r: &Rational, max_bits: u64, mode: RoundingMode) -> u32 {
    let mut best = 1;
    for precision in 1..=MAX_BITS_PRECISION {
        let candidate = to_precision(r, precision, mode);
        if bit_size(&candidate) <= max_bits {
            best = precision;
        }
    }
    best
}

/// Rounds `r` to `precision` significant digits.
///
/// The scale never drops below zero, so an integer part wider than
/// `precision` is kept in full.
fn to_precision(r: &Rational, precision: u32, mode: RoundingMode) -> ScaledDecimal {
    if r.numer().is_zero() {
        return ScaledDecimal::zero();
    }
    let magnitude = decimal_exponent(r.numer(), r.denom()) + 1;
    let places = (i64::from(precision) - magnitude).max(0) as u32;
    let value = round_div(&(r.numer() * pow10(places)), r.denom(), mode);
    ScaledDecimal::new(value, places)
}

impl Rational {
    /// Converts the fraction to a decimal without loss.
    ///
    /// Succeeds only when the simplified denominator divides a power of ten,
    /// i.e. has no prime factors besides 2 and 5. The scale of the result is
    /// the smallest that represents the value exactly.
    ///
    /// ```
    /// use moneta::Rational;
    ///
    /// let quarter = Rational::new(1, 4)?;
    /// assert_eq!(quarter.to_scaled()?.to_string(), "0.25");
    /// assert!(Rational::new(1, 3)?.to_scaled().is_err());
    /// # Ok::<_, Box<dyn std::error::Error>>(())
    /// ```
    pub fn to_scaled(&self) -> Result<ScaledDecimal, PrecisionLossError> {
        let r = self.simplify();
        let (residual, twos, fives) = strip_twos_and_fives(r.denom());
        if !residual.is_one() {
            return Err(PrecisionLossError::new(
                PrecisionLossCode::NotPowerOfTen,
                self.to_string(),
            ));
        }
        let scale = twos.max(fives);
        let factor = pow10(scale) / r.denom();
        Ok(ScaledDecimal::new(r.numer() * factor, scale))
    }

    /// Converts the fraction to a decimal within the budget of `cx`,
    /// rounding with the context's rounding mode.
    ///
    /// With a [`PrecisionBudget::Digits`] budget, the order of magnitude of
    /// the value determines how many decimal places the digits afford. With a
    /// [`PrecisionBudget::Bits`] budget, the widest precision that fits is
    /// found with [`max_precision_from_bits`].
    pub fn to_scaled_lossy(&self, cx: &Context) -> ScaledDecimal {
        let r = self.simplify();
        let precision = match cx.budget() {
            PrecisionBudget::Digits(digits) => digits,
            PrecisionBudget::Bits(bits) => max_precision_from_bits(&r, bits, cx.rounding()),
        };
        let result = to_precision(&r, precision, cx.rounding());
        if Rational::from(&result) != r {
            log::debug!(
                "rounded {} to {} ({} significant digits, {})",
                self,
                result,
                precision,
                cx.rounding()
            );
        }
        result
    }

    /// Rounds the fraction to an integer.
    pub fn round(&self, mode: RoundingMode) -> BigInt {
        round_div(self.numer(), self.denom(), mode)
    }
}

impl From<ScaledDecimal> for Rational {
    fn from(d: ScaledDecimal) -> Rational {
        let scale = d.scale();
        Rational::new_unchecked(d.into_value(), pow10(scale))
    }
}

impl<'a> From<&'a ScaledDecimal> for Rational {
    fn from(d: &'a ScaledDecimal) -> Rational {
        Rational::new_unchecked(d.value().clone(), pow10(d.scale()))
    }
}

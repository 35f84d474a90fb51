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

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

use crate::context::RoundingMode;
use crate::conv::{self, pow10};
use crate::error::{
    DivisionError, DivisionErrorCode, ParseDecimalError, PrecisionLossCode, PrecisionLossError,
};

/// Exponents beyond this magnitude are rejected when parsing, since they
/// would require materializing enormous coefficients.
const MAX_PARSE_EXPONENT: i64 = 10_000;

/// A fixed-point decimal number: an arbitrary-precision integer coefficient
/// and a non-negative scale.
///
/// The value represented is `value × 10^(-scale)`. The scale is part of the
/// representation but not of the value: `1.23` at scale 2 and `1.230` at
/// scale 3 compare and hash as equal. The scale is preserved by formatting,
/// since trailing zeros carry significance for money.
///
/// Addition, subtraction and multiplication are available through the
/// standard operators:
///
/// ```
/// use moneta::ScaledDecimal;
///
/// let a: ScaledDecimal = "1.50".parse()?;
/// let b: ScaledDecimal = "0.125".parse()?;
/// assert_eq!((&a + &b).to_string(), "1.625");
/// assert_eq!((&a - &b).to_string(), "1.375");
/// # Ok::<_, Box<dyn std::error::Error>>(())
/// ```
///
/// Multiplication truncates the product towards zero to the larger of the
/// two operand scales rather than keeping the sum of the scales; see
/// [`ScaledDecimal::multiply_exact`] for the full-precision product.
/// Division is only offered where it is exact, via
/// [`ScaledDecimal::divide_by_integer`] and [`ScaledDecimal::divide`].
#[derive(Clone)]
pub struct ScaledDecimal {
    value: BigInt,
    scale: u32,
}

impl ScaledDecimal {
    /// Constructs a decimal representing `value × 10^(-scale)`.
    pub fn new<V>(value: V, scale: u32) -> ScaledDecimal
    where
        V: Into<BigInt>,
    {
        ScaledDecimal {
            value: value.into(),
            scale,
        }
    }

    /// Constructs zero at scale zero.
    pub fn zero() -> ScaledDecimal {
        ScaledDecimal::new(BigInt::zero(), 0)
    }

    /// Constructs a decimal from a count of minor units, e.g. cents at
    /// scale 2.
    pub fn from_minor_units(units: i64, scale: u32) -> ScaledDecimal {
        ScaledDecimal::new(units, scale)
    }

    /// Constructs an integral decimal at scale zero.
    pub fn from_i64(n: i64) -> ScaledDecimal {
        ScaledDecimal::new(n, 0)
    }

    /// Returns the integer coefficient.
    pub fn value(&self) -> &BigInt {
        &self.value
    }

    /// Returns the number of digits after the decimal point.
    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Consumes the decimal, returning its coefficient.
    pub fn into_value(self) -> BigInt {
        self.value
    }

    /// Consumes the decimal, returning its coefficient and scale.
    pub fn into_parts(self) -> (BigInt, u32) {
        (self.value, self.scale)
    }

    /// Reports whether the number is zero.
    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Reports whether the number is less than zero.
    pub fn is_negative(&self) -> bool {
        self.value.is_negative()
    }

    /// Reports whether the number is greater than zero.
    pub fn is_positive(&self) -> bool {
        self.value.is_positive()
    }

    /// Returns -1, 0 or 1 according to the sign of the number.
    pub fn signum(&self) -> i32 {
        if self.value.is_negative() {
            -1
        } else if self.value.is_zero() {
            0
        } else {
            1
        }
    }

    /// Computes the absolute value.
    pub fn abs(&self) -> ScaledDecimal {
        ScaledDecimal::new(self.value.abs(), self.scale)
    }

    /// Re-expresses the number at `target` scale.
    ///
    /// Raising the scale is always exact. Lowering it is exact only if the
    /// discarded digits are zero; otherwise the call fails unless
    /// `allow_lossy` is set, in which case the discarded digits are truncated
    /// towards zero.
    pub fn normalize(
        &self,
        target: u32,
        allow_lossy: bool,
    ) -> Result<ScaledDecimal, PrecisionLossError> {
        if target >= self.scale {
            return Ok(self.upscale(target));
        }
        let divisor = pow10(self.scale - target);
        let (quotient, remainder) = self.value.div_rem(&divisor);
        if !remainder.is_zero() && !allow_lossy {
            return Err(PrecisionLossError::new(
                PrecisionLossCode::ScaleReduction,
                self.to_string(),
            ));
        }
        Ok(ScaledDecimal::new(quotient, target))
    }

    /// Re-expresses the number at `target` scale, rounding any discarded
    /// digits with `mode`.
    pub fn rescale(&self, target: u32, mode: RoundingMode) -> ScaledDecimal {
        if target >= self.scale {
            return self.upscale(target);
        }
        let divisor = pow10(self.scale - target);
        ScaledDecimal::new(conv::round_div(&self.value, &divisor, mode), target)
    }

    /// Removes trailing fractional zeros without changing the value.
    pub fn reduce(&self) -> ScaledDecimal {
        let ten = BigInt::from(10);
        let mut value = self.value.clone();
        let mut scale = self.scale;
        if value.is_zero() {
            return ScaledDecimal::zero();
        }
        while scale > 0 {
            let (q, r) = value.div_rem(&ten);
            if !r.is_zero() {
                break;
            }
            value = q;
            scale -= 1;
        }
        ScaledDecimal::new(value, scale)
    }

    /// Multiplies by `rhs`, keeping every digit of the product.
    ///
    /// The result has scale `self.scale() + rhs.scale()`.
    pub fn multiply_exact(&self, rhs: &ScaledDecimal) -> ScaledDecimal {
        ScaledDecimal::new(&self.value * &rhs.value, self.scale + rhs.scale)
    }

    /// Divides by the integer `n`, provided the quotient terminates in base
    /// 10.
    ///
    /// The quotient terminates exactly when `n` has no prime factors besides
    /// 2 and 5. Each such factor removed from `n` raises the scale of the
    /// result by one.
    ///
    /// ```
    /// use moneta::ScaledDecimal;
    ///
    /// let hundred = ScaledDecimal::new(100, 0);
    /// assert_eq!(hundred.divide_by_integer(4)?.to_string(), "25.00");
    /// assert!(hundred.divide_by_integer(3).is_err());
    /// # Ok::<_, Box<dyn std::error::Error>>(())
    /// ```
    pub fn divide_by_integer<N>(&self, n: N) -> Result<ScaledDecimal, DivisionError>
    where
        N: Into<BigInt>,
    {
        self.divide_exact(&n.into(), DivisionErrorCode::RequiresRounding)
    }

    /// Divides by another decimal, provided the quotient terminates in base
    /// 10.
    ///
    /// The dividend is first lifted by the divisor's scale, which reduces the
    /// problem to division by the divisor's integer coefficient. That
    /// coefficient must pass the same test as in
    /// [`ScaledDecimal::divide_by_integer`].
    pub fn divide(&self, rhs: &ScaledDecimal) -> Result<ScaledDecimal, DivisionError> {
        let lifted = ScaledDecimal::new(&self.value * pow10(rhs.scale), self.scale);
        lifted.divide_exact(&rhs.value, DivisionErrorCode::InvalidDivisor)
    }

    fn divide_exact(
        &self,
        n: &BigInt,
        code: DivisionErrorCode,
    ) -> Result<ScaledDecimal, DivisionError> {
        if n.is_zero() {
            return Err(DivisionError::by_zero());
        }
        let (residual, twos, fives) = conv::strip_twos_and_fives(n);
        if !residual.is_one() {
            return Err(DivisionError::new(code, n.to_string()));
        }
        let removed = twos + fives;
        let value = &self.value * pow10(removed) / n;
        Ok(ScaledDecimal::new(value, self.scale + removed))
    }

    fn upscale(&self, target: u32) -> ScaledDecimal {
        debug_assert!(target >= self.scale);
        ScaledDecimal::new(&self.value * pow10(target - self.scale), target)
    }

    /// Brings two decimals to their common (larger) scale.
    fn aligned(&self, rhs: &ScaledDecimal) -> (BigInt, BigInt, u32) {
        let scale = self.scale.max(rhs.scale);
        (
            self.upscale(scale).value,
            rhs.upscale(scale).value,
            scale,
        )
    }

    /// Renders the number in plain positional notation with exactly
    /// `scale()` fractional digits.
    pub fn to_decimal_string(&self) -> DecimalString {
        DecimalString(self.to_string())
    }
}

impl Default for ScaledDecimal {
    fn default() -> ScaledDecimal {
        ScaledDecimal::zero()
    }
}

impl fmt::Debug for ScaledDecimal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for ScaledDecimal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let digits = self.value.magnitude().to_str_radix(10);
        let scale = self.scale as usize;
        let mut s = String::with_capacity(digits.len() + scale + 3);
        if self.value.is_negative() {
            s.push('-');
        }
        if digits.len() > scale {
            let (int, frac) = digits.split_at(digits.len() - scale);
            s.push_str(int);
            if scale > 0 {
                s.push('.');
                s.push_str(frac);
            }
        } else {
            s.push_str("0.");
            for _ in 0..scale - digits.len() {
                s.push('0');
            }
            s.push_str(&digits);
        }
        f.write_str(&s)
    }
}

impl FromStr for ScaledDecimal {
    type Err = ParseDecimalError;

    /// Parses plain or scientific decimal notation, e.g. `-12.50` or
    /// `1.23e-5`.
    ///
    /// The exponent is folded into the scale; no binary floating point is
    /// involved. A positive exponent that exceeds the number of fractional
    /// digits produces a scale of zero.
    fn from_str(s: &str) -> Result<ScaledDecimal, ParseDecimalError> {
        let err = || ParseDecimalError::new(s);
        let (negative, rest) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };
        let (mantissa, exponent) = match rest.find(|c| c == 'e' || c == 'E') {
            Some(i) => {
                let exponent: i64 = rest[i + 1..].parse().map_err(|_| err())?;
                if exponent.abs() > MAX_PARSE_EXPONENT {
                    return Err(err());
                }
                (&rest[..i], exponent)
            }
            None => (rest, 0),
        };
        let (int, frac) = match mantissa.find('.') {
            Some(i) => (&mantissa[..i], &mantissa[i + 1..]),
            None => (mantissa, ""),
        };
        if int.is_empty() && frac.is_empty() {
            return Err(err());
        }
        if !int.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(err());
        }
        let mut digits = String::with_capacity(int.len() + frac.len());
        digits.push_str(int);
        digits.push_str(frac);
        let mut value: BigInt = digits.parse().map_err(|_| err())?;
        if negative {
            value = -value;
        }
        let scale = frac.len() as i64 - exponent;
        if scale >= 0 {
            let scale = u32::try_from(scale).map_err(|_| err())?;
            Ok(ScaledDecimal::new(value, scale))
        } else {
            Ok(ScaledDecimal::new(value * pow10((-scale) as u32), 0))
        }
    }
}

impl PartialEq for ScaledDecimal {
    fn eq(&self, other: &ScaledDecimal) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScaledDecimal {}

impl PartialOrd for ScaledDecimal {
    fn partial_cmp(&self, other: &ScaledDecimal) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScaledDecimal {
    fn cmp(&self, other: &ScaledDecimal) -> Ordering {
        if self.scale == other.scale {
            return self.value.cmp(&other.value);
        }
        let (lhs, rhs, _) = self.aligned(other);
        lhs.cmp(&rhs)
    }
}

impl Hash for ScaledDecimal {
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        let d = self.reduce();
        d.value.hash(state);
        d.scale.hash(state);
    }
}

impl Neg for ScaledDecimal {
    type Output = ScaledDecimal;

    fn neg(self) -> ScaledDecimal {
        ScaledDecimal::new(-self.value, self.scale)
    }
}

impl<'a> Neg for &'a ScaledDecimal {
    type Output = ScaledDecimal;

    fn neg(self) -> ScaledDecimal {
        ScaledDecimal::new(-&self.value, self.scale)
    }
}

impl<'a> Add<&'a ScaledDecimal> for &'a ScaledDecimal {
    type Output = ScaledDecimal;

    fn add(self, rhs: &'a ScaledDecimal) -> ScaledDecimal {
        let (lhs, rhs, scale) = self.aligned(rhs);
        ScaledDecimal::new(lhs + rhs, scale)
    }
}

impl Add<ScaledDecimal> for ScaledDecimal {
    type Output = ScaledDecimal;

    fn add(self, rhs: ScaledDecimal) -> ScaledDecimal {
        &self + &rhs
    }
}

impl AddAssign<ScaledDecimal> for ScaledDecimal {
    fn add_assign(&mut self, rhs: ScaledDecimal) {
        *self = &*self + &rhs;
    }
}

impl<'a> Sub<&'a ScaledDecimal> for &'a ScaledDecimal {
    type Output = ScaledDecimal;

    fn sub(self, rhs: &'a ScaledDecimal) -> ScaledDecimal {
        let (lhs, rhs, scale) = self.aligned(rhs);
        ScaledDecimal::new(lhs - rhs, scale)
    }
}

impl Sub<ScaledDecimal> for ScaledDecimal {
    type Output = ScaledDecimal;

    fn sub(self, rhs: ScaledDecimal) -> ScaledDecimal {
        &self - &rhs
    }
}

impl SubAssign<ScaledDecimal> for ScaledDecimal {
    fn sub_assign(&mut self, rhs: ScaledDecimal) {
        *self = &*self - &rhs;
    }
}

impl<'a> Mul<&'a ScaledDecimal> for &'a ScaledDecimal {
    type Output = ScaledDecimal;

    /// Multiplies, then truncates the product towards zero to
    /// `max(self.scale(), rhs.scale())`.
    ///
    /// Digits beyond the larger operand scale are silently discarded: `1.5 *
    /// 1.5` is `2.2`, not `2.25`. Use [`ScaledDecimal::multiply_exact`] when
    /// every digit matters.
    fn mul(self, rhs: &'a ScaledDecimal) -> ScaledDecimal {
        let product = &self.value * &rhs.value;
        let scale = self.scale.max(rhs.scale);
        let dropped = self.scale.min(rhs.scale);
        // BigInt division truncates towards zero.
        ScaledDecimal::new(product / pow10(dropped), scale)
    }
}

impl Mul<ScaledDecimal> for ScaledDecimal {
    type Output = ScaledDecimal;

    fn mul(self, rhs: ScaledDecimal) -> ScaledDecimal {
        &self * &rhs
    }
}

impl Sum for ScaledDecimal {
    fn sum<I>(iter: I) -> ScaledDecimal
    where
        I: Iterator<Item = ScaledDecimal>,
    {
        iter.fold(ScaledDecimal::zero(), |acc, d| acc + d)
    }
}

impl<'a> Sum<&'a ScaledDecimal> for ScaledDecimal {
    fn sum<I>(iter: I) -> ScaledDecimal
    where
        I: Iterator<Item = &'a ScaledDecimal>,
    {
        iter.fold(ScaledDecimal::zero(), |acc, d| &acc + d)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for ScaledDecimal {
                fn from(n: $t) -> ScaledDecimal {
                    ScaledDecimal::new(n, 0)
                }
            }
        )*
    };
}

impl_from_int!(i32, i64, i128, u32, u64, u128);

impl From<BigInt> for ScaledDecimal {
    fn from(n: BigInt) -> ScaledDecimal {
        ScaledDecimal::new(n, 0)
    }
}

/// A string known to hold a decimal number in plain positional notation:
/// an optional `-`, one or more digits, and optionally a `.` followed by one
/// or more digits.
///
/// This is the currency in which exact amounts are handed to display
/// formatters and serializers. It can only be obtained from a
/// [`ScaledDecimal`] or through [`DecimalString::new`], which validates.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct DecimalString(String);

impl DecimalString {
    /// Validates `s` as a plain decimal string.
    pub fn new<S>(s: S) -> Result<DecimalString, ParseDecimalError>
    where
        S: Into<String>,
    {
        let s = s.into();
        let body = s.strip_prefix('-').unwrap_or(&s);
        let (int, frac) = match body.find('.') {
            Some(i) => (&body[..i], Some(&body[i + 1..])),
            None => (body, None),
        };
        let digits = |t: &str| !t.is_empty() && t.bytes().all(|b| b.is_ascii_digit());
        if digits(int) && frac.map_or(true, digits) {
            Ok(DecimalString(s))
        } else {
            Err(ParseDecimalError::new(s))
        }
    }

    /// Returns the string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper, returning the string.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Parses the string back into a decimal with the same scale.
    pub fn to_scaled(&self) -> ScaledDecimal {
        // Validated on construction, so parsing cannot fail.
        self.0
            .parse()
            .unwrap_or_else(|_| unreachable!("DecimalString holds a valid decimal"))
    }
}

impl AsRef<str> for DecimalString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DecimalString {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'a> From<&'a ScaledDecimal> for DecimalString {
    fn from(d: &'a ScaledDecimal) -> DecimalString {
        d.to_decimal_string()
    }
}

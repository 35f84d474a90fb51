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
use std::ops::{Add, Mul, Neg, Sub};

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

use crate::error::DivisionError;

/// The customary number of fractional digits to request from
/// [`Rational::to_decimal_string`].
pub const DEFAULT_STRING_PRECISION: u32 = 50;

/// An exact fraction of two arbitrary-precision integers.
///
/// A `Rational` is not kept in lowest terms. Addition and subtraction
/// simplify their result to bound the growth of the numerator and
/// denominator, but multiplication and division do not; call
/// [`Rational::simplify`] explicitly when that matters. Equality, ordering
/// and hashing are by value regardless of representation, so `2/4 == 1/2`.
///
/// The denominator is never zero.
#[derive(Clone)]
pub struct Rational {
    numer: BigInt,
    denom: BigInt,
}

impl Rational {
    /// Constructs the fraction `numer / denom`.
    ///
    /// Fails if `denom` is zero.
    pub fn new<N, D>(numer: N, denom: D) -> Result<Rational, DivisionError>
    where
        N: Into<BigInt>,
        D: Into<BigInt>,
    {
        let denom = denom.into();
        if denom.is_zero() {
            return Err(DivisionError::by_zero());
        }
        Ok(Rational {
            numer: numer.into(),
            denom,
        })
    }

    /// Constructs a fraction whose denominator is known to be non-zero.
    pub(crate) fn new_unchecked(numer: BigInt, denom: BigInt) -> Rational {
        debug_assert!(!denom.is_zero());
        Rational { numer, denom }
    }

    /// Constructs the fraction `n / 1`.
    pub fn from_integer<N>(n: N) -> Rational
    where
        N: Into<BigInt>,
    {
        Rational::new_unchecked(n.into(), BigInt::one())
    }

    /// Constructs zero.
    pub fn zero() -> Rational {
        Rational::from_integer(0)
    }

    /// Returns the numerator as stored.
    pub fn numer(&self) -> &BigInt {
        &self.numer
    }

    /// Returns the denominator as stored. It may be negative unless the
    /// fraction has been simplified.
    pub fn denom(&self) -> &BigInt {
        &self.denom
    }

    /// Consumes the fraction, returning the numerator and denominator.
    pub fn into_parts(self) -> (BigInt, BigInt) {
        (self.numer, self.denom)
    }

    /// Reports whether the fraction is zero.
    pub fn is_zero(&self) -> bool {
        self.numer.is_zero()
    }

    /// Reports whether the fraction is less than zero.
    pub fn is_negative(&self) -> bool {
        !self.numer.is_zero() && self.numer.is_negative() != self.denom.is_negative()
    }

    /// Reduces the fraction to lowest terms with a positive denominator.
    pub fn simplify(&self) -> Rational {
        let mut g = self.numer.gcd(&self.denom);
        if g.is_zero() {
            g = BigInt::one();
        }
        if self.denom.is_negative() {
            g = -g;
        }
        Rational::new_unchecked(&self.numer / &g, &self.denom / &g)
    }

    /// Moves the sign onto the numerator without otherwise reducing.
    pub fn normalize_sign(&self) -> Rational {
        if self.denom.is_negative() {
            Rational::new_unchecked(-&self.numer, -&self.denom)
        } else {
            self.clone()
        }
    }

    /// Computes the absolute value.
    pub fn abs(&self) -> Rational {
        Rational::new_unchecked(self.numer.abs(), self.denom.abs())
    }

    /// Computes `1 / self`. Fails if the fraction is zero.
    pub fn recip(&self) -> Result<Rational, DivisionError> {
        Rational::new(self.denom.clone(), self.numer.clone())
    }

    /// Divides by `rhs` through cross-multiplication. The quotient is not
    /// simplified.
    ///
    /// Fails if `rhs` is zero.
    pub fn checked_div(&self, rhs: &Rational) -> Result<Rational, DivisionError> {
        if rhs.is_zero() {
            return Err(DivisionError::by_zero());
        }
        Ok(Rational::new_unchecked(
            &self.numer * &rhs.denom,
            &self.denom * &rhs.numer,
        ))
    }

    /// Renders the value in positional notation with at most `precision`
    /// fractional digits.
    ///
    /// Digits are produced by long division and truncated, not rounded.
    /// Trailing zeros, and a trailing decimal point, are dropped.
    ///
    /// ```
    /// use moneta::Rational;
    ///
    /// assert_eq!(Rational::new(1, 3)?.to_decimal_string(5), "0.33333");
    /// assert_eq!(Rational::new(-5, 2)?.to_decimal_string(5), "-2.5");
    /// assert_eq!(Rational::new(6, 3)?.to_decimal_string(5), "2");
    /// # Ok::<_, Box<dyn std::error::Error>>(())
    /// ```
    pub fn to_decimal_string(&self, precision: u32) -> String {
        let r = self.normalize_sign();
        let (int, mut rem) = r.numer.abs().div_rem(&r.denom);
        let mut frac = String::new();
        let ten = BigInt::from(10);
        for _ in 0..precision {
            if rem.is_zero() {
                break;
            }
            rem *= &ten;
            let (digit, next) = rem.div_rem(&r.denom);
            frac.push_str(&digit.to_string());
            rem = next;
        }
        let frac = frac.trim_end_matches('0');
        let mut out = String::new();
        if r.numer.is_negative() && !(int.is_zero() && frac.is_empty()) {
            out.push('-');
        }
        out.push_str(&int.to_string());
        if !frac.is_empty() {
            out.push('.');
            out.push_str(frac);
        }
        out
    }
}

impl Default for Rational {
    fn default() -> Rational {
        Rational::zero()
    }
}

impl fmt::Debug for Rational {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.numer, self.denom)
    }
}

impl PartialEq for Rational {
    fn eq(&self, other: &Rational) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Rational {}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Rational) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rational {
    fn cmp(&self, other: &Rational) -> Ordering {
        // With positive denominators, a/b < c/d iff ad < cb.
        let lhs = self.normalize_sign();
        let rhs = other.normalize_sign();
        (&lhs.numer * &rhs.denom).cmp(&(&rhs.numer * &lhs.denom))
    }
}

impl Hash for Rational {
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        let r = self.simplify();
        r.numer.hash(state);
        r.denom.hash(state);
    }
}

impl Neg for Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        Rational::new_unchecked(-self.numer, self.denom)
    }
}

impl<'a> Neg for &'a Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        Rational::new_unchecked(-&self.numer, self.denom.clone())
    }
}

impl<'a> Add<&'a Rational> for &'a Rational {
    type Output = Rational;

    fn add(self, rhs: &'a Rational) -> Rational {
        Rational::new_unchecked(
            &self.numer * &rhs.denom + &rhs.numer * &self.denom,
            &self.denom * &rhs.denom,
        )
        .simplify()
    }
}

impl Add<Rational> for Rational {
    type Output = Rational;

    fn add(self, rhs: Rational) -> Rational {
        &self + &rhs
    }
}

impl<'a> Sub<&'a Rational> for &'a Rational {
    type Output = Rational;

    fn sub(self, rhs: &'a Rational) -> Rational {
        Rational::new_unchecked(
            &self.numer * &rhs.denom - &rhs.numer * &self.denom,
            &self.denom * &rhs.denom,
        )
        .simplify()
    }
}

impl Sub<Rational> for Rational {
    type Output = Rational;

    fn sub(self, rhs: Rational) -> Rational {
        &self - &rhs
    }
}

impl<'a> Mul<&'a Rational> for &'a Rational {
    type Output = Rational;

    fn mul(self, rhs: &'a Rational) -> Rational {
        Rational::new_unchecked(&self.numer * &rhs.numer, &self.denom * &rhs.denom)
    }
}

impl Mul<Rational> for Rational {
    type Output = Rational;

    fn mul(self, rhs: Rational) -> Rational {
        &self * &rhs
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Rational {
                fn from(n: $t) -> Rational {
                    Rational::from_integer(n)
                }
            }
        )*
    };
}

impl_from_int!(i32, i64, i128, u32, u64, u128);

impl From<BigInt> for Rational {
    fn from(n: BigInt) -> Rational {
        Rational::from_integer(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(p: i64, q: i64) -> Rational {
        Rational::new(p, q).unwrap()
    }

    #[test]
    fn test_simplify_sign() {
        let s = r(6, -4).simplify();
        assert_eq!(s.numer(), &BigInt::from(-3));
        assert_eq!(s.denom(), &BigInt::from(2));
        let z = r(0, -7).simplify();
        assert_eq!(z.numer(), &BigInt::from(0));
        assert_eq!(z.denom(), &BigInt::from(1));
    }

    #[test]
    fn test_arithmetic_simplification() {
        // Addition and subtraction simplify.
        let sum = &r(1, 6) + &r(1, 3);
        assert_eq!(sum.to_string(), "1/2");
        let diff = &r(3, 4) - &r(1, 4);
        assert_eq!(diff.to_string(), "1/2");
        // Multiplication and division do not.
        let prod = &r(2, 3) * &r(3, 4);
        assert_eq!(prod.to_string(), "6/12");
        let quot = r(1, 2).checked_div(&r(1, 4)).unwrap();
        assert_eq!(quot.to_string(), "4/2");
    }

    #[test]
    fn test_ordering_with_negative_denominators() {
        assert!(r(1, -2) < r(1, 3));
        assert!(r(-1, -2) > r(1, 3));
        assert_eq!(r(2, 4), r(-1, -2));
    }

    #[test]
    fn test_to_decimal_string() {
        assert_eq!(r(1, 8).to_decimal_string(50), "0.125");
        assert_eq!(r(-1, 3).to_decimal_string(3), "-0.333");
        assert_eq!(r(1, -1000).to_decimal_string(2), "0");
        assert_eq!(r(10, 4).to_decimal_string(0), "2");
    }

    #[test]
    fn test_zero_denominator() {
        assert!(Rational::new(1, 0).is_err());
        assert!(r(0, 1).recip().is_err());
        assert!(r(1, 1).checked_div(&r(0, 5)).is_err());
    }
}

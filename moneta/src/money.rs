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
use std::ops::Neg;
use std::str::FromStr;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed};

use crate::context::{Context, RoundingMode};
use crate::conv::{self, pow10};
use crate::currency::{Currencies, Currency, CurrencyLookup};
use crate::error::{CurrencyMismatchError, Error, InvalidInputError, ParseMoneyError};
use crate::parse::MoneyParser;
use crate::rational::{Rational, DEFAULT_STRING_PRECISION};
use crate::scaled::{DecimalString, ScaledDecimal};

/// The numeric part of a [`Money`] value.
///
/// Amounts stay in [`ScaledDecimal`] form as long as every operation is
/// exactly representable in base 10, which covers addition, subtraction and
/// multiplication. Conversion through an exchange rate generally is not, so
/// it produces a [`Rational`] that remains exact until a decimal is asked
/// for.
#[derive(Clone)]
pub enum Amount {
    /// A fixed-point decimal.
    Scaled(ScaledDecimal),
    /// An exact fraction.
    Rational(Rational),
}

impl Amount {
    /// Promotes the amount to a fraction.
    pub fn to_rational(&self) -> Rational {
        match self {
            Amount::Scaled(d) => Rational::from(d),
            Amount::Rational(r) => r.clone(),
        }
    }

    /// Reports whether the amount is zero.
    pub fn is_zero(&self) -> bool {
        match self {
            Amount::Scaled(d) => d.is_zero(),
            Amount::Rational(r) => r.is_zero(),
        }
    }

    /// Reports whether the amount is less than zero.
    pub fn is_negative(&self) -> bool {
        match self {
            Amount::Scaled(d) => d.is_negative(),
            Amount::Rational(r) => r.is_negative(),
        }
    }
}

impl fmt::Debug for Amount {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Amount::Scaled(d) => write!(f, "Scaled({})", d),
            Amount::Rational(r) => write!(f, "Rational({})", r),
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Amount::Scaled(d) => d.fmt(f),
            Amount::Rational(r) => f.write_str(&r.to_decimal_string(DEFAULT_STRING_PRECISION)),
        }
    }
}

impl PartialEq for Amount {
    fn eq(&self, other: &Amount) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Amount {}

impl PartialOrd for Amount {
    fn partial_cmp(&self, other: &Amount) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Amount {
    fn cmp(&self, other: &Amount) -> Ordering {
        match (self, other) {
            (Amount::Scaled(a), Amount::Scaled(b)) => a.cmp(b),
            _ => self.to_rational().cmp(&other.to_rational()),
        }
    }
}

impl Neg for Amount {
    type Output = Amount;

    fn neg(self) -> Amount {
        match self {
            Amount::Scaled(d) => Amount::Scaled(-d),
            Amount::Rational(r) => Amount::Rational(-r),
        }
    }
}

impl From<ScaledDecimal> for Amount {
    fn from(d: ScaledDecimal) -> Amount {
        Amount::Scaled(d)
    }
}

impl From<Rational> for Amount {
    fn from(r: Rational) -> Amount {
        Amount::Rational(r)
    }
}

/// Options for [`Money::allocate`] and [`Money::distribute`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct AllocateOptions {
    /// Whether digits beyond the currency's canonical scale take part in
    /// the allocation.
    ///
    /// When false, an amount finer than the canonical scale is first
    /// [concretized](Money::concretize), the canonical part is allocated,
    /// and the change is returned as an extra trailing share.
    pub distribute_fractional_units: bool,
}

impl Default for AllocateOptions {
    fn default() -> AllocateOptions {
        AllocateOptions {
            distribute_fractional_units: true,
        }
    }
}

/// An amount of money in a particular currency.
///
/// `Money` is immutable; every operation returns a new value. Operations
/// that combine two values check that their currencies agree and fail with
/// [`CurrencyMismatchError`] otherwise.
///
/// ```
/// use moneta::{AllocateOptions, Money};
///
/// let total: Money = "$100.01".parse()?;
/// let shares = total.allocate(&[1, 1, 1], AllocateOptions::default())?;
/// let shares: Vec<String> = shares.iter().map(|m| m.to_string()).collect();
/// assert_eq!(shares, ["USD 33.34", "USD 33.34", "USD 33.33"]);
/// # Ok::<_, Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone)]
pub struct Money {
    currency: Currency,
    amount: Amount,
}

impl Money {
    /// Constructs money from a decimal amount.
    pub fn new(currency: Currency, amount: ScaledDecimal) -> Money {
        Money {
            currency,
            amount: Amount::Scaled(amount),
        }
    }

    /// Constructs money from an exact fraction.
    pub fn from_rational(currency: Currency, amount: Rational) -> Money {
        Money {
            currency,
            amount: Amount::Rational(amount),
        }
    }

    /// Constructs money from either representation.
    pub fn from_amount(currency: Currency, amount: Amount) -> Money {
        Money { currency, amount }
    }

    /// Constructs zero at the currency's canonical scale.
    pub fn zero(currency: Currency) -> Money {
        Money::new(currency, ScaledDecimal::new(0, currency.scale()))
    }

    /// Constructs money from a count of the currency's minor units, e.g.
    /// cents.
    pub fn from_minor_units(currency: Currency, units: i64) -> Money {
        Money::new(
            currency,
            ScaledDecimal::from_minor_units(units, currency.scale()),
        )
    }

    /// Constructs money from a currency code and a plain decimal string,
    /// resolving the code through the builtin currency table.
    pub fn from_parts(code: &str, amount: &str) -> Result<Money, Error> {
        let currency = Currencies::builtin()
            .lookup(code)
            .ok_or_else(|| InvalidInputError::new(format!("unknown currency code {:?}", code)))?;
        Ok(Money::new(currency, amount.parse()?))
    }

    /// Parses free-form monetary text using the builtin currency table.
    ///
    /// See [`MoneyParser`] for the accepted forms.
    pub fn parse(s: &str) -> Result<Money, ParseMoneyError> {
        MoneyParser::new(Currencies::builtin()).parse(s)
    }

    /// Parses free-form monetary text using the given currency table.
    pub fn parse_with<L>(s: &str, currencies: &L) -> Result<Money, ParseMoneyError>
    where
        L: CurrencyLookup + ?Sized,
    {
        MoneyParser::new(currencies).parse(s)
    }

    /// Returns the currency.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns the amount.
    pub fn amount(&self) -> &Amount {
        &self.amount
    }

    /// Returns the amount as a fraction.
    pub fn to_rational(&self) -> Rational {
        self.amount.to_rational()
    }

    /// Returns the amount as a decimal, converting a fractional amount with
    /// the default [`Context`].
    pub fn balance(&self) -> ScaledDecimal {
        self.balance_with(&Context::default())
    }

    /// Returns the amount as a decimal.
    ///
    /// A fractional amount is converted exactly when its denominator allows
    /// it, and otherwise rounded within the budget of `cx`.
    pub fn balance_with(&self, cx: &Context) -> ScaledDecimal {
        match &self.amount {
            Amount::Scaled(d) => d.clone(),
            Amount::Rational(r) => match r.to_scaled() {
                Ok(d) => d,
                Err(e) => {
                    log::debug!(
                        "balance of {} {} falls back to lossy conversion: {}",
                        self.currency,
                        r,
                        e
                    );
                    r.to_scaled_lossy(cx)
                }
            },
        }
    }

    /// Reports whether the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Reports whether the amount is less than zero.
    pub fn is_negative(&self) -> bool {
        self.amount.is_negative()
    }

    /// Computes the absolute value.
    pub fn abs(&self) -> Money {
        let amount = match &self.amount {
            Amount::Scaled(d) => Amount::Scaled(d.abs()),
            Amount::Rational(r) => Amount::Rational(r.abs()),
        };
        Money::from_amount(self.currency, amount)
    }

    fn check_currency(
        &self,
        other: &Money,
        operation: &'static str,
    ) -> Result<(), CurrencyMismatchError> {
        if self.currency == other.currency {
            Ok(())
        } else {
            Err(CurrencyMismatchError::new(
                self.currency.to_string(),
                other.currency.to_string(),
                operation,
            ))
        }
    }

    /// Adds `other`, which must be in the same currency.
    ///
    /// Two decimal amounts are added as decimals; if either side is a
    /// fraction, both are promoted and the sum is a fraction.
    pub fn add(&self, other: &Money) -> Result<Money, CurrencyMismatchError> {
        self.check_currency(other, "add")?;
        let amount = match (&self.amount, &other.amount) {
            (Amount::Scaled(a), Amount::Scaled(b)) => Amount::Scaled(a + b),
            (a, b) => Amount::Rational(&a.to_rational() + &b.to_rational()),
        };
        Ok(Money::from_amount(self.currency, amount))
    }

    /// Subtracts `other`, which must be in the same currency.
    pub fn subtract(&self, other: &Money) -> Result<Money, CurrencyMismatchError> {
        self.check_currency(other, "subtract")?;
        let amount = match (&self.amount, &other.amount) {
            (Amount::Scaled(a), Amount::Scaled(b)) => Amount::Scaled(a - b),
            (a, b) => Amount::Rational(&a.to_rational() - &b.to_rational()),
        };
        Ok(Money::from_amount(self.currency, amount))
    }

    /// Compares with `other`, which must be in the same currency.
    pub fn compare(&self, other: &Money) -> Result<Ordering, CurrencyMismatchError> {
        self.check_currency(other, "compare")?;
        Ok(self.amount.cmp(&other.amount))
    }

    /// Reports whether `other` holds the same value, failing if it is in a
    /// different currency.
    pub fn equals(&self, other: &Money) -> Result<bool, CurrencyMismatchError> {
        Ok(self.compare(other)? == Ordering::Equal)
    }

    /// Multiplies by a decimal factor.
    ///
    /// A decimal amount is multiplied with the truncating
    /// [`ScaledDecimal`] multiplication, so the product keeps the larger of
    /// the two scales. A fractional amount stays exact.
    pub fn multiply(&self, factor: &ScaledDecimal) -> Money {
        let amount = match &self.amount {
            Amount::Scaled(d) => Amount::Scaled(d * factor),
            Amount::Rational(r) => Amount::Rational(r * &Rational::from(factor)),
        };
        Money::from_amount(self.currency, amount)
    }

    /// Multiplies by an exact fraction. The product is always a fraction.
    pub fn multiply_rational(&self, factor: &Rational) -> Money {
        Money::from_rational(self.currency, &self.to_rational() * factor)
    }

    /// Splits the amount into a part at the currency's canonical scale and
    /// the change left over.
    ///
    /// The concrete part is truncated towards zero, so the change has the
    /// same sign as the original and `concrete + change == self` exactly.
    /// Decimal change keeps the original scale; the change of a fractional
    /// amount is itself a fraction. An amount already at or below the
    /// canonical scale is returned unchanged with zero change.
    pub fn concretize(&self) -> (Money, Money) {
        let scale = self.currency.scale();
        match &self.amount {
            Amount::Scaled(d) if d.scale() <= scale => (self.clone(), Money::zero(self.currency)),
            Amount::Scaled(d) => {
                let concrete = ScaledDecimal::new(d.value() / pow10(d.scale() - scale), scale);
                let change = d - &concrete;
                (
                    Money::new(self.currency, concrete),
                    Money::new(self.currency, change),
                )
            }
            Amount::Rational(r) => {
                let value = conv::round_div(
                    &(r.numer() * pow10(scale)),
                    r.denom(),
                    RoundingMode::Trunc,
                );
                let concrete = ScaledDecimal::new(value, scale);
                let change = r - &Rational::from(&concrete);
                (
                    Money::new(self.currency, concrete),
                    Money::from_rational(self.currency, change),
                )
            }
        }
    }

    /// Splits the amount in proportion to `ratios` without losing or
    /// creating a single unit.
    ///
    /// Each share first receives the floor of its exact proportional part,
    /// counted in units of the amount's scale. The units left over are then
    /// handed out one at a time to the shares with the largest fractional
    /// remainders, earlier shares winning ties. The shares therefore sum to
    /// the original amount exactly, and no share is a full unit away from
    /// its ideal proportion. A negative amount is split by magnitude and
    /// every share negated.
    ///
    /// Fractional amounts are concretized first. Their change, like the
    /// change set aside when `distribute_fractional_units` is false, is
    /// appended as a final share if it is not zero.
    ///
    /// Fails if `ratios` is empty, if any ratio is negative, or if the
    /// ratios sum to zero.
    pub fn allocate<R>(
        &self,
        ratios: &[R],
        options: AllocateOptions,
    ) -> Result<Vec<Money>, InvalidInputError>
    where
        R: Clone + Into<Rational>,
    {
        let ratios: Vec<Rational> = ratios.iter().cloned().map(Into::into).collect();
        if ratios.is_empty() {
            return Err(InvalidInputError::new("allocation ratios are empty"));
        }
        if let Some(r) = ratios.iter().find(|r| r.is_negative()) {
            return Err(InvalidInputError::new(format!(
                "allocation ratio {} is negative",
                r
            )));
        }
        if ratios.iter().all(|r| r.is_zero()) {
            return Err(InvalidInputError::new("allocation ratios sum to zero"));
        }

        let (working, change) = match &self.amount {
            Amount::Scaled(d)
                if options.distribute_fractional_units || d.scale() <= self.currency.scale() =>
            {
                (d.clone(), None)
            }
            _ => {
                let (concrete, change) = self.concretize();
                log::debug!(
                    "allocating {} and setting aside change of {}",
                    concrete,
                    change
                );
                (concrete.balance(), Some(change))
            }
        };

        let weights = integer_weights(&ratios);
        let units = largest_remainder(working.value(), &weights);
        let mut shares: Vec<Money> = units
            .into_iter()
            .map(|v| Money::new(self.currency, ScaledDecimal::new(v, working.scale())))
            .collect();
        if let Some(change) = change {
            if !change.is_zero() {
                shares.push(change);
            }
        }
        Ok(shares)
    }

    /// Splits the amount into `n` equal shares, as [`Money::allocate`] with
    /// `n` equal ratios.
    pub fn distribute(
        &self,
        n: usize,
        options: AllocateOptions,
    ) -> Result<Vec<Money>, InvalidInputError> {
        if n == 0 {
            return Err(InvalidInputError::new("cannot distribute into zero shares"));
        }
        let ratios = vec![1; n];
        self.allocate(&ratios[..], options)
    }

    /// Converts to the other currency of `rate`.
    ///
    /// The result is always an exact fraction: no decimal division takes
    /// place. Fails if neither side of the rate is in this money's
    /// currency.
    ///
    /// ```
    /// use moneta::{ExchangeRate, Money, Rational};
    ///
    /// let rate = ExchangeRate::new("$300".parse()?, "1 BTC".parse()?)?;
    /// let btc = "$100".parse::<Money>()?.convert(&rate)?;
    /// assert_eq!(btc.currency().code(), "BTC");
    /// assert_eq!(btc.to_rational(), Rational::new(1, 3)?);
    /// # Ok::<_, Box<dyn std::error::Error>>(())
    /// ```
    pub fn convert(&self, rate: &ExchangeRate) -> Result<Money, CurrencyMismatchError> {
        let (matching, other) = if self.currency == rate.from.currency {
            (&rate.from, &rate.to)
        } else if self.currency == rate.to.currency {
            (&rate.to, &rate.from)
        } else {
            return Err(CurrencyMismatchError::new(
                self.currency.to_string(),
                format!("{}/{}", rate.from.currency, rate.to.currency),
                "convert",
            ));
        };
        let this = self.to_rational();
        let from = matching.to_rational();
        let to = other.to_rational();
        // ExchangeRate::new guarantees a non-zero numerator on both sides.
        let p = this.numer() * to.numer() * from.denom();
        let q = this.denom() * to.denom() * from.numer();
        Ok(Money::from_rational(
            other.currency,
            Rational::new_unchecked(p, q).simplify(),
        ))
    }

    /// Renders the amount as an exact decimal string for display.
    ///
    /// The amount is only rounded, with `mode`, if `max_decimals` requests
    /// fewer digits than it has. A fraction that does not terminate in base
    /// 10 cannot be rendered exactly; without `max_decimals` it is rounded to
    /// the default [`Context`] precision.
    pub fn decimal_string(&self, max_decimals: Option<u32>, mode: RoundingMode) -> DecimalString {
        let exact = match &self.amount {
            Amount::Scaled(d) => Some(d.clone()),
            Amount::Rational(r) => r.to_scaled().ok(),
        };
        let d = match (exact, max_decimals) {
            (Some(d), Some(max)) if d.scale() > max => d.rescale(max, mode),
            (Some(d), _) => d,
            (None, Some(max)) => {
                let r = self.to_rational();
                let value = conv::round_div(&(r.numer() * pow10(max)), r.denom(), mode);
                ScaledDecimal::new(value, max)
            }
            (None, None) => {
                let mut cx = Context::default();
                cx.set_rounding(mode);
                self.to_rational().to_scaled_lossy(&cx)
            }
        };
        d.to_decimal_string()
    }
}

/// Converts ratios to integer weights with the same proportions.
fn integer_weights(ratios: &[Rational]) -> Vec<BigInt> {
    let ratios: Vec<Rational> = ratios.iter().map(Rational::simplify).collect();
    let lcm = ratios
        .iter()
        .fold(BigInt::one(), |acc, r| acc.lcm(r.denom()));
    ratios
        .iter()
        .map(|r| r.numer() * (&lcm / r.denom()))
        .collect()
}

/// Apportions `total` units by `weights` with the largest-remainder method.
fn largest_remainder(total: &BigInt, weights: &[BigInt]) -> Vec<BigInt> {
    let negative = total.is_negative();
    let total = total.abs();
    let sum: BigInt = weights.iter().sum();
    let mut shares = Vec::with_capacity(weights.len());
    let mut remainders = Vec::with_capacity(weights.len());
    for w in weights {
        let (share, remainder) = (&total * w).div_rem(&sum);
        shares.push(share);
        remainders.push(remainder);
    }
    let allocated: BigInt = shares.iter().sum();
    let mut leftover = &total - allocated;
    let mut order: Vec<usize> = (0..weights.len()).collect();
    // Stable, so ties keep their original order.
    order.sort_by(|a, b| remainders[*b].cmp(&remainders[*a]));
    for i in order {
        if !leftover.is_positive() {
            break;
        }
        shares[i] += BigInt::one();
        leftover -= BigInt::one();
    }
    if negative {
        for share in &mut shares {
            *share = -&*share;
        }
    }
    shares
}

impl fmt::Debug for Money {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Money({} {:?})", self.currency, self.amount)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.currency, self.amount)
    }
}

impl PartialEq for Money {
    fn eq(&self, other: &Money) -> bool {
        self.currency == other.currency && self.amount == other.amount
    }
}

impl Eq for Money {}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money::from_amount(self.currency, -self.amount)
    }
}

impl<'a> Neg for &'a Money {
    type Output = Money;

    fn neg(self) -> Money {
        -self.clone()
    }
}

impl FromStr for Money {
    type Err = ParseMoneyError;

    fn from_str(s: &str) -> Result<Money, ParseMoneyError> {
        Money::parse(s)
    }
}

/// A quotation stating that [`from`](ExchangeRate::from) is worth
/// [`to`](ExchangeRate::to).
///
/// A rate can be applied in either direction by [`Money::convert`].
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ExchangeRate {
    from: Money,
    to: Money,
}

impl ExchangeRate {
    /// Constructs a rate. The two sides must be in different currencies and
    /// neither may be zero.
    pub fn new(from: Money, to: Money) -> Result<ExchangeRate, InvalidInputError> {
        if from.currency == to.currency {
            return Err(InvalidInputError::new(format!(
                "exchange rate quotes {} against itself",
                from.currency
            )));
        }
        if from.is_zero() || to.is_zero() {
            return Err(InvalidInputError::new(format!(
                "exchange rate {} : {} has a zero side",
                from, to
            )));
        }
        Ok(ExchangeRate { from, to })
    }

    /// The quoted amount.
    pub fn from(&self) -> &Money {
        &self.from
    }

    /// What the quoted amount is worth.
    pub fn to(&self) -> &Money {
        &self.to
    }
}

impl fmt::Display for ExchangeRate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} : {}", self.from, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units(total: i64, weights: &[i64]) -> Vec<i64> {
        let weights: Vec<BigInt> = weights.iter().map(|w| BigInt::from(*w)).collect();
        largest_remainder(&BigInt::from(total), &weights)
            .into_iter()
            .map(|v| i64::try_from(v).unwrap())
            .collect()
    }

    #[test]
    fn test_largest_remainder() {
        assert_eq!(units(10001, &[1, 1, 1]), vec![3334, 3334, 3333]);
        assert_eq!(units(-10001, &[1, 1, 1]), vec![-3334, -3334, -3333]);
        assert_eq!(units(100, &[0, 1, 0]), vec![0, 100, 0]);
        assert_eq!(units(5, &[3, 7]), vec![2, 3]);
        assert_eq!(units(0, &[1, 2]), vec![0, 0]);
    }

    #[test]
    fn test_integer_weights() {
        let ratios = vec![
            Rational::new(1, 2).unwrap(),
            Rational::new(1, 3).unwrap(),
            Rational::new(2, 12).unwrap(),
        ];
        let weights: Vec<BigInt> = integer_weights(&ratios);
        let want: Vec<BigInt> = vec![3, 2, 1].into_iter().map(BigInt::from).collect();
        assert_eq!(weights, want);
    }
}

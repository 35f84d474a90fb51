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
use std::error::Error;
use std::hash::{Hash, Hasher};

use num_bigint::BigInt;

use moneta::currency::{BRL, BTC, CNY, DKK, ETH, EUR, GBP, JPY, KRW, SEK, USD, ZAR};
use moneta::{
    max_precision_from_bits, money, round_ratio, scaled, AllocateOptions, Amount, Context,
    Currencies, Currency, DivisionErrorCode, ExchangeRate, Money, PrecisionBudget, PrecisionLossCode,
    Rational, RoundingMode, ScaledDecimal,
};

#[derive(Default)]
struct ValidatingHasher {
    bytes: Vec<u8>,
}

impl Hasher for ValidatingHasher {
    fn write(&mut self, bytes: &[u8]) {
        self.bytes.extend(bytes)
    }

    fn finish(&self) -> u64 {
        unimplemented!()
    }
}

fn hash_data<H>(h: H) -> Vec<u8>
where
    H: Hash,
{
    let mut hasher = ValidatingHasher::default();
    h.hash(&mut hasher);
    hasher.bytes
}

fn strings(shares: &[Money]) -> Vec<String> {
    shares.iter().map(|m| m.amount().to_string()).collect()
}

fn sum(shares: &[Money]) -> Result<Money, Box<dyn Error>> {
    let mut total = Money::zero(shares[0].currency());
    for share in shares {
        total = total.add(share)?;
    }
    Ok(total)
}

const ORDERING_TESTS: &[(&str, &str, Ordering)] = &[
    ("1.2", "1.2", Ordering::Equal),
    ("1.2", "1.200", Ordering::Equal),
    ("1", "2", Ordering::Less),
    ("2", "1", Ordering::Greater),
    ("-0", "0", Ordering::Equal),
    ("-1.5", "-1.49", Ordering::Less),
    ("0.001", "0.0009", Ordering::Greater),
    ("100", "1e2", Ordering::Equal),
    ("-0.10", "-0.1", Ordering::Equal),
];

#[test]
fn test_scaled_ordering() -> Result<(), Box<dyn Error>> {
    for (lhs, rhs, expected) in ORDERING_TESTS {
        println!("cmp({}, {}): expected {:?}", lhs, rhs, expected);
        let lhs: ScaledDecimal = lhs.parse()?;
        let rhs: ScaledDecimal = rhs.parse()?;
        assert_eq!(lhs.cmp(&rhs), *expected);

        if lhs == rhs && hash_data(&lhs) != hash_data(&rhs) {
            panic!("{} and {} are equal but hashes are not equal", lhs, rhs);
        } else if lhs != rhs && hash_data(&lhs) == hash_data(&rhs) {
            panic!("{} and {} are not equal but hashes are equal", lhs, rhs);
        }
    }
    Ok(())
}

#[test]
fn test_scaled_parse_display() -> Result<(), Box<dyn Error>> {
    const TESTS: &[(&str, Option<&str>)] = &[
        ("100.50", Some("100.50")),
        ("-0.001", Some("-0.001")),
        ("+7", Some("7")),
        ("-0", Some("0")),
        ("1.23e-5", Some("0.0000123")),
        ("1.5E+3", Some("1500")),
        ("12e2", Some("1200")),
        ("1.20e1", Some("12.0")),
        (".5", Some("0.5")),
        ("", None),
        ("-", None),
        ("abc", None),
        ("1.2.3", None),
        ("1,000", None),
        ("1e99999", None),
        ("0x10", None),
    ];
    for (input, expected) in TESTS {
        println!("parse({:?}): expected {:?}", input, expected);
        let actual = input.parse::<ScaledDecimal>().ok().map(|d| d.to_string());
        assert_eq!(actual.as_deref(), *expected);
    }
    Ok(())
}

#[test]
fn test_scaled_add_sub() -> Result<(), Box<dyn Error>> {
    const TESTS: &[(&str, &str, &str, &str)] = &[
        ("1.5", "0.25", "1.75", "1.25"),
        ("100", "0.01", "100.01", "99.99"),
        ("-1.10", "1.1", "0.00", "-2.20"),
        ("0.000", "5", "5.000", "-5.000"),
    ];
    for (a, b, sum, diff) in TESTS {
        println!("{} +/- {}: expected {} / {}", a, b, sum, diff);
        let a: ScaledDecimal = a.parse()?;
        let b: ScaledDecimal = b.parse()?;
        assert_eq!((&a + &b).to_string(), *sum);
        assert_eq!((&a - &b).to_string(), *diff);
        assert_eq!(&(&a + &b) - &b, a);
    }
    Ok(())
}

#[test]
fn test_scaled_multiply_truncates() -> Result<(), Box<dyn Error>> {
    // (lhs, rhs, truncated product, exact product)
    const TESTS: &[(&str, &str, &str, &str)] = &[
        ("1.5", "1.5", "2.2", "2.25"),
        ("-1.5", "1.5", "-2.2", "-2.25"),
        ("2", "0.333", "0.666", "0.666"),
        ("1.25", "0.5", "0.62", "0.625"),
        ("10", "3", "30", "30"),
    ];
    for (a, b, truncated, exact) in TESTS {
        println!("{} * {}: expected {} (exact {})", a, b, truncated, exact);
        let a: ScaledDecimal = a.parse()?;
        let b: ScaledDecimal = b.parse()?;
        assert_eq!((&a * &b).to_string(), *truncated);
        assert_eq!(a.multiply_exact(&b).to_string(), *exact);
    }
    Ok(())
}

#[test]
fn test_scaled_divide_by_integer() -> Result<(), Box<dyn Error>> {
    const TESTS: &[(&str, i64, Result<&str, DivisionErrorCode>)] = &[
        ("100", 4, Ok("25.00")),
        ("100", 3, Err(DivisionErrorCode::RequiresRounding)),
        ("100", 0, Err(DivisionErrorCode::DivisionByZero)),
        ("1", -8, Ok("-0.125")),
        ("1.5", 2, Ok("0.75")),
        ("7", 20, Ok("0.350")),
        ("10", 6, Err(DivisionErrorCode::RequiresRounding)),
    ];
    for (a, n, expected) in TESTS {
        println!("{} / {}: expected {:?}", a, n, expected);
        let a: ScaledDecimal = a.parse()?;
        let actual = a.divide_by_integer(*n).map(|d| d.to_string());
        assert_eq!(actual.as_deref().map_err(|e| e.code()), *expected);
    }

    let quarter = ScaledDecimal::new(100, 0).divide_by_integer(4)?;
    assert_eq!(quarter.value(), &BigInt::from(2500));
    assert_eq!(quarter.scale(), 2);
    Ok(())
}

#[test]
fn test_scaled_divide() -> Result<(), Box<dyn Error>> {
    const TESTS: &[(&str, &str, Result<&str, DivisionErrorCode>)] = &[
        ("1", "0.25", Ok("4.00")),
        ("1.5", "0.5", Ok("3.00")),
        ("10", "0.3", Err(DivisionErrorCode::InvalidDivisor)),
        ("3", "0.00", Err(DivisionErrorCode::DivisionByZero)),
    ];
    for (a, b, expected) in TESTS {
        println!("{} / {}: expected {:?}", a, b, expected);
        let a: ScaledDecimal = a.parse()?;
        let b: ScaledDecimal = b.parse()?;
        let actual = a.divide(&b).map(|d| d.to_string());
        assert_eq!(actual.as_deref().map_err(|e| e.code()), *expected);
    }
    Ok(())
}

#[test]
fn test_scaled_normalize() -> Result<(), Box<dyn Error>> {
    const TESTS: &[(&str, u32, bool, Option<&str>)] = &[
        ("1.23", 4, false, Some("1.2300")),
        ("1.2300", 2, false, Some("1.23")),
        ("1.235", 2, false, None),
        ("1.235", 2, true, Some("1.23")),
        ("-1.235", 2, true, Some("-1.23")),
        ("5", 0, false, Some("5")),
    ];
    for (input, target, lossy, expected) in TESTS {
        println!("normalize({}, {}, {}): expected {:?}", input, target, lossy, expected);
        let d: ScaledDecimal = input.parse()?;
        match (d.normalize(*target, *lossy), expected) {
            (Ok(actual), Some(expected)) => {
                assert_eq!(actual.to_string(), *expected);
                assert_eq!(actual.scale(), *target);
            }
            (Err(e), None) => assert_eq!(e.code(), PrecisionLossCode::ScaleReduction),
            (actual, expected) => panic!("got {:?}, expected {:?}", actual, expected),
        }
    }
    Ok(())
}

#[test]
fn test_scaled_rescale() -> Result<(), Box<dyn Error>> {
    const TESTS: &[(&str, u32, RoundingMode, &str)] = &[
        ("1.25", 1, RoundingMode::HalfEven, "1.2"),
        ("1.35", 1, RoundingMode::HalfEven, "1.4"),
        ("-1.25", 1, RoundingMode::HalfExpand, "-1.3"),
        ("-1.25", 1, RoundingMode::HalfTrunc, "-1.2"),
        ("1.21", 1, RoundingMode::Ceil, "1.3"),
        ("-1.29", 1, RoundingMode::Ceil, "-1.2"),
        ("-1.21", 1, RoundingMode::Floor, "-1.3"),
        ("5", 2, RoundingMode::Trunc, "5.00"),
    ];
    for (input, target, mode, expected) in TESTS {
        println!("rescale({}, {}, {}): expected {}", input, target, mode, expected);
        let d: ScaledDecimal = input.parse()?;
        assert_eq!(d.rescale(*target, *mode).to_string(), *expected);
    }
    Ok(())
}

#[test]
fn test_scaled_misc() -> Result<(), Box<dyn Error>> {
    let d = scaled!(-12.340);
    assert_eq!(d.scale(), 3);
    assert_eq!(d.abs().to_string(), "12.340");
    assert_eq!((-d.clone()).to_string(), "12.340");
    assert_eq!(d.reduce().to_string(), "-12.34");
    assert_eq!(d.signum(), -1);
    assert_eq!(ScaledDecimal::from_minor_units(1234, 2).to_string(), "12.34");
    assert_eq!(ScaledDecimal::from(7u64).to_string(), "7");

    let total: ScaledDecimal = ["0.1", "0.20", "0.003"]
        .iter()
        .map(|s| s.parse::<ScaledDecimal>())
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .sum();
    assert_eq!(total.to_string(), "0.303");

    let mut acc = scaled!(1);
    acc += scaled!(0.5);
    acc -= scaled!(2);
    assert_eq!(acc.to_string(), "-0.5");
    Ok(())
}

#[test]
fn test_round_ratio_tie_parity() -> Result<(), Box<dyn Error>> {
    let r = |n: i64, d: i64| round_ratio(&BigInt::from(n), &BigInt::from(d), RoundingMode::HalfEven);
    assert_eq!(r(5, 10)?, BigInt::from(0));
    assert_eq!(r(15, 10)?, BigInt::from(2));
    assert_eq!(r(-5, 10)?, BigInt::from(0));
    assert_eq!(r(-15, 10)?, BigInt::from(-2));
    assert!(r(1, 0).is_err());
    Ok(())
}

#[test]
fn test_rational_to_scaled() -> Result<(), Box<dyn Error>> {
    const TESTS: &[(i64, i64, Option<&str>)] = &[
        (1, 4, Some("0.25")),
        (1, 3, None),
        (3, -8, Some("-0.375")),
        (10, 4, Some("2.5")),
        (0, 7, Some("0")),
        (6, 3, Some("2")),
        (7, 12, None),
    ];
    for (p, q, expected) in TESTS {
        println!("to_scaled({}/{}): expected {:?}", p, q, expected);
        let r = Rational::new(*p, *q)?;
        match (r.to_scaled(), expected) {
            (Ok(d), Some(expected)) => assert_eq!(d.to_string(), *expected),
            (Err(e), None) => assert_eq!(e.code(), PrecisionLossCode::NotPowerOfTen),
            (actual, expected) => panic!("got {:?}, expected {:?}", actual, expected),
        }
    }

    let quarter = Rational::new(1, 4)?.to_scaled()?;
    assert_eq!(quarter.value(), &BigInt::from(25));
    assert_eq!(quarter.scale(), 2);
    Ok(())
}

#[test]
fn test_rational_to_scaled_lossy() -> Result<(), Box<dyn Error>> {
    const TESTS: &[(i64, i64, u32, RoundingMode, &str)] = &[
        (1, 3, 5, RoundingMode::HalfEven, "0.33333"),
        (2, 3, 5, RoundingMode::HalfEven, "0.66667"),
        (2, 3, 5, RoundingMode::Trunc, "0.66666"),
        (-2, 3, 5, RoundingMode::Floor, "-0.66667"),
        (200, 3, 4, RoundingMode::HalfEven, "66.67"),
        (1234567, 1, 3, RoundingMode::HalfEven, "1234567"),
        (1, 8, 2, RoundingMode::HalfEven, "0.12"),
        (1, 8, 2, RoundingMode::HalfCeil, "0.13"),
    ];
    for (p, q, precision, mode, expected) in TESTS {
        println!(
            "to_scaled_lossy({}/{}, {}, {}): expected {}",
            p, q, precision, mode, expected
        );
        let cx = Context::new(*mode, PrecisionBudget::Digits(*precision))?;
        let r = Rational::new(*p, *q)?;
        assert_eq!(r.to_scaled_lossy(&cx).to_string(), *expected);
        assert_eq!(cx.to_scaled(&r).to_string(), *expected);
    }

    let third = Rational::new(1, 3)?.to_scaled_lossy(&Context::default());
    assert_eq!(third.scale(), 50);
    assert_eq!(third.to_string(), format!("0.{}", "3".repeat(50)));
    Ok(())
}

#[test]
fn test_max_precision_from_bits() -> Result<(), Box<dyn Error>> {
    let third = Rational::new(1, 3)?;
    // 0.3333 needs 12 bits of coefficient and 3 bits of scale.
    assert_eq!(max_precision_from_bits(&third, 16, RoundingMode::HalfEven), 4);
    assert_eq!(max_precision_from_bits(&third, 15, RoundingMode::HalfEven), 4);
    assert_eq!(max_precision_from_bits(&third, 14, RoundingMode::HalfEven), 3);
    assert_eq!(max_precision_from_bits(&third, 2, RoundingMode::HalfEven), 1);
    assert_eq!(
        max_precision_from_bits(&third, 100_000, RoundingMode::HalfEven),
        moneta::MAX_BITS_PRECISION
    );

    let mut cx = Context::default();
    cx.set_max_bits(16)?;
    assert_eq!(third.to_scaled_lossy(&cx).to_string(), "0.3333");
    Ok(())
}

#[test]
fn test_rational_misc() -> Result<(), Box<dyn Error>> {
    assert!(Rational::new(1, 0).is_err());
    assert_eq!(Rational::new(2, 4)?, Rational::new(-1, -2)?);
    assert!(Rational::new(1, 3)? < Rational::from(ScaledDecimal::new(34, 2)));
    assert_eq!(Rational::new(2, 3)?.to_decimal_string(10), "0.6666666666");
    assert_eq!(Rational::new(-7, 2)?.round(RoundingMode::HalfEven), BigInt::from(-4));
    assert_eq!(Rational::new(3, -4)?.recip()?.to_string(), "-4/3");
    assert!(Rational::new(3, -4)?.is_negative());
    assert_eq!(Rational::new(6, -4)?.simplify().to_string(), "-3/2");
    assert_eq!((-Rational::new(1, 2)?).to_string(), "-1/2");
    assert_eq!(Rational::new(-1, 2)?.abs().to_string(), "1/2");
    Ok(())
}

#[test]
fn test_context_validation() -> Result<(), Box<dyn Error>> {
    assert!(Context::new(RoundingMode::HalfEven, PrecisionBudget::Digits(0)).is_err());
    assert!(Context::new(RoundingMode::HalfEven, PrecisionBudget::Digits(1001)).is_err());
    assert!(Context::new(RoundingMode::HalfEven, PrecisionBudget::Bits(1)).is_err());
    let mut cx = Context::default();
    assert_eq!(cx.rounding(), RoundingMode::HalfEven);
    assert_eq!(cx.budget(), PrecisionBudget::Digits(50));
    cx.set_precision(1000)?;
    assert!(cx.set_precision(0).is_err());
    assert_eq!(cx.budget(), PrecisionBudget::Digits(1000));

    for mode in RoundingMode::ALL {
        assert_eq!(mode.to_string().parse::<RoundingMode>()?, mode);
    }
    assert!("bankers".parse::<RoundingMode>().is_err());
    Ok(())
}

#[test]
fn test_money_arithmetic() -> Result<(), Box<dyn Error>> {
    let a: Money = "$19.99".parse()?;
    let b: Money = "$0.015".parse()?;
    let sum = a.add(&b)?;
    assert_eq!(sum.to_string(), "USD 20.005");
    assert!(sum.subtract(&b)?.equals(&a)?);
    assert_eq!(a.compare(&b)?, Ordering::Greater);

    let third = Money::from_rational(USD, Rational::new(1, 3)?);
    let mixed = a.add(&third)?;
    assert!(matches!(mixed.amount(), Amount::Rational(_)));
    assert_eq!(mixed.to_rational(), Rational::new(6097, 300)?);

    let euro: Money = "€1".parse()?;
    let err = a.add(&euro).unwrap_err();
    assert_eq!((err.left(), err.right(), err.operation()), ("USD", "EUR", "add"));
    assert_eq!(a.subtract(&euro).unwrap_err().operation(), "subtract");
    assert_eq!(a.compare(&euro).unwrap_err().operation(), "compare");

    assert_eq!(a.multiply(&scaled!(1.5)).to_string(), "USD 29.98");
    assert_eq!(
        Money::new(USD, scaled!(10.00)).multiply(&scaled!(1.5)).to_string(),
        "USD 15.00"
    );
    assert_eq!(
        Money::new(USD, scaled!(10)).multiply_rational(&Rational::new(1, 3)?),
        Money::from_rational(USD, Rational::new(10, 3)?)
    );
    assert_eq!((-a.clone()).to_string(), "USD -19.99");
    assert_eq!((-a.clone()).abs(), a);
    Ok(())
}

#[test]
fn test_money_constructors() -> Result<(), Box<dyn Error>> {
    assert_eq!(Money::from_minor_units(USD, 1234).to_string(), "USD 12.34");
    assert_eq!(Money::zero(JPY).to_string(), "JPY 0");
    assert_eq!(Money::zero(BTC).to_string(), "BTC 0.00000000");
    assert_eq!(Money::from_parts("usd", "1.50")?.to_string(), "USD 1.50");
    assert!(matches!(
        Money::from_parts("XXX", "1"),
        Err(moneta::Error::InvalidInput(_))
    ));
    assert!(matches!(
        Money::from_parts("USD", "one"),
        Err(moneta::Error::Decimal(_))
    ));
    assert_eq!(money!(USD 100.50).to_string(), "USD 100.50");
    assert_eq!(
        Money::from_rational(USD, Rational::new(1, 4)?).to_string(),
        "USD 0.25"
    );

    let loyalty = Currency::new("", "Loyalty Points", 0);
    let points = Money::new(loyalty, scaled!(10));
    assert_eq!(points.to_string(), "Loyalty Points 10");
    assert!(points.add(&Money::new(USD, scaled!(1))).is_err());
    Ok(())
}

#[test]
fn test_money_balance() -> Result<(), Box<dyn Error>> {
    let quarter = Money::from_rational(USD, Rational::new(1, 4)?);
    assert_eq!(quarter.balance().to_string(), "0.25");

    let third = Money::from_rational(USD, Rational::new(1, 3)?);
    assert_eq!(third.balance().scale(), 50);
    let cx = Context::new(RoundingMode::HalfEven, PrecisionBudget::Digits(4))?;
    assert_eq!(third.balance_with(&cx).to_string(), "0.3333");
    Ok(())
}

#[test]
fn test_money_concretize() -> Result<(), Box<dyn Error>> {
    const TESTS: &[(&str, &str, &str)] = &[
        ("1.23456", "1.23", "0.00456"),
        ("-1.23456", "-1.23", "-0.00456"),
        ("1.239", "1.23", "0.009"),
        ("1.23", "1.23", "0.00"),
        ("7", "7", "0.00"),
    ];
    for (input, concrete, change) in TESTS {
        println!("concretize({}): expected {} + {}", input, concrete, change);
        let money = Money::new(USD, input.parse()?);
        let (c, ch) = money.concretize();
        assert_eq!(c.amount().to_string(), *concrete);
        assert_eq!(ch.amount().to_string(), *change);
        assert!(c.add(&ch)?.equals(&money)?);
    }

    let third = Money::from_rational(USD, Rational::new(1, 3)?);
    let (c, ch) = third.concretize();
    assert_eq!(c.amount().to_string(), "0.33");
    assert_eq!(ch.to_rational(), Rational::new(1, 300)?);
    assert!(matches!(ch.amount(), Amount::Rational(_)));
    assert!(c.add(&ch)?.equals(&third)?);
    Ok(())
}

#[test]
fn test_money_allocate() -> Result<(), Box<dyn Error>> {
    const TESTS: &[(&str, &[i64], &[&str])] = &[
        ("100.01", &[1, 1, 1], &["33.34", "33.34", "33.33"]),
        ("-100.01", &[1, 1, 1], &["-33.34", "-33.34", "-33.33"]),
        ("100.00", &[1, 2, 3, 4], &["10.00", "20.00", "30.00", "40.00"]),
        ("0.05", &[1, 1], &["0.03", "0.02"]),
        ("0.05", &[0, 1], &["0.00", "0.05"]),
        ("1.00", &[70, 20, 10], &["0.70", "0.20", "0.10"]),
        ("0.10", &[1, 1, 1], &["0.04", "0.03", "0.03"]),
        ("10.005", &[1, 1], &["5.003", "5.002"]),
    ];
    for (amount, ratios, expected) in TESTS {
        println!("allocate({}, {:?}): expected {:?}", amount, ratios, expected);
        let money = Money::new(USD, amount.parse()?);
        let shares = money.allocate(*ratios, AllocateOptions::default())?;
        assert_eq!(strings(&shares), *expected);
        assert!(sum(&shares)?.equals(&money)?);
    }

    let mut sorted = strings(&Money::new(USD, scaled!(100.01)).distribute(3, AllocateOptions::default())?);
    sorted.sort();
    assert_eq!(sorted, ["33.33", "33.34", "33.34"]);
    Ok(())
}

#[test]
fn test_money_allocate_rational_ratios() -> Result<(), Box<dyn Error>> {
    let ratios = [
        Rational::new(1, 2)?,
        Rational::new(1, 3)?,
        Rational::new(1, 6)?,
    ];
    let money = Money::new(USD, scaled!(1.00));
    let shares = money.allocate(&ratios, AllocateOptions::default())?;
    assert_eq!(strings(&shares), ["0.50", "0.33", "0.17"]);
    Ok(())
}

#[test]
fn test_money_allocate_change() -> Result<(), Box<dyn Error>> {
    let keep_units = AllocateOptions {
        distribute_fractional_units: false,
    };
    let money = Money::new(USD, scaled!(10.005));
    let shares = money.distribute(2, keep_units)?;
    assert_eq!(strings(&shares), ["5.00", "5.00", "0.005"]);
    assert!(sum(&shares)?.equals(&money)?);

    // No change share when nothing is left over.
    let money = Money::new(USD, scaled!(10.000));
    let shares = money.distribute(2, keep_units)?;
    assert_eq!(strings(&shares), ["5.00", "5.00"]);

    // Fractions are concretized first; their change is a fraction.
    let third = Money::from_rational(USD, Rational::new(1, 3)?);
    let shares = third.allocate(&[1, 1], AllocateOptions::default())?;
    assert_eq!(shares.len(), 3);
    assert_eq!(strings(&shares[..2]), ["0.17", "0.16"]);
    assert_eq!(shares[2].to_rational(), Rational::new(1, 300)?);
    assert!(sum(&shares)?.equals(&third)?);
    Ok(())
}

#[test]
fn test_money_allocate_invalid() -> Result<(), Box<dyn Error>> {
    let money = Money::new(USD, scaled!(1.00));
    let opts = AllocateOptions::default();
    assert!(money.allocate::<i64>(&[], opts).is_err());
    assert!(money.allocate(&[1, -1], opts).is_err());
    assert!(money.allocate(&[0, 0], opts).is_err());
    assert!(money.distribute(0, opts).is_err());
    Ok(())
}

#[test]
fn test_money_convert() -> Result<(), Box<dyn Error>> {
    let rate = ExchangeRate::new("$300".parse()?, "1 BTC".parse()?)?;

    let btc = "$100".parse::<Money>()?.convert(&rate)?;
    assert_eq!(btc.currency(), BTC);
    assert_eq!(btc.to_rational(), Rational::new(1, 3)?);
    assert_eq!(
        btc.decimal_string(Some(8), RoundingMode::HalfEven).as_str(),
        "0.33333333"
    );
    assert_eq!(
        btc.decimal_string(Some(8), RoundingMode::Ceil).as_str(),
        "0.33333334"
    );
    assert_eq!(
        btc.decimal_string(None, RoundingMode::HalfEven).as_str(),
        format!("0.{}", "3".repeat(50))
    );

    let usd = Money::new(BTC, scaled!(0.5)).convert(&rate)?;
    assert_eq!(usd.currency(), USD);
    assert_eq!(usd.to_rational(), Rational::from_integer(150));
    assert_eq!(usd.balance().to_string(), "150");

    let err = Money::new(EUR, scaled!(5)).convert(&rate).unwrap_err();
    assert_eq!(err.operation(), "convert");
    assert_eq!(err.left(), "EUR");

    assert!(ExchangeRate::new("$1".parse()?, "$2".parse()?).is_err());
    assert!(ExchangeRate::new("$0".parse()?, "1 BTC".parse()?).is_err());
    Ok(())
}

#[test]
fn test_money_decimal_string() -> Result<(), Box<dyn Error>> {
    const TESTS: &[(&str, Option<u32>, RoundingMode, &str)] = &[
        ("1.005", Some(2), RoundingMode::HalfEven, "1.00"),
        ("1.005", Some(2), RoundingMode::HalfExpand, "1.01"),
        ("1.005", None, RoundingMode::HalfEven, "1.005"),
        ("1.005", Some(5), RoundingMode::HalfEven, "1.005"),
        ("100.50", None, RoundingMode::HalfEven, "100.50"),
        ("-2.5", Some(0), RoundingMode::HalfEven, "-2"),
    ];
    for (amount, max, mode, expected) in TESTS {
        println!("decimal_string({}, {:?}, {}): expected {}", amount, max, mode, expected);
        let money = Money::new(USD, amount.parse()?);
        assert_eq!(money.decimal_string(*max, *mode).as_str(), *expected);
    }
    Ok(())
}

#[test]
fn test_money_parse() -> Result<(), Box<dyn Error>> {
    const TESTS: &[(&str, Currency, &str)] = &[
        ("$100", USD, "100"),
        ("£100", GBP, "100"),
        ("1000 sat", BTC, "0.00001000"),
        ("100 gwei", ETH, "0.000000100"),
        ("2 bit", BTC, "0.000002"),
        ("5 msat", BTC, "0.000000000005"),
        ("¥500", JPY, "500"),
        ("USD 1,234.56", USD, "1234.56"),
        ("1.234,56 EUR", EUR, "1234.56"),
        ("eur 1.234", EUR, "1234"),
        ("BTC 0.5", BTC, "0.5"),
        ("1 DKK", DKK, "1"),
        ("-$5.25", USD, "-5.25"),
        ("\u{2212}€3,50", EUR, "-3.50"),
        ("  $7  ", USD, "7"),
        ("100 kr", SEK, "100"),
        ("R$ 10,50", BRL, "10.50"),
        ("R 10", ZAR, "10"),
        ("¢50", USD, "0.50"),
        ("p99", GBP, "0.99"),
        ("§1500", BTC, "0.00001500"),
        ("$1.5e3", USD, "1500"),
        ("$ 1,000,000", USD, "1000000"),
        ("$1,5", USD, "1.5"),
        ("$1,234", USD, "1234"),
        ("$1,000,000", USD, "1000000"),
        ("1.234 EUR", EUR, "1234"),
        ("1,000,000 \u{20a9}", KRW, "1000000"),
        ("1 msat", BTC, "0.000000000001"),
        ("USD -5", USD, "-5"),
    ];
    for (input, currency, amount) in TESTS {
        println!("parse({:?}): expected {} {}", input, currency, amount);
        let money: Money = input.parse()?;
        assert_eq!(money.currency(), *currency);
        assert_eq!(money.amount().to_string(), *amount);
    }
    Ok(())
}

#[test]
fn test_money_parse_errors() -> Result<(), Box<dyn Error>> {
    const TESTS: &[&str] = &[
        "",
        "   ",
        "100",
        "$5¢",
        "¢5$",
        "USD abc",
        "XYZ 100",
        "$1,23,4",
        "$1.234.5",
        "-$-5",
        "--5 USD",
        "\u{2212}-5 EUR",
    ];
    for input in TESTS {
        println!("parse({:?}): expected error", input);
        let err = input.parse::<Money>().unwrap_err();
        assert_eq!(err.input(), *input);
    }
    Ok(())
}

#[test]
fn test_money_parse_with_table() -> Result<(), Box<dyn Error>> {
    let table = Currencies::new([CNY, JPY, USD]);
    let money = Money::parse_with("¥100", &table)?;
    assert_eq!(money.currency(), CNY);
    assert_eq!(money.amount().to_string(), "100");

    let money = Money::parse_with("JPY 100", &table)?;
    assert_eq!(money.currency(), JPY);

    assert_eq!(Money::parse("¥100")?.currency(), JPY);
    assert!(Money::parse_with("€5", &table).is_err());
    Ok(())
}

#[test]
fn test_money_parse_unit_count_digits() {
    // Sub-unit counts are ASCII digits; anything else is not a sub-unit.
    let err = "\u{661}\u{660}\u{660} sat".parse::<Money>().unwrap_err();
    assert_eq!(err.reason(), "no currency recognized");
}

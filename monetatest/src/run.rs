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

use moneta::{
    AllocateOptions, Context, CurrencyMismatchError, DivisionError, DivisionErrorCode,
    ExchangeRate, InvalidInputError, Money, ParseDecimalError, ParseMoneyError,
    PrecisionLossCode, PrecisionLossError, Rational, ScaledDecimal,
};

use crate::ast;

/// The result expected of a test whose operation must fail.
const NO_RESULT: &str = "?";

pub enum Outcome {
    Passed,
    Failed { cause: Box<dyn Error> },
    Skipped,
}

pub trait Report {
    fn start_file(&mut self, file: &ast::File);
    fn finish_file(&mut self);
    fn start_test(&mut self, test: &ast::Test);
    fn finish_test(&mut self, outcome: Outcome);
}

/// Why evaluating a test stopped short of a result.
enum Signal {
    /// An operand is a `#` placeholder.
    Skip,
    /// The script itself is malformed.
    Failure(Box<dyn Error>),
    /// moneta refused the operation.
    Error(moneta::Error),
}

impl Signal {
    fn failure<S>(message: S) -> Signal
    where
        S: Into<String>,
    {
        let message = message.into();
        Signal::Failure(message.into())
    }
}

macro_rules! impl_from_error {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Signal {
                fn from(e: $t) -> Signal {
                    Signal::Error(e.into())
                }
            }
        )*
    };
}

impl_from_error!(
    moneta::Error,
    ParseDecimalError,
    ParseMoneyError,
    CurrencyMismatchError,
    DivisionError,
    PrecisionLossError,
    InvalidInputError
);

/// Settings carried from directives to the tests that follow them.
struct Runner {
    cx: Context,
    options: AllocateOptions,
}

impl Runner {
    fn new() -> Runner {
        Runner {
            cx: Context::default(),
            options: AllocateOptions::default(),
        }
    }
}

pub fn run_file<R>(reporter: &mut R, file: &ast::File) -> Result<(), Box<dyn Error>>
where
    R: Report,
{
    reporter.start_file(file);
    let mut runner = Runner::new();
    for line in &file.lines {
        match line {
            ast::Line::Directive(directive) => run_directive(&mut runner, reporter, directive)?,
            ast::Line::Test(test) => run_test(&runner, reporter, test),
        }
    }
    reporter.finish_file();
    Ok(())
}

fn run_directive<R>(
    runner: &mut Runner,
    reporter: &mut R,
    directive: &ast::Directive,
) -> Result<(), Box<dyn Error>>
where
    R: Report,
{
    log::debug!("{}", directive);
    match directive {
        ast::Directive::Fractional(b) => runner.options.distribute_fractional_units = *b,
        ast::Directive::Include(file) => run_file(reporter, file)?,
        ast::Directive::MaxBits(bits) => runner.cx.set_max_bits(*bits)?,
        ast::Directive::Precision(p) => runner.cx.set_precision(*p)?,
        ast::Directive::Rounding(mode) => runner.cx.set_rounding(*mode),
        ast::Directive::Version(_) => (),
    }
    Ok(())
}

fn run_test<R>(runner: &Runner, reporter: &mut R, test: &ast::Test)
where
    R: Report,
{
    reporter.start_test(test);
    let outcome = match evaluate(runner, &test.operation) {
        Ok(actual) => check_result(test, Ok(actual)),
        Err(Signal::Error(e)) => check_result(test, Err(e)),
        Err(Signal::Failure(cause)) => Outcome::Failed { cause },
        Err(Signal::Skip) => Outcome::Skipped,
    };
    reporter.finish_test(outcome);
}

fn evaluate(runner: &Runner, operation: &ast::Operation) -> Result<String, Signal> {
    let cx = &runner.cx;
    let result = match operation {
        ast::Operation::Abs(n) => decimal(n)?.abs().to_string(),
        ast::Operation::Add(lhs, rhs) => (&decimal(lhs)? + &decimal(rhs)?).to_string(),
        ast::Operation::Apply(n) => decimal(n)?.to_string(),
        ast::Operation::Compare(lhs, rhs) => ordering(decimal(lhs)?.cmp(&decimal(rhs)?)),
        ast::Operation::Divide(lhs, rhs) => decimal(lhs)?.divide(&decimal(rhs)?)?.to_string(),
        ast::Operation::DivideInt(lhs, rhs) => {
            let rhs = decimal(rhs)?;
            if rhs.scale() != 0 {
                return Err(Signal::failure(format!("{} is not an integer", rhs)));
            }
            decimal(lhs)?.divide_by_integer(rhs.into_value())?.to_string()
        }
        ast::Operation::Minus(n) => (-decimal(n)?).to_string(),
        ast::Operation::Multiply(lhs, rhs) => (&decimal(lhs)? * &decimal(rhs)?).to_string(),
        ast::Operation::MultiplyExact(lhs, rhs) => {
            decimal(lhs)?.multiply_exact(&decimal(rhs)?).to_string()
        }
        ast::Operation::Normalize(n, scale) => {
            decimal(n)?.normalize(integer(scale)?, false)?.to_string()
        }
        ast::Operation::NormalizeLossy(n, scale) => {
            decimal(n)?.normalize(integer(scale)?, true)?.to_string()
        }
        ast::Operation::Reduce(n) => decimal(n)?.reduce().to_string(),
        ast::Operation::Rescale(n, scale) => decimal(n)?
            .rescale(integer(scale)?, cx.rounding())
            .to_string(),
        ast::Operation::Subtract(lhs, rhs) => (&decimal(lhs)? - &decimal(rhs)?).to_string(),
        ast::Operation::RatString(r) => {
            let precision = match cx.budget() {
                moneta::PrecisionBudget::Digits(digits) => digits,
                moneta::PrecisionBudget::Bits(_) => moneta::DEFAULT_STRING_PRECISION,
            };
            rational(r)?.to_decimal_string(precision)
        }
        ast::Operation::Round(r) => rational(r)?.round(cx.rounding()).to_string(),
        ast::Operation::ToScaled(r) => rational(r)?.to_scaled()?.to_string(),
        ast::Operation::ToScaledLossy(r) => rational(r)?.to_scaled_lossy(cx).to_string(),
        ast::Operation::Allocate(m, ratios) => {
            let ratios = ratios
                .split(',')
                .map(rational)
                .collect::<Result<Vec<_>, _>>()?;
            amounts(&money(m)?.allocate(&ratios, runner.options)?)
        }
        ast::Operation::Balance(m) => money(m)?.balance_with(cx).to_string(),
        ast::Operation::Concretize(m) => {
            let (concrete, change) = money(m)?.concretize();
            amounts(&[concrete, change])
        }
        ast::Operation::Convert(m, from, to) => {
            let rate = ExchangeRate::new(money(from)?, money(to)?)?;
            let converted = money(m)?.convert(&rate)?;
            format!("{} {}", converted.currency(), converted.to_rational())
        }
        ast::Operation::DecimalString(m, max) => {
            let max = match max.as_str() {
                "-" => None,
                max => Some(integer(max)?),
            };
            money(m)?
                .decimal_string(max, cx.rounding())
                .into_string()
        }
        ast::Operation::Distribute(m, n) => {
            let n = integer(n)?;
            amounts(&money(m)?.distribute(n as usize, runner.options)?)
        }
        ast::Operation::MoneyAdd(lhs, rhs) => money(lhs)?.add(&money(rhs)?)?.to_string(),
        ast::Operation::MoneyCompare(lhs, rhs) => ordering(money(lhs)?.compare(&money(rhs)?)?),
        ast::Operation::MoneySubtract(lhs, rhs) => {
            money(lhs)?.subtract(&money(rhs)?)?.to_string()
        }
        ast::Operation::Parse(m) => money(m)?.to_string(),
    };
    Ok(result)
}

fn check_result(test: &ast::Test, actual: Result<String, moneta::Error>) -> Outcome {
    let expected_conditions = || {
        let conditions: Vec<_> = test.conditions.iter().map(|c| c.to_string()).collect();
        conditions.join(", ")
    };
    match actual {
        Ok(actual) if test.conditions.is_empty() && actual == test.result => Outcome::Passed,
        Ok(actual) if test.conditions.is_empty() => Outcome::Failed {
            cause: format!("got {} but expected {}", actual, test.result).into(),
        },
        Ok(actual) => Outcome::Failed {
            cause: format!("got {} but expected {}", actual, expected_conditions()).into(),
        },
        Err(e) => {
            let condition = condition(&e);
            if test.result == NO_RESULT && test.conditions.contains(&condition) {
                Outcome::Passed
            } else {
                Outcome::Failed {
                    cause: format!(
                        "got {} ({}) but expected {} {}",
                        condition,
                        e,
                        test.result,
                        expected_conditions()
                    )
                    .into(),
                }
            }
        }
    }
}

fn condition(e: &moneta::Error) -> ast::Condition {
    match e {
        moneta::Error::Decimal(_) => ast::Condition::ConversionSyntax,
        moneta::Error::Parse(_) => ast::Condition::ParseError,
        moneta::Error::CurrencyMismatch(_) => ast::Condition::CurrencyMismatch,
        moneta::Error::Division(e) => match e.code() {
            DivisionErrorCode::DivisionByZero => ast::Condition::DivisionByZero,
            DivisionErrorCode::RequiresRounding => ast::Condition::RequiresRounding,
            DivisionErrorCode::InvalidDivisor => ast::Condition::InvalidDivisor,
        },
        moneta::Error::PrecisionLoss(e) => match e.code() {
            PrecisionLossCode::NotPowerOfTen => ast::Condition::NotPowerOfTen,
            PrecisionLossCode::ScaleReduction => ast::Condition::ScaleReduction,
        },
        moneta::Error::InvalidInput(_) => ast::Condition::InvalidInput,
    }
}

fn placeholder(operand: &str) -> Result<(), Signal> {
    if operand == "#" {
        Err(Signal::Skip)
    } else {
        Ok(())
    }
}

fn decimal(operand: &str) -> Result<ScaledDecimal, Signal> {
    placeholder(operand)?;
    Ok(operand.parse()?)
}

/// Parses `p/q`, where both sides are decimals, or a lone decimal.
fn rational(operand: &str) -> Result<Rational, Signal> {
    placeholder(operand)?;
    match operand.split_once('/') {
        Some((p, q)) => {
            let p = Rational::from(decimal(p)?);
            let q = Rational::from(decimal(q)?);
            Ok(p.checked_div(&q)?)
        }
        None => Ok(Rational::from(decimal(operand)?)),
    }
}

fn money(operand: &str) -> Result<Money, Signal> {
    placeholder(operand)?;
    Ok(operand.parse()?)
}

fn integer(operand: &str) -> Result<u32, Signal> {
    placeholder(operand)?;
    operand
        .parse()
        .map_err(|e| Signal::failure(format!("invalid integer operand \"{}\": {}", operand, e)))
}

fn ordering(o: Ordering) -> String {
    match o {
        Ordering::Less => "-1".into(),
        Ordering::Equal => "0".into(),
        Ordering::Greater => "1".into(),
    }
}

fn amounts(shares: &[Money]) -> String {
    let shares: Vec<_> = shares.iter().map(|m| m.amount().to_string()).collect();
    shares.join(" ")
}

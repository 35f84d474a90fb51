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

use std::error::Error as StdError;
use std::fmt;

/// An error indicating that a string is not a valid decimal number.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ParseDecimalError {
    input: String,
}

impl ParseDecimalError {
    pub(crate) fn new<S>(input: S) -> ParseDecimalError
    where
        S: Into<String>,
    {
        ParseDecimalError {
            input: input.into(),
        }
    }

    /// Returns the text that failed to parse.
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl fmt::Display for ParseDecimalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid decimal syntax: {:?}", self.input)
    }
}

impl StdError for ParseDecimalError {}

/// An error indicating that a string could not be interpreted as a monetary
/// amount, either because no currency could be recognized or because the
/// text is ambiguous.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ParseMoneyError {
    input: String,
    reason: String,
}

impl ParseMoneyError {
    pub(crate) fn new<S, R>(input: S, reason: R) -> ParseMoneyError
    where
        S: Into<String>,
        R: Into<String>,
    {
        ParseMoneyError {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Returns the original input.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Returns a short description of why the input was rejected.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl fmt::Display for ParseMoneyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "cannot parse {:?} as money: {}", self.input, self.reason)
    }
}

impl StdError for ParseMoneyError {}

/// An error indicating that an operation combined amounts of two different
/// currencies.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CurrencyMismatchError {
    left: String,
    right: String,
    operation: &'static str,
}

impl CurrencyMismatchError {
    pub(crate) fn new<L, R>(left: L, right: R, operation: &'static str) -> CurrencyMismatchError
    where
        L: Into<String>,
        R: Into<String>,
    {
        CurrencyMismatchError {
            left: left.into(),
            right: right.into(),
            operation,
        }
    }

    /// The currency of the receiver of the operation.
    pub fn left(&self) -> &str {
        &self.left
    }

    /// The currency of the argument of the operation.
    pub fn right(&self) -> &str {
        &self.right
    }

    /// The name of the attempted operation, e.g. `"add"`.
    pub fn operation(&self) -> &str {
        self.operation
    }
}

impl fmt::Display for CurrencyMismatchError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "cannot {} amounts in different currencies ({} vs {})",
            self.operation, self.left, self.right
        )
    }
}

impl StdError for CurrencyMismatchError {}

/// The reason a division was refused.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum DivisionErrorCode {
    /// The divisor was zero.
    DivisionByZero,
    /// The quotient does not terminate in base 10, so producing it would
    /// require rounding.
    RequiresRounding,
    /// A decimal divisor whose coefficient is not of the form 2<sup>a</sup>
    /// 5<sup>b</sup>.
    InvalidDivisor,
}

impl DivisionErrorCode {
    /// Returns the stable, upper-case identifier of the code.
    pub fn as_str(&self) -> &'static str {
        match self {
            DivisionErrorCode::DivisionByZero => "DIVISION_BY_ZERO",
            DivisionErrorCode::RequiresRounding => "DIVISION_REQUIRES_ROUNDING",
            DivisionErrorCode::InvalidDivisor => "INVALID_DIVISOR",
        }
    }
}

/// An error indicating that a division cannot be carried out exactly.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DivisionError {
    code: DivisionErrorCode,
    divisor: String,
}

impl DivisionError {
    pub(crate) fn new<S>(code: DivisionErrorCode, divisor: S) -> DivisionError
    where
        S: Into<String>,
    {
        DivisionError {
            code,
            divisor: divisor.into(),
        }
    }

    pub(crate) fn by_zero() -> DivisionError {
        DivisionError::new(DivisionErrorCode::DivisionByZero, "0")
    }

    /// Returns the reason the division was refused.
    pub fn code(&self) -> DivisionErrorCode {
        self.code
    }

    /// Returns the offending divisor, rendered as text.
    pub fn divisor(&self) -> &str {
        &self.divisor
    }
}

impl fmt::Display for DivisionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.code {
            DivisionErrorCode::DivisionByZero => f.write_str("division by zero"),
            code => write!(
                f,
                "{}: 1/{} does not terminate in base 10",
                code.as_str(),
                self.divisor
            ),
        }
    }
}

impl StdError for DivisionError {}

/// The reason a conversion would lose significant digits.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum PrecisionLossCode {
    /// A rational's denominator cannot be brought to a power of ten.
    NotPowerOfTen,
    /// Lowering the scale of a decimal would discard non-zero digits.
    ScaleReduction,
}

/// An error indicating that an operation would silently lose significant
/// digits and the caller did not opt into a lossy variant.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PrecisionLossError {
    code: PrecisionLossCode,
    value: String,
}

impl PrecisionLossError {
    pub(crate) fn new<S>(code: PrecisionLossCode, value: S) -> PrecisionLossError
    where
        S: Into<String>,
    {
        PrecisionLossError {
            code,
            value: value.into(),
        }
    }

    /// Returns the reason for the failure.
    pub fn code(&self) -> PrecisionLossCode {
        self.code
    }

    /// Returns the value that could not be converted, rendered as text.
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for PrecisionLossError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.code {
            PrecisionLossCode::NotPowerOfTen => write!(
                f,
                "{} cannot be represented exactly: denominator not a power of 10",
                self.value
            ),
            PrecisionLossCode::ScaleReduction => write!(
                f,
                "{} cannot be rescaled without discarding digits",
                self.value
            ),
        }
    }
}

impl StdError for PrecisionLossError {}

/// An error indicating a malformed argument, such as an empty set of
/// allocation ratios or an out-of-range precision budget.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct InvalidInputError {
    message: String,
}

impl InvalidInputError {
    pub(crate) fn new<S>(message: S) -> InvalidInputError
    where
        S: Into<String>,
    {
        InvalidInputError {
            message: message.into(),
        }
    }

    /// Returns the description of the problem.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for InvalidInputError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid input: {}", self.message)
    }
}

impl StdError for InvalidInputError {}

/// Any error produced by this crate.
///
/// Individual operations return the narrowest error type that describes
/// their failure modes; this enum exists so that callers combining several
/// operations can propagate with `?`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Error {
    /// See [`ParseDecimalError`].
    Decimal(ParseDecimalError),
    /// See [`ParseMoneyError`].
    Parse(ParseMoneyError),
    /// See [`CurrencyMismatchError`].
    CurrencyMismatch(CurrencyMismatchError),
    /// See [`DivisionError`].
    Division(DivisionError),
    /// See [`PrecisionLossError`].
    PrecisionLoss(PrecisionLossError),
    /// See [`InvalidInputError`].
    InvalidInput(InvalidInputError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Decimal(e) => e.fmt(f),
            Error::Parse(e) => e.fmt(f),
            Error::CurrencyMismatch(e) => e.fmt(f),
            Error::Division(e) => e.fmt(f),
            Error::PrecisionLoss(e) => e.fmt(f),
            Error::InvalidInput(e) => e.fmt(f),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Decimal(e) => Some(e),
            Error::Parse(e) => Some(e),
            Error::CurrencyMismatch(e) => Some(e),
            Error::Division(e) => Some(e),
            Error::PrecisionLoss(e) => Some(e),
            Error::InvalidInput(e) => Some(e),
        }
    }
}

impl From<ParseDecimalError> for Error {
    fn from(e: ParseDecimalError) -> Error {
        Error::Decimal(e)
    }
}

impl From<ParseMoneyError> for Error {
    fn from(e: ParseMoneyError) -> Error {
        Error::Parse(e)
    }
}

impl From<CurrencyMismatchError> for Error {
    fn from(e: CurrencyMismatchError) -> Error {
        Error::CurrencyMismatch(e)
    }
}

impl From<DivisionError> for Error {
    fn from(e: DivisionError) -> Error {
        Error::Division(e)
    }
}

impl From<PrecisionLossError> for Error {
    fn from(e: PrecisionLossError) -> Error {
        Error::PrecisionLoss(e)
    }
}

impl From<InvalidInputError> for Error {
    fn from(e: InvalidInputError) -> Error {
        Error::InvalidInput(e)
    }
}

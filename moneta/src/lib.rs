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

//! moneta is an exact money arithmetic library for Rust.
//!
//! # Introduction
//!
//! Binary floating-point numbers can only approximate common decimal
//! amounts: 0.1 would need an infinitely recurring binary fraction. Money
//! must add up to the cent, so moneta never touches binary floating point.
//! Amounts are fixed-point decimals over arbitrary-precision integers, and
//! where a result cannot be written in base 10 at all, such as a third of a
//! dollar, it is carried as an exact fraction until someone asks for digits.
//!
//! Nothing in moneta rounds unless the caller supplies a [`RoundingMode`].
//! Operations that would otherwise lose digits fail instead, with an error
//! that says why.
//!
//! # Details
//!
//! The main types exposed by this library are as follows:
//!
//!  * [`ScaledDecimal`], an arbitrary-precision integer together with a
//!    scale, the number of digits after the decimal point. Addition,
//!    subtraction and multiplication are infallible; division succeeds only
//!    when the quotient terminates.
//!
//!  * [`Rational`], an exact fraction, and the conversions between it and
//!    [`ScaledDecimal`]: exact where the denominator allows, or rounded
//!    within the budget of a [`Context`].
//!
//!  * [`Money`], an amount in a [`Currency`], with currency-checked
//!    arithmetic, allocation by the largest-remainder method, splitting into
//!    canonical amount and change, and exact conversion through an
//!    [`ExchangeRate`].
//!
//!  * [`MoneyParser`], which reads free-form text such as `$1,234.56`,
//!    `1.234,56 EUR` or `1000 sat`.
//!
//! # Examples
//!
//! The following example demonstrates the basic usage of the library:
//!
//! ```
//! # use std::error::Error;
//! use moneta::{ExchangeRate, Money, RoundingMode};
//!
//! let price: Money = "$19.99".parse()?;
//! let tax: Money = "$1.60".parse()?;
//! let total = price.add(&tax)?;
//! assert_eq!(total.to_string(), "USD 21.59");
//!
//! let rate = ExchangeRate::new("$3".parse()?, "€2".parse()?)?;
//! let euros = total.convert(&rate)?;
//! assert_eq!(
//!     euros.decimal_string(Some(2), RoundingMode::HalfEven).as_str(),
//!     "14.39"
//! );
//!
//! # Ok::<_, Box<dyn Error>>(())
//! ```

#![deny(missing_debug_implementations, missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod context;
mod conv;
pub mod currency;
mod error;
mod macros;
mod money;
mod parse;
mod rational;
mod scaled;
#[cfg(feature = "serde")]
mod serde;

pub use context::{Context, PrecisionBudget, RoundingMode, DEFAULT_PRECISION, MAX_PRECISION};
pub use conv::{max_precision_from_bits, round_ratio, MAX_BITS_PRECISION};
pub use currency::{Currencies, Currency, CurrencyLookup, FractionalUnit, FractionalUnitInfo};
pub use error::{
    CurrencyMismatchError, DivisionError, DivisionErrorCode, Error, InvalidInputError,
    ParseDecimalError, ParseMoneyError, PrecisionLossCode, PrecisionLossError,
};
pub use money::{AllocateOptions, Amount, ExchangeRate, Money};
pub use parse::MoneyParser;
pub use rational::{Rational, DEFAULT_STRING_PRECISION};
pub use scaled::{DecimalString, ScaledDecimal};

static_assertions::assert_impl_all!(ScaledDecimal: Send, Sync);
static_assertions::assert_impl_all!(Rational: Send, Sync);
static_assertions::assert_impl_all!(Money: Send, Sync);
static_assertions::assert_impl_all!(Currencies: Send, Sync);

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

use std::fmt;
use std::str::FromStr;

use num_bigint::BigInt;

use crate::conv;
use crate::error::{DivisionError, InvalidInputError};
use crate::rational::Rational;
use crate::scaled::ScaledDecimal;

/// The number of significant digits used when no budget is configured.
pub const DEFAULT_PRECISION: u32 = 50;

/// The largest significant-digit budget a [`Context`] accepts.
pub const MAX_PRECISION: u32 = 1000;

/// A context for lossy conversions.
///
/// Most operations in this crate are exact and need no configuration. The
/// exceptions are the conversions that collapse a [`Rational`] into a
/// [`ScaledDecimal`] whose denominator is not a power of ten. A context
/// configures how those conversions behave:
///
///   * the rounding algorithm used to resolve the final digit, and
///
///   * the budget, expressed either in significant decimal digits or in
///     bits, that bounds the size of the result.
#[derive(Clone, Eq, PartialEq)]
pub struct Context {
    rounding: RoundingMode,
    budget: PrecisionBudget,
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Context")
            .field("rounding", &self.rounding)
            .field("budget", &self.budget)
            .finish()
    }
}

impl Default for Context {
    fn default() -> Context {
        Context {
            rounding: RoundingMode::default(),
            budget: PrecisionBudget::Digits(DEFAULT_PRECISION),
        }
    }
}

impl Context {
    /// Constructs a context with the given rounding mode and budget.
    pub fn new(rounding: RoundingMode, budget: PrecisionBudget) -> Result<Context, InvalidInputError> {
        budget.validate()?;
        Ok(Context { rounding, budget })
    }

    /// Returns the context's rounding algorithm.
    pub fn rounding(&self) -> RoundingMode {
        self.rounding
    }

    /// Sets the context's rounding algorithm.
    pub fn set_rounding(&mut self, rounding: RoundingMode) {
        self.rounding = rounding;
    }

    /// Returns the context's precision budget.
    pub fn budget(&self) -> PrecisionBudget {
        self.budget
    }

    /// Limits lossy conversions to `digits` significant decimal digits.
    ///
    /// The precision must be at least one and no greater than
    /// [`MAX_PRECISION`].
    pub fn set_precision(&mut self, digits: u32) -> Result<(), InvalidInputError> {
        let budget = PrecisionBudget::Digits(digits);
        budget.validate()?;
        self.budget = budget;
        Ok(())
    }

    /// Limits lossy conversions to results whose coefficient and scale
    /// together occupy at most `bits` bits.
    pub fn set_max_bits(&mut self, bits: u64) -> Result<(), InvalidInputError> {
        let budget = PrecisionBudget::Bits(bits);
        budget.validate()?;
        self.budget = budget;
        Ok(())
    }

    /// Divides `numerator` by `denominator`, resolving any remainder with
    /// the context's rounding mode.
    pub fn round(&self, numerator: &BigInt, denominator: &BigInt) -> Result<BigInt, DivisionError> {
        conv::round_ratio(numerator, denominator, self.rounding)
    }

    /// Converts `r` to a decimal within the context's budget.
    ///
    /// Equivalent to [`Rational::to_scaled_lossy`].
    pub fn to_scaled(&self, r: &Rational) -> ScaledDecimal {
        r.to_scaled_lossy(self)
    }
}

/// A bound on the size of the result of a lossy conversion.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum PrecisionBudget {
    /// At most this many significant decimal digits.
    Digits(u32),
    /// At most this many bits, counting both the coefficient and the scale.
    Bits(u64),
}

impl PrecisionBudget {
    fn validate(&self) -> Result<(), InvalidInputError> {
        match *self {
            PrecisionBudget::Digits(d) if d < 1 || d > MAX_PRECISION => Err(
                InvalidInputError::new(format!("precision {} is not in [1, {}]", d, MAX_PRECISION)),
            ),
            PrecisionBudget::Bits(b) if b < 2 => Err(InvalidInputError::new(format!(
                "bit budget {} is smaller than 2",
                b
            ))),
            _ => Ok(()),
        }
    }
}

/// Algorithms for rounding a ratio to an integer.
///
/// The directed modes ignore the magnitude of the discarded remainder. The
/// `Half*` modes round to the nearest integer and differ only in how they
/// break an exact tie.
///
/// | mode          | 1.5 | 2.5 | -1.5 | -2.5 | 1.2 | -1.2 |
/// |---------------|-----|-----|------|------|-----|------|
/// | `Ceil`        | 2   | 3   | -1   | -2   | 2   | -1   |
/// | `Floor`       | 1   | 2   | -2   | -3   | 1   | -2   |
/// | `Expand`      | 2   | 3   | -2   | -3   | 2   | -2   |
/// | `Trunc`       | 1   | 2   | -1   | -2   | 1   | -1   |
/// | `HalfCeil`    | 2   | 3   | -1   | -2   | 1   | -1   |
/// | `HalfFloor`   | 1   | 2   | -2   | -3   | 1   | -1   |
/// | `HalfExpand`  | 2   | 3   | -2   | -3   | 1   | -1   |
/// | `HalfTrunc`   | 1   | 2   | -1   | -2   | 1   | -1   |
/// | `HalfEven`    | 2   | 2   | -2   | -2   | 1   | -1   |
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum RoundingMode {
    /// Round towards positive infinity.
    Ceil,
    /// Round towards negative infinity.
    Floor,
    /// Round away from zero.
    Expand,
    /// Round towards zero (truncation).
    Trunc,
    /// Round to nearest; if equidistant, round towards positive infinity.
    HalfCeil,
    /// Round to nearest; if equidistant, round towards negative infinity.
    HalfFloor,
    /// Round to nearest; if equidistant, round away from zero.
    HalfExpand,
    /// Round to nearest; if equidistant, round towards zero.
    HalfTrunc,
    /// Round to nearest; if equidistant, round to the even neighbor.
    HalfEven,
}

impl Default for RoundingMode {
    fn default() -> RoundingMode {
        RoundingMode::HalfEven
    }
}

impl RoundingMode {
    /// All rounding modes, in declaration order.
    pub const ALL: [RoundingMode; 9] = [
        RoundingMode::Ceil,
        RoundingMode::Floor,
        RoundingMode::Expand,
        RoundingMode::Trunc,
        RoundingMode::HalfCeil,
        RoundingMode::HalfFloor,
        RoundingMode::HalfExpand,
        RoundingMode::HalfTrunc,
        RoundingMode::HalfEven,
    ];

    /// Reports whether the mode only rounds to the nearest integer.
    pub fn is_half(&self) -> bool {
        matches!(
            self,
            RoundingMode::HalfCeil
                | RoundingMode::HalfFloor
                | RoundingMode::HalfExpand
                | RoundingMode::HalfTrunc
                | RoundingMode::HalfEven
        )
    }
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RoundingMode::Ceil => f.write_str("ceil"),
            RoundingMode::Floor => f.write_str("floor"),
            RoundingMode::Expand => f.write_str("expand"),
            RoundingMode::Trunc => f.write_str("trunc"),
            RoundingMode::HalfCeil => f.write_str("half_ceil"),
            RoundingMode::HalfFloor => f.write_str("half_floor"),
            RoundingMode::HalfExpand => f.write_str("half_expand"),
            RoundingMode::HalfTrunc => f.write_str("half_trunc"),
            RoundingMode::HalfEven => f.write_str("half_even"),
        }
    }
}

impl FromStr for RoundingMode {
    type Err = InvalidInputError;

    fn from_str(s: &str) -> Result<RoundingMode, InvalidInputError> {
        match s.to_ascii_lowercase().as_str() {
            "ceil" => Ok(RoundingMode::Ceil),
            "floor" => Ok(RoundingMode::Floor),
            "expand" => Ok(RoundingMode::Expand),
            "trunc" => Ok(RoundingMode::Trunc),
            "half_ceil" => Ok(RoundingMode::HalfCeil),
            "half_floor" => Ok(RoundingMode::HalfFloor),
            "half_expand" => Ok(RoundingMode::HalfExpand),
            "half_trunc" => Ok(RoundingMode::HalfTrunc),
            "half_even" => Ok(RoundingMode::HalfEven),
            _ => Err(InvalidInputError::new(format!(
                "unknown rounding mode \"{}\"",
                s
            ))),
        }
    }
}

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
use std::path::PathBuf;

use moneta::RoundingMode;

#[derive(Debug)]
pub struct File {
    pub path: PathBuf,
    pub lines: Vec<Line>,
}

#[derive(Debug)]
pub enum Line {
    Directive(Directive),
    Test(Test),
}

#[derive(Debug)]
pub enum Directive {
    Fractional(bool),
    Include(File),
    MaxBits(u64),
    Precision(u32),
    Rounding(RoundingMode),
    Version(String),
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Directive::Fractional(b) => write!(f, "fractional: {}", b),
            Directive::Include(file) => write!(f, "include: {}", file.path.display()),
            Directive::MaxBits(b) => write!(f, "maxBits: {}", b),
            Directive::Precision(p) => write!(f, "precision: {}", p),
            Directive::Rounding(r) => write!(f, "rounding: {}", r),
            Directive::Version(v) => write!(f, "version: {}", v),
        }
    }
}

#[derive(Debug)]
pub struct Test {
    pub id: String,
    pub operation: Operation,
    pub result: String,
    pub conditions: Vec<Condition>,
}

#[derive(Debug)]
pub enum Operation {
    // Decimals.
    Abs(String),
    Add(String, String),
    Apply(String),
    Compare(String, String),
    Divide(String, String),
    DivideInt(String, String),
    Minus(String),
    Multiply(String, String),
    MultiplyExact(String, String),
    Normalize(String, String),
    NormalizeLossy(String, String),
    Reduce(String),
    Rescale(String, String),
    Subtract(String, String),
    // Fractions.
    RatString(String),
    Round(String),
    ToScaled(String),
    ToScaledLossy(String),
    // Money.
    Allocate(String, String),
    Balance(String),
    Concretize(String),
    Convert(String, String, String),
    DecimalString(String, String),
    Distribute(String, String),
    MoneyAdd(String, String),
    MoneyCompare(String, String),
    MoneySubtract(String, String),
    Parse(String),
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Operation::Abs(op) => write!(f, "abs {}", op),
            Operation::Add(op1, op2) => write!(f, "add {} {}", op1, op2),
            Operation::Apply(op) => write!(f, "apply {}", op),
            Operation::Compare(op1, op2) => write!(f, "compare {} {}", op1, op2),
            Operation::Divide(op1, op2) => write!(f, "divide {} {}", op1, op2),
            Operation::DivideInt(op1, op2) => write!(f, "divideint {} {}", op1, op2),
            Operation::Minus(op) => write!(f, "minus {}", op),
            Operation::Multiply(op1, op2) => write!(f, "multiply {} {}", op1, op2),
            Operation::MultiplyExact(op1, op2) => write!(f, "multiplyexact {} {}", op1, op2),
            Operation::Normalize(op1, op2) => write!(f, "normalize {} {}", op1, op2),
            Operation::NormalizeLossy(op1, op2) => write!(f, "normalizelossy {} {}", op1, op2),
            Operation::Reduce(op) => write!(f, "reduce {}", op),
            Operation::Rescale(op1, op2) => write!(f, "rescale {} {}", op1, op2),
            Operation::Subtract(op1, op2) => write!(f, "subtract {} {}", op1, op2),
            Operation::RatString(op) => write!(f, "ratstring {}", op),
            Operation::Round(op) => write!(f, "round {}", op),
            Operation::ToScaled(op) => write!(f, "toscaled {}", op),
            Operation::ToScaledLossy(op) => write!(f, "toscaledlossy {}", op),
            Operation::Allocate(op1, op2) => write!(f, "allocate '{}' {}", op1, op2),
            Operation::Balance(op) => write!(f, "balance '{}'", op),
            Operation::Concretize(op) => write!(f, "concretize '{}'", op),
            Operation::Convert(op1, op2, op3) => {
                write!(f, "convert '{}' '{}' '{}'", op1, op2, op3)
            }
            Operation::DecimalString(op1, op2) => write!(f, "decimalstring '{}' {}", op1, op2),
            Operation::Distribute(op1, op2) => write!(f, "distribute '{}' {}", op1, op2),
            Operation::MoneyAdd(op1, op2) => write!(f, "madd '{}' '{}'", op1, op2),
            Operation::MoneyCompare(op1, op2) => write!(f, "mcompare '{}' '{}'", op1, op2),
            Operation::MoneySubtract(op1, op2) => write!(f, "msubtract '{}' '{}'", op1, op2),
            Operation::Parse(op) => write!(f, "parse '{}'", op),
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Condition {
    ConversionSyntax,
    CurrencyMismatch,
    DivisionByZero,
    InvalidDivisor,
    InvalidInput,
    NotPowerOfTen,
    ParseError,
    RequiresRounding,
    ScaleReduction,
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Condition::ConversionSyntax => f.write_str("Conversion_syntax"),
            Condition::CurrencyMismatch => f.write_str("Currency_mismatch"),
            Condition::DivisionByZero => f.write_str("Division_by_zero"),
            Condition::InvalidDivisor => f.write_str("Invalid_divisor"),
            Condition::InvalidInput => f.write_str("Invalid_input"),
            Condition::NotPowerOfTen => f.write_str("Not_power_of_ten"),
            Condition::ParseError => f.write_str("Parse_error"),
            Condition::RequiresRounding => f.write_str("Requires_rounding"),
            Condition::ScaleReduction => f.write_str("Scale_reduction"),
        }
    }
}

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

//! Parser for `.monetaTest` scripts.
//!
//! Each line is blank, a comment introduced by `--`, a directive of the form
//! `keyword: value`, or a test:
//!
//! ```text
//! id operation operand... -> result condition...
//! ```
//!
//! Tokens are separated by blanks. A token containing blanks is quoted with
//! `'` or `"`; a doubled quote inside a quoted token stands for itself.

use std::error::Error;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use crate::ast;
use crate::lex::LexBuf;

struct Context<'a> {
    path: &'a Path,
}

pub fn parse_file(path: &Path) -> Result<ast::File, Box<dyn Error>> {
    let cx = &Context { path };
    let f = BufReader::new(File::open(path)?);
    let mut lines = vec![];
    for (i, line) in f.lines().enumerate() {
        let line = line?;
        let mut buf = LexBuf::new(&line);
        match parse_line(cx, &mut buf) {
            Ok(None) => (),
            Ok(Some(line)) => lines.push(line),
            Err(e) => return Err(format!("{}:{}: {}", path.display(), i + 1, e).into()),
        }
    }
    log::debug!("parsed {} lines from {}", lines.len(), path.display());
    Ok(ast::File {
        path: path.to_path_buf(),
        lines,
    })
}

fn parse_line(cx: &Context, buf: &mut LexBuf) -> Result<Option<ast::Line>, Box<dyn Error>> {
    let token = match parse_token(buf) {
        None => return Ok(None),
        Some(token) => token,
    };
    if let Some(keyword) = token.strip_suffix(':') {
        let value = require_token(buf, "value")?;
        return Ok(Some(ast::Line::Directive(parse_directive(
            cx, keyword, value,
        )?)));
    }
    let id = token;
    let operation = parse_operation(buf)?;
    if require_token(buf, "->")? != "->" {
        return Err("missing \"->\" token".into());
    }
    let result = require_token(buf, "result")?;
    let mut conditions = vec![];
    while let Some(condition) = parse_token(buf) {
        conditions.push(condition.parse()?);
    }
    Ok(Some(ast::Line::Test(ast::Test {
        id,
        operation,
        result,
        conditions,
    })))
}

fn require_token(buf: &mut LexBuf, name: &str) -> Result<String, Box<dyn Error>> {
    parse_token(buf).ok_or_else(|| format!("missing \"{}\" token", name).into())
}

fn parse_token(buf: &mut LexBuf) -> Option<String> {
    buf.skip_blanks();
    if buf.consume("--") {
        buf.clear();
        return None;
    }
    match buf.peek() {
        Some(quote @ '\'') | Some(quote @ '"') => {
            buf.next();
            Some(parse_quoted_token(buf, quote))
        }
        _ => parse_unquoted_token(buf),
    }
}

fn parse_unquoted_token(buf: &mut LexBuf) -> Option<String> {
    let mut token = String::new();
    while let Some(ch) = buf.peek() {
        if ch == ' ' || ch == '\t' {
            break;
        }
        token.push(ch);
        buf.next();
    }
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

fn parse_quoted_token(buf: &mut LexBuf, quote: char) -> String {
    let mut token = String::new();
    while let Some(ch) = buf.next() {
        if ch != quote {
            token.push(ch);
        } else if buf.peek() == Some(quote) {
            token.push(quote);
            buf.next();
        } else {
            break;
        }
    }
    token
}

fn parse_directive(
    cx: &Context,
    keyword: &str,
    value: String,
) -> Result<ast::Directive, Box<dyn Error>> {
    match keyword.to_lowercase().as_str() {
        "fractional" => Ok(ast::Directive::Fractional(parse_bool(&value)?)),
        "include" => {
            let path = cx.path.with_file_name(value).with_extension("monetaTest");
            let file =
                parse_file(&path).map_err(|e| format!("opening {}: {}", path.display(), e))?;
            Ok(ast::Directive::Include(file))
        }
        "maxbits" => Ok(ast::Directive::MaxBits(value.parse()?)),
        "precision" => Ok(ast::Directive::Precision(value.parse()?)),
        "rounding" => Ok(ast::Directive::Rounding(value.parse()?)),
        "version" => Ok(ast::Directive::Version(value)),
        _ => Err(format!("unknown directive \"{}\"", keyword).into()),
    }
}

fn parse_bool(s: &str) -> Result<bool, Box<dyn Error>> {
    match s {
        "0" => Ok(false),
        "1" => Ok(true),
        _ => Err(format!("invalid boolean \"{}\"", s).into()),
    }
}

fn parse_operation(buf: &mut LexBuf) -> Result<ast::Operation, Box<dyn Error>> {
    let operation = require_token(buf, "operation")?;
    let mut op = || require_token(buf, "operand");
    match operation.to_lowercase().as_str() {
        "abs" => Ok(ast::Operation::Abs(op()?)),
        "add" => Ok(ast::Operation::Add(op()?, op()?)),
        "apply" => Ok(ast::Operation::Apply(op()?)),
        "compare" => Ok(ast::Operation::Compare(op()?, op()?)),
        "divide" => Ok(ast::Operation::Divide(op()?, op()?)),
        "divideint" => Ok(ast::Operation::DivideInt(op()?, op()?)),
        "minus" => Ok(ast::Operation::Minus(op()?)),
        "multiply" => Ok(ast::Operation::Multiply(op()?, op()?)),
        "multiplyexact" => Ok(ast::Operation::MultiplyExact(op()?, op()?)),
        "normalize" => Ok(ast::Operation::Normalize(op()?, op()?)),
        "normalizelossy" => Ok(ast::Operation::NormalizeLossy(op()?, op()?)),
        "reduce" => Ok(ast::Operation::Reduce(op()?)),
        "rescale" => Ok(ast::Operation::Rescale(op()?, op()?)),
        "subtract" => Ok(ast::Operation::Subtract(op()?, op()?)),
        "ratstring" => Ok(ast::Operation::RatString(op()?)),
        "round" => Ok(ast::Operation::Round(op()?)),
        "toscaled" => Ok(ast::Operation::ToScaled(op()?)),
        "toscaledlossy" => Ok(ast::Operation::ToScaledLossy(op()?)),
        "allocate" => Ok(ast::Operation::Allocate(op()?, op()?)),
        "balance" => Ok(ast::Operation::Balance(op()?)),
        "concretize" => Ok(ast::Operation::Concretize(op()?)),
        "convert" => Ok(ast::Operation::Convert(op()?, op()?, op()?)),
        "decimalstring" => Ok(ast::Operation::DecimalString(op()?, op()?)),
        "distribute" => Ok(ast::Operation::Distribute(op()?, op()?)),
        "madd" => Ok(ast::Operation::MoneyAdd(op()?, op()?)),
        "mcompare" => Ok(ast::Operation::MoneyCompare(op()?, op()?)),
        "msubtract" => Ok(ast::Operation::MoneySubtract(op()?, op()?)),
        "parse" => Ok(ast::Operation::Parse(op()?)),
        _ => Err(format!("unknown operation \"{}\"", operation).into()),
    }
}

impl FromStr for ast::Condition {
    type Err = Box<dyn Error>;

    fn from_str(s: &str) -> Result<ast::Condition, Box<dyn Error>> {
        match s.to_lowercase().as_str() {
            "conversion_syntax" => Ok(ast::Condition::ConversionSyntax),
            "currency_mismatch" => Ok(ast::Condition::CurrencyMismatch),
            "division_by_zero" => Ok(ast::Condition::DivisionByZero),
            "invalid_divisor" => Ok(ast::Condition::InvalidDivisor),
            "invalid_input" => Ok(ast::Condition::InvalidInput),
            "not_power_of_ten" => Ok(ast::Condition::NotPowerOfTen),
            "parse_error" => Ok(ast::Condition::ParseError),
            "requires_rounding" => Ok(ast::Condition::RequiresRounding),
            "scale_reduction" => Ok(ast::Condition::ScaleReduction),
            _ => Err(format!("unknown condition \"{}\"", s).into()),
        }
    }
}

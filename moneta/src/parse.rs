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

//! Parsing of free-form monetary text.

use std::fmt;
use std::sync::LazyLock;

use num_bigint::BigInt;
use regex::Regex;

use crate::currency::{Currency, CurrencyLookup};
use crate::error::ParseMoneyError;
use crate::money::Money;
use crate::scaled::ScaledDecimal;

static UNIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?i)([0-9]+)\s+([a-z]+)$").unwrap());
static CODE_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z]{3,4})\s*(.+)$").unwrap());
static CODE_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)\s*([A-Za-z]{3,4})$").unwrap());

/// Exponents beyond this magnitude are rejected.
const MAX_EXPONENT: i64 = 10_000;

type Outcome = Result<Option<(Currency, ScaledDecimal)>, ParseMoneyError>;

/// The text handed to each strategy.
struct Input<'s> {
    /// The text as given, for error reporting.
    original: &'s str,
    /// The text without surrounding blanks or a leading sign.
    body: &'s str,
    /// Whether a leading sign was stripped. The number may then not carry
    /// its own.
    signed: bool,
}

/// Turns monetary text into [`Money`].
///
/// The parser tries the following forms in order and uses the first that
/// recognizes a currency:
///
///  1. A whole number of a named sub-unit, e.g. `1000 sat` or `100 gwei`.
///
///  2. A currency code before or after the number, e.g. `USD 1,234.56` or
///     `1.234,56 EUR`. Codes are three or four letters and case-insensitive.
///
///  3. A fractional-unit symbol before the number, e.g. `¢50`.
///
///  4. A currency symbol before or after the number, e.g. `$100` or
///     `100 kr`. Symbols are matched longest first, and a symbol shared by
///     several currencies resolves to its primary currency. Use a code to
///     name any other.
///
/// A leading `-` or `−` negates the result. Numbers may use `,` or `.` as
/// the decimal point: when both appear, the rightmost is the decimal point;
/// when only one kind appears, the currency's convention decides, except
/// that a lone grouping separator not followed by exactly three digits is
/// read as a decimal point. Grouping must be in threes. Scientific notation
/// such as `1.23e-5` is folded into the scale of the result.
///
/// Text that mixes a currency symbol with a fractional-unit symbol is
/// rejected as ambiguous, as is a recognized currency followed by a
/// malformed number.
pub struct MoneyParser<'a, L: ?Sized> {
    currencies: &'a L,
}

impl<'a, L: ?Sized> fmt::Debug for MoneyParser<'a, L> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("MoneyParser").finish_non_exhaustive()
    }
}

impl<'a, L> MoneyParser<'a, L>
where
    L: CurrencyLookup + ?Sized,
{
    /// Constructs a parser that resolves currencies through `currencies`.
    pub fn new(currencies: &'a L) -> MoneyParser<'a, L> {
        MoneyParser { currencies }
    }

    /// Parses `input`.
    pub fn parse(&self, input: &str) -> Result<Money, ParseMoneyError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ParseMoneyError::new(input, "empty input"));
        }
        let (negative, body) = strip_sign(trimmed);
        let text = Input {
            original: input,
            body: body.trim_start(),
            signed: negative,
        };

        let strategies: [(&str, fn(&Self, &Input) -> Outcome); 4] = [
            ("sub-unit", Self::parse_unit),
            ("currency code", Self::parse_code),
            ("fractional symbol", Self::parse_fractional_symbol),
            ("currency symbol", Self::parse_symbol),
        ];
        for (name, strategy) in strategies {
            match strategy(self, &text) {
                Ok(Some((currency, amount))) => {
                    log::trace!("{:?}: {} strategy matched {}", input, name, currency);
                    let amount = if negative { -amount } else { amount };
                    return Ok(Money::new(currency, amount));
                }
                Ok(None) => log::trace!("{:?}: {} strategy deferred", input, name),
                Err(e) => {
                    log::trace!("{:?}: {} strategy failed: {}", input, name, e);
                    return Err(e);
                }
            }
        }
        Err(ParseMoneyError::new(input, "no currency recognized"))
    }

    fn parse_unit(&self, text: &Input) -> Outcome {
        let (input, body) = (text.original, text.body);
        let caps = match UNIT_RE.captures(body) {
            Some(caps) => caps,
            None => return Ok(None),
        };
        let info = match self.currencies.unit_by_name(&caps[2]) {
            Some(info) => info,
            None => return Ok(None),
        };
        let count: BigInt = caps[1]
            .parse()
            .map_err(|_| ParseMoneyError::new(input, "invalid unit count"))?;
        Ok(Some((info.currency, ScaledDecimal::new(count, info.scale))))
    }

    fn parse_code(&self, text: &Input) -> Outcome {
        let (input, body) = (text.original, text.body);
        let candidates = [
            CODE_PREFIX_RE.captures(body).map(|c| (c[1].to_owned(), c[2].to_owned())),
            CODE_SUFFIX_RE.captures(body).map(|c| (c[2].to_owned(), c[1].to_owned())),
        ];
        for (code, number) in candidates.into_iter().flatten() {
            if let Some(currency) = self.currencies.lookup(&code) {
                let amount = parse_number(&number, Some(&currency), text.signed)
                    .ok_or_else(|| invalid_number(input, &number, &currency))?;
                return Ok(Some((currency, amount)));
            }
        }
        Ok(None)
    }

    fn parse_fractional_symbol(&self, text: &Input) -> Outcome {
        let (input, body) = (text.original, text.body);
        for symbol in self.currencies.fractional_symbols() {
            let rest = match body.strip_prefix(symbol) {
                Some(rest) => rest.trim_start(),
                None => continue,
            };
            if self.currencies.symbols().iter().any(|s| rest.contains(s)) {
                return Err(ParseMoneyError::new(
                    input,
                    "mixes a fractional-unit symbol with a currency symbol",
                ));
            }
            let info = match self.currencies.fractional_unit_info(symbol) {
                Some(info) => info,
                None => continue,
            };
            let units = parse_number(rest, Some(&info.currency), text.signed)
                .ok_or_else(|| invalid_number(input, rest, &info.currency))?;
            let (value, scale) = units.into_parts();
            return Ok(Some((
                info.currency,
                ScaledDecimal::new(value, scale + info.scale),
            )));
        }
        Ok(None)
    }

    fn parse_symbol(&self, text: &Input) -> Outcome {
        let (input, body) = (text.original, text.body);
        for symbol in self.currencies.symbols() {
            let rest = match body
                .strip_prefix(symbol)
                .or_else(|| body.strip_suffix(symbol))
            {
                Some(rest) => rest.trim(),
                None => continue,
            };
            if self
                .currencies
                .fractional_symbols()
                .iter()
                .any(|s| rest.contains(s))
            {
                return Err(ParseMoneyError::new(
                    input,
                    "mixes a currency symbol with a fractional-unit symbol",
                ));
            }
            let currency = match self.currencies.primary_for_symbol(symbol) {
                Some(currency) => currency,
                None => continue,
            };
            let amount = parse_number(rest, Some(&currency), text.signed)
                .ok_or_else(|| invalid_number(input, rest, &currency))?;
            return Ok(Some((currency, amount)));
        }
        Ok(None)
    }
}

fn invalid_number(input: &str, number: &str, currency: &Currency) -> ParseMoneyError {
    ParseMoneyError::new(
        input,
        format!("{:?} is not a valid {} amount", number, currency),
    )
}

/// Splits off a leading ASCII hyphen or U+2212 minus sign.
fn strip_sign(s: &str) -> (bool, &str) {
    if let Some(rest) = s.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = s.strip_prefix('\u{2212}') {
        (true, rest)
    } else {
        (false, s)
    }
}

/// Parses a number literal that may contain grouping separators and an
/// exponent, choosing the decimal separator by the conventions of
/// `currency`. A number already preceded by a sign may not carry another.
fn parse_number(text: &str, currency: Option<&Currency>, signed: bool) -> Option<ScaledDecimal> {
    let (negative, unsigned) = match text.strip_prefix('+') {
        Some(rest) => (false, rest),
        None => strip_sign(text),
    };
    if signed && unsigned.len() != text.len() {
        return None;
    }
    let text = unsigned;
    let (mantissa, exponent) = match text.find(|c| c == 'e' || c == 'E') {
        Some(i) => {
            let exponent: i64 = text[i + 1..].parse().ok()?;
            if exponent.abs() > MAX_EXPONENT {
                return None;
            }
            (&text[..i], exponent)
        }
        None => (text, 0),
    };
    if !mantissa
        .chars()
        .all(|c| c.is_ascii_digit() || c == '.' || c == ',')
    {
        return None;
    }
    let decimal_comma = currency.map_or(false, |c| c.decimal_comma());
    let (int, frac, grouping) = split_decimal(mantissa, decimal_comma)?;
    let int = ungroup(int, grouping)?;
    if int.is_empty() && frac.map_or(true, str::is_empty) {
        return None;
    }
    if frac.map_or(false, |f| f.is_empty() || !f.bytes().all(|b| b.is_ascii_digit())) {
        return None;
    }

    let mut plain = String::with_capacity(mantissa.len() + 8);
    if negative {
        plain.push('-');
    }
    plain.push_str(if int.is_empty() { "0" } else { int.as_str() });
    if let Some(frac) = frac {
        plain.push('.');
        plain.push_str(frac);
    }
    if exponent != 0 {
        plain.push('e');
        plain.push_str(&exponent.to_string());
    }
    plain.parse().ok()
}

/// Determines which separator in `s` is the decimal point.
///
/// Returns the integer part, the fractional part if there is a decimal
/// point, and the grouping separator in use.
fn split_decimal(s: &str, decimal_comma: bool) -> Option<(&str, Option<&str>, char)> {
    let dots = s.matches('.').count();
    let commas = s.matches(',').count();
    let (decimal, grouping) = match (dots, commas) {
        (0, 0) => return Some((s, None, ',')),
        (_, 0) | (0, _) => {
            let sep = if dots > 0 { '.' } else { ',' };
            let (default_decimal, default_grouping) =
                if decimal_comma { (',', '.') } else { ('.', ',') };
            if sep == default_decimal {
                (default_decimal, default_grouping)
            } else {
                // A lone grouping separator not followed by a full group of
                // three is a decimal point written the other way.
                let count = if sep == '.' { dots } else { commas };
                let after = s.rsplit(sep).next().unwrap_or("");
                if count == 1 && after.len() != 3 {
                    (sep, default_decimal)
                } else {
                    (default_decimal, default_grouping)
                }
            }
        }
        _ => {
            let last_dot = s.rfind('.')?;
            let last_comma = s.rfind(',')?;
            if last_dot > last_comma {
                ('.', ',')
            } else {
                (',', '.')
            }
        }
    };
    match s.rfind(decimal) {
        Some(i) if s.matches(decimal).count() == 1 => {
            let (int, frac) = (&s[..i], &s[i + 1..]);
            if frac.contains(grouping) {
                return None;
            }
            Some((int, Some(frac), grouping))
        }
        Some(_) => None,
        None => Some((s, None, grouping)),
    }
}

/// Removes grouping separators from an integer part, checking that every
/// group after the first has exactly three digits.
fn ungroup(int: &str, grouping: char) -> Option<String> {
    if !int.contains(grouping) {
        return Some(int.to_owned());
    }
    let mut groups = int.split(grouping);
    let first = groups.next()?;
    if first.is_empty() || first.len() > 3 {
        return None;
    }
    let mut out = first.to_owned();
    for group in groups {
        if group.len() != 3 {
            return None;
        }
        out.push_str(group);
    }
    Some(out)
}

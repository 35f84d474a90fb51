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

//! Currency metadata and the lookup interface the parser and the
//! serializers resolve currencies through.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::LazyLock;

/// A named subdivision of a currency, such as the US cent or the satoshi.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct FractionalUnit {
    name: &'static str,
    symbol: Option<&'static str>,
    scale: u32,
}

impl FractionalUnit {
    /// Describes a unit worth 10<sup>-`scale`</sup> of its currency.
    pub const fn new(name: &'static str, symbol: Option<&'static str>, scale: u32) -> FractionalUnit {
        FractionalUnit {
            name,
            symbol,
            scale,
        }
    }

    /// The unit's name, e.g. `"sat"`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The unit's symbol, e.g. `"¢"`, if it has one.
    pub fn symbol(&self) -> Option<&'static str> {
        self.symbol
    }

    /// The scale at which one unit is one minor unit.
    pub fn scale(&self) -> u32 {
        self.scale
    }
}

/// A currency.
///
/// Currencies are plain values: two currencies are equal when their codes
/// are equal, or, for currencies without a code, when their names are.
/// The crate never mutates a currency; it only reads the canonical
/// [scale](Currency::scale) and uses the rest for lookup and display.
#[derive(Clone, Copy)]
pub struct Currency {
    code: &'static str,
    name: &'static str,
    scale: u32,
    symbol: Option<&'static str>,
    fractional_units: &'static [FractionalUnit],
    decimal_comma: bool,
}

impl Currency {
    /// Constructs a currency with no symbol and no fractional units.
    pub const fn new(code: &'static str, name: &'static str, scale: u32) -> Currency {
        Currency {
            code,
            name,
            scale,
            symbol: None,
            fractional_units: &[],
            decimal_comma: false,
        }
    }

    /// Sets the currency's symbol.
    pub const fn with_symbol(mut self, symbol: &'static str) -> Currency {
        self.symbol = Some(symbol);
        self
    }

    /// Sets the currency's named subdivisions.
    pub const fn with_fractional_units(mut self, units: &'static [FractionalUnit]) -> Currency {
        self.fractional_units = units;
        self
    }

    /// Marks the currency as conventionally written with `,` as the
    /// decimal point and `.` as the grouping separator.
    pub const fn with_decimal_comma(mut self) -> Currency {
        self.decimal_comma = true;
        self
    }

    /// The ISO 4217 (or de facto) code, e.g. `"USD"`.
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// The human-readable name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The canonical scale: the number of digits of the minor unit.
    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// The currency's symbol, if any.
    pub fn symbol(&self) -> Option<&'static str> {
        self.symbol
    }

    /// The currency's named subdivisions.
    pub fn fractional_units(&self) -> &'static [FractionalUnit] {
        self.fractional_units
    }

    /// Reports whether amounts in this currency conventionally use `,` as
    /// the decimal point.
    pub fn decimal_comma(&self) -> bool {
        self.decimal_comma
    }

    fn identity(&self) -> &'static str {
        if self.code.is_empty() {
            self.name
        } else {
            self.code
        }
    }
}

impl PartialEq for Currency {
    fn eq(&self, other: &Currency) -> bool {
        if self.code.is_empty() || other.code.is_empty() {
            self.code.is_empty() && other.code.is_empty() && self.name == other.name
        } else {
            self.code == other.code
        }
    }
}

impl Eq for Currency {}

impl Hash for Currency {
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        self.code.is_empty().hash(state);
        self.identity().hash(state);
    }
}

impl fmt::Debug for Currency {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Currency({})", self.identity())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.identity())
    }
}

/// The currency and scale implied by a fractional-unit symbol or name.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct FractionalUnitInfo {
    /// The currency the unit subdivides.
    pub currency: Currency,
    /// The scale at which one unit is one minor unit.
    pub scale: u32,
}

/// A read-only source of currency metadata.
///
/// The parser and the serializers are generic over this trait so that
/// callers can supply their own table. [`Currencies::builtin`] provides a
/// table covering the major ISO currencies plus bitcoin and ether.
pub trait CurrencyLookup {
    /// Finds the currency with the given code. Matching is
    /// case-insensitive.
    fn lookup(&self, code: &str) -> Option<Currency>;

    /// Finds the primary currency for a symbol. Symbols shared by several
    /// currencies resolve to a single one by priority.
    fn primary_for_symbol(&self, symbol: &str) -> Option<Currency>;

    /// Finds the currency and scale of a fractional-unit symbol such as
    /// `"¢"`.
    fn fractional_unit_info(&self, symbol: &str) -> Option<FractionalUnitInfo>;

    /// Finds the currency and scale of a named unit such as `"sat"`.
    /// Matching is case-insensitive.
    fn unit_by_name(&self, name: &str) -> Option<FractionalUnitInfo>;

    /// Every currency symbol, longest first.
    fn symbols(&self) -> &[&'static str];

    /// Every fractional-unit symbol, longest first.
    fn fractional_symbols(&self) -> &[&'static str];
}

/// A currency table indexed for lookup by code, symbol and unit.
#[derive(Debug, Clone)]
pub struct Currencies {
    by_code: HashMap<String, Currency>,
    by_symbol: HashMap<&'static str, Currency>,
    by_fractional_symbol: HashMap<&'static str, FractionalUnitInfo>,
    by_unit_name: HashMap<String, FractionalUnitInfo>,
    symbols: Vec<&'static str>,
    fractional_symbols: Vec<&'static str>,
}

impl Currencies {
    /// Indexes `currencies`.
    ///
    /// The order of the input sets symbol priority: when several currencies
    /// share a symbol, the first one listed becomes its primary currency.
    pub fn new<I>(currencies: I) -> Currencies
    where
        I: IntoIterator<Item = Currency>,
    {
        let mut table = Currencies {
            by_code: HashMap::new(),
            by_symbol: HashMap::new(),
            by_fractional_symbol: HashMap::new(),
            by_unit_name: HashMap::new(),
            symbols: vec![],
            fractional_symbols: vec![],
        };
        for currency in currencies {
            table
                .by_code
                .entry(currency.code.to_ascii_uppercase())
                .or_insert(currency);
            if let Some(symbol) = currency.symbol {
                if !table.by_symbol.contains_key(symbol) {
                    table.by_symbol.insert(symbol, currency);
                    table.symbols.push(symbol);
                }
            }
            for unit in currency.fractional_units {
                let info = FractionalUnitInfo {
                    currency,
                    scale: unit.scale,
                };
                table
                    .by_unit_name
                    .entry(unit.name.to_ascii_lowercase())
                    .or_insert(info);
                if let Some(symbol) = unit.symbol {
                    if !table.by_fractional_symbol.contains_key(symbol) {
                        table.by_fractional_symbol.insert(symbol, info);
                        table.fractional_symbols.push(symbol);
                    }
                }
            }
        }
        // Stable, so symbols of equal length keep their priority order.
        table
            .symbols
            .sort_by_key(|s| std::cmp::Reverse(s.chars().count()));
        table
            .fractional_symbols
            .sort_by_key(|s| std::cmp::Reverse(s.chars().count()));
        table
    }

    /// Returns the process-wide builtin table.
    pub fn builtin() -> &'static Currencies {
        &BUILTIN
    }

    /// Iterates over the currencies in the table, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Currency> {
        self.by_code.values()
    }
}

impl CurrencyLookup for Currencies {
    fn lookup(&self, code: &str) -> Option<Currency> {
        self.by_code.get(&code.to_ascii_uppercase()).copied()
    }

    fn primary_for_symbol(&self, symbol: &str) -> Option<Currency> {
        self.by_symbol.get(symbol).copied()
    }

    fn fractional_unit_info(&self, symbol: &str) -> Option<FractionalUnitInfo> {
        self.by_fractional_symbol.get(symbol).copied()
    }

    fn unit_by_name(&self, name: &str) -> Option<FractionalUnitInfo> {
        self.by_unit_name.get(&name.to_ascii_lowercase()).copied()
    }

    fn symbols(&self) -> &[&'static str] {
        &self.symbols
    }

    fn fractional_symbols(&self) -> &[&'static str] {
        &self.fractional_symbols
    }
}

const USD_UNITS: &[FractionalUnit] = &[FractionalUnit::new("cent", Some("¢"), 2)];
const GBP_UNITS: &[FractionalUnit] = &[FractionalUnit::new("penny", Some("p"), 2)];
const BTC_SCALE: u32 = 8;
const BTC_UNITS: &[FractionalUnit] = &[
    FractionalUnit::new("sat", Some("§"), BTC_SCALE),
    FractionalUnit::new("bit", None, BTC_SCALE - 2),
    FractionalUnit::new("msat", None, BTC_SCALE + 4),
];
const ETH_UNITS: &[FractionalUnit] = &[
    FractionalUnit::new("wei", None, 18),
    FractionalUnit::new("kwei", None, 15),
    FractionalUnit::new("mwei", None, 12),
    FractionalUnit::new("gwei", None, 9),
];

/// United States dollar.
pub const USD: Currency = Currency::new("USD", "US Dollar", 2)
    .with_symbol("$")
    .with_fractional_units(USD_UNITS);
/// Euro.
pub const EUR: Currency = Currency::new("EUR", "Euro", 2)
    .with_symbol("€")
    .with_decimal_comma();
/// Japanese yen.
pub const JPY: Currency = Currency::new("JPY", "Japanese Yen", 0).with_symbol("¥");
/// Pound sterling.
pub const GBP: Currency = Currency::new("GBP", "Pound Sterling", 2)
    .with_symbol("£")
    .with_fractional_units(GBP_UNITS);
/// Chinese yuan.
pub const CNY: Currency = Currency::new("CNY", "Yuan Renminbi", 2).with_symbol("¥");
/// Australian dollar.
pub const AUD: Currency = Currency::new("AUD", "Australian Dollar", 2).with_symbol("A$");
/// Canadian dollar.
pub const CAD: Currency = Currency::new("CAD", "Canadian Dollar", 2).with_symbol("CA$");
/// Swiss franc.
pub const CHF: Currency = Currency::new("CHF", "Swiss Franc", 2).with_symbol("Fr.");
/// Hong Kong dollar.
pub const HKD: Currency = Currency::new("HKD", "Hong Kong Dollar", 2).with_symbol("HK$");
/// Singapore dollar.
pub const SGD: Currency = Currency::new("SGD", "Singapore Dollar", 2).with_symbol("S$");
/// Swedish krona.
pub const SEK: Currency = Currency::new("SEK", "Swedish Krona", 2)
    .with_symbol("kr")
    .with_decimal_comma();
/// South Korean won.
pub const KRW: Currency = Currency::new("KRW", "Won", 0).with_symbol("₩");
/// Norwegian krone.
pub const NOK: Currency = Currency::new("NOK", "Norwegian Krone", 2)
    .with_symbol("kr")
    .with_decimal_comma();
/// New Zealand dollar.
pub const NZD: Currency = Currency::new("NZD", "New Zealand Dollar", 2).with_symbol("NZ$");
/// Indian rupee.
pub const INR: Currency = Currency::new("INR", "Indian Rupee", 2).with_symbol("₹");
/// Mexican peso.
pub const MXN: Currency = Currency::new("MXN", "Mexican Peso", 2).with_symbol("MX$");
/// New Taiwan dollar.
pub const TWD: Currency = Currency::new("TWD", "New Taiwan Dollar", 2).with_symbol("NT$");
/// South African rand.
pub const ZAR: Currency = Currency::new("ZAR", "Rand", 2).with_symbol("R");
/// Brazilian real.
pub const BRL: Currency = Currency::new("BRL", "Brazilian Real", 2)
    .with_symbol("R$")
    .with_decimal_comma();
/// Danish krone.
pub const DKK: Currency = Currency::new("DKK", "Danish Krone", 2)
    .with_symbol("kr")
    .with_decimal_comma();
/// Polish złoty.
pub const PLN: Currency = Currency::new("PLN", "Zloty", 2)
    .with_symbol("zł")
    .with_decimal_comma();
/// Thai baht.
pub const THB: Currency = Currency::new("THB", "Baht", 2).with_symbol("฿");
/// Israeli new shekel.
pub const ILS: Currency = Currency::new("ILS", "New Israeli Sheqel", 2).with_symbol("₪");
/// Indonesian rupiah.
pub const IDR: Currency = Currency::new("IDR", "Rupiah", 2)
    .with_symbol("Rp")
    .with_decimal_comma();
/// Czech koruna.
pub const CZK: Currency = Currency::new("CZK", "Czech Koruna", 2)
    .with_symbol("Kč")
    .with_decimal_comma();
/// Turkish lira.
pub const TRY: Currency = Currency::new("TRY", "Turkish Lira", 2)
    .with_symbol("₺")
    .with_decimal_comma();
/// Hungarian forint.
pub const HUF: Currency = Currency::new("HUF", "Forint", 2)
    .with_symbol("Ft")
    .with_decimal_comma();
/// Russian ruble.
pub const RUB: Currency = Currency::new("RUB", "Russian Ruble", 2)
    .with_symbol("₽")
    .with_decimal_comma();
/// Bitcoin.
pub const BTC: Currency = Currency::new("BTC", "Bitcoin", BTC_SCALE)
    .with_symbol("₿")
    .with_fractional_units(BTC_UNITS);
/// Ether.
pub const ETH: Currency = Currency::new("ETH", "Ether", 18)
    .with_symbol("Ξ")
    .with_fractional_units(ETH_UNITS);

/// Builtin currencies in symbol-priority order, roughly by global trading
/// volume.
const BUILTIN_CURRENCIES: &[Currency] = &[
    USD, EUR, JPY, GBP, CNY, AUD, CAD, CHF, HKD, SGD, SEK, KRW, NOK, NZD, INR, MXN, TWD, ZAR, BRL,
    DKK, PLN, THB, ILS, IDR, CZK, TRY, HUF, RUB, BTC, ETH,
];

static BUILTIN: LazyLock<Currencies> =
    LazyLock::new(|| Currencies::new(BUILTIN_CURRENCIES.iter().copied()));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_priority() {
        let table = Currencies::builtin();
        assert_eq!(table.primary_for_symbol("¥"), Some(JPY));
        assert_eq!(table.primary_for_symbol("kr"), Some(SEK));
        assert_eq!(table.primary_for_symbol("$"), Some(USD));
        assert_eq!(table.primary_for_symbol("?"), None);
    }

    #[test]
    fn test_symbols_longest_first() {
        let symbols = Currencies::builtin().symbols();
        let lengths: Vec<usize> = symbols.iter().map(|s| s.chars().count()).collect();
        let mut sorted = lengths.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(lengths, sorted);
        let r = symbols.iter().position(|s| *s == "R").unwrap();
        let rs = symbols.iter().position(|s| *s == "R$").unwrap();
        assert!(rs < r);
    }

    #[test]
    fn test_units() {
        let table = Currencies::builtin();
        let sat = table.unit_by_name("SAT").unwrap();
        assert_eq!((sat.currency, sat.scale), (BTC, 8));
        let msat = table.unit_by_name("msat").unwrap();
        assert_eq!((msat.currency, msat.scale), (BTC, BTC.scale() + 4));
        let cent = table.fractional_unit_info("¢").unwrap();
        assert_eq!((cent.currency, cent.scale), (USD, 2));
        assert_eq!(table.lookup("usd"), Some(USD));
    }

    #[test]
    fn test_equality_by_name_without_code() {
        let a = Currency::new("", "Loyalty Points", 0);
        let b = Currency::new("", "Loyalty Points", 2);
        let c = Currency::new("", "Air Miles", 0);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, USD);
    }
}

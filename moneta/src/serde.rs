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

//! Serialization of the crate's value types.
//!
//! Decimals serialize as strings so that trailing zeros survive, e.g.
//! `"100.50"`. Fractions serialize as a `{p, q}` struct of integer strings
//! with the sign on `p`. Money serializes as `{currency, amount}`, where
//! `currency` is the code and `amount` is either of the above.

use std::fmt;

use ::serde::de::{self, Deserializer, Visitor};
use ::serde::ser::Serializer;
use ::serde::{Deserialize, Serialize};
use num_bigint::BigInt;

use crate::currency::{Currencies, CurrencyLookup};
use crate::money::{Amount, Money};
use crate::rational::Rational;
use crate::scaled::{DecimalString, ScaledDecimal};

impl Serialize for ScaledDecimal {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

struct ScaledDecimalVisitor;

impl<'de> Visitor<'de> for ScaledDecimalVisitor {
    type Value = ScaledDecimal;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a decimal string")
    }

    fn visit_str<E>(self, v: &str) -> Result<ScaledDecimal, E>
    where
        E: de::Error,
    {
        v.parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for ScaledDecimal {
    fn deserialize<D>(deserializer: D) -> Result<ScaledDecimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(ScaledDecimalVisitor)
    }
}

impl Serialize for DecimalString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DecimalString {
    fn deserialize<D>(deserializer: D) -> Result<DecimalString, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        DecimalString::new(s).map_err(de::Error::custom)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename = "Rational")]
struct RationalRepr {
    p: String,
    q: String,
}

impl RationalRepr {
    fn into_rational<E>(self) -> Result<Rational, E>
    where
        E: de::Error,
    {
        let p: BigInt = self.p.parse().map_err(E::custom)?;
        let q: BigInt = self.q.parse().map_err(E::custom)?;
        Rational::new(p, q).map_err(E::custom)
    }
}

impl<'a> From<&'a Rational> for RationalRepr {
    fn from(r: &'a Rational) -> RationalRepr {
        let r = r.normalize_sign();
        RationalRepr {
            p: r.numer().to_string(),
            q: r.denom().to_string(),
        }
    }
}

impl Serialize for Rational {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        RationalRepr::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Rational {
    fn deserialize<D>(deserializer: D) -> Result<Rational, D::Error>
    where
        D: Deserializer<'de>,
    {
        RationalRepr::deserialize(deserializer)?.into_rational()
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Amount::Scaled(d) => d.serialize(serializer),
            Amount::Rational(r) => r.serialize(serializer),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AmountRepr {
    Scaled(ScaledDecimal),
    Rational(RationalRepr),
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Amount, D::Error>
    where
        D: Deserializer<'de>,
    {
        match AmountRepr::deserialize(deserializer)? {
            AmountRepr::Scaled(d) => Ok(Amount::Scaled(d)),
            AmountRepr::Rational(r) => Ok(Amount::Rational(r.into_rational()?)),
        }
    }
}

#[derive(Serialize)]
#[serde(rename = "Money")]
struct MoneyRef<'a> {
    currency: String,
    amount: &'a Amount,
}

#[derive(Deserialize)]
#[serde(rename = "Money")]
struct MoneyRepr {
    currency: String,
    amount: Amount,
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        MoneyRef {
            currency: self.currency().to_string(),
            amount: self.amount(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Money, D::Error>
    where
        D: Deserializer<'de>,
    {
        let repr = MoneyRepr::deserialize(deserializer)?;
        let currency = Currencies::builtin().lookup(&repr.currency).ok_or_else(|| {
            <D::Error as de::Error>::custom(format!("unknown currency code {:?}", repr.currency))
        })?;
        Ok(Money::from_amount(currency, repr.amount))
    }
}

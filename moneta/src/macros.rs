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

#[macro_export]
/// A macro to construct a [`ScaledDecimal`] from a literal.
/// Converts the input tokens to a string, and then parses the string into a
/// [`ScaledDecimal`], keeping every written digit, trailing zeros included.
/// Panics if the provided input is not a valid decimal literal.
///
/// [`ScaledDecimal`]: crate::ScaledDecimal
///
/// # Examples:
/// ```
/// use moneta::scaled;
///
/// assert_eq!(scaled!(1.50).scale(), 2);
/// assert!(scaled!(0).is_zero());
/// assert!(scaled!(-0.1).is_negative());
/// ```
macro_rules! scaled {
    ($l:expr) => {
        <$crate::ScaledDecimal as ::std::str::FromStr>::from_str(stringify!($l))
            .unwrap_or_else(|e| panic!("{}", e.to_string()))
    };
}

#[macro_export]
/// A macro to construct a [`Money`] from a currency code and a literal.
/// The code is resolved through the builtin currency table.
/// Panics if the code is unknown or the amount is not a valid decimal
/// literal.
///
/// [`Money`]: crate::Money
///
/// # Examples:
/// ```
/// use moneta::money;
///
/// assert_eq!(money!(USD 100.50).to_string(), "USD 100.50");
/// assert!(money!(EUR -3).is_negative());
/// ```
macro_rules! money {
    ($code:ident $l:expr) => {
        $crate::Money::from_parts(stringify!($code), stringify!($l))
            .unwrap_or_else(|e| panic!("{}", e.to_string()))
    };
}

//! Amount type for monetary values typed by hand into a chat message.
//!
//! People type `1500`, `12.50` or `12,50` interchangeably. The spreadsheet uses a locale with a
//! comma as its decimal separator, so an `Amount` always displays with a comma regardless of which
//! separator it was parsed from.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// The decimal separator expected by the spreadsheet locale.
const SHEET_DECIMAL_SEPARATOR: &str = ",";

/// Represents a monetary amount.
///
/// # Examples
///
/// Either separator is accepted, the display form always uses a comma:
/// ```
/// # use finbot::model::Amount;
/// # use std::str::FromStr;
/// let dot = Amount::from_str("12.50").unwrap();
/// let comma = Amount::from_str("12,50").unwrap();
/// assert_eq!(dot, comma);
/// assert_eq!(dot.to_string(), "12,50");
/// ```
///
/// Whole numbers are left alone:
/// ```
/// # use finbot::model::Amount;
/// # use std::str::FromStr;
/// assert_eq!(Amount::from_str("1500").unwrap().to_string(), "1500");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount {
    value: Decimal,
}

impl Amount {
    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.value
    }
}

/// An error that can occur when parsing a string into an `Amount`.
pub struct AmountError {
    input: String,
    source: Option<rust_decimal::Error>,
}

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "AmountError({:?}, {:?})", self.input, self.source)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a number", self.input)
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source.as_ref().map(|e| e as &(dyn Error + 'static))
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let err = |source| AmountError {
            input: trimmed.to_string(),
            source,
        };

        // Unlike amounts exported from a sheet, an empty amount in a message is a mistake.
        if trimmed.is_empty() {
            return Err(err(None));
        }

        // Only one decimal separator is allowed, and thousands separators are not supported since
        // `,` is ambiguous between the two. `Decimal` would also skip `_` as a digit separator.
        let separators = trimmed.chars().filter(|c| *c == '.' || *c == ',').count();
        if separators > 1 || trimmed.contains('_') {
            return Err(err(None));
        }

        // The amount is written back as typed, so digits that do not fit are an error, not rounded.
        let normalized = trimmed.replace(',', ".");
        let value = Decimal::from_str_exact(&normalized).map_err(|e| err(Some(e)))?;
        Ok(Amount { value })
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value.to_string().replace('.', SHEET_DECIMAL_SEPARATOR))
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount { value }
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

//! Monetary amounts for component costs.
//!
//! Amounts are held in minor units (cents) so equality and sums are exact.
//! The JSON form is `{"amount": 45.99, "currency": "USD"}`.

use std::borrow::Cow;
use std::fmt;

use schemars::{JsonSchema, Schema, SchemaGenerator, json_schema};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

const MINOR_PER_MAJOR: u64 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    #[error("{0} not found for monetary amount.")]
    MissingField(&'static str),

    #[error("Invalid numeric value for 'amount' field: {0}")]
    InvalidAmount(String),

    #[error("Invalid currency code: {0}")]
    InvalidCurrency(String),
}

/// An amount of money in a single ISO 4217 currency.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Money {
    minor_units: i64,
    currency: String,
}

impl Money {
    /// # Errors
    ///
    /// Returns `MoneyError::InvalidCurrency` unless `currency` is three
    /// uppercase ASCII letters.
    pub fn from_minor(minor_units: i64, currency: &str) -> Result<Self, MoneyError> {
        if currency.len() != 3 || !currency.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(MoneyError::InvalidCurrency(currency.to_string()));
        }
        Ok(Self {
            minor_units,
            currency: currency.to_string(),
        })
    }

    /// Build from a decimal amount, rounded to the nearest cent.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::InvalidAmount` for non-finite amounts or amounts
    /// whose cents do not fit in an `i64`, and `MoneyError::InvalidCurrency`
    /// for bad currency codes.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn from_decimal(amount: f64, currency: &str) -> Result<Self, MoneyError> {
        // -2^63 is exact in f64; i64::MAX rounds up to 2^63.
        const LOWER: f64 = i64::MIN as f64;
        let cents = (amount * 100.0).round();
        if !cents.is_finite() || cents < LOWER || cents >= -LOWER {
            return Err(MoneyError::InvalidAmount(amount.to_string()));
        }
        Self::from_minor(cents as i64, currency)
    }

    #[must_use]
    pub const fn minor_units(&self) -> i64 {
        self.minor_units
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn amount(&self) -> f64 {
        self.minor_units as f64 / 100.0
    }

    #[must_use]
    pub fn currency(&self) -> &str {
        &self.currency
    }

    #[must_use]
    pub const fn is_non_negative(&self) -> bool {
        self.minor_units >= 0
    }

    /// # Errors
    ///
    /// Returns `MoneyError` describing the first problem found.
    pub fn from_json(json: &Value) -> Result<Self, MoneyError> {
        let amount_node = json
            .get("amount")
            .ok_or(MoneyError::MissingField("amount"))?;
        let amount = amount_node
            .as_f64()
            .ok_or_else(|| MoneyError::InvalidAmount(amount_node.to_string()))?;
        let currency_node = json
            .get("currency")
            .ok_or(MoneyError::MissingField("currency"))?;
        let currency = currency_node
            .as_str()
            .ok_or_else(|| MoneyError::InvalidCurrency(currency_node.to_string()))?;
        Self::from_decimal(amount, currency)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.minor_units < 0 { "-" } else { "" };
        let abs = self.minor_units.unsigned_abs();
        write!(
            f,
            "{sign}{}.{:02} {}",
            abs / MINOR_PER_MAJOR,
            abs % MINOR_PER_MAJOR,
            self.currency
        )
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("amount", &self.amount())?;
        map.serialize_entry("currency", &self.currency)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = Value::deserialize(deserializer)?;
        Self::from_json(&json).map_err(serde::de::Error::custom)
    }
}

impl JsonSchema for Money {
    fn schema_name() -> Cow<'static, str> {
        "Money".into()
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": "object",
            "properties": {
                "amount": { "type": "number" },
                "currency": { "type": "string", "pattern": "^[A-Z]{3}$" }
            },
            "required": ["amount", "currency"]
        })
    }
}

//! Row-to-entity parsing helpers.
//!
//! Quantities are stored as JSON text using the storage form of
//! [`QuantityCodec`], which keeps the scale. Money, rifling, and zeroing are
//! stored as their plain serde JSON.

use chrono::NaiveDate;
use loaddev_core::quantity::{Dimension, Quantity, QuantityCodec};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::DatabaseError;

/// Read a nullable TEXT column. Returns `None` for both SQL NULL and empty string.
///
/// `row.get::<String>(idx)` on a NULL column returns an error, not `""`.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    match row.get::<Option<String>>(idx)? {
        Some(s) if s.is_empty() => Ok(None),
        other => Ok(other),
    }
}

/// Encode a quantity for a TEXT column.
#[must_use]
pub fn quantity_column<D: Dimension>(quantity: &Quantity<D>) -> String {
    QuantityCodec::STORAGE.encode_to_string(quantity)
}

/// Encode an optional quantity for a nullable TEXT column.
#[must_use]
pub fn opt_quantity_column<D: Dimension>(quantity: Option<&Quantity<D>>) -> Option<String> {
    quantity.map(quantity_column)
}

/// Read a required quantity column.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the column is NULL or not a valid quantity.
pub fn get_quantity<D: Dimension>(
    row: &libsql::Row,
    idx: i32,
) -> Result<Quantity<D>, DatabaseError> {
    let text = row.get::<String>(idx)?;
    parse_quantity(&text)
}

/// Read a nullable quantity column.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty value is not a valid quantity.
pub fn get_opt_quantity<D: Dimension>(
    row: &libsql::Row,
    idx: i32,
) -> Result<Option<Quantity<D>>, DatabaseError> {
    get_opt_string(row, idx)?
        .map(|text| parse_quantity(&text))
        .transpose()
}

/// # Errors
///
/// Returns `DatabaseError::Query` if `text` is not a valid stored quantity.
pub fn parse_quantity<D: Dimension>(text: &str) -> Result<Quantity<D>, DatabaseError> {
    QuantityCodec::STORAGE
        .decode_str(text)
        .map_err(|e| DatabaseError::Query(format!("Invalid quantity in column '{text}': {e}")))
}

/// Serialize any value to a JSON TEXT column.
///
/// # Errors
///
/// Returns `DatabaseError::Other` if serialization fails.
pub fn json_column<T: Serialize>(value: &T) -> Result<String, DatabaseError> {
    serde_json::to_string(value).map_err(|e| DatabaseError::Other(e.into()))
}

/// Serialize an optional value to a nullable JSON TEXT column.
///
/// # Errors
///
/// Returns `DatabaseError::Other` if serialization fails.
pub fn opt_json_column<T: Serialize>(value: Option<&T>) -> Result<Option<String>, DatabaseError> {
    value.map(json_column).transpose()
}

/// Read a required JSON TEXT column.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the column is NULL or holds invalid JSON.
pub fn get_json<T: DeserializeOwned>(row: &libsql::Row, idx: i32) -> Result<T, DatabaseError> {
    let text = row.get::<String>(idx)?;
    serde_json::from_str(&text)
        .map_err(|e| DatabaseError::Query(format!("Invalid JSON in column: {e}")))
}

/// Read a nullable JSON TEXT column.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty value holds invalid JSON.
pub fn get_opt_json<T: DeserializeOwned>(
    row: &libsql::Row,
    idx: i32,
) -> Result<Option<T>, DatabaseError> {
    get_opt_string(row, idx)?
        .map(|text| {
            serde_json::from_str(&text)
                .map_err(|e| DatabaseError::Query(format!("Invalid JSON in column: {e}")))
        })
        .transpose()
}

/// Parse a TEXT column into a serde-deserializable enum.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string does not match any enum variant.
pub fn parse_enum<T: DeserializeOwned>(s: &str) -> Result<T, DatabaseError> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|e| DatabaseError::Query(format!("Failed to parse enum from '{s}': {e}")))
}

/// Parse an ISO `YYYY-MM-DD` date column.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string is not a valid date.
pub fn parse_date(s: &str) -> Result<NaiveDate, DatabaseError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| DatabaseError::Query(format!("Failed to parse date '{s}': {e}")))
}

/// Turn free text into an FTS5 query that matches every term as a prefix.
///
/// Each whitespace-separated term is quoted so punctuation like `6.5` or
/// `BR-2` is never read as FTS5 syntax. Returns `None` for blank input.
#[must_use]
pub fn fts_query(input: &str) -> Option<String> {
    let terms: Vec<String> = input
        .split_whitespace()
        .map(|term| format!("\"{}\"*", term.replace('"', "\"\"")))
        .collect();
    if terms.is_empty() {
        None
    } else {
        Some(terms.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use loaddev_core::quantity::{Length, Scale, Unit};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn quantity_column_keeps_scale() {
        let q = Quantity::<Length>::with_scale(0.02, Unit::Inch, Scale::Relative).unwrap();
        let text = quantity_column(&q);
        assert!(text.contains("\"scale\":\"RELATIVE\""));
        let back: Quantity<Length> = parse_quantity(&text).unwrap();
        assert_eq!(back, q);
    }

    #[test]
    fn bad_quantity_column_is_query_error() {
        let err = parse_quantity::<Length>(r#"{"value": 1}"#).unwrap_err();
        assert!(matches!(err, DatabaseError::Query(_)));
        assert!(err.to_string().contains("unit not found"));
    }

    #[test]
    fn fts_query_quotes_terms() {
        assert_eq!(fts_query("  "), None);
        assert_eq!(fts_query("hornady"), Some("\"hornady\"*".into()));
        assert_eq!(fts_query("6.5 BR-2"), Some("\"6.5\"* \"BR-2\"*".into()));
        assert_eq!(fts_query("a\"b"), Some("\"a\"\"b\"*".into()));
    }

    #[test]
    fn parse_date_iso() {
        assert_eq!(
            parse_date("2024-09-14").unwrap(),
            NaiveDate::from_ymd_opt(2024, 9, 14).unwrap()
        );
        assert!(parse_date("14/09/2024").is_err());
    }
}

//! Field-level validation for entities received from clients.
//!
//! Each entity implements [`Validate`] by feeding its fields through a
//! [`Validator`], which collects every failure instead of stopping at the
//! first. The rendered form is what HTTP clients see in a 400 body:
//!
//! ```text
//! name: Name is required (rejected value: ); bulletWeight: Bullet weight must be positive (rejected value: -1 [gr])
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::quantity::{Dimension, Quantity, Unit};

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    /// Display form of the rejected value, `None` when the value was absent.
    pub rejected: Option<String>,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} (rejected value: {})",
            self.field,
            self.message,
            self.rejected.as_deref().unwrap_or("null")
        )
    }
}

/// All field errors found on one entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn fields(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.field.as_str()).collect()
    }

    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Implemented by every entity accepted from a client.
pub trait Validate {
    /// # Errors
    ///
    /// Returns every field that failed validation.
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Accumulates field errors.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reject(&mut self, field: &str, message: &str, rejected: Option<String>) -> &mut Self {
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.to_string(),
            rejected,
        });
        self
    }

    /// Text must contain something other than whitespace.
    pub fn not_blank(&mut self, field: &str, value: &str, message: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.reject(field, message, Some(value.to_string()));
        }
        self
    }

    /// Optional id must be present.
    pub fn not_null<T: fmt::Display>(
        &mut self,
        field: &str,
        value: Option<T>,
        message: &str,
    ) -> &mut Self {
        if value.is_none() {
            self.reject(field, message, None);
        }
        self
    }

    /// Quantity, when present, must be strictly greater than zero.
    pub fn positive<D: Dimension>(
        &mut self,
        field: &str,
        value: Option<&Quantity<D>>,
        message: &str,
    ) -> &mut Self {
        if let Some(q) = value
            && !q.is_positive()
        {
            self.reject(field, message, Some(q.to_string()));
        }
        self
    }

    /// Quantity, when present, must fall within `[min, max]` once expressed in `unit`.
    pub fn within<D: Dimension>(
        &mut self,
        field: &str,
        value: Option<&Quantity<D>>,
        unit: Unit,
        (min, max): (f64, f64),
        message: &str,
    ) -> &mut Self {
        if let Some(q) = value {
            let converted = q.value_in(unit);
            if converted < min || converted > max {
                self.reject(field, &format!("{message}, got: {q}"), Some(q.to_string()));
            }
        }
        self
    }

    pub fn positive_count(&mut self, field: &str, value: i64, message: &str) -> &mut Self {
        if value <= 0 {
            self.reject(field, message, Some(value.to_string()));
        }
        self
    }

    pub fn non_negative_money(&mut self, field: &str, value: &Money, message: &str) -> &mut Self {
        if !value.is_non_negative() {
            self.reject(field, message, Some(value.to_string()));
        }
        self
    }

    /// # Errors
    ///
    /// Returns the collected errors if any were recorded.
    pub fn finish(&mut self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors {
                errors: std::mem::take(&mut self.errors),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::quantity::Length;

    #[test]
    fn collects_all_errors_in_order() {
        let negative = Quantity::<Length>::new(-1.0, Unit::Inch).unwrap();
        let err = Validator::new()
            .not_blank("name", " ", "Name is required")
            .positive("barrelLength", Some(&negative), "Barrel length must be positive")
            .not_null::<i64>("loadId", None, "Load ID is required")
            .finish()
            .unwrap_err();

        assert_eq!(err.fields(), vec!["name", "barrelLength", "loadId"]);
        assert_eq!(
            err.to_string(),
            "name: Name is required (rejected value:  ); \
             barrelLength: Barrel length must be positive (rejected value: -1 [in_i]); \
             loadId: Load ID is required (rejected value: null)"
        );
    }

    #[test]
    fn range_checks_after_conversion() {
        let metres = Quantity::<Length>::new(100.0, Unit::Metre).unwrap();
        assert!(
            Validator::new()
                .within("targetRange", Some(&metres), Unit::Yard, (10.0, 2000.0), "out")
                .finish()
                .is_ok()
        );

        let too_close = Quantity::<Length>::new(2.0, Unit::Metre).unwrap();
        assert!(
            Validator::new()
                .within("targetRange", Some(&too_close), Unit::Yard, (10.0, 2000.0), "out")
                .finish()
                .is_err()
        );
    }

    #[test]
    fn absent_optional_values_pass() {
        assert!(
            Validator::new()
                .positive::<Length>("groupSize", None, "must be positive")
                .within::<Length>("groupSize", None, Unit::Inch, (0.01, 50.0), "range")
                .finish()
                .is_ok()
        );
    }
}

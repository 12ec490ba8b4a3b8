//! Physical quantities with UCUM units.
//!
//! A [`Quantity`] pairs a numeric value with a [`Unit`] and a [`Scale`]. The
//! dimension (length, mass, speed) is carried in the type parameter so a
//! muzzle velocity can never be stored in a bullet weight column.
//!
//! JSON encoding goes through [`QuantityCodec`]. The API form omits the scale;
//! the storage form keeps it:
//!
//! ```text
//! {"value": 26.0, "unit": "[in_i]"}                        // API
//! {"value": 26.0, "unit": "[in_i]", "scale": "ABSOLUTE"}   // storage
//! ```

use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;

use schemars::{JsonSchema, Schema, SchemaGenerator, json_schema};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors raised while decoding or constructing a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantityError {
    #[error("{0} not found for quantity type.")]
    MissingField(&'static str),

    #[error("Invalid numeric value for 'value' field: {0}")]
    InvalidValue(String),

    #[error("Invalid unit value: {0}")]
    InvalidUnit(String),

    #[error("Invalid scale '{0}'. Expected ABSOLUTE or RELATIVE")]
    InvalidScale(String),

    #[error("Unit '{unit}' is not a {expected} unit")]
    DimensionMismatch {
        unit: &'static str,
        expected: &'static str,
    },

    #[error("Quantity must be a JSON object, got: {0}")]
    NotAnObject(String),
}

// ---------------------------------------------------------------------------
// Dimensions
// ---------------------------------------------------------------------------

/// Physical dimension of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DimensionKind {
    Length,
    Mass,
    Speed,
}

impl DimensionKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Length => "length",
            Self::Mass => "mass",
            Self::Speed => "speed",
        }
    }
}

impl fmt::Display for DimensionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type-level marker for a quantity's dimension.
pub trait Dimension: 'static {
    const KIND: DimensionKind;
    /// Unit used when a value has to be expressed without a caller preference.
    const DEFAULT_UNIT: Unit;
}

/// Barrel lengths, seating depths, distances, group sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Length {}

/// Bullet weights and powder charges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mass {}

/// Muzzle velocities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speed {}

impl Dimension for Length {
    const KIND: DimensionKind = DimensionKind::Length;
    const DEFAULT_UNIT: Unit = Unit::Inch;
}

impl Dimension for Mass {
    const KIND: DimensionKind = DimensionKind::Mass;
    const DEFAULT_UNIT: Unit = Unit::Grain;
}

impl Dimension for Speed {
    const KIND: DimensionKind = DimensionKind::Speed;
    const DEFAULT_UNIT: Unit = Unit::FeetPerSecond;
}

// ---------------------------------------------------------------------------
// Unit
// ---------------------------------------------------------------------------

/// Supported units, serialized by their case-sensitive UCUM code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Unit {
    #[serde(rename = "[in_i]")]
    Inch,
    #[serde(rename = "[ft_i]")]
    Foot,
    #[serde(rename = "[yd_i]")]
    Yard,
    #[serde(rename = "mm")]
    Millimetre,
    #[serde(rename = "cm")]
    Centimetre,
    #[serde(rename = "m")]
    Metre,
    #[serde(rename = "[gr]")]
    Grain,
    #[serde(rename = "g")]
    Gram,
    #[serde(rename = "kg")]
    Kilogram,
    #[serde(rename = "[lb_av]")]
    Pound,
    #[serde(rename = "[ft_i]/s")]
    FeetPerSecond,
    #[serde(rename = "m/s")]
    MetresPerSecond,
}

impl Unit {
    pub const ALL: [Self; 12] = [
        Self::Inch,
        Self::Foot,
        Self::Yard,
        Self::Millimetre,
        Self::Centimetre,
        Self::Metre,
        Self::Grain,
        Self::Gram,
        Self::Kilogram,
        Self::Pound,
        Self::FeetPerSecond,
        Self::MetresPerSecond,
    ];

    /// UCUM code for this unit.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Inch => "[in_i]",
            Self::Foot => "[ft_i]",
            Self::Yard => "[yd_i]",
            Self::Millimetre => "mm",
            Self::Centimetre => "cm",
            Self::Metre => "m",
            Self::Grain => "[gr]",
            Self::Gram => "g",
            Self::Kilogram => "kg",
            Self::Pound => "[lb_av]",
            Self::FeetPerSecond => "[ft_i]/s",
            Self::MetresPerSecond => "m/s",
        }
    }

    #[must_use]
    pub const fn dimension(self) -> DimensionKind {
        match self {
            Self::Inch
            | Self::Foot
            | Self::Yard
            | Self::Millimetre
            | Self::Centimetre
            | Self::Metre => DimensionKind::Length,
            Self::Grain | Self::Gram | Self::Kilogram | Self::Pound => DimensionKind::Mass,
            Self::FeetPerSecond | Self::MetresPerSecond => DimensionKind::Speed,
        }
    }

    /// Multiplier converting a value in this unit to the SI base unit
    /// (metre, kilogram, metre per second).
    #[must_use]
    pub const fn to_base_factor(self) -> f64 {
        match self {
            Self::Inch => 0.0254,
            Self::Foot | Self::FeetPerSecond => 0.3048,
            Self::Yard => 0.9144,
            Self::Millimetre => 0.001,
            Self::Centimetre => 0.01,
            Self::Metre | Self::Kilogram | Self::MetresPerSecond => 1.0,
            Self::Grain => 0.000_064_798_91,
            Self::Gram => 0.001,
            Self::Pound => 0.453_592_37,
        }
    }

    /// Parse a UCUM code. The whole input must match.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::InvalidUnit` for unknown codes.
    pub fn parse(code: &str) -> Result<Self, QuantityError> {
        Self::ALL
            .into_iter()
            .find(|unit| unit.symbol() == code)
            .ok_or_else(|| QuantityError::InvalidUnit(format!("\"{code}\"")))
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// ---------------------------------------------------------------------------
// Scale
// ---------------------------------------------------------------------------

/// Whether a value is an absolute reading or a difference between readings.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Scale {
    #[default]
    Absolute,
    Relative,
}

impl Scale {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Absolute => "ABSOLUTE",
            Self::Relative => "RELATIVE",
        }
    }

    /// # Errors
    ///
    /// Returns `QuantityError::InvalidScale` for anything but the two exact names.
    pub fn parse(s: &str) -> Result<Self, QuantityError> {
        match s {
            "ABSOLUTE" => Ok(Self::Absolute),
            "RELATIVE" => Ok(Self::Relative),
            other => Err(QuantityError::InvalidScale(other.to_string())),
        }
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Quantity
// ---------------------------------------------------------------------------

/// A numeric value with a unit of dimension `D`.
pub struct Quantity<D: Dimension> {
    value: f64,
    unit: Unit,
    scale: Scale,
    dimension: PhantomData<fn() -> D>,
}

impl<D: Dimension> Quantity<D> {
    /// Build an absolute quantity.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::DimensionMismatch` when `unit` does not measure `D`.
    pub fn new(value: f64, unit: Unit) -> Result<Self, QuantityError> {
        Self::with_scale(value, unit, Scale::Absolute)
    }

    /// # Errors
    ///
    /// Returns `QuantityError::DimensionMismatch` when `unit` does not measure `D`.
    pub fn with_scale(value: f64, unit: Unit, scale: Scale) -> Result<Self, QuantityError> {
        if unit.dimension() != D::KIND {
            return Err(QuantityError::DimensionMismatch {
                unit: unit.symbol(),
                expected: D::KIND.as_str(),
            });
        }
        Ok(Self {
            value,
            unit,
            scale,
            dimension: PhantomData,
        })
    }

    /// Build from a unit already known to measure `D`.
    pub(crate) const fn from_known_unit(value: f64, unit: Unit) -> Self {
        Self {
            value,
            unit,
            scale: Scale::Absolute,
            dimension: PhantomData,
        }
    }

    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }

    #[must_use]
    pub const fn unit(&self) -> Unit {
        self.unit
    }

    #[must_use]
    pub const fn scale(&self) -> Scale {
        self.scale
    }

    /// Express the quantity in another unit of the same dimension.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::DimensionMismatch` when `unit` does not measure `D`.
    pub fn to(&self, unit: Unit) -> Result<Self, QuantityError> {
        if unit == self.unit {
            return Ok(*self);
        }
        let base = self.value * self.unit.to_base_factor();
        Self::with_scale(base / unit.to_base_factor(), unit, self.scale)
    }

    /// Value expressed in `unit`. Falls back to the raw value if the unit
    /// has the wrong dimension.
    #[must_use]
    pub fn value_in(&self, unit: Unit) -> f64 {
        self.to(unit).map_or(self.value, |q| q.value)
    }

    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.value > 0.0
    }
}

/// Absent quantities pass; present ones must be strictly greater than zero.
#[must_use]
pub fn is_positive_quantity<D: Dimension>(quantity: Option<&Quantity<D>>) -> bool {
    quantity.is_none_or(Quantity::is_positive)
}

impl<D: Dimension> Clone for Quantity<D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D: Dimension> Copy for Quantity<D> {}

impl<D: Dimension> PartialEq for Quantity<D> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value && self.unit == other.unit && self.scale == other.scale
    }
}

impl<D: Dimension> fmt::Debug for Quantity<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Quantity")
            .field("value", &self.value)
            .field("unit", &self.unit)
            .field("scale", &self.scale)
            .finish()
    }
}

impl<D: Dimension> fmt::Display for Quantity<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}

// ---------------------------------------------------------------------------
// Codec
// ---------------------------------------------------------------------------

/// JSON codec for quantities.
///
/// Handed explicitly to whatever needs to encode quantities; the serde impls
/// on [`Quantity`] use [`QuantityCodec::API`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityCodec {
    include_scale: bool,
}

impl QuantityCodec {
    /// Client-facing form: `value` and `unit` only.
    pub const API: Self = Self {
        include_scale: false,
    };

    /// Database column form: `value`, `unit`, and `scale`.
    pub const STORAGE: Self = Self {
        include_scale: true,
    };

    #[must_use]
    pub fn encode<D: Dimension>(self, quantity: &Quantity<D>) -> Value {
        let mut map = Map::new();
        map.insert("value".into(), number(quantity.value));
        map.insert("unit".into(), Value::String(quantity.unit.symbol().into()));
        if self.include_scale {
            map.insert("scale".into(), Value::String(quantity.scale.as_str().into()));
        }
        Value::Object(map)
    }

    /// # Errors
    ///
    /// Returns a `QuantityError` describing the first problem found.
    pub fn decode<D: Dimension>(self, json: &Value) -> Result<Quantity<D>, QuantityError> {
        let Value::Object(map) = json else {
            return Err(QuantityError::NotAnObject(json.to_string()));
        };

        let value_node = map.get("value").ok_or(QuantityError::MissingField("value"))?;
        let value = value_node
            .as_f64()
            .ok_or_else(|| QuantityError::InvalidValue(value_node.to_string()))?;

        let unit_node = map.get("unit").ok_or(QuantityError::MissingField("unit"))?;
        let unit = match unit_node {
            Value::String(code) => Unit::parse(code)?,
            other => return Err(QuantityError::InvalidUnit(other.to_string())),
        };

        let scale = match map.get("scale") {
            None => Scale::Absolute,
            Some(Value::String(s)) => Scale::parse(s)?,
            Some(_) => return Err(QuantityError::InvalidScale("null".into())),
        };

        Quantity::with_scale(value, unit, scale)
    }

    /// Encode to a JSON string.
    #[must_use]
    pub fn encode_to_string<D: Dimension>(self, quantity: &Quantity<D>) -> String {
        self.encode(quantity).to_string()
    }

    /// # Errors
    ///
    /// Returns `QuantityError::NotAnObject` if `text` is not JSON, otherwise
    /// whatever [`QuantityCodec::decode`] reports.
    pub fn decode_str<D: Dimension>(self, text: &str) -> Result<Quantity<D>, QuantityError> {
        let json: Value = serde_json::from_str(text)
            .map_err(|_| QuantityError::NotAnObject(text.to_string()))?;
        self.decode(&json)
    }
}

fn number(value: f64) -> Value {
    serde_json::Number::from_f64(value).map_or(Value::Null, Value::Number)
}

impl<D: Dimension> Serialize for Quantity<D> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("value", &self.value)?;
        map.serialize_entry("unit", self.unit.symbol())?;
        map.end()
    }
}

impl<'de, D: Dimension> Deserialize<'de> for Quantity<D> {
    fn deserialize<De: Deserializer<'de>>(deserializer: De) -> Result<Self, De::Error> {
        let json = Value::deserialize(deserializer)?;
        QuantityCodec::API
            .decode(&json)
            .map_err(serde::de::Error::custom)
    }
}

impl<D: Dimension> JsonSchema for Quantity<D> {
    fn schema_name() -> Cow<'static, str> {
        match D::KIND {
            DimensionKind::Length => "QuantityLength".into(),
            DimensionKind::Mass => "QuantityMass".into(),
            DimensionKind::Speed => "QuantitySpeed".into(),
        }
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        let units: Vec<&str> = Unit::ALL
            .into_iter()
            .filter(|unit| unit.dimension() == D::KIND)
            .map(Unit::symbol)
            .collect();
        let scale = generator.subschema_for::<Scale>();
        json_schema!({
            "type": "object",
            "properties": {
                "value": { "type": "number" },
                "unit": { "type": "string", "enum": units },
                "scale": scale
            },
            "required": ["value", "unit"]
        })
    }
}

//! Reloading components: projectiles, propellants, primers, and cases.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::PrimerSize;
use crate::money::Money;
use crate::quantity::{Mass, Quantity};
use crate::validation::{Validate, ValidationErrors, Validator};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Projectile {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(skip)]
    pub owner_id: String,
    #[serde(default)]
    pub manufacturer: String,
    pub weight: Quantity<Mass>,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub cost: Money,
    pub quantity_per_box: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Propellant {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(skip)]
    pub owner_id: String,
    #[serde(default)]
    pub manufacturer: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub cost: Money,
    pub weight_per_container: Quantity<Mass>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Primer {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(skip)]
    pub owner_id: String,
    #[serde(default)]
    pub manufacturer: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub primer_size: PrimerSize,
    pub cost: Money,
    pub quantity_per_box: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Case {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(skip)]
    pub owner_id: String,
    #[serde(default)]
    pub manufacturer: String,
    #[serde(default)]
    pub caliber: String,
    pub primer_size: PrimerSize,
    pub cost: Money,
    pub quantity_per_box: i64,
}

impl Validate for Projectile {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new()
            .not_blank("manufacturer", &self.manufacturer, "Manufacturer is required")
            .positive("weight", Some(&self.weight), "Weight must be positive")
            .not_blank("type", &self.kind, "Type is required")
            .non_negative_money("cost", &self.cost, "Cost must be non-negative")
            .positive_count(
                "quantityPerBox",
                self.quantity_per_box,
                "Quantity per box must be positive",
            )
            .finish()
    }
}

impl Validate for Propellant {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new()
            .not_blank("manufacturer", &self.manufacturer, "Manufacturer is required")
            .not_blank("type", &self.kind, "Type is required")
            .non_negative_money("cost", &self.cost, "Cost must be non-negative")
            .positive(
                "weightPerContainer",
                Some(&self.weight_per_container),
                "Weight per container must be positive",
            )
            .finish()
    }
}

impl Validate for Primer {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new()
            .not_blank("manufacturer", &self.manufacturer, "Manufacturer is required")
            .not_blank("type", &self.kind, "Type is required")
            .non_negative_money("cost", &self.cost, "Cost must be non-negative")
            .positive_count(
                "quantityPerBox",
                self.quantity_per_box,
                "Quantity per box must be positive",
            )
            .finish()
    }
}

impl Validate for Case {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new()
            .not_blank("manufacturer", &self.manufacturer, "Manufacturer is required")
            .not_blank("caliber", &self.caliber, "Caliber is required")
            .non_negative_money("cost", &self.cost, "Cost must be non-negative")
            .positive_count(
                "quantityPerBox",
                self.quantity_per_box,
                "Quantity per box must be positive",
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn projectile_type_field_is_renamed() {
        let p: Projectile = serde_json::from_value(json!({
            "manufacturer": "Berger",
            "weight": {"value": 140, "unit": "[gr]"},
            "type": "Hybrid Target",
            "cost": {"amount": 62.99, "currency": "USD"},
            "quantityPerBox": 100
        }))
        .unwrap();
        assert_eq!(p.kind, "Hybrid Target");
        assert!(p.validate().is_ok());
        assert_eq!(serde_json::to_value(&p).unwrap()["type"], "Hybrid Target");
    }

    #[test]
    fn negative_cost_and_zero_box_rejected() {
        let c = Case {
            id: None,
            owner_id: String::new(),
            manufacturer: "Lapua".into(),
            caliber: "6.5 Creedmoor".into(),
            primer_size: PrimerSize::SmallRifle,
            cost: Money::from_minor(-1, "USD").unwrap(),
            quantity_per_box: 0,
        };
        assert_eq!(c.validate().unwrap_err().fields(), vec!["cost", "quantityPerBox"]);
    }
}

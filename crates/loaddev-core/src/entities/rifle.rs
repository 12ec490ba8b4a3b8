use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::TwistDirection;
use crate::quantity::{Length, Quantity};
use crate::validation::{Validate, ValidationErrors, Validator};

/// A rifle that loads are developed for.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Rifle {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(skip)]
    pub owner_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub caliber: String,
    #[serde(default)]
    pub barrel_length: Option<Quantity<Length>>,
    #[serde(default)]
    pub barrel_contour: Option<String>,
    #[serde(default)]
    pub free_bore: Option<Quantity<Length>>,
    #[serde(default)]
    pub rifling: Option<Rifling>,
    #[serde(default)]
    pub zeroing: Option<Zeroing>,
}

/// Barrel rifling: one turn per `twist_rate` of travel.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Rifling {
    #[serde(default)]
    pub twist_rate: Option<Quantity<Length>>,
    #[serde(default)]
    pub twist_direction: Option<TwistDirection>,
    #[serde(default)]
    pub number_of_grooves: Option<i64>,
}

/// Sight height over bore and the distance the optic is zeroed at.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Zeroing {
    #[serde(default)]
    pub sight_height: Option<Quantity<Length>>,
    #[serde(default)]
    pub zero_distance: Option<Quantity<Length>>,
}

impl Validate for Rifle {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.not_blank("name", &self.name, "Name is required")
            .not_blank("caliber", &self.caliber, "Caliber is required")
            .positive(
                "barrelLength",
                self.barrel_length.as_ref(),
                "Barrel length must be positive",
            )
            .positive(
                "freeBore",
                self.free_bore.as_ref(),
                "Free bore must be positive",
            );

        if let Some(rifling) = &self.rifling {
            v.positive(
                "rifling.twistRate",
                rifling.twist_rate.as_ref(),
                "Twist rate must be positive",
            );
            if let Some(grooves) = rifling.number_of_grooves {
                v.positive_count(
                    "rifling.numberOfGrooves",
                    grooves,
                    "Number of grooves must be positive",
                );
            }
        }

        if let Some(zeroing) = &self.zeroing {
            v.positive(
                "zeroing.sightHeight",
                zeroing.sight_height.as_ref(),
                "Sight height must be positive",
            )
            .positive(
                "zeroing.zeroDistance",
                zeroing.zero_distance.as_ref(),
                "Zero distance must be positive",
            );
        }

        v.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantity::Unit;

    fn inches(v: f64) -> Quantity<Length> {
        Quantity::new(v, Unit::Inch).unwrap()
    }

    fn rifle() -> Rifle {
        Rifle {
            id: None,
            owner_id: String::new(),
            name: "Tikka T3x".into(),
            description: None,
            caliber: "6.5 Creedmoor".into(),
            barrel_length: Some(inches(24.0)),
            barrel_contour: Some("Sporter".into()),
            free_bore: None,
            rifling: Some(Rifling {
                twist_rate: Some(inches(8.0)),
                twist_direction: Some(TwistDirection::Right),
                number_of_grooves: Some(6),
            }),
            zeroing: None,
        }
    }

    #[test]
    fn valid_rifle_passes() {
        assert!(rifle().validate().is_ok());
    }

    #[test]
    fn nested_fields_are_checked() {
        let mut r = rifle();
        r.name = String::new();
        r.rifling = Some(Rifling {
            twist_rate: Some(inches(-8.0)),
            twist_direction: None,
            number_of_grooves: Some(0),
        });
        let err = r.validate().unwrap_err();
        assert_eq!(
            err.fields(),
            vec!["name", "rifling.twistRate", "rifling.numberOfGrooves"]
        );
    }
}

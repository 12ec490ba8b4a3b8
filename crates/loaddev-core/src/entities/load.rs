use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::quantity::{Length, Mass, Quantity};
use crate::validation::{Validate, ValidationErrors, Validator};

const MEASUREMENT_REQUIRED: &str =
    "Either distance from lands or case overall length must be specified";

/// A handload recipe: powder, bullet, primer, and seating.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Load {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(skip)]
    pub owner_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub powder_manufacturer: String,
    #[serde(default)]
    pub powder_type: String,
    #[serde(default)]
    pub bullet_manufacturer: String,
    #[serde(default)]
    pub bullet_type: String,
    pub bullet_weight: Quantity<Mass>,
    #[serde(default)]
    pub primer_manufacturer: String,
    #[serde(default)]
    pub primer_type: String,
    #[serde(default)]
    pub distance_from_lands: Option<Quantity<Length>>,
    #[serde(default)]
    pub case_overall_length: Option<Quantity<Length>>,
    #[serde(default)]
    pub neck_tension: Option<Quantity<Length>>,
    #[serde(default)]
    pub rifle_id: Option<i64>,
}

impl Validate for Load {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.not_blank("name", &self.name, "Name is required")
            .not_blank(
                "powderManufacturer",
                &self.powder_manufacturer,
                "Powder manufacturer is required",
            )
            .not_blank("powderType", &self.powder_type, "Powder type is required")
            .not_blank(
                "bulletManufacturer",
                &self.bullet_manufacturer,
                "Bullet manufacturer is required",
            )
            .not_blank("bulletType", &self.bullet_type, "Bullet type is required")
            .positive(
                "bulletWeight",
                Some(&self.bullet_weight),
                "Bullet weight must be positive",
            )
            .not_blank(
                "primerManufacturer",
                &self.primer_manufacturer,
                "Primer manufacturer is required",
            )
            .not_blank("primerType", &self.primer_type, "Primer type is required")
            .positive(
                "distanceFromLands",
                self.distance_from_lands.as_ref(),
                "Distance from lands must be positive",
            )
            .positive(
                "caseOverallLength",
                self.case_overall_length.as_ref(),
                "Case overall length must be positive",
            )
            .positive(
                "neckTension",
                self.neck_tension.as_ref(),
                "Neck tension must be positive",
            );

        if self.distance_from_lands.is_none() && self.case_overall_length.is_none() {
            v.reject("distanceFromLands", MEASUREMENT_REQUIRED, None)
                .reject("caseOverallLength", MEASUREMENT_REQUIRED, None);
        }

        v.finish()
    }
}

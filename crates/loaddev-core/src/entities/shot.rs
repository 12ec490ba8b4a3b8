use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::quantity::{Quantity, Speed, Unit};
use crate::validation::{Validate, ValidationErrors, Validator};

/// One chronographed shot within a group.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Shot {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(skip)]
    pub owner_id: String,
    #[serde(default)]
    pub group_id: Option<i64>,
    pub velocity: Quantity<Speed>,
}

impl Validate for Shot {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new()
            .not_null("groupId", self.group_id, "Group ID is required")
            .positive(
                "velocity",
                Some(&self.velocity),
                "Velocity must be a positive number",
            )
            .within(
                "velocity",
                Some(&self.velocity),
                Unit::FeetPerSecond,
                (500.0, 5000.0),
                "Velocity must be between 500 and 5000 fps (feet per second)",
            )
            .finish()
    }
}

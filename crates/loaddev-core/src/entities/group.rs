use chrono::{NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::quantity::{Length, Mass, Quantity, Unit};
use crate::validation::{Validate, ValidationErrors, Validator};

/// A string of shots fired with one load at one charge weight and distance.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(skip)]
    pub owner_id: String,
    #[serde(default)]
    pub load_id: Option<i64>,
    pub date: NaiveDate,
    pub powder_charge: Quantity<Mass>,
    pub target_range: Quantity<Length>,
    #[serde(default)]
    pub group_size: Option<Quantity<Length>>,
}

impl Group {
    /// Validate against an explicit "today" so future-date checks are testable.
    ///
    /// # Errors
    ///
    /// Returns every field that failed validation.
    pub fn validate_on(&self, today: NaiveDate) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.not_null("loadId", self.load_id, "Load ID is required")
            .positive(
                "powderCharge",
                Some(&self.powder_charge),
                "Powder charge must be positive",
            )
            .within(
                "powderCharge",
                Some(&self.powder_charge),
                Unit::Grain,
                (0.1, 150.0),
                "Powder charge must be between 0.1 and 150.0 grains",
            )
            .positive(
                "targetRange",
                Some(&self.target_range),
                "Target range must be positive",
            )
            .within(
                "targetRange",
                Some(&self.target_range),
                Unit::Yard,
                (10.0, 2000.0),
                "Target range must be between 10 and 2000 yards",
            )
            .positive(
                "groupSize",
                self.group_size.as_ref(),
                "Group size must be positive",
            )
            .within(
                "groupSize",
                self.group_size.as_ref(),
                Unit::Inch,
                (0.01, 50.0),
                "Group size must be between 0.01 and 50.0 inches",
            );

        if self.date > today {
            v.reject(
                "date",
                "Group date cannot be in the future",
                Some(self.date.to_string()),
            );
        }

        v.finish()
    }
}

impl Validate for Group {
    fn validate(&self) -> Result<(), ValidationErrors> {
        self.validate_on(Utc::now().date_naive())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn group() -> Group {
        Group {
            id: None,
            owner_id: String::new(),
            load_id: Some(1),
            date: day(),
            powder_charge: Quantity::new(41.5, Unit::Grain).unwrap(),
            target_range: Quantity::new(100.0, Unit::Yard).unwrap(),
            group_size: Some(Quantity::new(0.45, Unit::Inch).unwrap()),
        }
    }

    #[test]
    fn valid_group_passes() {
        assert!(group().validate_on(day()).is_ok());
    }

    #[test]
    fn future_date_rejected() {
        let mut g = group();
        g.date = day().succ_opt().unwrap();
        let err = g.validate_on(day()).unwrap_err();
        assert_eq!(err.fields(), vec!["date"]);
        assert_eq!(err.errors[0].message, "Group date cannot be in the future");
    }

    #[rstest]
    #[case(Quantity::new(0.05, Unit::Grain).unwrap(), false)]
    #[case(Quantity::new(150.0, Unit::Grain).unwrap(), true)]
    #[case(Quantity::new(2.7, Unit::Gram).unwrap(), true)]
    #[case(Quantity::new(10.0, Unit::Gram).unwrap(), false)]
    fn powder_charge_range_in_grains(#[case] charge: Quantity<Mass>, #[case] ok: bool) {
        let mut g = group();
        g.powder_charge = charge;
        assert_eq!(g.validate_on(day()).is_ok(), ok);
    }

    #[test]
    fn missing_load_id_rejected() {
        let mut g = group();
        g.load_id = None;
        assert!(g.validate_on(day()).unwrap_err().has_field("loadId"));
    }
}

//! Shared test utilities for loaddev-db unit tests.

use chrono::NaiveDate;
use loaddev_core::entities::{Group, Load, Rifle, Shot};
use loaddev_core::quantity::{Quantity, Unit};

use crate::LoadDevDb;
use crate::service::LoadDevService;

pub const OWNER: &str = "user_alice";
pub const OTHER: &str = "user_bob";

/// Create an in-memory `LoadDevService`.
pub async fn test_service() -> LoadDevService {
    let db = LoadDevDb::open_local(":memory:").await.unwrap();
    LoadDevService::from_db(db)
}

pub fn sample_rifle() -> Rifle {
    Rifle {
        id: None,
        owner_id: String::new(),
        name: "Tikka T3x CTR".into(),
        description: Some("Range rifle".into()),
        caliber: "6.5 Creedmoor".into(),
        barrel_length: Some(Quantity::new(24.0, Unit::Inch).unwrap()),
        barrel_contour: Some("Medium".into()),
        free_bore: None,
        rifling: None,
        zeroing: None,
    }
}

pub fn sample_load(name: &str) -> Load {
    Load {
        id: None,
        owner_id: String::new(),
        name: name.into(),
        description: None,
        powder_manufacturer: "Hodgdon".into(),
        powder_type: "H4350".into(),
        bullet_manufacturer: "Hornady".into(),
        bullet_type: "ELD Match".into(),
        bullet_weight: Quantity::new(140.0, Unit::Grain).unwrap(),
        primer_manufacturer: "CCI".into(),
        primer_type: "BR-2".into(),
        distance_from_lands: Some(Quantity::new(0.02, Unit::Inch).unwrap()),
        case_overall_length: None,
        neck_tension: None,
        rifle_id: None,
    }
}

pub fn sample_group(load_id: i64, charge: f64) -> Group {
    Group {
        id: None,
        owner_id: String::new(),
        load_id: Some(load_id),
        date: NaiveDate::from_ymd_opt(2024, 9, 14).unwrap(),
        powder_charge: Quantity::new(charge, Unit::Grain).unwrap(),
        target_range: Quantity::new(100.0, Unit::Yard).unwrap(),
        group_size: Some(Quantity::new(0.5, Unit::Inch).unwrap()),
    }
}

pub fn sample_shot(group_id: i64, fps: f64) -> Shot {
    Shot {
        id: None,
        owner_id: String::new(),
        group_id: Some(group_id),
        velocity: Quantity::new(fps, Unit::FeetPerSecond).unwrap(),
    }
}

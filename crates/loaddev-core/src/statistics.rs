//! Velocity statistics for shot groups and loads.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Group, Load, Rifle, Shot};
use crate::quantity::{Dimension, Length, Mass, Quantity, Speed, Unit};

/// Single-pass accumulator over shot velocities.
///
/// All values are expressed in the unit of the first shot seen; later shots
/// are converted before accumulating.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityStats {
    unit: Unit,
    count: usize,
    sum: f64,
    sum_of_squares: f64,
    min: f64,
    max: f64,
}

impl Default for VelocityStats {
    fn default() -> Self {
        Self {
            unit: Speed::DEFAULT_UNIT,
            count: 0,
            sum: 0.0,
            sum_of_squares: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }
}

impl VelocityStats {
    #[must_use]
    pub fn from_velocities<'a, I>(velocities: I) -> Self
    where
        I: IntoIterator<Item = &'a Quantity<Speed>>,
    {
        let mut stats = Self::default();
        for velocity in velocities {
            stats.push(velocity);
        }
        stats
    }

    #[must_use]
    pub fn from_shots(shots: &[Shot]) -> Self {
        Self::from_velocities(shots.iter().map(|s| &s.velocity))
    }

    pub fn push(&mut self, velocity: &Quantity<Speed>) {
        if self.count == 0 {
            self.unit = velocity.unit();
        }
        let v = velocity.value_in(self.unit);
        self.count += 1;
        self.sum += v;
        self.sum_of_squares += v * v;
        self.min = self.min.min(v);
        self.max = self.max.max(v);
    }

    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    #[must_use]
    pub const fn unit(&self) -> Unit {
        self.unit
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.sum / self.count as f64
    }

    /// Population standard deviation.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn standard_deviation(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        let mean = self.average();
        let variance = mean.mul_add(-mean, self.sum_of_squares / self.count as f64);
        variance.max(0.0).sqrt()
    }

    #[must_use]
    pub fn extreme_spread(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.max - self.min
    }

    // `unit` only ever comes from a speed quantity or the speed default.
    const fn quantity(&self, value: f64) -> Quantity<Speed> {
        Quantity::from_known_unit(value, self.unit)
    }

    #[must_use]
    pub fn average_velocity(&self) -> Quantity<Speed> {
        self.quantity(self.average())
    }

    #[must_use]
    pub fn standard_deviation_velocity(&self) -> Quantity<Speed> {
        self.quantity(self.standard_deviation())
    }

    #[must_use]
    pub fn extreme_spread_velocity(&self) -> Quantity<Speed> {
        self.quantity(self.extreme_spread())
    }
}

/// Velocity of one shot, as listed in a group summary.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShotSummary {
    pub velocity: Quantity<Speed>,
}

/// A group together with the velocity statistics of its shots.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GroupStatistics {
    pub group_id: Option<i64>,
    pub date: NaiveDate,
    pub powder_charge: Quantity<Mass>,
    pub target_range: Quantity<Length>,
    pub group_size: Option<Quantity<Length>>,
    pub average_velocity: Quantity<Speed>,
    pub standard_deviation: Quantity<Speed>,
    pub extreme_spread: Quantity<Speed>,
    pub shots: Vec<ShotSummary>,
}

impl GroupStatistics {
    #[must_use]
    pub fn compute(group: &Group, shots: &[Shot]) -> Self {
        let stats = VelocityStats::from_shots(shots);
        Self {
            group_id: group.id,
            date: group.date,
            powder_charge: group.powder_charge,
            target_range: group.target_range,
            group_size: group.group_size,
            average_velocity: stats.average_velocity(),
            standard_deviation: stats.standard_deviation_velocity(),
            extreme_spread: stats.extreme_spread_velocity(),
            shots: shots
                .iter()
                .map(|s| ShotSummary {
                    velocity: s.velocity,
                })
                .collect(),
        }
    }
}

/// A load with its rifle and per-group statistics.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoadDetails {
    pub load: Load,
    pub rifle: Option<Rifle>,
    pub groups: Vec<GroupStatistics>,
}

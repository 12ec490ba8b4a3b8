//! Enumerations shared by rifle and component entities.
//!
//! Serialized in `SCREAMING_SNAKE_CASE` to match the stored column values.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// TwistDirection
// ---------------------------------------------------------------------------

/// Rotation direction of barrel rifling, viewed from the breech.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TwistDirection {
    Right,
    Left,
}

impl TwistDirection {
    /// Return the string representation used in SQL storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Right => "RIGHT",
            Self::Left => "LEFT",
        }
    }
}

impl fmt::Display for TwistDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PrimerSize
// ---------------------------------------------------------------------------

/// Primer pocket size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrimerSize {
    SmallPistol,
    LargePistol,
    SmallRifle,
    LargeRifle,
    /// Heavier cup and compound for large powder charges.
    SmallRifleMagnum,
    LargeRifleMagnum,
}

impl PrimerSize {
    /// Return the string representation used in SQL storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SmallPistol => "SMALL_PISTOL",
            Self::LargePistol => "LARGE_PISTOL",
            Self::SmallRifle => "SMALL_RIFLE",
            Self::LargeRifle => "LARGE_RIFLE",
            Self::SmallRifleMagnum => "SMALL_RIFLE_MAGNUM",
            Self::LargeRifleMagnum => "LARGE_RIFLE_MAGNUM",
        }
    }
}

impl fmt::Display for PrimerSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

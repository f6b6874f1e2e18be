//! Detail tiers and zoom-to-tier resolution.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::DatasetError;

/// Discrete level of dataset density, selected from the map zoom.
///
/// Tier boundaries sit at zoom 4, 7, 10 and 13. Each boundary value belongs to
/// the lower tier: zoom 4 is `Z0To4`, zoom 4.5 is `Z5To7`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum DetailTier {
    /// Zoom up to and including 4 (coarsest).
    #[default]
    #[serde(rename = "z0_4")]
    Z0To4,
    /// Zoom above 4 up to 7.
    #[serde(rename = "z5_7")]
    Z5To7,
    /// Zoom above 7 up to 10.
    #[serde(rename = "z8_10")]
    Z8To10,
    /// Zoom above 10 up to 13.
    #[serde(rename = "z11_13")]
    Z11To13,
    /// Zoom above 13 (full detail).
    #[serde(rename = "z14_plus")]
    Z14Plus,
}

impl DetailTier {
    /// All tiers, coarsest first.
    pub const ALL: [DetailTier; 5] = [
        DetailTier::Z0To4,
        DetailTier::Z5To7,
        DetailTier::Z8To10,
        DetailTier::Z11To13,
        DetailTier::Z14Plus,
    ];

    /// Resource identifier of the tier.
    pub fn as_str(&self) -> &'static str {
        match self {
            DetailTier::Z0To4 => "z0_4",
            DetailTier::Z5To7 => "z5_7",
            DetailTier::Z8To10 => "z8_10",
            DetailTier::Z11To13 => "z11_13",
            DetailTier::Z14Plus => "z14_plus",
        }
    }

    /// Human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            DetailTier::Z0To4 => "continental overview",
            DetailTier::Z5To7 => "regional",
            DetailTier::Z8To10 => "metro area",
            DetailTier::Z11To13 => "city",
            DetailTier::Z14Plus => "full detail",
        }
    }
}

impl fmt::Display for DetailTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DetailTier {
    type Err = DatasetError;

    /// Parse a tier identifier against the fixed allow-list.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DetailTier::ALL
            .into_iter()
            .find(|tier| tier.as_str() == s)
            .ok_or_else(|| DatasetError::InvalidTier(s.to_string()))
    }
}

/// Map a continuous zoom level to a detail tier.
///
/// Non-finite zoom values resolve to the coarsest tier.
pub fn resolve_detail_tier(zoom: f64) -> DetailTier {
    if zoom.is_nan() || zoom <= 4.0 {
        DetailTier::Z0To4
    } else if zoom <= 7.0 {
        DetailTier::Z5To7
    } else if zoom <= 10.0 {
        DetailTier::Z8To10
    } else if zoom <= 13.0 {
        DetailTier::Z11To13
    } else if zoom.is_finite() {
        DetailTier::Z14Plus
    } else {
        DetailTier::Z0To4
    }
}

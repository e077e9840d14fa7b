use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

use crate::weights::WeightTable;

/// Monetary unit that nets and transfers are rounded to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum RoundingUnit {
    #[default]
    One,
    Ten,
    Hundred,
    Thousand,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("rounding unit must be one of 1, 10, 100, 1000 (found {0})")]
pub struct InvalidRoundingUnit(pub String);

impl RoundingUnit {
    pub const ALL: [RoundingUnit; 4] = [
        RoundingUnit::One,
        RoundingUnit::Ten,
        RoundingUnit::Hundred,
        RoundingUnit::Thousand,
    ];

    pub fn value(self) -> i64 {
        match self {
            RoundingUnit::One => 1,
            RoundingUnit::Ten => 10,
            RoundingUnit::Hundred => 100,
            RoundingUnit::Thousand => 1000,
        }
    }

    pub fn is_identity(self) -> bool {
        self == RoundingUnit::One
    }
}

impl TryFrom<i64> for RoundingUnit {
    type Error = InvalidRoundingUnit;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        RoundingUnit::ALL
            .into_iter()
            .find(|unit| unit.value() == value)
            .ok_or_else(|| InvalidRoundingUnit(value.to_string()))
    }
}

impl From<RoundingUnit> for i64 {
    fn from(unit: RoundingUnit) -> Self {
        unit.value()
    }
}

impl FromStr for RoundingUnit {
    type Err = InvalidRoundingUnit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: i64 = s
            .trim()
            .parse()
            .map_err(|_| InvalidRoundingUnit(s.to_string()))?;
        RoundingUnit::try_from(value)
    }
}

impl fmt::Display for RoundingUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// How an expense without an explicit allocation is split among its beneficiaries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TiltMode {
    #[default]
    #[serde(alias = "none")]
    Equal,
    /// Split by role and age weights.
    #[serde(alias = "rough", alias = "role_age", alias = "tilt")]
    Weighted,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown tilt mode '{0}' (expected none, equal, rough, role_age or tilt)")]
pub struct InvalidTiltMode(pub String);

impl TiltMode {
    pub fn as_str(self) -> &'static str {
        match self {
            TiltMode::Equal => "equal",
            TiltMode::Weighted => "weighted",
        }
    }
}

impl FromStr for TiltMode {
    type Err = InvalidTiltMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "equal" => Ok(TiltMode::Equal),
            "rough" | "role_age" | "tilt" | "weighted" => Ok(TiltMode::Weighted),
            _ => Err(InvalidTiltMode(s.to_string())),
        }
    }
}

impl fmt::Display for TiltMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Constants the engine runs with, passed explicitly on every call.
///
/// # Example
/// ```
/// use tatekae_domain::{RoundingUnit, SettlementPolicy};
///
/// let policy = SettlementPolicy::default().with_unit(RoundingUnit::Hundred);
/// assert_eq!(policy.unit.value(), 100);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SettlementPolicy {
    pub unit: RoundingUnit,
    pub weights: WeightTable,
}

impl SettlementPolicy {
    pub fn with_unit(mut self, unit: RoundingUnit) -> Self {
        self.unit = unit;
        self
    }

    pub fn with_weights(mut self, weights: WeightTable) -> Self {
        self.weights = weights;
        self
    }
}

//! Role and age weights used by the weighted ("tilt") split.
//!
//! Weights are fixed-point values with three fractional digits so that the
//! largest remainder allocation can run on exact integers.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use std::fmt;

use crate::model::{Age, Member, Role};

const WEIGHT_SCALE: u32 = 3;

/// Non-negative ratio with three fractional digits. Only relative sizes matter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Weight(i64);

impl Weight {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(1000);

    /// Rounds to three decimals (half away from zero) and clamps negatives to zero.
    pub fn from_decimal(value: Decimal) -> Self {
        let rounded =
            value.round_dp_with_strategy(WEIGHT_SCALE, RoundingStrategy::MidpointAwayFromZero);
        let milli = (rounded * Decimal::new(1000, 0))
            .to_i64()
            .unwrap_or(if value.is_sign_negative() { 0 } else { i64::MAX });
        Self(milli.max(0))
    }

    pub fn from_milli(milli: i64) -> Self {
        Self(milli.max(0))
    }

    pub fn milli(self) -> i64 {
        self.0
    }

    pub fn as_decimal(self) -> Decimal {
        Decimal::new(self.0, WEIGHT_SCALE)
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_decimal())
    }
}

/// Role base multipliers and the linear age adjustment.
///
/// `WeightTable::default()` is the canonical table:
/// EXEC 1.60, MANAGER 1.30, SENIOR 1.10, MEMBER 1.00, JUNIOR 0.80,
/// and an age factor of `1 + (age - 30) * 0.005` clamped to `[0.85, 1.15]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeightTable {
    pub exec: Decimal,
    pub manager: Decimal,
    pub senior: Decimal,
    pub member: Decimal,
    pub junior: Decimal,
    pub age_pivot: u8,
    pub age_slope: Decimal,
    pub age_floor: Decimal,
    pub age_ceiling: Decimal,
}

impl Default for WeightTable {
    fn default() -> Self {
        Self {
            exec: Decimal::new(160, 2),
            manager: Decimal::new(130, 2),
            senior: Decimal::new(110, 2),
            member: Decimal::ONE,
            junior: Decimal::new(80, 2),
            age_pivot: 30,
            age_slope: Decimal::new(5, 3),
            age_floor: Decimal::new(85, 2),
            age_ceiling: Decimal::new(115, 2),
        }
    }
}

impl WeightTable {
    /// Base multiplier of a role; members without a role count as MEMBER.
    pub fn role_base(&self, role: Option<Role>) -> Decimal {
        match role.unwrap_or(Role::Member) {
            Role::Exec => self.exec,
            Role::Manager => self.manager,
            Role::Senior => self.senior,
            Role::Member => self.member,
            Role::Junior => self.junior,
        }
    }

    pub fn age_factor(&self, age: Option<Age>) -> Decimal {
        let Some(age) = age else {
            return Decimal::ONE;
        };
        let deviation = Decimal::from(i64::from(age.years()) - i64::from(self.age_pivot));
        let raw = (Decimal::ONE + deviation * self.age_slope)
            .round_dp_with_strategy(WEIGHT_SCALE, RoundingStrategy::MidpointAwayFromZero);
        raw.clamp(self.age_floor, self.age_ceiling)
    }

    pub fn weight_of(&self, role: Option<Role>, age: Option<Age>) -> Weight {
        Weight::from_decimal(self.role_base(role) * self.age_factor(age))
    }

    pub fn weight_of_member(&self, member: &Member) -> Weight {
        self.weight_of(member.role, member.age)
    }
}

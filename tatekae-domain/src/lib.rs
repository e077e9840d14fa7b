#![warn(clippy::uninlined_format_args)]

pub mod error;
pub mod model;
pub mod policy;
pub mod services;
pub mod weights;

pub use error::{AllocationError, SettlementError};
pub use model::{
    Age, Allocation, Expense, ExpenseError, ExpenseId, Member, MemberId, Money, NetBalances, Role,
    Transfer, UnknownRole,
};
pub use policy::{InvalidRoundingUnit, InvalidTiltMode, RoundingUnit, SettlementPolicy, TiltMode};
pub use services::{
    AllocationAdjuster, Allocator, NetBalanceCalculator, SettlementCalculator, round_nets,
};
pub use weights::{Weight, WeightTable};

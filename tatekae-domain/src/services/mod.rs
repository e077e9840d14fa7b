pub mod allocation_adjuster;
pub mod allocator;
pub mod balance_calculator;
pub mod settlement_calculator;
pub mod settlement_rounding;
pub mod unit_rounding;

pub use allocation_adjuster::AllocationAdjuster;
pub use allocator::Allocator;
pub use balance_calculator::NetBalanceCalculator;
pub use settlement_calculator::SettlementCalculator;
pub use settlement_rounding::round_nets;
pub use unit_rounding::{round_to_unit, round_up_to_unit};

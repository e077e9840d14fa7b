#![warn(clippy::uninlined_format_args)]

pub mod error;
pub mod model;
pub mod ports;
pub mod settlement_service;
pub mod validation;

pub use error::{InputError, SettlementBuildError};
pub use model::{
    AllocationRecord, ExpenseRecord, ExpenseSettlement, Group, GroupSnapshot, MemberBalance,
    MemberRecord, NamedShare, NamedTransfer, SettlementSummary, TiltPlan,
};
pub use ports::MemberDirectory;
pub use settlement_service::SettlementService;
pub use validation::SnapshotValidator;

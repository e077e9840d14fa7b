use tatekae_domain::{ExpenseError, InvalidRoundingUnit, SettlementError};
use thiserror::Error;

/// Rejection of a group snapshot before it reaches the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("expense '{expense}': invalid allocation ({reason})")]
    InvalidAllocation { expense: String, reason: String },
    #[error("expense '{expense}' has no beneficiaries")]
    EmptyParticipantSet { expense: String },
    #[error("expense '{expense}': amount must be a non-negative whole number of yen (found {amount})")]
    NegativeOrNonIntegerAmount { expense: String, amount: String },
    #[error("expense '{expense}' references unknown member '{member}'")]
    UnknownMember { expense: String, member: String },
    #[error("member id '{0}' is declared more than once")]
    DuplicateMember(String),
    #[error("expense '{expense}' lists beneficiary '{member}' more than once")]
    DuplicateBeneficiary { expense: String, member: String },
    #[error("member '{0}' has an empty name")]
    EmptyMemberName(String),
    #[error("member '{member}' has unknown role '{role}'")]
    InvalidRole { member: String, role: String },
    #[error("member '{member}' has age {age} outside 0..=120")]
    InvalidAge { member: String, age: i64 },
    #[error(transparent)]
    InvalidRoundingUnit(#[from] InvalidRoundingUnit),
    #[error("expense id '{0}' is declared more than once")]
    DuplicateExpense(String),
    #[error("expense '{0}' was not found")]
    UnknownExpense(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettlementBuildError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Settlement(#[from] SettlementError),
}

impl InputError {
    /// Maps a domain constructor rejection onto the boundary taxonomy.
    pub fn from_expense(expense: &str, err: ExpenseError) -> Self {
        let expense = expense.to_string();
        match err {
            ExpenseError::NegativeAmount(amount) => InputError::NegativeOrNonIntegerAmount {
                expense,
                amount: amount.to_string(),
            },
            ExpenseError::EmptyBeneficiaries => InputError::EmptyParticipantSet { expense },
            ExpenseError::DuplicateBeneficiary(member) => InputError::DuplicateBeneficiary {
                expense,
                member: member.to_string(),
            },
            err @ (ExpenseError::AllocationSumMismatch { .. }
            | ExpenseError::AllocationOutsideBeneficiaries(_)
            | ExpenseError::NegativeAllocation { .. }) => InputError::InvalidAllocation {
                expense,
                reason: err.to_string(),
            },
        }
    }
}

use thiserror::Error;

use crate::model::{ExpenseId, Money};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    #[error("allocation requires at least one participant")]
    EmptyParticipantSet,
    #[error("participant is not part of the allocation")]
    UnknownParticipant,
}

/// Failures inside the engine. Apart from `Allocation`, every variant means an
/// upstream zero-sum invariant was broken and is a defect rather than bad input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettlementError {
    #[error("sum of balances must be zero (found {0})")]
    ImbalancedTotal(Money),
    #[error(
        "greedy matching left unsettled amounts (creditors={creditor_remaining}, debtors={debtor_remaining})"
    )]
    UnsettledRemainder {
        creditor_remaining: Money,
        debtor_remaining: Money,
    },
    #[error("rounded balances do not sum to zero (found {0})")]
    ZeroSumInvariantViolation(Money),
    #[error("allocation of expense '{expense}' sums to {allocated}, expected {amount}")]
    AllocationMismatch {
        expense: ExpenseId,
        allocated: Money,
        amount: Money,
    },
    #[error(transparent)]
    Allocation(#[from] AllocationError),
}

//! Unit rounding of net balances with drift correction.
//!
//! Each balance is rounded on its own, which can leave the total off zero by
//! the accumulated rounding error ("drift"). The whole drift is handed to the
//! single member holding the largest rounded balance so that:
//! 1. Every balance except possibly that one is a multiple of the unit
//! 2. The rounded balances sum to exactly zero
//! 3. The correction is attributable to one person

use crate::{
    error::SettlementError,
    model::{Money, NetBalances},
    policy::RoundingUnit,
};

/// Rounds every net to `unit` and pushes the drift onto the largest creditor.
///
/// # Example
/// ```
/// use tatekae_domain::{MemberId, Money, NetBalances, RoundingUnit};
/// use tatekae_domain::services::round_nets;
///
/// let nets = NetBalances::from_iter([
///     (MemberId::from("a"), Money::from_i64(667)),
///     (MemberId::from("b"), Money::from_i64(-333)),
///     (MemberId::from("c"), Money::from_i64(-334)),
/// ]);
///
/// let rounded = round_nets(&nets, RoundingUnit::Hundred).unwrap();
/// assert!(rounded.total().is_zero());
/// ```
pub fn round_nets(nets: &NetBalances, unit: RoundingUnit) -> Result<NetBalances, SettlementError> {
    let original_sum = nets.total();
    if !original_sum.is_zero() {
        tracing::error!(
            reject_reason = "input_imbalance",
            member_count = nets.len(),
            unit = unit.value(),
            sum_original = %original_sum,
            "Net rounding rejected due to input imbalance"
        );
        return Err(SettlementError::ImbalancedTotal(original_sum));
    }

    if unit.is_identity() {
        return Ok(nets.clone());
    }

    let mut rounded: NetBalances = nets
        .iter()
        .map(|(member, net)| (member.clone(), net.round_to_unit(unit)))
        .collect();

    let drift = original_sum - rounded.total();
    if !drift.is_zero() {
        let absorber = rounded.largest().map(|(member, _)| member.clone());
        if let Some(absorber) = absorber {
            tracing::debug!(
                member_count = nets.len(),
                unit = unit.value(),
                drift = %drift,
                absorber = %absorber,
                "Net rounding drift assigned to largest creditor"
            );
            rounded.credit(&absorber, drift);
        }
    }

    let sum_rounded = rounded.total();
    if sum_rounded != Money::ZERO {
        tracing::error!(
            reject_reason = "zero_sum_invariant_violation",
            member_count = nets.len(),
            unit = unit.value(),
            sum_rounded = %sum_rounded,
            "Net rounding failed zero-sum invariant check"
        );
        return Err(SettlementError::ZeroSumInvariantViolation(sum_rounded));
    }

    Ok(rounded)
}

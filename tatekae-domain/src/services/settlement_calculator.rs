use crate::{
    error::SettlementError,
    model::{MemberId, Money, NetBalances, Transfer},
    policy::RoundingUnit,
};

/// Settlement calculation service
pub struct SettlementCalculator;

impl SettlementCalculator {
    /// Reduces net balances to debtor → creditor transfers.
    ///
    /// Creditors and debtors are each sorted by descending magnitude (ties keep
    /// member order) and the largest remaining pair is matched until one side
    /// runs out. This yields at most `members - 1` transfers.
    ///
    /// # Arguments
    /// * `nets` - Balances summing to zero (positive: receives, negative: pays)
    /// * `unit` - Transfers are rounded up to this unit so payees are never shorted
    ///
    /// # Returns
    /// Transfers in matching order, without zero amounts
    pub fn settle(
        &self,
        nets: &NetBalances,
        unit: RoundingUnit,
    ) -> Result<Vec<Transfer>, SettlementError> {
        let total = nets.total();
        if !total.is_zero() {
            tracing::error!(
                reject_reason = "input_imbalance",
                member_count = nets.len(),
                total = %total,
                "Settlement rejected due to input imbalance"
            );
            return Err(SettlementError::ImbalancedTotal(total));
        }

        let mut creditors: Vec<(&MemberId, Money)> = nets
            .iter()
            .filter(|(_, net)| net.is_positive())
            .collect();
        let mut debtors: Vec<(&MemberId, Money)> = nets
            .iter()
            .filter(|(_, net)| net.is_negative())
            .map(|(member, net)| (member, -net))
            .collect();
        creditors.sort_by(|(_, lhs), (_, rhs)| rhs.cmp(lhs));
        debtors.sort_by(|(_, lhs), (_, rhs)| rhs.cmp(lhs));

        let mut transfers = Vec::with_capacity((creditors.len() + debtors.len()).saturating_sub(1));
        let (mut creditor_idx, mut debtor_idx) = (0, 0);

        while creditor_idx < creditors.len() && debtor_idx < debtors.len() {
            let (creditor, credit) = &mut creditors[creditor_idx];
            let (debtor, debt) = &mut debtors[debtor_idx];

            let amount = (*credit).min(*debt);
            transfers.push(Transfer {
                from: (*debtor).clone(),
                to: (*creditor).clone(),
                amount,
            });
            *credit -= amount;
            *debt -= amount;

            if credit.is_zero() {
                creditor_idx += 1;
            }
            if debt.is_zero() {
                debtor_idx += 1;
            }
        }

        let creditor_remaining: Money = creditors[creditor_idx..].iter().map(|(_, a)| *a).sum();
        let debtor_remaining: Money = debtors[debtor_idx..].iter().map(|(_, a)| *a).sum();
        if !creditor_remaining.is_zero() || !debtor_remaining.is_zero() {
            tracing::error!(
                reject_reason = "unsettled_remainder",
                member_count = nets.len(),
                creditor_remaining = %creditor_remaining,
                debtor_remaining = %debtor_remaining,
                "Greedy settlement terminated with unsettled balances"
            );
            return Err(SettlementError::UnsettledRemainder {
                creditor_remaining,
                debtor_remaining,
            });
        }

        if !unit.is_identity() {
            for transfer in &mut transfers {
                transfer.amount = transfer.amount.round_up_to_unit(unit);
            }
        }
        transfers.retain(|transfer| !transfer.amount.is_zero());

        tracing::debug!(
            member_count = nets.len(),
            transfer_count = transfers.len(),
            unit = unit.value(),
            "Settlement transfers computed"
        );

        Ok(transfers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn calculator() -> SettlementCalculator {
        SettlementCalculator
    }

    fn nets(entries: &[(&str, i64)]) -> NetBalances {
        entries
            .iter()
            .map(|(id, amount)| (MemberId::from(*id), Money::from_i64(*amount)))
            .collect()
    }

    fn transfers(entries: &[(&str, &str, i64)]) -> Vec<Transfer> {
        entries
            .iter()
            .map(|(from, to, amount)| Transfer {
                from: MemberId::from(*from),
                to: MemberId::from(*to),
                amount: Money::from_i64(*amount),
            })
            .collect()
    }

    #[rstest]
    #[case::two_people(
        &[("a", 500), ("b", -500)],
        RoundingUnit::One,
        &[("b", "a", 500)]
    )]
    #[case::one_creditor_two_debtors(
        &[("a", 66), ("b", -33), ("c", -33)],
        RoundingUnit::One,
        &[("b", "a", 33), ("c", "a", 33)]
    )]
    #[case::largest_matched_first(
        &[("a", 100), ("b", 300), ("c", -250), ("d", -150)],
        RoundingUnit::One,
        &[("c", "b", 250), ("d", "b", 50), ("d", "a", 100)]
    )]
    #[case::ties_keep_member_order(
        &[("a", -100), ("b", -100), ("c", 100), ("d", 100)],
        RoundingUnit::One,
        &[("a", "c", 100), ("b", "d", 100)]
    )]
    #[case::all_zero(
        &[("a", 0), ("b", 0)],
        RoundingUnit::One,
        &[]
    )]
    #[case::empty(&[], RoundingUnit::Thousand, &[])]
    #[case::rounded_up_to_unit(
        &[("a", 667), ("b", -333), ("c", -334)],
        RoundingUnit::Hundred,
        &[("c", "a", 400), ("b", "a", 400)]
    )]
    #[case::already_on_unit(
        &[("a", 600), ("b", -300), ("c", -300)],
        RoundingUnit::Hundred,
        &[("b", "a", 300), ("c", "a", 300)]
    )]
    fn settles_greedily(
        calculator: SettlementCalculator,
        #[case] balances: &[(&str, i64)],
        #[case] unit: RoundingUnit,
        #[case] expected: &[(&str, &str, i64)],
    ) {
        let result = calculator
            .settle(&nets(balances), unit)
            .expect("balanced input");
        assert_eq!(result, transfers(expected));
    }

    #[rstest]
    fn rejects_imbalanced_total(calculator: SettlementCalculator) {
        let result = calculator.settle(&nets(&[("a", 50), ("b", -40)]), RoundingUnit::One);
        assert_eq!(
            result,
            Err(SettlementError::ImbalancedTotal(Money::from_i64(10)))
        );
    }
}

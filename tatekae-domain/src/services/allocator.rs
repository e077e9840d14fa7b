use crate::{error::AllocationError, model::Money, weights::Weight};

/// Splits an integer total among participants.
///
/// Both split modes are exact: the shares always add up to the total and
/// leftover yen are handed out in a deterministic order.
pub struct Allocator;

impl Allocator {
    /// Equal split. The first `total % k` participants receive one extra yen.
    pub fn allocate_equal<K, I>(
        &self,
        total: Money,
        participants: I,
    ) -> Result<Vec<(K, Money)>, AllocationError>
    where
        I: IntoIterator<Item = K>,
    {
        let participants: Vec<K> = participants.into_iter().collect();
        if participants.is_empty() {
            return Err(AllocationError::EmptyParticipantSet);
        }

        let count = participants.len() as i64;
        let base = total.amount().div_euclid(count);
        let remainder = total.amount().rem_euclid(count) as usize;

        Ok(participants
            .into_iter()
            .enumerate()
            .map(|(idx, participant)| {
                let extra = i64::from(idx < remainder);
                (participant, Money::from_i64(base + extra))
            })
            .collect())
    }

    /// Weighted split by the largest remainder method.
    ///
    /// Each participant first receives `floor(total * w / W)`. The yen left over
    /// go one each to the participants with the largest fractional remainder,
    /// ties broken by input order. All-zero weights fall back to an equal split.
    pub fn allocate<K: Clone>(
        &self,
        total: Money,
        participants: &[(K, Weight)],
    ) -> Result<Vec<(K, Money)>, AllocationError> {
        if participants.is_empty() {
            return Err(AllocationError::EmptyParticipantSet);
        }

        let weight_sum: i128 = participants
            .iter()
            .map(|(_, weight)| i128::from(weight.milli()))
            .sum();
        if weight_sum == 0 {
            return self.allocate_equal(total, participants.iter().map(|(id, _)| id.clone()));
        }

        let total_units = i128::from(total.amount());
        let mut shares: Vec<(i128, i128)> = participants
            .iter()
            .map(|(_, weight)| {
                let numerator = total_units * i128::from(weight.milli());
                (
                    numerator.div_euclid(weight_sum),
                    numerator.rem_euclid(weight_sum),
                )
            })
            .collect();

        let distributed: i128 = shares.iter().map(|(base, _)| *base).sum();
        let leftover = usize::try_from(total_units - distributed).unwrap_or(0);

        let mut order: Vec<usize> = (0..shares.len()).collect();
        // Stable sort keeps input order among equal remainders.
        order.sort_by(|&lhs, &rhs| shares[rhs].1.cmp(&shares[lhs].1));
        for &idx in order.iter().take(leftover) {
            shares[idx].0 += 1;
        }

        tracing::trace!(
            participant_count = participants.len(),
            total = %total,
            leftover,
            "Weighted allocation computed"
        );

        Ok(participants
            .iter()
            .zip(shares)
            .map(|((id, _), (share, _))| (id.clone(), Money::from_i64(share as i64)))
            .collect())
    }
}

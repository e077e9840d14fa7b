use crate::{error::AllocationError, model::Money, services::Allocator};

/// Edits one share of an explicit allocation while keeping the total fixed.
pub struct AllocationAdjuster;

impl AllocationAdjuster {
    /// Starting point of a manual allocation: the equal split.
    pub fn initial<K, I>(
        &self,
        total: Money,
        participants: I,
    ) -> Result<Vec<(K, Money)>, AllocationError>
    where
        I: IntoIterator<Item = K>,
    {
        Allocator.allocate_equal(total, participants)
    }

    /// Sets `target` to `new_value` and rebalances the others.
    ///
    /// The difference is spread evenly over the other participants in order,
    /// the truncated remainder moving one yen at a time from the front. Shares
    /// never go below zero; whatever that clamp loses is absorbed by `target`
    /// so the allocation still sums to `total`.
    pub fn adjust<K>(
        &self,
        allocation: &[(K, Money)],
        target: &K,
        new_value: Money,
        total: Money,
    ) -> Result<Vec<(K, Money)>, AllocationError>
    where
        K: Clone + PartialEq,
    {
        if allocation.is_empty() {
            return Err(AllocationError::EmptyParticipantSet);
        }
        let target_idx = allocation
            .iter()
            .position(|(id, _)| id == target)
            .ok_or(AllocationError::UnknownParticipant)?;

        let mut next: Vec<(K, Money)> = allocation.to_vec();
        if allocation.len() == 1 {
            next[target_idx].1 = total;
            return Ok(next);
        }

        let new_value = new_value.max(Money::ZERO);
        let current = allocation[target_idx].1;
        if new_value == current {
            return Ok(next);
        }

        let diff = (new_value - current).amount();
        let others = (allocation.len() - 1) as i64;
        let per = diff / others;
        let mut remainder = diff - per * others;

        next[target_idx].1 = new_value;
        for (idx, (_, share)) in next.iter_mut().enumerate() {
            if idx == target_idx {
                continue;
            }
            let delta = per + remainder.signum();
            remainder -= remainder.signum();
            *share = (*share - Money::from_i64(delta)).max(Money::ZERO);
        }

        let drift: Money = next.iter().map(|(_, share)| *share).sum::<Money>() - total;
        if !drift.is_zero() {
            next[target_idx].1 -= drift;
        }

        Ok(next)
    }
}

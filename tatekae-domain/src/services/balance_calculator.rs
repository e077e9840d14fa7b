use crate::{
    error::SettlementError,
    model::{Expense, Member, MemberId, Money, NetBalances},
    policy::TiltMode,
    services::Allocator,
    weights::{Weight, WeightTable},
};
use fxhash::FxHashMap;

/// Net-balance calculation service
pub struct NetBalanceCalculator;

impl NetBalanceCalculator {
    /// Computes every member's net position over `expenses`.
    ///
    /// # Arguments
    /// * `members` - Group members; their order is the order of the result
    /// * `expenses` - Expenses to apply
    /// * `weights` - Table used by weighted expenses
    /// * `mode_of` - Split mode of each expense without an explicit allocation
    ///
    /// # Returns
    /// Balances summing to exactly zero. Members referenced by an expense but
    /// missing from `members` are appended after them.
    pub fn compute<F>(
        &self,
        members: &[Member],
        expenses: &[Expense],
        weights: &WeightTable,
        mode_of: F,
    ) -> Result<NetBalances, SettlementError>
    where
        F: Fn(&Expense) -> TiltMode,
    {
        let directory = directory(members);
        let mut nets = NetBalances::with_members(members.iter().map(|member| member.id.clone()));

        for expense in expenses {
            self.apply(&mut nets, expense, mode_of(expense), weights, &directory)?;
        }

        let total = nets.total();
        if !total.is_zero() {
            tracing::error!(
                reject_reason = "zero_sum_invariant_violation",
                member_count = nets.len(),
                expense_count = expenses.len(),
                total = %total,
                "Net balance calculation failed zero-sum invariant check"
            );
            return Err(SettlementError::ZeroSumInvariantViolation(total));
        }

        tracing::debug!(
            member_count = nets.len(),
            expense_count = expenses.len(),
            "Net balances computed"
        );

        Ok(nets)
    }

    /// Nets of a single expense, covering only its payer and beneficiaries.
    pub fn compute_single(
        &self,
        expense: &Expense,
        mode: TiltMode,
        members: &[Member],
        weights: &WeightTable,
    ) -> Result<NetBalances, SettlementError> {
        let directory = directory(members);
        let mut nets = NetBalances::new();
        self.apply(&mut nets, expense, mode, weights, &directory)?;
        Ok(nets)
    }

    /// Amount each beneficiary bears for `expense`, in beneficiary order.
    pub fn debits(
        &self,
        expense: &Expense,
        mode: TiltMode,
        members: &[Member],
        weights: &WeightTable,
    ) -> Result<Vec<(MemberId, Money)>, SettlementError> {
        self.shares(expense, mode, weights, &directory(members))
    }

    fn apply(
        &self,
        nets: &mut NetBalances,
        expense: &Expense,
        mode: TiltMode,
        weights: &WeightTable,
        directory: &FxHashMap<&MemberId, &Member>,
    ) -> Result<(), SettlementError> {
        nets.credit(expense.payer(), expense.amount());
        for (member, share) in self.shares(expense, mode, weights, directory)? {
            nets.debit(&member, share);
        }
        Ok(())
    }

    fn shares(
        &self,
        expense: &Expense,
        mode: TiltMode,
        weights: &WeightTable,
        directory: &FxHashMap<&MemberId, &Member>,
    ) -> Result<Vec<(MemberId, Money)>, SettlementError> {
        if let Some(allocation) = expense.allocation() {
            let allocated: Money = allocation.values().sum();
            if allocated != expense.amount() {
                tracing::error!(
                    expense = %expense.id(),
                    allocated = %allocated,
                    amount = %expense.amount(),
                    "Explicit allocation does not match expense amount"
                );
                return Err(SettlementError::AllocationMismatch {
                    expense: expense.id().clone(),
                    allocated,
                    amount: expense.amount(),
                });
            }
            return Ok(allocation
                .iter()
                .map(|(member, share)| (member.clone(), *share))
                .collect());
        }

        let participants: Vec<(MemberId, Weight)> = expense
            .beneficiaries()
            .iter()
            .map(|member| {
                let weight = match mode {
                    TiltMode::Equal => Weight::ONE,
                    TiltMode::Weighted => match directory.get(member) {
                        Some(found) => weights.weight_of_member(found),
                        None => weights.weight_of(None, None),
                    },
                };
                (member.clone(), weight)
            })
            .collect();

        Ok(Allocator.allocate(expense.amount(), &participants)?)
    }
}

fn directory(members: &[Member]) -> FxHashMap<&MemberId, &Member> {
    members.iter().map(|member| (&member.id, member)).collect()
}

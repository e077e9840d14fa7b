use crate::{
    error::{InputError, SettlementBuildError},
    model::{
        ExpenseSettlement, Group, MemberBalance, NamedShare, NamedTransfer, SettlementSummary,
        TiltPlan,
    },
    ports::MemberDirectory,
};
use tatekae_domain::{
    ExpenseId, MemberId, Money, NetBalanceCalculator, NetBalances, RoundingUnit,
    SettlementCalculator, SettlementPolicy, TiltMode, round_nets,
};

/// Runs the settlement pipeline over a validated group.
///
/// nets → drift-corrected rounding → greedy matching → named summary.
pub struct SettlementService;

impl SettlementService {
    pub fn summarize(
        &self,
        group: &Group,
        tilt: &TiltPlan,
        policy: &SettlementPolicy,
    ) -> Result<SettlementSummary, SettlementBuildError> {
        let raw = NetBalanceCalculator.compute(
            group.members(),
            group.expenses(),
            &policy.weights,
            |expense| tilt.mode_of(expense.id()),
        )?;

        tracing::debug!(
            member_count = group.members().len(),
            expense_count = group.expenses().len(),
            overrides = tilt.overrides.len(),
            unit = policy.unit.value(),
            "Summarizing group settlement"
        );

        self.build_summary(group, group.name().map(str::to_string), &raw, policy.unit)
    }

    /// Settles one expense as if it were the only one in the group.
    pub fn settle_expense(
        &self,
        group: &Group,
        expense_id: &ExpenseId,
        mode: TiltMode,
        policy: &SettlementPolicy,
    ) -> Result<ExpenseSettlement, SettlementBuildError> {
        let expense = group
            .expense(expense_id)
            .ok_or_else(|| InputError::UnknownExpense(expense_id.to_string()))?;

        let shares = NetBalanceCalculator
            .debits(expense, mode, group.members(), &policy.weights)?
            .into_iter()
            .map(|(member_id, amount)| NamedShare {
                name: display_name(group, &member_id),
                member_id,
                amount,
            })
            .collect();
        let raw =
            NetBalanceCalculator.compute_single(expense, mode, group.members(), &policy.weights)?;
        let title = group.title_of(expense_id).map(str::to_string);
        let summary = self.build_summary(group, title, &raw, policy.unit)?;

        Ok(ExpenseSettlement {
            expense_id: expense_id.clone(),
            mode,
            shares,
            summary,
        })
    }

    fn build_summary(
        &self,
        directory: &dyn MemberDirectory,
        title: Option<String>,
        raw: &NetBalances,
        unit: RoundingUnit,
    ) -> Result<SettlementSummary, SettlementBuildError> {
        let rounded = round_nets(raw, unit)?;
        let transfers = SettlementCalculator.settle(&rounded, unit)?;

        let balances = rounded
            .iter()
            .map(|(member_id, net)| MemberBalance {
                member_id: member_id.clone(),
                name: display_name(directory, member_id),
                net,
                raw_net: raw.get(member_id).unwrap_or(Money::ZERO),
            })
            .collect();
        let transfers = transfers
            .into_iter()
            .map(|transfer| NamedTransfer {
                from_name: display_name(directory, &transfer.from),
                to_name: display_name(directory, &transfer.to),
                from: transfer.from,
                to: transfer.to,
                amount: transfer.amount,
            })
            .collect();

        Ok(SettlementSummary {
            title,
            unit,
            balances,
            transfers,
        })
    }
}

fn display_name(directory: &dyn MemberDirectory, member_id: &MemberId) -> String {
    directory
        .display_name(member_id)
        .map(str::to_string)
        .unwrap_or_else(|| member_id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::{ExpenseRecord, GroupSnapshot, MemberRecord},
        validation::SnapshotValidator,
    };
    use rstest::{fixture, rstest};

    #[fixture]
    fn service() -> SettlementService {
        SettlementService
    }

    fn group(
        members: &[(&str, &str, Option<&str>)],
        expenses: &[(&str, f64, &str, &[&str])],
    ) -> Group {
        let snapshot = GroupSnapshot {
            name: Some("camp".to_string()),
            members: members
                .iter()
                .map(|(id, name, role)| MemberRecord {
                    id: id.to_string(),
                    name: name.to_string(),
                    role: role.map(str::to_string),
                    age: None,
                })
                .collect(),
            expenses: expenses
                .iter()
                .map(|(id, amount, payer, beneficiaries)| ExpenseRecord {
                    id: id.to_string(),
                    title: Some(format!("{id} title")),
                    amount_yen: *amount,
                    paid_by_id: payer.to_string(),
                    beneficiaries: beneficiaries.iter().map(|id| id.to_string()).collect(),
                    allocations: None,
                })
                .collect(),
            rounding_unit: None,
        };
        SnapshotValidator.validate(&snapshot).expect("valid snapshot")
    }

    fn transfer_lines(summary: &SettlementSummary) -> Vec<(String, String, i64)> {
        summary
            .transfers
            .iter()
            .map(|transfer| {
                (
                    transfer.from_name.clone(),
                    transfer.to_name.clone(),
                    transfer.amount.amount(),
                )
            })
            .collect()
    }

    #[rstest]
    fn summary_names_members_and_keeps_raw_nets(service: SettlementService) {
        let group = group(
            &[("a", "Aki", None), ("b", "Ben", None), ("c", "Cho", None)],
            &[("e1", 1000.0, "a", &["a", "b", "c"])],
        );
        let policy = SettlementPolicy::default().with_unit(RoundingUnit::Hundred);

        let summary = service
            .summarize(&group, &TiltPlan::default(), &policy)
            .expect("settles");

        assert_eq!(summary.title.as_deref(), Some("camp"));
        assert_eq!(summary.unit, RoundingUnit::Hundred);
        let nets: Vec<(i64, i64)> = summary
            .balances
            .iter()
            .map(|balance| (balance.net.amount(), balance.raw_net.amount()))
            .collect();
        assert_eq!(nets, [(600, 666), (-300, -333), (-300, -333)]);
        assert_eq!(
            transfer_lines(&summary),
            [
                ("Ben".to_string(), "Aki".to_string(), 300),
                ("Cho".to_string(), "Aki".to_string(), 300),
            ]
        );
        assert_eq!(summary.total(), Money::from_i64(600));
    }

    #[rstest]
    fn tilt_plan_switches_split_per_expense(service: SettlementService) {
        let group = group(
            &[("boss", "Boss", Some("EXEC")), ("kid", "Kid", Some("JUNIOR"))],
            &[("e1", 2400.0, "kid", &["boss", "kid"])],
        );

        let even = service
            .summarize(&group, &TiltPlan::default(), &SettlementPolicy::default())
            .expect("settles");
        let tilted = service
            .summarize(
                &group,
                &TiltPlan::default().with_override("e1", TiltMode::Weighted),
                &SettlementPolicy::default(),
            )
            .expect("settles");

        assert_eq!(
            transfer_lines(&even),
            [("Boss".to_string(), "Kid".to_string(), 1200)]
        );
        assert_eq!(
            transfer_lines(&tilted),
            [("Boss".to_string(), "Kid".to_string(), 1600)]
        );
    }

    #[rstest]
    fn settled_group_has_no_transfers(service: SettlementService) {
        let group = group(
            &[("a", "Aki", None), ("b", "Ben", None)],
            &[("e1", 500.0, "a", &["a"]), ("e2", 700.0, "b", &["b"])],
        );
        let summary = service
            .summarize(&group, &TiltPlan::default(), &SettlementPolicy::default())
            .expect("settles");

        assert!(summary.is_settled());
        assert_eq!(summary.total(), Money::ZERO);
    }

    #[rstest]
    fn single_expense_ignores_other_expenses(service: SettlementService) {
        let group = group(
            &[("a", "Aki", None), ("b", "Ben", None), ("c", "Cho", None)],
            &[
                ("e1", 900.0, "a", &["a", "b", "c"]),
                ("e2", 5000.0, "c", &["a", "b"]),
            ],
        );

        let settlement = service
            .settle_expense(
                &group,
                &ExpenseId::from("e1"),
                TiltMode::Equal,
                &SettlementPolicy::default(),
            )
            .expect("settles");

        assert_eq!(settlement.summary.title.as_deref(), Some("e1 title"));
        let shares: Vec<(&str, i64)> = settlement
            .shares
            .iter()
            .map(|share| (share.name.as_str(), share.amount.amount()))
            .collect();
        assert_eq!(shares, [("Aki", 300), ("Ben", 300), ("Cho", 300)]);
        assert_eq!(
            transfer_lines(&settlement.summary),
            [
                ("Ben".to_string(), "Aki".to_string(), 300),
                ("Cho".to_string(), "Aki".to_string(), 300),
            ]
        );
    }

    #[rstest]
    fn unknown_expense_is_reported(service: SettlementService) {
        let group = group(&[("a", "Aki", None)], &[]);
        let result = service.settle_expense(
            &group,
            &ExpenseId::from("missing"),
            TiltMode::Equal,
            &SettlementPolicy::default(),
        );

        assert_eq!(
            result,
            Err(SettlementBuildError::Input(InputError::UnknownExpense(
                "missing".to_string()
            )))
        );
    }
}

use crate::{
    error::InputError,
    model::{AllocationRecord, ExpenseRecord, Group, GroupSnapshot, MemberRecord},
};
use fxhash::{FxHashMap, FxHashSet};
use tatekae_domain::{
    Age, Allocation, Expense, ExpenseId, Member, MemberId, Money, Role, RoundingUnit,
};

/// Amounts above this lose whole-yen precision as JSON numbers.
const MAX_SAFE_YEN: f64 = 9_007_199_254_740_991.0;

/// Turns a raw snapshot into a [`Group`] the engine can trust.
pub struct SnapshotValidator;

impl SnapshotValidator {
    pub fn validate(&self, snapshot: &GroupSnapshot) -> Result<Group, InputError> {
        let mut members: Vec<Member> = Vec::with_capacity(snapshot.members.len());
        for record in &snapshot.members {
            let member = self.member(record)?;
            if members.iter().any(|known| known.id == member.id) {
                return Err(InputError::DuplicateMember(record.id.clone()));
            }
            members.push(member);
        }

        let rounding_unit = snapshot
            .rounding_unit
            .map(RoundingUnit::try_from)
            .transpose()?;

        let known: FxHashSet<&MemberId> = members.iter().map(|member| &member.id).collect();
        let mut expenses: Vec<Expense> = Vec::with_capacity(snapshot.expenses.len());
        let mut titles = FxHashMap::default();
        for record in &snapshot.expenses {
            let expense = self.expense(record, &known)?;
            if expenses.iter().any(|seen| seen.id() == expense.id()) {
                return Err(InputError::DuplicateExpense(record.id.clone()));
            }
            if let Some(title) = record
                .title
                .as_deref()
                .map(str::trim)
                .filter(|title| !title.is_empty())
            {
                titles.insert(expense.id().clone(), title.to_string());
            }
            expenses.push(expense);
        }

        tracing::debug!(
            member_count = members.len(),
            expense_count = expenses.len(),
            rounding_unit = ?rounding_unit.map(RoundingUnit::value),
            "Group snapshot validated"
        );

        Ok(Group {
            name: snapshot.name.clone(),
            members,
            expenses,
            titles,
            rounding_unit,
        })
    }

    fn member(&self, record: &MemberRecord) -> Result<Member, InputError> {
        let name = record.name.trim();
        if name.is_empty() {
            return Err(InputError::EmptyMemberName(record.id.clone()));
        }

        let mut member = Member::new(record.id.as_str(), name);
        if let Some(role) = record.role.as_deref().filter(|role| !role.trim().is_empty()) {
            let role = role
                .parse::<Role>()
                .map_err(|_| InputError::InvalidRole {
                    member: record.id.clone(),
                    role: role.to_string(),
                })?;
            member = member.with_role(role);
        }
        if let Some(age) = record.age {
            let age = Age::new(age).ok_or_else(|| InputError::InvalidAge {
                member: record.id.clone(),
                age,
            })?;
            member = member.with_age(age);
        }
        Ok(member)
    }

    fn expense(
        &self,
        record: &ExpenseRecord,
        known: &FxHashSet<&MemberId>,
    ) -> Result<Expense, InputError> {
        let amount = whole_yen(record.amount_yen).ok_or_else(|| {
            InputError::NegativeOrNonIntegerAmount {
                expense: record.id.clone(),
                amount: record.amount_yen.to_string(),
            }
        })?;

        let payer = known_member(record, &record.paid_by_id, known)?;
        let beneficiaries = record
            .beneficiaries
            .iter()
            .map(|id| known_member(record, id, known))
            .collect::<Result<Vec<_>, _>>()?;

        // An empty list means "no explicit allocation".
        let allocation = match record.allocations.as_deref() {
            Some(entries) if !entries.is_empty() => Some(allocation(record, entries)?),
            _ => None,
        };

        Expense::try_new(
            ExpenseId::from(record.id.as_str()),
            amount,
            payer,
            beneficiaries,
            allocation,
        )
        .map_err(|err| InputError::from_expense(&record.id, err))
    }
}

fn known_member(
    record: &ExpenseRecord,
    id: &str,
    known: &FxHashSet<&MemberId>,
) -> Result<MemberId, InputError> {
    let member = MemberId::from(id);
    if known.contains(&member) {
        Ok(member)
    } else {
        Err(InputError::UnknownMember {
            expense: record.id.clone(),
            member: id.to_string(),
        })
    }
}

fn allocation(
    record: &ExpenseRecord,
    entries: &[AllocationRecord],
) -> Result<Allocation, InputError> {
    let invalid = |reason: String| InputError::InvalidAllocation {
        expense: record.id.clone(),
        reason,
    };

    let mut allocation = Allocation::with_capacity(entries.len());
    for entry in entries {
        let share = whole_yen(entry.amount_yen).ok_or_else(|| {
            invalid(format!(
                "share of '{}' must be a non-negative whole number of yen (found {})",
                entry.member_id, entry.amount_yen
            ))
        })?;
        if allocation
            .insert(MemberId::from(entry.member_id.as_str()), share)
            .is_some()
        {
            return Err(invalid(format!(
                "'{}' is allocated more than once",
                entry.member_id
            )));
        }
    }
    Ok(allocation)
}

fn whole_yen(value: f64) -> Option<Money> {
    (value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= MAX_SAFE_YEN)
        .then(|| Money::from_i64(value as i64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn validator() -> SnapshotValidator {
        SnapshotValidator
    }

    fn member(id: &str) -> MemberRecord {
        MemberRecord {
            id: id.to_string(),
            name: id.to_uppercase(),
            role: None,
            age: None,
        }
    }

    fn expense(id: &str, amount: f64, payer: &str, beneficiaries: &[&str]) -> ExpenseRecord {
        ExpenseRecord {
            id: id.to_string(),
            title: None,
            amount_yen: amount,
            paid_by_id: payer.to_string(),
            beneficiaries: beneficiaries.iter().map(|id| id.to_string()).collect(),
            allocations: None,
        }
    }

    fn shares(entries: &[(&str, f64)]) -> Option<Vec<AllocationRecord>> {
        Some(
            entries
                .iter()
                .map(|(member, amount)| AllocationRecord {
                    member_id: member.to_string(),
                    amount_yen: *amount,
                })
                .collect(),
        )
    }

    fn snapshot(expenses: Vec<ExpenseRecord>) -> GroupSnapshot {
        GroupSnapshot {
            name: Some("trip".to_string()),
            members: vec![member("a"), member("b"), member("c")],
            expenses,
            rounding_unit: None,
        }
    }

    #[rstest]
    fn accepts_valid_snapshot(validator: SnapshotValidator) {
        let mut lunch = expense("e1", 1000.0, "a", &["b", "c"]);
        lunch.title = Some("  Lunch ".to_string());
        lunch.allocations = shares(&[("b", 700.0), ("c", 300.0)]);
        let mut input = snapshot(vec![lunch, expense("e2", 90.0, "b", &["a", "b", "c"])]);
        input.members[0].role = Some("manager".to_string());
        input.members[0].age = Some(41);
        input.rounding_unit = Some(100);

        let group = validator.validate(&input).expect("valid snapshot");

        assert_eq!(group.name(), Some("trip"));
        assert_eq!(group.members().len(), 3);
        assert_eq!(group.members()[0].role, Some(Role::Manager));
        assert_eq!(group.members()[0].age, Age::new(41));
        assert_eq!(group.expenses().len(), 2);
        assert_eq!(group.title_of(&ExpenseId::from("e1")), Some("Lunch"));
        assert_eq!(group.title_of(&ExpenseId::from("e2")), None);
        assert_eq!(group.rounding_unit(), Some(RoundingUnit::Hundred));
        assert!(group.expenses()[0].allocation().is_some());
    }

    #[rstest]
    fn member_names_are_trimmed(validator: SnapshotValidator) {
        let mut input = snapshot(Vec::new());
        input.members[1].name = "  Bea  ".to_string();

        let group = validator.validate(&input).expect("valid snapshot");
        assert_eq!(group.members()[1].name, "Bea");
    }

    #[rstest]
    fn empty_allocation_list_means_equal_split(validator: SnapshotValidator) {
        let mut record = expense("e1", 100.0, "a", &["a", "b"]);
        record.allocations = Some(Vec::new());

        let group = validator
            .validate(&snapshot(vec![record]))
            .expect("valid snapshot");
        assert!(group.expenses()[0].allocation().is_none());
    }

    #[rstest]
    #[case::fractional(expense("e1", 10.5, "a", &["b"]), "10.5")]
    #[case::negative(expense("e1", -1.0, "a", &["b"]), "-1")]
    #[case::not_finite(expense("e1", f64::NAN, "a", &["b"]), "NaN")]
    fn rejects_bad_amounts(
        validator: SnapshotValidator,
        #[case] record: ExpenseRecord,
        #[case] amount: &str,
    ) {
        assert_eq!(
            validator.validate(&snapshot(vec![record])),
            Err(InputError::NegativeOrNonIntegerAmount {
                expense: "e1".to_string(),
                amount: amount.to_string(),
            })
        );
    }

    #[rstest]
    #[case::unknown_payer(expense("e1", 100.0, "zed", &["a"]), "zed")]
    #[case::unknown_beneficiary(expense("e1", 100.0, "a", &["b", "zed"]), "zed")]
    fn rejects_unknown_members(
        validator: SnapshotValidator,
        #[case] record: ExpenseRecord,
        #[case] unknown: &str,
    ) {
        assert_eq!(
            validator.validate(&snapshot(vec![record])),
            Err(InputError::UnknownMember {
                expense: "e1".to_string(),
                member: unknown.to_string(),
            })
        );
    }

    #[rstest]
    fn rejects_empty_beneficiaries(validator: SnapshotValidator) {
        assert_eq!(
            validator.validate(&snapshot(vec![expense("e1", 100.0, "a", &[])])),
            Err(InputError::EmptyParticipantSet {
                expense: "e1".to_string()
            })
        );
    }

    #[rstest]
    fn rejects_duplicate_beneficiaries(validator: SnapshotValidator) {
        assert_eq!(
            validator.validate(&snapshot(vec![expense("e1", 100.0, "a", &["b", "b"])])),
            Err(InputError::DuplicateBeneficiary {
                expense: "e1".to_string(),
                member: "b".to_string(),
            })
        );
    }

    #[rstest]
    #[case::sum_mismatch(&[("b", 600.0), ("c", 300.0)])]
    #[case::outside_beneficiaries(&[("a", 500.0), ("b", 500.0)])]
    #[case::fractional_share(&[("b", 999.5), ("c", 0.5)])]
    #[case::negative_share(&[("b", 1100.0), ("c", -100.0)])]
    #[case::repeated_member(&[("b", 500.0), ("b", 500.0)])]
    fn rejects_invalid_allocations(
        validator: SnapshotValidator,
        #[case] entries: &[(&str, f64)],
    ) {
        let mut record = expense("e1", 1000.0, "a", &["b", "c"]);
        record.allocations = shares(entries);

        let result = validator.validate(&snapshot(vec![record]));
        assert!(
            matches!(
                &result,
                Err(InputError::InvalidAllocation { expense, .. }) if expense == "e1"
            ),
            "unexpected result: {result:?}"
        );
    }

    #[rstest]
    fn rejects_duplicate_member(validator: SnapshotValidator) {
        let mut input = snapshot(Vec::new());
        input.members.push(member("a"));
        assert_eq!(
            validator.validate(&input),
            Err(InputError::DuplicateMember("a".to_string()))
        );
    }

    #[rstest]
    fn rejects_blank_member_name(validator: SnapshotValidator) {
        let mut input = snapshot(Vec::new());
        input.members[2].name = "   ".to_string();
        assert_eq!(
            validator.validate(&input),
            Err(InputError::EmptyMemberName("c".to_string()))
        );
    }

    #[rstest]
    fn rejects_unknown_role(validator: SnapshotValidator) {
        let mut input = snapshot(Vec::new());
        input.members[0].role = Some("intern".to_string());
        assert_eq!(
            validator.validate(&input),
            Err(InputError::InvalidRole {
                member: "a".to_string(),
                role: "intern".to_string(),
            })
        );
    }

    #[rstest]
    #[case::too_old(121)]
    #[case::negative(-1)]
    fn rejects_out_of_range_age(validator: SnapshotValidator, #[case] age: i64) {
        let mut input = snapshot(Vec::new());
        input.members[0].age = Some(age);
        assert_eq!(
            validator.validate(&input),
            Err(InputError::InvalidAge {
                member: "a".to_string(),
                age,
            })
        );
    }

    #[rstest]
    fn rejects_unsupported_rounding_unit(validator: SnapshotValidator) {
        let mut input = snapshot(Vec::new());
        input.rounding_unit = Some(5);
        assert!(matches!(
            validator.validate(&input),
            Err(InputError::InvalidRoundingUnit(_))
        ));
    }

    #[rstest]
    fn rejects_duplicate_expense(validator: SnapshotValidator) {
        let input = snapshot(vec![
            expense("e1", 100.0, "a", &["b"]),
            expense("e1", 200.0, "b", &["a"]),
        ]);
        assert_eq!(
            validator.validate(&input),
            Err(InputError::DuplicateExpense("e1".to_string()))
        );
    }
}

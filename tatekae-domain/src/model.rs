use arcstr::ArcStr;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};
use thiserror::Error;

use crate::{
    policy::RoundingUnit,
    services::unit_rounding::{round_to_unit, round_up_to_unit},
};

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(ArcStr);

impl MemberId {
    pub fn new(id: impl Into<ArcStr>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MemberId {
    fn from(value: &str) -> Self {
        Self(ArcStr::from(value))
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(ArcStr);

impl ExpenseId {
    pub fn new(id: impl Into<ArcStr>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ExpenseId {
    fn from(value: &str) -> Self {
        Self(ArcStr::from(value))
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whole yen. Negative values only appear in balances.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Self = Self(0);

    pub fn zero() -> Self {
        Self::ZERO
    }

    pub fn from_i64(value: i64) -> Self {
        Self(value)
    }

    pub fn amount(self) -> i64 {
        self.0
    }

    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub fn signum(self) -> i64 {
        self.0.signum()
    }

    pub fn round_to_unit(self, unit: RoundingUnit) -> Self {
        Self(round_to_unit(self.0, unit.value()))
    }

    pub fn round_up_to_unit(self, unit: RoundingUnit) -> Self {
        Self(round_up_to_unit(self.0, unit.value()))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Exec,
    Manager,
    Senior,
    Member,
    Junior,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Exec,
        Role::Manager,
        Role::Senior,
        Role::Member,
        Role::Junior,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Exec => "EXEC",
            Role::Manager => "MANAGER",
            Role::Senior => "SENIOR",
            Role::Member => "MEMBER",
            Role::Junior => "JUNIOR",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Age(u8);

impl Age {
    pub const MAX: u8 = 120;

    pub fn new(years: i64) -> Option<Self> {
        u8::try_from(years)
            .ok()
            .filter(|years| *years <= Self::MAX)
            .map(Self)
    }

    pub fn years(self) -> u8 {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub role: Option<Role>,
    pub age: Option<Age>,
}

impl Member {
    pub fn new(id: impl Into<MemberId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role: None,
            age: None,
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn with_age(mut self, age: Age) -> Self {
        self.age = Some(age);
        self
    }
}

/// Explicit per-beneficiary split that overrides the equal or weighted one.
pub type Allocation = IndexMap<MemberId, Money>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpenseError {
    #[error("expense amount must not be negative (found {0})")]
    NegativeAmount(Money),
    #[error("expense has no beneficiaries")]
    EmptyBeneficiaries,
    #[error("beneficiary '{0}' is listed more than once")]
    DuplicateBeneficiary(MemberId),
    #[error("allocation total {allocated} does not match expense amount {amount}")]
    AllocationSumMismatch { allocated: Money, amount: Money },
    #[error("allocation references '{0}' who is not a beneficiary")]
    AllocationOutsideBeneficiaries(MemberId),
    #[error("allocation for '{member}' must not be negative (found {amount})")]
    NegativeAllocation { member: MemberId, amount: Money },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expense {
    id: ExpenseId,
    amount: Money,
    payer: MemberId,
    beneficiaries: Vec<MemberId>,
    allocation: Option<Allocation>,
}

impl Expense {
    pub fn try_new(
        id: ExpenseId,
        amount: Money,
        payer: MemberId,
        beneficiaries: Vec<MemberId>,
        allocation: Option<Allocation>,
    ) -> Result<Self, ExpenseError> {
        if amount.is_negative() {
            return Err(ExpenseError::NegativeAmount(amount));
        }
        if beneficiaries.is_empty() {
            return Err(ExpenseError::EmptyBeneficiaries);
        }
        for (idx, beneficiary) in beneficiaries.iter().enumerate() {
            if beneficiaries[..idx].contains(beneficiary) {
                return Err(ExpenseError::DuplicateBeneficiary(beneficiary.clone()));
            }
        }

        if let Some(allocation) = &allocation {
            for (member, share) in allocation {
                if !beneficiaries.contains(member) {
                    return Err(ExpenseError::AllocationOutsideBeneficiaries(member.clone()));
                }
                if share.is_negative() {
                    return Err(ExpenseError::NegativeAllocation {
                        member: member.clone(),
                        amount: *share,
                    });
                }
            }
            let allocated: Money = allocation.values().sum();
            if allocated != amount {
                return Err(ExpenseError::AllocationSumMismatch { allocated, amount });
            }
        }

        Ok(Self {
            id,
            amount,
            payer,
            beneficiaries,
            allocation,
        })
    }

    /// Equal-split expense without an explicit allocation.
    pub fn equal(
        id: impl Into<ExpenseId>,
        amount: Money,
        payer: impl Into<MemberId>,
        beneficiaries: impl IntoIterator<Item = MemberId>,
    ) -> Result<Self, ExpenseError> {
        Self::try_new(
            id.into(),
            amount,
            payer.into(),
            beneficiaries.into_iter().collect(),
            None,
        )
    }

    pub fn id(&self) -> &ExpenseId {
        &self.id
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn payer(&self) -> &MemberId {
        &self.payer
    }

    pub fn beneficiaries(&self) -> &[MemberId] {
        &self.beneficiaries
    }

    pub fn allocation(&self) -> Option<&Allocation> {
        self.allocation.as_ref()
    }
}

/// Signed position per member, positive when the member should receive money.
///
/// Iteration follows insertion order, which is the member order of the group.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NetBalances(IndexMap<MemberId, Money>);

impl NetBalances {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_members<I>(members: I) -> Self
    where
        I: IntoIterator<Item = MemberId>,
    {
        members
            .into_iter()
            .map(|member| (member, Money::ZERO))
            .collect()
    }

    pub fn get(&self, member: &MemberId) -> Option<Money> {
        self.0.get(member).copied()
    }

    pub fn credit(&mut self, member: &MemberId, amount: Money) {
        match self.0.get_mut(member) {
            Some(balance) => *balance += amount,
            None => {
                self.0.insert(member.clone(), amount);
            }
        }
    }

    pub fn debit(&mut self, member: &MemberId, amount: Money) {
        self.credit(member, -amount);
    }

    pub fn total(&self) -> Money {
        self.0.values().sum()
    }

    /// First member holding the most positive balance.
    pub fn largest(&self) -> Option<(&MemberId, Money)> {
        self.0.iter().fold(None, |best, (member, balance)| match best {
            Some((_, best_balance)) if *balance <= best_balance => best,
            _ => Some((member, *balance)),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MemberId, Money)> + '_ {
        self.0.iter().map(|(member, balance)| (member, *balance))
    }

    pub fn members(&self) -> impl Iterator<Item = &MemberId> + '_ {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(MemberId, Money)> for NetBalances {
    fn from_iter<T: IntoIterator<Item = (MemberId, Money)>>(iter: T) -> Self {
        let mut balances = Self::new();
        for (member, amount) in iter {
            balances.credit(&member, amount);
        }
        balances
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Transfer {
    pub from: MemberId,
    pub to: MemberId,
    pub amount: Money,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ids(names: &[&str]) -> Vec<MemberId> {
        names.iter().copied().map(MemberId::from).collect()
    }

    #[rstest]
    #[case("EXEC", Role::Exec)]
    #[case("manager", Role::Manager)]
    #[case(" Senior ", Role::Senior)]
    #[case("JUNIOR", Role::Junior)]
    fn role_parses_case_insensitively(#[case] input: &str, #[case] expected: Role) {
        assert_eq!(input.parse::<Role>(), Ok(expected));
    }

    #[test]
    fn role_rejects_unknown_names() {
        assert_eq!(
            "INTERN".parse::<Role>(),
            Err(UnknownRole("INTERN".to_string()))
        );
    }

    #[rstest]
    #[case(0, true)]
    #[case(30, true)]
    #[case(120, true)]
    #[case(121, false)]
    #[case(-1, false)]
    fn age_is_bounded(#[case] years: i64, #[case] valid: bool) {
        assert_eq!(Age::new(years).is_some(), valid);
    }

    #[test]
    fn expense_accepts_matching_allocation() {
        let allocation = Allocation::from_iter([
            (MemberId::from("b"), Money::from_i64(700)),
            (MemberId::from("c"), Money::from_i64(300)),
        ]);
        let expense = Expense::try_new(
            ExpenseId::from("e1"),
            Money::from_i64(1000),
            MemberId::from("a"),
            ids(&["b", "c"]),
            Some(allocation),
        )
        .expect("allocation should be valid");

        assert_eq!(expense.allocation().map(|a| a.len()), Some(2));
    }

    #[rstest]
    #[case::sum_mismatch(
        &[("b", 600), ("c", 300)],
        ExpenseError::AllocationSumMismatch {
            allocated: Money::from_i64(900),
            amount: Money::from_i64(1000),
        }
    )]
    #[case::outside_beneficiaries(
        &[("b", 700), ("d", 300)],
        ExpenseError::AllocationOutsideBeneficiaries(MemberId::from("d"))
    )]
    #[case::negative_share(
        &[("b", 1100), ("c", -100)],
        ExpenseError::NegativeAllocation {
            member: MemberId::from("c"),
            amount: Money::from_i64(-100),
        }
    )]
    fn expense_rejects_invalid_allocation(
        #[case] shares: &[(&str, i64)],
        #[case] expected: ExpenseError,
    ) {
        let allocation: Allocation = shares
            .iter()
            .map(|(id, amount)| (MemberId::from(*id), Money::from_i64(*amount)))
            .collect();
        let result = Expense::try_new(
            ExpenseId::from("e1"),
            Money::from_i64(1000),
            MemberId::from("a"),
            ids(&["b", "c"]),
            Some(allocation),
        );

        assert_eq!(result, Err(expected));
    }

    #[rstest]
    #[case::negative_amount(-1, &["a"], ExpenseError::NegativeAmount(Money::from_i64(-1)))]
    #[case::no_beneficiaries(100, &[], ExpenseError::EmptyBeneficiaries)]
    #[case::duplicate(100, &["a", "b", "a"], ExpenseError::DuplicateBeneficiary(MemberId::from("a")))]
    fn expense_rejects_invalid_shape(
        #[case] amount: i64,
        #[case] beneficiaries: &[&str],
        #[case] expected: ExpenseError,
    ) {
        let result = Expense::equal("e1", Money::from_i64(amount), "a", ids(beneficiaries));
        assert_eq!(result, Err(expected));
    }

    #[test]
    fn largest_prefers_first_member_on_ties() {
        let balances = NetBalances::from_iter([
            (MemberId::from("a"), Money::from_i64(-200)),
            (MemberId::from("b"), Money::from_i64(100)),
            (MemberId::from("c"), Money::from_i64(100)),
        ]);

        let (member, balance) = balances.largest().expect("non-empty balances");
        assert_eq!(member.as_str(), "b");
        assert_eq!(balance, Money::from_i64(100));
    }

    #[test]
    fn credit_appends_unknown_members_in_order() {
        let mut balances = NetBalances::with_members(ids(&["a", "b"]));
        balances.credit(&MemberId::from("z"), Money::from_i64(10));
        balances.debit(&MemberId::from("a"), Money::from_i64(10));

        let order: Vec<&str> = balances.members().map(MemberId::as_str).collect();
        assert_eq!(order, ["a", "b", "z"]);
        assert!(balances.total().is_zero());
    }
}

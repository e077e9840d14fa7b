use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};
use tatekae_domain::{
    Expense, ExpenseId, Member, MemberId, Money, RoundingUnit, TiltMode,
};

/// Raw member as it arrives from storage or a JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub age: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationRecord {
    pub member_id: String,
    pub amount_yen: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRecord {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    pub amount_yen: f64,
    pub paid_by_id: String,
    #[serde(default)]
    pub beneficiaries: Vec<String>,
    #[serde(default)]
    pub allocations: Option<Vec<AllocationRecord>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSnapshot {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub members: Vec<MemberRecord>,
    #[serde(default)]
    pub expenses: Vec<ExpenseRecord>,
    #[serde(default)]
    pub rounding_unit: Option<i64>,
}

/// Split mode for every expense, with per-expense overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TiltPlan {
    #[serde(default)]
    pub default: TiltMode,
    #[serde(default)]
    pub overrides: FxHashMap<ExpenseId, TiltMode>,
}

impl TiltPlan {
    pub fn uniform(mode: TiltMode) -> Self {
        Self {
            default: mode,
            overrides: FxHashMap::default(),
        }
    }

    pub fn with_override(mut self, expense: impl Into<ExpenseId>, mode: TiltMode) -> Self {
        self.overrides.insert(expense.into(), mode);
        self
    }

    pub fn mode_of(&self, expense: &ExpenseId) -> TiltMode {
        self.overrides.get(expense).copied().unwrap_or(self.default)
    }
}

/// Validated group: every expense references known members and satisfies
/// the allocation invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub(crate) name: Option<String>,
    pub(crate) members: Vec<Member>,
    pub(crate) expenses: Vec<Expense>,
    pub(crate) titles: FxHashMap<ExpenseId, String>,
    pub(crate) rounding_unit: Option<RoundingUnit>,
}

impl Group {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn member(&self, id: &MemberId) -> Option<&Member> {
        self.members.iter().find(|member| &member.id == id)
    }

    pub fn expense(&self, id: &ExpenseId) -> Option<&Expense> {
        self.expenses.iter().find(|expense| expense.id() == id)
    }

    pub fn title_of(&self, id: &ExpenseId) -> Option<&str> {
        self.titles.get(id).map(String::as_str)
    }

    /// Unit stored with the group, if any.
    pub fn rounding_unit(&self) -> Option<RoundingUnit> {
        self.rounding_unit
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberBalance {
    pub member_id: MemberId,
    pub name: String,
    /// Balance the transfers settle, after rounding to the unit.
    pub net: Money,
    pub raw_net: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedTransfer {
    pub from: MemberId,
    pub from_name: String,
    pub to: MemberId,
    pub to_name: String,
    pub amount: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementSummary {
    /// Group name, or the expense title for a single-expense summary.
    pub title: Option<String>,
    pub unit: RoundingUnit,
    pub balances: Vec<MemberBalance>,
    pub transfers: Vec<NamedTransfer>,
}

impl SettlementSummary {
    /// Sum of all transfers, which is both what is paid and what is received.
    pub fn total(&self) -> Money {
        self.transfers.iter().map(|transfer| transfer.amount).sum()
    }

    pub fn is_settled(&self) -> bool {
        self.transfers.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedShare {
    pub member_id: MemberId,
    pub name: String,
    pub amount: Money,
}

/// Settlement of one expense taken on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseSettlement {
    pub expense_id: ExpenseId,
    pub mode: TiltMode,
    /// What each beneficiary bears, in beneficiary order.
    pub shares: Vec<NamedShare>,
    pub summary: SettlementSummary,
}

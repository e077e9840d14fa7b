use clap::{Parser, ValueEnum};
use std::{path::PathBuf, str::FromStr};
use tatekae_application::{Group, TiltPlan};
use tatekae_domain::{ExpenseId, InvalidTiltMode, RoundingUnit, SettlementPolicy, TiltMode};
use thiserror::Error;

#[derive(Debug, Parser)]
#[command(name = "tatekae", version)]
#[command(about = "Settle shared group expenses from a JSON snapshot")]
pub struct Args {
    /// Group snapshot (JSON)
    pub snapshot: PathBuf,
    /// Rounding unit for balances and transfers: 1, 10, 100 or 1000
    #[arg(long, env = "TATEKAE_ROUNDING_UNIT")]
    pub unit: Option<RoundingUnit>,
    /// Split mode for expenses without an override (none, rough, role_age, tilt)
    #[arg(long, env = "TATEKAE_TILT_MODE")]
    pub tilt: Option<TiltMode>,
    /// Split mode of a single expense
    #[arg(long = "tilt-override", value_name = "ID=MODE")]
    pub tilt_overrides: Vec<TiltOverride>,
    /// Settle only this expense
    #[arg(long, value_name = "ID")]
    pub expense: Option<String>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Args {
    /// Flag or environment first, then the unit stored with the group.
    pub fn policy(&self, group: &Group) -> SettlementPolicy {
        let unit = self
            .unit
            .or_else(|| group.rounding_unit())
            .unwrap_or_default();
        SettlementPolicy::default().with_unit(unit)
    }

    pub fn tilt_plan(&self) -> TiltPlan {
        self.tilt_overrides.iter().fold(
            TiltPlan::uniform(self.tilt.unwrap_or_default()),
            |plan, entry| plan.with_override(entry.expense.clone(), entry.mode),
        )
    }
}

/// `EXPENSE_ID=MODE` pair from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TiltOverride {
    pub expense: ExpenseId,
    pub mode: TiltMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TiltOverrideError {
    #[error("expected EXPENSE_ID=MODE, found '{0}'")]
    MissingSeparator(String),
    #[error("expense id must not be empty")]
    EmptyExpense,
    #[error(transparent)]
    Mode(#[from] InvalidTiltMode),
}

impl FromStr for TiltOverride {
    type Err = TiltOverrideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (expense, mode) = s
            .split_once('=')
            .ok_or_else(|| TiltOverrideError::MissingSeparator(s.to_string()))?;
        let expense = expense.trim();
        if expense.is_empty() {
            return Err(TiltOverrideError::EmptyExpense);
        }
        Ok(Self {
            expense: ExpenseId::from(expense),
            mode: mode.parse()?,
        })
    }
}

use tatekae_application::{InputError, SettlementBuildError};
use tatekae_i18n as i18n;

pub fn format_settlement_error(error: &SettlementBuildError) -> String {
    match error {
        SettlementBuildError::Input(InputError::UnknownExpense(id)) => {
            i18n::unknown_expense(id).to_string()
        }
        SettlementBuildError::Input(err) => err.to_string(),
        SettlementBuildError::Settlement(err) => {
            format!("{}: {err}", i18n::SETTLEMENT_CALCULATION_FAILED)
        }
    }
}

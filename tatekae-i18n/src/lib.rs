#[cfg(all(feature = "ja", feature = "en"))]
compile_error!("Cannot enable both 'ja' and 'en' features at the same time");

#[cfg(feature = "ja")]
pub mod strings {
    pub const MEMBER: &str = "メンバー";
    pub const BALANCE: &str = "収支";
    pub const FROM: &str = "支払人";
    pub const TO: &str = "受取人";
    pub const AMOUNT: &str = "金額";
    pub const BALANCES_HEADER: &str = "収支一覧";
    pub const NO_SETTLEMENT_NEEDED: &str = "清算の必要はありません";
    pub const SETTLEMENT_CALCULATION_FAILED: &str = "清算の計算に失敗しました";
}

#[cfg(feature = "en")]
pub mod strings {
    pub const MEMBER: &str = "Member";
    pub const BALANCE: &str = "Balance";
    pub const FROM: &str = "From";
    pub const TO: &str = "To";
    pub const AMOUNT: &str = "Amount";
    pub const BALANCES_HEADER: &str = "Balances";
    pub const NO_SETTLEMENT_NEEDED: &str = "No settlement needed";
    pub const SETTLEMENT_CALCULATION_FAILED: &str = "Settlement calculation failed";
}

#[cfg(not(any(feature = "ja", feature = "en")))]
pub mod strings {
    pub const MEMBER: &str = "Member";
    pub const BALANCE: &str = "Balance";
    pub const FROM: &str = "From";
    pub const TO: &str = "To";
    pub const AMOUNT: &str = "Amount";
    pub const BALANCES_HEADER: &str = "Balances";
    pub const NO_SETTLEMENT_NEEDED: &str = "No settlement needed";
    pub const SETTLEMENT_CALCULATION_FAILED: &str = "Settlement calculation failed";
}

pub use strings::*;

#[cfg(feature = "ja")]
pub fn settlement_header(unit: impl std::fmt::Display) -> String {
    format!("清算方法（丸め単位：{unit}）")
}

#[cfg(feature = "ja")]
pub fn settlement_total(total: impl std::fmt::Display) -> String {
    format!("（合計受取＝合計支払＝{total}）")
}

#[cfg(feature = "ja")]
pub fn expense_header(title: impl std::fmt::Display) -> String {
    format!("「{title}」の清算")
}

#[cfg(feature = "en")]
pub fn settlement_header(unit: impl std::fmt::Display) -> String {
    format!("Settlement (rounding unit: {unit})")
}

#[cfg(feature = "en")]
pub fn settlement_total(total: impl std::fmt::Display) -> String {
    format!("(total received = total paid = {total})")
}

#[cfg(feature = "en")]
pub fn expense_header(title: impl std::fmt::Display) -> String {
    format!("Settlement for '{title}'")
}

#[cfg(not(any(feature = "ja", feature = "en")))]
pub fn settlement_header(unit: impl std::fmt::Display) -> String {
    format!("Settlement (rounding unit: {unit})")
}

#[cfg(not(any(feature = "ja", feature = "en")))]
pub fn settlement_total(total: impl std::fmt::Display) -> String {
    format!("(total received = total paid = {total})")
}

#[cfg(not(any(feature = "ja", feature = "en")))]
pub fn expense_header(title: impl std::fmt::Display) -> String {
    format!("Settlement for '{title}'")
}

pub struct UnknownExpenseMessage<'a> {
    id: &'a str,
}

pub fn unknown_expense(id: &str) -> UnknownExpenseMessage<'_> {
    UnknownExpenseMessage { id }
}

#[cfg(feature = "ja")]
impl std::fmt::Display for UnknownExpenseMessage<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "支出 '{}' が見つかりません", self.id)
    }
}

#[cfg(not(feature = "ja"))]
impl std::fmt::Display for UnknownExpenseMessage<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Expense '{}' was not found", self.id)
    }
}

use tatekae_domain::Money;

/// `¥1,234`, `-¥500`.
pub fn format_yen(amount: Money) -> String {
    let sign = if amount.is_negative() { "-" } else { "" };
    format!("{sign}¥{}", group_thousands(amount.amount().unsigned_abs()))
}

/// Like [`format_yen`] but non-negative amounts carry a `+`.
pub fn format_signed_yen(amount: Money) -> String {
    if amount.is_negative() {
        format_yen(amount)
    } else {
        format!("+{}", format_yen(amount))
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, digit) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

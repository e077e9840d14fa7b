use crate::{
    text_table::{Alignment, TextTableBuilder},
    yen::{format_signed_yen, format_yen},
};
use std::{borrow::Cow, fmt::Write as _};
use tatekae_application::{ExpenseSettlement, NamedTransfer, SettlementSummary};
use tatekae_i18n as i18n;

pub struct SettlementPresenter;

impl SettlementPresenter {
    /// Copy-ready settlement message: a header naming the unit, one
    /// `from → to：¥amount` line per transfer and the grand total.
    pub fn settlement_text(summary: &SettlementSummary) -> String {
        if summary.is_settled() {
            return i18n::NO_SETTLEMENT_NEEDED.to_string();
        }

        let mut text = String::with_capacity(48 * (summary.transfers.len() + 2));
        text.push_str(&i18n::settlement_header(format!("¥{}", summary.unit)));
        for transfer in &summary.transfers {
            let _ = write!(text, "\n{}", transfer_line(transfer));
        }
        let _ = write!(
            text,
            "\n{}",
            i18n::settlement_total(format_yen(summary.total()))
        );
        text
    }

    pub fn balance_text(summary: &SettlementSummary) -> String {
        summary
            .balances
            .iter()
            .map(|balance| format!("{}: {}", balance.name, format_signed_yen(balance.net)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn balance_table(summary: &SettlementSummary) -> String {
        let headers = [Cow::Borrowed(i18n::MEMBER), Cow::Borrowed(i18n::BALANCE)];
        TextTableBuilder::new()
            .alignments(&[Alignment::Left, Alignment::Right])
            .headers(&headers)
            .rows(summary.balances.iter().map(|balance| {
                [
                    Cow::Borrowed(balance.name.as_str()),
                    Cow::Owned(format_signed_yen(balance.net)),
                ]
            }))
            .build()
    }

    pub fn transfer_table(summary: &SettlementSummary) -> Option<String> {
        if summary.is_settled() {
            return None;
        }

        let headers = [
            Cow::Borrowed(i18n::FROM),
            Cow::Borrowed(i18n::TO),
            Cow::Borrowed(i18n::AMOUNT),
        ];
        let table = TextTableBuilder::new()
            .alignments(&[Alignment::Left, Alignment::Left, Alignment::Right])
            .headers(&headers)
            .rows(summary.transfers.iter().map(|transfer| {
                [
                    Cow::Borrowed(transfer.from_name.as_str()),
                    Cow::Borrowed(transfer.to_name.as_str()),
                    Cow::Owned(format_yen(transfer.amount)),
                ]
            }))
            .build();
        Some(table)
    }

    /// Per-expense view: each beneficiary's share followed by the settlement text.
    pub fn expense_text(settlement: &ExpenseSettlement) -> String {
        let title = settlement
            .summary
            .title
            .as_deref()
            .unwrap_or(settlement.expense_id.as_str());

        let mut text = i18n::expense_header(title);
        for share in &settlement.shares {
            let _ = write!(text, "\n{}: {}", share.name, format_yen(share.amount));
        }
        text.push_str("\n\n");
        text.push_str(&Self::settlement_text(&settlement.summary));
        text
    }
}

fn transfer_line(transfer: &NamedTransfer) -> String {
    format!(
        "{} → {}：{}",
        transfer.from_name,
        transfer.to_name,
        format_yen(transfer.amount)
    )
}

#![warn(clippy::uninlined_format_args)]

pub mod error_presenter;
pub mod settlement_presenter;
pub mod text_table;
pub mod yen;

pub use error_presenter::format_settlement_error;
pub use settlement_presenter::SettlementPresenter;
pub use yen::{format_signed_yen, format_yen};

//! Attachment fields of the invoice form after a budget check.

use std::fmt::Write as _;

use prometheus_core::budget::{MemoReason, MemoRequirement};
use rust_decimal::Decimal;

use crate::html::escape;

/// Warning for an invoice above the remaining register-line balance.
#[must_use]
pub fn exceeds_balance_warning(requested: Decimal, balance: Decimal) -> String {
    format!(
        "Сумма {} превышает остаток по бюджету ({}). Требуется служебная записка.",
        requested.normalize(),
        balance.normalize()
    )
}

/// Warning for a balance lookup that failed.
#[must_use]
pub fn balance_unavailable_warning(message: &str) -> String {
    format!("Не удалось проверить баланс бюджета: {message}")
}

/// Which attachments the invoice form shows and requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceCheckView {
    /// The signed contract must be attached.
    pub contract_required: bool,
    /// Whether the memo (служебная записка) must be attached, and why.
    pub memo: MemoRequirement,
    /// Message shown to the submitter, if any.
    pub warning: Option<String>,
}

impl InvoiceCheckView {
    /// Builds the view, deriving the warning from the memo reason.
    ///
    /// `lookup_error` is the failure text when the balance could not be read.
    #[must_use]
    pub fn new(contract_required: bool, memo: MemoRequirement, lookup_error: Option<&str>) -> Self {
        let warning = match &memo {
            MemoRequirement::Required(MemoReason::ExceedsBalance { requested, balance }) => {
                Some(exceeds_balance_warning(*requested, *balance))
            }
            MemoRequirement::Required(MemoReason::BalanceUnavailable) => Some(
                balance_unavailable_warning(lookup_error.unwrap_or("нет ответа")),
            ),
            _ => None,
        };

        Self {
            contract_required,
            memo,
            warning,
        }
    }

    /// Returns true if the memo input is shown and required.
    #[must_use]
    pub const fn memo_required(&self) -> bool {
        self.memo.is_required()
    }

    /// Renders the contract field, the memo field and the warning.
    #[must_use]
    pub fn render(&self) -> String {
        let mut html = String::new();
        file_field(&mut html, "contract-field", "contract", "Договор", self.contract_required);
        file_field(&mut html, "memo-field", "memo", "Служебная записка", self.memo_required());
        if let Some(warning) = &self.warning {
            let _ = write!(
                html,
                r#"<div class="alert alert-warning">{}</div>"#,
                escape(warning)
            );
        }
        html
    }
}

fn file_field(html: &mut String, id: &str, name: &str, label: &str, required: bool) {
    let display = if required { "block" } else { "none" };
    let required = if required { " required" } else { "" };
    let _ = write!(
        html,
        r#"<div id="{id}" style="display: {display};"><label for="{name}">{label}</label><input type="file" id="{name}" name="{name}"{required}></div>"#
    );
}

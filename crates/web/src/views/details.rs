//! Per-installment debt breakdown shown under an expanded debtor row.

use std::fmt::Write as _;

use prometheus_core::installment::AllocationSummary;
use prometheus_shared::types::{format_date, format_kzt};

use crate::html::{class_attr, escape};

/// Heading above the breakdown table.
pub const DETAILS_HEADING: &str = "Детализация долга по траншам:";
/// Shown when the contract has no planned installments.
pub const NO_PLAN_MESSAGE: &str = "План оплат для этого договора не найден.";
/// Shown when the plan or the payments could not be loaded.
pub const DETAILS_ERROR_MESSAGE: &str = "Не удалось загрузить детали.";
/// Label of the line reporting money paid beyond the plan.
pub const OVERPAYMENT_LABEL: &str = "Переплата";

const COLUMNS: [&str; 5] = ["Наименование", "Плановая дата", "План", "Оплачено", "Остаток"];

/// What the details cell shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailsView {
    /// Allocation table for a contract with a plan.
    Breakdown(AllocationSummary),
    /// The contract has no plan.
    NoPlan,
    /// Loading failed.
    Failed,
}

impl From<AllocationSummary> for DetailsView {
    fn from(summary: AllocationSummary) -> Self {
        if summary.is_empty() {
            Self::NoPlan
        } else {
            Self::Breakdown(summary)
        }
    }
}

impl DetailsView {
    /// Renders the fragment that goes into the details cell.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Breakdown(summary) => render_breakdown(summary),
            Self::NoPlan => format!("<p>{}</p>", escape(NO_PLAN_MESSAGE)),
            Self::Failed => format!(r#"<p class="text-danger">{}</p>"#, escape(DETAILS_ERROR_MESSAGE)),
        }
    }
}

fn render_breakdown(summary: &AllocationSummary) -> String {
    let mut html = String::new();
    let _ = write!(html, "<h5>{}</h5>", escape(DETAILS_HEADING));
    html.push_str(r#"<table class="nested-table"><thead><tr>"#);
    for column in COLUMNS {
        let _ = write!(html, "<th>{column}</th>");
    }
    html.push_str("</tr></thead><tbody>");

    for row in &summary.rows {
        let date = row.payment_date.map(format_date).unwrap_or_default();
        let remaining_class = if row.has_debt() { "debt-amount" } else { "" };
        let _ = write!(
            html,
            "<tr{}><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td{}>{}</td></tr>",
            class_attr(if row.is_paid { "paid" } else { "" }),
            escape(&row.payment_name),
            escape(&date),
            escape(&format_kzt(row.planned_amount)),
            escape(&format_kzt(row.paid_amount)),
            class_attr(remaining_class),
            escape(&format_kzt(row.remaining_amount)),
        );
    }
    html.push_str("</tbody></table>");

    if summary.is_overpaid() {
        let _ = write!(
            html,
            r#"<p class="overpayment">{OVERPAYMENT_LABEL}: {}</p>"#,
            escape(&format_kzt(summary.unallocated_surplus))
        );
    }

    html
}

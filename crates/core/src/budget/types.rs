//! Budget gate data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Register-line value meaning "not part of any budget line".
pub const NOT_IN_BUDGET: &str = "Не входит в статью бюджетов";

/// Register line selected on the invoice form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegisterLine {
    /// The invoice is outside every budget line.
    NotInBudget,
    /// A named register line.
    Line(String),
}

impl RegisterLine {
    /// Reads the select's value. An empty value means nothing is selected.
    #[must_use]
    pub fn from_form_value(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            None
        } else if value == NOT_IN_BUDGET {
            Some(Self::NotInBudget)
        } else {
            Some(Self::Line(value.to_string()))
        }
    }

    /// Value as sent to the backend.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::NotInBudget => NOT_IN_BUDGET,
            Self::Line(name) => name,
        }
    }
}

/// Invoice form fields that drive the budget check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceBudgetForm {
    /// Department display name.
    pub department: Option<String>,
    /// Budget item (category) the register line belongs to.
    pub budget_item: Option<String>,
    /// Selected register line.
    pub register_line: Option<RegisterLine>,
    /// Requested invoice amount.
    pub amount: Decimal,
}

/// Balance lookup for one department / budget item / register line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetBalanceQuery {
    /// Department display name.
    pub department: String,
    /// Budget item name.
    pub budget_item: String,
    /// Register line name.
    pub register_item: String,
    /// Requested invoice amount.
    pub requested_amount: Decimal,
}

/// Outcome of the numeric comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateDecision {
    /// The requested amount is above the remaining balance.
    pub exceeds: bool,
}

impl GateDecision {
    /// Inverse of `exceeds`.
    #[must_use]
    pub const fn within_budget(self) -> bool {
        !self.exceeds
    }
}

/// Why a memo has to be attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason")]
pub enum MemoReason {
    /// The invoice is outside every budget line.
    NotInBudget,
    /// The requested amount is above the remaining balance.
    ExceedsBalance {
        /// Requested invoice amount.
        requested: Decimal,
        /// Remaining register-line balance.
        balance: Decimal,
    },
    /// The balance could not be looked up.
    BalanceUnavailable,
}

/// Whether the memo file input is shown and required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemoRequirement {
    /// Memo hidden and optional.
    NotRequired,
    /// Memo shown and required.
    Required(MemoReason),
}

impl MemoRequirement {
    /// Returns true if the memo must be attached.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        matches!(self, Self::Required(_))
    }
}

/// First step of the check, before any I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetCheck {
    /// The form alone settles the memo question.
    Decided(MemoRequirement),
    /// The register-line balance has to be fetched first.
    NeedsBalance(BudgetBalanceQuery),
}

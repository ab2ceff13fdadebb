//! Installment and payment data types.

use chrono::NaiveDate;
use prometheus_shared::types::{ContractId, PaymentFactId, PlannedPaymentId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One scheduled payment obligation under a contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedInstallment {
    /// Planned payment ID, when the backend sent one.
    pub id: Option<PlannedPaymentId>,
    /// Owning contract.
    pub contract_id: ContractId,
    /// Free-text label, e.g. "Платеж 3".
    pub payment_name: String,
    /// Due date. `None` when the backend sent something unparsable.
    pub payment_date: Option<NaiveDate>,
    /// Amount originally scheduled.
    pub planned_amount: Decimal,
}

/// One recorded money receipt against a contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActualPayment {
    /// Payment fact ID, when the backend sent one.
    pub id: Option<PaymentFactId>,
    /// Contract the money was paid against.
    pub contract_id: ContractId,
    /// Amount received.
    pub amount: Decimal,
    /// Receipt date. Informational only.
    pub payment_date: Option<NaiveDate>,
}

/// Paid/remaining projection of a single installment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationResult {
    /// Installment label.
    pub payment_name: String,
    /// Installment due date.
    pub payment_date: Option<NaiveDate>,
    /// Amount originally scheduled.
    pub planned_amount: Decimal,
    /// Part of the paid pool attributed to this installment.
    pub paid_amount: Decimal,
    /// `planned_amount - paid_amount`.
    pub remaining_amount: Decimal,
    /// Fully covered, within a one-tiyn tolerance.
    pub is_paid: bool,
}

impl AllocationResult {
    /// Returns true if something is still owed on this installment.
    #[must_use]
    pub fn has_debt(&self) -> bool {
        self.remaining_amount > Decimal::ZERO
    }
}

/// Result of one allocation run over a contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationSummary {
    /// Per-installment rows in chronological order.
    pub rows: Vec<AllocationResult>,
    /// Sum of positive planned amounts.
    pub total_planned: Decimal,
    /// Total of actual payments that entered the waterfall.
    pub total_paid: Decimal,
    /// Part of `total_paid` attributed to installments.
    pub total_allocated: Decimal,
    /// Sum of positive remaining amounts.
    pub total_outstanding: Decimal,
    /// Paid money left over after the last installment was covered.
    pub unallocated_surplus: Decimal,
}

impl AllocationSummary {
    /// Returns true if there is no plan to allocate against.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns true if the contract received more than its plan asks for.
    #[must_use]
    pub fn is_overpaid(&self) -> bool {
        self.unallocated_surplus > Decimal::ZERO
    }
}

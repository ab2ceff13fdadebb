//! Invoice submission form: which attachments are required.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use prometheus_client::CrmApi;
use prometheus_core::budget::{BudgetCheck, BudgetGate, InvoiceBudgetForm, RegisterLine};
use prometheus_shared::AppResult;
use prometheus_shared::config::InvoicesConfig;
use prometheus_shared::types::parse_amount_input;
use rust_decimal::Decimal;

use crate::views::InvoiceCheckView;

/// Builds the budget part of the form from raw input values.
///
/// Blank fields are treated as not selected.
#[must_use]
pub fn read_form(department: &str, budget_item: &str, register_line: &str, amount: &str) -> InvoiceBudgetForm {
    let selected = |value: &str| Some(value.trim().to_string()).filter(|v| !v.is_empty());

    InvoiceBudgetForm {
        department: selected(department),
        budget_item: selected(budget_item),
        register_line: RegisterLine::from_form_value(register_line),
        amount: parse_amount_input(amount),
    }
}

/// Result of a form check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// The latest check.
    Current(InvoiceCheckView),
    /// A newer check started while this one waited for the balance.
    Superseded,
}

/// Re-evaluates the invoice form on every change of department, budget
/// item, register line or amount.
pub struct InvoiceFormController<A: ?Sized> {
    api: Arc<A>,
    contract_threshold: Decimal,
    generation: AtomicU64,
}

impl<A: CrmApi + ?Sized> InvoiceFormController<A> {
    /// Creates the controller with the configured contract threshold.
    pub fn new(api: Arc<A>, config: &InvoicesConfig) -> Self {
        Self {
            api,
            contract_threshold: config.contract_threshold,
            generation: AtomicU64::new(0),
        }
    }

    /// Decides which attachments the form requires.
    ///
    /// The balance is fetched only when the form names a department, budget
    /// item and register line and the amount is positive. A failed lookup
    /// requires the memo.
    pub async fn check(&self, form: &InvoiceBudgetForm) -> AppResult<CheckOutcome> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let contract_required = BudgetGate::contract_required(form.amount, self.contract_threshold);

        let (memo, lookup_error) = match BudgetGate::precheck(form) {
            BudgetCheck::Decided(memo) => (memo, None),
            BudgetCheck::NeedsBalance(query) => match self.api.budget_balance(&query).await {
                Ok(balance) => (BudgetGate::decide(&query, Some(balance)), None),
                Err(e) if e.requires_login() => return Err(e),
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        code = e.error_code(),
                        department = %query.department,
                        register_item = %query.register_item,
                        "Budget balance lookup failed, memo required"
                    );
                    (BudgetGate::decide(&query, None), Some(e.to_string()))
                }
            },
        };

        if self.generation.load(Ordering::SeqCst) != generation {
            return Ok(CheckOutcome::Superseded);
        }

        Ok(CheckOutcome::Current(InvoiceCheckView::new(
            contract_required,
            memo,
            lookup_error.as_deref(),
        )))
    }
}

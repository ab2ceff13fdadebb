//! Budget gate decisions.

use rust_decimal::Decimal;

use super::types::{
    BudgetBalanceQuery, BudgetCheck, GateDecision, InvoiceBudgetForm, MemoReason, MemoRequirement,
    RegisterLine,
};

/// Budget gate for invoice submission.
pub struct BudgetGate;

impl BudgetGate {
    /// Compares a requested amount with the remaining balance.
    ///
    /// `exceeds == requested_amount > remaining_balance`; an amount equal to
    /// the balance still fits.
    #[must_use]
    pub fn evaluate(remaining_balance: Decimal, requested_amount: Decimal) -> GateDecision {
        GateDecision {
            exceeds: requested_amount > remaining_balance,
        }
    }

    /// Settles what can be settled from the form alone.
    ///
    /// * "not in budget" always requires the memo, whatever the numbers
    /// * an incomplete form (or a non-positive amount) requires nothing yet
    /// * otherwise the balance must be fetched
    #[must_use]
    pub fn precheck(form: &InvoiceBudgetForm) -> BudgetCheck {
        let register_item = match &form.register_line {
            Some(RegisterLine::NotInBudget) => {
                return BudgetCheck::Decided(MemoRequirement::Required(MemoReason::NotInBudget));
            }
            Some(RegisterLine::Line(name)) => name,
            None => return BudgetCheck::Decided(MemoRequirement::NotRequired),
        };

        let department = non_blank(form.department.as_deref());
        let budget_item = non_blank(form.budget_item.as_deref());

        match (department, budget_item) {
            (Some(department), Some(budget_item)) if form.amount > Decimal::ZERO => {
                BudgetCheck::NeedsBalance(BudgetBalanceQuery {
                    department: department.to_string(),
                    budget_item: budget_item.to_string(),
                    register_item: register_item.clone(),
                    requested_amount: form.amount,
                })
            }
            _ => BudgetCheck::Decided(MemoRequirement::NotRequired),
        }
    }

    /// Finishes the check once the balance lookup has completed.
    ///
    /// `None` means the lookup failed; the gate then fails closed and
    /// requires the memo.
    #[must_use]
    pub fn decide(query: &BudgetBalanceQuery, balance: Option<Decimal>) -> MemoRequirement {
        let Some(balance) = balance else {
            return MemoRequirement::Required(MemoReason::BalanceUnavailable);
        };

        if Self::evaluate(balance, query.requested_amount).exceeds {
            MemoRequirement::Required(MemoReason::ExceedsBalance {
                requested: query.requested_amount,
                balance,
            })
        } else {
            MemoRequirement::NotRequired
        }
    }

    /// Returns true if the invoice needs a signed contract attached.
    ///
    /// Independent of the budget balance: only the amount matters, and only
    /// amounts strictly above the threshold qualify.
    #[must_use]
    pub fn contract_required(amount: Decimal, threshold: Decimal) -> bool {
        amount > threshold
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

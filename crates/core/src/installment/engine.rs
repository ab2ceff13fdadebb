//! Waterfall allocation of paid money against planned installments.
//!
//! Payments are recorded as lump sums against a contract, never against a
//! particular installment. The engine attributes the pooled total to the
//! earliest-due installments first:
//! 1. Stable-sort installments by due date (undated ones last)
//! 2. Give each installment `min(pool, planned)`, never less than zero
//! 3. Whatever is left after the last installment is surplus

use std::cmp::Ordering;

use rust_decimal::Decimal;

use super::types::{ActualPayment, AllocationResult, AllocationSummary, PlannedInstallment};

/// Tolerance under which an installment counts as fully paid (0.01).
pub const PAID_EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Allocation engine for installment plans.
///
/// Stateless: every call is a pure function of its inputs, so results are
/// recomputed on each view rather than cached.
pub struct AllocationEngine;

impl AllocationEngine {
    /// Distributes `total_paid` across `installments`, earliest due first.
    ///
    /// Returns one row per installment in chronological order. Negative
    /// totals are treated as zero; installments with a zero or negative plan
    /// receive nothing.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use prometheus_core::installment::{AllocationEngine, PlannedInstallment};
    /// use prometheus_shared::types::ContractId;
    ///
    /// let plan = vec![PlannedInstallment {
    ///     id: None,
    ///     contract_id: ContractId::new(1),
    ///     payment_name: "Платеж 1".into(),
    ///     payment_date: None,
    ///     planned_amount: dec!(100),
    /// }];
    /// let rows = AllocationEngine::allocate(&plan, dec!(40));
    /// assert_eq!(rows[0].paid_amount, dec!(40));
    /// assert_eq!(rows[0].remaining_amount, dec!(60));
    /// ```
    #[must_use]
    pub fn allocate(installments: &[PlannedInstallment], total_paid: Decimal) -> Vec<AllocationResult> {
        Self::run(installments, total_paid).0
    }

    /// Same as [`allocate`](Self::allocate), with contract-level totals.
    #[must_use]
    pub fn allocate_summary(
        installments: &[PlannedInstallment],
        total_paid: Decimal,
    ) -> AllocationSummary {
        let (rows, surplus) = Self::run(installments, total_paid);

        let total_planned = saturating_sum(rows.iter().map(|r| r.planned_amount.max(Decimal::ZERO)));
        let total_allocated = saturating_sum(rows.iter().map(|r| r.paid_amount));
        let total_outstanding =
            saturating_sum(rows.iter().map(|r| r.remaining_amount.max(Decimal::ZERO)));

        AllocationSummary {
            rows,
            total_planned,
            total_paid: total_paid.max(Decimal::ZERO),
            total_allocated,
            total_outstanding,
            unallocated_surplus: surplus,
        }
    }

    /// Sums recorded payments. Negative amounts contribute nothing.
    ///
    /// Saturates at `Decimal::MAX` rather than overflowing on absurd amounts.
    #[must_use]
    pub fn total_paid(payments: &[ActualPayment]) -> Decimal {
        saturating_sum(payments.iter().map(|p| p.amount.max(Decimal::ZERO)))
    }

    fn run(installments: &[PlannedInstallment], total_paid: Decimal) -> (Vec<AllocationResult>, Decimal) {
        let mut ordered: Vec<&PlannedInstallment> = installments.iter().collect();
        // sort_by is stable: same-day installments keep their server order
        ordered.sort_by(|a, b| compare_due_dates(a, b));

        let mut pool = total_paid.max(Decimal::ZERO);

        let rows = ordered
            .into_iter()
            .map(|installment| {
                let planned = installment.planned_amount;
                let allocated = if planned > Decimal::ZERO {
                    pool.min(planned).max(Decimal::ZERO)
                } else {
                    Decimal::ZERO
                };
                pool -= allocated;

                let remaining = planned - allocated;
                AllocationResult {
                    payment_name: installment.payment_name.clone(),
                    payment_date: installment.payment_date,
                    planned_amount: planned,
                    paid_amount: allocated,
                    remaining_amount: remaining,
                    is_paid: planned > Decimal::ZERO && remaining <= PAID_EPSILON,
                }
            })
            .collect();

        (rows, pool)
    }
}

fn saturating_sum(amounts: impl Iterator<Item = Decimal>) -> Decimal {
    amounts.fold(Decimal::ZERO, Decimal::saturating_add)
}

fn compare_due_dates(a: &PlannedInstallment, b: &PlannedInstallment) -> Ordering {
    match (a.payment_date, b.payment_date) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

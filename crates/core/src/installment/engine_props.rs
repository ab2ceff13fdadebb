//! Property-based tests for the installment waterfall.
//!
//! Covers conservation, per-installment bounds, chronological precedence,
//! idempotence and the paid flag.

use chrono::NaiveDate;
use proptest::prelude::*;
use prometheus_shared::types::ContractId;
use rust_decimal::Decimal;

use super::engine::{AllocationEngine, PAID_EPSILON};
use super::types::PlannedInstallment;

/// Strategy to generate a non-negative amount from 0.00 to 1,000,000.00.
fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a due date within a few school years.
fn due_date() -> impl Strategy<Value = NaiveDate> {
    (0i64..1500).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2022, 9, 1).expect("valid date") + chrono::Duration::days(offset)
    })
}

/// Strategy to generate an unordered payment plan.
fn plan() -> impl Strategy<Value = Vec<PlannedInstallment>> {
    prop::collection::vec((due_date(), amount()), 0..12).prop_map(|items| {
        items
            .into_iter()
            .enumerate()
            .map(|(i, (date, planned))| PlannedInstallment {
                id: None,
                contract_id: ContractId::new(1),
                payment_name: format!("Платеж {}", i + 1),
                payment_date: Some(date),
                planned_amount: planned,
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Paid amounts add up to min(total paid, total planned).
    #[test]
    fn prop_waterfall_conservation(plan in plan(), paid in amount()) {
        let rows = AllocationEngine::allocate(&plan, paid);

        let allocated: Decimal = rows.iter().map(|r| r.paid_amount).sum();
        let planned: Decimal = plan.iter().map(|p| p.planned_amount).sum();

        prop_assert_eq!(allocated, paid.min(planned));
    }

    /// Every installment receives between zero and its planned amount.
    #[test]
    fn prop_per_installment_bound(plan in plan(), paid in amount()) {
        for row in AllocationEngine::allocate(&plan, paid) {
            prop_assert!(row.paid_amount >= Decimal::ZERO);
            prop_assert!(row.paid_amount <= row.planned_amount);
            prop_assert_eq!(row.remaining_amount, row.planned_amount - row.paid_amount);
        }
    }

    /// An earlier installment is settled before a later one gets anything.
    #[test]
    fn prop_chronological_precedence(plan in plan(), paid in amount()) {
        let rows = AllocationEngine::allocate(&plan, paid);

        for (i, earlier) in rows.iter().enumerate() {
            for later in &rows[i + 1..] {
                prop_assert!(earlier.payment_date <= later.payment_date);
                if earlier.payment_date < later.payment_date && later.paid_amount > Decimal::ZERO {
                    prop_assert!(earlier.remaining_amount <= PAID_EPSILON);
                }
            }
        }
    }

    /// Two runs over the same inputs agree.
    #[test]
    fn prop_idempotent(plan in plan(), paid in amount()) {
        let first = AllocationEngine::allocate(&plan, paid);
        let second = AllocationEngine::allocate(&plan, paid);
        prop_assert_eq!(first, second);
    }

    /// is_paid iff planned > 0 and remaining <= 0.01.
    #[test]
    fn prop_is_paid_consistency(plan in plan(), paid in amount()) {
        for row in AllocationEngine::allocate(&plan, paid) {
            let expected = row.planned_amount > Decimal::ZERO && row.remaining_amount <= PAID_EPSILON;
            prop_assert_eq!(row.is_paid, expected);
            if row.planned_amount.is_zero() {
                prop_assert!(!row.is_paid);
            }
        }
    }

    /// Allocated plus surplus equals what was paid.
    #[test]
    fn prop_summary_accounts_for_every_tiyn(plan in plan(), paid in amount()) {
        let summary = AllocationEngine::allocate_summary(&plan, paid);
        prop_assert_eq!(summary.total_allocated + summary.unallocated_surplus, paid);
        prop_assert_eq!(summary.total_outstanding, summary.total_planned - summary.total_allocated);
    }
}

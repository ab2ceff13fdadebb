//! Installment plans and the paid/remaining waterfall.

pub mod engine;
pub mod types;

#[cfg(test)]
mod engine_props;

pub use engine::{AllocationEngine, PAID_EPSILON};
pub use types::{ActualPayment, AllocationResult, AllocationSummary, PlannedInstallment};

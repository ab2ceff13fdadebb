//! Budget-balance gate for invoice submission.
//!
//! Decides whether an invoice needs a supporting memo (служебная записка)
//! and whether it needs a signed contract attached.

pub mod service;
pub mod types;


pub use service::BudgetGate;
pub use types::{
    BudgetBalanceQuery, BudgetCheck, GateDecision, InvoiceBudgetForm, MemoReason, MemoRequirement,
    NOT_IN_BUDGET, RegisterLine,
};

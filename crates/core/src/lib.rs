//! Core business logic for Prometheus CRM payment reconciliation.
//!
//! This crate contains pure business logic with ZERO http or rendering dependencies.
//! All domain types, decision rules, and calculations live here.
//!
//! # Modules
//!
//! - `installment` - Waterfall allocation of paid money over a payment plan
//! - `budget` - Budget-balance gate for invoice submission
//! - `tuition` - Tuition price resolution for new contracts
//! - `contract` - Contract creation retry policy

pub mod budget;
pub mod contract;
pub mod installment;
pub mod tuition;

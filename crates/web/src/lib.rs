//! Page controllers and HTML fragments for Prometheus CRM.
//!
//! # Modules
//!
//! - `pages` - Controllers for the reconciliation, invoice and contracts pages
//! - `views` - View models rendered to HTML fragments
//! - `html` - Escaping and small markup helpers
//!
//! Controllers talk to the backend only through [`prometheus_client::CrmApi`],
//! so they run unchanged against an in-memory fake.

pub mod html;
pub mod pages;
pub mod views;

#[cfg(test)]
mod testing;

pub use pages::{
    CheckOutcome, ContractsPage, DebtorList, DetailsOutcome, InvoiceFormController,
    ReconciliationPage,
};

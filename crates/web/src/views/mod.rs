//! Typed view models and their HTML.

pub mod debtors;
pub mod details;
pub mod invoice;

pub use debtors::{render_debtor_rows, render_debtors_error, render_pagination};
pub use details::DetailsView;
pub use invoice::InvoiceCheckView;

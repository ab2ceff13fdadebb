//! Page controllers. Each owns the state of one page view.

pub mod contracts;
pub mod invoice;
pub mod reconciliation;

pub use contracts::ContractsPage;
pub use invoice::{CheckOutcome, InvoiceFormController, read_form};
pub use reconciliation::{DebtorList, DetailsOutcome, ReconciliationPage};

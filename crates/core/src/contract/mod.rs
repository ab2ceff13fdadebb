//! Contract creation rules.

pub mod retry;

pub use retry::{RetryPolicy, is_duplicate_contract_number};

//! Common types used across the application.

pub mod date;
pub mod id;
pub mod money;
pub mod pagination;

pub use date::{format_date, parse_api_date};
pub use id::*;
pub use money::{format_kzt, parse_amount, parse_amount_input, try_parse_amount};
pub use pagination::PageResponse;

//! Tuition price lookup for new contracts.

pub mod service;
pub mod types;


pub use service::TuitionService;
pub use types::{GRANDFATHERED_PRICE_YEAR, TuitionFeeMap, TuitionResolution};

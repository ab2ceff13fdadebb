//! REST client for the Prometheus CRM backend.
//!
//! [`CrmApi`] is the seam page controllers depend on; [`HttpCrmApi`] is the
//! `reqwest` implementation. Backend payloads are normalized in [`wire`]
//! before anything else sees them.

pub mod api;
pub mod contracts;
pub mod http;
pub mod models;
pub mod token;
pub mod wire;

pub use api::CrmApi;
pub use contracts::{compute_tuition_for_student, create_contract_for_student};
pub use http::HttpCrmApi;
pub use models::{Debtor, NewContract, Student};
pub use token::{SessionToken, StaticToken, TokenStore};

//! Shared types, errors, and configuration for Prometheus CRM.
//!
//! This crate provides common types used across all other crates:
//! - Money parsing and `KZT` display formatting with decimal precision
//! - Calendar date parsing and `DD.MM.YYYY` display
//! - Typed IDs for type-safe entity references
//! - Paginated list envelopes as returned by the CRM backend
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

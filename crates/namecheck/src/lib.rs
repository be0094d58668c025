//! Debounced name-uniqueness validation for Cycle forms
//!
//! This crate provides:
//! - A trailing-edge debouncer (one pending timer per instance)
//! - The uniqueness lookup seam, with an HTTP adapter and an in-memory set
//! - Form field validity state (`occupied` key, dirty tracking)
//! - The validator pipeline that discards superseded lookup results

pub mod debounce;
pub mod form;
pub mod query;
pub mod validator;

// Re-exports
pub use debounce::Debouncer;
pub use form::{FieldState, FormState, SharedField, OCCUPIED};
pub use query::{check_name, HttpNameQuery, NameAvailability, NameCheckOutcome, QueryError, TakenNames};
pub use validator::{CheckReport, NameValidator, ValidationRequest};

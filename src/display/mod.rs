//! Terminal output formatting

pub mod audit;

pub use audit::{format_audit_details, format_audit_list};

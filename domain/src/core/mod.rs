//! Core domain concepts shared across all subdomains.
//!
//! - [`agnostic`]: case/whitespace/punctuation-insensitive comparison
//! - [`error::DomainError`]: domain-level errors

pub mod agnostic;
pub mod error;

//! Core domain concepts shared across all subdomains.
//!
//! - [`identity::BackendIdentity`]: the name that joins results and rankings
//! - [`question::Question`]: a validated question to pose to every backend
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod identity;
pub mod question;

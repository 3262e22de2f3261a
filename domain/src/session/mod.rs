//! Session domain
//!
//! Role-tagged messages sent to backends.

pub mod entities;

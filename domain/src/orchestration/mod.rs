//! Fan-out orchestration domain
//!
//! Per-backend results, the batch that collects them, and the phases of a
//! judged round.

pub mod batch;
pub mod entities;
pub mod value_objects;

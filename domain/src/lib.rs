//! Domain layer for judge-panel
//!
//! This crate contains the core types and pure logic of a judged round.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! - **Backend**: one model endpoint, described by a [`BackendConfig`] and
//!   named by a [`BackendIdentity`]
//! - **Batch**: every backend's [`CompletionResult`] for one fan-out round
//! - **Judge**: a backend whose answer is read as a structured [`Ranking`]
//!
//! ```text
//! Question ──▶ fan-out ──▶ Batch ──▶ JudgePrompt ──▶ judge ──▶ parse_ranking ──▶ Ranking
//! ```

pub mod backend;
pub mod core;
pub mod orchestration;
pub mod prompt;
pub mod ranking;
pub mod session;

// Re-export commonly used types
pub use backend::config::BackendConfig;
pub use crate::core::{error::DomainError, identity::BackendIdentity, question::Question};
pub use orchestration::{
    batch::{Batch, BatchCollector},
    entities::Phase,
    value_objects::{CompletionResult, FailureKind},
};
pub use prompt::JudgePrompt;
pub use ranking::{MalformedRanking, RankEntry, Ranking, parse_ranking};
pub use session::entities::{Message, Role};

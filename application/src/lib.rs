//! Application layer for judge-panel
//!
//! This crate contains the use cases (fan-out dispatch, judging, full round),
//! the ports adapters implement, and dispatch parameters.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use config::DispatchParams;
pub use ports::{
    backend_client::{BackendClient, BackendError},
    progress::{NoProgress, ProgressNotifier},
};
pub use use_cases::dispatch::{DispatchError, FanOutDispatcher};
pub use use_cases::judge::{Judge, JudgeError};
pub use use_cases::run_round::{
    QuestionSource, RoundInput, RoundOutcome, RunRoundError, RunRoundUseCase,
};

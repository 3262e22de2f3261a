//! Fan-out dispatch use case
//!
//! Sends the same message sequence to every backend concurrently and
//! collects exactly one [`CompletionResult`] per backend.
//!
//! - At most `max_concurrency` calls are in flight; the rest wait on a semaphore.
//! - One deadline covers the whole round. Backends still running when it
//!   expires are aborted and recorded as timed out.
//! - Backend failures become failed results, never errors of `dispatch`.

use crate::config::DispatchParams;
use crate::ports::backend_client::BackendClient;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use panel_domain::{Batch, BatchCollector, CompletionResult, DomainError, FailureKind, Message, Phase};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::{Instant, timeout_at};
use tracing::{debug, info, warn};

/// Errors that prevent a round from being dispatched at all
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<DomainError> for DispatchError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::InvalidArgument(msg) => DispatchError::InvalidArgument(msg),
            other => DispatchError::InvalidArgument(other.to_string()),
        }
    }
}

/// Bounded-concurrency fan-out over a set of backends
#[derive(Debug, Clone, Default)]
pub struct FanOutDispatcher {
    params: DispatchParams,
}

impl FanOutDispatcher {
    pub fn new(params: DispatchParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &DispatchParams {
        &self.params
    }

    /// Dispatch with default (no-op) progress
    pub async fn dispatch(
        &self,
        messages: &[Message],
        backends: &[Arc<dyn BackendClient>],
    ) -> Result<Batch, DispatchError> {
        self.dispatch_with_progress(messages, backends, &NoProgress)
            .await
    }

    /// Dispatch with progress callbacks
    ///
    /// Returns a batch covering every backend, or `InvalidArgument` when the
    /// backend set is empty, identities repeat, the message sequence is empty
    /// or the concurrency cap is zero.
    pub async fn dispatch_with_progress(
        &self,
        messages: &[Message],
        backends: &[Arc<dyn BackendClient>],
        progress: &dyn ProgressNotifier,
    ) -> Result<Batch, DispatchError> {
        if messages.is_empty() {
            return Err(DispatchError::InvalidArgument(
                "message sequence is empty".to_string(),
            ));
        }
        if self.params.max_concurrency == 0 {
            return Err(DispatchError::InvalidArgument(
                "max_concurrency must be at least 1".to_string(),
            ));
        }
        let mut collector = BatchCollector::new(backends.iter().map(|b| b.identity().clone()))?;

        let deadline = self.params.deadline;
        let round_deadline = Instant::now() + deadline;
        info!(
            "Dispatching to {} backends (max concurrency {}, deadline {:?})",
            backends.len(),
            self.params.max_concurrency,
            deadline
        );
        progress.on_phase_start(&Phase::FanOut, backends.len());

        let semaphore = Arc::new(Semaphore::new(self.params.max_concurrency));
        let messages: Arc<[Message]> = Arc::from(messages.to_vec());
        let mut join_set = JoinSet::new();

        for backend in backends {
            let backend = Arc::clone(backend);
            let semaphore = Arc::clone(&semaphore);
            let messages = Arc::clone(&messages);

            join_set.spawn(async move {
                let identity = backend.identity().clone();
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        return CompletionResult::failure(
                            identity,
                            FailureKind::Terminated,
                            "dispatcher closed before the call started",
                        );
                    }
                };
                let started = Instant::now();
                debug!("Calling backend {}", identity);
                let result = match backend.complete(&messages).await {
                    Ok(text) => CompletionResult::success(identity, text),
                    Err(e) => CompletionResult::failure(identity, e.kind(), e.to_string()),
                };
                result.with_elapsed(started.elapsed())
            });
        }

        let collected = timeout_at(round_deadline, async {
            while let Some(joined) = join_set.join_next().await {
                match joined {
                    Ok(result) => {
                        if result.succeeded {
                            info!("Backend {} responded successfully", result.identity);
                        } else {
                            warn!("Backend {} failed: {}", result.identity, result.text);
                        }
                        progress.on_task_complete(&Phase::FanOut, &result.identity, result.succeeded);
                        if let Err(e) = collector.record(result) {
                            warn!("Discarding result: {}", e);
                        }
                    }
                    Err(e) => {
                        warn!("Backend task join error: {}", e);
                    }
                }
            }
        })
        .await;

        let timed_out = collected.is_err();
        if timed_out {
            let pending: Vec<String> = collector.pending().map(|i| i.to_string()).collect();
            warn!(
                "Round deadline of {:?} expired; abandoning {}",
                deadline,
                pending.join(", ")
            );
            join_set.abort_all();
        }

        let batch = collector.finish(|identity| {
            progress.on_task_complete(&Phase::FanOut, identity, false);
            if timed_out {
                CompletionResult::timed_out(identity.clone(), deadline)
            } else {
                CompletionResult::failure(
                    identity.clone(),
                    FailureKind::Terminated,
                    "backend task terminated without a result",
                )
            }
        });

        progress.on_phase_complete(&Phase::FanOut);
        info!(
            "Fan-out complete: {}/{} backends succeeded",
            batch.successful().count(),
            batch.len()
        );
        Ok(batch)
    }
}

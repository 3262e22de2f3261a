//! Scripted backends shared by the use case tests.

use crate::ports::backend_client::{BackendClient, BackendError};
use async_trait::async_trait;
use panel_domain::{BackendIdentity, Message};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

enum Script {
    Fixed(Result<String, BackendError>),
    Sequence(Mutex<VecDeque<Result<String, BackendError>>>),
    Panic,
}

pub struct MockBackend {
    identity: BackendIdentity,
    delay: Duration,
    script: Script,
    tracking: Option<(Arc<AtomicUsize>, Arc<AtomicUsize>)>,
    seen: Mutex<Vec<Vec<Message>>>,
}

impl MockBackend {
    fn new(name: &str, script: Script) -> Self {
        Self {
            identity: BackendIdentity::new(name).unwrap(),
            delay: Duration::ZERO,
            script,
            tracking: None,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn answering(name: &str, text: &str) -> Self {
        Self::new(name, Script::Fixed(Ok(text.to_string())))
    }

    pub fn failing(name: &str, error: BackendError) -> Self {
        Self::new(name, Script::Fixed(Err(error)))
    }

    pub fn panicking(name: &str) -> Self {
        Self::new(name, Script::Panic)
    }

    /// Replies in order, one per call.
    pub fn scripted(name: &str, replies: Vec<Result<String, BackendError>>) -> Self {
        Self::new(name, Script::Sequence(Mutex::new(VecDeque::from(replies))))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Count calls in flight and remember the peak.
    pub fn tracking(mut self, in_flight: Arc<AtomicUsize>, peak: Arc<AtomicUsize>) -> Self {
        self.tracking = Some((in_flight, peak));
        self
    }

    /// Message sequences received so far.
    pub fn seen(&self) -> Vec<Vec<Message>> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl BackendClient for MockBackend {
    fn identity(&self) -> &BackendIdentity {
        &self.identity
    }

    async fn complete(&self, messages: &[Message]) -> Result<String, BackendError> {
        self.seen.lock().unwrap().push(messages.to_vec());
        if let Some((in_flight, peak)) = &self.tracking {
            let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            peak.fetch_max(now, Ordering::SeqCst);
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if let Some((in_flight, _)) = &self.tracking {
            in_flight.fetch_sub(1, Ordering::SeqCst);
        }
        match &self.script {
            Script::Fixed(result) => result.clone(),
            Script::Sequence(replies) => replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(BackendError::Upstream("no more replies".to_string()))),
            Script::Panic => panic!("backend {} exploded", self.identity),
        }
    }
}

pub fn backends(mocks: Vec<MockBackend>) -> Vec<Arc<dyn BackendClient>> {
    mocks
        .into_iter()
        .map(|m| Arc::new(m) as Arc<dyn BackendClient>)
        .collect()
}

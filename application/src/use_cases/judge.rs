//! Judge use case
//!
//! Wraps the designated judge backend. The judge is called directly, never
//! through the fan-out dispatcher, so its failures propagate: there is no
//! fallback judge.

use crate::ports::backend_client::{BackendClient, BackendError};
use panel_domain::{Batch, BackendIdentity, JudgePrompt, Message, Question};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors from the judge backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JudgeError {
    #[error("Judge {identity} unavailable: {source}")]
    Unavailable {
        identity: String,
        #[source]
        source: BackendError,
    },

    #[error("Judge {0} returned an empty question")]
    EmptyQuestion(String),
}

/// The designated evaluator of a round
pub struct Judge {
    client: Arc<dyn BackendClient>,
}

impl Judge {
    pub fn new(client: Arc<dyn BackendClient>) -> Self {
        Self { client }
    }

    pub fn identity(&self) -> &BackendIdentity {
        self.client.identity()
    }

    /// Ask the judge to write the question for this round.
    pub async fn generate_question(&self, request: &str) -> Result<Question, JudgeError> {
        let messages = [Message::user(request)];
        let text = self.call(&messages).await?;
        let question = Question::try_new(text)
            .ok_or_else(|| JudgeError::EmptyQuestion(self.identity().to_string()))?;
        info!("Judge {} generated a question", self.identity());
        Ok(question)
    }

    /// Ask the judge to rank every result in `batch`; returns the raw reply.
    pub async fn evaluate(&self, question: &Question, batch: &Batch) -> Result<String, JudgeError> {
        let messages = Self::evaluation_messages(question, batch);
        let raw = self.call(&messages).await?;
        info!("Judge {} reviewed {} responses", self.identity(), batch.len());
        Ok(raw)
    }

    /// The exact messages sent for an evaluation.
    pub fn evaluation_messages(question: &Question, batch: &Batch) -> Vec<Message> {
        vec![
            Message::system(JudgePrompt::judge_system()),
            Message::user(JudgePrompt::evaluation_prompt(question, batch)),
        ]
    }

    async fn call(&self, messages: &[Message]) -> Result<String, JudgeError> {
        self.client
            .complete(messages)
            .await
            .map_err(|source| JudgeError::Unavailable {
                identity: self.identity().to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockBackend;
    use panel_domain::{BatchCollector, CompletionResult, Role};

    fn batch() -> Batch {
        let ids = ["worker-A", "worker-B"].map(|n| BackendIdentity::new(n).unwrap());
        let mut c = BatchCollector::new(ids.clone()).unwrap();
        c.record(CompletionResult::success(ids[0].clone(), "An answer"))
            .unwrap();
        c.finish(|i| CompletionResult::timed_out(i.clone(), std::time::Duration::from_secs(1)))
    }

    #[tokio::test]
    async fn test_generate_question_trims_reply() {
        let mock = Arc::new(MockBackend::answering("judge", "\n  Is P equal to NP?  \n"));
        let judge = Judge::new(mock.clone());

        let question = judge
            .generate_question(JudgePrompt::default_question_request())
            .await
            .unwrap();

        assert_eq!(question.content(), "Is P equal to NP?");
        let seen = mock.seen();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].len(), 1);
        assert_eq!(seen[0][0].role, Role::User);
    }

    #[tokio::test]
    async fn test_blank_question_is_an_error() {
        let judge = Judge::new(Arc::new(MockBackend::answering("judge", "   ")));
        let err = judge.generate_question("ask something").await.unwrap_err();
        assert_eq!(err, JudgeError::EmptyQuestion("judge".to_string()));
    }

    #[tokio::test]
    async fn test_evaluate_sends_system_and_prompt() {
        let mock = Arc::new(MockBackend::answering("judge", "{\"results\":[]}"));
        let judge = Judge::new(mock.clone());
        let question = Question::try_new("Why is the sky blue?").unwrap();

        let raw = judge.evaluate(&question, &batch()).await.unwrap();
        assert_eq!(raw, "{\"results\":[]}");

        let sent = &mock.seen()[0];
        assert_eq!(sent[0].role, Role::System);
        assert_eq!(sent[1].role, Role::User);
        assert!(sent[1].content.contains("Why is the sky blue?"));
        assert!(sent[1].content.contains("## Response from worker-B\n[FAILED] timed out"));
    }

    #[tokio::test]
    async fn test_judge_failure_is_unavailable() {
        let judge = Judge::new(Arc::new(MockBackend::failing(
            "judge",
            BackendError::Upstream("500 Internal Server Error".into()),
        )));
        let question = Question::try_new("Q").unwrap();

        let err = judge.evaluate(&question, &batch()).await.unwrap_err();
        assert!(matches!(err, JudgeError::Unavailable { ref identity, .. } if identity == "judge"));
        assert!(err.to_string().contains("500 Internal Server Error"));
    }
}

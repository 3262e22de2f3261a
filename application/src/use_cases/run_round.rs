//! Run Round use case
//!
//! Orchestrates one judged round: optional question generation, fan-out,
//! judging and ranking parse.

use crate::config::DispatchParams;
use crate::ports::backend_client::BackendClient;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::dispatch::{DispatchError, FanOutDispatcher};
use crate::use_cases::judge::{Judge, JudgeError};
use chrono::{DateTime, Utc};
use panel_domain::{
    Batch, BackendIdentity, JudgePrompt, MalformedRanking, Message, Phase, Question, Ranking,
    parse_ranking,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that end a round without a ranking
#[derive(Error, Debug)]
pub enum RunRoundError {
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error(transparent)]
    JudgeUnavailable(#[from] JudgeError),
}

/// Where the round's question comes from
#[derive(Debug, Clone)]
pub enum QuestionSource {
    /// Use this question as-is
    Given(Question),
    /// Have the judge write one from this request
    Generate { request: String },
}

/// Input for the RunRound use case
#[derive(Debug, Clone)]
pub struct RoundInput {
    pub question: QuestionSource,
    pub params: DispatchParams,
}

impl RoundInput {
    pub fn new(question: Question) -> Self {
        Self {
            question: QuestionSource::Given(question),
            params: DispatchParams::default(),
        }
    }

    /// Let the judge write the question using the default request
    pub fn generated() -> Self {
        Self::generated_from(JudgePrompt::default_question_request())
    }

    pub fn generated_from(request: impl Into<String>) -> Self {
        Self {
            question: QuestionSource::Generate {
                request: request.into(),
            },
            params: DispatchParams::default(),
        }
    }

    pub fn with_params(mut self, params: DispatchParams) -> Self {
        self.params = params;
        self
    }
}

/// Everything a round produced
///
/// A malformed ranking does not fail the round: `ranking` carries the error
/// (with the raw text) so it can be shown to the user.
#[derive(Debug, Clone)]
pub struct RoundOutcome {
    pub started_at: DateTime<Utc>,
    pub judge: BackendIdentity,
    pub question: Question,
    pub batch: Batch,
    pub raw_ranking: String,
    pub ranking: Result<Ranking, MalformedRanking>,
}

/// Use case for running one judged round
pub struct RunRoundUseCase {
    judge: Judge,
    backends: Vec<Arc<dyn BackendClient>>,
}

impl RunRoundUseCase {
    pub fn new(judge: Judge, backends: Vec<Arc<dyn BackendClient>>) -> Self {
        Self { judge, backends }
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: RoundInput) -> Result<RoundOutcome, RunRoundError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RoundInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<RoundOutcome, RunRoundError> {
        let started_at = Utc::now();
        info!(
            "Starting round with {} backends, judged by {}",
            self.backends.len(),
            self.judge.identity()
        );

        let question = self.resolve_question(&input.question, progress).await?;

        let dispatcher = FanOutDispatcher::new(input.params);
        let messages = [Message::user(question.content())];
        let batch = dispatcher
            .dispatch_with_progress(&messages, &self.backends, progress)
            .await?;

        if batch.successful().next().is_none() {
            warn!("Every backend failed; the judge will only see failure reasons");
        }

        progress.on_phase_start(&Phase::Judging, 1);
        let raw_ranking = match self.judge.evaluate(&question, &batch).await {
            Ok(raw) => raw,
            Err(e) => {
                progress.on_task_complete(&Phase::Judging, self.judge.identity(), false);
                progress.on_phase_complete(&Phase::Judging);
                return Err(e.into());
            }
        };

        let ranking = parse_ranking(&raw_ranking, batch.identities());
        match &ranking {
            Ok(r) => {
                for name in r.dropped() {
                    warn!("Judge ranked {} which is not part of this round; dropped", name);
                }
                let missing = r.missing(&batch);
                if !missing.is_empty() {
                    warn!(
                        "Judge did not rank: {}",
                        missing
                            .iter()
                            .map(|i| i.as_str())
                            .collect::<Vec<_>>()
                            .join(", ")
                    );
                }
            }
            Err(e) => warn!("{}", e),
        }
        progress.on_task_complete(&Phase::Judging, self.judge.identity(), ranking.is_ok());
        progress.on_phase_complete(&Phase::Judging);

        Ok(RoundOutcome {
            started_at,
            judge: self.judge.identity().clone(),
            question,
            batch,
            raw_ranking,
            ranking,
        })
    }

    async fn resolve_question(
        &self,
        source: &QuestionSource,
        progress: &dyn ProgressNotifier,
    ) -> Result<Question, JudgeError> {
        match source {
            QuestionSource::Given(q) => Ok(q.clone()),
            QuestionSource::Generate { request } => {
                progress.on_phase_start(&Phase::Question, 1);
                let result = self.judge.generate_question(request).await;
                progress.on_task_complete(&Phase::Question, self.judge.identity(), result.is_ok());
                progress.on_phase_complete(&Phase::Question);
                result
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::backend_client::BackendError;
    use crate::testing::{MockBackend, backends};
    use std::time::Duration;

    fn workers() -> Vec<Arc<dyn BackendClient>> {
        backends(vec![
            MockBackend::answering("worker-A", "Answer A"),
            MockBackend::answering("worker-B", "Answer B"),
            MockBackend::answering("worker-C", "Answer C"),
        ])
    }

    #[tokio::test]
    async fn test_round_ranks_in_rank_order() {
        let judge = Judge::new(Arc::new(MockBackend::answering(
            "judge",
            r#"```json
{"results":[{"model":"worker-A","rank":"2"},{"model":"worker-B","rank":"1"},{"model":"worker-C","rank":"3"}]}
```"#,
        )));
        let use_case = RunRoundUseCase::new(judge, workers());

        let outcome = use_case
            .execute(RoundInput::new(Question::try_new("Q?").unwrap()))
            .await
            .unwrap();

        let ranking = outcome.ranking.unwrap();
        let order: Vec<_> = ranking
            .entries()
            .iter()
            .map(|e| (e.rank, e.identity.as_str()))
            .collect();
        assert_eq!(order, vec![(1, "worker-B"), (2, "worker-A"), (3, "worker-C")]);
        assert_eq!(outcome.judge.as_str(), "judge");
        assert_eq!(outcome.batch.len(), 3);
    }

    #[tokio::test]
    async fn test_generated_question_is_sent_to_workers() {
        let worker = Arc::new(MockBackend::answering("worker-A", "42"));
        let judge = Judge::new(Arc::new(MockBackend::scripted(
            "judge",
            vec![
                Ok("What is six times seven?".to_string()),
                Ok(r#"{"results":[{"model":"worker-A","rank":1}]}"#.to_string()),
            ],
        )));
        let use_case = RunRoundUseCase::new(judge, vec![worker.clone() as Arc<dyn BackendClient>]);

        let outcome = use_case.execute(RoundInput::generated()).await.unwrap();

        assert_eq!(outcome.question.content(), "What is six times seven?");
        assert_eq!(worker.seen()[0], vec![Message::user("What is six times seven?")]);
        assert!(outcome.ranking.is_ok());
    }

    #[tokio::test]
    async fn test_malformed_ranking_keeps_raw_text() {
        let judge = Judge::new(Arc::new(MockBackend::answering("judge", "not json")));
        let use_case = RunRoundUseCase::new(judge, workers());

        let outcome = use_case
            .execute(RoundInput::new(Question::try_new("Q?").unwrap()))
            .await
            .unwrap();

        let err = outcome.ranking.unwrap_err();
        assert_eq!(err.raw, "not json");
        assert_eq!(outcome.raw_ranking, "not json");
    }

    #[tokio::test]
    async fn test_unknown_identity_dropped_known_still_ranked() {
        let judge = Judge::new(Arc::new(MockBackend::answering(
            "judge",
            r#"{"results":[{"model":"impostor","rank":1},{"model":"worker-C","rank":2},{"model":"worker-A","rank":3}]}"#,
        )));
        let use_case = RunRoundUseCase::new(judge, workers());

        let outcome = use_case
            .execute(RoundInput::new(Question::try_new("Q?").unwrap()))
            .await
            .unwrap();

        let ranking = outcome.ranking.unwrap();
        assert_eq!(ranking.dropped(), &["impostor".to_string()]);
        assert_eq!(ranking.winner().unwrap().identity.as_str(), "worker-C");
        let missing: Vec<_> = ranking.missing(&outcome.batch).iter().map(|i| i.to_string()).collect();
        assert_eq!(missing, vec!["worker-B"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_backends_still_produce_a_ranking() {
        let workers = backends(vec![
            MockBackend::answering("worker-A", "Answer A"),
            MockBackend::failing("worker-B", BackendError::Auth("invalid api key".into())),
            MockBackend::answering("worker-C", "late").with_delay(Duration::from_secs(120)),
        ]);
        let judge = Judge::new(Arc::new(MockBackend::answering(
            "judge",
            r#"{"results":[{"model":"worker-A","rank":1},{"model":"worker-B","rank":2},{"model":"worker-C","rank":3}]}"#,
        )));
        let use_case = RunRoundUseCase::new(judge, workers);

        let input = RoundInput::new(Question::try_new("Q?").unwrap())
            .with_params(DispatchParams::default().with_deadline(Duration::from_secs(5)));
        let outcome = use_case.execute(input).await.unwrap();

        assert!(outcome.batch.get("worker-C").unwrap().is_timeout());
        assert!(!outcome.batch.get("worker-B").unwrap().succeeded);
        assert_eq!(outcome.ranking.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_judge_failure_ends_round() {
        let judge = Judge::new(Arc::new(MockBackend::failing(
            "judge",
            BackendError::Network("connection refused".into()),
        )));
        let use_case = RunRoundUseCase::new(judge, workers());

        let err = use_case
            .execute(RoundInput::new(Question::try_new("Q?").unwrap()))
            .await
            .unwrap_err();

        assert!(matches!(err, RunRoundError::JudgeUnavailable(_)));
        assert!(err.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_question_generation_failure_ends_round() {
        let judge = Judge::new(Arc::new(MockBackend::answering("judge", "")));
        let use_case = RunRoundUseCase::new(judge, workers());

        let err = use_case.execute(RoundInput::generated()).await.unwrap_err();
        assert!(matches!(
            err,
            RunRoundError::JudgeUnavailable(JudgeError::EmptyQuestion(_))
        ));
    }

    #[tokio::test]
    async fn test_no_backends_is_invalid() {
        let judge = Judge::new(Arc::new(MockBackend::answering("judge", "{}")));
        let use_case = RunRoundUseCase::new(judge, vec![]);

        let err = use_case
            .execute(RoundInput::new(Question::try_new("Q?").unwrap()))
            .await
            .unwrap_err();
        assert!(matches!(err, RunRoundError::Dispatch(DispatchError::InvalidArgument(_))));
    }
}

//! Prompt templates for a judged round

use crate::core::question::Question;
use crate::orchestration::batch::Batch;
use crate::ranking::parsing::{IDENTITY_FIELD, RANK_FIELD, REASON_FIELD, RESULTS_FIELD};
use std::fmt::Write;

/// Templates for the judge's two calls
pub struct JudgePrompt;

impl JudgePrompt {
    /// Default request for the judge to invent a question
    pub fn default_question_request() -> &'static str {
        r#"Please come up with a challenging, nuanced question that I can ask a number of LLMs to evaluate their intelligence.
Please respond only with the question, no explanation."#
    }

    /// System prompt for the judging call
    pub fn judge_system() -> &'static str {
        r#"You are an impartial judge comparing answers that several models gave to the same question.
Judge each answer on accuracy, reasoning, completeness and clarity.
An answer marked as failed produced no content and must be ranked below every answer that did.
You reply with the requested JSON block and nothing else."#
    }

    /// User prompt asking the judge to rank every result in the batch.
    ///
    /// Results appear in the batch's canonical order. Failed results are
    /// included with their failure reason so the judge can rank them last.
    pub fn evaluation_prompt(question: &Question, batch: &Batch) -> String {
        let count = batch.len();
        let mut prompt = format!(
            r#"You are judging the responses of {count} models. Each model was given the following question:

{question}

Here is the content to review for ranking:
"#,
            question = question.content(),
        );

        for result in batch.iter() {
            let _ = write!(prompt, "\n## Response from {}\n", result.identity);
            if result.succeeded {
                let _ = writeln!(prompt, "{}", result.text);
            } else {
                let _ = writeln!(prompt, "[FAILED] {}", result.text);
            }
        }

        let _ = write!(
            prompt,
            r#"
Rank every model between 1 and {count}, with 1 being the best and {count} being the worst.
Use each model name exactly as written after "Response from".
Respond only with JSON in a fenced block, following this exact format:

{format}
"#,
            format = Self::response_format(batch),
        );

        prompt
    }

    /// The fenced JSON example the judge must follow.
    ///
    /// Built from the parser's field names, with the batch's own identities as
    /// placeholders.
    pub fn response_format(batch: &Batch) -> String {
        let mut out = format!("```json\n{{\n    \"{}\": [\n", RESULTS_FIELD);
        let count = batch.len();
        for (i, identity) in batch.identities().enumerate() {
            let _ = write!(
                out,
                "        {{\"{}\": \"{}\", \"{}\": \"<RANK>\", \"{}\": \"<BRIEF_EXPLANATION>\"}}",
                IDENTITY_FIELD, identity, RANK_FIELD, REASON_FIELD
            );
            out.push_str(if i + 1 < count { ",\n" } else { "\n" });
        }
        out.push_str("    ]\n}\n```");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identity::BackendIdentity;
    use crate::orchestration::batch::BatchCollector;
    use crate::orchestration::value_objects::{CompletionResult, FailureKind};
    use crate::ranking::parsing::parse_ranking;

    fn id(name: &str) -> BackendIdentity {
        BackendIdentity::new(name).unwrap()
    }

    fn batch() -> Batch {
        let mut c = BatchCollector::new(vec![id("worker-A"), id("worker-B")]).unwrap();
        c.record(CompletionResult::failure(
            id("worker-B"),
            FailureKind::Upstream,
            "503 Service Unavailable",
        ))
        .unwrap();
        c.record(CompletionResult::success(id("worker-A"), "Rust is memory safe."))
            .unwrap();
        c.finish(|i| CompletionResult::success(i.clone(), ""))
    }

    #[test]
    fn test_evaluation_prompt_includes_question_and_answers() {
        let question = Question::try_new("What is Rust?").unwrap();
        let prompt = JudgePrompt::evaluation_prompt(&question, &batch());
        assert!(prompt.contains("What is Rust?"));
        assert!(prompt.contains("## Response from worker-A\nRust is memory safe."));
        assert!(prompt.contains("between 1 and 2"));
    }

    #[test]
    fn test_failed_results_included_verbatim() {
        let question = Question::try_new("Q?").unwrap();
        let prompt = JudgePrompt::evaluation_prompt(&question, &batch());
        assert!(prompt.contains("## Response from worker-B\n[FAILED] 503 Service Unavailable"));
    }

    #[test]
    fn test_results_in_canonical_order() {
        let question = Question::try_new("Q?").unwrap();
        let prompt = JudgePrompt::evaluation_prompt(&question, &batch());
        let a = prompt.find("Response from worker-A").unwrap();
        let b = prompt.find("Response from worker-B").unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_response_format_matches_parser_fields() {
        let format = JudgePrompt::response_format(&batch());
        assert!(format.contains("\"results\""));
        assert!(format.contains("\"model\": \"worker-A\""));
        assert!(format.contains("\"rank\""));
        assert!(format.contains("\"reason\""));

        // A judge that fills the template in literally produces parseable output.
        let filled = format.replacen("<RANK>", "2", 1).replacen("<RANK>", "1", 1);
        let b = batch();
        let ranking = parse_ranking(&filled, b.identities()).unwrap();
        assert_eq!(ranking.winner().unwrap().identity.as_str(), "worker-B");
    }
}

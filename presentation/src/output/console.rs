//! Console output formatter for round results

use colored::Colorize;
use panel_application::RoundOutcome;
use panel_domain::{MalformedRanking, Ranking};
use serde_json::json;

/// Formats round results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// One `"<rank> : <identity>"` line per entry, best first
    pub fn format_ranking(ranking: &Ranking) -> String {
        ranking
            .entries()
            .iter()
            .map(|e| format!("{} : {}\n", e.rank, e.identity))
            .collect()
    }

    /// Default output: the ranking lines, or the judge's raw text when it
    /// could not be parsed
    pub fn format_outcome(outcome: &RoundOutcome) -> String {
        match &outcome.ranking {
            Ok(ranking) => Self::format_ranking(ranking),
            Err(e) => Self::format_malformed(e),
        }
    }

    /// Error header followed by the unparseable judge text
    pub fn format_malformed(error: &MalformedRanking) -> String {
        format!(
            "{} {}\n\n{}\n{}\n",
            "Error:".red().bold(),
            error,
            "Judge output:".yellow().bold(),
            error.raw
        )
    }

    /// Format the complete round
    pub fn format_full(outcome: &RoundOutcome) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Judge Panel Results"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n\n",
            "Question:".cyan().bold(),
            outcome.question
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Judge:".cyan().bold(),
            outcome.judge
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Backends:".cyan().bold(),
            outcome
                .batch
                .identities()
                .map(|i| i.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ));

        output.push_str(&Self::section_header("Answers"));
        for result in outcome.batch.iter() {
            let elapsed = result
                .elapsed_ms
                .map(|ms| format!(" ({:.1}s)", ms as f64 / 1000.0))
                .unwrap_or_default();
            if result.succeeded {
                output.push_str(&format!(
                    "\n{}\n{}\n",
                    format!("── {}{} ──", result.identity, elapsed).yellow().bold(),
                    result.text
                ));
            } else {
                output.push_str(&format!(
                    "\n{}\nError: {}\n",
                    format!("── {}{} ──", result.identity, elapsed).red().bold(),
                    result.failure_reason().unwrap_or("Unknown")
                ));
            }
        }

        output.push_str(&Self::section_header("Ranking"));
        match &outcome.ranking {
            Ok(ranking) => {
                for entry in ranking.entries() {
                    let line = format!("{} : {}", entry.rank, entry.identity);
                    let line = if entry.rank == 1 {
                        line.green().bold().to_string()
                    } else {
                        line
                    };
                    output.push_str(&line);
                    if let Some(reason) = &entry.reason {
                        output.push_str(&format!(" {}", format!("- {}", reason).dimmed()));
                    }
                    output.push('\n');
                }

                let missing = ranking.missing(&outcome.batch);
                if !missing.is_empty() {
                    output.push_str(&format!(
                        "\n{} {}\n",
                        "Not ranked:".yellow(),
                        missing.iter().map(|i| i.as_str()).collect::<Vec<_>>().join(", ")
                    ));
                }
                if !ranking.dropped().is_empty() {
                    output.push_str(&format!(
                        "{} {}\n",
                        "Ignored (not in this round):".yellow(),
                        ranking.dropped().join(", ")
                    ));
                }
            }
            Err(e) => output.push_str(&Self::format_malformed(e)),
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON
    pub fn format_json(outcome: &RoundOutcome) -> String {
        let (ranking, error) = match &outcome.ranking {
            Ok(r) => (json!(r), serde_json::Value::Null),
            Err(e) => (serde_json::Value::Null, json!(e.reason)),
        };
        let value = json!({
            "started_at": outcome.started_at.to_rfc3339(),
            "judge": outcome.judge,
            "question": outcome.question.content(),
            "results": outcome.batch.iter().collect::<Vec<_>>(),
            "raw_ranking": outcome.raw_ranking,
            "ranking": ranking,
            "ranking_error": error,
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

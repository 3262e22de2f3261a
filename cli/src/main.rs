//! CLI entrypoint for judge-panel
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use panel_application::{
    BackendClient, Judge, NoProgress, ProgressNotifier, RoundInput, RunRoundError,
    RunRoundUseCase,
};
use panel_domain::Question;
use panel_infrastructure::{ConfigLoader, FileConfig, HttpBackendClient};
use panel_presentation::{Cli, ConsoleFormatter, OutputFormat, ProgressReporter, SimpleProgress};
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Initialize logging from the verbosity count; `RUST_LOG` wins when set.
///
/// The returned guard flushes the log file on drop and must outlive `main`'s work.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let name = path
                .file_name()
                .ok_or_else(|| anyhow!("--log-file must name a file: {}", path.display()))?;
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
            Ok(None)
        }
    }
}

/// Merge file config and apply command-line overrides
fn load_config(cli: &Cli) -> Result<FileConfig> {
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref()).map_err(|e| anyhow!("invalid configuration: {e}"))?
    };

    if let Some(judge) = &cli.judge {
        config.set_judge_model(judge);
    }
    if let Some(n) = cli.max_concurrency {
        config.dispatch.max_concurrency = n;
    }
    if let Some(secs) = cli.deadline {
        config.dispatch.deadline_seconds = secs;
    }
    config.restrict_backends(&cli.backends)?;

    Ok(config)
}

/// Use the question from the command line, or let the judge write one
fn round_input(question: Option<&str>) -> Result<RoundInput> {
    match question {
        Some(q) => {
            let question =
                Question::try_new(q).ok_or_else(|| anyhow!("question cannot be empty"))?;
            Ok(RoundInput::new(question))
        }
        None => Ok(RoundInput::generated()),
    }
}

/// Bars on a terminal, plain lines when stderr is redirected
fn progress_notifier(quiet: bool) -> Box<dyn ProgressNotifier> {
    if quiet {
        Box::new(NoProgress)
    } else if std::io::stderr().is_terminal() {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(SimpleProgress)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is normal
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    info!("Starting judge-panel");

    let config = load_config(&cli)?;

    if cli.show_config {
        println!("{}", ConfigLoader::describe_sources(cli.config.as_deref()));
        println!("Effective configuration:\n");
        println!("{}", toml::to_string_pretty(&config.redacted())?);
        return Ok(());
    }

    config.validate()?;

    // === Dependency Injection ===
    let timeout = config.dispatch.request_timeout();
    let judge_client = HttpBackendClient::new(config.judge.0.resolve()?, timeout)?;
    let judge = Judge::new(Arc::new(judge_client));

    let mut backends: Vec<Arc<dyn BackendClient>> = Vec::with_capacity(config.backends.len());
    for backend in &config.backends {
        let resolved = backend
            .resolve()
            .with_context(|| format!("backend {}", backend.identity))?;
        if !resolved.has_credential() {
            warn!("{} has no credential; sending requests without Authorization", resolved.identity());
        }
        backends.push(Arc::new(HttpBackendClient::new(resolved, timeout)?));
    }

    let input = round_input(cli.question.as_deref())?.with_params(config.dispatch.to_params());

    if !cli.quiet && cli.output != OutputFormat::Json {
        eprintln!();
        eprintln!("Judge: {}", judge.identity());
        eprintln!(
            "Backends: {}",
            backends
                .iter()
                .map(|b| b.identity().as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        eprintln!();
    }

    let use_case = RunRoundUseCase::new(judge, backends);

    let progress = progress_notifier(cli.quiet);
    let result = use_case.execute_with_progress(input, progress.as_ref()).await;

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(RunRoundError::JudgeUnavailable(e)) => bail!("Judge unavailable: {e}"),
        Err(e) => return Err(e.into()),
    };

    let output = match cli.output {
        OutputFormat::Ranking => {
            if !cli.quiet {
                eprintln!("Question: {}\n", outcome.question);
            }
            ConsoleFormatter::format_outcome(&outcome)
        }
        OutputFormat::Full => ConsoleFormatter::format_full(&outcome),
        OutputFormat::Json => ConsoleFormatter::format_json(&outcome),
    };

    print!("{}", output);
    if !output.ends_with('\n') {
        println!();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use panel_application::QuestionSource;

    #[test]
    fn test_blank_question_is_rejected() {
        let err = round_input(Some("   ")).unwrap_err();
        assert!(err.to_string().contains("question cannot be empty"));
        assert!(round_input(Some("")).is_err());
    }

    #[test]
    fn test_given_question_is_trimmed() {
        let input = round_input(Some("  Why is the sky blue?\n")).unwrap();
        match input.question {
            QuestionSource::Given(q) => assert_eq!(q.content(), "Why is the sky blue?"),
            other => panic!("expected a given question, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_question_is_generated() {
        let input = round_input(None).unwrap();
        assert!(matches!(input.question, QuestionSource::Generate { .. }));
    }
}

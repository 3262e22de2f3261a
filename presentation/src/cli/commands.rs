//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for round results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One "<rank> : <identity>" line per ranked backend
    #[default]
    Ranking,
    /// Question, every answer, and the ranking with reasons
    Full,
    /// JSON output
    Json,
}

/// CLI arguments for judge-panel
#[derive(Parser, Debug)]
#[command(name = "judge-panel")]
#[command(author, version, about = "Ask several LLMs the same question and have a judge rank the answers")]
#[command(long_about = r#"
judge-panel sends one question to several chat-completion backends at once,
then asks a judge model to rank the answers.

A round has up to three phases:
1. Question: the judge writes a question (skipped when you pass one)
2. Fan-Out:  every backend answers concurrently under one deadline
3. Judging:  the judge ranks the answers; the ranking is printed

Configuration files are loaded from (in priority order):
1. PANEL_* environment variables
2. --config <path>     Explicit config file
3. ./panel.toml        Project-level config
4. ~/.config/judge-panel/config.toml   Global config

Example:
  judge-panel "What is the strongest argument for carbon taxes?"
  judge-panel -b gpt-5-mini -b gemini-2.5-flash-lite --deadline 30
  judge-panel --judge gpt-4o --output full
"#)]
pub struct Cli {
    /// The question to ask (the judge writes one when omitted)
    pub question: Option<String>,

    /// Backends to include, by identity (can be specified multiple times)
    #[arg(short, long = "backend", value_name = "IDENTITY")]
    pub backends: Vec<String>,

    /// Model to use as judge
    #[arg(long, value_name = "MODEL")]
    pub judge: Option<String>,

    /// Maximum number of backend calls in flight
    #[arg(long, value_name = "N")]
    pub max_concurrency: Option<usize>,

    /// Round deadline in seconds
    #[arg(long, value_name = "SECS")]
    pub deadline: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "ranking")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration sources and the effective configuration, then exit
    #[arg(long)]
    pub show_config: bool,
}

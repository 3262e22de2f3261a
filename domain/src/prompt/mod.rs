//! Prompt domain
//!
//! Templates for the question-generation and judging calls.

mod template;

pub use template::JudgePrompt;

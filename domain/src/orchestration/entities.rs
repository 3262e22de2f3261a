//! Orchestration domain entities

use serde::{Deserialize, Serialize};

/// Phase of a judged round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// The judge writes the question every backend will answer
    Question,
    /// Every backend answers the question concurrently
    FanOut,
    /// The judge ranks the collected answers
    Judging,
}

impl Phase {
    pub fn as_str(&self) -> &str {
        match self {
            Phase::Question => "question",
            Phase::FanOut => "fan_out",
            Phase::Judging => "judging",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Phase::Question => "Question Generation",
            Phase::FanOut => "Fan-Out",
            Phase::Judging => "Judging",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

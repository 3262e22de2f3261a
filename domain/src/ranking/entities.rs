//! Ranking entities produced from the judge's structured output.

use crate::core::identity::BackendIdentity;
use crate::orchestration::batch::Batch;
use crate::ranking::parsing::{IDENTITY_FIELD, RANK_FIELD, REASON_FIELD, RESULTS_FIELD};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One backend's place in the judge's ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankEntry {
    pub identity: BackendIdentity,
    /// Positive rank; 1 is best. Values need not be contiguous.
    pub rank: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl RankEntry {
    pub fn new(identity: BackendIdentity, rank: u32) -> Self {
        Self {
            identity,
            rank,
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// Ordered ranking, ascending by rank with ties in the order the judge listed them
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ranking {
    entries: Vec<RankEntry>,
    /// Identities the judge mentioned that were dropped (unknown or repeated)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    dropped: Vec<String>,
}

impl Ranking {
    /// Build a ranking, stable-sorting the entries by rank.
    pub fn new(mut entries: Vec<RankEntry>, dropped: Vec<String>) -> Self {
        entries.sort_by_key(|e| e.rank);
        Self { entries, dropped }
    }

    pub fn entries(&self) -> &[RankEntry] {
        &self.entries
    }

    pub fn dropped(&self) -> &[String] {
        &self.dropped
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The best-ranked entry, if any.
    pub fn winner(&self) -> Option<&RankEntry> {
        self.entries.first()
    }

    pub fn get(&self, identity: &str) -> Option<&RankEntry> {
        self.entries.iter().find(|e| e.identity.as_str() == identity)
    }

    /// Batch identities the judge did not rank, in canonical order.
    pub fn missing<'a>(&self, batch: &'a Batch) -> Vec<&'a BackendIdentity> {
        batch
            .identities()
            .filter(|id| self.get(id.as_str()).is_none())
            .collect()
    }

    /// Re-serialise in the canonical fenced format the judge is asked to emit.
    pub fn to_canonical(&self) -> String {
        let results: Vec<serde_json::Value> = self
            .entries
            .iter()
            .map(|e| {
                let mut obj = serde_json::Map::new();
                obj.insert(IDENTITY_FIELD.into(), e.identity.as_str().into());
                obj.insert(RANK_FIELD.into(), e.rank.into());
                if let Some(reason) = &e.reason {
                    obj.insert(REASON_FIELD.into(), reason.as_str().into());
                }
                serde_json::Value::Object(obj)
            })
            .collect();
        let mut body = serde_json::Map::new();
        body.insert(RESULTS_FIELD.into(), serde_json::Value::Array(results));
        let body = serde_json::to_string_pretty(&body).unwrap_or_else(|_| "{}".to_string());
        format!("```json\n{}\n```", body)
    }
}

/// The judge's output could not be decoded into a ranking
///
/// The raw text is always kept so callers can show it for diagnosis.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Malformed ranking: {reason}")]
pub struct MalformedRanking {
    pub reason: String,
    pub raw: String,
}

impl MalformedRanking {
    pub fn new(reason: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            raw: raw.into(),
        }
    }
}

//! Ranking parsing for judge output.
//!
//! Judges are asked to answer with a fenced JSON block of the form
//!
//! ```text
//! {"results": [{"model": "worker-A", "rank": "1", "reason": "..."}, ...]}
//! ```
//!
//! but routinely wrap it in prose. [`parse_ranking`] digs the payload out,
//! validates it against the identities that took part in the round, and
//! returns a [`Ranking`] sorted by rank. The field names below are shared
//! with the judge prompt so the two cannot drift apart.
//!
//! # Rules
//!
//! | Situation | Outcome |
//! |-----------|---------|
//! | No JSON payload, or not `{"results": [...]}` | [`MalformedRanking`] |
//! | Entry missing `model` or `rank` | [`MalformedRanking`] |
//! | Rank not a positive integer (`"1"` and `1` both accepted) | [`MalformedRanking`] |
//! | Identity not in the round | Dropped, listed in [`Ranking::dropped`] |
//! | Identity ranked twice | First kept, later ones dropped |

use crate::core::identity::BackendIdentity;
use crate::ranking::entities::{MalformedRanking, RankEntry, Ranking};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;

/// Top-level field holding the ranking array
pub const RESULTS_FIELD: &str = "results";
/// Per-entry field naming the backend
pub const IDENTITY_FIELD: &str = "model";
/// Per-entry rank field
pub const RANK_FIELD: &str = "rank";
/// Optional per-entry explanation
pub const REASON_FIELD: &str = "reason";

#[derive(Deserialize)]
struct RawRanking {
    results: Vec<RawEntry>,
}

#[derive(Deserialize)]
struct RawEntry {
    model: String,
    rank: RawRank,
    #[serde(default)]
    reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRank {
    Int(i64),
    Text(String),
}

/// Parse the judge's raw output into a ranking over `known` identities.
///
/// Every rank is validated before unknown identities are dropped, so a
/// garbled rank anywhere makes the whole ranking unusable.
pub fn parse_ranking<'a, I>(raw: &str, known: I) -> Result<Ranking, MalformedRanking>
where
    I: IntoIterator<Item = &'a BackendIdentity>,
{
    let malformed = |reason: String| MalformedRanking::new(reason, raw);

    let decoded = select_payload(raw).map_err(malformed)?;

    if decoded.results.is_empty() {
        return Err(malformed("ranking lists no entries".to_string()));
    }

    let mut validated = Vec::with_capacity(decoded.results.len());
    for entry in decoded.results {
        let rank = parse_rank(&entry.rank).map_err(|reason| {
            malformed(format!("invalid rank for {}: {}", entry.model.trim(), reason))
        })?;
        validated.push((entry.model, rank, entry.reason));
    }

    let known: HashSet<&str> = known.into_iter().map(|id| id.as_str()).collect();
    let mut seen = HashSet::new();
    let mut entries = Vec::new();
    let mut dropped = Vec::new();

    for (model, rank, reason) in validated {
        let name = model.trim();
        let Some(identity) = known.get(name).and_then(|n| BackendIdentity::new(*n).ok()) else {
            dropped.push(name.to_string());
            continue;
        };
        if !seen.insert(identity.clone()) {
            dropped.push(name.to_string());
            continue;
        }
        let mut entry = RankEntry::new(identity, rank);
        if let Some(reason) = reason.filter(|r| !r.trim().is_empty()) {
            entry = entry.with_reason(reason);
        }
        entries.push(entry);
    }

    Ok(Ranking::new(entries, dropped))
}

fn parse_rank(rank: &RawRank) -> Result<u32, String> {
    let value = match rank {
        RawRank::Int(n) => *n,
        RawRank::Text(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| format!("`{}` is not an integer", s))?,
    };
    if value < 1 {
        return Err(format!("{} is not a positive rank", value));
    }
    u32::try_from(value).map_err(|_| format!("{} is out of range", value))
}

/// Pick the first candidate payload that has the ranking structure.
///
/// Candidates that are not objects are skipped. When no candidate fits, the
/// error describes the first object that was tried.
fn select_payload(raw: &str) -> Result<RawRanking, String> {
    let mut first_error = None;
    for candidate in payload_candidates(raw) {
        if !candidate.is_object() {
            continue;
        }
        match serde_json::from_value::<RawRanking>(candidate) {
            Ok(decoded) => return Ok(decoded),
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }
    Err(match first_error {
        Some(e) => format!("unexpected ranking structure: {}", e),
        None => format!(
            "no JSON object with a `{}` array found in judge output",
            RESULTS_FIELD
        ),
    })
}

/// JSON values found in free-form text, in the order they are tried.
///
/// Fenced code blocks come first. After them, every `{` in the text is a
/// possible start of an object; the first complete value from there is
/// taken and anything after it is ignored.
fn payload_candidates(raw: &str) -> impl Iterator<Item = Value> + '_ {
    let fenced = fenced_blocks(raw)
        .into_iter()
        .filter_map(|block| serde_json::from_str::<Value>(block.trim()).ok());
    let inline = raw.match_indices('{').filter_map(move |(start, _)| {
        serde_json::Deserializer::from_str(&raw[start..])
            .into_iter::<Value>()
            .next()
            .and_then(Result::ok)
    });
    fenced.chain(inline)
}

/// Bodies of ``` fenced blocks, skipping the info string (e.g. `json`).
fn fenced_blocks(raw: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut rest = raw;
    while let Some(open) = rest.find("```") {
        let after_fence = &rest[open + 3..];
        let body_start = after_fence.find('\n').map_or(after_fence.len(), |i| i + 1);
        let body = &after_fence[body_start..];
        let Some(close) = body.find("```") else {
            break;
        };
        blocks.push(&body[..close]);
        rest = &body[close + 3..];
    }
    blocks
}

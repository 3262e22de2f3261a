//! Judge ranking domain
//!
//! Decoding the judge's structured verdict into an ordered [`Ranking`].

pub mod entities;
pub mod parsing;

pub use entities::{MalformedRanking, RankEntry, Ranking};
pub use parsing::parse_ranking;

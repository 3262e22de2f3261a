//! Batch of per-backend results for one fan-out round.
//!
//! A [`BatchCollector`] is the only writer: it accepts exactly one result per
//! expected identity and remembers arrival order. [`BatchCollector::finish`]
//! seals it into a read-only [`Batch`] that covers every expected backend,
//! filling any gaps with caller-supplied failure results.

use crate::core::error::DomainError;
use crate::core::identity::BackendIdentity;
use crate::orchestration::value_objects::CompletionResult;
use serde::Serialize;
use std::collections::HashMap;

/// Write-once collector for one round's results
#[derive(Debug)]
pub struct BatchCollector {
    slots: Vec<(BackendIdentity, Option<CompletionResult>)>,
    index: HashMap<BackendIdentity, usize>,
    arrival: Vec<usize>,
}

impl BatchCollector {
    /// Create a collector expecting one result for each identity, in canonical order.
    ///
    /// Fails with `InvalidArgument` if the set is empty or contains duplicates.
    pub fn new(expected: impl IntoIterator<Item = BackendIdentity>) -> Result<Self, DomainError> {
        let mut slots = Vec::new();
        let mut index = HashMap::new();
        for identity in expected {
            if index.insert(identity.clone(), slots.len()).is_some() {
                return Err(DomainError::invalid_argument(format!(
                    "backend identity {} appears more than once",
                    identity
                )));
            }
            slots.push((identity, None));
        }
        if slots.is_empty() {
            return Err(DomainError::invalid_argument("backend set is empty"));
        }
        Ok(Self {
            slots,
            index,
            arrival: Vec::new(),
        })
    }

    /// Record the result for one backend.
    pub fn record(&mut self, result: CompletionResult) -> Result<(), DomainError> {
        let Some(&idx) = self.index.get(&result.identity) else {
            return Err(DomainError::UnknownIdentity(result.identity.to_string()));
        };
        let slot = &mut self.slots[idx].1;
        if slot.is_some() {
            return Err(DomainError::DuplicateResult(result.identity.to_string()));
        }
        *slot = Some(result);
        self.arrival.push(idx);
        Ok(())
    }

    pub fn is_complete(&self) -> bool {
        self.arrival.len() == self.slots.len()
    }

    /// Identities that have not reported yet, in canonical order.
    pub fn pending(&self) -> impl Iterator<Item = &BackendIdentity> {
        self.slots
            .iter()
            .filter(|(_, r)| r.is_none())
            .map(|(id, _)| id)
    }

    /// Seal the collector. Every pending identity gets the result built by `fill`.
    ///
    /// Filled results are appended to the arrival order after the real arrivals,
    /// in canonical order.
    pub fn finish<F>(self, mut fill: F) -> Batch
    where
        F: FnMut(&BackendIdentity) -> CompletionResult,
    {
        let mut arrival = self.arrival;
        let mut results = Vec::with_capacity(self.slots.len());
        for (idx, (identity, slot)) in self.slots.into_iter().enumerate() {
            let result = match slot {
                Some(r) => r,
                None => {
                    arrival.push(idx);
                    let mut r = fill(&identity);
                    r.identity = identity;
                    r
                }
            };
            results.push(result);
        }
        Batch {
            results,
            arrival,
            index: self.index,
        }
    }
}

/// The complete, read-only set of results for one round
///
/// Iteration follows canonical (input) order so prompts built from a batch
/// do not depend on which backend happened to answer first.
#[derive(Debug, Clone, Serialize)]
pub struct Batch {
    results: Vec<CompletionResult>,
    #[serde(skip)]
    arrival: Vec<usize>,
    #[serde(skip)]
    index: HashMap<BackendIdentity, usize>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Results in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &CompletionResult> {
        self.results.iter()
    }

    /// Results in the order they completed.
    pub fn arrival_order(&self) -> impl Iterator<Item = &CompletionResult> {
        self.arrival.iter().map(|&i| &self.results[i])
    }

    /// Look up a result by identity.
    pub fn get(&self, identity: &str) -> Option<&CompletionResult> {
        self.index.get(identity).map(|&i| &self.results[i])
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.index.contains_key(identity)
    }

    /// Identities in canonical order.
    pub fn identities(&self) -> impl Iterator<Item = &BackendIdentity> {
        self.results.iter().map(|r| &r.identity)
    }

    pub fn successful(&self) -> impl Iterator<Item = &CompletionResult> {
        self.results.iter().filter(|r| r.succeeded)
    }

    pub fn failed(&self) -> impl Iterator<Item = &CompletionResult> {
        self.results.iter().filter(|r| !r.succeeded)
    }
}

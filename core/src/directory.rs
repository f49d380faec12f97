//! Candidate directory
//!
//! Shared store of candidate profiles and sanction state. Sessions hold
//! candidate IDs only; every read and every sanction update goes through
//! this directory.
//!
//! # Concurrency
//!
//! Reads take the shared lock and may run concurrently across sessions.
//! Sanction updates take the exclusive lock and re-check ban state inside
//! it, so two sessions racing to sanction the same candidate cannot
//! double-sanction them.

use crate::models::candidate::Candidate;
use std::collections::HashMap;
use std::sync::RwLock;
use thiserror::Error;

/// Errors from directory lookups
///
/// Treated as transient-retryable at the orchestrator level, never fatal
/// to a session.
#[derive(Debug, Error, PartialEq)]
pub enum DirectoryError {
    #[error("Candidate not found: {candidate_id}")]
    UnknownCandidate { candidate_id: String },
}

/// Outcome of a guarded sanction update
#[derive(Debug, Clone, PartialEq)]
pub enum StrikeOutcome {
    /// Strike applied; candidate is now banned until this tick
    Applied { banned_until_tick: usize },

    /// Candidate was already banned at this tick; no second sanction
    AlreadyBanned { banned_until_tick: usize },
}

/// Thread-safe candidate store
///
/// # Example
/// ```
/// use scrim_coordinator_core_rs::{Candidate, CandidateDirectory};
///
/// let directory = CandidateDirectory::new();
/// directory.insert(Candidate::new("p1".to_string(), 30));
///
/// assert!(directory.get("p1").is_some());
/// assert!(!directory.is_banned("p1", 0).unwrap());
/// ```
#[derive(Debug, Default)]
pub struct CandidateDirectory {
    inner: RwLock<HashMap<String, Candidate>>,
}

impl CandidateDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    /// Insert or replace a candidate profile
    pub fn insert(&self, candidate: Candidate) {
        let mut map = self.inner.write().expect("candidate directory lock poisoned");
        map.insert(candidate.id().to_string(), candidate);
    }

    /// Snapshot one candidate's profile
    pub fn get(&self, candidate_id: &str) -> Option<Candidate> {
        let map = self.inner.read().expect("candidate directory lock poisoned");
        map.get(candidate_id).cloned()
    }

    /// Snapshot several candidates' profiles, preserving input order
    ///
    /// Unknown IDs are skipped; selection runs over whoever exists.
    pub fn snapshot(&self, candidate_ids: &[String]) -> Vec<Candidate> {
        let map = self.inner.read().expect("candidate directory lock poisoned");
        candidate_ids
            .iter()
            .filter_map(|id| map.get(id).cloned())
            .collect()
    }

    /// Check whether a candidate is locked out at the given tick
    pub fn is_banned(&self, candidate_id: &str, tick: usize) -> Result<bool, DirectoryError> {
        let map = self.inner.read().expect("candidate directory lock poisoned");
        map.get(candidate_id)
            .map(|c| c.is_banned(tick))
            .ok_or_else(|| DirectoryError::UnknownCandidate {
                candidate_id: candidate_id.to_string(),
            })
    }

    /// Apply one strike unless the candidate is already banned
    ///
    /// The ban check and the update happen under the same exclusive lock:
    /// if another session already sanctioned this candidate and their ban
    /// covers the current tick, the strike is skipped and the existing
    /// expiry is reported.
    pub fn apply_strike_if_unbanned(
        &self,
        candidate_id: &str,
        tick: usize,
        base_ban_ticks: usize,
    ) -> Result<StrikeOutcome, DirectoryError> {
        let mut map = self.inner.write().expect("candidate directory lock poisoned");
        let candidate =
            map.get_mut(candidate_id)
                .ok_or_else(|| DirectoryError::UnknownCandidate {
                    candidate_id: candidate_id.to_string(),
                })?;

        if candidate.is_banned(tick) {
            return Ok(StrikeOutcome::AlreadyBanned {
                banned_until_tick: candidate.banned_until_tick().unwrap_or(tick),
            });
        }

        let banned_until_tick = candidate.apply_strike(tick, base_ban_ticks);
        Ok(StrikeOutcome::Applied { banned_until_tick })
    }

    /// Record a completed session for a candidate
    pub fn record_completed_session(&self, candidate_id: &str) -> Result<(), DirectoryError> {
        let mut map = self.inner.write().expect("candidate directory lock poisoned");
        let candidate =
            map.get_mut(candidate_id)
                .ok_or_else(|| DirectoryError::UnknownCandidate {
                    candidate_id: candidate_id.to_string(),
                })?;
        candidate.record_completed_session();
        Ok(())
    }

    /// Number of registered candidates
    pub fn len(&self) -> usize {
        let map = self.inner.read().expect("candidate directory lock poisoned");
        map.len()
    }

    /// Check if the directory is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

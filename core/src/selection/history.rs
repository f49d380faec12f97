//! History selection strategy
//!
//! Keeps candidates whose history score (completed sessions minus
//! sanctions) meets a configured threshold. No reordering beyond
//! application order.

use super::SelectionStrategy;
use crate::models::candidate::Candidate;
use crate::models::session::Session;

/// Selection by compatibility/history score
#[derive(Debug, Clone)]
pub struct ByHistory {
    /// Minimum history score to qualify
    threshold: i64,
}

impl ByHistory {
    /// Create the strategy with a score threshold
    pub fn new(threshold: i64) -> Self {
        Self { threshold }
    }

    /// Get the configured threshold
    pub fn threshold(&self) -> i64 {
        self.threshold
    }
}

impl SelectionStrategy for ByHistory {
    fn select(&self, candidates: &[Candidate], session: &Session) -> Vec<String> {
        candidates
            .iter()
            .filter(|candidate| candidate.history_score() >= self.threshold)
            .take(session.constraints().capacity())
            .map(|candidate| candidate.id().to_string())
            .collect()
    }
}

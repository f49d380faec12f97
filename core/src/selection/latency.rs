//! Latency selection strategy
//!
//! Keeps candidates whose measured latency is within the session's bound.
//! No reordering beyond application order.

use super::SelectionStrategy;
use crate::models::candidate::Candidate;
use crate::models::session::Session;

/// Selection by measured latency
#[derive(Debug, Clone, Default)]
pub struct ByLatency;

impl ByLatency {
    /// Create the strategy
    pub fn new() -> Self {
        Self
    }
}

impl SelectionStrategy for ByLatency {
    fn select(&self, candidates: &[Candidate], session: &Session) -> Vec<String> {
        let constraints = session.constraints();

        candidates
            .iter()
            .filter(|candidate| candidate.latency_ms() <= constraints.max_latency_ms())
            .take(constraints.capacity())
            .map(|candidate| candidate.id().to_string())
            .collect()
    }
}

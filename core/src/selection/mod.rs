//! Candidate selection strategies
//!
//! Given the current applicants and a session's constraints, a strategy
//! picks up to `capacity` candidates. Strategies are interchangeable,
//! side-effect-free filters/orderings behind the [`SelectionStrategy`]
//! trait.
//!
//! # Purity
//!
//! `select` takes `&self` and only shared references: a strategy can never
//! mutate session state or application status. All mutation belongs to the
//! lifecycle machine, fed by the orchestrator's `resolve_fill`.
//!
//! # Available strategies
//!
//! 1. **BySkillRating**: rating within `[min,max]`, ordered closest-to-floor
//!    first
//! 2. **ByLatency**: latency within the session bound, application order
//! 3. **ByHistory**: history score above a threshold, application order
//!
//! Strategy choice is configured per session:
//!
//! ```rust
//! use scrim_coordinator_core_rs::selection::{build_strategy, StrategyConfig};
//!
//! let strategy = build_strategy(&StrategyConfig::SkillRating);
//! ```

use crate::models::candidate::Candidate;
use crate::models::session::Session;
use serde::{Deserialize, Serialize};

pub mod history;
pub mod latency;
pub mod skill_rating;

pub use history::ByHistory;
pub use latency::ByLatency;
pub use skill_rating::BySkillRating;

/// A pure participant-selection strategy
///
/// # Contract
///
/// - Returns at most `session.constraints().capacity()` candidate IDs
/// - Input order is the application order; strategies that do not reorder
///   must preserve it (deterministic tie-breaks)
/// - Empty input yields an empty selection, never an error
/// - Idempotent: identical inputs yield identical output
pub trait SelectionStrategy: Send + Sync {
    /// Select up to capacity eligible candidates
    ///
    /// # Arguments
    ///
    /// * `candidates` - Snapshot of applicants' profiles, in application order
    /// * `session` - Session whose constraints gate eligibility (read-only)
    fn select(&self, candidates: &[Candidate], session: &Session) -> Vec<String>;
}

/// Strategy selection for a session
///
/// Determines which selection algorithm fills the lobby.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StrategyConfig {
    /// Rating within the session's skill range, closest to the floor first
    SkillRating,

    /// Latency within the session's bound, application order
    Latency,

    /// History score at or above the threshold, application order
    History {
        /// Minimum history score (completed sessions minus sanctions)
        threshold: i64,
    },
}

/// Build a strategy from its configuration
pub fn build_strategy(config: &StrategyConfig) -> Box<dyn SelectionStrategy> {
    match config {
        StrategyConfig::SkillRating => Box::new(BySkillRating::new()),
        StrategyConfig::Latency => Box::new(ByLatency::new()),
        StrategyConfig::History { threshold } => Box::new(ByHistory::new(*threshold)),
    }
}

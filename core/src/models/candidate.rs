//! Candidate model
//!
//! Represents a player who can apply to scrim sessions.
//! Each candidate has:
//! - A per-game skill rating map
//! - Preferred roles
//! - A measured latency (milliseconds)
//! - Sanction state (strike count, ban-expiry tick)
//!
//! Strike count increases monotonically. Ban expiry is derived
//! (`tick < banned_until`) and is never decremented except by expiry.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A player eligible to apply to sessions
///
/// # Example
/// ```
/// use scrim_coordinator_core_rs::Candidate;
///
/// let candidate = Candidate::new("player_1".to_string(), 35)
///     .with_rating("moba".to_string(), 1500)
///     .with_preferred_role("support".to_string());
///
/// assert_eq!(candidate.rating_for("moba"), Some(1500));
/// assert!(!candidate.is_banned(0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Unique candidate identifier
    id: String,

    /// Skill rating per game identifier
    ratings: HashMap<String, i64>,

    /// Roles this candidate prefers to play
    preferred_roles: Vec<String>,

    /// Measured latency in milliseconds
    latency_ms: u32,

    /// Number of sessions this candidate has played to completion
    completed_sessions: u32,

    /// Total sanctions received (monotonically increasing)
    strike_count: u32,

    /// Tick until which the candidate is locked out, if any
    ///
    /// The candidate is banned while `tick < banned_until_tick`. The field
    /// is only ever moved forward by [`Candidate::apply_strike`].
    banned_until_tick: Option<usize>,
}

impl Candidate {
    /// Create a new candidate with no ratings and a clean sanction record
    ///
    /// # Arguments
    /// * `id` - Unique candidate identifier
    /// * `latency_ms` - Measured latency in milliseconds
    pub fn new(id: String, latency_ms: u32) -> Self {
        Self {
            id,
            ratings: HashMap::new(),
            preferred_roles: Vec::new(),
            latency_ms,
            completed_sessions: 0,
            strike_count: 0,
            banned_until_tick: None,
        }
    }

    /// Set a per-game rating (builder pattern)
    pub fn with_rating(mut self, game_id: String, rating: i64) -> Self {
        self.ratings.insert(game_id, rating);
        self
    }

    /// Add a preferred role (builder pattern)
    pub fn with_preferred_role(mut self, role: String) -> Self {
        self.preferred_roles.push(role);
        self
    }

    /// Set completed-session count (builder pattern, for seeding test data)
    pub fn with_completed_sessions(mut self, count: u32) -> Self {
        self.completed_sessions = count;
        self
    }

    /// Get candidate ID
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the rating for a specific game, if the candidate has one
    pub fn rating_for(&self, game_id: &str) -> Option<i64> {
        self.ratings.get(game_id).copied()
    }

    /// Get preferred roles
    pub fn preferred_roles(&self) -> &[String] {
        &self.preferred_roles
    }

    /// Get measured latency in milliseconds
    pub fn latency_ms(&self) -> u32 {
        self.latency_ms
    }

    /// Get number of completed sessions
    pub fn completed_sessions(&self) -> u32 {
        self.completed_sessions
    }

    /// Get total sanction count
    pub fn strike_count(&self) -> u32 {
        self.strike_count
    }

    /// Get the tick until which the candidate is locked out, if any
    pub fn banned_until_tick(&self) -> Option<usize> {
        self.banned_until_tick
    }

    /// Check whether the candidate is locked out at the given tick
    ///
    /// A ban covers ticks strictly before `banned_until_tick`; at the expiry
    /// tick itself the candidate is eligible again.
    ///
    /// # Example
    /// ```
    /// use scrim_coordinator_core_rs::Candidate;
    ///
    /// let mut candidate = Candidate::new("p1".to_string(), 20);
    /// candidate.apply_strike(10, 50); // banned until tick 60
    ///
    /// assert!(candidate.is_banned(59));
    /// assert!(!candidate.is_banned(60));
    /// ```
    pub fn is_banned(&self, tick: usize) -> bool {
        match self.banned_until_tick {
            Some(until) => tick < until,
            None => false,
        }
    }

    /// Compatibility score used by history-based selection
    ///
    /// Completed sessions count in favour, sanctions count against.
    pub fn history_score(&self) -> i64 {
        self.completed_sessions as i64 - self.strike_count as i64
    }

    /// Apply one sanction: increment strike count and extend the ban
    ///
    /// Ban duration escalates linearly with the cumulative strike count:
    /// `base_ban_ticks * strike_count`. If an earlier ban would end later
    /// than the new one, the later expiry is kept (bans never shrink).
    ///
    /// # Arguments
    /// * `tick` - Current tick (ban starts here)
    /// * `base_ban_ticks` - Lockout duration for a first offence
    ///
    /// # Returns
    /// The tick until which the candidate is now banned.
    pub fn apply_strike(&mut self, tick: usize, base_ban_ticks: usize) -> usize {
        self.strike_count += 1;
        let new_until = tick + base_ban_ticks * self.strike_count as usize;
        let until = match self.banned_until_tick {
            Some(existing) if existing > new_until => existing,
            _ => new_until,
        };
        self.banned_until_tick = Some(until);
        until
    }

    /// Record a session played to completion
    pub fn record_completed_session(&mut self) {
        self.completed_sessions += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_candidate_has_clean_record() {
        let candidate = Candidate::new("p1".to_string(), 30);

        assert_eq!(candidate.strike_count(), 0);
        assert_eq!(candidate.banned_until_tick(), None);
        assert!(!candidate.is_banned(0));
        assert!(!candidate.is_banned(1_000_000));
    }

    #[test]
    fn test_strike_escalation_is_linear() {
        let mut candidate = Candidate::new("p1".to_string(), 30);

        // First strike: base duration
        let until = candidate.apply_strike(0, 100);
        assert_eq!(until, 100);
        assert_eq!(candidate.strike_count(), 1);

        // Second strike at tick 200: 2x base duration
        let until = candidate.apply_strike(200, 100);
        assert_eq!(until, 400);
        assert_eq!(candidate.strike_count(), 2);
    }

    #[test]
    fn test_ban_never_shrinks() {
        let mut candidate = Candidate::new("p1".to_string(), 30);

        candidate.apply_strike(0, 1000); // banned until 1000
        // A second strike early into the first ban still extends it
        let until = candidate.apply_strike(10, 1000);
        assert_eq!(until, 2010);

        // Strike count keeps growing even if a hypothetical shorter ban
        // would result; expiry is the max of old and new.
        let mut other = Candidate::new("p2".to_string(), 30);
        other.apply_strike(0, 10_000); // until 10_000
        let until = other.apply_strike(1, 10); // new ban would end at 21
        assert_eq!(until, 10_000);
        assert_eq!(other.strike_count(), 2);
    }

    #[test]
    fn test_history_score() {
        let mut candidate = Candidate::new("p1".to_string(), 30).with_completed_sessions(5);
        assert_eq!(candidate.history_score(), 5);

        candidate.apply_strike(0, 100);
        assert_eq!(candidate.history_score(), 4);
    }

    #[test]
    fn test_ban_expiry_boundary() {
        let mut candidate = Candidate::new("p1".to_string(), 30);
        candidate.apply_strike(50, 100); // banned until 150

        assert!(candidate.is_banned(50));
        assert!(candidate.is_banned(149));
        assert!(!candidate.is_banned(150));
    }
}

//! Skill-rating selection strategy
//!
//! Keeps candidates whose rating for the session's game falls inside the
//! acceptable range, ordered by absolute distance to the range floor
//! (closer-to-floor first). Candidates without a rating for the game are
//! ineligible.

use super::SelectionStrategy;
use crate::models::candidate::Candidate;
use crate::models::session::Session;

/// Selection by per-game skill rating
///
/// # Example
///
/// ```
/// use scrim_coordinator_core_rs::selection::{BySkillRating, SelectionStrategy};
/// use scrim_coordinator_core_rs::{Candidate, Session, SessionConstraints};
///
/// let session = Session::new(
///     "moba".to_string(),
///     "test".to_string(),
///     SessionConstraints::new(1200, 1800, 80, 3).unwrap(),
/// );
///
/// let candidates = vec![
///     Candidate::new("low".to_string(), 20).with_rating("moba".to_string(), 1100),
///     Candidate::new("floor".to_string(), 20).with_rating("moba".to_string(), 1200),
///     Candidate::new("mid".to_string(), 20).with_rating("moba".to_string(), 1500),
/// ];
///
/// let selected = BySkillRating::new().select(&candidates, &session);
/// assert_eq!(selected, vec!["floor".to_string(), "mid".to_string()]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BySkillRating;

impl BySkillRating {
    /// Create the strategy
    pub fn new() -> Self {
        Self
    }
}

impl SelectionStrategy for BySkillRating {
    fn select(&self, candidates: &[Candidate], session: &Session) -> Vec<String> {
        let constraints = session.constraints();
        let game_id = session.game_id();

        let mut eligible: Vec<(usize, i64, &Candidate)> = candidates
            .iter()
            .enumerate()
            .filter_map(|(order, candidate)| {
                let rating = candidate.rating_for(game_id)?;
                if rating >= constraints.min_rating() && rating <= constraints.max_rating() {
                    Some((order, rating, candidate))
                } else {
                    None
                }
            })
            .collect();

        // Closest to the floor first; application order breaks ties
        let floor = constraints.min_rating();
        eligible.sort_by_key(|(order, rating, _)| ((rating - floor).abs(), *order));

        eligible
            .into_iter()
            .take(constraints.capacity())
            .map(|(_, _, candidate)| candidate.id().to_string())
            .collect()
    }
}

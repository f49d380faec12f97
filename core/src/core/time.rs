//! Time management for the coordinator
//!
//! The coordinator operates in discrete ticks. All deadline and sanction
//! arithmetic is done on tick counts, which keeps the engine deterministic:
//! no wall clock is ever consulted.

use serde::{Deserialize, Serialize};

/// Manages coordinator time in discrete ticks
///
/// # Example
/// ```
/// use scrim_coordinator_core_rs::TimeManager;
///
/// let mut time = TimeManager::new();
/// assert_eq!(time.current_tick(), 0);
///
/// time.advance_tick();
/// assert_eq!(time.current_tick(), 1);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimeManager {
    /// Total ticks elapsed since coordinator start
    current_tick: usize,
}

impl TimeManager {
    /// Create a new TimeManager starting at tick 0
    pub fn new() -> Self {
        Self { current_tick: 0 }
    }

    /// Create a TimeManager at a specific tick (for restoring saved state)
    pub fn at_tick(tick: usize) -> Self {
        Self { current_tick: tick }
    }

    /// Advance time by one tick
    pub fn advance_tick(&mut self) {
        self.current_tick += 1;
    }

    /// Advance time by multiple ticks
    ///
    /// # Example
    /// ```
    /// use scrim_coordinator_core_rs::TimeManager;
    ///
    /// let mut time = TimeManager::new();
    /// time.advance_by(10);
    /// assert_eq!(time.current_tick(), 10);
    /// ```
    pub fn advance_by(&mut self, ticks: usize) {
        self.current_tick += ticks;
    }

    /// Get the current tick (total ticks since start)
    pub fn current_tick(&self) -> usize {
        self.current_tick
    }

    /// Check whether a deadline tick has passed
    ///
    /// Returns `true` only when the current tick is **strictly after** the
    /// deadline. A deadline at the current tick is still considered active.
    pub fn has_elapsed(&self, deadline_tick: usize) -> bool {
        self.current_tick > deadline_tick
    }
}

//! Session model
//!
//! One scrim instance from creation to finish or cancellation. The session
//! exclusively owns its applications, its lifecycle state, its role
//! assignments and its event log. Candidates are referenced by ID and live
//! in the shared directory.
//!
//! # Critical Invariants
//!
//! 1. `min_rating <= max_rating`, `capacity > 0`, `max_latency_ms > 0`
//!    (enforced at construction)
//! 2. The lifecycle state changes only through the named transition
//!    methods below, each of which delegates to the single pure
//!    transition table in [`crate::lifecycle`]
//! 3. Every committed transition that emits an event logs exactly one
//!    entry to the session's event log

use crate::commands::{CommandError, RoleCommand, RoleCommandStack};
use crate::lifecycle::{transition, SessionState, TransitionError, TransitionTrigger};
use crate::models::event::{EventLog, SessionEvent};
use crate::registry::{ParticipantRegistry, RegistryError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors from building a session with invalid constraints
#[derive(Debug, Error, PartialEq)]
pub enum ConstraintError {
    #[error("Skill range invalid: min {min} > max {max}")]
    InvalidSkillRange { min: i64, max: i64 },

    #[error("Capacity must be positive")]
    NonPositiveCapacity,

    #[error("Max latency must be positive")]
    NonPositiveLatency,
}

/// Eligibility constraints for one session
///
/// # Example
/// ```
/// use scrim_coordinator_core_rs::SessionConstraints;
///
/// let constraints = SessionConstraints::new(1200, 1800, 80, 10).unwrap();
/// assert_eq!(constraints.capacity(), 10);
///
/// // min > max is rejected at construction
/// assert!(SessionConstraints::new(1800, 1200, 80, 10).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionConstraints {
    /// Lowest acceptable skill rating (inclusive)
    min_rating: i64,

    /// Highest acceptable skill rating (inclusive)
    max_rating: i64,

    /// Highest acceptable latency in milliseconds
    max_latency_ms: u32,

    /// Total participants required (e.g. 10 for a 5v5 format)
    capacity: usize,
}

impl SessionConstraints {
    /// Build constraints, validating every bound
    pub fn new(
        min_rating: i64,
        max_rating: i64,
        max_latency_ms: u32,
        capacity: usize,
    ) -> Result<Self, ConstraintError> {
        if min_rating > max_rating {
            return Err(ConstraintError::InvalidSkillRange {
                min: min_rating,
                max: max_rating,
            });
        }
        if capacity == 0 {
            return Err(ConstraintError::NonPositiveCapacity);
        }
        if max_latency_ms == 0 {
            return Err(ConstraintError::NonPositiveLatency);
        }

        Ok(Self {
            min_rating,
            max_rating,
            max_latency_ms,
            capacity,
        })
    }

    /// Lowest acceptable rating (inclusive)
    pub fn min_rating(&self) -> i64 {
        self.min_rating
    }

    /// Highest acceptable rating (inclusive)
    pub fn max_rating(&self) -> i64 {
        self.max_rating
    }

    /// Highest acceptable latency in milliseconds
    pub fn max_latency_ms(&self) -> u32 {
        self.max_latency_ms
    }

    /// Total participants required
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// One scrim session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier (UUID)
    id: String,

    /// Game this session is for (keys the rating lookup)
    game_id: String,

    /// Format descriptor (e.g. "5v5")
    format: String,

    /// Eligibility constraints
    constraints: SessionConstraints,

    /// Current lifecycle state
    state: SessionState,

    /// Applications in insertion order
    registry: ParticipantRegistry,

    /// Candidate IDs chosen by the last fill, in selection order
    selection: Vec<String>,

    /// Role per selected candidate during negotiation and play
    role_assignments: HashMap<String, String>,

    /// Undo history for role edits (cleared on leaving negotiation)
    role_history: RoleCommandStack,

    /// Audit trail of committed transitions
    events: EventLog,
}

impl Session {
    /// Create a new session in the `Open` state
    ///
    /// # Example
    /// ```
    /// use scrim_coordinator_core_rs::{Session, SessionConstraints};
    ///
    /// let constraints = SessionConstraints::new(1000, 2000, 80, 4).unwrap();
    /// let session = Session::new("moba".to_string(), "2v2".to_string(), constraints);
    /// assert_eq!(session.state(), scrim_coordinator_core_rs::SessionState::Open);
    /// ```
    pub fn new(game_id: String, format: String, constraints: SessionConstraints) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            game_id,
            format,
            constraints,
            state: SessionState::Open,
            registry: ParticipantRegistry::new(),
            selection: Vec::new(),
            role_assignments: HashMap::new(),
            role_history: RoleCommandStack::new(),
            events: EventLog::new(),
        }
    }

    /// Get session ID
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get game ID
    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    /// Get format descriptor
    pub fn format(&self) -> &str {
        &self.format
    }

    /// Get constraints
    pub fn constraints(&self) -> &SessionConstraints {
        &self.constraints
    }

    /// Get current lifecycle state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Get the application registry
    pub fn registry(&self) -> &ParticipantRegistry {
        &self.registry
    }

    pub(crate) fn registry_mut(&mut self) -> &mut ParticipantRegistry {
        &mut self.registry
    }

    /// Candidate IDs chosen by the last fill, in selection order
    pub fn selection(&self) -> &[String] {
        &self.selection
    }

    /// Current role assignments for selected candidates
    pub fn role_assignments(&self) -> &HashMap<String, String> {
        &self.role_assignments
    }

    /// Recorded role edits awaiting undo
    pub fn role_history(&self) -> &RoleCommandStack {
        &self.role_history
    }

    /// Get the event log
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    // ------------------------------------------------------------------
    // Lifecycle transitions
    //
    // Each method delegates legality to the pure transition table, then
    // applies the swap and logs at most one event.
    // ------------------------------------------------------------------

    /// Register an application while the session is open
    ///
    /// Applying in any other state is an `IllegalTransition` no-op.
    pub fn apply(
        &mut self,
        candidate_id: String,
        role: String,
    ) -> Result<(), SessionOperationError> {
        self.state = transition(self.state, TransitionTrigger::Apply)?;
        self.registry.apply(candidate_id, role)?;
        Ok(())
    }

    /// Commit the fill: store the selection and move Open -> Full
    ///
    /// Seeds role assignments from the selected candidates' desired roles.
    /// Emits `LobbyFull`.
    pub fn reach_fill(
        &mut self,
        selection: Vec<String>,
        tick: usize,
    ) -> Result<SessionEvent, TransitionError> {
        self.state = transition(self.state, TransitionTrigger::FillReached)?;

        self.role_assignments = selection
            .iter()
            .filter_map(|id| {
                self.registry
                    .application_for(id)
                    .map(|app| (id.clone(), app.role().to_string()))
            })
            .collect();
        self.selection = selection;

        let event = SessionEvent::LobbyFull {
            tick,
            num_participants: self.selection.len(),
        };
        self.events.log(event.clone());
        Ok(event)
    }

    /// Commit a fully-confirmed barrier: Full -> Confirmed
    ///
    /// Leaving the role-negotiation phase clears the undo history.
    /// Emits `Confirmed`.
    pub fn confirm_all(&mut self, tick: usize) -> Result<SessionEvent, TransitionError> {
        self.state = transition(self.state, TransitionTrigger::AllConfirmed)?;
        self.role_history.clear();

        let event = SessionEvent::Confirmed { tick };
        self.events.log(event.clone());
        Ok(event)
    }

    /// Commit a failed confirmation pass: Full -> Open
    ///
    /// Decliners' applications are rejected; everyone else is reset to
    /// pending so the next fill cycle can pick them again. The previous
    /// selection and role assignments are discarded. Emits
    /// `ConfirmationFailed` (audit log only).
    pub fn fail_confirmation(
        &mut self,
        declined: Vec<String>,
        tick: usize,
    ) -> Result<SessionEvent, TransitionError> {
        self.state = transition(self.state, TransitionTrigger::ConfirmationFailed)?;

        for app in self.registry.applications_mut() {
            if declined.iter().any(|id| id == app.candidate_id()) {
                app.reject();
            } else if app.is_accepted() {
                // Only lobby members are requeued; waiters stay pending and
                // applications rejected in earlier passes stay rejected
                app.reset();
            }
        }
        self.selection.clear();
        self.role_assignments.clear();
        self.role_history.clear();

        let event = SessionEvent::ConfirmationFailed { tick, declined };
        self.events.log(event.clone());
        Ok(event)
    }

    /// Start the match: Confirmed -> InProgress. Emits `InProgress`.
    pub fn start(&mut self, tick: usize) -> Result<SessionEvent, TransitionError> {
        self.state = transition(self.state, TransitionTrigger::Start)?;

        let event = SessionEvent::InProgress { tick };
        self.events.log(event.clone());
        Ok(event)
    }

    /// Record the final outcome: InProgress -> Finished. Emits `Finished`.
    pub fn finish(&mut self, tick: usize) -> Result<SessionEvent, TransitionError> {
        self.state = transition(self.state, TransitionTrigger::Finish)?;

        let event = SessionEvent::Finished { tick };
        self.events.log(event.clone());
        Ok(event)
    }

    /// Cancel the session from any non-terminal state. Emits `Cancelled`.
    pub fn cancel(&mut self, tick: usize) -> Result<SessionEvent, TransitionError> {
        self.state = transition(self.state, TransitionTrigger::Cancel)?;

        let event = SessionEvent::Cancelled { tick };
        self.events.log(event.clone());
        Ok(event)
    }

    // ------------------------------------------------------------------
    // Role negotiation (legal only while Full)
    // ------------------------------------------------------------------

    /// Reassign a selected candidate's role
    pub fn assign_role(
        &mut self,
        candidate_id: &str,
        new_role: &str,
        tick: usize,
    ) -> Result<String, SessionOperationError> {
        self.require_negotiation_phase()?;
        Ok(self
            .role_history
            .assign(&mut self.role_assignments, candidate_id, new_role, tick)?)
    }

    /// Exchange two selected candidates' roles
    pub fn swap_roles(
        &mut self,
        first_id: &str,
        second_id: &str,
        tick: usize,
    ) -> Result<(), SessionOperationError> {
        self.require_negotiation_phase()?;
        Ok(self
            .role_history
            .swap(&mut self.role_assignments, first_id, second_id, tick)?)
    }

    /// Undo the most recent role edit; no-op on empty history
    pub fn undo_role_edit(&mut self) -> Result<Option<RoleCommand>, SessionOperationError> {
        self.require_negotiation_phase()?;
        Ok(self.role_history.undo_last(&mut self.role_assignments))
    }

    fn require_negotiation_phase(&self) -> Result<(), SessionOperationError> {
        if self.state != SessionState::Full {
            return Err(SessionOperationError::NotInNegotiation { state: self.state });
        }
        Ok(())
    }

    /// Split the selection into two sides
    ///
    /// First half / second half of selection order. This is a plain
    /// partition, not a skill-balanced bisection.
    pub fn split_teams(&self) -> (Vec<String>, Vec<String>) {
        let mid = self.selection.len() / 2;
        let side_a = self.selection[..mid].to_vec();
        let side_b = self.selection[mid..].to_vec();
        (side_a, side_b)
    }
}

/// Errors from session operations that touch more than the state machine
#[derive(Debug, Error, PartialEq)]
pub enum SessionOperationError {
    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Command(#[from] CommandError),

    /// Role edits are only available while the lobby is full
    #[error("Role negotiation is not available in state {state}")]
    NotInNegotiation { state: SessionState },
}

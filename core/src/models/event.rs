//! Event logging for session auditing and notification fan-out.
//!
//! Every committed lifecycle transition produces exactly one event. Events
//! are appended to the owning session's log (ordered audit trail) and fanned
//! out to registered observers by the orchestrator.
//!
//! # Event Kinds
//!
//! - **LobbyFull**: capacity reached, confirmation phase can begin
//! - **ConfirmationFailed**: a decline voided the lobby, back to Open
//! - **Confirmed**: every selected participant confirmed
//! - **InProgress**: match started
//! - **Finished**: final outcome recorded
//! - **Cancelled**: session aborted before finishing
//!
//! # Example
//!
//! ```rust
//! use scrim_coordinator_core_rs::models::SessionEvent;
//!
//! let event = SessionEvent::LobbyFull {
//!     tick: 10,
//!     num_participants: 10,
//! };
//!
//! assert_eq!(event.tick(), 10);
//! assert_eq!(event.kind(), "LobbyFull");
//! ```

use serde::{Deserialize, Serialize};

/// Lifecycle event emitted by a committed session transition.
///
/// All events carry the tick at which the transition was committed, for
/// temporal ordering within the session's log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// Capacity reached; session moved Open -> Full
    LobbyFull {
        tick: usize,
        num_participants: usize,
    },

    /// A decline or auto-reject voided the lobby; session moved Full -> Open
    ConfirmationFailed {
        tick: usize,
        /// Candidates who declined or were auto-rejected, in application order
        declined: Vec<String>,
    },

    /// All selected participants confirmed; session moved Full -> Confirmed
    Confirmed { tick: usize },

    /// Match started; session moved Confirmed -> InProgress
    InProgress { tick: usize },

    /// Match played to completion; session moved InProgress -> Finished
    Finished { tick: usize },

    /// Session aborted; terminal
    Cancelled { tick: usize },
}

impl SessionEvent {
    /// Get the tick at which the event was emitted
    pub fn tick(&self) -> usize {
        match self {
            SessionEvent::LobbyFull { tick, .. }
            | SessionEvent::ConfirmationFailed { tick, .. }
            | SessionEvent::Confirmed { tick }
            | SessionEvent::InProgress { tick }
            | SessionEvent::Finished { tick }
            | SessionEvent::Cancelled { tick } => *tick,
        }
    }

    /// Get the event kind as a string (for queries and dispatch payloads)
    pub fn kind(&self) -> &'static str {
        match self {
            SessionEvent::LobbyFull { .. } => "LobbyFull",
            SessionEvent::ConfirmationFailed { .. } => "ConfirmationFailed",
            SessionEvent::Confirmed { .. } => "Confirmed",
            SessionEvent::InProgress { .. } => "InProgress",
            SessionEvent::Finished { .. } => "Finished",
            SessionEvent::Cancelled { .. } => "Cancelled",
        }
    }

    /// Whether this event kind is delivered to external notification channels
    ///
    /// `ConfirmationFailed` stays in the audit log only; the five lifecycle
    /// kinds fan out to observers.
    pub fn is_notifiable(&self) -> bool {
        !matches!(self, SessionEvent::ConfirmationFailed { .. })
    }
}

/// Ordered log of events for one session
///
/// # Example
///
/// ```rust
/// use scrim_coordinator_core_rs::models::{EventLog, SessionEvent};
///
/// let mut log = EventLog::new();
/// log.log(SessionEvent::LobbyFull { tick: 5, num_participants: 10 });
///
/// assert_eq!(log.len(), 1);
/// assert_eq!(log.events_of_kind("LobbyFull").len(), 1);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<SessionEvent>,
}

impl EventLog {
    /// Create an empty event log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Append an event
    pub fn log(&mut self, event: SessionEvent) {
        self.events.push(event);
    }

    /// Get all events in emission order
    pub fn events(&self) -> &[SessionEvent] {
        &self.events
    }

    /// Get all events of a given kind
    pub fn events_of_kind(&self, kind: &str) -> Vec<&SessionEvent> {
        self.events.iter().filter(|e| e.kind() == kind).collect()
    }

    /// Get all events emitted at a specific tick
    pub fn events_at_tick(&self, tick: usize) -> Vec<&SessionEvent> {
        self.events.iter().filter(|e| e.tick() == tick).collect()
    }

    /// Number of logged events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if the log is empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

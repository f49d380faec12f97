//! Application model
//!
//! An application is a candidate's request to join a session with a desired
//! role. Candidate and role are immutable after creation; only the status
//! changes, and only through fill resolution and the confirmation workflow.

use serde::{Deserialize, Serialize};

/// Application status
///
/// Tracks an application through selection and confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStatus {
    /// Waiting for selection (or reset after a failed confirmation pass)
    Pending,

    /// Chosen by the selection engine for the current fill
    Accepted,

    /// Not chosen, or declined during confirmation
    Rejected,
}

/// A candidate's request to join a session
///
/// # Example
/// ```
/// use scrim_coordinator_core_rs::{Application, ApplicationStatus};
///
/// let app = Application::new("player_1".to_string(), "support".to_string());
/// assert_eq!(app.candidate_id(), "player_1");
/// assert_eq!(app.status(), ApplicationStatus::Pending);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    /// Applying candidate's ID (immutable)
    candidate_id: String,

    /// Role the candidate wants to play (immutable)
    role: String,

    /// Current status
    status: ApplicationStatus,
}

impl Application {
    /// Create a new pending application
    pub fn new(candidate_id: String, role: String) -> Self {
        Self {
            candidate_id,
            role,
            status: ApplicationStatus::Pending,
        }
    }

    /// Get the applying candidate's ID
    pub fn candidate_id(&self) -> &str {
        &self.candidate_id
    }

    /// Get the desired role
    pub fn role(&self) -> &str {
        &self.role
    }

    /// Get current status
    pub fn status(&self) -> ApplicationStatus {
        self.status
    }

    /// Check if the application is awaiting selection
    pub fn is_pending(&self) -> bool {
        self.status == ApplicationStatus::Pending
    }

    /// Check if the application was accepted in the current fill
    pub fn is_accepted(&self) -> bool {
        self.status == ApplicationStatus::Accepted
    }

    /// Mark as accepted (selection engine result, applied by the orchestrator)
    pub(crate) fn accept(&mut self) {
        self.status = ApplicationStatus::Accepted;
    }

    /// Mark as rejected (not selected, or declined confirmation)
    pub(crate) fn reject(&mut self) {
        self.status = ApplicationStatus::Rejected;
    }

    /// Reset to pending (requeue after a failed confirmation pass)
    pub(crate) fn reset(&mut self) {
        self.status = ApplicationStatus::Pending;
    }
}

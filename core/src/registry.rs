//! Participant registry
//!
//! Tracks applications (candidate + desired role) for one session, in
//! insertion order. Insertion order matters: it is the deterministic
//! tie-break used by the selection strategies downstream.

use crate::models::application::{Application, ApplicationStatus};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when registering an application
#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
    #[error("Candidate {candidate_id} already has an active application")]
    DuplicateApplication { candidate_id: String },
}

/// Ordered store of applications for one session
///
/// # Example
/// ```
/// use scrim_coordinator_core_rs::ParticipantRegistry;
///
/// let mut registry = ParticipantRegistry::new();
/// registry.apply("p1".to_string(), "tank".to_string()).unwrap();
///
/// // A second application while the first is active is rejected
/// assert!(registry.apply("p1".to_string(), "support".to_string()).is_err());
/// assert_eq!(registry.applications().len(), 1);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParticipantRegistry {
    applications: Vec<Application>,
}

impl ParticipantRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            applications: Vec::new(),
        }
    }

    /// Register an application for a candidate
    ///
    /// Rejects a duplicate while the same candidate has a pending or
    /// accepted application. A candidate whose earlier application was
    /// rejected may apply again (e.g. with a different role).
    ///
    /// # Returns
    /// Reference to the stored application, or
    /// `RegistryError::DuplicateApplication`.
    pub fn apply(
        &mut self,
        candidate_id: String,
        role: String,
    ) -> Result<&Application, RegistryError> {
        let has_active = self.applications.iter().any(|app| {
            app.candidate_id() == candidate_id && app.status() != ApplicationStatus::Rejected
        });
        if has_active {
            return Err(RegistryError::DuplicateApplication { candidate_id });
        }

        self.applications.push(Application::new(candidate_id, role));
        Ok(self.applications.last().unwrap())
    }

    /// All applications in insertion order
    pub fn applications(&self) -> &[Application] {
        &self.applications
    }

    /// Mutable access for fill resolution and confirmation bookkeeping
    pub(crate) fn applications_mut(&mut self) -> &mut [Application] {
        &mut self.applications
    }

    /// Applications currently marked accepted, in insertion order
    pub fn accepted(&self) -> Vec<&Application> {
        self.applications
            .iter()
            .filter(|app| app.is_accepted())
            .collect()
    }

    /// Find a candidate's most recent application, if any
    pub fn application_for(&self, candidate_id: &str) -> Option<&Application> {
        self.applications
            .iter()
            .rev()
            .find(|app| app.candidate_id() == candidate_id)
    }

    /// Number of stored applications
    pub fn len(&self) -> usize {
        self.applications.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.applications.is_empty()
    }
}

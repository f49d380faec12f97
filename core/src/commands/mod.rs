//! Role-assignment command history
//!
//! Every role edit during the negotiation phase is recorded as an
//! invertible command on a per-session stack. `undo_last` pops the most
//! recent record and reapplies its inverse. The stack is cleared when the
//! session leaves the role-negotiation phase.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors from role-command operations
#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("Candidate {candidate_id} has no role assignment in this session")]
    UnknownCandidate { candidate_id: String },

    #[error("Cannot swap candidate {candidate_id} with themself")]
    SelfSwap { candidate_id: String },
}

/// One recorded, invertible role edit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RoleCommand {
    /// A single candidate's role was reassigned
    Assign {
        candidate_id: String,
        previous_role: String,
        new_role: String,
        tick: usize,
    },

    /// Two candidates exchanged roles
    Swap {
        first_id: String,
        first_previous_role: String,
        second_id: String,
        second_previous_role: String,
        tick: usize,
    },
}

/// Stored command with its identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleCommandRecord {
    /// Unique record identifier (UUID)
    id: String,

    /// The recorded edit
    command: RoleCommand,
}

impl RoleCommandRecord {
    /// Get record ID
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the recorded command
    pub fn command(&self) -> &RoleCommand {
        &self.command
    }
}

/// Per-session undo stack of role edits
///
/// The stack does not own the assignments map; callers pass the session's
/// map to each operation so the stack stays a pure history mechanism.
///
/// # Example
/// ```
/// use scrim_coordinator_core_rs::commands::RoleCommandStack;
/// use std::collections::HashMap;
///
/// let mut assignments = HashMap::from([
///     ("p1".to_string(), "tank".to_string()),
///     ("p2".to_string(), "mid".to_string()),
/// ]);
/// let mut stack = RoleCommandStack::new();
///
/// stack.swap(&mut assignments, "p1", "p2", 5).unwrap();
/// assert_eq!(assignments["p1"], "mid");
///
/// stack.undo_last(&mut assignments);
/// assert_eq!(assignments["p1"], "tank");
/// assert_eq!(assignments["p2"], "mid");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoleCommandStack {
    history: Vec<RoleCommandRecord>,
}

impl RoleCommandStack {
    /// Create an empty stack
    pub fn new() -> Self {
        Self {
            history: Vec::new(),
        }
    }

    /// Reassign a candidate's role, recording the inverse
    ///
    /// # Returns
    /// The previous role, or `CommandError::UnknownCandidate` if the
    /// candidate has no assignment in this session.
    pub fn assign(
        &mut self,
        assignments: &mut HashMap<String, String>,
        candidate_id: &str,
        new_role: &str,
        tick: usize,
    ) -> Result<String, CommandError> {
        let slot = assignments
            .get_mut(candidate_id)
            .ok_or_else(|| CommandError::UnknownCandidate {
                candidate_id: candidate_id.to_string(),
            })?;
        let previous_role = std::mem::replace(slot, new_role.to_string());

        self.history.push(RoleCommandRecord {
            id: uuid::Uuid::new_v4().to_string(),
            command: RoleCommand::Assign {
                candidate_id: candidate_id.to_string(),
                previous_role: previous_role.clone(),
                new_role: new_role.to_string(),
                tick,
            },
        });
        Ok(previous_role)
    }

    /// Exchange two candidates' roles, recording the inverse
    ///
    /// Swapping a candidate with themself is rejected.
    pub fn swap(
        &mut self,
        assignments: &mut HashMap<String, String>,
        first_id: &str,
        second_id: &str,
        tick: usize,
    ) -> Result<(), CommandError> {
        if first_id == second_id {
            return Err(CommandError::SelfSwap {
                candidate_id: first_id.to_string(),
            });
        }

        let first_role =
            assignments
                .get(first_id)
                .cloned()
                .ok_or_else(|| CommandError::UnknownCandidate {
                    candidate_id: first_id.to_string(),
                })?;
        let second_role =
            assignments
                .get(second_id)
                .cloned()
                .ok_or_else(|| CommandError::UnknownCandidate {
                    candidate_id: second_id.to_string(),
                })?;

        assignments.insert(first_id.to_string(), second_role.clone());
        assignments.insert(second_id.to_string(), first_role.clone());

        self.history.push(RoleCommandRecord {
            id: uuid::Uuid::new_v4().to_string(),
            command: RoleCommand::Swap {
                first_id: first_id.to_string(),
                first_previous_role: first_role,
                second_id: second_id.to_string(),
                second_previous_role: second_role,
                tick,
            },
        });
        Ok(())
    }

    /// Undo the most recent edit, restoring prior roles exactly
    ///
    /// Undoing with an empty history is a no-op, not an error.
    ///
    /// # Returns
    /// The undone command, or `None` if the history was empty.
    pub fn undo_last(&mut self, assignments: &mut HashMap<String, String>) -> Option<RoleCommand> {
        let record = self.history.pop()?;

        match &record.command {
            RoleCommand::Assign {
                candidate_id,
                previous_role,
                ..
            } => {
                assignments.insert(candidate_id.clone(), previous_role.clone());
            }
            RoleCommand::Swap {
                first_id,
                first_previous_role,
                second_id,
                second_previous_role,
                ..
            } => {
                assignments.insert(first_id.clone(), first_previous_role.clone());
                assignments.insert(second_id.clone(), second_previous_role.clone());
            }
        }

        Some(record.command)
    }

    /// Clear the history (on leaving the role-negotiation phase)
    pub fn clear(&mut self) {
        self.history.clear();
    }

    /// Recorded edits, oldest first
    pub fn history(&self) -> &[RoleCommandRecord] {
        &self.history
    }

    /// Number of recorded edits
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Check if the history is empty
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignments() -> HashMap<String, String> {
        HashMap::from([
            ("p1".to_string(), "tank".to_string()),
            ("p2".to_string(), "mid".to_string()),
        ])
    }

    #[test]
    fn test_assign_records_inverse() {
        let mut map = assignments();
        let mut stack = RoleCommandStack::new();

        let prev = stack.assign(&mut map, "p1", "support", 3).unwrap();
        assert_eq!(prev, "tank");
        assert_eq!(map["p1"], "support");
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn test_undo_empty_is_noop() {
        let mut map = assignments();
        let mut stack = RoleCommandStack::new();

        assert!(stack.undo_last(&mut map).is_none());
        assert_eq!(map, assignments()); // untouched
    }

    #[test]
    fn test_self_swap_rejected() {
        let mut map = assignments();
        let mut stack = RoleCommandStack::new();

        let err = stack.swap(&mut map, "p1", "p1", 0).unwrap_err();
        assert_eq!(
            err,
            CommandError::SelfSwap {
                candidate_id: "p1".to_string()
            }
        );
        assert!(stack.is_empty());
    }

    #[test]
    fn test_swap_unknown_candidate() {
        let mut map = assignments();
        let mut stack = RoleCommandStack::new();

        let err = stack.swap(&mut map, "p1", "ghost", 0).unwrap_err();
        assert_eq!(
            err,
            CommandError::UnknownCandidate {
                candidate_id: "ghost".to_string()
            }
        );
        // First candidate's role untouched on failure
        assert_eq!(map["p1"], "tank");
    }

    #[test]
    fn test_undo_stack_order() {
        let mut map = assignments();
        let mut stack = RoleCommandStack::new();

        stack.assign(&mut map, "p1", "support", 1).unwrap();
        stack.swap(&mut map, "p1", "p2", 2).unwrap();
        assert_eq!(map["p1"], "mid");
        assert_eq!(map["p2"], "support");

        // Undo swap first (LIFO), then the assign
        stack.undo_last(&mut map);
        assert_eq!(map["p1"], "support");
        assert_eq!(map["p2"], "mid");

        stack.undo_last(&mut map);
        assert_eq!(map["p1"], "tank");
        assert!(stack.is_empty());
    }
}

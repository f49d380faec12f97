//! Session lifecycle state machine
//!
//! States and transitions for a scrim session, expressed as a tagged enum
//! plus a single pure transition function. The whole legal-transition table
//! is auditable in one `match` below.
//!
//! The machine performs no business computation: selection filtering and
//! sanctioning live in their own modules. A transition's only effects are
//! swapping the state value and (at the session level) emitting one event.
//!
//! # Transition table
//!
//! ```text
//! Open       --Apply-------------> Open       (accepted while under capacity)
//! Open       --FillReached-------> Full       emits LobbyFull
//! Open       --Cancel------------> Cancelled  emits Cancelled
//! Full       --Cancel------------> Cancelled  emits Cancelled
//! Full       --AllConfirmed------> Confirmed  emits Confirmed
//! Full       --ConfirmationFailed> Open       emits ConfirmationFailed (log only)
//! Confirmed  --Start-------------> InProgress emits InProgress
//! Confirmed  --Cancel------------> Cancelled  emits Cancelled
//! InProgress --Finish------------> Finished   emits Finished
//! ```
//!
//! Anything else is an `IllegalTransition`: a rejected no-op reported to the
//! caller, never a fatal error.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Lifecycle state of a session
///
/// Initial state is `Open`; `Finished` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Accepting applications
    Open,

    /// Capacity reached, awaiting confirmation from every participant
    Full,

    /// Every participant confirmed; ready to start
    Confirmed,

    /// Match being played
    InProgress,

    /// Match played to completion (terminal)
    Finished,

    /// Session aborted (terminal)
    Cancelled,
}

impl SessionState {
    /// Check whether this state is terminal
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Finished | SessionState::Cancelled)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Open => "Open",
            SessionState::Full => "Full",
            SessionState::Confirmed => "Confirmed",
            SessionState::InProgress => "InProgress",
            SessionState::Finished => "Finished",
            SessionState::Cancelled => "Cancelled",
        };
        write!(f, "{}", name)
    }
}

/// Trigger driving a lifecycle transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionTrigger {
    /// A candidate applied to join
    Apply,

    /// Selection filled the lobby to capacity
    FillReached,

    /// Every accepted applicant confirmed
    AllConfirmed,

    /// At least one accepted applicant declined or was auto-rejected
    ConfirmationFailed,

    /// Match start requested
    Start,

    /// Match finish recorded
    Finish,

    /// Explicit cancellation
    Cancel,
}

impl fmt::Display for TransitionTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransitionTrigger::Apply => "Apply",
            TransitionTrigger::FillReached => "FillReached",
            TransitionTrigger::AllConfirmed => "AllConfirmed",
            TransitionTrigger::ConfirmationFailed => "ConfirmationFailed",
            TransitionTrigger::Start => "Start",
            TransitionTrigger::Finish => "Finish",
            TransitionTrigger::Cancel => "Cancel",
        };
        write!(f, "{}", name)
    }
}

/// Errors from attempting a lifecycle transition
#[derive(Debug, Error, PartialEq)]
pub enum TransitionError {
    /// The trigger is not legal in the current state.
    ///
    /// Non-fatal: callers surface this for UI feedback and the session is
    /// left untouched.
    #[error("Illegal transition: {trigger} in state {from}")]
    IllegalTransition {
        from: SessionState,
        trigger: TransitionTrigger,
    },
}

/// Compute the successor state for a trigger
///
/// Pure function over the transition table. Returns the new state (which
/// for `Apply` equals the old one), or `IllegalTransition` if the trigger
/// is not legal in `from`.
///
/// # Example
/// ```
/// use scrim_coordinator_core_rs::lifecycle::{transition, SessionState, TransitionTrigger};
///
/// let next = transition(SessionState::Open, TransitionTrigger::FillReached).unwrap();
/// assert_eq!(next, SessionState::Full);
///
/// // Cancel on a terminal state is rejected, not fatal
/// assert!(transition(SessionState::Finished, TransitionTrigger::Cancel).is_err());
/// ```
pub fn transition(
    from: SessionState,
    trigger: TransitionTrigger,
) -> Result<SessionState, TransitionError> {
    use SessionState::*;
    use TransitionTrigger::*;

    match (from, trigger) {
        (Open, Apply) => Ok(Open),
        (Open, FillReached) => Ok(Full),
        (Open, Cancel) => Ok(Cancelled),
        (Full, Cancel) => Ok(Cancelled),
        (Full, AllConfirmed) => Ok(Confirmed),
        (Full, ConfirmationFailed) => Ok(Open),
        (Confirmed, Start) => Ok(InProgress),
        (Confirmed, Cancel) => Ok(Cancelled),
        (InProgress, Finish) => Ok(Finished),
        _ => Err(TransitionError::IllegalTransition { from, trigger }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let mut state = SessionState::Open;
        for (trigger, expected) in [
            (TransitionTrigger::Apply, SessionState::Open),
            (TransitionTrigger::FillReached, SessionState::Full),
            (TransitionTrigger::AllConfirmed, SessionState::Confirmed),
            (TransitionTrigger::Start, SessionState::InProgress),
            (TransitionTrigger::Finish, SessionState::Finished),
        ] {
            state = transition(state, trigger).unwrap();
            assert_eq!(state, expected);
        }
        assert!(state.is_terminal());
    }

    #[test]
    fn test_confirmation_failure_reopens() {
        let state = transition(SessionState::Full, TransitionTrigger::ConfirmationFailed).unwrap();
        assert_eq!(state, SessionState::Open);
    }

    #[test]
    fn test_apply_rejected_outside_open() {
        for from in [
            SessionState::Full,
            SessionState::Confirmed,
            SessionState::InProgress,
            SessionState::Finished,
            SessionState::Cancelled,
        ] {
            let err = transition(from, TransitionTrigger::Apply).unwrap_err();
            assert_eq!(
                err,
                TransitionError::IllegalTransition {
                    from,
                    trigger: TransitionTrigger::Apply
                }
            );
        }
    }

    #[test]
    fn test_start_rejected_before_confirmed() {
        assert!(transition(SessionState::Open, TransitionTrigger::Start).is_err());
        assert!(transition(SessionState::Full, TransitionTrigger::Start).is_err());
    }

    #[test]
    fn test_cancel_rejected_on_terminal_states() {
        assert!(transition(SessionState::Finished, TransitionTrigger::Cancel).is_err());
        assert!(transition(SessionState::Cancelled, TransitionTrigger::Cancel).is_err());
    }

    #[test]
    fn test_no_skip_barrier_path_to_confirmed() {
        // Confirmed is only reachable via AllConfirmed out of Full
        use SessionState::*;
        use TransitionTrigger::*;
        let states = [Open, Full, Confirmed, InProgress, Finished, Cancelled];
        let triggers = [
            Apply,
            FillReached,
            AllConfirmed,
            ConfirmationFailed,
            Start,
            Finish,
            Cancel,
        ];

        for from in states {
            for trigger in triggers {
                if let Ok(Confirmed) = transition(from, trigger) {
                    assert_eq!(from, Full);
                    assert_eq!(trigger, AllConfirmed);
                }
            }
        }
    }
}

//! Confirmation workflow
//!
//! Runs once when a session reaches Full, before the Confirmed transition.
//! Every accepted applicant must explicitly confirm; the barrier is strict:
//! a single decline, timeout or auto-reject voids the entire lobby.
//!
//! # Per-candidate resolution (application order)
//!
//! 1. Candidate currently banned: auto-reject without prompting, recorded
//!    as a decline. No second sanction in the same pass.
//! 2. Otherwise solicit a decision through the prompt channel. The channel
//!    must bound its wait: a non-response comes back as `TimedOut` and is
//!    treated identically to an explicit decline.
//!
//! # Resolution
//!
//! All confirmed: the coordinator reports success and the orchestrator
//! commits Full -> Confirmed. Any decline: every decliner receives one
//! strike (ban duration scales with cumulative strike count; applying the
//! strike re-checks ban state so an already-banned candidate is never
//! sanctioned twice), and the session goes back to Open with non-decliners
//! requeued.
//!
//! The coordinator never touches session state itself; it reads the
//! accepted applications, talks to the directory and the prompt channel,
//! and hands a report to the orchestrator.

use crate::directory::{CandidateDirectory, DirectoryError};
use crate::models::session::Session;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::sync::Mutex;
use std::time::Duration;

/// Reply from the confirmation prompt channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfirmationReply {
    /// Candidate explicitly confirmed
    Confirmed,

    /// Candidate explicitly declined
    Declined,

    /// No response within the bounded wait (treated as a decline)
    TimedOut,
}

/// Channel through which candidates are asked to confirm
///
/// Implemented by whatever front end exists (console, push notification).
/// Implementations must bound their wait and return `TimedOut` rather than
/// block indefinitely.
pub trait ConfirmationChannel: Send + Sync {
    /// Ask one candidate to confirm participation in one session
    fn request_confirmation(&self, candidate_id: &str, session_id: &str) -> ConfirmationReply;
}

/// How one candidate's confirmation resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConfirmationDecision {
    /// Candidate confirmed
    Confirmed { candidate_id: String },

    /// Candidate declined explicitly or by timeout
    Declined {
        candidate_id: String,
        timed_out: bool,
    },

    /// Candidate was banned at prompt time; no prompt was sent
    AutoRejected { candidate_id: String },
}

impl ConfirmationDecision {
    /// Candidate this decision is about
    pub fn candidate_id(&self) -> &str {
        match self {
            ConfirmationDecision::Confirmed { candidate_id }
            | ConfirmationDecision::Declined { candidate_id, .. }
            | ConfirmationDecision::AutoRejected { candidate_id } => candidate_id,
        }
    }

    /// Whether this decision counts against the barrier
    pub fn is_negative(&self) -> bool {
        !matches!(self, ConfirmationDecision::Confirmed { .. })
    }
}

/// Result of one confirmation pass
#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmationOutcome {
    /// Every accepted applicant confirmed
    AllConfirmed,

    /// At least one decline or auto-reject; the lobby is void
    Failed,

    /// The session was cancelled mid-pass; no sanctions were applied
    Aborted,
}

/// Full report of one confirmation pass
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmationReport {
    /// Per-candidate decisions in application order
    pub decisions: Vec<ConfirmationDecision>,

    /// Aggregate resolution
    pub outcome: ConfirmationOutcome,
}

impl ConfirmationReport {
    /// IDs of candidates who confirmed, in application order
    pub fn confirmed(&self) -> Vec<String> {
        self.decisions
            .iter()
            .filter(|d| !d.is_negative())
            .map(|d| d.candidate_id().to_string())
            .collect()
    }

    /// IDs of candidates who declined, timed out or were auto-rejected
    pub fn declined(&self) -> Vec<String> {
        self.decisions
            .iter()
            .filter(|d| d.is_negative())
            .map(|d| d.candidate_id().to_string())
            .collect()
    }
}

/// Drives the manual-confirmation phase for sessions at Full
pub struct ConfirmationCoordinator {
    channel: Box<dyn ConfirmationChannel>,

    /// Lockout duration for a first offence, in ticks
    base_ban_ticks: usize,
}

impl ConfirmationCoordinator {
    /// Create a coordinator over a prompt channel
    ///
    /// # Arguments
    ///
    /// * `channel` - Prompt channel (must bound its wait internally)
    /// * `base_ban_ticks` - First-offence lockout duration; escalates
    ///   linearly with the candidate's cumulative strike count
    pub fn new(channel: Box<dyn ConfirmationChannel>, base_ban_ticks: usize) -> Self {
        Self {
            channel,
            base_ban_ticks,
        }
    }

    /// Run one confirmation pass over a session's accepted applications
    ///
    /// Prompts in application order, stopping immediately if `cancelled`
    /// is set (no sanctions are applied in that case). On failure, applies
    /// one strike to every decliner who is not already banned.
    ///
    /// # Errors
    ///
    /// `DirectoryError` if an applicant is missing from the directory.
    /// The caller treats this as transient-retryable; the session is left
    /// untouched.
    pub fn run(
        &self,
        session: &Session,
        directory: &CandidateDirectory,
        cancelled: &AtomicBool,
        tick: usize,
    ) -> Result<ConfirmationReport, DirectoryError> {
        let mut decisions = Vec::new();

        if cancelled.load(Ordering::SeqCst) {
            return Ok(ConfirmationReport {
                decisions,
                outcome: ConfirmationOutcome::Aborted,
            });
        }

        for app in session.registry().accepted() {
            if cancelled.load(Ordering::SeqCst) {
                return Ok(ConfirmationReport {
                    decisions,
                    outcome: ConfirmationOutcome::Aborted,
                });
            }

            let candidate_id = app.candidate_id();
            if directory.is_banned(candidate_id, tick)? {
                decisions.push(ConfirmationDecision::AutoRejected {
                    candidate_id: candidate_id.to_string(),
                });
                continue;
            }

            let decision = match self.channel.request_confirmation(candidate_id, session.id()) {
                ConfirmationReply::Confirmed => ConfirmationDecision::Confirmed {
                    candidate_id: candidate_id.to_string(),
                },
                ConfirmationReply::Declined => ConfirmationDecision::Declined {
                    candidate_id: candidate_id.to_string(),
                    timed_out: false,
                },
                ConfirmationReply::TimedOut => ConfirmationDecision::Declined {
                    candidate_id: candidate_id.to_string(),
                    timed_out: true,
                },
            };
            decisions.push(decision);
        }

        let any_negative = decisions.iter().any(|d| d.is_negative());
        if !any_negative {
            return Ok(ConfirmationReport {
                decisions,
                outcome: ConfirmationOutcome::AllConfirmed,
            });
        }

        // Sanction every negative decision. The guarded update skips
        // candidates whose ban already covers this tick (auto-rejects),
        // so nobody is sanctioned twice in one pass.
        for decision in &decisions {
            if !decision.is_negative() {
                continue;
            }
            match directory.apply_strike_if_unbanned(
                decision.candidate_id(),
                tick,
                self.base_ban_ticks,
            ) {
                Ok(_) => {}
                Err(err) => {
                    // Directory hiccups must not void the pass resolution
                    log::warn!(
                        "sanction for {} could not be applied: {}",
                        decision.candidate_id(),
                        err
                    );
                }
            }
        }

        Ok(ConfirmationReport {
            decisions,
            outcome: ConfirmationOutcome::Failed,
        })
    }
}

/// Prompt channel backed by a pair of mpsc queues
///
/// Prompts are pushed to `prompt_tx` as `(candidate_id, session_id)`;
/// whatever front end sits on the other side pushes replies back. The wait
/// for each reply is bounded by `timeout`: a late or missing reply is
/// reported as `TimedOut`.
pub struct MpscConfirmationChannel {
    prompt_tx: Mutex<Sender<(String, String)>>,
    reply_rx: Mutex<Receiver<ConfirmationReply>>,
    timeout: Duration,
}

impl MpscConfirmationChannel {
    /// Create a channel over existing queue endpoints
    pub fn new(
        prompt_tx: Sender<(String, String)>,
        reply_rx: Receiver<ConfirmationReply>,
        timeout: Duration,
    ) -> Self {
        Self {
            prompt_tx: Mutex::new(prompt_tx),
            reply_rx: Mutex::new(reply_rx),
            timeout,
        }
    }
}

impl ConfirmationChannel for MpscConfirmationChannel {
    fn request_confirmation(&self, candidate_id: &str, session_id: &str) -> ConfirmationReply {
        // A closed front end is indistinguishable from one that never
        // answers: both resolve as a timeout-decline.
        let send_failed = {
            let tx = self.prompt_tx.lock().expect("confirmation channel lock poisoned");
            tx.send((candidate_id.to_string(), session_id.to_string()))
                .is_err()
        };
        if send_failed {
            return ConfirmationReply::TimedOut;
        }

        let rx = self.reply_rx.lock().expect("confirmation channel lock poisoned");
        match rx.recv_timeout(self.timeout) {
            Ok(reply) => reply,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                ConfirmationReply::TimedOut
            }
        }
    }
}

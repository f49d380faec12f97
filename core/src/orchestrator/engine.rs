//! Session orchestrator
//!
//! Drives the end-to-end flow for every session it owns:
//!
//! ```text
//! create -> apply* -> resolve_fill -> run_confirmation -> start -> finish
//!                          |                |
//!                          |                +-- failed: back to Open, re-fill
//!                          +-- cancel at any non-terminal point
//! ```
//!
//! # Concurrency
//!
//! Single writer per session: each session lives behind its own `Mutex`,
//! so concurrent `apply` calls serialize and capacity/fill-order invariants
//! hold. Selection runs over a snapshot of the directory taken under the
//! session lock. The shared candidate directory takes its own lock for
//! reads and guarded sanction updates. Cancellation sets a per-session
//! flag before taking the lock, so a confirmation pass in flight stops
//! soliciting as soon as it observes the flag.

use crate::confirmation::{ConfirmationCoordinator, ConfirmationOutcome};
use crate::directory::{CandidateDirectory, DirectoryError};
use crate::lifecycle::{SessionState, TransitionError, TransitionTrigger};
use crate::models::session::{
    ConstraintError, Session, SessionConstraints, SessionOperationError,
};
use crate::notify::{NotificationDispatcher, SessionObserver};
use crate::orchestrator::catalog::GameCatalog;
use crate::selection::{build_strategy, SelectionStrategy, StrategyConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use thiserror::Error;

/// Errors surfaced by orchestrator operations
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session not found: {session_id}")]
    UnknownSession { session_id: String },

    #[error("Game not found in catalog: {game_id}")]
    UnknownGame { game_id: String },

    #[error(transparent)]
    Constraint(#[from] ConstraintError),

    #[error(transparent)]
    Operation(#[from] SessionOperationError),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    /// Directory lookups are transient-retryable: the session is left
    /// untouched and the caller may retry the operation.
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

/// Configuration for creating one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Game this session is for
    pub game_id: String,

    /// Format descriptor; `None` takes the catalog default
    pub format: Option<String>,

    /// Lowest acceptable skill rating (inclusive)
    pub min_rating: i64,

    /// Highest acceptable skill rating (inclusive)
    pub max_rating: i64,

    /// Highest acceptable latency in milliseconds
    pub max_latency_ms: u32,

    /// Total participants; `None` takes the catalog default
    pub capacity: Option<usize>,

    /// Selection strategy for fills
    pub strategy: StrategyConfig,
}

/// Summary of one fill attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillResult {
    /// Whether capacity was reached and the session moved to Full
    pub filled: bool,

    /// Candidates selected in this attempt
    pub num_selected: usize,

    /// Pending applicants left waiting (not selected, not rejected)
    pub num_waiting: usize,
}

/// The two sides of a confirmed lobby
///
/// First half / second half of selection order; a plain partition, not a
/// skill-balanced bisection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchPlan {
    pub side_a: Vec<String>,
    pub side_b: Vec<String>,
}

/// One session plus its coordination state
struct SessionHandle {
    session: Mutex<Session>,

    /// Set by `cancel` before taking the session lock; observed by a
    /// confirmation pass in flight
    cancelled: AtomicBool,

    /// Selection strategy chosen at creation
    strategy: Box<dyn SelectionStrategy>,
}

/// Composes registry, selection, lifecycle, confirmation and notification
/// into the end-to-end session flow
pub struct SessionOrchestrator {
    directory: Arc<CandidateDirectory>,
    catalog: GameCatalog,
    dispatcher: NotificationDispatcher,
    sessions: RwLock<HashMap<String, Arc<SessionHandle>>>,
}

impl SessionOrchestrator {
    /// Create an orchestrator over a shared candidate directory
    pub fn new(directory: Arc<CandidateDirectory>, catalog: GameCatalog) -> Self {
        Self {
            directory,
            catalog,
            dispatcher: NotificationDispatcher::new(),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Subscribe a notification observer (before driving sessions)
    pub fn register_observer(&mut self, observer: Box<dyn SessionObserver>) {
        self.dispatcher.register(observer);
    }

    /// Create a session and return its ID
    ///
    /// Format and capacity fall back to the catalog defaults for the game;
    /// a game absent from the catalog requires both to be explicit.
    pub fn create_session(&self, config: SessionConfig) -> Result<String, SessionError> {
        let catalog_entry = self.catalog.lookup(&config.game_id);

        let capacity = match (config.capacity, catalog_entry) {
            (Some(capacity), _) => capacity,
            (None, Some(entry)) => entry.total_players,
            (None, None) => {
                return Err(SessionError::UnknownGame {
                    game_id: config.game_id,
                })
            }
        };
        let format = match (config.format, catalog_entry) {
            (Some(format), _) => format,
            (None, Some(entry)) => entry.format.clone(),
            (None, None) => {
                return Err(SessionError::UnknownGame {
                    game_id: config.game_id,
                })
            }
        };

        let constraints = SessionConstraints::new(
            config.min_rating,
            config.max_rating,
            config.max_latency_ms,
            capacity,
        )?;
        let session = Session::new(config.game_id, format, constraints);
        let session_id = session.id().to_string();

        let handle = Arc::new(SessionHandle {
            session: Mutex::new(session),
            cancelled: AtomicBool::new(false),
            strategy: build_strategy(&config.strategy),
        });

        let mut sessions = self.sessions.write().expect("session table lock poisoned");
        sessions.insert(session_id.clone(), handle);
        Ok(session_id)
    }

    /// Register a candidate's application to an open session
    ///
    /// The candidate must exist in the directory; a missing profile is a
    /// transient directory error, retryable without touching the session.
    pub fn apply(
        &self,
        session_id: &str,
        candidate_id: &str,
        role: &str,
    ) -> Result<(), SessionError> {
        let handle = self.handle(session_id)?;

        if self.directory.get(candidate_id).is_none() {
            return Err(DirectoryError::UnknownCandidate {
                candidate_id: candidate_id.to_string(),
            }
            .into());
        }

        let mut session = handle.session.lock().expect("session lock poisoned");
        session.apply(candidate_id.to_string(), role.to_string())?;
        Ok(())
    }

    /// Run the selection strategy and commit the fill if capacity is met
    ///
    /// Pending applicants' profiles are snapshotted in application order
    /// and handed to the pure strategy. When the selection reaches
    /// capacity the session moves Open -> Full and `LobbyFull` fans out;
    /// otherwise nothing changes and applicants keep waiting.
    pub fn resolve_fill(&self, session_id: &str, tick: usize) -> Result<FillResult, SessionError> {
        let handle = self.handle(session_id)?;
        let mut session = handle.session.lock().expect("session lock poisoned");

        if session.state() != SessionState::Open {
            return Err(TransitionError::IllegalTransition {
                from: session.state(),
                trigger: TransitionTrigger::FillReached,
            }
            .into());
        }

        let pending_ids: Vec<String> = session
            .registry()
            .applications()
            .iter()
            .filter(|app| app.is_pending())
            .map(|app| app.candidate_id().to_string())
            .collect();
        let snapshot = self.directory.snapshot(&pending_ids);

        let selection = handle.strategy.select(&snapshot, &session);
        let capacity = session.constraints().capacity();

        if selection.len() < capacity {
            return Ok(FillResult {
                filled: false,
                num_selected: selection.len(),
                num_waiting: pending_ids.len(),
            });
        }

        for app in session.registry_mut().applications_mut() {
            if app.is_pending() && selection.iter().any(|id| id == app.candidate_id()) {
                app.accept();
            }
        }
        let num_waiting = pending_ids.len() - selection.len();
        let num_selected = selection.len();

        let event = session.reach_fill(selection, tick)?;
        self.dispatcher.dispatch(session_id, &event);

        Ok(FillResult {
            filled: true,
            num_selected,
            num_waiting,
        })
    }

    /// Run the confirmation barrier for a session at Full
    ///
    /// - All confirmed: Full -> Confirmed, `Confirmed` fans out.
    /// - Any decline: decliners sanctioned and rejected, everyone else
    ///   requeued, Full -> Open.
    /// - Aborted (cancel observed mid-pass): the session is left at Full
    ///   for the pending `cancel` call to transition; no sanctions.
    pub fn run_confirmation(
        &self,
        session_id: &str,
        coordinator: &ConfirmationCoordinator,
        tick: usize,
    ) -> Result<ConfirmationOutcome, SessionError> {
        let handle = self.handle(session_id)?;
        let mut session = handle.session.lock().expect("session lock poisoned");

        if session.state() != SessionState::Full {
            return Err(TransitionError::IllegalTransition {
                from: session.state(),
                trigger: TransitionTrigger::AllConfirmed,
            }
            .into());
        }

        let report = coordinator.run(&session, &self.directory, &handle.cancelled, tick)?;

        match report.outcome {
            ConfirmationOutcome::AllConfirmed => {
                let event = session.confirm_all(tick)?;
                self.dispatcher.dispatch(session_id, &event);
            }
            ConfirmationOutcome::Failed => {
                let event = session.fail_confirmation(report.declined(), tick)?;
                self.dispatcher.dispatch(session_id, &event);
            }
            ConfirmationOutcome::Aborted => {}
        }

        Ok(report.outcome)
    }

    /// Start the match: Confirmed -> InProgress
    ///
    /// Returns the two sides, split from the selection order.
    pub fn start(&self, session_id: &str, tick: usize) -> Result<MatchPlan, SessionError> {
        let handle = self.handle(session_id)?;
        let mut session = handle.session.lock().expect("session lock poisoned");

        let event = session.start(tick)?;
        self.dispatcher.dispatch(session_id, &event);

        let (side_a, side_b) = session.split_teams();
        Ok(MatchPlan { side_a, side_b })
    }

    /// Record the final outcome: InProgress -> Finished
    ///
    /// Participants' completed-session counts are updated in the
    /// directory; a missing profile is logged and skipped, never fatal.
    pub fn finish(&self, session_id: &str, tick: usize) -> Result<(), SessionError> {
        let handle = self.handle(session_id)?;
        let mut session = handle.session.lock().expect("session lock poisoned");

        let event = session.finish(tick)?;
        self.dispatcher.dispatch(session_id, &event);

        for candidate_id in session.selection() {
            if let Err(err) = self.directory.record_completed_session(candidate_id) {
                log::warn!("completed-session update skipped: {}", err);
            }
        }
        Ok(())
    }

    /// Cancel a session; idempotent
    ///
    /// Sets the cancellation flag before taking the session lock so a
    /// confirmation pass in flight stops soliciting. Returns `true` if
    /// this call performed the transition, `false` if the session was
    /// already terminal (no duplicate `Cancelled` event).
    pub fn cancel(&self, session_id: &str, tick: usize) -> Result<bool, SessionError> {
        let handle = self.handle(session_id)?;
        handle.cancelled.store(true, Ordering::SeqCst);

        let mut session = handle.session.lock().expect("session lock poisoned");
        if session.state().is_terminal() {
            return Ok(false);
        }

        let event = session.cancel(tick)?;
        self.dispatcher.dispatch(session_id, &event);
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Role negotiation passthrough (legal while the session is Full)
    // ------------------------------------------------------------------

    /// Reassign a selected candidate's role
    pub fn assign_role(
        &self,
        session_id: &str,
        candidate_id: &str,
        new_role: &str,
        tick: usize,
    ) -> Result<String, SessionError> {
        let handle = self.handle(session_id)?;
        let mut session = handle.session.lock().expect("session lock poisoned");
        Ok(session.assign_role(candidate_id, new_role, tick)?)
    }

    /// Exchange two selected candidates' roles
    pub fn swap_roles(
        &self,
        session_id: &str,
        first_id: &str,
        second_id: &str,
        tick: usize,
    ) -> Result<(), SessionError> {
        let handle = self.handle(session_id)?;
        let mut session = handle.session.lock().expect("session lock poisoned");
        Ok(session.swap_roles(first_id, second_id, tick)?)
    }

    /// Undo the most recent role edit; no-op on empty history
    pub fn undo_role_edit(&self, session_id: &str) -> Result<bool, SessionError> {
        let handle = self.handle(session_id)?;
        let mut session = handle.session.lock().expect("session lock poisoned");
        Ok(session.undo_role_edit()?.is_some())
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Current lifecycle state of a session
    pub fn session_state(&self, session_id: &str) -> Result<SessionState, SessionError> {
        let handle = self.handle(session_id)?;
        let session = handle.session.lock().expect("session lock poisoned");
        Ok(session.state())
    }

    /// Clone a session's full state (registry, events, assignments)
    pub fn session_snapshot(&self, session_id: &str) -> Result<Session, SessionError> {
        let handle = self.handle(session_id)?;
        let session = handle.session.lock().expect("session lock poisoned");
        Ok(session.clone())
    }

    /// Number of sessions this orchestrator owns
    pub fn num_sessions(&self) -> usize {
        let sessions = self.sessions.read().expect("session table lock poisoned");
        sessions.len()
    }

    fn handle(&self, session_id: &str) -> Result<Arc<SessionHandle>, SessionError> {
        let sessions = self.sessions.read().expect("session table lock poisoned");
        sessions
            .get(session_id)
            .cloned()
            .ok_or_else(|| SessionError::UnknownSession {
                session_id: session_id.to_string(),
            })
    }
}

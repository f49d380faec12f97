//! End-to-end orchestrator tests
//!
//! Drives whole sessions through the public API: fill, confirmation,
//! match start and finish, notification fan-out and cancellation racing a
//! confirmation pass in flight.

use scrim_coordinator_core_rs::{
    Candidate, CandidateDirectory, ConfirmationChannel, ConfirmationCoordinator,
    ConfirmationOutcome, ConfirmationReply, DispatchError, GameCatalog, SessionConfig,
    SessionEvent, SessionObserver, SessionOrchestrator, SessionState, StrategyConfig,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Observer that records every delivered (session_id, kind) pair
struct Recording {
    seen: Arc<Mutex<Vec<(String, String)>>>,
}

impl SessionObserver for Recording {
    fn notify(&self, session_id: &str, event: &SessionEvent) -> Result<(), DispatchError> {
        self.seen
            .lock()
            .unwrap()
            .push((session_id.to_string(), event.kind().to_string()));
        Ok(())
    }
}

/// Channel that always confirms immediately
struct AlwaysConfirm;

impl ConfirmationChannel for AlwaysConfirm {
    fn request_confirmation(&self, _candidate_id: &str, _session_id: &str) -> ConfirmationReply {
        ConfirmationReply::Confirmed
    }
}

/// Channel scripted to decline a single candidate
struct DeclineOne(&'static str);

impl ConfirmationChannel for DeclineOne {
    fn request_confirmation(&self, candidate_id: &str, _session_id: &str) -> ConfirmationReply {
        if candidate_id == self.0 {
            ConfirmationReply::Declined
        } else {
            ConfirmationReply::Confirmed
        }
    }
}

fn directory_with_squad() -> Arc<CandidateDirectory> {
    let directory = CandidateDirectory::new();
    for (id, rating, latency) in [
        ("p1", 1500, 30),
        ("p2", 1400, 45),
        ("p3", 1600, 25),
        ("p4", 1550, 60),
    ] {
        directory.insert(
            Candidate::new(id.to_string(), latency).with_rating("fps".to_string(), rating),
        );
    }
    Arc::new(directory)
}

fn squad_config() -> SessionConfig {
    SessionConfig {
        game_id: "fps".to_string(),
        format: Some("2v2".to_string()),
        min_rating: 1000,
        max_rating: 2000,
        max_latency_ms: 100,
        capacity: Some(4),
        strategy: StrategyConfig::SkillRating,
    }
}

#[test]
fn test_full_session_cycle() {
    let directory = directory_with_squad();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let mut orchestrator =
        SessionOrchestrator::new(Arc::clone(&directory), GameCatalog::with_defaults());
    orchestrator.register_observer(Box::new(Recording {
        seen: Arc::clone(&seen),
    }));

    let session_id = orchestrator.create_session(squad_config()).unwrap();
    for (id, role) in [("p1", "entry"), ("p2", "anchor"), ("p3", "entry"), ("p4", "anchor")] {
        orchestrator.apply(&session_id, id, role).unwrap();
    }

    let result = orchestrator.resolve_fill(&session_id, 1).unwrap();
    assert!(result.filled);
    assert_eq!(result.num_selected, 4);
    assert_eq!(result.num_waiting, 0);

    let coordinator = ConfirmationCoordinator::new(Box::new(AlwaysConfirm), 100);
    let outcome = orchestrator
        .run_confirmation(&session_id, &coordinator, 2)
        .unwrap();
    assert_eq!(outcome, ConfirmationOutcome::AllConfirmed);

    let plan = orchestrator.start(&session_id, 3).unwrap();
    assert_eq!(plan.side_a.len(), 2);
    assert_eq!(plan.side_b.len(), 2);
    // Sides partition the selection with nobody on both
    for id in &plan.side_a {
        assert!(!plan.side_b.contains(id));
    }

    orchestrator.finish(&session_id, 4).unwrap();
    assert_eq!(
        orchestrator.session_state(&session_id).unwrap(),
        SessionState::Finished
    );

    // Every participant's record reflects the completed match
    for id in ["p1", "p2", "p3", "p4"] {
        assert_eq!(directory.get(id).unwrap().completed_sessions(), 1);
    }

    // Observers saw the full notifiable sequence for this session
    let kinds: Vec<String> = seen.lock().unwrap().iter().map(|(_, k)| k.clone()).collect();
    assert_eq!(kinds, vec!["LobbyFull", "Confirmed", "InProgress", "Finished"]);
    assert!(seen.lock().unwrap().iter().all(|(sid, _)| sid == &session_id));
}

#[test]
fn test_confirmation_failure_is_not_notified() {
    let directory = directory_with_squad();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let mut orchestrator = SessionOrchestrator::new(directory, GameCatalog::with_defaults());
    orchestrator.register_observer(Box::new(Recording {
        seen: Arc::clone(&seen),
    }));

    let session_id = orchestrator.create_session(squad_config()).unwrap();
    for id in ["p1", "p2", "p3", "p4"] {
        orchestrator.apply(&session_id, id, "any").unwrap();
    }
    orchestrator.resolve_fill(&session_id, 1).unwrap();

    let coordinator = ConfirmationCoordinator::new(Box::new(DeclineOne("p2")), 100);
    let outcome = orchestrator
        .run_confirmation(&session_id, &coordinator, 2)
        .unwrap();
    assert_eq!(outcome, ConfirmationOutcome::Failed);

    // The failure is in the audit log but never left the core
    let session = orchestrator.session_snapshot(&session_id).unwrap();
    assert_eq!(session.events().events_of_kind("ConfirmationFailed").len(), 1);
    let kinds: Vec<String> = seen.lock().unwrap().iter().map(|(_, k)| k.clone()).collect();
    assert_eq!(kinds, vec!["LobbyFull"]);
}

#[test]
fn test_selection_strategy_filters_at_fill() {
    // p_out's rating is outside the window, so capacity is never reached
    let directory = CandidateDirectory::new();
    directory.insert(
        Candidate::new("p_in".to_string(), 30).with_rating("duel".to_string(), 1500),
    );
    directory.insert(
        Candidate::new("p_out".to_string(), 30).with_rating("duel".to_string(), 2500),
    );
    let orchestrator =
        SessionOrchestrator::new(Arc::new(directory), GameCatalog::with_defaults());

    let session_id = orchestrator
        .create_session(SessionConfig {
            game_id: "duel".to_string(),
            format: None,
            min_rating: 1000,
            max_rating: 2000,
            max_latency_ms: 100,
            capacity: None,
            strategy: StrategyConfig::SkillRating,
        })
        .unwrap();
    orchestrator.apply(&session_id, "p_in", "solo").unwrap();
    orchestrator.apply(&session_id, "p_out", "solo").unwrap();

    let result = orchestrator.resolve_fill(&session_id, 1).unwrap();
    assert!(!result.filled);
    assert_eq!(result.num_selected, 1);
    assert_eq!(
        orchestrator.session_state(&session_id).unwrap(),
        SessionState::Open
    );
}

/// Channel that parks on its first prompt until released, so a test can
/// cancel the session while the confirmation pass is mid-flight
struct Parking {
    prompted: Mutex<mpsc::Sender<()>>,
    release: Mutex<mpsc::Receiver<()>>,
    parked_once: AtomicBool,
}

impl ConfirmationChannel for Parking {
    fn request_confirmation(&self, _candidate_id: &str, _session_id: &str) -> ConfirmationReply {
        if !self.parked_once.swap(true, Ordering::SeqCst) {
            self.prompted.lock().unwrap().send(()).ok();
            let release = self.release.lock().unwrap();
            release
                .recv_timeout(Duration::from_secs(5))
                .expect("test release signal");
        }
        ConfirmationReply::Confirmed
    }
}

#[test]
fn test_cancel_during_confirmation_aborts_without_sanctions() {
    let directory = directory_with_squad();
    let orchestrator = Arc::new(SessionOrchestrator::new(
        Arc::clone(&directory),
        GameCatalog::with_defaults(),
    ));

    let session_id = orchestrator.create_session(squad_config()).unwrap();
    for id in ["p1", "p2", "p3", "p4"] {
        orchestrator.apply(&session_id, id, "any").unwrap();
    }
    orchestrator.resolve_fill(&session_id, 1).unwrap();

    let (prompted_tx, prompted_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel();
    let channel = Parking {
        prompted: Mutex::new(prompted_tx),
        release: Mutex::new(release_rx),
        parked_once: AtomicBool::new(false),
    };
    let coordinator = ConfirmationCoordinator::new(Box::new(channel), 100);

    let confirm_handle = {
        let orchestrator = Arc::clone(&orchestrator);
        let session_id = session_id.clone();
        thread::spawn(move || orchestrator.run_confirmation(&session_id, &coordinator, 2))
    };

    // Wait until the pass holds the session lock, parked on its first prompt
    prompted_rx
        .recv_timeout(Duration::from_secs(5))
        .expect("confirmation pass never prompted");

    // Cancel sets the flag immediately, then blocks on the session lock
    let cancel_handle = {
        let orchestrator = Arc::clone(&orchestrator);
        let session_id = session_id.clone();
        thread::spawn(move || orchestrator.cancel(&session_id, 3))
    };

    // Give the cancel thread time to set the flag, then let the pass resume
    thread::sleep(Duration::from_millis(50));
    release_tx.send(()).unwrap();

    let outcome = confirm_handle.join().unwrap().unwrap();
    assert_eq!(outcome, ConfirmationOutcome::Aborted);
    assert!(cancel_handle.join().unwrap().unwrap());

    assert_eq!(
        orchestrator.session_state(&session_id).unwrap(),
        SessionState::Cancelled
    );
    // An aborted pass sanctions nobody
    for id in ["p1", "p2", "p3", "p4"] {
        assert_eq!(directory.get(id).unwrap().strike_count(), 0);
    }
    let session = orchestrator.session_snapshot(&session_id).unwrap();
    assert_eq!(session.events().events_of_kind("Cancelled").len(), 1);
}

#[test]
fn test_sessions_are_independent() {
    let directory = directory_with_squad();
    let orchestrator = SessionOrchestrator::new(directory, GameCatalog::with_defaults());

    let first = orchestrator.create_session(squad_config()).unwrap();
    let second = orchestrator.create_session(squad_config()).unwrap();
    assert_ne!(first, second);
    assert_eq!(orchestrator.num_sessions(), 2);

    // The same candidate may sit in both lobbies
    orchestrator.apply(&first, "p1", "entry").unwrap();
    orchestrator.apply(&second, "p1", "anchor").unwrap();

    orchestrator.cancel(&first, 1).unwrap();
    assert_eq!(
        orchestrator.session_state(&first).unwrap(),
        SessionState::Cancelled
    );
    assert_eq!(
        orchestrator.session_state(&second).unwrap(),
        SessionState::Open
    );
}

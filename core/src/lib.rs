//! Scrim Coordinator Core - Rust Engine
//!
//! Session lifecycle engine for short-lived competitive-gaming scrims:
//! players apply, a session fills, participants confirm, a match is played
//! and a final outcome is recorded.
//!
//! # Architecture
//!
//! - **core**: Time management (discrete, deterministic ticks)
//! - **models**: Domain types (Candidate, Application, Session, events)
//! - **directory**: Shared candidate store with atomic sanction updates
//! - **registry**: Per-session application registry
//! - **selection**: Pure participant-selection strategies
//! - **lifecycle**: Session state machine (single auditable table)
//! - **confirmation**: All-or-nothing confirmation barrier + sanctions
//! - **commands**: Invertible role-edit history (undo stack)
//! - **notify**: Observer fan-out for lifecycle events
//! - **orchestrator**: End-to-end session flow
//!
//! # Critical Invariants
//!
//! 1. Session state changes only through the lifecycle transition table
//! 2. Selection strategies are pure: they never mutate session state
//! 3. All time arithmetic is on ticks (no wall clock, fully deterministic)

// Module declarations
pub mod commands;
pub mod confirmation;
pub mod core;
pub mod directory;
pub mod lifecycle;
pub mod models;
pub mod notify;
pub mod orchestrator;
pub mod registry;
pub mod selection;

// Re-exports for convenience
pub use commands::{CommandError, RoleCommand, RoleCommandStack};
pub use confirmation::{
    ConfirmationChannel, ConfirmationCoordinator, ConfirmationDecision, ConfirmationOutcome,
    ConfirmationReply, ConfirmationReport, MpscConfirmationChannel,
};
pub use crate::core::time::TimeManager;
pub use directory::{CandidateDirectory, DirectoryError, StrikeOutcome};
pub use lifecycle::{transition, SessionState, TransitionError, TransitionTrigger};
pub use models::{
    application::{Application, ApplicationStatus},
    candidate::Candidate,
    event::{EventLog, SessionEvent},
    session::{ConstraintError, Session, SessionConstraints, SessionOperationError},
};
pub use notify::{DispatchError, NotificationDispatcher, SessionObserver};
pub use orchestrator::{
    FillResult, GameCatalog, GameFormat, MatchPlan, SessionConfig, SessionError,
    SessionOrchestrator,
};
pub use registry::{ParticipantRegistry, RegistryError};
pub use selection::{
    build_strategy, ByHistory, ByLatency, BySkillRating, SelectionStrategy, StrategyConfig,
};

//! Session orchestration
//!
//! Composes the registry, selection engine, lifecycle machine,
//! confirmation workflow and notification fan-out into the end-to-end
//! session flow.

mod catalog;
mod engine;

pub use catalog::{GameCatalog, GameFormat};
pub use engine::{FillResult, MatchPlan, SessionConfig, SessionError, SessionOrchestrator};

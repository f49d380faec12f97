//! Domain types (Candidate, Application, Session, events)

pub mod application;
pub mod candidate;
pub mod event;
pub mod session;

pub use application::{Application, ApplicationStatus};
pub use candidate::Candidate;
pub use event::{EventLog, SessionEvent};
pub use session::{ConstraintError, Session, SessionConstraints, SessionOperationError};

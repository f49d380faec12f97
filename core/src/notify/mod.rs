//! Notification fan-out
//!
//! Lifecycle events are delivered synchronously to registered observers
//! after a transition has committed. Delivery is fire-and-forget from the
//! core's perspective: a failing observer is logged and skipped, and never
//! blocks or fails a state transition.

use crate::models::event::SessionEvent;
use thiserror::Error;

/// Errors an observer may report from a delivery attempt
///
/// Logged and swallowed by the dispatcher; never propagates into the
/// state machine.
#[derive(Debug, Error, PartialEq)]
pub enum DispatchError {
    #[error("Delivery channel unavailable: {0}")]
    ChannelUnavailable(String),

    #[error("Delivery rejected: {0}")]
    Rejected(String),
}

/// A lifecycle-event consumer (console notifier, push gateway, ...)
///
/// Observers subscribe through [`NotificationDispatcher::register`]; the
/// core depends only on this interface, never on concrete channels.
pub trait SessionObserver: Send + Sync {
    /// Deliver one event for one session
    fn notify(&self, session_id: &str, event: &SessionEvent) -> Result<(), DispatchError>;
}

/// Synchronous fan-out to all registered observers
///
/// # Example
/// ```
/// use scrim_coordinator_core_rs::notify::{NotificationDispatcher, SessionObserver, DispatchError};
/// use scrim_coordinator_core_rs::models::SessionEvent;
///
/// struct Stdout;
/// impl SessionObserver for Stdout {
///     fn notify(&self, session_id: &str, event: &SessionEvent) -> Result<(), DispatchError> {
///         println!("{}: {}", session_id, event.kind());
///         Ok(())
///     }
/// }
///
/// let mut dispatcher = NotificationDispatcher::new();
/// dispatcher.register(Box::new(Stdout));
/// dispatcher.dispatch("session_1", &SessionEvent::Confirmed { tick: 5 });
/// ```
#[derive(Default)]
pub struct NotificationDispatcher {
    observers: Vec<Box<dyn SessionObserver>>,
}

impl NotificationDispatcher {
    /// Create a dispatcher with no observers
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    /// Subscribe an observer
    pub fn register(&mut self, observer: Box<dyn SessionObserver>) {
        self.observers.push(observer);
    }

    /// Number of registered observers
    pub fn num_observers(&self) -> usize {
        self.observers.len()
    }

    /// Deliver an event to every observer
    ///
    /// Only notifiable event kinds leave the core (`ConfirmationFailed`
    /// stays in the audit log). Failures are logged and swallowed.
    pub fn dispatch(&self, session_id: &str, event: &SessionEvent) {
        if !event.is_notifiable() {
            return;
        }

        for observer in &self.observers {
            if let Err(err) = observer.notify(session_id, event) {
                log::warn!(
                    "notification delivery failed for session {} ({}): {}",
                    session_id,
                    event.kind(),
                    err
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Counting {
        delivered: Arc<AtomicUsize>,
    }

    impl SessionObserver for Counting {
        fn notify(&self, _session_id: &str, _event: &SessionEvent) -> Result<(), DispatchError> {
            self.delivered.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct AlwaysFailing;

    impl SessionObserver for AlwaysFailing {
        fn notify(&self, _session_id: &str, _event: &SessionEvent) -> Result<(), DispatchError> {
            Err(DispatchError::ChannelUnavailable("down".to_string()))
        }
    }

    #[test]
    fn test_failure_does_not_stop_fanout() {
        let delivered = Arc::new(AtomicUsize::new(0));
        let mut dispatcher = NotificationDispatcher::new();
        dispatcher.register(Box::new(AlwaysFailing));
        dispatcher.register(Box::new(Counting {
            delivered: Arc::clone(&delivered),
        }));

        dispatcher.dispatch("s1", &SessionEvent::Confirmed { tick: 1 });
        assert_eq!(delivered.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_confirmation_failed_not_dispatched() {
        let delivered = Arc::new(AtomicUsize::new(0));
        let mut dispatcher = NotificationDispatcher::new();
        dispatcher.register(Box::new(Counting {
            delivered: Arc::clone(&delivered),
        }));

        dispatcher.dispatch(
            "s1",
            &SessionEvent::ConfirmationFailed {
                tick: 1,
                declined: vec![],
            },
        );
        assert_eq!(delivered.load(Ordering::SeqCst), 0);
    }
}

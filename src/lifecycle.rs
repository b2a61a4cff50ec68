//! Host lifecycle events.
//!
//! The manager must tear its session down when the host application stops.
//! [`HostEvents`] is the host-side event source; [`StopSignal`] is a
//! cloneable subscription the manager awaits. The stop event is delivered at
//! most once; dropping the event source counts as a stop so subscribers never
//! hang on a vanished host.
//!
//! # Example
//!
//! ```ignore
//! let events = HostEvents::new();
//! let signal = events.stop_signal();
//!
//! tokio::spawn(async move {
//!     signal.stopped().await;
//!     // tear down
//! });
//!
//! events.notify_stopped();
//! ```

// ============================================================================
// Imports
// ============================================================================

use tokio::sync::watch;
use tracing::debug;

// ============================================================================
// HostEvents
// ============================================================================

/// Host-side source of the "host stopping" notification.
///
/// Owned by the embedding application; managers subscribe through
/// [`HostEvents::stop_signal`].
#[derive(Debug)]
pub struct HostEvents {
    /// Stop flag broadcast to all subscribers.
    tx: watch::Sender<bool>,
}

impl HostEvents {
    /// Creates a new event source in the running state.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    /// Returns a subscription to the stop event.
    #[must_use]
    pub fn stop_signal(&self) -> StopSignal {
        StopSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Fires the stop event.
    ///
    /// Delivery is at-most-once: repeated calls after the first are no-ops.
    pub fn notify_stopped(&self) {
        let fired = self.tx.send_if_modified(|stopped| {
            if *stopped {
                false
            } else {
                *stopped = true;
                true
            }
        });

        if fired {
            debug!("Host stop event fired");
        }
    }

    /// Returns `true` if the stop event has fired.
    #[inline]
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for HostEvents {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// StopSignal
// ============================================================================

/// A subscription to the host stop event.
///
/// Cheap to clone; every clone observes the same single delivery.
#[derive(Debug, Clone)]
pub struct StopSignal {
    /// Receiving end of the stop flag.
    rx: watch::Receiver<bool>,
}

impl StopSignal {
    /// Resolves once the host signals stop.
    ///
    /// Also resolves if the [`HostEvents`] source is dropped, so a watcher
    /// task never outlives its host.
    pub async fn stopped(mut self) {
        if *self.rx.borrow_and_update() {
            return;
        }
        while self.rx.changed().await.is_ok() {
            if *self.rx.borrow_and_update() {
                return;
            }
        }
        // Source dropped without firing; treat as stopped.
    }

    /// Returns `true` if the stop event has already fired.
    #[inline]
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        *self.rx.borrow()
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Serialized access to the managed driver session.
//!
//! [`AccessManager`] owns one non-reentrant binary lock over the session and
//! two FIFO wait queues. [`acquire`](AccessManager::acquire) never blocks:
//! it either grants immediately or queues the operation, in-page
//! continuations in the priority queue and standalone loads in the normal
//! queue. When the holder releases, an external completion signal drives
//! [`acquire_next`](AccessManager::acquire_next), which drains the priority
//! queue first.
//!
//! A single mutex guards the lock flag and both queues, so try-acquire,
//! append, and pop-or-empty are atomic with respect to each other even when
//! producers and the completion driver run on different threads.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::collections::VecDeque;

use parking_lot::Mutex;
use tracing::{debug, error, info};
use url::Url;

use crate::driver::{DriverRegistry, DriverSession};
use crate::error::{Error, Result};
use crate::lifecycle::StopSignal;
use crate::settings::{BrowserSelector, Settings};

use super::handle::ResourceHandle;
use super::operation::{Operation, OperationKind};

// ============================================================================
// Types
// ============================================================================

/// Lock flag and wait queues, guarded together.
#[derive(Default)]
struct WaitState {
    /// Whether an operation currently holds the lock.
    held: bool,

    /// Priority queue for in-page continuations.
    inpage: VecDeque<Operation>,

    /// Normal queue for standalone page loads.
    standalone: VecDeque<Operation>,
}

/// Internal shared state for the manager.
struct ManagerInner {
    /// The lazily constructed session handle.
    handle: ResourceHandle,

    /// Lock flag plus both wait queues.
    wait: Mutex<WaitState>,

    /// Subscription to the host stop event.
    stop: StopSignal,

    /// Whether the stop watcher has been spawned.
    hooked: AtomicBool,
}

// ============================================================================
// AcquireOutcome
// ============================================================================

/// Result of a non-blocking acquire attempt.
#[derive(Debug)]
pub enum AcquireOutcome {
    /// The lock was free; the operation now holds it.
    Granted(Operation),
    /// The lock was contested; the operation joined its wait queue.
    Queued,
}

impl AcquireOutcome {
    /// Returns `true` if the operation was granted access.
    #[inline]
    #[must_use]
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted(_))
    }

    /// Returns `true` if the operation was queued.
    #[inline]
    #[must_use]
    pub fn is_queued(&self) -> bool {
        matches!(self, Self::Queued)
    }

    /// Consumes the outcome, returning the granted operation if any.
    #[inline]
    #[must_use]
    pub fn into_granted(self) -> Option<Operation> {
        match self {
            Self::Granted(op) => Some(op),
            Self::Queued => None,
        }
    }
}

// ============================================================================
// AccessManager
// ============================================================================

/// Serializes concurrent access to the single managed session.
///
/// Cheap to clone; all clones share the same lock, queues, and session.
///
/// # Example
///
/// ```ignore
/// let manager = AccessManager::new(settings, &registry, events.stop_signal())?;
///
/// match manager.acquire(Operation::standalone(url))? {
///     AcquireOutcome::Granted(op) => {
///         op.manager().unwrap().navigate(op_url).await;
///         manager.release()?;
///     }
///     AcquireOutcome::Queued => { /* retried via acquire_next later */ }
/// }
/// ```
#[derive(Clone)]
pub struct AccessManager {
    /// Shared inner state.
    inner: Arc<ManagerInner>,
}

impl fmt::Debug for AccessManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.wait.lock();
        f.debug_struct("AccessManager")
            .field("held", &state.held)
            .field("inpage_queued", &state.inpage.len())
            .field("standalone_queued", &state.standalone.len())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// AccessManager - Construction
// ============================================================================

impl AccessManager {
    /// Creates a manager from settings.
    ///
    /// Resolves the browser selector against the registry; no session is
    /// constructed here.
    ///
    /// # Errors
    ///
    /// - [`Error::Configuration`] if no browser selector is set
    /// - [`Error::UnknownBrowser`] if the name is not registered
    pub fn new(settings: Settings, registry: &DriverRegistry, stop: StopSignal) -> Result<Self> {
        let handle = match settings.browser {
            Some(BrowserSelector::Instance(ref session)) => {
                ResourceHandle::from_instance(Arc::clone(session), settings.timeout)
            }
            Some(BrowserSelector::Named(ref name)) => {
                let factory = registry
                    .get(name)
                    .ok_or_else(|| Error::unknown_browser(name.clone()))?;
                ResourceHandle::from_factory(factory, settings.session_config(), settings.timeout)
            }
            None => {
                return Err(Error::configuration(
                    "no browser selector configured; manager should not be active",
                ));
            }
        };

        Ok(Self {
            inner: Arc::new(ManagerInner {
                handle,
                wait: Mutex::new(WaitState::default()),
                stop,
                hooked: AtomicBool::new(false),
            }),
        })
    }

    /// Returns whether the settings name a constructible browser.
    ///
    /// Used by the request layer to decide whether this manager should be
    /// active at all, before any operation is created. Never constructs a
    /// session.
    #[must_use]
    pub fn is_configured(settings: &Settings, registry: &DriverRegistry) -> bool {
        match settings.browser {
            Some(BrowserSelector::Named(ref name)) => registry.contains(name),
            Some(BrowserSelector::Instance(_)) => true,
            None => false,
        }
    }
}

// ============================================================================
// AccessManager - Acquire / Release
// ============================================================================

impl AccessManager {
    /// Attempts a non-blocking lock acquisition for an operation.
    ///
    /// On success the manager is bound onto the operation and it is returned
    /// as [`AcquireOutcome::Granted`]; the caller is now the holder and may
    /// drive navigation. On contest the operation joins the queue matching
    /// its classification and [`AcquireOutcome::Queued`] is returned.
    ///
    /// Never blocks or suspends the caller.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ContractViolation`] if the operation is already
    /// bound to a manager. This is a programming error, distinct from
    /// queueing, and leaves manager state untouched.
    pub fn acquire(&self, mut op: Operation) -> Result<AcquireOutcome> {
        if op.is_bound() {
            return Err(Error::contract_violation(
                "only an unbound operation may acquire the session",
            ));
        }

        let mut state = self.inner.wait.lock();

        if state.held {
            debug!(id = %op.id(), kind = ?op.kind(), "Session lock contested, queueing");
            match op.kind() {
                OperationKind::InPage => state.inpage.push_back(op),
                OperationKind::Standalone => state.standalone.push_back(op),
            }
            return Ok(AcquireOutcome::Queued);
        }

        state.held = true;
        drop(state);

        debug!(id = %op.id(), "Session lock granted");
        op.bind(self.clone());
        Ok(AcquireOutcome::Granted(op))
    }

    /// Pops and re-acquires the next waiting operation, if any.
    ///
    /// In-page continuations are returned first; within one classification,
    /// grants happen in enqueue order. The popped operation competes for the
    /// lock exactly like a fresh request, so if the lock is unexpectedly
    /// still held it is re-queued at the back of its queue and `None` is
    /// returned. Correct external sequencing (release before the next pop)
    /// never hits that path, but it must not deadlock when it happens.
    ///
    /// # Errors
    ///
    /// Propagates contract violations from the inner acquire; popped
    /// operations are always unbound, so none occur in practice.
    pub fn acquire_next(&self) -> Result<Option<Operation>> {
        let op = {
            let mut state = self.inner.wait.lock();
            state
                .inpage
                .pop_front()
                .or_else(|| state.standalone.pop_front())
        };

        match op {
            None => Ok(None),
            Some(op) => Ok(self.acquire(op)?.into_granted()),
        }
    }

    /// Unconditionally releases the session lock.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ContractViolation`] when called without holding the
    /// lock. Lock state is never corrupted.
    pub fn release(&self) -> Result<()> {
        let mut state = self.inner.wait.lock();

        if !state.held {
            return Err(Error::contract_violation(
                "release called without holding the session lock",
            ));
        }

        state.held = false;
        debug!("Session lock released");
        Ok(())
    }
}

// ============================================================================
// AccessManager - Introspection
// ============================================================================

impl AccessManager {
    /// Returns `true` if an operation currently holds the lock.
    #[inline]
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.inner.wait.lock().held
    }

    /// Returns the number of queued operations across both queues.
    #[inline]
    #[must_use]
    pub fn queued_count(&self) -> usize {
        let state = self.inner.wait.lock();
        state.inpage.len() + state.standalone.len()
    }

    /// Returns `true` once the session has been constructed.
    #[inline]
    #[must_use]
    pub fn is_session_initialized(&self) -> bool {
        self.inner.handle.is_initialized()
    }
}

// ============================================================================
// AccessManager - Session Access
// ============================================================================

impl AccessManager {
    /// Navigates the managed session to a URL.
    ///
    /// Only the current lock holder may call this. Failures from the
    /// underlying driver are logged and swallowed; see
    /// [`ResourceHandle::navigate`].
    pub async fn navigate(&self, url: &Url) {
        self.register_stop_hook();
        self.inner.handle.navigate(url).await;
    }

    /// Returns the managed session, constructing it on first call.
    ///
    /// The granted holder uses this to drive in-page continuations (script
    /// execution) directly.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Session`] if the session fails to construct.
    pub async fn session(&self) -> Result<Arc<dyn DriverSession>> {
        self.register_stop_hook();
        self.inner.handle.get_or_create().await
    }

    /// Spawns the host-stop watcher, once.
    ///
    /// Registered on first session access so an idle manager subscribes to
    /// nothing. The watcher calls [`shutdown`](Self::shutdown) when the host
    /// signals stop.
    fn register_stop_hook(&self) {
        if self.inner.hooked.swap(true, Ordering::SeqCst) {
            return;
        }

        let manager = self.clone();
        let signal = self.inner.stop.clone();
        tokio::spawn(async move {
            signal.stopped().await;
            info!("Host stopping, shutting down managed session");
            if let Err(e) = manager.shutdown().await {
                error!(error = %e, "Shutdown after host stop failed");
            }
        });
    }
}

// ============================================================================
// AccessManager - Shutdown
// ============================================================================

impl AccessManager {
    /// Tears the session down and verifies both wait queues are empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShutdownLeak`] when operations remain queued: they
    /// will never complete, which indicates a leak in external sequencing.
    /// The check runs even when no session was ever constructed.
    pub async fn shutdown(&self) -> Result<()> {
        self.inner.handle.teardown().await;

        let state = self.inner.wait.lock();
        let first = state.inpage.front().or_else(|| state.standalone.front());

        match first {
            None => Ok(()),
            Some(op) => {
                let leak = Error::shutdown_leak(state.inpage.len(), state.standalone.len(), op.id());
                error!(error = %leak, "Wait queues not empty at shutdown");
                Err(leak)
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

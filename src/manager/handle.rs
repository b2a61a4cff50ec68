//! Lazily constructed driver session handle.
//!
//! [`ResourceHandle`] owns the lifecycle of the single session instance and
//! mediates navigation through it. The session is constructed on first use,
//! not at manager construction, so settings that are never exercised never
//! pay the browser startup cost.
//!
//! Navigation failures are non-fatal: whatever the underlying driver raises
//! is logged with the URL and cause, and the call returns normally. The
//! caller proceeds with whatever page state resulted.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, error, warn};
use url::Url;

use crate::driver::{DriverFactory, DriverSession};
use crate::error::{Error, Result};
use crate::settings::SessionConfig;

// ============================================================================
// ResourceHandle
// ============================================================================

/// Owns the single driver session and mediates navigation through it.
///
/// Construction sources: a factory plus merged config (named-browser path,
/// lazy), or a pre-built session supplied by the caller (slot filled at
/// construction).
pub struct ResourceHandle {
    /// Factory for lazy construction; `None` when a pre-built session was
    /// supplied.
    factory: Option<Arc<dyn DriverFactory>>,

    /// Merged configuration passed to the factory on first construction.
    config: SessionConfig,

    /// Navigation timeout; zero disables timeout enforcement.
    timeout: Duration,

    /// The session slot. Held across the factory await, so an async mutex.
    session: Mutex<Option<Arc<dyn DriverSession>>>,

    /// Set once the slot is occupied; cheap laziness check for callers that
    /// must not construct.
    initialized: AtomicBool,
}

// ============================================================================
// ResourceHandle - Constructors
// ============================================================================

impl ResourceHandle {
    /// Creates a handle that constructs its session lazily from a factory.
    pub(crate) fn from_factory(
        factory: Arc<dyn DriverFactory>,
        config: SessionConfig,
        timeout: Duration,
    ) -> Self {
        Self {
            factory: Some(factory),
            config,
            timeout,
            session: Mutex::new(None),
            initialized: AtomicBool::new(false),
        }
    }

    /// Creates a handle around a pre-built session.
    pub(crate) fn from_instance(session: Arc<dyn DriverSession>, timeout: Duration) -> Self {
        Self {
            factory: None,
            config: SessionConfig::default(),
            timeout,
            session: Mutex::new(Some(session)),
            initialized: AtomicBool::new(true),
        }
    }
}

// ============================================================================
// ResourceHandle - Session Access
// ============================================================================

impl ResourceHandle {
    /// Returns the session, constructing it on first call.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Session`] if the factory fails to launch the
    /// browser, or [`Error::Configuration`] if the handle was torn down and
    /// has no factory to rebuild from.
    pub async fn get_or_create(&self) -> Result<Arc<dyn DriverSession>> {
        let mut slot = self.session.lock().await;
        if let Some(session) = slot.as_ref() {
            return Ok(Arc::clone(session));
        }

        let factory = self
            .factory
            .as_ref()
            .ok_or_else(|| Error::configuration("no driver factory to construct a session"))?;

        debug!("Constructing driver session");
        let session = factory.create(&self.config).await?;
        *slot = Some(Arc::clone(&session));
        self.initialized.store(true, Ordering::SeqCst);

        Ok(session)
    }

    /// Returns `true` once a session occupies the slot.
    ///
    /// Pre-built instances count from construction.
    #[inline]
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Returns the configured navigation timeout.
    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

// ============================================================================
// ResourceHandle - Navigation
// ============================================================================

impl ResourceHandle {
    /// Navigates the managed session to a URL.
    ///
    /// When a timeout is configured, page-load, script, and implicit-wait
    /// timeouts are all set to that value before navigating. Any failure
    /// from the underlying session is caught and logged; the call returns
    /// normally and the caller receives whatever page state resulted.
    pub async fn navigate(&self, url: &Url) {
        debug!(url = %url, "Navigating via managed session");

        if let Err(e) = self.try_navigate(url).await {
            error!(url = %url, error = %e, "Unable to navigate");
        }
    }

    async fn try_navigate(&self, url: &Url) -> Result<()> {
        let session = self.get_or_create().await?;

        if !self.timeout.is_zero() {
            session.set_page_load_timeout(self.timeout).await?;
            session.set_script_timeout(self.timeout).await?;
            session.set_implicit_wait(self.timeout).await?;
        }

        session.navigate(url).await
    }
}

// ============================================================================
// ResourceHandle - Teardown
// ============================================================================

impl ResourceHandle {
    /// Quits the session if one exists.
    ///
    /// Idempotent: tolerates being called when no session was ever created,
    /// and repeated calls after the first are no-ops. Quit failures are
    /// logged, not propagated.
    pub async fn teardown(&self) {
        let session = self.session.lock().await.take();

        if let Some(session) = session {
            debug!("Tearing down driver session");
            if let Err(e) = session.quit().await {
                warn!(error = %e, "Driver session quit failed");
            }
        }
    }
}

impl std::fmt::Debug for ResourceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceHandle")
            .field("initialized", &self.is_initialized())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================

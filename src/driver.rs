//! Driver session seam and browser registry.
//!
//! The manager never talks to a concrete browser directly. It drives a
//! [`DriverSession`] trait object constructed through a [`DriverFactory`]
//! resolved by name from a [`DriverRegistry`].
//!
//! Browser resolution is an explicit mapping from recognized names to
//! factories, validated at configuration time. An unrecognized name is a
//! configuration error before any operation exists, never a failure at
//! first use.
//!
//! # Example
//!
//! ```ignore
//! let mut registry = DriverRegistry::new();
//! registry.register("firefox", Arc::new(FirefoxFactory::new()));
//!
//! assert!(registry.contains("firefox"));
//! assert!(!registry.contains("netscape"));
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use serde_json::Value;
use url::Url;

use crate::error::Result;
use crate::settings::SessionConfig;

// ============================================================================
// DriverSession
// ============================================================================

/// A live browser-automation session.
///
/// Exactly one session instance exists per manager; only the current lock
/// holder may drive it. Implementations wrap a real driver's navigation and
/// timeout API, which this crate treats as a black box.
#[async_trait]
pub trait DriverSession: Send + Sync {
    /// Navigates the session to the given URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Session`](crate::Error::Session) on timeout, crash,
    /// or network failure.
    async fn navigate(&self, url: &Url) -> Result<()>;

    /// Sets the page-load timeout.
    async fn set_page_load_timeout(&self, timeout: Duration) -> Result<()>;

    /// Sets the script-execution timeout.
    async fn set_script_timeout(&self, timeout: Duration) -> Result<()>;

    /// Sets the implicit element-wait timeout.
    async fn set_implicit_wait(&self, timeout: Duration) -> Result<()>;

    /// Executes a script in the currently loaded page.
    ///
    /// Used by in-page continuation operations after a grant.
    async fn execute_script(&self, script: &str) -> Result<Value>;

    /// Quits the session and releases the underlying browser.
    async fn quit(&self) -> Result<()>;
}

// ============================================================================
// DriverFactory
// ============================================================================

/// Constructs a [`DriverSession`] from a merged session configuration.
///
/// Factories are registered under a browser name in a [`DriverRegistry`];
/// construction is deferred until the manager first needs the session.
#[async_trait]
pub trait DriverFactory: Send + Sync {
    /// Creates a new driver session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Session`](crate::Error::Session) if the browser
    /// fails to launch.
    async fn create(&self, config: &SessionConfig) -> Result<Arc<dyn DriverSession>>;
}

// ============================================================================
// DriverRegistry
// ============================================================================

/// Explicit mapping from recognized browser names to driver factories.
///
/// Lookup is case-sensitive. A name absent from the registry makes the
/// corresponding settings unusable, which
/// [`AccessManager::is_configured`](crate::AccessManager::is_configured)
/// reports without constructing anything.
#[derive(Default)]
pub struct DriverRegistry {
    /// Registered factories by browser name.
    factories: FxHashMap<String, Arc<dyn DriverFactory>>,
}

impl DriverRegistry {
    /// Creates an empty registry.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory under a browser name.
    ///
    /// Replaces any factory previously registered under the same name.
    pub fn register(&mut self, name: impl Into<String>, factory: Arc<dyn DriverFactory>) {
        self.factories.insert(name.into(), factory);
    }

    /// Returns `true` if a factory is registered under the given name.
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Returns the factory registered under the given name, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn DriverFactory>> {
        self.factories.get(name).map(Arc::clone)
    }

    /// Returns the number of registered factories.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns `true` if no factories are registered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Returns an iterator over registered browser names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for DriverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriverRegistry")
            .field("names", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

// ============================================================================
// Test Mocks
// ============================================================================

#[cfg(test)]
pub(crate) mod mock {
    //! Recording mocks shared by the handle and manager tests.

    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::Value;
    use url::Url;

    use crate::error::{Error, Result};
    use crate::settings::SessionConfig;

    use super::{DriverFactory, DriverSession};

    /// Mock session recording every call it receives.
    #[derive(Default)]
    pub(crate) struct MockSession {
        /// URLs passed to `navigate`, in call order.
        pub navigations: Mutex<Vec<Url>>,
        /// Timeouts applied, as (phase, value) pairs in call order.
        pub timeouts: Mutex<Vec<(&'static str, Duration)>>,
        /// Number of `quit` calls.
        pub quit_calls: AtomicUsize,
        /// When set, `navigate` fails with a session error.
        pub fail_navigation: AtomicBool,
    }

    impl MockSession {
        pub(crate) fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        pub(crate) fn navigation_count(&self) -> usize {
            self.navigations.lock().len()
        }
    }

    #[async_trait]
    impl DriverSession for MockSession {
        async fn navigate(&self, url: &Url) -> Result<()> {
            if self.fail_navigation.load(Ordering::SeqCst) {
                return Err(Error::session(format!("navigation to {url} timed out")));
            }
            self.navigations.lock().push(url.clone());
            Ok(())
        }

        async fn set_page_load_timeout(&self, timeout: Duration) -> Result<()> {
            self.timeouts.lock().push(("page_load", timeout));
            Ok(())
        }

        async fn set_script_timeout(&self, timeout: Duration) -> Result<()> {
            self.timeouts.lock().push(("script", timeout));
            Ok(())
        }

        async fn set_implicit_wait(&self, timeout: Duration) -> Result<()> {
            self.timeouts.lock().push(("implicit_wait", timeout));
            Ok(())
        }

        async fn execute_script(&self, _script: &str) -> Result<Value> {
            Ok(Value::Null)
        }

        async fn quit(&self) -> Result<()> {
            self.quit_calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    /// Mock factory handing out a fixed session and counting creations.
    pub(crate) struct MockFactory {
        /// The session every `create` call returns.
        pub session: Arc<MockSession>,
        /// Number of `create` calls.
        pub created: AtomicUsize,
        /// Config captured from the most recent `create` call.
        pub last_config: Mutex<Option<SessionConfig>>,
    }

    impl MockFactory {
        pub(crate) fn new(session: Arc<MockSession>) -> Arc<Self> {
            Arc::new(Self {
                session,
                created: AtomicUsize::new(0),
                last_config: Mutex::new(None),
            })
        }

        pub(crate) fn create_count(&self) -> usize {
            self.created.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DriverFactory for MockFactory {
        async fn create(&self, config: &SessionConfig) -> Result<Arc<dyn DriverSession>> {
            self.created.fetch_add(1, Ordering::SeqCst);
            *self.last_config.lock() = Some(config.clone());
            Ok(Arc::clone(&self.session) as Arc<dyn DriverSession>)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

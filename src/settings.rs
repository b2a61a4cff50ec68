//! Manager settings and session configuration.
//!
//! [`Settings`] is the read-only input to manager construction: which browser
//! to drive, the driver option bag, an optional user-agent override, and the
//! per-call navigation timeout. [`SessionConfig`] is the merged configuration
//! handed to a [`DriverFactory`](crate::DriverFactory) when the session is
//! first constructed.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use webdriver_access::Settings;
//!
//! let settings = Settings::new()
//!     .with_browser("firefox")
//!     .with_user_agent("Mozilla/5.0 ...")
//!     .with_timeout(Duration::from_secs(5));
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::driver::DriverSession;

// ============================================================================
// Constants
// ============================================================================

/// Capability key used for the user-agent override.
pub const USER_AGENT_KEY: &str = "page.settings.userAgent";

// ============================================================================
// BrowserSelector
// ============================================================================

/// Selects which browser the manager drives.
///
/// Either a name resolved through a
/// [`DriverRegistry`](crate::DriverRegistry), or a pre-built session supplied
/// directly by the caller.
#[derive(Clone)]
pub enum BrowserSelector {
    /// A browser name to resolve against the registry.
    Named(String),
    /// A pre-built session instance; no lazy construction happens.
    Instance(Arc<dyn DriverSession>),
}

impl fmt::Debug for BrowserSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Self::Instance(_) => f.write_str("Instance(..)"),
        }
    }
}

// ============================================================================
// Settings
// ============================================================================

/// Read-only configuration for an access manager.
///
/// Read once at manager construction. Settings are usable only if the
/// browser selector resolves to a constructible driver, which
/// [`AccessManager::is_configured`](crate::AccessManager::is_configured)
/// checks without constructing anything.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    /// Browser selector; `None` means this manager should not be active.
    pub browser: Option<BrowserSelector>,

    /// Driver option bag, passed through to the factory untouched.
    pub options: Map<String, Value>,

    /// User-agent override merged into the desired capabilities.
    pub user_agent: Option<String>,

    /// Navigation timeout applied to page-load, script, and implicit-wait
    /// phases. [`Duration::ZERO`] disables timeout enforcement.
    pub timeout: Duration,
}

// ============================================================================
// Settings - Builder Methods
// ============================================================================

impl Settings {
    /// Creates empty settings.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects a browser by registry name.
    #[inline]
    #[must_use]
    pub fn with_browser(mut self, name: impl Into<String>) -> Self {
        self.browser = Some(BrowserSelector::Named(name.into()));
        self
    }

    /// Supplies a pre-built session instead of a name.
    #[inline]
    #[must_use]
    pub fn with_browser_instance(mut self, session: Arc<dyn DriverSession>) -> Self {
        self.browser = Some(BrowserSelector::Instance(session));
        self
    }

    /// Adds an entry to the driver option bag.
    #[inline]
    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Sets the user-agent override.
    #[inline]
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Sets the navigation timeout.
    #[inline]
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// ============================================================================
// Settings - Conversion
// ============================================================================

impl Settings {
    /// Builds the merged session configuration for the driver factory.
    ///
    /// The desired-capabilities map carries the user-agent entry only when a
    /// user-agent was configured; otherwise it is absent entirely, never an
    /// empty map.
    #[must_use]
    pub fn session_config(&self) -> SessionConfig {
        let desired_capabilities = self.user_agent.as_ref().map(|user_agent| {
            let mut capabilities = Map::new();
            capabilities.insert(USER_AGENT_KEY.to_string(), Value::String(user_agent.clone()));
            capabilities
        });

        SessionConfig {
            options: self.options.clone(),
            desired_capabilities,
        }
    }
}

// ============================================================================
// SessionConfig
// ============================================================================

/// Merged configuration passed to a driver factory at session construction.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct SessionConfig {
    /// Caller-supplied driver options.
    pub options: Map<String, Value>,

    /// Desired capabilities; absent when no user-agent was configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desired_capabilities: Option<Map<String, Value>>,
}

// ============================================================================
// Tests
// ============================================================================

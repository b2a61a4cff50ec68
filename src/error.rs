//! Error types for the access manager.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use webdriver_access::{Result, AccessManager, Operation};
//!
//! fn example(manager: &AccessManager, op: Operation) -> Result<()> {
//!     let outcome = manager.acquire(op)?;
//!     // granted or queued
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::Configuration`], [`Error::UnknownBrowser`] |
//! | Contract | [`Error::ContractViolation`] |
//! | Session | [`Error::Session`] |
//! | Lifecycle | [`Error::ShutdownLeak`] |

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;

use thiserror::Error;
use uuid::Uuid;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Configuration and session failures are ordinary runtime conditions;
/// contract violations and shutdown leaks indicate bugs in the caller or
/// in external sequencing and are propagated as hard failures.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned when manager settings are invalid or incomplete.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error.
        message: String,
    },

    /// Browser selector does not resolve to a registered driver factory.
    ///
    /// Surfaced at construction time so the caller can fall back to a
    /// non-managed path instead of failing at first use.
    #[error("Unknown browser: {name}")]
    UnknownBrowser {
        /// The unrecognized browser name.
        name: String,
    },

    // ========================================================================
    // Contract Errors
    // ========================================================================
    /// Caller violated the acquire/release contract.
    ///
    /// Returned when an already-granted operation is passed to `acquire`,
    /// or when `release` is called without holding the lock. Manager state
    /// is left untouched.
    #[error("Contract violation: {message}")]
    ContractViolation {
        /// Description of the violated contract.
        message: String,
    },

    // ========================================================================
    // Session Errors
    // ========================================================================
    /// Underlying driver session failure.
    ///
    /// Raised by driver factories and session calls (launch failure,
    /// navigation timeout, crash, network error).
    #[error("Session error: {message}")]
    Session {
        /// Description of the session failure.
        message: String,
    },

    // ========================================================================
    // Lifecycle Errors
    // ========================================================================
    /// Wait queues were not empty at shutdown.
    ///
    /// Queued operations at teardown will never complete; this is a
    /// consistency violation, never silently ignored.
    #[error(
        "Wait queues not empty at shutdown: {inpage} in-page, {standalone} standalone \
         (first leaked operation: {first})"
    )]
    ShutdownLeak {
        /// Number of operations leaked in the in-page queue.
        inpage: usize,
        /// Number of operations leaked in the standalone queue.
        standalone: usize,
        /// Identifier of the first leaked operation.
        first: Uuid,
    },
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates an unknown browser error.
    #[inline]
    pub fn unknown_browser(name: impl Into<String>) -> Self {
        Self::UnknownBrowser { name: name.into() }
    }

    /// Creates a contract violation error.
    #[inline]
    pub fn contract_violation(message: impl Into<String>) -> Self {
        Self::ContractViolation {
            message: message.into(),
        }
    }

    /// Creates a session error.
    #[inline]
    pub fn session(message: impl Into<String>) -> Self {
        Self::Session {
            message: message.into(),
        }
    }

    /// Creates a shutdown leak error.
    #[inline]
    pub fn shutdown_leak(inpage: usize, standalone: usize, first: Uuid) -> Self {
        Self::ShutdownLeak {
            inpage,
            standalone,
            first,
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a caller contract violation.
    #[inline]
    #[must_use]
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::ContractViolation { .. })
    }

    /// Returns `true` if this is a configuration-level error.
    #[inline]
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::Configuration { .. } | Self::UnknownBrowser { .. }
        )
    }

    /// Returns `true` if this is a shutdown leak.
    #[inline]
    #[must_use]
    pub fn is_shutdown_leak(&self) -> bool {
        matches!(self, Self::ShutdownLeak { .. })
    }

    /// Returns `true` if this error is recoverable.
    ///
    /// Session failures may succeed on retry; structural failures indicate
    /// a design-level bug and are never recoverable.
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Session { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_display() {
        let err = Error::configuration("no browser selected");
        assert_eq!(err.to_string(), "Configuration error: no browser selected");
    }

    #[test]
    fn test_unknown_browser_display() {
        let err = Error::unknown_browser("netscape");
        assert_eq!(err.to_string(), "Unknown browser: netscape");
    }

    #[test]
    fn test_contract_violation_display() {
        let err = Error::contract_violation("release without holding the lock");
        assert_eq!(
            err.to_string(),
            "Contract violation: release without holding the lock"
        );
    }

    #[test]
    fn test_shutdown_leak_display_includes_counts() {
        let id = Uuid::new_v4();
        let err = Error::shutdown_leak(2, 1, id);
        let message = err.to_string();
        assert!(message.contains("2 in-page"));
        assert!(message.contains("1 standalone"));
        assert!(message.contains(&id.to_string()));
    }

    #[test]
    fn test_is_contract_violation() {
        assert!(Error::contract_violation("test").is_contract_violation());
        assert!(!Error::session("test").is_contract_violation());
    }

    #[test]
    fn test_is_configuration_error() {
        assert!(Error::configuration("test").is_configuration_error());
        assert!(Error::unknown_browser("test").is_configuration_error());
        assert!(!Error::session("test").is_configuration_error());
    }

    #[test]
    fn test_is_recoverable() {
        assert!(Error::session("timed out").is_recoverable());
        assert!(!Error::shutdown_leak(1, 0, Uuid::new_v4()).is_recoverable());
        assert!(!Error::contract_violation("test").is_recoverable());
    }
}

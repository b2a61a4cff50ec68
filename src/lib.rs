//! Serialized access management for a shared browser-automation session.
//!
//! This library coordinates exclusive access to a single, expensive,
//! stateful driver session shared across many concurrent request producers.
//! Only one logical operation drives the session at a time; all others wait
//! in a fair two-tier queue structure that prefers in-page continuations
//! over fresh page loads, so a multi-step interaction on an already-loaded
//! page is never starved by new navigations.
//!
//! # Architecture
//!
//! Two components, bottom-up:
//!
//! - [`ResourceHandle`]: lazily constructs and owns the single session;
//!   mediates navigation with optional timeout enforcement; tears down once.
//! - [`AccessManager`]: owns a non-blocking mutual-exclusion lock over the
//!   handle plus a priority (in-page) and a normal wait queue, and checks
//!   the empty-queue invariant at shutdown.
//!
//! Producers call [`AccessManager::acquire`]; on grant the operation is
//! bound to the manager and may drive navigation, on contest it is queued.
//! An external completion signal drives [`AccessManager::acquire_next`] and
//! [`AccessManager::release`] as holders finish.
//!
//! # Quick Start
//!
//! ```no_run
//! use webdriver_access::{
//!     AccessManager, AcquireOutcome, DriverRegistry, HostEvents, Operation, Result, Settings,
//! };
//!
//! # async fn example(registry: DriverRegistry) -> Result<()> {
//! let settings = Settings::new()
//!     .with_browser("firefox")
//!     .with_user_agent("Mozilla/5.0 ...");
//!
//! // Activate the manager only for usable settings.
//! assert!(AccessManager::is_configured(&settings, &registry));
//!
//! let events = HostEvents::new();
//! let manager = AccessManager::new(settings, &registry, events.stop_signal())?;
//!
//! let url = url::Url::parse("https://example.com").unwrap();
//! if let AcquireOutcome::Granted(op) = manager.acquire(Operation::standalone(url.clone()))? {
//!     op.manager().unwrap().navigate(&url).await;
//!     manager.release()?;
//!     let _ = manager.acquire_next()?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`driver`] | Driver session seam and browser registry |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`lifecycle`] | Host stop event source and subscriptions |
//! | [`manager`] | [`AccessManager`], [`ResourceHandle`], [`Operation`] |
//! | [`settings`] | Manager settings and session configuration |
//!
//! # Concurrency model
//!
//! [`AccessManager::acquire`] never blocks or suspends the caller: it
//! deterministically reports granted or queued. A single mutex guards the
//! lock flag and both queues, so producers on arbitrary threads and the
//! completion-signal driver interleave safely. The session itself is only
//! ever driven by the current lock holder.

// ============================================================================
// Modules
// ============================================================================

/// Driver session seam and browser registry.
///
/// The manager drives a [`DriverSession`] trait object; concrete browsers
/// register a [`DriverFactory`] by name in a [`DriverRegistry`].
pub mod driver;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Host lifecycle events.
///
/// One-shot "host stopping" notification with at-most-once delivery.
pub mod lifecycle;

/// Session access management: lock, queues, lazy session lifecycle.
pub mod manager;

/// Manager settings and merged session configuration.
pub mod settings;

// ============================================================================
// Re-exports
// ============================================================================

// Driver seam
pub use driver::{DriverFactory, DriverRegistry, DriverSession};

// Error types
pub use error::{Error, Result};

// Lifecycle types
pub use lifecycle::{HostEvents, StopSignal};

// Manager types
pub use manager::{AccessManager, AcquireOutcome, Operation, OperationKind, ResourceHandle, Target};

// Settings types
pub use settings::{BrowserSelector, SessionConfig, Settings, USER_AGENT_KEY};

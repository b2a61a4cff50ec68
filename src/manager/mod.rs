//! Session access management.
//!
//! This module contains the core coordination types:
//!
//! | Type | Description |
//! |------|-------------|
//! | [`AccessManager`] | Non-blocking lock + two-tier fair wait queues |
//! | [`ResourceHandle`] | Lazily constructed driver session lifecycle |
//! | [`Operation`] | Unit of work requesting exclusive access |
//!
//! # Access state machine
//!
//! Per operation: `Requested → {Granted | Queued}`; `Queued → Granted` on a
//! later [`AccessManager::acquire_next`]; `Granted → Released`. There is no
//! denied terminal state; every queued operation is eventually retried.

// ============================================================================
// Submodules
// ============================================================================

/// The access manager: lock, queues, shutdown invariants.
pub mod access;

/// The lazily constructed session handle.
pub mod handle;

/// Operations and their classification.
pub mod operation;

// ============================================================================
// Re-exports
// ============================================================================

pub use access::{AccessManager, AcquireOutcome};
pub use handle::ResourceHandle;
pub use operation::{Operation, OperationKind, Target};

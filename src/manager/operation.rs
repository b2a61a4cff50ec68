//! Operations requesting exclusive session access.
//!
//! An [`Operation`] is one unit of work that wants to drive the managed
//! session: either a top-level page load ([`OperationKind::Standalone`]) or a
//! continuation on the currently loaded page ([`OperationKind::InPage`]).
//! The classification is immutable and decides which wait queue the
//! operation joins when the lock is contested.
//!
//! Once granted, an operation carries a back-reference to the manager that
//! granted it, set exactly once at grant time.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use super::access::AccessManager;

// ============================================================================
// OperationKind
// ============================================================================

/// Classification of an operation for queue priority.
///
/// In-page continuations are drained before standalone page loads so that a
/// multi-step interaction on an already-loaded page is not starved by fresh
/// navigations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// A top-level request loading a new page.
    Standalone,
    /// A continuation on the currently loaded page.
    InPage,
}

// ============================================================================
// Target
// ============================================================================

/// What an operation wants to do with the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Navigate to a URL.
    Page(Url),
    /// Run an action descriptor against the current page.
    Action(String),
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page(url) => write!(f, "{url}"),
            Self::Action(descriptor) => f.write_str(descriptor),
        }
    }
}

// ============================================================================
// Operation
// ============================================================================

/// A unit of work requesting exclusive access to the managed session.
///
/// Created by the caller; passed by value into
/// [`AccessManager::acquire`](super::AccessManager::acquire) and returned on
/// grant with the manager reference bound.
pub struct Operation {
    /// Identifier used for log correlation and leak reporting.
    id: Uuid,

    /// Navigation target or action descriptor.
    target: Target,

    /// Immutable queue classification.
    kind: OperationKind,

    /// The manager that granted this operation access; set exactly once.
    manager: Option<AccessManager>,
}

// ============================================================================
// Operation - Constructors
// ============================================================================

impl Operation {
    /// Creates an operation with an explicit target and classification.
    #[must_use]
    pub fn new(target: Target, kind: OperationKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            target,
            kind,
            manager: None,
        }
    }

    /// Creates a standalone page-load operation.
    #[inline]
    #[must_use]
    pub fn standalone(url: Url) -> Self {
        Self::new(Target::Page(url), OperationKind::Standalone)
    }

    /// Creates an in-page continuation operation.
    #[inline]
    #[must_use]
    pub fn in_page(action: impl Into<String>) -> Self {
        Self::new(Target::Action(action.into()), OperationKind::InPage)
    }
}

// ============================================================================
// Operation - Accessors
// ============================================================================

impl Operation {
    /// Returns the operation identifier.
    #[inline]
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the operation target.
    #[inline]
    #[must_use]
    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Returns the queue classification.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    /// Returns the granting manager, if this operation has been granted.
    #[inline]
    #[must_use]
    pub fn manager(&self) -> Option<&AccessManager> {
        self.manager.as_ref()
    }

    /// Returns `true` if this operation has been granted access.
    #[inline]
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.manager.is_some()
    }
}

// ============================================================================
// Operation - Internal
// ============================================================================

impl Operation {
    /// Binds the granting manager onto this operation.
    ///
    /// Called exactly once, by `AccessManager::acquire` at grant time.
    pub(crate) fn bind(&mut self, manager: AccessManager) {
        debug_assert!(self.manager.is_none(), "operation bound twice");
        self.manager = Some(manager);
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("id", &self.id)
            .field("target", &self.target)
            .field("kind", &self.kind)
            .field("bound", &self.is_bound())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

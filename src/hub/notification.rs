//! Payloads carried by the four hub channels.

use crate::action::Action;
use crate::reducer::Reducer;
use crate::types::{ContextId, State};
use std::fmt;

/// What a state report does to the `(parent_context_id, key)` slot.
#[derive(Clone)]
pub enum ReportKind {
    Registration(Reducer),
    Deregistration,
}

/// Registration or deregistration of a transition function, addressed to the
/// context that should fold it into its composite.
#[derive(Clone)]
pub struct StateReport {
    pub parent_context_id: ContextId,
    pub key: String,
    pub kind: ReportKind,
}

impl StateReport {
    pub fn registration(parent_context_id: ContextId, key: impl Into<String>, reducer: Reducer) -> Self {
        StateReport {
            parent_context_id,
            key: key.into(),
            kind: ReportKind::Registration(reducer),
        }
    }

    pub fn deregistration(parent_context_id: ContextId, key: impl Into<String>) -> Self {
        StateReport {
            parent_context_id,
            key: key.into(),
            kind: ReportKind::Deregistration,
        }
    }

    pub fn is_registration(&self) -> bool {
        matches!(self.kind, ReportKind::Registration(_))
    }
}

impl fmt::Debug for StateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            ReportKind::Registration(_) => "Registration",
            ReportKind::Deregistration => "Deregistration",
        };
        f.debug_struct("StateReport")
            .field("parent_context_id", &self.parent_context_id)
            .field("key", &self.key)
            .field("kind", &kind)
            .finish()
    }
}

/// Emitted once by a context when it is destroyed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destruction {
    pub context_id: ContextId,
}

/// An action travelling upward, addressed to the context that should forward
/// (or, at the root, apply) it.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchNotice {
    pub parent_context_id: ContextId,
    pub action: Action,
}

/// Composed state published by `context_id` for its children.
#[derive(Debug, Clone, PartialEq)]
pub struct StateNotice {
    pub context_id: ContextId,
    pub state: State,
    /// Root store revision the state was derived from. Contexts ignore a
    /// notice older than the last one they derived from, which happens when a
    /// newer state is published from inside the delivery of an older one.
    pub revision: u64,
}

impl StateNotice {
    pub fn new(context_id: ContextId, state: State) -> Self {
        StateNotice {
            context_id,
            state,
            revision: 0,
        }
    }

    pub fn with_revision(mut self, revision: u64) -> Self {
        self.revision = revision;
        self
    }
}

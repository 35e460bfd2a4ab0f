//! Broadcast hub: the four process-wide channels every context coordinates through.
//!
//! Contexts never hold references to one another. They publish notifications
//! tagged with identities and filter inbound notifications by identity.

mod channel;
mod notification;

pub use channel::{Channel, Subscription};
pub use notification::{DispatchNotice, Destruction, ReportKind, StateNotice, StateReport};

use crate::config::HubConfig;
use crate::types::{ContextId, CONTEXT_ID_DELIMITER};

/// Shared set of channels. Cloning yields another handle onto the same channels.
///
/// Construct a fresh hub per tree (or per test) to keep trees isolated.
#[derive(Clone, Debug)]
pub struct Hub {
    state_report: Channel<StateReport>,
    destruction: Channel<Destruction>,
    dispatching_action: Channel<DispatchNotice>,
    state: Channel<StateNotice>,
    root_id: ContextId,
    delimiter: String,
}

impl Default for Hub {
    fn default() -> Self {
        Self::new()
    }
}

impl Hub {
    pub fn new() -> Self {
        Self::with_identity(ContextId::root(), CONTEXT_ID_DELIMITER)
    }

    pub fn from_config(config: &HubConfig) -> Self {
        Self::with_identity(ContextId::new(config.root_id.clone()), &config.delimiter)
    }

    pub fn with_identity(root_id: ContextId, delimiter: &str) -> Self {
        Hub {
            state_report: Channel::new(),
            destruction: Channel::new(),
            dispatching_action: Channel::new(),
            state: Channel::new(),
            root_id,
            delimiter: delimiter.to_string(),
        }
    }

    /// Registration / deregistration of reducers.
    pub fn state_report(&self) -> &Channel<StateReport> {
        &self.state_report
    }

    pub fn destruction(&self) -> &Channel<Destruction> {
        &self.destruction
    }

    pub fn dispatching_action(&self) -> &Channel<DispatchNotice> {
        &self.dispatching_action
    }

    /// Composed state snapshots travelling downward.
    pub fn state(&self) -> &Channel<StateNotice> {
        &self.state
    }

    /// Identity that top-level contexts use as their parent.
    pub fn root_id(&self) -> &ContextId {
        &self.root_id
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// Identity of the child `key` under `parent`, using this hub's delimiter.
    pub fn child_id(&self, parent: &ContextId, key: &str) -> ContextId {
        parent.child_with(key, &self.delimiter)
    }
}

//! ctxtree: Hierarchical State Contexts
//!
//! A tree of independently destructible state contexts that never hold
//! references to one another. Contexts coordinate only through a [`Hub`] of
//! four broadcast channels: reducers are registered *up* the tree, composed
//! state flows *down*, actions are forwarded to the root [`Store`], and
//! destroying a context cascades to every descendant.

pub mod action;
pub mod builtin;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod hub;
pub mod logging;
pub mod reducer;
pub mod routing;
pub mod scenario;
pub mod state;
pub mod store;
pub mod types;

pub use action::Action;
pub use context::{create_context, Context, StateBuildingBlock};
pub use error::{ApiError, ScenarioError};
pub use hub::{Hub, Subscription};
pub use reducer::{reducer, Reducer};
pub use routing::{RoutingOptions, RoutingPolicy};
pub use store::Store;
pub use types::{ContextId, State};

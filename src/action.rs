//! Actions: the inputs of every transition function.

use crate::types::ContextId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Action type the root store uses when its reducer set changes.
pub const INIT_ACTION_TYPE: &str = "@@ctxtree/INIT";

/// A dispatched action.
///
/// `target` is the routing tag: when set, only reducers wrapped for that
/// context identity react to it (see [`crate::routing`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub payload: Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<ContextId>,
}

impl Action {
    pub fn new(kind: impl Into<String>) -> Self {
        Action {
            kind: kind.into(),
            payload: Value::Null,
            target: None,
        }
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }

    pub fn init() -> Self {
        Action::new(INIT_ACTION_TYPE)
    }

    pub fn is_tagged(&self) -> bool {
        self.target.is_some()
    }
}

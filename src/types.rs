//! Shared identifiers and value types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// State carried by every context: any serializable structure.
///
/// `State::Null` stands for "no contribution yet" and is never exposed by
/// [`crate::context::Context::get_state`].
pub type State = serde_json::Value;

/// Identity of the implicit node above every top-level context.
pub const ROOT_CONTEXT_ID: &str = "root";

/// Separator between a parent identity and a child key.
pub const CONTEXT_ID_DELIMITER: &str = "/";

/// Identity of a context: its parent's identity joined with its own key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextId(String);

impl ContextId {
    pub fn new(id: impl Into<String>) -> Self {
        ContextId(id.into())
    }

    pub fn root() -> Self {
        ContextId(ROOT_CONTEXT_ID.to_string())
    }

    /// Identity of the child registered under `key`, using the default delimiter.
    pub fn child(&self, key: &str) -> Self {
        self.child_with(key, CONTEXT_ID_DELIMITER)
    }

    pub fn child_with(&self, key: &str, delimiter: &str) -> Self {
        ContextId(format!("{}{}{}", self.0, delimiter, key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContextId {
    fn from(id: &str) -> Self {
        ContextId::new(id)
    }
}

impl From<String> for ContextId {
    fn from(id: String) -> Self {
        ContextId(id)
    }
}

impl PartialEq<str> for ContextId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ContextId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

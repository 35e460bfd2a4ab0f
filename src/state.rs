//! Slice extraction and change detection for context state.

use crate::types::State;

/// Shallow equality: objects compare by key set and top-level entries, any
/// other value compares by value.
pub fn shallow_equal(a: &State, b: &State) -> bool {
    match (a.as_object(), b.as_object()) {
        (Some(left), Some(right)) => {
            left.len() == right.len()
                && left
                    .iter()
                    .all(|(key, value)| right.get(key).is_some_and(|other| other == value))
        }
        _ => a == b,
    }
}

/// Where a context finds its own value inside the slice its parent hands it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SliceShape {
    /// The whole slice is the context's state (context without its own reducer).
    Bare,
    /// The context's state sits under `state_key` inside the slice.
    Nested { state_key: String },
}

impl SliceShape {
    pub fn nested(state_key: impl Into<String>) -> Self {
        SliceShape::Nested {
            state_key: state_key.into(),
        }
    }

    /// The context's own value within `slice`, if the slice carries one.
    pub fn own_state<'a>(&self, slice: &'a State) -> Option<&'a State> {
        match self {
            SliceShape::Bare => Some(slice),
            SliceShape::Nested { state_key } => slice.get(state_key.as_str()).filter(|v| !v.is_null()),
        }
    }
}

/// The slice addressed to child `key` inside its parent's published state.
pub fn child_slice<'a>(parent_state: &'a State, key: &str) -> Option<&'a State> {
    parent_state.get(key).filter(|slice| !slice.is_null())
}

/// Whether `slice` carries contributions beyond the context's own entry.
///
/// A slice that is empty, not an object, or holds only `state_key` gives
/// children nothing they do not already have.
pub fn carries_children(slice: &State, state_key: &str) -> bool {
    slice
        .as_object()
        .is_some_and(|entries| entries.keys().any(|key| key != state_key))
}

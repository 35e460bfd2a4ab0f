//! Named reducers that scenario files can refer to.

use crate::action::Action;
use crate::reducer::{reducer, Reducer};
use crate::types::State;
use serde_json::json;

pub const BUILTIN_REDUCERS: &[&str] = &["counter", "replace", "toggle", "append"];

/// Look up a built-in reducer by name.
pub fn by_name(name: &str) -> Option<Reducer> {
    match name {
        "counter" => Some(reducer(counter)),
        "replace" => Some(reducer(replace)),
        "toggle" => Some(reducer(toggle)),
        "append" => Some(reducer(append)),
        _ => None,
    }
}

/// `INC` / `DEC` by the numeric payload (default 1), `RESET` to the payload (default 0).
/// Steps saturate at the `i64` bounds.
pub fn counter(state: &State, action: &Action) -> State {
    let current = state.as_i64().unwrap_or(0);
    let step = action.payload.as_i64().unwrap_or(1);
    match action.kind.as_str() {
        "INC" => json!(current.saturating_add(step)),
        "DEC" => json!(current.saturating_sub(step)),
        "RESET" => json!(action.payload.as_i64().unwrap_or(0)),
        _ => state.clone(),
    }
}

/// `SET` replaces the state with the payload.
pub fn replace(state: &State, action: &Action) -> State {
    match action.kind.as_str() {
        "SET" => action.payload.clone(),
        _ => state.clone(),
    }
}

/// `TOGGLE` flips a boolean.
pub fn toggle(state: &State, action: &Action) -> State {
    match action.kind.as_str() {
        "TOGGLE" => json!(!state.as_bool().unwrap_or(false)),
        _ => state.clone(),
    }
}

/// `PUSH` appends the payload to an array, `CLEAR` empties it.
pub fn append(state: &State, action: &Action) -> State {
    match action.kind.as_str() {
        "PUSH" => {
            let mut items = state.as_array().cloned().unwrap_or_default();
            items.push(action.payload.clone());
            State::Array(items)
        }
        "CLEAR" => json!([]),
        _ => state.clone(),
    }
}

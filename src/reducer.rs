//! Transition functions and the ordered registry they are folded into.
//!
//! `fold_report` is the pure fold step applied to every state report a
//! context receives; `combine_reducers` turns the folded map into one
//! composite over a keyed object.

use crate::action::Action;
use crate::hub::{ReportKind, StateReport};
use crate::types::State;
use indexmap::IndexMap;
use serde_json::Map;
use std::rc::Rc;

/// A total transition function: `(state, action) -> next state`.
pub type Reducer = Rc<dyn Fn(&State, &Action) -> State>;

/// Child key -> transition function, in first-registration order.
pub type ReducerMap = IndexMap<String, Reducer>;

/// Box a closure as a [`Reducer`].
pub fn reducer<F>(f: F) -> Reducer
where
    F: Fn(&State, &Action) -> State + 'static,
{
    Rc::new(f)
}

/// Fold one registration event into `reducers`.
///
/// A registration replaces an existing entry in place (last write wins, the
/// original position is kept); a deregistration removes the entry and keeps
/// the relative order of the rest.
pub fn fold_report(mut reducers: ReducerMap, report: &StateReport) -> ReducerMap {
    match &report.kind {
        ReportKind::Registration(reducer) => {
            reducers.insert(report.key.clone(), Rc::clone(reducer));
        }
        ReportKind::Deregistration => {
            reducers.shift_remove(&report.key);
        }
    }
    reducers
}

/// Combine every entry into one reducer over an object keyed like the map.
///
/// Each entry sees `state[key]` (or `Null` when absent) and the result only
/// contains registered keys. Returns `None` for an empty map.
pub fn combine_reducers(reducers: &ReducerMap) -> Option<Reducer> {
    if reducers.is_empty() {
        return None;
    }
    let entries: Vec<(String, Reducer)> = reducers
        .iter()
        .map(|(key, reducer)| (key.clone(), Rc::clone(reducer)))
        .collect();

    Some(Rc::new(move |state: &State, action: &Action| {
        let mut next = Map::new();
        for (key, reducer) in &entries {
            let previous = state.get(key.as_str()).unwrap_or(&State::Null);
            next.insert(key.clone(), reducer(previous, action));
        }
        State::Object(next)
    }))
}

/// Substitute `default` whenever the reducer is handed a missing (`Null`) slice.
pub fn with_default(reducer: Reducer, default: State) -> Reducer {
    Rc::new(move |state: &State, action: &Action| {
        if state.is_null() {
            reducer(&default, action)
        } else {
            reducer(state, action)
        }
    })
}

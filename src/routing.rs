//! Routing tag helpers and the reducer wrapper that honours them.

use crate::action::Action;
use crate::reducer::Reducer;
use crate::types::{ContextId, State};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::rc::Rc;

/// How a routed reducer treats an *untagged* action of a given type.
///
/// Tagged actions are always restricted to the tagged context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingPolicy {
    /// Only react when the action is tagged for this context.
    Restricted,
    /// React to untagged actions as well as actions tagged for this context.
    Broadcast,
}

/// Action type -> routing policy. Types not listed behave as `Broadcast`.
pub type RoutingOptions = BTreeMap<String, RoutingPolicy>;

/// Tag `action` for `target`, replacing any previous tag.
pub fn tag_action(mut action: Action, target: &ContextId) -> Action {
    action.target = Some(target.clone());
    action
}

/// Whether a reducer routed for `context_id` should see `action`.
pub fn accepts(context_id: &ContextId, options: &RoutingOptions, action: &Action) -> bool {
    match &action.target {
        Some(target) => target == context_id,
        None => !matches!(options.get(&action.kind), Some(RoutingPolicy::Restricted)),
    }
}

/// Restrict `reducer` to actions routed for `context_id`; other actions return
/// the state unchanged.
pub fn route_reducer(reducer: Reducer, context_id: ContextId, options: RoutingOptions) -> Reducer {
    Rc::new(move |state: &State, action: &Action| {
        if accepts(&context_id, &options, action) {
            reducer(state, action)
        } else {
            state.clone()
        }
    })
}

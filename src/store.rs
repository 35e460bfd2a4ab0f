//! Root store: the terminal node above every top-level context.
//!
//! Folds the registrations addressed to the root identity into the root
//! composite, applies dispatches that reach the root, and publishes the
//! resulting state downward.

use crate::action::Action;
use crate::hub::{Channel, DispatchNotice, Hub, StateNotice, StateReport, Subscription};
use crate::reducer::{combine_reducers, fold_report, Reducer, ReducerMap};
use crate::state::shallow_equal;
use crate::types::{ContextId, State};
use serde_json::Map;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::{debug, trace};

/// Owns the root state. Dropping the last handle detaches it from the hub.
#[derive(Clone)]
pub struct Store {
    inner: Rc<StoreInner>,
}

struct StoreInner {
    root_id: ContextId,
    hub: Hub,
    state: RefCell<State>,
    /// Bumped on every committed change; stamped on published notices.
    revision: Cell<u64>,
    reducers: RefCell<ReducerMap>,
    composite: RefCell<Option<Reducer>>,
    observers: Channel<State>,
    subscriptions: RefCell<Vec<Subscription>>,
}

impl Store {
    /// Attach a store to `hub` at the hub's root identity.
    pub fn new(hub: &Hub) -> Self {
        Self::with_root(hub, hub.root_id().clone())
    }

    pub fn with_root(hub: &Hub, root_id: ContextId) -> Self {
        let inner = Rc::new(StoreInner {
            root_id,
            hub: hub.clone(),
            state: RefCell::new(State::Object(Map::new())),
            revision: Cell::new(0),
            reducers: RefCell::new(ReducerMap::new()),
            composite: RefCell::new(None),
            observers: Channel::new(),
            subscriptions: RefCell::new(Vec::new()),
        });

        let weak: Weak<StoreInner> = Rc::downgrade(&inner);
        let on_report = hub.state_report().subscribe(move |report: &StateReport| {
            if let Some(store) = weak.upgrade() {
                if report.parent_context_id == store.root_id {
                    store.fold(report);
                }
            }
        });

        let weak: Weak<StoreInner> = Rc::downgrade(&inner);
        let on_dispatch = hub.dispatching_action().subscribe(move |notice: &DispatchNotice| {
            if let Some(store) = weak.upgrade() {
                if notice.parent_context_id == store.root_id {
                    store.apply(&notice.action);
                }
            }
        });

        *inner.subscriptions.borrow_mut() = vec![on_report, on_dispatch];
        debug!(root_id = %inner.root_id, "store attached");
        Store { inner }
    }

    pub fn root_id(&self) -> &ContextId {
        &self.inner.root_id
    }

    pub fn get_state(&self) -> State {
        self.inner.state.borrow().clone()
    }

    /// Observe subsequent root state changes. Values superseded during
    /// delivery are skipped.
    pub fn subscribe<F>(&self, on_change: F) -> Subscription
    where
        F: Fn(&State) + 'static,
    {
        let inner = Rc::downgrade(&self.inner);
        self.inner.observers.subscribe(move |state: &State| {
            let current = inner.upgrade().is_some_and(|inner| {
                let now = inner.state.borrow();
                shallow_equal(&now, state)
            });
            if current {
                on_change(state);
            }
        })
    }

    /// Number of committed state changes so far.
    pub fn revision(&self) -> u64 {
        self.inner.revision.get()
    }

    /// Dispatch an action at the root, through the hub.
    pub fn dispatch(&self, action: Action) {
        self.inner.hub.dispatching_action().publish(DispatchNotice {
            parent_context_id: self.inner.root_id.clone(),
            action,
        });
    }

    /// Keys currently contributing to the root composite, in fold order.
    pub fn registered_keys(&self) -> Vec<String> {
        self.inner.reducers.borrow().keys().cloned().collect()
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("root_id", &self.inner.root_id)
            .field("registered", &self.registered_keys())
            .field("state", &*self.inner.state.borrow())
            .finish()
    }
}

impl StoreInner {
    fn fold(&self, report: &StateReport) {
        let reducers = std::mem::take(&mut *self.reducers.borrow_mut());
        let reducers = fold_report(reducers, report);
        let composite = combine_reducers(&reducers);
        debug!(
            root_id = %self.root_id,
            key = %report.key,
            registration = report.is_registration(),
            entries = reducers.len(),
            "root reducer set changed"
        );
        *self.reducers.borrow_mut() = reducers;
        *self.composite.borrow_mut() = composite.clone();

        let previous = self.state.borrow().clone();
        let next = match composite {
            Some(composite) => composite(&previous, &Action::init()),
            None => State::Object(Map::new()),
        };
        self.commit(&previous, next);
    }

    fn apply(&self, action: &Action) {
        let composite = self.composite.borrow().clone();
        let Some(composite) = composite else {
            trace!(root_id = %self.root_id, action = %action.kind, "no reducers registered; action dropped");
            return;
        };
        let previous = self.state.borrow().clone();
        let next = composite(&previous, action);
        self.commit(&previous, next);
    }

    fn commit(&self, previous: &State, next: State) {
        if shallow_equal(previous, &next) {
            return;
        }
        let revision = self.revision.get() + 1;
        self.revision.set(revision);
        *self.state.borrow_mut() = next.clone();
        self.observers.publish(next.clone());
        if self.revision.get() != revision {
            trace!(root_id = %self.root_id, revision, "state superseded by an observer");
            return;
        }
        self.hub.state().publish(
            StateNotice::new(self.root_id.clone(), next).with_revision(revision),
        );
    }
}

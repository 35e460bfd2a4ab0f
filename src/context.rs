//! Context factory: a node of the state tree wired to the hub.
//!
//! A context never holds a handle to its parent or children. Everything it
//! learns about them arrives on hub channels filtered by identity:
//!
//! - state reports addressed to its own identity are folded into its
//!   composite reducer, which is republished to its parent;
//! - state published by its parent is narrowed to its own slice, delivered to
//!   observers and, when it carries children's contributions, republished
//!   under its own identity (notices older than the last one seen are
//!   ignored, see [`StateNotice::revision`]);
//! - dispatches addressed to it are forwarded to its parent;
//! - the destruction of its parent destroys it.
//!
//! The hub subscriptions own the context, so a context stays alive (and keeps
//! participating) until it is destroyed, even when every handle is dropped.

use crate::action::Action;
use crate::hub::{
    Channel, Destruction, DispatchNotice, Hub, StateNotice, StateReport, Subscription,
};
use crate::reducer::{combine_reducers, fold_report, reducer, with_default, Reducer, ReducerMap};
use crate::routing::{route_reducer, tag_action, RoutingOptions};
use crate::state::{carries_children, child_slice, shallow_equal, SliceShape};
use crate::types::{ContextId, State};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use tracing::{debug, trace};

/// Static configuration of one context.
#[derive(Clone)]
pub struct StateBuildingBlock {
    /// Identifies the context among its siblings and in its parent's state.
    pub key: String,
    /// Identifies the context's own value inside its slice.
    pub state_key: String,
    pub default_state: State,
    pub reducer: Option<Reducer>,
    pub routing_options: Option<RoutingOptions>,
    pub parent_context_id: ContextId,
}

impl StateBuildingBlock {
    pub fn new(
        key: impl Into<String>,
        state_key: impl Into<String>,
        default_state: State,
        parent_context_id: ContextId,
    ) -> Self {
        StateBuildingBlock {
            key: key.into(),
            state_key: state_key.into(),
            default_state,
            reducer: None,
            routing_options: None,
            parent_context_id,
        }
    }

    pub fn with_reducer<F>(self, f: F) -> Self
    where
        F: Fn(&State, &Action) -> State + 'static,
    {
        self.with_shared_reducer(reducer(f))
    }

    pub fn with_shared_reducer(mut self, reducer: Reducer) -> Self {
        self.reducer = Some(reducer);
        self
    }

    pub fn with_routing(mut self, options: RoutingOptions) -> Self {
        self.routing_options = Some(options);
        self
    }
}

impl fmt::Debug for StateBuildingBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateBuildingBlock")
            .field("key", &self.key)
            .field("state_key", &self.state_key)
            .field("default_state", &self.default_state)
            .field("reducer", &self.reducer.is_some())
            .field("routing_options", &self.routing_options)
            .field("parent_context_id", &self.parent_context_id)
            .finish()
    }
}

/// Handle to a running context. Clones refer to the same context.
#[derive(Clone)]
pub struct Context {
    inner: Rc<ContextInner>,
}

struct ContextInner {
    id: ContextId,
    parent_id: ContextId,
    key: String,
    state_key: String,
    shape: SliceShape,
    hub: Hub,
    default_state: State,
    state: RefCell<State>,
    /// Whether the parent's state has carried a slice for this context.
    has_slice: Cell<bool>,
    /// Revision of the last state notice derived from.
    revision: Cell<u64>,
    observers: Channel<State>,
    reducers: RefCell<ReducerMap>,
    /// Whether a composite is currently registered with the parent.
    registered_upward: Cell<bool>,
    alive: Cell<bool>,
    subscriptions: RefCell<Vec<Subscription>>,
}

/// Build and start a context.
///
/// Before returning, the context is listening on all four channels and has
/// published the registration of its own reducer (if any).
pub fn create_context(config: StateBuildingBlock, hub: &Hub) -> Context {
    let id = hub.child_id(&config.parent_context_id, &config.key);
    let shape = match config.reducer {
        Some(_) => SliceShape::nested(config.state_key.clone()),
        None => SliceShape::Bare,
    };
    let own_reducer = config.reducer.map(|own| {
        let own = match config.routing_options {
            Some(options) => route_reducer(own, id.clone(), options),
            None => own,
        };
        with_default(own, config.default_state.clone())
    });

    let inner = Rc::new(ContextInner {
        id,
        parent_id: config.parent_context_id,
        key: config.key,
        state_key: config.state_key,
        shape,
        hub: hub.clone(),
        default_state: config.default_state.clone(),
        state: RefCell::new(config.default_state),
        has_slice: Cell::new(false),
        revision: Cell::new(0),
        observers: Channel::new(),
        reducers: RefCell::new(ReducerMap::new()),
        registered_upward: Cell::new(false),
        alive: Cell::new(true),
        subscriptions: RefCell::new(Vec::new()),
    });
    ContextInner::wire(&inner);
    debug!(
        context_id = %inner.id,
        parent_id = %inner.parent_id,
        has_reducer = own_reducer.is_some(),
        "context created"
    );

    if let Some(own) = own_reducer {
        inner.hub.state_report().publish(StateReport::registration(
            inner.id.clone(),
            inner.state_key.clone(),
            own,
        ));
    }

    Context { inner }
}

impl Context {
    pub fn id(&self) -> &ContextId {
        &self.inner.id
    }

    pub fn parent_id(&self) -> &ContextId {
        &self.inner.parent_id
    }

    pub fn key(&self) -> &str {
        &self.inner.key
    }

    pub fn state_key(&self) -> &str {
        &self.inner.state_key
    }

    /// Current value; the configured default until a contribution arrives.
    pub fn get_state(&self) -> State {
        self.inner.state.borrow().clone()
    }

    /// Observe subsequent state changes (not the current value).
    ///
    /// A value superseded while it was being delivered (because an earlier
    /// observer caused a newer one) is not handed to the remaining observers.
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

    /// Send `action` up the tree, tagged for this context when `route_to_self`.
    ///
    /// Has no effect once the context is destroyed.
    pub fn dispatch(&self, action: Action, route_to_self: bool) {
        if !self.inner.alive.get() {
            debug!(context_id = %self.inner.id, action = %action.kind, "dispatch on destroyed context dropped");
            return;
        }
        let action = if route_to_self {
            tag_action(action, &self.inner.id)
        } else {
            action
        };
        trace!(context_id = %self.inner.id, action = %action.kind, routed = route_to_self, "dispatching");
        self.inner.forward(action);
    }

    /// Destroy this context and, through the hub, all of its descendants.
    /// Calling it again is a no-op.
    pub fn destroy(&self) {
        self.inner.destroy();
    }

    pub fn is_destroyed(&self) -> bool {
        !self.inner.alive.get()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("id", &self.inner.id)
            .field("parent_id", &self.inner.parent_id)
            .field("state", &*self.inner.state.borrow())
            .field("destroyed", &!self.inner.alive.get())
            .finish()
    }
}

impl ContextInner {
    fn wire(this: &Rc<Self>) {
        let hub = &this.hub;

        let me = Rc::clone(this);
        let on_destruction = hub.destruction().subscribe(move |notice: &Destruction| {
            if notice.context_id == me.parent_id {
                me.destroy();
            }
        });

        let me = Rc::clone(this);
        let on_report = hub.state_report().subscribe(move |report: &StateReport| {
            if report.parent_context_id == me.id {
                me.fold(report);
            }
        });

        let me = Rc::clone(this);
        let on_state = hub.state().subscribe(move |notice: &StateNotice| {
            if notice.context_id == me.parent_id {
                me.derive(notice);
            }
        });

        let me = Rc::clone(this);
        let on_dispatch = hub.dispatching_action().subscribe(move |notice: &DispatchNotice| {
            if notice.parent_context_id == me.id {
                me.forward(notice.action.clone());
            }
        });

        *this.subscriptions.borrow_mut() = vec![on_destruction, on_report, on_state, on_dispatch];
    }

    /// Fold a report addressed to this context and republish the composite.
    fn fold(&self, report: &StateReport) {
        if !self.alive.get() {
            return;
        }
        let reducers = std::mem::take(&mut *self.reducers.borrow_mut());
        let reducers = fold_report(reducers, report);
        let composite = combine_reducers(&reducers);
        let entries = reducers.len();
        *self.reducers.borrow_mut() = reducers;

        match composite {
            Some(composite) => {
                self.registered_upward.set(true);
                trace!(context_id = %self.id, entries, "republishing composite reducer");
                self.hub.state_report().publish(StateReport::registration(
                    self.parent_id.clone(),
                    self.key.clone(),
                    composite,
                ));
            }
            None => {
                if self.registered_upward.replace(false) {
                    trace!(context_id = %self.id, "composite emptied; withdrawing from parent");
                    self.hub.state_report().publish(StateReport::deregistration(
                        self.parent_id.clone(),
                        self.key.clone(),
                    ));
                }
            }
        }
    }

    /// Derive own state from the parent's published state.
    fn derive(&self, notice: &StateNotice) {
        if notice.revision < self.revision.get() {
            trace!(context_id = %self.id, revision = notice.revision, "stale state notice ignored");
            return;
        }
        self.revision.set(notice.revision);

        let Some(slice) = child_slice(&notice.state, &self.key) else {
            // A pass-through context whose last contributor left falls back to its default.
            if matches!(self.shape, SliceShape::Bare) && self.has_slice.replace(false) {
                trace!(context_id = %self.id, "slice withdrawn; resetting to default");
                self.update(self.default_state.clone());
            }
            return;
        };
        self.has_slice.set(true);
        if let Some(own) = self.shape.own_state(slice) {
            self.update(own.clone());
        }
        // A newer notice derived during `update` has already been republished.
        let superseded = self.revision.get() != notice.revision;
        if self.alive.get() && !superseded && carries_children(slice, &self.state_key) {
            trace!(context_id = %self.id, "republishing composed state");
            self.hub.state().publish(
                StateNotice::new(self.id.clone(), slice.clone()).with_revision(notice.revision),
            );
        }
    }

    fn update(&self, next: State) {
        if shallow_equal(&self.state.borrow(), &next) {
            return;
        }
        *self.state.borrow_mut() = next.clone();
        self.observers.publish(next);
    }

    fn forward(&self, action: Action) {
        self.hub.dispatching_action().publish(DispatchNotice {
            parent_context_id: self.parent_id.clone(),
            action,
        });
    }

    fn destroy(&self) {
        if !self.alive.replace(false) {
            return;
        }
        let subscriptions = std::mem::take(&mut *self.subscriptions.borrow_mut());
        drop(subscriptions);
        self.observers.clear();
        self.reducers.borrow_mut().clear();
        debug!(context_id = %self.id, "context destroyed");

        self.hub.state_report().publish(StateReport::deregistration(
            self.parent_id.clone(),
            self.key.clone(),
        ));
        self.hub.destruction().publish(Destruction {
            context_id: self.id.clone(),
        });
    }
}

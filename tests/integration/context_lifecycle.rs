//! Context creation, state derivation and observation

use super::test_utils::{counter, recorder};
use ctxtree::hub::StateNotice;
use ctxtree::{create_context, Action, Hub, StateBuildingBlock, Store};
use serde_json::json;

#[test]
fn fresh_context_reports_its_default() {
    let hub = Hub::new();
    let plain = create_context(
        StateBuildingBlock::new("settings", "settings", json!({ "theme": "dark" }), hub.root_id().clone()),
        &hub,
    );
    let counted = create_context(
        StateBuildingBlock::new("counter", "value", json!(7), hub.root_id().clone()).with_reducer(counter),
        &hub,
    );
    assert_eq!(plain.get_state(), json!({ "theme": "dark" }));
    assert_eq!(counted.get_state(), json!(7));
}

#[test]
fn store_state_flows_down_to_contexts() {
    let hub = Hub::new();
    let store = Store::new(&hub);
    let ctx = create_context(
        StateBuildingBlock::new("counter", "value", json!(3), hub.root_id().clone()).with_reducer(counter),
        &hub,
    );

    assert_eq!(store.get_state(), json!({ "counter": { "value": 3 } }));
    store.dispatch(Action::new("INC"));
    assert_eq!(store.get_state(), json!({ "counter": { "value": 4 } }));
    assert_eq!(ctx.get_state(), json!(4));
}

#[test]
fn shallowly_equal_state_is_not_redelivered() {
    let hub = Hub::new();
    let ctx = create_context(
        StateBuildingBlock::new("panel", "panel", json!({}), hub.root_id().clone()),
        &hub,
    );
    let (seen, on_change) = recorder();
    let _sub = ctx.subscribe(on_change);

    for _ in 0..2 {
        hub.state().publish(StateNotice::new(
            hub.root_id().clone(),
            json!({ "panel": { "open": true, "items": [1, 2] } }),
        ));
    }
    assert_eq!(*seen.borrow(), vec![json!({ "open": true, "items": [1, 2] })]);

    hub.state().publish(StateNotice::new(
        hub.root_id().clone(),
        json!({ "panel": { "open": false, "items": [1, 2] } }),
    ));
    assert_eq!(seen.borrow().len(), 2);
}

#[test]
fn subscribers_only_see_changes() {
    let hub = Hub::new();
    let _store = Store::new(&hub);
    let ctx = create_context(
        StateBuildingBlock::new("counter", "value", json!(0), hub.root_id().clone()).with_reducer(counter),
        &hub,
    );
    let (seen, on_change) = recorder();
    let _sub = ctx.subscribe(on_change);
    assert!(seen.borrow().is_empty());

    ctx.dispatch(Action::new("NOOP"), false);
    assert!(seen.borrow().is_empty());

    ctx.dispatch(Action::new("INC"), false);
    assert_eq!(*seen.borrow(), vec![json!(1)]);
}

#[test]
fn absent_slice_keeps_previous_state() {
    let hub = Hub::new();
    let ctx = create_context(
        StateBuildingBlock::new("panel", "panel", json!({ "open": true }), hub.root_id().clone()),
        &hub,
    );
    hub.state().publish(StateNotice::new(
        hub.root_id().clone(),
        json!({ "other": 1 }),
    ));
    assert_eq!(ctx.get_state(), json!({ "open": true }));
}

#[test]
fn dropped_subscription_stops_notifications() {
    let hub = Hub::new();
    let _store = Store::new(&hub);
    let ctx = create_context(
        StateBuildingBlock::new("counter", "value", json!(0), hub.root_id().clone()).with_reducer(counter),
        &hub,
    );
    let (seen, on_change) = recorder();
    let sub = ctx.subscribe(on_change);
    ctx.dispatch(Action::new("INC"), false);
    drop(sub);
    ctx.dispatch(Action::new("INC"), false);

    assert_eq!(*seen.borrow(), vec![json!(1)]);
    assert_eq!(ctx.get_state(), json!(2));
}

#[test]
fn dropping_the_handle_does_not_detach_the_context() {
    let hub = Hub::new();
    let store = Store::new(&hub);
    let id = {
        let ctx = create_context(
            StateBuildingBlock::new("counter", "value", json!(0), hub.root_id().clone()).with_reducer(counter),
            &hub,
        );
        ctx.id().clone()
    };
    assert_eq!(id.as_str(), "root/counter");

    store.dispatch(Action::new("INC"));
    assert_eq!(store.get_state(), json!({ "counter": { "value": 1 } }));
    assert_eq!(store.registered_keys(), vec!["counter".to_string()]);
}

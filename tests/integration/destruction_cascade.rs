//! Destruction: idempotence, cascade through descendants, sibling isolation

use super::test_utils::{counter, recorder};
use ctxtree::hub::{Destruction, ReportKind, StateNotice, StateReport};
use ctxtree::{create_context, Action, Context, Hub, StateBuildingBlock, Store};
use serde_json::json;
use std::cell::Cell;
use std::rc::Rc;

fn counting_context(hub: &Hub, key: &str, parent: &Context) -> Context {
    create_context(
        StateBuildingBlock::new(key, "value", json!(0), parent.id().clone()).with_reducer(counter),
        hub,
    )
}

#[test]
fn destroying_twice_notifies_once() {
    let hub = Hub::new();
    let ctx = create_context(
        StateBuildingBlock::new("x", "x", json!({}), hub.root_id().clone()),
        &hub,
    );

    let deregistrations = Rc::new(Cell::new(0));
    let d = Rc::clone(&deregistrations);
    let _reports = hub.state_report().subscribe(move |report: &StateReport| {
        if report.parent_context_id == "root"
            && report.key == "x"
            && matches!(report.kind, ReportKind::Deregistration)
        {
            d.set(d.get() + 1);
        }
    });
    let destructions = Rc::new(Cell::new(0));
    let d = Rc::clone(&destructions);
    let _destroyed = hub.destruction().subscribe(move |notice: &Destruction| {
        if notice.context_id == "root/x" {
            d.set(d.get() + 1);
        }
    });

    ctx.destroy();
    ctx.destroy();

    assert!(ctx.is_destroyed());
    assert_eq!(deregistrations.get(), 1);
    assert_eq!(destructions.get(), 1);
}

#[test]
fn destruction_cascades_through_every_level() {
    let hub = Hub::new();
    let store = Store::new(&hub);
    let top = create_context(
        StateBuildingBlock::new("n0", "value", json!(0), hub.root_id().clone()).with_reducer(counter),
        &hub,
    );
    let mut chain = vec![top.clone()];
    for depth in 1..6 {
        let parent = chain[depth - 1].clone();
        chain.push(counting_context(&hub, &format!("n{}", depth), &parent));
    }
    assert_eq!(chain[5].id().as_str(), "root/n0/n1/n2/n3/n4/n5");

    let mut logs = Vec::new();
    let mut subs = Vec::new();
    for ctx in &chain {
        let (seen, on_change) = recorder();
        subs.push(ctx.subscribe(on_change));
        logs.push(seen);
    }

    top.destroy();

    assert!(chain.iter().all(Context::is_destroyed));
    assert_eq!(store.get_state(), json!({}));
    assert!(store.registered_keys().is_empty());

    store.dispatch(Action::new("INC"));
    for ctx in &chain {
        let mut slice = serde_json::Map::new();
        slice.insert(ctx.key().to_string(), json!({ "value": 99 }));
        hub.state().publish(StateNotice::new(
            ctx.parent_id().clone(),
            serde_json::Value::Object(slice),
        ));
    }
    assert!(logs.iter().all(|seen| seen.borrow().is_empty()));
    assert_eq!(hub.destruction().subscriber_count(), 0);
}

#[test]
fn destroying_a_child_leaves_its_siblings() {
    let hub = Hub::new();
    let store = Store::new(&hub);
    let parent = create_context(
        StateBuildingBlock::new("p", "p", json!({}), hub.root_id().clone()),
        &hub,
    );
    let a = counting_context(&hub, "a", &parent);
    let b = counting_context(&hub, "b", &parent);

    store.dispatch(Action::new("INC"));
    assert_eq!(
        store.get_state(),
        json!({ "p": { "a": { "value": 1 }, "b": { "value": 1 } } })
    );

    a.destroy();
    assert!(!parent.is_destroyed());
    assert!(!b.is_destroyed());
    assert_eq!(store.get_state(), json!({ "p": { "b": { "value": 1 } } }));

    b.dispatch(Action::new("INC"), false);
    assert_eq!(b.get_state(), json!(2));
    assert_eq!(a.get_state(), json!(1));
}

#[test]
fn dispatch_on_destroyed_context_is_dropped() {
    let hub = Hub::new();
    let store = Store::new(&hub);
    let keeper = create_context(
        StateBuildingBlock::new("keeper", "value", json!(0), hub.root_id().clone()).with_reducer(counter),
        &hub,
    );
    let gone = create_context(
        StateBuildingBlock::new("gone", "gone", json!({}), hub.root_id().clone()),
        &hub,
    );
    gone.destroy();

    gone.dispatch(Action::new("INC"), false);
    assert_eq!(keeper.get_state(), json!(0));
    assert_eq!(store.get_state(), json!({ "keeper": { "value": 0 } }));
}

#[test]
fn pass_through_parent_resets_when_its_last_child_is_destroyed() {
    let hub = Hub::new();
    let store = Store::new(&hub);
    let parent = create_context(
        StateBuildingBlock::new("p", "p", json!({}), hub.root_id().clone()),
        &hub,
    );
    let child = counting_context(&hub, "counter", &parent);

    store.dispatch(Action::new("INC"));
    assert_eq!(parent.get_state(), json!({ "counter": { "value": 1 } }));

    child.destroy();
    assert_eq!(store.get_state(), json!({}));
    assert_eq!(parent.get_state(), json!({}));

    // A new child is picked up again.
    let _again = counting_context(&hub, "again", &parent);
    assert_eq!(parent.get_state(), json!({ "again": { "value": 0 } }));
}

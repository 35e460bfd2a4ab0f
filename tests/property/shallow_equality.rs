//! Property-based tests for shallow equality

use ctxtree::state::shallow_equal;
use proptest::prelude::*;
use serde_json::{json, Map, Value};

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-z]{0,6}".prop_map(Value::from),
        prop::collection::vec(any::<i32>(), 0..4).prop_map(|v| json!(v)),
    ]
}

fn object() -> impl Strategy<Value = Map<String, Value>> {
    prop::collection::btree_map("[a-e]", leaf(), 0..5)
        .prop_map(|entries| entries.into_iter().collect())
}

proptest! {
    #[test]
    fn equal_under_reordering(entries in object()) {
        let forward = Value::Object(entries.clone());
        let reversed = Value::Object(entries.into_iter().rev().collect());
        prop_assert!(shallow_equal(&forward, &reversed));
    }

    #[test]
    fn agrees_with_value_equality(a in object(), b in object()) {
        let (a, b) = (Value::Object(a), Value::Object(b));
        prop_assert_eq!(shallow_equal(&a, &b), a == b);
    }

    #[test]
    fn symmetric(a in leaf(), b in leaf()) {
        prop_assert_eq!(shallow_equal(&a, &b), shallow_equal(&b, &a));
    }

    #[test]
    fn extra_key_breaks_equality(entries in object(), extra in leaf()) {
        let base = Value::Object(entries.clone());
        let mut grown = entries;
        grown.insert("zz".to_string(), extra);
        prop_assert!(!shallow_equal(&base, &Value::Object(grown)));
    }
}

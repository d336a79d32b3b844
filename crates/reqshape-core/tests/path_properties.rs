//! Property tests for document path get/set laws.

use proptest::prelude::*;
use reqshape_core::{get_path, set_path, DocPath, Document, Segment, Shaped};
use serde_json::{json, Value};

fn key_strategy() -> impl Strategy<Value = String> {
    // Dots are deliberately allowed: a dotted key is one segment.
    "[a-zA-Z_.]{1,8}"
}

fn key_path_strategy() -> impl Strategy<Value = DocPath> {
    prop::collection::vec(key_strategy(), 1..5).prop_map(DocPath::from_segments)
}

fn leaf_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        "[a-z0-9 ]{0,12}".prop_map(Value::String),
    ]
}

proptest! {
    #[test]
    fn set_then_get_returns_value(path in key_path_strategy(), leaf in leaf_strategy()) {
        let mut doc = Value::empty_object();
        prop_assert!(set_path(&mut doc, &path, leaf.clone()));
        prop_assert_eq!(get_path(&doc, &path), Some(&leaf));
    }

    #[test]
    fn set_is_idempotent(path in key_path_strategy(), leaf in leaf_strategy()) {
        let mut once = Value::empty_object();
        set_path(&mut once, &path, leaf.clone());
        let mut twice = once.clone();
        set_path(&mut twice, &path, leaf);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn sibling_write_does_not_disturb(
        parent in key_path_strategy(),
        a in key_strategy(),
        b in key_strategy(),
        va in leaf_strategy(),
        vb in leaf_strategy(),
    ) {
        prop_assume!(a != b);
        let pa = parent.child(Segment::Key(a));
        let pb = parent.child(Segment::Key(b));
        let mut doc = Value::empty_object();
        set_path(&mut doc, &pa, va.clone());
        set_path(&mut doc, &pb, vb.clone());
        prop_assert_eq!(get_path(&doc, &pa), Some(&va));
        prop_assert_eq!(get_path(&doc, &pb), Some(&vb));
    }

    #[test]
    fn shaped_and_json_agree(path in key_path_strategy(), leaf in leaf_strategy()) {
        let mut json_doc = Value::empty_object();
        let mut shaped_doc = Shaped::empty_object();
        set_path(&mut json_doc, &path, leaf.clone());
        set_path(&mut shaped_doc, &path, Shaped::from(leaf));
        prop_assert_eq!(shaped_doc, json_doc);
    }
}

//! Tests for the three-way diff engine.
//!
//! Each case writes both snapshots as JSON literals and checks all three
//! parts of the result, including which parts are absent.

use auditdiff_core::{diff, diff_json, AuditError, DiffResult, TreeValue};
use serde_json::json;

fn tree(value: serde_json::Value) -> TreeValue {
    TreeValue::from(value)
}

/// Diff two JSON literals.
fn diff_of(old: serde_json::Value, new: serde_json::Value) -> DiffResult {
    diff(&tree(old), &tree(new))
}

fn part(value: serde_json::Value) -> Option<TreeValue> {
    Some(tree(value))
}

// ============================================================================
// Objects
// ============================================================================

#[test]
fn object_keys_are_partitioned() {
    let result = diff_of(json!({"a": 1, "b": 2}), json!({"b": 2, "c": 3}));

    assert_eq!(result.removed, part(json!({"a": 1})));
    assert_eq!(result.added, part(json!({"c": 3})));
    assert_eq!(result.unchanged, part(json!({"b": 2})));
}

#[test]
fn nested_objects_merge_recursively() {
    let result = diff_of(
        json!({"x": {"a": 1, "b": 2}}),
        json!({"x": {"a": 9, "b": 2}}),
    );

    assert_eq!(result.removed, part(json!({"x": {"a": 1}})));
    assert_eq!(result.added, part(json!({"x": {"a": 9}})));
    assert_eq!(result.unchanged, part(json!({"x": {"b": 2}})));
}

#[test]
fn changed_scalar_field_appears_on_both_sides() {
    let result = diff_of(
        json!({"name": "Sprint 1", "status": "open"}),
        json!({"name": "Sprint 1", "status": "closed"}),
    );

    assert_eq!(result.removed, part(json!({"status": "open"})));
    assert_eq!(result.added, part(json!({"status": "closed"})));
    assert_eq!(result.unchanged, part(json!({"name": "Sprint 1"})));
}

#[test]
fn removed_key_keeps_whole_old_subtree() {
    let result = diff_of(
        json!({"owner": {"id": 1, "name": "Ala"}, "title": "T"}),
        json!({"title": "T"}),
    );

    assert_eq!(result.removed, part(json!({"owner": {"id": 1, "name": "Ala"}})));
    assert_eq!(result.added, None);
    assert_eq!(result.unchanged, part(json!({"title": "T"})));
}

#[test]
fn added_key_keeps_whole_new_subtree() {
    let result = diff_of(json!({}), json!({"labels": {"bug": true}}));

    assert_eq!(result.removed, None);
    assert_eq!(result.added, part(json!({"labels": {"bug": true}})));
    assert_eq!(result.unchanged, None);
}

#[test]
fn key_order_does_not_affect_result() {
    let a = diff_of(json!({"a": 1, "b": 2, "c": 3}), json!({"c": 3, "b": 5, "a": 1}));
    let b = diff_of(json!({"c": 3, "a": 1, "b": 2}), json!({"a": 1, "b": 5, "c": 3}));

    assert_eq!(a, b);
    assert_eq!(a.unchanged, part(json!({"a": 1, "c": 3})));
}

#[test]
fn deep_change_only_reports_the_changed_leaf() {
    let result = diff_of(
        json!({"a": {"b": {"c": {"d": 1, "e": 2}}}}),
        json!({"a": {"b": {"c": {"d": 1, "e": 3}}}}),
    );

    assert_eq!(result.removed, part(json!({"a": {"b": {"c": {"e": 2}}}})));
    assert_eq!(result.added, part(json!({"a": {"b": {"c": {"e": 3}}}})));
    assert_eq!(result.unchanged, part(json!({"a": {"b": {"c": {"d": 1}}}})));
}

// ============================================================================
// Collapse to absent
// ============================================================================

#[test]
fn empty_objects_collapse_to_absent() {
    let result = diff_of(json!({}), json!({}));

    assert_eq!(result.removed, None);
    assert_eq!(result.added, None);
    assert_eq!(result.unchanged, None);
    assert!(result.is_empty());
}

#[test]
fn nested_empty_objects_do_not_contribute() {
    let result = diff_of(json!({"meta": {}, "a": 1}), json!({"meta": {}, "a": 1}));

    assert_eq!(result.unchanged, part(json!({"a": 1})));
    assert!(result.is_unchanged());
}

#[test]
fn nested_object_with_only_changes_is_not_in_unchanged() {
    let result = diff_of(json!({"x": {"a": 1}}), json!({"x": {"a": 2}}));

    assert_eq!(result.unchanged, None);
    assert_eq!(result.removed, part(json!({"x": {"a": 1}})));
}

#[test]
fn identical_objects_have_no_removed_or_added() {
    let value = json!({"id": 4, "tags": ["a"], "sub": {"k": null}});
    let result = diff_of(value.clone(), value.clone());

    assert!(result.is_unchanged());
    assert_eq!(result.unchanged, part(value));
}

// ============================================================================
// Arrays
// ============================================================================

#[test]
fn arrays_are_compared_atomically() {
    let result = diff_of(json!({"tags": [1, 2]}), json!({"tags": [1, 2, 3]}));

    assert_eq!(result.removed, part(json!({"tags": [1, 2]})));
    assert_eq!(result.added, part(json!({"tags": [1, 2, 3]})));
    assert_eq!(result.unchanged, None);
}

#[test]
fn equal_arrays_are_unchanged() {
    let result = diff_of(json!([{"a": 1}, 2]), json!([{"a": 1}, 2]));

    assert!(result.is_unchanged());
    assert_eq!(result.unchanged, part(json!([{"a": 1}, 2])));
}

#[test]
fn reordered_array_is_a_change() {
    let result = diff_of(json!([1, 2]), json!([2, 1]));

    assert_eq!(result.removed, part(json!([1, 2])));
    assert_eq!(result.added, part(json!([2, 1])));
    assert_eq!(result.unchanged, None);
}

#[test]
fn objects_inside_arrays_are_not_diffed() {
    let result = diff_of(json!([{"a": 1, "b": 2}]), json!([{"a": 1, "b": 3}]));

    assert_eq!(result.removed, part(json!([{"a": 1, "b": 2}])));
    assert_eq!(result.added, part(json!([{"a": 1, "b": 3}])));
}

#[test]
fn empty_arrays_are_unchanged_not_collapsed() {
    let result = diff_of(json!({"tags": []}), json!({"tags": []}));

    assert_eq!(result.unchanged, part(json!({"tags": []})));
}

// ============================================================================
// Kind changes and scalars
// ============================================================================

#[test]
fn object_to_array_is_a_full_replacement() {
    let result = diff_of(json!({"a": 1}), json!([1]));

    assert_eq!(result.removed, part(json!({"a": 1})));
    assert_eq!(result.added, part(json!([1])));
    assert_eq!(result.unchanged, None);
}

#[test]
fn string_to_number_is_a_full_replacement() {
    let result = diff_of(json!({"v": "1"}), json!({"v": 1}));

    assert_eq!(result.removed, part(json!({"v": "1"})));
    assert_eq!(result.added, part(json!({"v": 1})));
}

#[test]
fn null_to_value_is_a_full_replacement() {
    let result = diff_of(json!({"due": null}), json!({"due": "2026-03-01"}));

    assert_eq!(result.removed, part(json!({"due": null})));
    assert_eq!(result.added, part(json!({"due": "2026-03-01"})));
}

#[test]
fn integer_and_float_are_different_values() {
    let result = diff_of(json!({"n": 1}), json!({"n": 1.0}));

    assert_eq!(result.removed, part(json!({"n": 1})));
    assert_eq!(result.added, part(json!({"n": 1.0})));
}

#[test]
fn top_level_scalars() {
    let same = diff_of(json!(true), json!(true));
    assert_eq!(same.unchanged, part(json!(true)));
    assert!(same.is_unchanged());

    let changed = diff_of(json!(true), json!(false));
    assert_eq!(changed.removed, part(json!(true)));
    assert_eq!(changed.added, part(json!(false)));
    assert_eq!(changed.unchanged, None);
}

// ============================================================================
// Inputs and output
// ============================================================================

#[test]
fn inputs_are_not_mutated() {
    let old = tree(json!({"a": 1, "b": {"c": 2}}));
    let new = tree(json!({"a": 2, "b": {"c": 2}}));
    let (old_before, new_before) = (old.clone(), new.clone());

    let _ = diff(&old, &new);

    assert_eq!(old, old_before);
    assert_eq!(new, new_before);
}

#[test]
fn serialized_output_is_deterministic() {
    let result = diff_json(
        r#"{"b":1,"a":{"y":1,"x":2},"c":[1]}"#,
        r#"{"d":0,"a":{"x":3,"y":1},"b":1}"#,
    )
    .unwrap();

    let json = serde_json::to_string(&result).unwrap();
    assert_eq!(
        json,
        r#"{"removed":{"a":{"x":2},"c":[1]},"added":{"a":{"x":3},"d":0},"unchanged":{"b":1,"a":{"y":1}}}"#
    );
}

#[test]
fn absent_parts_serialize_as_null() {
    let result = diff_json("{}", "{}").unwrap();
    let json = serde_json::to_string(&result).unwrap();
    assert_eq!(json, r#"{"removed":null,"added":null,"unchanged":null}"#);
}

#[test]
fn diff_json_rejects_malformed_input() {
    let err = diff_json(r#"{"a":1"#, "{}").unwrap_err();
    assert!(matches!(err, AuditError::MalformedInput(_)), "{err}");

    let err = diff_json("{}", "not json").unwrap_err();
    assert!(matches!(err, AuditError::MalformedInput(_)), "{err}");
}

#[test]
fn diff_is_reentrant_across_threads() {
    let old = tree(json!({"a": 1, "b": 2}));
    let new = tree(json!({"a": 1, "b": 3}));
    let expected = diff(&old, &new);

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4).map(|_| scope.spawn(|| diff(&old, &new))).collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

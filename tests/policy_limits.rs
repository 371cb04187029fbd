//! `SizePolicy` enforcement: depth, string/binary/key size, and child count.

use ubex::{from_slice, to_vec, DecodeError, SizePolicy, Value};

fn root(entries: Vec<(&str, Value)>) -> Value {
    let mut v = Value::new_map();
    for (k, val) in entries {
        v[k] = val;
    }
    v
}

#[test]
fn depth_33_against_max_depth_32_is_a_policy_violation() {
    let mut v = root(vec![]);
    for _ in 0..33 {
        let mut outer = Value::new_map();
        outer["nested"] = v;
        v = outer;
    }
    let bytes = to_vec(&v).unwrap();
    let policy = SizePolicy::builder().max_value_depth(32).build();

    let before = bytes.len();
    let err = from_slice(&bytes, policy).unwrap_err();
    assert!(matches!(err, DecodeError::PolicyViolation(_)));
    assert!(before > 0);
}

#[test]
fn string_over_the_limit_is_rejected_before_allocating() {
    let v = root(vec![("s", Value::String("x".repeat(1000)))]);
    let bytes = to_vec(&v).unwrap();
    let policy = SizePolicy::builder().max_string_size(100).build();
    let err = from_slice(&bytes, policy).unwrap_err();
    assert!(err.is_policy_violation());
}

#[test]
fn binary_over_the_limit_is_rejected() {
    let v = root(vec![("b", Value::Binary(vec![0u8; 1000]))]);
    let bytes = to_vec(&v).unwrap();
    let policy = SizePolicy::builder().max_binary_size(100).build();
    let err = from_slice(&bytes, policy).unwrap_err();
    assert!(err.is_policy_violation());
}

#[test]
fn key_over_the_limit_is_rejected() {
    let v = root(vec![("k".repeat(50).as_str(), Value::Bool(true))]);
    let bytes = to_vec(&v).unwrap();
    let policy = SizePolicy::builder().max_key_size(10).build();
    let err = from_slice(&bytes, policy).unwrap_err();
    assert!(err.is_policy_violation());
}

#[test]
fn too_many_children_is_rejected() {
    let mut m = Value::new_map();
    for i in 0..20 {
        m[format!("k{i}").as_str()] = Value::SignedInt(i);
    }
    let v = root(vec![("m", m)]);
    let bytes = to_vec(&v).unwrap();
    let policy = SizePolicy::builder().max_children(5).build();
    let err = from_slice(&bytes, policy).unwrap_err();
    assert!(err.is_policy_violation());
}

#[test]
fn object_size_limit_bounds_total_bytes_consumed() {
    let v = root(vec![("b", Value::Binary(vec![0u8; 10_000]))]);
    let bytes = to_vec(&v).unwrap();
    let policy = SizePolicy::builder().max_object_size(100).build();
    let err = from_slice(&bytes, policy).unwrap_err();
    assert!(err.is_policy_violation());
}

#[test]
fn defaults_accept_an_ordinary_small_tree() {
    let v = root(vec![("a", Value::SignedInt(1)), ("b", Value::String("ok".to_string()))]);
    let bytes = to_vec(&v).unwrap();
    let decoded = from_slice(&bytes, SizePolicy::default()).unwrap();
    assert_eq!(decoded, v);
}

//! The polymorphic in-memory value tree.

use std::collections::HashMap;
use std::collections::HashSet;
use std::ops::{Index, IndexMut};

use crate::error::ValueError;

mod convert;
mod iter;

pub use iter::Iter;

/// The type tag of a [`Value`].
///
/// Distinct from [`crate::marker::Marker`]: several `ValueKind`s narrow to
/// more than one wire marker depending on the value's magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// [`Value::Null`]
    Null,
    /// [`Value::Bool`]
    Bool,
    /// [`Value::Char`]
    Char,
    /// [`Value::SignedInt`]
    SignedInt,
    /// [`Value::UnsignedInt`]
    UnsignedInt,
    /// [`Value::Float`]
    Float,
    /// [`Value::String`]
    String,
    /// [`Value::Binary`]
    Binary,
    /// [`Value::Array`]
    Array,
    /// [`Value::Map`]
    Map,
}

/// A polymorphic value: exactly one of ten variants at any time.
///
/// See the crate-level documentation for the full contract. Cloning a
/// `Value` deep-copies the entire subtree; dropping one recursively drops
/// every child.
#[derive(Debug, Clone)]
pub enum Value {
    /// The absence of a value.
    Null,
    /// A boolean.
    Bool(bool),
    /// A single byte interpreted as a character.
    Char(u8),
    /// A 64-bit signed integer.
    SignedInt(i64),
    /// A 64-bit unsigned integer.
    UnsignedInt(u64),
    /// A 64-bit (double-precision) float.
    Float(f64),
    /// An ordered, conventionally-UTF-8 byte sequence.
    String(String),
    /// An ordered raw byte sequence.
    Binary(Vec<u8>),
    /// An ordered sequence of values.
    Array(Vec<Value>),
    /// A mapping from unique string keys to values. Iteration order is
    /// unspecified but stable until the next mutation.
    Map(HashMap<String, Value>),
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl Value {
    /// Construct an empty map.
    pub fn new_map() -> Self {
        Value::Map(HashMap::new())
    }

    /// Construct an empty array.
    pub fn new_array() -> Self {
        Value::Array(Vec::new())
    }

    /// Construct a `Value` from a list of values.
    ///
    /// Yields `Array` unless the list has exactly one element and that
    /// element is a `Map`, in which case construction delegates to it.
    pub fn from_values(mut values: Vec<Value>) -> Self {
        if values.len() == 1 && matches!(values[0], Value::Map(_)) {
            return values.pop().expect("checked len == 1 above");
        }
        Value::Array(values)
    }

    /// The current variant tag.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Char(_) => ValueKind::Char,
            Value::SignedInt(_) => ValueKind::SignedInt,
            Value::UnsignedInt(_) => ValueKind::UnsignedInt,
            Value::Float(_) => ValueKind::Float,
            Value::String(_) => ValueKind::String,
            Value::Binary(_) => ValueKind::Binary,
            Value::Array(_) => ValueKind::Array,
            Value::Map(_) => ValueKind::Map,
        }
    }

    /// 0 for `Null`, the element count for `Array`/`Map`/`String`/`Binary`,
    /// 1 for every other (scalar) variant.
    pub fn len(&self) -> usize {
        match self {
            Value::Null => 0,
            Value::Array(v) => v.len(),
            Value::Map(m) => m.len(),
            Value::String(s) => s.len(),
            Value::Binary(b) => b.len(),
            _ => 1,
        }
    }

    /// `true` iff `self.len() == 0`.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `true` iff this is `Value::Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Replace `self` with `Null`, returning the previous value.
    ///
    /// The "destructive move" named in the spec: plain Rust ownership
    /// transfer already does this for by-value moves; `take` is the
    /// in-place equivalent for a `&mut Value` you don't want to drop.
    pub fn take(&mut self) -> Value {
        std::mem::take(self)
    }

    /// Fallible access to the `i`-th element of an `Array`.
    pub fn get(&self, i: usize) -> Result<&Value, ValueError> {
        match self {
            Value::Array(v) => v
                .get(i)
                .ok_or(ValueError::IndexOutOfBounds { index: i, len: v.len() }),
            other => Err(ValueError::wrong_type("Array", other.kind())),
        }
    }

    /// Fallible mutable access to the `i`-th element of an `Array`.
    pub fn get_mut(&mut self, i: usize) -> Result<&mut Value, ValueError> {
        match self {
            Value::Array(v) => {
                let len = v.len();
                v.get_mut(i)
                    .ok_or(ValueError::IndexOutOfBounds { index: i, len })
            }
            other => Err(ValueError::wrong_type("Array", other.kind())),
        }
    }

    /// Fallible access to the value at key `k` in a `Map`.
    pub fn get_key(&self, k: &str) -> Result<&Value, ValueError> {
        match self {
            Value::Map(m) => m.get(k).ok_or_else(|| ValueError::MissingKey(k.to_string())),
            other => Err(ValueError::wrong_type("Map", other.kind())),
        }
    }

    /// Fallible mutable access to the value at key `k`.
    ///
    /// A `Null` value is converted in place to an empty `Map` and a `Null`
    /// is inserted at `k` before returning the reference, mirroring the
    /// auto-vivification the spec requires of `operator[]`.
    pub fn get_key_mut(&mut self, k: &str) -> Result<&mut Value, ValueError> {
        if self.is_null() {
            *self = Value::new_map();
        }
        match self {
            Value::Map(m) => Ok(m.entry(k.to_string()).or_insert(Value::Null)),
            other => Err(ValueError::wrong_type("Map", other.kind())),
        }
    }

    /// Append `value` to an `Array`, promoting a `Null` to a
    /// single-element `Array` first.
    pub fn push_back(&mut self, value: Value) -> Result<(), ValueError> {
        if self.is_null() {
            *self = Value::new_array();
        }
        match self {
            Value::Array(v) => {
                v.push(value);
                Ok(())
            }
            other => Err(ValueError::wrong_type("Array", other.kind())),
        }
    }

    /// For `Array`, test element equality. For `Map`, test key equality
    /// (`needle` must be `String`-typed). Every other variant returns
    /// `false`.
    pub fn contains(&self, needle: &Value) -> bool {
        match self {
            Value::Array(v) => v.contains(needle),
            Value::Map(m) => match needle {
                Value::String(k) => m.contains_key(k),
                _ => false,
            },
            _ => false,
        }
    }

    /// Inverse of [`Value::contains`]; a no-op if `needle` is absent.
    pub fn remove(&mut self, needle: &Value) {
        match self {
            Value::Array(v) => v.retain(|elem| elem != needle),
            Value::Map(m) => {
                if let Value::String(k) = needle {
                    m.remove(k);
                }
            }
            _ => {}
        }
    }

    /// The key set of a `Map`; empty for every other variant.
    pub fn keys(&self) -> HashSet<&String> {
        match self {
            Value::Map(m) => m.keys().collect(),
            _ => HashSet::new(),
        }
    }

    /// A lazy, forward, non-restartable iterator over child values:
    /// elements for `Array`, values for `Map`, empty for scalars.
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self)
    }

    /// Infallible coercion to `bool`: `true` for any non-`Null`,
    /// non-zero/non-empty value.
    pub fn as_bool(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Char(c) => *c != 0,
            Value::SignedInt(n) => *n != 0,
            Value::UnsignedInt(n) => *n != 0,
            Value::Float(f) => *f != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::Binary(b) => !b.is_empty(),
            Value::Array(v) => !v.is_empty(),
            Value::Map(m) => !m.is_empty(),
        }
    }

    /// Infallible, lossy coercion to `i64`.
    pub fn as_i64(&self) -> i64 {
        match self {
            Value::Null => 0,
            Value::Bool(b) => *b as i64,
            Value::Char(c) => *c as i64,
            Value::SignedInt(n) => *n,
            Value::UnsignedInt(n) => *n as i64,
            Value::Float(f) => *f as i64,
            Value::String(s) => s.parse::<i64>().unwrap_or(0),
            Value::Binary(_) | Value::Array(_) | Value::Map(_) => 0,
        }
    }

    /// Infallible, lossy coercion to `u64`.
    pub fn as_u64(&self) -> u64 {
        match self {
            Value::Null => 0,
            Value::Bool(b) => *b as u64,
            Value::Char(c) => *c as u64,
            Value::SignedInt(n) => *n as u64,
            Value::UnsignedInt(n) => *n,
            Value::Float(f) => *f as u64,
            Value::String(s) => s.parse::<u64>().unwrap_or(0),
            Value::Binary(_) | Value::Array(_) | Value::Map(_) => 0,
        }
    }

    /// Infallible, lossy coercion to `i32` via [`Value::as_i64`].
    pub fn as_int(&self) -> i32 {
        self.as_i64() as i32
    }

    /// Infallible, lossy coercion to `u32` via [`Value::as_u64`].
    pub fn as_uint(&self) -> u32 {
        self.as_u64() as u32
    }

    /// Infallible, lossy coercion to `f64`.
    pub fn as_f64(&self) -> f64 {
        match self {
            Value::Null => 0.0,
            Value::Bool(b) => *b as u8 as f64,
            Value::Char(c) => *c as f64,
            Value::SignedInt(n) => *n as f64,
            Value::UnsignedInt(n) => *n as f64,
            Value::Float(f) => *f,
            Value::String(s) => s.parse::<f64>().unwrap_or(0.0),
            Value::Binary(_) | Value::Array(_) | Value::Map(_) => 0.0,
        }
    }

    /// Infallible coercion to `String`: the decimal rendering for numbers,
    /// `"true"`/`"false"` for booleans, empty for containers, identity for
    /// `String`.
    pub fn as_string(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Char(c) => (*c as char).to_string(),
            Value::SignedInt(n) => n.to_string(),
            Value::UnsignedInt(n) => n.to_string(),
            Value::Float(f) => f.to_string(),
            Value::String(s) => s.clone(),
            Value::Binary(b) => String::from_utf8_lossy(b).into_owned(),
            Value::Array(_) | Value::Map(_) => String::new(),
        }
    }

    /// Infallible coercion to raw bytes: identity for `Binary`/`String`,
    /// little-endian bytes of the rendered value for scalars, empty for
    /// containers.
    pub fn as_binary(&self) -> Vec<u8> {
        match self {
            Value::Null => Vec::new(),
            Value::Bool(b) => vec![*b as u8],
            Value::Char(c) => vec![*c],
            Value::SignedInt(n) => n.to_le_bytes().to_vec(),
            Value::UnsignedInt(n) => n.to_le_bytes().to_vec(),
            Value::Float(f) => f.to_le_bytes().to_vec(),
            Value::String(s) => s.clone().into_bytes(),
            Value::Binary(b) => b.clone(),
            Value::Array(_) | Value::Map(_) => Vec::new(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::SignedInt(a), Value::SignedInt(b)) => a == b,
            (Value::UnsignedInt(a), Value::UnsignedInt(b)) => a == b,
            // Bitwise, not numeric: NaN payloads with identical bit
            // patterns compare equal; +0.0 and -0.0 do not.
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Binary(a), Value::Binary(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl Index<usize> for Value {
    type Output = Value;

    fn index(&self, i: usize) -> &Value {
        self.get(i).expect("Value index")
    }
}

impl IndexMut<usize> for Value {
    fn index_mut(&mut self, i: usize) -> &mut Value {
        self.get_mut(i).expect("Value index")
    }
}

impl Index<&str> for Value {
    type Output = Value;

    fn index(&self, k: &str) -> &Value {
        self.get_key(k).expect("Value index")
    }
}

impl IndexMut<&str> for Value {
    fn index_mut(&mut self, k: &str) -> &mut Value {
        self.get_key_mut(k).expect("Value index")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_auto_vivifies_to_map_on_string_index() {
        let mut v = Value::Null;
        v["x"] = Value::SignedInt(1);
        assert_eq!(v.kind(), ValueKind::Map);
        assert_eq!(v["x"], Value::SignedInt(1));
    }

    #[test]
    fn null_auto_vivifies_to_array_on_push_back() {
        let mut v = Value::Null;
        v.push_back(Value::SignedInt(1)).unwrap();
        v.push_back(Value::SignedInt(2)).unwrap();
        assert_eq!(v.kind(), ValueKind::Array);
        assert_eq!(v.len(), 2);
    }

    #[test]
    fn wrong_variant_index_is_an_error() {
        let v = Value::SignedInt(1);
        assert!(v.get(0).is_err());
        assert!(v.get_key("x").is_err());
    }

    #[test]
    fn numeric_variants_are_not_cross_equal() {
        assert_ne!(Value::SignedInt(1), Value::UnsignedInt(1));
        assert_ne!(Value::SignedInt(1), Value::Float(1.0));
    }

    #[test]
    fn float_equality_is_bitwise() {
        assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
        assert_ne!(Value::Float(0.0), Value::Float(-0.0));
    }

    #[test]
    fn clone_is_a_deep_copy() {
        let mut a = Value::new_map();
        a["nested"] = Value::from_values(vec![Value::SignedInt(1)]);
        let b = a.clone();
        a["nested"].push_back(Value::SignedInt(2)).unwrap();
        assert_eq!(a["nested"].len(), 2);
        assert_eq!(b["nested"].len(), 1);
    }

    #[test]
    fn take_leaves_null_behind() {
        let mut a = Value::SignedInt(42);
        let taken = a.take();
        assert_eq!(taken, Value::SignedInt(42));
        assert!(a.is_null());
    }

    #[test]
    fn contains_and_remove_on_array() {
        let mut v = Value::from_values(vec![Value::SignedInt(1), Value::SignedInt(2)]);
        assert!(v.contains(&Value::SignedInt(1)));
        v.remove(&Value::SignedInt(1));
        assert!(!v.contains(&Value::SignedInt(1)));
        assert_eq!(v.len(), 1);
    }

    #[test]
    fn contains_and_remove_on_map() {
        let mut v = Value::new_map();
        v["a"] = Value::Bool(true);
        assert!(v.contains(&Value::String("a".to_string())));
        v.remove(&Value::String("a".to_string()));
        assert!(v.get_key("a").is_err());
    }

    #[test]
    fn as_bool_is_true_for_any_nonzero_nonnull_value() {
        assert!(!Value::Null.as_bool());
        assert!(!Value::SignedInt(0).as_bool());
        assert!(Value::SignedInt(1).as_bool());
        assert!(Value::String("x".to_string()).as_bool());
        assert!(!Value::String(String::new()).as_bool());
    }

    #[test]
    fn as_string_renders_decimal_for_numbers() {
        assert_eq!(Value::SignedInt(-7).as_string(), "-7");
        assert_eq!(Value::UnsignedInt(7).as_string(), "7");
    }
}

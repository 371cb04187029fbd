//! `From` conversions into `Value` and strict `TryFrom` casts back out.

use std::convert::TryFrom;

use crate::error::ValueError;

use super::Value;

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<u8> for Value {
    fn from(c: u8) -> Self {
        Value::Char(c)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::SignedInt(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::SignedInt(n as i64)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::UnsignedInt(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::UnsignedInt(n as u64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Float(f as f64)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Binary(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

/// Strict cast: fails unless `value` already holds the target variant,
/// unlike the lossy `as_*` family on [`Value`] itself.
impl TryFrom<&Value> for bool {
    type Error = ValueError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Bool(b) => Ok(*b),
            other => Err(ValueError::bad_cast("bool", other.kind())),
        }
    }
}

impl TryFrom<&Value> for i64 {
    type Error = ValueError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::SignedInt(n) => Ok(*n),
            other => Err(ValueError::bad_cast("i64", other.kind())),
        }
    }
}

impl TryFrom<&Value> for u64 {
    type Error = ValueError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::UnsignedInt(n) => Ok(*n),
            other => Err(ValueError::bad_cast("u64", other.kind())),
        }
    }
}

impl TryFrom<&Value> for f64 {
    type Error = ValueError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Float(f) => Ok(*f),
            other => Err(ValueError::bad_cast("f64", other.kind())),
        }
    }
}

impl<'a> TryFrom<&'a Value> for &'a str {
    type Error = ValueError;

    fn try_from(value: &'a Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(s.as_str()),
            other => Err(ValueError::bad_cast("String", other.kind())),
        }
    }
}

impl<'a> TryFrom<&'a Value> for &'a [u8] {
    type Error = ValueError;

    fn try_from(value: &'a Value) -> Result<Self, Self::Error> {
        match value {
            Value::Binary(b) => Ok(b.as_slice()),
            other => Err(ValueError::bad_cast("Binary", other.kind())),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = ValueError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(ValueError::bad_cast("String", other.kind())),
        }
    }
}

impl TryFrom<Value> for Vec<u8> {
    type Error = ValueError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Binary(b) => Ok(b),
            other => Err(ValueError::bad_cast("Binary", other.kind())),
        }
    }
}

impl TryFrom<Value> for Vec<Value> {
    type Error = ValueError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Array(v) => Ok(v),
            other => Err(ValueError::bad_cast("Array", other.kind())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_primitives_picks_the_matching_variant() {
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(7i64), Value::SignedInt(7));
        assert_eq!(Value::from(7u64), Value::UnsignedInt(7));
        assert_eq!(Value::from("hi"), Value::String("hi".to_string()));
    }

    #[test]
    fn try_from_rejects_mismatched_variant() {
        let v = Value::SignedInt(1);
        assert!(bool::try_from(&v).is_err());
        assert_eq!(i64::try_from(&v).unwrap(), 1);
    }

    #[test]
    fn try_from_owned_value_moves_out_the_payload() {
        let v = Value::Binary(vec![1, 2, 3]);
        let bytes: Vec<u8> = Vec::try_from(v).unwrap();
        assert_eq!(bytes, vec![1, 2, 3]);
    }
}

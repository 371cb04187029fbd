//! Writes a [`Value`] tree out to bytes.
//!
//! ```text
//! map     := '{' entry* '}'
//! entry   := keylen:byte  keybytes:byte{keylen}  value
//! array   := '[' size? element* ']'            (heterogeneous)
//! homoarr := '(' typemarker size? element* ')'  (homogeneous)
//! value   := scalar | string | binary | map | array | homoarr
//! scalar  := 'n' | 't' | 'f'
//!          | 'c'  byte
//!          | 'i'  byte | 'I' byte
//!          | 'j'  byte{2} | 'J' byte{2}
//!          | 'k'  byte{4} | 'K' byte{4}
//!          | 'l'  byte{8} | 'L' byte{8}
//!          | 'd'  byte{4} | 'D' byte{8}
//! string  := 'I'|'J'|'K' size 's' bytes
//! binary  := 'I'|'J'|'K' size 'b' bytes
//! ```

use std::io::Write;

use tracing::{debug, trace};

use crate::error::{EncodeError, ValueError};
use crate::marker::Marker;
use crate::value::{Value, ValueKind};

/// Writes a [`Value`] tree to any [`std::io::Write`] sink.
#[derive(Debug)]
pub struct Encoder<W> {
    writer: W,
    written: usize,
}

impl<W: Write> Encoder<W> {
    /// Wrap a sink for encoding.
    pub fn new(writer: W) -> Self {
        Encoder { writer, written: 0 }
    }

    /// Encode `value`, which must have a `Map` root, returning the number
    /// of bytes written.
    pub fn encode(&mut self, value: &Value) -> Result<usize, EncodeError> {
        let Value::Map(map) = value else {
            return Err(EncodeError::RootNotMap(value.kind()));
        };
        debug!(entries = map.len(), "encoding root map");
        self.write_map(map)?;
        Ok(self.written)
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), EncodeError> {
        self.writer.write_all(&[byte])?;
        self.written += 1;
        Ok(())
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), EncodeError> {
        self.writer.write_all(bytes)?;
        self.written += bytes.len();
        Ok(())
    }

    fn write_marker(&mut self, marker: Marker) -> Result<(), EncodeError> {
        self.write_byte(marker.as_byte())
    }

    /// Writes the narrowest unsigned count marker + payload for `n`. Never
    /// emits `Uint64`: counts are capped at `u32`.
    fn write_count(&mut self, n: usize) -> Result<(), EncodeError> {
        let n = u32::try_from(n).unwrap_or(u32::MAX);
        if let Ok(v) = u8::try_from(n) {
            self.write_marker(Marker::Uint8)?;
            self.write_byte(v)
        } else if let Ok(v) = u16::try_from(n) {
            self.write_marker(Marker::Uint16)?;
            self.write_bytes(&v.to_be_bytes())
        } else {
            self.write_marker(Marker::Uint32)?;
            self.write_bytes(&n.to_be_bytes())
        }
    }

    fn write_map(&mut self, map: &std::collections::HashMap<String, Value>) -> Result<(), EncodeError> {
        self.write_marker(Marker::ObjectStart)?;
        if !map.is_empty() {
            self.write_count(map.len())?;
            for (key, value) in map {
                self.write_key(key)?;
                self.write_value(value)?;
            }
        }
        self.write_marker(Marker::ObjectEnd)
    }

    fn write_key(&mut self, key: &str) -> Result<(), EncodeError> {
        let bytes = key.as_bytes();
        let len = u8::try_from(bytes.len())
            .map_err(|_| ValueError::KeyTooLong(bytes.len()))?;
        self.write_byte(len)?;
        self.write_bytes(bytes)
    }

    fn write_value(&mut self, value: &Value) -> Result<(), EncodeError> {
        match value {
            Value::Null => self.write_marker(Marker::Null),
            Value::Bool(true) => self.write_marker(Marker::True),
            Value::Bool(false) => self.write_marker(Marker::False),
            Value::Char(c) => {
                self.write_marker(Marker::Char)?;
                self.write_byte(*c)
            }
            Value::SignedInt(n) => self.write_signed(*n),
            Value::UnsignedInt(n) => self.write_unsigned(*n),
            Value::Float(f) => self.write_float(*f),
            Value::String(s) => {
                self.write_count(s.len())?;
                self.write_marker(Marker::Str)?;
                self.write_bytes(s.as_bytes())
            }
            Value::Binary(b) => {
                self.write_count(b.len())?;
                self.write_marker(Marker::Bin)?;
                self.write_bytes(b)
            }
            Value::Array(v) => self.write_array(v),
            Value::Map(m) => self.write_map(m),
        }
    }

    fn write_signed(&mut self, n: i64) -> Result<(), EncodeError> {
        if let Ok(v) = i8::try_from(n) {
            self.write_marker(Marker::Int8)?;
            self.write_byte(v as u8)
        } else if let Ok(v) = i16::try_from(n) {
            self.write_marker(Marker::Int16)?;
            self.write_bytes(&v.to_be_bytes())
        } else if let Ok(v) = i32::try_from(n) {
            self.write_marker(Marker::Int32)?;
            self.write_bytes(&v.to_be_bytes())
        } else {
            self.write_marker(Marker::Int64)?;
            self.write_bytes(&n.to_be_bytes())
        }
    }

    fn write_unsigned(&mut self, n: u64) -> Result<(), EncodeError> {
        if let Ok(v) = u8::try_from(n) {
            self.write_marker(Marker::Uint8)?;
            self.write_byte(v)
        } else if let Ok(v) = u16::try_from(n) {
            self.write_marker(Marker::Uint16)?;
            self.write_bytes(&v.to_be_bytes())
        } else if let Ok(v) = u32::try_from(n) {
            self.write_marker(Marker::Uint32)?;
            self.write_bytes(&v.to_be_bytes())
        } else {
            self.write_marker(Marker::Uint64)?;
            self.write_bytes(&n.to_be_bytes())
        }
    }

    fn write_float(&mut self, f: f64) -> Result<(), EncodeError> {
        if fits_in_f32(f) {
            self.write_marker(Marker::Float32)?;
            self.write_bytes(&(f as f32).to_be_bytes())
        } else {
            self.write_marker(Marker::Float64)?;
            self.write_bytes(&f.to_be_bytes())
        }
    }

    fn write_array(&mut self, elements: &[Value]) -> Result<(), EncodeError> {
        match homogeneous_marker(elements) {
            Some(marker) => {
                trace!(marker = %marker, count = elements.len(), "homogeneous array");
                self.write_marker(Marker::HomoArrayStart)?;
                self.write_marker(marker)?;
                if !elements.is_empty() {
                    self.write_count(elements.len())?;
                    for element in elements {
                        self.write_scalar_payload(element, marker)?;
                    }
                }
                self.write_marker(Marker::HomoArrayEnd)
            }
            None => {
                self.write_marker(Marker::ArrayStart)?;
                if !elements.is_empty() {
                    self.write_count(elements.len())?;
                    for element in elements {
                        self.write_value(element)?;
                    }
                }
                self.write_marker(Marker::ArrayEnd)
            }
        }
    }

    /// Writes only the payload bytes of a scalar, no marker: used inside a
    /// homogeneous array frame, where the marker is written once up front.
    /// `marker` is the shared element marker the whole frame narrowed to,
    /// so a `Float` payload is written at that marker's width even though
    /// `Value::Float` itself is always `f64`.
    fn write_scalar_payload(&mut self, value: &Value, marker: Marker) -> Result<(), EncodeError> {
        match value {
            Value::Null | Value::Bool(_) => Ok(()),
            Value::Char(c) => self.write_byte(*c),
            Value::SignedInt(n) => match marker {
                Marker::Int8 => self.write_byte(*n as i8 as u8),
                Marker::Int16 => self.write_bytes(&(*n as i16).to_be_bytes()),
                Marker::Int32 => self.write_bytes(&(*n as i32).to_be_bytes()),
                _ => self.write_bytes(&n.to_be_bytes()),
            },
            Value::UnsignedInt(n) => match marker {
                Marker::Uint8 => self.write_byte(*n as u8),
                Marker::Uint16 => self.write_bytes(&(*n as u16).to_be_bytes()),
                Marker::Uint32 => self.write_bytes(&(*n as u32).to_be_bytes()),
                _ => self.write_bytes(&n.to_be_bytes()),
            },
            Value::Float(f) if marker == Marker::Float32 => {
                self.write_bytes(&(*f as f32).to_be_bytes())
            }
            Value::Float(f) => self.write_bytes(&f.to_be_bytes()),
            other => Err(EncodeError::RootNotMap(other.kind())),
        }
    }
}

/// `true` iff every element is a scalar and they all narrow to the same
/// wire marker, letting the encoder choose a homogeneous array frame.
fn homogeneous_marker(elements: &[Value]) -> Option<Marker> {
    if elements.is_empty() {
        return None;
    }
    let mut markers = elements.iter().map(scalar_marker);
    let first = markers.next()??;
    if markers.all(|m| m == Some(first)) {
        Some(first)
    } else {
        None
    }
}

fn scalar_marker(value: &Value) -> Option<Marker> {
    match value {
        Value::Null => Some(Marker::Null),
        Value::Bool(true) => Some(Marker::True),
        Value::Bool(false) => Some(Marker::False),
        Value::Char(_) => Some(Marker::Char),
        Value::SignedInt(n) => Some(signed_marker(*n)),
        Value::UnsignedInt(n) => Some(unsigned_marker(*n)),
        Value::Float(f) => Some(if fits_in_f32(*f) {
            Marker::Float32
        } else {
            Marker::Float64
        }),
        Value::String(_) | Value::Binary(_) | Value::Array(_) | Value::Map(_) => None,
    }
}

fn signed_marker(n: i64) -> Marker {
    if i8::try_from(n).is_ok() {
        Marker::Int8
    } else if i16::try_from(n).is_ok() {
        Marker::Int16
    } else if i32::try_from(n).is_ok() {
        Marker::Int32
    } else {
        Marker::Int64
    }
}

fn unsigned_marker(n: u64) -> Marker {
    if u8::try_from(n).is_ok() {
        Marker::Uint8
    } else if u16::try_from(n).is_ok() {
        Marker::Uint16
    } else if u32::try_from(n).is_ok() {
        Marker::Uint32
    } else {
        Marker::Uint64
    }
}

/// Zero, or a magnitude within `f32`'s representable range, subnormals
/// included. Never compare against `f32::MIN` here: that's the
/// most-negative finite `f32`, not the smallest-magnitude one. The lower
/// bound is the smallest positive *subnormal* `f32` (`f32::from_bits(1)`),
/// not `f32::MIN_POSITIVE` (smallest positive *normal*) — the latter would
/// wrongly force every subnormal-magnitude value up to `Float64`.
fn fits_in_f32(f: f64) -> bool {
    if f == 0.0 {
        return true;
    }
    const SMALLEST_POSITIVE_SUBNORMAL: f64 = f32::from_bits(1) as f64;
    let mag = f.abs();
    mag >= SMALLEST_POSITIVE_SUBNORMAL && mag <= f32::MAX as f64
}

/// Encode `value` (which must have a `Map` root) to a freshly allocated
/// `Vec<u8>`.
pub fn to_vec(value: &Value) -> Result<Vec<u8>, EncodeError> {
    let mut buf = Vec::new();
    let mut encoder = Encoder::new(&mut buf);
    encoder.encode(value)?;
    Ok(buf)
}

/// Encode `value` directly to `writer`, returning the byte count written.
pub fn encode<W: Write>(writer: &mut W, value: &Value) -> Result<usize, EncodeError> {
    Encoder::new(writer).encode(value)
}

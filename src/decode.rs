//! Reads bytes written by [`crate::encode`] back into a [`Value`] tree,
//! enforcing a [`SizePolicy`] throughout.
//!
//! One wrinkle the grammar in [`crate::encode`] creates: a `Uint8`/`Uint16`/
//! `Uint32` marker in value position is ambiguous on its own — it is either
//! a plain unsigned-integer scalar, or the width selector of a `string`/
//! `binary`'s length prefix, depending on what follows. The decoder
//! resolves this with a one-byte lookahead buffer (see `peek_u8`): read the
//! marker's payload, then peek the next byte; if it's `'s'` or `'b'`,
//! consume it and continue as a string/binary, otherwise the payload was
//! the integer's value and the peeked byte stays buffered for the next
//! read.

use std::collections::HashMap;
use std::convert::TryFrom;

use tracing::{debug, trace, warn};

use crate::error::DecodeError;
use crate::io::{IoReader, Read, SliceReader};
use crate::marker::Marker;
use crate::policy::SizePolicy;
use crate::value::Value;

/// Reads a [`Value`] tree from any [`Read`] source under a [`SizePolicy`].
#[derive(Debug)]
pub struct Decoder<R> {
    reader: R,
    policy: SizePolicy,
    bytes_read: usize,
    depth: usize,
    peeked: Option<u8>,
    last_error: Option<String>,
}

impl<R: Read> Decoder<R> {
    /// Wrap a source for decoding under `policy`.
    pub fn new(reader: R, policy: SizePolicy) -> Self {
        Decoder {
            reader,
            policy,
            bytes_read: 0,
            depth: 0,
            peeked: None,
            last_error: None,
        }
    }

    /// Wrap a source for decoding under [`SizePolicy::default`].
    pub fn with_default_policy(reader: R) -> Self {
        Self::new(reader, SizePolicy::default())
    }

    /// Total bytes consumed from the underlying source so far.
    pub fn bytes_read(&self) -> usize {
        self.bytes_read
    }

    /// The message of the most recent decode failure, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Decode exactly one top-level `Value` (a map).
    pub fn decode_one(&mut self) -> Result<Value, DecodeError> {
        self.depth = 0;
        let result = self.decode_one_inner();
        if let Err(err) = &result {
            self.last_error = Some(err.to_string());
        }
        result
    }

    fn decode_one_inner(&mut self) -> Result<Value, DecodeError> {
        debug!("decoding root value");
        let marker = self.read_marker()?;
        if marker != Marker::ObjectStart {
            return Err(DecodeError::unexpected_marker("'{'", marker.as_byte()));
        }
        self.read_map()
    }

    /// Decode one top-level value into an existing `Value`, reusing its
    /// allocation where possible. On failure `*out` is left in an
    /// unspecified but safely droppable state.
    pub fn decode_into(&mut self, out: &mut Value) -> Result<(), DecodeError> {
        *out = self.decode_one()?;
        Ok(())
    }

    /// Boolean-flavored wrapper: returns `true` on success (writing into
    /// `out`) or `false` on failure, with the failure message retrievable
    /// via [`Decoder::last_error`].
    pub fn decode_one_bool(&mut self, out: &mut Value) -> bool {
        self.decode_into(out).is_ok()
    }

    fn account(&mut self, n: usize) -> Result<(), DecodeError> {
        self.bytes_read += n;
        if self.bytes_read > self.policy.max_object_size() {
            let msg = format!(
                "object size {} exceeds policy limit {}",
                self.bytes_read,
                self.policy.max_object_size()
            );
            warn!("{msg}");
            return Err(DecodeError::policy(msg));
        }
        Ok(())
    }

    /// Pull one fresh byte from the underlying source, accounting it
    /// against the policy exactly once regardless of whether it's later
    /// peeked or consumed.
    fn fetch_byte(&mut self) -> Result<u8, DecodeError> {
        let byte = self.reader.read_u8()?;
        self.account(1)?;
        Ok(byte)
    }

    /// Look at the next byte without consuming it.
    fn peek_u8(&mut self) -> Result<u8, DecodeError> {
        if self.peeked.is_none() {
            self.peeked = Some(self.fetch_byte()?);
        }
        Ok(self.peeked.expect("just populated"))
    }

    fn read_u8(&mut self) -> Result<u8, DecodeError> {
        match self.peeked.take() {
            Some(b) => Ok(b),
            None => self.fetch_byte(),
        }
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut buf = [0u8; N];
        for slot in buf.iter_mut() {
            *slot = self.read_u8()?;
        }
        Ok(buf)
    }

    fn read_vec(&mut self, n: usize) -> Result<Vec<u8>, DecodeError> {
        let mut buf = Vec::with_capacity(n);
        for _ in 0..n {
            buf.push(self.read_u8()?);
        }
        Ok(buf)
    }

    fn read_marker(&mut self) -> Result<Marker, DecodeError> {
        Marker::try_from(self.read_u8()?)
    }

    /// Reads a count: a marker in `{Uint8, Uint16, Uint32}` followed by its
    /// payload. `None` if the next byte is `end_marker` instead (meaning
    /// the enclosing container is empty).
    fn read_count_or_end(&mut self, end_marker: Marker) -> Result<Option<usize>, DecodeError> {
        let marker = self.read_marker()?;
        if marker == end_marker {
            return Ok(None);
        }
        let marker = if marker == Marker::WidthHint {
            // consumed but not otherwise used for anything beyond an
            // optional pre-allocation hint
            let hint_marker = self.read_marker()?;
            let _hint = self.read_count_value(hint_marker)?;
            self.read_marker()?
        } else {
            marker
        };
        Ok(Some(self.read_count_value(marker)?))
    }

    fn read_count_value(&mut self, marker: Marker) -> Result<usize, DecodeError> {
        match marker {
            Marker::Uint8 => Ok(self.read_u8()? as usize),
            Marker::Uint16 => Ok(u16::from_be_bytes(self.read_array::<2>()?) as usize),
            Marker::Uint32 => Ok(u32::from_be_bytes(self.read_array::<4>()?) as usize),
            other => Err(DecodeError::unexpected_marker("a count marker", other.as_byte())),
        }
    }

    fn read_value(&mut self) -> Result<Value, DecodeError> {
        let marker = self.read_marker()?;
        self.read_value_body(marker)
    }

    fn read_value_body(&mut self, marker: Marker) -> Result<Value, DecodeError> {
        match marker {
            Marker::Null => Ok(Value::Null),
            Marker::True => Ok(Value::Bool(true)),
            Marker::False => Ok(Value::Bool(false)),
            Marker::Char => Ok(Value::Char(self.read_u8()?)),
            Marker::Int8 => Ok(Value::SignedInt(self.read_u8()? as i8 as i64)),
            Marker::Int16 => Ok(Value::SignedInt(i16::from_be_bytes(self.read_array::<2>()?) as i64)),
            Marker::Int32 => Ok(Value::SignedInt(i32::from_be_bytes(self.read_array::<4>()?) as i64)),
            Marker::Int64 => Ok(Value::SignedInt(i64::from_be_bytes(self.read_array::<8>()?))),
            Marker::Uint64 => Ok(Value::UnsignedInt(u64::from_be_bytes(self.read_array::<8>()?))),
            Marker::Float32 => Ok(Value::Float(f32::from_be_bytes(self.read_array::<4>()?) as f64)),
            Marker::Float64 => Ok(Value::Float(f64::from_be_bytes(self.read_array::<8>()?))),
            Marker::Uint8 | Marker::Uint16 | Marker::Uint32 => self.read_count_marker_value(marker),
            Marker::ObjectStart => self.read_map(),
            Marker::ArrayStart => self.read_heterogeneous_array(),
            Marker::HomoArrayStart => self.read_homogeneous_array(),
            other => Err(DecodeError::unexpected_marker("a value marker", other.as_byte())),
        }
    }

    /// Resolves the `Uint8`/`Uint16`/`Uint32`-in-value-position ambiguity
    /// described in the module docs.
    fn read_count_marker_value(&mut self, marker: Marker) -> Result<Value, DecodeError> {
        let n: u64 = match marker {
            Marker::Uint8 => self.read_u8()? as u64,
            Marker::Uint16 => u16::from_be_bytes(self.read_array::<2>()?) as u64,
            Marker::Uint32 => u32::from_be_bytes(self.read_array::<4>()?) as u64,
            _ => unreachable!("caller only passes a count-capable marker"),
        };
        let next = self.peek_u8()?;
        if next == Marker::Str.as_byte() {
            self.read_u8()?;
            self.read_string_payload(n as usize)
        } else if next == Marker::Bin.as_byte() {
            self.read_u8()?;
            self.read_binary_payload(n as usize)
        } else {
            Ok(Value::UnsignedInt(n))
        }
    }

    fn read_string_payload(&mut self, count: usize) -> Result<Value, DecodeError> {
        if count > self.policy.max_string_size() {
            return Err(DecodeError::policy(format!(
                "string of {count} bytes exceeds policy limit {}",
                self.policy.max_string_size()
            )));
        }
        let bytes = self.read_vec(count)?;
        String::from_utf8(bytes)
            .map(Value::String)
            .map_err(|_| DecodeError::invalid_utf8())
    }

    fn read_binary_payload(&mut self, count: usize) -> Result<Value, DecodeError> {
        if count > self.policy.max_binary_size() {
            return Err(DecodeError::policy(format!(
                "binary of {count} bytes exceeds policy limit {}",
                self.policy.max_binary_size()
            )));
        }
        Ok(Value::Binary(self.read_vec(count)?))
    }

    fn enter_container(&mut self) -> Result<(), DecodeError> {
        self.depth += 1;
        if self.depth > self.policy.max_value_depth() {
            return Err(DecodeError::policy(format!(
                "nesting depth {} exceeds policy limit {}",
                self.depth,
                self.policy.max_value_depth()
            )));
        }
        Ok(())
    }

    fn leave_container(&mut self) {
        self.depth -= 1;
    }

    fn check_children(&self, count: usize) -> Result<(), DecodeError> {
        if count > self.policy.max_children() {
            return Err(DecodeError::policy(format!(
                "{count} children exceeds policy limit {}",
                self.policy.max_children()
            )));
        }
        Ok(())
    }

    fn read_map(&mut self) -> Result<Value, DecodeError> {
        self.enter_container()?;
        let result = self.read_map_body();
        self.leave_container();
        result
    }

    fn read_map_body(&mut self) -> Result<Value, DecodeError> {
        let count = match self.read_count_or_end(Marker::ObjectEnd)? {
            None => return Ok(Value::new_map()),
            Some(n) => n,
        };
        self.check_children(count)?;
        trace!(count, "entering map");
        let mut map = HashMap::with_capacity(count);
        for _ in 0..count {
            let key_len = self.read_u8()? as usize;
            if key_len > self.policy.max_key_size() as usize {
                return Err(DecodeError::policy(format!(
                    "key of {key_len} bytes exceeds policy limit {}",
                    self.policy.max_key_size()
                )));
            }
            let key_bytes = self.read_vec(key_len)?;
            let key = String::from_utf8(key_bytes).map_err(|_| DecodeError::invalid_utf8())?;
            let value = self.read_value()?;
            map.insert(key, value);
        }
        let end = self.read_marker()?;
        if end != Marker::ObjectEnd {
            return Err(DecodeError::unexpected_marker("'}'", end.as_byte()));
        }
        Ok(Value::Map(map))
    }

    fn read_heterogeneous_array(&mut self) -> Result<Value, DecodeError> {
        self.enter_container()?;
        let result = self.read_heterogeneous_array_body();
        self.leave_container();
        result
    }

    fn read_heterogeneous_array_body(&mut self) -> Result<Value, DecodeError> {
        let count = match self.read_count_or_end(Marker::ArrayEnd)? {
            None => return Ok(Value::new_array()),
            Some(n) => n,
        };
        self.check_children(count)?;
        trace!(count, "entering heterogeneous array");
        let mut elements = Vec::with_capacity(count);
        for _ in 0..count {
            elements.push(self.read_value()?);
        }
        let end = self.read_marker()?;
        if end != Marker::ArrayEnd {
            return Err(DecodeError::unexpected_marker("']'", end.as_byte()));
        }
        Ok(Value::Array(elements))
    }

    fn read_homogeneous_array(&mut self) -> Result<Value, DecodeError> {
        self.enter_container()?;
        let result = self.read_homogeneous_array_body();
        self.leave_container();
        result
    }

    fn read_homogeneous_array_body(&mut self) -> Result<Value, DecodeError> {
        let element_marker = self.read_marker()?;
        if element_marker.fixed_width().is_none() {
            return Err(DecodeError::non_scalar_homogeneous_element(
                element_marker.as_byte(),
            ));
        }
        let count = match self.read_count_or_end(Marker::HomoArrayEnd)? {
            None => return Ok(Value::new_array()),
            Some(n) => n,
        };
        self.check_children(count)?;
        trace!(count, marker = %element_marker, "entering homogeneous array");
        let mut elements = Vec::with_capacity(count);
        for _ in 0..count {
            elements.push(self.read_scalar_payload(element_marker)?);
        }
        let end = self.read_marker()?;
        if end != Marker::HomoArrayEnd {
            return Err(DecodeError::unexpected_marker("')'", end.as_byte()));
        }
        Ok(Value::Array(elements))
    }

    fn read_scalar_payload(&mut self, marker: Marker) -> Result<Value, DecodeError> {
        match marker {
            Marker::Null => Ok(Value::Null),
            Marker::True => Ok(Value::Bool(true)),
            Marker::False => Ok(Value::Bool(false)),
            Marker::Char => Ok(Value::Char(self.read_u8()?)),
            Marker::Int8 => Ok(Value::SignedInt(self.read_u8()? as i8 as i64)),
            Marker::Uint8 => Ok(Value::UnsignedInt(self.read_u8()? as u64)),
            Marker::Int16 => Ok(Value::SignedInt(i16::from_be_bytes(self.read_array::<2>()?) as i64)),
            Marker::Uint16 => Ok(Value::UnsignedInt(u16::from_be_bytes(self.read_array::<2>()?) as u64)),
            Marker::Int32 => Ok(Value::SignedInt(i32::from_be_bytes(self.read_array::<4>()?) as i64)),
            Marker::Uint32 => Ok(Value::UnsignedInt(u32::from_be_bytes(self.read_array::<4>()?) as u64)),
            Marker::Int64 => Ok(Value::SignedInt(i64::from_be_bytes(self.read_array::<8>()?))),
            Marker::Uint64 => Ok(Value::UnsignedInt(u64::from_be_bytes(self.read_array::<8>()?))),
            Marker::Float32 => Ok(Value::Float(f32::from_be_bytes(self.read_array::<4>()?) as f64)),
            Marker::Float64 => Ok(Value::Float(f64::from_be_bytes(self.read_array::<8>()?))),
            other => Err(DecodeError::non_scalar_homogeneous_element(other.as_byte())),
        }
    }
}

impl<'s> Decoder<SliceReader<'s>> {
    /// Decode one `Value` from a borrowed byte slice.
    pub fn from_slice(slice: &'s [u8], policy: SizePolicy) -> Result<Value, DecodeError> {
        Decoder::new(SliceReader::new(slice), policy).decode_one()
    }
}

impl<R: std::io::Read> Decoder<IoReader<R>> {
    /// Decode one `Value` from any [`std::io::Read`].
    pub fn from_reader(reader: R, policy: SizePolicy) -> Result<Value, DecodeError> {
        Decoder::new(IoReader::new(reader), policy).decode_one()
    }
}

/// Decode one `Value` from a borrowed byte slice under `policy`.
pub fn from_slice(slice: &[u8], policy: SizePolicy) -> Result<Value, DecodeError> {
    Decoder::from_slice(slice, policy)
}

/// Decode one `Value` from any [`std::io::Read`] under `policy`.
pub fn from_reader<R: std::io::Read>(reader: R, policy: SizePolicy) -> Result<Value, DecodeError> {
    Decoder::from_reader(reader, policy)
}

/// Decode one `Value` from any [`crate::io::Read`] source under `policy`.
pub fn decode<R: Read>(reader: &mut R, policy: SizePolicy) -> Result<Value, DecodeError> {
    Decoder::new(reader, policy).decode_one()
}

/// Decode one `Value` from any [`crate::io::Read`] source into an existing
/// `Value`, under `policy`.
pub fn decode_into<R: Read>(
    reader: &mut R,
    policy: SizePolicy,
    out: &mut Value,
) -> Result<(), DecodeError> {
    *out = decode(reader, policy)?;
    Ok(())
}

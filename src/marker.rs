//! Wire markers: the single-byte alphabet that precedes every payload.

use std::convert::TryFrom;
use std::fmt::Display;

use crate::error::DecodeError;

/// A single-byte wire marker.
///
/// Every value on the wire is introduced by one of these bytes. Containers
/// (`{`, `[`, `(`) are closed by their matching end marker; everything else
/// is either a self-contained scalar or the prefix of a counted payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Marker {
    /// Null value, no payload.
    Null = b'n',
    /// Boolean `true`, no payload.
    True = b't',
    /// Boolean `false`, no payload.
    False = b'f',
    /// Single byte interpreted as a character.
    Char = b'c',

    /// 8-bit signed integer.
    Int8 = b'i',
    /// 8-bit unsigned integer.
    Uint8 = b'I',
    /// 16-bit big-endian signed integer.
    Int16 = b'j',
    /// 16-bit big-endian unsigned integer.
    Uint16 = b'J',
    /// 32-bit big-endian signed integer.
    Int32 = b'k',
    /// 32-bit big-endian unsigned integer.
    Uint32 = b'K',
    /// 64-bit big-endian signed integer.
    Int64 = b'l',
    /// 64-bit big-endian unsigned integer.
    Uint64 = b'L',

    /// 32-bit big-endian IEEE-754 float.
    Float32 = b'd',
    /// 64-bit big-endian IEEE-754 float.
    Float64 = b'D',

    /// Length-prefixed UTF-8-conventional string payload.
    Str = b's',
    /// Length-prefixed raw binary payload.
    Bin = b'b',

    /// Start of a map frame.
    ObjectStart = b'{',
    /// End of a map frame.
    ObjectEnd = b'}',
    /// Start of a heterogeneous array frame.
    ArrayStart = b'[',
    /// End of a heterogeneous array frame.
    ArrayEnd = b']',
    /// Start of a homogeneous array frame.
    HomoArrayStart = b'(',
    /// End of a homogeneous array frame.
    HomoArrayEnd = b')',

    /// Optional byte-size preamble inside an object.
    WidthHint = b'W',
}

impl Marker {
    /// The raw wire byte for this marker.
    pub const fn as_byte(self) -> u8 {
        self as u8
    }

    /// True for the three markers that may introduce a count
    /// (`Uint8`/`Uint16`/`Uint32`).
    pub const fn is_count_marker(self) -> bool {
        matches!(self, Marker::Uint8 | Marker::Uint16 | Marker::Uint32)
    }

    /// True for markers that carry no payload bytes of their own.
    pub const fn is_fixed_zero_width(self) -> bool {
        matches!(self, Marker::Null | Marker::True | Marker::False)
    }

    /// The fixed payload width in bytes for scalar markers, or `None` for
    /// markers whose payload length is not fixed (strings, binaries,
    /// containers).
    pub const fn fixed_width(self) -> Option<usize> {
        match self {
            Marker::Null | Marker::True | Marker::False => Some(0),
            Marker::Char | Marker::Int8 | Marker::Uint8 => Some(1),
            Marker::Int16 | Marker::Uint16 => Some(2),
            Marker::Int32 | Marker::Uint32 | Marker::Float32 => Some(4),
            Marker::Int64 | Marker::Uint64 | Marker::Float64 => Some(8),
            _ => None,
        }
    }
}

impl Display for Marker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}(0x{:02x})", self, self.as_byte())
    }
}

impl TryFrom<u8> for Marker {
    type Error = DecodeError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        let marker = match byte {
            b'n' => Marker::Null,
            b't' => Marker::True,
            b'f' => Marker::False,
            b'c' => Marker::Char,
            b'i' => Marker::Int8,
            b'I' => Marker::Uint8,
            b'j' => Marker::Int16,
            b'J' => Marker::Uint16,
            b'k' => Marker::Int32,
            b'K' => Marker::Uint32,
            b'l' => Marker::Int64,
            b'L' => Marker::Uint64,
            b'd' => Marker::Float32,
            b'D' => Marker::Float64,
            b's' => Marker::Str,
            b'b' => Marker::Bin,
            b'{' => Marker::ObjectStart,
            b'}' => Marker::ObjectEnd,
            b'[' => Marker::ArrayStart,
            b']' => Marker::ArrayEnd,
            b'(' => Marker::HomoArrayStart,
            b')' => Marker::HomoArrayEnd,
            b'W' => Marker::WidthHint,
            other => return Err(DecodeError::invalid_marker(other)),
        };
        Ok(marker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_every_marker() {
        let markers = [
            Marker::Null,
            Marker::True,
            Marker::False,
            Marker::Char,
            Marker::Int8,
            Marker::Uint8,
            Marker::Int16,
            Marker::Uint16,
            Marker::Int32,
            Marker::Uint32,
            Marker::Int64,
            Marker::Uint64,
            Marker::Float32,
            Marker::Float64,
            Marker::Str,
            Marker::Bin,
            Marker::ObjectStart,
            Marker::ObjectEnd,
            Marker::ArrayStart,
            Marker::ArrayEnd,
            Marker::HomoArrayStart,
            Marker::HomoArrayEnd,
            Marker::WidthHint,
        ];
        for m in markers {
            assert_eq!(Marker::try_from(m.as_byte()).unwrap(), m);
        }
    }

    #[test]
    fn rejects_unknown_byte() {
        assert!(Marker::try_from(0x00).is_err());
    }

    #[test]
    fn count_markers_are_exactly_the_unsigned_fixed_widths() {
        assert!(Marker::Uint8.is_count_marker());
        assert!(Marker::Uint16.is_count_marker());
        assert!(Marker::Uint32.is_count_marker());
        assert!(!Marker::Uint64.is_count_marker());
        assert!(!Marker::Int32.is_count_marker());
    }
}

//! The crate's error surface.
//!
//! Three families, matching the three places a caller can get a `Result`
//! back from: operating on a [`crate::Value`] directly, decoding bytes into
//! one, or encoding one out to bytes.

use std::fmt;

use crate::value::ValueKind;

/// Errors raised by [`crate::Value`] operations: indexing, `push_back`,
/// `contains`/`remove`, and strict typed casts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    /// The operation requires a specific variant and the value holds
    /// another.
    #[error("expected a value of kind {expected}, found {found:?}")]
    WrongType {
        /// Human-readable name of the kind the operation required.
        expected: &'static str,
        /// The kind actually found.
        found: ValueKind,
    },

    /// Integer indexing was out of bounds for an `Array`.
    #[error("index {index} out of bounds (len = {len})")]
    IndexOutOfBounds {
        /// The index that was requested.
        index: usize,
        /// The length of the array at the time of the request.
        len: usize,
    },

    /// String indexing found no such key (only used by the fallible,
    /// non-auto-vivifying accessors).
    #[error("no value for key `{0}`")]
    MissingKey(String),

    /// A strict typed cast (`TryFrom`) did not match the stored variant.
    ///
    /// This is the crate's `bad_value_cast` kind.
    #[error("bad value cast: expected {expected}, found {found:?}")]
    BadCast {
        /// Human-readable name of the type the cast required.
        expected: &'static str,
        /// The kind actually found.
        found: ValueKind,
    },

    /// A map key exceeded the one-byte length prefix's range (255 bytes).
    #[error("map key of {0} bytes exceeds the 255-byte wire limit")]
    KeyTooLong(usize),
}

impl ValueError {
    pub(crate) fn wrong_type(expected: &'static str, found: ValueKind) -> Self {
        ValueError::WrongType { expected, found }
    }

    pub(crate) fn bad_cast(expected: &'static str, found: ValueKind) -> Self {
        ValueError::BadCast { expected, found }
    }
}

/// Errors raised while decoding a byte stream into a [`crate::Value`].
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// Malformed framing, an invalid marker byte, or a premature
    /// end-of-stream.
    #[error("parse error: {0}")]
    Parse(String),

    /// A configured [`crate::policy::SizePolicy`] limit was exceeded.
    ///
    /// This is a subkind of the parse error, surfaced separately so callers
    /// can distinguish "malformed" from "too big/deep" without string
    /// matching.
    #[error("policy violation: {0}")]
    PolicyViolation(String),

    /// The underlying reader failed.
    #[error("io error reading from underlying source: {0}")]
    Io(#[from] std::io::Error),
}

impl DecodeError {
    pub(crate) fn invalid_marker(byte: u8) -> Self {
        DecodeError::Parse(format!("invalid marker byte 0x{byte:02x}"))
    }

    pub(crate) fn unexpected_marker(expected: &'static str, found: u8) -> Self {
        DecodeError::Parse(format!(
            "expected {expected}, found marker byte 0x{found:02x}"
        ))
    }

    pub(crate) fn invalid_utf8() -> Self {
        DecodeError::Parse("string payload is not valid UTF-8".to_string())
    }

    pub(crate) fn non_scalar_homogeneous_element(byte: u8) -> Self {
        DecodeError::Parse(format!(
            "homogeneous array element marker 0x{byte:02x} is not a scalar marker"
        ))
    }

    pub(crate) fn policy(msg: impl fmt::Display) -> Self {
        DecodeError::PolicyViolation(msg.to_string())
    }

    /// True if this error is (or wraps) a policy violation.
    pub fn is_policy_violation(&self) -> bool {
        matches!(self, DecodeError::PolicyViolation(_))
    }
}

/// Errors raised while encoding a [`crate::Value`] out to bytes.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// `Encoder::encode` was called with a root [`crate::Value`] that is
    /// not a `Map`.
    #[error("encoder root must be a Map, found {0:?}")]
    RootNotMap(ValueKind),

    /// A map key was longer than the 255-byte wire limit.
    #[error(transparent)]
    Key(#[from] ValueError),

    /// The underlying writer failed.
    #[error("io error writing to underlying sink: {0}")]
    Io(#[from] std::io::Error),
}

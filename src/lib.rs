#![deny(missing_docs, missing_debug_implementations)]

//! A self-describing, length-prefixed, big-endian binary interchange codec
//! in the Universal Binary JSON family.
//!
//! The crate provides a polymorphic in-memory value tree ([`Value`]) and a
//! streaming encoder/decoder pair ([`encode`]/[`decode`]) that serialize
//! that tree to and from a byte stream under a configurable [`SizePolicy`].
//!
//! # Quick start
//!
//! ```rust
//! use ubex::{to_vec, from_slice, SizePolicy, Value};
//!
//! let mut value = Value::new_map();
//! value["name"] = Value::from("X");
//! value["id"] = Value::from(9i64);
//!
//! let bytes = to_vec(&value).unwrap();
//! let decoded = from_slice(&bytes, SizePolicy::default()).unwrap();
//! assert_eq!(value, decoded);
//! ```
//!
//! # Wire format
//!
//! Every value on the wire is introduced by a single-byte [`Marker`]. Scalars
//! are narrowed to the smallest marker whose range holds the value; see
//! [`encode`] for the full frame grammar and narrowing rules.
//!
//! # Safety limits
//!
//! [`Decoder`] enforces a [`SizePolicy`] while reconstructing a tree from
//! untrusted bytes: nesting depth, total bytes, string/binary/key length,
//! and child counts are all hard ceilings. Build one with
//! [`SizePolicy::builder`], or use [`SizePolicy::default`].

pub mod decode;
pub mod encode;
pub mod error;
pub mod io;
pub mod marker;
pub mod policy;
pub mod value;

pub use decode::{decode, decode_into, from_reader, from_slice, Decoder};
pub use encode::{encode, to_vec, Encoder};
pub use error::{DecodeError, EncodeError, ValueError};
pub use marker::Marker;
pub use policy::{SizePolicy, SizePolicyBuilder};
pub use value::{Iter, Value, ValueKind};

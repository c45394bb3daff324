//! Encoder and decoder for DBOR (Data Binary Object Representation),
//! restricted to conformance level 2: `None`, integers in the combined
//! range −2⁶³ ..= 2⁶⁴−1, byte strings, UTF-8 strings and nested
//! sequences.
//!
//! Encoding is canonical: every value has exactly one wire form, so
//! `decode(encode(v)) == v` and `encode(decode(b)) == b` both hold.
//!
//! ```
//! use dbor::{decode, encode, Value};
//!
//! let value = Value::Sequence(vec![
//!     Value::None,
//!     Value::from(-2),
//!     Value::from("Oé"),
//! ]);
//! let bytes = encode(&value).unwrap();
//! assert_eq!(bytes, [0x86, 0xFF, 0x21, 0x63, 0x4F, 0xC3, 0xA9]);
//! assert_eq!(decode(&bytes).unwrap(), value);
//! ```

pub mod decode;
pub mod encode;
pub mod value;


#[cfg(test)]
mod encode_tests;


pub use decode::{decode, decode_with_depth, parse, parse_prefix, parse_sequence, FromDbor};
pub use encode::{emit, emit_sequence, encode, Encoder, ToDbor};
pub use value::{Int, Value};

/// Default limit on nested sequence levels, applied by both [`encode`]
/// and [`decode`]. Both operations recurse on the call stack, so inputs
/// nesting deeper than this fail with a `NestingTooDeep` error instead
/// of overflowing. [`decode_with_depth`] accepts a different bound.
pub const MAX_NESTING: usize = 1024;

//! # labelscheme — Encoding scheme codec for mesh-routing labels
//!
//! An *encoding scheme* is an ordered list of [`Form`]s. Each form says "values whose low
//! `prefix_len` bits match `prefix` are encoded in `bit_count` bits", which lets a router pack
//! interface numbers into a label with a variable-width prefix code.
//!
//! This crate reads and writes the compact binary form of a scheme and checks that a scheme is
//! usable before anything relies on it.
//!
//! ## Layers
//!
//! - [`bits`]: [`BitCursor`], which takes and places fields of up to 31 bits at the
//!   least-significant end of a byte buffer.
//! - [`codec`]: [`parse`] / [`serialize`] for a whole scheme (5-bit `prefix_len`, 5-bit
//!   `bit_count`, then the prefix, repeated until a zero `bit_count`).
//! - [`sanity`]: [`is_sane`], which proves a scheme is a well-formed prefix code.
//!
//! ## Example
//!
//! ```
//! use labelscheme::{is_sane, parse, serialize, Form};
//!
//! let forms = parse(&[0x81, 0x0c, 0x08]).unwrap();
//! assert_eq!(forms, vec![Form::new(1, 4, 1), Form::new(1, 8, 0)]);
//! assert!(is_sane(&forms).is_sane());
//! assert_eq!(serialize(&forms).unwrap(), vec![0x81, 0x0c, 0x08]);
//! ```

pub mod bits;
pub mod codec;
pub mod form;
pub mod hex;
pub mod sanity;
pub mod schemes;

pub use bits::BitCursor;
pub use codec::{encoded_len, parse, serialize, CodecError};
pub use form::{form_size, Form};
pub use sanity::{is_sane, SanityRule, Verdict};

//! Forms: the individual rules of an encoding scheme.
//!
//! A form says "values whose low `prefix_len` bits equal `prefix` are encoded in `bit_count`
//! bits". A scheme is an ordered slice of forms.

use crate::bits::low_mask;
use crate::hex;
use std::fmt;

/// Width of the `prefix_len` and `bit_count` wire fields.
pub const FIELD_WIDTH: u32 = 5;

/// Largest `prefix_len + bit_count` a label has room for.
pub const MAX_FORM_SIZE: u32 = 59;

/// One rule of an encoding scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Form {
    /// Number of prefix bits. 0 means the form matches everything.
    pub prefix_len: u8,
    /// Number of bits used to encode a value selected by this form.
    pub bit_count: u8,
    /// Prefix bits, right-justified (bit 0 is the first bit read off the wire).
    pub prefix: u32,
}

impl Form {
    pub const fn new(prefix_len: u8, bit_count: u8, prefix: u32) -> Self {
        Form {
            prefix_len,
            bit_count,
            prefix,
        }
    }

    /// Form of a fixed-width scheme: no prefix, every value takes `bit_count` bits.
    pub const fn fixed(bit_count: u8) -> Self {
        Form::new(0, bit_count, 0)
    }

    /// Build a form from the minimal big-endian byte view of its prefix.
    /// Bits above `prefix_len` are dropped.
    pub fn with_prefix_bytes(prefix_len: u8, bit_count: u8, prefix: &[u8]) -> Self {
        let value = prefix
            .iter()
            .fold(0u32, |acc, &b| (acc << 8) | u32::from(b));
        Form::new(prefix_len, bit_count, value & low_mask(u32::from(prefix_len)))
    }

    /// Bits one encoded value of this form occupies (`prefix_len + bit_count`).
    pub fn size(&self) -> u32 {
        u32::from(self.prefix_len) + u32::from(self.bit_count)
    }

    /// Bits this form occupies in a serialized scheme.
    pub fn encoded_bits(&self) -> u32 {
        u32::from(self.prefix_len) + 2 * FIELD_WIDTH
    }

    /// Prefix as the minimal big-endian byte sequence holding `prefix_len` bits, unused high
    /// bits of the first byte zeroed. Empty when `prefix_len` is 0.
    pub fn prefix_bytes(&self) -> Vec<u8> {
        let len = u32::from(self.prefix_len);
        let n = ((len + 7) / 8).min(4) as usize;
        (self.prefix & low_mask(len)).to_be_bytes()[4 - n..].to_vec()
    }
}

/// `prefix_len + bit_count` of `form`.
pub fn form_size(form: &Form) -> u32 {
    form.size()
}

impl fmt::Display for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "prefix_len={} bit_count={} prefix={}",
            self.prefix_len,
            self.bit_count,
            hex::encode(&self.prefix_bytes())
        )
    }
}

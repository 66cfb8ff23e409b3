//! Parse and serialize encoding schemes.
//!
//! Bits are read from the least-significant end of a [`BitCursor`] over the wire bytes. Each
//! form is laid out as:
//!
//! | Field | Width |
//! |-------|-------|
//! | `prefix_len` | 5 bits |
//! | `bit_count` | 5 bits |
//! | `prefix` | `prefix_len` bits |
//!
//! A `bit_count` of zero is the terminator. The terminator's `prefix_len` slot and every bit
//! after it are padding and must be zero; anything else is reported as
//! [`CodecError::InvalidEncoding`].
//!
//! [`serialize`] writes the forms in reverse so that the first form lands at the
//! least-significant end, and sizes the buffer to exactly the bits the forms need.

use crate::bits::{low_mask, BitCursor, MAX_FIELD_BITS};
use crate::form::{Form, FIELD_WIDTH};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("invalid encoding: nonzero bits after terminator (following {forms} form(s))")]
    InvalidEncoding { forms: usize },
    #[error("form {index}: {field} {value:#x} does not fit in {width} bits")]
    FieldOverflow {
        index: usize,
        field: &'static str,
        value: u32,
        width: u32,
    },
    #[error("form {index}: zero bit_count would read back as the terminator")]
    TerminatorForm { index: usize },
}

/// Decode a scheme from wire bytes.
///
/// Input shorter than a declared field is read as if zero-padded.
pub fn parse(bytes: &[u8]) -> Result<Vec<Form>, CodecError> {
    let mut cursor = BitCursor::from_wire(bytes);
    let mut forms = Vec::new();
    loop {
        let prefix_len = cursor.consume(FIELD_WIDTH);
        let bit_count = cursor.consume(FIELD_WIDTH);
        if bit_count < 1 {
            if prefix_len != 0 || !cursor.is_zero() {
                return Err(CodecError::InvalidEncoding { forms: forms.len() });
            }
            debug!(forms = forms.len(), bytes = bytes.len(), "parsed scheme");
            return Ok(forms);
        }
        // Both fields are 5 bits wide, so the casts and the prefix width are in range.
        let prefix = cursor.consume(prefix_len);
        forms.push(Form::new(prefix_len as u8, bit_count as u8, prefix));
    }
}

/// Encode a scheme to wire bytes.
///
/// For a canonical buffer `b` (one [`parse`] accepts, with no trailing zero bytes and no
/// truncated fields), `serialize(&parse(b)?)? == b`.
pub fn serialize(forms: &[Form]) -> Result<Vec<u8>, CodecError> {
    for (index, form) in forms.iter().enumerate() {
        check_wire_fields(index, form)?;
    }
    let mut cursor = BitCursor::zeroed(encoded_len(forms));
    for form in forms.iter().rev() {
        cursor.inject(u32::from(form.prefix_len), form.prefix);
        cursor.inject(FIELD_WIDTH, u32::from(form.bit_count));
        cursor.inject(FIELD_WIDTH, u32::from(form.prefix_len));
    }
    let out = cursor.into_wire();
    debug!(forms = forms.len(), bytes = out.len(), "serialized scheme");
    Ok(out)
}

/// Total bits the serialized forms occupy, excluding padding.
pub fn encoded_bits(forms: &[Form]) -> usize {
    forms.iter().map(|f| f.encoded_bits() as usize).sum()
}

/// Bytes [`serialize`] produces for `forms`.
pub fn encoded_len(forms: &[Form]) -> usize {
    (encoded_bits(forms) + 7) / 8
}

fn check_wire_fields(index: usize, form: &Form) -> Result<(), CodecError> {
    let field_max = low_mask(FIELD_WIDTH);
    let prefix_len = u32::from(form.prefix_len);
    if prefix_len > field_max.min(MAX_FIELD_BITS) {
        return Err(CodecError::FieldOverflow {
            index,
            field: "prefix_len",
            value: prefix_len,
            width: FIELD_WIDTH,
        });
    }
    if u32::from(form.bit_count) > field_max {
        return Err(CodecError::FieldOverflow {
            index,
            field: "bit_count",
            value: u32::from(form.bit_count),
            width: FIELD_WIDTH,
        });
    }
    if form.bit_count == 0 {
        return Err(CodecError::TerminatorForm { index });
    }
    if form.prefix & !low_mask(prefix_len) != 0 {
        return Err(CodecError::FieldOverflow {
            index,
            field: "prefix",
            value: form.prefix,
            width: prefix_len,
        });
    }
    Ok(())
}

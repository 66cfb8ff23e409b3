//! Reference schemes with known wire encodings.

use crate::form::Form;

/// Single-form scheme where every value takes `bit_count` bits.
pub fn fixed_width(bit_count: u8) -> Vec<Form> {
    vec![Form::fixed(bit_count)]
}

/// Fixed 4-bit scheme. Wire: `8000`.
pub fn f4() -> Vec<Form> {
    fixed_width(4)
}

/// Fixed 8-bit scheme. Wire: `0001`.
pub fn f8() -> Vec<Form> {
    fixed_width(8)
}

/// 4 or 8 bits, selected by a 1-bit prefix. Wire: `810c08`.
pub fn v48() -> Vec<Form> {
    vec![Form::new(1, 4, 0b1), Form::new(1, 8, 0b0)]
}

/// 3, 5 or 8 bits, selected by a 1- or 2-bit prefix. Wire: `6114458100`.
pub fn v358() -> Vec<Form> {
    vec![
        Form::new(1, 3, 0b1),
        Form::new(2, 5, 0b10),
        Form::new(2, 8, 0b00),
    ]
}

/// Names accepted by [`by_name`].
pub const NAMES: &[&str] = &["f4", "f8", "v48", "v358"];

/// Look up a reference scheme by name (case-insensitive).
pub fn by_name(name: &str) -> Option<Vec<Form>> {
    match name.to_ascii_lowercase().as_str() {
        "f4" => Some(f4()),
        "f8" => Some(f8()),
        "v48" => Some(v48()),
        "v358" => Some(v358()),
        _ => None,
    }
}

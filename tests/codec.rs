//! Integration tests: wire vectors, round trips and corruption detection for the scheme codec.
//!
//! ## Wire layout recap
//!
//! The wire bytes are read as one integer whose least-significant byte comes first. Per form,
//! from the low end: 5 bits `prefix_len`, 5 bits `bit_count`, `prefix_len` bits of prefix.
//! A zero `bit_count` terminates; everything after must be zero.
//!
//! | Test | Behaviour |
//! |------|-----------|
//! | `test_reference_vectors_*` | The reference schemes decode from and encode to their known hex |
//! | `test_roundtrip_random_sane_schemes` | `parse(serialize(s)) == s` for generated sane schemes |
//! | `test_roundtrip_wire_*` | `serialize(parse(b)) == b` for canonical buffers |
//! | `test_padding_flip_*` | Flipping padding bits never yields the original scheme |
//! | `test_trailing_zero_bytes_*` | Extra zero bytes parse to the same scheme (non-canonical) |
//! | `test_parse_large_buffer_*` | Parse time grows linearly with input length |

use labelscheme::codec::encoded_bits;
use labelscheme::{hex, is_sane, parse, schemes, serialize, CodecError, Form};
use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};

const VECTORS: &[(&str, &str)] = &[
    ("f4", "8000"),
    ("f8", "0001"),
    ("v48", "810c08"),
    ("v358", "6114458100"),
];

fn decode_hex(s: &str) -> Vec<u8> {
    hex::decode(s).expect("hex")
}

/// Flip bit `bit` of the wire integer (bit 0 is the low bit of the first byte).
fn flip(wire: &[u8], bit: usize) -> Vec<u8> {
    let mut out = wire.to_vec();
    out[bit / 8] ^= 1 << (bit % 8);
    out
}

/// Random sane scheme: either fixed width, or forms sharing one prefix length with distinct
/// prefixes and strictly ascending bit counts.
fn random_sane_scheme(rng: &mut StdRng) -> Vec<Form> {
    if rng.gen_bool(0.2) {
        return schemes::fixed_width(rng.gen_range(1..=31));
    }
    let n = rng.gen_range(2..=8usize);
    let min_len = (usize::BITS - (n - 1).leading_zeros()).max(1);
    let prefix_len = rng.gen_range(min_len..=12);
    let mut bit_counts: Vec<usize> = sample(rng, 31, n).into_iter().map(|b| b + 1).collect();
    bit_counts.sort_unstable();
    let prefixes = sample(rng, 1 << prefix_len, n);
    bit_counts
        .iter()
        .zip(prefixes.iter())
        .map(|(&b, p)| Form::new(prefix_len as u8, b as u8, p as u32))
        .collect()
}

/// Unary-style prefix code: form k has prefix `1` after k zeros; the last form is all zeros.
fn unary_scheme(n: usize) -> Vec<Form> {
    (0..n)
        .map(|k| {
            let bit_count = (3 * k + 2) as u8;
            if k + 1 < n {
                Form::new(k as u8 + 1, bit_count, 1 << k)
            } else {
                Form::new((n - 1) as u8, bit_count, 0)
            }
        })
        .collect()
}

#[test]
fn test_reference_vectors_parse() {
    for (name, wire) in VECTORS {
        let parsed = parse(&decode_hex(wire)).expect("parse");
        assert_eq!(parsed, schemes::by_name(name).unwrap(), "{}", name);
        assert!(is_sane(&parsed).is_sane(), "{}", name);
    }
}

#[test]
fn test_reference_vectors_serialize() {
    for (name, wire) in VECTORS {
        let forms = schemes::by_name(name).unwrap();
        let encoded = serialize(&forms).expect("serialize");
        assert_eq!(hex::encode(&encoded), *wire, "{}", name);
    }
}

#[test]
fn test_reference_vectors_prefix_bytes() {
    let forms = parse(&decode_hex("6114458100")).expect("parse");
    let prefixes: Vec<String> = forms.iter().map(|f| hex::encode(&f.prefix_bytes())).collect();
    assert_eq!(prefixes, vec!["01", "02", "00"]);
    assert_eq!(forms[1], Form::with_prefix_bytes(2, 5, &decode_hex("02")));
}

#[test]
fn test_roundtrip_random_sane_schemes() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..500 {
        let forms = random_sane_scheme(&mut rng);
        assert!(is_sane(&forms).is_sane(), "{:?}", forms);
        let wire = serialize(&forms).expect("serialize");
        assert!(wire.len() * 8 - encoded_bits(&forms) < 8);
        assert_eq!(parse(&wire).expect("parse"), forms);
    }
}

#[test]
fn test_roundtrip_unequal_prefix_lengths() {
    for n in 2..=6 {
        let forms = unary_scheme(n);
        assert!(is_sane(&forms).is_sane(), "{:?}", forms);
        let wire = serialize(&forms).expect("serialize");
        assert_eq!(parse(&wire).expect("parse"), forms);
    }
}

#[test]
fn test_roundtrip_wire_reference() {
    for (_, wire) in VECTORS {
        let bytes = decode_hex(wire);
        let forms = parse(&bytes).expect("parse");
        assert_eq!(serialize(&forms).expect("serialize"), bytes);
    }
}

#[test]
fn test_roundtrip_wire_random_bytes() {
    // Any buffer that parses and has no trailing zero byte re-encodes to itself.
    let mut rng = StdRng::seed_from_u64(7);
    let mut checked = 0;
    for _ in 0..5000 {
        let len = rng.gen_range(1..=6);
        let mut bytes: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
        if let Some(last) = bytes.last_mut() {
            if *last == 0 {
                *last = 1;
            }
        }
        if let Ok(forms) = parse(&bytes) {
            if forms.is_empty() {
                continue;
            }
            let encoded = serialize(&forms).expect("serialize");
            if encoded.len() == bytes.len() {
                assert_eq!(encoded, bytes);
                checked += 1;
            }
        }
    }
    assert!(checked > 0);
}

#[test]
fn test_padding_flip_in_terminator_prefix_slot() {
    for (name, wire) in VECTORS {
        let bytes = decode_hex(wire);
        let forms = parse(&bytes).unwrap();
        let end = encoded_bits(&forms);
        for bit in end..(end + 5).min(bytes.len() * 8) {
            assert!(
                matches!(parse(&flip(&bytes, bit)), Err(CodecError::InvalidEncoding { .. })),
                "{} bit {}",
                name,
                bit
            );
        }
    }
}

#[test]
fn test_padding_flip_never_yields_sane_original() {
    for (name, wire) in VECTORS {
        let bytes = decode_hex(wire);
        let forms = parse(&bytes).unwrap();
        for bit in encoded_bits(&forms)..bytes.len() * 8 {
            match parse(&flip(&bytes, bit)) {
                Err(CodecError::InvalidEncoding { .. }) => {}
                Ok(corrupt) => {
                    // The flip landed in the terminator's bit_count slot and added a form.
                    assert_ne!(corrupt, forms, "{} bit {}", name, bit);
                    assert!(!is_sane(&corrupt).is_sane(), "{} bit {}", name, bit);
                }
                Err(e) => panic!("{} bit {}: unexpected {}", name, bit, e),
            }
        }
    }
}

#[test]
fn test_padding_flip_after_terminator() {
    for (name, wire) in VECTORS {
        let mut bytes = decode_hex(wire);
        let forms = parse(&bytes).unwrap();
        bytes.extend_from_slice(&[0, 0, 0]);
        for bit in encoded_bits(&forms) + 10..bytes.len() * 8 {
            assert_eq!(
                parse(&flip(&bytes, bit)),
                Err(CodecError::InvalidEncoding { forms: forms.len() }),
                "{} bit {}",
                name,
                bit
            );
        }
    }
}

#[test]
fn test_trailing_zero_bytes_are_non_canonical() {
    let mut bytes = decode_hex("810c08");
    bytes.push(0);
    let forms = parse(&bytes).expect("parse");
    assert_eq!(forms, schemes::v48());
    assert_eq!(serialize(&forms).unwrap(), decode_hex("810c08"));
}

#[test]
fn test_truncated_input_reads_as_zero_padded() {
    // 0x8000 with its zero second byte dropped still decodes as the 4-bit fixed scheme.
    assert_eq!(parse(&[0x80]).expect("parse"), schemes::f4());
}

#[test]
fn test_parse_large_buffer_is_linear() {
    // 1 MiB of 0xff: 204_600 full 41-bit forms (prefix_len 31, bit_count 31), then 8 set bits
    // that read as prefix_len 31, bit_count 7 with a zero prefix, then the terminator.
    let bytes = vec![0xff; 1 << 20];
    let start = Instant::now();
    let forms = parse(&bytes).expect("parse");
    let elapsed = start.elapsed();
    assert_eq!(forms.len(), 204_601);
    assert_eq!(forms[0], Form::new(31, 31, 0x7fff_ffff));
    assert_eq!(forms[forms.len() - 1], Form::new(31, 7, 0));
    assert!(
        elapsed < Duration::from_secs(5),
        "parsing 1 MiB took {:?}",
        elapsed
    );
}

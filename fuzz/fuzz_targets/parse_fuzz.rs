//! Parse fuzz target: feed arbitrary bytes to the scheme parser.
//! The parser must not panic, and any scheme it returns must re-encode and decode to itself.
//! Build with: cargo fuzz run parse_fuzz (requires nightly and cargo fuzz).

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    let forms = match labelscheme::parse(data) {
        Ok(f) => f,
        Err(_) => return,
    };
    let _ = labelscheme::is_sane(&forms);
    let wire = labelscheme::serialize(&forms).expect("parsed forms always encode");
    assert_eq!(labelscheme::parse(&wire).expect("re-encoded scheme parses"), forms);
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run parse_fuzz");
}

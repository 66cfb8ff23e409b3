//! Inspect encoding schemes: decode, sanity-check and re-encode.
//!
//! Usage:
//!   scheme_tool [OPTIONS] [SCHEME ...]
//!   scheme_tool < schemes.txt
//!
//! Each SCHEME is a hex string (`810c08`, `0x81 0c 08`) or the name of a reference scheme
//! (`f4`, `f8`, `v48`, `v358`). With no arguments, reads one scheme per line from stdin; blank
//! lines and lines starting with `#` are skipped.
//!
//! Options:
//!   --human, -H    Human-readable output
//!   --verbose, -v  Debug logging on stderr
//!
//! Exit code 1 if any scheme fails to decode or is not sane.

use anyhow::{anyhow, Context};
use labelscheme::{hex, is_sane, parse, schemes, serialize, Form, Verdict};
use std::io::{self, BufRead};
use tracing::{debug, info};

#[derive(Clone, Copy)]
enum OutputStyle {
    Compact,
    Human,
}

struct Report {
    wire: Vec<u8>,
    forms: Vec<Form>,
    verdict: Verdict,
    canonical: bool,
}

fn wire_bytes(input: &str) -> anyhow::Result<Vec<u8>> {
    if let Some(forms) = schemes::by_name(input) {
        return Ok(serialize(&forms)?);
    }
    hex::decode_formatted(input).ok_or_else(|| anyhow!("not a hex string or scheme name"))
}

fn inspect(input: &str) -> anyhow::Result<Report> {
    let wire = wire_bytes(input)?;
    let forms = parse(&wire)?;
    let verdict = is_sane(&forms);
    let canonical = serialize(&forms).context("re-encoding parsed scheme")? == wire;
    debug!(input, forms = forms.len(), canonical, "inspected scheme");
    Ok(Report {
        wire,
        forms,
        verdict,
        canonical,
    })
}

fn print_report(input: &str, r: &Report, style: OutputStyle) {
    let verdict = match r.verdict {
        Verdict::Sane => "sane".to_string(),
        Verdict::Insane { .. } => format!("insane ({})", r.verdict.reason()),
    };
    let canonical = if r.canonical { "" } else { ", non-canonical" };
    match style {
        OutputStyle::Compact => {
            println!(
                "{}: {} form(s), {}{}",
                hex::encode(&r.wire),
                r.forms.len(),
                verdict,
                canonical
            );
            for form in &r.forms {
                println!("  {}", form);
            }
        }
        OutputStyle::Human => {
            println!("{}", input);
            println!("    wire:    {}", hex::encode(&r.wire));
            println!("    verdict: {}", r.verdict);
            if !r.canonical {
                println!("    note:    re-encodes to {}", encoded_or_error(&r.forms));
            }
            for (i, form) in r.forms.iter().enumerate() {
                println!(
                    "    form {}: prefix {:>2} bit(s) = {:<8} value {:>2} bit(s) (size {})",
                    i,
                    form.prefix_len,
                    hex::encode(&form.prefix_bytes()),
                    form.bit_count,
                    form.size()
                );
            }
        }
    }
}

fn encoded_or_error(forms: &[Form]) -> String {
    match serialize(forms) {
        Ok(bytes) => hex::encode(&bytes),
        Err(e) => e.to_string(),
    }
}

fn main() -> anyhow::Result<()> {
    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let style = if let Some(pos) = args.iter().position(|a| a == "--human" || a == "-H") {
        args.remove(pos);
        OutputStyle::Human
    } else {
        OutputStyle::Compact
    };
    let verbose = if let Some(pos) = args.iter().position(|a| a == "--verbose" || a == "-v") {
        args.remove(pos);
        true
    } else {
        false
    };

    tracing_subscriber::fmt()
        .with_max_level(if verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(io::stderr)
        .init();

    let inputs = if args.is_empty() {
        let mut lines = Vec::new();
        for line in io::stdin().lock().lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            lines.push(line.to_string());
        }
        lines
    } else {
        args
    };

    let mut failed = 0usize;
    let mut insane = 0usize;
    for input in &inputs {
        match inspect(input) {
            Ok(report) => {
                if !report.verdict.is_sane() {
                    insane += 1;
                }
                print_report(input, &report, style);
            }
            Err(e) => {
                failed += 1;
                eprintln!("{}: {:#}", input, e);
            }
        }
    }

    info!(
        schemes = inputs.len(),
        failed, insane, "inspection finished"
    );
    if failed > 0 || insane > 0 {
        std::process::exit(1);
    }
    Ok(())
}

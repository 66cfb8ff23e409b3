//! Sanity checks for decoded schemes.
//!
//! A scheme must pass [`is_sane`] before it is used to encode or decode labels. The checks run
//! in a fixed order and the first failure wins.
//!
//! ## Rules
//!
//! - **Non-empty, at most 31 forms**: each form needs a distinct non-zero 5-bit `bit_count`.
//! - **Fixed width** (one form): no prefix, `bit_count` in 1..=31.
//! - **Variable width** (two or more forms), for each form in order:
//!   - `prefix_len` in 1..=31 and `bit_count` in 1..=31;
//!   - `prefix_len + bit_count` no more than 59;
//!   - `bit_count` strictly greater than the previous form's;
//!   - no other form has the same low `prefix_len` prefix bits.

use crate::bits::MAX_FIELD_BITS;
use crate::form::{Form, MAX_FORM_SIZE};
use std::fmt;
use tracing::debug;

/// Most forms a scheme can hold.
pub const MAX_FORMS: usize = 31;

/// Identifies which check rejected a scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SanityRule {
    /// The scheme has no forms.
    NoForms,
    /// More forms than distinct `bit_count` values.
    TooManyForms,
    /// A fixed-width form carries a prefix.
    FixedWidthPrefix,
    /// `bit_count` is zero or wider than 31.
    BitCountRange,
    /// A variable-width form has no prefix, or one wider than 31.
    MissingPrefix,
    /// `prefix_len + bit_count` does not fit in a label.
    ExceedsLabelSpace,
    /// `bit_count` does not increase from the previous form.
    NotAscending,
    /// Two forms cannot be told apart by their prefixes.
    IndistinguishablePrefix,
}

impl SanityRule {
    pub fn reason(self) -> &'static str {
        match self {
            SanityRule::NoForms => "no forms",
            SanityRule::TooManyForms => "too many forms",
            SanityRule::FixedWidthPrefix => "fixed width encoding prefixLen must be 0",
            SanityRule::BitCountRange => "bitCount must be non-zero and no more than 31",
            SanityRule::MissingPrefix => "prefix must exist in order to distinguish between forms",
            SanityRule::ExceedsLabelSpace => "cannot be represented in usable space",
            SanityRule::NotAscending => "forms must be in ascending order of bitCount",
            SanityRule::IndistinguishablePrefix => "forms must be distinguishable by their prefixes",
        }
    }
}

/// Outcome of [`is_sane`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Sane,
    Insane {
        rule: SanityRule,
        /// Index of the offending form, when one is to blame.
        form: Option<usize>,
    },
}

impl Verdict {
    pub fn is_sane(&self) -> bool {
        matches!(self, Verdict::Sane)
    }

    pub fn rule(&self) -> Option<SanityRule> {
        match self {
            Verdict::Sane => None,
            Verdict::Insane { rule, .. } => Some(*rule),
        }
    }

    /// Human-readable reason; `"none"` for a sane scheme.
    pub fn reason(&self) -> &'static str {
        self.rule().map_or("none", SanityRule::reason)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Sane => write!(f, "sane"),
            Verdict::Insane {
                rule,
                form: Some(i),
            } => write!(f, "insane: form {}: {}", i, rule.reason()),
            Verdict::Insane { rule, form: None } => write!(f, "insane: {}", rule.reason()),
        }
    }
}

/// Check that `forms` is well formed and that its forms are distinguishable by prefix.
pub fn is_sane(forms: &[Form]) -> Verdict {
    let verdict = check(forms);
    if let Verdict::Insane { rule, form } = verdict {
        debug!(?rule, ?form, forms = forms.len(), "insane scheme");
    }
    verdict
}

fn insane(rule: SanityRule, form: Option<usize>) -> Verdict {
    Verdict::Insane { rule, form }
}

fn bit_count_in_range(form: &Form) -> bool {
    (1..=MAX_FIELD_BITS).contains(&u32::from(form.bit_count))
}

fn check(forms: &[Form]) -> Verdict {
    match forms {
        [] => insane(SanityRule::NoForms, None),
        _ if forms.len() > MAX_FORMS => insane(SanityRule::TooManyForms, None),
        [only] => check_fixed(only),
        _ => check_variable(forms),
    }
}

fn check_fixed(form: &Form) -> Verdict {
    if form.prefix_len != 0 || form.prefix != 0 {
        return insane(SanityRule::FixedWidthPrefix, Some(0));
    }
    if !bit_count_in_range(form) {
        return insane(SanityRule::BitCountRange, Some(0));
    }
    Verdict::Sane
}

fn check_variable(forms: &[Form]) -> Verdict {
    for (i, form) in forms.iter().enumerate() {
        if !(1..=MAX_FIELD_BITS).contains(&u32::from(form.prefix_len)) {
            return insane(SanityRule::MissingPrefix, Some(i));
        }
        if !bit_count_in_range(form) {
            return insane(SanityRule::BitCountRange, Some(i));
        }
        if form.size() > MAX_FORM_SIZE {
            return insane(SanityRule::ExceedsLabelSpace, Some(i));
        }
        if i > 0 && form.bit_count <= forms[i - 1].bit_count {
            return insane(SanityRule::NotAscending, Some(i));
        }
        let collides = forms
            .iter()
            .enumerate()
            .any(|(j, other)| j != i && prefixes_collide(form, other));
        if collides {
            return insane(SanityRule::IndistinguishablePrefix, Some(i));
        }
    }
    Verdict::Sane
}

/// Compare both prefixes left-aligned in a 64-bit field that keeps only `form.prefix_len`
/// low bits. The width comes from `form` alone, so the relation is not symmetric; callers
/// check every ordered pair.
fn prefixes_collide(form: &Form, other: &Form) -> bool {
    let shift = 64 - u32::from(form.prefix_len);
    (u64::from(form.prefix) << shift) == (u64::from(other.prefix) << shift)
}

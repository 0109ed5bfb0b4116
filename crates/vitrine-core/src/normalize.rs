//! # Field Normalizer
//!
//! Pure text formatting of raw user input into canonical display form.
//!
//! The storefront formats three fields as the customer types: the CPF
//! (national ID), the WhatsApp phone number, and the CEP (postal code).
//! Each keystroke routes the raw field value through [`format_digits`],
//! so the function must behave well on partial input and must be
//! idempotent (re-normalizing an already-normalized value is a no-op).
//!
//! ## Formatting Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Strip everything that is not an ASCII digit                         │
//! │  2. Walk the format template, e.g. "###.###.###-##"                     │
//! │     • '#' consumes the next digit                                       │
//! │     • literals are buffered and only emitted when a digit follows       │
//! │  3. Stop when the digits run out (partial input degrades gracefully)    │
//! │                                                                         │
//! │  "12345678901"  + Cpf   →  "123.456.789-01"                             │
//! │  "123456"       + Cpf   →  "123.456"         (no trailing separator)    │
//! │  "123.456"      + Cpf   →  "123.456"         (idempotent)               │
//! │  "21999998888"  + Phone →  "(21) 99999-8888"                            │
//! │  "20000000"     + Cep   →  "20000-000"                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Digits beyond the template capacity are dropped, mirroring the input
//! max-length the form enforces.

use serde::{Deserialize, Serialize};

// =============================================================================
// Formats
// =============================================================================

/// The digit-based formats the checkout form normalizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DigitFormat {
    /// CPF national ID: 11 digits, "###.###.###-##".
    Cpf,
    /// Brazilian mobile phone: 11 digits, "(##) #####-####".
    Phone,
    /// CEP postal code: 8 digits, "#####-###".
    Cep,
}

impl DigitFormat {
    /// The fill template: '#' marks a digit slot, anything else is a
    /// literal separator re-inserted at that position.
    const fn template(self) -> &'static str {
        match self {
            DigitFormat::Cpf => "###.###.###-##",
            DigitFormat::Phone => "(##) #####-####",
            DigitFormat::Cep => "#####-###",
        }
    }

    /// Number of digits the format holds when complete.
    pub const fn digit_count(self) -> usize {
        match self {
            DigitFormat::Cpf | DigitFormat::Phone => 11,
            DigitFormat::Cep => 8,
        }
    }
}

// =============================================================================
// Normalization
// =============================================================================

/// Strips all non-digit characters from a raw field value.
///
/// The validator works on stripped values so that formatted and
/// unformatted input validate identically.
pub fn digits(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Normalizes a raw field value into canonical display form.
///
/// Strips non-digits, then re-inserts the format's literal separators at
/// their fixed positions. Partial input yields a partial result; no
/// error is ever raised. Idempotent: `format_digits(format_digits(x))`
/// equals `format_digits(x)`.
pub fn format_digits(raw: &str, format: DigitFormat) -> String {
    let mut remaining = raw.chars().filter(char::is_ascii_digit);
    let mut out = String::new();
    let mut pending = String::new();

    for slot in format.template().chars() {
        if slot == '#' {
            match remaining.next() {
                Some(digit) => {
                    // Separators only land once a digit follows them,
                    // so partial values never end in "." or "-"
                    out.push_str(&pending);
                    pending.clear();
                    out.push(digit);
                }
                None => break,
            }
        } else {
            pending.push(slot);
        }
    }

    out
}

/// Formats a CPF as "###.###.###-##".
pub fn format_cpf(raw: &str) -> String {
    format_digits(raw, DigitFormat::Cpf)
}

/// Formats a phone number as "(##) #####-####".
pub fn format_phone(raw: &str) -> String {
    format_digits(raw, DigitFormat::Phone)
}

/// Formats a CEP as "#####-###".
pub fn format_cep(raw: &str) -> String {
    format_digits(raw, DigitFormat::Cep)
}

// =============================================================================
// Unit Tests
// =============================================================================

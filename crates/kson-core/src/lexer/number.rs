//! Number scanning and classification.
//!
//! KSON numbers follow the JSON grammar with one extension: leading zeros
//! are allowed. The scanner consumes the maximal number-shaped run (so bad
//! trailers like `12abc` become one diagnosed token rather than two values)
//! and produces a normalized form used for round-tripping and transcoding:
//! leading zeros are stripped from the integer digits (`-0` is preserved),
//! the fraction and exponent are kept verbatim.

use crate::message::MessageKind;

/// Outcome of scanning a number at the start of `text`.
pub struct NumberScan {
    /// Bytes consumed from the input.
    pub len: usize,
    pub result: Result<ParsedNumber, MessageKind>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedNumber {
    pub kind: NumberKind,
    pub normalized: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumberKind {
    Integer(i64),
    Decimal(f64),
}

/// Scan a number at the start of `text`. `text` begins with a digit or `-`.
pub fn scan_number(text: &str) -> NumberScan {
    let bytes = text.as_bytes();
    let mut i = 0;

    let negative = bytes.first() == Some(&b'-');
    if negative {
        i += 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let int_digits = &text[int_start..i];

    if int_digits.is_empty() {
        // A bare minus; the caller only gets here for `-` not followed by
        // whitespace, so this is a stray sign.
        return NumberScan {
            len: i.max(1),
            result: Err(MessageKind::IllegalMinusSign),
        };
    }

    let mut fraction = "";
    let mut has_dot = false;
    if i < bytes.len() && bytes[i] == b'.' {
        has_dot = true;
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        fraction = &text[frac_start..i];
        if fraction.is_empty() {
            return NumberScan {
                len: i,
                result: Err(MessageKind::DanglingDecimal),
            };
        }
    }

    let mut exponent = "";
    let mut has_exp = false;
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        has_exp = true;
        let exp_indicator = i;
        i += 1;
        if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
            i += 1;
        }
        let exp_digit_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_digit_start {
            return NumberScan {
                len: i,
                result: Err(MessageKind::DanglingExpIndicator),
            };
        }
        exponent = &text[exp_indicator..i];
    }

    // Absorb any alphanumeric/dot trailer so `12abc` or `1.2.3` is a single
    // bad token instead of a number followed by surprise content.
    let trailer_start = i;
    while i < bytes.len() {
        let c = text[i..].chars().next().unwrap_or('\0');
        if c.is_alphanumeric() || c == '.' || c == '_' {
            i += c.len_utf8();
        } else {
            break;
        }
    }
    if i > trailer_start {
        return NumberScan {
            len: i,
            result: Err(MessageKind::InvalidDigits),
        };
    }

    let normalized = normalize(negative, int_digits, has_dot, fraction, exponent);

    let result = if !has_dot && !has_exp {
        match normalized.parse::<i64>() {
            Ok(v) => Ok(ParsedNumber {
                kind: NumberKind::Integer(v),
                normalized,
            }),
            Err(_) => Err(MessageKind::IntegerOverflow),
        }
    } else {
        match normalized.parse::<f64>() {
            Ok(v) => Ok(ParsedNumber {
                kind: NumberKind::Decimal(v),
                normalized,
            }),
            // The grammar above only admits f64-parseable shapes; huge
            // magnitudes round to infinity rather than failing.
            Err(_) => Err(MessageKind::InvalidDigits),
        }
    };

    NumberScan { len: i, result }
}

/// Strip leading zeros from the integer digits, keeping `-0` and a lone `0`.
fn normalize(negative: bool, int_digits: &str, has_dot: bool, fraction: &str, exponent: &str) -> String {
    let stripped = int_digits.trim_start_matches('0');
    let int_part = if stripped.is_empty() { "0" } else { stripped };

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(int_part);
    if has_dot {
        out.push('.');
        out.push_str(fraction);
    }
    out.push_str(exponent);
    out
}

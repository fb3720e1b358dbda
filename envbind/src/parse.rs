//! Literal grammars for the built-in scalar kinds

use std::borrow::Cow;
use std::time::Duration;

use chrono::TimeDelta;

/// A literal that does not fit the grammar or range of its kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LiteralError {
    #[error("invalid {kind} literal {literal:?}")]
    Syntax { kind: &'static str, literal: String },

    #[error("{kind} literal {literal:?} is out of range")]
    Range { kind: &'static str, literal: String },

    #[error("missing unit in duration {literal:?}")]
    MissingUnit { literal: String },

    #[error("unknown unit {unit:?} in duration {literal:?}")]
    UnknownUnit { unit: String, literal: String },

    #[error("duration {literal:?} is negative")]
    Negative { literal: String },
}

impl LiteralError {
    fn syntax(kind: &'static str, literal: &str) -> Self {
        Self::Syntax {
            kind,
            literal: literal.to_string(),
        }
    }

    pub(crate) fn range(kind: &'static str, literal: &str) -> Self {
        Self::Range {
            kind,
            literal: literal.to_string(),
        }
    }
}

const INTEGER: &str = "integer";
const FLOAT: &str = "float";
const DURATION: &str = "duration";

/// Parse a boolean token.
///
/// Accepts `1`, `t`, `T`, `TRUE`, `true`, `True` and their false
/// counterparts `0`, `f`, `F`, `FALSE`, `false`, `False`.
pub fn parse_bool(text: &str) -> Result<bool, LiteralError> {
    match text {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(LiteralError::syntax("boolean", text)),
    }
}

/// Parse a signed integer that must fit in `bits` bits.
///
/// Decimal by default; `0x`, `0o` and `0b` prefixes select another base and
/// a bare leading `0` means octal. Underscores may separate digits.
pub fn parse_int(text: &str, bits: u32) -> Result<i64, LiteralError> {
    let (negative, unsigned) = split_sign(text);
    let magnitude = magnitude(unsigned, 64).map_err(|failure| failure.into_error(INTEGER, text))?;

    let cutoff = 1u64 << (bits - 1);
    if (!negative && magnitude >= cutoff) || (negative && magnitude > cutoff) {
        return Err(LiteralError::range(INTEGER, text));
    }

    if negative {
        Ok(0i64.wrapping_sub_unsigned(magnitude))
    } else {
        i64::try_from(magnitude).map_err(|_| LiteralError::range(INTEGER, text))
    }
}

/// Parse an unsigned integer that must fit in `bits` bits.
///
/// Same grammar as [`parse_int`] without the sign.
pub fn parse_uint(text: &str, bits: u32) -> Result<u64, LiteralError> {
    magnitude(text, bits).map_err(|failure| failure.into_error(INTEGER, text))
}

/// Parse a floating point literal at `bits` (32 or 64) of precision.
///
/// Accepts decimal literals with an optional exponent, hexadecimal literals
/// with a binary exponent (`0x1.8p3`), `inf`, `infinity` and `nan` in any
/// case. A finite literal too large for the precision is a range error.
pub fn parse_float(text: &str, bits: u32) -> Result<f64, LiteralError> {
    let literal: Cow<'_, str> = if text.contains('_') {
        if !underscore_ok(text) {
            return Err(LiteralError::syntax(FLOAT, text));
        }
        Cow::Owned(text.replace('_', ""))
    } else {
        Cow::Borrowed(text)
    };

    let (negative, unsigned) = split_sign(&literal);
    let value = if let Some(hex) = strip_hex_prefix(unsigned) {
        let magnitude = hex_float(hex).ok_or_else(|| LiteralError::syntax(FLOAT, text))?;
        let magnitude = if bits == 32 {
            f64::from(magnitude as f32)
        } else {
            magnitude
        };
        if negative {
            -magnitude
        } else {
            magnitude
        }
    } else if bits == 32 {
        literal
            .parse::<f32>()
            .map(f64::from)
            .map_err(|_| LiteralError::syntax(FLOAT, text))?
    } else {
        literal
            .parse::<f64>()
            .map_err(|_| LiteralError::syntax(FLOAT, text))?
    };

    if value.is_infinite() && !is_infinity(&literal) {
        return Err(LiteralError::range(FLOAT, text));
    }
    Ok(value)
}

/// Parse a duration such as `300ms`, `-1.5h` or `2h45m` into nanoseconds.
///
/// A duration is an optionally signed sequence of decimal numbers, each
/// with an optional fraction and a mandatory unit: `ns`, `us` (or `µs`),
/// `ms`, `s`, `m`, `h`. A lone `0` needs no unit.
pub fn parse_duration(text: &str) -> Result<i64, LiteralError> {
    let (negative, mut rest) = split_sign(text);
    if rest == "0" {
        return Ok(0);
    }
    if rest.is_empty() {
        return Err(LiteralError::syntax(DURATION, text));
    }

    let mut total: u64 = 0;
    while !rest.is_empty() {
        if !rest.starts_with(|c: char| c == '.' || c.is_ascii_digit()) {
            return Err(LiteralError::syntax(DURATION, text));
        }

        let (whole, after_whole) =
            leading_int(rest).ok_or_else(|| LiteralError::range(DURATION, text))?;
        let has_whole = after_whole.len() != rest.len();
        rest = after_whole;

        let mut fraction = 0u64;
        let mut scale = 1f64;
        let mut has_fraction = false;
        if let Some(after_dot) = rest.strip_prefix('.') {
            let (digits, digits_scale, after_digits) = leading_fraction(after_dot);
            has_fraction = after_digits.len() != after_dot.len();
            fraction = digits;
            scale = digits_scale;
            rest = after_digits;
        }
        if !has_whole && !has_fraction {
            return Err(LiteralError::syntax(DURATION, text));
        }

        let unit_len = rest
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(rest.len());
        if unit_len == 0 {
            return Err(LiteralError::MissingUnit {
                literal: text.to_string(),
            });
        }
        let (unit, after_unit) = rest.split_at(unit_len);
        let unit_nanos = unit_nanos(unit).ok_or_else(|| LiteralError::UnknownUnit {
            unit: unit.to_string(),
            literal: text.to_string(),
        })?;

        let mut value = whole
            .checked_mul(unit_nanos)
            .filter(|value| *value <= 1 << 63)
            .ok_or_else(|| LiteralError::range(DURATION, text))?;
        if fraction > 0 {
            value = value.saturating_add((fraction as f64 * (unit_nanos as f64 / scale)) as u64);
            if value > 1 << 63 {
                return Err(LiteralError::range(DURATION, text));
            }
        }
        total = total
            .checked_add(value)
            .filter(|total| *total <= 1 << 63)
            .ok_or_else(|| LiteralError::range(DURATION, text))?;

        rest = after_unit;
    }

    if negative {
        Ok(0i64.wrapping_sub_unsigned(total))
    } else {
        i64::try_from(total).map_err(|_| LiteralError::range(DURATION, text))
    }
}

/// Parse a duration into a signed [`TimeDelta`].
pub fn parse_time_delta(text: &str) -> Result<TimeDelta, LiteralError> {
    parse_duration(text).map(TimeDelta::nanoseconds)
}

/// Parse a duration into a [`Duration`], which cannot be negative.
pub fn parse_std_duration(text: &str) -> Result<Duration, LiteralError> {
    let nanos = parse_duration(text)?;
    u64::try_from(nanos)
        .map(Duration::from_nanos)
        .map_err(|_| LiteralError::Negative {
            literal: text.to_string(),
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Failure {
    Syntax,
    Range,
}

impl Failure {
    fn into_error(self, kind: &'static str, literal: &str) -> LiteralError {
        match self {
            Failure::Syntax => LiteralError::syntax(kind, literal),
            Failure::Range => LiteralError::range(kind, literal),
        }
    }
}

fn split_sign(text: &str) -> (bool, &str) {
    if let Some(rest) = text.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = text.strip_prefix('+') {
        (false, rest)
    } else {
        (false, text)
    }
}

/// Base implied by the literal's prefix, and the digits after it.
fn split_radix(text: &str) -> (u32, &str) {
    let bytes = text.as_bytes();
    if bytes.first() != Some(&b'0') {
        return (10, text);
    }
    if bytes.len() >= 3 {
        match bytes[1].to_ascii_lowercase() {
            b'b' => return (2, &text[2..]),
            b'o' => return (8, &text[2..]),
            b'x' => return (16, &text[2..]),
            _ => {}
        }
    }
    (8, &text[1..])
}

fn magnitude(text: &str, bits: u32) -> Result<u64, Failure> {
    if text.is_empty() {
        return Err(Failure::Syntax);
    }
    let (radix, digits) = split_radix(text);
    if digits.contains('_') && !underscore_ok(text) {
        return Err(Failure::Syntax);
    }

    let max = if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    };
    let mut value: u64 = 0;
    for c in digits.chars() {
        if c == '_' {
            continue;
        }
        let digit = c.to_digit(radix).ok_or(Failure::Syntax)?;
        value = value
            .checked_mul(u64::from(radix))
            .and_then(|value| value.checked_add(u64::from(digit)))
            .ok_or(Failure::Range)?;
    }
    if value > max {
        return Err(Failure::Range);
    }
    Ok(value)
}

/// Underscores must sit between digits, or between a base prefix and a digit.
fn underscore_ok(text: &str) -> bool {
    let (_, text) = split_sign(text);
    let bytes = text.as_bytes();

    // '^' start, '0' digit or prefix, '_' underscore, '!' anything else
    let mut saw = b'^';
    let mut start = 0;
    let mut hex = false;
    if bytes.len() >= 2
        && bytes[0] == b'0'
        && matches!(bytes[1].to_ascii_lowercase(), b'b' | b'o' | b'x')
    {
        start = 2;
        saw = b'0';
        hex = bytes[1].to_ascii_lowercase() == b'x';
    }

    for &byte in &bytes[start..] {
        if byte.is_ascii_digit() || (hex && byte.is_ascii_hexdigit()) {
            saw = b'0';
            continue;
        }
        if byte == b'_' {
            if saw != b'0' {
                return false;
            }
            saw = b'_';
            continue;
        }
        if saw == b'_' {
            return false;
        }
        saw = b'!';
    }
    saw != b'_'
}

fn strip_hex_prefix(text: &str) -> Option<&str> {
    text.strip_prefix("0x").or_else(|| text.strip_prefix("0X"))
}

/// Magnitude of a hexadecimal float after its `0x` prefix: hex digits with
/// an optional point, then a mandatory `p` and a decimal power of two.
fn hex_float(text: &str) -> Option<f64> {
    let (mantissa, exponent) = text.split_once(['p', 'P'])?;
    let exponent: i32 = exponent.parse().ok()?;
    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }

    // Keep the top 60 bits; lower digits only mark the value as inexact
    let mut bits: u64 = 0;
    let mut shift: i32 = 0;
    for (digits, in_fraction) in [(whole, false), (fraction, true)] {
        for c in digits.chars() {
            let digit = c.to_digit(16)?;
            if bits >> 56 == 0 {
                bits = (bits << 4) | u64::from(digit);
                if in_fraction {
                    shift -= 4;
                }
            } else {
                if digit != 0 {
                    bits |= 1;
                }
                if !in_fraction {
                    shift += 4;
                }
            }
        }
    }
    Some(scale_pow2(bits as f64, exponent.saturating_add(shift)))
}

/// `value * 2^exponent` without overflowing the intermediate power.
fn scale_pow2(mut value: f64, mut exponent: i32) -> f64 {
    while exponent > 1000 {
        value *= 2f64.powi(1000);
        exponent -= 1000;
    }
    while exponent < -1000 {
        value *= 2f64.powi(-1000);
        exponent += 1000;
    }
    value * 2f64.powi(exponent)
}

fn is_infinity(literal: &str) -> bool {
    let (_, unsigned) = split_sign(literal);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

/// Leading decimal digits of `text`, or `None` on overflow past 2^63.
fn leading_int(text: &str) -> Option<(u64, &str)> {
    let end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    let mut value: u64 = 0;
    for byte in text[..end].bytes() {
        if value > (1 << 63) / 10 {
            return None;
        }
        value = value * 10 + u64::from(byte - b'0');
        if value > 1 << 63 {
            return None;
        }
    }
    Some((value, &text[end..]))
}

/// Leading fraction digits of `text` with their scale; digits past the
/// representable precision are consumed but ignored.
fn leading_fraction(text: &str) -> (u64, f64, &str) {
    let end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    let mut value: u64 = 0;
    let mut scale = 1f64;
    let mut overflow = false;
    for byte in text[..end].bytes() {
        if overflow {
            continue;
        }
        if value > ((1 << 63) - 1) / 10 {
            overflow = true;
            continue;
        }
        let next = value * 10 + u64::from(byte - b'0');
        if next > 1 << 63 {
            overflow = true;
            continue;
        }
        value = next;
        scale *= 10.0;
    }
    (value, scale, &text[end..])
}

fn unit_nanos(unit: &str) -> Option<u64> {
    match unit {
        "ns" => Some(1),
        "us" | "\u{00b5}s" | "\u{03bc}s" => Some(1_000),
        "ms" => Some(1_000_000),
        "s" => Some(1_000_000_000),
        "m" => Some(60 * 1_000_000_000),
        "h" => Some(3_600 * 1_000_000_000),
        _ => None,
    }
}

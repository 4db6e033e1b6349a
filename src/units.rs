//! Numeric input parsing and engineering-notation formatting.
//!
//! Text fields accept either `.` or `,` as the decimal separator and an
//! optional multiplier suffix (`4.7k`, `100n`, `2,2 uF`). Following the bench
//! tools this suite replaces, a lower- or upper-case `m` means mega.

use thiserror::Error;

/// Errors produced while parsing a numeric text field.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// The field was empty or only whitespace.
    #[error("Value is empty")]
    Empty,
    /// The text is not a number the parser understands.
    #[error("Invalid number: '{0}'")]
    InvalidNumber(String),
}

/// Multiplier for an engineering suffix, keyed on its first letter.
fn suffix_multiplier(suffix: &str) -> f64 {
    match suffix.chars().next() {
        Some('p') => 1e-12,
        Some('n') => 1e-9,
        Some('u') | Some('µ') => 1e-6,
        Some('k') => 1e3,
        Some('m') => 1e6,
        Some('g') => 1e9,
        // Unit names such as "v", "a", "hz" or "ohm" carry no scaling.
        _ => 1.0,
    }
}

/// Normalise separators and case. Returns `None` for blank input.
fn normalise(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.replace(',', ".").to_lowercase())
}

/// Split `text` into its leading numeric part and the rest.
///
/// The numeric part may carry an exponent (`1e3`, `2.2e-6`). An `e` not
/// followed by digits belongs to the rest.
fn split_number(text: &str) -> (&str, &str) {
    let bytes = text.as_bytes();
    let sign = usize::from(matches!(bytes.first(), Some(b'-' | b'+')));
    let mut end = sign
        + bytes[sign..]
            .iter()
            .take_while(|b| b.is_ascii_digit() || **b == b'.')
            .count();

    if bytes.get(end) == Some(&b'e') {
        let exponent_sign = usize::from(matches!(bytes.get(end + 1), Some(b'-' | b'+')));
        let start = end + 1 + exponent_sign;
        let exponent_end = start + bytes[start..].iter().take_while(|b| b.is_ascii_digit()).count();
        if exponent_end > start {
            end = exponent_end;
        }
    }
    text.split_at(end)
}

/// Parse a plain decimal number, accepting `,` as decimal separator.
///
/// Scientific notation (`1e3`) is accepted since `f64::from_str` handles it.
pub fn parse_number(text: &str) -> Result<f64, ParseError> {
    let normalised = normalise(text).ok_or(ParseError::Empty)?;
    let value: f64 = normalised
        .parse()
        .map_err(|_| ParseError::InvalidNumber(text.trim().to_string()))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ParseError::InvalidNumber(text.trim().to_string()))
    }
}

/// Parse a number with an optional engineering suffix.
///
/// ```ignore
/// assert_eq!(parse_value("4.7k")?, 4700.0);
/// assert_eq!(parse_value("100n")?, 100e-9);
/// ```
pub fn parse_value(text: &str) -> Result<f64, ParseError> {
    let normalised = normalise(text).ok_or(ParseError::Empty)?;
    let invalid = || ParseError::InvalidNumber(text.trim().to_string());

    let (number, rest) = split_number(&normalised);
    let number: f64 = number.parse().map_err(|_| invalid())?;

    let suffix = rest.trim_start();
    if !suffix.chars().all(|c| c.is_alphabetic() || c == 'Ω' || c == 'ω') {
        return Err(invalid());
    }

    let value = number * suffix_multiplier(suffix);
    if value.is_finite() {
        Ok(value)
    } else {
        Err(invalid())
    }
}

/// Parse an optional field: blank text is `Ok(None)`.
pub fn parse_optional_value(text: &str) -> Result<Option<f64>, ParseError> {
    match parse_value(text) {
        Ok(value) => Ok(Some(value)),
        Err(ParseError::Empty) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Format a frequency as Hz, kHz or MHz with two decimals.
pub fn format_frequency(hz: f64) -> String {
    if hz >= 1e6 {
        format!("{:.2} MHz", hz / 1e6)
    } else if hz >= 1e3 {
        format!("{:.2} kHz", hz / 1e3)
    } else {
        format!("{:.2} Hz", hz)
    }
}

/// Format a resistance as Ω, kΩ or MΩ with two decimals.
pub fn format_resistance(ohms: f64) -> String {
    if ohms >= 1e6 {
        format!("{:.2} MΩ", ohms / 1e6)
    } else if ohms >= 1e3 {
        format!("{:.2} kΩ", ohms / 1e3)
    } else {
        format!("{:.2} Ω", ohms)
    }
}

/// Format a capacitance as pF, nF or µF with two decimals.
pub fn format_capacitance(farads: f64) -> String {
    let pf = farads * 1e12;
    if pf >= 1e6 {
        format!("{:.2} µF", pf / 1e6)
    } else if pf >= 1e3 {
        format!("{:.2} nF", pf / 1e3)
    } else {
        format!("{:.2} pF", pf)
    }
}

/// Format a duration in seconds as s, ms or µs.
pub fn format_seconds(seconds: f64) -> String {
    if seconds >= 1.0 {
        format!("{:.3} s", seconds)
    } else if seconds >= 1e-3 {
        format!("{:.3} ms", seconds * 1e3)
    } else {
        format!("{:.3} µs", seconds * 1e6)
    }
}

/// Format a number without trailing zeros (`4.70` -> `4.7`, `100.0` -> `100`).
pub fn format_compact(value: f64) -> String {
    let text = format!("{:.6}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

/// Format a resistance compactly, as printed next to color-band results.
pub fn format_resistance_compact(ohms: f64) -> String {
    if ohms >= 1e6 {
        format!("{} MΩ", format_compact(ohms / 1e6))
    } else if ohms >= 1e3 {
        format!("{} kΩ", format_compact(ohms / 1e3))
    } else {
        format!("{} Ω", format_compact(ohms))
    }
}

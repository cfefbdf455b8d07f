//! Literal parsing for default values, rule bounds and textual setters
//!
//! Duration grammar: a sequence of decimal numbers, each with an optional
//! fraction and a unit suffix, such as `300ms`, `1.5h` or `2h45m`. Valid
//! units are `ns`, `us` (or `µs`), `ms`, `s`, `m`, `h`. A bare `0` is allowed.
//! Negative durations cannot be represented and are rejected.

use std::time::Duration;

use super::types::{TypeTag, Value};

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Parses `raw` into a value of type `kind`.
pub fn parse(kind: TypeTag, raw: &str) -> Result<Value, String> {
    match kind {
        TypeTag::String => Ok(Value::String(raw.to_string())),
        TypeTag::Int => raw
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|e| format!("invalid int '{}': {}", raw, e)),
        TypeTag::Float => {
            let v = raw
                .parse::<f64>()
                .map_err(|e| format!("invalid float '{}': {}", raw, e))?;
            if !v.is_finite() {
                return Err(format!("float '{}' is not finite", raw));
            }
            Ok(Value::Float(v))
        }
        TypeTag::Bool => parse_bool(raw).map(Value::Bool),
        TypeTag::Duration => parse_duration(raw).map(Value::Duration),
    }
}

fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        _ => Err(format!("invalid bool '{}'", raw)),
    }
}

/// Parses a duration literal such as `30s` or `1m30s`.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    if input.starts_with('-') {
        return Err(format!("negative duration '{}' is not supported", input));
    }
    let mut rest = input.strip_prefix('+').unwrap_or(input);
    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(format!("invalid duration '{}'", input));
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(|| format!("missing unit in duration '{}'", input))?;
        if number_len == 0 {
            return Err(format!("invalid duration '{}'", input));
        }
        let (number, tail) = rest.split_at(number_len);

        let unit_len = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_len);

        let scale = unit_scale(unit)
            .ok_or_else(|| format!("unknown unit '{}' in duration '{}'", unit, input))?;
        let nanos = scale_number(number, scale)
            .ok_or_else(|| format!("invalid duration '{}'", input))?;
        total = total
            .checked_add(nanos)
            .ok_or_else(|| format!("duration '{}' overflows", input))?;
        rest = tail;
    }

    u64::try_from(total)
        .map(Duration::from_nanos)
        .map_err(|_| format!("duration '{}' overflows", input))
}

fn unit_scale(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        "us" | "µs" | "μs" => Some(NANOS_PER_MICRO),
        "ms" => Some(NANOS_PER_MILLI),
        "s" => Some(NANOS_PER_SEC),
        "m" => Some(60 * NANOS_PER_SEC),
        "h" => Some(3600 * NANOS_PER_SEC),
        _ => None,
    }
}

/// Converts `12.5` with `scale` nanoseconds per unit into nanoseconds.
/// Fraction digits beyond nanosecond precision are truncated.
fn scale_number(number: &str, scale: u128) -> Option<u128> {
    let (whole, frac) = match number.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (number, ""),
    };
    if (whole.is_empty() && frac.is_empty()) || frac.contains('.') {
        return None;
    }

    let whole: u128 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let mut nanos = whole.checked_mul(scale)?;

    let mut divisor: u128 = 1;
    let mut frac_value: u128 = 0;
    for digit in frac.chars().take(18) {
        frac_value = frac_value * 10 + u128::from(digit.to_digit(10)?);
        divisor *= 10;
    }
    nanos = nanos.checked_add(frac_value * scale / divisor)?;
    Some(nanos)
}

/// Renders a duration in the same grammar `parse_duration` accepts.
///
/// Spans under one second use the largest fitting sub-second unit
/// (`1.5ms`); longer spans use `h`, `m` and `s` (`1h0m30s`).
pub fn format_duration(d: Duration) -> String {
    let nanos = d.as_nanos();
    if nanos == 0 {
        return "0s".to_string();
    }
    if nanos < NANOS_PER_MICRO {
        return format!("{}ns", nanos);
    }
    if nanos < NANOS_PER_MILLI {
        return format!("{}µs", decimal(nanos, NANOS_PER_MICRO, 3));
    }
    if nanos < NANOS_PER_SEC {
        return format!("{}ms", decimal(nanos, NANOS_PER_MILLI, 6));
    }

    let secs = d.as_secs();
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = u128::from(secs % 60) * NANOS_PER_SEC + u128::from(d.subsec_nanos());

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{}h", hours));
    }
    if hours > 0 || minutes > 0 {
        out.push_str(&format!("{}m", minutes));
    }
    out.push_str(&format!("{}s", decimal(seconds, NANOS_PER_SEC, 9)));
    out
}

/// `value / unit` as a decimal string with trailing zeros trimmed.
fn decimal(value: u128, unit: u128, width: usize) -> String {
    let whole = value / unit;
    let rem = value % unit;
    if rem == 0 {
        return whole.to_string();
    }
    let frac = format!("{:0width$}", rem, width = width);
    format!("{}.{}", whole, frac.trim_end_matches('0'))
}

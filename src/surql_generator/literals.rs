//! Text forms of scalar literals.

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};

use super::escape::quote_str;
use crate::surql_ir::Number;

const SECONDS_PER_YEAR: u64 = 365 * SECONDS_PER_DAY;
const SECONDS_PER_WEEK: u64 = 7 * SECONDS_PER_DAY;
const SECONDS_PER_DAY: u64 = 24 * SECONDS_PER_HOUR;
const SECONDS_PER_HOUR: u64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_MINUTE: u64 = 60;
const NANOS_PER_MILLI: u32 = 1_000_000;
const NANOS_PER_MICRO: u32 = 1_000;

/// `1y2w3d4h5m6s7ms8us9ns`, skipping zero units; a zero duration is `0ns`.
pub fn format_duration(duration: &Duration) -> String {
    let mut secs = duration.as_secs();
    let mut nanos = duration.subsec_nanos();

    if secs == 0 && nanos == 0 {
        return "0ns".to_string();
    }

    let years = secs / SECONDS_PER_YEAR;
    secs %= SECONDS_PER_YEAR;
    let weeks = secs / SECONDS_PER_WEEK;
    secs %= SECONDS_PER_WEEK;
    let days = secs / SECONDS_PER_DAY;
    secs %= SECONDS_PER_DAY;
    let hours = secs / SECONDS_PER_HOUR;
    secs %= SECONDS_PER_HOUR;
    let minutes = secs / SECONDS_PER_MINUTE;
    secs %= SECONDS_PER_MINUTE;
    let millis = nanos / NANOS_PER_MILLI;
    nanos %= NANOS_PER_MILLI;
    let micros = nanos / NANOS_PER_MICRO;
    nanos %= NANOS_PER_MICRO;

    let mut out = String::new();
    for (amount, unit) in [
        (years, "y"),
        (weeks, "w"),
        (days, "d"),
        (hours, "h"),
        (minutes, "m"),
        (secs, "s"),
        (millis as u64, "ms"),
        (micros as u64, "us"),
        (nanos as u64, "ns"),
    ] {
        if amount > 0 {
            out.push_str(&amount.to_string());
            out.push_str(unit);
        }
    }
    out
}

/// `d"2025-05-15T00:00:00Z"`, RFC 3339 in UTC with only as many sub-second digits as needed.
pub fn format_datetime(datetime: &DateTime<Utc>) -> String {
    format!(
        "d{}",
        quote_str(&datetime.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    )
}

pub fn format_f64(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 {
            "math::INF".to_string()
        } else {
            "math::NEG_INF".to_string()
        }
    } else if value.fract() == 0.0 {
        // Integral floats need a suffix or they would read back as integers
        format!("{}f", value)
    } else {
        value.to_string()
    }
}

pub fn format_f32(value: f32) -> String {
    if value.is_nan() || value.is_infinite() {
        format_f64(value as f64)
    } else if value.fract() == 0.0 {
        format!("{}f", value)
    } else {
        value.to_string()
    }
}

pub fn format_number(number: &Number) -> String {
    match number {
        Number::Int32(v) => v.to_string(),
        Number::Int64(v) => v.to_string(),
        Number::Float32(v) => format_f32(*v),
        Number::Float64(v) => format_f64(*v),
        Number::Decimal(v) => format!("{}dec", v),
    }
}

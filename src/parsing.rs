use chrono::{DateTime, Utc};
use serde_json::Value;
use std::time::Duration;

/// Parses a timeout such as `2s`, `500ms`, `1m` or a bare number of seconds.
pub fn parse_duration(q: &str) -> Option<Duration> {
    let q = q.trim();
    if q.is_empty() {
        return None;
    }

    // Order matters: "ms" has to be stripped before "s"
    const UNITS_MS: &[(&str, f64)] = &[
        ("ms", 1.0),
        ("s", 1000.0),
        ("m", 60_000.0),
        ("h", 3_600_000.0),
    ];

    let (number, multiplier) = UNITS_MS
        .iter()
        .find_map(|(suf, mul)| q.strip_suffix(suf).map(|stripped| (stripped, *mul)))
        .unwrap_or((q, 1000.0));

    let value = number.trim().parse::<f64>().ok()?;
    if !value.is_finite() || value <= 0.0 {
        return None;
    }
    Duration::try_from_secs_f64(value * multiplier / 1000.0).ok()
}

/// Sample values come back from the query API as strings; integral JSON
/// numbers are accepted too.
pub fn parse_free_slots(value: &Value) -> Option<i64> {
    match value {
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Number(n) if n.is_u64() => n.as_i64(),
        Value::Number(n) => n.as_i64().or_else(|| {
            // i64::MAX as f64 rounds up to 2^63, hence the strict upper bound
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        _ => None,
    }
}

/// Converts a `seconds.fraction` sample timestamp into a UTC instant.
pub fn parse_sample_time(value: &Value) -> Option<DateTime<Utc>> {
    let ts = value.as_f64()?;
    if !ts.is_finite() {
        return None;
    }
    let secs = ts.floor();
    let mut nanos = ((ts - secs) * 1e9).round() as u32;
    let mut secs = secs as i64;
    if nanos >= 1_000_000_000 {
        secs += 1;
        nanos = 0;
    }
    DateTime::from_timestamp(secs, nanos)
}

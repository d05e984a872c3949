// ABOUTME: Parsing of thumbnail time offsets into std Durations.
// ABOUTME: Supports plain seconds, Normal Play Time (HH:MM:SS.fff / MM:SS.fff), and human duration strings.

use std::time::Duration;

/// Parses a time offset into a Duration.
/// Supports:
/// - Plain seconds, optionally fractional ("30", "12.5")
/// - HH:MM:SS(.fff) and MM:SS(.fff)
/// - Human durations like "1m30s" or "2 minutes"
/// Returns None if the text is blank or does not parse.
pub fn parse_time_offset(s: &str) -> Option<Duration> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(secs) = parse_seconds(s) {
        return Some(secs);
    }

    if s.contains(':') {
        return parse_clock(s);
    }

    if s.len() > MAX_HUMAN_LEN || has_exponent(s) {
        return None;
    }
    parse_duration::parse(s).ok()
}

/// Longest human duration string handed to parse_duration.
const MAX_HUMAN_LEN: usize = 32;

/// parse_duration expands exponents without bound, so "1e10000000" never finishes promptly.
fn has_exponent(s: &str) -> bool {
    s.as_bytes()
        .windows(2)
        .any(|w| (w[0].is_ascii_digit() || w[0] == b'.') && matches!(w[1], b'e' | b'E'))
}

/// Seconds with an optional fraction, kept exact to the nanosecond.
fn parse_seconds(s: &str) -> Option<Duration> {
    let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
    if whole.is_empty() && frac.is_empty() {
        return None;
    }
    if !whole.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let secs: u64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let nanos = frac
        .bytes()
        .take(9)
        .enumerate()
        .map(|(i, b)| u32::from(b - b'0') * 10u32.pow(8 - i as u32))
        .sum();
    Some(Duration::new(secs, nanos))
}

fn parse_clock(s: &str) -> Option<Duration> {
    let parts: Vec<&str> = s.split(':').collect();
    let (hours, mins, secs) = match parts.as_slice() {
        [m, sec] => ("0", *m, *sec),
        [h, m, sec] => (*h, *m, *sec),
        _ => return None,
    };

    let hours: u64 = hours.parse().ok()?;
    let mins: u64 = mins.parse().ok()?;
    let secs = parse_seconds(secs)?;
    let whole = hours.checked_mul(3600)?.checked_add(mins.checked_mul(60)?)?;
    Duration::from_secs(whole).checked_add(secs)
}

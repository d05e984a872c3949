// ABOUTME: Best-effort conversion of raw attribute text into typed optional values.
// ABOUTME: Every function is total: unparsable or missing input yields None or Medium::Unknown.

use crate::media::Medium;

/// Parses a signed integer made of an optional sign and digits only.
/// Surrounding whitespace is ignored; partial numbers such as "12abc" or "4.5" yield None.
pub fn parse_int(text: Option<&str>) -> Option<i64> {
    let text = text?.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<i64>().ok()
}

/// Parses an integer and narrows it to the field's unsigned type.
/// Negative or out-of-range values yield None.
pub fn parse_count<T: TryFrom<i64>>(text: Option<&str>) -> Option<T> {
    parse_int(text).and_then(|n| T::try_from(n).ok())
}

/// Parses case-insensitive "true"/"false".
pub fn parse_bool(text: Option<&str>) -> Option<bool> {
    let text = text?.trim();
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Maps the `medium` attribute onto the closed classification.
pub fn parse_medium(text: Option<&str>) -> Medium {
    match text.map(|t| t.trim().to_ascii_lowercase()).as_deref() {
        Some("image") => Medium::Image,
        Some("audio") => Medium::Audio,
        Some("video") => Medium::Video,
        Some("document") => Medium::Document,
        Some("executable") => Medium::Executable,
        _ => Medium::Unknown,
    }
}

/// Keeps text attributes that carry something other than whitespace.
pub fn non_blank(text: Option<&str>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty()).map(str::to_string)
}

//! Sanitizer for free-form generated text
//!
//! The generative source returns prose that should contain JSON but often
//! wraps it in code fences or commentary. The pipeline here is explicit:
//! strip a fence, try a direct parse, fall back to extracting the first
//! JSON-looking span, and fail with a typed error carrying the raw text.
//! Generated output is never executed or trusted beyond this parse.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use tracing::warn;

use crate::models::Course;

/// Error type for sanitization
#[derive(Debug, thiserror::Error)]
pub enum SanitizeError {
    /// No structured value could be extracted. Carries the original raw
    /// text for diagnostics.
    #[error("generated output could not be parsed as JSON")]
    Malformed { raw: String },
}

/// Result type for sanitization
pub type Result<T> = std::result::Result<T, SanitizeError>;

lazy_static! {
    // First {...} or [...] span, dot matching newlines
    static ref JSON_SPAN_REGEX: Regex =
        Regex::new(r"(?s)\{.*\}|\[.*\]").unwrap();
}

/// Extract a structured JSON value from raw generated text.
///
/// Steps, short-circuiting on first success:
/// 1. strip a single surrounding code fence (with or without language tag)
/// 2. parse the remainder directly
/// 3. parse the first `{...}` or `[...]` span found by regex
///
/// An empty-but-valid value such as `[]` is a legitimate success. Failure
/// is a typed error with the original text; no default is ever substituted.
pub fn sanitize(raw: &str) -> Result<Value> {
    let text = strip_code_fence(raw);

    if let Ok(value) = serde_json::from_str(text) {
        return Ok(value);
    }

    if let Some(span) = JSON_SPAN_REGEX.find(text)
        && let Ok(value) = serde_json::from_str(span.as_str())
    {
        return Ok(value);
    }

    Err(SanitizeError::Malformed {
        raw: raw.to_string(),
    })
}

/// Convert a sanitized JSON value into candidate courses.
///
/// A non-array value is treated as an empty candidate list with a warning
/// (one unreliable source must not abort aggregation); array elements that
/// are not usable course objects are skipped with a warning.
pub fn parse_courses(value: &Value) -> Vec<Course> {
    let Some(items) = value.as_array() else {
        warn!("generated output was valid JSON but not an array; treating as empty");
        return Vec::new();
    };

    let mut courses = Vec::with_capacity(items.len());
    for item in items {
        match Course::from_value(item) {
            Some(course) => courses.push(course),
            None => warn!(?item, "skipping generated candidate without a usable title"),
        }
    }
    courses
}

/// Strip one leading/trailing ``` fence pair, tolerating a language tag on
/// the opening fence. Text without a full fence pair is returned trimmed.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();

    let Some(inner) = trimmed
        .strip_prefix("```")
        .and_then(|t| t.strip_suffix("```"))
    else {
        return trimmed;
    };

    match inner.split_once('\n') {
        // ```json\n...\n``` — drop the language tag line
        Some((first, rest))
            if !first.trim().is_empty() && !first.trim_start().starts_with(['{', '[']) =>
        {
            rest.trim()
        }
        _ => inner.trim(),
    }
}

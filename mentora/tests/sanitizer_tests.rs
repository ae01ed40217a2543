//! External tests for the generated-output sanitizer

use mentora::sanitize::{parse_courses, sanitize, SanitizeError};
use serde_json::json;

#[test]
fn fenced_list_scenario() {
    // The concrete scenario: completion returns ```[{"title":"X"}]```
    let value = sanitize("```[{\"title\":\"X\"}]```").unwrap();
    assert_eq!(value, json!([{"title": "X"}]));

    let courses = parse_courses(&value);
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0].title, "X");
}

#[test]
fn round_trips_values_embedded_in_arbitrary_prose() {
    let original = json!([
        {"title": "A", "platform": "udemy", "price": 15.0, "rating": 4.5},
        {"title": "B", "platform": "coursera", "price": 0.0}
    ]);

    let wrappings = [
        format!("{}", original),
        format!("Here are the courses you asked for:\n{}", original),
        format!("{}\nLet me know if you need more!", original),
        format!("```\n{}\n```", original),
        format!("```json\n{}\n```", original),
        format!("Sure thing!\n\n{}\n\nHappy learning.", original),
    ];

    for wrapped in &wrappings {
        let value = sanitize(wrapped)
            .unwrap_or_else(|_| panic!("failed to sanitize: {}", wrapped));
        assert_eq!(&value, &original, "value changed for wrapping: {}", wrapped);
    }
}

#[test]
fn empty_list_is_a_success_distinct_from_parse_failure() {
    let value = sanitize("[]").unwrap();
    assert_eq!(value, json!([]));

    let err = sanitize("I have nothing for you").unwrap_err();
    let SanitizeError::Malformed { raw } = err;
    assert_eq!(raw, "I have nothing for you");
}

#[test]
fn failure_carries_original_text_even_when_fenced() {
    let raw = "```\nnot json at all\n```";
    let SanitizeError::Malformed { raw: carried } = sanitize(raw).unwrap_err();
    assert_eq!(carried, raw);
}

#[test]
fn non_array_payload_becomes_empty_candidate_list() {
    let value = sanitize(r#"{"message": "no courses found"}"#).unwrap();
    assert!(parse_courses(&value).is_empty());
}

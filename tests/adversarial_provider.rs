//! Adversarial Property-Based Tests for Provider Payload Parsing
//!
//! # Attack Plan
//!
//! 1. **Time String Attacks**: out-of-range fields, unicode digits,
//!    injection characters, embedded nulls, very long strings.
//!
//! 2. **Payload Shape Attacks**: wrong JSON types at every level,
//!    missing fields, truncated documents, deeply wrong nesting.
//!
//! 3. **Empty vs Missing Fields**: empty strings must fail the same
//!    way missing fields do, as a malformed response.
//!
//! # Invariants
//!
//! - parse_anchor_time never panics on any input
//! - parse_payload never panics on any input
//! - every failure is FetchError::MalformedResponse, never a panic
//!   and never a silently wrong anchor value

use proptest::prelude::*;

use imsakiye::provider::{parse_anchor_time, parse_payload, FetchError};

// ============================================================================
// TIME STRING ATTACKS
// ============================================================================

#[test]
fn malformed_time_strings_rejected() {
    let cases = [
        "",
        " ",
        "\t",
        ":",
        "::",
        "12:",
        ":30",
        "24:00",
        "25:61",
        "12:60",
        "-1:30",
        "04:-1",
        "4h30",
        "04.30",
        "04;30",
        "noon",
        "NaN:NaN",
        "0x04:0x30",
        "04:30:00:00",
        "٠٤:٣٠",       // Arabic-Indic digits
        "０４：３０",   // fullwidth digits and colons
        "04:30\u{0}",  // embedded null
        "04\u{0}:30",
        "\u{202e}03:40", // RTL override
    ];

    for case in cases {
        let result = parse_anchor_time(case);
        assert!(
            matches!(result, Err(FetchError::MalformedResponse)),
            "expected malformed for {:?}, got {:?}",
            case,
            result
        );
    }
}

#[test]
fn leading_whitespace_is_tolerated() {
    // split_whitespace drops leading blanks, so a padded but otherwise
    // valid value still parses
    assert!(parse_anchor_time(" 04:30").is_ok());
    assert!(parse_anchor_time("04:30  ").is_ok());
}

#[test]
fn very_long_time_string_rejected_without_panic() {
    let long = "04:30".repeat(100_000);
    assert!(parse_anchor_time(&long).is_err());
}

// ============================================================================
// PAYLOAD SHAPE ATTACKS
// ============================================================================

#[test]
fn wrong_types_at_every_level_rejected() {
    let cases = [
        r#"null"#,
        r#"42"#,
        r#""a string""#,
        r#"[]"#,
        r#"{"data": null}"#,
        r#"{"data": 42}"#,
        r#"{"data": []}"#,
        r#"{"data": {"timings": null}}"#,
        r#"{"data": {"timings": []}}"#,
        r#"{"data": {"timings": "04:30"}}"#,
        r#"{"data": {"timings": {"Fajr": 430, "Maghrib": "18:45"}}}"#,
        r#"{"data": {"timings": {"Fajr": ["04:30"], "Maghrib": "18:45"}}}"#,
        r#"{"data": {"timings": {"Fajr": null, "Maghrib": "18:45"}}}"#,
    ];

    for case in cases {
        let result = parse_payload(case);
        assert!(
            matches!(result, Err(FetchError::MalformedResponse)),
            "expected malformed for {}, got {:?}",
            case,
            result
        );
    }
}

#[test]
fn empty_time_values_rejected() {
    let body = r#"{"data": {"timings": {"Fajr": "", "Maghrib": ""}}}"#;
    assert!(matches!(
        parse_payload(body),
        Err(FetchError::MalformedResponse)
    ));
}

#[test]
fn truncated_documents_rejected() {
    let full = r#"{"data": {"timings": {"Fajr": "04:30", "Maghrib": "18:45"}}}"#;
    for cut in 1..full.len() {
        // every strict prefix must fail cleanly
        let _ = parse_payload(&full[..cut]);
    }
    assert!(parse_payload(full).is_ok());
}

#[test]
fn unknown_fields_are_ignored() {
    let body = r#"{
        "code": 200,
        "status": "OK",
        "data": {
            "timings": {
                "Fajr": "04:30",
                "Sunrise": "05:58",
                "Maghrib": "18:45",
                "Midnight": "00:24",
                "Firstthird": "22:31"
            },
            "date": {"readable": "10 Mar 2026"},
            "meta": {"method": {"id": 13}}
        }
    }"#;
    let anchors = parse_payload(body).unwrap();
    assert_eq!(anchors.sahur.format("%H:%M").to_string(), "04:30");
    assert_eq!(anchors.iftar.format("%H:%M").to_string(), "18:45");
}

#[test]
fn huge_payload_rejected_without_panic() {
    let body = format!(r#"{{"data": {{"timings": {{"Fajr": "{}"}}}}}}"#, "a".repeat(1_000_000));
    assert!(parse_payload(&body).is_err());
}

// ============================================================================
// PROPERTY-BASED FUZZING
// ============================================================================

proptest! {
    #[test]
    fn parse_anchor_time_never_panics(raw in ".*") {
        let _ = parse_anchor_time(&raw);
    }

    #[test]
    fn parse_payload_never_panics(body in ".*") {
        let _ = parse_payload(&body);
    }

    /// JSON-shaped noise never panics and never yields anchors unless
    /// both fields are present and valid.
    #[test]
    fn random_json_objects_never_panic(
        key in "[A-Za-z]{1,12}",
        value in "[ -~]{0,24}",
    ) {
        let body = format!(r#"{{"data": {{"timings": {{"{}": "{}"}}}}}}"#, key, value);
        let result = parse_payload(&body);
        if key != "Fajr" && key != "Maghrib" {
            prop_assert!(result.is_err());
        }
    }

    /// Out-of-range hour/minute combinations are always rejected.
    #[test]
    fn out_of_range_times_rejected(h in 24u32..100, m in 60u32..100) {
        let both = format!("{:02}:{:02}", h, m);
        let minute_only = format!("00:{:02}", m);
        let hour_only = format!("{:02}:00", h);
        prop_assert!(parse_anchor_time(&both).is_err());
        prop_assert!(parse_anchor_time(&minute_only).is_err());
        prop_assert!(parse_anchor_time(&hour_only).is_err());
    }
}

//! Integration tests for YAML formatting.

use pinpoint::{
    format_yaml_all, format_yaml_error, path_to_dotted, FormatOptions, Issue, IssuePath,
    YamlSourceMap,
};
use serde_json::json;
use stillwater::Validation;

#[test]
fn test_format_basic_mapping() {
    let issue = Issue::new(IssuePath::from_key("age"), "must be at least 0");
    let payload = json!({"age": -5});

    let frame = format_yaml_error(&issue, &payload, FormatOptions::plain()).unwrap();

    let expected = ["> 1 | age: -5", "    |      ^ must be at least 0"].join("\n");
    assert_eq!(frame, expected);
}

#[test]
fn test_wrapped_scalar_resolves_to_document_root() {
    // scalar payloads arrive wrapped in a single-element array, so the
    // issue path starts with a synthetic index 0
    let issue = Issue::new(IssuePath::from_index(0), "must be positive");
    let payload = json!(-1);

    let frame = format_yaml_error(&issue, &payload, FormatOptions::plain()).unwrap();

    let expected = ["> 1 | -1", "    | ^ must be positive"].join("\n");
    assert_eq!(frame, expected);
}

#[test]
fn test_format_nested_sequence_element() {
    let issue = Issue::new(
        IssuePath::root()
            .push_key("users")
            .push_index(0)
            .push_key("name"),
        "too short",
    );
    let payload = json!({"users": [{"name": "ab"}]});

    let frame = format_yaml_error(&issue, &payload, FormatOptions::plain()).unwrap();

    let expected = [
        "  1 | users:",
        "> 2 | - name: ab",
        "    |         ^ too short",
    ]
    .join("\n");
    assert_eq!(frame, expected);
}

#[test]
fn test_deeply_nested_mapping_clips_context() {
    let issue = Issue::new(
        IssuePath::root()
            .push_key("a")
            .push_key("b")
            .push_key("c")
            .push_key("d")
            .push_key("e"),
        "flagged",
    );
    let payload = json!({"a": {"b": {"c": {"d": {"e": 1}}}}});

    let frame = format_yaml_error(&issue, &payload, FormatOptions::plain()).unwrap();
    let lines: Vec<&str> = frame.lines().collect();

    // two lines of context before the annotated line, nothing after it
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "  3 |     c:");
    assert_eq!(lines[1], "  4 |       d:");
    assert_eq!(lines[2], "> 5 |         e: 1");
    assert!(lines[3].ends_with("^ flagged"));
}

#[test]
fn test_sequence_element_position() {
    let payload = json!([10, 20]);
    let map = YamlSourceMap::build(&payload).unwrap();
    assert_eq!(map.text(), "- 10\n- 20\n");

    let issue = Issue::new(IssuePath::from_index(1), "too big");
    let frame = format_yaml_error(&issue, &payload, FormatOptions::plain()).unwrap();

    let expected = ["  1 | - 10", "> 2 | - 20", "    |   ^ too big"].join("\n");
    assert_eq!(frame, expected);
}

#[test]
fn test_missing_path_reports_original_path() {
    let payload = json!({"age": -5});

    // the reported path keeps the synthetic leading index
    let wrapped = Issue::new(IssuePath::root().push_index(0).push_key("nope"), "x");
    let error = format_yaml_error(&wrapped, &payload, FormatOptions::plain()).unwrap_err();
    assert_eq!(error.to_string(), "could not find position for path '0.nope'");

    let plain = Issue::new(IssuePath::from_key("email"), "x");
    let error = format_yaml_error(&plain, &payload, FormatOptions::plain()).unwrap_err();
    assert_eq!(error.to_string(), "could not find position for path 'email'");
}

#[test]
fn test_dotted_normalization() {
    let wrapped = IssuePath::root().push_index(0).push_key("user");
    assert_eq!(path_to_dotted(&wrapped), "user");

    let unwrapped = IssuePath::root().push_key("users").push_index(2);
    assert_eq!(path_to_dotted(&unwrapped), "users.2");
}

#[test]
fn test_format_yaml_all_returns_frame_per_issue() {
    let issues = vec![
        Issue::new(IssuePath::from_key("name"), "too short"),
        Issue::new(IssuePath::from_key("age"), "too small"),
    ];
    let payload = json!({"name": "x", "age": -5});

    match format_yaml_all(&issues, &payload, FormatOptions::plain()) {
        Validation::Success(frames) => {
            assert_eq!(frames.len(), 2);
            assert!(frames[0].contains("too short"));
            assert!(frames[1].contains("age: -5"));
            assert!(frames[1].contains("too small"));
        }
        Validation::Failure(e) => panic!("Expected success, got {}", e),
    }
}

#[test]
fn test_format_yaml_all_accumulates_missing_paths() {
    let issues = vec![
        Issue::new(IssuePath::from_key("name"), "resolves fine"),
        Issue::new(IssuePath::from_key("email"), "missing"),
        Issue::new(IssuePath::root().push_key("tags").push_index(0), "missing"),
    ];
    let payload = json!({"name": "x"});

    match format_yaml_all(&issues, &payload, FormatOptions::plain()) {
        Validation::Failure(errors) => {
            assert_eq!(errors.len(), 2);
            assert_eq!(errors.missing_paths(), vec!["email", "tags.0"]);
        }
        Validation::Success(_) => panic!("Expected failure"),
    }
}

#[test]
fn test_color_and_highlighting_toggles() {
    let issue = Issue::new(IssuePath::from_key("age"), "too small");
    let payload = json!({"age": -5});

    let colored = format_yaml_error(&issue, &payload, FormatOptions::default()).unwrap();
    let plain = format_yaml_error(&issue, &payload, FormatOptions::plain()).unwrap();

    assert_ne!(colored, plain);
    assert!(colored.contains("\x1b["));
    assert!(!plain.contains("\x1b["));

    let highlight_only = format_yaml_error(
        &issue,
        &payload,
        FormatOptions {
            use_color: false,
            syntax_highlighting: true,
        },
    )
    .unwrap();
    assert!(highlight_only.contains("\x1b[36m")); // keys highlighted
    assert!(!highlight_only.contains("\x1b[31m")); // no frame chrome
}

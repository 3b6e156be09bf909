//! Integration tests for JSON formatting.

use pinpoint::{
    format_all, format_error, path_to_pointer, FormatOptions, Issue, IssuePath, JsonSourceMap,
};
use serde_json::json;
use stillwater::Validation;

#[test]
fn test_format_basic_object() {
    let issue = Issue::new(IssuePath::from_key("age"), "must be at least 0");
    let payload = json!({"age": -5});

    let frame = format_error(&issue, &payload, FormatOptions::plain()).unwrap();

    let expected = [
        "  1 | {",
        "> 2 |   \"age\": -5",
        "    |          ^^ must be at least 0",
        "  3 | }",
    ]
    .join("\n");
    assert_eq!(frame, expected);
}

#[test]
fn test_format_nested_object() {
    let issue = Issue::new(
        IssuePath::root()
            .push_key("user")
            .push_key("profile")
            .push_key("email"),
        "must be a string",
    );
    let payload = json!({"user": {"profile": {"email": 42}}});

    let frame = format_error(&issue, &payload, FormatOptions::plain()).unwrap();
    let lines: Vec<&str> = frame.lines().collect();

    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], "  2 |   \"user\": {");
    assert_eq!(lines[1], "  3 |     \"profile\": {");
    assert_eq!(lines[2], "> 4 |       \"email\": 42");
    assert_eq!(
        lines[3],
        format!("    | {}^^ must be a string", " ".repeat(15))
    );
    assert_eq!(lines[4], "  5 |     }");
    assert_eq!(lines[5], "  6 |   }");
}

#[test]
fn test_array_element_span_delimits_value() {
    let payload = json!([
        {"id": 1, "value": "ok"},
        {"id": 2, "value": "no"}
    ]);
    let path = IssuePath::root().push_index(1).push_key("value");

    let map = JsonSourceMap::build(&payload);
    let span = map.resolve(&path, "unexpected value").unwrap();

    // the span delimits the serialized scalar exactly, quotes included
    let line = map.text().lines().nth(span.start.line - 1).unwrap();
    let extracted: String = line
        .chars()
        .skip(span.start.column - 1)
        .take(span.end.column - span.start.column + 1)
        .collect();
    assert_eq!(extracted, "\"no\"");

    let issue = Issue::new(path, "unexpected value");
    let frame = format_error(&issue, &payload, FormatOptions::plain()).unwrap();
    let lines: Vec<&str> = frame.lines().collect();

    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], "   6 |   {");
    assert_eq!(lines[1], "   7 |     \"id\": 2,");
    assert_eq!(lines[2], ">  8 |     \"value\": \"no\"");
    assert!(lines[3].ends_with("^^^^ unexpected value"));
    assert_eq!(lines[4], "   9 |   }");
    assert_eq!(lines[5], "  10 | ]");
}

#[test]
fn test_root_issue_spans_whole_document() {
    let issue = Issue::new(IssuePath::root(), "whole document");
    let payload = json!({"a": 1});

    let frame = format_error(&issue, &payload, FormatOptions::plain()).unwrap();

    let expected = [
        "> 1 | {",
        "    | ^",
        "> 2 |   \"a\": 1",
        "    | ^^^^^^^^",
        "> 3 | }",
        "    | ^ whole document",
    ]
    .join("\n");
    assert_eq!(frame, expected);
}

#[test]
fn test_escaped_keys_resolve() {
    let payload = json!({"a/b": {"x~y": 1}});
    let path = IssuePath::root().push_key("a/b").push_key("x~y");

    assert_eq!(path_to_pointer(&path), "/a~1b/x~0y");

    let map = JsonSourceMap::build(&payload);
    assert!(map.entry("/a~1b/x~0y").is_some());

    let frame = format_error(&Issue::new(path, "flagged"), &payload, FormatOptions::plain())
        .unwrap();
    assert!(frame.contains("\"x~y\": 1"));
    assert!(frame.contains("^ flagged"));
}

#[test]
fn test_multibyte_values_measured_in_characters() {
    let payload = json!({"name": "héllo"});
    let map = JsonSourceMap::build(&payload);

    let entry = map.entry("/name").unwrap();
    assert_eq!((entry.value.line, entry.value.column), (1, 10));
    assert_eq!((entry.value_end.line, entry.value_end.column), (1, 17));

    let issue = Issue::new(IssuePath::from_key("name"), "bad name");
    let frame = format_error(&issue, &payload, FormatOptions::plain()).unwrap();
    assert!(frame.contains("^^^^^^^ bad name"));
}

#[test]
fn test_missing_path_reports_dotted_path() {
    let issue = Issue::new(
        IssuePath::root().push_key("user").push_index(2),
        "out of range",
    );
    let payload = json!({"user": [1]});

    let error = format_error(&issue, &payload, FormatOptions::plain()).unwrap_err();
    assert_eq!(
        error.to_string(),
        "could not find position for path 'user.2'"
    );
}

#[test]
fn test_format_all_returns_frame_per_issue() {
    let issues = vec![
        Issue::new(IssuePath::from_key("name"), "too short"),
        Issue::new(IssuePath::from_key("age"), "too small"),
    ];
    let payload = json!({"name": "x", "age": -5});

    match format_all(&issues, &payload, FormatOptions::plain()) {
        Validation::Success(frames) => {
            assert_eq!(frames.len(), 2);
            assert!(frames[0].contains("\"name\": \"x\""));
            assert!(frames[0].contains("too short"));
            assert!(frames[1].contains("\"age\": -5"));
            assert!(frames[1].contains("too small"));
        }
        Validation::Failure(e) => panic!("Expected success, got {}", e),
    }
}

#[test]
fn test_format_all_accumulates_missing_paths() {
    let issues = vec![
        Issue::new(IssuePath::from_key("name"), "resolves fine"),
        Issue::new(IssuePath::from_key("email"), "missing"),
        Issue::new(IssuePath::root().push_key("tags").push_index(0), "missing"),
    ];
    let payload = json!({"name": "x"});

    // one resolvable issue does not rescue the batch
    match format_all(&issues, &payload, FormatOptions::plain()) {
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

    let colored = format_error(&issue, &payload, FormatOptions::default()).unwrap();
    let plain = format_error(&issue, &payload, FormatOptions::plain()).unwrap();

    assert_ne!(colored, plain);
    assert!(colored.contains("\x1b["));
    assert!(!plain.contains("\x1b["));

    // the two toggles act independently
    let highlight_only = format_error(
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

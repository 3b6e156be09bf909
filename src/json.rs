//! JSON formatting pipeline.
//!
//! This module serializes a payload to indented JSON while recording the
//! source range of every reachable value, then resolves issue paths against
//! those ranges to produce renderable spans. Emission and position tracking
//! happen in a single pass, so the recorded coordinates always agree with
//! the emitted text.

use indexmap::IndexMap;
use serde_json::Value;
use stillwater::Validation;

use crate::error::{FormatError, FormatErrors};
use crate::frame::{DefaultFrameRenderer, FormatOptions, FrameRenderer, Language};
use crate::issue::Issue;
use crate::path::{IssuePath, PathSegment};
use crate::span::{Position, Span};
use crate::FormatResult;

/// Escapes one key segment for use in a JSON Pointer (`~` → `~0`, `/` → `~1`).
fn escape_segment(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

/// Converts an issue path to a JSON-Pointer-style lookup key.
///
/// The empty path maps to the empty string (the document root). Key
/// segments are escaped per JSON Pointer rules; index segments are rendered
/// as plain decimal and never escaped.
///
/// # Example
///
/// ```rust
/// use pinpoint::{path_to_pointer, IssuePath};
///
/// let path = IssuePath::root().push_key("users").push_index(0).push_key("a/b");
/// assert_eq!(path_to_pointer(&path), "/users/0/a~1b");
/// assert_eq!(path_to_pointer(&IssuePath::root()), "");
/// ```
pub fn path_to_pointer(path: &IssuePath) -> String {
    let mut pointer = String::new();
    for segment in path.segments() {
        pointer.push('/');
        match segment {
            PathSegment::Key(name) => pointer.push_str(&escape_segment(name)),
            PathSegment::Index(idx) => pointer.push_str(&idx.to_string()),
        }
    }
    pointer
}

/// The serialized range of one value, 0-indexed.
///
/// `value` is the position of the value's first character; `value_end` is
/// the position one past its last character (exclusive column).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEntry {
    /// Start of the value's text.
    pub value: Position,
    /// End of the value's text (exclusive column).
    pub value_end: Position,
}

/// Serialized JSON text together with the source range of every value.
///
/// Built fresh from a payload on each formatting call. Positions are
/// 0-indexed; [`JsonSourceMap::resolve`] converts them to the 1-indexed
/// convention spans use.
///
/// # Example
///
/// ```rust
/// use pinpoint::{IssuePath, JsonSourceMap};
/// use serde_json::json;
///
/// let map = JsonSourceMap::build(&json!({"age": -5}));
/// assert_eq!(map.text(), "{\n  \"age\": -5\n}");
///
/// let span = map.resolve(&IssuePath::from_key("age"), "too small").unwrap();
/// assert_eq!((span.start.line, span.start.column), (2, 10));
/// assert_eq!((span.end.line, span.end.column), (2, 11));
/// ```
#[derive(Debug, Clone)]
pub struct JsonSourceMap {
    text: String,
    entries: IndexMap<String, PointerEntry>,
}

impl JsonSourceMap {
    /// Serializes `payload` to 2-space-indented JSON, recording the range of
    /// every value reachable by a pointer.
    pub fn build(payload: &Value) -> Self {
        let mut emitter = Emitter::new();
        emitter.write_value("", payload, 0);
        Self {
            text: emitter.out,
            entries: emitter.entries,
        }
    }

    /// Returns the serialized JSON text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the number of recorded values.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns false since the root value is always recorded.
    ///
    /// This method exists for API consistency but always returns false.
    pub fn is_empty(&self) -> bool {
        false // the root entry is always present
    }

    /// Returns the recorded range for a pointer key, if present.
    pub fn entry(&self, pointer: &str) -> Option<&PointerEntry> {
        self.entries.get(pointer)
    }

    /// Returns an iterator over `(pointer, entry)` pairs in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PointerEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Resolves an issue path to a 1-indexed span over the serialized text.
    ///
    /// Lines shift from 0-indexed to 1-indexed for both endpoints. The start
    /// column shifts as well, but the end column is left as recorded: the
    /// renderer treats it as a 1-indexed inclusive final column, which is
    /// numerically equal to the 0-indexed exclusive end. This asymmetry is
    /// load-bearing and must match the renderer's expectation.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::PathNotFound`] naming the dotted path when the
    /// pointer has no entry.
    pub fn resolve(
        &self,
        path: &IssuePath,
        message: impl Into<String>,
    ) -> Result<Span, FormatError> {
        let pointer = path_to_pointer(path);
        let entry = self
            .entries
            .get(&pointer)
            .ok_or_else(|| FormatError::PathNotFound(path.to_string()))?;

        Ok(Span::new(
            Position::new(entry.value.line + 1, entry.value.column + 1),
            Position::new(entry.value_end.line + 1, entry.value_end.column),
            message,
        ))
    }
}

/// One-pass JSON emitter that tracks the write position.
struct Emitter {
    out: String,
    line: usize,
    column: usize,
    entries: IndexMap<String, PointerEntry>,
}

impl Emitter {
    fn new() -> Self {
        Self {
            out: String::new(),
            line: 0,
            column: 0,
            entries: IndexMap::new(),
        }
    }

    fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    /// Appends text containing no newlines. Columns count Unicode scalar
    /// values so they agree with how the renderer walks lines.
    fn push_raw(&mut self, text: &str) {
        self.out.push_str(text);
        self.column += text.chars().count();
    }

    fn newline(&mut self) {
        self.out.push('\n');
        self.line += 1;
        self.column = 0;
    }

    fn write_value(&mut self, pointer: &str, value: &Value, indent: usize) {
        let start = self.position();
        self.entries.insert(
            pointer.to_string(),
            PointerEntry {
                value: start,
                value_end: start,
            },
        );

        match value {
            Value::Object(members) if !members.is_empty() => {
                self.push_raw("{");
                self.newline();
                let last = members.len() - 1;
                for (i, (key, child)) in members.iter().enumerate() {
                    self.push_raw(&"  ".repeat(indent + 1));
                    self.push_raw(&Value::from(key.as_str()).to_string());
                    self.push_raw(": ");
                    let child_pointer = format!("{}/{}", pointer, escape_segment(key));
                    self.write_value(&child_pointer, child, indent + 1);
                    if i != last {
                        self.push_raw(",");
                    }
                    self.newline();
                }
                self.push_raw(&"  ".repeat(indent));
                self.push_raw("}");
            }
            Value::Array(items) if !items.is_empty() => {
                self.push_raw("[");
                self.newline();
                let last = items.len() - 1;
                for (i, child) in items.iter().enumerate() {
                    self.push_raw(&"  ".repeat(indent + 1));
                    let child_pointer = format!("{}/{}", pointer, i);
                    self.write_value(&child_pointer, child, indent + 1);
                    if i != last {
                        self.push_raw(",");
                    }
                    self.newline();
                }
                self.push_raw(&"  ".repeat(indent));
                self.push_raw("]");
            }
            Value::Object(_) => self.push_raw("{}"),
            Value::Array(_) => self.push_raw("[]"),
            // Scalars use serde_json's own compact rendering, string
            // escaping included.
            scalar => self.push_raw(&scalar.to_string()),
        }

        let end = self.position();
        if let Some(entry) = self.entries.get_mut(pointer) {
            entry.value_end = end;
        }
    }
}

/// Formats one issue against a payload as an annotated JSON code frame.
///
/// Serializes the payload, resolves the issue's path to a span, and renders
/// the frame with [`DefaultFrameRenderer`].
///
/// # Example
///
/// ```rust
/// use pinpoint::{format_error, FormatOptions, Issue, IssuePath};
/// use serde_json::json;
///
/// let issue = Issue::new(IssuePath::from_key("age"), "must be at least 0");
/// let frame = format_error(&issue, &json!({"age": -5}), FormatOptions::plain()).unwrap();
///
/// assert!(frame.contains("\"age\": -5"));
/// assert!(frame.contains("must be at least 0"));
/// ```
///
/// # Errors
///
/// Returns [`FormatError::PathNotFound`] when the issue's path does not
/// exist in the payload.
pub fn format_error(
    issue: &Issue,
    payload: &Value,
    options: FormatOptions,
) -> Result<String, FormatError> {
    let map = JsonSourceMap::build(payload);
    let span = map.resolve(&issue.path, issue.message.clone())?;
    let renderer = DefaultFrameRenderer::new();
    Ok(renderer.render(map.text(), &[span], Language::Json, options))
}

/// Formats every issue against one payload, accumulating all failures.
///
/// The source map is built once and shared across issues. Issues whose
/// paths resolve produce frames; every failure is collected, so the result
/// reports all missing paths rather than the first one.
pub fn format_all(
    issues: &[Issue],
    payload: &Value,
    options: FormatOptions,
) -> FormatResult<Vec<String>> {
    let map = JsonSourceMap::build(payload);
    let renderer = DefaultFrameRenderer::new();

    let mut frames = Vec::with_capacity(issues.len());
    let mut errors = Vec::new();

    for issue in issues {
        match map.resolve(&issue.path, issue.message.clone()) {
            Ok(span) => frames.push(renderer.render(map.text(), &[span], Language::Json, options)),
            Err(e) => errors.push(e),
        }
    }

    if errors.is_empty() {
        Validation::Success(frames)
    } else {
        Validation::Failure(FormatErrors::from_vec(errors))
    }
}

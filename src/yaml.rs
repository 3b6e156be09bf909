//! YAML formatting pipeline.
//!
//! This module serializes a payload to YAML, re-parses the emitted text
//! with a marked event parser to learn where every value begins, and
//! resolves issue paths against those points. YAML's structural
//! flexibility makes end-of-value detection unreliable, so each path maps
//! to a single start point and resolved spans are zero-width.

use indexmap::IndexMap;
use serde_json::Value;
use stillwater::Validation;
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser};
use yaml_rust2::scanner::Marker;

use crate::error::{FormatError, FormatErrors};
use crate::frame::{DefaultFrameRenderer, FormatOptions, FrameRenderer, Language};
use crate::issue::Issue;
use crate::path::{IssuePath, PathSegment};
use crate::span::{Position, Span};
use crate::FormatResult;

/// Converts an issue path to the dotted lookup key used by the YAML map.
///
/// Segments are joined with `.`, indices rendered as plain decimal. A
/// leading index `0` comes from the synthetic single-element array the
/// caller wraps scalar payloads in to obtain a traversable document; it is
/// stripped so the path addresses the unwrapped document. This
/// normalization is specific to the YAML pipeline and shares nothing with
/// [`path_to_pointer`](crate::path_to_pointer).
///
/// # Example
///
/// ```rust
/// use pinpoint::{path_to_dotted, IssuePath};
///
/// let wrapped = IssuePath::root().push_index(0).push_key("name");
/// assert_eq!(path_to_dotted(&wrapped), "name");
///
/// let unwrapped = IssuePath::root().push_index(1).push_key("name");
/// assert_eq!(path_to_dotted(&unwrapped), "1.name");
/// ```
pub fn path_to_dotted(path: &IssuePath) -> String {
    let mut segments: Vec<String> = path.segments().map(ToString::to_string).collect();
    if matches!(path.segments().next(), Some(PathSegment::Index(0))) {
        segments.remove(0);
    }
    segments.join(".")
}

/// Serialized YAML text together with the start point of every value.
///
/// Built fresh from a payload on each formatting call. Positions are
/// already 1-indexed, matching the convention spans use, so resolution
/// performs no index shift. The root value is recorded under the empty
/// key.
///
/// # Example
///
/// ```rust
/// use pinpoint::{IssuePath, YamlSourceMap};
/// use serde_json::json;
///
/// let map = YamlSourceMap::build(&json!({"age": -5})).unwrap();
/// assert_eq!(map.text(), "age: -5\n");
///
/// let span = map.resolve(&IssuePath::from_key("age"), "too small").unwrap();
/// assert_eq!((span.start.line, span.start.column), (1, 6));
/// assert!(span.is_zero_width());
/// ```
#[derive(Debug, Clone)]
pub struct YamlSourceMap {
    text: String,
    positions: IndexMap<String, Position>,
}

impl YamlSourceMap {
    /// Serializes `payload` to YAML and records where every value begins.
    ///
    /// # Errors
    ///
    /// Propagates serialization failures from `serde_yaml` and re-parse
    /// failures from the marked parser unmodified.
    pub fn build(payload: &Value) -> Result<Self, FormatError> {
        let text = serde_yaml::to_string(payload)?;
        let mut recorder = PositionRecorder::new();
        let mut parser = Parser::new_from_str(&text);
        parser.load(&mut recorder, false)?;

        Ok(Self {
            text,
            positions: recorder.positions,
        })
    }

    /// Returns the serialized YAML text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the number of recorded values.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns false since the root value is always recorded.
    ///
    /// This method exists for API consistency but always returns false.
    pub fn is_empty(&self) -> bool {
        false // the root entry is always present
    }

    /// Returns the recorded start point for a dotted key, if present.
    pub fn position(&self, key: &str) -> Option<Position> {
        self.positions.get(key).copied()
    }

    /// Returns an iterator over `(dotted key, position)` pairs in document
    /// order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Position)> {
        self.positions.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Resolves an issue path to a zero-width span at the value's start.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::PathNotFound`] naming the original dotted
    /// path (wrapper index included) when the normalized key has no entry.
    pub fn resolve(
        &self,
        path: &IssuePath,
        message: impl Into<String>,
    ) -> Result<Span, FormatError> {
        let key = path_to_dotted(path);
        let at = self
            .positions
            .get(&key)
            .copied()
            .ok_or_else(|| FormatError::PathNotFound(path.to_string()))?;

        Ok(Span::point(at, message))
    }
}

/// One collection being parsed.
struct Frame {
    kind: FrameKind,
    /// The collection's own record, deferred until its first child event.
    pending: Option<Pending>,
}

/// Collection state used to name the next value.
enum FrameKind {
    Mapping { pending_key: Option<String> },
    Sequence { next_index: usize },
}

/// A collection whose start point is not yet recorded.
///
/// yaml_rust2 places block collection markers away from the value's first
/// character: a block mapping's marker sits on the colon after its first
/// key, an indentless sequence's marker past the leading `- `. Collection
/// paths are therefore recorded at their first child event. The event
/// marker is kept as the fallback for collections that end before any
/// child event arrives; those are flow `{}` and `[]`, whose markers are
/// accurate.
struct Pending {
    key: String,
    fallback: Position,
}

/// Converts a parser marker to a stored position.
///
/// Markers carry 1-indexed lines and 0-indexed columns; positions store
/// both 1-indexed so no shift is needed at resolution time.
fn marker_position(marker: Marker) -> Position {
    Position::new(marker.line(), marker.col() + 1)
}

/// Event listener that records a start point per dotted path.
struct PositionRecorder {
    stack: Vec<Frame>,
    positions: IndexMap<String, Position>,
}

impl PositionRecorder {
    fn new() -> Self {
        Self {
            stack: Vec::new(),
            positions: IndexMap::new(),
        }
    }

    /// True when the next scalar in the current mapping names a key.
    fn expects_key(&self) -> bool {
        matches!(
            self.stack.last().map(|frame| &frame.kind),
            Some(FrameKind::Mapping { pending_key: None })
        )
    }

    /// The dotted path of the value currently being constructed.
    fn dotted_key(&self) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(self.stack.len());
        for frame in &self.stack {
            match &frame.kind {
                FrameKind::Mapping { pending_key } => {
                    if let Some(key) = pending_key {
                        parts.push(key.clone());
                    }
                }
                FrameKind::Sequence { next_index } => parts.push(next_index.to_string()),
            }
        }
        parts.join(".")
    }

    /// Opens a collection whose record waits for its first child event.
    fn open(&mut self, kind: FrameKind, marker: Marker) {
        let pending = Pending {
            key: self.dotted_key(),
            fallback: marker_position(marker),
        };
        self.stack.push(Frame {
            kind,
            pending: Some(pending),
        });
    }

    /// Records every collection still awaiting its start point.
    ///
    /// `at` is the marker of the first event inside the innermost pending
    /// collection. Walking outward, a mapping begins exactly at its first
    /// key, while a sequence entry begins two columns earlier, at the `- `
    /// prefix. Outer entries are inserted first, keeping document order.
    fn settle_pending(&mut self, at: Position) {
        let mut settled: Vec<(String, Position)> = Vec::new();
        let mut pos = at;
        for frame in self.stack.iter_mut().rev() {
            let pending = match frame.pending.take() {
                Some(pending) => pending,
                None => break,
            };
            if matches!(frame.kind, FrameKind::Sequence { .. }) {
                pos.column = pos.column.saturating_sub(2).max(1);
            }
            settled.push((pending.key, pos));
        }
        for (key, pos) in settled.into_iter().rev() {
            self.positions.insert(key, pos);
        }
    }

    /// Advances the enclosing collection past a completed value.
    fn finish_value(&mut self) {
        match self.stack.last_mut().map(|frame| &mut frame.kind) {
            Some(FrameKind::Mapping { pending_key }) => *pending_key = None,
            Some(FrameKind::Sequence { next_index }) => *next_index += 1,
            None => {}
        }
    }
}

impl MarkedEventReceiver for PositionRecorder {
    fn on_event(&mut self, event: Event, marker: Marker) {
        match event {
            Event::Scalar(value, ..) => {
                let at = marker_position(marker);
                self.settle_pending(at);
                if self.expects_key() {
                    if let Some(FrameKind::Mapping { pending_key }) =
                        self.stack.last_mut().map(|frame| &mut frame.kind)
                    {
                        *pending_key = Some(value);
                    }
                } else {
                    self.positions.insert(self.dotted_key(), at);
                    self.finish_value();
                }
            }
            Event::SequenceStart(..) => {
                self.open(FrameKind::Sequence { next_index: 0 }, marker);
            }
            Event::MappingStart(..) => {
                self.open(FrameKind::Mapping { pending_key: None }, marker);
            }
            Event::SequenceEnd | Event::MappingEnd => {
                if let Some(frame) = self.stack.pop() {
                    if let Some(pending) = frame.pending {
                        // no child event arrived: an empty flow collection
                        // whose own marker is accurate
                        self.settle_pending(pending.fallback);
                        self.positions.insert(pending.key, pending.fallback);
                    }
                }
                self.finish_value();
            }
            // serde_yaml output never contains aliases
            Event::Alias(..) => {
                let at = marker_position(marker);
                self.settle_pending(at);
                if !self.expects_key() {
                    self.positions.insert(self.dotted_key(), at);
                    self.finish_value();
                }
            }
            _ => {}
        }
    }
}

/// Formats one issue against a payload as an annotated YAML code frame.
///
/// Serializes the payload, resolves the issue's path to a zero-width span,
/// and renders the frame with [`DefaultFrameRenderer`].
///
/// # Example
///
/// ```rust
/// use pinpoint::{format_yaml_error, FormatOptions, Issue, IssuePath};
/// use serde_json::json;
///
/// let issue = Issue::new(IssuePath::from_key("age"), "must be at least 0");
/// let frame = format_yaml_error(&issue, &json!({"age": -5}), FormatOptions::plain()).unwrap();
///
/// assert!(frame.contains("age: -5"));
/// assert!(frame.contains("must be at least 0"));
/// ```
///
/// # Errors
///
/// Returns [`FormatError::PathNotFound`] when the issue's path does not
/// exist in the payload, and propagates serialization failures.
pub fn format_yaml_error(
    issue: &Issue,
    payload: &Value,
    options: FormatOptions,
) -> Result<String, FormatError> {
    let map = YamlSourceMap::build(payload)?;
    let span = map.resolve(&issue.path, issue.message.clone())?;
    let renderer = DefaultFrameRenderer::new();
    Ok(renderer.render(map.text(), &[span], Language::Yaml, options))
}

/// Formats every issue against one payload, accumulating all failures.
///
/// The source map is built once and shared across issues; a serialization
/// failure therefore yields a single-element failure. Resolution failures
/// are collected per issue, so the result reports every missing path.
pub fn format_yaml_all(
    issues: &[Issue],
    payload: &Value,
    options: FormatOptions,
) -> FormatResult<Vec<String>> {
    let map = match YamlSourceMap::build(payload) {
        Ok(map) => map,
        Err(e) => return Validation::Failure(FormatErrors::single(e)),
    };
    let renderer = DefaultFrameRenderer::new();

    let mut frames = Vec::with_capacity(issues.len());
    let mut errors = Vec::new();

    for issue in issues {
        match map.resolve(&issue.path, issue.message.clone()) {
            Ok(span) => frames.push(renderer.render(map.text(), &[span], Language::Yaml, options)),
            Err(e) => errors.push(e),
        }
    }

    if errors.is_empty() {
        Validation::Success(frames)
    } else {
        Validation::Failure(FormatErrors::from_vec(errors))
    }
}

//! Line/column coordinates and the spans handed to a frame renderer.

/// A line/column coordinate in serialized text.
///
/// The indexing convention is owned by the producer: the JSON source map
/// records 0-indexed positions, while the YAML source map and all [`Span`]
/// endpoints are 1-indexed. Columns count Unicode scalar values, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// Creates a new position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A highlighted region of serialized text with an attached message.
///
/// Spans are 1-indexed for human display. The end column is the inclusive
/// final column of the highlight, so a span covering a single character has
/// `end.column == start.column`. A zero-width span (YAML pipeline) uses the
/// same point for both endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// First highlighted position.
    pub start: Position,
    /// Last highlighted position (inclusive column).
    pub end: Position,
    /// Message attached to the highlight.
    pub message: String,
}

impl Span {
    /// Creates a span covering the range from `start` to `end`.
    pub fn new(start: Position, end: Position, message: impl Into<String>) -> Self {
        Self {
            start,
            end,
            message: message.into(),
        }
    }

    /// Creates a zero-width span anchored at a single point.
    pub fn point(at: Position, message: impl Into<String>) -> Self {
        Self {
            start: at,
            end: at,
            message: message.into(),
        }
    }

    /// Returns true if start and end are the same point.
    pub fn is_zero_width(&self) -> bool {
        self.start == self.end
    }
}

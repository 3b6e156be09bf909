//! Code frame rendering.
//!
//! This module hosts the rendering collaborator consumed by both
//! formatting pipelines: the [`FrameRenderer`] trait, the options passed
//! through to it, and [`DefaultFrameRenderer`], which draws a windowed,
//! gutter-numbered view of the serialized text with caret underlines.

use regex::{Captures, Regex};

use crate::span::Span;

const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const MAGENTA: &str = "\x1b[35m";
const CYAN: &str = "\x1b[36m";
const RESET: &str = "\x1b[0m";

/// Lines of surrounding context shown above and below the spanned lines.
const CONTEXT_LINES: usize = 2;

/// Serialization format of the rendered source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Json,
    Yaml,
}

impl Language {
    /// Returns the lowercase name of the language.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Json => "json",
            Language::Yaml => "yaml",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options controlling frame appearance.
///
/// The two toggles are independent: token coloring applies even when the
/// frame chrome is uncolored, and vice versa.
///
/// # Example
///
/// ```rust
/// use pinpoint::FormatOptions;
///
/// let defaults = FormatOptions::default();
/// assert!(defaults.use_color);
/// assert!(defaults.syntax_highlighting);
///
/// let plain = FormatOptions::plain();
/// assert!(!plain.use_color);
/// assert!(!plain.syntax_highlighting);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    /// ANSI-color the frame chrome (line markers, carets, message).
    pub use_color: bool,
    /// Color tokens in the source text according to the language.
    pub syntax_highlighting: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            use_color: true,
            syntax_highlighting: true,
        }
    }
}

impl FormatOptions {
    /// Options with both coloring toggles disabled.
    pub fn plain() -> Self {
        Self {
            use_color: false,
            syntax_highlighting: false,
        }
    }
}

/// Renders annotated code frames from serialized text and spans.
///
/// Callers guarantee the spans are 1-indexed, in-bounds, and match
/// `source`. Implementations own every visual decision; the formatting
/// pipelines pass spans through without validating the rendered output.
pub trait FrameRenderer {
    /// Renders `source` with the given spans highlighted.
    fn render(
        &self,
        source: &str,
        spans: &[Span],
        language: Language,
        options: FormatOptions,
    ) -> String;
}

/// Default frame renderer.
///
/// Shows the spanned lines with two lines of surrounding context, a
/// right-aligned line-number gutter, and a `>` marker on lines a span
/// touches. Each span draws a caret underline per covered line, with the
/// span's message after the carets on its final line. A zero-width span
/// draws a single caret. Output lines are joined with `\n` and carry no
/// trailing newline.
#[derive(Debug, Default)]
pub struct DefaultFrameRenderer;

impl DefaultFrameRenderer {
    /// Creates a new renderer.
    pub fn new() -> Self {
        Self
    }
}

impl FrameRenderer for DefaultFrameRenderer {
    fn render(
        &self,
        source: &str,
        spans: &[Span],
        language: Language,
        options: FormatOptions,
    ) -> String {
        let lines: Vec<&str> = source.lines().collect();
        if lines.is_empty() {
            return String::new();
        }

        let (first, last) = window(lines.len(), spans);
        let width = last.to_string().len();

        let mut rows: Vec<String> = Vec::new();
        for number in first..=last {
            let raw = lines[number - 1];
            let content = if options.syntax_highlighting {
                highlight(raw, language)
            } else {
                raw.to_string()
            };

            let marker = if spans.iter().any(|s| covers(s, number)) {
                paint(">", options.use_color)
            } else {
                " ".to_string()
            };
            rows.push(format!(
                "{} {:>width$} | {}",
                marker,
                number,
                content,
                width = width
            ));

            for span in spans.iter().filter(|s| covers(s, number)) {
                rows.push(caret_row(span, number, raw, width, options.use_color));
            }
        }

        rows.join("\n")
    }
}

fn covers(span: &Span, line: usize) -> bool {
    span.start.line <= line && line <= span.end.line
}

/// Returns the 1-indexed first and last line to show.
fn window(line_count: usize, spans: &[Span]) -> (usize, usize) {
    if spans.is_empty() {
        return (1, line_count);
    }

    let min_line = spans.iter().map(|s| s.start.line).min().unwrap_or(1);
    let max_line = spans.iter().map(|s| s.end.line).max().unwrap_or(line_count);

    let first = min_line.saturating_sub(CONTEXT_LINES).clamp(1, line_count);
    let last = max_line
        .saturating_add(CONTEXT_LINES)
        .clamp(first, line_count);
    (first, last)
}

/// Draws the caret underline for one span on one covered source line.
fn caret_row(span: &Span, number: usize, raw: &str, width: usize, use_color: bool) -> String {
    let line_len = raw.chars().count();

    let from = if number == span.start.line {
        span.start.column.max(1)
    } else {
        1
    };
    let to = if number == span.end.line {
        span.end.column
    } else {
        line_len.max(1)
    };
    let to = to.max(from);

    let mut annotation = "^".repeat(to - from + 1);
    if number == span.end.line && !span.message.is_empty() {
        annotation.push(' ');
        annotation.push_str(&span.message);
    }

    format!(
        "  {:>width$} | {}{}",
        "",
        " ".repeat(from - 1),
        paint(&annotation, use_color),
        width = width
    )
}

fn paint(text: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", RED, text, RESET)
    } else {
        text.to_string()
    }
}

// Token patterns are alternations; the regex crate's leftmost-first
// semantics make the key branch win over the plain string branch at the
// same start position.
const JSON_TOKENS: &str = concat!(
    r#"(?P<key>"(?:[^"\\]|\\.)*"\s*:)"#,
    r#"|(?P<str>"(?:[^"\\]|\\.)*")"#,
    r"|(?P<num>-?\d+(?:\.\d+)?(?:[eE][+-]?\d+)?)",
    r"|\b(?P<lit>true|false|null)\b",
);

const YAML_TOKENS: &str = concat!(
    r"(?P<pre>^\s*(?:- )*)(?P<key>[^\s:](?:[^:]*[^\s:])?:)",
    r#"|(?P<str>"(?:[^"\\]|\\.)*"|'(?:[^']|'')*')"#,
    r"|(?P<num>-\d+(?:\.\d+)?(?:[eE][+-]?\d+)?\b|\b\d+(?:\.\d+)?(?:[eE][+-]?\d+)?\b)",
    r"|(?P<lit>\btrue\b|\bfalse\b|\bnull\b|~)",
);

/// Colors the tokens of one source line.
///
/// Runs a single pass over the raw line so inserted escape codes are never
/// re-scanned. Keys are cyan, strings green, numbers yellow, and keyword
/// literals magenta.
fn highlight(line: &str, language: Language) -> String {
    let pattern = match language {
        Language::Json => JSON_TOKENS,
        Language::Yaml => YAML_TOKENS,
    };
    let re = match Regex::new(pattern) {
        Ok(re) => re,
        Err(_) => return line.to_string(),
    };

    re.replace_all(line, |caps: &Captures| {
        if let (Some(pre), Some(key)) = (caps.name("pre"), caps.name("key")) {
            return format!("{}{}{}{}", pre.as_str(), CYAN, key.as_str(), RESET);
        }
        for (name, color) in [("key", CYAN), ("str", GREEN), ("num", YELLOW), ("lit", MAGENTA)] {
            if let Some(m) = caps.name(name) {
                return format!("{}{}{}", color, m.as_str(), RESET);
            }
        }
        caps[0].to_string()
    })
    .into_owned()
}

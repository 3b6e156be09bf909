//! # Pinpoint
//!
//! A formatting library that renders validation issues as annotated code
//! frames, pointing at the exact position of each offending value in
//! JSON or YAML.
//!
//! ## Overview
//!
//! Validation errors that name a path like `users.0.email` force readers
//! to traverse the payload in their head. Pinpoint re-serializes the
//! payload to canonical text, maps every path to its position in that
//! text, and renders the lines around each issue with a caret and the
//! issue's message. When several issues are formatted together, failures
//! accumulate through stillwater's `Validation` type rather than
//! short-circuiting on the first missing path.
//!
//! ## Core Types
//!
//! - [`Issue`]: A single validation finding (path plus message)
//! - [`IssuePath`]: Represents paths to values in nested structures (e.g., `users.0.email`)
//! - [`JsonSourceMap`] / [`YamlSourceMap`]: Serialized text with the position of every value
//! - [`Span`]: A 1-indexed region of the serialized text carrying a message
//! - [`FormatErrors`]: A non-empty collection of formatting failures
//!
//! ## Example
//!
//! ```rust
//! use pinpoint::{format_error, FormatOptions, Issue, IssuePath};
//! use serde_json::json;
//!
//! let issue = Issue::new(IssuePath::from_key("age"), "must be at least 0");
//! let payload = json!({"age": -5});
//!
//! let frame = format_error(&issue, &payload, FormatOptions::plain()).unwrap();
//! assert_eq!(
//!     frame,
//!     [
//!         "  1 | {",
//!         "> 2 |   \"age\": -5",
//!         "    |          ^^ must be at least 0",
//!         "  3 | }",
//!     ]
//!     .join("\n")
//! );
//! ```

pub mod error;
pub mod frame;
pub mod issue;
pub mod json;
pub mod path;
pub mod span;
pub mod yaml;

pub use error::{FormatError, FormatErrors};
pub use frame::{DefaultFrameRenderer, FormatOptions, FrameRenderer, Language};
pub use issue::Issue;
pub use json::{format_all, format_error, path_to_pointer, JsonSourceMap, PointerEntry};
pub use path::{IssuePath, PathSegment};
pub use span::{Position, Span};
pub use yaml::{format_yaml_all, format_yaml_error, path_to_dotted, YamlSourceMap};

/// Type alias for formatting results using FormatErrors
pub type FormatResult<T> = stillwater::Validation<T, FormatErrors>;

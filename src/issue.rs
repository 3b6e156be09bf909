//! The validation issue consumed by the formatting pipelines.

use std::fmt::{self, Display};

use crate::path::IssuePath;

/// A single validation failure reported by an external validator.
///
/// `Issue` is the input contract of both formatting pipelines: the logical
/// path to the offending value in the deserialized payload, plus a
/// human-readable message. Issues are read-only here; this crate never
/// produces them.
///
/// # Example
///
/// ```rust
/// use pinpoint::{Issue, IssuePath};
///
/// let issue = Issue::new(
///     IssuePath::root().push_key("age"),
///     "must be greater than or equal to 0",
/// );
///
/// assert_eq!(issue.to_string(), "age: must be greater than or equal to 0");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    /// The path to the value that failed validation.
    pub path: IssuePath,
    /// Human-readable description of the failure.
    pub message: String,
}

impl Issue {
    /// Creates a new issue with the given path and message.
    pub fn new(path: IssuePath, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }
}

impl Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path_str = if self.path.is_root() {
            "(root)".to_string()
        } else {
            self.path.to_string()
        };

        write!(f, "{}: {}", path_str, self.message)
    }
}

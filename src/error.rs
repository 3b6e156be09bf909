//! Error types for source position resolution.
//!
//! This module provides [`FormatError`] for single formatting failures and
//! [`FormatErrors`] for accumulating multiple failures across a batch of
//! issues.

use std::fmt::{self, Display};

use stillwater::prelude::*;

/// A failure while formatting a validation issue.
///
/// Resolution is deterministic and pure: a missing path surfaces immediately
/// as [`FormatError::PathNotFound`] and is never recovered internally.
/// Failures of the YAML serialization collaborators pass through unmodified.
///
/// # Example
///
/// ```rust
/// use pinpoint::FormatError;
///
/// let error = FormatError::PathNotFound("user.age".to_string());
/// assert_eq!(
///     error.to_string(),
///     "could not find position for path 'user.age'"
/// );
/// ```
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// The normalized path has no entry in the format's position map.
    ///
    /// Carries the original dotted path (all segments joined with `.`,
    /// before any format-specific normalization) for diagnostic clarity.
    #[error("could not find position for path '{0}'")]
    PathNotFound(String),

    /// The payload could not be serialized to YAML.
    #[error(transparent)]
    Serialize(#[from] serde_yaml::Error),

    /// The serialized YAML text could not be re-parsed for positions.
    #[error(transparent)]
    Reparse(#[from] yaml_rust2::ScanError),
}

// FormatError is Send + Sync since all contained error types are.
// This is automatically derived, but we add these assertions to ensure
// it remains true if the types change.
const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<FormatError>();
    assert_sync::<FormatError>();
};

/// A non-empty collection of formatting failures.
///
/// `FormatErrors` wraps a `NonEmptyVec<FormatError>` to guarantee that at
/// least one error is present. This is essential for use with
/// `Validation<T, FormatErrors>` since a failure must have at least one
/// error.
///
/// # Combining Errors
///
/// `FormatErrors` implements `Semigroup`, allowing failures from multiple
/// issues to be combined:
///
/// ```rust
/// use pinpoint::{FormatError, FormatErrors};
/// use stillwater::prelude::*;
///
/// let errors1 = FormatErrors::single(FormatError::PathNotFound("name".to_string()));
/// let errors2 = FormatErrors::single(FormatError::PathNotFound("email".to_string()));
///
/// let combined = errors1.combine(errors2);
/// assert_eq!(combined.len(), 2);
/// ```
#[derive(Debug)]
pub struct FormatErrors(NonEmptyVec<FormatError>);

impl FormatErrors {
    /// Creates a `FormatErrors` containing a single error.
    pub fn single(error: FormatError) -> Self {
        Self(NonEmptyVec::singleton(error))
    }

    /// Creates a `FormatErrors` from a `NonEmptyVec` of errors.
    pub fn from_non_empty(errors: NonEmptyVec<FormatError>) -> Self {
        Self(errors)
    }

    /// Returns the number of errors in this collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns false since this collection is guaranteed non-empty.
    ///
    /// This method exists for API consistency but always returns false.
    pub fn is_empty(&self) -> bool {
        false // NonEmptyVec is never empty
    }

    /// Returns an iterator over the contained errors.
    pub fn iter(&self) -> impl Iterator<Item = &FormatError> {
        self.0.iter()
    }

    /// Returns the dotted paths of all `PathNotFound` errors, in order.
    pub fn missing_paths(&self) -> Vec<&str> {
        self.0
            .iter()
            .filter_map(|e| match e {
                FormatError::PathNotFound(path) => Some(path.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Returns the first error in the collection.
    pub fn first(&self) -> &FormatError {
        self.0.head()
    }

    /// Converts this collection into a `Vec<FormatError>`.
    pub fn into_vec(self) -> Vec<FormatError> {
        self.0.into_vec()
    }

    /// Returns a reference to the underlying `NonEmptyVec`.
    pub fn as_non_empty_vec(&self) -> &NonEmptyVec<FormatError> {
        &self.0
    }

    /// Creates a `FormatErrors` from a `Vec<FormatError>`.
    ///
    /// Returns the `FormatErrors` if the vec is non-empty, or panics if
    /// empty. Use this when you're certain the vec contains at least one
    /// error.
    ///
    /// # Panics
    ///
    /// Panics if the provided vec is empty.
    pub fn from_vec(errors: Vec<FormatError>) -> Self {
        Self(NonEmptyVec::from_vec(errors).expect("FormatErrors requires at least one error"))
    }
}

impl Semigroup for FormatErrors {
    fn combine(self, other: Self) -> Self {
        FormatErrors(self.0.combine(other.0))
    }
}

impl Display for FormatErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Formatting failed with {} error(s):", self.len())?;
        for (i, error) in self.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, error)?;
        }
        Ok(())
    }
}

impl std::error::Error for FormatErrors {}

impl IntoIterator for FormatErrors {
    type Item = FormatError;
    type IntoIter = std::vec::IntoIter<FormatError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

impl<'a> IntoIterator for &'a FormatErrors {
    type Item = &'a FormatError;
    type IntoIter = Box<dyn Iterator<Item = &'a FormatError> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.0.iter())
    }
}

// FormatErrors is Send + Sync since it only contains FormatError which is Send + Sync
const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<FormatErrors>();
    assert_sync::<FormatErrors>();
};

//! Error types for glossa operations.

use thiserror::Error;

/// Errors that can occur while reading or writing a package.
#[derive(Error, Debug)]
pub enum Error {
    /// The archive, its container descriptor, or its package descriptor is
    /// missing or malformed. Fatal to the whole read.
    #[error("{0}")]
    Format(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

impl Error {
    pub(crate) fn format(cause: impl Into<String>) -> Self {
        Error::Format(cause.into())
    }

    /// True for container/package level format failures.
    pub fn is_format(&self) -> bool {
        matches!(self, Error::Format(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_display_is_bare_cause() {
        let err = Error::format("missing rootfile pointer");
        assert_eq!(err.to_string(), "missing rootfile pointer");
        assert!(err.is_format());
    }

    #[test]
    fn test_io_is_not_format() {
        let err: Error = std::io::Error::other("disk full").into();
        assert!(!err.is_format());
        assert!(err.to_string().contains("disk full"));
    }
}

use thiserror::Error;

/// All error types for awkline
#[derive(Error, Debug)]
pub enum Error {
    /// Strict 0-based field access outside the current field list.
    #[error("field index {index} out of bounds (record has {count} fields)")]
    FieldIndex { index: usize, count: usize },

    /// A pattern spec that cannot be registered (zero line number, zero
    /// step, non-positive range bound).
    #[error("invalid pattern: {message}")]
    Pattern { message: String },

    /// A field separator that cannot be used for splitting.
    #[error("invalid field separator: {message}")]
    Separator { message: String },

    /// A failure raised by a registered handler during dispatch.
    #[error("handler error: {message}")]
    Runtime { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl Error {
    pub fn pattern(message: impl Into<String>) -> Self {
        Self::Pattern {
            message: message.into(),
        }
    }

    pub fn separator(message: impl Into<String>) -> Self {
        Self::Separator {
            message: message.into(),
        }
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        Self::Runtime {
            message: message.into(),
        }
    }
}

/// Result type alias for awkline operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_index_error() {
        let err = Error::FieldIndex { index: 7, count: 3 };
        let msg = format!("{}", err);
        assert!(msg.contains("field index 7"));
        assert!(msg.contains("3 fields"));
    }

    #[test]
    fn test_pattern_error() {
        let err = Error::pattern("step must be non-zero");
        assert!(matches!(err, Error::Pattern { .. }));
        let msg = format!("{}", err);
        assert!(msg.contains("invalid pattern"));
        assert!(msg.contains("step must be non-zero"));
    }

    #[test]
    fn test_separator_error() {
        let err = Error::separator("empty literal separator");
        assert!(matches!(err, Error::Separator { .. }));
        assert!(format!("{}", err).contains("invalid field separator"));
    }

    #[test]
    fn test_runtime_error() {
        let err = Error::runtime("bad record");
        assert!(matches!(err, Error::Runtime { .. }));
        let msg = format!("{}", err);
        assert!(msg.contains("handler error"));
        assert!(msg.contains("bad record"));
    }

    #[test]
    fn test_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(format!("{}", err).contains("I/O error"));
    }

    #[test]
    fn test_regex_error() {
        let re_err = regex::Regex::new("[invalid").unwrap_err();
        let err: Error = re_err.into();
        assert!(matches!(err, Error::Regex(_)));
        assert!(format!("{}", err).contains("regex error"));
    }
}

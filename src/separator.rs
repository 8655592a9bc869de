use regex::Regex;

use crate::error::{Error, Result};

/// Field-splitting rule applied to every incoming record.
///
/// `Whitespace` is the default and mirrors the classic `FS = " "` behavior:
/// fields are runs of non-blank characters with leading and trailing blanks
/// ignored. `Regex` splits on every match of the pattern and `Literal` splits
/// on an exact string; both of these keep empty fields, so a leading
/// separator produces a leading empty field.
#[derive(Debug, Clone)]
pub enum FieldSeparator {
    /// Runs of spaces, tabs and newlines, trimmed at both ends.
    Whitespace,
    /// Split on every match of a regular expression.
    Regex(Regex),
    /// Split on an exact, non-empty string.
    Literal(String),
}

impl FieldSeparator {
    /// Build a regex separator. Fails at configuration time if the pattern
    /// does not compile.
    pub fn regex(pattern: &str) -> Result<Self> {
        let re = Regex::new(pattern).map_err(Error::Regex)?;
        Ok(FieldSeparator::Regex(re))
    }

    /// Build a literal separator. The empty string is rejected since it
    /// produces no usable field boundaries.
    pub fn literal(separator: impl Into<String>) -> Result<Self> {
        let separator = separator.into();
        if separator.is_empty() {
            return Err(Error::separator("literal separator must be non-empty"));
        }
        Ok(FieldSeparator::Literal(separator))
    }

    /// Split one record into fields.
    pub fn split(&self, text: &str) -> Vec<String> {
        match self {
            FieldSeparator::Whitespace => {
                text.split_whitespace().map(String::from).collect()
            }
            FieldSeparator::Regex(re) => re.split(text).map(String::from).collect(),
            FieldSeparator::Literal(sep) => text.split(sep.as_str()).map(String::from).collect(),
        }
    }
}

impl Default for FieldSeparator {
    fn default() -> Self {
        FieldSeparator::Whitespace
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_split() {
        let sep = FieldSeparator::default();
        assert_eq!(sep.split("one two three"), vec!["one", "two", "three"]);
        assert_eq!(sep.split("  a \t b  "), vec!["a", "b"]);
        assert!(sep.split("").is_empty());
    }

    #[test]
    fn test_regex_split() {
        let sep = FieldSeparator::regex(r"\s+").unwrap();
        assert_eq!(sep.split("a   b c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_regex_split_keeps_empty_fields() {
        let sep = FieldSeparator::regex(",").unwrap();
        assert_eq!(sep.split(",a,,b"), vec!["", "a", "", "b"]);
    }

    #[test]
    fn test_literal_split() {
        let sep = FieldSeparator::literal("\t").unwrap();
        assert_eq!(sep.split("a\tb\tc"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_literal_is_not_a_regex() {
        // "." would match everything as a regex; literally it is just a dot.
        let sep = FieldSeparator::literal(".").unwrap();
        assert_eq!(sep.split("a.b"), vec!["a", "b"]);
    }

    #[test]
    fn test_invalid_regex_fails_at_configuration() {
        assert!(matches!(
            FieldSeparator::regex("[unclosed"),
            Err(Error::Regex(_))
        ));
    }

    #[test]
    fn test_empty_literal_rejected() {
        assert!(matches!(
            FieldSeparator::literal(""),
            Err(Error::Separator { .. })
        ));
    }

    #[test]
    fn test_empty_line_regex_split() {
        // Regex and literal modes keep the single empty field.
        let sep = FieldSeparator::regex(",").unwrap();
        assert_eq!(sep.split(""), vec![""]);
    }
}

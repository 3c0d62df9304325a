//! Validated storage path for an uploaded receipt image
//!
//! Applied to the path *returned by the upload resolver*, not to the
//! caller-supplied file name (the orchestrator validates that separately
//! before resolution).

use recivo_common::catalog::codes;
use std::fmt;
use thiserror::Error;

/// Maximum accepted path length in characters
pub const MAX_PATH_LEN: usize = 255;

/// Path validation failures, one per rule
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("image path is empty")]
    Empty,

    #[error("image path is too long (max {MAX_PATH_LEN} characters)")]
    TooLong,

    #[error("image path must start with '/'")]
    MissingLeadingSlash,

    #[error("image path contains a parent directory reference")]
    ParentTraversal,

    #[error("image path contains consecutive separators")]
    DoubleSeparator,
}

impl PathError {
    /// Catalog code for this failure
    pub fn code(&self) -> &'static str {
        match self {
            PathError::Empty => codes::INVALID_PARAMETER,
            PathError::TooLong => codes::PATH_TOO_LONG,
            PathError::MissingLeadingSlash => codes::INVALID_PATH_FORMAT,
            PathError::ParentTraversal => codes::PATH_TRAVERSAL,
            PathError::DoubleSeparator => codes::DOUBLE_SEPARATOR,
        }
    }
}

/// A storage path that has passed format validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePath(String);

impl ImagePath {
    /// Validate a resolved storage path
    ///
    /// Rules are checked in order and the first failure wins:
    /// 1. non-empty after trimming whitespace
    /// 2. at most 255 characters
    /// 3. starts with `/`
    /// 4. no parent directory reference (`..`)
    /// 5. no consecutive separators (`//`)
    pub fn parse(path: &str) -> Result<Self, PathError> {
        if path.trim().is_empty() {
            return Err(PathError::Empty);
        }
        if path.chars().count() > MAX_PATH_LEN {
            return Err(PathError::TooLong);
        }
        if !path.starts_with('/') {
            return Err(PathError::MissingLeadingSlash);
        }
        if path.contains("..") {
            return Err(PathError::ParentTraversal);
        }
        if path.contains("//") {
            return Err(PathError::DoubleSeparator);
        }
        Ok(Self(path.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ImagePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_path() {
        let path = ImagePath::parse("/image/a1b2c3/receipt.jpg").unwrap();
        assert_eq!(path.as_str(), "/image/a1b2c3/receipt.jpg");
    }

    #[test]
    fn rejects_empty_and_whitespace_only() {
        assert_eq!(ImagePath::parse(""), Err(PathError::Empty));
        assert_eq!(ImagePath::parse("   "), Err(PathError::Empty));
        assert_eq!(PathError::Empty.code(), "E40001");
    }

    #[test]
    fn rejects_over_length_path() {
        let long = format!("/{}", "a".repeat(MAX_PATH_LEN));
        assert_eq!(ImagePath::parse(&long), Err(PathError::TooLong));
        assert_eq!(PathError::TooLong.code(), "E40003");

        // exactly at the limit is fine
        let at_limit = format!("/{}", "a".repeat(MAX_PATH_LEN - 1));
        assert!(ImagePath::parse(&at_limit).is_ok());
    }

    #[test]
    fn rejects_missing_leading_slash() {
        assert_eq!(
            ImagePath::parse("image/receipt.jpg"),
            Err(PathError::MissingLeadingSlash)
        );
        assert_eq!(PathError::MissingLeadingSlash.code(), "E40002");
    }

    #[test]
    fn rejects_parent_traversal() {
        assert_eq!(
            ImagePath::parse("/image/../etc/passwd"),
            Err(PathError::ParentTraversal)
        );
        assert_eq!(PathError::ParentTraversal.code(), "E40005");
    }

    #[test]
    fn rejects_double_separator() {
        assert_eq!(
            ImagePath::parse("/image//receipt.jpg"),
            Err(PathError::DoubleSeparator)
        );
        assert_eq!(PathError::DoubleSeparator.code(), "E40006");
    }

    #[test]
    fn first_failing_rule_wins() {
        // over-length beats the missing slash check
        let long = "a".repeat(MAX_PATH_LEN + 1);
        assert_eq!(ImagePath::parse(&long), Err(PathError::TooLong));

        // missing slash beats the traversal check
        assert_eq!(
            ImagePath::parse("image/../x"),
            Err(PathError::MissingLeadingSlash)
        );

        // traversal beats the double separator check
        assert_eq!(
            ImagePath::parse("/image/..//x"),
            Err(PathError::ParentTraversal)
        );
    }

    #[test]
    fn each_rule_maps_to_a_distinct_code() {
        let codes = [
            PathError::Empty.code(),
            PathError::TooLong.code(),
            PathError::MissingLeadingSlash.code(),
            PathError::ParentTraversal.code(),
            PathError::DoubleSeparator.code(),
        ];
        let unique: std::collections::HashSet<_> = codes.iter().collect();
        assert_eq!(unique.len(), codes.len());
    }
}

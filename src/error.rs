//! Error types for Taskboard.
//!
//! Only contractually missing input is an error here. Data-quality problems
//! (unparsable dates, empty denominators) are absorbed by the calculator.

use thiserror::Error;

use crate::model::Category;

#[derive(Debug, Error)]
pub enum Error {
    /// A required parameter (month, week) was missing or unusable.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No record with the given id exists in the category.
    #[error("{category} record not found: {id}")]
    NotFound { category: Category, id: String },

    /// Opaque failure from the data-access layer.
    #[error("repository error: {0}")]
    Repository(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = Error::NotFound {
            category: Category::HelpTicket,
            id: "abc123".to_string(),
        };
        assert_eq!(err.to_string(), "help ticket record not found: abc123");
    }

    #[test]
    fn test_repository_error_from_anyhow() {
        let err: Error = anyhow::anyhow!("quota exceeded").into();
        assert!(matches!(err, Error::Repository(_)));
        assert!(err.to_string().contains("quota exceeded"));
    }
}

use thiserror::Error;

use crate::checklist::{BestPracticeId, QuestionId, ValidationError};

/// Errors that can occur during store operations.
///
/// A failed mutation never leaves a partial change behind.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("{entity_type} already exists: {key}")]
    DuplicateKey {
        entity_type: &'static str,
        key: String,
    },
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error(
        "Best practice {best_practice_id} belongs to question {owner_question_id}, not question {question_id}"
    )]
    Inconsistent {
        question_id: QuestionId,
        best_practice_id: BestPracticeId,
        owner_question_id: QuestionId,
    },
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        StoreError::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    pub fn duplicate(entity_type: &'static str, key: impl Into<String>) -> Self {
        StoreError::DuplicateKey {
            entity_type,
            key: key.into(),
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(err: ValidationError) -> Self {
        StoreError::InvalidArgument(err.to_string())
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

use thiserror::Error;

/// Errors raised while validating checklist records before they are stored.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Question text cannot be empty")]
    EmptyQuestionText,
    #[error("Best practice description cannot be empty")]
    EmptyBestPracticeDescription,
    #[error("Best practice link cannot be empty")]
    EmptyLink,
    #[error("Violated resource service cannot be empty")]
    EmptyService,
    #[error("Violated resource description cannot be empty")]
    EmptyResourceDescription,
    #[error("Unknown severity: {0} (expected Low, Medium or High)")]
    UnknownSeverity(String),
    #[error("Unknown implementation type: {0} (expected Manual or Automated)")]
    UnknownImplementationType(String),
    #[error("Violated resource count cannot be negative: {0}")]
    NegativeResourceCount(i64),
    #[error("Violated resource count too large: {0}")]
    ResourceCountTooLarge(i64),
}

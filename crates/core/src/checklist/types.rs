use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::ValidationError;

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// The first id handed out by a fresh table.
            pub const FIRST: Self = Self(1);

            /// Returns the zero-based arena slot for this id, if it can have one.
            pub fn index(self) -> Option<usize> {
                usize::try_from(self.0).ok()?.checked_sub(1)
            }

            /// Builds the id stored in the given zero-based arena slot.
            pub fn from_index(index: usize) -> Self {
                Self(index as i64 + 1)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }
    };
}

record_id!(
    /// Identifier of a [`Question`].
    QuestionId
);
record_id!(
    /// Identifier of a [`BestPractice`].
    BestPracticeId
);
record_id!(
    /// Identifier of a [`Finding`].
    FindingId
);

/// Qualitative risk level of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// Canonical name, as persisted.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            _ => Err(ValidationError::UnknownSeverity(s.to_string())),
        }
    }
}

/// Whether remediating a best practice is a manual or an automated job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImplementationType {
    Manual,
    Automated,
}

impl ImplementationType {
    /// Canonical name, as persisted.
    pub fn as_str(&self) -> &'static str {
        match self {
            ImplementationType::Manual => "Manual",
            ImplementationType::Automated => "Automated",
        }
    }
}

impl fmt::Display for ImplementationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImplementationType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "manual" => Ok(ImplementationType::Manual),
            "automated" => Ok(ImplementationType::Automated),
            _ => Err(ValidationError::UnknownImplementationType(s.to_string())),
        }
    }
}

/// A security review question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    /// Unique across all questions.
    pub text: String,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
    /// Starts at 1 and goes up by one on every update.
    pub version: u32,
}

impl Question {
    /// Creates the first version of a question.
    pub fn new(id: QuestionId, text: impl Into<String>, severity: Severity) -> Self {
        Self {
            id,
            text: text.into(),
            severity,
            created_at: Utc::now(),
            version: 1,
        }
    }
}

/// A recommended control attached to a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestPractice {
    pub id: BestPracticeId,
    /// Unique across all best practices.
    pub description: String,
    /// The question this best practice belongs to.
    pub question_id: QuestionId,
    pub link: String,
    pub implementation_type: ImplementationType,
    pub created_at: DateTime<Utc>,
    pub version: u32,
}

impl BestPractice {
    /// Creates the first version of a best practice.
    pub fn new(
        id: BestPracticeId,
        description: impl Into<String>,
        question_id: QuestionId,
        link: impl Into<String>,
        implementation_type: ImplementationType,
    ) -> Self {
        Self {
            id,
            description: description.into(),
            question_id,
            link: link.into(),
            implementation_type,
            created_at: Utc::now(),
            version: 1,
        }
    }
}

/// An observed violation of a best practice on real infrastructure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub id: FindingId,
    pub question_id: QuestionId,
    /// Must belong to `question_id`.
    pub best_practice_id: BestPracticeId,
    pub violated_resource_count: u32,
    pub violated_resource_service: String,
    pub violated_resource_description: String,
    /// `false` while open, `true` once remediated.
    pub implementation_status: bool,
    pub created_at: DateTime<Utc>,
    pub version: u32,
}

impl Finding {
    /// Returns true once the finding has been remediated.
    pub fn is_remediated(&self) -> bool {
        self.implementation_status
    }

    /// Sets the status and records the change as a new version.
    pub fn set_status(&mut self, status: bool) {
        self.implementation_status = status;
        self.version += 1;
    }
}

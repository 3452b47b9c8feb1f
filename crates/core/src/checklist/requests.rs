//! Request types for checklist mutations.
//!
//! Requests carry raw caller input. `validate` turns them into drafts whose
//! fields are already parsed and checked, so a store only has to assign ids
//! and enforce the cross-table rules.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::error::ValidationError;
use super::types::{
    BestPractice, BestPracticeId, Finding, FindingId, ImplementationType, Question, QuestionId,
    Severity,
};

/// Trims `value` and rejects it when nothing is left.
fn required(value: String, error: ValidationError) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(error);
    }
    Ok(trimmed.to_string())
}

/// Request payload for adding a question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewQuestion {
    pub text: String,
    pub severity: String,
}

impl NewQuestion {
    pub fn new(text: impl Into<String>, severity: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity: severity.into(),
        }
    }

    /// Checks the text and parses the severity.
    pub fn validate(self) -> Result<QuestionDraft, ValidationError> {
        let text = required(self.text, ValidationError::EmptyQuestionText)?;
        let severity = self.severity.parse()?;
        Ok(QuestionDraft { text, severity })
    }
}

/// A validated question waiting for an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDraft {
    pub text: String,
    pub severity: Severity,
}

impl QuestionDraft {
    pub fn into_question(self, id: QuestionId) -> Question {
        Question::new(id, self.text, self.severity)
    }
}

/// Request payload for adding a best practice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBestPractice {
    pub description: String,
    pub question_id: QuestionId,
    pub link: String,
    pub implementation_type: String,
}

impl NewBestPractice {
    pub fn new(
        description: impl Into<String>,
        question_id: QuestionId,
        link: impl Into<String>,
        implementation_type: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            question_id,
            link: link.into(),
            implementation_type: implementation_type.into(),
        }
    }

    pub fn validate(self) -> Result<BestPracticeDraft, ValidationError> {
        let description = required(
            self.description,
            ValidationError::EmptyBestPracticeDescription,
        )?;
        let link = required(self.link, ValidationError::EmptyLink)?;
        let implementation_type = self.implementation_type.parse()?;
        Ok(BestPracticeDraft {
            description,
            question_id: self.question_id,
            link,
            implementation_type,
        })
    }
}

/// A validated best practice waiting for an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BestPracticeDraft {
    pub description: String,
    pub question_id: QuestionId,
    pub link: String,
    pub implementation_type: ImplementationType,
}

impl BestPracticeDraft {
    pub fn into_best_practice(self, id: BestPracticeId) -> BestPractice {
        BestPractice::new(
            id,
            self.description,
            self.question_id,
            self.link,
            self.implementation_type,
        )
    }
}

/// Request payload for recording a finding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFinding {
    pub question_id: QuestionId,
    pub best_practice_id: BestPracticeId,
    pub service: String,
    pub description: String,
    #[serde(default)]
    pub resource_count: i64,
    #[serde(default)]
    pub status: bool,
}

impl NewFinding {
    /// Creates an open finding with no counted resources.
    pub fn new(
        question_id: QuestionId,
        best_practice_id: BestPracticeId,
        service: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            question_id,
            best_practice_id,
            service: service.into(),
            description: description.into(),
            resource_count: 0,
            status: false,
        }
    }

    pub fn with_resource_count(mut self, count: i64) -> Self {
        self.resource_count = count;
        self
    }

    pub fn with_status(mut self, status: bool) -> Self {
        self.status = status;
        self
    }

    pub fn validate(self) -> Result<FindingDraft, ValidationError> {
        let service = required(self.service, ValidationError::EmptyService)?;
        let description = required(self.description, ValidationError::EmptyResourceDescription)?;
        if self.resource_count < 0 {
            return Err(ValidationError::NegativeResourceCount(self.resource_count));
        }
        let resource_count = u32::try_from(self.resource_count)
            .map_err(|_| ValidationError::ResourceCountTooLarge(self.resource_count))?;
        Ok(FindingDraft {
            question_id: self.question_id,
            best_practice_id: self.best_practice_id,
            service,
            description,
            resource_count,
            status: self.status,
        })
    }
}

/// A validated finding waiting for an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindingDraft {
    pub question_id: QuestionId,
    pub best_practice_id: BestPracticeId,
    pub service: String,
    pub description: String,
    pub resource_count: u32,
    pub status: bool,
}

impl FindingDraft {
    pub fn into_finding(self, id: FindingId) -> Finding {
        Finding {
            id,
            question_id: self.question_id,
            best_practice_id: self.best_practice_id,
            violated_resource_count: self.resource_count,
            violated_resource_service: self.service,
            violated_resource_description: self.description,
            implementation_status: self.status,
            created_at: Utc::now(),
            version: 1,
        }
    }
}

/// Request payload for updating a question.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateQuestion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
}

impl UpdateQuestion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_severity(mut self, severity: impl Into<String>) -> Self {
        self.severity = Some(severity.into());
        self
    }

    pub fn validate(self) -> Result<QuestionChanges, ValidationError> {
        let text = self
            .text
            .map(|text| required(text, ValidationError::EmptyQuestionText))
            .transpose()?;
        let severity = self.severity.map(|s| s.parse()).transpose()?;
        Ok(QuestionChanges { text, severity })
    }
}

/// Validated changes to a question.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionChanges {
    pub text: Option<String>,
    pub severity: Option<Severity>,
}

impl QuestionChanges {
    /// Applies the changes as a new version. `created_at` is left untouched.
    pub fn apply_to(self, question: &mut Question) {
        if let Some(text) = self.text {
            question.text = text;
        }
        if let Some(severity) = self.severity {
            question.severity = severity;
        }
        question.version += 1;
    }
}

/// Request payload for updating a best practice.
///
/// The description and owning question are fixed once recorded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBestPractice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implementation_type: Option<String>,
}

impl UpdateBestPractice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn with_implementation_type(mut self, implementation_type: impl Into<String>) -> Self {
        self.implementation_type = Some(implementation_type.into());
        self
    }

    pub fn validate(self) -> Result<BestPracticeChanges, ValidationError> {
        let link = self
            .link
            .map(|link| required(link, ValidationError::EmptyLink))
            .transpose()?;
        let implementation_type = self
            .implementation_type
            .map(|t| t.parse())
            .transpose()?;
        Ok(BestPracticeChanges {
            link,
            implementation_type,
        })
    }
}

/// Validated changes to a best practice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BestPracticeChanges {
    pub link: Option<String>,
    pub implementation_type: Option<ImplementationType>,
}

impl BestPracticeChanges {
    pub fn apply_to(self, best_practice: &mut BestPractice) {
        if let Some(link) = self.link {
            best_practice.link = link;
        }
        if let Some(implementation_type) = self.implementation_type {
            best_practice.implementation_type = implementation_type;
        }
        best_practice.version += 1;
    }
}

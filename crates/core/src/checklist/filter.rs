use serde::{Deserialize, Serialize};

use super::types::{Finding, QuestionId};

/// Optional criteria for listing findings. Set fields are combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindingFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_id: Option<QuestionId>,
    /// `false` selects open findings, `true` remediated ones.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<bool>,
    /// Exact match on the violated resource service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
}

impl FindingFilter {
    /// A filter that matches every finding.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_question(mut self, question_id: QuestionId) -> Self {
        self.question_id = Some(question_id);
        self
    }

    pub fn with_status(mut self, status: bool) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }

    pub fn matches(&self, finding: &Finding) -> bool {
        self.question_id.is_none_or(|id| finding.question_id == id)
            && self
                .status
                .is_none_or(|status| finding.implementation_status == status)
            && self
                .service
                .as_deref()
                .is_none_or(|service| finding.violated_resource_service == service)
    }
}

use async_trait::async_trait;

use crate::checklist::{
    BestPractice, BestPracticeId, Finding, FindingFilter, FindingId, IntegrityViolation,
    NewBestPractice, NewFinding, NewQuestion, Question, QuestionId, UpdateBestPractice,
    UpdateQuestion,
};

use super::{FindingSet, Result};

/// The checklist store: questions, their best practices and the findings
/// filed against them.
///
/// Mutations are serialized against each other and against
/// [`check_integrity`](ChecklistStore::check_integrity). Each one either
/// applies completely or leaves every table unchanged.
#[async_trait]
pub trait ChecklistStore: Send + Sync {
    /// Adds a question at version 1.
    ///
    /// Fails with `InvalidArgument` on empty text or an unknown severity and
    /// with `DuplicateKey` when the text is already taken.
    async fn add_question(&self, request: NewQuestion) -> Result<Question>;

    /// Adds a best practice under an existing question.
    ///
    /// Fails with `NotFound` for an unknown question and `DuplicateKey` on a
    /// description that is already taken.
    async fn add_best_practice(&self, request: NewBestPractice) -> Result<BestPractice>;

    /// Records a finding against a question and one of its best practices.
    ///
    /// Fails with `NotFound` when either reference is unknown and with
    /// `Inconsistent` when the best practice belongs to another question.
    async fn add_finding(&self, request: NewFinding) -> Result<Finding>;

    /// Sets a finding's implementation status and bumps its version, even
    /// when the status does not change.
    async fn update_status(&self, id: FindingId, status: bool) -> Result<Finding>;

    /// Changes a question's text or severity.
    async fn update_question(&self, id: QuestionId, request: UpdateQuestion) -> Result<Question>;

    /// Changes a best practice's link or implementation type.
    async fn update_best_practice(
        &self,
        id: BestPracticeId,
        request: UpdateBestPractice,
    ) -> Result<BestPractice>;

    async fn get_question(&self, id: QuestionId) -> Result<Option<Question>>;

    async fn get_best_practice(&self, id: BestPracticeId) -> Result<Option<BestPractice>>;

    async fn get_finding(&self, id: FindingId) -> Result<Option<Finding>>;

    /// Lists every question in id order.
    async fn list_questions(&self) -> Result<Vec<Question>>;

    /// Lists best practices in id order, optionally only those of one question.
    async fn list_best_practices(&self, question_id: Option<QuestionId>)
        -> Result<Vec<BestPractice>>;

    /// Returns the findings matching `filter` as a restartable sequence.
    async fn list_findings(&self, filter: FindingFilter) -> Result<FindingSet>;

    /// Scans all tables and reports every referential violation.
    async fn check_integrity(&self) -> Result<Vec<IntegrityViolation>>;
}

//! In-memory store implementation.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use checklist_core::checklist::{
    scan_integrity, BestPractice, BestPracticeId, Finding, FindingFilter, FindingId,
    IntegrityViolation, NewBestPractice, NewFinding, NewQuestion, Question, QuestionId,
    UpdateBestPractice, UpdateQuestion,
};
use checklist_core::storage::{ChecklistStore, FindingSet, Result, StoreError};

/// The three tables plus their unique-key indexes.
///
/// Records are kept in arenas: the record with id `n` lives at slot `n - 1`,
/// and nothing is ever removed, so ids stay stable and strictly increasing.
#[derive(Debug, Default)]
struct Tables {
    questions: Vec<Question>,
    best_practices: Vec<BestPractice>,
    /// Shared with outstanding [`FindingSet`] snapshots; copied on write.
    findings: Arc<Vec<Finding>>,
    question_texts: HashMap<String, QuestionId>,
    best_practice_descriptions: HashSet<String>,
}

impl Tables {
    fn question(&self, id: QuestionId) -> Option<&Question> {
        id.index().and_then(|i| self.questions.get(i))
    }

    fn best_practice(&self, id: BestPracticeId) -> Option<&BestPractice> {
        id.index().and_then(|i| self.best_practices.get(i))
    }

    fn finding(&self, id: FindingId) -> Option<&Finding> {
        id.index().and_then(|i| self.findings.get(i))
    }
}

/// In-memory storage backend.
///
/// All three tables sit behind a single `RwLock`, so a mutation and the
/// cross-table checks it depends on form one critical section. Data is not
/// persisted and is lost when the last clone of the store is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChecklistStore for InMemoryStore {
    async fn add_question(&self, request: NewQuestion) -> Result<Question> {
        let draft = request.validate()?;
        let mut tables = self.tables.write().await;

        if tables.question_texts.contains_key(&draft.text) {
            return Err(StoreError::duplicate("Question", draft.text));
        }

        let id = QuestionId::from_index(tables.questions.len());
        let question = draft.into_question(id);
        tables.question_texts.insert(question.text.clone(), id);
        tables.questions.push(question.clone());

        tracing::debug!(question_id = %id, severity = %question.severity, "Question added");
        Ok(question)
    }

    async fn add_best_practice(&self, request: NewBestPractice) -> Result<BestPractice> {
        let draft = request.validate()?;
        let mut tables = self.tables.write().await;

        if tables.question(draft.question_id).is_none() {
            return Err(StoreError::not_found("Question", draft.question_id));
        }
        if tables.best_practice_descriptions.contains(&draft.description) {
            return Err(StoreError::duplicate("BestPractice", draft.description));
        }

        let id = BestPracticeId::from_index(tables.best_practices.len());
        let best_practice = draft.into_best_practice(id);
        tables
            .best_practice_descriptions
            .insert(best_practice.description.clone());
        tables.best_practices.push(best_practice.clone());

        tracing::debug!(
            best_practice_id = %id,
            question_id = %best_practice.question_id,
            "Best practice added"
        );
        Ok(best_practice)
    }

    async fn add_finding(&self, request: NewFinding) -> Result<Finding> {
        let draft = request.validate()?;
        let mut tables = self.tables.write().await;

        if tables.question(draft.question_id).is_none() {
            return Err(StoreError::not_found("Question", draft.question_id));
        }
        let owner = tables
            .best_practice(draft.best_practice_id)
            .map(|bp| bp.question_id)
            .ok_or_else(|| StoreError::not_found("BestPractice", draft.best_practice_id))?;
        if owner != draft.question_id {
            return Err(StoreError::Inconsistent {
                question_id: draft.question_id,
                best_practice_id: draft.best_practice_id,
                owner_question_id: owner,
            });
        }

        let id = FindingId::from_index(tables.findings.len());
        let finding = draft.into_finding(id);
        Arc::make_mut(&mut tables.findings).push(finding.clone());

        tracing::debug!(
            finding_id = %id,
            question_id = %finding.question_id,
            best_practice_id = %finding.best_practice_id,
            service = %finding.violated_resource_service,
            "Finding added"
        );
        Ok(finding)
    }

    async fn update_status(&self, id: FindingId, status: bool) -> Result<Finding> {
        let mut tables = self.tables.write().await;

        let index = match id.index() {
            Some(index) if index < tables.findings.len() => index,
            _ => return Err(StoreError::not_found("Finding", id)),
        };

        let finding = &mut Arc::make_mut(&mut tables.findings)[index];
        finding.set_status(status);

        tracing::debug!(finding_id = %id, status, version = finding.version, "Finding status updated");
        Ok(finding.clone())
    }

    async fn update_question(&self, id: QuestionId, request: UpdateQuestion) -> Result<Question> {
        let changes = request.validate()?;
        let mut guard = self.tables.write().await;
        let tables = &mut *guard;

        let index = match id.index() {
            Some(index) if index < tables.questions.len() => index,
            _ => return Err(StoreError::not_found("Question", id)),
        };
        if let Some(text) = &changes.text {
            if tables.question_texts.get(text).is_some_and(|&owner| owner != id) {
                return Err(StoreError::duplicate("Question", text.clone()));
            }
        }

        let question = &mut tables.questions[index];
        let previous_text = question.text.clone();
        changes.apply_to(question);
        if question.text != previous_text {
            tables.question_texts.remove(&previous_text);
            tables.question_texts.insert(question.text.clone(), id);
        }

        tracing::debug!(question_id = %id, version = question.version, "Question updated");
        Ok(question.clone())
    }

    async fn update_best_practice(
        &self,
        id: BestPracticeId,
        request: UpdateBestPractice,
    ) -> Result<BestPractice> {
        let changes = request.validate()?;
        let mut tables = self.tables.write().await;

        let best_practice = id
            .index()
            .and_then(|i| tables.best_practices.get_mut(i))
            .ok_or_else(|| StoreError::not_found("BestPractice", id))?;
        changes.apply_to(best_practice);

        tracing::debug!(best_practice_id = %id, version = best_practice.version, "Best practice updated");
        Ok(best_practice.clone())
    }

    async fn get_question(&self, id: QuestionId) -> Result<Option<Question>> {
        let tables = self.tables.read().await;
        Ok(tables.question(id).cloned())
    }

    async fn get_best_practice(&self, id: BestPracticeId) -> Result<Option<BestPractice>> {
        let tables = self.tables.read().await;
        Ok(tables.best_practice(id).cloned())
    }

    async fn get_finding(&self, id: FindingId) -> Result<Option<Finding>> {
        let tables = self.tables.read().await;
        Ok(tables.finding(id).cloned())
    }

    async fn list_questions(&self) -> Result<Vec<Question>> {
        let tables = self.tables.read().await;
        Ok(tables.questions.clone())
    }

    async fn list_best_practices(
        &self,
        question_id: Option<QuestionId>,
    ) -> Result<Vec<BestPractice>> {
        let tables = self.tables.read().await;
        Ok(tables
            .best_practices
            .iter()
            .filter(|bp| question_id.is_none_or(|id| bp.question_id == id))
            .cloned()
            .collect())
    }

    async fn list_findings(&self, filter: FindingFilter) -> Result<FindingSet> {
        let tables = self.tables.read().await;
        Ok(FindingSet::new(Arc::clone(&tables.findings), filter))
    }

    async fn check_integrity(&self) -> Result<Vec<IntegrityViolation>> {
        let tables = self.tables.read().await;
        let violations = scan_integrity(
            &tables.questions,
            &tables.best_practices,
            &tables.findings,
        );
        for violation in &violations {
            tracing::warn!(%violation, "Integrity violation");
        }
        Ok(violations)
    }
}

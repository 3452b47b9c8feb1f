//! Bulk loading of seed rows into a store.
//!
//! Seed rows name their question and best practice by text. The loader
//! resolves those names to ids, first against records already in the store
//! and then against rows it has just added.

use std::collections::HashMap;
use std::path::Path;

use checklist_core::checklist::{
    BestPracticeId, NewBestPractice, NewFinding, NewQuestion, QuestionId, SeedData,
};
use checklist_core::storage::{ChecklistStore, StoreError};
use serde::Serialize;
use thiserror::Error;

/// Errors raised while reading a seed file.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Cannot read seed file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Counts of the rows a seed load added.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub questions: usize,
    pub best_practices: usize,
    pub findings: usize,
    /// Findings added with `implementation_status == false`.
    pub open_findings: usize,
}

impl SeedSummary {
    pub fn total(&self) -> usize {
        self.questions + self.best_practices + self.findings
    }
}

/// Reads seed rows from a JSON file.
pub async fn read_seed_file(path: impl AsRef<Path>) -> Result<SeedData, SeedError> {
    let path = path.as_ref();
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SeedError::Read {
            path: path.display().to_string(),
            source,
        })?;
    Ok(SeedData::from_json_str(&json)?)
}

/// Adds every seed row to `store`, in order: questions, best practices, findings.
///
/// Stops at the first rejected row. Rows added before it stay in the store.
pub async fn load_seed(
    store: &dyn ChecklistStore,
    seed: &SeedData,
) -> Result<SeedSummary, StoreError> {
    let mut summary = SeedSummary::default();

    let mut questions: HashMap<String, QuestionId> = store
        .list_questions()
        .await?
        .into_iter()
        .map(|q| (q.text, q.id))
        .collect();
    let mut best_practices: HashMap<String, BestPracticeId> = store
        .list_best_practices(None)
        .await?
        .into_iter()
        .map(|bp| (bp.description, bp.id))
        .collect();

    for row in &seed.questions {
        let question = store
            .add_question(NewQuestion::new(&row.text, &row.severity))
            .await?;
        questions.insert(question.text, question.id);
        summary.questions += 1;
    }

    for row in &seed.best_practices {
        let question_id = resolve(&questions, "Question", &row.question)?;
        let best_practice = store
            .add_best_practice(NewBestPractice::new(
                &row.description,
                question_id,
                &row.link,
                &row.implementation_type,
            ))
            .await?;
        best_practices.insert(best_practice.description, best_practice.id);
        summary.best_practices += 1;
    }

    for row in &seed.findings {
        let question_id = resolve(&questions, "Question", &row.question)?;
        let best_practice_id = resolve(&best_practices, "BestPractice", &row.best_practice)?;
        let finding = store
            .add_finding(
                NewFinding::new(question_id, best_practice_id, &row.service, &row.description)
                    .with_resource_count(row.resource_count)
                    .with_status(row.status),
            )
            .await?;
        summary.findings += 1;
        if !finding.is_remediated() {
            summary.open_findings += 1;
        }
    }

    tracing::info!(
        questions = summary.questions,
        best_practices = summary.best_practices,
        findings = summary.findings,
        open_findings = summary.open_findings,
        "Seed loaded"
    );
    Ok(summary)
}

fn resolve<Id: Copy>(
    ids: &HashMap<String, Id>,
    entity_type: &'static str,
    name: &str,
) -> Result<Id, StoreError> {
    ids.get(name.trim())
        .copied()
        .ok_or_else(|| StoreError::not_found(entity_type, name))
}

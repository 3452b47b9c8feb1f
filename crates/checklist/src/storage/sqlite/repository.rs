//! SQLite store implementation.
//!
//! Implements [`ChecklistStore`] from `checklist_core::storage` using SQLite.
//! Every operation runs as one closure on the `tokio_rusqlite` worker thread
//! and, when it writes, inside one transaction, so writers are serialized and
//! a failed call leaves no rows behind.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::OptionalExtension;
use tokio_rusqlite::Connection;

use checklist_core::checklist::{
    scan_integrity, BestPractice, BestPracticeId, Finding, FindingFilter, FindingId,
    IntegrityViolation, NewBestPractice, NewFinding, NewQuestion, Question, QuestionId,
    UpdateBestPractice, UpdateQuestion,
};
use checklist_core::storage::{ChecklistStore, FindingSet, Result, StoreError};

use super::conversions::{format_datetime, row_to_best_practice, row_to_finding, row_to_question};
use super::error::{domain_err, map_tokio_rusqlite_error};
use super::schema;
use crate::config::StoreConfig;

/// Path that selects a private in-memory database.
pub const IN_MEMORY_PATH: &str = ":memory:";

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

fn question_exists(conn: &rusqlite::Connection, id: QuestionId) -> rusqlite::Result<bool> {
    conn.query_row(schema::SELECT_QUESTION_EXISTS, [id.0], |row| row.get(0))
}

fn best_practice_owner(
    conn: &rusqlite::Connection,
    id: BestPracticeId,
) -> rusqlite::Result<Option<QuestionId>> {
    conn.query_row(schema::SELECT_BEST_PRACTICE_OWNER, [id.0], |row| {
        row.get(0).map(QuestionId)
    })
    .optional()
}

fn select_all<T>(
    conn: &rusqlite::Connection,
    sql: &str,
    params: impl rusqlite::Params,
    map: fn(&rusqlite::Row) -> rusqlite::Result<T>,
) -> rusqlite::Result<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, map)?;
    rows.collect()
}

/// SQLite-based store implementation.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens the database named by `config.db_path` and applies its pragmas.
    ///
    /// The file and its parent directory are created if they don't exist.
    /// Schema tables are created automatically.
    pub async fn open(config: &StoreConfig) -> Result<Self> {
        let conn = if config.db_path == IN_MEMORY_PATH {
            Connection::open_in_memory().await
        } else {
            if let Some(parent) = Path::new(&config.db_path).parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await.map_err(|e| {
                        StoreError::ConnectionFailed(format!(
                            "Cannot create {}: {e}",
                            parent.display()
                        ))
                    })?;
                }
            }
            Connection::open(&config.db_path).await
        }
        .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

        Self::init(conn, config).await
    }

    /// Creates a store backed by a fresh in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        Self::open(&StoreConfig::sqlite(IN_MEMORY_PATH)).await
    }

    /// Applies pragmas and creates the schema.
    async fn init(conn: Connection, config: &StoreConfig) -> Result<Self> {
        let timeout = config.timeout;
        let foreign_keys = config.foreign_keys;
        let journal_mode = config.journal_mode.clone();

        conn.call(move |conn| {
            conn.busy_timeout(timeout).map_err(wrap_err)?;
            conn.pragma_update(None, "foreign_keys", foreign_keys)
                .map_err(wrap_err)?;
            if let Some(mode) = journal_mode {
                // journal_mode answers with the mode now in effect.
                conn.pragma_update_and_check(None, "journal_mode", mode, |row| {
                    row.get::<_, String>(0)
                })
                .map_err(wrap_err)?;
            }
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

        tracing::debug!(
            path = %config.db_path,
            foreign_keys,
            journal_mode = ?config.journal_mode,
            "SQLite store opened"
        );
        Ok(Self { conn })
    }

    /// Runs raw SQL against the database, bypassing every store check.
    #[cfg(test)]
    pub(crate) async fn execute_raw(&self, sql: &'static str) -> Result<()> {
        self.conn
            .call(move |conn| conn.execute_batch(sql).map_err(wrap_err))
            .await
            .map_err(|e| StoreError::QueryFailed(e.to_string()))
    }
}

#[async_trait]
impl ChecklistStore for SqliteStore {
    async fn add_question(&self, request: NewQuestion) -> Result<Question> {
        let draft = request.validate()?;
        let key = draft.text.clone();

        let question = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;

                let existing: Option<i64> = tx
                    .query_row(schema::SELECT_QUESTION_ID_BY_TEXT, [&draft.text], |row| {
                        row.get(0)
                    })
                    .optional()
                    .map_err(wrap_err)?;
                if existing.is_some() {
                    return Err(domain_err(StoreError::duplicate("Question", draft.text)));
                }

                let mut question = draft.into_question(QuestionId(0));
                tx.execute(
                    schema::INSERT_QUESTION,
                    rusqlite::params![
                        question.text,
                        question.severity.as_str(),
                        format_datetime(&question.created_at),
                        question.version
                    ],
                )
                .map_err(wrap_err)?;
                question.id = QuestionId(tx.last_insert_rowid());

                tx.commit().map_err(wrap_err)?;
                Ok(question)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Question", key))?;

        tracing::debug!(question_id = %question.id, severity = %question.severity, "Question added");
        Ok(question)
    }

    async fn add_best_practice(&self, request: NewBestPractice) -> Result<BestPractice> {
        let draft = request.validate()?;
        let key = draft.description.clone();

        let best_practice = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;

                if !question_exists(&tx, draft.question_id).map_err(wrap_err)? {
                    return Err(domain_err(StoreError::not_found(
                        "Question",
                        draft.question_id,
                    )));
                }
                let existing: Option<i64> = tx
                    .query_row(
                        schema::SELECT_BEST_PRACTICE_ID_BY_DESCRIPTION,
                        [&draft.description],
                        |row| row.get(0),
                    )
                    .optional()
                    .map_err(wrap_err)?;
                if existing.is_some() {
                    return Err(domain_err(StoreError::duplicate(
                        "BestPractice",
                        draft.description,
                    )));
                }

                let mut best_practice = draft.into_best_practice(BestPracticeId(0));
                tx.execute(
                    schema::INSERT_BEST_PRACTICE,
                    rusqlite::params![
                        best_practice.description,
                        best_practice.question_id.0,
                        best_practice.link,
                        best_practice.implementation_type.as_str(),
                        format_datetime(&best_practice.created_at),
                        best_practice.version
                    ],
                )
                .map_err(wrap_err)?;
                best_practice.id = BestPracticeId(tx.last_insert_rowid());

                tx.commit().map_err(wrap_err)?;
                Ok(best_practice)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "BestPractice", key))?;

        tracing::debug!(
            best_practice_id = %best_practice.id,
            question_id = %best_practice.question_id,
            "Best practice added"
        );
        Ok(best_practice)
    }

    async fn add_finding(&self, request: NewFinding) -> Result<Finding> {
        let draft = request.validate()?;

        let finding = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;

                if !question_exists(&tx, draft.question_id).map_err(wrap_err)? {
                    return Err(domain_err(StoreError::not_found(
                        "Question",
                        draft.question_id,
                    )));
                }
                let owner = best_practice_owner(&tx, draft.best_practice_id)
                    .map_err(wrap_err)?
                    .ok_or_else(|| {
                        domain_err(StoreError::not_found(
                            "BestPractice",
                            draft.best_practice_id,
                        ))
                    })?;
                if owner != draft.question_id {
                    return Err(domain_err(StoreError::Inconsistent {
                        question_id: draft.question_id,
                        best_practice_id: draft.best_practice_id,
                        owner_question_id: owner,
                    }));
                }

                let mut finding = draft.into_finding(FindingId(0));
                tx.execute(
                    schema::INSERT_FINDING,
                    rusqlite::params![
                        finding.question_id.0,
                        finding.best_practice_id.0,
                        finding.violated_resource_count,
                        finding.violated_resource_service,
                        finding.violated_resource_description,
                        finding.implementation_status,
                        format_datetime(&finding.created_at),
                        finding.version
                    ],
                )
                .map_err(wrap_err)?;
                finding.id = FindingId(tx.last_insert_rowid());

                tx.commit().map_err(wrap_err)?;
                Ok(finding)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Finding", "new"))?;

        tracing::debug!(
            finding_id = %finding.id,
            question_id = %finding.question_id,
            best_practice_id = %finding.best_practice_id,
            service = %finding.violated_resource_service,
            "Finding added"
        );
        Ok(finding)
    }

    async fn update_status(&self, id: FindingId, status: bool) -> Result<Finding> {
        let finding = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;

                let rows = tx
                    .execute(schema::UPDATE_FINDING_STATUS, rusqlite::params![id.0, status])
                    .map_err(wrap_err)?;
                if rows == 0 {
                    return Err(wrap_err(rusqlite::Error::QueryReturnedNoRows));
                }
                let finding = tx
                    .query_row(schema::SELECT_FINDING_BY_ID, [id.0], row_to_finding)
                    .map_err(wrap_err)?;

                tx.commit().map_err(wrap_err)?;
                Ok(finding)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Finding", id.to_string()))?;

        tracing::debug!(finding_id = %id, status, version = finding.version, "Finding status updated");
        Ok(finding)
    }

    async fn update_question(&self, id: QuestionId, request: UpdateQuestion) -> Result<Question> {
        let changes = request.validate()?;

        let question = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;

                let mut question = tx
                    .query_row(schema::SELECT_QUESTION_BY_ID, [id.0], row_to_question)
                    .map_err(wrap_err)?;
                if let Some(text) = &changes.text {
                    let owner: Option<i64> = tx
                        .query_row(schema::SELECT_QUESTION_ID_BY_TEXT, [text], |row| row.get(0))
                        .optional()
                        .map_err(wrap_err)?;
                    if owner.is_some_and(|owner| owner != id.0) {
                        return Err(domain_err(StoreError::duplicate("Question", text.clone())));
                    }
                }

                changes.apply_to(&mut question);
                tx.execute(
                    schema::UPDATE_QUESTION,
                    rusqlite::params![
                        id.0,
                        question.text,
                        question.severity.as_str(),
                        question.version
                    ],
                )
                .map_err(wrap_err)?;

                tx.commit().map_err(wrap_err)?;
                Ok(question)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Question", id.to_string()))?;

        tracing::debug!(question_id = %id, version = question.version, "Question updated");
        Ok(question)
    }

    async fn update_best_practice(
        &self,
        id: BestPracticeId,
        request: UpdateBestPractice,
    ) -> Result<BestPractice> {
        let changes = request.validate()?;

        let best_practice = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;

                let mut best_practice = tx
                    .query_row(schema::SELECT_BEST_PRACTICE_BY_ID, [id.0], row_to_best_practice)
                    .map_err(wrap_err)?;
                changes.apply_to(&mut best_practice);
                tx.execute(
                    schema::UPDATE_BEST_PRACTICE,
                    rusqlite::params![
                        id.0,
                        best_practice.link,
                        best_practice.implementation_type.as_str(),
                        best_practice.version
                    ],
                )
                .map_err(wrap_err)?;

                tx.commit().map_err(wrap_err)?;
                Ok(best_practice)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "BestPractice", id.to_string()))?;

        tracing::debug!(
            best_practice_id = %id,
            version = best_practice.version,
            "Best practice updated"
        );
        Ok(best_practice)
    }

    async fn get_question(&self, id: QuestionId) -> Result<Option<Question>> {
        self.conn
            .call(move |conn| {
                conn.query_row(schema::SELECT_QUESTION_BY_ID, [id.0], row_to_question)
                    .optional()
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Question", id.to_string()))
    }

    async fn get_best_practice(&self, id: BestPracticeId) -> Result<Option<BestPractice>> {
        self.conn
            .call(move |conn| {
                conn.query_row(
                    schema::SELECT_BEST_PRACTICE_BY_ID,
                    [id.0],
                    row_to_best_practice,
                )
                .optional()
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "BestPractice", id.to_string()))
    }

    async fn get_finding(&self, id: FindingId) -> Result<Option<Finding>> {
        self.conn
            .call(move |conn| {
                conn.query_row(schema::SELECT_FINDING_BY_ID, [id.0], row_to_finding)
                    .optional()
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Finding", id.to_string()))
    }

    async fn list_questions(&self) -> Result<Vec<Question>> {
        self.conn
            .call(|conn| {
                select_all(conn, schema::SELECT_ALL_QUESTIONS, [], row_to_question)
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Question", "*"))
    }

    async fn list_best_practices(
        &self,
        question_id: Option<QuestionId>,
    ) -> Result<Vec<BestPractice>> {
        self.conn
            .call(move |conn| {
                match question_id {
                    Some(id) => select_all(
                        conn,
                        schema::SELECT_BEST_PRACTICES_BY_QUESTION,
                        [id.0],
                        row_to_best_practice,
                    ),
                    None => select_all(
                        conn,
                        schema::SELECT_ALL_BEST_PRACTICES,
                        [],
                        row_to_best_practice,
                    ),
                }
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "BestPractice", "*"))
    }

    async fn list_findings(&self, filter: FindingFilter) -> Result<FindingSet> {
        let question_id = filter.question_id.map(|id| id.0);
        let status = filter.status;
        let service = filter.service.clone();

        let findings = self
            .conn
            .call(move |conn| {
                select_all(
                    conn,
                    schema::SELECT_FINDINGS_FILTERED,
                    rusqlite::params![question_id, status, service],
                    row_to_finding,
                )
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Finding", "*"))?;

        Ok(FindingSet::new(Arc::new(findings), filter))
    }

    async fn check_integrity(&self) -> Result<Vec<IntegrityViolation>> {
        let (questions, best_practices, findings) = self
            .conn
            .call(|conn| {
                // One read transaction so the three tables come from the same state.
                let tx = conn.transaction().map_err(wrap_err)?;
                let questions = select_all(&tx, schema::SELECT_ALL_QUESTIONS, [], row_to_question)
                    .map_err(wrap_err)?;
                let best_practices = select_all(
                    &tx,
                    schema::SELECT_ALL_BEST_PRACTICES,
                    [],
                    row_to_best_practice,
                )
                .map_err(wrap_err)?;
                let findings = select_all(&tx, schema::SELECT_ALL_FINDINGS, [], row_to_finding)
                    .map_err(wrap_err)?;
                tx.commit().map_err(wrap_err)?;
                Ok((questions, best_practices, findings))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Checklist", "*"))?;

        let violations = scan_integrity(&questions, &best_practices, &findings);
        for violation in &violations {
            tracing::warn!(%violation, "Integrity violation");
        }
        Ok(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT_QUESTION: &str = "How do you securely operate your workload";
    const ROOT_PRACTICE: &str = "Secure account root user and properties";
    const LINK: &str =
        "https://docs.aws.amazon.com/wellarchitected/latest/security-pillar/sec_securely_operate_aws_account.html";

    async fn seeded_store() -> SqliteStore {
        let store = SqliteStore::new_in_memory().await.unwrap();
        store
            .add_question(NewQuestion::new(ROOT_QUESTION, "High"))
            .await
            .unwrap();
        store
            .add_best_practice(NewBestPractice::new(
                ROOT_PRACTICE,
                QuestionId(1),
                LINK,
                "Manual",
            ))
            .await
            .unwrap();
        store
            .add_finding(
                NewFinding::new(
                    QuestionId(1),
                    BestPracticeId(1),
                    "IAM",
                    "Root user has not enabled MFA",
                )
                .with_resource_count(1),
            )
            .await
            .unwrap();
        store
    }

    /// Store with foreign keys off, so raw inserts can break references.
    async fn unchecked_store() -> SqliteStore {
        let mut config = StoreConfig::sqlite(IN_MEMORY_PATH);
        config.foreign_keys = false;
        SqliteStore::open(&config).await.unwrap()
    }

    #[tokio::test]
    async fn test_add_question_and_get() {
        let store = SqliteStore::new_in_memory().await.unwrap();

        let question = store
            .add_question(NewQuestion::new(ROOT_QUESTION, "High"))
            .await
            .unwrap();

        assert_eq!(question.id, QuestionId(1));
        assert_eq!(question.version, 1);
        let retrieved = store.get_question(question.id).await.unwrap().unwrap();
        assert_eq!(retrieved.text, ROOT_QUESTION);
        assert_eq!(retrieved.created_at, question.created_at);
    }

    #[tokio::test]
    async fn test_add_question_duplicate_text() {
        let store = SqliteStore::new_in_memory().await.unwrap();
        store
            .add_question(NewQuestion::new(ROOT_QUESTION, "High"))
            .await
            .unwrap();

        let result = store
            .add_question(NewQuestion::new(ROOT_QUESTION, "High"))
            .await;

        assert_eq!(result, Err(StoreError::duplicate("Question", ROOT_QUESTION)));
    }

    #[tokio::test]
    async fn test_get_missing_records() {
        let store = SqliteStore::new_in_memory().await.unwrap();
        assert!(store.get_question(QuestionId(4)).await.unwrap().is_none());
        assert!(store
            .get_best_practice(BestPracticeId(4))
            .await
            .unwrap()
            .is_none());
        assert!(store.get_finding(FindingId(4)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_add_best_practice_unknown_question() {
        let store = SqliteStore::new_in_memory().await.unwrap();

        let result = store
            .add_best_practice(NewBestPractice::new(
                ROOT_PRACTICE,
                QuestionId(1),
                LINK,
                "Manual",
            ))
            .await;

        assert_eq!(result, Err(StoreError::not_found("Question", 1)));
    }

    #[tokio::test]
    async fn test_root_user_scenario() {
        let store = seeded_store().await;

        let open = store
            .list_findings(FindingFilter::new().with_status(false))
            .await
            .unwrap();

        let findings = open.to_vec();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].violated_resource_description, "Root user has not enabled MFA");
        assert!(!findings[0].implementation_status);
    }

    #[tokio::test]
    async fn test_add_finding_unknown_best_practice_leaves_state_unchanged() {
        let store = seeded_store().await;

        let result = store
            .add_finding(NewFinding::new(
                QuestionId(1),
                BestPracticeId(99),
                "IAM",
                "Access keys older than 90 days",
            ))
            .await;

        assert_eq!(result, Err(StoreError::not_found("BestPractice", 99)));
        assert_eq!(store.list_findings(FindingFilter::new()).await.unwrap().len(), 1);
        assert!(store.check_integrity().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_finding_inconsistent_pairing() {
        let store = seeded_store().await;
        store
            .add_question(NewQuestion::new("How do you manage identities", "High"))
            .await
            .unwrap();

        let result = store
            .add_finding(NewFinding::new(QuestionId(2), BestPracticeId(1), "IAM", "x"))
            .await;

        assert!(matches!(result, Err(StoreError::Inconsistent { .. })));
        assert_eq!(store.list_findings(FindingFilter::new()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_status_twice() {
        let store = seeded_store().await;

        store.update_status(FindingId(1), true).await.unwrap();
        let finding = store.update_status(FindingId(1), true).await.unwrap();

        assert!(finding.implementation_status);
        assert_eq!(finding.version, 3);

        let remediated = store
            .list_findings(FindingFilter::new().with_status(true))
            .await
            .unwrap();
        assert_eq!(remediated.len(), 1);
    }

    #[tokio::test]
    async fn test_update_status_unknown_finding() {
        let store = seeded_store().await;
        let result = store.update_status(FindingId(8), false).await;
        assert_eq!(result, Err(StoreError::not_found("Finding", 8)));
    }

    #[tokio::test]
    async fn test_update_question_and_best_practice() {
        let store = seeded_store().await;

        let question = store
            .update_question(QuestionId(1), UpdateQuestion::new().with_severity("Medium"))
            .await
            .unwrap();
        let best_practice = store
            .update_best_practice(
                BestPracticeId(1),
                UpdateBestPractice::new().with_link("https://example.com/root-user"),
            )
            .await
            .unwrap();

        assert_eq!(question.version, 2);
        assert_eq!(
            store.get_question(QuestionId(1)).await.unwrap().unwrap().severity,
            checklist_core::checklist::Severity::Medium
        );
        assert_eq!(best_practice.version, 2);
        assert_eq!(best_practice.description, ROOT_PRACTICE);
    }

    #[tokio::test]
    async fn test_update_question_unknown_id() {
        let store = seeded_store().await;
        let result = store
            .update_question(QuestionId(9), UpdateQuestion::new().with_severity("Low"))
            .await;
        assert_eq!(result, Err(StoreError::not_found("Question", 9)));
    }

    #[tokio::test]
    async fn test_list_findings_filters_in_sql() {
        let store = seeded_store().await;
        store
            .add_finding(NewFinding::new(
                QuestionId(1),
                BestPracticeId(1),
                "Organizations",
                "No SCP restricts the root user",
            ))
            .await
            .unwrap();

        let by_service = store
            .list_findings(FindingFilter::new().with_service("Organizations"))
            .await
            .unwrap();
        let by_question = store
            .list_findings(FindingFilter::new().with_question(QuestionId(1)))
            .await
            .unwrap();

        assert_eq!(by_service.len(), 1);
        assert_eq!(by_question.len(), 2);
        let ids: Vec<FindingId> = by_question.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![FindingId(1), FindingId(2)]);
    }

    #[tokio::test]
    async fn test_check_integrity_reports_orphaned_best_practice() {
        let store = unchecked_store().await;
        store
            .execute_raw(
                "INSERT INTO best_practices (description, question_id, link, implementation_type, created_at, version)
                 VALUES ('Use temporary credentials', 42, 'https://example.com', 'Automated', '2024-06-01T00:00:00+00:00', 1);",
            )
            .await
            .unwrap();

        let violations = store.check_integrity().await.unwrap();

        assert_eq!(
            violations,
            vec![IntegrityViolation::OrphanedBestPractice {
                best_practice_id: BestPracticeId(1),
                question_id: QuestionId(42),
            }]
        );
    }

    #[tokio::test]
    async fn test_check_integrity_reports_inconsistent_finding() {
        let store = unchecked_store().await;
        store
            .add_question(NewQuestion::new(ROOT_QUESTION, "High"))
            .await
            .unwrap();
        store
            .add_question(NewQuestion::new("How do you manage identities", "High"))
            .await
            .unwrap();
        store
            .add_best_practice(NewBestPractice::new(
                ROOT_PRACTICE,
                QuestionId(1),
                LINK,
                "Manual",
            ))
            .await
            .unwrap();
        store
            .execute_raw(
                "INSERT INTO findings (question_id, best_practice_id, violated_resource_service,
                                       violated_resource_description, created_at)
                 VALUES (2, 1, 'IAM', 'Root user has access keys', '2024-06-01T00:00:00+00:00');",
            )
            .await
            .unwrap();

        let violations = store.check_integrity().await.unwrap();

        assert_eq!(
            violations,
            vec![IntegrityViolation::InconsistentFinding {
                finding_id: FindingId(1),
                question_id: QuestionId(2),
                best_practice_id: BestPracticeId(1),
                best_practice_question_id: QuestionId(1),
            }]
        );
    }

    #[tokio::test]
    async fn test_raw_finding_uses_column_defaults() {
        let store = unchecked_store().await;
        store
            .execute_raw(
                "INSERT INTO findings (question_id, best_practice_id, violated_resource_service,
                                       violated_resource_description, created_at)
                 VALUES (1, 1, 'S3', 'Public bucket', '2024-06-01T00:00:00+00:00');",
            )
            .await
            .unwrap();

        let finding = store.get_finding(FindingId(1)).await.unwrap().unwrap();

        assert_eq!(finding.violated_resource_count, 0);
        assert!(!finding.implementation_status);
        assert_eq!(finding.version, 1);
    }
}

//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and checklist records.
//! These are testable in isolation without database access.

use std::str::FromStr;

use checklist_core::checklist::{
    BestPractice, BestPracticeId, Finding, FindingId, ImplementationType, Question, QuestionId,
    Severity,
};
use chrono::{DateTime, Utc};
use rusqlite::Row;

// ============================================================================
// Question conversions
// ============================================================================

/// Convert a SQLite row to a Question.
///
/// Expected columns: id, text, severity, created_at, version
pub fn row_to_question(row: &Row) -> rusqlite::Result<Question> {
    let id: i64 = row.get(0)?;
    let text: String = row.get(1)?;
    let severity: String = row.get(2)?;
    let created_at: String = row.get(3)?;
    let version: u32 = row.get(4)?;

    Ok(Question {
        id: QuestionId(id),
        text,
        severity: parse_enum::<Severity>(2, &severity)?,
        created_at: parse_datetime(3, &created_at)?,
        version,
    })
}

// ============================================================================
// Best practice conversions
// ============================================================================

/// Convert a SQLite row to a BestPractice.
///
/// Expected columns: id, description, question_id, link, implementation_type, created_at, version
pub fn row_to_best_practice(row: &Row) -> rusqlite::Result<BestPractice> {
    let id: i64 = row.get(0)?;
    let description: String = row.get(1)?;
    let question_id: i64 = row.get(2)?;
    let link: String = row.get(3)?;
    let implementation_type: String = row.get(4)?;
    let created_at: String = row.get(5)?;
    let version: u32 = row.get(6)?;

    Ok(BestPractice {
        id: BestPracticeId(id),
        description,
        question_id: QuestionId(question_id),
        link,
        implementation_type: parse_enum::<ImplementationType>(4, &implementation_type)?,
        created_at: parse_datetime(5, &created_at)?,
        version,
    })
}

// ============================================================================
// Finding conversions
// ============================================================================

/// Convert a SQLite row to a Finding.
///
/// Expected columns: id, question_id, best_practice_id, violated_resource_count,
/// violated_resource_service, violated_resource_description, implementation_status,
/// created_at, version
pub fn row_to_finding(row: &Row) -> rusqlite::Result<Finding> {
    let id: i64 = row.get(0)?;
    let question_id: i64 = row.get(1)?;
    let best_practice_id: i64 = row.get(2)?;
    let violated_resource_count: u32 = row.get(3)?;
    let violated_resource_service: String = row.get(4)?;
    let violated_resource_description: String = row.get(5)?;
    let implementation_status: bool = row.get(6)?;
    let created_at: String = row.get(7)?;
    let version: u32 = row.get(8)?;

    Ok(Finding {
        id: FindingId(id),
        question_id: QuestionId(question_id),
        best_practice_id: BestPracticeId(best_practice_id),
        violated_resource_count,
        violated_resource_service,
        violated_resource_description,
        implementation_status,
        created_at: parse_datetime(7, &created_at)?,
        version,
    })
}

// ============================================================================
// Helper functions
// ============================================================================

/// Parse one of the checklist's closed-set enums stored as text.
fn parse_enum<T>(column: usize, s: &str) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    s.parse().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn parse_datetime(column: usize, s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                column,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })
}

/// Format DateTime for SQLite storage (RFC 3339).
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

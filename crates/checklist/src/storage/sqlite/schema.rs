//! SQLite schema definitions and SQL query constants.
//!
//! This module contains all SQL statements used by the SQLite store,
//! following the Functional Core pattern - pure data, no I/O.

/// SQL statement to create all tables.
///
/// Foreign keys are declared but only enforced when `PRAGMA foreign_keys` is
/// on; the store checks references itself either way.
pub const CREATE_TABLES: &str = r#"
-- Questions table
CREATE TABLE IF NOT EXISTS questions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    text TEXT NOT NULL UNIQUE,
    severity TEXT NOT NULL,
    created_at TEXT NOT NULL,
    version INTEGER NOT NULL DEFAULT 1
);

-- Best practices table
CREATE TABLE IF NOT EXISTS best_practices (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    description TEXT NOT NULL UNIQUE,
    question_id INTEGER NOT NULL,
    link TEXT NOT NULL,
    implementation_type TEXT NOT NULL,
    created_at TEXT NOT NULL,
    version INTEGER NOT NULL DEFAULT 1,
    FOREIGN KEY (question_id) REFERENCES questions(id)
);

-- Findings table
CREATE TABLE IF NOT EXISTS findings (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    question_id INTEGER NOT NULL,
    best_practice_id INTEGER NOT NULL,
    violated_resource_count INTEGER NOT NULL DEFAULT 0,
    violated_resource_service TEXT NOT NULL,
    violated_resource_description TEXT NOT NULL,
    implementation_status INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    version INTEGER NOT NULL DEFAULT 1,
    FOREIGN KEY (question_id) REFERENCES questions(id),
    FOREIGN KEY (best_practice_id) REFERENCES best_practices(id)
);

-- Indexes for efficient queries
CREATE INDEX IF NOT EXISTS idx_best_practices_question_id ON best_practices(question_id);
CREATE INDEX IF NOT EXISTS idx_findings_question_id ON findings(question_id);
CREATE INDEX IF NOT EXISTS idx_findings_status ON findings(implementation_status);
"#;

// Question queries
pub const INSERT_QUESTION: &str = r#"
INSERT INTO questions (text, severity, created_at, version)
VALUES (?1, ?2, ?3, ?4)
"#;

pub const SELECT_QUESTION_BY_ID: &str = r#"
SELECT id, text, severity, created_at, version
FROM questions
WHERE id = ?1
"#;

pub const SELECT_QUESTION_ID_BY_TEXT: &str = r#"
SELECT id
FROM questions
WHERE text = ?1
"#;

pub const SELECT_QUESTION_EXISTS: &str = r#"
SELECT EXISTS(SELECT 1 FROM questions WHERE id = ?1)
"#;

pub const SELECT_ALL_QUESTIONS: &str = r#"
SELECT id, text, severity, created_at, version
FROM questions
ORDER BY id ASC
"#;

pub const UPDATE_QUESTION: &str = r#"
UPDATE questions
SET text = ?2, severity = ?3, version = ?4
WHERE id = ?1
"#;

// Best practice queries
pub const INSERT_BEST_PRACTICE: &str = r#"
INSERT INTO best_practices (description, question_id, link, implementation_type, created_at, version)
VALUES (?1, ?2, ?3, ?4, ?5, ?6)
"#;

pub const SELECT_BEST_PRACTICE_BY_ID: &str = r#"
SELECT id, description, question_id, link, implementation_type, created_at, version
FROM best_practices
WHERE id = ?1
"#;

pub const SELECT_BEST_PRACTICE_ID_BY_DESCRIPTION: &str = r#"
SELECT id
FROM best_practices
WHERE description = ?1
"#;

pub const SELECT_BEST_PRACTICE_OWNER: &str = r#"
SELECT question_id
FROM best_practices
WHERE id = ?1
"#;

pub const SELECT_ALL_BEST_PRACTICES: &str = r#"
SELECT id, description, question_id, link, implementation_type, created_at, version
FROM best_practices
ORDER BY id ASC
"#;

pub const SELECT_BEST_PRACTICES_BY_QUESTION: &str = r#"
SELECT id, description, question_id, link, implementation_type, created_at, version
FROM best_practices
WHERE question_id = ?1
ORDER BY id ASC
"#;

pub const UPDATE_BEST_PRACTICE: &str = r#"
UPDATE best_practices
SET link = ?2, implementation_type = ?3, version = ?4
WHERE id = ?1
"#;

// Finding queries
pub const INSERT_FINDING: &str = r#"
INSERT INTO findings (
    question_id, best_practice_id, violated_resource_count, violated_resource_service,
    violated_resource_description, implementation_status, created_at, version
)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
"#;

pub const SELECT_FINDING_BY_ID: &str = r#"
SELECT id, question_id, best_practice_id, violated_resource_count, violated_resource_service,
       violated_resource_description, implementation_status, created_at, version
FROM findings
WHERE id = ?1
"#;

pub const SELECT_ALL_FINDINGS: &str = r#"
SELECT id, question_id, best_practice_id, violated_resource_count, violated_resource_service,
       violated_resource_description, implementation_status, created_at, version
FROM findings
ORDER BY id ASC
"#;

/// Unset filter parameters are bound as NULL and match every row.
pub const SELECT_FINDINGS_FILTERED: &str = r#"
SELECT id, question_id, best_practice_id, violated_resource_count, violated_resource_service,
       violated_resource_description, implementation_status, created_at, version
FROM findings
WHERE (?1 IS NULL OR question_id = ?1)
  AND (?2 IS NULL OR implementation_status = ?2)
  AND (?3 IS NULL OR violated_resource_service = ?3)
ORDER BY id ASC
"#;

pub const UPDATE_FINDING_STATUS: &str = r#"
UPDATE findings
SET implementation_status = ?2, version = version + 1
WHERE id = ?1
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tables_is_valid_sql() {
        assert!(CREATE_TABLES.contains("CREATE TABLE IF NOT EXISTS questions"));
        assert!(CREATE_TABLES.contains("CREATE TABLE IF NOT EXISTS best_practices"));
        assert!(CREATE_TABLES.contains("CREATE TABLE IF NOT EXISTS findings"));
    }

    #[test]
    fn test_queries_contain_expected_keywords() {
        // Question queries
        assert!(INSERT_QUESTION.contains("INSERT"));
        assert!(SELECT_QUESTION_BY_ID.contains("SELECT"));
        assert!(SELECT_QUESTION_ID_BY_TEXT.contains("text = ?1"));
        assert!(SELECT_QUESTION_EXISTS.contains("EXISTS"));
        assert!(SELECT_ALL_QUESTIONS.contains("ORDER BY id"));
        assert!(UPDATE_QUESTION.contains("UPDATE"));

        // Best practice queries
        assert!(INSERT_BEST_PRACTICE.contains("INSERT"));
        assert!(SELECT_BEST_PRACTICE_BY_ID.contains("SELECT"));
        assert!(SELECT_BEST_PRACTICE_ID_BY_DESCRIPTION.contains("description = ?1"));
        assert!(SELECT_BEST_PRACTICE_OWNER.contains("question_id"));
        assert!(SELECT_BEST_PRACTICES_BY_QUESTION.contains("question_id = ?1"));
        assert!(UPDATE_BEST_PRACTICE.contains("UPDATE"));

        // Finding queries
        assert!(INSERT_FINDING.contains("INSERT"));
        assert!(SELECT_FINDING_BY_ID.contains("SELECT"));
        assert!(SELECT_ALL_FINDINGS.contains("ORDER BY id"));
        assert!(SELECT_FINDINGS_FILTERED.contains("IS NULL"));
        assert!(UPDATE_FINDING_STATUS.contains("version + 1"));
    }
}

//! Seed rows for the security review checklist.
//!
//! Seed rows reference each other by text rather than by id, so a seed file
//! written against denormalized findings (question and best practice text
//! stored inline) loads into the normalized tables unchanged.

use serde::{Deserialize, Serialize};

use crate::storage::StoreError;

const SECURITY_PILLAR: &str = "https://docs.aws.amazon.com/wellarchitected/latest/security-pillar";

/// A question row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedQuestion {
    pub text: String,
    pub severity: String,
}

/// A best practice row. `question` is the owning question's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedBestPractice {
    pub description: String,
    pub question: String,
    pub link: String,
    pub implementation_type: String,
}

/// A finding row. `question` and `best_practice` are the text and description
/// of the records it is filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedFinding {
    pub question: String,
    pub best_practice: String,
    pub service: String,
    pub description: String,
    #[serde(default)]
    pub resource_count: i64,
    #[serde(default)]
    pub status: bool,
}

/// A full set of seed rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub questions: Vec<SeedQuestion>,
    #[serde(default)]
    pub best_practices: Vec<SeedBestPractice>,
    #[serde(default)]
    pub findings: Vec<SeedFinding>,
}

impl SeedData {
    /// Parses seed rows from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, StoreError> {
        serde_json::from_str(json).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Total number of rows across the three tables.
    pub fn len(&self) -> usize {
        self.questions.len() + self.best_practices.len() + self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The built-in rows for the security pillar review.
    pub fn well_architected() -> Self {
        let questions = vec![
            question("How do you securely operate your workload", "High"),
            question(
                "How do you manage authentication for people and machines",
                "High",
            ),
            question("How do you detect and investigate security events", "Medium"),
            question("How do you protect your data at rest", "High"),
        ];

        let best_practices = vec![
            best_practice(
                "Secure account root user and properties",
                &questions[0],
                "sec_securely_operate_aws_account.html",
                "Manual",
            ),
            best_practice(
                "Separate workloads using accounts",
                &questions[0],
                "sec_securely_operate_multi_accounts.html",
                "Manual",
            ),
            best_practice(
                "Keep up-to-date with security threats",
                &questions[0],
                "sec_securely_operate_updated_threats.html",
                "Manual",
            ),
            best_practice(
                "Use strong sign-in mechanisms",
                &questions[1],
                "sec_identities_enforce_mechanisms.html",
                "Automated",
            ),
            best_practice(
                "Use temporary credentials",
                &questions[1],
                "sec_identities_unique.html",
                "Automated",
            ),
            best_practice(
                "Configure service and application logging",
                &questions[2],
                "sec_detect_investigate_events_app_service_logging.html",
                "Automated",
            ),
            best_practice(
                "Enforce encryption at rest",
                &questions[3],
                "sec_protect_data_rest_encrypt.html",
                "Automated",
            ),
        ];

        let findings = vec![
            finding(
                &best_practices[0],
                "IAM",
                "Root user has not enabled MFA",
                1,
                false,
            ),
            finding(
                &best_practices[3],
                "IAM",
                "Console users without MFA enabled",
                3,
                false,
            ),
            finding(
                &best_practices[5],
                "CloudTrail",
                "No multi-region trail is configured",
                1,
                true,
            ),
            finding(
                &best_practices[6],
                "S3",
                "Buckets without default encryption",
                2,
                false,
            ),
        ];

        Self {
            questions,
            best_practices,
            findings,
        }
    }
}

fn question(text: &str, severity: &str) -> SeedQuestion {
    SeedQuestion {
        text: text.to_string(),
        severity: severity.to_string(),
    }
}

fn best_practice(
    description: &str,
    question: &SeedQuestion,
    page: &str,
    implementation_type: &str,
) -> SeedBestPractice {
    SeedBestPractice {
        description: description.to_string(),
        question: question.text.clone(),
        link: format!("{SECURITY_PILLAR}/{page}"),
        implementation_type: implementation_type.to_string(),
    }
}

fn finding(
    best_practice: &SeedBestPractice,
    service: &str,
    description: &str,
    resource_count: i64,
    status: bool,
) -> SeedFinding {
    SeedFinding {
        question: best_practice.question.clone(),
        best_practice: best_practice.description.clone(),
        service: service.to_string(),
        description: description.to_string(),
        resource_count,
        status,
    }
}

//! Referential integrity scan over the three checklist tables.
//!
//! The scan is a pure function over record slices so every backend can run
//! it against whatever snapshot it holds.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::types::{BestPractice, BestPracticeId, Finding, FindingId, Question, QuestionId};

/// A single referential problem found by [`scan`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntegrityViolation {
    /// A best practice points at a question that does not exist.
    OrphanedBestPractice {
        best_practice_id: BestPracticeId,
        question_id: QuestionId,
    },
    /// A finding points at a question that does not exist.
    FindingMissingQuestion {
        finding_id: FindingId,
        question_id: QuestionId,
    },
    /// A finding points at a best practice that does not exist.
    FindingMissingBestPractice {
        finding_id: FindingId,
        best_practice_id: BestPracticeId,
    },
    /// A finding's best practice belongs to a different question.
    InconsistentFinding {
        finding_id: FindingId,
        question_id: QuestionId,
        best_practice_id: BestPracticeId,
        best_practice_question_id: QuestionId,
    },
}

impl fmt::Display for IntegrityViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityViolation::OrphanedBestPractice {
                best_practice_id,
                question_id,
            } => write!(
                f,
                "best practice {best_practice_id} references missing question {question_id}"
            ),
            IntegrityViolation::FindingMissingQuestion {
                finding_id,
                question_id,
            } => write!(
                f,
                "finding {finding_id} references missing question {question_id}"
            ),
            IntegrityViolation::FindingMissingBestPractice {
                finding_id,
                best_practice_id,
            } => write!(
                f,
                "finding {finding_id} references missing best practice {best_practice_id}"
            ),
            IntegrityViolation::InconsistentFinding {
                finding_id,
                question_id,
                best_practice_id,
                best_practice_question_id,
            } => write!(
                f,
                "finding {finding_id} is filed under question {question_id} but best practice \
                 {best_practice_id} belongs to question {best_practice_question_id}"
            ),
        }
    }
}

/// Scans the tables and reports every referential violation, in table order.
pub fn scan(
    questions: &[Question],
    best_practices: &[BestPractice],
    findings: &[Finding],
) -> Vec<IntegrityViolation> {
    let question_ids: HashSet<QuestionId> = questions.iter().map(|q| q.id).collect();
    let owners: HashMap<BestPracticeId, QuestionId> = best_practices
        .iter()
        .map(|bp| (bp.id, bp.question_id))
        .collect();

    let mut violations = Vec::new();

    for best_practice in best_practices {
        if !question_ids.contains(&best_practice.question_id) {
            violations.push(IntegrityViolation::OrphanedBestPractice {
                best_practice_id: best_practice.id,
                question_id: best_practice.question_id,
            });
        }
    }

    for finding in findings {
        if !question_ids.contains(&finding.question_id) {
            violations.push(IntegrityViolation::FindingMissingQuestion {
                finding_id: finding.id,
                question_id: finding.question_id,
            });
        }
        match owners.get(&finding.best_practice_id) {
            None => violations.push(IntegrityViolation::FindingMissingBestPractice {
                finding_id: finding.id,
                best_practice_id: finding.best_practice_id,
            }),
            Some(&owner) if owner != finding.question_id => {
                violations.push(IntegrityViolation::InconsistentFinding {
                    finding_id: finding.id,
                    question_id: finding.question_id,
                    best_practice_id: finding.best_practice_id,
                    best_practice_question_id: owner,
                })
            }
            Some(_) => {}
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::checklist::types::{ImplementationType, Severity};

    fn question(id: i64) -> Question {
        Question::new(QuestionId(id), format!("Question {id}"), Severity::High)
    }

    fn best_practice(id: i64, question_id: i64) -> BestPractice {
        BestPractice::new(
            BestPracticeId(id),
            format!("Best practice {id}"),
            QuestionId(question_id),
            "https://docs.aws.amazon.com/wellarchitected/latest/security-pillar/welcome.html",
            ImplementationType::Manual,
        )
    }

    fn finding(id: i64, question_id: i64, best_practice_id: i64) -> Finding {
        Finding {
            id: FindingId(id),
            question_id: QuestionId(question_id),
            best_practice_id: BestPracticeId(best_practice_id),
            violated_resource_count: 1,
            violated_resource_service: "IAM".to_string(),
            violated_resource_description: "Root user has not enabled MFA".to_string(),
            implementation_status: false,
            created_at: Utc::now(),
            version: 1,
        }
    }

    #[test]
    fn test_consistent_tables_have_no_violations() {
        let questions = vec![question(1), question(2)];
        let best_practices = vec![best_practice(1, 1), best_practice(2, 2)];
        let findings = vec![finding(1, 1, 1), finding(2, 2, 2)];

        assert!(scan(&questions, &best_practices, &findings).is_empty());
    }

    #[test]
    fn test_empty_tables_are_consistent() {
        assert!(scan(&[], &[], &[]).is_empty());
    }

    #[test]
    fn test_orphaned_best_practice_reported() {
        let questions = vec![question(1)];
        let best_practices = vec![best_practice(1, 1), best_practice(2, 7)];

        let violations = scan(&questions, &best_practices, &[]);

        assert_eq!(
            violations,
            vec![IntegrityViolation::OrphanedBestPractice {
                best_practice_id: BestPracticeId(2),
                question_id: QuestionId(7),
            }]
        );
    }

    #[test]
    fn test_best_practice_reported_only_when_question_missing() {
        // Each best practice is reported if and only if its question is absent.
        let questions = vec![question(1), question(3)];
        let best_practices: Vec<BestPractice> =
            (1..=4).map(|id| best_practice(id, id)).collect();

        let violations = scan(&questions, &best_practices, &[]);
        let orphaned: Vec<BestPracticeId> = violations
            .iter()
            .filter_map(|v| match v {
                IntegrityViolation::OrphanedBestPractice {
                    best_practice_id, ..
                } => Some(*best_practice_id),
                _ => None,
            })
            .collect();

        assert_eq!(orphaned, vec![BestPracticeId(2), BestPracticeId(4)]);
    }

    #[test]
    fn test_inconsistent_finding_reported() {
        let questions = vec![question(1), question(2)];
        let best_practices = vec![best_practice(1, 1), best_practice(2, 2)];
        let findings = vec![finding(1, 1, 1), finding(2, 1, 2)];

        let violations = scan(&questions, &best_practices, &findings);

        assert_eq!(
            violations,
            vec![IntegrityViolation::InconsistentFinding {
                finding_id: FindingId(2),
                question_id: QuestionId(1),
                best_practice_id: BestPracticeId(2),
                best_practice_question_id: QuestionId(2),
            }]
        );
    }

    #[test]
    fn test_finding_with_missing_references() {
        let questions = vec![question(1)];
        let best_practices = vec![best_practice(1, 1)];
        let findings = vec![finding(1, 5, 9)];

        let violations = scan(&questions, &best_practices, &findings);

        assert_eq!(violations.len(), 2);
        assert!(violations.contains(&IntegrityViolation::FindingMissingQuestion {
            finding_id: FindingId(1),
            question_id: QuestionId(5),
        }));
        assert!(
            violations.contains(&IntegrityViolation::FindingMissingBestPractice {
                finding_id: FindingId(1),
                best_practice_id: BestPracticeId(9),
            })
        );
    }

    #[test]
    fn test_violation_display() {
        let violation = IntegrityViolation::InconsistentFinding {
            finding_id: FindingId(3),
            question_id: QuestionId(1),
            best_practice_id: BestPracticeId(4),
            best_practice_question_id: QuestionId(2),
        };
        assert_eq!(
            violation.to_string(),
            "finding 3 is filed under question 1 but best practice 4 belongs to question 2"
        );

        let orphan = IntegrityViolation::OrphanedBestPractice {
            best_practice_id: BestPracticeId(2),
            question_id: QuestionId(9),
        };
        assert_eq!(
            orphan.to_string(),
            "best practice 2 references missing question 9"
        );
    }
}

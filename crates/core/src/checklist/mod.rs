mod error;
mod filter;
mod integrity;
mod requests;
mod seed_data;
mod types;

pub use error::ValidationError;
pub use filter::FindingFilter;
pub use integrity::{scan as scan_integrity, IntegrityViolation};
pub use requests::{
    BestPracticeChanges, BestPracticeDraft, FindingDraft, NewBestPractice, NewFinding,
    NewQuestion, QuestionChanges, QuestionDraft, UpdateBestPractice, UpdateQuestion,
};
pub use seed_data::{SeedBestPractice, SeedData, SeedFinding, SeedQuestion};
pub use types::{
    BestPractice, BestPracticeId, Finding, FindingId, ImplementationType, Question, QuestionId,
    Severity,
};

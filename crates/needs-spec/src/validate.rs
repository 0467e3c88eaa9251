use thiserror::Error;

use crate::question::QuestionId;

/// Client-side validation failures. The refused operation leaves state unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationIssue {
    #[error("category '{category}' has unanswered required questions: {missing:?}")]
    MissingRequired {
        category: String,
        missing: Vec<QuestionId>,
    },
    #[error("at least one client contact field must be filled in")]
    MissingClientIdentity,
    #[error("file '{name}' is {size} bytes, the limit is {limit} bytes")]
    FileTooLarge { name: String, size: u64, limit: u64 },
    #[error("cannot attach {incoming} more file(s): {existing} attached, the limit is {limit}")]
    TooManyFiles {
        existing: usize,
        incoming: usize,
        limit: usize,
    },
    #[error("file '{name}' has type '{content_type}', which is not accepted")]
    FileTypeNotAllowed { name: String, content_type: String },
    #[error("submission is only possible from the last step")]
    NotOnFinalStep,
}

impl ValidationIssue {
    pub fn code(&self) -> &'static str {
        match self {
            ValidationIssue::MissingRequired { .. } => "missing_required",
            ValidationIssue::MissingClientIdentity => "missing_client_identity",
            ValidationIssue::FileTooLarge { .. } => "file_too_large",
            ValidationIssue::TooManyFiles { .. } => "too_many_files",
            ValidationIssue::FileTypeNotAllowed { .. } => "file_type",
            ValidationIssue::NotOnFinalStep => "not_on_final_step",
        }
    }
}

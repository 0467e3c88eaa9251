#![allow(missing_docs)]

pub mod attachment;
pub mod catalog;
pub mod collate;
pub mod navigator;
pub mod planner;
pub mod question;
pub mod rules;
pub mod session;
pub mod state;
pub mod submission;
pub mod validate;

pub use attachment::{
    Attachment, AttachmentLimits, DEFAULT_MAX_FILE_SIZE, DEFAULT_MAX_FILES, FileSummary,
};
pub use catalog::QuestionCatalog;
pub use collate::compare_names;
pub use navigator::{Advance, StepNavigator, can_advance, missing_required};
pub use planner::{StepGroup, StepKind, StepPlan, canonical_categories, optional_categories, plan};
pub use question::{CategoryType, Question, QuestionId, QuestionType};
pub use rules::{CategoryRules, DEFAULT_ACCESSORY_SUFFIX, DEFAULT_MANDATORY_CATEGORIES};
pub use session::{ProgressSummary, Questionnaire};
pub use state::{AnswerState, ResponseMap, SelectionMap};
pub use submission::{ClientDetails, FlowKind, SubmissionPayload, assemble};
pub use validate::ValidationIssue;

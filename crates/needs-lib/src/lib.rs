pub mod api;
pub mod attachments;
pub mod config;
pub mod driver;
pub mod error;
pub mod hooks;

pub use api::{HttpNeedsApi, NeedsApi, PendingFile, SubmissionId};
pub use attachments::{AttachmentManager, UploadReport, derive_public_path};
pub use config::{
    ApiConfig, ConfigError, NavigationConfig, NeedsConfig, StorageConfig, default_config_path,
};
pub use driver::NeedsAssessment;
pub use error::{ApiError, NeedsError};
pub use hooks::{Notice, NoticeLevel, SessionHooks, TracingHooks};

pub use needs_spec;

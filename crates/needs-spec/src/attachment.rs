use serde::{Deserialize, Serialize};

use crate::validate::ValidationIssue;

pub const DEFAULT_MAX_FILES: usize = 10;
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Metadata of an uploaded file, submitted alongside the responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub url: String,
    pub name: String,
    #[serde(rename = "type")]
    pub content_type: String,
    pub size: u64,
}

/// Upload limits applied to each batch before any transfer starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttachmentLimits {
    pub max_files: usize,
    pub max_file_size: u64,
    /// Accepted MIME types; `image/*` style wildcards allowed. Empty accepts all.
    pub allowed_types: Vec<String>,
}

impl Default for AttachmentLimits {
    fn default() -> Self {
        Self {
            max_files: DEFAULT_MAX_FILES,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            allowed_types: Vec::new(),
        }
    }
}

/// What batch validation needs to know about a file.
#[derive(Debug, Clone, Copy)]
pub struct FileSummary<'a> {
    pub name: &'a str,
    pub size: u64,
    pub content_type: &'a str,
}

impl AttachmentLimits {
    pub fn accepts_type(&self, content_type: &str) -> bool {
        if self.allowed_types.is_empty() {
            return true;
        }
        let content_type = content_type.trim().to_ascii_lowercase();
        self.allowed_types.iter().any(|allowed| {
            let allowed = allowed.trim().to_ascii_lowercase();
            match allowed.strip_suffix("/*") {
                Some(family) => content_type
                    .split_once('/')
                    .is_some_and(|(prefix, _)| prefix == family),
                None => allowed == content_type,
            }
        })
    }

    /// Accepts or refuses a whole batch given how many files are attached.
    pub fn check_batch(
        &self,
        existing: usize,
        files: &[FileSummary<'_>],
    ) -> Result<(), ValidationIssue> {
        if existing + files.len() > self.max_files {
            return Err(ValidationIssue::TooManyFiles {
                existing,
                incoming: files.len(),
                limit: self.max_files,
            });
        }
        for file in files {
            if file.size > self.max_file_size {
                return Err(ValidationIssue::FileTooLarge {
                    name: file.name.to_string(),
                    size: file.size,
                    limit: self.max_file_size,
                });
            }
            if !self.accepts_type(file.content_type) {
                return Err(ValidationIssue::FileTypeNotAllowed {
                    name: file.name.to_string(),
                    content_type: file.content_type.to_string(),
                });
            }
        }
        Ok(())
    }
}

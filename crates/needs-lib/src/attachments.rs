use url::Url;

use needs_spec::{Attachment, AttachmentLimits, FileSummary};

use crate::api::{NeedsApi, PendingFile};
use crate::error::{ApiError, NeedsError};
use crate::hooks::{Notice, SessionHooks};

/// Stable public link for an uploaded object: the target's final path segment
/// under `mount`. Query strings and fragments are dropped.
pub fn derive_public_path(target: &Url, mount: &str) -> Option<String> {
    let object_id = target
        .path_segments()?
        .filter(|segment| !segment.is_empty())
        .next_back()?;
    Some(format!("{}/{}", mount.trim_end_matches('/'), object_id))
}

/// Per-batch outcome. Failed files were not attached.
#[derive(Debug, Default)]
pub struct UploadReport {
    pub added: Vec<Attachment>,
    pub failed: Vec<(String, ApiError)>,
}

impl UploadReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Ordered list of uploaded attachments with the batch upload flow.
#[derive(Debug, Clone)]
pub struct AttachmentManager {
    limits: AttachmentLimits,
    public_mount: String,
    items: Vec<Attachment>,
}

impl AttachmentManager {
    pub fn new(limits: AttachmentLimits, public_mount: impl Into<String>) -> Self {
        Self {
            limits,
            public_mount: public_mount.into(),
            items: Vec::new(),
        }
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn limits(&self) -> &AttachmentLimits {
        &self.limits
    }

    /// Uploads `files` in order, one at a time.
    ///
    /// The batch is refused up front when it breaks the count cap, the size
    /// ceiling, or the type allow-list. A transport failure skips only the
    /// failing file; an authorization failure stops the batch, keeping files
    /// that already succeeded.
    pub async fn upload<A, H>(
        &mut self,
        api: &A,
        hooks: &H,
        files: Vec<PendingFile>,
    ) -> Result<UploadReport, NeedsError>
    where
        A: NeedsApi + ?Sized,
        H: SessionHooks + ?Sized,
    {
        let checked = {
            let summaries: Vec<FileSummary<'_>> = files
                .iter()
                .map(|file| FileSummary {
                    name: &file.name,
                    size: file.size(),
                    content_type: &file.content_type,
                })
                .collect();
            self.limits.check_batch(self.items.len(), &summaries)
        };
        if let Err(issue) = checked {
            hooks.notify(Notice::error("Nie można dodać plików", issue.to_string()));
            return Err(issue.into());
        }

        let mut report = UploadReport::default();
        for file in files {
            match self.upload_one(api, &file).await {
                Ok(attachment) => {
                    tracing::info!(name = %attachment.name, url = %attachment.url, "attachment uploaded");
                    self.items.push(attachment.clone());
                    report.added.push(attachment);
                }
                Err(err) if err.is_authorization() => {
                    tracing::warn!(name = %file.name, error = %err, "upload not authorized");
                    return Err(err.into());
                }
                Err(err) => {
                    tracing::warn!(name = %file.name, error = %err, "attachment upload failed");
                    hooks.notify(Notice::error(
                        "Błąd przesyłania",
                        format!("Nie udało się przesłać pliku {}: {err}", file.name),
                    ));
                    report.failed.push((file.name, err));
                }
            }
        }

        if !report.added.is_empty() {
            hooks.notify(Notice::success(
                "Pliki dodane",
                format!("Przesłano plików: {}", report.added.len()),
            ));
        }
        Ok(report)
    }

    async fn upload_one<A>(&self, api: &A, file: &PendingFile) -> Result<Attachment, ApiError>
    where
        A: NeedsApi + ?Sized,
    {
        let target = api.issue_upload_target().await?;
        api.transfer_file(&target, file).await?;
        let url = derive_public_path(&target, &self.public_mount)
            .ok_or(ApiError::MissingField("upload target path"))?;
        Ok(Attachment {
            url,
            name: file.name.clone(),
            content_type: file.content_type.clone(),
            size: file.size(),
        })
    }

    /// Drops one entry locally; the remote object is left in place.
    pub fn remove(&mut self, index: usize) -> Option<Attachment> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

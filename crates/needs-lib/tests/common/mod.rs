#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::json;
use url::Url;

use needs_lib::needs_spec::{FlowKind, Question, SubmissionPayload};
use needs_lib::{
    ApiError, NeedsApi, NeedsConfig, Notice, NoticeLevel, PendingFile, SessionHooks, SubmissionId,
};

/// In-memory stand-in for the catalog, object store and submission endpoints.
#[derive(Default)]
pub struct FakeApi {
    pub questions: Vec<Question>,
    pub catalog_status: Option<u16>,
    pub failing_files: BTreeSet<String>,
    pub transfer_status: Option<u16>,
    pub submit_status: Option<u16>,
    pub targets_issued: AtomicUsize,
    pub transfers: Mutex<Vec<(Url, String)>>,
    pub submissions: Mutex<Vec<(FlowKind, SubmissionPayload)>>,
}

impl FakeApi {
    pub fn with_questions(questions: Vec<Question>) -> Self {
        Self {
            questions,
            ..Self::default()
        }
    }

    pub fn submissions(&self) -> Vec<(FlowKind, SubmissionPayload)> {
        self.submissions.lock().expect("lock").clone()
    }

    pub fn transferred_names(&self) -> Vec<String> {
        self.transfers
            .lock()
            .expect("lock")
            .iter()
            .map(|(_, name)| name.clone())
            .collect()
    }
}

fn status_error(status: u16) -> ApiError {
    if status == 401 || status == 403 {
        ApiError::Unauthorized { status }
    } else {
        ApiError::Status {
            status,
            body: "upstream failure".into(),
        }
    }
}

#[async_trait]
impl NeedsApi for FakeApi {
    async fn fetch_questions(&self) -> Result<Vec<Question>, ApiError> {
        match self.catalog_status {
            Some(status) => Err(status_error(status)),
            None => Ok(self.questions.clone()),
        }
    }

    async fn issue_upload_target(&self) -> Result<Url, ApiError> {
        let n = self.targets_issued.fetch_add(1, Ordering::SeqCst);
        Ok(Url::parse(&format!(
            "https://storage.example/bucket/uploads/obj-{n}?X-Signature=secret"
        ))?)
    }

    async fn transfer_file(&self, target: &Url, file: &PendingFile) -> Result<(), ApiError> {
        if let Some(status) = self.transfer_status {
            return Err(status_error(status));
        }
        if self.failing_files.contains(&file.name) {
            return Err(status_error(500));
        }
        self.transfers
            .lock()
            .expect("lock")
            .push((target.clone(), file.name.clone()));
        Ok(())
    }

    async fn submit(
        &self,
        flow: FlowKind,
        payload: &SubmissionPayload,
    ) -> Result<SubmissionId, ApiError> {
        if let Some(status) = self.submit_status {
            return Err(status_error(status));
        }
        let mut submissions = self.submissions.lock().expect("lock");
        submissions.push((flow, payload.clone()));
        Ok(SubmissionId::Number(submissions.len() as i64))
    }
}

/// Records every notice and redirect.
#[derive(Default)]
pub struct RecordingHooks {
    pub notices: Mutex<Vec<Notice>>,
    pub redirects: Mutex<Vec<String>>,
}

impl RecordingHooks {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().expect("lock").clone()
    }

    pub fn errors(&self) -> Vec<Notice> {
        self.notices()
            .into_iter()
            .filter(|notice| notice.level == NoticeLevel::Error)
            .collect()
    }

    pub fn redirects(&self) -> Vec<String> {
        self.redirects.lock().expect("lock").clone()
    }
}

impl SessionHooks for RecordingHooks {
    fn notify(&self, notice: Notice) {
        self.notices.lock().expect("lock").push(notice);
    }

    fn redirect_to(&self, path: &str) {
        self.redirects.lock().expect("lock").push(path.to_string());
    }
}

pub fn catalog() -> Vec<Question> {
    serde_json::from_value(json!([
        { "id": 1, "category": "Informacje ogólne", "question": "Czego dotyczy zapytanie?", "type": "text", "isRequired": true },
        { "id": 2, "category": "Generator", "question": "Wymagana moc", "type": "text", "isRequired": true, "categoryType": "equipment" },
        { "id": 3, "category": "Generator - wyposażenie", "question": "Przewody", "type": "equipment_option", "categoryType": "equipment" }
    ]))
    .expect("fixture should deserialize")
}

/// Defaults with no redirect delay so tests do not sleep.
pub fn config() -> NeedsConfig {
    let mut config = NeedsConfig::default();
    config.navigation.redirect_delay_ms = 0;
    config
}

pub fn file(name: &str, size: usize) -> PendingFile {
    PendingFile::new(name, "application/pdf", vec![0_u8; size])
}

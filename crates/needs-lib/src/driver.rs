use needs_spec::{
    Advance, Attachment, ClientDetails, FlowKind, QuestionCatalog, QuestionId, Questionnaire,
    ValidationIssue,
};

use crate::api::{NeedsApi, PendingFile, SubmissionId};
use crate::attachments::{AttachmentManager, UploadReport};
use crate::config::NeedsConfig;
use crate::error::NeedsError;
use crate::hooks::{Notice, SessionHooks};

/// Drives one needs-assessment session against its collaborators.
pub struct NeedsAssessment<A, H> {
    api: A,
    hooks: H,
    config: NeedsConfig,
    flow: FlowKind,
    questionnaire: Questionnaire,
    attachments: AttachmentManager,
    client: ClientDetails,
}

impl<A, H> NeedsAssessment<A, H>
where
    A: NeedsApi,
    H: SessionHooks,
{
    /// Fetches the catalog and opens a fresh session.
    pub async fn load(
        api: A,
        hooks: H,
        config: NeedsConfig,
        flow: FlowKind,
    ) -> Result<Self, NeedsError> {
        let questions = match api.fetch_questions().await {
            Ok(questions) => questions,
            Err(err) => {
                let err = NeedsError::from(err);
                report_failure(&hooks, &config, "Nie udało się pobrać pytań", &err).await;
                return Err(err);
            }
        };
        tracing::info!(questions = questions.len(), ?flow, "question catalog loaded");
        Ok(Self::with_catalog(
            api,
            hooks,
            config,
            flow,
            QuestionCatalog::new(questions),
        ))
    }

    pub fn with_catalog(
        api: A,
        hooks: H,
        config: NeedsConfig,
        flow: FlowKind,
        catalog: QuestionCatalog,
    ) -> Self {
        let questionnaire = Questionnaire::new(catalog, config.questionnaire.clone());
        let attachments = AttachmentManager::new(
            config.attachments.clone(),
            config.storage.public_mount.clone(),
        );
        Self {
            api,
            hooks,
            config,
            flow,
            questionnaire,
            attachments,
            client: ClientDetails::default(),
        }
    }

    pub fn flow(&self) -> FlowKind {
        self.flow
    }

    pub fn questionnaire(&self) -> &Questionnaire {
        &self.questionnaire
    }

    /// Direct access for replaying recorded answers without notices.
    pub fn questionnaire_mut(&mut self) -> &mut Questionnaire {
        &mut self.questionnaire
    }

    pub fn attachments(&self) -> &[Attachment] {
        self.attachments.attachments()
    }

    pub fn client(&self) -> &ClientDetails {
        &self.client
    }

    pub fn set_client(&mut self, client: ClientDetails) {
        self.client = client;
    }

    pub fn toggle_category(&mut self, category: &str, selected: bool) -> Vec<QuestionId> {
        self.questionnaire.toggle_category(category, selected)
    }

    pub fn set_response(&mut self, id: QuestionId, value: impl Into<String>) {
        self.questionnaire.set_response(id, value);
    }

    /// Advances one step; a refused move raises a validation notice.
    pub fn next(&mut self) -> Advance {
        let outcome = self.questionnaire.next();
        if let Advance::Blocked { category, .. } = &outcome {
            self.hooks.notify(Notice::error(
                "Uzupełnij wymagane pola",
                format!("Odpowiedz na wszystkie wymagane pytania w kategorii \"{category}\""),
            ));
        }
        outcome
    }

    pub fn previous(&mut self) -> bool {
        self.questionnaire.previous()
    }

    /// Walks forward until the last step or the first blocked one.
    pub fn advance_to_end(&mut self) -> Advance {
        loop {
            match self.next() {
                Advance::Moved { .. } => continue,
                other => return other,
            }
        }
    }

    pub async fn upload(&mut self, files: Vec<PendingFile>) -> Result<UploadReport, NeedsError> {
        match self.attachments.upload(&self.api, &self.hooks, files).await {
            Ok(report) => Ok(report),
            Err(err @ NeedsError::Authorization(_)) => {
                self.on_authorization_failure(&err).await;
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    pub fn remove_attachment(&mut self, index: usize) -> Option<Attachment> {
        self.attachments.remove(index)
    }

    /// Sends the assembled payload.
    ///
    /// Success discards the session and redirects; failure keeps every answer
    /// so the user can retry.
    pub async fn submit(&mut self) -> Result<SubmissionId, NeedsError> {
        let payload = match self.questionnaire.assemble(
            self.flow,
            &self.client,
            self.attachments.attachments(),
        ) {
            Ok(payload) => payload,
            Err(issue) => {
                self.hooks
                    .notify(Notice::error("Nie można wysłać formularza", issue_message(&issue)));
                return Err(issue.into());
            }
        };

        match self.api.submit(self.flow, &payload).await {
            Ok(id) => {
                tracing::info!(%id, responses = payload.responses.len(), "needs assessment submitted");
                self.hooks.notify(Notice::success(
                    "Formularz wysłany",
                    "Dziękujemy, skontaktujemy się wkrótce",
                ));
                self.discard();
                self.hooks
                    .redirect_to(self.config.navigation.success_path(self.flow));
                Ok(id)
            }
            Err(err) => {
                let err = NeedsError::from(err);
                if matches!(err, NeedsError::Authorization(_)) {
                    self.on_authorization_failure(&err).await;
                } else {
                    tracing::warn!(error = %err, "submission failed");
                    self.hooks
                        .notify(Notice::error("Nie udało się wysłać formularza", err.to_string()));
                }
                Err(err)
            }
        }
    }

    /// Drops answers, selection, attachments and client fields.
    pub fn discard(&mut self) {
        self.questionnaire.reset();
        self.attachments.clear();
        self.client = ClientDetails::default();
    }

    async fn on_authorization_failure(&mut self, err: &NeedsError) {
        report_failure(&self.hooks, &self.config, "Brak uprawnień", err).await;
        self.discard();
    }
}

fn issue_message(issue: &ValidationIssue) -> String {
    match issue {
        ValidationIssue::MissingClientIdentity => {
            "Podaj nazwę firmy, osobę kontaktową, e-mail lub telefon".to_string()
        }
        ValidationIssue::MissingRequired { category, .. } => {
            format!("Odpowiedz na wymagane pytania w kategorii \"{category}\"")
        }
        other => other.to_string(),
    }
}

/// Notifies, and for authorization failures redirects to login after a delay.
async fn report_failure<H>(hooks: &H, config: &NeedsConfig, title: &str, err: &NeedsError)
where
    H: SessionHooks + ?Sized,
{
    match err {
        NeedsError::Authorization(_) => {
            tracing::warn!(error = %err, "authorization failure, redirecting to login");
            hooks.notify(Notice::error(
                "Brak uprawnień",
                "Sesja wygasła lub nie masz dostępu. Zaloguj się ponownie.",
            ));
            let delay = config.navigation.redirect_delay();
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            hooks.redirect_to(&config.navigation.login_path);
        }
        other => {
            tracing::warn!(error = %other, "{title}");
            hooks.notify(Notice::error(title, other.to_string()));
        }
    }
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::attachment::Attachment;
use crate::question::QuestionId;
use crate::state::ResponseMap;
use crate::validate::ValidationIssue;

/// Which questionnaire entry point is being driven.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowKind {
    /// Public form filled in by the client.
    #[default]
    Client,
    /// Staff entering a client's needs; identity fields are optional.
    Staff,
}

/// Client identity fields sent with a submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_person: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ClientDetails {
    /// True when any identity field (notes excluded) is non-blank.
    pub fn has_identity(&self) -> bool {
        [
            &self.company_name,
            &self.contact_person,
            &self.email,
            &self.phone,
        ]
        .into_iter()
        .flatten()
        .any(|value| !value.trim().is_empty())
    }
}

/// Body of the single submission call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    #[serde(flatten)]
    pub client: ClientDetails,
    pub responses: BTreeMap<QuestionId, String>,
    pub attachments: Vec<Attachment>,
}

/// Packages identity, responses and attachments for submission.
pub fn assemble(
    flow: FlowKind,
    client: &ClientDetails,
    responses: &ResponseMap,
    attachments: &[Attachment],
) -> Result<SubmissionPayload, ValidationIssue> {
    if flow == FlowKind::Client && !client.has_identity() {
        return Err(ValidationIssue::MissingClientIdentity);
    }
    Ok(SubmissionPayload {
        client: client.clone(),
        responses: responses.as_map().clone(),
        attachments: attachments.to_vec(),
    })
}

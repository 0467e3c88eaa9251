use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use needs_spec::{ClientDetails, QuestionId, Questionnaire};

/// Recorded answers replayed against a catalog.
///
/// ```json
/// {
///   "selected": ["Generator"],
///   "responses": { "1": "Budowa hali", "2": "100 kVA" },
///   "client": { "companyName": "Budimex", "email": "biuro@budimex.example" }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswersDocument {
    pub selected: Vec<String>,
    pub responses: BTreeMap<QuestionId, String>,
    pub client: ClientDetails,
}

impl AnswersDocument {
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read answers {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("invalid answers {}", path.display()))
    }

    /// Selects categories, then records responses for unlocked questions.
    ///
    /// Returns ids that were dropped, either because their question is hidden
    /// by the selection or because the value does not fit the question kind.
    pub fn apply(&self, questionnaire: &mut Questionnaire) -> Vec<QuestionId> {
        for category in &self.selected {
            questionnaire.toggle_category(category, true);
        }
        let mut ignored = Vec::new();
        for (&id, value) in &self.responses {
            if !questionnaire.is_unlocked(id) {
                tracing::warn!(question = id, "response ignored: question is not on an unlocked step");
                ignored.push(id);
                continue;
            }
            let fits = questionnaire
                .catalog()
                .get(id)
                .is_some_and(|question| question.accepts(value));
            if fits {
                questionnaire.set_response(id, value.clone());
            } else {
                tracing::warn!(question = id, value = %value, "response ignored: value does not match the question options");
                ignored.push(id);
            }
        }
        ignored
    }
}

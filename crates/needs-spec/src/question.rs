use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier of a catalog question.
pub type QuestionId = i64;

/// Supported question input kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum QuestionType {
    Text,
    Radio,
    EquipmentOption,
    /// Section header rendered above a group of equipment options.
    MultipleChoice,
    Other(String),
}

impl QuestionType {
    /// Section headers carry no answer of their own.
    pub fn is_answerable(&self) -> bool {
        !matches!(self, QuestionType::MultipleChoice)
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, QuestionType::EquipmentOption)
    }

    pub fn as_str(&self) -> &str {
        match self {
            QuestionType::Text => "text",
            QuestionType::Radio => "radio",
            QuestionType::EquipmentOption => "equipment_option",
            QuestionType::MultipleChoice => "multiple_choice",
            QuestionType::Other(raw) => raw,
        }
    }
}

impl From<String> for QuestionType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "text" => QuestionType::Text,
            "radio" => QuestionType::Radio,
            "equipment_option" => QuestionType::EquipmentOption,
            "multiple_choice" => QuestionType::MultipleChoice,
            _ => QuestionType::Other(raw),
        }
    }
}

impl From<QuestionType> for String {
    fn from(kind: QuestionType) -> Self {
        kind.as_str().to_string()
    }
}

/// Grouping tag deciding which partition a category is planned in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryType {
    #[default]
    General,
    Equipment,
}

/// Catalog question as served by the needs-assessment API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    pub category: String,
    pub question: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    #[serde(default)]
    pub options: Value,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub position: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_type: Option<CategoryType>,
}

fn default_active() -> bool {
    true
}

impl Question {
    pub fn category_type(&self) -> CategoryType {
        self.category_type.unwrap_or_default()
    }

    /// Whether this question blocks its step until answered.
    pub fn gates_navigation(&self) -> bool {
        self.is_active && self.is_required && self.kind.is_answerable()
    }

    /// Choice tokens for radio questions, when the options payload lists them.
    pub fn choices(&self) -> Vec<String> {
        match &self.options {
            Value::Array(items) => items
                .iter()
                .filter_map(|item| match item {
                    Value::String(text) => Some(text.clone()),
                    Value::Object(map) => map
                        .get("value")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Whether `value` fits the question's input kind.
    ///
    /// Equipment options take `"true"`/`"false"`; radio questions take one of
    /// their listed choices when the catalog lists any. Everything else is
    /// free text. Blank values always fit; they count as unanswered.
    pub fn accepts(&self, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() {
            return true;
        }
        if self.kind.is_boolean() {
            return matches!(value, "true" | "false");
        }
        if self.kind == QuestionType::Radio {
            let choices = self.choices();
            return choices.is_empty() || choices.iter().any(|choice| choice == value);
        }
        true
    }
}

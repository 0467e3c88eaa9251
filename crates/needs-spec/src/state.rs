use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::QuestionCatalog;
use crate::question::QuestionId;
use crate::rules::CategoryRules;

/// User opt-in state for optional categories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionMap(BTreeMap<String, bool>);

impl SelectionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mandatory categories read as selected whatever the map holds.
    pub fn is_selected(&self, rules: &CategoryRules, category: &str) -> bool {
        rules.is_mandatory(category) || self.0.get(category).copied().unwrap_or(false)
    }

    pub fn selected(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter(|(_, selected)| **selected)
            .map(|(category, _)| category.as_str())
    }

    pub fn as_map(&self) -> &BTreeMap<String, bool> {
        &self.0
    }

    fn set(&mut self, category: &str, selected: bool) {
        self.0.insert(category.to_string(), selected);
    }
}

/// Per-question answers keyed by question id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseMap(BTreeMap<QuestionId, String>);

impl ResponseMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: QuestionId) -> Option<&str> {
        self.0.get(&id).map(String::as_str)
    }

    /// Present and not blank after trimming.
    pub fn is_answered(&self, id: QuestionId) -> bool {
        self.get(id).is_some_and(|value| !value.trim().is_empty())
    }

    pub fn contains(&self, id: QuestionId) -> bool {
        self.0.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (QuestionId, &str)> {
        self.0.iter().map(|(id, value)| (*id, value.as_str()))
    }

    pub fn as_map(&self) -> &BTreeMap<QuestionId, String> {
        &self.0
    }

    fn insert(&mut self, id: QuestionId, value: String) {
        self.0.insert(id, value);
    }

    fn remove(&mut self, id: QuestionId) -> bool {
        self.0.remove(&id).is_some()
    }
}

impl FromIterator<(QuestionId, String)> for ResponseMap {
    fn from_iter<T: IntoIterator<Item = (QuestionId, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Selection and response stores, mutated only through the operations below.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerState {
    pub selection: SelectionMap,
    pub responses: ResponseMap,
}

impl AnswerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a category's selection flag.
    ///
    /// Deselecting purges every response of the category and of each accessory
    /// category bound to it. Mandatory categories are ignored. Returns the ids
    /// of purged responses.
    pub fn toggle_category(
        &mut self,
        catalog: &QuestionCatalog,
        rules: &CategoryRules,
        category: &str,
        selected: bool,
    ) -> Vec<QuestionId> {
        if rules.is_mandatory(category) {
            tracing::debug!(category, "ignoring toggle of mandatory category");
            return Vec::new();
        }

        self.selection.set(category, selected);
        if selected {
            return Vec::new();
        }

        let mut purge_categories = vec![category.to_string()];
        purge_categories.extend(
            catalog
                .all_categories()
                .into_iter()
                .filter(|candidate| rules.is_accessory_of(candidate, category)),
        );
        let implied = rules.accessory_name(category);
        if !purge_categories.contains(&implied) {
            purge_categories.push(implied);
        }

        let mut purged = Vec::new();
        for name in &purge_categories {
            for id in catalog.ids_in(name) {
                if self.responses.remove(id) {
                    purged.push(id);
                }
            }
        }
        if !purged.is_empty() {
            tracing::debug!(category, purged = purged.len(), "purged responses of deselected category");
        }
        purged
    }

    /// Upserts an answer; validation happens at navigation time.
    pub fn set_response(&mut self, id: QuestionId, value: impl Into<String>) {
        self.responses.insert(id, value.into());
    }

    pub fn clear_response(&mut self, id: QuestionId) -> bool {
        self.responses.remove(id)
    }

    pub fn is_selected(&self, rules: &CategoryRules, category: &str) -> bool {
        self.selection.is_selected(rules, category)
    }
}

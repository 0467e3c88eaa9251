use serde::Serialize;

use crate::catalog::QuestionCatalog;
use crate::collate::compare_names;
use crate::question::{CategoryType, Question};
use crate::rules::CategoryRules;
use crate::state::SelectionMap;

/// How a planned step relates to the user's selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepKind {
    Mandatory,
    /// General category the user may opt into from its own step.
    Optional,
    Equipment,
    Accessory { base: String },
}

/// One visible category with its ordered, active questions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepGroup {
    pub category: String,
    #[serde(flatten)]
    pub kind: StepKind,
    pub questions: Vec<Question>,
}

impl StepGroup {
    /// Whether the step's questions are unlocked for the current selection.
    pub fn is_selected(&self, rules: &CategoryRules, selection: &SelectionMap) -> bool {
        match &self.kind {
            StepKind::Mandatory => true,
            StepKind::Accessory { base } => selection.is_selected(rules, base),
            StepKind::Optional | StepKind::Equipment => {
                selection.is_selected(rules, &self.category)
            }
        }
    }

    pub fn is_optional(&self) -> bool {
        !matches!(self.kind, StepKind::Mandatory)
    }
}

/// Ordered sequence of visible category groups.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StepPlan {
    groups: Vec<StepGroup>,
}

impl StepPlan {
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, step: usize) -> Option<&StepGroup> {
        self.groups.get(step)
    }

    pub fn groups(&self) -> &[StepGroup] {
        &self.groups
    }

    pub fn categories(&self) -> Vec<&str> {
        self.groups
            .iter()
            .map(|group| group.category.as_str())
            .collect()
    }

    pub fn position_of(&self, category: &str) -> Option<usize> {
        self.groups
            .iter()
            .position(|group| group.category == category)
    }
}

/// Canonical category order: mandatory general categories in configured
/// order, other general categories alphabetically, then equipment categories
/// alphabetically.
pub fn canonical_categories(catalog: &QuestionCatalog, rules: &CategoryRules) -> Vec<String> {
    let general = catalog.categories_of_type(CategoryType::General);
    let equipment = catalog.categories_of_type(CategoryType::Equipment);

    let mut mandatory: Vec<String> = general
        .iter()
        .filter(|category| rules.is_mandatory(category))
        .cloned()
        .collect();
    mandatory.sort_by_key(|category| rules.mandatory_rank(category));

    let mut elective: Vec<String> = general
        .iter()
        .filter(|category| !rules.is_mandatory(category))
        .cloned()
        .collect();
    elective.sort_by(|a, b| compare_names(a, b));

    let mut equipment: Vec<String> = equipment
        .into_iter()
        .filter(|category| !general.contains(category))
        .collect();
    equipment.sort_by(|a, b| compare_names(a, b));

    mandatory
        .into_iter()
        .chain(elective)
        .chain(equipment)
        .collect()
}

/// Categories a user can opt into, in canonical order.
pub fn optional_categories(catalog: &QuestionCatalog, rules: &CategoryRules) -> Vec<String> {
    canonical_categories(catalog, rules)
        .into_iter()
        .filter(|category| !rules.is_mandatory(category) && !rules.is_accessory(category))
        .collect()
}

/// Derives the step plan from the catalog and the current selection.
///
/// Equipment categories appear only while selected and accessory categories
/// only while their base is selected. General categories are always planned.
pub fn plan(catalog: &QuestionCatalog, rules: &CategoryRules, selection: &SelectionMap) -> StepPlan {
    let equipment = catalog.categories_of_type(CategoryType::Equipment);
    let general = catalog.categories_of_type(CategoryType::General);

    let mut groups = Vec::new();
    for category in canonical_categories(catalog, rules) {
        let kind = if rules.is_mandatory(&category) {
            StepKind::Mandatory
        } else if let Some(base) = rules.base_category(&category) {
            if !selection.is_selected(rules, &base) {
                continue;
            }
            StepKind::Accessory { base }
        } else if equipment.contains(&category) && !general.contains(&category) {
            if !selection.is_selected(rules, &category) {
                continue;
            }
            StepKind::Equipment
        } else {
            StepKind::Optional
        };

        let questions = catalog.questions_in(&category);
        if questions.is_empty() {
            continue;
        }
        groups.push(StepGroup {
            category,
            kind,
            questions,
        });
    }

    tracing::trace!(steps = groups.len(), "step plan derived");
    StepPlan { groups }
}

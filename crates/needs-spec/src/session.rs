use std::collections::BTreeSet;

use serde::Serialize;

use crate::attachment::Attachment;
use crate::catalog::QuestionCatalog;
use crate::navigator::{Advance, StepNavigator, can_advance, missing_required};
use crate::planner::{StepGroup, StepPlan, optional_categories, plan};
use crate::question::QuestionId;
use crate::rules::CategoryRules;
use crate::state::{AnswerState, ResponseMap};
use crate::submission::{ClientDetails, FlowKind, SubmissionPayload, assemble};
use crate::validate::ValidationIssue;

/// Answered/total counters over the answerable questions of the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressSummary {
    pub step: usize,
    pub steps: usize,
    pub answered: usize,
    pub total: usize,
}

/// One questionnaire session: catalog, answers, and the derived plan.
///
/// The plan is recomputed from scratch after every mutation and the cursor is
/// clamped to it, so the visible steps never drift from the selection.
#[derive(Debug, Clone)]
pub struct Questionnaire {
    catalog: QuestionCatalog,
    rules: CategoryRules,
    state: AnswerState,
    navigator: StepNavigator,
    plan: StepPlan,
}

impl Questionnaire {
    pub fn new(catalog: QuestionCatalog, rules: CategoryRules) -> Self {
        let mut questionnaire = Self {
            catalog,
            rules,
            state: AnswerState::new(),
            navigator: StepNavigator::new(),
            plan: StepPlan::default(),
        };
        questionnaire.refresh();
        questionnaire
    }

    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    pub fn rules(&self) -> &CategoryRules {
        &self.rules
    }

    pub fn state(&self) -> &AnswerState {
        &self.state
    }

    pub fn plan(&self) -> &StepPlan {
        &self.plan
    }

    pub fn current_step(&self) -> usize {
        self.navigator.current()
    }

    pub fn current_group(&self) -> Option<&StepGroup> {
        self.plan.get(self.navigator.current())
    }

    pub fn is_terminal(&self) -> bool {
        self.navigator.is_terminal(&self.plan)
    }

    /// Categories offered in the selection list.
    pub fn optional_categories(&self) -> Vec<String> {
        optional_categories(&self.catalog, &self.rules)
    }

    /// Applies a selection change, then drops every response whose question
    /// is no longer on an unlocked step. Returns the ids of dropped responses.
    pub fn toggle_category(&mut self, category: &str, selected: bool) -> Vec<QuestionId> {
        let mut purged = self
            .state
            .toggle_category(&self.catalog, &self.rules, category, selected);
        self.refresh();
        purged.extend(self.prune_hidden());
        purged
    }

    /// Whether `id` sits on a planned step that is mandatory or selected.
    pub fn is_unlocked(&self, id: QuestionId) -> bool {
        self.unlocked_ids().contains(&id)
    }

    pub fn set_response(&mut self, id: QuestionId, value: impl Into<String>) {
        self.state.set_response(id, value);
        self.refresh();
    }

    pub fn clear_response(&mut self, id: QuestionId) -> bool {
        let removed = self.state.clear_response(id);
        self.refresh();
        removed
    }

    pub fn response(&self, id: QuestionId) -> Option<&str> {
        self.state.responses.get(id)
    }

    pub fn can_advance(&self) -> bool {
        self.current_group()
            .is_none_or(|group| can_advance(group, &self.rules, &self.state))
    }

    pub fn next(&mut self) -> Advance {
        self.navigator.next(&self.plan, &self.rules, &self.state)
    }

    pub fn previous(&mut self) -> bool {
        self.navigator.previous()
    }

    /// First planned step whose gate does not hold, with its missing ids.
    pub fn first_blocking_step(&self) -> Option<(usize, &StepGroup, Vec<QuestionId>)> {
        self.plan
            .groups()
            .iter()
            .enumerate()
            .find(|(_, group)| !can_advance(group, &self.rules, &self.state))
            .map(|(index, group)| (index, group, missing_required(group, &self.state)))
    }

    pub fn progress(&self) -> ProgressSummary {
        let mut answered = 0;
        let mut total = 0;
        for group in self.plan.groups() {
            if group.is_optional() && !group.is_selected(&self.rules, &self.state.selection) {
                continue;
            }
            for question in group.questions.iter().filter(|q| q.kind.is_answerable()) {
                total += 1;
                if self.state.responses.is_answered(question.id) {
                    answered += 1;
                }
            }
        }
        ProgressSummary {
            step: self.navigator.current(),
            steps: self.plan.len(),
            answered,
            total,
        }
    }

    /// Builds the submission payload from the last step.
    ///
    /// Every planned step must pass its gate, not only the current one.
    pub fn assemble(
        &self,
        flow: FlowKind,
        client: &ClientDetails,
        attachments: &[Attachment],
    ) -> Result<SubmissionPayload, ValidationIssue> {
        if !self.is_terminal() {
            return Err(ValidationIssue::NotOnFinalStep);
        }
        if let Some((_, group, missing)) = self.first_blocking_step() {
            return Err(ValidationIssue::MissingRequired {
                category: group.category.clone(),
                missing,
            });
        }
        let unlocked = self.unlocked_ids();
        let visible: ResponseMap = self
            .state
            .responses
            .iter()
            .filter(|(id, _)| unlocked.contains(id))
            .map(|(id, value)| (id, value.to_string()))
            .collect();
        assemble(flow, client, &visible, attachments)
    }

    /// Drops answers and selection and returns to the first step.
    pub fn reset(&mut self) {
        self.state = AnswerState::new();
        self.navigator.reset();
        self.refresh();
    }

    /// Moves the cursor to the last step, stopping at the first blocked one.
    pub fn advance_to_end(&mut self) -> Advance {
        loop {
            match self.next() {
                Advance::Moved { .. } => continue,
                other => return other,
            }
        }
    }

    fn unlocked_ids(&self) -> BTreeSet<QuestionId> {
        self.plan
            .groups()
            .iter()
            .filter(|group| group.is_selected(&self.rules, &self.state.selection))
            .flat_map(|group| group.questions.iter().map(|question| question.id))
            .collect()
    }

    fn prune_hidden(&mut self) -> Vec<QuestionId> {
        let unlocked = self.unlocked_ids();
        let hidden: Vec<QuestionId> = self
            .state
            .responses
            .iter()
            .map(|(id, _)| id)
            .filter(|id| !unlocked.contains(id))
            .collect();
        for id in &hidden {
            self.state.clear_response(*id);
        }
        if !hidden.is_empty() {
            tracing::debug!(dropped = hidden.len(), "dropped responses to hidden questions");
        }
        hidden
    }

    fn refresh(&mut self) {
        let previous_len = self.plan.len();
        self.plan = plan(&self.catalog, &self.rules, &self.state.selection);
        self.navigator.clamp(self.plan.len());
        if previous_len != self.plan.len() {
            tracing::debug!(
                from = previous_len,
                to = self.plan.len(),
                step = self.navigator.current(),
                "step plan recomputed"
            );
        }
    }
}

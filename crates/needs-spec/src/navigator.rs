use serde::Serialize;

use crate::planner::{StepGroup, StepPlan};
use crate::question::QuestionId;
use crate::rules::CategoryRules;
use crate::state::AnswerState;

/// Required, answerable questions of `group` still lacking a non-blank answer.
pub fn missing_required(group: &StepGroup, state: &AnswerState) -> Vec<QuestionId> {
    group
        .questions
        .iter()
        .filter(|question| question.gates_navigation())
        .filter(|question| !state.responses.is_answered(question.id))
        .map(|question| question.id)
        .collect()
}

/// Optional steps the user has not opted into are always skippable.
pub fn can_advance(group: &StepGroup, rules: &CategoryRules, state: &AnswerState) -> bool {
    if group.is_optional() && !group.is_selected(rules, &state.selection) {
        return true;
    }
    missing_required(group, state).is_empty()
}

/// Outcome of a forward transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Advance {
    Moved { step: usize },
    Blocked { category: String, missing: Vec<QuestionId> },
    AtEnd,
}

/// Cursor over the step plan's indices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StepNavigator {
    current: usize,
}

impl StepNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn is_terminal(&self, plan: &StepPlan) -> bool {
        self.current + 1 >= plan.len()
    }

    /// Moves forward when the current step's gate holds; otherwise a no-op.
    pub fn next(&mut self, plan: &StepPlan, rules: &CategoryRules, state: &AnswerState) -> Advance {
        let Some(group) = plan.get(self.current) else {
            return Advance::AtEnd;
        };
        if self.is_terminal(plan) {
            return Advance::AtEnd;
        }
        if !can_advance(group, rules, state) {
            let missing = missing_required(group, state);
            tracing::debug!(
                step = self.current,
                category = %group.category,
                missing = missing.len(),
                "advance refused"
            );
            return Advance::Blocked {
                category: group.category.clone(),
                missing,
            };
        }
        self.current += 1;
        Advance::Moved { step: self.current }
    }

    /// Moves back without validation. Returns `false` on the first step.
    pub fn previous(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Keeps the cursor inside `0..plan_len` after the plan shrinks.
    pub fn clamp(&mut self, plan_len: usize) {
        let last = plan_len.saturating_sub(1);
        if self.current > last {
            tracing::debug!(from = self.current, to = last, "clamping step after plan shrink");
            self.current = last;
        }
    }

    pub fn reset(&mut self) {
        self.current = 0;
    }
}

use std::collections::BTreeSet;

use crate::question::{CategoryType, Question, QuestionId};

/// Read-only question catalog for one questionnaire session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuestionCatalog {
    questions: Vec<Question>,
}

impl QuestionCatalog {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    /// Parses the JSON array served by the catalog endpoint.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let questions: Vec<Question> = serde_json::from_str(raw)?;
        Ok(Self::new(questions))
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn active(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter().filter(|question| question.is_active)
    }

    pub fn get(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|question| question.id == id)
    }

    /// Distinct category names of active questions in the given partition.
    pub fn categories_of_type(&self, kind: CategoryType) -> BTreeSet<String> {
        self.active()
            .filter(|question| question.category_type() == kind)
            .map(|question| question.category.clone())
            .collect()
    }

    /// Active questions of one category, ordered by position.
    pub fn questions_in(&self, category: &str) -> Vec<Question> {
        let mut questions: Vec<Question> = self
            .active()
            .filter(|question| question.category == category)
            .cloned()
            .collect();
        questions.sort_by_key(|question| (question.position, question.id));
        questions
    }

    /// Ids of every question in `category`, active or not.
    pub fn ids_in(&self, category: &str) -> Vec<QuestionId> {
        self.questions
            .iter()
            .filter(|question| question.category == category)
            .map(|question| question.id)
            .collect()
    }

    /// Every distinct category name, including inactive-only ones.
    pub fn all_categories(&self) -> BTreeSet<String> {
        self.questions
            .iter()
            .map(|question| question.category.clone())
            .collect()
    }
}

impl From<Vec<Question>> for QuestionCatalog {
    fn from(questions: Vec<Question>) -> Self {
        Self::new(questions)
    }
}

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::QuestionSetError;

/// How hard a question is meant to be.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// A single multiple-choice question.
///
/// The answer fields are owned by the session: they are absent until the
/// player answers, and are cleared whenever the session is loaded or reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub category: String,
    pub difficulty: Difficulty,
    #[serde(rename = "question")]
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_selected_answer: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_correct_answer: Option<bool>,
}

impl Question {
    /// Record the player's answer. Any index is accepted; an index outside
    /// the options is simply wrong.
    pub fn answer(&mut self, option_index: i64) {
        let correct = usize::try_from(option_index)
            .map(|index| index == self.correct_answer)
            .unwrap_or(false);
        self.user_selected_answer = Some(option_index);
        self.is_correct_answer = Some(correct);
    }

    /// Forget the player's answer.
    pub fn clear_answer(&mut self) {
        self.user_selected_answer = None;
        self.is_correct_answer = None;
    }

    pub fn is_answered(&self) -> bool {
        self.user_selected_answer.is_some()
    }

    pub fn is_correct(&self) -> bool {
        self.is_correct_answer == Some(true)
    }
}

/// Check that a freshly fetched question set is well-formed: identifiers are
/// unique and every correct-answer index points at an existing option.
///
/// Reports the first problem found.
pub fn validate_questions(questions: &[Question]) -> Result<(), QuestionSetError> {
    let mut seen = HashSet::with_capacity(questions.len());
    for question in questions {
        if !seen.insert(question.id.as_str()) {
            return Err(QuestionSetError::DuplicateId(question.id.clone()));
        }
        if question.correct_answer >= question.options.len() {
            return Err(QuestionSetError::AnswerOutOfRange {
                id: question.id.clone(),
                correct_answer: question.correct_answer,
                options: question.options.len(),
            });
        }
    }
    Ok(())
}

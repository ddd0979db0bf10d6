use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "question_type", rename_all = "snake_case")]
pub enum QuestionKind {
    MultipleChoice { options: Vec<String> },
    TrueFalse,
    ShortAnswer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub id: String,
    pub module_id: String,
    pub question: String,
    #[serde(flatten)]
    pub kind: QuestionKind,
    pub correct_answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    pub points: u32,
    pub order_index: i32,
    pub created_at: DateTime<Utc>,
}

impl QuizQuestion {
    /// Case-insensitive, surrounding whitespace ignored.
    pub fn is_correct(&self, answer: &str) -> bool {
        answer.trim().to_lowercase() == self.correct_answer.trim().to_lowercase()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizAttempt {
    pub id: String,
    pub user_id: String,
    pub module_id: String,
    pub score: u32,
    pub total_points: u32,
    /// question id -> submitted answer
    pub answers: BTreeMap<String, String>,
    pub passed: bool,
    pub attempt_number: u32,
    pub created_at: DateTime<Utc>,
}

impl QuizAttempt {
    /// Whole percent, rounded down. Zero when the quiz is worth no points.
    pub fn percentage(&self) -> u32 {
        if self.total_points == 0 {
            return 0;
        }
        let pct = u64::from(self.score) * 100 / u64::from(self.total_points);
        u32::try_from(pct).unwrap_or(u32::MAX)
    }
}

/// A graded attempt before the store numbers it.
#[derive(Debug, Clone)]
pub struct NewQuizAttempt {
    pub user_id: String,
    pub module_id: String,
    pub score: u32,
    pub total_points: u32,
    pub answers: BTreeMap<String, String>,
    pub passed: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitAttemptRequest {
    pub user_id: String,
    pub answers: BTreeMap<String, String>,
}

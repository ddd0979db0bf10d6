pub mod memory;

pub use memory::InMemoryStore;

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::{
    Course, CourseCertificate, CourseModule, NewQuizAttempt, QuizAttempt, QuizQuestion,
    UserCourseProgress, UserModuleProgress,
};

/// Static course content a store is seeded with.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub modules: Vec<CourseModule>,
    #[serde(default)]
    pub quiz_questions: Vec<QuizQuestion>,
}

impl Catalog {
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read catalog {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            AppError::Config(format!("Failed to parse catalog {}: {}", path.display(), e))
        })
    }
}

#[async_trait]
pub trait CourseStore: Send + Sync {
    /// Ordered by `order_index`.
    async fn list_courses(&self) -> Result<Vec<Course>, AppError>;
    async fn get_course(&self, id: &str) -> Result<Option<Course>, AppError>;

    /// Ordered by `order_index`.
    async fn list_modules(&self, course_id: &str) -> Result<Vec<CourseModule>, AppError>;
    async fn get_module(&self, id: &str) -> Result<Option<CourseModule>, AppError>;

    /// Ordered by `order_index`.
    async fn list_quiz_questions(&self, module_id: &str) -> Result<Vec<QuizQuestion>, AppError>;

    async fn list_course_progress(&self, user_id: &str) -> Result<Vec<UserCourseProgress>, AppError>;
    /// Recomputes the user's course progress from their module progress and
    /// saves it, all under one lock. Creates the record if needed.
    async fn roll_up_course_progress(
        &self,
        user_id: &str,
        course_id: &str,
    ) -> Result<UserCourseProgress, AppError>;

    async fn list_module_progress(
        &self,
        user_id: &str,
        course_id: &str,
    ) -> Result<Vec<UserModuleProgress>, AppError>;
    /// Marks the module complete for the user and adds `time_spent_minutes`.
    /// A module never goes back to incomplete.
    async fn record_module_completion(
        &self,
        user_id: &str,
        module_id: &str,
        time_spent_minutes: u32,
    ) -> Result<UserModuleProgress, AppError>;

    /// Ordered by attempt number.
    async fn list_attempts(&self, user_id: &str, module_id: &str) -> Result<Vec<QuizAttempt>, AppError>;
    /// Numbers the attempt one past the highest existing number for the
    /// same user and module.
    async fn record_attempt(&self, attempt: NewQuizAttempt) -> Result<QuizAttempt, AppError>;

    async fn list_certificates(&self, user_id: &str) -> Result<Vec<CourseCertificate>, AppError>;
    /// Returns the user's certificate for the course, storing `candidate` if
    /// there is none yet. Fails with `Conflict` if the number is taken.
    async fn get_or_issue_certificate(
        &self,
        candidate: CourseCertificate,
    ) -> Result<CourseCertificate, AppError>;
}

use serde::{Deserialize, Serialize};

use super::{Course, CourseModule, QuizQuestion, UserCourseProgress, UserModuleProgress};

/// Read-only view of a course joined with one user's progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseWithProgress {
    #[serde(flatten)]
    pub course: Course,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<UserCourseProgress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modules_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_modules: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleWithProgress {
    #[serde(flatten)]
    pub module: CourseModule,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<UserModuleProgress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz_questions: Option<Vec<QuizQuestion>>,
}

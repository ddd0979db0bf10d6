//! Lifecycle and consistency checks for course-domain records.

use std::collections::HashMap;

use thiserror::Error;

use crate::models::{
    Course, CourseStatus, CourseWithProgress, QuizAttempt, UserCourseProgress, UserModuleProgress,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("course progress {id}: status {status:?} disagrees with completed_at (present: {has_completed_at})")]
    CompletionTimestampMismatch {
        id: String,
        status: CourseStatus,
        has_completed_at: bool,
    },

    #[error("course progress {id}: progress_percentage {percentage} is out of range")]
    PercentageOutOfRange { id: String, percentage: u8 },

    #[error("course progress {id}: progress_percentage {percentage} does not agree with status {status:?}")]
    PercentageStatusMismatch {
        id: String,
        status: CourseStatus,
        percentage: u8,
    },

    #[error("status cannot move from {from:?} to {to:?}")]
    StatusRegression { from: CourseStatus, to: CourseStatus },

    #[error("module progress {id}: is_completed is {is_completed} but completed_at disagrees")]
    ModuleCompletionMismatch { id: String, is_completed: bool },

    #[error("attempt {attempt_number} for user {user_id} on module {module_id} follows attempt {previous}")]
    AttemptOutOfOrder {
        user_id: String,
        module_id: String,
        previous: u32,
        attempt_number: u32,
    },

    #[error("attempt {id}: attempt_number must start at 1")]
    AttemptNumberZero { id: String },

    #[error("attempt {id}: score {score} exceeds total points {total_points}")]
    ScoreExceedsTotal {
        id: String,
        score: u32,
        total_points: u32,
    },

    #[error("course {course_id}: {completed_modules} completed modules exceed {modules_count} modules")]
    CompletedModulesExceedCount {
        course_id: String,
        modules_count: u32,
        completed_modules: u32,
    },

    #[error("course {id} lists itself as its prerequisite")]
    SelfPrerequisite { id: String },
}

pub fn validate_course(course: &Course) -> Result<(), ValidationError> {
    if course.prerequisite_course_id.as_deref() == Some(course.id.as_str()) {
        return Err(ValidationError::SelfPrerequisite {
            id: course.id.clone(),
        });
    }
    Ok(())
}

pub fn validate_course_progress(progress: &UserCourseProgress) -> Result<(), ValidationError> {
    let completed = progress.status == CourseStatus::Completed;

    if completed != progress.completed_at.is_some() {
        return Err(ValidationError::CompletionTimestampMismatch {
            id: progress.id.clone(),
            status: progress.status,
            has_completed_at: progress.completed_at.is_some(),
        });
    }

    if progress.progress_percentage > 100 {
        return Err(ValidationError::PercentageOutOfRange {
            id: progress.id.clone(),
            percentage: progress.progress_percentage,
        });
    }

    if completed != (progress.progress_percentage == 100) {
        return Err(ValidationError::PercentageStatusMismatch {
            id: progress.id.clone(),
            status: progress.status,
            percentage: progress.progress_percentage,
        });
    }

    Ok(())
}

pub fn validate_status_transition(from: CourseStatus, to: CourseStatus) -> Result<(), ValidationError> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(ValidationError::StatusRegression { from, to })
    }
}

pub fn validate_module_progress(progress: &UserModuleProgress) -> Result<(), ValidationError> {
    if progress.is_completed != progress.completed_at.is_some() {
        return Err(ValidationError::ModuleCompletionMismatch {
            id: progress.id.clone(),
            is_completed: progress.is_completed,
        });
    }
    Ok(())
}

pub fn validate_quiz_attempt(attempt: &QuizAttempt) -> Result<(), ValidationError> {
    if attempt.attempt_number == 0 {
        return Err(ValidationError::AttemptNumberZero {
            id: attempt.id.clone(),
        });
    }
    if attempt.score > attempt.total_points {
        return Err(ValidationError::ScoreExceedsTotal {
            id: attempt.id.clone(),
            score: attempt.score,
            total_points: attempt.total_points,
        });
    }
    Ok(())
}

/// `attempts` must be in creation order. Numbers have to strictly increase
/// within each (user, module) pair; gaps are allowed.
pub fn validate_attempt_sequence(attempts: &[QuizAttempt]) -> Result<(), ValidationError> {
    let mut last_seen: HashMap<(&str, &str), u32> = HashMap::new();

    for attempt in attempts {
        validate_quiz_attempt(attempt)?;

        let key = (attempt.user_id.as_str(), attempt.module_id.as_str());
        if let Some(&previous) = last_seen.get(&key) {
            if attempt.attempt_number <= previous {
                return Err(ValidationError::AttemptOutOfOrder {
                    user_id: attempt.user_id.clone(),
                    module_id: attempt.module_id.clone(),
                    previous,
                    attempt_number: attempt.attempt_number,
                });
            }
        }
        last_seen.insert(key, attempt.attempt_number);
    }

    Ok(())
}

pub fn validate_course_with_progress(view: &CourseWithProgress) -> Result<(), ValidationError> {
    if let (Some(modules_count), Some(completed_modules)) = (view.modules_count, view.completed_modules) {
        if completed_modules > modules_count {
            return Err(ValidationError::CompletedModulesExceedCount {
                course_id: view.course.id.clone(),
                modules_count,
                completed_modules,
            });
        }
    }

    if let Some(progress) = &view.progress {
        validate_course_progress(progress)?;
    }

    Ok(())
}

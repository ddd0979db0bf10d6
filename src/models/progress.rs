use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::{self, ValidationError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl CourseStatus {
    fn rank(self) -> u8 {
        match self {
            CourseStatus::NotStarted => 0,
            CourseStatus::InProgress => 1,
            CourseStatus::Completed => 2,
        }
    }

    /// Status only moves forward; staying put is allowed.
    pub fn can_transition_to(self, next: CourseStatus) -> bool {
        next.rank() >= self.rank()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserCourseProgress {
    pub id: String,
    pub user_id: String,
    pub course_id: String,
    pub status: CourseStatus,
    pub progress_percentage: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserCourseProgress {
    pub fn new(user_id: &str, course_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            course_id: course_id.to_string(),
            status: CourseStatus::NotStarted,
            progress_percentage: 0,
            started_at: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == CourseStatus::Completed
    }

    /// Folds `done` of `total` finished modules into this record. Touching a
    /// course starts it; finishing every module completes it. A completed
    /// record is left alone. Returns whether anything changed.
    pub fn roll_up(&mut self, done: usize, total: usize, now: DateTime<Utc>) -> Result<bool, ValidationError> {
        if self.is_completed() {
            return Ok(false);
        }

        let percentage = completion_percentage(done, total);
        let next_status = if percentage == 100 {
            CourseStatus::Completed
        } else {
            CourseStatus::InProgress
        };
        validation::validate_status_transition(self.status, next_status)?;

        let changed = self.status != next_status
            || self.progress_percentage != percentage
            || self.started_at.is_none();
        if !changed {
            return Ok(false);
        }

        self.started_at.get_or_insert(now);
        self.status = next_status;
        self.progress_percentage = percentage;
        if next_status == CourseStatus::Completed {
            self.completed_at = Some(now);
        }
        self.updated_at = now;

        validation::validate_course_progress(self)?;
        Ok(true)
    }
}

/// Whole percent, rounded down so 100 is only reached when everything is done.
/// A course without modules counts as complete.
pub fn completion_percentage(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    ((done.min(total) * 100) / total) as u8
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserModuleProgress {
    pub id: String,
    pub user_id: String,
    pub module_id: String,
    pub course_id: String,
    pub is_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub time_spent_minutes: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserModuleProgress {
    pub fn new(user_id: &str, module_id: &str, course_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            module_id: module_id.to_string(),
            course_id: course_id.to_string(),
            is_completed: false,
            completed_at: None,
            time_spent_minutes: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StartCourseRequest {
    pub user_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompleteModuleRequest {
    pub user_id: String,
    #[serde(default)]
    pub time_spent_minutes: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_never_regresses() {
        use CourseStatus::*;

        assert!(NotStarted.can_transition_to(InProgress));
        assert!(InProgress.can_transition_to(Completed));
        assert!(NotStarted.can_transition_to(Completed));
        assert!(Completed.can_transition_to(Completed));
        assert!(!Completed.can_transition_to(InProgress));
        assert!(!InProgress.can_transition_to(NotStarted));
    }

    #[test]
    fn percentage_rounds_down() {
        assert_eq!(completion_percentage(0, 3), 0);
        assert_eq!(completion_percentage(2, 3), 66);
        assert_eq!(completion_percentage(3, 3), 100);
        assert_eq!(completion_percentage(0, 0), 100);
    }

    #[test]
    fn roll_up_starts_then_completes() {
        let now = Utc::now();
        let mut progress = UserCourseProgress::new("u1", "c1", now);

        assert!(progress.roll_up(0, 2, now).unwrap());
        assert_eq!(progress.status, CourseStatus::InProgress);
        assert_eq!(progress.started_at, Some(now));
        assert!(!progress.roll_up(0, 2, now).unwrap());

        assert!(progress.roll_up(2, 2, now).unwrap());
        assert_eq!(progress.status, CourseStatus::Completed);
        assert_eq!(progress.progress_percentage, 100);
        assert_eq!(progress.completed_at, Some(now));

        // A stale count never pulls a completed course back.
        assert!(!progress.roll_up(1, 2, now).unwrap());
        assert_eq!(progress.status, CourseStatus::Completed);
    }

    #[test]
    fn roll_up_completes_course_without_modules() {
        let now = Utc::now();
        let mut progress = UserCourseProgress::new("u1", "c1", now);

        assert!(progress.roll_up(0, 0, now).unwrap());
        assert!(progress.is_completed());
    }

    #[test]
    fn status_uses_snake_case_literals() {
        assert_eq!(
            serde_json::to_string(&CourseStatus::NotStarted).unwrap(),
            "\"not_started\""
        );
        let parsed: CourseStatus = serde_json::from_str("\"in_progress\"").unwrap();
        assert_eq!(parsed, CourseStatus::InProgress);
        assert!(serde_json::from_str::<CourseStatus>("\"paused\"").is_err());
    }
}

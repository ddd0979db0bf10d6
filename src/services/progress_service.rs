use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::AppError;
use crate::models::{
    Course, CourseCertificate, CourseModule, CourseWithProgress, ModuleWithProgress,
    NewQuizAttempt, QuizAttempt, UserCourseProgress, UserModuleProgress,
};
use crate::store::CourseStore;
use crate::validation;

/// Result of marking a module complete.
#[derive(Debug, Serialize)]
pub struct ModuleCompletion {
    pub module_progress: UserModuleProgress,
    pub course_progress: UserCourseProgress,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate: Option<CourseCertificate>,
}

pub struct ProgressService {
    store: Arc<dyn CourseStore>,
    passing_score_percent: u32,
}

impl ProgressService {
    pub fn new(store: Arc<dyn CourseStore>, passing_score_percent: u32) -> Self {
        Self {
            store,
            passing_score_percent,
        }
    }

    pub async fn courses_with_progress(&self, user_id: &str) -> Result<Vec<CourseWithProgress>, AppError> {
        let courses = self.store.list_courses().await?;
        let progress_by_course: HashMap<String, UserCourseProgress> = self
            .store
            .list_course_progress(user_id)
            .await?
            .into_iter()
            .map(|p| (p.course_id.clone(), p))
            .collect();

        let mut views = Vec::with_capacity(courses.len());
        for course in courses {
            let modules_count = self.store.list_modules(&course.id).await?.len() as u32;
            let completed_modules = self
                .store
                .list_module_progress(user_id, &course.id)
                .await?
                .iter()
                .filter(|p| p.is_completed)
                .count() as u32;

            let view = CourseWithProgress {
                progress: progress_by_course.get(&course.id).cloned(),
                course,
                modules_count: Some(modules_count),
                completed_modules: Some(completed_modules),
            };
            validation::validate_course_with_progress(&view)?;
            views.push(view);
        }
        Ok(views)
    }

    pub async fn modules_with_progress(
        &self,
        user_id: &str,
        course_id: &str,
    ) -> Result<Vec<ModuleWithProgress>, AppError> {
        self.require_course(course_id).await?;

        let progress_by_module: HashMap<String, UserModuleProgress> = self
            .store
            .list_module_progress(user_id, course_id)
            .await?
            .into_iter()
            .map(|p| (p.module_id.clone(), p))
            .collect();

        let mut views = Vec::new();
        for module in self.store.list_modules(course_id).await? {
            let quiz_questions = if module.content.is_quiz() {
                Some(self.store.list_quiz_questions(&module.id).await?)
            } else {
                None
            };
            views.push(ModuleWithProgress {
                progress: progress_by_module.get(&module.id).cloned(),
                module,
                quiz_questions,
            });
        }
        Ok(views)
    }

    /// Moves the user's course to in_progress. Already started or completed
    /// courses are returned unchanged; a course without modules completes
    /// right away.
    pub async fn start_course(&self, user_id: &str, course_id: &str) -> Result<UserCourseProgress, AppError> {
        let course = self.require_course(course_id).await?;
        self.ensure_accessible(user_id, &course).await?;

        let progress = self.store.roll_up_course_progress(user_id, course_id).await?;
        if progress.is_completed() {
            self.issue_certificate(user_id, &course).await?;
        }

        info!("user {} started course {}", user_id, course_id);
        Ok(progress)
    }

    /// Grades `answers` (question id -> answer) against the module's quiz.
    /// Unanswered questions score zero; answers to unknown questions are
    /// rejected.
    pub async fn submit_quiz_attempt(
        &self,
        user_id: &str,
        module_id: &str,
        answers: BTreeMap<String, String>,
    ) -> Result<QuizAttempt, AppError> {
        let module = self.require_module(module_id).await?;
        if !module.content.is_quiz() {
            return Err(AppError::BadRequest(format!("module {} is not a quiz", module_id)));
        }

        let course = self.require_course(&module.course_id).await?;
        self.ensure_accessible(user_id, &course).await?;

        let questions = self.store.list_quiz_questions(module_id).await?;
        if questions.is_empty() {
            return Err(AppError::Conflict(format!("quiz {} has no questions", module_id)));
        }

        let known: HashSet<&str> = questions.iter().map(|q| q.id.as_str()).collect();
        if let Some(unknown) = answers.keys().find(|id| !known.contains(id.as_str())) {
            return Err(AppError::BadRequest(format!(
                "question {} does not belong to module {}",
                unknown, module_id
            )));
        }

        let total_points: u64 = questions.iter().map(|q| u64::from(q.points)).sum();
        let score: u64 = questions
            .iter()
            .filter(|q| answers.get(&q.id).is_some_and(|a| q.is_correct(a)))
            .map(|q| u64::from(q.points))
            .sum();
        let passed = passes(score, total_points, self.passing_score_percent);
        let total_points = u32::try_from(total_points).map_err(|_| {
            AppError::Conflict(format!("quiz {} is worth too many points", module_id))
        })?;
        let score = u32::try_from(score).map_err(|_| AppError::InternalServerError)?;

        let attempt = self
            .store
            .record_attempt(NewQuizAttempt {
                user_id: user_id.to_string(),
                module_id: module_id.to_string(),
                score,
                total_points,
                answers,
                passed,
            })
            .await?;

        info!(
            "user {} attempt #{} on quiz {}: {}/{} passed={}",
            user_id, attempt.attempt_number, module_id, score, total_points, passed
        );
        Ok(attempt)
    }

    /// Marks a module complete and rolls the result up into course progress.
    /// Quiz modules need a passed attempt first. Finishing the last module
    /// completes the course and issues its certificate.
    pub async fn complete_module(
        &self,
        user_id: &str,
        module_id: &str,
        time_spent_minutes: u32,
    ) -> Result<ModuleCompletion, AppError> {
        let module = self.require_module(module_id).await?;
        let course = self.require_course(&module.course_id).await?;
        self.ensure_accessible(user_id, &course).await?;

        if module.content.is_quiz() {
            let attempts = self.store.list_attempts(user_id, module_id).await?;
            validation::validate_attempt_sequence(&attempts)?;
            if !attempts.iter().any(|a| a.passed) {
                return Err(AppError::Conflict(format!(
                    "quiz {} has no passing attempt",
                    module_id
                )));
            }
        }

        let module_progress = self
            .store
            .record_module_completion(user_id, module_id, time_spent_minutes)
            .await?;
        let course_progress = self.store.roll_up_course_progress(user_id, &course.id).await?;

        let certificate = if course_progress.is_completed() {
            Some(self.issue_certificate(user_id, &course).await?)
        } else {
            None
        };

        Ok(ModuleCompletion {
            module_progress,
            course_progress,
            certificate,
        })
    }

    pub async fn certificates(&self, user_id: &str) -> Result<Vec<CourseCertificate>, AppError> {
        self.store.list_certificates(user_id).await
    }

    async fn issue_certificate(&self, user_id: &str, course: &Course) -> Result<CourseCertificate, AppError> {
        let final_score = self.final_score(user_id, &course.id).await?;
        let candidate = CourseCertificate::issue(user_id, &course.id, final_score, Utc::now());
        self.store.get_or_issue_certificate(candidate).await
    }

    /// Mean of the best attempt percentage over the course's quizzes.
    async fn final_score(&self, user_id: &str, course_id: &str) -> Result<Option<u32>, AppError> {
        let mut best_scores = Vec::new();
        for module in self.store.list_modules(course_id).await? {
            if !module.content.is_quiz() {
                continue;
            }
            let best = self
                .store
                .list_attempts(user_id, &module.id)
                .await?
                .iter()
                .map(QuizAttempt::percentage)
                .max();
            if let Some(best) = best {
                best_scores.push(best);
            }
        }

        if best_scores.is_empty() {
            return Ok(None);
        }
        let sum: u64 = best_scores.iter().map(|s| u64::from(*s)).sum();
        let mean = sum / best_scores.len() as u64;
        Ok(Some(u32::try_from(mean).unwrap_or(u32::MAX)))
    }

    async fn ensure_accessible(&self, user_id: &str, course: &Course) -> Result<(), AppError> {
        let completed: HashSet<String> = self
            .store
            .list_course_progress(user_id)
            .await?
            .into_iter()
            .filter(|p| p.is_completed())
            .map(|p| p.course_id)
            .collect();

        if course.is_accessible(&completed) {
            Ok(())
        } else {
            warn!("user {} denied access to locked course {}", user_id, course.id);
            Err(AppError::Forbidden(format!("course {} is locked", course.id)))
        }
    }

    async fn require_course(&self, course_id: &str) -> Result<Course, AppError> {
        self.store
            .get_course(course_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("course {}", course_id)))
    }

    async fn require_module(&self, module_id: &str) -> Result<CourseModule, AppError> {
        self.store
            .get_module(module_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("module {}", module_id)))
    }
}

fn passes(score: u64, total_points: u64, passing_score_percent: u32) -> bool {
    if total_points == 0 {
        return false;
    }
    u128::from(score) * 100 >= u128::from(passing_score_percent) * u128::from(total_points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pass_threshold_is_inclusive() {
        assert!(passes(7, 10, 70));
        assert!(!passes(6, 10, 70));
        assert!(!passes(0, 0, 0));
        assert!(passes(0, 5, 0));
        assert!(passes(u64::from(u32::MAX), 2 * u64::from(u32::MAX), 50));
    }
}

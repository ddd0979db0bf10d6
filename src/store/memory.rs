use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use super::{Catalog, CourseStore};
use crate::error::AppError;
use crate::models::{
    Course, CourseCertificate, CourseModule, NewQuizAttempt, QuizAttempt, QuizQuestion,
    UserCourseProgress, UserModuleProgress,
};
use crate::validation;

type UserKey = (String, String);

#[derive(Default)]
struct State {
    courses: HashMap<String, Course>,
    modules: HashMap<String, CourseModule>,
    questions: HashMap<String, QuizQuestion>,
    course_progress: HashMap<UserKey, UserCourseProgress>,
    module_progress: HashMap<UserKey, UserModuleProgress>,
    attempts: HashMap<UserKey, Vec<QuizAttempt>>,
    certificates: Vec<CourseCertificate>,
}

/// Process-local store. Everything but the catalog is lost on restart.
#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects catalogs that would leave a course impossible to finish:
    /// duplicate ids, dangling references and quizzes without questions.
    pub fn with_catalog(catalog: Catalog) -> Result<Self, AppError> {
        let mut state = State::default();

        for course in catalog.courses {
            validation::validate_course(&course)?;
            if state.courses.contains_key(&course.id) {
                return Err(AppError::BadRequest(format!("duplicate course id {}", course.id)));
            }
            state.courses.insert(course.id.clone(), course);
        }
        for course in state.courses.values() {
            if let Some(prerequisite) = &course.prerequisite_course_id {
                if !state.courses.contains_key(prerequisite) {
                    return Err(AppError::BadRequest(format!(
                        "course {} requires unknown course {}",
                        course.id, prerequisite
                    )));
                }
            }
        }

        for module in catalog.modules {
            if !state.courses.contains_key(&module.course_id) {
                return Err(AppError::BadRequest(format!(
                    "module {} references unknown course {}",
                    module.id, module.course_id
                )));
            }
            if state.modules.contains_key(&module.id) {
                return Err(AppError::BadRequest(format!("duplicate module id {}", module.id)));
            }
            state.modules.insert(module.id.clone(), module);
        }

        for question in catalog.quiz_questions {
            if !state.modules.contains_key(&question.module_id) {
                return Err(AppError::BadRequest(format!(
                    "quiz question {} references unknown module {}",
                    question.id, question.module_id
                )));
            }
            if state.questions.contains_key(&question.id) {
                return Err(AppError::BadRequest(format!(
                    "duplicate quiz question id {}",
                    question.id
                )));
            }
            state.questions.insert(question.id.clone(), question);
        }

        let quizzes_with_questions: HashSet<&str> =
            state.questions.values().map(|q| q.module_id.as_str()).collect();
        if let Some(empty) = state
            .modules
            .values()
            .find(|m| m.content.is_quiz() && !quizzes_with_questions.contains(m.id.as_str()))
        {
            return Err(AppError::BadRequest(format!("quiz module {} has no questions", empty.id)));
        }

        info!(
            "catalog loaded: {} courses, {} modules, {} quiz questions",
            state.courses.len(),
            state.modules.len(),
            state.questions.len()
        );

        Ok(Self {
            state: RwLock::new(state),
        })
    }
}

fn key(user_id: &str, other_id: &str) -> UserKey {
    (user_id.to_string(), other_id.to_string())
}

#[async_trait]
impl CourseStore for InMemoryStore {
    async fn list_courses(&self) -> Result<Vec<Course>, AppError> {
        let state = self.state.read().await;
        let mut courses: Vec<Course> = state.courses.values().cloned().collect();
        courses.sort_by(|a, b| a.order_index.cmp(&b.order_index).then_with(|| a.id.cmp(&b.id)));
        Ok(courses)
    }

    async fn get_course(&self, id: &str) -> Result<Option<Course>, AppError> {
        Ok(self.state.read().await.courses.get(id).cloned())
    }

    async fn list_modules(&self, course_id: &str) -> Result<Vec<CourseModule>, AppError> {
        let state = self.state.read().await;
        let mut modules: Vec<CourseModule> = state
            .modules
            .values()
            .filter(|m| m.course_id == course_id)
            .cloned()
            .collect();
        modules.sort_by(|a, b| a.order_index.cmp(&b.order_index).then_with(|| a.id.cmp(&b.id)));
        Ok(modules)
    }

    async fn get_module(&self, id: &str) -> Result<Option<CourseModule>, AppError> {
        Ok(self.state.read().await.modules.get(id).cloned())
    }

    async fn list_quiz_questions(&self, module_id: &str) -> Result<Vec<QuizQuestion>, AppError> {
        let state = self.state.read().await;
        let mut questions: Vec<QuizQuestion> = state
            .questions
            .values()
            .filter(|q| q.module_id == module_id)
            .cloned()
            .collect();
        questions.sort_by(|a, b| a.order_index.cmp(&b.order_index).then_with(|| a.id.cmp(&b.id)));
        Ok(questions)
    }

    async fn list_course_progress(&self, user_id: &str) -> Result<Vec<UserCourseProgress>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .course_progress
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn roll_up_course_progress(
        &self,
        user_id: &str,
        course_id: &str,
    ) -> Result<UserCourseProgress, AppError> {
        let mut state = self.state.write().await;
        if !state.courses.contains_key(course_id) {
            return Err(AppError::NotFound(format!("course {}", course_id)));
        }

        let module_ids: Vec<&str> = state
            .modules
            .values()
            .filter(|m| m.course_id == course_id)
            .map(|m| m.id.as_str())
            .collect();
        let done = module_ids
            .iter()
            .filter(|id| {
                state
                    .module_progress
                    .get(&key(user_id, id))
                    .is_some_and(|p| p.is_completed)
            })
            .count();
        let total = module_ids.len();

        let now = Utc::now();
        let mut progress = state
            .course_progress
            .get(&key(user_id, course_id))
            .cloned()
            .unwrap_or_else(|| UserCourseProgress::new(user_id, course_id, now));

        if progress.roll_up(done, total, now)? {
            debug!(
                "course progress user={} course={} status={:?} pct={}",
                user_id, course_id, progress.status, progress.progress_percentage
            );
            state
                .course_progress
                .insert(key(user_id, course_id), progress.clone());
        }
        Ok(progress)
    }

    async fn list_module_progress(
        &self,
        user_id: &str,
        course_id: &str,
    ) -> Result<Vec<UserModuleProgress>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .module_progress
            .values()
            .filter(|p| p.user_id == user_id && p.course_id == course_id)
            .cloned()
            .collect())
    }

    async fn record_module_completion(
        &self,
        user_id: &str,
        module_id: &str,
        time_spent_minutes: u32,
    ) -> Result<UserModuleProgress, AppError> {
        let mut state = self.state.write().await;
        let course_id = state
            .modules
            .get(module_id)
            .map(|m| m.course_id.clone())
            .ok_or_else(|| AppError::NotFound(format!("module {}", module_id)))?;

        let now = Utc::now();
        let mut progress = state
            .module_progress
            .get(&key(user_id, module_id))
            .cloned()
            .unwrap_or_else(|| UserModuleProgress::new(user_id, module_id, &course_id, now));

        progress.time_spent_minutes = progress.time_spent_minutes.saturating_add(time_spent_minutes);
        if !progress.is_completed {
            progress.is_completed = true;
            progress.completed_at = Some(now);
        }
        progress.updated_at = now;
        validation::validate_module_progress(&progress)?;

        state
            .module_progress
            .insert(key(user_id, module_id), progress.clone());
        Ok(progress)
    }

    async fn list_attempts(&self, user_id: &str, module_id: &str) -> Result<Vec<QuizAttempt>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .attempts
            .get(&key(user_id, module_id))
            .cloned()
            .unwrap_or_default())
    }

    async fn record_attempt(&self, attempt: NewQuizAttempt) -> Result<QuizAttempt, AppError> {
        let mut state = self.state.write().await;
        let history = state
            .attempts
            .entry(key(&attempt.user_id, &attempt.module_id))
            .or_default();
        let attempt_number = history.last().map_or(1, |a| a.attempt_number + 1);

        let recorded = QuizAttempt {
            id: Uuid::new_v4().to_string(),
            user_id: attempt.user_id,
            module_id: attempt.module_id,
            score: attempt.score,
            total_points: attempt.total_points,
            answers: attempt.answers,
            passed: attempt.passed,
            attempt_number,
            created_at: Utc::now(),
        };
        validation::validate_quiz_attempt(&recorded)?;
        history.push(recorded.clone());
        Ok(recorded)
    }

    async fn list_certificates(&self, user_id: &str) -> Result<Vec<CourseCertificate>, AppError> {
        let state = self.state.read().await;
        let mut certificates: Vec<CourseCertificate> = state
            .certificates
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        certificates.sort_by(|a, b| a.issued_at.cmp(&b.issued_at));
        Ok(certificates)
    }

    async fn get_or_issue_certificate(
        &self,
        candidate: CourseCertificate,
    ) -> Result<CourseCertificate, AppError> {
        let mut state = self.state.write().await;
        if let Some(existing) = state
            .certificates
            .iter()
            .find(|c| c.user_id == candidate.user_id && c.course_id == candidate.course_id)
        {
            return Ok(existing.clone());
        }
        if state
            .certificates
            .iter()
            .any(|c| c.certificate_number == candidate.certificate_number)
        {
            return Err(AppError::Conflict(format!(
                "certificate number {} is taken",
                candidate.certificate_number
            )));
        }
        info!(
            "issued certificate {} to user {} for course {}",
            candidate.certificate_number, candidate.user_id, candidate.course_id
        );
        state.certificates.push(candidate.clone());
        Ok(candidate)
    }
}

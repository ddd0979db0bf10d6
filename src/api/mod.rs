use axum::Json;
use axum::extract::{Path, Query};
use axum::routing::post;
use axum::{Router, extract::State, http::StatusCode, routing::get};
use serde::Deserialize;

use crate::error::AppError;
use crate::models::*;
use crate::network::{NetworkDescriptor, WalletConnectorConfig};
use crate::services::{ModuleCompletion, ProgressService};
use crate::state::AppState;

#[derive(Deserialize)]
struct UserQueryParams {
    user_id: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/network", get(network))
        .route("/wallet-config", get(wallet_config))
        .route("/courses", get(list_courses))
        .route("/courses/{id}/modules", get(list_modules))
        .route("/courses/{id}/start", post(start_course))
        .route("/modules/{id}/attempts", post(submit_attempt))
        .route("/modules/{id}/complete", post(complete_module))
        .route("/users/{user_id}/certificates", get(list_certificates))
        .with_state(state)
}

fn progress_service(state: &AppState) -> ProgressService {
    ProgressService::new(state.store.clone(), state.passing_score_percent)
}

fn require_user(user_id: &str) -> Result<(), AppError> {
    if user_id.trim().is_empty() {
        return Err(AppError::BadRequest("user_id must not be empty".to_string()));
    }
    Ok(())
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.store.list_courses().await?;
    Ok(StatusCode::OK)
}

async fn network(State(state): State<AppState>) -> Json<NetworkDescriptor> {
    Json(state.network.as_ref().clone())
}

async fn wallet_config(State(state): State<AppState>) -> Json<WalletConnectorConfig> {
    Json(state.wallet.as_ref().clone())
}

async fn list_courses(
    State(state): State<AppState>,
    Query(params): Query<UserQueryParams>,
) -> Result<Json<Vec<CourseWithProgress>>, AppError> {
    require_user(&params.user_id)?;
    let courses = progress_service(&state)
        .courses_with_progress(&params.user_id)
        .await?;
    Ok(Json(courses))
}

async fn list_modules(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<UserQueryParams>,
) -> Result<Json<Vec<ModuleWithProgress>>, AppError> {
    require_user(&params.user_id)?;
    let modules = progress_service(&state)
        .modules_with_progress(&params.user_id, &id)
        .await?;
    Ok(Json(modules))
}

async fn start_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<StartCourseRequest>,
) -> Result<Json<UserCourseProgress>, AppError> {
    require_user(&req.user_id)?;
    let progress = progress_service(&state).start_course(&req.user_id, &id).await?;
    Ok(Json(progress))
}

async fn submit_attempt(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SubmitAttemptRequest>,
) -> Result<(StatusCode, Json<QuizAttempt>), AppError> {
    require_user(&req.user_id)?;
    let attempt = progress_service(&state)
        .submit_quiz_attempt(&req.user_id, &id, req.answers)
        .await?;
    Ok((StatusCode::CREATED, Json(attempt)))
}

async fn complete_module(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<CompleteModuleRequest>,
) -> Result<Json<ModuleCompletion>, AppError> {
    require_user(&req.user_id)?;
    let completion = progress_service(&state)
        .complete_module(&req.user_id, &id, req.time_spent_minutes)
        .await?;
    Ok(Json(completion))
}

async fn list_certificates(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<CourseCertificate>>, AppError> {
    let certificates = progress_service(&state).certificates(&user_id).await?;
    Ok(Json(certificates))
}

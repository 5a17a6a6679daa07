//! HTTP route layer over the schedule cache.
//!
//! ```text
//! GET /api/groups                 list of groups
//! GET /api/teachers               list of teachers
//! GET /api/group/{id}/schedule    live group schedule
//! GET /api/teacher/{id}/schedule  live teacher schedule
//! GET /health                     readiness and snapshot age
//! ```

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower_http::cors::CorsLayer;

use crate::cache::ScheduleCache;
use crate::error::{AppError, Result};
use crate::models::{
    CacheHealth, IdentityRecord, ScheduleResponse, ScheduleStatus, ServerConfig, SubjectKind,
};

/// Shared state threaded through all handlers.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<ScheduleCache>,
}

/// Build the router with CORS for the configured origin.
pub fn router(cache: Arc<ScheduleCache>, config: &ServerConfig) -> Result<Router> {
    let origin: HeaderValue = config.cors_origin.parse().map_err(|e| {
        AppError::config(format!("invalid CORS origin {:?}: {}", config.cors_origin, e))
    })?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET]);

    Ok(Router::new()
        .route("/api/groups", get(list_groups))
        .route("/api/teachers", get(list_teachers))
        .route("/api/group/{id}/schedule", get(group_schedule))
        .route("/api/teacher/{id}/schedule", get(teacher_schedule))
        .route("/health", get(health))
        .layer(cors)
        .with_state(AppState { cache }))
}

// --- Responses ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    success: bool,
    count: usize,
    data: Vec<IdentityRecord>,
    last_updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    #[serde(flatten)]
    cache: CacheHealth,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

/// Maps cache errors onto HTTP statuses.
struct ApiError(AppError);

impl From<AppError> for ApiError {
    fn from(error: AppError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            AppError::Uninitialized => StatusCode::SERVICE_UNAVAILABLE,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorBody {
            success: false,
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

// --- Handlers ---

async fn list_groups(State(state): State<AppState>) -> std::result::Result<Response, ApiError> {
    list(&state.cache, SubjectKind::Group)
}

async fn list_teachers(State(state): State<AppState>) -> std::result::Result<Response, ApiError> {
    list(&state.cache, SubjectKind::Teacher)
}

fn list(cache: &ScheduleCache, kind: SubjectKind) -> std::result::Result<Response, ApiError> {
    let snapshot = cache.current()?;
    let data = snapshot.records(kind).to_vec();
    Ok(Json(ListResponse {
        success: true,
        count: data.len(),
        data,
        last_updated: snapshot.last_updated,
    })
    .into_response())
}

async fn group_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> std::result::Result<Response, ApiError> {
    Ok(schedule(state.cache.group_schedule(&id).await?))
}

async fn teacher_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> std::result::Result<Response, ApiError> {
    Ok(schedule(state.cache.teacher_schedule(&id).await?))
}

fn schedule(response: ScheduleResponse) -> Response {
    let status = match response.status {
        ScheduleStatus::NotFound => StatusCode::NOT_FOUND,
        _ => StatusCode::OK,
    };
    (status, Json(response)).into_response()
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        cache: state.cache.health(),
    })
}

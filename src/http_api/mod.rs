use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::NaiveDate;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::calculations::maintenance::MAX_MONTHS_AHEAD;
use crate::{Completion, PersistenceError, Planner, PlannerConfig, PlannerError, Task, TaskStore};

type SharedStore = Arc<dyn TaskStore + Send + Sync>;

#[derive(Clone)]
pub struct AppState {
    planner: Arc<RwLock<Planner>>,
    store: Option<SharedStore>,
}

impl AppState {
    pub fn new(planner: Planner) -> Self {
        Self {
            planner: Arc::new(RwLock::new(planner)),
            store: None,
        }
    }

    pub fn with_shared(planner: Arc<RwLock<Planner>>) -> Self {
        Self {
            planner,
            store: None,
        }
    }

    /// Write the whole task list back to `store` after every change.
    pub fn with_store(self, store: SharedStore) -> Self {
        Self {
            store: Some(store),
            ..self
        }
    }

    fn planner(&self) -> Arc<RwLock<Planner>> {
        self.planner.clone()
    }

    /// Save `planner` to the store. When the save fails the in-memory list is
    /// put back to `snapshot`, so memory never runs ahead of the store.
    fn persist(&self, planner: &mut Planner, snapshot: Vec<Task>) -> Result<(), ApiError> {
        let Some(store) = &self.store else {
            return Ok(());
        };
        if let Err(err) = store.save_tasks(planner.tasks()) {
            if let Err(restore) = planner.replace_tasks(snapshot) {
                tracing::error!(error = %restore, "failed to restore tasks after a failed save");
            }
            return Err(err.into());
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Conflict(String),
    Invalid(String),
    Internal(String),
}

#[derive(Debug, Default, Deserialize)]
struct AsOfQuery {
    as_of: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
struct UpcomingQuery {
    as_of: Option<NaiveDate>,
    horizon_days: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct BoardQuery {
    as_of: Option<NaiveDate>,
    months_ahead: Option<u32>,
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid(message.into())
    }

    fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }
}

impl From<PlannerError> for ApiError {
    fn from(value: PlannerError) -> Self {
        match value {
            PlannerError::NotFound(id) => ApiError::not_found(format!("task {id} not found")),
            other => ApiError::invalid(other.to_string()),
        }
    }
}

impl From<PersistenceError> for ApiError {
    fn from(value: PersistenceError) -> Self {
        tracing::error!(error = %value, "failed to persist tasks");
        ApiError::internal(value.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(value: serde_json::Error) -> Self {
        ApiError::internal(value.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, "conflict", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
            ApiError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
            }
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/config", get(get_config))
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/:id",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/tasks/:id/next", get(next_occurrence))
        .route("/tasks/:id/complete", post(complete_task))
        .route("/upcoming", get(upcoming))
        .route("/maintenance", get(maintenance_board))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "planner HTTP API listening");
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn get_config(State(state): State<AppState>) -> Json<PlannerConfig> {
    let planner = state.planner();
    let config = {
        let guard = planner.read();
        guard.config().clone()
    };
    Json(config)
}

async fn list_tasks(State(state): State<AppState>) -> Json<Vec<Task>> {
    let planner = state.planner();
    let tasks = {
        let guard = planner.read();
        guard.tasks().to_vec()
    };
    Json(tasks)
}

async fn get_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    let planner = state.planner();
    let result = {
        let guard = planner.read();
        guard.find_task(&task_id).cloned()
    };
    match result {
        Some(task) => Ok(Json(task)),
        None => Err(ApiError::not_found(format!("task {task_id} not found"))),
    }
}

async fn create_task(
    State(state): State<AppState>,
    Json(task): Json<Task>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let planner = state.planner();
    {
        let mut guard = planner.write();
        if guard.find_task(&task.id).is_some() {
            return Err(ApiError::Conflict(format!(
                "task {} already exists",
                task.id
            )));
        }
        let snapshot = guard.tasks().to_vec();
        guard.upsert_task(task.clone())?;
        state.persist(&mut guard, snapshot)?;
    }
    Ok((StatusCode::CREATED, Json(task)))
}

async fn update_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    Json(task): Json<Task>,
) -> Result<Json<Task>, ApiError> {
    if task.id != task_id {
        return Err(ApiError::invalid(
            "task id in payload does not match path parameter",
        ));
    }
    let planner = state.planner();
    {
        let mut guard = planner.write();
        if guard.find_task(&task_id).is_none() {
            return Err(ApiError::not_found(format!("task {task_id} not found")));
        }
        let snapshot = guard.tasks().to_vec();
        guard.upsert_task(task.clone())?;
        state.persist(&mut guard, snapshot)?;
    }
    Ok(Json(task))
}

async fn delete_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let planner = state.planner();
    {
        let mut guard = planner.write();
        let snapshot = guard.tasks().to_vec();
        if !guard.delete_task(&task_id) {
            return Err(ApiError::not_found(format!("task {task_id} not found")));
        }
        state.persist(&mut guard, snapshot)?;
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn next_occurrence(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    Query(query): Query<AsOfQuery>,
) -> Result<Json<Value>, ApiError> {
    let as_of = query.as_of.unwrap_or_else(today);
    let planner = state.planner();
    let next = {
        let guard = planner.read();
        guard.next_occurrence_for(&task_id, as_of)?
    };
    Ok(Json(json!({
        "taskId": task_id,
        "asOf": as_of,
        "nextOccurrence": next,
    })))
}

async fn complete_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    Query(query): Query<AsOfQuery>,
) -> Result<Json<Completion>, ApiError> {
    let as_of = query.as_of.unwrap_or_else(today);
    let planner = state.planner();
    let completion = {
        let mut guard = planner.write();
        let snapshot = guard.tasks().to_vec();
        let completion = guard.complete_occurrence(&task_id, as_of)?;
        state.persist(&mut guard, snapshot)?;
        completion
    };
    Ok(Json(completion))
}

async fn upcoming(
    State(state): State<AppState>,
    Query(query): Query<UpcomingQuery>,
) -> Result<Json<Value>, ApiError> {
    let as_of = query.as_of.unwrap_or_else(today);
    let planner = state.planner();
    let body = {
        let guard = planner.read();
        let horizon_days = query.horizon_days.unwrap_or(guard.config().horizon_days);
        serde_json::to_value(guard.upcoming_within(horizon_days, as_of))?
    };
    Ok(Json(body))
}

async fn maintenance_board(
    State(state): State<AppState>,
    Query(query): Query<BoardQuery>,
) -> Result<Json<Value>, ApiError> {
    let as_of = query.as_of.unwrap_or_else(today);
    let planner = state.planner();
    let body = {
        let guard = planner.read();
        let months_ahead = query.months_ahead.unwrap_or(guard.config().months_ahead);
        if months_ahead > MAX_MONTHS_AHEAD {
            return Err(ApiError::invalid(format!(
                "months_ahead must be at most {MAX_MONTHS_AHEAD}"
            )));
        }
        serde_json::to_value(guard.maintenance_board_for(months_ahead, as_of))?
    };
    Ok(Json(body))
}

//! Health assistant routes

use axum::{
    Json, Router,
    extract::{Query, State},
    response::{Html, IntoResponse},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{
    AppState,
    accounts::AccountError,
    error::{ApiError, ApiResult},
    models::{ChatTurn, Credentials, Role, User},
    orchestrator::AskOutcome,
};

const INDEX_HTML: &str = include_str!("../static/index.html");

/// Response for signup and login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl AuthResponse {
    fn accepted(message: &str, user: User) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            user_id: Some(user.id),
            username: Some(user.username),
        }
    }

    fn refused(message: String) -> Self {
        Self {
            success: false,
            message,
            user_id: None,
            username: None,
        }
    }
}

/// Request for `/ask`
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
    pub user_id: Option<i64>,
}

/// Query parameters for `/history`
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub user_id: i64,
}

/// One history entry as shown to the client
#[derive(Debug, Serialize)]
pub struct HistoryEntry {
    pub role: Role,
    pub message: String,
}

impl From<ChatTurn> for HistoryEntry {
    fn from(turn: ChatTurn) -> Self {
        Self {
            role: turn.role,
            message: turn.message,
        }
    }
}

/// Create the router for the health assistant service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/ask", post(ask))
        .route("/history", get(history))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Static front end
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    common::database::health_check(&state.db_pool).await?;

    Ok(Json(json!({
        "status": "ok",
        "service": "health-api",
        "database": "ok"
    })))
}

/// User signup endpoint
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<Credentials>,
) -> ApiResult<Json<AuthResponse>> {
    let response = match state.accounts.signup(payload).await {
        Ok(user) => AuthResponse::accepted("Signup successful.", user),
        Err(e) => AuthResponse::refused(refusal_message(e)?),
    };

    Ok(Json(response))
}

/// User login endpoint
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<Credentials>,
) -> ApiResult<Json<AuthResponse>> {
    let response = match state.accounts.login(&payload).await {
        Ok(user) => AuthResponse::accepted("Login successful.", user),
        Err(e) => AuthResponse::refused(refusal_message(e)?),
    };

    Ok(Json(response))
}

/// Question endpoint
pub async fn ask(State(state): State<AppState>, Json(payload): Json<AskRequest>) -> Json<AskOutcome> {
    Json(state.orchestrator.ask(&payload.question, payload.user_id).await)
}

/// Chat history of a user, oldest first
pub async fn history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<Vec<HistoryEntry>>> {
    let turns = state.history_repository.list_for_user(query.user_id).await?;

    Ok(Json(turns.into_iter().map(HistoryEntry::from).collect()))
}

/// Caller-facing message for a refused account operation
///
/// Storage failures are not the caller's fault and become a 500 instead.
fn refusal_message(err: AccountError) -> Result<String, ApiError> {
    match err {
        AccountError::Storage(e) => Err(ApiError::Internal(e)),
        other => Ok(other.to_string()),
    }
}

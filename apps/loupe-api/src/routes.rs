use axum::{
	Json, Router,
	extract::{Path, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};

use loupe_service::{
	ChatRequest, ChatResponse, ServiceError, SummarizeRequest, SummarizeResponse,
};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/sessions/{session_id}/summary", get(summarize))
		.route("/v1/sessions/{session_id}/chat", post(chat))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn summarize(
	State(state): State<AppState>,
	Path(session_id): Path<String>,
) -> Result<Json<SummarizeResponse>, ApiError> {
	let response = state.service.summarize(SummarizeRequest { session_id }).await?;

	Ok(Json(response))
}

#[derive(Debug, Deserialize)]
struct ChatBody {
	question: String,
	conversation_id: Option<String>,
}

async fn chat(
	State(state): State<AppState>,
	Path(session_id): Path<String>,
	Json(payload): Json<ChatBody>,
) -> Result<Json<ChatResponse>, ApiError> {
	let response = state
		.service
		.chat(ChatRequest {
			session_id,
			question: payload.question,
			conversation_id: payload.conversation_id,
		})
		.await?;

	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	details: Option<serde_json::Value>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	details: Option<serde_json::Value>,
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::SessionNotFound { details } => Self {
				status: StatusCode::NOT_FOUND,
				error_code: "SESSION_NOT_FOUND".to_string(),
				message: format!("Session {} not found.", details.session_id),
				details: serde_json::to_value(*details).ok(),
			},
			ServiceError::InvalidRequest { message } => Self {
				status: StatusCode::BAD_REQUEST,
				error_code: "INVALID_REQUEST".to_string(),
				message,
				details: None,
			},
			ServiceError::Provider { message } => Self {
				status: StatusCode::BAD_GATEWAY,
				error_code: "PROVIDER_ERROR".to_string(),
				message,
				details: None,
			},
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody {
			error_code: self.error_code,
			message: self.message,
			details: self.details,
		};

		(self.status, Json(body)).into_response()
	}
}

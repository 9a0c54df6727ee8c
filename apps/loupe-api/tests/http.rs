use std::sync::Arc;

use axum::{
	body::{self, Body},
	http::{Request, StatusCode, header},
};
use mongodb::bson::doc;
use tower::util::ServiceExt;

use loupe_api::{routes, state::AppState};
use loupe_config::LlmProviderConfig;
use loupe_domain::SessionDocument;
use loupe_service::{BoxFuture, ChatMessage, LlmProvider, Providers, SessionService};
use loupe_testkit::MemoryStore;

fn test_config() -> loupe_config::Config {
	loupe_config::Config {
		service: loupe_config::Service {
			http_bind: "127.0.0.1:0".to_string(),
			log_level: "info".to_string(),
		},
		storage: loupe_config::Storage {
			mongo: loupe_config::Mongo {
				uri: "mongodb://localhost:27017".to_string(),
				database: "sessions".to_string(),
			},
		},
		lookup: loupe_config::Lookup::default(),
		providers: loupe_config::Providers {
			llm: LlmProviderConfig {
				provider_id: "test".to_string(),
				api_base: "http://127.0.0.1:1".to_string(),
				api_key: "test-key".to_string(),
				path: "/".to_string(),
				model: "test".to_string(),
				temperature: 0.0,
				timeout_ms: 1_000,
				default_headers: serde_json::Map::new(),
			},
		},
		context: loupe_config::Context::default(),
	}
}

struct StubLlm;

impl LlmProvider for StubLlm {
	fn summarize<'a>(
		&'a self,
		_cfg: &'a LlmProviderConfig,
		session_id: &'a str,
		documents: &'a [SessionDocument],
	) -> BoxFuture<'a, color_eyre::Result<String>> {
		let summary = format!("summary of {session_id} from {} document(s)", documents.len());

		Box::pin(async move { Ok(summary) })
	}

	fn answer<'a>(
		&'a self,
		_cfg: &'a LlmProviderConfig,
		_session_id: &'a str,
		question: &'a str,
		_documents: &'a [SessionDocument],
		history: &'a [ChatMessage],
	) -> BoxFuture<'a, color_eyre::Result<String>> {
		let answer = format!("answer-for-{question} (history {})", history.len());

		Box::pin(async move { Ok(answer) })
	}
}

fn test_app(store: MemoryStore) -> axum::Router {
	let service = SessionService::with_providers(
		test_config(),
		Arc::new(store),
		Providers::new(Arc::new(StubLlm)),
	);

	routes::router(AppState::with_service(Arc::new(service)))
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
	let bytes = body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("Failed to read response body.");

	serde_json::from_slice(&bytes).expect("Response body must be JSON.")
}

#[tokio::test]
async fn health_returns_ok() {
	let app = test_app(MemoryStore::new());

	let response = app
		.oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn summary_round_trips_through_the_service() {
	let store = MemoryStore::new()
		.with_collection("traces", vec![doc! { "sessionId": "s-1", "batchIndex": 1 }]);
	let app = test_app(store);

	let response = app
		.oneshot(
			Request::builder().uri("/v1/sessions/s-1/summary").body(Body::empty()).unwrap(),
		)
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::OK);

	let json = json_body(response).await;

	assert_eq!(json["session_id"], "s-1");
	assert_eq!(json["summary"], "summary of s-1 from 1 document(s)");
	assert_eq!(json["used_documents"][0]["source"], "traces");
}

#[tokio::test]
async fn chat_continues_a_conversation_across_requests() {
	let store =
		MemoryStore::new().with_collection("traces", vec![doc! { "sessionId": "s-1" }]);
	let app = test_app(store);

	let first = app
		.clone()
		.oneshot(
			Request::builder()
				.method("POST")
				.uri("/v1/sessions/s-1/chat")
				.header(header::CONTENT_TYPE, "application/json")
				.body(Body::from(r#"{"question":"What happened?"}"#))
				.unwrap(),
		)
		.await
		.unwrap();

	assert_eq!(first.status(), StatusCode::OK);

	let first = json_body(first).await;

	assert_eq!(first["answer"], "answer-for-What happened? (history 0)");

	let conversation_id = first["conversation_id"].as_str().unwrap().to_string();
	let second = app
		.oneshot(
			Request::builder()
				.method("POST")
				.uri("/v1/sessions/s-1/chat")
				.header(header::CONTENT_TYPE, "application/json")
				.body(Body::from(format!(
					r#"{{"question":"Any errors?","conversation_id":"{conversation_id}"}}"#
				)))
				.unwrap(),
		)
		.await
		.unwrap();

	assert_eq!(second.status(), StatusCode::OK);

	let second = json_body(second).await;

	assert_eq!(second["answer"], "answer-for-Any errors? (history 2)");
	assert_eq!(second["conversation_id"], conversation_id.as_str());
	assert_eq!(second["history"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn unknown_sessions_return_the_diagnostic_payload() {
	let store = MemoryStore::new()
		.with_collection("traces", vec![doc! { "sessionId": "other" }]);
	let app = test_app(store);

	let response = app
		.oneshot(
			Request::builder()
				.uri("/v1/sessions/missing/summary")
				.body(Body::empty())
				.unwrap(),
		)
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::NOT_FOUND);

	let json = json_body(response).await;

	assert_eq!(json["error_code"], "SESSION_NOT_FOUND");

	let details = &json["details"];

	assert_eq!(details["session_id"], "missing");
	assert_eq!(details["checked_fields"], serde_json::json!(["sessionId"]));
	assert_eq!(details["collections_scanned"], serde_json::json!(["traces"]));
	assert_eq!(details["fallback_scan_enabled"], serde_json::json!(true));
	assert!(
		details["candidate_values"]
			.as_array()
			.unwrap()
			.contains(&serde_json::json!("string:missing"))
	);
	assert_eq!(details["collection_samples"][0]["estimated_count"], serde_json::json!(1));
}

#[tokio::test]
async fn blank_questions_are_a_bad_request() {
	let store =
		MemoryStore::new().with_collection("traces", vec![doc! { "sessionId": "s-1" }]);
	let app = test_app(store);

	let response = app
		.oneshot(
			Request::builder()
				.method("POST")
				.uri("/v1/sessions/s-1/chat")
				.header(header::CONTENT_TYPE, "application/json")
				.body(Body::from(r#"{"question":"  "}"#))
				.unwrap(),
		)
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::BAD_REQUEST);

	let json = json_body(response).await;

	assert_eq!(json["error_code"], "INVALID_REQUEST");
}

use loupe_domain::SessionDocument;
use loupe_store::models::SessionLookupResult;

use crate::{ChatMessage, ServiceError, ServiceResult, SessionService};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ChatRequest {
	pub session_id: String,
	pub question: String,
	/// Lets clients continue a multi-turn conversation.
	pub conversation_id: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ChatResponse {
	pub session_id: String,
	pub answer: String,
	pub used_documents: Vec<SessionDocument>,
	pub conversation_id: String,
	pub history: Vec<ChatMessage>,
}

impl SessionService {
	pub async fn chat(&self, req: ChatRequest) -> ServiceResult<ChatResponse> {
		let question = req.question.trim();

		if question.is_empty() {
			return Err(ServiceError::InvalidRequest {
				message: "question must be non-empty.".to_string(),
			});
		}

		let (documents, lookup) = self.load_documents(&req.session_id).await?;
		let (conversation_id, history) = match req.conversation_id {
			Some(conversation_id) => {
				let history = self.conversations.history(&conversation_id);

				(conversation_id, history)
			},
			None => (self.conversations.generate_id(), Vec::new()),
		};
		let answer = self
			.providers
			.llm
			.answer(&self.cfg.providers.llm, &req.session_id, question, &documents, &history)
			.await?;

		self.conversations.append(&conversation_id, "user", question);
		self.conversations.append(&conversation_id, "assistant", &answer);
		self.record_lookup(&conversation_id, &lookup);

		let history = self.conversations.history(&conversation_id);

		Ok(ChatResponse {
			session_id: req.session_id,
			answer,
			used_documents: documents,
			conversation_id,
			history,
		})
	}

	pub fn conversation_metadata(&self, conversation_id: &str) -> Option<serde_json::Value> {
		self.conversations.metadata(conversation_id)
	}

	// Lookup provenance is kept with the conversation for debugging.
	fn record_lookup(&self, conversation_id: &str, lookup: &SessionLookupResult) {
		self.conversations.set_metadata(
			conversation_id,
			serde_json::json!({
				"lookup": {
					"requested_collections": lookup.requested_collections,
					"collections": lookup.scanned_collections,
					"matched_collections": lookup.matched_collections,
				},
			}),
		);
	}
}

use loupe_domain::SessionDocument;

use crate::{ServiceResult, SessionService};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SummarizeRequest {
	pub session_id: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SummarizeResponse {
	pub session_id: String,
	pub summary: String,
	/// Documents that were provided to the language model.
	pub used_documents: Vec<SessionDocument>,
}

impl SessionService {
	pub async fn summarize(&self, req: SummarizeRequest) -> ServiceResult<SummarizeResponse> {
		let (documents, _) = self.load_documents(&req.session_id).await?;
		let summary = self
			.providers
			.llm
			.summarize(&self.cfg.providers.llm, &req.session_id, &documents)
			.await?;

		Ok(SummarizeResponse {
			session_id: req.session_id,
			summary,
			used_documents: documents,
		})
	}
}

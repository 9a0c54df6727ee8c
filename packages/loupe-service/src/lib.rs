pub mod chat;
pub mod conversation;
pub mod summarize;

use std::{future::Future, pin::Pin, sync::Arc};

pub use chat::{ChatRequest, ChatResponse};
pub use conversation::ConversationStore;
pub use loupe_providers::chat::ChatTurn as ChatMessage;
pub use summarize::{SummarizeRequest, SummarizeResponse};

use loupe_config::{Config, LlmProviderConfig};
use loupe_domain::SessionDocument;
use loupe_store::{SessionStore, engine::LookupEngine, models::SessionLookupResult};

pub type ServiceResult<T> = Result<T, ServiceError>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait LlmProvider
where
	Self: Send + Sync,
{
	fn summarize<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		session_id: &'a str,
		documents: &'a [SessionDocument],
	) -> BoxFuture<'a, color_eyre::Result<String>>;

	fn answer<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		session_id: &'a str,
		question: &'a str,
		documents: &'a [SessionDocument],
		history: &'a [ChatMessage],
	) -> BoxFuture<'a, color_eyre::Result<String>>;
}

#[derive(Clone)]
pub struct Providers {
	pub llm: Arc<dyn LlmProvider>,
}
impl Providers {
	pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
		Self { llm }
	}
}

/// Explicitly constructed service instance; lifecycle is owned by whatever
/// assembles it (no ambient global state).
pub struct SessionService {
	pub cfg: Config,
	engine: LookupEngine,
	providers: Providers,
	conversations: ConversationStore,
}
impl SessionService {
	pub fn new(cfg: Config, store: Arc<dyn SessionStore>) -> Self {
		Self::with_providers(cfg, store, Providers::new(Arc::new(DefaultProviders)))
	}

	pub fn with_providers(
		cfg: Config,
		store: Arc<dyn SessionStore>,
		providers: Providers,
	) -> Self {
		let engine = LookupEngine::new(&cfg, store);

		Self { cfg, engine, providers, conversations: ConversationStore::new() }
	}

	/// Resolves, fails with the full diagnostic payload when nothing
	/// matched, and trims the survivors to the context budget.
	pub(crate) async fn load_documents(
		&self,
		session_id: &str,
	) -> ServiceResult<(Vec<SessionDocument>, SessionLookupResult)> {
		let lookup = self.engine.resolve(session_id).await;

		if lookup.documents.is_empty() {
			tracing::info!(session_id = %session_id, "Session lookup matched nothing.");

			return Err(ServiceError::SessionNotFound {
				details: Box::new(NotFoundDetails::from_lookup(
					&lookup,
					self.engine.fallback_scan_enabled(),
				)),
			});
		}

		let documents = loupe_domain::budget::truncate_documents(
			lookup.documents.clone(),
			self.cfg.context.max_chars,
		);

		Ok((documents, lookup))
	}
}

struct DefaultProviders;

impl LlmProvider for DefaultProviders {
	fn summarize<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		session_id: &'a str,
		documents: &'a [SessionDocument],
	) -> BoxFuture<'a, color_eyre::Result<String>> {
		Box::pin(loupe_providers::chat::summarize(cfg, session_id, documents))
	}

	fn answer<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		session_id: &'a str,
		question: &'a str,
		documents: &'a [SessionDocument],
		history: &'a [ChatMessage],
	) -> BoxFuture<'a, color_eyre::Result<String>> {
		Box::pin(loupe_providers::chat::answer(cfg, session_id, question, documents, history))
	}
}

/// Everything a caller needs to explain a miss, lifted straight from the
/// lookup result — no re-querying.
#[derive(Debug, Clone, serde::Serialize)]
pub struct NotFoundDetails {
	pub message: String,
	pub session_id: String,
	pub checked_fields: Vec<String>,
	pub target_collections: Vec<String>,
	pub candidate_values: Vec<String>,
	pub connection_ok: bool,
	pub collections_scanned: Vec<String>,
	pub fallback_scan_enabled: bool,
	pub fallback_documents_scanned: u64,
	pub fallback_collections: Vec<String>,
	pub collection_samples: Vec<loupe_store::models::CollectionSample>,
}
impl NotFoundDetails {
	fn from_lookup(lookup: &SessionLookupResult, fallback_scan_enabled: bool) -> Self {
		Self {
			message: "Session not found".to_string(),
			session_id: lookup.session_id.clone(),
			checked_fields: lookup.session_id_fields.clone(),
			target_collections: lookup.requested_collections.clone(),
			candidate_values: lookup
				.candidate_values
				.iter()
				.map(|candidate| candidate.describe())
				.collect(),
			connection_ok: lookup.connection_ok,
			collections_scanned: lookup.scanned_collections.clone(),
			fallback_scan_enabled,
			fallback_documents_scanned: lookup.fallback_documents_scanned,
			fallback_collections: lookup.fallback_collections.clone(),
			collection_samples: lookup.collection_samples.clone(),
		}
	}
}

#[derive(Debug)]
pub enum ServiceError {
	SessionNotFound { details: Box<NotFoundDetails> },
	InvalidRequest { message: String },
	Provider { message: String },
}

impl std::fmt::Display for ServiceError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::SessionNotFound { details } => {
				write!(f, "Session {} not found.", details.session_id)
			},
			Self::InvalidRequest { message } => write!(f, "Invalid request: {message}"),
			Self::Provider { message } => write!(f, "Provider error: {message}"),
		}
	}
}

impl std::error::Error for ServiceError {}

impl From<color_eyre::Report> for ServiceError {
	fn from(err: color_eyre::Report) -> Self {
		Self::Provider { message: err.to_string() }
	}
}

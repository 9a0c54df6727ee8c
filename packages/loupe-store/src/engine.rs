use std::sync::Arc;

use futures::stream::{self, StreamExt};
use mongodb::bson::{Bson, Document};

use loupe_domain::{FormatOptions, format_document, sort_documents, value};

use crate::{
	SessionStore,
	candidate::{self, CandidateValue},
	models::{CollectionSample, SessionLookupResult},
	query, scan,
};

const SYSTEM_NAMESPACE_PREFIX: &str = "system.";

/// Resolves one session identifier against every relevant collection.
/// All per-collection failures are contained; `resolve` itself cannot fail.
pub struct LookupEngine {
	store: Arc<dyn SessionStore>,
	lookup: loupe_config::Lookup,
	format: FormatOptions,
}

struct CollectionOutcome {
	collection: String,
	matches: Vec<Document>,
	matched: bool,
	via_fallback: bool,
	scanned: u64,
}

impl LookupEngine {
	pub fn new(cfg: &loupe_config::Config, store: Arc<dyn SessionStore>) -> Self {
		Self {
			store,
			lookup: cfg.lookup.clone(),
			format: FormatOptions {
				event_preview_items: cfg.context.event_preview_items,
				event_preview_chars: cfg.context.event_preview_chars,
			},
		}
	}

	pub fn fallback_scan_enabled(&self) -> bool {
		self.lookup.fallback_scan
	}

	pub async fn resolve(&self, session_id: &str) -> SessionLookupResult {
		let candidates = candidate::candidates(session_id);
		let fields = query::normalize_fields(&self.lookup.session_id_fields);
		let filter = query::build_filter(&fields, &candidates);
		let connection_ok = match self.store.ping().await {
			Ok(()) => true,
			Err(err) => {
				tracing::warn!(error = %err, "Store liveness check failed.");

				false
			},
		};
		let collections = self.select_collections().await;

		// Collections are independent, so they are queried concurrently on a
		// bounded pool. Outcomes are reassembled in selector order; final
		// document order is a pure post-pass and ignores completion order.
		let candidates_ref = &candidates;
		let filter_ref = &filter;
		let mut outcomes: Vec<(usize, CollectionOutcome)> =
			stream::iter(collections.iter().cloned().enumerate())
				.map(|(index, collection)| async move {
					(index, self.lookup_collection(collection, filter_ref.clone(), candidates_ref).await)
				})
				.buffer_unordered(self.lookup.max_concurrent_collections.max(1))
				.collect()
				.await;

		outcomes.sort_by_key(|(index, _)| *index);

		let mut formatted = Vec::new();
		let mut scanned_collections = Vec::new();
		let mut matched_collections = Vec::new();
		let mut fallback_collections = Vec::new();
		let mut fallback_documents_scanned = 0;

		for (_, outcome) in &outcomes {
			scanned_collections.push(outcome.collection.clone());

			if outcome.matched {
				matched_collections.push(outcome.collection.clone());
			}
			if outcome.via_fallback {
				fallback_collections.push(outcome.collection.clone());
			}

			fallback_documents_scanned += outcome.scanned;

			for raw in &outcome.matches {
				formatted.push(format_document(&outcome.collection, raw, self.format));
			}
		}

		let documents = sort_documents(formatted);
		let collection_samples = if documents.is_empty() {
			self.collect_samples(&scanned_collections).await
		} else {
			Vec::new()
		};

		SessionLookupResult {
			session_id: session_id.to_string(),
			documents,
			session_id_fields: fields,
			requested_collections: collections,
			candidate_values: candidates,
			scanned_collections,
			matched_collections,
			fallback_collections,
			fallback_documents_scanned,
			connection_ok,
			collection_samples,
		}
	}

	async fn select_collections(&self) -> Vec<String> {
		let allowed = &self.lookup.collections;
		let discovered = match self.store.collection_names().await {
			Ok(names) => names,
			Err(err) => {
				tracing::warn!(
					error = %err,
					"Collection listing failed; degrading to the configured allow-list.",
				);

				return allowed.clone();
			},
		};
		let discovered: Vec<String> = discovered
			.into_iter()
			.filter(|name| !name.starts_with(SYSTEM_NAMESPACE_PREFIX))
			.collect();

		if allowed.is_empty() {
			return discovered;
		}

		let mut selected = Vec::new();

		for name in allowed {
			if discovered.iter().any(|discovered| discovered == name) {
				selected.push(name.clone());
			} else {
				tracing::warn!(collection = %name, "Configured collection does not exist.");
			}
		}

		selected
	}

	async fn lookup_collection(
		&self,
		collection: String,
		filter: Document,
		candidates: &[CandidateValue],
	) -> CollectionOutcome {
		let mut found = match self.store.find_matching(&collection, filter).await {
			Ok(found) => found,
			Err(err) => {
				tracing::warn!(collection = %collection, error = %err, "Structured session query failed.");

				Vec::new()
			},
		};
		let mut via_fallback = false;
		let mut scanned = 0;

		if found.is_empty() && self.lookup.fallback_scan {
			match self.store.scan_documents(&collection, self.lookup.fallback_scan_limit).await {
				Ok(inspected) => {
					scanned = inspected.len() as u64;
					found = inspected
						.into_iter()
						.filter(|document| scan::document_contains(document, candidates))
						.collect();
					via_fallback = !found.is_empty();
				},
				Err(err) => {
					tracing::warn!(collection = %collection, error = %err, "Fallback scan failed.");
				},
			}
		}

		CollectionOutcome { collection, matched: !found.is_empty(), matches: found, via_fallback, scanned }
	}

	// Diagnostics for the zero-match outcome only; never on the success path.
	async fn collect_samples(&self, collections: &[String]) -> Vec<CollectionSample> {
		let mut samples = Vec::new();

		for collection in collections {
			let estimated_count = match self.store.estimated_count(collection).await {
				Ok(count) => Some(count),
				Err(err) => {
					tracing::warn!(collection = %collection, error = %err, "Count estimation failed.");

					None
				},
			};
			let documents = match self.store.sample_documents(collection).await {
				Ok(documents) => documents
					.into_iter()
					.map(|document| value::render_json(&Bson::Document(document)))
					.collect(),
				Err(err) => {
					tracing::warn!(collection = %collection, error = %err, "Diagnostic sampling failed.");

					Vec::new()
				},
			};

			samples.push(CollectionSample {
				collection: collection.clone(),
				estimated_count,
				documents,
			});
		}

		samples
	}
}

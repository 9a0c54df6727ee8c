use serde::Serialize;

use loupe_domain::SessionDocument;

use crate::candidate::CandidateValue;

/// Raw content of one collection, captured only when a lookup matched
/// nothing, so operators can see what was actually there.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionSample {
	pub collection: String,
	pub estimated_count: Option<u64>,
	pub documents: Vec<String>,
}

/// Everything one resolution produced, including the provenance a caller
/// needs to explain a miss without re-querying the store.
#[derive(Debug, Clone)]
pub struct SessionLookupResult {
	pub session_id: String,
	pub documents: Vec<SessionDocument>,
	pub session_id_fields: Vec<String>,
	pub requested_collections: Vec<String>,
	pub candidate_values: Vec<CandidateValue>,
	pub scanned_collections: Vec<String>,
	pub matched_collections: Vec<String>,
	/// Collections whose matches came from the deep scan rather than the
	/// structured query; lower-confidence by contract.
	pub fallback_collections: Vec<String>,
	pub fallback_documents_scanned: u64,
	pub connection_ok: bool,
	pub collection_samples: Vec<CollectionSample>,
}

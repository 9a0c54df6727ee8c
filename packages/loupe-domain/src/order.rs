use std::cmp::Ordering;

use mongodb::bson::Document;

use crate::{
	document::{FormattedDocument, SessionDocument},
	value,
};

const TIEBREAK_FIELDS: [&str; 3] = ["requestRid", "rid", "actionId"];

/// Chronological ordering key. Documents carrying a batch index sort before
/// documents without one; the second bucket falls back to the raw numeric
/// `t` field. A request/action identifier (or the store identity) keeps the
/// order stable within a batch.
#[derive(Debug, Clone)]
pub struct OrderKey {
	batch_index: Option<i64>,
	timestamp: f64,
	tiebreak: String,
}
impl OrderKey {
	pub fn from_document(raw: &Document, batch_index: Option<i64>) -> Self {
		let timestamp = raw.get("t").and_then(value::coerce_f64).unwrap_or(0.0);
		let tiebreak = TIEBREAK_FIELDS
			.iter()
			.find_map(|key| raw.get(key).and_then(value::scalar_text))
			.or_else(|| raw.get("_id").and_then(value::scalar_text))
			.or_else(|| raw.get("_id").map(value::render_json))
			.unwrap_or_default();

		Self { batch_index, timestamp, tiebreak }
	}

	pub fn compare(&self, other: &Self) -> Ordering {
		match (self.batch_index, other.batch_index) {
			(Some(left), Some(right)) => {
				left.cmp(&right).then_with(|| self.tiebreak.cmp(&other.tiebreak))
			},
			(Some(_), None) => Ordering::Less,
			(None, Some(_)) => Ordering::Greater,
			(None, None) => self
				.timestamp
				.total_cmp(&other.timestamp)
				.then_with(|| self.tiebreak.cmp(&other.tiebreak)),
		}
	}
}

/// Deterministic final ordering; a pure post-pass over the collected set, so
/// the order never depends on which collection finished first.
pub fn sort_documents(mut documents: Vec<FormattedDocument>) -> Vec<SessionDocument> {
	documents.sort_by(|left, right| left.order.compare(&right.order));

	documents.into_iter().map(|formatted| formatted.document).collect()
}

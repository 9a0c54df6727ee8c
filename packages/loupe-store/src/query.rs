use mongodb::bson::{Bson, Document, doc};

use crate::candidate::CandidateValue;

const DEFAULT_SESSION_ID_FIELD: &str = "sessionId";

/// Trims the configured field names and drops empties; an empty result
/// falls back to the canonical field name.
pub fn normalize_fields(fields: &[String]) -> Vec<String> {
	let normalized: Vec<String> = fields
		.iter()
		.map(|field| field.trim().to_string())
		.filter(|field| !field.is_empty())
		.collect();

	if normalized.is_empty() {
		return vec![DEFAULT_SESSION_ID_FIELD.to_string()];
	}

	normalized
}

/// Builds the structured filter: the fields × candidates cross product as
/// equality clauses under `$or`, unwrapped when it collapses to one clause.
/// `candidates` must be non-empty (the candidate set invariant guarantees
/// at least the original string).
pub fn build_filter(fields: &[String], candidates: &[CandidateValue]) -> Document {
	let fields = normalize_fields(fields);
	let mut clauses: Vec<Document> = Vec::with_capacity(fields.len() * candidates.len());

	for field in &fields {
		for candidate in candidates {
			let mut clause = Document::new();

			clause.insert(field.clone(), candidate.to_bson());
			clauses.push(clause);
		}
	}

	if clauses.len() == 1 {
		return clauses.remove(0);
	}

	doc! { "$or": clauses.into_iter().map(Bson::Document).collect::<Vec<_>>() }
}

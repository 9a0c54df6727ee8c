use std::collections::VecDeque;

use mongodb::bson::{Bson, Document};

use crate::candidate::CandidateValue;

/// Breadth-first deep-match over an arbitrarily shaped document: mappings
/// expand to their values, sequences to their elements. A scalar leaf
/// matches on strict value equality, or — for text and byte leaves — on
/// case-insensitive equality/containment of a candidate's textual form.
/// Deliberately permissive: unknown schemas are tolerated at the price of
/// false positives, which is why fallback matches are reported separately.
pub fn document_contains(document: &Document, candidates: &[CandidateValue]) -> bool {
	let targets: Vec<(Bson, String)> = candidates
		.iter()
		.map(|candidate| (candidate.to_bson(), candidate.text_form().to_lowercase()))
		.collect();
	let mut queue: VecDeque<&Bson> = document.values().collect();

	while let Some(value) = queue.pop_front() {
		match value {
			Bson::Document(map) => queue.extend(map.values()),
			Bson::Array(items) => queue.extend(items.iter()),
			leaf => {
				if targets.iter().any(|(target, _)| leaf == target) {
					return true;
				}

				if let Some(text) = leaf_text(leaf) {
					let lower = text.to_lowercase();

					if targets
						.iter()
						.any(|(_, target)| lower == *target || lower.contains(target.as_str()))
					{
						return true;
					}
				}
			},
		}
	}

	false
}

fn leaf_text(leaf: &Bson) -> Option<String> {
	match leaf {
		Bson::String(text) => Some(text.clone()),
		Bson::Binary(binary) => Some(String::from_utf8_lossy(&binary.bytes).into_owned()),
		_ => None,
	}
}

use mongodb::bson::{Binary, Bson, Uuid, oid::ObjectId};

const SESSION_PREFIX: &str = "S_";

/// One storage representation a session identifier might have. The set for
/// a given identifier is deduplicated by (variant, value) and always starts
/// with the original string.
#[derive(Debug, Clone, PartialEq)]
pub enum CandidateValue {
	Text(String),
	ObjectId(ObjectId),
	Uuid(Uuid),
	UuidBinary(Binary),
}
impl CandidateValue {
	pub fn to_bson(&self) -> Bson {
		match self {
			Self::Text(text) => Bson::String(text.clone()),
			Self::ObjectId(oid) => Bson::ObjectId(*oid),
			Self::Uuid(uuid) => Bson::Binary(Binary::from_uuid(*uuid)),
			Self::UuidBinary(binary) => Bson::Binary(binary.clone()),
		}
	}

	/// Textual form used by the deep scan's case-insensitive matching.
	pub fn text_form(&self) -> String {
		match self {
			Self::Text(text) => text.clone(),
			Self::ObjectId(oid) => oid.to_hex(),
			Self::Uuid(uuid) => uuid.to_string(),
			Self::UuidBinary(binary) => hex(&binary.bytes),
		}
	}

	/// Rendering used by "not found" diagnostics.
	pub fn describe(&self) -> String {
		match self {
			Self::Text(text) => format!("string:{text}"),
			Self::ObjectId(oid) => format!("object_id:{}", oid.to_hex()),
			Self::Uuid(uuid) => format!("uuid:{uuid}"),
			Self::UuidBinary(binary) => format!("uuid_binary:{}", hex(&binary.bytes)),
		}
	}
}

/// Expands one identifier into every representation it might be stored as.
/// Deterministic and pure; parse failures mean "not that representation",
/// never an error.
pub fn candidates(identifier: &str) -> Vec<CandidateValue> {
	let trimmed = identifier.trim();
	let mut candidates = Vec::new();

	push(&mut candidates, CandidateValue::Text(trimmed.to_string()));

	let suffix = trimmed.strip_prefix(SESSION_PREFIX).filter(|suffix| !suffix.is_empty());

	if let Some(suffix) = suffix {
		push(&mut candidates, CandidateValue::Text(suffix.to_string()));
	}

	let dehyphenated = trimmed.replace('-', "");

	if !dehyphenated.is_empty() {
		push(&mut candidates, CandidateValue::Text(dehyphenated));
	}
	if let Some(suffix) = suffix {
		let stripped = suffix.replace('-', "");

		if !stripped.is_empty() {
			push(&mut candidates, CandidateValue::Text(stripped));
		}
	}
	if let Ok(oid) = ObjectId::parse_str(trimmed) {
		push(&mut candidates, CandidateValue::ObjectId(oid));
	}
	if let Ok(uuid) = Uuid::parse_str(trimmed) {
		push(&mut candidates, CandidateValue::Uuid(uuid));
		push(&mut candidates, CandidateValue::UuidBinary(Binary::from_uuid(uuid)));
	}

	candidates
}

fn push(candidates: &mut Vec<CandidateValue>, candidate: CandidateValue) {
	if !candidates.contains(&candidate) {
		candidates.push(candidate);
	}
}

fn hex(bytes: &[u8]) -> String {
	bytes.iter().map(|byte| format!("{byte:02x}")).collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn texts(candidates: &[CandidateValue]) -> Vec<String> {
		candidates
			.iter()
			.filter_map(|candidate| match candidate {
				CandidateValue::Text(text) => Some(text.clone()),
				_ => None,
			})
			.collect()
	}

	#[test]
	fn prefixed_uuid_expands_into_all_text_variants() {
		let set = candidates("S_c1fd035b-4a2f-4097-a29c-8df0ad50c80c");
		let texts = texts(&set);

		assert_eq!(texts[0], "S_c1fd035b-4a2f-4097-a29c-8df0ad50c80c");
		assert!(texts.contains(&"c1fd035b-4a2f-4097-a29c-8df0ad50c80c".to_string()));
		assert!(texts.contains(&"S_c1fd035b4a2f4097a29c8df0ad50c80c".to_string()));
		assert!(texts.contains(&"c1fd035b4a2f4097a29c8df0ad50c80c".to_string()));
	}

	#[test]
	fn object_identifier_strings_parse_into_a_native_candidate() {
		let set = candidates("507f1f77bcf86cd799439011");

		assert!(matches!(&set[0], CandidateValue::Text(text) if text == "507f1f77bcf86cd799439011"));
		assert!(
			set.iter()
				.any(|candidate| matches!(candidate, CandidateValue::ObjectId(oid) if oid.to_hex() == "507f1f77bcf86cd799439011"))
		);
	}

	#[test]
	fn uuid_identifiers_gain_value_and_binary_candidates() {
		let set = candidates("c1fd035b-4a2f-4097-a29c-8df0ad50c80c");

		assert!(set.iter().any(|candidate| matches!(candidate, CandidateValue::Uuid(_))));
		assert!(set.iter().any(|candidate| matches!(candidate, CandidateValue::UuidBinary(_))));
	}

	#[test]
	fn hyphenated_identifiers_gain_only_the_stripped_variant() {
		let set = candidates("  session-123  ");

		assert_eq!(
			texts(&set),
			vec!["session-123".to_string(), "session123".to_string()]
		);
		assert_eq!(set.len(), 2);
	}

	#[test]
	fn duplicates_collapse_by_variant_and_value() {
		let set = candidates("nodashes");

		// De-hyphenating a dash-free identifier yields the original again.
		assert_eq!(set.len(), 1);
	}
}

use mongodb::bson::{Bson, Document};

use crate::{events, order::OrderKey, value};

const PLACEHOLDER_HEADER: &str = "Session record";

/// One record associated with a session, rendered for consumption by the
/// language model and the HTTP surface.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SessionDocument {
	/// Collection the record came from.
	pub source: String,
	/// Human-readable rendering of the record.
	pub content: String,
	pub batch_index: Option<i64>,
	pub total_events: Option<u64>,
	pub event_preview: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct FormatOptions {
	pub event_preview_items: usize,
	pub event_preview_chars: usize,
}
impl Default for FormatOptions {
	fn default() -> Self {
		Self { event_preview_items: 5, event_preview_chars: 160 }
	}
}

/// A formatted document paired with the key that orders it. The key needs
/// fields the rendering strips, so it is extracted here and carried along.
#[derive(Debug, Clone)]
pub struct FormattedDocument {
	pub document: SessionDocument,
	pub order: OrderKey,
}

/// Best-effort conversion of one raw record into a [`SessionDocument`].
/// Never fails: missing or malformed fields degrade to absent metadata.
pub fn format_document(source: &str, raw: &Document, opts: FormatOptions) -> FormattedDocument {
	let mut clean = raw.clone();

	clean.remove("_id");

	let batch_index = clean.get("batchIndex").and_then(value::coerce_i64);
	let request_rid =
		["requestRid", "rid"].iter().find_map(|key| clean.get(key).and_then(value::scalar_text));
	let action_id = clean.get("actionId").and_then(value::scalar_text);
	let data = clean.get_document("data").ok();
	let explicit_total = data
		.and_then(|data| data.get("total"))
		.and_then(value::coerce_i64)
		.filter(|total| *total >= 0)
		.map(|total| total as u64);
	let (event_preview, inferred_total) =
		events::summarize_events(data.and_then(|data| data.get("events")), opts);
	let total_events = explicit_total.or(inferred_total);

	let mut header_parts = Vec::new();

	if let Some(batch) = batch_index {
		header_parts.push(format!("Batch #{batch}"));
	}
	if let Some(rid) = &request_rid {
		header_parts.push(format!("requestRid={rid}"));
	}
	if let Some(action) = &action_id {
		header_parts.push(format!("actionId={action}"));
	}
	if let Some(total) = total_events {
		header_parts.push(format!("{total} event(s)"));
	}

	let header = if header_parts.is_empty() {
		PLACEHOLDER_HEADER.to_string()
	} else {
		header_parts.join(", ")
	};

	let mut content = header;

	if !event_preview.is_empty() {
		content.push_str("\nKey events:");

		for line in &event_preview {
			content.push_str("\n- ");
			content.push_str(line);
		}
	}

	content.push_str("\nDetails: ");
	content.push_str(&sanitized_details(&clean, total_events));

	let order = OrderKey::from_document(raw, batch_index);

	FormattedDocument {
		document: SessionDocument {
			source: source.to_string(),
			content,
			batch_index,
			total_events,
			event_preview,
		},
		order,
	}
}

// The event payload is already condensed into the preview; repeating it in
// the details line would duplicate the bulkiest part of the record.
fn sanitized_details(clean: &Document, total_events: Option<u64>) -> String {
	let mut sanitized = clean.clone();

	if let Ok(data) = sanitized.get_document_mut("data")
		&& data.contains_key("events")
	{
		let marker = match total_events {
			Some(total) => format!("<omitted {total} event(s)>"),
			None => "<omitted events>".to_string(),
		};

		data.insert("events", Bson::String(marker));
	}

	value::render_json(&Bson::Document(sanitized))
}

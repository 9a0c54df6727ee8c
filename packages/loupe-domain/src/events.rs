use mongodb::bson::Bson;

use crate::{document::FormatOptions, value};

/// Condenses an embedded event payload into short preview lines plus the
/// event count the payload represents. Total by construction: every input
/// shape has a defined output, and malformed serialized payloads fall back
/// to a truncated literal preview.
pub fn summarize_events(events: Option<&Bson>, opts: FormatOptions) -> (Vec<String>, Option<u64>) {
	let Some(events) = events else {
		return (Vec::new(), None);
	};

	match events {
		Bson::String(text) => summarize_serialized(text, opts),
		Bson::Array(items) => {
			let shown = items.len().min(opts.event_preview_items);
			let mut lines: Vec<String> = items
				.iter()
				.take(shown)
				.map(|event| describe_event(event, opts.event_preview_chars))
				.collect();

			if items.len() > shown {
				lines.push(format!("... {} more event(s)", items.len() - shown));
			}

			(lines, Some(items.len() as u64))
		},
		Bson::Document(_) => (vec![describe_event(events, opts.event_preview_chars)], Some(1)),
		other => {
			(vec![truncate_chars(&value::render_json(other), opts.event_preview_chars)], None)
		},
	}
}

// Event lists frequently arrive as JSON serialized into a string field.
// Detect that shape and recurse on the parsed value.
fn summarize_serialized(text: &str, opts: FormatOptions) -> (Vec<String>, Option<u64>) {
	let trimmed = text.trim();

	if trimmed.is_empty() {
		return (Vec::new(), None);
	}

	if trimmed.starts_with('[') || trimmed.starts_with('{') {
		if let Ok(parsed) = serde_json::from_str::<serde_json::Value>(trimmed) {
			// A parse that hands back the input unchanged must not recurse.
			if parsed.as_str() == Some(trimmed) {
				return (vec![truncate_chars(text, opts.event_preview_chars)], None);
			}
			if let Ok(parsed) = Bson::try_from(parsed) {
				return summarize_events(Some(&parsed), opts);
			}
		}

		return (vec![truncate_chars(text, opts.event_preview_chars)], None);
	}

	(vec![truncate_chars(text, opts.event_preview_chars)], None)
}

/// One-line description of a single event.
pub fn describe_event(event: &Bson, limit: usize) -> String {
	match event {
		Bson::Document(map) => {
			let pairs: Vec<String> = map
				.iter()
				.filter(|(_, field)| !matches!(field, Bson::Document(_) | Bson::Array(_)))
				.map(|(key, field)| {
					let text =
						value::scalar_text(field).unwrap_or_else(|| value::render_json(field));

					format!("{key}={text}")
				})
				.collect();

			if pairs.is_empty() {
				truncate_chars(&value::render_json(event), limit)
			} else {
				pairs.join(", ")
			}
		},
		Bson::String(text) => truncate_chars(text, limit),
		other => truncate_chars(&value::render_json(other), limit),
	}
}

/// Cuts a string to `limit` characters, the last one an ellipsis.
pub fn truncate_chars(text: &str, limit: usize) -> String {
	let limit = limit.max(1);

	if text.chars().count() <= limit {
		return text.to_string();
	}

	let mut cut: String = text.chars().take(limit - 1).collect();

	cut.push('…');

	cut
}

#[cfg(test)]
mod tests {
	use mongodb::bson::doc;

	use super::*;

	#[test]
	fn truncates_by_characters_not_bytes() {
		assert_eq!(truncate_chars("héllo wörld", 6), "héllo…");
		assert_eq!(truncate_chars("short", 10), "short");
		assert_eq!(truncate_chars("ab", 1), "…");
	}

	#[test]
	fn serialized_event_lists_are_parsed_and_recursed() {
		let events = Bson::String(r#"[{"type":"create"},{"type":"update"}]"#.to_string());
		let (lines, total) = summarize_events(Some(&events), FormatOptions::default());

		assert_eq!(total, Some(2));
		assert_eq!(lines, vec!["type=create".to_string(), "type=update".to_string()]);
	}

	#[test]
	fn malformed_serialized_events_become_a_literal_preview() {
		let events = Bson::String("[not json".to_string());
		let (lines, total) = summarize_events(Some(&events), FormatOptions::default());

		assert_eq!(total, None);
		assert_eq!(lines, vec!["[not json".to_string()]);
	}

	#[test]
	fn plain_text_summaries_are_idempotent() {
		let opts = FormatOptions { event_preview_items: 5, event_preview_chars: 12 };
		let events = Bson::String("a plain human readable event line".to_string());
		let (first, _) = summarize_events(Some(&events), opts);

		assert_eq!(first.len(), 1);

		let again = Bson::String(first[0].clone());
		let (second, _) = summarize_events(Some(&again), opts);

		assert_eq!(first, second);
	}

	#[test]
	fn nested_only_events_fall_back_to_serialized_form() {
		let event = Bson::Document(doc! { "payload": { "deep": true } });
		let line = describe_event(&event, 200);

		assert!(line.contains("payload"));
		assert!(line.contains("deep"));
	}

	#[test]
	fn empty_text_yields_no_preview() {
		let events = Bson::String("   ".to_string());

		assert_eq!(summarize_events(Some(&events), FormatOptions::default()), (Vec::new(), None));
	}
}

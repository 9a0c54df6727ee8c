use crate::document::SessionDocument;

/// Strict streaming prefix truncation: walk the ordered input once, keep
/// whole documents while they fit, cut the first one that does not, then
/// stop. Never reorders and never packs later documents into leftover room.
pub fn truncate_documents(
	documents: Vec<SessionDocument>,
	max_chars: usize,
) -> Vec<SessionDocument> {
	let mut kept = Vec::new();
	let mut used = 0_usize;

	for mut document in documents {
		let length = document.content.chars().count();

		if used + length <= max_chars {
			used += length;

			kept.push(document);

			continue;
		}

		let remaining = max_chars - used;

		if remaining > 0 {
			document.content = document.content.chars().take(remaining).collect();

			kept.push(document);
		}

		break;
	}

	kept
}

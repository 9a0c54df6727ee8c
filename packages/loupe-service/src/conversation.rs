use std::{collections::HashMap, sync::Mutex};

use serde_json::Value;

use crate::ChatMessage;

/// Ephemeral in-memory storage for conversation turns. Append-only and
/// process-lifetime; identifiers are generated here.
#[derive(Default)]
pub struct ConversationStore {
	turns: Mutex<HashMap<String, Vec<ChatMessage>>>,
	metadata: Mutex<HashMap<String, Value>>,
}
impl ConversationStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn generate_id(&self) -> String {
		uuid::Uuid::new_v4().simple().to_string()
	}

	pub fn append(&self, conversation_id: &str, role: &str, content: &str) {
		let mut turns = self.turns.lock().unwrap_or_else(|err| err.into_inner());

		turns
			.entry(conversation_id.to_string())
			.or_default()
			.push(ChatMessage { role: role.to_string(), content: content.to_string() });
	}

	pub fn history(&self, conversation_id: &str) -> Vec<ChatMessage> {
		let turns = self.turns.lock().unwrap_or_else(|err| err.into_inner());

		turns.get(conversation_id).cloned().unwrap_or_default()
	}

	pub fn set_metadata(&self, conversation_id: &str, value: Value) {
		let mut metadata = self.metadata.lock().unwrap_or_else(|err| err.into_inner());

		metadata.insert(conversation_id.to_string(), value);
	}

	pub fn metadata(&self, conversation_id: &str) -> Option<Value> {
		let metadata = self.metadata.lock().unwrap_or_else(|err| err.into_inner());

		metadata.get(conversation_id).cloned()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn appends_and_replays_turns_in_order() {
		let store = ConversationStore::new();
		let id = store.generate_id();

		store.append(&id, "user", "first");
		store.append(&id, "assistant", "second");

		let history = store.history(&id);

		assert_eq!(history.len(), 2);
		assert_eq!(history[0].role, "user");
		assert_eq!(history[1].content, "second");
		assert!(store.history("unknown").is_empty());
	}

	#[test]
	fn generated_identifiers_are_unique() {
		let store = ConversationStore::new();

		assert_ne!(store.generate_id(), store.generate_id());
	}
}

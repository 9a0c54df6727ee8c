use std::time::Duration;

use color_eyre::{Result, eyre};
use reqwest::Client;
use serde_json::Value;

use loupe_domain::SessionDocument;

const SYSTEM_PROMPT: &str = "You are an assistant that answers questions about a specific \
	session. Use only the provided session context and the conversation history shared by the \
	user.";

/// One prior conversation turn, in chat-completions wire shape.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ChatTurn {
	pub role: String,
	pub content: String,
}

pub async fn summarize(
	cfg: &loupe_config::LlmProviderConfig,
	session_id: &str,
	documents: &[SessionDocument],
) -> Result<String> {
	let messages = vec![serde_json::json!({
		"role": "user",
		"content": summary_prompt(session_id, documents),
	})];

	complete(cfg, messages).await
}

pub async fn answer(
	cfg: &loupe_config::LlmProviderConfig,
	session_id: &str,
	question: &str,
	documents: &[SessionDocument],
	history: &[ChatTurn],
) -> Result<String> {
	let mut messages = vec![serde_json::json!({ "role": "system", "content": SYSTEM_PROMPT })];

	for turn in history {
		messages.push(serde_json::json!({ "role": turn.role, "content": turn.content }));
	}

	messages.push(serde_json::json!({
		"role": "user",
		"content": question_prompt(session_id, question, documents, history),
	}));

	complete(cfg, messages).await
}

async fn complete(cfg: &loupe_config::LlmProviderConfig, messages: Vec<Value>) -> Result<String> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"temperature": cfg.temperature,
		"messages": messages,
	});
	let res = client
		.post(&url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_chat_content(json)
}

fn parse_chat_content(json: Value) -> Result<String> {
	json.get("choices")
		.and_then(|value| value.as_array())
		.and_then(|choices| choices.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|message| message.get("content"))
		.and_then(|content| content.as_str())
		.map(str::to_string)
		.ok_or_else(|| eyre::eyre!("Chat response is missing message content."))
}

fn summary_prompt(session_id: &str, documents: &[SessionDocument]) -> String {
	let document_text = documents
		.iter()
		.map(|document| {
			let batch = document
				.batch_index
				.map(|batch| batch.to_string())
				.unwrap_or_else(|| "n/a".to_string());

			format!(
				"Source: {}\nBatch: {batch}\nContent: {}",
				document.source, document.content
			)
		})
		.collect::<Vec<_>>()
		.join("\n\n");

	format!(
		"Create a concise ticket-ready summary for the session below. Respond with a short \
		title followed by up to three bullet points that capture the critical actions, \
		decisions, and blockers. Mention remaining questions or follow-up items if needed and \
		avoid unnecessary detail.\n\nSession ID: {session_id}\n\nOrdered Session Context:\n{document_text}"
	)
}

fn question_prompt(
	session_id: &str,
	question: &str,
	documents: &[SessionDocument],
	history: &[ChatTurn],
) -> String {
	let document_text = documents
		.iter()
		.map(|document| format!("Source: {}\nContent: {}", document.source, document.content))
		.collect::<Vec<_>>()
		.join("\n\n");
	let history_section = render_history(history)
		.map(|text| format!("Conversation so far:\n{text}\n\n"))
		.unwrap_or_default();

	format!(
		"You are given the aggregated records for a single session in chronological batches. \
		Answer the user's question using only this context and what has been established in the \
		conversation so far. If the answer cannot be derived, say that the information is not \
		available. Highlight batch numbers when they clarify the answer.\n\nSession ID: \
		{session_id}\nQuestion: {question}\n\n{history_section}Context:\n{document_text}"
	)
}

fn render_history(history: &[ChatTurn]) -> Option<String> {
	let lines: Vec<String> = history
		.iter()
		.filter(|turn| !turn.content.trim().is_empty())
		.map(|turn| {
			let label = match turn.role.as_str() {
				"user" => "User",
				"assistant" => "Assistant",
				other => other,
			};

			format!("{label}: {}", turn.content.trim())
		})
		.collect();

	if lines.is_empty() { None } else { Some(lines.join("\n")) }
}

use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	#[serde(default)]
	pub lookup: Lookup,
	pub providers: Providers,
	#[serde(default)]
	pub context: Context,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub mongo: Mongo,
}

#[derive(Debug, Deserialize)]
pub struct Mongo {
	pub uri: String,
	pub database: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Lookup {
	/// Field names checked for the session identifier in every collection.
	#[serde(default = "default_session_id_fields")]
	pub session_id_fields: Vec<String>,
	/// Explicit collection allow-list. Empty means every discovered
	/// collection outside the `system.` namespace.
	#[serde(default)]
	pub collections: Vec<String>,
	#[serde(default = "default_fallback_scan")]
	pub fallback_scan: bool,
	/// Per-collection ceiling on documents inspected by the fallback scan.
	#[serde(default = "default_fallback_scan_limit")]
	pub fallback_scan_limit: u64,
	#[serde(default = "default_max_concurrent_collections")]
	pub max_concurrent_collections: usize,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub llm: LlmProviderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub temperature: f32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Context {
	/// Maximum total rendered-text length handed to the model.
	#[serde(default = "default_max_chars")]
	pub max_chars: usize,
	#[serde(default = "default_event_preview_items")]
	pub event_preview_items: usize,
	#[serde(default = "default_event_preview_chars")]
	pub event_preview_chars: usize,
}

impl Default for Lookup {
	fn default() -> Self {
		Self {
			session_id_fields: default_session_id_fields(),
			collections: Vec::new(),
			fallback_scan: default_fallback_scan(),
			fallback_scan_limit: default_fallback_scan_limit(),
			max_concurrent_collections: default_max_concurrent_collections(),
		}
	}
}

impl Default for Context {
	fn default() -> Self {
		Self {
			max_chars: default_max_chars(),
			event_preview_items: default_event_preview_items(),
			event_preview_chars: default_event_preview_chars(),
		}
	}
}

fn default_session_id_fields() -> Vec<String> {
	vec!["sessionId".to_string()]
}

fn default_fallback_scan() -> bool {
	true
}

fn default_fallback_scan_limit() -> u64 {
	200
}

fn default_max_concurrent_collections() -> usize {
	4
}

fn default_max_chars() -> usize {
	12_000
}

fn default_event_preview_items() -> usize {
	5
}

fn default_event_preview_chars() -> usize {
	160
}

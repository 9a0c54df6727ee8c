mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Context, Lookup, LlmProviderConfig, Mongo, Providers, Service, Storage};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.storage.mongo.uri.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.mongo.uri must be non-empty.".to_string(),
		});
	}
	if cfg.storage.mongo.database.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.mongo.database must be non-empty.".to_string(),
		});
	}
	if cfg.lookup.fallback_scan && cfg.lookup.fallback_scan_limit == 0 {
		return Err(Error::Validation {
			message: "lookup.fallback_scan_limit must be greater than zero when the fallback scan is enabled."
				.to_string(),
		});
	}
	if cfg.lookup.max_concurrent_collections == 0 {
		return Err(Error::Validation {
			message: "lookup.max_concurrent_collections must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.llm.api_key.trim().is_empty() {
		return Err(Error::Validation {
			message: "providers.llm.api_key must be non-empty.".to_string(),
		});
	}
	if cfg.providers.llm.model.trim().is_empty() {
		return Err(Error::Validation {
			message: "providers.llm.model must be non-empty.".to_string(),
		});
	}
	if cfg.providers.llm.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "providers.llm.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.context.max_chars == 0 {
		return Err(Error::Validation {
			message: "context.max_chars must be greater than zero.".to_string(),
		});
	}
	if cfg.context.event_preview_items == 0 {
		return Err(Error::Validation {
			message: "context.event_preview_items must be greater than zero.".to_string(),
		});
	}
	if cfg.context.event_preview_chars == 0 {
		return Err(Error::Validation {
			message: "context.event_preview_chars must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.lookup.session_id_fields = cfg
		.lookup
		.session_id_fields
		.iter()
		.map(|field| field.trim().to_string())
		.filter(|field| !field.is_empty())
		.collect();

	if cfg.lookup.session_id_fields.is_empty() {
		cfg.lookup.session_id_fields = vec!["sessionId".to_string()];
	}

	cfg.lookup.collections = cfg
		.lookup
		.collections
		.iter()
		.map(|name| name.trim().to_string())
		.filter(|name| !name.is_empty())
		.collect();
}

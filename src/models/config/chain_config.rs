//! Chain configuration loading and validation.
//!
//! Implements the ConfigLoader trait for [`ChainDescriptor`], one JSON file per chain.

use std::{collections::HashMap, path::Path};

use crate::models::{config::error::ConfigError, ChainDescriptor, ConfigLoader};

/// Default directory scanned for chain descriptors
pub const DEFAULT_CHAIN_CONFIG_DIR: &str = "config/chains";

fn normalize_string(input: &str) -> String {
	input.trim().to_lowercase()
}

fn path_metadata(path: &Path) -> Option<HashMap<String, String>> {
	Some(HashMap::from([(
		"path".to_string(),
		path.display().to_string(),
	)]))
}

impl ConfigLoader for ChainDescriptor {
	/// Load all chain configurations from a directory
	///
	/// Every `.json` file in the directory must parse and validate; a single bad
	/// file fails the whole load so a misconfigured chain is never silently skipped.
	fn load_all<T>(path: Option<&Path>) -> Result<T, ConfigError>
	where
		T: FromIterator<(String, Self)>,
	{
		let chain_dir = path.unwrap_or(Path::new(DEFAULT_CHAIN_CONFIG_DIR));
		let mut pairs: Vec<(String, Self)> = Vec::new();

		if !chain_dir.exists() {
			return Err(ConfigError::file_error(
				"chains directory not found",
				None,
				path_metadata(chain_dir),
			));
		}

		let entries = std::fs::read_dir(chain_dir).map_err(|e| {
			ConfigError::file_error(
				format!("failed to read chains directory: {}", e),
				Some(Box::new(e)),
				path_metadata(chain_dir),
			)
		})?;

		// Sorted so duplicate detection reports the same file on every run
		let mut paths = Vec::new();
		for entry in entries {
			let entry = entry.map_err(|e| {
				ConfigError::file_error(
					format!("failed to read directory entry: {}", e),
					Some(Box::new(e)),
					path_metadata(chain_dir),
				)
			})?;
			paths.push(entry.path());
		}
		paths.sort();

		for path in paths {
			if !Self::is_json_file(&path) {
				continue;
			}

			let name = path
				.file_stem()
				.and_then(|s| s.to_str())
				.unwrap_or("unknown")
				.to_string();

			let chain = Self::load_from_path(&path)?;

			let existing: Vec<&ChainDescriptor> = pairs.iter().map(|(_, chain)| chain).collect();
			Self::validate_uniqueness(&existing, &chain, &path.display().to_string())?;

			pairs.push((name, chain));
		}

		Ok(T::from_iter(pairs))
	}

	fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
		let file = std::fs::File::open(path).map_err(|e| {
			ConfigError::file_error(
				format!("failed to open chain config file: {}", e),
				Some(Box::new(e)),
				path_metadata(path),
			)
		})?;

		let config: ChainDescriptor = serde_json::from_reader(file).map_err(|e| {
			ConfigError::parse_error(
				format!("failed to parse chain config: {}", e),
				Some(Box::new(e)),
				path_metadata(path),
			)
		})?;

		config.validate()?;

		Ok(config)
	}

	fn validate(&self) -> Result<(), ConfigError> {
		if self.chain_id == 0 {
			return Err(ConfigError::validation_error(
				"chain_id must be greater than 0",
				None,
				None,
			));
		}

		if self.name.trim().is_empty() {
			return Err(ConfigError::validation_error(
				"Name is required",
				None,
				None,
			));
		}

		if self.slug.is_empty()
			|| !self
				.slug
				.chars()
				.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
		{
			return Err(ConfigError::validation_error(
				"Slug must contain only lowercase letters, numbers, and underscores",
				None,
				None,
			));
		}

		let supported_types = ["rpc"];
		if !self
			.rpc_urls
			.iter()
			.all(|rpc_url| supported_types.contains(&rpc_url.type_.as_str()))
		{
			return Err(ConfigError::validation_error(
				format!(
					"RPC URL type must be one of: {}",
					supported_types.join(", ")
				),
				None,
				None,
			));
		}

		for rpc_url in &self.rpc_urls {
			let parsed = url::Url::parse(&rpc_url.url).map_err(|e| {
				ConfigError::validation_error(
					format!("Invalid RPC URL: {}", rpc_url.url),
					Some(Box::new(e)),
					None,
				)
			})?;
			if parsed.scheme() != "http" && parsed.scheme() != "https" {
				return Err(ConfigError::validation_error(
					"All RPC URLs must start with http:// or https://",
					None,
					None,
				));
			}
		}

		if !self.rpc_urls.iter().all(|rpc_url| rpc_url.weight <= 100) {
			return Err(ConfigError::validation_error(
				"All RPC URL weights must be between 0 and 100",
				None,
				None,
			));
		}

		if self.active_rpc_urls().is_empty() {
			return Err(ConfigError::validation_error(
				"At least one RPC URL with a weight above 0 is required",
				None,
				None,
			));
		}

		if self.polling_interval_ms == 0 || self.polling_interval_ms >= 1000 {
			return Err(ConfigError::validation_error(
				"polling_interval_ms must be between 1 and 999",
				None,
				None,
			));
		}

		if self.max_concurrent_receipts == 0 {
			return Err(ConfigError::validation_error(
				"max_concurrent_receipts must be greater than 0",
				None,
				None,
			));
		}

		Ok(())
	}

	fn validate_uniqueness(
		instances: &[&Self],
		current_instance: &Self,
		file_path: &str,
	) -> Result<(), ConfigError> {
		if instances
			.iter()
			.any(|existing| existing.chain_id == current_instance.chain_id)
		{
			return Err(ConfigError::validation_error(
				format!("Duplicate chain_id found: '{}'", current_instance.chain_id),
				None,
				Some(HashMap::from([
					("chain_id".to_string(), current_instance.chain_id.to_string()),
					("path".to_string(), file_path.to_string()),
				])),
			));
		}

		let fields = [
			("name", &current_instance.name),
			("slug", &current_instance.slug),
		];

		for (field_name, field_value) in fields {
			if instances.iter().any(|existing| {
				let existing_value = match field_name {
					"name" => &existing.name,
					_ => &existing.slug,
				};
				normalize_string(existing_value) == normalize_string(field_value)
			}) {
				return Err(ConfigError::validation_error(
					format!("Duplicate chain {} found: '{}'", field_name, field_value),
					None,
					Some(HashMap::from([
						(format!("chain_{}", field_name), field_value.to_string()),
						("path".to_string(), file_path.to_string()),
					])),
				));
			}
		}
		Ok(())
	}
}

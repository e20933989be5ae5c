//! Configuration loading and validation.
//!
//! Chain descriptors are read from a directory of JSON files once at startup.

#![allow(clippy::result_large_err)]

use std::path::Path;

mod chain_config;
mod error;

pub use error::ConfigError;

/// Common interface for loading configuration files
pub trait ConfigLoader: Sized {
	/// Load all configuration files from a directory
	///
	/// If no path is provided, uses the default config directory.
	fn load_all<T>(path: Option<&Path>) -> Result<T, ConfigError>
	where
		T: FromIterator<(String, Self)>;

	/// Load configuration from a specific file path
	fn load_from_path(path: &Path) -> Result<Self, ConfigError>;

	/// Validate the configuration
	fn validate(&self) -> Result<(), ConfigError>;

	/// Check if a file is a JSON file based on extension
	fn is_json_file(path: &Path) -> bool {
		path.extension()
			.map(|ext| ext.to_string_lossy().to_lowercase() == "json")
			.unwrap_or(false)
	}

	/// Validate that `current_instance` does not collide with any already loaded instance
	fn validate_uniqueness(
		instances: &[&Self],
		current_instance: &Self,
		file_path: &str,
	) -> Result<(), ConfigError>;
}

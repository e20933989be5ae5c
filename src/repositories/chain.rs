//! Chain configuration repository implementation.
//!
//! Holds the static set of supported chains, keyed by chain id. The set is
//! loaded once at startup and never changes afterwards.

#![allow(clippy::result_large_err)]

use std::{collections::HashMap, path::Path};

use crate::{
	models::{ChainDescriptor, ConfigLoader},
	repositories::error::RepositoryError,
};

/// Repository for storing and retrieving chain configurations
#[derive(Clone, Debug, Default)]
pub struct ChainRepository {
	/// Map of chain ids to their configurations
	pub chains: HashMap<u64, ChainDescriptor>,
}

impl ChainRepository {
	/// Builds a repository from descriptors that were already loaded elsewhere
	pub fn from_chains(chains: impl IntoIterator<Item = ChainDescriptor>) -> Self {
		Self {
			chains: chains
				.into_iter()
				.map(|chain| (chain.chain_id, chain))
				.collect(),
		}
	}
}

/// Interface for chain repository implementations
pub trait ChainRepositoryTrait: Clone + Send + Sync {
	/// Create a new repository instance from a config directory
	fn new(path: Option<&Path>) -> Result<Self, RepositoryError>
	where
		Self: Sized;

	/// Load all chain configurations from the given path, keyed by chain id
	fn load_all(path: Option<&Path>) -> Result<HashMap<u64, ChainDescriptor>, RepositoryError>;

	/// Get a specific chain by id
	fn get(&self, chain_id: u64) -> Option<ChainDescriptor>;

	/// Get all chains
	fn get_all(&self) -> HashMap<u64, ChainDescriptor>;
}

impl ChainRepositoryTrait for ChainRepository {
	fn new(path: Option<&Path>) -> Result<Self, RepositoryError> {
		let chains = Self::load_all(path)?;
		Ok(ChainRepository { chains })
	}

	fn load_all(path: Option<&Path>) -> Result<HashMap<u64, ChainDescriptor>, RepositoryError> {
		let by_file: HashMap<String, ChainDescriptor> =
			ChainDescriptor::load_all(path).map_err(|e| {
				RepositoryError::load_error(
					"Failed to load chains",
					Some(Box::new(e)),
					Some(HashMap::from([(
						"path".to_string(),
						path.map_or("default".to_string(), |p| p.display().to_string()),
					)])),
				)
			})?;

		Ok(by_file
			.into_values()
			.map(|chain| (chain.chain_id, chain))
			.collect())
	}

	fn get(&self, chain_id: u64) -> Option<ChainDescriptor> {
		self.chains.get(&chain_id).cloned()
	}

	fn get_all(&self) -> HashMap<u64, ChainDescriptor> {
		self.chains.clone()
	}
}

/// Service layer for chain repository operations
#[derive(Clone)]
pub struct ChainService<T: ChainRepositoryTrait> {
	repository: T,
}

impl<T: ChainRepositoryTrait> ChainService<T> {
	/// Create a chain service backed by a freshly loaded repository
	pub fn new(path: Option<&Path>) -> Result<ChainService<T>, RepositoryError> {
		let repository = T::new(path)?;
		Ok(ChainService { repository })
	}

	pub fn new_with_repository(repository: T) -> Self {
		ChainService { repository }
	}

	pub fn get(&self, chain_id: u64) -> Option<ChainDescriptor> {
		self.repository.get(chain_id)
	}

	pub fn get_all(&self) -> HashMap<u64, ChainDescriptor> {
		self.repository.get_all()
	}

	/// Supported chain ids in ascending order
	pub fn chain_ids(&self) -> Vec<u64> {
		let mut ids: Vec<u64> = self.repository.get_all().into_keys().collect();
		ids.sort_unstable();
		ids
	}
}

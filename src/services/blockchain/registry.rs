//! Chain client registry.
//!
//! Hands out one long-lived client per supported chain id:
//! - Clients are created lazily on first request and cached for the process lifetime
//! - Requests for a chain id outside the configured set fail with
//!   [`BlockChainError::UnsupportedChain`]
//!
//! Lookups take a read lock on the fast path. The slow path takes the write lock and
//! re-checks the cache before creating, so concurrent first requests for the same chain
//! still end up sharing a single client.

use async_trait::async_trait;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;

use crate::{
	models::ChainDescriptor,
	services::blockchain::{BlockChainError, ChainClient, EvmClient},
};

/// Builds a client for a chain descriptor
///
/// Implementations must not perform network I/O; connection happens on first use.
pub trait ChainClientFactory: Send + Sync {
	fn create(&self, chain: &ChainDescriptor) -> Result<Arc<dyn ChainClient>, BlockChainError>;
}

/// Default factory producing HTTP JSON-RPC EVM clients
#[derive(Clone, Copy, Debug, Default)]
pub struct EvmClientFactory;

impl ChainClientFactory for EvmClientFactory {
	fn create(&self, chain: &ChainDescriptor) -> Result<Arc<dyn ChainClient>, BlockChainError> {
		Ok(Arc::new(EvmClient::new(chain)?))
	}
}

/// Read side of the registry consumed by the block watch engine
#[async_trait]
pub trait ChainClientRegistryTrait: Send + Sync {
	/// Returns the cached client for `chain_id`, creating it on first use
	async fn get_client(&self, chain_id: u64) -> Result<Arc<dyn ChainClient>, BlockChainError>;

	/// All supported chains, ordered by chain id
	fn supported_chains(&self) -> Vec<ChainDescriptor>;
}

/// Caches one client per supported chain id
pub struct ChainClientRegistry<F: ChainClientFactory = EvmClientFactory> {
	chains: HashMap<u64, ChainDescriptor>,
	factory: F,
	clients: Arc<RwLock<HashMap<u64, Arc<dyn ChainClient>>>>,
}

impl ChainClientRegistry<EvmClientFactory> {
	/// Creates a registry for `chains` backed by EVM HTTP clients
	pub fn new(chains: HashMap<u64, ChainDescriptor>) -> Self {
		Self::new_with_factory(chains, EvmClientFactory)
	}
}

impl<F: ChainClientFactory> ChainClientRegistry<F> {
	pub fn new_with_factory(chains: HashMap<u64, ChainDescriptor>, factory: F) -> Self {
		Self {
			chains,
			factory,
			clients: Arc::new(RwLock::new(HashMap::new())),
		}
	}

	/// Descriptor of a supported chain
	pub fn descriptor(&self, chain_id: u64) -> Option<&ChainDescriptor> {
		self.chains.get(&chain_id)
	}

	/// Number of clients created so far
	pub async fn client_count(&self) -> usize {
		self.clients.read().await.len()
	}
}

#[async_trait]
impl<F: ChainClientFactory> ChainClientRegistryTrait for ChainClientRegistry<F> {
	async fn get_client(&self, chain_id: u64) -> Result<Arc<dyn ChainClient>, BlockChainError> {
		let chain = self
			.chains
			.get(&chain_id)
			.ok_or_else(|| BlockChainError::unsupported_chain(chain_id))?;

		if let Some(client) = self.clients.read().await.get(&chain_id) {
			return Ok(Arc::clone(client));
		}

		let mut clients = self.clients.write().await;
		if let Some(client) = clients.get(&chain_id) {
			return Ok(Arc::clone(client));
		}

		let client = self.factory.create(chain)?;
		tracing::info!(chain_id, chain = %chain.slug, "Created chain client");
		clients.insert(chain_id, Arc::clone(&client));
		Ok(client)
	}

	fn supported_chains(&self) -> Vec<ChainDescriptor> {
		let mut chains: Vec<ChainDescriptor> = self.chains.values().cloned().collect();
		chains.sort_by_key(|chain| chain.chain_id);
		chains
	}
}

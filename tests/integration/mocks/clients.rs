//! Mock implementations of chain clients.
//!
//! - [`MockChainClient`] - Mock implementation of the chain client trait
//! - [`MockChainClientFactory`] - Mock client factory for registry tests
//!
//! These mocks allow testing the registry and the block watch engine without
//! actual network connections.

use std::sync::Arc;

use alloy::primitives::B256;
use async_trait::async_trait;
use mockall::mock;

use receipt_watcher::{
	models::{ChainDescriptor, EVMBlock, EVMTransactionReceipt},
	services::blockchain::{BlockChainError, ChainClient, ChainClientFactory},
};

mock! {
	/// Mock implementation of the chain client trait.
	///
	/// Simulates block number, block and receipt responses without network calls.
	pub ChainClient {}

	#[async_trait]
	impl ChainClient for ChainClient {
		fn chain_id(&self) -> u64;
		async fn get_block_number(&self) -> Result<u64, BlockChainError>;
		async fn get_block(&self, block_number: u64) -> Result<EVMBlock, BlockChainError>;
		async fn get_transaction_receipt(
			&self,
			transaction_hash: B256,
		) -> Result<EVMTransactionReceipt, BlockChainError>;
	}
}

mock! {
	/// Mock client factory, counting how often the registry builds a client.
	pub ChainClientFactory {}

	impl ChainClientFactory for ChainClientFactory {
		fn create(&self, chain: &ChainDescriptor) -> Result<Arc<dyn ChainClient>, BlockChainError>;
	}
}

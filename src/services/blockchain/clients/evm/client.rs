//! EVM-compatible blockchain client implementation.
//!
//! Speaks the three JSON-RPC methods the watcher needs: `eth_blockNumber`,
//! `eth_getBlockByNumber` (hashes only) and `eth_getTransactionReceipt`.

use alloy::primitives::B256;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::{
	models::{ChainDescriptor, EVMBaseBlock, EVMBaseReceipt, EVMBlock, EVMTransactionReceipt},
	services::blockchain::{
		client::ChainClient,
		transports::{BlockchainTransport, EVMTransportClient},
		BlockChainError,
	},
	utils::RetryConfig,
};

/// Client for Ethereum Virtual Machine (EVM) compatible blockchains
#[derive(Clone)]
pub struct EvmClient<T: Send + Sync + Clone> {
	/// The underlying transport client for RPC communication
	http_client: T,
	chain_id: u64,
}

impl<T: Send + Sync + Clone> EvmClient<T> {
	/// Creates a new EVM client instance with a specific transport client
	pub fn new_with_transport(http_client: T, chain_id: u64) -> Self {
		Self {
			http_client,
			chain_id,
		}
	}
}

impl EvmClient<EVMTransportClient> {
	/// Creates a new EVM client for `chain`
	///
	/// No request is sent; the endpoint is first contacted by the first query.
	pub fn new(chain: &ChainDescriptor) -> Result<Self, BlockChainError> {
		let http_client = EVMTransportClient::new(chain, &RetryConfig::default())?;
		Ok(Self::new_with_transport(http_client, chain.chain_id))
	}
}

impl<T: Send + Sync + Clone + BlockchainTransport> EvmClient<T> {
	/// Sends a request and returns its `result`, which may be JSON `null`
	async fn request(
		&self,
		method: &str,
		params: Option<Vec<Value>>,
	) -> Result<Value, BlockChainError> {
		let mut response = self.http_client.send_raw_request(method, params).await?;

		if let Some(error) = response.get("error") {
			let code = error.get("code").and_then(Value::as_i64).unwrap_or_default();
			let message = error
				.get("message")
				.and_then(Value::as_str)
				.unwrap_or("unknown error");
			return Err(BlockChainError::request_error(
				format!("JSON-RPC error: {}", message),
				None,
				Some(HashMap::from([
					("method".to_string(), method.to_string()),
					("code".to_string(), code.to_string()),
					("chain_id".to_string(), self.chain_id.to_string()),
				])),
			));
		}

		match response.get_mut("result") {
			Some(result) => Ok(result.take()),
			None => Err(BlockChainError::request_error(
				"Missing 'result' field",
				None,
				Some(HashMap::from([("method".to_string(), method.to_string())])),
			)),
		}
	}
}

#[async_trait]
impl<T: Send + Sync + Clone + BlockchainTransport> ChainClient for EvmClient<T> {
	fn chain_id(&self) -> u64 {
		self.chain_id
	}

	async fn get_block_number(&self) -> Result<u64, BlockChainError> {
		let result = self.request("eth_blockNumber", None).await?;

		let hex_str = result.as_str().ok_or_else(|| {
			BlockChainError::request_error("Block number is not a string", None, None)
		})?;

		u64::from_str_radix(hex_str.trim_start_matches("0x"), 16).map_err(|e| {
			BlockChainError::request_error(
				format!("Failed to parse block number: {}", hex_str),
				Some(Box::new(e)),
				None,
			)
		})
	}

	async fn get_block(&self, block_number: u64) -> Result<EVMBlock, BlockChainError> {
		let params = vec![json!(format!("0x{:x}", block_number)), json!(false)];
		let result = self.request("eth_getBlockByNumber", Some(params)).await?;

		if result.is_null() {
			return Err(BlockChainError::block_not_found(
				format!("Block {} not found", block_number),
				None,
				Some(HashMap::from([
					("block_number".to_string(), block_number.to_string()),
					("chain_id".to_string(), self.chain_id.to_string()),
				])),
			));
		}

		let block: EVMBaseBlock = serde_json::from_value(result).map_err(|e| {
			BlockChainError::request_error(
				format!("Failed to parse block {}", block_number),
				Some(Box::new(e)),
				None,
			)
		})?;

		Ok(EVMBlock::from(block))
	}

	async fn get_transaction_receipt(
		&self,
		transaction_hash: B256,
	) -> Result<EVMTransactionReceipt, BlockChainError> {
		let params = vec![json!(format!("{:#x}", transaction_hash))];
		let result = self
			.request("eth_getTransactionReceipt", Some(params))
			.await?;

		if result.is_null() {
			return Err(BlockChainError::receipt_not_found(
				"Transaction receipt not found",
				None,
				Some(HashMap::from([
					("transaction_hash".to_string(), format!("{:#x}", transaction_hash)),
					("chain_id".to_string(), self.chain_id.to_string()),
				])),
			));
		}

		let receipt: EVMBaseReceipt = serde_json::from_value(result).map_err(|e| {
			BlockChainError::request_error(
				"Failed to parse receipt",
				Some(Box::new(e)),
				Some(HashMap::from([(
					"transaction_hash".to_string(),
					format!("{:#x}", transaction_hash),
				)])),
			)
		})?;

		Ok(EVMTransactionReceipt::from(receipt))
	}
}

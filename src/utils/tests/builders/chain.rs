//! Test helper utilities for chain configuration
//!
//! - `ChainBuilder`: Builder for creating test ChainDescriptor instances

use crate::{
	models::{ChainDescriptor, RpcUrl},
	utils::RetryConfig,
};

/// Builder for creating test ChainDescriptor instances
pub struct ChainBuilder {
	chain_id: u64,
	slug: String,
	name: String,
	rpc_urls: Vec<RpcUrl>,
	polling_interval_ms: u64,
	confirmation_blocks: u64,
	max_concurrent_receipts: usize,
	receipt_retry: Option<RetryConfig>,
}

impl Default for ChainBuilder {
	fn default() -> Self {
		Self {
			chain_id: 31337,
			slug: "anvil".to_string(),
			name: "Anvil".to_string(),
			rpc_urls: vec![RpcUrl {
				type_: "rpc".to_string(),
				url: "http://localhost:8545".to_string(),
				weight: 100,
			}],
			polling_interval_ms: 250,
			confirmation_blocks: 0,
			max_concurrent_receipts: 16,
			receipt_retry: None,
		}
	}
}

impl ChainBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn chain_id(mut self, chain_id: u64) -> Self {
		self.chain_id = chain_id;
		self
	}

	pub fn slug(mut self, slug: &str) -> Self {
		self.slug = slug.to_string();
		self
	}

	pub fn name(mut self, name: &str) -> Self {
		self.name = name.to_string();
		self
	}

	/// Replaces the endpoint list with `urls`, all of type "rpc" and weight 100
	pub fn rpc_urls(mut self, urls: Vec<&str>) -> Self {
		self.rpc_urls = urls
			.into_iter()
			.map(|url| RpcUrl {
				type_: "rpc".to_string(),
				url: url.to_string(),
				weight: 100,
			})
			.collect();
		self
	}

	pub fn add_rpc_url(mut self, url: &str, type_: &str, weight: u32) -> Self {
		self.rpc_urls.push(RpcUrl {
			type_: type_.to_string(),
			url: url.to_string(),
			weight,
		});
		self
	}

	pub fn clear_rpc_urls(mut self) -> Self {
		self.rpc_urls.clear();
		self
	}

	pub fn polling_interval_ms(mut self, interval: u64) -> Self {
		self.polling_interval_ms = interval;
		self
	}

	pub fn confirmation_blocks(mut self, blocks: u64) -> Self {
		self.confirmation_blocks = blocks;
		self
	}

	pub fn max_concurrent_receipts(mut self, limit: usize) -> Self {
		self.max_concurrent_receipts = limit;
		self
	}

	pub fn receipt_retry(mut self, retry: RetryConfig) -> Self {
		self.receipt_retry = Some(retry);
		self
	}

	pub fn build(self) -> ChainDescriptor {
		ChainDescriptor {
			chain_id: self.chain_id,
			slug: self.slug,
			name: self.name,
			rpc_urls: self.rpc_urls,
			polling_interval_ms: self.polling_interval_ms,
			confirmation_blocks: self.confirmation_blocks,
			max_concurrent_receipts: self.max_concurrent_receipts,
			receipt_retry: self.receipt_retry,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_chain() {
		let chain = ChainBuilder::new().build();

		assert_eq!(chain.chain_id, 31337);
		assert_eq!(chain.slug, "anvil");
		assert_eq!(chain.rpc_urls.len(), 1);
		assert_eq!(chain.rpc_urls[0].url, "http://localhost:8545");
		assert!(chain.receipt_retry.is_none());
	}

	#[test]
	fn test_active_rpc_urls_sorted_by_weight() {
		let chain = ChainBuilder::new()
			.clear_rpc_urls()
			.add_rpc_url("http://low", "rpc", 10)
			.add_rpc_url("http://off", "rpc", 0)
			.add_rpc_url("http://high", "rpc", 90)
			.build();

		let urls: Vec<&str> = chain
			.active_rpc_urls()
			.iter()
			.map(|rpc_url| rpc_url.url.as_str())
			.collect();

		assert_eq!(urls, vec!["http://high", "http://low"]);
	}
}

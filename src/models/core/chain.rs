use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::utils::RetryConfig;

/// Polling interval used when a descriptor does not set one
pub const DEFAULT_POLLING_INTERVAL_MS: u64 = 250;

/// Receipt fetches allowed in flight per chain when a descriptor does not set a limit
pub const DEFAULT_MAX_CONCURRENT_RECEIPTS: usize = 16;

fn default_polling_interval_ms() -> u64 {
	DEFAULT_POLLING_INTERVAL_MS
}

fn default_max_concurrent_receipts() -> usize {
	DEFAULT_MAX_CONCURRENT_RECEIPTS
}

/// RPC endpoint of a chain
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RpcUrl {
	/// Endpoint kind, currently only "rpc"
	pub type_: String,
	pub url: String,
	/// Selection priority between 0 and 100; 0 disables the endpoint
	pub weight: u32,
}

/// A supported chain, loaded once at startup and immutable afterwards
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ChainDescriptor {
	/// Numeric chain identifier (EIP-155)
	pub chain_id: u64,
	/// Short lowercase identifier used in logs
	pub slug: String,
	/// Display name
	pub name: String,
	pub rpc_urls: Vec<RpcUrl>,
	/// Block number polling interval, must be sub-second
	#[serde(default = "default_polling_interval_ms")]
	pub polling_interval_ms: u64,
	/// Blocks to stay behind the chain head before processing
	#[serde(default)]
	pub confirmation_blocks: u64,
	/// Upper bound on concurrent receipt fetches for this chain
	#[serde(default = "default_max_concurrent_receipts")]
	pub max_concurrent_receipts: usize,
	/// Backoff for failed receipt fetches; `None` drops a receipt after one failed attempt
	#[serde(default)]
	pub receipt_retry: Option<RetryConfig>,
}

impl ChainDescriptor {
	pub fn polling_interval(&self) -> Duration {
		Duration::from_millis(self.polling_interval_ms)
	}

	/// Enabled RPC endpoints ordered by descending weight
	pub fn active_rpc_urls(&self) -> Vec<&RpcUrl> {
		let mut urls: Vec<&RpcUrl> = self
			.rpc_urls
			.iter()
			.filter(|rpc_url| rpc_url.type_ == "rpc" && rpc_url.weight > 0)
			.collect();
		urls.sort_by(|a, b| b.weight.cmp(&a.weight));
		urls
	}
}

//! EVM block data structures.

use alloy::primitives::{B256, U64};
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// Block header as returned by `eth_getBlockByNumber` with `full = false`
///
/// Only the fields the watcher reads are modelled; unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BaseBlock {
	/// Block number, `None` for pending blocks
	pub number: Option<U64>,
	/// Block hash, `None` for pending blocks
	pub hash: Option<B256>,
	/// Hash of the parent block
	#[serde(rename = "parentHash", default)]
	pub parent_hash: B256,
	/// Unix timestamp of the block
	#[serde(default)]
	pub timestamp: U64,
	/// Transaction hashes in block order
	#[serde(default)]
	pub transactions: Vec<B256>,
}

/// Wrapper around [`BaseBlock`] with convenience accessors
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block(pub BaseBlock);

impl Block {
	/// Returns the block number as an `Option<u64>`.
	pub fn number(&self) -> Option<u64> {
		self.0.number.map(|n| n.to::<u64>())
	}

	/// Transaction hashes contained in the block, in their in-block order
	pub fn transaction_hashes(&self) -> &[B256] {
		&self.0.transactions
	}
}

impl From<BaseBlock> for Block {
	fn from(block: BaseBlock) -> Self {
		Self(block)
	}
}

impl Deref for Block {
	type Target = BaseBlock;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

//! EVM receipt data structures.

use alloy::primitives::{Address, Bytes, B256, U256, U64};
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// Receipt fields as returned by `eth_getTransactionReceipt`
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseReceipt {
	/// Transaction hash.
	#[serde(rename = "transactionHash")]
	pub transaction_hash: B256,
	/// Index within the block.
	#[serde(rename = "transactionIndex", default)]
	pub transaction_index: U64,
	/// Hash of the block this transaction was included within.
	#[serde(rename = "blockHash", default)]
	pub block_hash: Option<B256>,
	/// Number of the block this transaction was included within.
	#[serde(rename = "blockNumber", default)]
	pub block_number: Option<U64>,
	/// Sender
	#[serde(default)]
	pub from: Address,
	/// Recipient (None when contract creation)
	#[serde(default)]
	pub to: Option<Address>,
	/// Cumulative gas used within the block after this was executed.
	#[serde(rename = "cumulativeGasUsed", default)]
	pub cumulative_gas_used: U256,
	/// Gas used by this transaction alone.
	#[serde(rename = "gasUsed", default)]
	pub gas_used: Option<U256>,
	/// Contract address created, or `None` if not a deployment.
	#[serde(rename = "contractAddress", default)]
	pub contract_address: Option<Address>,
	/// Logs generated within this transaction.
	#[serde(default)]
	pub logs: Vec<BaseLog>,
	/// Status: either 1 (success) or 0 (failure). Absent on pre-Byzantium chains.
	#[serde(default)]
	pub status: Option<U64>,
	/// Transaction type, None for legacy nodes that omit it
	#[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
	pub transaction_type: Option<U64>,
	/// Effective gas price
	#[serde(rename = "effectiveGasPrice", default)]
	pub effective_gas_price: Option<U256>,
}

/// Log entry attached to a receipt
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BaseLog {
	pub address: Address,
	#[serde(default)]
	pub topics: Vec<B256>,
	#[serde(default)]
	pub data: Bytes,
	#[serde(rename = "logIndex", default)]
	pub log_index: Option<U256>,
	#[serde(default)]
	pub removed: Option<bool>,
}

/// Wrapper around [`BaseReceipt`] with convenience accessors
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionReceipt(pub BaseReceipt);

impl TransactionReceipt {
	/// Block number the receipt belongs to
	pub fn block_number(&self) -> Option<u64> {
		self.0.block_number.map(|n| n.to::<u64>())
	}

	/// `Some(true)` when the transaction succeeded, `None` when the node did not report status
	pub fn succeeded(&self) -> Option<bool> {
		self.0.status.map(|status| status == U64::from(1))
	}
}

impl From<BaseReceipt> for TransactionReceipt {
	fn from(receipt: BaseReceipt) -> Self {
		Self(receipt)
	}
}

impl Deref for TransactionReceipt {
	type Target = BaseReceipt;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

//! Test helper utilities for EVM receipts
//!
//! - `ReceiptBuilder`: Builder for creating test EVMTransactionReceipt instances

use alloy::primitives::{Address, B256, U256, U64};

use crate::models::{EVMBaseReceipt, EVMTransactionReceipt};

/// Builder for creating test EVMTransactionReceipt instances
pub struct ReceiptBuilder {
	transaction_hash: B256,
	block_number: Option<u64>,
	status: Option<u64>,
	from: Address,
	to: Option<Address>,
	gas_used: Option<U256>,
}

impl Default for ReceiptBuilder {
	fn default() -> Self {
		Self {
			transaction_hash: B256::ZERO,
			block_number: None,
			status: Some(1),
			from: Address::ZERO,
			to: None,
			gas_used: Some(U256::from(21_000u64)),
		}
	}
}

impl ReceiptBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn transaction_hash(mut self, hash: B256) -> Self {
		self.transaction_hash = hash;
		self
	}

	pub fn block_number(mut self, number: u64) -> Self {
		self.block_number = Some(number);
		self
	}

	pub fn status(mut self, status: bool) -> Self {
		self.status = Some(u64::from(status));
		self
	}

	pub fn sender(mut self, from: Address) -> Self {
		self.from = from;
		self
	}

	pub fn recipient(mut self, to: Address) -> Self {
		self.to = Some(to);
		self
	}

	pub fn build(self) -> EVMTransactionReceipt {
		EVMTransactionReceipt(EVMBaseReceipt {
			transaction_hash: self.transaction_hash,
			block_number: self.block_number.map(U64::from),
			status: self.status.map(U64::from),
			from: self.from,
			to: self.to,
			gas_used: self.gas_used,
			cumulative_gas_used: self.gas_used.unwrap_or_default(),
			..Default::default()
		})
	}
}

use serde::{Deserialize, Serialize};

use crate::models::EVMTransactionReceipt;

/// A resolved receipt tagged with the chain it was observed on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionReceiptEvent {
	pub chain_id: u64,
	pub receipt: EVMTransactionReceipt,
}

//! Ethereum Virtual Machine (EVM) blockchain specific implementations.
//!
//! Blocks are read header-only (transaction hashes), receipts are read one at a time.

mod block;
mod receipt;

pub use block::{BaseBlock as EVMBaseBlock, Block as EVMBlock};
pub use receipt::{
	BaseLog as EVMReceiptLog, BaseReceipt as EVMBaseReceipt,
	TransactionReceipt as EVMTransactionReceipt,
};

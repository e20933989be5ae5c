//! Domain models and data structures for block watching.
//!
//! - `blockchain`: EVM block and receipt shapes
//! - `config`: Configuration loading and validation
//! - `core`: Core domain models (ChainDescriptor, TransactionReceiptEvent)

mod blockchain;
mod config;
mod core;

pub use blockchain::evm::{
	EVMBaseBlock, EVMBaseReceipt, EVMBlock, EVMReceiptLog, EVMTransactionReceipt,
};

pub use core::{
	ChainDescriptor, RpcUrl, TransactionReceiptEvent, DEFAULT_MAX_CONCURRENT_RECEIPTS,
	DEFAULT_POLLING_INTERVAL_MS,
};

pub use config::{ConfigError, ConfigLoader};

//! Core domain models for the receipt watcher.
//!
//! - Chains: supported network definitions and connection details
//! - Events: what subscribers receive once a receipt resolves

mod chain;
mod event;

pub use chain::{
	ChainDescriptor, RpcUrl, DEFAULT_MAX_CONCURRENT_RECEIPTS, DEFAULT_POLLING_INTERVAL_MS,
};
pub use event::TransactionReceiptEvent;

//! Bootstrap module for initializing services and creating handlers.
//!
//! Wires the loaded chain configuration into a client registry and a block watch
//! engine, and provides the default receipt subscriber used by the binary.
//!
//! # Services
//! - `ChainService`: Static set of supported chains
//! - `ChainClientRegistry`: One lazily created client per chain
//! - `BlockWatchService`: Per-chain watchers publishing resolved receipts
//!
//! # Handlers
//! - `create_receipt_logger`: Logs every resolved receipt

use std::{error::Error, path::Path, sync::Arc};

use crate::{
	models::TransactionReceiptEvent,
	repositories::{ChainRepositoryTrait, ChainService},
	services::{
		blockchain::ChainClientRegistry,
		blockwatcher::BlockWatchService,
		notification::{SubscriberFailure, SubscriptionCallback},
	},
};

/// Type alias for handling ServiceResult
pub type Result<T> = std::result::Result<T, Box<dyn Error>>;

/// Block watch engine backed by the default EVM client registry
pub type DefaultBlockWatchService = BlockWatchService<ChainClientRegistry>;

type ServiceResult<T> = Result<(
	ChainService<T>,
	Arc<ChainClientRegistry>,
	DefaultBlockWatchService,
)>;

/// Initializes all required services for the block watcher.
///
/// Uses `chain_service` when given, otherwise loads the chain configuration from
/// `config_dir` (or the default directory). Nothing is started and no endpoint is
/// contacted.
///
/// # Errors
/// Returns an error if the chain configuration cannot be loaded
pub fn initialize_services<T: ChainRepositoryTrait>(
	chain_service: Option<ChainService<T>>,
	config_dir: Option<&Path>,
) -> ServiceResult<T> {
	let chain_service = match chain_service {
		Some(service) => service,
		None => ChainService::<T>::new(config_dir)?,
	};

	let chains = chain_service.get_all();
	tracing::info!(chains = ?chain_service.chain_ids(), "Loaded chain configuration");

	let registry = Arc::new(ChainClientRegistry::new(chains));
	let block_watcher = BlockWatchService::new(Arc::clone(&registry));

	Ok((chain_service, registry, block_watcher))
}

/// Creates a subscriber that logs every resolved receipt at info level
pub fn create_receipt_logger() -> SubscriptionCallback<TransactionReceiptEvent> {
	Arc::new(
		|event: &TransactionReceiptEvent| -> std::result::Result<(), SubscriberFailure> {
			let status = match event.receipt.succeeded() {
				Some(true) => "success",
				Some(false) => "reverted",
				None => "unknown",
			};
			tracing::info!(
				chain_id = event.chain_id,
				transaction_hash = %event.receipt.transaction_hash,
				block_number = ?event.receipt.block_number(),
				status,
				"Transaction receipt"
			);
			Ok(())
		},
	)
}

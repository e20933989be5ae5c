//! Receipt watcher service entry point.
//!
//! This binary follows the head of every configured chain and logs the receipt of
//! each transaction it sees. It loads the chain configuration, starts one watcher
//! per chain and shuts down gracefully on interrupt signals.
//!
//! # Flow
//! 1. Loads environment variables and chain configurations
//! 2. Sets up logging
//! 3. Starts a block watcher for every configured chain
//! 4. Logs resolved receipts as they arrive
//! 5. Stops watchers and drains in-flight receipt fetches on Ctrl+C

use receipt_watcher::{
	bootstrap::{create_receipt_logger, initialize_services, Result},
	repositories::ChainRepository,
	utils::logging::setup_logging,
};

use clap::{Arg, ArgAction, Command};
use dotenvy::dotenv;
use std::path::PathBuf;
use tracing::{error, info};

/// Main entry point for the receipt watcher service.
///
/// # Errors
/// Returns an error if the configuration cannot be loaded or the watchers fail to start.
#[tokio::main]
async fn main() -> Result<()> {
	// Load environment variables from .env file before reading env-backed arguments
	dotenv().ok();

	let matches = Command::new("receipt-watcher")
		.version(env!("CARGO_PKG_VERSION"))
		.about(
			"Follows the head of configured EVM chains and publishes the receipt of every \
			 transaction in each new block.",
		)
		.arg(
			Arg::new("config-dir")
				.long("config-dir")
				.env("CHAIN_CONFIG_DIR")
				.help("Directory containing chain configuration files (default: config/chains)")
				.value_name("PATH"),
		)
		.arg(
			Arg::new("log-level")
				.long("log-level")
				.help("Set log level (trace, debug, info, warn, error)")
				.value_name("LEVEL"),
		)
		.arg(
			Arg::new("check")
				.long("check")
				.help("Validate the chain configuration and exit")
				.action(ArgAction::SetTrue),
		)
		.get_matches();

	setup_logging(matches.get_one::<String>("log-level").map(String::as_str)).unwrap_or_else(
		|e| {
			eprintln!("Failed to setup logging: {}", e);
		},
	);

	let config_dir = matches.get_one::<String>("config-dir").map(PathBuf::from);
	let (chain_service, _registry, block_watcher) =
		initialize_services::<ChainRepository>(None, config_dir.as_deref())
			.map_err(|e| anyhow::anyhow!("Failed to initialize services: {}", e))?;

	if matches.get_flag("check") {
		info!(chains = ?chain_service.chain_ids(), "Chain configuration is valid");
		return Ok(());
	}

	if chain_service.get_all().is_empty() {
		info!("No chains configured. Exiting...");
		return Ok(());
	}

	let _receipt_logger = block_watcher.subscribe_to_transaction_receipt(create_receipt_logger());
	block_watcher.start().await?;

	info!("Service started. Press Ctrl+C to shutdown");
	if let Err(e) = tokio::signal::ctrl_c().await {
		error!("Error waiting for Ctrl+C: {}", e);
	}
	info!("Shutdown signal received, stopping services...");

	if let Err(e) = block_watcher.stop().await {
		error!("Error during shutdown: {}", e);
	}

	info!("Shutdown complete");
	Ok(())
}

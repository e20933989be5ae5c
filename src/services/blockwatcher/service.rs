//! Block watcher service implementation.
//!
//! Runs one watcher task per supported chain. Each task follows its chain's block
//! number feed and, on every new head, processes the blocks between its cursor
//! and the head in order: fetch the block, dispatch its transactions for receipt
//! resolution, advance the cursor. A failed block fetch ends the tick early; the
//! next tick resumes from the cursor.

use futures::StreamExt;
use std::{collections::HashMap, sync::Arc};
use tokio::{
	sync::{watch, Mutex},
	task::JoinHandle,
};
use tracing::instrument;

use crate::{
	models::{ChainDescriptor, TransactionReceiptEvent},
	services::{
		blockchain::{BlockNumberStreamExt, ChainClient, ChainClientRegistryTrait},
		blockwatcher::{
			cursor::{CursorStore, TickPlan, WatchCursor},
			dispatcher::ReceiptDispatcher,
			error::BlockWatcherError,
		},
		notification::{EventNotifier, Subscription, SubscriptionCallback},
	},
};

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
	/// The cursor was set to this block; nothing was processed
	Initialized(u64),
	/// The head was not ahead of the cursor
	Idle,
	/// Blocks `from..=to` were processed
	Processed {
		from: u64,
		to: u64,
		transactions: usize,
	},
}

/// Handles one new head for one chain
///
/// The head is lowered by the chain's `confirmation_blocks` before planning. On a
/// block fetch failure the cursor stays at the last fully dispatched block and the
/// error is returned.
#[instrument(skip_all, fields(chain_id = chain.chain_id, latest_block = latest_block))]
pub async fn process_tick(
	chain: &ChainDescriptor,
	latest_block: u64,
	client: &dyn ChainClient,
	cursors: &CursorStore,
	dispatcher: &mut ReceiptDispatcher,
) -> Result<TickOutcome, BlockWatcherError> {
	let chain_id = chain.chain_id;
	let confirmed_block = latest_block.saturating_sub(chain.confirmation_blocks);

	let (start, end) = match cursors.plan(chain_id, confirmed_block).await {
		TickPlan::Initialize(block) => {
			cursors.initialize(chain_id, block).await;
			tracing::info!(block, "Initialized watch cursor");
			return Ok(TickOutcome::Initialized(block));
		}
		TickPlan::Idle => return Ok(TickOutcome::Idle),
		TickPlan::Range(start, end) => (start, end),
	};

	let mut transactions = 0;
	for block_number in start..=end {
		let metadata = || {
			Some(HashMap::from([
				("chain_id".to_string(), chain_id.to_string()),
				("block_number".to_string(), block_number.to_string()),
			]))
		};

		let block = client.get_block(block_number).await.map_err(|e| {
			BlockWatcherError::network_error("Failed to fetch block", Some(Box::new(e)), metadata())
		})?;

		if let Some(number) = block.number().filter(|number| *number != block_number) {
			return Err(BlockWatcherError::processing_error(
				format!("Node returned block {} instead", number),
				None,
				metadata(),
			));
		}

		for transaction_hash in block.transaction_hashes() {
			dispatcher.dispatch(*transaction_hash);
		}
		transactions += block.transaction_hashes().len();

		cursors.advance(chain_id, block_number).await?;
	}

	tracing::debug!(from = start, to = end, transactions, "Processed block range");
	Ok(TickOutcome::Processed {
		from: start,
		to: end,
		transactions,
	})
}

struct RunningWatchers {
	shutdown: watch::Sender<bool>,
	handles: Vec<(u64, JoinHandle<()>)>,
}

/// Watches every supported chain and publishes resolved receipts
pub struct BlockWatchService<R: ChainClientRegistryTrait + 'static> {
	registry: Arc<R>,
	notifier: EventNotifier<TransactionReceiptEvent>,
	cursors: CursorStore,
	running: Mutex<Option<RunningWatchers>>,
}

impl<R: ChainClientRegistryTrait + 'static> BlockWatchService<R> {
	pub fn new(registry: Arc<R>) -> Self {
		Self::new_with_notifier(registry, EventNotifier::new())
	}

	/// Creates a service publishing into an existing notifier
	pub fn new_with_notifier(
		registry: Arc<R>,
		notifier: EventNotifier<TransactionReceiptEvent>,
	) -> Self {
		Self {
			registry,
			notifier,
			cursors: CursorStore::new(),
			running: Mutex::new(None),
		}
	}

	/// Registers a receiver of every resolved receipt
	///
	/// Receipts may arrive out of block order, and a receipt whose fetch failed is
	/// never delivered.
	pub fn subscribe_to_transaction_receipt(
		&self,
		callback: SubscriptionCallback<TransactionReceiptEvent>,
	) -> Subscription<TransactionReceiptEvent> {
		self.notifier.subscribe(callback)
	}

	pub fn notifier(&self) -> &EventNotifier<TransactionReceiptEvent> {
		&self.notifier
	}

	/// Current cursor of `chain_id`, `None` before its first tick
	pub async fn cursor(&self, chain_id: u64) -> Option<WatchCursor> {
		self.cursors.get(chain_id).await
	}

	pub async fn is_running(&self) -> bool {
		self.running.lock().await.is_some()
	}

	/// Starts one watcher per supported chain
	///
	/// Calling `start` on a running service does nothing. A chain whose client cannot
	/// be created is logged and skipped.
	pub async fn start(&self) -> Result<(), BlockWatcherError> {
		let mut running = self.running.lock().await;
		if running.is_some() {
			tracing::debug!("Block watcher already running");
			return Ok(());
		}

		let chains = self.registry.supported_chains();
		if chains.is_empty() {
			tracing::info!("No chains configured, block watcher has nothing to watch");
		}

		let (shutdown, shutdown_rx) = watch::channel(false);
		let mut handles = Vec::with_capacity(chains.len());

		for chain in chains {
			let client = match self.registry.get_client(chain.chain_id).await {
				Ok(client) => client,
				Err(e) => {
					BlockWatcherError::configuration_error(
						"Skipping chain without a usable client",
						Some(Box::new(e)),
						Some(HashMap::from([
							("chain_id".to_string(), chain.chain_id.to_string()),
							("chain".to_string(), chain.slug.clone()),
						])),
					);
					continue;
				}
			};

			let chain_id = chain.chain_id;
			let handle = tokio::spawn(watch_chain(
				chain,
				client,
				self.cursors.clone(),
				self.notifier.clone(),
				shutdown_rx.clone(),
			));
			handles.push((chain_id, handle));
		}

		tracing::info!(chains = handles.len(), "Block watcher started");
		*running = Some(RunningWatchers { shutdown, handles });
		Ok(())
	}

	/// Stops all watchers and waits for their in-flight receipt fetches
	///
	/// A tick in progress finishes first. Stopping a stopped service does nothing.
	pub async fn stop(&self) -> Result<(), BlockWatcherError> {
		let Some(RunningWatchers { shutdown, handles }) = self.running.lock().await.take() else {
			return Ok(());
		};

		// Receivers live in the watcher tasks; a send error only means they are gone
		let _ = shutdown.send(true);

		let mut result = Ok(());
		for (chain_id, handle) in handles {
			if let Err(e) = handle.await {
				let error = BlockWatcherError::lifecycle_error(
					"Watcher task did not shut down cleanly",
					Some(Box::new(e)),
					Some(HashMap::from([(
						"chain_id".to_string(),
						chain_id.to_string(),
					)])),
				);
				if result.is_ok() {
					result = Err(error);
				}
			}
		}

		tracing::info!("Block watcher stopped");
		result
	}
}

/// Watcher loop of one chain, until shutdown or the end of the block number feed
#[instrument(skip_all, fields(chain_id = chain.chain_id))]
async fn watch_chain(
	chain: ChainDescriptor,
	client: Arc<dyn ChainClient>,
	cursors: CursorStore,
	notifier: EventNotifier<TransactionReceiptEvent>,
	mut shutdown: watch::Receiver<bool>,
) {
	let mut dispatcher = ReceiptDispatcher::new(
		chain.chain_id,
		Arc::clone(&client),
		notifier,
		chain.max_concurrent_receipts,
		chain.receipt_retry.clone(),
	);
	let mut block_numbers = client.watch_block_numbers(chain.polling_interval());

	tracing::info!(
		chain = %chain.slug,
		polling_interval_ms = chain.polling_interval_ms,
		"Watching chain"
	);

	loop {
		tokio::select! {
			_ = shutdown.changed() => break,
			next = block_numbers.next() => match next {
				Some(Ok(latest_block)) => {
					// Errors are logged where they are created; the next tick retries
					let _ = process_tick(
						&chain,
						latest_block,
						client.as_ref(),
						&cursors,
						&mut dispatcher,
					)
					.await;
				}
				Some(Err(e)) => {
					BlockWatcherError::network_error(
						"Failed to poll block number",
						Some(Box::new(e)),
						Some(HashMap::from([(
							"chain_id".to_string(),
							chain.chain_id.to_string(),
						)])),
					);
				}
				None => {
					tracing::warn!("Block number feed ended");
					break;
				}
			},
		}
	}

	dispatcher.drain().await;
	tracing::info!("Stopped watching chain");
}

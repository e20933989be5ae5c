//! Receipt dispatching.
//!
//! Each watched chain owns one [`ReceiptDispatcher`]. Dispatching a transaction
//! spawns its receipt fetch and returns immediately, so block iteration never
//! waits on receipts. A semaphore caps the fetches in flight per chain; fetches
//! beyond the cap queue inside their task until a permit frees up.
//!
//! Receipts resolve in any order. A fetch that fails is logged and dropped,
//! after optional backoff retries.

use alloy::primitives::B256;
use backon::{ExponentialBuilder, Retryable};
use std::{collections::HashMap, sync::Arc};
use tokio::{sync::Semaphore, task::JoinSet};

use crate::{
	models::{EVMTransactionReceipt, TransactionReceiptEvent},
	services::{
		blockchain::{BlockChainError, ChainClient},
		blockwatcher::BlockWatcherError,
		notification::EventNotifier,
	},
	utils::{JitterSetting, RetryConfig},
};

/// Bounded pool of receipt fetches for one chain
pub struct ReceiptDispatcher {
	chain_id: u64,
	client: Arc<dyn ChainClient>,
	notifier: EventNotifier<TransactionReceiptEvent>,
	permits: Arc<Semaphore>,
	retry: Option<RetryConfig>,
	tasks: JoinSet<()>,
}

impl ReceiptDispatcher {
	/// Creates a dispatcher allowing `max_concurrent` fetches in flight
	///
	/// A limit of zero is raised to one. Retries are only attempted when `retry`
	/// allows at least one.
	pub fn new(
		chain_id: u64,
		client: Arc<dyn ChainClient>,
		notifier: EventNotifier<TransactionReceiptEvent>,
		max_concurrent: usize,
		retry: Option<RetryConfig>,
	) -> Self {
		Self {
			chain_id,
			client,
			notifier,
			permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
			retry: retry.filter(|config| config.max_retries > 0),
			tasks: JoinSet::new(),
		}
	}

	/// Starts resolving the receipt of `transaction_hash` in the background
	pub fn dispatch(&mut self, transaction_hash: B256) {
		self.reap_finished();

		let chain_id = self.chain_id;
		let client = Arc::clone(&self.client);
		let notifier = self.notifier.clone();
		let permits = Arc::clone(&self.permits);
		let retry = self.retry.clone();

		self.tasks.spawn(async move {
			let Ok(_permit) = permits.acquire_owned().await else {
				return;
			};

			match fetch_receipt(client.as_ref(), transaction_hash, retry.as_ref()).await {
				Ok(receipt) => notifier.notify(&TransactionReceiptEvent { chain_id, receipt }),
				Err(e) => {
					BlockWatcherError::network_error(
						"Dropping transaction receipt",
						Some(Box::new(e)),
						Some(HashMap::from([
							("chain_id".to_string(), chain_id.to_string()),
							(
								"transaction_hash".to_string(),
								format!("{:#x}", transaction_hash),
							),
						])),
					);
				}
			}
		});
	}

	/// Number of receipt fetches not yet joined, queued ones included
	pub fn in_flight(&self) -> usize {
		self.tasks.len()
	}

	/// Waits for every dispatched fetch to finish
	pub async fn drain(&mut self) {
		while let Some(result) = self.tasks.join_next().await {
			self.log_join_failure(result);
		}
	}

	/// Cancels every dispatched fetch and waits for the cancellation to land
	pub async fn abort(&mut self) {
		self.tasks.abort_all();
		while self.tasks.join_next().await.is_some() {}
	}

	fn reap_finished(&mut self) {
		while let Some(result) = self.tasks.try_join_next() {
			self.log_join_failure(result);
		}
	}

	fn log_join_failure(&self, result: Result<(), tokio::task::JoinError>) {
		if let Err(e) = result {
			if e.is_panic() {
				BlockWatcherError::processing_error(
					"Receipt task panicked",
					Some(Box::new(e)),
					Some(HashMap::from([(
						"chain_id".to_string(),
						self.chain_id.to_string(),
					)])),
				);
			}
		}
	}
}

impl Drop for ReceiptDispatcher {
	fn drop(&mut self) {
		self.tasks.abort_all();
	}
}

/// Backoff used between receipt fetch attempts
fn receipt_backoff(config: &RetryConfig) -> ExponentialBuilder {
	let backoff = ExponentialBuilder::default()
		.with_factor(config.base_for_backoff as f32)
		.with_min_delay(config.initial_backoff)
		.with_max_delay(config.max_backoff)
		.with_max_times(config.max_retries as usize);

	match config.jitter {
		JitterSetting::Full => backoff.with_jitter(),
		JitterSetting::None => backoff,
	}
}

async fn fetch_receipt(
	client: &dyn ChainClient,
	transaction_hash: B256,
	retry: Option<&RetryConfig>,
) -> Result<EVMTransactionReceipt, BlockChainError> {
	let Some(config) = retry else {
		return client.get_transaction_receipt(transaction_hash).await;
	};

	(|| async move { client.get_transaction_receipt(transaction_hash).await })
		.retry(receipt_backoff(config))
		.when(|e| !matches!(e, BlockChainError::UnsupportedChain(_)))
		.notify(|e, delay| {
			tracing::debug!(
				transaction_hash = %transaction_hash,
				delay_ms = delay.as_millis() as u64,
				error = %e,
				"Retrying receipt fetch"
			);
		})
		.await
}

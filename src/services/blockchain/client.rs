//! Core blockchain client interface.
//!
//! [`ChainClient`] is the capability set the block watch engine consumes: the
//! current head, a block by number, and a receipt by hash. The polling block
//! number feed is layered on top by [`BlockNumberStreamExt`] so every client gets
//! the same tick semantics.

use alloy::primitives::B256;
use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use std::{sync::Arc, time::Duration};
use tokio::time::{interval, Interval, MissedTickBehavior};

use crate::{
	models::{EVMBlock, EVMTransactionReceipt},
	services::blockchain::BlockChainError,
};

/// Read access to one chain's RPC endpoint
#[async_trait]
pub trait ChainClient: Send + Sync {
	/// Chain id this client was created for
	fn chain_id(&self) -> u64;

	/// Retrieves the latest block number
	async fn get_block_number(&self) -> Result<u64, BlockChainError>;

	/// Retrieves a block header with its transaction hashes
	///
	/// Fails with [`BlockChainError::BlockNotFound`] if the node does not have the block.
	async fn get_block(&self, block_number: u64) -> Result<EVMBlock, BlockChainError>;

	/// Retrieves the receipt of a mined transaction
	///
	/// Fails with [`BlockChainError::ReceiptNotFound`] if the transaction is not mined.
	async fn get_transaction_receipt(
		&self,
		transaction_hash: B256,
	) -> Result<EVMTransactionReceipt, BlockChainError>;
}

/// Polling feed of the chain head
pub trait BlockNumberStreamExt {
	/// Polls `get_block_number` every `period` and yields every result
	///
	/// An unchanged head is yielded again so a tick that failed part way is
	/// retried on the next poll. Polling errors are yielded as `Err` items and
	/// polling continues. Late ticks are delayed rather than bursted, so a slow
	/// node never sees a backlog of queued polls. The stream never ends on its own.
	fn watch_block_numbers(
		&self,
		period: Duration,
	) -> BoxStream<'static, Result<u64, BlockChainError>>;
}

impl<C> BlockNumberStreamExt for Arc<C>
where
	C: ChainClient + ?Sized + 'static,
{
	fn watch_block_numbers(
		&self,
		period: Duration,
	) -> BoxStream<'static, Result<u64, BlockChainError>> {
		let client = Arc::clone(self);
		// The ticker is created on first poll so the stream can be built outside a runtime
		stream::unfold((client, None::<Interval>), move |(client, ticker)| async move {
			let mut ticker = ticker.unwrap_or_else(|| {
				let mut ticker = interval(period);
				ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
				ticker
			});
			ticker.tick().await;
			let next = client.get_block_number().await;
			Some((next, (client, Some(ticker))))
		})
		.boxed()
	}
}

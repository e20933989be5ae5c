//! Per-chain watch cursors.
//!
//! A [`WatchCursor`] records the last block whose transactions have all been
//! dispatched. It starts uninitialized, is set to the first observed head
//! without processing it, and then only moves forward one block at a time.

use std::{collections::HashMap, sync::Arc};
use tokio::sync::Mutex;

use crate::services::blockwatcher::BlockWatcherError;

/// What a tick has to do for a given latest block number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickPlan {
	/// First tick: record the head and process nothing
	Initialize(u64),
	/// The head is not ahead of the cursor
	Idle,
	/// Process blocks `start..=end` in order
	Range(u64, u64),
}

/// Last processed block of one chain
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatchCursor {
	last_processed_block: Option<u64>,
}

impl WatchCursor {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn last_processed_block(&self) -> Option<u64> {
		self.last_processed_block
	}

	pub fn is_initialized(&self) -> bool {
		self.last_processed_block.is_some()
	}

	pub fn plan(&self, latest: u64) -> TickPlan {
		match self.last_processed_block {
			None => TickPlan::Initialize(latest),
			Some(last) if latest <= last => TickPlan::Idle,
			Some(last) => TickPlan::Range(last + 1, latest),
		}
	}

	/// Sets the starting point; ignored once the cursor is initialized
	pub fn initialize(&mut self, block: u64) -> bool {
		if self.is_initialized() {
			return false;
		}
		self.last_processed_block = Some(block);
		true
	}

	/// Marks `block` as processed; it must directly follow the current cursor
	pub fn advance(&mut self, block: u64) -> Result<(), BlockWatcherError> {
		match self.last_processed_block {
			Some(last) if last.checked_add(1) == Some(block) => {
				self.last_processed_block = Some(block);
				Ok(())
			}
			last => Err(BlockWatcherError::processing_error(
				"Cursor can only advance by one block",
				None,
				Some(HashMap::from([
					(
						"last_processed_block".to_string(),
						last.map_or_else(|| "none".to_string(), |n| n.to_string()),
					),
					("block_number".to_string(), block.to_string()),
				])),
			)),
		}
	}
}

/// Cursors of all watched chains, keyed by chain id
///
/// Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct CursorStore {
	cursors: Arc<Mutex<HashMap<u64, WatchCursor>>>,
}

impl CursorStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Cursor of `chain_id`, if the chain has been ticked at least once
	pub async fn get(&self, chain_id: u64) -> Option<WatchCursor> {
		self.cursors.lock().await.get(&chain_id).copied()
	}

	pub async fn plan(&self, chain_id: u64, latest: u64) -> TickPlan {
		self.cursors
			.lock()
			.await
			.get(&chain_id)
			.copied()
			.unwrap_or_default()
			.plan(latest)
	}

	pub async fn initialize(&self, chain_id: u64, block: u64) -> bool {
		self.cursors
			.lock()
			.await
			.entry(chain_id)
			.or_default()
			.initialize(block)
	}

	pub async fn advance(&self, chain_id: u64, block: u64) -> Result<(), BlockWatcherError> {
		let mut cursors = self.cursors.lock().await;
		match cursors.get_mut(&chain_id) {
			Some(cursor) => cursor.advance(block),
			None => WatchCursor::new().advance(block),
		}
	}

	/// Seeds a chain's cursor, replacing any existing state
	pub async fn set(&self, chain_id: u64, last_processed_block: u64) {
		self.cursors.lock().await.insert(
			chain_id,
			WatchCursor {
				last_processed_block: Some(last_processed_block),
			},
		);
	}
}

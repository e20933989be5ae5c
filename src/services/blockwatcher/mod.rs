//! Block watching engine.
//!
//! - `cursor`: per-chain record of the last processed block
//! - `dispatcher`: bounded background receipt resolution
//! - `service`: per-chain watcher tasks and tick processing

mod cursor;
mod dispatcher;
mod error;
mod service;

pub use cursor::{CursorStore, TickPlan, WatchCursor};
pub use dispatcher::ReceiptDispatcher;
pub use error::BlockWatcherError;
pub use service::{process_tick, BlockWatchService, TickOutcome};

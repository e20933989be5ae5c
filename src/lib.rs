//! Multi-chain block watching and transaction receipt observation.
//!
//! This library follows the head of every configured EVM chain, walks each new
//! block in order, resolves the receipts of its transactions and publishes them
//! to in-process subscribers. It includes:
//!
//! - Chain configuration loading through JSON files
//! - One lazily created RPC client per chain, with endpoint rotation
//! - A generic synchronous event notifier
//! - Per-chain watch cursors and bounded receipt resolution
//!
//! # Module Structure
//!
//! - `bootstrap`: Wires configuration, registry and engine together
//! - `models`: Chain descriptors, blocks, receipts and events
//! - `repositories`: Configuration storage
//! - `services`: Chain clients, notifier and block watch engine
//! - `utils`: Logging, HTTP retry helpers and test builders

pub mod bootstrap;
pub mod models;
pub mod repositories;
pub mod services;
pub mod utils;

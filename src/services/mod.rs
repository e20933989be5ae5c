//! Core services implementing the watching engine.
//!
//! This module contains the main service implementations:
//! - `blockchain`: Chain client interfaces, transports and the client registry
//! - `blockwatcher`: Per-chain block polling and receipt dispatching
//! - `notification`: In-process publish/subscribe for resolved receipts

pub mod blockchain;
pub mod blockwatcher;
pub mod notification;

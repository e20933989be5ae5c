//! Blockchain-specific model implementations.
//!
//! Only EVM-compatible chains are watched; their JSON-RPC shapes live in [`evm`].

pub mod evm;

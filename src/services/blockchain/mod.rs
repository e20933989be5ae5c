//! Blockchain client interfaces and implementations.
//!
//! Provides abstractions and concrete implementations for reading EVM chains:
//!
//! - Generic chain client trait and the polling block number feed
//! - EVM JSON-RPC client
//! - HTTP transport with retries and endpoint rotation
//! - Registry handing out one client per supported chain
//! - Error handling for blockchain operations

mod client;
mod clients;
mod error;
mod registry;
mod transports;

pub use client::{BlockNumberStreamExt, ChainClient};
pub use clients::EvmClient;
pub use error::BlockChainError;
pub use registry::{
	ChainClientFactory, ChainClientRegistry, ChainClientRegistryTrait, EvmClientFactory,
};
pub use transports::{
	BlockchainTransport, EVMTransportClient, EndpointManager, HttpTransportClient,
	RotatingTransport, TransientErrorRetryStrategy, TransportError, ROTATE_ON_ERROR_CODES,
};

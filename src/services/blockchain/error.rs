//! Blockchain service error types and handling.
//!
//! Covers client lookup, network connectivity, request processing, and the
//! "not there yet" cases of block and receipt queries.

use crate::{
	services::blockchain::transports::TransportError,
	utils::logging::error::{ErrorContext, TraceableError},
};
use std::collections::HashMap;
use thiserror::Error as ThisError;
use uuid::Uuid;

/// Represents possible errors that can occur during blockchain operations
#[derive(ThisError, Debug)]
pub enum BlockChainError {
	/// The endpoint could not be reached
	#[error("Connection error: {0}")]
	ConnectionError(ErrorContext),

	/// Errors related to malformed requests or invalid responses
	#[error("Request error: {0}")]
	RequestError(ErrorContext),

	/// The node does not know the requested block (yet)
	#[error("Block not found: {0}")]
	BlockNotFound(ErrorContext),

	/// The node has no receipt for the transaction (not mined, or dropped)
	#[error("Receipt not found: {0}")]
	ReceiptNotFound(ErrorContext),

	/// The chain id is not part of the configured set
	#[error("Unsupported chain: {0}")]
	UnsupportedChain(ErrorContext),

	/// Internal errors within the blockchain client
	#[error("Internal error: {0}")]
	InternalError(ErrorContext),

	/// Other errors that don't fit into the categories above
	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

impl BlockChainError {
	pub fn connection_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ConnectionError(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn request_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::RequestError(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn block_not_found(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::BlockNotFound(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn receipt_not_found(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ReceiptNotFound(ErrorContext::new_with_log(msg, source, metadata))
	}

	/// Unsupported chain lookups are a caller mistake, so they are not logged here
	pub fn unsupported_chain(chain_id: u64) -> Self {
		Self::UnsupportedChain(ErrorContext::new(
			format!("chain {} is not configured", chain_id),
			None,
			Some(HashMap::from([(
				"chain_id".to_string(),
				chain_id.to_string(),
			)])),
		))
	}

	pub fn internal_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::InternalError(ErrorContext::new_with_log(msg, source, metadata))
	}
}

impl From<TransportError> for BlockChainError {
	fn from(err: TransportError) -> Self {
		match err {
			TransportError::Network(_) | TransportError::UrlRotation(_) => {
				Self::connection_error("RPC endpoint unreachable", Some(Box::new(err)), None)
			}
			_ => Self::request_error("RPC request failed", Some(Box::new(err)), None),
		}
	}
}

impl TraceableError for BlockChainError {
	fn trace_id(&self) -> String {
		match self {
			Self::ConnectionError(ctx) => ctx.trace_id.clone(),
			Self::RequestError(ctx) => ctx.trace_id.clone(),
			Self::BlockNotFound(ctx) => ctx.trace_id.clone(),
			Self::ReceiptNotFound(ctx) => ctx.trace_id.clone(),
			Self::UnsupportedChain(ctx) => ctx.trace_id.clone(),
			Self::InternalError(ctx) => ctx.trace_id.clone(),
			Self::Other(_) => Uuid::new_v4().to_string(),
		}
	}
}

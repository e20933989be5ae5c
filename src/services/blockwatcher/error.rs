//! Block watcher error types and handling.
//!
//! Provides error types for the block watching engine: block and receipt
//! fetch failures, tick processing, and watcher lifecycle.

use crate::utils::logging::error::{ErrorContext, TraceableError};
use std::collections::HashMap;
use thiserror::Error as ThisError;
use uuid::Uuid;

/// Represents possible errors during block watching operations
#[derive(ThisError, Debug)]
pub enum BlockWatcherError {
	/// A block or receipt could not be fetched from the chain
	#[error("Network error: {0}")]
	NetworkError(ErrorContext),

	/// Errors that occur while processing a tick
	#[error("Processing error: {0}")]
	ProcessingError(ErrorContext),

	/// Starting or stopping the watcher failed
	#[error("Lifecycle error: {0}")]
	LifecycleError(ErrorContext),

	/// The watcher was asked to handle a chain it is not configured for
	#[error("Configuration error: {0}")]
	ConfigurationError(ErrorContext),

	/// Other errors that don't fit into the categories above
	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

impl BlockWatcherError {
	pub fn network_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::NetworkError(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn processing_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ProcessingError(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn lifecycle_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::LifecycleError(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn configuration_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ConfigurationError(ErrorContext::new_with_log(msg, source, metadata))
	}
}

impl TraceableError for BlockWatcherError {
	fn trace_id(&self) -> String {
		match self {
			Self::NetworkError(ctx) => ctx.trace_id.clone(),
			Self::ProcessingError(ctx) => ctx.trace_id.clone(),
			Self::LifecycleError(ctx) => ctx.trace_id.clone(),
			Self::ConfigurationError(ctx) => ctx.trace_id.clone(),
			Self::Other(_) => Uuid::new_v4().to_string(),
		}
	}
}

//! Subscriber error types.
//!
//! A subscriber can fail by returning an error or by panicking. Both are turned
//! into a [`SubscriberError`] and logged; neither reaches the publisher.

use crate::utils::logging::error::{ErrorContext, TraceableError};
use std::collections::HashMap;
use thiserror::Error as ThisError;

/// Error a subscriber callback may return
pub type SubscriberFailure = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Represents a failed delivery to one subscriber
#[derive(ThisError, Debug)]
pub enum SubscriberError {
	/// The callback returned an error
	#[error("Subscriber failed: {0}")]
	CallbackFailed(ErrorContext),

	/// The callback panicked
	#[error("Subscriber panicked: {0}")]
	CallbackPanicked(ErrorContext),
}

impl SubscriberError {
	pub fn callback_failed(
		msg: impl Into<String>,
		source: Option<SubscriberFailure>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::CallbackFailed(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn callback_panicked(
		msg: impl Into<String>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::CallbackPanicked(ErrorContext::new_with_log(msg, None, metadata))
	}
}

impl TraceableError for SubscriberError {
	fn trace_id(&self) -> String {
		match self {
			Self::CallbackFailed(ctx) => ctx.trace_id.clone(),
			Self::CallbackPanicked(ctx) => ctx.trace_id.clone(),
		}
	}
}

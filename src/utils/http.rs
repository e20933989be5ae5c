use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{
	policies::ExponentialBackoff, Jitter, RetryTransientMiddleware, RetryableStrategy,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// --- Default values for retry configuration settings ---
fn default_max_attempts() -> u32 {
	3
}

fn default_initial_backoff() -> Duration {
	Duration::from_millis(250)
}

fn default_max_backoff() -> Duration {
	Duration::from_secs(10)
}

fn default_base_for_backoff() -> u32 {
	2
}

/// Serializable setting for jitter in retry policies
#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum JitterSetting {
	/// No jitter applied to the backoff duration
	None,
	/// Full jitter applied, randomizing the backoff duration
	#[default]
	Full,
}

/// Retry policy shared by the RPC transport and the receipt dispatcher
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct RetryConfig {
	/// Maximum number of retries for transient errors
	#[serde(default = "default_max_attempts")]
	pub max_retries: u32,
	/// Base duration for exponential backoff calculations
	#[serde(default = "default_base_for_backoff")]
	pub base_for_backoff: u32,
	/// Initial backoff duration before the first retry
	#[serde(default = "default_initial_backoff")]
	pub initial_backoff: Duration,
	/// Maximum backoff duration for retries
	#[serde(default = "default_max_backoff")]
	pub max_backoff: Duration,
	/// Jitter to apply to the backoff duration
	#[serde(default)]
	pub jitter: JitterSetting,
}

impl Default for RetryConfig {
	fn default() -> Self {
		Self {
			max_retries: default_max_attempts(),
			base_for_backoff: default_base_for_backoff(),
			initial_backoff: default_initial_backoff(),
			max_backoff: default_max_backoff(),
			jitter: JitterSetting::default(),
		}
	}
}

impl RetryConfig {
	/// Builds the reqwest-retry policy described by this configuration
	pub fn exponential_backoff(&self) -> ExponentialBackoff {
		let jitter = match self.jitter {
			JitterSetting::None => Jitter::None,
			JitterSetting::Full => Jitter::Full,
		};

		ExponentialBackoff::builder()
			.jitter(jitter)
			.base(self.base_for_backoff)
			.retry_bounds(self.initial_backoff, self.max_backoff)
			.build_with_max_retries(self.max_retries)
	}
}

/// Creates a retryable HTTP client with middleware for a single URL
///
/// # Parameters:
/// - `config`: Configuration for retry policies
/// - `base_client`: The base HTTP client to use
/// - `custom_strategy`: Optional custom retry strategy, complementing the default retry behavior
pub fn create_retryable_http_client<S>(
	config: &RetryConfig,
	base_client: reqwest::Client,
	custom_strategy: Option<S>,
) -> ClientWithMiddleware
where
	S: RetryableStrategy + Send + Sync + 'static,
{
	let retry_policy = config.exponential_backoff();

	if let Some(strategy) = custom_strategy {
		ClientBuilder::new(base_client).with(
			RetryTransientMiddleware::new_with_policy_and_strategy(retry_policy, strategy),
		)
	} else {
		ClientBuilder::new(base_client)
			.with(RetryTransientMiddleware::new_with_policy(retry_policy))
	}
	.build()
}

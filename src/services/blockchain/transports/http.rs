//! HTTP transport implementation for blockchain interactions.
//!
//! A JSON-RPC client over a pooled `reqwest` client with:
//! - Transient-error retries through `reqwest-retry`
//! - Endpoint rotation through [`EndpointManager`]
//!
//! Construction does not contact any endpoint. The first request is the first
//! network round-trip, which keeps registry lookups cheap and infallible with
//! respect to node availability.

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use reqwest_middleware::ClientWithMiddleware;
use serde::Serialize;
use serde_json::{json, Value};
use std::{sync::Arc, time::Duration};
use url::Url;

use crate::{
	models::ChainDescriptor,
	services::blockchain::transports::{
		BlockchainTransport, EndpointManager, RotatingTransport, TransientErrorRetryStrategy,
		TransportError,
	},
	utils::{create_retryable_http_client, RetryConfig},
};

/// Basic HTTP transport client for JSON-RPC nodes
///
/// Cloning is cheap; clones share the connection pool and endpoint state.
#[derive(Clone, Debug)]
pub struct HttpTransportClient {
	/// Plain HTTP client, used for connection checks that must bypass retries
	pub client: Arc<Client>,
	endpoint_manager: EndpointManager,
	/// JSON-RPC payload used to check a fallback endpoint before rotating to it
	test_connection_payload: Option<String>,
}

impl HttpTransportClient {
	/// Creates a transport for `chain` without contacting any endpoint
	///
	/// The highest-weighted enabled RPC URL becomes the active endpoint; the rest
	/// become fallbacks in weight order.
	pub fn new(
		chain: &ChainDescriptor,
		retry_config: &RetryConfig,
		test_connection_payload: Option<String>,
	) -> Result<Self, anyhow::Error> {
		let mut urls = Vec::new();
		for rpc_url in chain.active_rpc_urls() {
			let parsed = Url::parse(&rpc_url.url)
				.with_context(|| format!("Invalid RPC URL: {}", rpc_url.url))?;
			urls.push(parsed.as_str().trim_end_matches('/').to_string());
		}

		let (active_url, fallback_urls) = match urls.split_first() {
			Some((active, rest)) => (active.clone(), rest.to_vec()),
			None => anyhow::bail!("No usable RPC URLs configured for chain {}", chain.chain_id),
		};

		let http_client = reqwest::ClientBuilder::new()
			.pool_idle_timeout(Duration::from_secs(90))
			.pool_max_idle_per_host(32)
			.timeout(Duration::from_secs(30))
			.connect_timeout(Duration::from_secs(20))
			.build()
			.context("Failed to create HTTP client")?;

		let retrying_client = create_retryable_http_client(
			retry_config,
			http_client.clone(),
			Some(TransientErrorRetryStrategy),
		);

		Ok(Self {
			client: Arc::new(http_client),
			endpoint_manager: EndpointManager::new(retrying_client, &active_url, fallback_urls),
			test_connection_payload,
		})
	}

	fn test_request(&self) -> Result<Value, anyhow::Error> {
		match &self.test_connection_payload {
			Some(payload) => {
				serde_json::from_str(payload).context("Failed to parse test payload as JSON")
			}
			None => Ok(json!({
				"jsonrpc": "2.0",
				"id": 1,
				"method": "net_version",
				"params": []
			})),
		}
	}

	/// Endpoint state shared by this client and its clones
	pub fn endpoint_manager(&self) -> &EndpointManager {
		&self.endpoint_manager
	}

	/// Sends the connection-check payload to `url` and returns the decoded body
	pub async fn check_connection(&self, url: &str) -> Result<Value, anyhow::Error> {
		let url = Url::parse(url).map_err(|_| anyhow::anyhow!("Invalid URL: {}", url))?;
		let response = self
			.client
			.post(url.clone())
			.json(&self.test_request()?)
			.send()
			.await
			.with_context(|| format!("Failed to connect to {}", url))?;

		let status = response.status();
		if !status.is_success() {
			anyhow::bail!("Failed to connect to {}: {}", url, status.as_u16());
		}

		response
			.json()
			.await
			.with_context(|| format!("Invalid JSON from {}", url))
	}
}

#[async_trait]
impl BlockchainTransport for HttpTransportClient {
	async fn get_current_url(&self) -> String {
		self.endpoint_manager.active_url.read().await.clone()
	}

	async fn send_raw_request<P>(
		&self,
		method: &str,
		params: Option<P>,
	) -> Result<Value, TransportError>
	where
		P: Into<Value> + Send + Clone + Serialize,
	{
		self.endpoint_manager
			.send_raw_request(self, method, params)
			.await
	}

	fn update_endpoint_manager_client(
		&mut self,
		client: ClientWithMiddleware,
	) -> Result<(), anyhow::Error> {
		self.endpoint_manager.update_client(client);
		Ok(())
	}
}

#[async_trait]
impl RotatingTransport for HttpTransportClient {
	async fn try_connect(&self, url: &str) -> Result<(), anyhow::Error> {
		self.check_connection(url).await.map(|_| ())
	}

	async fn update_client(&self, url: &str) -> Result<(), anyhow::Error> {
		let parsed_url = Url::parse(url).map_err(|_| anyhow::anyhow!("Invalid URL: {}", url))?;
		let normalized_url = parsed_url.as_str().trim_end_matches('/');

		// The pooled client is URL-agnostic; only the endpoint manager tracks the URL
		let mut active_url = self.endpoint_manager.active_url.write().await;
		*active_url = normalized_url.to_string();
		Ok(())
	}
}

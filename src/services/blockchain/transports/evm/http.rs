//! EVM transport implementation.
//!
//! Wraps [`HttpTransportClient`] and tightens the rotation check: a fallback endpoint
//! is only accepted if `eth_chainId` reports the chain the transport was built for.

use reqwest_middleware::ClientWithMiddleware;
use serde::Serialize;
use serde_json::Value;

use crate::{
	models::ChainDescriptor,
	services::blockchain::transports::{
		BlockchainTransport, HttpTransportClient, RotatingTransport, TransportError,
	},
	utils::RetryConfig,
};

const CHAIN_ID_PAYLOAD: &str = r#"{"id":1,"jsonrpc":"2.0","method":"eth_chainId","params":[]}"#;

/// A client for EVM-compatible JSON-RPC nodes
#[derive(Clone, Debug)]
pub struct EVMTransportClient {
	http_client: HttpTransportClient,
	chain_id: u64,
}

impl EVMTransportClient {
	/// Creates a transport for `chain` without contacting any endpoint
	pub fn new(chain: &ChainDescriptor, retry_config: &RetryConfig) -> Result<Self, anyhow::Error> {
		let http_client =
			HttpTransportClient::new(chain, retry_config, Some(CHAIN_ID_PAYLOAD.to_string()))?;
		Ok(Self {
			http_client,
			chain_id: chain.chain_id,
		})
	}
}

/// Parses the `result` of an `eth_chainId` response
fn parse_chain_id(response: &Value) -> Option<u64> {
	let hex = response.get("result")?.as_str()?;
	u64::from_str_radix(hex.trim_start_matches("0x"), 16).ok()
}

#[async_trait::async_trait]
impl BlockchainTransport for EVMTransportClient {
	async fn get_current_url(&self) -> String {
		self.http_client.get_current_url().await
	}

	async fn send_raw_request<P>(
		&self,
		method: &str,
		params: Option<P>,
	) -> Result<Value, TransportError>
	where
		P: Into<Value> + Send + Clone + Serialize,
	{
		// Route through the shared endpoint manager with `self` so rotation uses the
		// chain id check below
		self.http_client
			.endpoint_manager()
			.send_raw_request(self, method, params)
			.await
	}

	fn update_endpoint_manager_client(
		&mut self,
		client: ClientWithMiddleware,
	) -> Result<(), anyhow::Error> {
		self.http_client.update_endpoint_manager_client(client)
	}
}

#[async_trait::async_trait]
impl RotatingTransport for EVMTransportClient {
	async fn try_connect(&self, url: &str) -> Result<(), anyhow::Error> {
		let response = self.http_client.check_connection(url).await?;
		match parse_chain_id(&response) {
			Some(id) if id == self.chain_id => Ok(()),
			Some(id) => anyhow::bail!(
				"Endpoint {} serves chain {} instead of {}",
				url,
				id,
				self.chain_id
			),
			None => anyhow::bail!("Endpoint {} returned no chain id", url),
		}
	}

	async fn update_client(&self, url: &str) -> Result<(), anyhow::Error> {
		self.http_client.update_client(url).await
	}
}

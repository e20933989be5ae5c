//! Manages the rotation of blockchain RPC endpoints
//!
//! Requests go to the active URL. A rate-limited response (see [`ROTATE_ON_ERROR_CODES`])
//! or a network failure moves the manager to the next fallback URL and the request is
//! replayed there. Each request rotates at most once per configured fallback so a
//! request cannot cycle through the endpoint list forever.

use reqwest_middleware::ClientWithMiddleware;
use serde::Serialize;
use serde_json::Value;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{Mutex, RwLock};

use crate::services::blockchain::transports::{
	RotatingTransport, TransportError, ROTATE_ON_ERROR_CODES,
};

/// Tracks the active RPC URL and the fallbacks it can rotate to
#[derive(Clone, Debug)]
pub struct EndpointManager {
	pub active_url: Arc<RwLock<String>>,
	pub fallback_urls: Arc<RwLock<Vec<String>>>,
	client: ClientWithMiddleware,
	rotation_lock: Arc<Mutex<()>>,
}

/// Result of sending a single request to one URL
#[derive(Debug)]
enum AttemptOutcome {
	/// The endpoint answered (status may still be an error)
	Response(reqwest::Response),
	/// No answer: connection refused, timeout, middleware gave up
	Network(reqwest_middleware::Error),
}

impl EndpointManager {
	pub fn new(client: ClientWithMiddleware, active_url: &str, fallback_urls: Vec<String>) -> Self {
		Self {
			active_url: Arc::new(RwLock::new(active_url.to_string())),
			fallback_urls: Arc::new(RwLock::new(fallback_urls)),
			rotation_lock: Arc::new(Mutex::new(())),
			client,
		}
	}

	/// Replaces the HTTP client, e.g. to change the retry policy
	pub fn update_client(&mut self, client: ClientWithMiddleware) {
		self.client = client;
	}

	/// Moves to the first fallback URL that accepts a connection check
	///
	/// The previous active URL is appended to the fallback list. A fallback that fails
	/// the check is put back at the end of the list.
	pub async fn rotate_url<T: RotatingTransport>(
		&self,
		transport: &T,
	) -> Result<(), TransportError> {
		let _guard = self.rotation_lock.lock().await;

		let current_active = self.active_url.read().await.clone();

		let new_url = {
			let mut fallback_urls = self.fallback_urls.write().await;
			match fallback_urls.iter().position(|url| url != &current_active) {
				Some(pos) => fallback_urls.remove(pos),
				None => {
					return Err(TransportError::url_rotation(
						"No fallback URLs available for rotation",
						None,
						Some(HashMap::from([(
							"active_url".to_string(),
							current_active,
						)])),
					));
				}
			}
		};

		if let Err(e) = transport.try_connect(&new_url).await {
			self.fallback_urls.write().await.push(new_url.clone());
			return Err(TransportError::url_rotation(
				"Fallback URL failed connection check",
				Some(e.into()),
				Some(HashMap::from([("url".to_string(), new_url)])),
			));
		}

		transport.update_client(&new_url).await.map_err(|e| {
			TransportError::url_rotation(
				"Failed to update transport client with new URL",
				Some(e.into()),
				None,
			)
		})?;

		let mut active_url = self.active_url.write().await;
		let mut fallback_urls = self.fallback_urls.write().await;
		tracing::debug!(from = %current_active, to = %new_url, "Rotated RPC endpoint");
		fallback_urls.push(current_active);
		*active_url = new_url;
		Ok(())
	}

	async fn has_fallbacks(&self) -> bool {
		!self.fallback_urls.read().await.is_empty()
	}

	async fn attempt_request_on_url(&self, url: &str, body: String) -> AttemptOutcome {
		let result = self
			.client
			.post(url)
			.header("Content-Type", "application/json")
			.body(body)
			.send()
			.await;

		match result {
			Ok(response) => AttemptOutcome::Response(response),
			Err(error) => AttemptOutcome::Network(error),
		}
	}

	/// Sends a JSON-RPC request, rotating endpoints on rate limiting or network failure
	///
	/// Returns the decoded JSON body of the first successful response.
	pub async fn send_raw_request<
		T: RotatingTransport,
		P: Into<Value> + Send + Clone + Serialize,
	>(
		&self,
		transport: &T,
		method: &str,
		params: Option<P>,
	) -> Result<Value, TransportError> {
		let request_body = transport.customize_request(method, params).await;
		let body = serde_json::to_string(&request_body).map_err(|e| {
			TransportError::request_serialization(
				"Failed to serialize request JSON",
				Some(Box::new(e)),
				Some(HashMap::from([("method".to_string(), method.to_string())])),
			)
		})?;

		let max_rotations = self.fallback_urls.read().await.len();
		let mut rotations = 0;

		loop {
			let current_url = self.active_url.read().await.clone();

			let error = match self.attempt_request_on_url(&current_url, body.clone()).await {
				AttemptOutcome::Response(response) if response.status().is_success() => {
					return response.json().await.map_err(|e| {
						TransportError::response_parse(
							"Failed to parse JSON response",
							Some(Box::new(e)),
							Some(HashMap::from([("url".to_string(), current_url.clone())])),
						)
					});
				}
				AttemptOutcome::Response(response) => {
					let status = response.status();
					let error_body = response.text().await.unwrap_or_default();
					tracing::warn!(url = %current_url, %status, "RPC request failed");

					if !ROTATE_ON_ERROR_CODES.contains(&status.as_u16()) {
						return Err(TransportError::http(
							status,
							current_url,
							error_body,
							None,
							None,
						));
					}
					TransportError::http(status, current_url, error_body, None, None)
				}
				AttemptOutcome::Network(network_error) => {
					tracing::warn!(url = %current_url, error = %network_error, "RPC request did not complete");
					TransportError::network(
						format!("Failed to send request to {}", current_url),
						Some(network_error.into()),
						None,
					)
				}
			};

			if rotations >= max_rotations || !self.has_fallbacks().await {
				return Err(error);
			}

			self.rotate_url(transport).await?;
			rotations += 1;
		}
	}
}

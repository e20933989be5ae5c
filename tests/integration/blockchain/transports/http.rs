use mockito::{Matcher, Server};
use serde_json::{json, Value};

use receipt_watcher::{
	services::blockchain::{
		BlockchainTransport, ChainClient, EVMTransportClient, EvmClient, HttpTransportClient,
		TransportError,
	},
	utils::{tests::builders::chain::ChainBuilder, RetryConfig},
};

fn no_retries() -> RetryConfig {
	RetryConfig {
		max_retries: 0,
		..RetryConfig::default()
	}
}

fn rpc_body(result: Value) -> String {
	json!({ "jsonrpc": "2.0", "id": 1, "result": result }).to_string()
}

#[tokio::test]
async fn test_http_transport_sends_json_rpc_request() {
	let mut server = Server::new_async().await;
	let mock = server
		.mock("POST", "/")
		.match_header("content-type", "application/json")
		.match_body(Matcher::Json(json!({
			"jsonrpc": "2.0",
			"id": 1,
			"method": "eth_getBlockByNumber",
			"params": ["0x65", false]
		})))
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(rpc_body(Value::Null))
		.expect(1)
		.create_async()
		.await;

	let chain = ChainBuilder::new().rpc_urls(vec![server.url().as_str()]).build();
	let transport = HttpTransportClient::new(&chain, &no_retries(), None).unwrap();

	let response = transport
		.send_raw_request("eth_getBlockByNumber", Some(vec![json!("0x65"), json!(false)]))
		.await
		.unwrap();

	assert!(response["result"].is_null());
	assert_eq!(transport.get_current_url().await, server.url());
	mock.assert();
}

#[tokio::test]
async fn test_http_transport_rotates_after_connection_check() {
	let mut primary = Server::new_async().await;
	let mut fallback = Server::new_async().await;

	let primary_mock = primary
		.mock("POST", "/")
		.with_status(429)
		.expect(1)
		.create_async()
		.await;
	let check_mock = fallback
		.mock("POST", "/")
		.match_body(Matcher::PartialJson(json!({ "method": "net_version" })))
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(rpc_body(json!("31337")))
		.expect(1)
		.create_async()
		.await;
	let request_mock = fallback
		.mock("POST", "/")
		.match_body(Matcher::PartialJson(json!({ "method": "eth_blockNumber" })))
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(rpc_body(json!("0x64")))
		.expect(1)
		.create_async()
		.await;

	let chain = ChainBuilder::new()
		.rpc_urls(vec![primary.url().as_str(), fallback.url().as_str()])
		.build();
	let transport = HttpTransportClient::new(&chain, &no_retries(), None).unwrap();

	let response = transport
		.send_raw_request("eth_blockNumber", None::<Value>)
		.await
		.unwrap();

	assert_eq!(response["result"], "0x64");
	assert_eq!(transport.get_current_url().await, fallback.url());
	primary_mock.assert();
	check_mock.assert();
	request_mock.assert();
}

#[tokio::test]
async fn test_evm_transport_rejects_fallback_on_other_chain() {
	let mut primary = Server::new_async().await;
	let mut fallback = Server::new_async().await;

	let primary_mock = primary
		.mock("POST", "/")
		.with_status(429)
		.expect(1)
		.create_async()
		.await;
	let chain_id_mock = fallback
		.mock("POST", "/")
		.match_body(Matcher::PartialJson(json!({ "method": "eth_chainId" })))
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(rpc_body(json!("0x1")))
		.expect(1)
		.create_async()
		.await;

	let chain = ChainBuilder::new()
		.chain_id(31337)
		.rpc_urls(vec![primary.url().as_str(), fallback.url().as_str()])
		.build();
	let transport = EVMTransportClient::new(&chain, &no_retries()).unwrap();

	let result = transport
		.send_raw_request("eth_blockNumber", None::<Value>)
		.await;

	assert!(matches!(result, Err(TransportError::UrlRotation(_))));
	assert_eq!(transport.get_current_url().await, primary.url());
	primary_mock.assert();
	chain_id_mock.assert();
}

#[tokio::test]
async fn test_evm_transport_accepts_fallback_on_same_chain() {
	let mut primary = Server::new_async().await;
	let mut fallback = Server::new_async().await;

	let primary_mock = primary
		.mock("POST", "/")
		.with_status(429)
		.expect(1)
		.create_async()
		.await;
	let chain_id_mock = fallback
		.mock("POST", "/")
		.match_body(Matcher::PartialJson(json!({ "method": "eth_chainId" })))
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(rpc_body(json!("0x7a69")))
		.expect(1)
		.create_async()
		.await;
	let request_mock = fallback
		.mock("POST", "/")
		.match_body(Matcher::PartialJson(json!({ "method": "eth_blockNumber" })))
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(rpc_body(json!("0x64")))
		.expect(1)
		.create_async()
		.await;

	let chain = ChainBuilder::new()
		.chain_id(31337)
		.rpc_urls(vec![primary.url().as_str(), fallback.url().as_str()])
		.build();
	let transport = EVMTransportClient::new(&chain, &no_retries()).unwrap();

	let response = transport
		.send_raw_request("eth_blockNumber", None::<Value>)
		.await
		.unwrap();

	assert_eq!(response["result"], "0x64");
	assert_eq!(transport.get_current_url().await, fallback.url());
	primary_mock.assert();
	chain_id_mock.assert();
	request_mock.assert();
}

#[tokio::test]
async fn test_evm_client_over_http() {
	let mut server = Server::new_async().await;
	let mock = server
		.mock("POST", "/")
		.match_body(Matcher::PartialJson(json!({ "method": "eth_blockNumber" })))
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(rpc_body(json!("0x2a")))
		.expect(1)
		.create_async()
		.await;

	let chain = ChainBuilder::new().rpc_urls(vec![server.url().as_str()]).build();
	let client = EvmClient::new(&chain).unwrap();

	assert_eq!(client.get_block_number().await.unwrap(), 42);
	mock.assert();
}

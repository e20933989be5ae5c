use alloy::primitives::B256;
use mockall::predicate;
use serde_json::{json, Value};

use receipt_watcher::services::blockchain::{
	BlockChainError, ChainClient, EvmClient, TransportError,
};

use crate::integration::mocks::MockEVMTransportClient;

fn client_with(mock: MockEVMTransportClient) -> EvmClient<MockEVMTransportClient> {
	EvmClient::new_with_transport(mock, 31337)
}

fn rpc_result(result: Value) -> Value {
	json!({ "jsonrpc": "2.0", "id": 1, "result": result })
}

#[tokio::test]
async fn test_get_block_number() {
	let mut mock = MockEVMTransportClient::new();
	mock.expect_send_raw_request()
		.with(predicate::eq("eth_blockNumber"), predicate::always())
		.times(1)
		.returning(|_, _| Ok(rpc_result(json!("0x64"))));

	let client = client_with(mock);

	assert_eq!(client.get_block_number().await.unwrap(), 100);
	assert_eq!(client.chain_id(), 31337);
}

#[tokio::test]
async fn test_get_block_number_invalid_hex() {
	let mut mock = MockEVMTransportClient::new();
	mock.expect_send_raw_request()
		.returning(|_, _| Ok(rpc_result(json!("0xnothex"))));

	let result = client_with(mock).get_block_number().await;

	assert!(matches!(result, Err(BlockChainError::RequestError(_))));
}

#[tokio::test]
async fn test_get_block_returns_transaction_hashes() {
	let tx_a = B256::with_last_byte(0xa);
	let tx_b = B256::with_last_byte(0xb);

	let mut mock = MockEVMTransportClient::new();
	mock.expect_send_raw_request()
		.withf(|method, params| {
			method == "eth_getBlockByNumber"
				&& params.as_deref() == Some(&[json!("0x65"), json!(false)][..])
		})
		.times(1)
		.returning(move |_, _| {
			Ok(rpc_result(json!({
				"number": "0x65",
				"hash": format!("{:#x}", B256::with_last_byte(1)),
				"parentHash": format!("{:#x}", B256::ZERO),
				"timestamp": "0x5f5e100",
				"transactions": [format!("{:#x}", tx_a), format!("{:#x}", tx_b)],
				"gasUsed": "0x0"
			})))
		});

	let block = client_with(mock).get_block(101).await.unwrap();

	assert_eq!(block.number(), Some(101));
	assert_eq!(block.transaction_hashes(), &[tx_a, tx_b]);
}

#[tokio::test]
async fn test_get_block_null_is_block_not_found() {
	let mut mock = MockEVMTransportClient::new();
	mock.expect_send_raw_request()
		.returning(|_, _| Ok(rpc_result(Value::Null)));

	let result = client_with(mock).get_block(5_000_000).await;

	assert!(matches!(result, Err(BlockChainError::BlockNotFound(_))));
}

#[tokio::test]
async fn test_get_transaction_receipt() {
	let hash = B256::with_last_byte(0x42);
	let expected_param = json!(format!("{:#x}", hash));

	let mut mock = MockEVMTransportClient::new();
	mock.expect_send_raw_request()
		.withf(move |method, params| {
			method == "eth_getTransactionReceipt"
				&& params.as_ref().and_then(|p| p.first()) == Some(&expected_param)
		})
		.times(1)
		.returning(move |_, _| {
			Ok(rpc_result(json!({
				"transactionHash": format!("{:#x}", hash),
				"transactionIndex": "0x0",
				"blockHash": format!("{:#x}", B256::with_last_byte(7)),
				"blockNumber": "0x65",
				"from": "0x0000000000000000000000000000000000000001",
				"to": "0x0000000000000000000000000000000000000002",
				"cumulativeGasUsed": "0x5208",
				"gasUsed": "0x5208",
				"contractAddress": null,
				"logs": [],
				"status": "0x1",
				"type": "0x2",
				"effectiveGasPrice": "0x3b9aca00",
				"logsBloom": "0x00"
			})))
		});

	let receipt = client_with(mock).get_transaction_receipt(hash).await.unwrap();

	assert_eq!(receipt.transaction_hash, hash);
	assert_eq!(receipt.block_number(), Some(101));
	assert_eq!(receipt.succeeded(), Some(true));
}

#[tokio::test]
async fn test_get_transaction_receipt_not_mined() {
	let mut mock = MockEVMTransportClient::new();
	mock.expect_send_raw_request()
		.returning(|_, _| Ok(rpc_result(Value::Null)));

	let result = client_with(mock)
		.get_transaction_receipt(B256::with_last_byte(1))
		.await;

	assert!(matches!(result, Err(BlockChainError::ReceiptNotFound(_))));
}

#[tokio::test]
async fn test_json_rpc_error_is_request_error() {
	let mut mock = MockEVMTransportClient::new();
	mock.expect_send_raw_request().returning(|_, _| {
		Ok(json!({
			"jsonrpc": "2.0",
			"id": 1,
			"error": { "code": -32000, "message": "header not found" }
		}))
	});

	let result = client_with(mock).get_block(1).await;

	match result {
		Err(BlockChainError::RequestError(ctx)) => {
			assert!(ctx.message.contains("header not found"));
			assert_eq!(
				ctx.metadata.as_ref().and_then(|m| m.get("code")).cloned(),
				Some("-32000".to_string())
			);
		}
		other => panic!("expected RequestError, got {:?}", other),
	}
}

#[tokio::test]
async fn test_missing_result_is_request_error() {
	let mut mock = MockEVMTransportClient::new();
	mock.expect_send_raw_request()
		.returning(|_, _| Ok(json!({ "jsonrpc": "2.0", "id": 1 })));

	let result = client_with(mock).get_block_number().await;

	assert!(matches!(result, Err(BlockChainError::RequestError(_))));
}

#[tokio::test]
async fn test_transport_network_error_is_connection_error() {
	let mut mock = MockEVMTransportClient::new();
	mock.expect_send_raw_request()
		.returning(|_, _| Err(TransportError::network("connection refused", None, None)));

	let result = client_with(mock).get_block_number().await;

	assert!(matches!(result, Err(BlockChainError::ConnectionError(_))));
}

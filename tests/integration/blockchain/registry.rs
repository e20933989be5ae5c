use std::{collections::HashMap, sync::Arc};

use receipt_watcher::{
	models::ChainDescriptor,
	services::blockchain::{
		BlockChainError, ChainClient, ChainClientRegistry, ChainClientRegistryTrait,
	},
	utils::tests::builders::chain::ChainBuilder,
};

use crate::integration::mocks::{MockChainClient, MockChainClientFactory};

fn chains(ids: &[u64]) -> HashMap<u64, ChainDescriptor> {
	ids.iter()
		.map(|id| {
			(
				*id,
				ChainBuilder::new()
					.chain_id(*id)
					.slug(&format!("chain_{}", id))
					.name(&format!("Chain {}", id))
					.build(),
			)
		})
		.collect()
}

fn mock_client(chain_id: u64) -> Arc<dyn ChainClient> {
	let mut client = MockChainClient::new();
	client.expect_chain_id().return_const(chain_id);
	Arc::new(client)
}

#[tokio::test]
async fn test_factory_called_once_per_chain() {
	let mut factory = MockChainClientFactory::new();
	factory
		.expect_create()
		.times(2)
		.returning(|chain| Ok(mock_client(chain.chain_id)));

	let registry = ChainClientRegistry::new_with_factory(chains(&[1, 10]), factory);

	for _ in 0..3 {
		assert_eq!(registry.get_client(1).await.unwrap().chain_id(), 1);
		assert_eq!(registry.get_client(10).await.unwrap().chain_id(), 10);
	}
	assert_eq!(registry.client_count().await, 2);
}

#[tokio::test]
async fn test_concurrent_first_requests_share_one_client() {
	let mut factory = MockChainClientFactory::new();
	factory
		.expect_create()
		.times(1)
		.returning(|chain| Ok(mock_client(chain.chain_id)));

	let registry = Arc::new(ChainClientRegistry::new_with_factory(chains(&[1]), factory));

	let handles: Vec<_> = (0..16)
		.map(|_| {
			let registry = Arc::clone(&registry);
			tokio::spawn(async move { registry.get_client(1).await })
		})
		.collect();

	let mut clients = Vec::new();
	for handle in handles {
		clients.push(handle.await.unwrap().unwrap());
	}

	assert!(clients.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
}

#[tokio::test]
async fn test_unsupported_chain_never_reaches_factory() {
	let mut factory = MockChainClientFactory::new();
	factory.expect_create().never();

	let registry = ChainClientRegistry::new_with_factory(chains(&[1]), factory);
	let result = registry.get_client(56).await;

	match result {
		Err(BlockChainError::UnsupportedChain(ctx)) => {
			assert_eq!(
				ctx.metadata.as_ref().and_then(|m| m.get("chain_id")).cloned(),
				Some("56".to_string())
			);
		}
		other => panic!("expected UnsupportedChain, got {:?}", other.map(|_| ())),
	}
}

#[tokio::test]
async fn test_factory_failure_is_not_cached() {
	let mut factory = MockChainClientFactory::new();
	let mut calls = 0;
	factory.expect_create().times(2).returning(move |chain| {
		calls += 1;
		if calls == 1 {
			Err(BlockChainError::internal_error("transport setup failed", None, None))
		} else {
			Ok(mock_client(chain.chain_id))
		}
	});

	let registry = ChainClientRegistry::new_with_factory(chains(&[1]), factory);

	assert!(matches!(
		registry.get_client(1).await,
		Err(BlockChainError::InternalError(_))
	));
	assert_eq!(registry.client_count().await, 0);
	assert!(registry.get_client(1).await.is_ok());
	assert_eq!(registry.client_count().await, 1);
}

#[test]
fn test_supported_chains_ordered_by_id() {
	let registry = ChainClientRegistry::new(chains(&[137, 1, 10]));
	let ids: Vec<u64> = registry
		.supported_chains()
		.into_iter()
		.map(|chain| chain.chain_id)
		.collect();

	assert_eq!(ids, vec![1, 10, 137]);
}

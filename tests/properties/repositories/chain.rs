use crate::properties::strategies::chain_descriptor_strategy;

use receipt_watcher::{
	models::{ChainDescriptor, ConfigLoader},
	repositories::{ChainRepository, ChainRepositoryTrait},
};
use proptest::{prelude::*, test_runner::Config};
use std::collections::HashMap;

const MIN_TEST_CASES: usize = 1;
const MAX_TEST_CASES: usize = 10;

proptest! {
	#![proptest_config(Config {
		failure_persistence: None,
		..Config::default()
	})]

	// Generated descriptors are valid configurations
	#[test]
	fn test_generated_chains_validate(chain in chain_descriptor_strategy()) {
		prop_assert!(chain.validate().is_ok());
	}

	// Descriptors survive a JSON round trip unchanged
	#[test]
	fn test_json_roundtrip(chain in chain_descriptor_strategy()) {
		let json = serde_json::to_string(&chain).unwrap();
		let parsed: ChainDescriptor = serde_json::from_str(&json).unwrap();

		prop_assert_eq!(parsed, chain);
	}

	// Query Operations Tests
	#[test]
	fn test_query_operations(
		chains in proptest::collection::vec(chain_descriptor_strategy(), MIN_TEST_CASES..MAX_TEST_CASES)
	) {
		let expected: HashMap<u64, ChainDescriptor> = chains
			.iter()
			.map(|chain| (chain.chain_id, chain.clone()))
			.collect();
		let repo = ChainRepository::from_chains(chains);

		for (chain_id, chain) in &expected {
			let fetched = repo.get(*chain_id);
			prop_assert_eq!(Some(chain), fetched.as_ref());
		}
		prop_assert_eq!(repo.get_all(), expected);
		prop_assert_eq!(repo.get(0), None);
	}

	// Enabled endpoints come out ordered by weight
	#[test]
	fn test_active_rpc_urls_ordered(chain in chain_descriptor_strategy()) {
		let weights: Vec<u32> = chain.active_rpc_urls().iter().map(|url| url.weight).collect();

		prop_assert!(!weights.is_empty());
		prop_assert!(weights.windows(2).all(|pair| pair[0] >= pair[1]));
	}
}

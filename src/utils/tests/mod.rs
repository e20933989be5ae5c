//! Test helper utilities
//!
//! - `builders`: Test helper utilities for creating test instances of models

pub mod builders {
	// Chain specific test helpers
	pub mod evm {
		pub mod block;
		pub mod receipt;
	}

	// Chain agnostic test helpers
	pub mod chain;
}

pub use builders::*;

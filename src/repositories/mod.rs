//! Repository implementations for configuration management.
//!
//! - Chain: Loads chain configurations defining RPC connection details
//!   and watcher tuning

mod chain;
mod error;

pub use chain::{ChainRepository, ChainRepositoryTrait, ChainService};
pub use error::RepositoryError;

//! Shared types for the tznft workspace.
//!
//! This crate holds the data model every other crate speaks, so the resolver,
//! transport and core crates never depend on each other just for types.
//!
//! - [`address`]: validated ledger addresses, secret keys and signers
//! - [`micheline`]: the node's JSON value encoding and schema-checked accessors
//! - [`token`]: token metadata and the mint descriptor format
//! - [`transfer`]: transfer batches and operator updates
//! - [`error`]: the error taxonomy shared by all library crates

pub mod address;
pub mod error;
pub mod micheline;
pub mod token;
pub mod transfer;

pub use address::{Address, SecretKey, Signer};
pub use error::{Result, TznftError};
pub use micheline::{Micheline, OrBranch};
pub use token::{parse_token_id, TokenMetadata};
pub use transfer::{
    transfer_param, update_operators_param, OperatorParam, OperatorUpdate, TransferBatchEntry,
    TransferDestination,
};

use std::time::Duration;

/// Configuration for retry behavior on network operations.
#[derive(Debug, Copy, Clone)]
pub struct RetryConfig {
    /// Number of retry attempts after the first try.
    pub retries: usize,
    /// Initial backoff duration between retries.
    pub initial_backoff: Duration,
    /// Maximum backoff duration.
    pub max_backoff: Duration,
}

impl RetryConfig {
    /// Create a new RetryConfig with the specified parameters.
    pub fn new(retries: usize, initial_backoff_ms: u64, max_backoff_ms: u64) -> Self {
        Self {
            retries,
            initial_backoff: Duration::from_millis(initial_backoff_ms),
            max_backoff: Duration::from_millis(max_backoff_ms),
        }
    }

    /// Upper bound on the number of calls a retried operation makes.
    pub fn max_attempts(&self) -> usize {
        self.retries + 1
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            retries: 8,
            initial_backoff: Duration::from_millis(250),
            max_backoff: Duration::from_millis(5000),
        }
    }
}

/// Serde helpers that carry arbitrary-precision naturals as decimal strings,
/// the same shape the node uses for `{"int": "..."}`.
pub mod biguint_string {
    use num_bigint::BigUint;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};
    use std::str::FromStr;

    pub fn serialize<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigUint, D::Error> {
        let s = String::deserialize(deserializer)?;
        BigUint::from_str(&s).map_err(D::Error::custom)
    }
}

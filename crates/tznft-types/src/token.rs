//! Token metadata and the mint descriptor format.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::error::{Result, TznftError};

/// Metadata for one token of a fixed collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    #[serde(with = "crate::biguint_string")]
    pub token_id: BigUint,
    pub symbol: String,
    pub name: String,
    #[serde(with = "crate::biguint_string")]
    pub decimals: BigUint,
    #[serde(default)]
    pub extras: BTreeMap<String, String>,
}

impl TokenMetadata {
    /// Parse a mint descriptor of the form `"id, symbol, name"`.
    ///
    /// Decimals are 0 and extras empty for NFTs. Token id uniqueness across a
    /// batch is not checked here.
    pub fn from_descriptor(descriptor: &str) -> Result<Self> {
        let fail = |reason: &str| TznftError::TokenFormat {
            descriptor: descriptor.to_string(),
            reason: reason.to_string(),
        };

        let fields: Vec<&str> = descriptor.split(',').map(str::trim).collect();
        let [id, symbol, name] = fields.as_slice() else {
            return Err(fail("expected 'id, symbol, name'"));
        };
        if symbol.is_empty() || name.is_empty() {
            return Err(fail("symbol and name must not be empty"));
        }
        let token_id = parse_token_id(id).ok_or_else(|| fail("token id is not a natural number"))?;

        Ok(Self {
            token_id,
            symbol: symbol.to_string(),
            name: name.to_string(),
            decimals: BigUint::from(0u32),
            extras: BTreeMap::new(),
        })
    }
}

/// Parse a token id field shared by all descriptor formats.
///
/// Only plain decimal digits are accepted; signs and `_` separators are not.
pub fn parse_token_id(field: &str) -> Option<BigUint> {
    let field = field.trim();
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    BigUint::from_str(field).ok()
}

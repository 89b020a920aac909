//! Ledger addresses, secret keys and signers.
//!
//! Addresses are 36-character base58 strings with a four-letter prefix:
//! - Implicit accounts: "tz1...", "tz2...", "tz3...", "tz4..."
//! - Originated contracts: "KT1..."
//!
//! Validation is structural (prefix, length, alphabet). Checksums are left to
//! the node, which rejects malformed addresses on submission.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, TznftError};

const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";
const ADDRESS_LEN: usize = 36;
const IMPLICIT_PREFIXES: [&str; 4] = ["tz1", "tz2", "tz3", "tz4"];
const CONTRACT_PREFIX: &str = "KT1";
const SECRET_KEY_PREFIXES: [&str; 3] = ["edsk", "spsk", "p2sk"];

fn is_base58(s: &str) -> bool {
    s.chars().all(|c| BASE58_ALPHABET.contains(c))
}

/// A syntactically valid ledger address.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Parse an address, trimming surrounding whitespace.
    ///
    /// ```
    /// use tznft_types::Address;
    ///
    /// let addr = Address::parse(" tz1aSkwEot3L2kmUvcoxzjMomb9mvBNuzFK6 ").unwrap();
    /// assert_eq!(addr.as_str(), "tz1aSkwEot3L2kmUvcoxzjMomb9mvBNuzFK6");
    /// assert!(Address::parse("bob").is_err());
    /// ```
    pub fn parse(value: &str) -> Result<Self> {
        let s = value.trim();
        let invalid = |reason: &str| TznftError::InvalidAddress {
            value: value.to_string(),
            reason: reason.to_string(),
        };

        if !s.is_ascii() || s.len() != ADDRESS_LEN {
            return Err(invalid("expected 36 characters"));
        }
        let prefix = &s[..3];
        if prefix != CONTRACT_PREFIX && !IMPLICIT_PREFIXES.contains(&prefix) {
            return Err(invalid("expected tz1, tz2, tz3, tz4 or KT1 prefix"));
        }
        if !is_base58(&s[3..]) {
            return Err(invalid("not base58"));
        }
        Ok(Self(s.to_string()))
    }

    /// Cheap syntactic check used to decide between alias and literal.
    pub fn is_valid(value: &str) -> bool {
        Self::parse(value).is_ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for originated contracts (`KT1...`).
    pub fn is_contract(&self) -> bool {
        self.0.starts_with(CONTRACT_PREFIX)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Address {
    type Err = TznftError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = TznftError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Address> for String {
    fn from(value: Address) -> Self {
        value.0
    }
}

/// An unencrypted secret key literal (`edsk...`, `spsk...`, `p2sk...`).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SecretKey(String);

impl SecretKey {
    pub fn parse(value: &str) -> Result<Self> {
        let s = value.trim();
        let has_prefix = SECRET_KEY_PREFIXES.iter().any(|p| s.starts_with(p));
        if !has_prefix || !(s.len() == 54 || s.len() == 98) || !is_base58(&s[4..]) {
            return Err(TznftError::config("malformed secret key"));
        }
        Ok(Self(s.to_string()))
    }

    pub fn is_valid(value: &str) -> bool {
        Self::parse(value).is_ok()
    }

    /// The raw key. Only the execution engine should see this.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKey({}...)", &self.0[..4])
    }
}

impl TryFrom<String> for SecretKey {
    type Error = TznftError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<SecretKey> for String {
    fn from(value: SecretKey) -> Self {
        value.0
    }
}

/// A private-key-backed signing identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signer {
    /// Configured alias this signer was resolved from, if any.
    pub alias: Option<String>,
    /// Public address; unknown for literal keys until the engine derives it.
    pub address: Option<Address>,
    pub secret: SecretKey,
}

impl Signer {
    /// Name used for this signer in logs and engine key stores.
    pub fn label(&self) -> String {
        match (&self.alias, &self.address) {
            (Some(alias), _) => alias.clone(),
            (None, Some(address)) => address.to_string(),
            (None, None) => "literal-key".to_string(),
        }
    }
}

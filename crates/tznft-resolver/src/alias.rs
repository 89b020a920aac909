//! Alias resolution.
//!
//! A user-facing identity token is either an alias configured for the active
//! network or a literal: an address for [`AliasResolver::resolve_address`], a
//! secret key for [`AliasResolver::resolve_signer`]. Aliases win over literals.
//! Resolution only reads configuration.

use tznft_types::{Address, Result, SecretKey, Signer, TznftError};

use crate::config::ConfigRead;

/// Check that `name` can be stored as an alias key.
pub fn validate_alias_name(name: &str) -> Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || trimmed != name
        || name.contains(['.', ',', ' '])
        || Address::is_valid(name)
    {
        return Err(TznftError::config(format!(
            "invalid alias name '{}': must be non-empty, without '.', ',' or spaces, and not an address",
            name
        )));
    }
    Ok(())
}

/// Resolves identity tokens against the active network's aliases.
#[derive(Clone, Copy)]
pub struct AliasResolver<'a> {
    config: &'a dyn ConfigRead,
}

impl<'a> AliasResolver<'a> {
    pub fn new(config: &'a dyn ConfigRead) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &'a dyn ConfigRead {
        self.config
    }

    /// Resolve `token` to an address.
    ///
    /// Resolving an already-canonical address returns it unchanged.
    pub fn resolve_address(&self, token: &str) -> Result<Address> {
        let token = token.trim();
        let network = self.config.active_network()?;
        if let Some(record) = self.config.alias(&network, token) {
            return Ok(record.address);
        }
        Address::parse(token).map_err(|_| TznftError::UnknownAlias {
            alias: token.to_string(),
        })
    }

    /// Resolve `token` to a signing identity.
    pub fn resolve_signer(&self, token: &str) -> Result<Signer> {
        let token = token.trim();
        let network = self.config.active_network()?;
        if let Some(record) = self.config.alias(&network, token) {
            let secret = record.secret.ok_or_else(|| TznftError::AliasWithoutKey {
                alias: token.to_string(),
            })?;
            return Ok(Signer {
                alias: Some(token.to_string()),
                address: Some(record.address),
                secret,
            });
        }
        let secret = SecretKey::parse(token).map_err(|_| TznftError::UnknownAlias {
            alias: token.to_string(),
        })?;
        Ok(Signer {
            alias: None,
            address: None,
            secret,
        })
    }
}

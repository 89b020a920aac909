//! tznft Resolver
//!
//! Configuration access and alias resolution.
//!
//! This crate provides:
//! - [`config`]: the key-value configuration store, split into read-only
//!   ([`ConfigRead`]) and read-write ([`ConfigWrite`]) capabilities
//! - [`alias`]: mapping user-facing alias strings to addresses and signers
//!
//! Every operation that accepts a human-entered identity (sender, recipient,
//! operator, owner) resolves it through [`AliasResolver`].

pub mod alias;
pub mod config;

pub use alias::{validate_alias_name, AliasResolver};
pub use config::{keys, AliasRecord, ConfigRead, ConfigWrite, JsonConfig};

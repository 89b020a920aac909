//! Configuration commands: networks and aliases of `tznft.json`

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use serde_json::json;

use super::{output::print_json, CliContext};
use tznft_resolver::{keys, validate_alias_name, AliasRecord, ConfigRead, ConfigWrite, JsonConfig};
use tznft_types::{Address, SecretKey};

#[derive(Parser, Debug)]
pub struct ConfigInitCmd {
    /// Overwrite an existing configuration file
    #[arg(long)]
    pub force: bool,
}

impl ConfigInitCmd {
    pub fn execute(&self, ctx: &CliContext) -> Result<()> {
        let path = &ctx.config_path;
        if path.exists() && !self.force {
            bail!(
                "{} already exists (use --force to overwrite)",
                path.display()
            );
        }
        let config = JsonConfig::create(path, JsonConfig::default_document())
            .with_context(|| format!("writing {}", path.display()))?;

        if ctx.json {
            return print_json(&json!({
                "config": path,
                "activeNetwork": config.active_network()?,
            }));
        }
        println!("Wrote {}", path.display());
        Ok(())
    }
}

#[derive(Parser, Debug)]
pub struct ShowNetworkCmd {
    /// List every configured network
    #[arg(long)]
    pub all: bool,
}

impl ShowNetworkCmd {
    pub fn execute(&self, ctx: &CliContext) -> Result<()> {
        let config = ctx.load_config()?;
        let active = config.active_network()?;

        let networks = if self.all {
            config.network_names()
        } else {
            vec![active.clone()]
        };

        if ctx.json {
            let entries: Vec<_> = networks
                .iter()
                .map(|name| {
                    json!({
                        "name": name,
                        "active": *name == active,
                        "providerUrl": config.provider_url(name),
                        "inspector": config.inspector(name),
                    })
                })
                .collect();
            return print_json(&entries);
        }

        for name in &networks {
            let marker = if *name == active { "*" } else { " " };
            println!(
                "{} {}  {}",
                marker,
                name,
                config.provider_url(name).as_deref().unwrap_or("<no providerUrl>")
            );
            if let Some(inspector) = config.inspector(name) {
                println!("    inspector: {}", inspector);
            }
        }
        Ok(())
    }
}

#[derive(Parser, Debug)]
pub struct SetNetworkCmd {
    /// Network name from availableNetworks
    pub network: String,
}

impl SetNetworkCmd {
    pub fn execute(&self, ctx: &CliContext) -> Result<()> {
        let mut config = ctx.load_config()?;
        let known = config.network_names();
        if !known.contains(&self.network) {
            bail!(
                "unknown network '{}' (configured: {})",
                self.network,
                known.join(", ")
            );
        }
        config.set(keys::ACTIVE_NETWORK, json!(self.network))?;

        if ctx.json {
            return print_json(&json!({ "activeNetwork": self.network }));
        }
        println!("Active network: {}", self.network);
        Ok(())
    }
}

#[derive(Parser, Debug)]
pub struct AddAliasCmd {
    /// Alias name
    pub alias: String,

    /// Address the alias stands for
    pub address: String,

    /// Secret key, required for aliases that sign operations
    #[arg(long)]
    pub secret: Option<String>,
}

impl AddAliasCmd {
    pub fn execute(&self, ctx: &CliContext) -> Result<()> {
        validate_alias_name(&self.alias)?;
        let record = AliasRecord {
            address: Address::parse(&self.address)?,
            secret: self.secret.as_deref().map(SecretKey::parse).transpose()?,
        };

        let mut config = ctx.load_config()?;
        let network = config.active_network()?;
        if config.get(&keys::alias(&network, &self.alias)).is_some() {
            bail!(
                "alias '{}' already exists on network '{}'; remove it first",
                self.alias,
                network
            );
        }
        config.set(&keys::alias(&network, &self.alias), serde_json::to_value(&record)?)?;

        if ctx.json {
            return print_json(&json!({
                "network": network,
                "alias": self.alias,
                "address": record.address,
                "canSign": record.secret.is_some(),
            }));
        }
        println!("Added alias '{}' -> {} on {}", self.alias, record.address, network);
        Ok(())
    }
}

#[derive(Parser, Debug)]
pub struct ShowAliasCmd {
    /// Alias to show; all aliases when omitted
    pub alias: Option<String>,
}

impl ShowAliasCmd {
    pub fn execute(&self, ctx: &CliContext) -> Result<()> {
        let config = ctx.load_config()?;
        let network = config.active_network()?;

        let names = match &self.alias {
            Some(alias) => vec![alias.clone()],
            None => config.alias_names(&network),
        };
        let mut entries = Vec::with_capacity(names.len());
        for name in names {
            let record = config
                .alias(&network, &name)
                .ok_or_else(|| anyhow!("alias '{}' is not configured on network '{}'", name, network))?;
            entries.push((name, record));
        }

        if ctx.json {
            let entries: Vec<_> = entries
                .iter()
                .map(|(name, record)| {
                    json!({
                        "alias": name,
                        "address": record.address,
                        "canSign": record.secret.is_some(),
                    })
                })
                .collect();
            return print_json(&entries);
        }

        if entries.is_empty() {
            println!("No aliases on network '{}'", network);
        }
        for (name, record) in &entries {
            let key = if record.secret.is_some() { "  (can sign)" } else { "" };
            println!("{}\t{}{}", name, record.address, key);
        }
        Ok(())
    }
}

#[derive(Parser, Debug)]
pub struct RemoveAliasCmd {
    /// Alias name
    pub alias: String,
}

impl RemoveAliasCmd {
    pub fn execute(&self, ctx: &CliContext) -> Result<()> {
        let mut config = ctx.load_config()?;
        let network = config.active_network()?;
        if config.remove(&keys::alias(&network, &self.alias))?.is_none() {
            bail!(
                "alias '{}' is not configured on network '{}'",
                self.alias,
                network
            );
        }

        if ctx.json {
            return print_json(&json!({ "network": network, "removed": self.alias }));
        }
        println!("Removed alias '{}' from {}", self.alias, network);
        Ok(())
    }
}

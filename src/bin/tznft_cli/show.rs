//! show-balance / show-meta commands

use anyhow::{Context, Result};
use clap::Parser;
use num_bigint::BigUint;

use super::output::{format_balances, format_metadata, print_json};
use super::{resolve_address, CliContext};
use tznft_core::query::{inspector_address, query_balances, query_metadata, BalanceRequest};
use tznft_resolver::AliasResolver;
use tznft_types::parse_token_id;

fn parse_ids(tokens: &[String]) -> Result<Vec<BigUint>> {
    tokens
        .iter()
        .map(|t| parse_token_id(t).with_context(|| format!("'{}' is not a token id", t)))
        .collect()
}

#[derive(Parser, Debug)]
pub struct ShowBalanceCmd {
    /// Collection contract (address or alias)
    #[arg(long)]
    pub nft: String,

    /// Identity paying for the inspector call (alias or secret key)
    #[arg(long)]
    pub signer: String,

    /// Token owner (address or alias)
    #[arg(long)]
    pub owner: String,

    /// Token ids to query
    #[arg(long, num_args = 1.., required = true, value_name = "TOKEN_ID")]
    pub tokens: Vec<String>,
}

impl ShowBalanceCmd {
    pub async fn execute(&self, ctx: &CliContext) -> Result<()> {
        let config = ctx.load_config()?;
        let inspector = inspector_address(&config)?;
        let token_ids = parse_ids(&self.tokens)?;
        let resolver = AliasResolver::new(&config);
        let nft = resolve_address(&resolver, &self.nft, "collection")?;
        let owner = resolve_address(&resolver, &self.owner, "owner")?;
        let handle = ctx.handle(&config, &self.signer).await?;

        let requests: Vec<BalanceRequest> = token_ids
            .into_iter()
            .map(|token_id| BalanceRequest {
                owner: owner.clone(),
                token_id,
            })
            .collect();
        let responses = query_balances(&*handle, &inspector, &nft, &requests)
            .await
            .context("querying balances")?;

        if ctx.json {
            return print_json(&responses);
        }
        print!("{}", format_balances(&responses));
        Ok(())
    }
}

#[derive(Parser, Debug)]
pub struct ShowMetaCmd {
    /// Collection contract (address or alias)
    #[arg(long)]
    pub nft: String,

    /// Identity used to connect (alias or secret key)
    #[arg(long)]
    pub signer: String,

    /// Token ids to look up
    #[arg(long, num_args = 1.., required = true, value_name = "TOKEN_ID")]
    pub tokens: Vec<String>,
}

impl ShowMetaCmd {
    pub async fn execute(&self, ctx: &CliContext) -> Result<()> {
        let config = ctx.load_config()?;
        let token_ids = parse_ids(&self.tokens)?;
        let resolver = AliasResolver::new(&config);
        let nft = resolve_address(&resolver, &self.nft, "collection")?;
        let handle = ctx.handle(&config, &self.signer).await?;

        let entries = query_metadata(&*handle, &nft, &token_ids)
            .await
            .context("reading token metadata")?;

        if ctx.json {
            return print_json(&entries);
        }
        print!("{}", format_metadata(&entries));
        Ok(())
    }
}

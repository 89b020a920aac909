//! transfer command

use anyhow::{Context, Result};
use clap::Parser;

use super::{output::print_receipt, resolve_address, CliContext};
use tznft_core::ops::transfer_tokens;
use tznft_resolver::AliasResolver;

#[derive(Parser, Debug)]
pub struct TransferCmd {
    /// Collection contract (address or alias)
    #[arg(long)]
    pub nft: String,

    /// Identity signing the transfer (alias or secret key)
    #[arg(long)]
    pub signer: String,

    /// Transfers, each as 'from, to, token_id'. Consecutive entries with the
    /// same sender are grouped.
    #[arg(long, num_args = 1.., required = true, value_name = "TRANSFER")]
    pub batch: Vec<String>,
}

impl TransferCmd {
    pub async fn execute(&self, ctx: &CliContext) -> Result<()> {
        let config = ctx.load_config()?;
        let handle = ctx.handle(&config, &self.signer).await?;
        let resolver = AliasResolver::new(&config);
        let nft = resolve_address(&resolver, &self.nft, "collection")?;

        let receipt = transfer_tokens(&*handle, &resolver, &nft, &self.batch)
            .await
            .context("transferring tokens")?;
        print_receipt("transfer", &nft, &receipt, ctx.json)
    }
}

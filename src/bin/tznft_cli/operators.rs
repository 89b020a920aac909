//! update-ops command

use anyhow::{bail, Context, Result};
use clap::Parser;

use super::{output::print_receipt, resolve_address, CliContext};
use tznft_core::ops::update_operators;
use tznft_resolver::AliasResolver;

#[derive(Parser, Debug)]
pub struct UpdateOpsCmd {
    /// Token owner (alias or secret key); signs the update
    pub owner: String,

    /// Collection contract (address or alias)
    #[arg(long)]
    pub nft: String,

    /// Operators to add, each as 'operator, token_id'
    #[arg(long, num_args = 1.., value_name = "OPERATOR")]
    pub add: Vec<String>,

    /// Operators to remove, each as 'operator, token_id'
    #[arg(long, num_args = 1.., value_name = "OPERATOR")]
    pub remove: Vec<String>,
}

impl UpdateOpsCmd {
    pub async fn execute(&self, ctx: &CliContext) -> Result<()> {
        if self.add.is_empty() && self.remove.is_empty() {
            bail!("nothing to do: pass --add and/or --remove");
        }
        let config = ctx.load_config()?;
        let handle = ctx.handle(&config, &self.owner).await?;
        let owner = handle.signer_address().clone();
        let resolver = AliasResolver::new(&config);
        let nft = resolve_address(&resolver, &self.nft, "collection")?;

        let receipt = update_operators(&*handle, &resolver, &nft, &owner, &self.add, &self.remove)
            .await
            .context("updating operators")?;
        print_receipt("update_operators", &nft, &receipt, ctx.json)
    }
}

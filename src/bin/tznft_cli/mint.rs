//! mint command - originate a new fixed collection

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;

use super::{output::print_json, CliContext};
use tznft_core::ops::{mint_collection, parse_tokens};
use tznft_resolver::keys;

#[derive(Parser, Debug)]
pub struct MintCmd {
    /// Owner of every minted token (alias or secret key); signs the origination
    pub owner: String,

    /// Tokens to mint, each as 'id, symbol, name'
    #[arg(long, num_args = 1.., required = true, value_name = "TOKEN")]
    pub tokens: Vec<String>,
}

impl MintCmd {
    pub async fn execute(&self, ctx: &CliContext) -> Result<()> {
        let config = ctx.load_config()?;
        let tokens = parse_tokens(&self.tokens)?;
        let code = ctx.contract_code(&config, keys::NFT_CODE)?;
        let handle = ctx.handle(&config, &self.owner).await?;
        let owner = handle.signer_address().clone();

        let nft = mint_collection(&*handle, &code, &owner, &tokens)
            .await
            .context("minting collection")?;

        if ctx.json {
            return print_json(&json!({
                "contract": nft,
                "owner": owner,
                "tokens": tokens,
            }));
        }
        println!("Minted {} token(s) owned by {}", tokens.len(), owner);
        println!("Collection contract: {}", nft);
        Ok(())
    }
}

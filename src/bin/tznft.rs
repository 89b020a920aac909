//! tznft: deploy and operate fixed NFT collections on Tezos networks
//!
//! ## Commands
//!
//! - **bootstrap** / **kill-sandbox**: start the local sandbox and deploy the
//!   balance inspector, or stop the sandbox
//! - **mint**: originate a new collection owned by one account
//! - **transfer**: submit a batch of token transfers
//! - **update-ops**: add or remove operators for the owner's tokens
//! - **show-balance** / **show-meta**: query balances and token metadata
//! - **config-init**, **show-network**, **set-network**, **add-alias**,
//!   **show-alias**, **remove-alias**: manage `tznft.json`
//!
//! ## Example Usage
//!
//! ```bash
//! tznft config-init
//! tznft bootstrap
//! tznft mint bob --tokens '1, TZ1, First token' '2, TZ2, Second token'
//! tznft transfer --nft KT1... --signer bob --batch 'bob, alice, 1' 'bob, alice, 2'
//! tznft show-balance --nft KT1... --signer bob --owner alice --tokens 1 2
//! tznft kill-sandbox
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;

mod tznft_cli;

use tznft_cli::{
    bootstrap::{BootstrapCmd, KillSandboxCmd},
    config_cmd::{
        AddAliasCmd, ConfigInitCmd, RemoveAliasCmd, SetNetworkCmd, ShowAliasCmd, ShowNetworkCmd,
    },
    mint::MintCmd,
    operators::UpdateOpsCmd,
    show::{ShowBalanceCmd, ShowMetaCmd},
    transfer::TransferCmd,
    CliContext,
};

#[derive(Parser)]
#[command(
    name = "tznft",
    author,
    version,
    about = "Deploy and operate fixed NFT collections on Tezos networks",
    long_about = "Originate FA2 NFT collections, transfer tokens in batches, manage operators\n\
                  and query balances and metadata against a sandbox or a public network."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file
    #[arg(long, global = true, env = "TZNFT_CONFIG", default_value = "tznft.json")]
    config: PathBuf,

    /// Output as JSON instead of human-readable format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (debug logs on stderr)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the sandbox (if active) and deploy the balance inspector
    Bootstrap(BootstrapCmd),

    /// Stop the sandbox network
    KillSandbox(KillSandboxCmd),

    /// Originate a new NFT collection
    Mint(MintCmd),

    /// Transfer tokens in one batch
    Transfer(TransferCmd),

    /// Add or remove operators for the owner's tokens
    UpdateOps(UpdateOpsCmd),

    /// Show token balances through the inspector contract
    ShowBalance(ShowBalanceCmd),

    /// Show token metadata
    ShowMeta(ShowMetaCmd),

    /// Write the default configuration file
    ConfigInit(ConfigInitCmd),

    /// Show the active network
    ShowNetwork(ShowNetworkCmd),

    /// Change the active network
    SetNetwork(SetNetworkCmd),

    /// Add an alias on the active network
    AddAlias(AddAliasCmd),

    /// Show one or all aliases of the active network
    ShowAlias(ShowAliasCmd),

    /// Remove an alias from the active network
    RemoveAlias(RemoveAliasCmd),
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let Cli {
        command,
        config,
        json,
        verbose,
    } = Cli::parse();
    init_logging(verbose);

    let ctx = CliContext::new(config, json);

    match command {
        Commands::Bootstrap(cmd) => cmd.execute(&ctx).await,
        Commands::KillSandbox(cmd) => cmd.execute(&ctx).await,
        Commands::Mint(cmd) => cmd.execute(&ctx).await,
        Commands::Transfer(cmd) => cmd.execute(&ctx).await,
        Commands::UpdateOps(cmd) => cmd.execute(&ctx).await,
        Commands::ShowBalance(cmd) => cmd.execute(&ctx).await,
        Commands::ShowMeta(cmd) => cmd.execute(&ctx).await,
        Commands::ConfigInit(cmd) => cmd.execute(&ctx),
        Commands::ShowNetwork(cmd) => cmd.execute(&ctx),
        Commands::SetNetwork(cmd) => cmd.execute(&ctx),
        Commands::AddAlias(cmd) => cmd.execute(&ctx),
        Commands::ShowAlias(cmd) => cmd.execute(&ctx),
        Commands::RemoveAlias(cmd) => cmd.execute(&ctx),
    }
}

//! bootstrap / kill-sandbox commands

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;

use super::{output::print_json, CliContext};
use tznft_core::bootstrap::kill_sandbox;
use tznft_core::{Bootstrap, ShellProcessController};
use tznft_resolver::{keys, ConfigRead};

#[derive(Parser, Debug)]
pub struct BootstrapCmd {}

impl BootstrapCmd {
    pub async fn execute(&self, ctx: &CliContext) -> Result<()> {
        let mut config = ctx.load_config()?;
        let network = config.active_network()?;
        let inspector_code = ctx.contract_code(&config, keys::INSPECTOR_CODE)?;
        let process = ShellProcessController::from_config(&config)?;
        let connector = ctx.connector();

        let inspector = Bootstrap::new(&connector, &process, inspector_code)
            .run(&mut config)
            .await
            .with_context(|| format!("bootstrapping network '{}'", network))?;

        if ctx.json {
            return print_json(&json!({
                "network": network,
                "inspector": inspector,
            }));
        }
        println!("Network '{}' is ready", network);
        println!("Inspector contract: {}", inspector);
        Ok(())
    }
}

#[derive(Parser, Debug)]
pub struct KillSandboxCmd {}

impl KillSandboxCmd {
    pub async fn execute(&self, ctx: &CliContext) -> Result<()> {
        let config = ctx.load_config()?;
        let network = config.active_network()?;
        let process = ShellProcessController::from_config(&config)?;
        kill_sandbox(&process, &config).await?;

        if ctx.json {
            return print_json(&json!({ "network": network, "stopped": true }));
        }
        println!("Sandbox stopped");
        Ok(())
    }
}

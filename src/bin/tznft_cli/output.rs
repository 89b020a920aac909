//! Output formatting for tznft CLI
//!
//! Every command prints either a short human-readable report or, with
//! `--json`, one pretty-printed JSON document on stdout.

use anyhow::Result;
use serde::Serialize;

use tznft_core::query::{BalanceResponse, MetadataEntry};
use tznft_core::OperationReceipt;
use tznft_types::Address;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Serialize)]
pub struct ReceiptJson<'a> {
    pub operation: &'a str,
    pub level: i64,
    pub contract: &'a Address,
}

/// Print a confirmed contract call.
pub fn print_receipt(action: &str, contract: &Address, receipt: &OperationReceipt, json: bool) -> Result<()> {
    if json {
        return print_json(&ReceiptJson {
            operation: &receipt.hash,
            level: receipt.level,
            contract,
        });
    }
    println!(
        "\x1b[32m✓\x1b[0m {} on {} confirmed at level {} ({})",
        action, contract, receipt.level, receipt.hash
    );
    Ok(())
}

pub fn format_balances(responses: &[BalanceResponse]) -> String {
    if responses.is_empty() {
        return "No balances returned\n".to_string();
    }
    let mut out = String::from("\x1b[1mBalances:\x1b[0m\n");
    for r in responses {
        out.push_str(&format!(
            "  owner: {}  token_id: {}  balance: {}\n",
            r.owner, r.token_id, r.balance
        ));
    }
    out
}

pub fn format_metadata(entries: &[MetadataEntry]) -> String {
    let mut out = String::from("\x1b[1mToken metadata:\x1b[0m\n");
    for entry in entries {
        match &entry.metadata {
            Some(meta) => {
                out.push_str(&format!(
                    "  token_id: {}  symbol: {}  name: {}\n",
                    entry.token_id, meta.symbol, meta.name
                ));
                for (key, value) in &meta.extras {
                    out.push_str(&format!("    {}: {}\n", key, value));
                }
            }
            None => out.push_str(&format!("  token_id: {}  \x1b[33mnot found\x1b[0m\n", entry.token_id)),
        }
    }
    out
}

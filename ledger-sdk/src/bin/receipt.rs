//! Receipt lookup tool
//!
//! Resolves the receipt (or record) of a transaction and prints it as JSON.

use anyhow::{Context, Result};
use clap::Parser;
use ledger_sdk::{AccountId, Client, ClientConfig, TransactionId, TransactionReceiptQuery, TransactionRecordQuery};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ledger-receipt")]
#[command(about = "Resolve the receipt of a submitted transaction")]
#[command(version)]
struct Cli {
    /// Transaction id, e.g. 0.0.1001@1700000000.000000000
    transaction_id: String,

    /// Client configuration file; LEDGER_SDK_* environment variables otherwise
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Only ask this node
    #[arg(short, long)]
    node: Option<String>,

    /// Include receipts of child transactions
    #[arg(long)]
    children: bool,

    /// Include receipts of duplicate submissions
    #[arg(long)]
    duplicates: bool,

    /// Fetch the full record instead of the receipt
    #[arg(long)]
    record: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ClientConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ClientConfig::from_env().context("loading configuration from environment")?,
    };
    let client = Client::from_config(config)?;

    let transaction_id: TransactionId = cli
        .transaction_id
        .parse()
        .context("parsing transaction id")?;
    let nodes = match &cli.node {
        Some(node) => vec![node.parse::<AccountId>().context("parsing node id")?],
        None => Vec::new(),
    };

    tracing::info!(transaction_id = %transaction_id, record = cli.record, "Looking up transaction");

    let output = if cli.record {
        let mut query = TransactionRecordQuery::new(transaction_id)
            .include_children(cli.children)
            .include_duplicates(cli.duplicates)
            .validate_status(false);
        if !nodes.is_empty() {
            query = query.with_node_account_ids(nodes);
        }
        serde_json::to_string_pretty(&query.execute(&client).await?)?
    } else {
        let mut query = TransactionReceiptQuery::new(transaction_id)
            .include_children(cli.children)
            .include_duplicates(cli.duplicates)
            .validate_status(false);
        if !nodes.is_empty() {
            query = query.with_node_account_ids(nodes);
        }
        serde_json::to_string_pretty(&query.execute(&client).await?)?
    };

    println!("{}", output);
    Ok(())
}

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use scallop_dash::config::AppConfig;
use scallop_dash::context::ProtocolContext;
use scallop_dash::market::MarketSnapshot;

mod cli;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;
    let cli = cli::Cli::parse();
    let mut config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        cli::Command::Serve { host, port } => {
            if let Some(host) = host {
                config.proxy.host = host;
            }
            if let Some(port) = port {
                config.proxy.port = port;
            }
            scallop_dash::api::serve(config).await
        }
        cli::Command::Markets { json } => {
            let context = ProtocolContext::new(config);
            let snapshot = context.try_fetch_market_assets().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                print_markets(&snapshot);
            }
            Ok(())
        }
        cli::Command::Balance {
            address,
            coin_type,
            decimals,
        } => {
            let context = ProtocolContext::new(config);
            let balance = context.lookup_balance(&address, &coin_type, decimals).await;
            println!("{balance}");
            Ok(())
        }
    }
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))?;
    Ok(())
}

fn print_markets(snapshot: &MarketSnapshot) {
    println!(
        "{:<10} {:>14} {:>18} {:>18} {:>10} {:>10} {:>8}",
        "SYMBOL", "PRICE", "SUPPLY", "BORROW", "DEPOSIT%", "BORROW%", "UTIL%"
    );
    for row in &snapshot.rows {
        println!(
            "{:<10} {:>14.4} {:>18.2} {:>18.2} {:>10.2} {:>10.2} {:>8.2}",
            row.symbol,
            row.price,
            row.total_supply,
            row.total_borrow,
            row.deposit_apy,
            row.borrow_apy,
            row.utilization
        );
    }
    if !snapshot.excluded.is_empty() {
        println!("excluded: {}", snapshot.excluded.join(", "));
    }
}

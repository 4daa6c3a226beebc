use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;

use tx_explorer::blockcypher::{BlockCypherClient, CoinSymbol, PushOutcome, TxHash};
use tx_explorer::config::load_or_default;
use tx_explorer::transactions::ConfidencePoll;

#[derive(Parser)]
#[command(name = "explorer-cli")]
#[command(about = "Query the hosted blockchain API from the command line", long_about = None)]
struct Cli {
    /// Optional TOML configuration (API base URL and token).
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a transaction
    Tx { coin: CoinSymbol, hash: TxHash },
    /// Show confidence figures for an unconfirmed transaction
    Confidence { coin: CoinSymbol, hash: TxHash },
    /// Decode a raw hex transaction
    Decode { coin: CoinSymbol, hex: String },
    /// Broadcast a raw hex transaction
    Push { coin: CoinSymbol, hex: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_or_default(cli.config.as_deref())?;
    let client = BlockCypherClient::new(config.blockcypher.clone())?;

    match cli.command {
        Commands::Tx { coin, hash } => {
            let limit = config.blockcypher.overview_input_limit;
            let tx = client.get_transaction_details(coin, &hash, limit, false).await?;
            print_json(&serde_json::to_value(&tx)?)?;
        }
        Commands::Confidence { coin, hash } => {
            let tx = client.get_transaction_details(coin, &hash, 1, false).await?;
            print_json(&serde_json::to_value(ConfidencePoll::from_details(&tx))?)?;
        }
        Commands::Decode { coin, hex } => {
            let decoded = client.decode_tx(coin, hex.trim()).await?;
            print_json(&decoded)?;
        }
        Commands::Push { coin, hex } => match client.push_tx(coin, hex.trim()).await? {
            PushOutcome::Broadcast { hash } => println!("Broadcast: {}", hash),
            PushOutcome::Rejected(errors) => {
                eprintln!("Transaction not broadcast for the following errors:");
                for error in errors {
                    eprintln!("  - {}", error);
                }
                std::process::exit(1);
            }
        },
    }

    Ok(())
}

fn print_json(value: &Value) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

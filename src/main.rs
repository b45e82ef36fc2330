use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod config;
mod db;
mod deals;
mod errors;
mod flights;
mod jobs;
mod notify;
mod retry;
mod sheets;
mod stocks;
mod templates;

#[cfg(test)]
mod tests;

#[derive(Parser)]
#[command(name = "deal_alerts", version, about = "Flight deal and stock news alerts")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search fares for every destination and alert customers on a price drop.
    Flights {
        /// Log messages instead of sending them.
        #[arg(long)]
        dry_run: bool,
    },
    /// Text the top headlines when the stock moved more than the threshold.
    Stocks {
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let ok = match cli.command {
        Command::Flights { dry_run } => match jobs::run_flights(dry_run) {
            Ok(summary) if summary.failed > 0 => {
                error!(failed = summary.failed, "Some destinations failed");
                false
            }
            Ok(_) => true,
            Err(e) => {
                error!("❌ Flight deal run aborted: {e}");
                false
            }
        },
        Command::Stocks { dry_run } => match jobs::run_stocks(dry_run) {
            Ok(_) => true,
            Err(e) => {
                error!("❌ Stock alert failed: {e}");
                false
            }
        },
    };

    if !ok {
        std::process::exit(1);
    }
    info!("Done.");
}

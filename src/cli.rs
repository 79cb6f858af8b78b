use clap::{Args, Parser, Subcommand};

use crate::commands;
use crate::models::AlertPolicy;

#[derive(Parser)]
#[command(name = "pricewatch")]
#[command(about = "Unattended price tracking for saved product pages", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Engine options shared by the cycle-running commands
#[derive(Args, Clone)]
pub struct EngineArgs {
    /// Minutes between scheduled checks
    #[arg(long, default_value_t = 1440)]
    pub period: u64,

    /// Alert policy: price-drop or same-price
    #[arg(long, default_value = "price-drop")]
    pub alert_policy: AlertPolicy,

    /// Only alert on drops of at least this percentage
    #[arg(long)]
    pub significance: Option<f64>,

    /// Price history entries kept per product
    #[arg(long, default_value_t = 30)]
    pub max_history: usize,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the tracking engine until interrupted
    Watch {
        #[command(flatten)]
        engine: EngineArgs,
    },
    /// Run a single check cycle now
    Check {
        #[command(flatten)]
        engine: EngineArgs,
    },
    /// Save a product page for tracking
    Add {
        /// Product page URL
        url: String,
        /// Product title
        #[arg(short, long)]
        title: String,
        /// Current price display text (e.g. "$29.99")
        #[arg(short, long, default_value = "")]
        price: String,
    },
    /// Stop tracking a product and discard its record
    Remove {
        /// Product id (see `status`)
        id: String,
    },
    /// Show tracked products and their last known prices
    Status,
    /// Show the recorded price history of a product
    History {
        /// Product id (see `status`)
        id: String,
    },
    /// Drop history entries older than an age window
    Prune {
        /// Product id (see `status`)
        id: String,
        /// Keep entries newer than this many days
        #[arg(long, default_value_t = 90)]
        days: i64,
    },
}

pub async fn run() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Watch { engine } => {
            commands::watch::run(engine).await;
        }
        Commands::Check { engine } => {
            commands::check::run(engine).await;
        }
        Commands::Add { url, title, price } => {
            commands::add::run(url, title, price).await;
        }
        Commands::Remove { id } => {
            commands::remove::run(id).await;
        }
        Commands::Status => {
            commands::status::run().await;
        }
        Commands::History { id } => {
            commands::history::run(id).await;
        }
        Commands::Prune { id, days } => {
            commands::prune::run(id, days).await;
        }
    }
}

//! Operations CLI for EventDash
//!
//! `eventdash seed` fills the events table with weighted demo data so the
//! dashboard has something to show.

mod seed;

use anyhow::Result;
use clap::{Parser, Subcommand};
use event_store::{PgEventStore, StorePool};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "eventdash")]
#[command(about = "Operations CLI for EventDash management")]
struct Cli {
    /// Postgres connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Seed the events table with randomized demo data
    Seed {
        /// Number of events to generate
        #[arg(long, default_value = "1000")]
        count: usize,

        /// Spread events over the past N days
        #[arg(long, default_value = "30")]
        days: i64,

        /// Events per insert batch
        #[arg(long, default_value = "500")]
        batch_size: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,sqlx=warn".into()),
        )
        .init();

    let cli = Cli::parse();

    let pool = StorePool::new(&cli.database_url).await?;
    let store = PgEventStore::new(pool.pool().clone());

    match cli.command {
        Command::Seed {
            count,
            days,
            batch_size,
        } => {
            let options = seed::SeedOptions {
                count,
                days,
                batch_size,
            };
            let inserted = seed::run(&store, options).await?;
            info!(inserted, "Seeding complete");
        }
    }

    pool.close().await;
    Ok(())
}

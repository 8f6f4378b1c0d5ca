use clap::Parser;
use quoterack_api::RemoteClient;
use quoterack_core::{Config, QuoteStore, StoreEvent, SyncCoordinator, ALL_CATEGORIES};
use quoterack_storage::KvStore;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "quoterack")]
#[command(version, about = "Random quote generator with local persistence and remote sync", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Show one random quote
    Show {
        /// Limit the pick to one category
        #[arg(long)]
        category: Option<String>,
    },
    /// Add a quote
    Add {
        /// Quote text
        text: String,
        /// Category name
        category: String,
    },
    /// List quotes, optionally filtered by category
    List {
        #[arg(long)]
        category: Option<String>,
    },
    /// List known categories
    Categories,
    /// Import quotes from a JSON file
    Import {
        /// Path to a JSON array of {text, category} objects
        file: PathBuf,
    },
    /// Export all quotes to a JSON file
    Export {
        /// Destination path
        file: PathBuf,
    },
    /// Pull, merge, and push against the remote once
    Sync,
    /// Run the periodic sync loop until interrupted
    Watch,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging - helps when things go sideways
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quoterack=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    let db_path = config.storage.resolve_path()?;
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut store = QuoteStore::open(KvStore::open(&db_path)?);

    match cli.command {
        Commands::Show { category } => {
            // No explicit category falls back to the remembered filter
            let filter = category
                .or_else(|| store.last_filter())
                .unwrap_or_else(|| ALL_CATEGORIES.to_string());
            let pool = store.filter_by_category(&filter);
            match store.pick_random(&pool) {
                Some(quote) => println!("\"{}\" - {}", quote.text, quote.category),
                None => println!("No quotes found for this category."),
            }
        }
        Commands::Add { text, category } => {
            let record = store.add(&text, &category)?;
            println!("Added \"{}\" under {}", record.text, record.category);
        }
        Commands::List { category } => {
            let filter = category.unwrap_or_else(|| ALL_CATEGORIES.to_string());
            for quote in store.filter_by_category(&filter) {
                println!("[{}] {}", quote.category, quote.text);
            }
        }
        Commands::Categories => {
            for category in store.categories() {
                println!("{}", category);
            }
        }
        Commands::Import { file } => {
            let payload = std::fs::read_to_string(&file)?;
            let count = store.import_bulk(&payload)?;
            println!("Imported {} quotes", count);
        }
        Commands::Export { file } => {
            std::fs::write(&file, store.export_json()?)?;
            println!(
                "Exported {} quotes to {}",
                store.quotes().len(),
                file.display()
            );
        }
        Commands::Sync => {
            let sync = build_sync(&config, &store);
            let added = sync.sync_once(&mut store).await;
            println!("Sync complete, {} new quotes", added);
        }
        Commands::Watch => {
            if !config.sync.enabled {
                anyhow::bail!("sync is disabled in the config");
            }
            let sync = build_sync(&config, &store);
            let mut events = store.subscribe();
            let store = Arc::new(Mutex::new(store));
            let handle = sync.spawn(store, Duration::from_secs(config.sync.interval_secs));

            tracing::info!(
                "sync loop running every {}s, ctrl-c to stop",
                config.sync.interval_secs
            );
            loop {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => break,
                    event = events.recv() => {
                        if let Ok(event) = event {
                            match event {
                                StoreEvent::SyncMerged(count) => {
                                    println!("Picked up {} new quotes from the server", count);
                                }
                                StoreEvent::SyncFailed(reason) => {
                                    tracing::warn!("sync problem: {}", reason);
                                }
                                _ => {}
                            }
                        }
                    }
                }
            }
            handle.stop().await;
        }
    }

    Ok(())
}

fn build_sync(config: &Config, store: &QuoteStore) -> SyncCoordinator {
    let client =
        RemoteClient::with_endpoint(config.sync.remote_url.clone(), config.sync.timeout_secs);
    SyncCoordinator::new(Box::new(client), store.event_bus())
}

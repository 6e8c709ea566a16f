use clap::Parser;
use eco_ledger::application::ledger::RewardLedger;
use eco_ledger::config::Config;
use eco_ledger::domain::identity::Identity;
use eco_ledger::domain::ports::LedgerStoreBox;
use eco_ledger::error::Result as LedgerResult;
use eco_ledger::infrastructure::in_memory::InMemoryLedgerStore;
#[cfg(feature = "storage-rocksdb")]
use eco_ledger::infrastructure::rocksdb::RocksDbStore;
use eco_ledger::interfaces::csv::balance_writer::BalanceWriter;
use eco_ledger::interfaces::csv::command_reader::CommandReader;
use eco_ledger::interfaces::json::event_writer::EventWriter;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input commands CSV file
    input: PathBuf,

    /// Administrator identity. Overrides the config file.
    #[arg(long)]
    admin: Option<String>,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the event log to this file as JSON lines
    #[arg(long)]
    events: Option<PathBuf>,

    /// Replay the event log and check it against stored balances
    #[arg(long)]
    audit: bool,
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}

#[cfg(feature = "storage-rocksdb")]
fn open_store(db_path: Option<&Path>) -> LedgerResult<LedgerStoreBox> {
    match db_path {
        Some(path) => {
            info!(path = %path.display(), "Using RocksDB storage");
            Ok(Box::new(RocksDbStore::open(path)?))
        }
        None => Ok(Box::new(InMemoryLedgerStore::new())),
    }
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_store(db_path: Option<&Path>) -> LedgerResult<LedgerStoreBox> {
    if db_path.is_some() {
        warn!(
            "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to in-memory storage."
        );
    }
    Ok(Box::new(InMemoryLedgerStore::new()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load(path).into_diagnostic()?,
        None => Config::default(),
    };
    if let Some(admin) = cli.admin {
        config.administrator = Some(Identity::new(admin).into_diagnostic()?);
    }
    if cli.db_path.is_some() {
        config.db_path = cli.db_path;
    }

    init_tracing(&config.log_filter);

    let administrator = config.require_administrator().into_diagnostic()?;
    let store = open_store(config.db_path.as_deref()).into_diagnostic()?;
    let ledger = RewardLedger::open(store, administrator, config.tier_policy)
        .await
        .into_diagnostic()?;

    // Apply commands in file order; a rejected row never stops the batch.
    let file = File::open(&cli.input).into_diagnostic()?;
    let reader = CommandReader::new(file);
    for (index, command) in reader.commands().enumerate() {
        let row = index + 1;
        match command {
            Ok(command) => {
                if let Err(e) = ledger.execute(command).await {
                    warn!(row, error = %e, "Error processing command");
                }
            }
            Err(e) => {
                warn!(row, error = %e, "Error reading command");
            }
        }
    }

    if let Some(path) = &cli.events {
        let events = ledger.events().await.into_diagnostic()?;
        let sink = BufWriter::new(File::create(path).into_diagnostic()?);
        EventWriter::new(sink)
            .write_events(&events)
            .into_diagnostic()?;
        info!(count = events.len(), path = %path.display(), "Event log written");
    }

    if cli.audit {
        let projection = ledger.audit().await.into_diagnostic()?;
        info!(owners = projection.balances.len(), "Audit passed");
    }

    let balances = ledger.into_balances().await.into_diagnostic()?;

    let stdout = io::stdout();
    let mut writer = BalanceWriter::new(stdout.lock());
    writer.write_balances(&balances).into_diagnostic()?;

    Ok(())
}

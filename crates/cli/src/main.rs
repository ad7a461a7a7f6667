use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sectorboard_core::domain::observation::{Rating, RatingSection};
use sectorboard_core::editor::{self, Edit};
use sectorboard_core::error::DashboardError;
use sectorboard_core::storage::csv_file::CsvFileStore;
use sectorboard_core::storage::lock::WriteGate;
use sectorboard_core::storage::TabularStore;

#[derive(Debug, Parser)]
#[command(name = "sectorboard_cli")]
struct Args {
    /// Observation CSV. Defaults to $DATA_FILE, then daily_stocks.csv.
    #[arg(long)]
    data_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the stacked sector chart document as JSON.
    Chart,

    /// Print the before/after rating accuracy summary as JSON.
    Summary,

    /// Print the latest state and history of one stock.
    Show {
        #[arg(long)]
        stock: String,
    },

    /// Record a before/after rating on a stock's latest row.
    Rate {
        #[arg(long)]
        stock: String,

        /// before | after
        #[arg(long)]
        section: RatingSection,

        /// Buy | Sell | Not
        #[arg(long)]
        rating: Rating,

        /// Apply the edit and print the result without writing the file.
        #[arg(long)]
        dry_run: bool,
    },

    /// Replace the note on a stock's latest row.
    Note {
        #[arg(long)]
        stock: String,

        #[arg(long)]
        text: String,

        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let settings = sectorboard_core::config::Settings::from_env()?.with_data_file(args.data_file);
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let store = CsvFileStore::from_settings(&settings);

    if let Err(err) = run(&store, args.command).await {
        if DashboardError::find(&err).is_none() {
            sentry_anyhow::capture_anyhow(&err);
        }
        tracing::error!(path = %store.path().display(), error = %err, "command failed");
        return Err(err);
    }
    Ok(())
}

async fn run(store: &CsvFileStore, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Chart => {
            let table = store.load().await?;
            let chart = sectorboard_core::chart::build_chart(&table)?;
            print_json(&chart)
        }
        Command::Summary => {
            let table = store.load().await?;
            let summary = sectorboard_core::accuracy::summarize(&table)?;
            print_json(&summary)
        }
        Command::Show { stock } => {
            let table = store.load().await?;
            let view = editor::stock_view(&table, &stock).ok_or_else(|| {
                DashboardError::StockNotFound {
                    stock: stock.trim().to_string(),
                }
            })?;
            print_json(&view)
        }
        Command::Rate {
            stock,
            section,
            rating,
            dry_run,
        } => apply(store, &stock, Edit::Rating { section, rating }, dry_run).await,
        Command::Note {
            stock,
            text,
            dry_run,
        } => apply(store, &stock, Edit::note(&text), dry_run).await,
    }
}

async fn apply(store: &CsvFileStore, stock: &str, edit: Edit, dry_run: bool) -> anyhow::Result<()> {
    let table = if dry_run {
        let mut table = store.load().await?;
        let row = editor::apply_edit(&mut table, stock, &edit)?;
        tracing::info!(stock, row, dry_run = true, "edit applied in memory only");
        table
    } else {
        let gate = WriteGate::new();
        editor::edit_and_persist(store, &gate, stock, &edit).await?;
        tracing::info!(stock, message = edit.confirmation(), "edit saved");
        store.load().await?
    };

    let view = editor::stock_view(&table, stock).ok_or_else(|| DashboardError::StockNotFound {
        stock: stock.trim().to_string(),
    })?;
    print_json(&view)
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn init_sentry(settings: &sectorboard_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use lendbook::application::ledger::LedgerService;
use lendbook::application::report::{self, ClientFilter, PaymentFilter};
use lendbook::config::AppConfig;
use lendbook::domain::client::PaymentDay;
use lendbook::domain::money::Rate;
use lendbook::domain::ports::{ClientStoreBox, PaymentStoreBox};
use lendbook::domain::schedule;
use lendbook::domain::status::StatusKind;
use lendbook::infrastructure::in_memory::{InMemoryClientStore, InMemoryPaymentStore};
use lendbook::interfaces::csv::client_reader::ClientReader;
use lendbook::interfaces::csv::payment_reader::PaymentReader;
use lendbook::interfaces::csv::report_writer::ReportWriter;
use log::error;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

/// Where the client and payment tables come from.
#[derive(Args)]
struct Tables {
    /// Clients CSV file
    #[arg(long)]
    clients: Option<PathBuf>,

    /// Payments CSV file
    #[arg(long)]
    payments: Option<PathBuf>,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Classify a payment made on ACTUAL against its EXPECTED date
    Classify { expected: String, actual: String },

    /// Next due date for a payment day, strictly after the reference date
    NextDue {
        day: i64,

        /// Reference date (defaults to today)
        #[arg(long)]
        from: Option<String>,
    },

    /// List payments with their status, newest first
    Payments {
        #[command(flatten)]
        tables: Tables,

        #[arg(long)]
        status: Option<StatusKind>,

        #[arg(long)]
        client: Option<u32>,

        #[arg(long)]
        search: Option<String>,

        /// 1-based page, sized by `items_per_page`
        #[arg(long)]
        page: Option<usize>,
    },

    /// Clients due within the horizon, soonest first
    Upcoming {
        #[command(flatten)]
        tables: Tables,

        /// Reference date (defaults to today)
        #[arg(long)]
        as_of: Option<String>,

        /// Days ahead to include (defaults to `upcoming_horizon_days`)
        #[arg(long)]
        horizon: Option<u32>,

        #[arg(long)]
        limit: Option<usize>,
    },

    /// Portfolio totals and payment status counts
    Summary {
        #[command(flatten)]
        tables: Tables,

        /// Reference month for `collected_this_month` (defaults to today)
        #[arg(long)]
        as_of: Option<String>,
    },

    /// Active clients with their monthly payment and next due date
    Clients {
        #[command(flatten)]
        tables: Tables,

        /// Reference date for the next due date (defaults to today)
        #[arg(long)]
        as_of: Option<String>,

        #[arg(long)]
        search: Option<String>,
    },

    /// Amount collected per month
    Monthly {
        #[command(flatten)]
        tables: Tables,
    },

    /// Clients ranked by amount paid
    TopClients {
        #[command(flatten)]
        tables: Tables,

        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

fn reference_date(input: Option<&str>) -> Result<NaiveDate> {
    match input {
        Some(date) => schedule::parse_date(date).into_diagnostic(),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

fn open_stores(tables: &Tables) -> Result<(ClientStoreBox, PaymentStoreBox)> {
    if let Some(db_path) = &tables.db_path {
        #[cfg(feature = "storage-rocksdb")]
        {
            use lendbook::infrastructure::rocksdb::RocksDBStore;
            let store = RocksDBStore::open(db_path).into_diagnostic()?;
            log::info!("Using RocksDB storage at {}", db_path.display());
            return Ok((Box::new(store.clone()), Box::new(store)));
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        log::warn!(
            "Persistent storage requested via --db-path ({}), but 'storage-rocksdb' feature is not enabled. Falling back to in-memory storage.",
            db_path.display()
        );
    }
    Ok((
        Box::new(InMemoryClientStore::new()),
        Box::new(InMemoryPaymentStore::new()),
    ))
}

async fn open_ledger(tables: &Tables, config: &AppConfig) -> Result<LedgerService> {
    let (client_store, payment_store) = open_stores(tables)?;
    let ledger = LedgerService::new(client_store, payment_store);

    if let Some(path) = &tables.clients {
        let default_rate = Rate::new(config.default_monthly_percentage).into_diagnostic()?;
        let file = File::open(path).into_diagnostic()?;
        for result in ClientReader::with_default_rate(file, default_rate).clients() {
            match result {
                Ok(client) => {
                    if let Err(e) = ledger.add_client(client).await {
                        error!("Error registering client: {}", e);
                    }
                }
                Err(e) => error!("Error reading client: {}", e),
            }
        }
    }

    if let Some(path) = &tables.payments {
        let file = File::open(path).into_diagnostic()?;
        for result in PaymentReader::new(file).payments() {
            match result {
                Ok(payment) => {
                    if let Err(e) = ledger.record_payment(payment).await {
                        error!("Error recording payment: {}", e);
                    }
                }
                Err(e) => error!("Error reading payment: {}", e),
            }
        }
    }

    Ok(ledger)
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => AppConfig::load(path).into_diagnostic()?,
        None => AppConfig::default(),
    };

    let stdout = io::stdout();
    let mut writer = ReportWriter::new(stdout.lock());

    match cli.command {
        Command::Classify { expected, actual } => {
            let status = schedule::classify_dates(&expected, &actual).into_diagnostic()?;
            println!("{},{}", status.kind(), status.days());
        }
        Command::NextDue { day, from } => {
            let reference = reference_date(from.as_deref())?;
            let day = PaymentDay::new(day).into_diagnostic()?;
            let next = schedule::next_due_date(day, reference).into_diagnostic()?;
            println!("{}", next);
        }
        Command::Payments {
            tables,
            status,
            client,
            search,
            page,
        } => {
            let ledger = open_ledger(&tables, &config).await?;
            let payments = ledger.classified_payments().await.into_diagnostic()?;
            let filter = PaymentFilter {
                search,
                status,
                client_id: client,
            };
            let matching = filter.apply(&payments);
            let shown = match page {
                Some(page) => report::paginate(&matching, page, config.items_per_page),
                None => &matching[..],
            };
            writer
                .write_payments(shown.iter().copied())
                .into_diagnostic()?;
        }
        Command::Upcoming {
            tables,
            as_of,
            horizon,
            limit,
        } => {
            let reference = reference_date(as_of.as_deref())?;
            let ledger = open_ledger(&tables, &config).await?;
            let horizon = horizon.unwrap_or(config.upcoming_horizon_days);
            let limit = limit.or(Some(config.upcoming_limit));
            let upcoming = ledger
                .upcoming(reference, horizon, limit)
                .await
                .into_diagnostic()?;
            writer.write_upcoming(&upcoming).into_diagnostic()?;
        }
        Command::Summary { tables, as_of } => {
            let reference = reference_date(as_of.as_deref())?;
            let ledger = open_ledger(&tables, &config).await?;
            let summary = ledger.summary(reference).await.into_diagnostic()?;
            writer.write_summary(&summary, &config).into_diagnostic()?;
        }
        Command::Clients {
            tables,
            as_of,
            search,
        } => {
            let reference = reference_date(as_of.as_deref())?;
            let ledger = open_ledger(&tables, &config).await?;
            let clients = ledger.active_clients().await.into_diagnostic()?;
            let filter = ClientFilter { search };
            let matching: Vec<_> = clients.iter().filter(|c| filter.matches(c)).collect();
            writer
                .write_clients(&matching, reference)
                .into_diagnostic()?;
        }
        Command::Monthly { tables } => {
            let ledger = open_ledger(&tables, &config).await?;
            let payments = ledger.classified_payments().await.into_diagnostic()?;
            writer
                .write_monthly_totals(&report::monthly_totals(&payments))
                .into_diagnostic()?;
        }
        Command::TopClients { tables, limit } => {
            let ledger = open_ledger(&tables, &config).await?;
            let payments = ledger.classified_payments().await.into_diagnostic()?;
            writer
                .write_top_clients(&report::top_clients(&payments, limit))
                .into_diagnostic()?;
        }
    }

    Ok(())
}

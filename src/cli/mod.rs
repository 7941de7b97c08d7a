use std::{borrow::Cow, net::SocketAddr, sync::Arc};

use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crate::{
    clock::SystemClock,
    ledger::{http::reps, services::LedgerService},
    repos::DynDashboardRepo,
    server,
    storage::RecordStore,
};

#[derive(Parser)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,

    /// DSN to tell Sentry where to send events.
    ///
    /// If provided, errors will be sent to Sentry.
    #[clap(long = "sentry-dsn", env = "SENTRY_DSN")]
    sentry_dsn: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    Serve(ServeOpts),
    Statement(StatementOpts),
}

#[derive(Args)]
struct StoreOpts {
    /// Connection string for Redis.
    ///
    /// If this is not set, records are kept in memory and lost when the
    /// process exits.
    #[clap(long = "redis-url", env = "REDIS_URL")]
    redis_url: Option<String>,
}

#[derive(Args)]
struct ServeOpts {
    /// Address to listen on.
    #[clap(long = "address", default_value = "0.0.0.0:8000", env = "BIND_ADDRESS")]
    address: SocketAddr,

    /// Origin allowed to make cross-origin requests. May be repeated.
    ///
    /// If none are given, any origin is allowed.
    #[clap(long = "allowed-origin", env = "ALLOWED_ORIGIN", use_value_delimiter = true)]
    allowed_origins: Vec<String>,

    #[clap(flatten)]
    store: StoreOpts,
}

impl From<ServeOpts> for server::Options {
    fn from(opts: ServeOpts) -> Self {
        Self {
            address: opts.address,
            allowed_origins: opts.allowed_origins,
            redis_url: opts.store.redis_url,
        }
    }
}

/// Print a customer's account statement as JSON.
#[derive(Args)]
struct StatementOpts {
    /// ID of the customer.
    customer_id: Uuid,

    #[clap(flatten)]
    store: StoreOpts,
}

fn print_statement(opts: StatementOpts) -> anyhow::Result<()> {
    let store = server::open_store(opts.store.redis_url.as_deref())?;
    let repo: DynDashboardRepo = Arc::new(RecordStore::new(store));
    let ledger = LedgerService::new(repo, Arc::new(SystemClock));

    let statement = ledger.customer_statement(opts.customer_id)?;
    println!(
        "{}",
        serde_json::to_string_pretty(&reps::Statement::from(&statement))?
    );

    Ok(())
}

pub async fn run_with_sys_args() -> anyhow::Result<()> {
    use tracing_subscriber::prelude::*;

    let cli = Cli::parse();

    let sentry_config = cli.sentry_dsn.map(|dsn| {
        debug!("Enabled sentry.");

        let release_name = option_env!("GIT_SHA")
            .map(Cow::from)
            .or_else(|| sentry::release_name!());

        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: release_name,
                ..Default::default()
            },
        ))
    });

    let sentry_tracing_layer = if sentry_config.is_some() {
        Some(sentry_tracing::layer())
    } else {
        None
    };

    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(EnvFilter::from_default_env());

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(sentry_tracing_layer)
        .init();

    match cli.command {
        Commands::Serve(opts) => server::serve(opts.into()).await,
        Commands::Statement(opts) => print_statement(opts),
    }
}

//! `newsdesk` - operator CLI for the newsdesk admin backend.
//!
//! Signs in once, keeps the session in the credential file and reuses it
//! (refreshing as needed) on every later invocation.
//!
//! ```text
//! newsdesk login admin            # password from NEWSDESK_PASSWORD or --password
//! newsdesk news list --status published
//! newsdesk ad home-top --lang ru
//! newsdesk logout
//! ```
//!
//! Results are printed to stdout as JSON; logs go to stderr.

mod cmd;
mod output;

use clap::Parser as _;
use newsdesk_api::{ApiError, AuthenticatedHttpClient, ClientConfig};
use newsdesk_auth::{SessionHandle, StoreConfig};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Operator CLI for the newsdesk news and ads backend
#[derive(Debug, clap::Parser)]
#[command(name = "newsdesk", version)]
struct Cli {
    /// Backend base URL (e.g. https://news.example.com/api/v1)
    #[arg(long, global = true, env = "NEWSDESK_API_BASE_URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: cmd::Commands,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    if let Err(err) = run().await {
        eprintln!("error: {}", describe(&err));
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = cli.base_url {
        config = config.with_base_url(base_url);
    }

    let store = StoreConfig::from_env().open();
    tracing::debug!(path = %store.path().display(), "Using credential file");
    let session = Arc::new(SessionHandle::load(Arc::new(store))?);
    let client = AuthenticatedHttpClient::new(config, session)?;

    cmd::run(&client, cli.command).await
}

/// Message shown for a failed command.
fn describe(err: &anyhow::Error) -> String {
    match err.downcast_ref::<ApiError>() {
        Some(api) if api.requires_reauth() => "session expired, run `newsdesk login`".to_string(),
        _ => format!("{err:#}"),
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "newsdesk=info,newsdesk_api=warn,newsdesk_auth=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

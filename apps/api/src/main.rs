mod ats;
mod config;
mod errors;
mod extraction;
mod llm_client;
mod models;
mod routes;
mod session;
mod state;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::ats::report::AtsReport;
use crate::ats::scraper::parse_ats_result;
use crate::config::Config;
use crate::llm_client::{GeminiClient, TextGenerator};
use crate::routes::build_router;
use crate::session::client::AtsApiClient;
use crate::session::flow::{extract_selected, new_session, run_analysis, Pacing};
use crate::session::{SelectedFile, SessionError};
use crate::state::AppState;

#[derive(Parser)]
#[command(name = "jobfit-api", version)]
#[command(about = "Resume ATS scoring service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API (default)
    Serve,
    /// Score a PDF resume through a running API and print the report
    Check {
        file: PathBuf,

        #[arg(long, env = "ATS_SERVER_URL", default_value = "http://localhost:5000")]
        server: String,

        /// Skip the stage delays
        #[arg(long)]
        no_delay: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve().await,
        Command::Check {
            file,
            server,
            no_delay,
        } => {
            init_tracing(&std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string()));
            let pacing = if no_delay {
                Pacing::immediate()
            } else {
                Pacing::default()
            };
            check(&file, &server, pacing).await
        }
    }
}

fn init_tracing(level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), level))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn serve() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    init_tracing(&config.rust_log);
    info!("Starting JobFit API v{}", env!("CARGO_PKG_VERSION"));

    let gemini = GeminiClient::from_config(&config).context("Failed to build Gemini client")?;
    info!("LLM client initialized (model: {})", gemini.model());
    info!("CORS origin: {}", config.client_url);

    let state = AppState {
        generator: Arc::new(gemini),
        config: config.clone(),
    };

    let app = build_router(state)?.layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Terminal rendition of the upload → extract → analyze → results flow.
/// Ctrl-C closes the session, discarding whatever is still in flight.
async fn check(path: &Path, server: &str, pacing: Pacing) -> Result<()> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let session = new_session();
    session
        .lock()
        .await
        .select_file(SelectedFile::from_path(path, bytes.into()))?;

    let backend = AtsApiClient::new(server)?;
    let flow = async {
        eprintln!("Parsing resume...");
        extract_selected(&session).await?;

        eprintln!("Running ATS analysis against {server}...");
        run_analysis(&session, &backend, pacing).await
    };

    let response = tokio::select! {
        outcome = flow => outcome?,
        _ = tokio::signal::ctrl_c() => {
            session.lock().await.close();
            return Err(SessionError::Cancelled.into());
        }
    };

    let report = AtsReport::from_analysis(&parse_ats_result(&response.result));
    println!("{report}");
    Ok(())
}

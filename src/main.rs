use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use csv_splitter::chunking::{ChunkSize, LineEndingPolicy};
use csv_splitter::commands::{split_file_to_dir, SplitOptions};
use csv_splitter::config::AppConfig;
use csv_splitter::http::app_server::AppServer;
use csv_splitter::state::AppState;
use csv_splitter::telemetry::init_tracing;

#[derive(Parser)]
#[command(
    name = "csv-splitter",
    about = "Split CSV files into parts of at most 49,999 records each"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the upload web page
    Serve {
        /// Path to a TOML config file
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Split a CSV file on disk into <name>_part<N>.csv files
    Split {
        /// Path to the input CSV file
        input: PathBuf,
        /// Number of records per output file
        #[arg(long, default_value_t = ChunkSize::DEFAULT)]
        chunk_size: ChunkSize,
        /// Directory for the parts (defaults to the input's directory)
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Line terminator of the parts
        #[arg(long, value_enum, default_value_t = LineEndingPolicy::Auto)]
        line_endings: LineEndingPolicy,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    match Cli::parse().command {
        Command::Serve { config } => serve(config.as_deref()).await,
        Command::Split {
            input,
            chunk_size,
            output_dir,
            line_endings,
        } => {
            let options = SplitOptions {
                chunk_size,
                line_endings,
            };
            split(&input, output_dir.as_deref(), options).await
        }
    }
}

async fn serve(config_path: Option<&Path>) -> Result<()> {
    let now = Instant::now();

    tracing::info!("Starting CSV splitter");

    let config = AppConfig::load(config_path)?;
    config.validate()?;

    let addr = config.bind_address();
    let app = AppServer::new(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Server started in {}ms", now.elapsed().as_millis());
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app.router)
        .with_graceful_shutdown(shutdown())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

async fn split(input: &Path, output_dir: Option<&Path>, options: SplitOptions) -> Result<()> {
    if !tokio::fs::try_exists(input).await.unwrap_or(false) {
        anyhow::bail!("Input file '{}' does not exist", input.display());
    }

    let output_dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => input
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    };

    let (outcome, paths) = split_file_to_dir(input, &output_dir, options)
        .await
        .with_context(|| format!("Failed to split '{}'", input.display()))?;

    for (part, path) in outcome.parts.iter().zip(&paths) {
        println!("Created {} with {} records", path.display(), part.rows);
    }

    Ok(())
}

async fn shutdown() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, stopping server...");
}

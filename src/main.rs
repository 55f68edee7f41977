//! hotel-ops: hotel operations back office.
//!
//! Long-running service that:
//! - serves the REST API under `/api`
//! - demotes overdue housekeeping tasks every sweep interval
//! - delivers queued booking invoices from the notification outbox

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use hotel_ops::api::{AppState, create_router};
use hotel_ops::config::ConfigLoader;
use hotel_ops::db::Database;
use hotel_ops::jobs::{ExpirySweeper, NotificationDispatcher};
use hotel_ops::notify::build_mailer;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Command-line options.
#[derive(Debug, Parser)]
#[command(name = "hotel-ops", version, about = "Hotel operations back office")]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(long, env = "HOTEL_CONFIG", default_value = "config/hotel.yaml")]
    config: PathBuf,

    /// Socket address to bind, overriding the configuration.
    #[arg(long)]
    bind: Option<String>,

    /// Apply database migrations and exit.
    #[arg(long)]
    migrate_only: bool,
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hotel_ops=info,tower_http=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let mut config = ConfigLoader::load(&cli.config)?.into_config();
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }
    info!(config = %cli.config.display(), "Starting hotel-ops");

    let db = Database::connect(&config.database).await?;
    if cli.migrate_only {
        info!("Migrations applied, exiting");
        db.close().await;
        return Ok(());
    }

    let shutdown = CancellationToken::new();

    let sweeper = ExpirySweeper::new(
        db.tasks(),
        Duration::from_secs(config.housekeeping.sweep_interval_secs),
        chrono::Duration::hours(config.housekeeping.override_grace_hours),
        shutdown.clone(),
    );
    let dispatcher = NotificationDispatcher::new(
        db.outbox(),
        build_mailer(&config.notifications)?,
        Duration::from_secs(config.notifications.poll_interval_secs),
        config.notifications.batch_size,
        config.notifications.max_attempts,
        shutdown.clone(),
    );
    let sweeper_handle = tokio::spawn(sweeper.run());
    let dispatcher_handle = tokio::spawn(dispatcher.run());

    let bind = config.server.bind.clone();
    let app = create_router(AppState::new(config, db.clone()));
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!(addr = %bind, "HTTP server listening");

    let server_shutdown = shutdown.clone();
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            server_shutdown.cancel();
        })
        .await;
    if let Err(e) = &served {
        error!(error = %e, "HTTP server error");
    }

    // Make sure the workers stop even if the server exited on an error.
    shutdown.cancel();
    let workers = [
        ("expiry sweep", sweeper_handle),
        ("notification dispatcher", dispatcher_handle),
    ];
    for (name, handle) in workers {
        if let Err(e) = handle.await {
            error!(worker = name, error = %e, "Background worker panicked");
        }
    }

    db.close().await;
    info!("Shutdown complete");
    served.map_err(Into::into)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
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
}

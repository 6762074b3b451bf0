//! grmap - nearby battery-swap stations in the terminal.
//!
//! Shows a loading indicator while the station provider loads (from the
//! local cache, or from the station service on first run), then prints the
//! station list. Pass `--json` for machine-readable output.

mod app;

use std::io;
use std::time::Duration;

use anyhow::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::{App, AppState, OutputFormat};

// ============================================================================
// Constants
// ============================================================================

/// Interval between UI loop iterations (in milliseconds)
const EVENT_POLL_INTERVAL_MS: u64 = 100;

/// Initialize the tracing subscriber for logging.
///
/// The returned guard flushes buffered log lines on drop.
fn init_tracing() -> WorkerGuard {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (writer, guard) = tracing_appender::non_blocking(io::stderr());

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer))
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let format = OutputFormat::from_args(std::env::args().skip(1));

    let _log_guard = init_tracing();
    info!("grmap starting");

    let mut app = App::new(format)?;

    let result = run_app(&mut app).await;
    app.clear_loading()?;
    result?;

    if app.state == AppState::Ready {
        app.print_stations()?;
    }

    info!("grmap shutting down");
    Ok(())
}

async fn run_app(app: &mut App) -> Result<()> {
    let mut ticker = tokio::time::interval(Duration::from_millis(EVENT_POLL_INTERVAL_MS));

    loop {
        app.render_loading()?;

        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                app.state = AppState::Quitting;
            }
        }

        // Check for completed background tasks
        app.check_background_tasks();

        if matches!(app.state, AppState::Ready | AppState::Quitting) {
            return Ok(());
        }
    }
}

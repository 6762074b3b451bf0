//! Application state for the grmap front-end.
//!
//! `App` owns the station provider and stands in for the map view: it shows a
//! loading indicator until the provider is ready, then prints the published
//! stations.

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use grmap_core::{
    ApiClient, CacheManager, Config, SettingsStore, StationDataProvider, StationObserver,
    StationRecord,
};

// ============================================================================
// Constants
// ============================================================================

/// Frames for the loading indicator
const SPINNER_FRAMES: [char; 4] = ['|', '/', '-', '\\'];

/// Fallback settings directory when no config directory can be resolved
const FALLBACK_STORE_DIR: &str = "./settings";

// ============================================================================
// UI State Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Loading,
    Ready,
    Quitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    /// Pick the output format from command-line arguments (program name excluded).
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if args.into_iter().any(|a| a.as_ref() == "--json") {
            OutputFormat::Json
        } else {
            OutputFormat::Table
        }
    }
}

/// Logs every list the provider publishes.
struct PublishLog;

impl StationObserver for PublishLog {
    fn on_stations(&mut self, stations: &[StationRecord]) {
        debug!(count = stations.len(), "Station list published");
    }

    fn on_ready(&mut self) {
        debug!("Station provider ready");
    }
}

pub struct App {
    provider: StationDataProvider,
    pub state: AppState,
    format: OutputFormat,
    spinner_frame: usize,
    interactive: bool,
}

impl App {
    /// Create the app and start loading stations.
    pub fn new(format: OutputFormat) -> Result<Self> {
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };
        debug!(endpoint = %config.endpoint, "Config loaded");

        let store_dir = config
            .store_dir()
            .unwrap_or_else(|_| PathBuf::from(FALLBACK_STORE_DIR));
        debug!(?store_dir, "Settings store configured");

        let store = SettingsStore::new(store_dir).context("Failed to open settings store")?;
        let api = ApiClient::from_config(&config).context("Failed to create API client")?;

        let mut provider = StationDataProvider::new(CacheManager::new(Arc::new(store)), Arc::new(api));
        provider.subscribe(Box::new(PublishLog));

        Ok(Self {
            provider,
            state: AppState::Loading,
            format,
            spinner_frame: 0,
            interactive: io::stderr().is_terminal(),
        })
    }

    /// Apply any finished background load. Call once per loop iteration.
    pub fn check_background_tasks(&mut self) {
        if self.provider.check_background_tasks() && self.provider.is_ready() {
            info!(count = self.provider.current_list().len(), "Stations ready");
            self.state = AppState::Ready;
        }
    }

    /// Draw the loading indicator while stations are loading.
    pub fn render_loading(&mut self) -> Result<()> {
        if !self.interactive || self.state != AppState::Loading {
            return Ok(());
        }
        let frame = SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()];
        self.spinner_frame = self.spinner_frame.wrapping_add(1);

        let mut stderr = io::stderr().lock();
        write!(stderr, "\r{} Loading stations...", frame)?;
        stderr.flush()?;
        Ok(())
    }

    /// Remove the loading indicator line.
    pub fn clear_loading(&self) -> Result<()> {
        if self.interactive {
            let mut stderr = io::stderr().lock();
            write!(stderr, "\r\x1b[2K")?;
            stderr.flush()?;
        }
        Ok(())
    }

    /// Print the published stations to stdout.
    pub fn print_stations(&self) -> Result<()> {
        let stations = self.provider.current_list();
        let output = match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(stations)?,
            OutputFormat::Table => format_table(stations),
        };
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", output)?;
        Ok(())
    }
}

/// Render stations as a fixed-width table.
pub fn format_table(stations: &[StationRecord]) -> String {
    if stations.is_empty() {
        return "No stations available.".to_string();
    }

    let id_width = stations
        .iter()
        .map(|s| s.id().chars().count())
        .max()
        .unwrap_or(0)
        .max("ID".len());

    let mut lines = Vec::with_capacity(stations.len() + 1);
    lines.push(format!(
        "{:<id_width$}  {:>10}  {:>11}",
        "ID",
        "LATITUDE",
        "LONGITUDE",
        id_width = id_width
    ));
    for station in stations {
        lines.push(format!(
            "{:<id_width$}  {:>10.5}  {:>11.5}",
            station.id(),
            station.latitude(),
            station.longitude(),
            id_width = id_width
        ));
    }
    lines.join("\n")
}

// ============================================================================
// Tests
// ============================================================================

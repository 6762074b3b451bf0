//! Station data provider.
//!
//! `StationDataProvider` owns the station list shown by the UI. Creating one
//! spawns the load sequence on the Tokio runtime:
//!
//! 1. Read the cached raw list from the settings store.
//! 2. On a cache hit, publish it. No network request is made.
//! 3. Otherwise fetch from the network, cache the raw response when it is
//!    non-empty, and publish the transformed list.
//!
//! The background task never touches published state. Its single result is
//! handed back over a channel and applied by whoever owns the provider, on
//! the UI context, through `check_background_tasks` or `wait_until_ready`.
//! Every terminal path marks the provider ready, including failures, which
//! are logged and otherwise swallowed.

use std::sync::Arc;

use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::api::StationSource;
use crate::cache::CacheManager;
use crate::models::{to_station_list, RawStation, StationList, StationRecord};

/// Receives published provider state. Called only from the UI context.
pub trait StationObserver: Send {
    /// The published station list was replaced.
    fn on_stations(&mut self, stations: &[StationRecord]);

    /// The load sequence reached a terminal outcome.
    fn on_ready(&mut self) {}
}

/// How a load attempt ended. Logged, never surfaced to the UI.
#[derive(Debug, Clone, PartialEq)]
enum LoadOutcome {
    CacheHit { count: usize },
    Fetched { count: usize },
    EmptyResult,
    NoBody,
    DecodeError(String),
    TransportError(String),
    /// The load task went away without reporting
    Aborted,
}

/// Terminal result of the load task.
#[derive(Debug)]
struct LoadResult {
    /// `None` leaves the published list untouched
    stations: Option<StationList>,
    outcome: LoadOutcome,
}

impl LoadResult {
    fn publish(stations: StationList, outcome: LoadOutcome) -> Self {
        Self {
            stations: Some(stations),
            outcome,
        }
    }

    fn unchanged(outcome: LoadOutcome) -> Self {
        Self {
            stations: None,
            outcome,
        }
    }
}

pub struct StationDataProvider {
    stations: StationList,
    ready: bool,
    observers: Vec<Box<dyn StationObserver>>,
    load_rx: Option<oneshot::Receiver<LoadResult>>,
}

impl StationDataProvider {
    /// Create the provider and start loading.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(cache: CacheManager, source: Arc<dyn StationSource>) -> Self {
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let result = Self::execute_load(&cache, source.as_ref()).await;
            if tx.send(result).is_err() {
                debug!("Station provider dropped before load completed");
            }
        });

        Self {
            stations: Vec::new(),
            ready: false,
            observers: Vec::new(),
            load_rx: Some(rx),
        }
    }

    /// The currently published station list. Empty until the load completes.
    pub fn current_list(&self) -> &[StationRecord] {
        &self.stations
    }

    /// Whether the load sequence has reached a terminal outcome.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Register an observer.
    ///
    /// The observer immediately receives the current list (and `on_ready` if
    /// the provider is already ready), then every later change.
    pub fn subscribe(&mut self, mut observer: Box<dyn StationObserver>) {
        observer.on_stations(&self.stations);
        if self.ready {
            observer.on_ready();
        }
        self.observers.push(observer);
    }

    /// Apply a completed load, if there is one. Returns true if state changed.
    ///
    /// Call this from the UI loop; it never blocks.
    pub fn check_background_tasks(&mut self) -> bool {
        let Some(rx) = self.load_rx.as_mut() else {
            return false;
        };

        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(oneshot::error::TryRecvError::Empty) => return false,
            Err(oneshot::error::TryRecvError::Closed) => LoadResult::unchanged(LoadOutcome::Aborted),
        };

        self.apply(result);
        true
    }

    /// Suspend until the load completes, then apply it.
    pub async fn wait_until_ready(&mut self) {
        if let Some(rx) = self.load_rx.take() {
            let result = rx
                .await
                .unwrap_or_else(|_| LoadResult::unchanged(LoadOutcome::Aborted));
            self.apply(result);
        }
    }

    fn apply(&mut self, result: LoadResult) {
        self.load_rx = None;

        match &result.outcome {
            LoadOutcome::CacheHit { count } => info!(count, "Stations loaded from cache"),
            LoadOutcome::Fetched { count } => info!(count, "Stations fetched from network"),
            LoadOutcome::EmptyResult => info!("Station service returned an empty list"),
            LoadOutcome::NoBody => warn!("Station service returned no body"),
            LoadOutcome::DecodeError(e) => warn!(error = %e, "Failed to decode station list"),
            LoadOutcome::TransportError(e) => warn!(error = %e, "Failed to fetch station list"),
            LoadOutcome::Aborted => warn!("Station load task ended without a result"),
        }

        if let Some(stations) = result.stations {
            self.stations = stations;
            for observer in &mut self.observers {
                observer.on_stations(&self.stations);
            }
        }

        self.ready = true;
        for observer in &mut self.observers {
            observer.on_ready();
        }
    }

    /// Execute the load sequence.
    ///
    /// Runs in the spawned task. The cache path and the network path are
    /// mutually exclusive.
    async fn execute_load(cache: &CacheManager, source: &dyn StationSource) -> LoadResult {
        match cache.load_stations() {
            Ok(Some(raw)) => {
                let stations = to_station_list(&raw);
                let count = stations.len();
                return LoadResult::publish(stations, LoadOutcome::CacheHit { count });
            }
            Ok(None) => debug!("No cached stations, fetching from network"),
            Err(e) => warn!(error = %e, "Cached stations unreadable, fetching from network"),
        }

        let body = match source.fetch_body().await {
            Ok(Some(body)) => body,
            Ok(None) => return LoadResult::unchanged(LoadOutcome::NoBody),
            Err(e) => return LoadResult::unchanged(LoadOutcome::TransportError(e.to_string())),
        };

        let raw: Vec<RawStation> = match serde_json::from_slice(&body) {
            Ok(raw) => raw,
            Err(e) => return LoadResult::unchanged(LoadOutcome::DecodeError(e.to_string())),
        };

        let stations = to_station_list(&raw);
        if stations.is_empty() {
            return LoadResult::publish(stations, LoadOutcome::EmptyResult);
        }

        // The cache keeps the raw API shape, not the transformed records
        if let Err(e) = cache.save_stations(&raw) {
            warn!(error = %e, "Failed to cache station list");
        }

        let count = stations.len();
        LoadResult::publish(stations, LoadOutcome::Fetched { count })
    }
}

// ============================================================================
// Tests
// ============================================================================

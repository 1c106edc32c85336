//! Connection supervisor
//!
//! Owns the device lifecycle: search for an accepted controller, open it,
//! stream its reports through the decode pipeline, and on any failure or
//! disconnect go back to searching with a backoff. Open failures and stream
//! errors are never fatal; only an explicit shutdown request ends the loop.
//!
//! Every session gets a fresh `TrackerState`, so a reconnected device always
//! starts released/neutral no matter what its last report said.

use crate::dispatch::ActionDispatcher;
use crate::gamepad::decoder::{decode_report, DecodeError};
use crate::gamepad::layout::ReportLayout;
use crate::gamepad::tracker::TrackerState;
use crate::mapping::config::{Config, DeviceFilter};
use crate::mapping::mapper::EventMapper;
use crate::transport::{DeviceCache, DeviceIdentity, DeviceTransport, OpenDevice};
use futures::StreamExt;
use log::{debug, info, warn};
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

/// Supervisor lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    Searching,
    Connecting,
    Streaming,
    Closing,
}

/// Keeps one decode pipeline alive across connects and disconnects
pub struct Supervisor<T, D>
where
    T: DeviceTransport,
    D: ActionDispatcher,
{
    layout: ReportLayout,
    mapper: EventMapper,
    filters: Vec<DeviceFilter>,
    search_backoff: Duration,
    connect_backoff: Duration,
    transport: T,
    dispatcher: D,
    shutdown: CancellationToken,
    cache: DeviceCache,
    state: SupervisorState,
}

impl<T, D> Supervisor<T, D>
where
    T: DeviceTransport,
    D: ActionDispatcher,
{
    /// Create a supervisor from a validated configuration
    pub fn new(config: Config, transport: T, dispatcher: D, shutdown: CancellationToken) -> Self {
        let mapper = EventMapper::new(&config.mappings);

        Self {
            layout: config.layout,
            mapper,
            filters: config.devices,
            search_backoff: Duration::from_millis(config.settings.search_backoff_ms),
            connect_backoff: Duration::from_millis(config.settings.connect_backoff_ms),
            transport,
            dispatcher,
            shutdown,
            cache: DeviceCache::new(),
            state: SupervisorState::Searching,
        }
    }

    /// Use a persistent device cache (by default the cache is memory-only)
    pub fn with_cache(mut self, cache: DeviceCache) -> Self {
        self.cache = cache;
        self
    }

    /// Current lifecycle state
    pub fn state(&self) -> SupervisorState {
        self.state
    }

    /// Run the connect/stream/reconnect cycle until shutdown is requested
    pub async fn run(&mut self) {
        info!("Supervisor started");

        while !self.shutdown.is_cancelled() {
            self.state = SupervisorState::Searching;
            let identity = match self.find_device() {
                Some(identity) => identity,
                None => {
                    debug!(
                        "No compatible controller found, retrying in {:?}",
                        self.search_backoff
                    );
                    if !self.wait(self.search_backoff).await {
                        break;
                    }
                    continue;
                }
            };

            self.state = SupervisorState::Connecting;
            info!(
                "Connecting to {} ({:04x}:{:04x})",
                identity.product, identity.vendor_id, identity.product_id
            );
            let open = match self.transport.open(&identity) {
                Ok(open) => open,
                Err(e) => {
                    warn!("Failed to open {}: {}", identity.path, e);
                    if !self.wait(self.connect_backoff).await {
                        break;
                    }
                    continue;
                }
            };

            self.cache.add_device(&identity);
            if let Err(e) = self.cache.save() {
                debug!("Could not save device cache: {}", e);
            }

            self.state = SupervisorState::Streaming;
            info!("✓ Connected to: {}", open.identity.product);
            self.stream_session(open).await;

            self.state = SupervisorState::Closing;
            if self.shutdown.is_cancelled() {
                break;
            }
            info!("Device closed, searching again in {:?}", self.search_backoff);
            if !self.wait(self.search_backoff).await {
                break;
            }
        }

        info!("Supervisor stopped");
    }

    /// Discover devices and pick the first accepted one, cached controllers first
    fn find_device(&mut self) -> Option<DeviceIdentity> {
        let mut candidates = match self.transport.discover() {
            Ok(devices) => devices,
            Err(e) => {
                warn!("Device discovery failed: {}", e);
                return None;
            }
        };

        candidates.retain(|device| self.filters.iter().any(|filter| filter.matches(device)));
        candidates.sort_by_key(|device| !self.cache.contains(device));
        candidates.into_iter().next()
    }

    /// Stream one device session until disconnect, error, or shutdown
    async fn stream_session(&mut self, mut open: OpenDevice) {
        // Fresh tracker per session: the device is assumed released/neutral,
        // whatever its previous session's last report said.
        let mut tracker = TrackerState::new();

        loop {
            tokio::select! {
                item = open.reports.next() => match item {
                    Some(Ok(report)) => self.process_report(&mut tracker, &report),
                    Some(Err(e)) => {
                        warn!("{}: {}", open.identity.product, e);
                        break;
                    }
                    None => {
                        info!("{} disconnected", open.identity.product);
                        break;
                    }
                },
                _ = self.shutdown.cancelled() => {
                    debug!("Shutdown requested mid-stream");
                    break;
                }
            }
        }

        open.close();
    }

    /// Decode one report and hand every outcome to the dispatcher
    fn process_report(&self, tracker: &mut TrackerState, report: &[u8]) {
        let events = match decode_report(&self.layout, tracker, report) {
            Ok(events) => events,
            Err(e @ DecodeError::Truncated { .. }) => {
                // Skip the tick; tracker state is untouched
                warn!("{}", e);
                return;
            }
        };

        for event in events {
            match self.mapper.resolve(&event) {
                Some(action) => {
                    if let Err(e) = self.dispatcher.dispatch(&action) {
                        warn!("Dispatch failed for '{}': {}", action.name, e);
                    }
                }
                None => self.dispatcher.no_mapping(&event),
            }
        }
    }

    /// Cancellable backoff; returns false when shutdown was requested
    async fn wait(&self, duration: Duration) -> bool {
        tokio::select! {
            _ = sleep(duration) => true,
            _ = self.shutdown.cancelled() => false,
        }
    }
}

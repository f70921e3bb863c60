//! Provisioning controller — drives the FSM against the ports.
//!
//! [`ProvisionerService::tick`] is the single entry point: the timer task
//! calls it once per tick, it performs the current state's blocking
//! action through the port traits, reduces the result to a
//! [`TickOutcome`], and advances the machine by one table row.
//!
//! Failure routing:
//! * storage init (after one erase/retry) and AP bring-up are **fatal** —
//!   the error propagates out of `tick` and the caller halts,
//! * HTTP bind failure feeds `Failed` into the table and lands in the
//!   terminal `Error` state,
//! * scan and station bring-up failures are logged and retried on a
//!   later tick; they never fail the tick.

use log::{error, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::{EventSink, HttpServerPort, StoragePort, WifiPort};
use crate::config::SystemConfig;
use crate::credentials::{CredentialRecord, SharedCredentials};
use crate::directory::SharedDirectory;
use crate::error::{Error, Result, StorageError};
use crate::fsm::{Fsm, StateId, TickAction, TickOutcome};
use crate::http::ProvisioningHandlers;

/// The provisioning application core.
///
/// Owns the FSM and the shared directory/credential handles; all
/// platform access goes through the port parameters of [`tick`](Self::tick).
pub struct ProvisionerService {
    fsm: Fsm,
    config: SystemConfig,
    directory: SharedDirectory,
    credentials: SharedCredentials,
    /// Last credential record a station bring-up was attempted with.
    /// Bring-up is retried only when the captured record changes.
    last_attempt: Option<CredentialRecord>,
}

impl ProvisionerService {
    pub fn new(
        config: SystemConfig,
        directory: SharedDirectory,
        credentials: SharedCredentials,
    ) -> Self {
        Self {
            fsm: Fsm::new(StateId::Init),
            config,
            directory,
            credentials,
            last_attempt: None,
        }
    }

    /// Announce the initial state through the sink.
    pub fn start<E: EventSink>(&self, sink: &mut E) {
        info!("Provisioning controller started");
        sink.emit(&AppEvent::Started(self.fsm.current_state()));
    }

    /// Current FSM state.
    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    /// Active configuration.
    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    /// Handlers for the HTTP transport, bound to this service's shared
    /// directory and credential record.
    pub fn handlers(&self) -> ProvisioningHandlers {
        ProvisioningHandlers::new(self.directory.clone(), self.credentials.clone())
    }

    /// Run one provisioning tick.
    ///
    /// Returns the state after the transition, or a fatal error when
    /// storage or AP initialisation failed beyond recovery.
    pub fn tick<W, S, H, E>(
        &mut self,
        wifi: &mut W,
        storage: &mut S,
        http: &mut H,
        sink: &mut E,
    ) -> Result<StateId>
    where
        W: WifiPort,
        S: StoragePort,
        H: HttpServerPort,
        E: EventSink,
    {
        self.fsm.note_tick();
        self.log_uptime();

        let from = self.fsm.current_state();
        let outcome = match self.fsm.pending_action() {
            TickAction::None => TickOutcome::Completed,
            TickAction::InitStorage => self.init_storage(storage)?,
            TickAction::StartAccessPoint => self.start_access_point(wifi)?,
            TickAction::StartHttp => self.start_http(wifi, http, sink),
            TickAction::StartStation => self.start_station(wifi, sink),
        };

        let to = self.fsm.apply(outcome);
        if to != from {
            sink.emit(&AppEvent::StateChanged { from, to });
        }
        Ok(to)
    }

    /// Record an AP client join/leave. Informational only — provisioning
    /// state never changes because a client came or went.
    pub fn note_ap_client<E: EventSink>(&self, connected: bool, sink: &mut E) {
        if connected {
            info!("Device connected to AP");
            sink.emit(&AppEvent::ApClientConnected);
        } else {
            info!("Device disconnected from AP");
            sink.emit(&AppEvent::ApClientDisconnected);
        }
    }

    // ── per-state actions ─────────────────────────────────────────

    /// Initialise storage, erasing and retrying once on corruption.
    fn init_storage<S: StoragePort>(&mut self, storage: &mut S) -> Result<TickOutcome> {
        match storage.init() {
            Ok(()) => {}
            Err(StorageError::Corrupted) => {
                warn!("Storage partition corrupted, erasing and retrying");
                storage
                    .erase()
                    .map_err(|_| Error::FatalInit("storage erase failed"))?;
                storage
                    .init()
                    .map_err(|_| Error::FatalInit("storage re-init failed"))?;
            }
            Err(e) => {
                error!("Storage init failed: {e}");
                return Err(Error::FatalInit("storage init failed"));
            }
        }
        info!("Storage initialised");
        Ok(TickOutcome::Completed)
    }

    fn start_access_point<W: WifiPort>(&mut self, wifi: &mut W) -> Result<TickOutcome> {
        wifi.start_access_point(&self.config).map_err(|e| {
            error!("Access point bring-up failed: {e}");
            Error::FatalInit("access point bring-up failed")
        })?;
        info!(
            "Access point up: ssid={} channel={}",
            self.config.ap_ssid, self.config.ap_channel
        );
        Ok(TickOutcome::Completed)
    }

    /// Scan, publish the listing, then bind the HTTP service. A failed
    /// scan keeps the previous listing; a failed bind fails the tick.
    fn start_http<W, H, E>(&mut self, wifi: &mut W, http: &mut H, sink: &mut E) -> TickOutcome
    where
        W: WifiPort,
        H: HttpServerPort,
        E: EventSink,
    {
        self.refresh_listing(wifi, sink);

        match http.start(self.handlers()) {
            Ok(()) => {
                info!("HTTP service started");
                sink.emit(&AppEvent::HttpServiceStarted);
                TickOutcome::Completed
            }
            Err(e) => {
                error!("HTTP service failed to start: {e}");
                TickOutcome::Failed
            }
        }
    }

    /// Attempt station bring-up with the captured credentials, at most
    /// once per distinct submitted record. Never fails the tick.
    fn start_station<W: WifiPort, E: EventSink>(
        &mut self,
        wifi: &mut W,
        sink: &mut E,
    ) -> TickOutcome {
        let record = self
            .credentials
            .lock()
            .expect("credentials lock poisoned")
            .clone();

        if !record.has_ssid() || self.last_attempt.as_ref() == Some(&record) {
            return TickOutcome::Completed;
        }

        info!("Starting station for SSID: {}", record.ssid);
        match wifi.start_station(&record.ssid, &record.passphrase) {
            Ok(()) => {
                sink.emit(&AppEvent::StationBringUp {
                    ssid: record.ssid.clone(),
                });
            }
            Err(e) => {
                // Not fatal: the client may resubmit corrected credentials.
                warn!("Station bring-up failed: {e}");
            }
        }
        self.last_attempt = Some(record);
        TickOutcome::Completed
    }

    /// Run one scan and publish the rendered listing. On failure the
    /// previous listing stays published.
    fn refresh_listing<W: WifiPort, E: EventSink>(&mut self, wifi: &mut W, sink: &mut E) {
        match wifi.scan() {
            Ok(results) => {
                let count = results.len();
                self.directory
                    .lock()
                    .expect("directory lock poisoned")
                    .publish(results);
                info!("Scan complete: {count} networks");
                sink.emit(&AppEvent::ScanCompleted { count });
            }
            Err(e) => {
                warn!("Scan failed, keeping previous listing: {e}");
                sink.emit(&AppEvent::ScanFailed);
            }
        }
    }

    // ── bookkeeping ───────────────────────────────────────────────

    /// Periodic uptime/state line, once per `uptime_log_ticks` ticks.
    fn log_uptime(&self) {
        let ticks = self.fsm.tick_count();
        let cadence = u64::from(self.config.uptime_log_ticks.max(1));
        if ticks % cadence == 0 {
            let seconds = ticks * u64::from(self.config.tick_interval_ms) / 1000;
            info!(
                "Uptime: {seconds} seconds, state: {}",
                self.fsm.current_state().name()
            );
        }
    }
}

//! Mock port implementations for integration tests.
//!
//! Records every call so tests can assert on the full interaction
//! history, and lets individual calls be scripted to fail.

use wifi_provisioner::app::events::AppEvent;
use wifi_provisioner::app::ports::{EventSink, HttpServerPort, StoragePort, WifiPort};
use wifi_provisioner::config::SystemConfig;
use wifi_provisioner::credentials::bounded;
use wifi_provisioner::directory::{NetworkRecord, ScanResults};
use wifi_provisioner::error::{HttpError, RadioError, StorageError};
use wifi_provisioner::http::ProvisioningHandlers;

// ── Radio call record ─────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RadioCall {
    StartAccessPoint { ssid: String },
    StartStation { ssid: String, passphrase: String },
    Scan,
}

pub struct MockWifi {
    pub calls: Vec<RadioCall>,
    pub scan_results: ScanResults,
    pub fail_ap: bool,
    pub fail_station: bool,
    pub fail_scan: bool,
}

#[allow(dead_code)]
impl MockWifi {
    pub fn new() -> Self {
        let mut scan_results = ScanResults::new();
        scan_results
            .push(NetworkRecord {
                ssid: bounded("TestNet"),
                rssi: -48,
            })
            .unwrap();
        scan_results
            .push(NetworkRecord {
                ssid: bounded("Neighbour"),
                rssi: -80,
            })
            .unwrap();
        Self {
            calls: Vec::new(),
            scan_results,
            fail_ap: false,
            fail_station: false,
            fail_scan: false,
        }
    }

    pub fn station_attempts(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, RadioCall::StartStation { .. }))
            .count()
    }
}

impl Default for MockWifi {
    fn default() -> Self {
        Self::new()
    }
}

impl WifiPort for MockWifi {
    fn start_access_point(&mut self, config: &SystemConfig) -> Result<(), RadioError> {
        self.calls.push(RadioCall::StartAccessPoint {
            ssid: config.ap_ssid.to_string(),
        });
        if self.fail_ap {
            return Err(RadioError::ApStartFailed);
        }
        Ok(())
    }

    fn start_station(&mut self, ssid: &str, passphrase: &str) -> Result<(), RadioError> {
        self.calls.push(RadioCall::StartStation {
            ssid: ssid.to_string(),
            passphrase: passphrase.to_string(),
        });
        if self.fail_station {
            return Err(RadioError::StationStartFailed);
        }
        Ok(())
    }

    fn scan(&mut self) -> Result<ScanResults, RadioError> {
        self.calls.push(RadioCall::Scan);
        if self.fail_scan {
            return Err(RadioError::ScanFailed);
        }
        Ok(self.scan_results.clone())
    }
}

// ── Storage mock ──────────────────────────────────────────────

pub struct MockStorage {
    /// Scripted results for successive `init()` calls; exhausted = Ok.
    pub init_script: Vec<Result<(), StorageError>>,
    pub init_calls: usize,
    pub erase_calls: usize,
    pub fail_erase: bool,
}

#[allow(dead_code)]
impl MockStorage {
    pub fn new() -> Self {
        Self {
            init_script: Vec::new(),
            init_calls: 0,
            erase_calls: 0,
            fail_erase: false,
        }
    }

    /// First `init()` reports corruption, later calls succeed.
    pub fn corrupted_once() -> Self {
        Self {
            init_script: vec![Err(StorageError::Corrupted)],
            ..Self::new()
        }
    }
}

impl Default for MockStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl StoragePort for MockStorage {
    fn init(&mut self) -> Result<(), StorageError> {
        let result = if self.init_calls < self.init_script.len() {
            self.init_script[self.init_calls]
        } else {
            Ok(())
        };
        self.init_calls += 1;
        result
    }

    fn erase(&mut self) -> Result<(), StorageError> {
        self.erase_calls += 1;
        if self.fail_erase {
            return Err(StorageError::IoError);
        }
        Ok(())
    }

    fn load_config(&self) -> Result<SystemConfig, StorageError> {
        Ok(SystemConfig::default())
    }

    fn save_config(&mut self, _config: &SystemConfig) -> Result<(), StorageError> {
        Ok(())
    }
}

// ── HTTP mock ─────────────────────────────────────────────────

pub struct MockHttp {
    pub handlers: Option<ProvisioningHandlers>,
    pub start_calls: usize,
    pub fail_start: bool,
}

#[allow(dead_code)]
impl MockHttp {
    pub fn new() -> Self {
        Self {
            handlers: None,
            start_calls: 0,
            fail_start: false,
        }
    }
}

impl Default for MockHttp {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpServerPort for MockHttp {
    fn start(&mut self, handlers: ProvisioningHandlers) -> Result<(), HttpError> {
        self.start_calls += 1;
        if self.fail_start {
            return Err(HttpError::BindFailed);
        }
        self.handlers = Some(handlers);
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.handlers.is_some()
    }
}

// ── Recording event sink ──────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn contains(&self, event: &AppEvent) -> bool {
        self.events.contains(event)
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

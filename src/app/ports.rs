//! Port traits — the hexagonal boundary between the provisioning core
//! and the platform.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ProvisionerService (domain)
//! ```
//!
//! Driven adapters (radio, flash, HTTP transport, event sinks) implement
//! these traits. The controller consumes them via generics, so the
//! domain core never touches ESP-IDF directly.
//!
//! Failures cross this boundary as coarse `Result`s only — the state
//! machine routes on success/failure, never on a structured cause.

use crate::config::SystemConfig;
use crate::directory::ScanResults;
use crate::error::{HttpError, RadioError, StorageError};
use crate::http::ProvisioningHandlers;

// ───────────────────────────────────────────────────────────────
// Radio port (driven adapter: domain → Wi-Fi driver)
// ───────────────────────────────────────────────────────────────

/// Blocking radio operations. Each call returns only once the driver
/// reports completion or failure; none of them has a cancellation path.
pub trait WifiPort {
    /// Bring up the provisioning access point described by `config`.
    fn start_access_point(&mut self, config: &SystemConfig) -> Result<(), RadioError>;

    /// Bring up the station interface and begin joining `ssid`.
    fn start_station(&mut self, ssid: &str, passphrase: &str) -> Result<(), RadioError>;

    /// Perform one blocking all-channel scan, bounded at the directory
    /// capacity.
    fn scan(&mut self) -> Result<ScanResults, RadioError>;
}

// ───────────────────────────────────────────────────────────────
// Storage port (driven adapter: domain ↔ NVS / flash)
// ───────────────────────────────────────────────────────────────

/// Persistent storage lifecycle plus the config blob.
pub trait StoragePort {
    /// Initialise the partition. `Err(StorageError::Corrupted)` signals
    /// that an [`erase`](Self::erase) + retry is required.
    fn init(&mut self) -> Result<(), StorageError>;

    /// Erase the partition (corruption recovery path).
    fn erase(&mut self) -> Result<(), StorageError>;

    /// Load the persisted configuration, or defaults when none exists.
    fn load_config(&self) -> Result<SystemConfig, StorageError>;

    /// Persist the configuration blob.
    fn save_config(&mut self, config: &SystemConfig) -> Result<(), StorageError>;
}

// ───────────────────────────────────────────────────────────────
// HTTP transport port (driven adapter: domain → request dispatch)
// ───────────────────────────────────────────────────────────────

/// The embedded HTTP transport. The core registers its two route
/// handlers once; accept/parse/send stays on the adapter's side.
pub trait HttpServerPort {
    /// Bind the server and register the provisioning routes.
    fn start(&mut self, handlers: ProvisioningHandlers) -> Result<(), HttpError>;

    /// Whether the server is currently bound.
    fn is_running(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go (serial log today;
/// a network sink would implement the same trait).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

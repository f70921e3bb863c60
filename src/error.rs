//! Unified error types for the provisioning firmware.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! top-level control loop's error handling uniform. All variants are `Copy`
//! so they can be passed through the state machine without allocation.
//!
//! Failures below the state machine cross the port boundary only as these
//! coarse variants — the controller routes on the category (fatal, service
//! start, transient) and never inspects a structured cause.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Persistent storage failed to initialise or recover.
    Storage(StorageError),
    /// A radio operation (AP bring-up, station connect, scan) failed.
    Radio(RadioError),
    /// The embedded HTTP service failed to start or respond.
    Http(HttpError),
    /// Unrecoverable initialisation failure — the process halts.
    FatalInit(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "storage: {e}"),
            Self::Radio(e) => write!(f, "radio: {e}"),
            Self::Http(e) => write!(f, "http: {e}"),
            Self::FatalInit(msg) => write!(f, "fatal init: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Storage errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// The partition failed its integrity check and must be erased.
    Corrupted,
    /// Generic I/O error from the flash backend.
    IoError,
    /// A config blob failed range validation before persistence.
    InvalidConfig(&'static str),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Corrupted => write!(f, "partition corrupted"),
            Self::IoError => write!(f, "I/O error"),
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

// ---------------------------------------------------------------------------
// Radio errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioError {
    /// Access point bring-up failed.
    ApStartFailed,
    /// Station-mode bring-up or connect failed.
    StationStartFailed,
    /// A blocking scan request failed at the radio level.
    ScanFailed,
}

impl fmt::Display for RadioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApStartFailed => write!(f, "AP start failed"),
            Self::StationStartFailed => write!(f, "station start failed"),
            Self::ScanFailed => write!(f, "scan failed"),
        }
    }
}

impl From<RadioError> for Error {
    fn from(e: RadioError) -> Self {
        Self::Radio(e)
    }
}

// ---------------------------------------------------------------------------
// HTTP service errors
// ---------------------------------------------------------------------------

/// HTTP-side failures crossing the port boundary. Only service start can
/// fail this way — per-request problems (timeouts, short reads) are
/// handled inside the submission path as [`crate::http::SubmissionResult`]
/// responses and never reach the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpError {
    /// The server could not bind / register its URI handlers.
    BindFailed,
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BindFailed => write!(f, "server bind failed"),
        }
    }
}

impl From<HttpError> for Error {
    fn from(e: HttpError) -> Self {
        Self::Http(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;

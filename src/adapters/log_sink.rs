//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).
//! A future network telemetry adapter would implement the same trait.

use log::info;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(state) => {
                info!("START | initial_state={:?}", state);
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            AppEvent::ScanCompleted { count } => {
                info!("SCAN  | {count} networks published");
            }
            AppEvent::ScanFailed => {
                info!("SCAN  | failed, previous listing kept");
            }
            AppEvent::HttpServiceStarted => {
                info!("HTTP  | service started");
            }
            AppEvent::StationBringUp { ssid } => {
                info!("STA   | bring-up for '{ssid}'");
            }
            AppEvent::ApClientConnected => {
                info!("AP    | client connected");
            }
            AppEvent::ApClientDisconnected => {
                info!("AP    | client disconnected");
            }
        }
    }
}

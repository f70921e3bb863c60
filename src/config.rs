//! System configuration parameters
//!
//! All tunable parameters for the provisioning firmware. Values can be
//! overridden via a blob in NVS; defaults match the factory access point.

use serde::{Deserialize, Serialize};

use crate::credentials::bounded;

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SystemConfig {
    // --- Access point ---
    /// SSID the provisioning AP advertises.
    pub ap_ssid: heapless::String<32>,
    /// WPA2 passphrase for the provisioning AP (empty = open network).
    pub ap_passphrase: heapless::String<64>,
    /// 2.4 GHz channel (1-13).
    pub ap_channel: u8,
    /// Maximum simultaneous AP clients.
    pub ap_max_clients: u8,

    // --- Timing ---
    /// Provisioning tick interval (milliseconds).
    pub tick_interval_ms: u32,
    /// Uptime/state log cadence, in ticks (100 ticks @ 10 ms = 1 s).
    pub uptime_log_ticks: u32,
}

impl SystemConfig {
    /// Range-check every field before the blob is persisted. A config
    /// that fails here never reaches flash.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.ap_ssid.is_empty() {
            return Err("ap_ssid must not be empty");
        }
        if !(1..=13).contains(&self.ap_channel) {
            return Err("ap_channel must be 1-13");
        }
        if self.ap_max_clients == 0 {
            return Err("ap_max_clients must be at least 1");
        }
        if self.tick_interval_ms == 0 {
            return Err("tick_interval_ms must be non-zero");
        }
        if self.uptime_log_ticks == 0 {
            return Err("uptime_log_ticks must be non-zero");
        }
        Ok(())
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            ap_ssid: bounded("Esp-32_Naziru"),
            ap_passphrase: bounded("Parola12"),
            ap_channel: 11,
            ap_max_clients: 5,

            tick_interval_ms: 10,
            uptime_log_ticks: 100,
        }
    }
}

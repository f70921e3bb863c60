//! Wi-Fi radio adapter.
//!
//! Implements [`WifiPort`] — AP bring-up, station bring-up, and blocking
//! scans for the provisioning controller.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real driver calls via `esp_idf_svc::wifi`.
//! - **all other targets**: a deterministic simulation for host-side tests.
//!
//! The station is brought up in mixed (AP + STA) mode so the provisioning
//! access point stays reachable while the join is in flight; a client that
//! submitted bad credentials can still load the form and retry.

use log::info;

use crate::app::ports::WifiPort;
use crate::config::SystemConfig;
use crate::directory::{NetworkRecord, ScanResults};
use crate::error::RadioError;

#[cfg(target_os = "espidf")]
use crate::directory::MAX_SCAN_RESULTS;
#[cfg(target_os = "espidf")]
use esp_idf_svc::{
    eventloop::EspSystemEventLoop,
    hal::modem::Modem,
    nvs::EspDefaultNvsPartition,
    wifi::{
        AccessPointConfiguration, AuthMethod, BlockingWifi, ClientConfiguration, Configuration,
        EspWifi,
    },
};

pub struct WifiAdapter {
    #[cfg(target_os = "espidf")]
    driver: BlockingWifi<EspWifi<'static>>,
    #[cfg(target_os = "espidf")]
    ap_config: Option<AccessPointConfiguration>,

    /// Simulation: AP up flag plus injectable failures for adapter tests.
    #[cfg(not(target_os = "espidf"))]
    sim_ap_started: bool,
    #[cfg(not(target_os = "espidf"))]
    sim_fail_next_scan: bool,
}

#[cfg(target_os = "espidf")]
impl WifiAdapter {
    /// Wrap the modem peripheral in a blocking Wi-Fi driver.
    pub fn new(
        modem: Modem,
        sysloop: EspSystemEventLoop,
        nvs: EspDefaultNvsPartition,
    ) -> Result<Self, RadioError> {
        let wifi =
            EspWifi::new(modem, sysloop.clone(), Some(nvs)).map_err(|_| RadioError::ApStartFailed)?;
        let driver = BlockingWifi::wrap(wifi, sysloop).map_err(|_| RadioError::ApStartFailed)?;
        Ok(Self {
            driver,
            ap_config: None,
        })
    }
}

#[cfg(not(target_os = "espidf"))]
impl WifiAdapter {
    pub fn new() -> Self {
        Self {
            sim_ap_started: false,
            sim_fail_next_scan: false,
        }
    }

    /// Make the next `scan()` call fail (adapter tests only).
    pub fn fail_next_scan(&mut self) {
        self.sim_fail_next_scan = true;
    }
}

#[cfg(not(target_os = "espidf"))]
impl Default for WifiAdapter {
    fn default() -> Self {
        Self::new()
    }
}

// ───────────────────────────────────────────────────────────────
// WifiPort — device
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
impl WifiPort for WifiAdapter {
    fn start_access_point(&mut self, config: &SystemConfig) -> Result<(), RadioError> {
        let auth_method = if config.ap_passphrase.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        let ap = AccessPointConfiguration {
            ssid: config.ap_ssid.clone(),
            password: config.ap_passphrase.clone(),
            channel: config.ap_channel,
            max_connections: u16::from(config.ap_max_clients),
            auth_method,
            ..Default::default()
        };

        self.driver
            .set_configuration(&Configuration::AccessPoint(ap.clone()))
            .map_err(|_| RadioError::ApStartFailed)?;
        self.driver.start().map_err(|_| RadioError::ApStartFailed)?;
        self.driver
            .wait_netif_up()
            .map_err(|_| RadioError::ApStartFailed)?;

        self.ap_config = Some(ap);
        info!("WiFi(espidf): AP '{}' up", config.ap_ssid);
        Ok(())
    }

    fn start_station(&mut self, ssid: &str, passphrase: &str) -> Result<(), RadioError> {
        let auth_method = if passphrase.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        let client = ClientConfiguration {
            ssid: ssid.try_into().map_err(|_| RadioError::StationStartFailed)?,
            password: passphrase
                .try_into()
                .map_err(|_| RadioError::StationStartFailed)?,
            auth_method,
            ..Default::default()
        };

        // Keep the provisioning AP alive alongside the station interface.
        let configuration = match self.ap_config.clone() {
            Some(ap) => Configuration::Mixed(client, ap),
            None => Configuration::Client(client),
        };

        self.driver
            .set_configuration(&configuration)
            .map_err(|_| RadioError::StationStartFailed)?;
        self.driver
            .start()
            .map_err(|_| RadioError::StationStartFailed)?;
        self.driver
            .connect()
            .map_err(|_| RadioError::StationStartFailed)?;
        info!("WiFi(espidf): station joining '{ssid}'");
        Ok(())
    }

    fn scan(&mut self) -> Result<ScanResults, RadioError> {
        let found = self.driver.scan().map_err(|_| RadioError::ScanFailed)?;

        let mut results = ScanResults::new();
        for ap in found.into_iter().take(MAX_SCAN_RESULTS) {
            let record = NetworkRecord {
                ssid: ap.ssid,
                rssi: ap.signal_strength,
            };
            if results.push(record).is_err() {
                break;
            }
        }
        info!("WiFi(espidf): scan found {} networks", results.len());
        Ok(results)
    }
}

// ───────────────────────────────────────────────────────────────
// WifiPort — host simulation
// ───────────────────────────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
impl WifiPort for WifiAdapter {
    fn start_access_point(&mut self, config: &SystemConfig) -> Result<(), RadioError> {
        self.sim_ap_started = true;
        info!(
            "WiFi(sim): AP '{}' up on channel {}",
            config.ap_ssid, config.ap_channel
        );
        Ok(())
    }

    fn start_station(&mut self, ssid: &str, _passphrase: &str) -> Result<(), RadioError> {
        info!("WiFi(sim): station joining '{ssid}'");
        Ok(())
    }

    fn scan(&mut self) -> Result<ScanResults, RadioError> {
        if self.sim_fail_next_scan {
            self.sim_fail_next_scan = false;
            return Err(RadioError::ScanFailed);
        }

        // Fixed neighbourhood so host runs are reproducible.
        let canned: [(&str, i8); 3] = [("HomeNet", -42), ("CoffeeShop", -67), ("Mesh-5G", -74)];
        let mut results = ScanResults::new();
        for (ssid, rssi) in canned {
            results
                .push(NetworkRecord {
                    ssid: crate::credentials::bounded(ssid),
                    rssi,
                })
                .map_err(|_| RadioError::ScanFailed)?;
        }
        info!("WiFi(sim): scan found {} networks", results.len());
        Ok(results)
    }
}

//! End-to-end HTTP service tests on the simulation adapters.
//!
//! Unlike `provisioning_flow_tests` these use the real (host-side)
//! adapters: the simulated radio's canned scan feeds the listing page,
//! and requests travel through the simulated transport's dispatch path
//! exactly as the device transport would deliver them.

use wifi_provisioner::adapters::http_server::HttpServerAdapter;
use wifi_provisioner::adapters::log_sink::LogEventSink;
use wifi_provisioner::adapters::nvs::NvsAdapter;
use wifi_provisioner::adapters::wifi::WifiAdapter;
use wifi_provisioner::app::ports::HttpServerPort;
use wifi_provisioner::app::service::ProvisionerService;
use wifi_provisioner::config::SystemConfig;
use wifi_provisioner::fsm::StateId;
use wifi_provisioner::http::{BodyRead, LISTING_PATH, SUBMISSION_PATH};
use wifi_provisioner::{credentials, directory};

struct SimStack {
    service: ProvisionerService,
    wifi: WifiAdapter,
    storage: NvsAdapter,
    http: HttpServerAdapter,
    sink: LogEventSink,
}

impl SimStack {
    fn new() -> Self {
        Self {
            service: ProvisionerService::new(
                SystemConfig::default(),
                directory::shared(),
                credentials::shared(),
            ),
            wifi: WifiAdapter::new(),
            storage: NvsAdapter::new(),
            http: HttpServerAdapter::new(),
            sink: LogEventSink::new(),
        }
    }

    fn tick(&mut self) -> StateId {
        self.service
            .tick(&mut self.wifi, &mut self.storage, &mut self.http, &mut self.sink)
            .expect("sim tick failed")
    }

    fn boot(&mut self) {
        while self.service.state() != StateId::WaitForCredentials {
            self.tick();
        }
    }
}

#[test]
fn listing_page_carries_the_simulated_neighbourhood() {
    let mut stack = SimStack::new();
    stack.boot();

    let response = stack.http.dispatch("GET", LISTING_PATH, BodyRead::Failed);
    assert_eq!(response.status, 200);
    assert!(response.body.contains("<h1>Select a WiFi Network</h1>"));
    assert!(response
        .body
        .contains("<option value=\"HomeNet\">HomeNet (RSSI: -42)</option>"));
    assert!(response.body.contains("CoffeeShop"));
    assert!(response.body.contains("Mesh-5G"));
}

#[test]
fn submission_round_trip_reaches_the_station_radio() {
    let mut stack = SimStack::new();
    stack.boot();

    let response = stack.http.dispatch(
        "POST",
        SUBMISSION_PATH,
        BodyRead::Data(b"ssid=HomeNet&password=sunshine"),
    );
    assert_eq!(response.status, 200);
    assert_eq!(response.body, "SSID: HomeNet<br>Password: sunshine");

    // The next tick picks the captured record up; the sim radio accepts it
    // and the machine stays in its capture loop.
    assert_eq!(stack.tick(), StateId::WaitForCredentials);
}

#[test]
fn timeout_and_failure_statuses_are_distinct() {
    let mut stack = SimStack::new();
    stack.boot();

    let timeout = stack.http.dispatch("POST", SUBMISSION_PATH, BodyRead::Timeout);
    assert_eq!(timeout.status, 408);

    let failed = stack
        .http
        .dispatch("POST", SUBMISSION_PATH, BodyRead::Data(b""));
    assert_eq!(failed.status, 500);
}

#[test]
fn failed_scan_still_serves_the_empty_scaffold() {
    let mut stack = SimStack::new();
    stack.wifi.fail_next_scan();
    stack.boot();

    let response = stack.http.dispatch("GET", LISTING_PATH, BodyRead::Failed);
    assert_eq!(response.status, 200);
    assert!(response.body.contains("<select name=\"ssid\"></select>"));
}

#[test]
fn corrupted_flash_recovers_and_boot_completes() {
    let mut stack = SimStack::new();
    stack.storage.corrupt();
    stack.boot();
    assert!(stack.http.is_running());
}

//! End-to-end provisioning flow against mock ports.
//!
//! Drives the controller tick by tick through the boot chain and the
//! credential-capture loop, asserting on state traces, port call
//! histories, and emitted events.

use wifi_provisioner::app::events::AppEvent;
use wifi_provisioner::app::ports::HttpServerPort;
use wifi_provisioner::app::service::ProvisionerService;
use wifi_provisioner::config::SystemConfig;
use wifi_provisioner::credentials::{shared as shared_credentials, SharedCredentials};
use wifi_provisioner::directory::{shared as shared_directory, SharedDirectory};
use wifi_provisioner::error::{Error, Result};
use wifi_provisioner::fsm::StateId;
use wifi_provisioner::http::{BodyRead, SubmissionResult};

use crate::mock_ports::{MockHttp, MockStorage, MockWifi, RadioCall, RecordingSink};

// ── Harness ───────────────────────────────────────────────────

struct Harness {
    service: ProvisionerService,
    wifi: MockWifi,
    storage: MockStorage,
    http: MockHttp,
    sink: RecordingSink,
    directory: SharedDirectory,
    credentials: SharedCredentials,
}

impl Harness {
    fn new() -> Self {
        Self::with(MockWifi::new(), MockStorage::new(), MockHttp::new())
    }

    fn with(wifi: MockWifi, storage: MockStorage, http: MockHttp) -> Self {
        let directory = shared_directory();
        let credentials = shared_credentials();
        let mut sink = RecordingSink::new();
        let service = ProvisionerService::new(
            SystemConfig::default(),
            directory.clone(),
            credentials.clone(),
        );
        service.start(&mut sink);
        Self {
            service,
            wifi,
            storage,
            http,
            sink,
            directory,
            credentials,
        }
    }

    fn tick(&mut self) -> Result<StateId> {
        self.service
            .tick(&mut self.wifi, &mut self.storage, &mut self.http, &mut self.sink)
    }

    /// Run the five boot ticks: Init through the first arrival in
    /// WaitForCredentials.
    fn boot(&mut self) {
        for _ in 0..5 {
            self.tick().expect("boot tick failed");
        }
        assert_eq!(self.service.state(), StateId::WaitForCredentials);
    }

    fn submit(&self, body: &[u8]) -> SubmissionResult {
        self.service.handlers().handle_submission(BodyRead::Data(body))
    }
}

// ── Boot chain ────────────────────────────────────────────────

#[test]
fn boot_walks_the_full_chain_to_wait_for_credentials() {
    let mut h = Harness::new();

    let mut trace = Vec::new();
    for _ in 0..6 {
        trace.push(h.tick().unwrap());
    }
    assert_eq!(
        trace,
        [
            StateId::InitStorage,
            StateId::StartAccessPoint,
            StateId::StartHttp,
            StateId::StartStation,
            StateId::WaitForCredentials,
            StateId::WaitForCredentials,
        ]
    );

    // One storage init, one AP bring-up with the factory SSID, one scan,
    // one HTTP bind.
    assert_eq!(h.storage.init_calls, 1);
    assert_eq!(h.storage.erase_calls, 0);
    assert!(h.wifi.calls.contains(&RadioCall::StartAccessPoint {
        ssid: "Esp-32_Naziru".to_string()
    }));
    assert_eq!(h.http.start_calls, 1);
    assert!(h.http.is_running());

    // The scan was published before the HTTP service came up.
    let dir = h.directory.lock().unwrap();
    assert_eq!(dir.len(), 2);
    assert!(dir.listing_html().contains("TestNet (RSSI: -48)"));
}

#[test]
fn boot_emits_lifecycle_events() {
    let mut h = Harness::new();
    h.boot();

    assert!(h.sink.contains(&AppEvent::Started(StateId::Init)));
    assert!(h.sink.contains(&AppEvent::StateChanged {
        from: StateId::Init,
        to: StateId::InitStorage,
    }));
    assert!(h.sink.contains(&AppEvent::ScanCompleted { count: 2 }));
    assert!(h.sink.contains(&AppEvent::HttpServiceStarted));
}

// ── Storage corruption ────────────────────────────────────────

#[test]
fn corrupted_storage_is_erased_and_reinitialised() {
    let mut h = Harness::with(MockWifi::new(), MockStorage::corrupted_once(), MockHttp::new());
    h.boot();

    assert_eq!(h.storage.erase_calls, 1);
    assert_eq!(h.storage.init_calls, 2);
}

#[test]
fn erase_failure_during_recovery_is_fatal() {
    let mut storage = MockStorage::corrupted_once();
    storage.fail_erase = true;
    let mut h = Harness::with(MockWifi::new(), storage, MockHttp::new());

    h.tick().unwrap(); // Init -> InitStorage
    let err = h.tick().unwrap_err();
    assert!(matches!(err, Error::FatalInit(_)));
}

#[test]
fn ap_bring_up_failure_is_fatal() {
    let mut wifi = MockWifi::new();
    wifi.fail_ap = true;
    let mut h = Harness::with(wifi, MockStorage::new(), MockHttp::new());

    h.tick().unwrap();
    h.tick().unwrap();
    let err = h.tick().unwrap_err();
    assert!(matches!(err, Error::FatalInit(_)));
}

// ── HTTP start failure ────────────────────────────────────────

#[test]
fn http_bind_failure_lands_in_terminal_error() {
    let mut http = MockHttp::new();
    http.fail_start = true;
    let mut h = Harness::with(MockWifi::new(), MockStorage::new(), http);

    for _ in 0..3 {
        h.tick().unwrap();
    }
    assert_eq!(h.tick().unwrap(), StateId::Error);

    // Error absorbs every further tick without touching the ports again.
    let calls_before = h.wifi.calls.len();
    for _ in 0..10 {
        assert_eq!(h.tick().unwrap(), StateId::Error);
    }
    assert_eq!(h.wifi.calls.len(), calls_before);
    assert_eq!(h.http.start_calls, 1);
}

// ── Scan failure ──────────────────────────────────────────────

#[test]
fn scan_failure_keeps_previous_listing_and_boot_continues() {
    let mut wifi = MockWifi::new();
    wifi.fail_scan = true;
    let mut h = Harness::with(wifi, MockStorage::new(), MockHttp::new());
    h.boot();

    assert!(h.sink.contains(&AppEvent::ScanFailed));
    assert!(h.http.is_running());
    // Nothing was ever published: the empty scaffold stays served.
    assert!(h.directory.lock().unwrap().is_empty());
}

// ── Credential capture and station bring-up ───────────────────

#[test]
fn submission_triggers_exactly_one_station_attempt() {
    let mut h = Harness::new();
    h.boot();
    assert_eq!(h.wifi.station_attempts(), 0);

    let result = h.submit(b"ssid=TestNet&password=hunter22");
    assert_eq!(
        result,
        SubmissionResult::Accepted("SSID: TestNet<br>Password: hunter22".into())
    );

    h.tick().unwrap();
    assert_eq!(
        h.wifi.calls.last(),
        Some(&RadioCall::StartStation {
            ssid: "TestNet".to_string(),
            passphrase: "hunter22".to_string(),
        })
    );
    assert!(h.sink.contains(&AppEvent::StationBringUp {
        ssid: wifi_provisioner::credentials::bounded("TestNet"),
    }));

    // The same captured record is not retried on later ticks.
    for _ in 0..20 {
        h.tick().unwrap();
    }
    assert_eq!(h.wifi.station_attempts(), 1);
}

#[test]
fn resubmitting_identical_credentials_does_not_retry() {
    let mut h = Harness::new();
    h.boot();

    h.submit(b"ssid=TestNet&password=hunter22");
    h.tick().unwrap();
    h.submit(b"ssid=TestNet&password=hunter22");
    h.tick().unwrap();

    assert_eq!(h.wifi.station_attempts(), 1);
}

#[test]
fn changed_credentials_trigger_a_fresh_attempt() {
    let mut h = Harness::new();
    h.boot();

    h.submit(b"ssid=TestNet&password=wrong");
    h.tick().unwrap();
    h.submit(b"ssid=TestNet&password=corrected");
    h.tick().unwrap();

    assert_eq!(h.wifi.station_attempts(), 2);
}

#[test]
fn station_failure_is_not_fatal() {
    let mut wifi = MockWifi::new();
    wifi.fail_station = true;
    let mut h = Harness::with(wifi, MockStorage::new(), MockHttp::new());
    h.boot();

    h.submit(b"ssid=TestNet&password=bad");
    assert_eq!(h.tick().unwrap(), StateId::WaitForCredentials);
    assert_eq!(h.wifi.station_attempts(), 1);

    // A corrected submission gets its own attempt.
    h.submit(b"ssid=TestNet&password=good");
    h.tick().unwrap();
    assert_eq!(h.wifi.station_attempts(), 2);
}

#[test]
fn empty_ssid_never_attempts_station() {
    let mut h = Harness::new();
    h.boot();

    h.submit(b"password=orphanvalue");
    for _ in 0..10 {
        assert_eq!(h.tick().unwrap(), StateId::WaitForCredentials);
    }
    assert_eq!(h.wifi.station_attempts(), 0);
    assert!(!h.credentials.lock().unwrap().has_ssid());
}

// ── AP client notifications ───────────────────────────────────

#[test]
fn ap_client_notifications_never_touch_the_fsm() {
    let mut h = Harness::new();
    h.boot();
    let state_before = h.service.state();

    h.service.note_ap_client(true, &mut h.sink);
    h.service.note_ap_client(false, &mut h.sink);

    assert_eq!(h.service.state(), state_before);
    assert!(h.sink.contains(&AppEvent::ApClientConnected));
    assert!(h.sink.contains(&AppEvent::ApClientDisconnected));
}

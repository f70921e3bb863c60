//! Wi-Fi Provisioner Firmware — Main Entry Point
//!
//! Hexagonal architecture with a timer-driven provisioning loop.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                    │
//! │                                                              │
//! │  WifiAdapter     NvsAdapter     HttpServerAdapter            │
//! │  (WifiPort)      (StoragePort)  (HttpServerPort)             │
//! │  LogEventSink                                                │
//! │  (EventSink)                                                 │
//! │                                                              │
//! │  ─────────────── Port Trait Boundary ──────────────────      │
//! │                                                              │
//! │  ┌──────────────────────────────────────────────────────┐    │
//! │  │         ProvisionerService (pure logic)              │    │
//! │  │  FSM · directory · credentials                       │    │
//! │  └──────────────────────────────────────────────────────┘    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! A periodic timer pushes `ControlTick` into the lock-free event queue;
//! the main loop drains it and runs one FSM tick per event. Wi-Fi driver
//! callbacks push AP client join/leave events into the same queue.
#![deny(unused_must_use)]

use std::time::Duration;

use anyhow::Result;
use log::{error, info, warn};

use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::timer::EspTaskTimerService;
use esp_idf_svc::wifi::WifiEvent;

use wifi_provisioner::adapters::http_server::HttpServerAdapter;
use wifi_provisioner::adapters::log_sink::LogEventSink;
use wifi_provisioner::adapters::nvs::NvsAdapter;
use wifi_provisioner::adapters::wifi::WifiAdapter;
use wifi_provisioner::app::ports::StoragePort;
use wifi_provisioner::app::service::ProvisionerService;
use wifi_provisioner::config::SystemConfig;
use wifi_provisioner::events::{drain_events, push_event, Event};
use wifi_provisioner::{credentials, directory};

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  WiFi Provisioner v{}             ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Platform handles ───────────────────────────────────
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs_partition = EspDefaultNvsPartition::take()?;

    // ── 3. Construct adapters ─────────────────────────────────
    let mut storage = NvsAdapter::new();
    let mut wifi = match WifiAdapter::new(peripherals.modem, sysloop.clone(), nvs_partition) {
        Ok(w) => w,
        Err(e) => {
            error!("WiFi driver init failed: {e} — halting");
            halt();
        }
    };
    let mut http = HttpServerAdapter::new();
    let mut sink = LogEventSink::new();

    // ── 4. Load config (defaults when nothing persisted) ──────
    let config = match storage.load_config() {
        Ok(cfg) => {
            info!("Config loaded");
            cfg
        }
        Err(e) => {
            warn!("Config load failed ({e}), using defaults");
            SystemConfig::default()
        }
    };
    let tick_interval = Duration::from_millis(u64::from(config.tick_interval_ms));

    // ── 5. AP client notifications → event queue ──────────────
    // The subscription handle must stay alive for the callbacks to fire.
    let _wifi_events = sysloop.subscribe::<WifiEvent, _>(|event| match event {
        WifiEvent::ApStaConnected(_) => {
            push_event(Event::ApClientConnected);
        }
        WifiEvent::ApStaDisconnected(_) => {
            push_event(Event::ApClientDisconnected);
        }
        _ => {}
    })?;

    // ── 6. Construct the provisioning service ─────────────────
    let mut service =
        ProvisionerService::new(config, directory::shared(), credentials::shared());
    service.start(&mut sink);

    // ── 7. Periodic tick timer ────────────────────────────────
    let timer_service = EspTaskTimerService::new()?;
    let tick_timer = timer_service.timer(|| {
        push_event(Event::ControlTick);
    })?;
    tick_timer.every(tick_interval)?;

    info!("System ready. Entering event loop.");

    // ── 8. Event loop ─────────────────────────────────────────
    loop {
        let mut fatal = false;

        drain_events(|event| match event {
            Event::ControlTick => {
                if let Err(e) = service.tick(&mut wifi, &mut storage, &mut http, &mut sink) {
                    error!("Fatal provisioning failure: {e}");
                    fatal = true;
                }
            }
            Event::ApClientConnected => service.note_ap_client(true, &mut sink),
            Event::ApClientDisconnected => service.note_ap_client(false, &mut sink),
        });

        if fatal {
            halt();
        }

        std::thread::sleep(Duration::from_millis(1));
    }
}

/// Unrecoverable initialisation failure: park the main task. In
/// production the task watchdog resets the chip after its timeout.
fn halt() -> ! {
    #[allow(clippy::empty_loop)]
    loop {}
}

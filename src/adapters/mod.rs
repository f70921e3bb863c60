//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements     | Connects to                   |
//! |---------------|----------------|-------------------------------|
//! | `wifi`        | WifiPort       | ESP-IDF Wi-Fi driver (AP/STA) |
//! | `nvs`         | StoragePort    | NVS flash / in-memory store   |
//! | `http_server` | HttpServerPort | ESP-IDF httpd / dispatch sim  |
//! | `log_sink`    | EventSink      | Serial log output             |

pub mod http_server;
pub mod log_sink;
pub mod nvs;
pub mod wifi;

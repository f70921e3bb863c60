//! Embedded HTTP server adapter.
//!
//! Implements [`HttpServerPort`]. All route logic lives in
//! [`ProvisioningHandlers`]; this adapter owns the transport only —
//! socket accept, body reads, and status-line encoding.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: `esp_idf_svc::http::server::EspHttpServer`
//!   with one registered handler per route.
//! - **all other targets**: an in-process dispatch simulation so
//!   integration tests can exercise the full request path.
//!
//! Response mapping for credential submissions:
//!
//! | Handler result | Wire response                   |
//! |----------------|---------------------------------|
//! | `Accepted`     | 200, `text/html` echo body      |
//! | `Timeout`      | 408, empty body                 |
//! | `ReadFailed`   | 500, connection closed          |

use log::info;

use crate::app::ports::HttpServerPort;
use crate::error::HttpError;
use crate::http::{BodyRead, ProvisioningHandlers, SubmissionResult, LISTING_PATH, SUBMISSION_PATH};

#[cfg(target_os = "espidf")]
use crate::http::MAX_BODY_LEN;
#[cfg(target_os = "espidf")]
use esp_idf_svc::{
    http::server::{Configuration as HttpServerConfig, EspHttpServer},
    http::Method,
    io::Write,
    sys::ESP_ERR_TIMEOUT,
};

pub struct HttpServerAdapter {
    #[cfg(target_os = "espidf")]
    server: Option<EspHttpServer<'static>>,

    #[cfg(not(target_os = "espidf"))]
    handlers: Option<ProvisioningHandlers>,
    #[cfg(not(target_os = "espidf"))]
    sim_fail_start: bool,
}

impl HttpServerAdapter {
    pub fn new() -> Self {
        Self {
            #[cfg(target_os = "espidf")]
            server: None,
            #[cfg(not(target_os = "espidf"))]
            handlers: None,
            #[cfg(not(target_os = "espidf"))]
            sim_fail_start: false,
        }
    }
}

impl Default for HttpServerAdapter {
    fn default() -> Self {
        Self::new()
    }
}

// ───────────────────────────────────────────────────────────────
// HttpServerPort — device
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
impl HttpServerPort for HttpServerAdapter {
    fn start(&mut self, handlers: ProvisioningHandlers) -> Result<(), HttpError> {
        let mut server = EspHttpServer::new(&HttpServerConfig::default())
            .map_err(|_| HttpError::BindFailed)?;

        let listing = handlers.clone();
        server
            .fn_handler(LISTING_PATH, Method::Get, move |req| {
                let page = listing.handle_listing();
                let mut response =
                    req.into_response(200, Some("OK"), &[("Content-Type", "text/html")])?;
                response.write_all(page.as_bytes())?;
                Ok::<(), anyhow::Error>(())
            })
            .map_err(|_| HttpError::BindFailed)?;

        server
            .fn_handler(SUBMISSION_PATH, Method::Post, move |mut req| {
                let mut buf = [0u8; MAX_BODY_LEN];
                let read = match req.read(&mut buf) {
                    Ok(n) => BodyRead::Data(&buf[..n]),
                    Err(e) if e.0.code() == ESP_ERR_TIMEOUT => BodyRead::Timeout,
                    Err(_) => BodyRead::Failed,
                };

                match handlers.handle_submission(read) {
                    SubmissionResult::Accepted(echo) => {
                        let mut response =
                            req.into_response(200, Some("OK"), &[("Content-Type", "text/html")])?;
                        response.write_all(echo.as_bytes())?;
                    }
                    SubmissionResult::Timeout => {
                        req.into_status_response(408)?;
                    }
                    SubmissionResult::ReadFailed => {
                        req.into_status_response(500)?;
                    }
                }
                Ok::<(), anyhow::Error>(())
            })
            .map_err(|_| HttpError::BindFailed)?;

        info!("HttpServerAdapter: routes registered");
        self.server = Some(server);
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.server.is_some()
    }
}

// ───────────────────────────────────────────────────────────────
// HttpServerPort — host simulation
// ───────────────────────────────────────────────────────────────

/// Response produced by the simulated transport.
#[cfg(not(target_os = "espidf"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimResponse {
    pub status: u16,
    pub body: String,
}

#[cfg(not(target_os = "espidf"))]
impl HttpServerAdapter {
    /// Make the next `start()` call fail (adapter tests only).
    pub fn fail_next_start(&mut self) {
        self.sim_fail_start = true;
    }

    /// Deliver one request to the registered handlers, the way the
    /// device transport would.
    ///
    /// # Panics
    /// Panics when the server was never started — the device transport
    /// cannot receive requests before binding either.
    pub fn dispatch(&self, method: &str, path: &str, read: BodyRead<'_>) -> SimResponse {
        let handlers = self
            .handlers
            .as_ref()
            .expect("dispatch on a server that was never started");

        match (method, path) {
            ("GET", p) if p == LISTING_PATH => SimResponse {
                status: 200,
                body: handlers.handle_listing(),
            },
            ("POST", p) if p == SUBMISSION_PATH => match handlers.handle_submission(read) {
                SubmissionResult::Accepted(echo) => SimResponse {
                    status: 200,
                    body: echo,
                },
                SubmissionResult::Timeout => SimResponse {
                    status: 408,
                    body: String::new(),
                },
                SubmissionResult::ReadFailed => SimResponse {
                    status: 500,
                    body: String::new(),
                },
            },
            _ => SimResponse {
                status: 404,
                body: String::new(),
            },
        }
    }
}

#[cfg(not(target_os = "espidf"))]
impl HttpServerPort for HttpServerAdapter {
    fn start(&mut self, handlers: ProvisioningHandlers) -> Result<(), HttpError> {
        if self.sim_fail_start {
            self.sim_fail_start = false;
            return Err(HttpError::BindFailed);
        }
        info!("HttpServerAdapter: simulation transport bound");
        self.handlers = Some(handlers);
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.handlers.is_some()
    }
}

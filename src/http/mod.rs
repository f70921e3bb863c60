//! Provisioning HTTP service — transport-independent handler logic.
//!
//! Two routes, both stateless apart from the shared directory and
//! credential record:
//!
//! | Method | Path            | Behaviour                                   |
//! |--------|-----------------|---------------------------------------------|
//! | GET    | `/index.html`   | current listing page as a selection form    |
//! | POST   | `/results.html` | parse `ssid=…&password=…`, store, echo back |
//!
//! The transport adapter (ESP-IDF `EspHttpServer` on device, a dispatch
//! simulation on the host) owns socket I/O and hands this module either
//! the body bytes it managed to read or the reason it could not.

use log::{info, warn};

use crate::credentials::SharedCredentials;
use crate::directory::SharedDirectory;

/// Listing form route.
pub const LISTING_PATH: &str = "/index.html";
/// Credential submission route.
pub const SUBMISSION_PATH: &str = "/results.html";

/// Submission bodies are read into a fixed 99-byte window; anything the
/// client sends beyond it is dropped, not treated as a framing error.
pub const MAX_BODY_LEN: usize = 99;

// ---------------------------------------------------------------------------
// Transport-facing types
// ---------------------------------------------------------------------------

/// What the transport managed to read of a POST body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyRead<'a> {
    /// Bytes actually received (already capped at [`MAX_BODY_LEN`]).
    Data(&'a [u8]),
    /// The socket read timed out.
    Timeout,
    /// Zero/short read without a timeout indication.
    Failed,
}

/// Result of the submission handler, for the adapter to encode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionResult {
    /// Credentials stored; body echoes the record (`text/html`).
    Accepted(String),
    /// Distinct timeout response (408), session otherwise unaffected.
    Timeout,
    /// Generic failure — the adapter closes without a response body.
    ReadFailed,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// The two route handlers plus the shared state they act on.
///
/// Cheap to clone — both fields are `Arc` handles — so the transport can
/// move one copy into each registered route.
#[derive(Clone)]
pub struct ProvisioningHandlers {
    directory: SharedDirectory,
    credentials: SharedCredentials,
}

impl ProvisioningHandlers {
    pub fn new(directory: SharedDirectory, credentials: SharedCredentials) -> Self {
        Self {
            directory,
            credentials,
        }
    }

    /// GET /index.html — the current listing page.
    ///
    /// Returns a snapshot: the page was rendered in full before it was
    /// published, so this is never a partially-written form.
    pub fn handle_listing(&self) -> String {
        info!("GET {} request received", LISTING_PATH);
        self.directory
            .lock()
            .expect("directory lock poisoned")
            .listing_html()
            .to_owned()
    }

    /// POST /results.html — parse and store submitted credentials.
    ///
    /// A key that is absent from the body leaves the corresponding field
    /// untouched; both values are truncated at their radio bounds.
    pub fn handle_submission(&self, read: BodyRead<'_>) -> SubmissionResult {
        info!("POST {} request received", SUBMISSION_PATH);

        let raw = match read {
            BodyRead::Data(bytes) if !bytes.is_empty() => bytes,
            BodyRead::Data(_) | BodyRead::Failed => {
                warn!("submission body read failed");
                return SubmissionResult::ReadFailed;
            }
            BodyRead::Timeout => {
                warn!("submission body read timed out");
                return SubmissionResult::Timeout;
            }
        };

        // Untrusted bytes; anything non-UTF-8 is replaced, not rejected.
        let capped = &raw[..raw.len().min(MAX_BODY_LEN)];
        let body = String::from_utf8_lossy(capped);

        let echo = {
            let mut creds = self.credentials.lock().expect("credentials lock poisoned");
            if let Some(ssid) = field_value(&body, "ssid") {
                creds.set_ssid(ssid);
                info!("Selected SSID: {}", creds.ssid);
            }
            if let Some(passphrase) = field_value(&body, "password") {
                creds.set_passphrase(passphrase);
            }
            // Echo the *stored* record: truncated values, and prior
            // values for any key the submission omitted.
            format!("SSID: {}<br>Password: {}", creds.ssid, creds.passphrase)
        };

        SubmissionResult::Accepted(echo)
    }
}

// ---------------------------------------------------------------------------
// Form parsing
// ---------------------------------------------------------------------------

/// Locate `key=` in a `&`-delimited form body and return its value,
/// bounded at the next `&` or end of input. Returns `None` when the key
/// is absent.
fn field_value<'a>(body: &'a str, key: &str) -> Option<&'a str> {
    let mut needle = String::with_capacity(key.len() + 1);
    needle.push_str(key);
    needle.push('=');

    let start = body.find(&needle)? + needle.len();
    let rest = &body[start..];
    match rest.find('&') {
        Some(end) => Some(&rest[..end]),
        None => Some(rest),
    }
}

//! Scan-result directory and listing-page renderer.
//!
//! Holds the most recent scan results and the selection form rendered
//! from them. The directory is replaced wholesale on every successful
//! scan — the page is rendered in full *before* it is published, so a
//! concurrent HTTP reader always sees either the previous complete
//! listing or the new one, never a partial write.

use std::sync::{Arc, Mutex};

use crate::credentials::MAX_SSID_LEN;

/// Upper bound on scan results kept per refresh.
pub const MAX_SCAN_RESULTS: usize = 20;

/// One network observed during a scan. Read-only once published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkRecord {
    pub ssid: heapless::String<MAX_SSID_LEN>,
    /// Received signal strength (dBm).
    pub rssi: i8,
}

/// Fixed-capacity, scan-ordered set of records from one refresh.
pub type ScanResults = heapless::Vec<NetworkRecord, MAX_SCAN_RESULTS>;

/// The published directory: records plus their rendered listing page.
#[derive(Debug, Clone)]
pub struct NetworkDirectory {
    records: ScanResults,
    listing_html: String,
}

impl NetworkDirectory {
    /// An empty directory still renders a valid (option-less) form.
    pub fn new() -> Self {
        let records = ScanResults::new();
        let listing_html = render_listing(&records);
        Self {
            records,
            listing_html,
        }
    }

    /// Replace the directory with a fresh set of scan results.
    ///
    /// The new page is rendered before either field is touched, so no
    /// reader can observe records without their matching page.
    pub fn publish(&mut self, records: ScanResults) {
        self.listing_html = render_listing(&records);
        self.records = records;
    }

    /// Number of records currently published.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The rendered selection-form page for the current records.
    pub fn listing_html(&self) -> &str {
        &self.listing_html
    }

    /// The published records, in scan order.
    pub fn records(&self) -> &[NetworkRecord] {
        &self.records
    }
}

impl Default for NetworkDirectory {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared handle: published by the provisioning controller, read by the
/// HTTP listing handler.
pub type SharedDirectory = Arc<Mutex<NetworkDirectory>>;

/// Create an empty shared directory.
pub fn shared() -> SharedDirectory {
    Arc::new(Mutex::new(NetworkDirectory::new()))
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render the selection form: one `<option>` per record, scan order, no
/// de-duplication, no sorting. Submission posts to `/results.html`.
fn render_listing(records: &[NetworkRecord]) -> String {
    let mut page = String::with_capacity(512 + records.len() * 96);
    page.push_str(
        "<!DOCTYPE html><html><head><title>WiFi Scanner</title></head><body>",
    );
    page.push_str(
        "<h1>Select a WiFi Network</h1><form action=\"/results.html\" method=\"post\">",
    );
    page.push_str("<select name=\"ssid\">");
    for rec in records {
        page.push_str(&format!(
            "<option value=\"{0}\">{0} (RSSI: {1})</option>",
            rec.ssid, rec.rssi
        ));
    }
    page.push_str("</select><br><br>");
    page.push_str("Password: <input type=\"password\" name=\"password\"><br><br>");
    page.push_str("<input type=\"submit\" value=\"Connect\">");
    page.push_str("</form></body></html>");
    page
}

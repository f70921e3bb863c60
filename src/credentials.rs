//! Captured network credentials.
//!
//! A single [`CredentialRecord`] holds the SSID and passphrase most
//! recently submitted through the provisioning form. It is written by the
//! HTTP submission handler and consumed by the state machine when it
//! brings the station interface up, so it lives behind a `Mutex` — the
//! tick loop and the HTTP transport run on different execution contexts.

use std::sync::{Arc, Mutex};

/// SSID buffer size used by the radio driver (IEEE 802.11 limit).
pub const MAX_SSID_LEN: usize = 32;
/// Passphrase buffer size used by the radio driver.
pub const MAX_PASSPHRASE_LEN: usize = 64;

/// Copy `src` into a fresh bounded string, truncating one byte short of
/// the buffer size. Truncation is the only permitted failure mode for
/// oversized input — the result is always a complete, in-bounds string.
pub fn bounded<const N: usize>(src: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    truncate_into(&mut out, src);
    out
}

/// Replace the contents of `dst` with `src`, truncating to `N - 1` bytes.
///
/// The last byte of each buffer is reserved: the radio driver consumes
/// these fields as NUL-terminated C buffers, so a 32-byte SSID buffer
/// carries at most 31 payload bytes. Truncation happens on a UTF-8
/// character boundary so the result is always valid; input past the
/// payload bound loses its tail, never its bound.
pub fn truncate_into<const N: usize>(dst: &mut heapless::String<N>, src: &str) {
    dst.clear();
    let payload = N.saturating_sub(1);
    for ch in src.chars() {
        if dst.len() + ch.len_utf8() > payload {
            break;
        }
        if dst.push(ch).is_err() {
            break;
        }
    }
}

/// The most recently submitted SSID/passphrase pair.
///
/// Both fields start empty. A form submission that carries only one of
/// the two keys updates that field alone — the other keeps its previous
/// value (callers must not assume atomic replacement of the pair).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialRecord {
    pub ssid: heapless::String<MAX_SSID_LEN>,
    pub passphrase: heapless::String<MAX_PASSPHRASE_LEN>,
}

impl CredentialRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the SSID, truncating at 31 bytes.
    pub fn set_ssid(&mut self, ssid: &str) {
        truncate_into(&mut self.ssid, ssid);
    }

    /// Overwrite the passphrase, truncating at 63 bytes.
    pub fn set_passphrase(&mut self, passphrase: &str) {
        truncate_into(&mut self.passphrase, passphrase);
    }

    /// A record with no SSID cannot be used for a station connect.
    pub fn has_ssid(&self) -> bool {
        !self.ssid.is_empty()
    }
}

/// Shared handle: written by the HTTP submission handler, read by the
/// provisioning controller.
pub type SharedCredentials = Arc<Mutex<CredentialRecord>>;

/// Create an empty shared credential record.
pub fn shared() -> SharedCredentials {
    Arc::new(Mutex::new(CredentialRecord::new()))
}

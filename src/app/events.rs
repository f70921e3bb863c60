//! Outbound application events.
//!
//! The [`ProvisionerService`](super::service::ProvisionerService) emits
//! these through the [`EventSink`](super::ports::EventSink) port.

use crate::credentials::MAX_SSID_LEN;
use crate::fsm::StateId;

/// Structured events emitted by the provisioning core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The controller has started (carries initial state).
    Started(StateId),

    /// The FSM transitioned between states.
    StateChanged { from: StateId, to: StateId },

    /// A scan completed and its listing was published.
    ScanCompleted { count: usize },

    /// A scan failed; the previous listing was kept.
    ScanFailed,

    /// The HTTP service bound its routes.
    HttpServiceStarted,

    /// The station interface was brought up with captured credentials.
    StationBringUp { ssid: heapless::String<MAX_SSID_LEN> },

    /// A client joined the provisioning access point.
    ApClientConnected,

    /// A client left the provisioning access point.
    ApClientDisconnected,
}

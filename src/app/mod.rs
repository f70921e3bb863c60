//! Application core — pure provisioning logic, zero I/O.
//!
//! The controller in [`service`] drives the FSM and talks to the radio,
//! storage, and HTTP collaborators exclusively through the **port
//! traits** in [`ports`], keeping this layer fully testable without an
//! ESP32 attached.

pub mod events;
pub mod ports;
pub mod service;

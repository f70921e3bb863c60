//! Wi-Fi provisioning firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod credentials;
pub mod directory;
pub mod error;
pub mod events;
pub mod fsm;
pub mod http;

// Adapters carry their own cfg-gated device/simulation split.
pub mod adapters;

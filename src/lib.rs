//! Coop dashboard controller library.
//!
//! Polls the camera detector and the coop sensor node, folds both readings
//! into a clamped four-digit frame, and drives a TM1637 segment panel.
//! All ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`
//! within each module; everything else builds and tests on the host.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod fsm;
pub mod pins;
pub mod telemetry;

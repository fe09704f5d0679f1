//! Application core — pure domain logic, zero I/O.
//!
//! Aggregation, clamping and poll scheduling for the dashboard.  All
//! interaction with the network and the panel happens through **port
//! traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod aggregator;
pub mod events;
pub mod ports;
pub mod service;

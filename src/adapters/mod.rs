//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements         | Connects to                   |
//! |----------------|--------------------|-------------------------------|
//! | `config_store` | ConfigPort         | build env (fw) / JSON file    |
//! | `display`      | DisplayPort        | log console (host simulator)  |
//! | `http_source`  | TelemetrySource    | EspHttpConnection / reqwest   |
//! | `log_sink`     | EventSink          | Serial / stderr log output    |
//! | `time`         | —                  | ESP32 system timer / Instant  |
//! | `wifi`         | ConnectivityPort   | ESP-IDF WiFi STA              |
//!
//! The TM1637 panel driver implements `DisplayPort` itself and lives in
//! [`crate::drivers::tm1637`].

pub mod config_store;
pub mod display;
pub mod http_source;
pub mod log_sink;
pub mod time;
pub mod wifi;

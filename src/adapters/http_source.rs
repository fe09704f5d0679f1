//! HTTP telemetry source.
//!
//! Implements [`TelemetrySource`] with one blocking GET per call.
//!
//! - **`target_os = "espidf"`**: `esp_idf_svc::http::client::EspHttpConnection`,
//!   a fresh connection per fetch, body read into a fixed 4 KiB buffer.
//! - **all other targets**: `reqwest::blocking::Client` for the host simulator.
//!
//! Failure mapping is identical on both: transport failures become
//! [`NetworkError`], a non-2xx status becomes `NetworkError::Status`, and a
//! body that is not JSON becomes `FetchError::Decode` carrying the parser
//! message.

use core::time::Duration;

use log::debug;
use serde_json::Value;

use crate::app::ports::TelemetrySource;
use crate::error::{FetchError, NetworkError};

/// Upper bound on a response body.  Both endpoints answer with a few dozen bytes.
pub const MAX_BODY_BYTES: usize = 4096;

/// Read a whole body into `buf`.
///
/// Returns `Ok(None)` when the stream holds more than `buf.len()` bytes.  A
/// body that exactly fills `buf` is accepted, matching the host check.
#[cfg(any(target_os = "espidf", test))]
fn read_bounded<E>(
    buf: &mut [u8],
    mut read: impl FnMut(&mut [u8]) -> Result<usize, E>,
) -> Result<Option<usize>, E> {
    let mut len = 0;
    while len < buf.len() {
        let n = read(&mut buf[len..])?;
        if n == 0 {
            return Ok(Some(len));
        }
        len += n;
    }
    // Buffer full: only end of stream keeps the body.
    let mut spill = [0u8; 1];
    Ok((read(&mut spill)? == 0).then_some(len))
}

// ───────────────────────────────────────────────────────────────
// Host (reqwest)
// ───────────────────────────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
pub struct HttpSource {
    client: reqwest::blocking::Client,
}

#[cfg(not(target_os = "espidf"))]
impl HttpSource {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;
        Ok(Self { client })
    }

    fn classify(e: &reqwest::Error) -> NetworkError {
        if e.is_timeout() {
            NetworkError::Timeout
        } else if let Some(status) = e.status() {
            NetworkError::Status(status.as_u16())
        } else {
            NetworkError::Connect
        }
    }
}

#[cfg(not(target_os = "espidf"))]
impl TelemetrySource for HttpSource {
    fn fetch(&mut self, url: &str) -> Result<Value, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| FetchError::Network(Self::classify(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::Status(status.as_u16()).into());
        }

        let body = response
            .bytes()
            .map_err(|e| FetchError::Network(Self::classify(&e)))?;
        if body.len() > MAX_BODY_BYTES {
            return Err(FetchError::decode(format_args!(
                "response body of {} bytes exceeds {} byte limit",
                body.len(),
                MAX_BODY_BYTES
            )));
        }
        debug!("HTTP: GET {} -> {} ({} bytes)", url, status.as_u16(), body.len());
        Ok(serde_json::from_slice(&body)?)
    }
}

// ───────────────────────────────────────────────────────────────
// ESP-IDF (EspHttpConnection)
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub struct HttpSource {
    timeout: Duration,
}

#[cfg(target_os = "espidf")]
impl HttpSource {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self { timeout })
    }

    fn classify(e: &esp_idf_svc::sys::EspError) -> NetworkError {
        if e.code() == esp_idf_svc::sys::ESP_ERR_TIMEOUT as i32
            || e.code() == esp_idf_svc::sys::ESP_ERR_HTTP_EAGAIN as i32
        {
            NetworkError::Timeout
        } else {
            NetworkError::Connect
        }
    }
}

#[cfg(target_os = "espidf")]
impl TelemetrySource for HttpSource {
    fn fetch(&mut self, url: &str) -> Result<Value, FetchError> {
        use esp_idf_svc::http::Method;
        use esp_idf_svc::http::client::{Configuration, EspHttpConnection};
        use esp_idf_svc::io::Read;

        let mut conn = EspHttpConnection::new(&Configuration {
            timeout: Some(self.timeout),
            ..Default::default()
        })
        .map_err(|e| FetchError::Network(Self::classify(&e)))?;

        conn.initiate_request(Method::Get, url, &[])
            .map_err(|e| FetchError::Network(Self::classify(&e)))?;
        conn.initiate_response()
            .map_err(|e| FetchError::Network(Self::classify(&e)))?;

        let status = conn.status();
        if !(200..300).contains(&status) {
            return Err(NetworkError::Status(status).into());
        }

        let mut buf = [0u8; MAX_BODY_BYTES];
        let len = read_bounded(&mut buf, |chunk| conn.read(chunk))
            .map_err(|e| FetchError::Network(Self::classify(&e.0)))?
            .ok_or_else(|| {
                FetchError::decode(format_args!(
                    "response body exceeds {} byte limit",
                    MAX_BODY_BYTES
                ))
            })?;
        debug!("HTTP: GET {} -> {} ({} bytes)", url, status, len);
        Ok(serde_json::from_slice(&buf[..len])?)
    }
}

//! Fuzz target: telemetry decode → frame → segments
//!
//! Treats arbitrary bytes as an HTTP body from either upstream node and
//! asserts the whole path to the panel never panics and always lands on
//! four valid digit patterns.
//!
//! cargo fuzz run fuzz_telemetry_decode

#![no_main]

use coopdash::app::aggregator::DisplayFrame;
use coopdash::drivers::segment::{DIGITS, encode};
use coopdash::telemetry::{DetectionReading, EnvironmentReading};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Bodies that are not JSON fail in the transport adapter; nothing to check.
    let Ok(doc) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };

    let detection = DetectionReading::decode(doc.clone()).unwrap_or_default();
    let environment = EnvironmentReading::decode(doc).unwrap_or_default();
    let frame = DisplayFrame::from_readings(&detection, &environment);

    for d in [frame.persons_digit, frame.birds_digit, frame.temp_tens, frame.temp_ones] {
        assert!(d <= 9, "digit out of range: {}", d);
    }
    for s in encode(&frame) {
        assert!(DIGITS.contains(&s), "segment pattern is not a digit: {:#04x}", s);
    }
});

//! Display adapters.
//!
//! On hardware the panel is a [`Tm1637`](crate::drivers::tm1637::Tm1637)
//! and implements [`DisplayPort`] directly.  [`ConsoleDisplay`] is the host
//! simulator's panel: it logs each distinct frame and keeps the last one.

use log::info;

use crate::app::ports::DisplayPort;
use crate::drivers::segment::{self, Segment};
use crate::error::DisplayError;

pub struct ConsoleDisplay {
    brightness: Option<u8>,
    last: Option<[Segment; 4]>,
    writes: u64,
}

impl ConsoleDisplay {
    pub fn new() -> Self {
        Self {
            brightness: None,
            last: None,
            writes: 0,
        }
    }

    /// Segments from the most recent write.
    pub fn last(&self) -> Option<[Segment; 4]> {
        self.last
    }

    pub fn writes(&self) -> u64 {
        self.writes
    }
}

impl Default for ConsoleDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayPort for ConsoleDisplay {
    fn init(&mut self, brightness: u8) -> Result<(), DisplayError> {
        self.brightness = Some(brightness);
        info!("PANEL | init brightness={}", brightness);
        Ok(())
    }

    fn write(&mut self, segments: &[Segment; 4]) -> Result<(), DisplayError> {
        self.writes += 1;
        // Spinner frames repeat every tick; only log digit frames that changed.
        if self.last.as_ref() != Some(segments) && segments.iter().all(|s| segment::DIGITS.contains(s)) {
            info!("PANEL | [{}]", segment::describe(segments));
        }
        self.last = Some(*segments);
        Ok(())
    }
}

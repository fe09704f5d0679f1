//! TM1637 4-digit LED driver (two-wire bit-bang).
//!
//! Generic over `embedded-hal` 1.0 output pins and a nanosecond delay so
//! the same code drives ESP-IDF `PinDriver`s in firmware and recording
//! mock pins in host tests.
//!
//! ## Wire protocol
//!
//! ```text
//!  start : DIO falls while CLK high
//!  byte  : 8 bits LSB first, DIO set while CLK low, latched on CLK rise,
//!          then one ACK clock with DIO released
//!  stop  : DIO rises while CLK high
//! ```
//!
//! Each panel update sends three transactions: data command (auto
//! increment), address 0 followed by four segment bytes, display control
//! (on + brightness).  The ACK bit is clocked but not sampled.
//!
//! DIO must be wired as an open-drain output with a pull-up.  The chip pulls
//! DIO low during the ACK clock, and `set_high` only releases the line, so the
//! two never drive against each other.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use log::debug;

use crate::app::ports::DisplayPort;
use crate::config::MAX_BRIGHTNESS;
use crate::drivers::segment::Segment;
use crate::error::DisplayError;

/// Data command: write to display register, auto-increment address.
const CMD_DATA_AUTO_INCREMENT: u8 = 0x40;
/// Address command: first digit register.
const CMD_ADDRESS_DIGIT0: u8 = 0xC0;
/// Display control: display on, low three bits carry brightness.
const CMD_DISPLAY_ON: u8 = 0x88;

/// Half clock period.  Keeps the bus well under the 250 kHz limit.
const BIT_DELAY_US: u32 = 5;

pub struct Tm1637<CLK, DIO, D> {
    clk: CLK,
    dio: DIO,
    delay: D,
    brightness: u8,
}

impl<CLK, DIO, D> Tm1637<CLK, DIO, D>
where
    CLK: OutputPin,
    DIO: OutputPin,
    D: DelayNs,
{
    pub fn new(clk: CLK, dio: DIO, delay: D) -> Self {
        Self {
            clk,
            dio,
            delay,
            brightness: MAX_BRIGHTNESS,
        }
    }

    /// Release the pins and delay provider.
    pub fn release(self) -> (CLK, DIO, D) {
        (self.clk, self.dio, self.delay)
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    // ── Bus primitives ────────────────────────────────────────

    fn clk(&mut self, high: bool) -> Result<(), DisplayError> {
        let r = if high { self.clk.set_high() } else { self.clk.set_low() };
        r.map_err(|_| DisplayError::PinWriteFailed)
    }

    fn dio(&mut self, high: bool) -> Result<(), DisplayError> {
        let r = if high { self.dio.set_high() } else { self.dio.set_low() };
        r.map_err(|_| DisplayError::PinWriteFailed)
    }

    fn bit_delay(&mut self) {
        self.delay.delay_us(BIT_DELAY_US);
    }

    fn start(&mut self) -> Result<(), DisplayError> {
        self.clk(true)?;
        self.dio(true)?;
        self.bit_delay();
        self.dio(false)?;
        self.bit_delay();
        Ok(())
    }

    fn stop(&mut self) -> Result<(), DisplayError> {
        self.clk(false)?;
        self.dio(false)?;
        self.bit_delay();
        self.clk(true)?;
        self.bit_delay();
        self.dio(true)?;
        self.bit_delay();
        Ok(())
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), DisplayError> {
        for bit in 0..8 {
            self.clk(false)?;
            self.dio(byte & (1 << bit) != 0)?;
            self.bit_delay();
            self.clk(true)?;
            self.bit_delay();
        }
        // ACK clock with DIO released high.
        self.clk(false)?;
        self.dio(true)?;
        self.bit_delay();
        self.clk(true)?;
        self.bit_delay();
        self.clk(false)?;
        Ok(())
    }

    fn command(&mut self, bytes: &[u8]) -> Result<(), DisplayError> {
        self.start()?;
        for b in bytes {
            self.write_byte(*b)?;
        }
        self.stop()
    }

    fn display_control(&mut self) -> Result<(), DisplayError> {
        self.command(&[CMD_DISPLAY_ON | self.brightness])
    }
}

impl<CLK, DIO, D> DisplayPort for Tm1637<CLK, DIO, D>
where
    CLK: OutputPin,
    DIO: OutputPin,
    D: DelayNs,
{
    fn init(&mut self, brightness: u8) -> Result<(), DisplayError> {
        self.brightness = brightness.min(MAX_BRIGHTNESS);
        debug!("TM1637: init, brightness={}", self.brightness);
        self.display_control()
    }

    fn write(&mut self, segments: &[Segment; 4]) -> Result<(), DisplayError> {
        self.command(&[CMD_DATA_AUTO_INCREMENT])?;
        let mut payload = [0u8; 5];
        payload[0] = CMD_ADDRESS_DIGIT0;
        payload[1..].copy_from_slice(segments);
        self.command(&payload)?;
        self.display_control()
    }
}

//! GPIO assignments for the dashboard board.
//!
//! Single source of truth: `main` takes the matching `Peripherals` pins
//! for these numbers.  Change a pin here and in the pin selection there.

// ---------------------------------------------------------------------------
// TM1637 4-digit panel (two-wire, open-drain capable)
// ---------------------------------------------------------------------------

/// Panel clock line.
pub const DISPLAY_CLK_GPIO: i32 = 4;
/// Panel data line.
pub const DISPLAY_DIO_GPIO: i32 = 5;

//! Digit → segment encoder for the 4-digit 7-segment panel.
//!
//! ```text
//!      A
//!     ───
//!  F │   │ B
//!     ─G─
//!  E │   │ C
//!     ───   . DP
//!      D
//! ```
//!
//! One byte per digit, bit 0 = A … bit 6 = G, bit 7 = DP / colon.

use crate::app::aggregator::DisplayFrame;

/// Bit pattern for one display position.
pub type Segment = u8;

pub const SEG_A: Segment = 0b0000_0001;
pub const SEG_B: Segment = 0b0000_0010;
pub const SEG_C: Segment = 0b0000_0100;
pub const SEG_D: Segment = 0b0000_1000;
pub const SEG_E: Segment = 0b0001_0000;
pub const SEG_F: Segment = 0b0010_0000;
pub const SEG_G: Segment = 0b0100_0000;
pub const SEG_DP: Segment = 0b1000_0000;

pub const BLANK: Segment = 0;

/// Segment patterns for 0-9.
pub const DIGITS: [Segment; 10] = [
    0x3F, // 0
    0x06, // 1
    0x5B, // 2
    0x4F, // 3
    0x66, // 4
    0x6D, // 5
    0x7D, // 6
    0x07, // 7
    0x7F, // 8
    0x6F, // 9
];

/// Segment pattern for a single decimal digit.
///
/// Precondition: `digit <= 9`.  The aggregator guarantees this; values
/// above 9 are masked to the last table entry rather than panicking.
pub fn digit(digit: u8) -> Segment {
    DIGITS[usize::from(digit.min(9))]
}

/// Encode a frame into the four panel positions, left to right:
/// persons, birds, temperature tens, temperature ones.
pub fn encode(frame: &DisplayFrame) -> [Segment; 4] {
    [
        digit(frame.persons_digit),
        digit(frame.birds_digit),
        digit(frame.temp_tens),
        digit(frame.temp_ones),
    ]
}

/// Render segments as a human-readable string for logs (`"26"` style digits,
/// `?` for non-digit patterns, `_` for blank).
pub fn describe(segments: &[Segment; 4]) -> heapless::String<4> {
    let mut out = heapless::String::new();
    for seg in segments {
        let ch = match DIGITS.iter().position(|d| *d == *seg & !SEG_DP) {
            Some(i) => char::from(b'0' + i as u8),
            None if *seg == BLANK => '_',
            None => '?',
        };
        // Capacity is exactly four single-byte chars.
        let _ = out.push(ch);
    }
    out
}

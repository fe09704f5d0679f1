//! Connecting animation for the segment panel.
//!
//! While the controller waits for network association it chases a single
//! lit segment around the outer edge of the four digits.  The main loop
//! calls [`Spinner::next_frame`] once per tick and writes the result to
//! the display; the motion is the liveness indicator.
//!
//! ```text
//!   ─── ─── ─── ───        steps 0-3   : A of digits 0..3
//!  │               │       steps 4-5   : B, C of digit 3
//!   ─── ─── ─── ───        steps 6-9   : D of digits 3..0
//!                          steps 10-11 : E, F of digit 0
//! ```

use super::segment::{BLANK, SEG_A, SEG_B, SEG_C, SEG_D, SEG_E, SEG_F, Segment};

/// (digit position, segment) for each step of the chase.
const PATH: [(usize, Segment); 12] = [
    (0, SEG_A),
    (1, SEG_A),
    (2, SEG_A),
    (3, SEG_A),
    (3, SEG_B),
    (3, SEG_C),
    (3, SEG_D),
    (2, SEG_D),
    (1, SEG_D),
    (0, SEG_D),
    (0, SEG_E),
    (0, SEG_F),
];

/// Rotating single-segment animation.  Stack-allocated, no heap.
pub struct Spinner {
    step: usize,
}

impl Spinner {
    pub fn new() -> Self {
        Self { step: 0 }
    }

    /// Number of frames before the animation repeats.
    pub const fn period() -> usize {
        PATH.len()
    }

    /// Produce the current frame and advance to the next step.
    pub fn next_frame(&mut self) -> [Segment; 4] {
        let (pos, seg) = PATH[self.step];
        self.step = (self.step + 1) % PATH.len();
        let mut frame = [BLANK; 4];
        frame[pos] = seg;
        frame
    }
}

impl Default for Spinner {
    fn default() -> Self {
        Self::new()
    }
}

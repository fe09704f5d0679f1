//! Segment panel encoding, animation and the TM1637 bus driver.

pub mod segment;
pub mod spinner;
pub mod tm1637;

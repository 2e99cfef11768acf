//! Leaf game types: geometry, a single bit, the countdown.

pub mod cell;
pub mod countdown;
pub mod geometry;

//! Timing constants for the simulator.
//!
//! These constants use `std::time::Duration` which is not available in `no_std`
//! environments, so they are defined here rather than in the common crate.

use std::time::Duration;

/// Time per spectral frame (~60 rows per second). The loop sleeps if a frame
/// completes early.
pub const FRAME_TIME: Duration = Duration::from_millis(16);

/// Window scale factor (one panel pixel → 2x2 screen pixels).
pub const WINDOW_SCALE: u32 = 2;

//! Color stops and display-native packing for the waterfall palette.
//!
//! # Rgb565 Color Format
//!
//! The ST7789 panel takes 16 bits per pixel: 5 bits red, 6 bits green, 5 bits blue.
//! Palette stops are authored in 8-bit-per-channel [`Rgb888`] and reduced with
//! [`pack_rgb565`], which truncates (drops the low bits) instead of rounding.
//!
//! # Compile-Time Validation
//!
//! [`RAINBOW`] is checked with a `const` assertion. If someone reorders the stops
//! or moves the first stop off zero, the build fails instead of producing a
//! broken ramp at boot.

use embedded_graphics::pixelcolor::{Rgb565, Rgb888, RgbColor};

use crate::ramp::validate_stops;

/// Highest threshold a stop may carry. `0x100` is one past the last usable index
/// and marks the far end of the final segment.
pub const STOP_SENTINEL: u16 = 0x100;

/// A palette anchor: the ramp takes exactly `color` at index `threshold`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ColorStop {
    /// Ramp index where this color applies, in `0..=0x100`.
    pub threshold: u16,
    /// 8-bit-per-channel color at that index.
    pub color: Rgb888,
}

impl ColorStop {
    /// Create a stop from a threshold and raw channel values.
    pub const fn new(
        threshold: u16,
        r: u8,
        g: u8,
        b: u8,
    ) -> Self {
        Self {
            threshold,
            color: Rgb888::new(r, g, b),
        }
    }
}

/// Reduce an 8-bit-per-channel color to the panel's 5/6/5 layout (truncating).
#[inline]
pub fn pack_rgb565(color: Rgb888) -> Rgb565 {
    Rgb565::new(color.r() >> 3, color.g() >> 2, color.b() >> 3)
}

// =============================================================================
// Default Palette
// =============================================================================

/// Purple → blue → teal → green → yellow → orange → red.
///
/// Low magnitudes (noise floor) sit in dark purple, strong peaks in red.
pub const RAINBOW: [ColorStop; 8] = [
    ColorStop::new(0x00, 68, 34, 153),
    ColorStop::new(0x18, 68, 68, 221),
    ColorStop::new(0x38, 17, 170, 187),
    ColorStop::new(0x58, 34, 204, 170),
    ColorStop::new(0x78, 105, 208, 37),
    ColorStop::new(0x88, 170, 204, 34),
    ColorStop::new(0xC0, 210, 90, 16),
    ColorStop::new(STOP_SENTINEL, 238, 17, 0),
];

const _: () = assert!(stops_are_valid(&RAINBOW));

/// Check the stop-list invariants without allocating or panicking.
///
/// Valid lists are non-empty, start at threshold 0, increase strictly and never
/// exceed [`STOP_SENTINEL`]. Usable in `const` context; see
/// [`validate_stops`] for which rule failed.
pub const fn stops_are_valid(stops: &[ColorStop]) -> bool { validate_stops(stops).is_ok() }

/// Background for rows that have not been written yet.
pub const BLACK: Rgb565 = Rgb565::BLACK;

// =============================================================================
// Tests
// =============================================================================

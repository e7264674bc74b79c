//! Boundary between the waterfall and the panel driver.
//!
//! The core only ever needs two things from a display: push a block of pixels and
//! move the vertical scroll pointer. Everything else (bus setup, reset sequence,
//! backlight) belongs to the driver.

use embedded_graphics::pixelcolor::Rgb565;

/// A panel that accepts pixel blocks and, optionally, a scroll offset.
///
/// Calls block until the panel has accepted the data. That blocking is the only
/// backpressure in the system: the waterfall holds no frame queue.
pub trait DisplayDevice {
    /// Bus or driver failure.
    type Error;

    /// Write `width * height` pixels, row-major, into the window at `(x, y)`.
    ///
    /// The waterfall always writes one full-width row: `x == 0`, `height == 1`.
    fn write_block(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        pixels: &[Rgb565],
    ) -> Result<(), Self::Error>;

    /// Make physical line `offset` the first line shown at the top edge.
    ///
    /// Only called when the waterfall is configured with hardware scroll.
    fn set_scroll_offset(
        &mut self,
        offset: u16,
    ) -> Result<(), Self::Error>;
}

impl<T: DisplayDevice + ?Sized> DisplayDevice for &mut T {
    type Error = T::Error;

    fn write_block(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        pixels: &[Rgb565],
    ) -> Result<(), Self::Error> {
        (**self).write_block(x, y, width, height, pixels)
    }

    fn set_scroll_offset(
        &mut self,
        offset: u16,
    ) -> Result<(), Self::Error> {
        (**self).set_scroll_offset(offset)
    }
}

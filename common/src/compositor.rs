//! Magnitude vector → pixel row.

use embedded_graphics::pixelcolor::Rgb565;

use crate::colors::BLACK;
use crate::quantizer::Quantizer;
use crate::ramp::RampTable;

/// Fill `row` with `ramp[quantize(magnitudes[i])]`.
///
/// Pure and allocation-free. Only the overlapping prefix is written, so callers
/// check lengths first (see [`RowCompositor::compose`]).
#[inline]
pub fn compose_row_into(
    magnitudes: &[f32],
    ramp: &RampTable,
    quantizer: &Quantizer,
    row: &mut [Rgb565],
) {
    for (pixel, &magnitude) in row.iter_mut().zip(magnitudes) {
        *pixel = ramp[quantizer.quantize(magnitude)];
    }
}

/// Owns the single row buffer reused across renders.
///
/// `N` is the display width, fixed at build time like the rest of the layout.
pub struct RowCompositor<const N: usize> {
    row: [Rgb565; N],
}

impl<const N: usize> RowCompositor<N> {
    /// Create a compositor with a black row.
    pub const fn new() -> Self { Self { row: [BLACK; N] } }

    /// Row width in pixels.
    #[inline]
    pub const fn width(&self) -> usize { N }

    /// Convert `magnitudes` into the internal row and return it.
    ///
    /// Returns `None` when `magnitudes.len() != N`; the row is left untouched so a
    /// malformed frame is never partially drawn.
    pub fn compose(
        &mut self,
        magnitudes: &[f32],
        ramp: &RampTable,
        quantizer: &Quantizer,
    ) -> Option<&[Rgb565; N]> {
        if magnitudes.len() != N {
            return None;
        }
        compose_row_into(magnitudes, ramp, quantizer, &mut self.row);
        Some(&self.row)
    }

    /// Most recently composed row.
    #[inline]
    pub const fn row(&self) -> &[Rgb565; N] { &self.row }
}

impl<const N: usize> Default for RowCompositor<N> {
    fn default() -> Self { Self::new() }
}

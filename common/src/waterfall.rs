//! The waterfall context: one owned value per display.
//!
//! [`Waterfall`] bundles the panel, the precomputed ramp, the quantizer, the row
//! buffer and the scroll cursor. Nothing here is global; the driver loop owns the
//! value and calls [`Waterfall::render`] once per spectral frame.
//!
//! ```text
//! magnitudes ──► quantize ──► ramp lookup ──► row buffer ──► write_block(0, cursor)
//!                                                              └─► set_scroll_offset
//! ```

use embedded_graphics::pixelcolor::Rgb565;

use crate::compositor::RowCompositor;
use crate::config::WaterfallConfig;
use crate::display::DisplayDevice;
use crate::error::{ConfigError, RenderError};
use crate::quantizer::Quantizer;
use crate::ramp::RampTable;
use crate::scroll::{RowPlacement, ScrollController};

/// Running counters, reset by [`Waterfall::begin`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RenderStats {
    /// Rows that reached the panel.
    pub rows_rendered: u32,
    /// Times the cursor came back to its first slot (full screen refreshes).
    pub cycles_completed: u32,
    /// Frames rejected for having the wrong length.
    pub frames_rejected: u32,
    /// Renders that failed in the display driver.
    pub display_errors: u32,
}

/// Spectrum waterfall bound to one display of width `N`.
pub struct Waterfall<D: DisplayDevice, const N: usize> {
    device: D,
    ramp: RampTable,
    quantizer: Quantizer,
    compositor: RowCompositor<N>,
    scroll: ScrollController,
    stats: RenderStats,
}

impl<D: DisplayDevice, const N: usize> Waterfall<D, N> {
    /// Validate `config` and build the ramp. Performs no display I/O.
    ///
    /// # Errors
    /// Any [`ConfigError`]: bad stops, bad calibration, zero height, or a width of
    /// zero / above `u16::MAX`.
    pub fn new(
        device: D,
        config: &WaterfallConfig<'_>,
    ) -> Result<Self, ConfigError> {
        if N == 0 {
            return Err(ConfigError::ZeroWidth);
        }
        if N > u16::MAX as usize {
            return Err(ConfigError::WidthTooLarge { width: N });
        }

        let ramp = RampTable::build(config.stops)?;
        let quantizer = Quantizer::new(config.calibration)?;
        let scroll = ScrollController::new(config.height, config.direction, config.hardware_scroll)?;

        Ok(Self {
            device,
            ramp,
            quantizer,
            compositor: RowCompositor::new(),
            scroll,
            stats: RenderStats::default(),
        })
    }

    /// Start a display session: cursor to its first slot, scroll pointer to match.
    ///
    /// # Errors
    /// Display failure while sending the initial offset.
    pub fn begin(&mut self) -> Result<(), D::Error> {
        self.scroll.reset();
        self.stats = RenderStats::default();
        if let Some(offset) = self.scroll.scroll_offset() {
            self.device.set_scroll_offset(offset)?;
        }
        Ok(())
    }

    /// Render one spectral frame as the newest waterfall row.
    ///
    /// # Errors
    /// - [`RenderError::LengthMismatch`] if `magnitudes.len() != N` (nothing is drawn)
    /// - [`RenderError::Display`] if the panel rejects the row (cursor unchanged)
    /// - [`RenderError::ScrollOffset`] if the row landed but the offset update
    ///   failed; the row still counts in [`RenderStats`]
    pub fn render(
        &mut self,
        magnitudes: &[f32],
    ) -> Result<RowPlacement, RenderError<D::Error>> {
        let Some(row) = self.compositor.compose(magnitudes, &self.ramp, &self.quantizer) else {
            self.stats.frames_rejected = self.stats.frames_rejected.wrapping_add(1);
            return Err(RenderError::LengthMismatch {
                expected: N,
                actual: magnitudes.len(),
            });
        };

        let placement = match self.scroll.write_row(&mut self.device, row) {
            Ok(placement) => placement,
            Err(err) => {
                self.stats.display_errors = self.stats.display_errors.wrapping_add(1);
                return Err(RenderError::Display(err));
            }
        };

        // The row is on the panel from here on, whatever happens to the offset
        self.stats.rows_rendered = self.stats.rows_rendered.wrapping_add(1);
        if self.scroll.at_start() {
            self.stats.cycles_completed = self.stats.cycles_completed.wrapping_add(1);
        }

        if let Err(error) = self.scroll.send_offset(&mut self.device, placement) {
            self.stats.display_errors = self.stats.display_errors.wrapping_add(1);
            return Err(RenderError::ScrollOffset { placement, error });
        }
        Ok(placement)
    }

    /// Row width in pixels.
    #[inline]
    pub const fn width(&self) -> usize { N }

    /// Number of physical lines.
    #[inline]
    pub const fn height(&self) -> u16 { self.scroll.height() }

    /// Next physical line to be written.
    #[inline]
    pub const fn cursor(&self) -> u16 { self.scroll.cursor() }

    #[inline]
    pub const fn scroll(&self) -> &ScrollController { &self.scroll }

    #[inline]
    pub const fn ramp(&self) -> &RampTable { &self.ramp }

    #[inline]
    pub const fn quantizer(&self) -> &Quantizer { &self.quantizer }

    /// Last row sent to the panel.
    #[inline]
    pub const fn last_row(&self) -> &[Rgb565; N] { self.compositor.row() }

    #[inline]
    pub const fn stats(&self) -> RenderStats { self.stats }

    #[inline]
    pub const fn device(&self) -> &D { &self.device }

    #[inline]
    pub const fn device_mut(&mut self) -> &mut D { &mut self.device }

    /// Give the panel back.
    pub fn release(self) -> D { self.device }
}

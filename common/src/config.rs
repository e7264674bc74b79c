//! Display geometry and startup configuration.
//!
//! Geometry is compile-time: the row buffer is a `[Rgb565; SCREEN_WIDTH]` and the
//! magnitude vector length is bound to it. Everything else is collected in
//! [`WaterfallConfig`] and validated once when the waterfall is built.

use crate::colors::{ColorStop, RAINBOW};
use crate::quantizer::Calibration;
use crate::scroll::ScrollDirection;

// =============================================================================
// Display Configuration
// =============================================================================

/// Panel width in pixels (ST7789 on Pimoroni PIM715, portrait: 240x320).
/// One magnitude per column.
pub const SCREEN_WIDTH: usize = 240;

/// Panel height in lines. This is the depth of the visible history.
pub const SCREEN_HEIGHT: u16 = 320;

const _: () = assert!(SCREEN_WIDTH > 0 && SCREEN_WIDTH <= u16::MAX as usize);
const _: () = assert!(SCREEN_HEIGHT > 0);

// =============================================================================
// Waterfall Configuration
// =============================================================================

/// Startup configuration, fixed for the life of the display session.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct WaterfallConfig<'a> {
    /// Physical lines in the scroll buffer.
    pub height: u16,
    /// Palette stops, ascending, first at 0.
    pub stops: &'a [ColorStop],
    /// Quantizer shift/offset/scale.
    pub calibration: Calibration,
    /// Cursor walk direction.
    pub direction: ScrollDirection,
    /// Whether the panel's scroll register is driven.
    pub hardware_scroll: bool,
}

impl WaterfallConfig<'static> {
    /// Rainbow palette, raw-power calibration, increasing cursor with hardware scroll.
    pub const DEFAULT: Self = Self {
        height: SCREEN_HEIGHT,
        stops: &RAINBOW,
        calibration: Calibration::RAW_POWER,
        direction: ScrollDirection::Increasing,
        hardware_scroll: true,
    };
}

impl<'a> WaterfallConfig<'a> {
    /// Replace the palette.
    pub const fn with_stops(
        self,
        stops: &'a [ColorStop],
    ) -> Self {
        Self { stops, ..self }
    }

    /// Replace the quantizer calibration.
    pub const fn with_calibration(
        self,
        calibration: Calibration,
    ) -> Self {
        Self { calibration, ..self }
    }

    /// Replace the cursor direction.
    pub const fn with_direction(
        self,
        direction: ScrollDirection,
    ) -> Self {
        Self { direction, ..self }
    }

    /// Enable or disable the scroll register.
    pub const fn with_hardware_scroll(
        self,
        hardware_scroll: bool,
    ) -> Self {
        Self {
            hardware_scroll,
            ..self
        }
    }

    /// Replace the number of physical lines.
    pub const fn with_height(
        self,
        height: u16,
    ) -> Self {
        Self { height, ..self }
    }
}

impl Default for WaterfallConfig<'static> {
    fn default() -> Self { Self::DEFAULT }
}

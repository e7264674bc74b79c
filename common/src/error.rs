//! Error types for waterfall setup and per-row rendering.
//!
//! Configuration errors are fatal at startup: the firmware refuses to bring up the
//! waterfall instead of rendering with an inconsistent ramp. Render errors are
//! reported per call and left to the driver loop to handle.

use core::fmt;

use crate::scroll::RowPlacement;

/// Rejected configuration. Returned by the `new`/`build` constructors only.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The color stop list has no entries.
    EmptyStops,
    /// The first stop must sit at threshold 0.
    FirstThresholdNotZero { threshold: u16 },
    /// Stop `index` does not lie strictly above its predecessor.
    ThresholdsNotIncreasing { index: usize },
    /// Stop `index` lies beyond the `0x100` sentinel.
    ThresholdOutOfRange { index: usize, threshold: u16 },
    /// Quantizer shift would discard the whole 32-bit pattern.
    ShiftOutOfRange { shift: u32 },
    /// Quantizer scale numerator or denominator is zero or negative.
    NonPositiveScale,
    /// Row width must be at least one pixel.
    ZeroWidth,
    /// Row width does not fit the display's 16-bit coordinates.
    WidthTooLarge { width: usize },
    /// The scroll buffer needs at least one physical row.
    ZeroHeight,
}

impl fmt::Display for ConfigError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::EmptyStops => write!(f, "color stop list is empty"),
            Self::FirstThresholdNotZero { threshold } => {
                write!(f, "first color stop starts at {threshold:#x}, expected 0")
            }
            Self::ThresholdsNotIncreasing { index } => {
                write!(f, "color stop {index} does not increase over its predecessor")
            }
            Self::ThresholdOutOfRange { index, threshold } => {
                write!(f, "color stop {index} threshold {threshold:#x} exceeds 0x100")
            }
            Self::ShiftOutOfRange { shift } => write!(f, "quantizer shift {shift} exceeds 31"),
            Self::NonPositiveScale => write!(f, "quantizer scale numerator and denominator must be positive"),
            Self::ZeroWidth => write!(f, "row width is zero"),
            Self::WidthTooLarge { width } => write!(f, "row width {width} exceeds 65535"),
            Self::ZeroHeight => write!(f, "display height is zero"),
        }
    }
}

impl core::error::Error for ConfigError {}

/// Failure of a single `render` call.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RenderError<E> {
    /// Magnitude vector length differs from the configured row width.
    LengthMismatch { expected: usize, actual: usize },
    /// The display device rejected the row; nothing was drawn and the cursor
    /// did not move.
    Display(E),
    /// The row reached the panel at `placement`, but the scroll pointer update
    /// failed. The cursor has already moved past the row.
    ScrollOffset { placement: RowPlacement, error: E },
}

impl<E> RenderError<E> {
    /// Where the row landed, if it reached the panel despite the error.
    pub const fn placement(&self) -> Option<RowPlacement> {
        match self {
            Self::ScrollOffset { placement, .. } => Some(*placement),
            Self::LengthMismatch { .. } | Self::Display(_) => None,
        }
    }
}

impl<E> From<E> for RenderError<E> {
    fn from(err: E) -> Self { Self::Display(err) }
}

impl<E: fmt::Debug> fmt::Display for RenderError<E> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::LengthMismatch { expected, actual } => {
                write!(f, "magnitude vector has {actual} values, display row needs {expected}")
            }
            Self::Display(err) => write!(f, "display write failed: {err:?}"),
            Self::ScrollOffset { placement, error } => write!(
                f,
                "row written to line {} but scroll offset {:?} failed: {error:?}",
                placement.row, placement.offset
            ),
        }
    }
}

impl<E: fmt::Debug> core::error::Error for RenderError<E> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_messages() {
        assert_eq!(ConfigError::EmptyStops.to_string(), "color stop list is empty");
        assert_eq!(
            ConfigError::FirstThresholdNotZero { threshold: 0x10 }.to_string(),
            "first color stop starts at 0x10, expected 0"
        );
        assert_eq!(ConfigError::ZeroHeight.to_string(), "display height is zero");
        assert_eq!(
            ConfigError::NonPositiveScale.to_string(),
            "quantizer scale numerator and denominator must be positive"
        );
    }

    #[test]
    fn test_render_error_from_display_error() {
        let err: RenderError<&str> = "bus fault".into();
        assert_eq!(err, RenderError::Display("bus fault"));
        assert_eq!(err.to_string(), "display write failed: \"bus fault\"");
    }

    #[test]
    fn test_scroll_offset_error_keeps_placement() {
        let placement = RowPlacement { row: 3, offset: Some(0) };
        let err = RenderError::ScrollOffset {
            placement,
            error: "bus fault",
        };
        assert_eq!(err.placement(), Some(placement));
        assert_eq!(
            err.to_string(),
            "row written to line 3 but scroll offset Some(0) failed: \"bus fault\""
        );
        assert_eq!(RenderError::Display("bus fault").placement(), None);
    }

    #[test]
    fn test_length_mismatch_message() {
        let err: RenderError<()> = RenderError::LengthMismatch { expected: 240, actual: 239 };
        assert_eq!(err.to_string(), "magnitude vector has 239 values, display row needs 240");
    }
}

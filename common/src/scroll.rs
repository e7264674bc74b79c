//! Circular row cursor and scroll-offset tracking.
//!
//! The panel keeps `H` physical lines. Each new row overwrites the oldest line and
//! the scroll pointer moves by one, so the picture appears to scroll while only a
//! single row crosses the bus per frame.
//!
//! # Offset Convention
//!
//! The offset is the physical line shown at the top edge. After a write the cursor
//! points at the oldest line, and both directions pick the offset so that line is
//! on top and the newest row sits on the bottom edge:
//!
//! | Direction | First row | Offset after advance |
//! |-----------|-----------|----------------------|
//! | `Increasing` | `0` | `cursor` |
//! | `Decreasing` | `H - 1` | `H - 1 - cursor` (panel rows mirrored) |
//!
//! Without hardware scroll the offset is never sent and the newest row simply
//! walks across the frame.

use embedded_graphics::pixelcolor::Rgb565;

use crate::display::DisplayDevice;
use crate::error::ConfigError;

/// Which way the cursor walks through physical lines.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScrollDirection {
    /// `0, 1, …, H-1, 0, …`
    #[default]
    Increasing,
    /// `H-1, H-2, …, 0, H-1, …`
    Decreasing,
}

impl ScrollDirection {
    /// Slot the first row of a session lands on. A zero height yields 0.
    #[inline]
    pub const fn start(
        self,
        height: u16,
    ) -> u16 {
        match self {
            Self::Increasing => 0,
            Self::Decreasing => height.saturating_sub(1),
        }
    }
}

/// Result of one controller transition.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RowPlacement {
    /// Physical line the row was written to.
    pub row: u16,
    /// Offset sent to the panel, `None` without hardware scroll.
    pub offset: Option<u16>,
}

/// Cursor state for one display session.
///
/// Not synchronized: exactly one render path may own it.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScrollController {
    height: u16,
    cursor: u16,
    direction: ScrollDirection,
    hardware_scroll: bool,
}

impl ScrollController {
    /// Create a controller over `height` physical lines.
    ///
    /// # Errors
    /// [`ConfigError::ZeroHeight`] when `height == 0`.
    pub const fn new(
        height: u16,
        direction: ScrollDirection,
        hardware_scroll: bool,
    ) -> Result<Self, ConfigError> {
        if height == 0 {
            return Err(ConfigError::ZeroHeight);
        }
        Ok(Self {
            height,
            cursor: direction.start(height),
            direction,
            hardware_scroll,
        })
    }

    /// Next physical line to be written.
    #[inline]
    pub const fn cursor(&self) -> u16 { self.cursor }

    /// Number of physical lines.
    #[inline]
    pub const fn height(&self) -> u16 { self.height }

    #[inline]
    pub const fn direction(&self) -> ScrollDirection { self.direction }

    #[inline]
    pub const fn hardware_scroll(&self) -> bool { self.hardware_scroll }

    /// True when the cursor sits on the session's first slot again.
    #[inline]
    pub const fn at_start(&self) -> bool { self.cursor == self.direction.start(self.height) }

    /// Offset that matches the current cursor, `None` without hardware scroll.
    #[inline]
    pub const fn scroll_offset(&self) -> Option<u16> {
        if !self.hardware_scroll {
            return None;
        }
        Some(match self.direction {
            ScrollDirection::Increasing => self.cursor,
            ScrollDirection::Decreasing => self.height - 1 - self.cursor,
        })
    }

    /// Put the cursor back on its first slot.
    pub const fn reset(&mut self) { self.cursor = self.direction.start(self.height); }

    /// Move past the slot just written, wrapping at either end.
    ///
    /// Returns the slot that was current before the move.
    pub const fn advance(&mut self) -> RowPlacement {
        let row = self.cursor;
        self.cursor = match self.direction {
            ScrollDirection::Increasing => {
                if row + 1 >= self.height {
                    0
                } else {
                    row + 1
                }
            }
            ScrollDirection::Decreasing => {
                if row == 0 {
                    self.height - 1
                } else {
                    row - 1
                }
            }
        };
        RowPlacement {
            row,
            offset: self.scroll_offset(),
        }
    }

    /// Write `row` at the cursor and advance. The scroll pointer is not touched.
    ///
    /// If the write fails the cursor does not move.
    ///
    /// # Errors
    /// Any error from the device.
    pub fn write_row<D: DisplayDevice + ?Sized, const N: usize>(
        &mut self,
        device: &mut D,
        row: &[Rgb565; N],
    ) -> Result<RowPlacement, D::Error> {
        const { assert!(N <= u16::MAX as usize, "row width exceeds 16-bit panel coordinates") };
        device.write_block(0, self.cursor, N as u16, 1, row)?;
        Ok(self.advance())
    }

    /// Send the offset of `placement` to the panel, if there is one.
    ///
    /// # Errors
    /// Any error from the device.
    pub fn send_offset<D: DisplayDevice + ?Sized>(
        &self,
        device: &mut D,
        placement: RowPlacement,
    ) -> Result<(), D::Error> {
        if let Some(offset) = placement.offset {
            device.set_scroll_offset(offset)?;
        }
        Ok(())
    }

    /// Write `row` at the cursor, advance, then update the scroll pointer.
    ///
    /// The offset goes out right after the pixels so the panel never shows a frame
    /// where the new line and the pointer disagree. If the pixel write fails the
    /// cursor does not move; if only the offset fails the row has landed and the
    /// cursor has moved past it.
    ///
    /// # Errors
    /// Any error from the device.
    pub fn render<D: DisplayDevice + ?Sized, const N: usize>(
        &mut self,
        device: &mut D,
        row: &[Rgb565; N],
    ) -> Result<RowPlacement, D::Error> {
        let placement = self.write_row(device, row)?;
        self.send_offset(device, placement)?;
        Ok(placement)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::vec::Vec;

    use super::*;

    /// One call observed by [`Recorder`].
    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    pub(crate) enum Op {
        Write { x: u16, y: u16, width: u16, height: u16 },
        Scroll(u16),
    }

    /// Display double that logs every call and can be told to fail.
    #[derive(Default)]
    pub(crate) struct Recorder {
        pub ops: Vec<Op>,
        pub last_row: Vec<Rgb565>,
        pub fail_writes: bool,
        pub fail_scroll: bool,
    }

    impl Recorder {
        pub fn writes(&self) -> Vec<u16> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    Op::Write { y, .. } => Some(*y),
                    Op::Scroll(_) => None,
                })
                .collect()
        }

        pub fn scrolls(&self) -> Vec<u16> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    Op::Scroll(o) => Some(*o),
                    Op::Write { .. } => None,
                })
                .collect()
        }
    }

    impl DisplayDevice for Recorder {
        type Error = &'static str;

        fn write_block(
            &mut self,
            x: u16,
            y: u16,
            width: u16,
            height: u16,
            pixels: &[Rgb565],
        ) -> Result<(), Self::Error> {
            if self.fail_writes {
                return Err("write failed");
            }
            self.ops.push(Op::Write { x, y, width, height });
            self.last_row = pixels.to_vec();
            Ok(())
        }

        fn set_scroll_offset(
            &mut self,
            offset: u16,
        ) -> Result<(), Self::Error> {
            if self.fail_scroll {
                return Err("scroll failed");
            }
            self.ops.push(Op::Scroll(offset));
            Ok(())
        }
    }

    const ROW: [Rgb565; 2] = [Rgb565::new(1, 2, 3), Rgb565::new(4, 5, 6)];

    #[test]
    fn test_zero_height_rejected() {
        assert_eq!(
            ScrollController::new(0, ScrollDirection::Increasing, true),
            Err(ConfigError::ZeroHeight)
        );
    }

    #[test]
    fn test_initial_cursor() {
        let inc = ScrollController::new(4, ScrollDirection::Increasing, true).unwrap();
        let dec = ScrollController::new(4, ScrollDirection::Decreasing, true).unwrap();
        assert_eq!(inc.cursor(), 0);
        assert_eq!(dec.cursor(), 3);
        assert!(inc.at_start() && dec.at_start());
    }

    #[test]
    fn test_decreasing_writes_wrap() {
        let mut ctl = ScrollController::new(4, ScrollDirection::Decreasing, true).unwrap();
        let mut dev = Recorder::default();
        let placements: Vec<RowPlacement> = (0..5).map(|_| ctl.render(&mut dev, &ROW).unwrap()).collect();

        assert_eq!(dev.writes(), [3, 2, 1, 0, 3]);
        // Offsets H-1-cursor after each advance: cursor 2,1,0,3,2
        assert_eq!(dev.scrolls(), [1, 2, 3, 0, 1]);
        assert_eq!(placements[4].offset, placements[0].offset);
        assert_eq!(placements[4].row, placements[0].row);
    }

    #[test]
    fn test_increasing_writes_wrap() {
        let mut ctl = ScrollController::new(3, ScrollDirection::Increasing, true).unwrap();
        let mut dev = Recorder::default();
        for _ in 0..4 {
            ctl.render(&mut dev, &ROW).unwrap();
        }
        assert_eq!(dev.writes(), [0, 1, 2, 0]);
        assert_eq!(dev.scrolls(), [1, 2, 0, 1]);
    }

    #[test]
    fn test_cycle_visits_every_row_once() {
        for direction in [ScrollDirection::Increasing, ScrollDirection::Decreasing] {
            let height = 7;
            let mut ctl = ScrollController::new(height, direction, true).unwrap();
            let start = ctl.cursor();
            let mut dev = Recorder::default();
            for _ in 0..height {
                ctl.render(&mut dev, &ROW).unwrap();
            }
            let mut rows = dev.writes();
            rows.sort_unstable();
            assert_eq!(rows, (0..height).collect::<Vec<_>>(), "{direction:?}");
            assert_eq!(ctl.cursor(), start);
            assert!(ctl.at_start());
        }
    }

    #[test]
    fn test_scroll_follows_write() {
        let mut ctl = ScrollController::new(4, ScrollDirection::Increasing, true).unwrap();
        let mut dev = Recorder::default();
        ctl.render(&mut dev, &ROW).unwrap();
        ctl.render(&mut dev, &ROW).unwrap();
        assert_eq!(
            dev.ops,
            [
                Op::Write { x: 0, y: 0, width: 2, height: 1 },
                Op::Scroll(1),
                Op::Write { x: 0, y: 1, width: 2, height: 1 },
                Op::Scroll(2),
            ]
        );
        assert_eq!(dev.last_row, ROW);
    }

    #[test]
    fn test_without_hardware_scroll() {
        let mut ctl = ScrollController::new(2, ScrollDirection::Increasing, false).unwrap();
        let mut dev = Recorder::default();
        for _ in 0..3 {
            let placement = ctl.render(&mut dev, &ROW).unwrap();
            assert_eq!(placement.offset, None);
        }
        assert_eq!(dev.writes(), [0, 1, 0]);
        assert!(dev.scrolls().is_empty());
        assert_eq!(ctl.scroll_offset(), None);
    }

    #[test]
    fn test_failed_write_keeps_cursor() {
        let mut ctl = ScrollController::new(4, ScrollDirection::Decreasing, true).unwrap();
        let mut dev = Recorder {
            fail_writes: true,
            ..Recorder::default()
        };
        assert_eq!(ctl.render(&mut dev, &ROW), Err("write failed"));
        assert_eq!(ctl.cursor(), 3);
        assert!(dev.ops.is_empty());
    }

    #[test]
    fn test_failed_scroll_surfaces() {
        let mut ctl = ScrollController::new(4, ScrollDirection::Increasing, true).unwrap();
        let mut dev = Recorder {
            fail_scroll: true,
            ..Recorder::default()
        };
        assert_eq!(ctl.render(&mut dev, &ROW), Err("scroll failed"));
        assert_eq!(dev.writes(), [0]);
    }

    #[test]
    fn test_single_line_panel() {
        let mut ctl = ScrollController::new(1, ScrollDirection::Decreasing, true).unwrap();
        assert_eq!(ctl.advance(), RowPlacement { row: 0, offset: Some(0) });
        assert_eq!(ctl.advance(), RowPlacement { row: 0, offset: Some(0) });
    }

    #[test]
    fn test_start_on_zero_height() {
        assert_eq!(ScrollDirection::Decreasing.start(0), 0);
        assert_eq!(ScrollDirection::Increasing.start(0), 0);
        assert_eq!(ScrollDirection::Decreasing.start(1), 0);
        assert_eq!(ScrollDirection::Decreasing.start(320), 319);
    }

    #[test]
    fn test_row_lands_when_offset_fails() {
        let mut ctl = ScrollController::new(4, ScrollDirection::Decreasing, true).unwrap();
        let mut dev = Recorder {
            fail_scroll: true,
            ..Recorder::default()
        };
        let placement = ctl.write_row(&mut dev, &ROW).unwrap();
        assert_eq!(placement, RowPlacement { row: 3, offset: Some(1) });
        assert_eq!(ctl.send_offset(&mut dev, placement), Err("scroll failed"));
        assert_eq!(dev.writes(), [3]);
        assert_eq!(ctl.cursor(), 2);
    }

    #[test]
    fn test_send_offset_skipped_without_hardware_scroll() {
        let mut ctl = ScrollController::new(3, ScrollDirection::Increasing, false).unwrap();
        let mut dev = Recorder {
            fail_scroll: true,
            ..Recorder::default()
        };
        let placement = ctl.write_row(&mut dev, &ROW).unwrap();
        assert_eq!(ctl.send_offset(&mut dev, placement), Ok(()));
        assert!(dev.scrolls().is_empty());
    }

    #[test]
    fn test_write_width_comes_from_row_type() {
        let mut ctl = ScrollController::new(2, ScrollDirection::Increasing, true).unwrap();
        let mut dev = Recorder::default();
        ctl.write_row(&mut dev, &[Rgb565::new(0, 0, 0); 7]).unwrap();
        assert_eq!(
            dev.ops,
            [Op::Write {
                x: 0,
                y: 0,
                width: 7,
                height: 1
            }]
        );
    }

    #[test]
    fn test_reset() {
        let mut ctl = ScrollController::new(5, ScrollDirection::Increasing, true).unwrap();
        ctl.advance();
        ctl.advance();
        assert_eq!(ctl.cursor(), 2);
        ctl.reset();
        assert_eq!(ctl.cursor(), 0);
        assert_eq!(ctl.scroll_offset(), Some(0));
    }
}

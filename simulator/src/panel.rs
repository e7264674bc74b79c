//! Emulated ST7789 panel with a vertical scroll register.
//!
//! Rows land in a physical line buffer exactly where the controller addresses them.
//! [`SimulatedPanel::present`] then draws the lines the way the panel scans them
//! out: screen line `s` shows physical line `(offset + s) % H`. With mirrored row
//! addressing (`MADCTL.MY` on the real panel), logical row `y` is stored at
//! physical line `H - 1 - y`.

use std::fmt;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use waterfall_common::DisplayDevice;
use waterfall_common::colors::BLACK;

/// Rejected panel access.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PanelError {
    /// Window reaches past the panel edge.
    OutOfBounds { x: u16, y: u16, width: u16, height: u16 },
    /// Pixel count does not match the window.
    PixelCount { expected: usize, actual: usize },
    /// Scroll offset past the last line.
    OffsetOutOfRange(u16),
}

impl fmt::Display for PanelError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::OutOfBounds { x, y, width, height } => {
                write!(f, "window {width}x{height} at ({x}, {y}) exceeds panel")
            }
            Self::PixelCount { expected, actual } => write!(f, "expected {expected} pixels, got {actual}"),
            Self::OffsetOutOfRange(offset) => write!(f, "scroll offset {offset} out of range"),
        }
    }
}

impl std::error::Error for PanelError {}

/// Line buffer plus scroll pointer.
pub struct SimulatedPanel {
    width: u16,
    height: u16,
    lines: Vec<Rgb565>,
    scroll_offset: u16,
    mirrored_rows: bool,
    writes: u64,
}

impl SimulatedPanel {
    /// Blank panel. `mirrored_rows` flips row addressing as `MADCTL.MY` does.
    pub fn new(
        width: u16,
        height: u16,
        mirrored_rows: bool,
    ) -> Self {
        Self {
            width,
            height,
            lines: vec![BLACK; usize::from(width) * usize::from(height)],
            scroll_offset: 0,
            mirrored_rows,
            writes: 0,
        }
    }

    #[inline]
    pub const fn scroll_offset(&self) -> u16 { self.scroll_offset }

    /// Block writes accepted so far.
    #[inline]
    pub const fn writes(&self) -> u64 { self.writes }

    /// Pixels of the line shown at screen line `s` (0 = top edge).
    pub fn visible_line(
        &self,
        s: u16,
    ) -> &[Rgb565] {
        let physical = (u32::from(self.scroll_offset) + u32::from(s)) % u32::from(self.height);
        self.physical_line(physical as u16)
    }

    fn physical_line(
        &self,
        line: u16,
    ) -> &[Rgb565] {
        let start = usize::from(line) * usize::from(self.width);
        &self.lines[start..start + usize::from(self.width)]
    }

    fn physical_of(
        &self,
        y: u16,
    ) -> u16 {
        if self.mirrored_rows { self.height - 1 - y } else { y }
    }

    /// Draw the panel as currently scanned out.
    pub fn present<T>(
        &self,
        target: &mut T,
    ) -> Result<(), T::Error>
    where
        T: DrawTarget<Color = Rgb565>,
    {
        for s in 0..self.height {
            let area = Rectangle::new(Point::new(0, i32::from(s)), Size::new(u32::from(self.width), 1));
            target.fill_contiguous(&area, self.visible_line(s).iter().copied())?;
        }
        Ok(())
    }
}

impl DisplayDevice for SimulatedPanel {
    type Error = PanelError;

    fn write_block(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        pixels: &[Rgb565],
    ) -> Result<(), Self::Error> {
        let fits_x = u32::from(x) + u32::from(width) <= u32::from(self.width);
        let fits_y = u32::from(y) + u32::from(height) <= u32::from(self.height);
        if !fits_x || !fits_y {
            return Err(PanelError::OutOfBounds { x, y, width, height });
        }
        let expected = usize::from(width) * usize::from(height);
        if pixels.len() != expected {
            return Err(PanelError::PixelCount {
                expected,
                actual: pixels.len(),
            });
        }
        if expected == 0 {
            return Ok(());
        }

        for (dy, src) in pixels.chunks_exact(usize::from(width)).enumerate() {
            let line = self.physical_of(y + dy as u16);
            let start = usize::from(line) * usize::from(self.width) + usize::from(x);
            self.lines[start..start + src.len()].copy_from_slice(src);
        }
        self.writes += 1;
        Ok(())
    }

    fn set_scroll_offset(
        &mut self,
        offset: u16,
    ) -> Result<(), Self::Error> {
        if offset >= self.height {
            return Err(PanelError::OffsetOutOfRange(offset));
        }
        self.scroll_offset = offset;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use waterfall_common::{Calibration, ScrollDirection, Waterfall, WaterfallConfig};

    use super::*;

    const H: u16 = 5;

    fn waterfall(direction: ScrollDirection) -> Waterfall<SimulatedPanel, 2> {
        let cfg = WaterfallConfig::DEFAULT
            .with_height(H)
            .with_direction(direction)
            .with_calibration(Calibration::NORMALIZED);
        let panel = SimulatedPanel::new(2, H, direction == ScrollDirection::Decreasing);
        let mut wf = Waterfall::new(panel, &cfg).unwrap();
        wf.begin().unwrap();
        wf
    }

    #[test]
    fn test_newest_row_at_bottom_edge() {
        for direction in [ScrollDirection::Increasing, ScrollDirection::Decreasing] {
            let mut wf = waterfall(direction);
            // More frames than lines so the buffer has wrapped
            for i in 0..(H as usize * 2 + 3) {
                let level = 2f32.powi(-(i as i32 % 15));
                wf.render(&[level, level]).unwrap();
                let newest = *wf.last_row();
                assert_eq!(wf.device().visible_line(H - 1), newest, "{direction:?} frame {i}");
            }
        }
    }

    #[test]
    fn test_history_flows_upward() {
        for direction in [ScrollDirection::Increasing, ScrollDirection::Decreasing] {
            let mut wf = waterfall(direction);
            let mut rows = Vec::new();
            for i in 0..H {
                let level = 2f32.powi(-i32::from(i) * 3);
                wf.render(&[level, level]).unwrap();
                rows.push(*wf.last_row());
            }
            // Oldest on top, newest at the bottom
            for s in 0..H {
                assert_eq!(wf.device().visible_line(s), rows[usize::from(s)], "{direction:?} line {s}");
            }
        }
    }

    #[test]
    fn test_rejects_out_of_bounds() {
        let mut panel = SimulatedPanel::new(4, 4, false);
        let px = [BLACK; 4];
        assert_eq!(
            panel.write_block(0, 4, 4, 1, &px),
            Err(PanelError::OutOfBounds {
                x: 0,
                y: 4,
                width: 4,
                height: 1
            })
        );
        assert_eq!(
            panel.write_block(0, 0, 4, 1, &px[..3]),
            Err(PanelError::PixelCount { expected: 4, actual: 3 })
        );
        assert_eq!(panel.set_scroll_offset(4), Err(PanelError::OffsetOutOfRange(4)));
        assert_eq!(panel.writes(), 0);
    }

    #[test]
    fn test_empty_window_is_noop() {
        let mut panel = SimulatedPanel::new(4, 4, true);
        assert_eq!(panel.write_block(0, 0, 0, 1, &[]), Ok(()));
        assert_eq!(panel.write_block(2, 3, 2, 0, &[]), Ok(()));
        assert_eq!(
            panel.write_block(0, 0, 0, 1, &[BLACK]),
            Err(PanelError::PixelCount { expected: 0, actual: 1 })
        );
        assert_eq!(panel.writes(), 0);
        assert!((0..4).all(|s| panel.visible_line(s) == [BLACK; 4]));
    }
}

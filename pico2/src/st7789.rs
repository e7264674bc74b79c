//! ST7789 panel driver with hardware vertical scroll for embassy-rp.
//!
//! The waterfall sends one 240-pixel row per spectral frame, so there is no
//! framebuffer: each row is packed into a 480-byte line buffer and pushed with a
//! blocking SPI write (480 bytes at 62.5 MHz is ~60 us, less than a DMA setup is
//! worth). The vertical scroll area spans the whole panel and the scroll pointer
//! (`VSCSAD`) is moved after every row.
//!
//! # Row Order
//!
//! With `mirrored_rows` the panel is set up with `MADCTL.MY`, so row address `y`
//! lands on memory line `H - 1 - y` while the scan still runs from memory line
//! `VSCSAD` downwards. That is what the decreasing cursor expects.

use embassy_rp::gpio::Output;
use embassy_rp::peripherals::SPI0;
use embassy_rp::spi::{Async, Error as SpiError, Spi};
use embassy_time::Timer;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::prelude::*;
use waterfall_common::DisplayDevice;
use waterfall_common::colors::BLACK;
use waterfall_common::config::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Bytes per panel line (RGB565, big-endian on the wire).
const LINE_BYTES: usize = SCREEN_WIDTH * 2;

// ST7789 Commands
const SWRESET: u8 = 0x01;
const SLPOUT: u8 = 0x11;
const NORON: u8 = 0x13;
const INVON: u8 = 0x21;
const DISPON: u8 = 0x29;
const CASET: u8 = 0x2A;
const RASET: u8 = 0x2B;
const RAMWR: u8 = 0x2C;
const VSCRDEF: u8 = 0x33;
const MADCTL: u8 = 0x36;
const VSCSAD: u8 = 0x37;
const COLMOD: u8 = 0x3A;

// MADCTL flags
const MADCTL_MY: u8 = 0x80; // Row address order

/// ST7789 on SPI0 in portrait orientation (240x320).
pub struct St7789Panel<'d> {
    spi: Spi<'d, SPI0, Async>,
    dc: Output<'d>,
    cs: Output<'d>,
    mirrored_rows: bool,
    line: [u8; LINE_BYTES],
}

impl<'d> St7789Panel<'d> {
    /// Create a panel from SPI and control pins. No bus traffic until [`Self::init`].
    pub fn new(
        spi: Spi<'d, SPI0, Async>,
        dc: Output<'d>,
        cs: Output<'d>,
        mirrored_rows: bool,
    ) -> Self {
        Self {
            spi,
            dc,
            cs,
            mirrored_rows,
            line: [0; LINE_BYTES],
        }
    }

    /// Reset the controller, configure portrait RGB565 with a full-height scroll
    /// area, and clear the panel.
    ///
    /// # Errors
    /// SPI failure on any command.
    pub async fn init(&mut self) -> Result<(), SpiError> {
        self.command(SWRESET, &[])?;
        Timer::after_millis(150).await;

        self.command(SLPOUT, &[])?;
        Timer::after_millis(10).await;

        // RGB565 (16-bit)
        self.command(COLMOD, &[0x55])?;

        let madctl = if self.mirrored_rows { MADCTL_MY } else { 0 };
        self.command(MADCTL, &[madctl])?;

        // Inversion on (required for PIM715)
        self.command(INVON, &[])?;
        Timer::after_millis(10).await;

        self.command(NORON, &[])?;
        Timer::after_millis(10).await;

        // Scroll area: no fixed top or bottom band, all lines scroll
        let [vsa_hi, vsa_lo] = SCREEN_HEIGHT.to_be_bytes();
        self.command(VSCRDEF, &[0, 0, vsa_hi, vsa_lo, 0, 0])?;

        self.clear()?;

        self.command(DISPON, &[])?;
        Timer::after_millis(10).await;
        Ok(())
    }

    /// Fill every line with black.
    fn clear(&mut self) -> Result<(), SpiError> {
        let raw: RawU16 = BLACK.into();
        let bytes = raw.into_inner().to_be_bytes();
        for px in self.line.chunks_exact_mut(2) {
            px.copy_from_slice(&bytes);
        }
        self.set_window(0, 0, SCREEN_WIDTH as u16, SCREEN_HEIGHT)?;
        self.begin_ram_write()?;
        let mut result = Ok(());
        for _ in 0..SCREEN_HEIGHT {
            result = self.spi.blocking_write(&self.line);
            if result.is_err() {
                break;
            }
        }
        self.cs.set_high();
        result
    }

    /// Send a command byte followed by its parameters (DC low, then high; CS held low).
    fn command(
        &mut self,
        cmd: u8,
        params: &[u8],
    ) -> Result<(), SpiError> {
        self.cs.set_low();
        self.dc.set_low();
        let mut result = self.spi.blocking_write(&[cmd]);
        if result.is_ok() && !params.is_empty() {
            self.dc.set_high();
            result = self.spi.blocking_write(params);
        }
        self.cs.set_high();
        result
    }

    /// Set the drawing window.
    fn set_window(
        &mut self,
        x: u16,
        y: u16,
        w: u16,
        h: u16,
    ) -> Result<(), SpiError> {
        let [x0h, x0l] = x.to_be_bytes();
        let [x1h, x1l] = (x + w - 1).to_be_bytes();
        let [y0h, y0l] = y.to_be_bytes();
        let [y1h, y1l] = (y + h - 1).to_be_bytes();
        self.command(CASET, &[x0h, x0l, x1h, x1l])?;
        self.command(RASET, &[y0h, y0l, y1h, y1l])
    }

    /// Issue RAMWR and leave CS low with DC high for pixel data.
    fn begin_ram_write(&mut self) -> Result<(), SpiError> {
        self.cs.set_low();
        self.dc.set_low();
        let result = self.spi.blocking_write(&[RAMWR]);
        self.dc.set_high();
        if result.is_err() {
            self.cs.set_high();
        }
        result
    }
}

impl DisplayDevice for St7789Panel<'_> {
    type Error = SpiError;

    fn write_block(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        pixels: &[Rgb565],
    ) -> Result<(), Self::Error> {
        if width == 0 || height == 0 || pixels.is_empty() {
            return Ok(());
        }
        self.set_window(x, y, width, height)?;
        self.begin_ram_write()?;

        // Stream through the line buffer; one chunk per panel line at most
        let mut result = Ok(());
        for chunk in pixels.chunks(SCREEN_WIDTH) {
            for (dst, color) in self.line.chunks_exact_mut(2).zip(chunk) {
                let raw: RawU16 = (*color).into();
                dst.copy_from_slice(&raw.into_inner().to_be_bytes());
            }
            result = self.spi.blocking_write(&self.line[..chunk.len() * 2]);
            if result.is_err() {
                break;
            }
        }
        self.cs.set_high();
        result
    }

    fn set_scroll_offset(
        &mut self,
        offset: u16,
    ) -> Result<(), Self::Error> {
        // Offset is a memory line; MADCTL.MY only flips the write address, not the scan
        self.command(VSCSAD, &offset.to_be_bytes())
    }
}

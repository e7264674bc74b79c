//! Spectrum waterfall core: color ramp, log quantizer, row compositor and
//! scroll controller.
//!
//! This crate is platform-agnostic and shared between the simulator and the
//! Pico 2 firmware:
//!
//! - [`colors`]: Color stops, RGB565 packing and the default rainbow palette
//! - [`ramp`]: 256-entry lookup table built once from the stops
//! - [`quantizer`]: Bit-pattern `log2` approximation, `f32` → ramp index
//! - [`compositor`]: Magnitude vector → pixel row, reusing one row buffer
//! - [`scroll`]: Circular row cursor and scroll-offset tracking
//! - [`display`]: The two-call boundary to the panel driver
//! - [`waterfall`]: The owned context tying it together, one per display
//! - [`config`]: Screen geometry and startup configuration
//! - [`error`]: Configuration and render errors
//! - [`demo`]: Synthetic spectrum for demos (stands in for the FFT stage)
//!
//! # no_std Compatibility
//!
//! The crate is `no_std` and never allocates. Tests run on the host with `std`:
//! ```bash
//! cargo test -p waterfall-common
//! ```

// Use no_std only when NOT testing (tests need std for the test harness)
#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

pub mod colors;
pub mod compositor;
pub mod config;
pub mod demo;
pub mod display;
pub mod error;
pub mod quantizer;
pub mod ramp;
pub mod scroll;
pub mod waterfall;

// Re-export commonly used items
pub use colors::{ColorStop, RAINBOW};
pub use config::{SCREEN_HEIGHT, SCREEN_WIDTH, WaterfallConfig};
pub use display::DisplayDevice;
pub use error::{ConfigError, RenderError};
pub use quantizer::{Calibration, Quantizer};
pub use ramp::{RampTable, build_ramp};
pub use scroll::{RowPlacement, ScrollController, ScrollDirection};
pub use waterfall::{RenderStats, Waterfall};

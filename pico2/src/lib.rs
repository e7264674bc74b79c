//! Waterfall firmware library - host-testable pieces of the Pico 2 build.
//!
//! The binary (`main.rs`) owns the peripherals and the embassy tasks; everything
//! that is plain arithmetic lives here so it can be tested on the host:
//!
//! - [`config`]: Build-time board and waterfall configuration (feature selected)
//! - [`cpu_cycles`]: DWT cycle counter helpers
//! - [`row_timing`]: Per-row render cost statistics
//!
//! # Testing
//!
//! ```bash
//! cargo test -p waterfall-pico2 --lib --target x86_64-unknown-linux-gnu  # Linux/macOS
//! cargo test -p waterfall-pico2 --lib --target x86_64-pc-windows-msvc    # Windows
//! ```

// Use no_std only when NOT testing (tests need std for the test harness)
#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]

pub mod config;
pub mod cpu_cycles;
pub mod row_timing;

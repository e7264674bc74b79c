//! Spectrum waterfall firmware for Raspberry Pi Pico 2 (RP2350).
//!
//! Shows a scrolling spectrogram on the Pimoroni PIM715 Display Pack 2.8".
//!
//! # Architecture
//!
//! - Producer task: generates one magnitude vector per tick and sends it over a
//!   depth-1 channel. It waits whenever the renderer has not taken the last frame.
//! - Main task: receives a frame, renders it as the newest row (one 480-byte SPI
//!   write plus a scroll-pointer update) and logs render cost once per screen.

#![no_std]
#![no_main]
// Crate-level lints (match lib.rs for consistency)
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]

mod display;
mod st7789;

use defmt::{error, info, warn};
use embassy_executor::Spawner;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::spi::Spi;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::Timer;
use waterfall_common::demo::{ToneSweep, to_raw_power};
use waterfall_common::{RenderError, SCREEN_WIDTH, ScrollDirection, Waterfall};
use waterfall_pico2::config::{
    CPU_FREQ_HZ,
    FRAME_INTERVAL_MS,
    RAW_POWER_INPUT,
    SPI_FREQ_HZ,
    WATERFALL,
    actual_spi_freq,
};
use waterfall_pico2::cpu_cycles;
use waterfall_pico2::row_timing::RowTiming;
use {defmt_rtt as _, panic_probe as _};

use crate::display::display_spi_config;
use crate::st7789::St7789Panel;

// =============================================================================
// Frame Hand-off
// =============================================================================

/// One magnitude vector per panel column.
type Frame = [f32; SCREEN_WIDTH];

/// Depth 1: the producer blocks while a frame is waiting, nothing is dropped.
static FRAMES: Channel<CriticalSectionRawMutex, Frame, 1> = Channel::new();

/// Synthetic spectrum producer (stands in for the FFT stage).
#[embassy_executor::task]
async fn producer_task() {
    info!("Producer task started");

    let mut source = ToneSweep::<SCREEN_WIDTH>::new();
    loop {
        let mut frame = source.next_frame();
        if RAW_POWER_INPUT {
            for m in &mut frame {
                *m = to_raw_power(*m);
            }
        }
        FRAMES.send(frame).await;
        Timer::after_millis(FRAME_INTERVAL_MS).await;
    }
}

// Program metadata for `picotool info`
#[unsafe(link_section = ".bi_entries")]
#[used]
pub static PICOTOOL_ENTRIES: [embassy_rp::binary_info::EntryAddr; 4] = [
    embassy_rp::binary_info::rp_program_name!(c"pico2-waterfall"),
    embassy_rp::binary_info::rp_program_description!(c"Spectrum waterfall on PIM715 Display"),
    embassy_rp::binary_info::rp_cargo_version!(),
    embassy_rp::binary_info::rp_program_build_attribute!(),
];

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Spectrum waterfall starting...");

    // cpu250-spi62-1v10: 250 MHz @ 1.10V for 62.5 MHz SPI (250/4)
    #[cfg(feature = "cpu250-spi62-1v10")]
    let p = {
        use embassy_rp::clocks::{ClockConfig, CoreVoltage};
        use embassy_rp::config::Config;

        let mut config = Config::default();
        config.clocks = ClockConfig::system_freq(CPU_FREQ_HZ).expect("Invalid overclock frequency");
        config.clocks.core_voltage = CoreVoltage::V1_10;
        info!("Overclock: 250 MHz @ 1.10V (SPI 62.5 MHz)");
        embassy_rp::init(config)
    };

    // cpu280-spi70-1v30: 280 MHz @ 1.30V for 70 MHz SPI (280/4)
    #[cfg(feature = "cpu280-spi70-1v30")]
    let p = {
        use embassy_rp::clocks::{ClockConfig, CoreVoltage};
        use embassy_rp::config::Config;

        let mut config = Config::default();
        config.clocks = ClockConfig::system_freq(CPU_FREQ_HZ).expect("Invalid overclock frequency");
        config.clocks.core_voltage = CoreVoltage::V1_30;
        info!("Overclock: 280 MHz @ 1.30V (SPI 70 MHz)");
        embassy_rp::init(config)
    };

    #[cfg(not(any(feature = "cpu250-spi62-1v10", feature = "cpu280-spi70-1v30")))]
    let p = embassy_rp::init(Default::default());

    cpu_cycles::init();
    info!(
        "CPU {} MHz, SPI {} Hz (requested {})",
        CPU_FREQ_HZ / 1_000_000,
        actual_spi_freq(CPU_FREQ_HZ, SPI_FREQ_HZ),
        SPI_FREQ_HZ
    );

    // PIM715 pinout: CS=17, DC=16, CLK=18, MOSI=19, Backlight=20
    let cs = Output::new(p.PIN_17, Level::High);
    let dc = Output::new(p.PIN_16, Level::Low);
    let _backlight = Output::new(p.PIN_20, Level::High);

    // TX-only SPI, the panel has no MISO
    let spi = Spi::new_txonly(p.SPI0, p.PIN_18, p.PIN_19, p.DMA_CH0, display_spi_config());

    let mirrored_rows = WATERFALL.direction == ScrollDirection::Decreasing;
    let mut panel = St7789Panel::new(spi, dc, cs, mirrored_rows);
    if let Err(e) = panel.init().await {
        error!("Display init failed: {}", e);
        return;
    }
    info!("Display initialized (mirrored rows: {})", mirrored_rows);

    let mut waterfall: Waterfall<St7789Panel<'_>, SCREEN_WIDTH> = match Waterfall::new(panel, &WATERFALL) {
        Ok(wf) => wf,
        Err(e) => {
            error!("Invalid waterfall configuration: {}", e);
            return;
        }
    };
    if let Err(e) = waterfall.begin() {
        error!("Initial scroll offset failed: {}", e);
    }
    info!(
        "Waterfall {}x{} {} calibration={} hardware_scroll={}",
        waterfall.width(),
        waterfall.height(),
        WATERFALL.direction,
        WATERFALL.calibration,
        WATERFALL.hardware_scroll
    );

    spawner.spawn(producer_task()).unwrap();

    let mut timing = RowTiming::new();

    loop {
        let frame = FRAMES.receive().await;

        let start = cpu_cycles::read();
        let result = waterfall.render(&frame);
        timing.record(cpu_cycles::elapsed(start, cpu_cycles::read()));

        // A row whose scroll update failed is still on the panel and counted
        let row_landed = match result {
            Ok(_) => true,
            Err(RenderError::LengthMismatch { expected, actual }) => {
                warn!("Frame rejected: {} values for {} columns", actual, expected);
                false
            }
            Err(RenderError::Display(e)) => {
                error!("Display write failed: {}", e);
                false
            }
            Err(RenderError::ScrollOffset { placement, error }) => {
                error!("Scroll offset update failed after row {}: {}", placement.row, error);
                true
            }
        };

        if row_landed && waterfall.scroll().at_start() {
            let stats = waterfall.stats();
            let summary = timing.take();
            info!(
                "Cycle {}: rows={} rejected={} errors={} render us min/avg/max={}/{}/{}",
                stats.cycles_completed,
                stats.rows_rendered,
                stats.frames_rejected,
                stats.display_errors,
                cpu_cycles::to_us(summary.min),
                cpu_cycles::to_us(summary.avg),
                cpu_cycles::to_us(summary.max)
            );
        }
    }
}

//! Spectrum waterfall simulator for desktop.
//!
//! Runs the same waterfall core as the firmware against an emulated ST7789 with a
//! vertical scroll register, fed by the synthetic tone sweep.
//!
//! Keys: `Space` pauses, `R` restarts the session, `Escape` quits.
//! Flags: `--decreasing`, `--raw-power`, `--no-hardware-scroll`.

// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]

mod panel;
mod profiling;
mod timing;

use std::thread;
use std::time::{Duration, Instant};

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::sdl2::Keycode;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window};
use waterfall_common::colors::BLACK;
use waterfall_common::demo::{ToneSweep, to_raw_power};
use waterfall_common::{
    Calibration,
    RenderError,
    SCREEN_HEIGHT,
    SCREEN_WIDTH,
    ScrollDirection,
    Waterfall,
    WaterfallConfig,
};

use crate::panel::SimulatedPanel;
use crate::profiling::ProfilingMetrics;
use crate::timing::{FRAME_TIME, WINDOW_SCALE};

/// Settings picked on the command line.
struct Options {
    direction: ScrollDirection,
    raw_power: bool,
    hardware_scroll: bool,
}

impl Options {
    fn from_args() -> Self {
        let mut opts = Self {
            direction: ScrollDirection::Increasing,
            raw_power: false,
            hardware_scroll: true,
        };
        for arg in std::env::args().skip(1) {
            match arg.as_str() {
                "--decreasing" => opts.direction = ScrollDirection::Decreasing,
                "--raw-power" => opts.raw_power = true,
                "--no-hardware-scroll" => opts.hardware_scroll = false,
                other => eprintln!("ignoring unknown argument {other}"),
            }
        }
        opts
    }

    fn config(&self) -> WaterfallConfig<'static> {
        let calibration = if self.raw_power {
            Calibration::RAW_POWER
        } else {
            Calibration::NORMALIZED
        };
        WaterfallConfig::DEFAULT
            .with_calibration(calibration)
            .with_direction(self.direction)
            .with_hardware_scroll(self.hardware_scroll)
    }
}

fn main() {
    let opts = Options::from_args();
    let config = opts.config();

    let panel = SimulatedPanel::new(
        SCREEN_WIDTH as u16,
        SCREEN_HEIGHT,
        opts.direction == ScrollDirection::Decreasing,
    );
    let mut waterfall: Waterfall<SimulatedPanel, SCREEN_WIDTH> = match Waterfall::new(panel, &config) {
        Ok(wf) => wf,
        Err(e) => {
            eprintln!("invalid configuration: {e}");
            return;
        }
    };

    let mut display: SimulatorDisplay<Rgb565> =
        SimulatorDisplay::new(Size::new(SCREEN_WIDTH as u32, u32::from(SCREEN_HEIGHT)));
    let output_settings = OutputSettingsBuilder::new().scale(WINDOW_SCALE).build();
    let mut window = Window::new("Spectrum Waterfall Sim", &output_settings);

    display.clear(BLACK).ok();
    window.update(&display);

    if let Err(e) = waterfall.begin() {
        eprintln!("display init failed: {e}");
        return;
    }
    println!(
        "waterfall {}x{} {:?} calibration={:?} hardware_scroll={}",
        SCREEN_WIDTH, SCREEN_HEIGHT, opts.direction, config.calibration, opts.hardware_scroll
    );

    let mut source = ToneSweep::<SCREEN_WIDTH>::new();
    let mut metrics = ProfilingMetrics::new();
    let mut paused = false;

    loop {
        let frame_start = Instant::now();

        for ev in window.events() {
            match ev {
                SimulatorEvent::Quit => return,
                SimulatorEvent::KeyDown { keycode, repeat, .. } => {
                    if repeat {
                        continue;
                    }
                    match keycode {
                        Keycode::Escape => return,
                        Keycode::Space => paused = !paused,
                        Keycode::R => {
                            if let Err(e) = waterfall.begin() {
                                eprintln!("restart failed: {e}");
                            }
                            metrics.reset_extremes();
                            println!("session restarted");
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
        }

        let mut render_time = Duration::ZERO;
        if !paused {
            let mut frame = source.next_frame();
            if opts.raw_power {
                for m in &mut frame {
                    *m = to_raw_power(*m);
                }
            }

            let render_start = Instant::now();
            let result = waterfall.render(&frame);
            render_time = render_start.elapsed();

            let row_landed = match result {
                Ok(_) => true,
                Err(RenderError::LengthMismatch { expected, actual }) => {
                    eprintln!("dropped frame: {actual} values for {expected} columns");
                    false
                }
                Err(RenderError::Display(e)) => {
                    eprintln!("panel error: {e}");
                    false
                }
                Err(RenderError::ScrollOffset { placement, error }) => {
                    eprintln!("scroll offset failed after row {}: {error}", placement.row);
                    true
                }
            };

            if row_landed && waterfall.scroll().at_start() {
                let stats = waterfall.stats();
                println!(
                    "[{}] cycle {} rows={} render min/avg/max={}/{}/{} us",
                    metrics.uptime_string(),
                    stats.cycles_completed,
                    stats.rows_rendered,
                    metrics.render_time_min_us,
                    metrics.render_time_avg_us(),
                    metrics.render_time_max_us,
                );
                metrics.reset_extremes();
            }
        }

        waterfall.device().present(&mut display).ok();
        window.update(&display);

        let pre_sleep = frame_start.elapsed();
        if let Some(remaining) = FRAME_TIME.checked_sub(pre_sleep) {
            thread::sleep(remaining);
        }
        let sleep_time = frame_start.elapsed().saturating_sub(pre_sleep);

        if !paused {
            metrics.record_frame(frame_start.elapsed(), render_time, sleep_time);
        }
    }
}

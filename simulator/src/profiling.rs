//! Row timing for the simulator.
//!
//! Render time covers quantize, ramp lookup and the panel write. Frame time is the
//! whole loop iteration including the present and the sleep.

use core::fmt::Write;
use std::time::{Duration, Instant};

use heapless::String;

/// Timing statistics in microseconds.
pub struct ProfilingMetrics {
    pub frame_time_us: u32,
    pub render_time_us: u32,
    pub sleep_time_us: u32,

    pub render_time_min_us: u32,
    pub render_time_max_us: u32,
    render_time_avg_us: f32,

    pub total_frames: u64,

    start_time: Instant,
}

impl ProfilingMetrics {
    const EMA_ALPHA: f32 = 0.1;

    pub fn new() -> Self {
        Self {
            frame_time_us: 0,
            render_time_us: 0,
            sleep_time_us: 0,
            render_time_min_us: u32::MAX,
            render_time_max_us: 0,
            render_time_avg_us: 0.0,
            total_frames: 0,
            start_time: Instant::now(),
        }
    }

    /// Record one loop iteration.
    pub fn record_frame(
        &mut self,
        total_time: Duration,
        render_time: Duration,
        sleep_time: Duration,
    ) {
        let render_us = render_time.as_micros() as u32;

        self.frame_time_us = total_time.as_micros() as u32;
        self.render_time_us = render_us;
        self.sleep_time_us = sleep_time.as_micros() as u32;

        self.render_time_min_us = self.render_time_min_us.min(render_us);
        self.render_time_max_us = self.render_time_max_us.max(render_us);

        if self.total_frames == 0 {
            self.render_time_avg_us = render_us as f32;
        } else {
            self.render_time_avg_us =
                Self::EMA_ALPHA.mul_add(render_us as f32, (1.0 - Self::EMA_ALPHA) * self.render_time_avg_us);
        }

        self.total_frames += 1;
    }

    /// Smoothed render time in microseconds.
    #[inline]
    pub const fn render_time_avg_us(&self) -> u32 { self.render_time_avg_us as u32 }

    /// Clear min/max, keep the average running.
    pub const fn reset_extremes(&mut self) {
        self.render_time_min_us = u32::MAX;
        self.render_time_max_us = 0;
    }

    #[inline]
    pub fn uptime(&self) -> Duration { self.start_time.elapsed() }

    /// Uptime as `HH:MM:SS`.
    pub fn uptime_string(&self) -> String<12> { format_hms(self.uptime().as_secs()) }
}

impl Default for ProfilingMetrics {
    fn default() -> Self { Self::new() }
}

fn format_hms(secs: u64) -> String<12> {
    let mut s = String::new();
    // 12 bytes hold any hour count below 10^6
    write!(s, "{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60).ok();
    s
}

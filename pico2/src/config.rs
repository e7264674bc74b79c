//! Build-time configuration for the Pico 2 firmware.
//!
//! Cargo features pick the alternatives; everything resolves to constants so the
//! binary carries no runtime configuration state.

use waterfall_common::{Calibration, ScrollDirection, WaterfallConfig};

// Ensure only one overclock feature is enabled at a time
#[cfg(all(feature = "cpu250-spi62-1v10", feature = "cpu280-spi70-1v30"))]
compile_error!("Only one overclock feature can be enabled at a time. Choose one of: cpu250-spi62-1v10, cpu280-spi70-1v30");

// =============================================================================
// Clocks
// =============================================================================

/// System clock in Hz for the selected overclock profile (stock RP2350: 150 MHz).
pub const CPU_FREQ_HZ: u32 = if cfg!(feature = "cpu280-spi70-1v30") {
    280_000_000
} else if cfg!(feature = "cpu250-spi62-1v10") {
    250_000_000
} else {
    150_000_000
};

/// Requested SPI clock. The ST7789 datasheet maximum is 62.5 MHz.
pub const SPI_FREQ_HZ: u32 = if cfg!(feature = "cpu280-spi70-1v30") {
    70_000_000
} else {
    62_500_000
};

/// SPI clock the RP2350 divider actually produces from `clk_peri`.
///
/// Mirrors the prescaler search in the SPI driver: `clk / (presc * postdiv)` with
/// `presc` even in `2..=254` and `postdiv` in `1..=256`. Returns 0 when the
/// request is below the slowest achievable clock.
pub const fn actual_spi_freq(
    clk_peri_hz: u32,
    requested_hz: u32,
) -> u32 {
    if requested_hz == 0 {
        return 0;
    }
    let ratio = clk_peri_hz.div_ceil(requested_hz.saturating_mul(2));
    if ratio == 0 || ratio > 127 * 256 {
        return 0;
    }
    let presc = ratio.div_ceil(256);
    let postdiv = if presc == 1 { ratio } else { ratio.div_ceil(presc) };
    clk_peri_hz / (presc * 2 * postdiv)
}

// =============================================================================
// Waterfall
// =============================================================================

/// Quantizer calibration. Raw FFT power unless `calibration-normalized`.
pub const CALIBRATION: Calibration = if cfg!(feature = "calibration-normalized") {
    Calibration::NORMALIZED
} else {
    Calibration::RAW_POWER
};

/// Cursor direction. Decreasing (mirrored panel rows) unless `scroll-increasing`.
pub const DIRECTION: ScrollDirection = if cfg!(feature = "scroll-increasing") {
    ScrollDirection::Increasing
} else {
    ScrollDirection::Decreasing
};

/// Whether the ST7789 vertical scroll register is driven.
pub const HARDWARE_SCROLL: bool = !cfg!(feature = "no-hardware-scroll");

/// Producer pacing: one spectral frame every 20 ms (a full screen in 6.4 s).
pub const FRAME_INTERVAL_MS: u64 = 20;

/// Producer output needs squaring and scaling into raw power.
pub const RAW_POWER_INPUT: bool = !cfg!(feature = "calibration-normalized");

/// Full waterfall configuration for this build.
pub const WATERFALL: WaterfallConfig<'static> = WaterfallConfig::DEFAULT
    .with_calibration(CALIBRATION)
    .with_direction(DIRECTION)
    .with_hardware_scroll(HARDWARE_SCROLL);

const _: () = assert!(CALIBRATION.validate().is_ok());
const _: () = assert!(actual_spi_freq(CPU_FREQ_HZ, SPI_FREQ_HZ) > 0);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actual_spi_freq_profiles() {
        // Stock clock cannot reach 62.5 MHz, the divider lands on clk/4
        assert_eq!(actual_spi_freq(150_000_000, 62_500_000), 37_500_000);
        assert_eq!(actual_spi_freq(250_000_000, 62_500_000), 62_500_000);
        assert_eq!(actual_spi_freq(280_000_000, 70_000_000), 70_000_000);
    }

    #[test]
    fn test_actual_spi_freq_never_exceeds_request() {
        for requested in [1_000_000, 10_000_000, 24_000_000, 40_000_000, 62_500_000] {
            let actual = actual_spi_freq(150_000_000, requested);
            assert!(actual > 0 && actual <= requested, "{requested} -> {actual}");
        }
    }

    #[test]
    fn test_actual_spi_freq_out_of_range() {
        assert_eq!(actual_spi_freq(150_000_000, 0), 0);
        assert_eq!(actual_spi_freq(150_000_000, 1_000), 0);
    }

    #[test]
    fn test_waterfall_matches_features() {
        assert_eq!(WATERFALL.calibration, CALIBRATION);
        assert_eq!(WATERFALL.direction, DIRECTION);
        assert_eq!(WATERFALL.hardware_scroll, !cfg!(feature = "no-hardware-scroll"));
        assert_eq!(RAW_POWER_INPUT, CALIBRATION == Calibration::RAW_POWER);
        assert_eq!(usize::from(WATERFALL.height), 320);
    }
}

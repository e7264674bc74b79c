//! 256-entry color lookup table built from a short list of [`ColorStop`]s.
//!
//! The table is computed once at startup. Rendering a row is then a plain array
//! lookup per pixel; no interpolation happens in the hot path.
//!
//! # Interpolation
//!
//! For index `v`, the bracketing segment is `[stop[i], stop[i + 1])` where `stop[i]`
//! is the last stop with `threshold <= v`. Each channel is interpolated with integer
//! proportional weights, each term truncated toward zero:
//!
//! ```text
//! c = c1 * (v - v0) / (v1 - v0) + c0 * (v1 - v) / (v1 - v0)
//! ```
//!
//! At `v == v0` this reduces to `c0` exactly. Indices at or beyond the final stop
//! (only reachable when the last threshold is below `0x100`) hold the final color.

use embedded_graphics::pixelcolor::{Rgb565, Rgb888, RgbColor};

use crate::colors::{BLACK, ColorStop, STOP_SENTINEL, pack_rgb565};
use crate::error::ConfigError;

/// Number of entries in the table (one per quantized index).
pub const RAMP_SIZE: usize = 256;

/// Precomputed display-native colors indexed by quantizer output.
///
/// Indexing takes a `u8`, so an out-of-range lookup cannot be expressed.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct RampTable {
    colors: [Rgb565; RAMP_SIZE],
}

impl RampTable {
    /// Build the table from validated stops.
    ///
    /// # Errors
    /// Returns the first [`ConfigError`] found in the stop list.
    pub fn build(stops: &[ColorStop]) -> Result<Self, ConfigError> {
        validate_stops(stops)?;

        let mut colors = [BLACK; RAMP_SIZE];
        for (v, slot) in colors.iter_mut().enumerate() {
            *slot = pack_rgb565(interpolate_at(stops, v as u16));
        }
        Ok(Self { colors })
    }

    /// Color for a quantized index.
    #[inline]
    pub fn get(
        &self,
        index: u8,
    ) -> Rgb565 {
        self.colors[index as usize]
    }

    /// The whole table, index order.
    #[inline]
    pub fn as_slice(&self) -> &[Rgb565; RAMP_SIZE] { &self.colors }
}

impl core::ops::Index<u8> for RampTable {
    type Output = Rgb565;

    #[inline]
    fn index(
        &self,
        index: u8,
    ) -> &Self::Output {
        &self.colors[index as usize]
    }
}

/// Alias for the builder entry point.
///
/// # Errors
/// See [`RampTable::build`].
pub fn build_ramp(stops: &[ColorStop]) -> Result<RampTable, ConfigError> { RampTable::build(stops) }

/// Check the stop list, reporting which rule failed and where.
///
/// # Errors
/// - [`ConfigError::EmptyStops`] for an empty list
/// - [`ConfigError::FirstThresholdNotZero`] if the first stop is not at 0
/// - [`ConfigError::ThresholdsNotIncreasing`] for a repeated or descending threshold
/// - [`ConfigError::ThresholdOutOfRange`] past the `0x100` sentinel
pub const fn validate_stops(stops: &[ColorStop]) -> Result<(), ConfigError> {
    let [first, ..] = stops else {
        return Err(ConfigError::EmptyStops);
    };
    if first.threshold != 0 {
        return Err(ConfigError::FirstThresholdNotZero {
            threshold: first.threshold,
        });
    }

    let mut index = 1;
    while index < stops.len() {
        let threshold = stops[index].threshold;
        if threshold > STOP_SENTINEL {
            return Err(ConfigError::ThresholdOutOfRange { index, threshold });
        }
        if threshold <= stops[index - 1].threshold {
            return Err(ConfigError::ThresholdsNotIncreasing { index });
        }
        index += 1;
    }
    Ok(())
}

/// Unpacked color at index `v`. Stops must already be validated.
fn interpolate_at(
    stops: &[ColorStop],
    v: u16,
) -> Rgb888 {
    // Last stop with threshold <= v; stop 0 sits at 0 so this always matches.
    let i = stops.iter().rposition(|s| s.threshold <= v).unwrap_or(0);
    let Some(next) = stops.get(i + 1) else {
        return stops[i].color;
    };
    let (lo, hi) = (&stops[i], next);

    let (v, v0, v1) = (i32::from(v), i32::from(lo.threshold), i32::from(hi.threshold));
    let channel = |c0: u8, c1: u8| -> u8 {
        let (c0, c1) = (i32::from(c0), i32::from(c1));
        (c1 * (v - v0) / (v1 - v0) + c0 * (v1 - v) / (v1 - v0)) as u8
    };

    Rgb888::new(
        channel(lo.color.r(), hi.color.r()),
        channel(lo.color.g(), hi.color.g()),
        channel(lo.color.b(), hi.color.b()),
    )
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::RAINBOW;

    const TWO_STOP: [ColorStop; 2] = [ColorStop::new(0, 68, 34, 153), ColorStop::new(0x100, 238, 17, 0)];

    fn rgb(c: Rgb565) -> (u8, u8, u8) { (c.r(), c.g(), c.b()) }

    fn within_one(
        a: Rgb565,
        b: Rgb565,
    ) -> bool {
        a.r().abs_diff(b.r()) <= 1 && a.g().abs_diff(b.g()) <= 1 && a.b().abs_diff(b.b()) <= 1
    }

    #[test]
    fn test_stop_colors_exact() {
        let ramp = RampTable::build(&RAINBOW).unwrap();
        for stop in RAINBOW.iter().filter(|s| s.threshold < 256) {
            assert_eq!(
                ramp.get(stop.threshold as u8),
                pack_rgb565(stop.color),
                "ramp[{:#x}] must equal its stop color",
                stop.threshold
            );
        }
    }

    #[test]
    fn test_two_stop_endpoints() {
        let ramp = build_ramp(&TWO_STOP).unwrap();
        assert_eq!(ramp[0], pack_rgb565(Rgb888::new(68, 34, 153)));
        assert!(within_one(ramp[255], pack_rgb565(Rgb888::new(238, 17, 0))));
    }

    #[test]
    fn test_two_stop_midpoint() {
        let ramp = build_ramp(&TWO_STOP).unwrap();
        // (68+238)/2 = 153, (34+17)/2 = 25.5, (153+0)/2 = 76.5
        let mid = pack_rgb565(Rgb888::new(153, 25, 76));
        assert!(within_one(ramp[128], mid), "got {:?}", rgb(ramp[128]));
        assert_eq!(interpolate_at(&TWO_STOP, 128), Rgb888::new(153, 25, 76));
    }

    #[test]
    fn test_channels_stay_within_segment() {
        for pair in RAINBOW.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            for v in lo.threshold..hi.threshold.min(256) {
                let c = interpolate_at(&RAINBOW, v);
                for (got, a, b) in [
                    (c.r(), lo.color.r(), hi.color.r()),
                    (c.g(), lo.color.g(), hi.color.g()),
                    (c.b(), lo.color.b(), hi.color.b()),
                ] {
                    // Each weighted term truncates, so the sum may land one below the lower end.
                    assert!(got + 1 >= a.min(b) && got <= a.max(b), "index {v}: {got} outside [{a}, {b}]");
                }
            }
        }
    }

    #[test]
    fn test_channels_monotonic_within_segment() {
        for pair in RAINBOW.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            let mut prev = lo.color;
            for v in lo.threshold + 1..hi.threshold.min(256) {
                let c = interpolate_at(&RAINBOW, v);
                for (now, before, target_up) in [
                    (c.r(), prev.r(), hi.color.r() >= lo.color.r()),
                    (c.g(), prev.g(), hi.color.g() >= lo.color.g()),
                    (c.b(), prev.b(), hi.color.b() >= lo.color.b()),
                ] {
                    if target_up {
                        assert!(now + 1 >= before, "index {v}: channel fell from {before} to {now}");
                    } else {
                        assert!(now <= before + 1, "index {v}: channel rose from {before} to {now}");
                    }
                }
                prev = c;
            }
        }
    }

    #[test]
    fn test_index_past_last_stop_holds_color() {
        let stops = [ColorStop::new(0, 0, 0, 0), ColorStop::new(0x80, 200, 100, 50)];
        let ramp = build_ramp(&stops).unwrap();
        let last = pack_rgb565(Rgb888::new(200, 100, 50));
        assert_eq!(ramp[0x80], last);
        assert_eq!(ramp[0xFF], last);
    }

    #[test]
    fn test_single_stop_is_flat() {
        let ramp = build_ramp(&[ColorStop::new(0, 10, 20, 30)]).unwrap();
        let flat = pack_rgb565(Rgb888::new(10, 20, 30));
        assert!(ramp.as_slice().iter().all(|&c| c == flat));
    }

    #[test]
    fn test_table_length() {
        let ramp = build_ramp(&RAINBOW).unwrap();
        assert_eq!(ramp.as_slice().len(), RAMP_SIZE);
    }

    #[test]
    fn test_build_is_deterministic() {
        assert_eq!(build_ramp(&RAINBOW).unwrap(), build_ramp(&RAINBOW).unwrap());
    }

    #[test]
    fn test_validate_reports_rule() {
        assert_eq!(build_ramp(&[]), Err(ConfigError::EmptyStops));
        assert_eq!(
            build_ramp(&[ColorStop::new(4, 0, 0, 0)]),
            Err(ConfigError::FirstThresholdNotZero { threshold: 4 })
        );
        assert_eq!(
            build_ramp(&[
                ColorStop::new(0, 0, 0, 0),
                ColorStop::new(0x40, 0, 0, 0),
                ColorStop::new(0x40, 0, 0, 0)
            ]),
            Err(ConfigError::ThresholdsNotIncreasing { index: 2 })
        );
        assert_eq!(
            build_ramp(&[ColorStop::new(0, 0, 0, 0), ColorStop::new(0x200, 0, 0, 0)]),
            Err(ConfigError::ThresholdOutOfRange {
                index: 1,
                threshold: 0x200
            })
        );
    }
}

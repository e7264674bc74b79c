//! Synthetic spectrum source for the simulator and the demo firmware.
//!
//! Stands in for the FFT stage: produces one magnitude vector per tick with a
//! noise floor, a few fixed carriers and a tone that sweeps across the band.
//! Uses `micromath` so it runs the same on the RP2350 (no FPU transcendental
//! support in `core`) and on the host.
//!
//! Output is an amplitude normalised to full scale 1.0; pair it with
//! [`Calibration::NORMALIZED`](crate::quantizer::Calibration::NORMALIZED), or pass
//! it through [`to_raw_power`] for the raw-power calibration.

use heapless::Vec;
#[cfg(not(test))]
use micromath::F32Ext;

/// Maximum number of fixed carriers.
pub const MAX_CARRIERS: usize = 4;

/// Power gain that puts a full-scale amplitude at 2^72, near the top of the
/// raw-power calibration.
pub const RAW_POWER_GAIN: f32 = 4.722_366_5e21;

/// Convert a normalised amplitude to the un-normalised power the raw-power
/// calibration expects.
#[inline]
pub fn to_raw_power(amplitude: f32) -> f32 { amplitude * amplitude * RAW_POWER_GAIN }

/// A stationary peak in the spectrum.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Carrier {
    /// Center column.
    pub bin: f32,
    /// Peak amplitude, full scale 1.0.
    pub amplitude: f32,
    /// Half-width in columns.
    pub width: f32,
}

/// Deterministic test-signal generator for `N` columns.
pub struct ToneSweep<const N: usize> {
    frame: u32,
    floor: f32,
    sweep_period: u32,
    carriers: Vec<Carrier, MAX_CARRIERS>,
    noise_state: u32,
}

impl<const N: usize> ToneSweep<N> {
    /// Generator with a -80 dB floor, a 256-frame sweep and two carriers.
    pub fn new() -> Self {
        let mut carriers = Vec::new();
        let n = N as f32;
        // Capacity is MAX_CARRIERS, both pushes fit.
        carriers
            .push(Carrier {
                bin: n * 0.2,
                amplitude: 0.3,
                width: 1.5,
            })
            .ok();
        carriers
            .push(Carrier {
                bin: n * 0.75,
                amplitude: 0.02,
                width: 3.0,
            })
            .ok();
        Self {
            frame: 0,
            floor: 1e-4,
            sweep_period: 256,
            carriers,
            noise_state: 0x1234_5678,
        }
    }

    /// Add a carrier. Returns it back if the list is full.
    pub fn add_carrier(
        &mut self,
        carrier: Carrier,
    ) -> Result<(), Carrier> {
        self.carriers.push(carrier)
    }

    /// Frames produced so far.
    #[inline]
    pub const fn frame(&self) -> u32 { self.frame }

    /// Fill `out` with the next frame. `out` should hold `N` values.
    pub fn fill(
        &mut self,
        out: &mut [f32],
    ) {
        let n = N as f32;
        let phase = (self.frame % self.sweep_period) as f32 / self.sweep_period as f32;
        // Sweep bounces between 5% and 95% of the band
        let sweep_bin = n * (0.5 + 0.45 * (phase * core::f32::consts::TAU).sin());
        // Tone fades in and out over two sweep periods
        let sweep_amp = 0.05 + 0.95 * (phase * core::f32::consts::PI).sin().abs();

        for (i, slot) in out.iter_mut().enumerate() {
            let x = i as f32;
            let mut value = self.floor * (0.5 + self.next_noise());
            value += peak(x, sweep_bin, sweep_amp, 2.0);
            for c in &self.carriers {
                value += peak(x, c.bin, c.amplitude, c.width);
            }
            *slot = value;
        }
        self.frame = self.frame.wrapping_add(1);
    }

    /// Produce the next frame as an array.
    pub fn next_frame(&mut self) -> [f32; N] {
        let mut out = [0.0; N];
        self.fill(&mut out);
        out
    }

    /// xorshift32 in `[0, 1)`.
    fn next_noise(&mut self) -> f32 {
        let mut s = self.noise_state;
        s ^= s << 13;
        s ^= s >> 17;
        s ^= s << 5;
        self.noise_state = s;
        (s >> 8) as f32 / (1u32 << 24) as f32
    }
}

impl<const N: usize> Default for ToneSweep<N> {
    fn default() -> Self { Self::new() }
}

/// Gaussian-ish bump centered at `center`.
#[inline]
fn peak(
    x: f32,
    center: f32,
    amplitude: f32,
    width: f32,
) -> f32 {
    let d = (x - center) / width;
    amplitude * (-0.5 * d * d).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_positive_and_finite() {
        let mut source = ToneSweep::<64>::new();
        for _ in 0..10 {
            let frame = source.next_frame();
            assert!(frame.iter().all(|v| v.is_finite() && *v > 0.0));
        }
        assert_eq!(source.frame(), 10);
    }

    #[test]
    fn test_carrier_stands_out() {
        let mut source = ToneSweep::<100>::new();
        let frame = source.next_frame();
        // First carrier sits at column 20 with amplitude 0.3
        assert!(frame[20] > 0.25);
        assert!(frame[20] > frame[30] * 100.0);
    }

    #[test]
    fn test_deterministic() {
        let a = ToneSweep::<32>::new().next_frame();
        let b = ToneSweep::<32>::new().next_frame();
        assert_eq!(a, b);
    }

    #[test]
    fn test_raw_power_lands_in_raw_calibration() {
        use crate::quantizer::{Calibration, quantize_with};

        let cal = Calibration::RAW_POWER;
        assert_eq!(quantize_with(&cal, to_raw_power(1.0)), 249);
        assert!(quantize_with(&cal, to_raw_power(1e-4)) < quantize_with(&cal, to_raw_power(1e-2)));
        assert_eq!(quantize_with(&cal, to_raw_power(0.0)), 0);
    }

    #[test]
    fn test_carrier_capacity() {
        let mut source = ToneSweep::<16>::new();
        let c = Carrier {
            bin: 8.0,
            amplitude: 0.1,
            width: 1.0,
        };
        assert!(source.add_carrier(c).is_ok());
        assert!(source.add_carrier(c).is_ok());
        assert_eq!(source.add_carrier(c), Err(c));
    }
}

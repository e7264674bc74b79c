//! Approximate-logarithm quantizer: `f32` magnitude → 8-bit ramp index.
//!
//! # How It Works
//!
//! For a positive IEEE-754 single, the raw bit pattern read as an unsigned integer
//! grows monotonically with the value. The exponent field is already `log2` rounded
//! down (plus a bias of 127), and the leading mantissa bits sit right below it, so
//! `bits >> shift` is a fixed-point `log2` with `23 - shift` fractional bits:
//!
//! ```text
//! bits:  0 | eeeeeeee | mmm...m
//!            exponent   mantissa
//! shift 21 → exponent + top 2 mantissa bits → 4 steps per octave
//! shift 20 → exponent + top 3 mantissa bits → 8 steps per octave
//! ```
//!
//! The field is then offset so the noise floor lands near 0, stretched by
//! `scale_num / scale_den` and clamped to `0..=255`.
//!
//! Inside an octave the mantissa is linear, not logarithmic, so the result is
//! monotonic but not exactly linear in dB. It only picks a color.
//!
//! # Edge Values
//!
//! | Input | Index |
//! |-------|-------|
//! | `0.0`, `-0.0`, negative, NaN | 0 |
//! | positive subnormal | 0 for any calibration with a positive offset |
//! | `+inf` or anything past the top of the range | 255 |

use crate::error::ConfigError;

/// Tuning constants for the quantizer.
///
/// These depend on the upstream amplitude range and the wanted dynamic range, so
/// they are configuration, not algorithm. Re-tune per deployment.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Calibration {
    /// Right shift applied to the bit pattern (`23 - shift` mantissa bits survive).
    pub shift: u32,
    /// Field value that maps to index 0.
    pub offset: i32,
    /// Scale numerator applied after the offset.
    pub scale_num: i32,
    /// Scale denominator applied after the offset.
    pub scale_den: i32,
}

impl Calibration {
    /// Un-normalised FFT power (four steps per octave, range starts near 2^30.5).
    pub const RAW_POWER: Self = Self {
        shift: 21,
        offset: 630,
        scale_num: 3,
        scale_den: 2,
    };

    /// Magnitudes normalised to full scale 1.0: `[2^-15, 1.0]` (~90 dB) → `0..=240`.
    pub const NORMALIZED: Self = Self {
        shift: 20,
        offset: 896,
        scale_num: 2,
        scale_den: 1,
    };

    /// Check the calibration without building a quantizer.
    ///
    /// # Errors
    /// [`ConfigError::ShiftOutOfRange`] for `shift > 31`, [`ConfigError::NonPositiveScale`]
    /// for a non-positive numerator or denominator.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.shift > 31 {
            return Err(ConfigError::ShiftOutOfRange { shift: self.shift });
        }
        if self.scale_num <= 0 || self.scale_den <= 0 {
            return Err(ConfigError::NonPositiveScale);
        }
        Ok(())
    }
}

impl Default for Calibration {
    fn default() -> Self { Self::RAW_POWER }
}

const _: () = assert!(Calibration::RAW_POWER.validate().is_ok());
const _: () = assert!(Calibration::NORMALIZED.validate().is_ok());

/// Validated quantizer. Total over every `f32`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Quantizer {
    calibration: Calibration,
}

impl Quantizer {
    /// Build a quantizer from a calibration.
    ///
    /// # Errors
    /// See [`Calibration::validate`].
    pub const fn new(calibration: Calibration) -> Result<Self, ConfigError> {
        match calibration.validate() {
            Ok(()) => Ok(Self { calibration }),
            Err(e) => Err(e),
        }
    }

    /// Active calibration.
    #[inline]
    pub const fn calibration(&self) -> Calibration { self.calibration }

    /// Map a magnitude to a ramp index.
    #[inline]
    pub fn quantize(
        &self,
        magnitude: f32,
    ) -> u8 {
        quantize_with(&self.calibration, magnitude)
    }
}

/// Map a magnitude to a ramp index with an explicit calibration.
///
/// The calibration is assumed valid (see [`Calibration::validate`]); a shift above
/// 31 saturates to an all-zero field instead of panicking.
#[inline]
pub fn quantize_with(
    cal: &Calibration,
    magnitude: f32,
) -> u8 {
    // Rejects NaN as well as zero and negatives.
    if !(magnitude > 0.0) {
        return 0;
    }

    // Sign bit is clear here, so the field is monotonic in the magnitude.
    let field = i64::from(magnitude.to_bits().checked_shr(cal.shift).unwrap_or(0));
    let x = (field - i64::from(cal.offset)) * i64::from(cal.scale_num) / i64::from(cal.scale_den.max(1));
    x.clamp(0, 255) as u8
}

// =============================================================================
// Tests
// =============================================================================

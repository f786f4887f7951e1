//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

use crate::constants::{PROBABILITY_FLOOR, PROBABILITY_MAX};

/// Linear interpolation between `a` and `b`, with `t` clamped to `[0, 1]`.
#[must_use]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t.mul_add(b - a, a)
}

/// Clamp a probability-shaped value to `[0, 1]`, mapping non-finite to 0.
#[must_use]
pub fn clamp01(value: f32) -> f32 {
    if !value.is_finite() {
        return PROBABILITY_FLOOR;
    }
    value.clamp(PROBABILITY_FLOOR, PROBABILITY_MAX)
}

/// Round a f32 and clamp it to the u16 range, returning 0 for NaN values.
#[must_use]
pub fn round_f32_to_u16(value: f32) -> u16 {
    if value.is_nan() {
        return 0;
    }
    let min = cast::<u16, f32>(u16::MIN).unwrap_or(0.0);
    let max = cast::<u16, f32>(u16::MAX).unwrap_or(f32::MAX);
    let clamped = value.clamp(min, max).round();
    cast::<f32, u16>(clamped).unwrap_or(0)
}

/// Round a f32 and clamp it to the u8 range, returning 0 for NaN values.
#[must_use]
pub fn round_f32_to_u8(value: f32) -> u8 {
    if value.is_nan() {
        return 0;
    }
    let min = cast::<u8, f32>(u8::MIN).unwrap_or(0.0);
    let max = cast::<u8, f32>(u8::MAX).unwrap_or(f32::MAX);
    let clamped = value.clamp(min, max).round();
    cast::<f32, u8>(clamped).unwrap_or(0)
}

/// Convert a skill level (0..=20) to a `[0, 1]` progress fraction.
#[must_use]
pub fn skill_fraction(level: u8) -> f32 {
    f32::from(level.min(20)) / 20.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_clamps_t() {
        assert!((lerp(0.0, 10.0, 0.5) - 5.0).abs() < f32::EPSILON);
        assert!((lerp(0.0, 10.0, 2.0) - 10.0).abs() < f32::EPSILON);
        assert!((lerp(0.0, 10.0, -1.0)).abs() < f32::EPSILON);
    }

    #[test]
    fn clamp01_handles_non_finite() {
        assert!(clamp01(f32::NAN).abs() < f32::EPSILON);
        assert!(clamp01(f32::INFINITY).abs() < f32::EPSILON);
        assert!((clamp01(2.5) - 1.0).abs() < f32::EPSILON);
        assert!(clamp01(-0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn rounders_cover_ranges() {
        assert_eq!(round_f32_to_u16(24.6), 25);
        assert_eq!(round_f32_to_u16(f32::NAN), 0);
        assert_eq!(round_f32_to_u16(-3.0), 0);
        assert_eq!(round_f32_to_u8(300.0), 255);
    }

    #[test]
    fn skill_fraction_saturates() {
        assert!((skill_fraction(10) - 0.5).abs() < f32::EPSILON);
        assert!((skill_fraction(40) - 1.0).abs() < f32::EPSILON);
    }
}
